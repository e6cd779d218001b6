//! Criterion benchmarks for tambor-core DSP primitives
//!
//! Run with: cargo bench -p tambor-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tambor_core::{Biquad, BiquadKind, DcBlocker, NoiseBuffer, OnePole, soft_saturate};

const SAMPLE_RATE: f32 = 44100.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn bench_one_pole(c: &mut Criterion) {
    let mut group = c.benchmark_group("OnePole");
    let noise = NoiseBuffer::default();

    for &block_size in BLOCK_SIZES {
        group.bench_with_input(
            BenchmarkId::new("highpass", block_size),
            &block_size,
            |b, &size| {
                let mut hp = OnePole::highpass();
                b.iter(|| {
                    for n in 0..size {
                        black_box(hp.process(noise.sample(n), black_box(7000.0), SAMPLE_RATE));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_biquad(c: &mut Criterion) {
    let mut group = c.benchmark_group("Biquad");
    let noise = NoiseBuffer::default();

    for &block_size in BLOCK_SIZES {
        group.bench_with_input(
            BenchmarkId::new("bandpass", block_size),
            &block_size,
            |b, &size| {
                let mut bq = Biquad::new();
                bq.configure(BiquadKind::Bandpass, 1200.0, 2.0, SAMPLE_RATE);
                b.iter(|| {
                    for n in 0..size {
                        black_box(bq.process(noise.sample(n)));
                    }
                });
            },
        );
    }

    group.bench_function("configure", |b| {
        let mut bq = Biquad::new();
        b.iter(|| bq.configure(BiquadKind::Lowpass, black_box(1000.0), 0.707, SAMPLE_RATE));
    });

    group.finish();
}

fn bench_dc_and_saturation(c: &mut Criterion) {
    c.bench_function("dc_blocker+soft_saturate/512", |b| {
        let mut dc = DcBlocker::new(SAMPLE_RATE);
        b.iter(|| {
            for n in 0..512 {
                let x = black_box(n as f32 / 256.0 - 1.0);
                black_box(soft_saturate(dc.process(x), 0.8));
            }
        });
    });

    c.bench_function("noise_buffer/new_default", |b| {
        b.iter(|| black_box(NoiseBuffer::with_seed(black_box(1))));
    });
}

criterion_group!(benches, bench_one_pole, bench_biquad, bench_dc_and_saturation);
criterion_main!(benches);
