//! Criterion benchmarks for tambor-synth voices
//!
//! Run with: cargo bench -p tambor-synth
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tambor_synth::{
    DrumKind, DrumVoice, EnvelopeGenerator, EnvelopePhase, InstrumentKind, NamedTable, Synthesis,
    Voice, WavetableBank,
};

const SAMPLE_RATE: f32 = 44100.0;
const BLOCK_SIZES: &[usize] = &[64, 256, 1024];

fn bench_procedural(c: &mut Criterion) {
    let mut group = c.benchmark_group("Procedural");

    for kind in InstrumentKind::ALL
        .into_iter()
        .filter(|k| k.synthesis() == Synthesis::Procedural)
    {
        for &block_size in BLOCK_SIZES {
            group.bench_with_input(
                BenchmarkId::new(kind.id(), block_size),
                &block_size,
                |b, &size| {
                    let mut voice = DrumVoice::with_defaults(kind, SAMPLE_RATE);
                    let mut block = vec![0.0; size];
                    b.iter(|| {
                        if !voice.is_active() {
                            voice.trigger(1.0, 60.0, None);
                        }
                        voice.process_block(&mut block);
                        black_box(&block);
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_retrigger(c: &mut Criterion) {
    c.bench_function("Retrigger/snare_every_block", |b| {
        let mut voice = DrumVoice::with_defaults(InstrumentKind::Snare, SAMPLE_RATE);
        let mut block = vec![0.0; 256];
        b.iter(|| {
            voice.trigger(black_box(0.8), 60.0, None);
            voice.process_block(&mut block);
            black_box(&block);
        });
    });
}

fn bench_wavetable(c: &mut Criterion) {
    let mut group = c.benchmark_group("Wavetable");
    let table: Vec<f32> = (0..44100).map(|i| (i as f32 * 0.01).sin()).collect();
    let mut bank = WavetableBank::new(SAMPLE_RATE);
    bank.insert(DrumKind::Kick, NamedTable::new("sine", table));
    let settings = InstrumentKind::Wavetable(DrumKind::Kick).default_settings();

    for (label, pitch) in [("base", 36.0), ("detuned", 43.3)] {
        group.bench_function(label, |b| {
            let mut voice =
                DrumVoice::wavetable(DrumKind::Kick, &bank, settings.clone(), SAMPLE_RATE);
            let mut block = vec![0.0; 256];
            b.iter(|| {
                if !voice.is_active() {
                    voice.trigger(1.0, pitch, None);
                }
                voice.process_block(&mut block);
                black_box(&block);
            });
        });
    }

    group.finish();
}

fn bench_envelope(c: &mut Criterion) {
    c.bench_function("Envelope/kick_full_note", |b| {
        let adsr = InstrumentKind::Kick.default_settings().adsr;
        let env = EnvelopeGenerator::new(&adsr, SAMPLE_RATE);
        b.iter(|| {
            let mut state = EnvelopePhase::new();
            let mut acc = 0.0f32;
            for _ in 0..env.total_samples() {
                acc += env.next(&mut state);
            }
            black_box(acc)
        });
    });
}

criterion_group!(
    benches,
    bench_procedural,
    bench_retrigger,
    bench_wavetable,
    bench_envelope
);
criterion_main!(benches);
