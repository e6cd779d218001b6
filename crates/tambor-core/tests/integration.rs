//! Integration tests combining tambor-core primitives the way drum recipes do.

use core::f32::consts::TAU;
use tambor_core::{
    Biquad, BiquadKind, DcBlocker, NoiseBuffer, OnePole, Xorshift32, pitch_ratio, soft_saturate,
};

const SR: f32 = 44100.0;

fn rms(samples: &[f32]) -> f32 {
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}

#[test]
fn highpassed_noise_loses_energy_as_cutoff_rises() {
    let noise = NoiseBuffer::new(8192, 11);
    let render = |cutoff: f32| {
        let mut hp = OnePole::highpass();
        let out: Vec<f32> = (0..8192).map(|n| hp.process(noise.sample(n), cutoff, SR)).collect();
        rms(&out)
    };
    let low = render(200.0);
    let high = render(12_000.0);
    assert!(high < low, "rms at 12 kHz {high} should be below rms at 200 Hz {low}");
}

#[test]
fn pitch_scaled_cutoff_tracks_octaves() {
    let base = 5000.0;
    assert!((base * pitch_ratio(72.0, 60.0) - 10_000.0).abs() < 1.0);
    assert!((base * pitch_ratio(48.0, 60.0) - 2500.0).abs() < 1.0);
}

#[test]
fn cascaded_hp_lp_forms_a_band() {
    let tone = |freq: f32| {
        let mut hp = OnePole::highpass();
        let mut lp = OnePole::lowpass();
        let mut peak = 0.0f32;
        for n in 0..8820 {
            let x = (TAU * freq * n as f32 / SR).sin();
            let y = lp.process(hp.process(x, 1000.0, SR), 4000.0, SR);
            if n > 4410 {
                peak = peak.max(y.abs());
            }
        }
        peak
    };
    let mid = tone(2000.0);
    assert!(tone(50.0) < mid * 0.2);
    assert!(tone(18_000.0) < mid * 0.5);
}

#[test]
fn dc_blocker_then_saturation_centres_offset_sine() {
    let mut dc = DcBlocker::new(SR);
    let mut sum = 0.0f32;
    let mut peak = 0.0f32;
    for n in 0..(SR as usize) {
        let x = 0.3 + 1.2 * (TAU * 60.0 * n as f32 / SR).sin();
        let y = soft_saturate(dc.process(x), 0.8);
        if n > SR as usize / 2 {
            sum += y;
            peak = peak.max(y.abs());
        }
    }
    assert!(peak < 1.0);
    assert!((sum / (SR / 2.0)).abs() < 0.05, "mean {}", sum / (SR / 2.0));
}

#[test]
fn bandpass_biquad_on_noise_is_finite_and_nonzero() {
    let noise = NoiseBuffer::default();
    let mut bq = Biquad::new();
    bq.configure(BiquadKind::Bandpass, 1200.0, 3.0, SR);
    let out: Vec<f32> = (0..4096).map(|n| bq.process(noise.sample(n))).collect();
    assert!(out.iter().all(|s| s.is_finite()));
    assert!(rms(&out) > 0.01);
}

#[test]
fn random_offsets_spread_across_buffer() {
    let noise = NoiseBuffer::new(4096, 1);
    let mut rng = Xorshift32::new(99);
    let offsets: Vec<usize> = (0..64).map(|_| rng.next_index(noise.len())).collect();
    let distinct = {
        let mut o = offsets.clone();
        o.sort_unstable();
        o.dedup();
        o.len()
    };
    assert!(distinct > 60);
}
