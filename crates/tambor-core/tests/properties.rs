//! Property-based tests for tambor-core DSP primitives.
//!
//! Tests filter stability across the pitch-scaled cutoff range, noise buffer
//! bounds, and the saturation / pitch helpers using proptest.

use proptest::prelude::*;
use tambor_core::{
    Biquad, BiquadKind, DcBlocker, NoiseBuffer, OnePole, pitch_ratio, soft_saturate,
    time_to_samples,
};

fn biquad_kind(variant: usize) -> BiquadKind {
    match variant % 3 {
        0 => BiquadKind::Lowpass,
        1 => BiquadKind::Highpass,
        _ => BiquadKind::Bandpass,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Cutoffs far outside the audio band (a hi-hat at pitch 127 asks for
    /// several hundred kHz) still give finite, bounded one-pole output.
    #[test]
    fn one_pole_stability(
        cutoff in 0.0f32..2_000_000.0f32,
        highpass in any::<bool>(),
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut filter = if highpass { OnePole::highpass() } else { OnePole::lowpass() };
        for &x in &input {
            let y = filter.process(x, cutoff, 44100.0);
            prop_assert!(y.is_finite());
            prop_assert!(y.abs() <= 2.0, "one-pole output {} for cutoff {}", y, cutoff);
        }
    }

    /// Every cookbook response stays finite for any cutoff and Q.
    #[test]
    fn biquad_stability(
        freq in 1.0f32..100_000.0f32,
        q in 0.0f32..20.0f32,
        variant in 0usize..3,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut bq = Biquad::new();
        bq.configure(biquad_kind(variant), freq, q, 48000.0);
        for &x in &input {
            let y = bq.process(x);
            prop_assert!(
                y.is_finite(),
                "{:?} at {} Hz q={} gave {}",
                biquad_kind(variant),
                freq,
                q,
                y
            );
        }
    }

    /// The DC blocker never amplifies a bounded input beyond 2x.
    #[test]
    fn dc_blocker_bounded(
        sample_rate in 8000.0f32..192_000.0f32,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut dc = DcBlocker::new(sample_rate);
        for &x in &input {
            prop_assert!(dc.process(x).abs() <= 2.0);
        }
    }

    /// Noise reads wrap for any index.
    #[test]
    fn noise_wraps(seed in any::<u32>(), index in any::<usize>()) {
        let noise = NoiseBuffer::new(256, seed);
        let s = noise.sample(index);
        prop_assert!((-1.0..=1.0).contains(&s));
        prop_assert_eq!(s, noise.sample(index % 256));
    }

    /// Saturation keeps the sign and never exceeds unity.
    #[test]
    fn soft_saturate_bounded(x in -100.0f32..100.0f32, threshold in 0.0f32..1.0f32) {
        let y = soft_saturate(x, threshold);
        prop_assert!(y.abs() <= 1.0 || y == x);
        prop_assert!(y == 0.0 || y.signum() == x.signum());
    }

    /// Pitch ratio is monotonic and octave-exact within f32 tolerance.
    #[test]
    fn pitch_ratio_octaves(pitch in 0.0f32..115.0f32) {
        let up = pitch_ratio(pitch + 12.0, 60.0);
        let here = pitch_ratio(pitch, 60.0);
        prop_assert!(up > here);
        prop_assert!((up / here - 2.0).abs() < 1e-3);
    }

    /// Converted durations cover the requested time.
    #[test]
    fn time_to_samples_covers_duration(seconds in 0.0f32..10.0f32) {
        let n = time_to_samples(seconds, 44100.0) as f32;
        prop_assert!(n + 1e-3 >= seconds * 44100.0);
        prop_assert!(n <= seconds * 44100.0 + 1.0);
    }
}
