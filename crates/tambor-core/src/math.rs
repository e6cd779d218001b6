//! Mathematical utility functions for voice rendering.
//!
//! Everything here is `#[inline]`, allocation-free and `no_std` via `libm`.
//!
//! # Pitch
//!
//! - [`semitones_to_ratio`] / [`pitch_ratio`] - `2^(semitones / 12)`
//! - [`midi_to_freq`] - Equal-tempered frequency, A4 = 440 Hz
//!
//! # Shaping
//!
//! - [`soft_saturate`] - Transparent below a threshold, `tanh` knee above
//! - [`flush_denormal`] - Zero out values in the subnormal danger zone
//!
//! # Time
//!
//! - [`time_to_samples`] - Seconds to a whole number of samples (rounded up)

use libm::{ceilf, exp2f, tanhf};

/// Convert a semitone offset into a frequency / playback-rate multiplier.
///
/// ```rust
/// use tambor_core::semitones_to_ratio;
///
/// assert!((semitones_to_ratio(12.0) - 2.0).abs() < 1e-6);
/// assert!((semitones_to_ratio(-12.0) - 0.5).abs() < 1e-6);
/// ```
#[inline]
pub fn semitones_to_ratio(semitones: f32) -> f32 {
    exp2f(semitones / 12.0)
}

/// Ratio between a played pitch and the pitch a sound is tuned at.
///
/// `pitch_ratio(base, base) == 1.0` exactly, which table playback relies on
/// to reproduce source samples bit for bit.
#[inline]
pub fn pitch_ratio(pitch: f32, base_pitch: f32) -> f32 {
    if pitch == base_pitch {
        1.0
    } else {
        semitones_to_ratio(pitch - base_pitch)
    }
}

/// MIDI note number to frequency in Hz (A4 = note 69 = 440 Hz).
#[inline]
pub fn midi_to_freq(note: f32) -> f32 {
    440.0 * semitones_to_ratio(note - 69.0)
}

/// Saturate only the part of the signal that exceeds `threshold`.
///
/// Below the threshold the signal passes unchanged. Above it the excess is
/// squashed with `tanh` so the output approaches ±1 asymptotically:
///
/// ```text
/// |x| <= t : y = x
/// |x| >  t : y = sign(x) * (t + (1 - t) * tanh((|x| - t) / (1 - t)))
/// ```
///
/// The curve is C¹ at the knee (slope 1 on both sides).
#[inline]
pub fn soft_saturate(x: f32, threshold: f32) -> f32 {
    let t = threshold.clamp(0.0, 0.999);
    let mag = x.abs();
    if mag <= t {
        x
    } else {
        let headroom = 1.0 - t;
        let shaped = t + headroom * tanhf((mag - t) / headroom);
        shaped.copysign(x)
    }
}

/// Linear interpolation between `a` (t = 0) and `b` (t = 1).
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Convert a duration in seconds to samples, rounding up.
///
/// Negative and non-finite durations map to zero samples. Products within
/// 1e-3 of an integer are treated as that integer so f32 rounding in
/// `0.01 * 44100.0` does not add a sample.
#[inline]
pub fn time_to_samples(seconds: f32, sample_rate: f32) -> u32 {
    let samples = seconds * sample_rate;
    if samples.is_finite() && samples > 0.0 {
        ceilf(samples - 1e-3) as u32
    } else {
        0
    }
}

/// Flush values below 1e-20 to zero.
///
/// One-pole and DC-blocker feedback paths decay toward zero forever on a
/// silent tail; subnormal floats there cost up to 100x per operation.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_ratio_identity_is_exact() {
        for base in [0.0, 36.0, 42.0, 60.0, 127.0] {
            assert_eq!(pitch_ratio(base, base), 1.0);
        }
    }

    #[test]
    fn pitch_ratio_octaves() {
        assert!((pitch_ratio(72.0, 60.0) - 2.0).abs() < 1e-5);
        assert!((pitch_ratio(48.0, 60.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn midi_to_freq_reference_pitches() {
        assert!((midi_to_freq(69.0) - 440.0).abs() < 1e-3);
        assert!((midi_to_freq(60.0) - 261.6256).abs() < 1e-2);
    }

    #[test]
    fn soft_saturate_is_transparent_below_threshold() {
        assert_eq!(soft_saturate(0.5, 0.8), 0.5);
        assert_eq!(soft_saturate(-0.79, 0.8), -0.79);
    }

    #[test]
    fn soft_saturate_bounds_large_input() {
        let y = soft_saturate(10.0, 0.8);
        assert!(y < 1.0 && y > 0.99, "got {y}");
        let y = soft_saturate(-10.0, 0.8);
        assert!(y > -1.0 && y < -0.99, "got {y}");
    }

    #[test]
    fn soft_saturate_continuous_at_knee() {
        let below = soft_saturate(0.8 - 1e-4, 0.8);
        let above = soft_saturate(0.8 + 1e-4, 0.8);
        assert!((above - below).abs() < 3e-4);
    }

    #[test]
    fn time_to_samples_rounds_up() {
        assert_eq!(time_to_samples(0.005, 44100.0), 221);
        assert_eq!(time_to_samples(0.01, 44100.0), 441);
        assert_eq!(time_to_samples(0.0, 44100.0), 0);
        assert_eq!(time_to_samples(-1.0, 44100.0), 0);
        assert_eq!(time_to_samples(f32::NAN, 44100.0), 0);
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 4.0, 1.0), 4.0);
        assert_eq!(lerp(2.0, 4.0, 0.25), 2.5);
    }

    #[test]
    fn flush_denormal_zeroes_tiny_values() {
        assert_eq!(flush_denormal(1e-25), 0.0);
        assert_eq!(flush_denormal(-1e-30), 0.0);
        assert_eq!(flush_denormal(1e-6), 1e-6);
    }
}
