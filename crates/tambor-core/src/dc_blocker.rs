//! DC blocking filter.
//!
//! The kick recipe sums detuned sines under an asymmetric pitch sweep, and
//! recorded samples often carry a constant offset. Both leave energy at 0 Hz
//! that turns into a thump when the voice stops, so their output runs through
//! this first-order highpass:
//!
//! ```text
//! H(z) = (1 - z^-1) / (1 - R z^-1)
//! y[n] = x[n] - x[n-1] + R * y[n-1]
//! R    = 1 - 2π fc / fs            (fc ≈ 7 Hz)
//! ```
//!
//! Reference: Julius O. Smith, "Introduction to Digital Filters", DC Blocker.

use crate::flush_denormal;
use core::f32::consts::TAU;

/// First-order DC removal with a ~7 Hz corner.
///
/// ```rust
/// use tambor_core::DcBlocker;
///
/// let mut dc = DcBlocker::new(44100.0);
/// let mut y = 1.0;
/// for _ in 0..44100 {
///     y = dc.process(0.25);
/// }
/// assert!(y.abs() < 0.01);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DcBlocker {
    /// Pole radius R.
    coeff: f32,
    x1: f32,
    y1: f32,
}

impl DcBlocker {
    /// Corner frequency in Hz.
    pub const CUTOFF_HZ: f32 = 7.0;

    /// Create a blocker tuned for `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            coeff: Self::pole_for(sample_rate),
            x1: 0.0,
            y1: 0.0,
        }
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = flush_denormal(input - self.x1 + self.coeff * self.y1);
        self.x1 = input;
        self.y1 = output;
        output
    }

    /// Zero the filter history.
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.y1 = 0.0;
    }

    /// Pole radius R currently in use.
    pub fn coeff(&self) -> f32 {
        self.coeff
    }

    fn pole_for(sample_rate: f32) -> f32 {
        (1.0 - TAU * Self::CUTOFF_HZ / sample_rate.max(1.0)).clamp(0.9, 0.9999)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libm::sinf;

    #[test]
    fn removes_constant_offset() {
        let mut dc = DcBlocker::new(48000.0);
        let mut y = 0.0;
        for _ in 0..48000 {
            y = dc.process(0.5);
        }
        assert!(y.abs() < 0.005, "offset left: {y}");
    }

    #[test]
    fn passes_audio_band() {
        let sr = 48000.0;
        let mut dc = DcBlocker::new(sr);
        let mut peak = 0.0f32;
        for n in 0..9600 {
            let y = dc.process(sinf(TAU * 200.0 * n as f32 / sr));
            if n > 4800 {
                peak = peak.max(y.abs());
            }
        }
        assert!(peak > 0.95, "200 Hz should pass, peak {peak}");
    }

    #[test]
    fn pole_tracks_sample_rate() {
        let slow = DcBlocker::new(22050.0).coeff();
        let fast = DcBlocker::new(96000.0).coeff();
        assert!(fast > slow);
        assert!(fast <= 0.9999);
    }

    #[test]
    fn reset_clears_history() {
        let mut dc = DcBlocker::new(44100.0);
        dc.process(1.0);
        dc.reset();
        assert_eq!(dc.process(0.0), 0.0);
    }
}
