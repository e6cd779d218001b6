//! Second-order IIR filter with RBJ cookbook lowpass / highpass / bandpass forms.
//!
//! Unlike [`OnePole`](crate::OnePole), the biquad caches its coefficients:
//! recipes set them once per trigger (after the pitch multiplier is known) and
//! then run the Direct Form I difference equation per sample:
//!
//! ```text
//! y[n] = b0 x[n] + b1 x[n-1] + b2 x[n-2] - a1 y[n-1] - a2 y[n-2]
//! ```
//!
//! Reference: Robert Bristow-Johnson, "Cookbook formulae for audio EQ biquad
//! filter coefficients".

use crate::flush_denormal;
use core::f32::consts::TAU;
use libm::{cosf, sinf};

/// Which cookbook response to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiquadKind {
    /// 12 dB/oct lowpass.
    Lowpass,
    /// 12 dB/oct highpass.
    Highpass,
    /// Constant 0 dB peak bandpass.
    Bandpass,
}

/// Normalized coefficients (a0 already divided out).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    /// Feedforward x[n].
    pub b0: f32,
    /// Feedforward x[n-1].
    pub b1: f32,
    /// Feedforward x[n-2].
    pub b2: f32,
    /// Feedback y[n-1].
    pub a1: f32,
    /// Feedback y[n-2].
    pub a2: f32,
}

impl BiquadCoefficients {
    /// Passthrough: `y[n] = x[n]`.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Compute cookbook coefficients.
    ///
    /// `frequency` is clamped to `[10 Hz, 0.49 * sample_rate]` and `q` to at
    /// least 0.05 so every result is a stable filter.
    pub fn design(kind: BiquadKind, frequency: f32, q: f32, sample_rate: f32) -> Self {
        let frequency = frequency.clamp(10.0, sample_rate * 0.49);
        let omega = TAU * frequency / sample_rate;
        let cos_w = cosf(omega);
        let alpha = sinf(omega) / (2.0 * q.max(0.05));

        let (b0, b1, b2) = match kind {
            BiquadKind::Lowpass => ((1.0 - cos_w) / 2.0, 1.0 - cos_w, (1.0 - cos_w) / 2.0),
            BiquadKind::Highpass => ((1.0 + cos_w) / 2.0, -(1.0 + cos_w), (1.0 + cos_w) / 2.0),
            BiquadKind::Bandpass => (alpha, 0.0, -alpha),
        };
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_w;
        let a2 = 1.0 - alpha;

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }
}

/// Direct Form I biquad with `{x1, x2, y1, y2}` state.
#[derive(Debug, Clone, Copy)]
pub struct Biquad {
    coeffs: BiquadCoefficients,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Passthrough biquad.
    pub const fn new() -> Self {
        Self {
            coeffs: BiquadCoefficients::IDENTITY,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Replace the coefficients with a cookbook design. State is kept.
    pub fn configure(&mut self, kind: BiquadKind, frequency: f32, q: f32, sample_rate: f32) {
        self.coeffs = BiquadCoefficients::design(kind, frequency, q, sample_rate);
    }

    /// Current coefficients.
    pub fn coefficients(&self) -> BiquadCoefficients {
        self.coeffs
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let c = &self.coeffs;
        let output = c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2
            - c.a1 * self.y1
            - c.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = flush_denormal(output);
        self.y1
    }

    /// Zero the delay lines, keeping coefficients.
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 44100.0;

    fn steady_peak(bq: &mut Biquad, freq: f32) -> f32 {
        let mut peak = 0.0f32;
        for n in 0..8820 {
            let y = bq.process(sinf(TAU * freq * n as f32 / SR));
            if n > 4410 {
                peak = peak.max(y.abs());
            }
        }
        peak
    }

    #[test]
    fn identity_passes_through() {
        let mut bq = Biquad::new();
        for i in 0..8 {
            let x = i as f32 * 0.125;
            assert_eq!(bq.process(x), x);
        }
    }

    #[test]
    fn lowpass_passes_dc() {
        let mut bq = Biquad::new();
        bq.configure(BiquadKind::Lowpass, 1000.0, 0.707, SR);
        let mut y = 0.0;
        for _ in 0..2000 {
            y = bq.process(1.0);
        }
        assert!((y - 1.0).abs() < 0.01);
    }

    #[test]
    fn highpass_rejects_low_tone() {
        let mut bq = Biquad::new();
        bq.configure(BiquadKind::Highpass, 4000.0, 0.707, SR);
        assert!(steady_peak(&mut bq, 100.0) < 0.01);
    }

    #[test]
    fn bandpass_peaks_at_center() {
        let mut center = Biquad::new();
        center.configure(BiquadKind::Bandpass, 2000.0, 2.0, SR);
        let mut off = center;
        off.reset();

        let at_center = steady_peak(&mut center, 2000.0);
        let below = steady_peak(&mut off, 200.0);
        assert!(at_center > 0.9, "center gain {at_center}");
        assert!(below < at_center * 0.2, "off-band {below}");
    }

    #[test]
    fn design_clamps_degenerate_inputs() {
        for kind in [BiquadKind::Lowpass, BiquadKind::Highpass, BiquadKind::Bandpass] {
            let c = BiquadCoefficients::design(kind, 1e9, 0.0, SR);
            assert!(c.b0.is_finite() && c.a1.is_finite() && c.a2.is_finite());
        }
    }

    #[test]
    fn reset_keeps_coefficients() {
        let mut bq = Biquad::new();
        bq.configure(BiquadKind::Lowpass, 500.0, 0.707, SR);
        let before = bq.coefficients();
        bq.process(1.0);
        bq.reset();
        assert_eq!(bq.coefficients(), before);
        assert_eq!(bq.process(0.0), 0.0);
    }
}
