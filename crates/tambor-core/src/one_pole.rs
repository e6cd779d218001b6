//! One-pole lowpass / highpass stages with a per-call cutoff.
//!
//! Percussion recipes scale every cutoff by the note's pitch multiplier, and
//! the clap recipe runs several independent filter instances per voice. Rather
//! than caching a coefficient that must be invalidated whenever the pitch
//! changes, the coefficient is recomputed on every call from the cutoff passed
//! in. The state is just the previous input and output (`x1`, `y1`), small
//! enough to keep in fixed-size arrays allocated with the voice.
//!
//! Lowpass (exponential smoothing):
//!
//! ```text
//! a    = 1 - exp(-2π fc / fs)
//! y[n] = y[n-1] + a * (x[n] - y[n-1])
//! ```
//!
//! Highpass (RC differentiator):
//!
//! ```text
//! a    = 1 / (1 + 2π fc / fs)
//! y[n] = a * (y[n-1] + x[n] - x[n-1])
//! ```
//!
//! Both are 6 dB/octave with zero latency.
//!
//! Reference: Julius O. Smith III, "Introduction to Digital Filters with Audio
//! Applications", One-Pole section.

use crate::flush_denormal;
use core::f32::consts::TAU;
use libm::expf;

/// Response of a [`OnePole`] stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnePoleMode {
    /// Passes content below the cutoff.
    Lowpass,
    /// Passes content above the cutoff.
    Highpass,
}

/// First-order filter stage owning only its `{x1, y1}` state.
///
/// ```rust
/// use tambor_core::OnePole;
///
/// let mut lp = OnePole::lowpass();
/// let y = lp.process(1.0, 1000.0, 48000.0);
/// assert!(y > 0.0 && y < 1.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct OnePole {
    mode: OnePoleMode,
    x1: f32,
    y1: f32,
}

impl OnePole {
    /// Create a stage with zeroed state.
    pub const fn new(mode: OnePoleMode) -> Self {
        Self {
            mode,
            x1: 0.0,
            y1: 0.0,
        }
    }

    /// Lowpass stage.
    pub const fn lowpass() -> Self {
        Self::new(OnePoleMode::Lowpass)
    }

    /// Highpass stage.
    pub const fn highpass() -> Self {
        Self::new(OnePoleMode::Highpass)
    }

    /// Filter one sample at the given cutoff.
    ///
    /// The cutoff is clamped to `[1 Hz, 0.49 * sample_rate]`.
    #[inline]
    pub fn process(&mut self, input: f32, cutoff_hz: f32, sample_rate: f32) -> f32 {
        let w = TAU * cutoff_hz.clamp(1.0, sample_rate * 0.49) / sample_rate;
        let output = match self.mode {
            OnePoleMode::Lowpass => {
                let a = 1.0 - expf(-w);
                self.y1 + a * (input - self.y1)
            }
            OnePoleMode::Highpass => {
                let a = 1.0 / (1.0 + w);
                a * (self.y1 + input - self.x1)
            }
        };
        self.x1 = input;
        self.y1 = flush_denormal(output);
        self.y1
    }

    /// Zero the filter history.
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.y1 = 0.0;
    }

    /// Filter response.
    pub fn mode(&self) -> OnePoleMode {
        self.mode
    }

    /// Last output sample.
    pub fn last_output(&self) -> f32 {
        self.y1
    }
}
