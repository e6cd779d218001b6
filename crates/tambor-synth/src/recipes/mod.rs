//! Per-instrument synthesis recipes for [`ProceduralVoice`](crate::ProceduralVoice).
//!
//! Each recipe combines noise, one-pole filters and sine oscillators. Every
//! frequency and cutoff is multiplied by the note's pitch multiplier, so one
//! recipe covers the whole pitch range. Each ends with a fixed output gain
//! tuned by ear; these literals are part of the instrument's sound.

mod clap;
mod kick;
mod metal;
mod organ;
mod shaker;
mod snare;
mod tom;

pub use clap::{CLAP_BURSTS, Clap};
pub use kick::Kick;
pub use metal::{Cymbal, HiHat};
pub use organ::{DRAWBAR_RATIOS, Organ};
pub use shaker::Shaker;
pub use snare::{Snare, SnareTuning};
pub use tom::Tom;

use core::f32::consts::TAU;
use libm::{floorf, sinf};

/// Sine oscillator with continuous phase accumulation.
///
/// The frequency may change every sample without a phase jump.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SineOsc {
    /// Phase in [0, 1).
    phase: f32,
}

impl SineOsc {
    pub(crate) const fn new() -> Self {
        Self { phase: 0.0 }
    }

    /// Emit the sample at the current phase, then advance by `freq / sample_rate`.
    #[inline]
    pub(crate) fn advance(&mut self, freq: f32, sample_rate: f32) -> f32 {
        let out = sinf(TAU * self.phase);
        self.phase += freq / sample_rate;
        if self.phase >= 1.0 {
            self.phase -= floorf(self.phase);
        }
        out
    }

    pub(crate) fn reset(&mut self) {
        self.phase = 0.0;
    }
}

/// Frequency multiplier for a detune in cents.
#[inline]
pub(crate) fn cents_to_ratio(cents: f32) -> f32 {
    libm::exp2f(cents / 1200.0)
}
