//! Shaker: band-limited noise with a boosted onset.
//!
//! Noise runs through a highpass at `filter_cutoff * pm` and a lowpass 2.5x
//! above it. A transient gain `1 + 1.5 * exp(-t / 6 ms)` emphasises the
//! first grains of the shake.

use crate::voice::{NoteFrame, Recipe};
use libm::expf;
use tambor_core::OnePole;

const BAND_WIDTH: f32 = 2.5;
const TRANSIENT_BOOST: f32 = 1.5;
const TRANSIENT_TAU: f32 = 0.006;
const GAIN: f32 = 0.5;

/// Shaker recipe.
#[derive(Debug, Clone)]
pub struct Shaker {
    hp: OnePole,
    lp: OnePole,
}

impl Shaker {
    /// Fresh shaker.
    pub fn new() -> Self {
        Self {
            hp: OnePole::highpass(),
            lp: OnePole::lowpass(),
        }
    }

    /// Onset emphasis at `time` seconds.
    pub fn transient(time: f32) -> f32 {
        1.0 + TRANSIENT_BOOST * expf(-time / TRANSIENT_TAU)
    }
}

impl Default for Shaker {
    fn default() -> Self {
        Self::new()
    }
}

impl Recipe for Shaker {
    fn trigger(&mut self, _frame: &NoteFrame<'_>) {
        self.hp.reset();
        self.lp.reset();
    }

    fn render(&mut self, frame: &NoteFrame<'_>) -> f32 {
        let sr = frame.sample_rate;
        let cutoff = frame.settings.filter_cutoff * frame.pitch_multiplier;
        let x = self.hp.process(frame.noise_stream(0), cutoff, sr);
        let x = self.lp.process(x, cutoff * BAND_WIDTH, sr);
        x * frame.envelope * Self::transient(frame.time) * frame.settings.noise_level * GAIN
    }
}
