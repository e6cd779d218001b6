//! Tom: one sine with an exponentially falling pitch.
//!
//! ```text
//! f(t) = (110 + 70 * exp(-t / 0.06)) * pitch_multiplier
//! ```

use super::SineOsc;
use crate::voice::{NoteFrame, Recipe};
use libm::expf;

const REST_HZ: f32 = 110.0;
const SWEEP_HZ: f32 = 70.0;
const SWEEP_TAU: f32 = 0.06;
const GAIN: f32 = 0.8;

/// Tom recipe.
#[derive(Debug, Clone, Default)]
pub struct Tom {
    osc: SineOsc,
}

impl Tom {
    /// Fresh tom.
    pub fn new() -> Self {
        Self::default()
    }

    /// Frequency at `time` seconds, before the pitch multiplier.
    pub fn frequency(time: f32) -> f32 {
        REST_HZ + SWEEP_HZ * expf(-time / SWEEP_TAU)
    }
}

impl Recipe for Tom {
    fn trigger(&mut self, _frame: &NoteFrame<'_>) {
        self.osc.reset();
    }

    fn render(&mut self, frame: &NoteFrame<'_>) -> f32 {
        let freq = Self::frequency(frame.time) * frame.pitch_multiplier;
        self.osc.advance(freq, frame.sample_rate) * frame.envelope * GAIN
    }
}
