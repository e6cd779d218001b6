//! Drawbar organ: nine sine partials at the classic footage ratios.
//!
//! | drawbar | 16' | 5⅓' | 8' | 4' | 2⅔' | 2' | 1⅗' | 1⅓' | 1' |
//! |---------|-----|------|----|----|------|----|------|------|----|
//! | ratio   | 0.5 | 1.5  | 1  | 2  | 3    | 4  | 5    | 6    | 8  |
//!
//! Each partial is weighted by its drawbar level (0..=8). Odd-numbered
//! partials are detuned up and even-numbered ones down by `detune / 2` cents
//! for a slight chorus. Partials at or above 0.45x the sample rate are
//! skipped. The mix is normalised by the total drawbar weight so registration
//! changes do not change loudness much.

use super::{SineOsc, cents_to_ratio};
use crate::settings::{DRAWBAR_COUNT, DRAWBAR_MAX};
use crate::voice::{NoteFrame, Recipe};
use tambor_core::midi_to_freq;

/// Frequency ratio of each drawbar to the played note.
pub const DRAWBAR_RATIOS: [f32; DRAWBAR_COUNT] = [0.5, 1.5, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 8.0];

const GAIN: f32 = 0.5;

/// Organ recipe.
#[derive(Debug, Clone, Default)]
pub struct Organ {
    partials: [SineOsc; DRAWBAR_COUNT],
}

impl Organ {
    /// Fresh organ.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Recipe for Organ {
    fn trigger(&mut self, _frame: &NoteFrame<'_>) {
        for osc in &mut self.partials {
            osc.reset();
        }
    }

    fn render(&mut self, frame: &NoteFrame<'_>) -> f32 {
        let settings = frame.settings;
        let sr = frame.sample_rate;
        let fundamental = midi_to_freq(settings.base_pitch) * frame.pitch_multiplier;
        let spread = cents_to_ratio(settings.detune * 0.5);
        let nyquist_guard = sr * 0.45;

        let mut sum = 0.0;
        let mut weight = 0.0;
        for (k, osc) in self.partials.iter_mut().enumerate() {
            let level = settings.drawbars[k] / DRAWBAR_MAX;
            let detune = if k % 2 == 0 { spread } else { 1.0 / spread };
            let freq = fundamental * DRAWBAR_RATIOS[k] * detune;
            if level <= 0.0 || freq >= nyquist_guard {
                continue;
            }
            sum += osc.advance(freq, sr) * level;
            weight += level;
        }

        if weight <= 0.0 {
            return 0.0;
        }
        sum / weight.max(1.0) * frame.envelope * GAIN
    }
}
