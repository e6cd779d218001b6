//! Kick drum: swept detuned sines, an impact click, DC blocking and soft clip.
//!
//! Frequency envelope, before the pitch multiplier:
//!
//! ```text
//! t <  10 ms : 90 + 130 * (1 - t / 0.01)^2             (220 Hz -> 90 Hz)
//! t >= 10 ms : 48 + 42 * exp(-(t - 0.01) / 0.08)       (90 Hz -> 48 Hz floor)
//! ```
//!
//! Two sines run at that frequency detuned by ±`detune / 2` cents. A 1.8 kHz
//! impact tone with a 4 ms decay marks the beater hit.

use super::{SineOsc, cents_to_ratio};
use crate::voice::{NoteFrame, Recipe};
use libm::expf;
use tambor_core::{DcBlocker, soft_saturate};

const SWEEP_START_HZ: f32 = 220.0;
const SWEEP_KNEE_HZ: f32 = 90.0;
const FLOOR_HZ: f32 = 48.0;
const KNEE_SECONDS: f32 = 0.01;
const BODY_TAU: f32 = 0.08;
const IMPACT_HZ: f32 = 1800.0;
const IMPACT_TAU: f32 = 0.004;
const IMPACT_LEVEL: f32 = 0.25;
const SATURATION_THRESHOLD: f32 = 0.8;
const GAIN: f32 = 0.9;

/// Kick drum recipe.
#[derive(Debug, Clone)]
pub struct Kick {
    upper: SineOsc,
    lower: SineOsc,
    impact: SineOsc,
    dc: DcBlocker,
}

impl Kick {
    /// Kick for `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            upper: SineOsc::new(),
            lower: SineOsc::new(),
            impact: SineOsc::new(),
            dc: DcBlocker::new(sample_rate),
        }
    }

    /// Body frequency at `time` seconds, before the pitch multiplier.
    pub fn sweep_frequency(time: f32) -> f32 {
        if time < KNEE_SECONDS {
            let x = 1.0 - time / KNEE_SECONDS;
            SWEEP_KNEE_HZ + (SWEEP_START_HZ - SWEEP_KNEE_HZ) * x * x
        } else {
            FLOOR_HZ + (SWEEP_KNEE_HZ - FLOOR_HZ) * expf(-(time - KNEE_SECONDS) / BODY_TAU)
        }
    }
}

impl Recipe for Kick {
    fn trigger(&mut self, _frame: &NoteFrame<'_>) {
        self.upper.reset();
        self.lower.reset();
        self.impact.reset();
        self.dc.reset();
    }

    fn render(&mut self, frame: &NoteFrame<'_>) -> f32 {
        let sr = frame.sample_rate;
        let pm = frame.pitch_multiplier;
        let freq = Self::sweep_frequency(frame.time) * pm;
        let spread = cents_to_ratio(frame.settings.detune * 0.5);

        let upper = self.upper.advance(freq * spread, sr);
        let lower = self.lower.advance(freq / spread, sr);
        let body = 0.5 * (upper + lower);
        let impact = self.impact.advance(IMPACT_HZ * pm, sr)
            * expf(-frame.time / IMPACT_TAU)
            * IMPACT_LEVEL
            * frame.onset();

        let dry = (body * frame.envelope + impact) * GAIN;
        soft_saturate(self.dc.process(dry), SATURATION_THRESHOLD)
    }
}
