//! Hi-hat and cymbal: highpassed noise with a tight exponential decay.
//!
//! The hi-hat is a single one-pole highpass at `filter_cutoff * pm`. The
//! cymbal cascades a second highpass at 1.5x that cutoff for a steeper low
//! cut, then rolls off the top with a Butterworth biquad lowpass at 14 kHz
//! (scaled by the pitch multiplier, set once per trigger) so the wash is not
//! brittle. Open and closed hats differ only in their envelope.

use crate::envelope::EnvelopeCurve;
use crate::voice::{NoteFrame, Recipe};
use tambor_core::{Biquad, BiquadCoefficients, BiquadKind, OnePole};

const HIHAT_GAIN: f32 = 0.6;
const CYMBAL_SECOND_STAGE: f32 = 1.5;
const CYMBAL_TOP_HZ: f32 = 14_000.0;
const CYMBAL_TOP_Q: f32 = core::f32::consts::FRAC_1_SQRT_2;
const CYMBAL_GAIN: f32 = 0.55;

/// Hi-hat recipe.
#[derive(Debug, Clone)]
pub struct HiHat {
    hp: OnePole,
}

impl HiHat {
    /// Fresh hi-hat.
    pub fn new() -> Self {
        Self {
            hp: OnePole::highpass(),
        }
    }
}

impl Default for HiHat {
    fn default() -> Self {
        Self::new()
    }
}

impl Recipe for HiHat {
    fn curve(&self) -> EnvelopeCurve {
        EnvelopeCurve::TIGHT
    }

    fn trigger(&mut self, _frame: &NoteFrame<'_>) {
        self.hp.reset();
    }

    fn render(&mut self, frame: &NoteFrame<'_>) -> f32 {
        let cutoff = frame.settings.filter_cutoff * frame.pitch_multiplier;
        self.hp.process(frame.noise_stream(0), cutoff, frame.sample_rate)
            * frame.envelope
            * frame.settings.noise_level
            * HIHAT_GAIN
    }
}

/// Cymbal recipe.
#[derive(Debug, Clone)]
pub struct Cymbal {
    hp1: OnePole,
    hp2: OnePole,
    top: Biquad,
}

impl Cymbal {
    /// Fresh cymbal.
    pub fn new() -> Self {
        Self {
            hp1: OnePole::highpass(),
            hp2: OnePole::highpass(),
            top: Biquad::new(),
        }
    }

    /// Coefficients of the top cut for the current note.
    pub fn top_cut(&self) -> BiquadCoefficients {
        self.top.coefficients()
    }
}

impl Default for Cymbal {
    fn default() -> Self {
        Self::new()
    }
}

impl Recipe for Cymbal {
    fn curve(&self) -> EnvelopeCurve {
        EnvelopeCurve::TIGHT
    }

    fn trigger(&mut self, frame: &NoteFrame<'_>) {
        self.hp1.reset();
        self.hp2.reset();
        self.top.configure(
            BiquadKind::Lowpass,
            CYMBAL_TOP_HZ * frame.pitch_multiplier,
            CYMBAL_TOP_Q,
            frame.sample_rate,
        );
        self.top.reset();
    }

    fn render(&mut self, frame: &NoteFrame<'_>) -> f32 {
        let sr = frame.sample_rate;
        let pm = frame.pitch_multiplier;
        let cutoff = frame.settings.filter_cutoff * pm;

        let x = self.hp1.process(frame.noise_stream(0), cutoff, sr);
        let x = self.hp2.process(x, cutoff * CYMBAL_SECOND_STAGE, sr);
        let x = self.top.process(x);
        x * frame.envelope * frame.settings.noise_level * CYMBAL_GAIN
    }
}
