//! Snare and rimshot: ping, short body, wire rattle and bright noise.
//!
//! Four layers:
//!
//! - **ping**: high sine with its own millisecond-scale decay
//! - **body**: lower sine that follows the main envelope through the attack
//!   and is cut off within the first 10% of the decay with
//!   `(1 - p / 0.1)^2`, so it never rings as a pitched tail
//! - **rattle**: highpassed noise amplitude-modulated by a sine, depth set by
//!   `resonance`, level by `noise_level`
//! - **bright**: noise highpassed at `filter_cutoff`
//!
//! A rimshot is the same recipe with a higher, shorter [`SnareTuning`].

use super::SineOsc;
use crate::envelope::EnvelopeState;
use crate::voice::{NoteFrame, Recipe};
use libm::expf;
use tambor_core::OnePole;

/// Body truncation point as a fraction of the decay.
const BODY_CUTOFF: f32 = 0.1;

/// Tuning constants that tell a snare from a rimshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnareTuning {
    /// Ping frequency (Hz).
    pub ping_hz: f32,
    /// Ping decay time constant (s).
    pub ping_tau: f32,
    /// Ping level.
    pub ping_level: f32,
    /// Body frequency (Hz).
    pub body_hz: f32,
    /// Body level.
    pub body_level: f32,
    /// Rattle highpass cutoff (Hz).
    pub rattle_hz: f32,
    /// Rattle modulation rate (Hz).
    pub rattle_mod_hz: f32,
    /// Rattle level relative to `noise_level`.
    pub rattle_level: f32,
    /// Bright noise level.
    pub bright_level: f32,
    /// Output gain.
    pub gain: f32,
}

impl SnareTuning {
    /// Snare drum.
    pub const SNARE: Self = Self {
        ping_hz: 420.0,
        ping_tau: 0.012,
        ping_level: 0.3,
        body_hz: 185.0,
        body_level: 0.5,
        rattle_hz: 1200.0,
        rattle_mod_hz: 180.0,
        rattle_level: 0.6,
        bright_level: 0.35,
        gain: 0.7,
    };

    /// Rimshot: harder, higher crack with little body.
    pub const RIMSHOT: Self = Self {
        ping_hz: 1700.0,
        ping_tau: 0.006,
        ping_level: 0.6,
        body_hz: 330.0,
        body_level: 0.35,
        rattle_hz: 2500.0,
        rattle_mod_hz: 240.0,
        rattle_level: 0.3,
        bright_level: 0.2,
        gain: 0.8,
    };
}

/// Snare / rimshot recipe.
#[derive(Debug, Clone)]
pub struct Snare {
    tuning: SnareTuning,
    ping: SineOsc,
    body: SineOsc,
    rattle_mod: SineOsc,
    rattle_hp: OnePole,
    bright_hp: OnePole,
}

impl Snare {
    /// Recipe with explicit tuning.
    pub fn with_tuning(tuning: SnareTuning) -> Self {
        Self {
            tuning,
            ping: SineOsc::new(),
            body: SineOsc::new(),
            rattle_mod: SineOsc::new(),
            rattle_hp: OnePole::highpass(),
            bright_hp: OnePole::highpass(),
        }
    }

    /// Snare drum.
    pub fn snare() -> Self {
        Self::with_tuning(SnareTuning::SNARE)
    }

    /// Rimshot.
    pub fn rimshot() -> Self {
        Self::with_tuning(SnareTuning::RIMSHOT)
    }

    /// Tuning in use.
    pub fn tuning(&self) -> &SnareTuning {
        &self.tuning
    }

    /// Gain of the body layer for a given envelope stage.
    pub fn body_envelope(stage: EnvelopeState, envelope: f32, decay_progress: f32) -> f32 {
        match stage {
            EnvelopeState::Attack => envelope,
            EnvelopeState::Decay if decay_progress < BODY_CUTOFF => {
                let x = 1.0 - decay_progress / BODY_CUTOFF;
                envelope * x * x
            }
            _ => 0.0,
        }
    }
}

impl Recipe for Snare {
    fn trigger(&mut self, _frame: &NoteFrame<'_>) {
        self.ping.reset();
        self.body.reset();
        self.rattle_mod.reset();
        self.rattle_hp.reset();
        self.bright_hp.reset();
    }

    fn render(&mut self, frame: &NoteFrame<'_>) -> f32 {
        let t = &self.tuning;
        let sr = frame.sample_rate;
        let pm = frame.pitch_multiplier;
        let settings = frame.settings;

        let ping = self.ping.advance(t.ping_hz * pm, sr)
            * expf(-frame.time / t.ping_tau)
            * t.ping_level
            * frame.onset();

        let body_env = Self::body_envelope(frame.stage, frame.envelope, frame.decay_progress);
        let body = self.body.advance(t.body_hz * pm, sr) * body_env * t.body_level;

        let depth = settings.resonance;
        let modulation = 1.0 - depth + depth * self.rattle_mod.advance(t.rattle_mod_hz * pm, sr);
        let rattle = self.rattle_hp.process(frame.noise_stream(0), t.rattle_hz * pm, sr)
            * modulation
            * settings.noise_level
            * t.rattle_level;

        let bright = self
            .bright_hp
            .process(frame.noise_stream(1), settings.filter_cutoff * pm, sr)
            * t.bright_level;

        (ping + body + (rattle + bright) * frame.envelope) * t.gain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_envelope_truncates_early_in_decay() {
        assert_eq!(Snare::body_envelope(EnvelopeState::Attack, 0.4, 0.0), 0.4);
        assert_eq!(Snare::body_envelope(EnvelopeState::Decay, 1.0, 0.0), 1.0);
        let mid = Snare::body_envelope(EnvelopeState::Decay, 0.9, 0.05);
        assert!((mid - 0.9 * 0.25).abs() < 1e-6);
        assert_eq!(Snare::body_envelope(EnvelopeState::Decay, 0.8, 0.1), 0.0);
        assert_eq!(Snare::body_envelope(EnvelopeState::Release, 0.5, 1.0), 0.0);
    }

    #[test]
    fn body_envelope_is_continuous_at_cutoff() {
        let just_before = Snare::body_envelope(EnvelopeState::Decay, 0.7, BODY_CUTOFF - 1e-4);
        assert!(just_before < 1e-5);
    }

    #[test]
    fn rimshot_is_higher_than_snare() {
        assert!(SnareTuning::RIMSHOT.ping_hz > SnareTuning::SNARE.ping_hz);
        assert!(SnareTuning::RIMSHOT.ping_tau < SnareTuning::SNARE.ping_tau);
    }
}
