//! Four-phase percussion envelope: attack, decay, release, fade tail.
//!
//! Percussion voices have no note-off. Once triggered, the envelope runs
//! straight through its segments and then keeps going through an extended
//! fade tail, so a voice never hard-cuts at the nominal ADSR boundary:
//!
//! ```text
//! attack   n in [0, A)      0.5 * (1 - cos(π n / A))
//! decay    n in [0, D)      s + (1 - s) * exp(-kd * n / D)
//! release  n in [0, R)      e_d * exp(-kr * n / R)
//! tail     n in [0, F)      e_r * exp(-kt * n / F)
//! ```
//!
//! `e_d` is the value the decay actually emitted last (recorded in
//! [`EnvelopePhase`]), not the nominal sustain level, so the release picks up
//! exactly where the decay left off. `e_r = e_d * exp(-kr)` is where the
//! release ends. The tail length is `F = max(20 ms, R / 2)`.
//!
//! The generator holds only timing and shape. Per-note state lives in
//! [`EnvelopePhase`], so one generator can drive several bursts of a clap,
//! each with its own phase.

use crate::settings::Adsr;
use core::f32::consts::PI;
use libm::{cosf, expf};
use tambor_core::time_to_samples;

/// Envelope segment a given phase falls in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvelopeState {
    /// Past the fade tail; output is zero.
    #[default]
    Idle,
    /// Raised-cosine rise.
    Attack,
    /// Exponential fall toward sustain.
    Decay,
    /// Exponential fall from the recorded decay end.
    Release,
    /// Extended fade after the nominal note length.
    Tail,
}

/// Exponent constants of the decay, release and tail curves.
///
/// Larger values give a faster initial drop within the same segment length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvelopeCurve {
    /// Decay exponent `kd`.
    pub decay: f32,
    /// Release exponent `kr`.
    pub release: f32,
    /// Tail exponent `kt`.
    pub tail: f32,
}

impl EnvelopeCurve {
    /// Curve used by most recipes.
    pub const DEFAULT: Self = Self {
        decay: 5.0,
        release: 5.0,
        tail: 6.0,
    };

    /// Steeper decay for tight metallic sounds.
    pub const TIGHT: Self = Self {
        decay: 7.0,
        release: 6.0,
        tail: 6.0,
    };
}

impl Default for EnvelopeCurve {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Per-note envelope state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EnvelopePhase {
    phase: u32,
    decay_end: Option<f32>,
}

impl EnvelopePhase {
    /// State at the trigger instant.
    pub const fn new() -> Self {
        Self {
            phase: 0,
            decay_end: None,
        }
    }

    /// Samples elapsed since trigger.
    pub fn phase(&self) -> u32 {
        self.phase
    }

    /// Last value emitted by the decay segment, once the decay has run.
    pub fn decay_end(&self) -> Option<f32> {
        self.decay_end
    }

    /// Restart from the trigger instant.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Shared four-phase envelope timing, in samples.
///
/// ```rust
/// use tambor_synth::{Adsr, EnvelopeGenerator, EnvelopePhase, EnvelopeState};
///
/// let env = EnvelopeGenerator::new(&Adsr::new(0.005, 0.4, 0.0, 0.15), 44100.0);
/// assert_eq!(env.attack_samples(), 221);
///
/// let mut state = EnvelopePhase::new();
/// assert_eq!(env.next(&mut state), 0.0);
/// assert_eq!(env.stage(state.phase()), EnvelopeState::Attack);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvelopeGenerator {
    attack: u32,
    decay: u32,
    release: u32,
    fade: u32,
    sustain: f32,
    curve: EnvelopeCurve,
}

impl EnvelopeGenerator {
    /// Shortest extended fade tail in seconds.
    pub const MIN_FADE_SECONDS: f32 = 0.02;

    /// Fade tail length as a fraction of the release.
    pub const TAIL_FRACTION: f32 = 0.5;

    /// Generator with the default curve.
    pub fn new(adsr: &Adsr, sample_rate: f32) -> Self {
        Self::with_curve(adsr, EnvelopeCurve::DEFAULT, sample_rate)
    }

    /// Generator with a recipe-specific curve.
    pub fn with_curve(adsr: &Adsr, curve: EnvelopeCurve, sample_rate: f32) -> Self {
        let release = time_to_samples(adsr.release, sample_rate);
        let min_fade = time_to_samples(Self::MIN_FADE_SECONDS, sample_rate);
        let fade = min_fade.max(libm::ceilf(release as f32 * Self::TAIL_FRACTION) as u32);
        Self {
            attack: time_to_samples(adsr.attack, sample_rate),
            decay: time_to_samples(adsr.decay, sample_rate),
            release,
            fade,
            sustain: adsr.sustain.clamp(0.0, 1.0),
            curve,
        }
    }

    /// Attack length in samples.
    pub fn attack_samples(&self) -> u32 {
        self.attack
    }

    /// Decay length in samples.
    pub fn decay_samples(&self) -> u32 {
        self.decay
    }

    /// Release length in samples.
    pub fn release_samples(&self) -> u32 {
        self.release
    }

    /// Extended fade tail length in samples.
    pub fn fade_samples(&self) -> u32 {
        self.fade
    }

    /// Sustain level.
    pub fn sustain(&self) -> f32 {
        self.sustain
    }

    /// Curve constants.
    pub fn curve(&self) -> EnvelopeCurve {
        self.curve
    }

    /// Attack + decay + release, without the tail.
    pub fn nominal_samples(&self) -> u32 {
        self.attack
            .saturating_add(self.decay)
            .saturating_add(self.release)
    }

    /// Nominal length plus the fade tail.
    pub fn total_samples(&self) -> u32 {
        self.nominal_samples().saturating_add(self.fade)
    }

    /// Segment containing `phase`.
    pub fn stage(&self, phase: u32) -> EnvelopeState {
        let decay_start = self.attack;
        let release_start = decay_start.saturating_add(self.decay);
        let tail_start = release_start.saturating_add(self.release);
        if phase < decay_start {
            EnvelopeState::Attack
        } else if phase < release_start {
            EnvelopeState::Decay
        } else if phase < tail_start {
            EnvelopeState::Release
        } else if phase < self.total_samples() {
            EnvelopeState::Tail
        } else {
            EnvelopeState::Idle
        }
    }

    /// Fraction of the decay segment elapsed at `phase`: 0 before it, 1 after.
    pub fn decay_progress(&self, phase: u32) -> f32 {
        if phase < self.attack {
            0.0
        } else if self.decay == 0 {
            1.0
        } else {
            ((phase - self.attack) as f32 / self.decay as f32).min(1.0)
        }
    }

    /// True once `phase` is past the fade tail.
    pub fn is_finished(&self, phase: u32) -> bool {
        phase >= self.total_samples()
    }

    /// Emit the value at the current phase and advance by one sample.
    ///
    /// The result is always in `[0, 1]`.
    #[inline]
    pub fn next(&self, state: &mut EnvelopePhase) -> f32 {
        let value = self.evaluate(state);
        debug_assert!((0.0..=1.0).contains(&value), "envelope out of range: {value}");
        state.phase = state.phase.saturating_add(1);
        value
    }

    fn evaluate(&self, state: &mut EnvelopePhase) -> f32 {
        let mut n = state.phase;

        if n < self.attack {
            return (0.5 * (1.0 - cosf(PI * n as f32 / self.attack as f32))).clamp(0.0, 1.0);
        }
        n -= self.attack;

        if n < self.decay {
            let x = n as f32 / self.decay as f32;
            let value = (self.sustain + (1.0 - self.sustain) * expf(-self.curve.decay * x))
                .clamp(0.0, 1.0);
            state.decay_end = Some(value);
            return value;
        }
        n -= self.decay;

        let decay_end = state.decay_end.unwrap_or(1.0);
        if n < self.release {
            let x = n as f32 / self.release as f32;
            return (decay_end * expf(-self.curve.release * x)).clamp(0.0, 1.0);
        }
        n -= self.release;

        if n < self.fade {
            let seed = if self.release > 0 {
                decay_end * expf(-self.curve.release)
            } else {
                decay_end
            };
            let x = n as f32 / self.fade as f32;
            return (seed * expf(-self.curve.tail * x)).clamp(0.0, 1.0);
        }

        0.0
    }
}
