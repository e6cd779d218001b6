//! The voice contract and the procedural voice core.
//!
//! Every voice, whatever its synthesis strategy, follows one state machine:
//!
//! ```text
//! Idle --trigger--> Active --(envelope/cursor exhausted AND |out| < ε)--> Idle
//! Active --trigger--> Active   (retrigger crossfade, no pass through Idle)
//! ```
//!
//! [`ProceduralVoice`] implements the shared half of that for every recipe:
//! envelope timing, per-note overrides, retrigger crossfade, per-trigger noise
//! offsets, velocity and silence detection. A [`Recipe`] only supplies the
//! instrument-specific oscillators and filters.

use crate::envelope::{EnvelopeCurve, EnvelopeGenerator, EnvelopePhase, EnvelopeState};
use crate::retrigger::RetriggerCrossfader;
use crate::settings::{Adsr, SettingsPatch, VoiceSettings};
use core::sync::atomic::{AtomicU32, Ordering};
use tambor_core::{NoiseBuffer, Xorshift32, pitch_ratio};

/// Magnitude below which a finished voice counts as silent.
pub const SILENCE_EPSILON: f32 = 1e-4;

static SEED_COUNTER: AtomicU32 = AtomicU32::new(0x2545_F491);

/// Distinct PRNG seed for each voice constructed in this process.
pub(crate) fn next_seed() -> u32 {
    SEED_COUNTER
        .fetch_add(0x9E37_79B9, Ordering::Relaxed)
        .wrapping_mul(0x85EB_CA6B)
        | 1
}

/// Replace a non-positive or non-finite sample rate with 44.1 kHz.
pub(crate) fn sanitize_sample_rate(sample_rate: f32) -> f32 {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        sample_rate
    } else {
        44100.0
    }
}

/// Clamp a trigger velocity, treating non-finite input as full velocity.
pub(crate) fn sanitize_velocity(velocity: f32) -> f32 {
    if velocity.is_finite() {
        velocity.clamp(0.0, 1.0)
    } else {
        1.0
    }
}

/// Clamp a trigger pitch, treating non-finite input as the base pitch.
pub(crate) fn sanitize_pitch(pitch: f32, base_pitch: f32) -> f32 {
    if pitch.is_finite() {
        pitch.clamp(0.0, 127.0)
    } else {
        base_pitch
    }
}

/// A single sounding instrument slot.
///
/// All methods are allocation-free and never block, so a voice can be driven
/// from a realtime callback. `trigger` and `update_settings` must be called
/// between `process` calls, never concurrently with one.
pub trait Voice {
    /// Start a note.
    ///
    /// `velocity` is a linear gain in `[0, 1]`, `pitch` a MIDI note number.
    /// `adsr` overrides the root envelope for this note only.
    fn trigger(&mut self, velocity: f32, pitch: f32, adsr: Option<Adsr>);

    /// Render one sample. Returns exactly `0.0` while inactive.
    fn process(&mut self) -> f32;

    /// Merge a partial settings update.
    ///
    /// The patch is taken by value so a named selection moves in without an
    /// allocation on the render thread.
    fn update_settings(&mut self, patch: SettingsPatch);

    /// True while the voice is producing sound.
    fn is_active(&self) -> bool;

    /// Current settings.
    fn settings(&self) -> &VoiceSettings;

    /// Sample rate the voice renders at.
    fn sample_rate(&self) -> f32;

    /// Fill `output` by calling [`process`](Voice::process) per sample.
    fn process_block(&mut self, output: &mut [f32]) {
        for sample in output.iter_mut() {
            *sample = self.process();
        }
    }
}

/// Everything a recipe may read while rendering one sample.
#[derive(Debug, Clone, Copy)]
pub struct NoteFrame<'a> {
    /// Samples since trigger.
    pub phase: u32,
    /// Seconds since trigger.
    pub time: f32,
    /// Main envelope value for this sample, in `[0, 1]`.
    pub envelope: f32,
    /// Envelope segment of this sample.
    pub stage: EnvelopeState,
    /// Fraction of the decay segment elapsed.
    pub decay_progress: f32,
    /// Main envelope generator for this note.
    pub generator: &'a EnvelopeGenerator,
    /// Trigger velocity.
    pub velocity: f32,
    /// `2^((pitch - base_pitch) / 12)`.
    pub pitch_multiplier: f32,
    /// Voice sample rate.
    pub sample_rate: f32,
    /// Current voice settings.
    pub settings: &'a VoiceSettings,
    /// Shared noise.
    pub noise: &'a NoiseBuffer,
    /// Random noise start offset chosen at trigger.
    pub noise_offset: usize,
}

impl NoteFrame<'_> {
    /// Noise for stream `stream` at this sample.
    ///
    /// Streams start half a buffer apart (stream 0 at the trigger offset,
    /// stream 1 half a buffer later, and so on) so they are uncorrelated.
    #[inline]
    pub fn noise_stream(&self, stream: usize) -> f32 {
        let spacing = self.noise.len() / 2;
        self.noise
            .sample(self.noise_offset + stream * spacing + self.phase as usize)
    }

    /// Noise read with an explicit stream offset and phase.
    #[inline]
    pub fn noise_at(&self, offset: usize, phase: u32) -> f32 {
        self.noise
            .sample(self.noise_offset + offset + phase as usize)
    }

    /// Gain that follows the attack and then holds at 1.
    ///
    /// Transient components with their own short decay use this so they fade
    /// in with the note instead of starting on a full-scale step.
    #[inline]
    pub fn onset(&self) -> f32 {
        if self.stage == EnvelopeState::Attack {
            self.envelope
        } else {
            1.0
        }
    }
}

/// Instrument-specific part of a [`ProceduralVoice`].
///
/// All recipe state is plain fields allocated when the recipe is built;
/// nothing is created inside `trigger` or `render`.
pub trait Recipe {
    /// Envelope curve constants for this instrument.
    fn curve(&self) -> EnvelopeCurve {
        EnvelopeCurve::DEFAULT
    }

    /// Reset oscillator and filter state for a new note.
    fn trigger(&mut self, frame: &NoteFrame<'_>);

    /// Render one sample, before velocity.
    fn render(&mut self, frame: &NoteFrame<'_>) -> f32;

    /// True while the recipe still has sound of its own past the main envelope.
    fn is_sounding(&self) -> bool {
        false
    }
}

/// Voice that renders a [`Recipe`].
#[derive(Debug, Clone)]
pub struct ProceduralVoice<R> {
    recipe: R,
    settings: VoiceSettings,
    adsr_override: Option<Adsr>,
    generator: EnvelopeGenerator,
    envelope: EnvelopePhase,
    crossfader: RetriggerCrossfader,
    noise: NoiseBuffer,
    rng: Xorshift32,
    note: NoteParams,
    active: bool,
}

impl<R: Recipe> ProceduralVoice<R> {
    /// Build a voice with its own freshly generated noise buffer.
    pub fn new(recipe: R, settings: VoiceSettings, sample_rate: f32) -> Self {
        let seed = next_seed();
        Self::with_noise(recipe, settings, sample_rate, NoiseBuffer::with_seed(seed))
    }

    /// Build a voice that reads an existing noise buffer.
    pub fn with_noise(
        recipe: R,
        settings: VoiceSettings,
        sample_rate: f32,
        noise: NoiseBuffer,
    ) -> Self {
        let sample_rate = sanitize_sample_rate(sample_rate);
        let generator = EnvelopeGenerator::with_curve(&settings.adsr, recipe.curve(), sample_rate);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate,
            total_samples = generator.total_samples(),
            "procedural voice constructed"
        );

        Self {
            recipe,
            settings,
            adsr_override: None,
            generator,
            envelope: EnvelopePhase::new(),
            crossfader: RetriggerCrossfader::new(sample_rate),
            noise,
            rng: Xorshift32::new(next_seed()),
            note: NoteParams {
                velocity: 0.0,
                pitch_multiplier: 1.0,
                sample_rate,
                noise_offset: 0,
            },
            active: false,
        }
    }

    /// Recipe state.
    pub fn recipe(&self) -> &R {
        &self.recipe
    }

    /// Per-note envelope override of the current note.
    pub fn adsr_override(&self) -> Option<&Adsr> {
        self.adsr_override.as_ref()
    }

    /// Envelope that shapes the current note.
    pub fn effective_adsr(&self) -> Adsr {
        self.adsr_override.unwrap_or(self.settings.adsr)
    }

    /// Envelope generator of the current note.
    pub fn generator(&self) -> &EnvelopeGenerator {
        &self.generator
    }

    /// Envelope state of the current note.
    pub fn envelope_phase(&self) -> &EnvelopePhase {
        &self.envelope
    }

    /// Retrigger crossfade state.
    pub fn crossfader(&self) -> &RetriggerCrossfader {
        &self.crossfader
    }

    /// Noise buffer this voice reads.
    pub fn noise(&self) -> &NoiseBuffer {
        &self.noise
    }

    fn rebuild_generator(&mut self) {
        self.generator = EnvelopeGenerator::with_curve(
            &self.effective_adsr(),
            self.recipe.curve(),
            self.note.sample_rate,
        );
    }
}

/// Per-note values fixed at trigger time.
#[derive(Debug, Clone, Copy)]
struct NoteParams {
    velocity: f32,
    pitch_multiplier: f32,
    sample_rate: f32,
    noise_offset: usize,
}

fn note_frame<'a>(
    phase: u32,
    envelope: f32,
    generator: &'a EnvelopeGenerator,
    settings: &'a VoiceSettings,
    noise: &'a NoiseBuffer,
    note: NoteParams,
) -> NoteFrame<'a> {
    NoteFrame {
        phase,
        time: phase as f32 / note.sample_rate,
        envelope,
        stage: generator.stage(phase),
        decay_progress: generator.decay_progress(phase),
        generator,
        velocity: note.velocity,
        pitch_multiplier: note.pitch_multiplier,
        sample_rate: note.sample_rate,
        settings,
        noise,
        noise_offset: note.noise_offset,
    }
}

impl<R: Recipe> Voice for ProceduralVoice<R> {
    fn trigger(&mut self, velocity: f32, pitch: f32, adsr: Option<Adsr>) {
        let was_active = self.active;
        let pitch = sanitize_pitch(pitch, self.settings.base_pitch);
        self.note.velocity = sanitize_velocity(velocity);
        self.note.pitch_multiplier = pitch_ratio(pitch, self.settings.base_pitch);
        self.adsr_override = adsr.map(|a| a.sanitized(&self.settings.adsr));
        self.rebuild_generator();
        self.envelope.reset();
        self.note.noise_offset = self.rng.next_index(self.noise.len());
        self.crossfader.trigger(was_active);

        let frame = note_frame(0, 0.0, &self.generator, &self.settings, &self.noise, self.note);
        self.recipe.trigger(&frame);

        self.active = true;
    }

    fn process(&mut self) -> f32 {
        if !self.active {
            return 0.0;
        }

        let phase = self.envelope.phase();
        let envelope = self.generator.next(&mut self.envelope);
        let frame = note_frame(
            phase,
            envelope,
            &self.generator,
            &self.settings,
            &self.noise,
            self.note,
        );
        let raw = self.recipe.render(&frame) * self.note.velocity;
        let out = self.crossfader.process(raw);

        if self.generator.is_finished(self.envelope.phase())
            && envelope < SILENCE_EPSILON
            && out.abs() < SILENCE_EPSILON
            && !self.crossfader.is_fading()
            && !self.recipe.is_sounding()
        {
            self.active = false;
            self.crossfader.reset();
        }
        out
    }

    fn update_settings(&mut self, patch: SettingsPatch) {
        let old = self.settings.adsr;
        self.settings.apply(patch);
        let new = self.settings.adsr;
        if let Some(over) = self.adsr_override.as_mut() {
            over.follow(&old, &new);
        }
        if old != new || self.adsr_override.is_some() {
            self.rebuild_generator();
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn settings(&self) -> &VoiceSettings {
        &self.settings
    }

    fn sample_rate(&self) -> f32 {
        self.note.sample_rate
    }
}
