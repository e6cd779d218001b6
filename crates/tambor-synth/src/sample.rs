//! Playback of an arbitrary recorded buffer with trim points and looping.
//!
//! The region `[start_point, end_point)` of the buffer is read with the same
//! interpolating cursor as [`WavetableVoice`](crate::WavetableVoice), then
//! passed through a DC blocker because recordings often carry an offset.
//!
//! - **One-shot**: the last 10 ms before `end_point` fade linearly to zero and
//!   the voice stops once the cursor reaches the end.
//! - **Loop**: the cursor wraps from `end_point` back to `start_point`. A loop
//!   never reaches an end on its own, so its level follows the voice envelope
//!   and the voice stops when the envelope tail has run out.
//!
//! The mode is latched when a note starts. Toggling `looping` mid-note takes
//! effect on the next trigger.

use crate::envelope::{EnvelopeGenerator, EnvelopePhase};
use crate::retrigger::RetriggerCrossfader;
use crate::settings::{Adsr, SettingsPatch, VoiceSettings};
use crate::voice::{
    SILENCE_EPSILON, Voice, sanitize_pitch, sanitize_sample_rate, sanitize_velocity,
};
use crate::wavetable::interpolate;
use alloc::sync::Arc;
use libm::fmod;
use tambor_core::{DcBlocker, pitch_ratio, time_to_samples};

/// Forced fade at the end of a one-shot region, in seconds.
pub const END_FADE_SECONDS: f32 = 0.010;

/// Recorded-buffer player.
#[derive(Debug, Clone)]
pub struct SampleVoice {
    buffer: Option<Arc<[f32]>>,
    buffer_rate: f32,
    settings: VoiceSettings,
    adsr_override: Option<Adsr>,
    generator: EnvelopeGenerator,
    envelope: EnvelopePhase,
    dc: DcBlocker,
    crossfader: RetriggerCrossfader,
    cursor: f64,
    step: f64,
    start: usize,
    end: usize,
    note_looping: bool,
    velocity: f32,
    fade_samples: u32,
    sample_rate: f32,
    active: bool,
}

impl SampleVoice {
    /// Player for `buffer` recorded at `buffer_rate`.
    pub fn new(
        buffer: Arc<[f32]>,
        buffer_rate: f32,
        settings: VoiceSettings,
        sample_rate: f32,
    ) -> Self {
        let mut voice = Self::empty(settings, sample_rate);
        voice.buffer = Some(buffer);
        voice.buffer_rate = sanitize_sample_rate(buffer_rate);
        voice
    }

    /// Player without a buffer; it plays silence.
    pub fn empty(settings: VoiceSettings, sample_rate: f32) -> Self {
        let sample_rate = sanitize_sample_rate(sample_rate);
        Self {
            buffer: None,
            buffer_rate: sample_rate,
            generator: EnvelopeGenerator::new(&settings.adsr, sample_rate),
            settings,
            adsr_override: None,
            envelope: EnvelopePhase::new(),
            dc: DcBlocker::new(sample_rate),
            crossfader: RetriggerCrossfader::new(sample_rate),
            cursor: 0.0,
            step: 1.0,
            start: 0,
            end: 0,
            note_looping: false,
            velocity: 0.0,
            fade_samples: time_to_samples(END_FADE_SECONDS, sample_rate).max(1),
            sample_rate,
            active: false,
        }
    }

    /// Replace the buffer. Playback of the current note stops.
    ///
    /// This may drop the old buffer, so call it from the control side.
    pub fn set_buffer(&mut self, buffer: Arc<[f32]>, buffer_rate: f32) {
        self.buffer = Some(buffer);
        self.buffer_rate = sanitize_sample_rate(buffer_rate);
        self.active = false;
        self.crossfader.reset();
    }

    /// Loaded buffer, if any.
    pub fn buffer(&self) -> Option<&[f32]> {
        self.buffer.as_deref()
    }

    /// Fractional read position in buffer samples.
    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    /// Cursor advance per output sample.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Playback region `(start, end)` of the current note.
    pub fn region(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    /// Envelope generator used while looping.
    pub fn generator(&self) -> &EnvelopeGenerator {
        &self.generator
    }

    fn effective_adsr(&self) -> Adsr {
        self.adsr_override.unwrap_or(self.settings.adsr)
    }

    fn resolve_region(&mut self) {
        let len = self.buffer.as_ref().map_or(0, |b| b.len());
        self.start = self.settings.start_point.unwrap_or(0).min(len);
        self.end = self.settings.end_point.unwrap_or(len).min(len);
    }

    /// Linear gain of the end-of-region fade for the current cursor.
    fn end_fade(&self) -> f32 {
        let remaining = ((self.end as f64 - self.cursor) / self.step) as f32;
        (remaining / self.fade_samples as f32).clamp(0.0, 1.0)
    }
}

impl Voice for SampleVoice {
    fn trigger(&mut self, velocity: f32, pitch: f32, adsr: Option<Adsr>) {
        let was_active = self.active;
        let pitch = sanitize_pitch(pitch, self.settings.base_pitch);
        self.velocity = sanitize_velocity(velocity);
        self.step = f64::from(pitch_ratio(pitch, self.settings.base_pitch))
            * (f64::from(self.buffer_rate) / f64::from(self.sample_rate));
        self.note_looping = self.settings.looping;
        self.adsr_override = adsr.map(|a| a.sanitized(&self.settings.adsr));
        self.generator = EnvelopeGenerator::new(&self.effective_adsr(), self.sample_rate);
        self.envelope.reset();
        self.resolve_region();
        self.cursor = self.start as f64;
        self.dc.reset();
        self.crossfader.trigger(was_active);
        self.active = true;
    }

    fn process(&mut self) -> f32 {
        if !self.active {
            return 0.0;
        }
        let Some(buffer) = self.buffer.as_deref() else {
            self.active = false;
            return 0.0;
        };
        if self.end <= self.start || self.cursor >= self.end as f64 {
            self.active = false;
            self.crossfader.reset();
            return 0.0;
        }

        debug_assert!(self.cursor >= self.start as f64, "cursor before region start");
        let looping = self.note_looping;
        let raw = self.dc.process(interpolate(&buffer[..self.end], self.cursor));
        let gain = if looping {
            self.generator.next(&mut self.envelope)
        } else {
            self.end_fade()
        };
        let out = self.crossfader.process(raw * gain * self.velocity);

        self.cursor += self.step;
        if self.cursor >= self.end as f64 {
            if looping {
                let start = self.start as f64;
                let length = (self.end - self.start) as f64;
                self.cursor = start + fmod(self.cursor - start, length);
            } else {
                self.active = false;
            }
        }

        if looping
            && self.generator.is_finished(self.envelope.phase())
            && out.abs() < SILENCE_EPSILON
            && !self.crossfader.is_fading()
        {
            self.active = false;
        }
        if !self.active {
            self.crossfader.reset();
        }
        out
    }

    fn update_settings(&mut self, patch: SettingsPatch) {
        let retrim = patch.start_point.is_some() || patch.end_point.is_some();
        let old = self.settings.adsr;
        self.settings.apply(patch);
        let new = self.settings.adsr;
        if let Some(over) = self.adsr_override.as_mut() {
            over.follow(&old, &new);
        }
        self.generator = EnvelopeGenerator::new(&self.effective_adsr(), self.sample_rate);
        if retrim {
            self.resolve_region();
            let lo = self.start as f64;
            let hi = self.end as f64;
            if self.cursor < lo || self.cursor >= hi {
                self.cursor = lo;
            }
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn settings(&self) -> &VoiceSettings {
        &self.settings
    }

    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}
