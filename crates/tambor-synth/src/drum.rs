//! Tagged union over every voice variant, plus its factory.

use crate::kind::{DrumKind, InstrumentKind};
use crate::recipes::{Clap, Cymbal, HiHat, Kick, Organ, Shaker, Snare, Tom};
use crate::sample::SampleVoice;
use crate::settings::{Adsr, SettingsPatch, VoiceSettings};
use crate::voice::{ProceduralVoice, Voice};
use crate::wavetable::{WavetableBank, WavetableVoice};
use alloc::sync::Arc;
use tambor_core::NoiseBuffer;

/// Any voice the rack can host.
///
/// Dispatch is an exhaustive `match`, so every variant implements the whole
/// [`Voice`] contract.
#[derive(Debug, Clone)]
pub enum DrumVoice {
    /// Procedural kick.
    Kick(ProceduralVoice<Kick>),
    /// Procedural snare.
    Snare(ProceduralVoice<Snare>),
    /// Procedural rimshot.
    Rimshot(ProceduralVoice<Snare>),
    /// Procedural hi-hat.
    HiHat(ProceduralVoice<HiHat>),
    /// Procedural cymbal.
    Cymbal(ProceduralVoice<Cymbal>),
    /// Procedural tom.
    Tom(ProceduralVoice<Tom>),
    /// Procedural clap.
    Clap(ProceduralVoice<Clap>),
    /// Procedural shaker.
    Shaker(ProceduralVoice<Shaker>),
    /// Procedural organ.
    Organ(ProceduralVoice<Organ>),
    /// Table playback.
    Wavetable(WavetableVoice),
    /// Recorded-sample playback.
    Sampler(SampleVoice),
}

macro_rules! dispatch {
    ($self:expr, $voice:ident => $body:expr) => {
        match $self {
            DrumVoice::Kick($voice) => $body,
            DrumVoice::Snare($voice) | DrumVoice::Rimshot($voice) => $body,
            DrumVoice::HiHat($voice) => $body,
            DrumVoice::Cymbal($voice) => $body,
            DrumVoice::Tom($voice) => $body,
            DrumVoice::Clap($voice) => $body,
            DrumVoice::Shaker($voice) => $body,
            DrumVoice::Organ($voice) => $body,
            DrumVoice::Wavetable($voice) => $body,
            DrumVoice::Sampler($voice) => $body,
        }
    };
}

impl DrumVoice {
    /// Build a voice for `kind`.
    ///
    /// Table kinds start without tables and play silence until loaded; use
    /// [`DrumVoice::wavetable`] or [`DrumVoice::sampler`] to supply them.
    pub fn new(kind: InstrumentKind, settings: VoiceSettings, sample_rate: f32) -> Self {
        Self::with_noise(kind, settings, sample_rate, None)
    }

    /// Build a voice for `kind` with its built-in settings.
    pub fn with_defaults(kind: InstrumentKind, sample_rate: f32) -> Self {
        Self::new(kind, kind.default_settings(), sample_rate)
    }

    /// Build a procedural voice that reads a shared noise buffer.
    ///
    /// `noise` is ignored by table kinds. `None` gives the voice its own.
    pub fn with_noise(
        kind: InstrumentKind,
        settings: VoiceSettings,
        sample_rate: f32,
        noise: Option<NoiseBuffer>,
    ) -> Self {
        fn build<R: crate::voice::Recipe>(
            recipe: R,
            settings: VoiceSettings,
            sample_rate: f32,
            noise: Option<NoiseBuffer>,
        ) -> ProceduralVoice<R> {
            match noise {
                Some(noise) => ProceduralVoice::with_noise(recipe, settings, sample_rate, noise),
                None => ProceduralVoice::new(recipe, settings, sample_rate),
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(kind = kind.id(), sample_rate, "building voice");

        match kind {
            InstrumentKind::Kick => {
                Self::Kick(build(Kick::new(sample_rate), settings, sample_rate, noise))
            }
            InstrumentKind::Snare => {
                Self::Snare(build(Snare::snare(), settings, sample_rate, noise))
            }
            InstrumentKind::Rimshot => {
                Self::Rimshot(build(Snare::rimshot(), settings, sample_rate, noise))
            }
            InstrumentKind::HiHat => Self::HiHat(build(HiHat::new(), settings, sample_rate, noise)),
            InstrumentKind::Cymbal => {
                Self::Cymbal(build(Cymbal::new(), settings, sample_rate, noise))
            }
            InstrumentKind::Tom => Self::Tom(build(Tom::new(), settings, sample_rate, noise)),
            InstrumentKind::Clap => {
                Self::Clap(build(Clap::new(sample_rate), settings, sample_rate, noise))
            }
            InstrumentKind::Shaker => {
                Self::Shaker(build(Shaker::new(), settings, sample_rate, noise))
            }
            InstrumentKind::Organ => Self::Organ(build(Organ::new(), settings, sample_rate, noise)),
            InstrumentKind::Wavetable(drum) => {
                Self::Wavetable(WavetableVoice::empty(drum, settings, sample_rate))
            }
            InstrumentKind::Sampler => Self::Sampler(SampleVoice::empty(settings, sample_rate)),
        }
    }

    /// Table voice for `drum` over the bank's tables.
    pub fn wavetable(
        drum: DrumKind,
        bank: &WavetableBank,
        settings: VoiceSettings,
        sample_rate: f32,
    ) -> Self {
        Self::Wavetable(WavetableVoice::from_bank(drum, bank, settings, sample_rate))
    }

    /// Sample voice over `buffer` recorded at `buffer_rate`.
    pub fn sampler(
        buffer: Arc<[f32]>,
        buffer_rate: f32,
        settings: VoiceSettings,
        sample_rate: f32,
    ) -> Self {
        Self::Sampler(SampleVoice::new(buffer, buffer_rate, settings, sample_rate))
    }

    /// Instrument this voice was built for.
    pub fn kind(&self) -> InstrumentKind {
        match self {
            Self::Kick(_) => InstrumentKind::Kick,
            Self::Snare(_) => InstrumentKind::Snare,
            Self::Rimshot(_) => InstrumentKind::Rimshot,
            Self::HiHat(_) => InstrumentKind::HiHat,
            Self::Cymbal(_) => InstrumentKind::Cymbal,
            Self::Tom(_) => InstrumentKind::Tom,
            Self::Clap(_) => InstrumentKind::Clap,
            Self::Shaker(_) => InstrumentKind::Shaker,
            Self::Organ(_) => InstrumentKind::Organ,
            Self::Wavetable(v) => InstrumentKind::Wavetable(v.drum()),
            Self::Sampler(_) => InstrumentKind::Sampler,
        }
    }
}

impl Voice for DrumVoice {
    fn trigger(&mut self, velocity: f32, pitch: f32, adsr: Option<Adsr>) {
        dispatch!(self, v => v.trigger(velocity, pitch, adsr));
    }

    #[inline]
    fn process(&mut self) -> f32 {
        dispatch!(self, v => v.process())
    }

    fn update_settings(&mut self, patch: SettingsPatch) {
        dispatch!(self, v => v.update_settings(patch));
    }

    fn is_active(&self) -> bool {
        dispatch!(self, v => v.is_active())
    }

    fn settings(&self) -> &VoiceSettings {
        dispatch!(self, v => v.settings())
    }

    fn sample_rate(&self) -> f32 {
        dispatch!(self, v => v.sample_rate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_covers_every_kind() {
        for kind in InstrumentKind::ALL {
            let voice = DrumVoice::with_defaults(kind, 44100.0);
            assert_eq!(voice.kind(), kind);
            assert!(!voice.is_active());
            assert_eq!(voice.sample_rate(), 44100.0);
        }
    }

    #[test]
    fn inactive_voices_return_zero() {
        for kind in InstrumentKind::ALL {
            let mut voice = DrumVoice::with_defaults(kind, 48000.0);
            for _ in 0..16 {
                assert_eq!(voice.process(), 0.0);
            }
        }
    }

    #[test]
    fn shared_noise_is_not_copied() {
        let noise = NoiseBuffer::new(1024, 3);
        let voice = DrumVoice::with_noise(
            InstrumentKind::HiHat,
            InstrumentKind::HiHat.default_settings(),
            44100.0,
            Some(noise.clone()),
        );
        let DrumVoice::HiHat(inner) = voice else {
            panic!("expected a hi-hat");
        };
        assert!(inner.noise().shares_storage_with(&noise));
    }
}
