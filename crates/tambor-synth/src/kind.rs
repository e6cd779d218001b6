//! Closed set of instrument types.
//!
//! Instrument selection is an exhaustive enum rather than a string lookup:
//! adding a variant forces every `match` over it (factory, defaults,
//! descriptors) to be updated. Strings only appear at the edges, through
//! [`InstrumentKind::id`] and [`FromStr`].

use crate::settings::{Adsr, VoiceSettings};
use core::fmt;
use core::str::FromStr;

/// Drum sub-type of a wavetable voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DrumKind {
    /// Bass drum.
    Kick,
    /// Rim shot.
    Rimshot,
    /// Snare drum.
    Snare,
    /// Hand clap.
    Clap,
    /// Closed hi-hat.
    ClosedHat,
    /// Tom.
    Tom,
    /// Open hi-hat.
    OpenHat,
    /// Crash / ride cymbal.
    Cymbal,
}

impl DrumKind {
    /// Every drum sub-type.
    pub const ALL: [Self; 8] = [
        Self::Kick,
        Self::Rimshot,
        Self::Snare,
        Self::Clap,
        Self::ClosedHat,
        Self::Tom,
        Self::OpenHat,
        Self::Cymbal,
    ];

    /// Stable identifier, also the table directory name.
    pub const fn id(self) -> &'static str {
        match self {
            Self::Kick => "kick",
            Self::Rimshot => "rimshot",
            Self::Snare => "snare",
            Self::Clap => "clap",
            Self::ClosedHat => "closed-hat",
            Self::Tom => "tom",
            Self::OpenHat => "open-hat",
            Self::Cymbal => "cymbal",
        }
    }

    /// General MIDI drum-map note at which the tables sound untransposed.
    pub const fn base_pitch(self) -> f32 {
        match self {
            Self::Kick => 36.0,
            Self::Rimshot => 37.0,
            Self::Snare => 38.0,
            Self::Clap => 39.0,
            Self::ClosedHat => 42.0,
            Self::Tom => 45.0,
            Self::OpenHat => 46.0,
            Self::Cymbal => 49.0,
        }
    }
}

impl fmt::Display for DrumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for DrumKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.id().eq_ignore_ascii_case(s))
            .ok_or(ParseKindError)
    }
}

/// How a voice makes sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Synthesis {
    /// Oscillators, noise and filters.
    Procedural,
    /// Pre-resampled named tables.
    Wavetable,
    /// Arbitrary recorded buffer with trim and loop.
    Sample,
}

/// Static description of an instrument kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstrumentDescriptor {
    /// Identifier accepted by [`InstrumentKind::from_str`].
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Synthesis strategy.
    pub synthesis: Synthesis,
}

/// Every instrument a voice can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InstrumentKind {
    /// Procedural kick drum.
    Kick,
    /// Procedural snare.
    Snare,
    /// Procedural rimshot.
    Rimshot,
    /// Procedural hi-hat.
    HiHat,
    /// Procedural cymbal.
    Cymbal,
    /// Procedural tom.
    Tom,
    /// Procedural clap.
    Clap,
    /// Procedural shaker.
    Shaker,
    /// Procedural drawbar organ.
    Organ,
    /// Table playback for a drum sub-type.
    Wavetable(DrumKind),
    /// Recorded-sample playback.
    Sampler,
}

impl InstrumentKind {
    /// Every instrument kind, procedural first.
    pub const ALL: [Self; 18] = [
        Self::Kick,
        Self::Snare,
        Self::Rimshot,
        Self::HiHat,
        Self::Cymbal,
        Self::Tom,
        Self::Clap,
        Self::Shaker,
        Self::Organ,
        Self::Wavetable(DrumKind::Kick),
        Self::Wavetable(DrumKind::Rimshot),
        Self::Wavetable(DrumKind::Snare),
        Self::Wavetable(DrumKind::Clap),
        Self::Wavetable(DrumKind::ClosedHat),
        Self::Wavetable(DrumKind::Tom),
        Self::Wavetable(DrumKind::OpenHat),
        Self::Wavetable(DrumKind::Cymbal),
        Self::Sampler,
    ];

    /// Stable identifier.
    pub const fn id(self) -> &'static str {
        self.descriptor().id
    }

    /// Static description.
    pub const fn descriptor(self) -> InstrumentDescriptor {
        use Synthesis::{Procedural, Sample, Wavetable};
        let (id, name, synthesis) = match self {
            Self::Kick => ("kick", "Kick", Procedural),
            Self::Snare => ("snare", "Snare", Procedural),
            Self::Rimshot => ("rimshot", "Rimshot", Procedural),
            Self::HiHat => ("hihat", "Hi-hat", Procedural),
            Self::Cymbal => ("cymbal", "Cymbal", Procedural),
            Self::Tom => ("tom", "Tom", Procedural),
            Self::Clap => ("clap", "Clap", Procedural),
            Self::Shaker => ("shaker", "Shaker", Procedural),
            Self::Organ => ("organ", "Drawbar organ", Procedural),
            Self::Wavetable(drum) => match drum {
                DrumKind::Kick => ("wavetable-kick", "Table kick", Wavetable),
                DrumKind::Rimshot => ("wavetable-rimshot", "Table rimshot", Wavetable),
                DrumKind::Snare => ("wavetable-snare", "Table snare", Wavetable),
                DrumKind::Clap => ("wavetable-clap", "Table clap", Wavetable),
                DrumKind::ClosedHat => ("wavetable-closed-hat", "Table closed hat", Wavetable),
                DrumKind::Tom => ("wavetable-tom", "Table tom", Wavetable),
                DrumKind::OpenHat => ("wavetable-open-hat", "Table open hat", Wavetable),
                DrumKind::Cymbal => ("wavetable-cymbal", "Table cymbal", Wavetable),
            },
            Self::Sampler => ("sampler", "Sampler", Sample),
        };
        InstrumentDescriptor {
            id,
            name,
            synthesis,
        }
    }

    /// Synthesis strategy.
    pub const fn synthesis(self) -> Synthesis {
        self.descriptor().synthesis
    }

    /// Built-in settings for this instrument.
    pub fn default_settings(self) -> VoiceSettings {
        let base = VoiceSettings::new();
        match self {
            Self::Kick => VoiceSettings {
                detune: 8.0,
                ..base.with_adsr(Adsr::new(0.005, 0.4, 0.0, 0.15))
            },
            Self::Snare => VoiceSettings {
                filter_cutoff: 5000.0,
                noise_level: 0.8,
                ..base.with_adsr(Adsr::new(0.002, 0.18, 0.0, 0.12))
            },
            Self::Rimshot => VoiceSettings {
                filter_cutoff: 6000.0,
                noise_level: 0.5,
                ..base.with_adsr(Adsr::new(0.001, 0.06, 0.0, 0.05))
            },
            Self::HiHat => VoiceSettings {
                filter_cutoff: 7000.0,
                ..base.with_adsr(Adsr::new(0.001, 0.05, 0.0, 0.03))
            },
            Self::Cymbal => VoiceSettings {
                filter_cutoff: 5000.0,
                ..base.with_adsr(Adsr::new(0.002, 1.2, 0.0, 0.8))
            },
            Self::Tom => base.with_adsr(Adsr::new(0.003, 0.35, 0.0, 0.2)),
            Self::Clap => VoiceSettings {
                filter_cutoff: 1000.0,
                ..base.with_adsr(Adsr::new(0.001, 0.12, 0.0, 0.1))
            },
            Self::Shaker => VoiceSettings {
                filter_cutoff: 4000.0,
                ..base.with_adsr(Adsr::new(0.01, 0.08, 0.0, 0.05))
            },
            Self::Organ => VoiceSettings {
                detune: 4.0,
                ..base.with_adsr(Adsr::new(0.01, 0.6, 0.7, 0.4))
            },
            Self::Wavetable(drum) => base.with_base_pitch(drum.base_pitch()),
            Self::Sampler => base.with_adsr(Adsr::new(0.002, 1.0, 1.0, 0.2)),
        }
    }
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for InstrumentKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.id().eq_ignore_ascii_case(s))
            .ok_or(ParseKindError)
    }
}

/// Unknown instrument or drum identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseKindError;

impl fmt::Display for ParseKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown instrument identifier")
    }
}

impl core::error::Error for ParseKindError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_and_are_unique() {
        for kind in InstrumentKind::ALL {
            assert_eq!(kind.id().parse::<InstrumentKind>(), Ok(kind));
        }
        let mut ids: Vec<_> = InstrumentKind::ALL.iter().map(|k| k.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), InstrumentKind::ALL.len());
    }

    #[test]
    fn drum_base_pitches_follow_gm_map() {
        assert_eq!(DrumKind::Kick.base_pitch(), 36.0);
        assert_eq!(DrumKind::ClosedHat.base_pitch(), 42.0);
        assert_eq!(
            InstrumentKind::Wavetable(DrumKind::Snare)
                .default_settings()
                .base_pitch,
            38.0
        );
    }

    #[test]
    fn kick_defaults_match_reference_envelope() {
        let s = InstrumentKind::Kick.default_settings();
        assert_eq!(s.adsr, Adsr::new(0.005, 0.4, 0.0, 0.15));
        assert_eq!(s.base_pitch, 60.0);
    }

    #[test]
    fn unknown_id_is_an_error() {
        assert_eq!("cowbell".parse::<InstrumentKind>(), Err(ParseKindError));
        assert_eq!("Closed-Hat".parse::<DrumKind>(), Ok(DrumKind::ClosedHat));
    }

    #[test]
    fn every_kind_has_a_synthesis_strategy() {
        let tables = InstrumentKind::ALL
            .iter()
            .filter(|k| k.synthesis() == Synthesis::Wavetable)
            .count();
        assert_eq!(tables, DrumKind::ALL.len());
        assert_eq!(InstrumentKind::Sampler.synthesis(), Synthesis::Sample);
    }
}
