//! The versioned default-settings table.
//!
//! One table, loaded once at startup, holds the starting [`VoiceSettings`] of
//! every instrument. Every field in a table entry is optional, and resolution
//! is a null-coalescing chain: the entry's value if present, else the
//! instrument's built-in value, else the generic voice default.
//!
//! # TOML Format
//!
//! ```toml
//! version = 1
//!
//! [instruments.kick]
//! attack = 0.005
//! decay = 0.4
//! sustain = 0.0
//! release = 0.15
//! detune = 8.0
//!
//! [instruments.organ]
//! drawbars = [8.0, 8.0, 6.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
//!
//! [instruments.wavetable-snare]
//! sample_name = "tight"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tambor_synth::{
    DRAWBAR_COUNT, InstrumentKind, SampleSelection, SettingsPatch, VoiceSettings,
};

use crate::error::{ConfigError, FileOp, Result};
use crate::validation::{ValidationError, validate_table};

/// Table format version written by this build.
pub const CURRENT_VERSION: u32 = 1;

fn current_version() -> u32 {
    CURRENT_VERSION
}

/// Optional overrides for one instrument.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InstrumentDefaults {
    /// Attack time in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack: Option<f32>,
    /// Decay time in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decay: Option<f32>,
    /// Sustain level, 0..=1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sustain: Option<f32>,
    /// Release time in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<f32>,
    /// Detune in cents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detune: Option<f32>,
    /// Filter cutoff in Hz.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_cutoff: Option<f32>,
    /// Resonance, 0..=1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resonance: Option<f32>,
    /// Noise level, 0..=1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise_level: Option<f32>,
    /// Drawbar levels; a shorter list only sets the leading drawbars.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drawbars: Option<Vec<f32>>,
    /// Untransposed MIDI pitch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_pitch: Option<f32>,
    /// Table index; ignored when `sample_name` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_index: Option<usize>,
    /// Table name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_name: Option<String>,
    /// Trim start in source samples.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_point: Option<usize>,
    /// Trim end in source samples.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_point: Option<usize>,
    /// Loop between the trim points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub looping: Option<bool>,
}

impl InstrumentDefaults {
    /// Entry with every field taken from `settings`.
    pub fn from_settings(settings: &VoiceSettings) -> Self {
        let (sample_index, sample_name) = match &settings.selected_sample {
            SampleSelection::Index(i) => (Some(*i), None),
            SampleSelection::Name(name) => (None, Some(name.clone())),
        };
        Self {
            attack: Some(settings.adsr.attack),
            decay: Some(settings.adsr.decay),
            sustain: Some(settings.adsr.sustain),
            release: Some(settings.adsr.release),
            detune: Some(settings.detune),
            filter_cutoff: Some(settings.filter_cutoff),
            resonance: Some(settings.resonance),
            noise_level: Some(settings.noise_level),
            drawbars: Some(settings.drawbars.to_vec()),
            base_pitch: Some(settings.base_pitch),
            sample_index,
            sample_name,
            start_point: settings.start_point,
            end_point: settings.end_point,
            looping: Some(settings.looping),
        }
    }

    /// Patch that applies the present fields on top of `base`.
    pub fn patch(&self, base: &VoiceSettings) -> SettingsPatch {
        let mut patch = SettingsPatch::new();
        patch.attack = self.attack;
        patch.decay = self.decay;
        patch.sustain = self.sustain;
        patch.release = self.release;
        patch.detune = self.detune;
        patch.filter_cutoff = self.filter_cutoff;
        patch.resonance = self.resonance;
        patch.noise_level = self.noise_level;
        patch.base_pitch = self.base_pitch;
        patch.looping = self.looping;

        if let Some(levels) = &self.drawbars {
            let mut bars = base.drawbars;
            for (dst, src) in bars.iter_mut().zip(levels.iter().take(DRAWBAR_COUNT)) {
                *dst = *src;
            }
            patch.drawbars = Some(bars);
        }
        patch.selected_sample = match (&self.sample_name, self.sample_index) {
            (Some(name), _) => Some(SampleSelection::Name(name.clone())),
            (None, Some(index)) => Some(SampleSelection::Index(index)),
            (None, None) => None,
        };
        if self.start_point.is_some() {
            patch.start_point = Some(self.start_point);
        }
        if self.end_point.is_some() {
            patch.end_point = Some(self.end_point);
        }
        patch
    }

    /// `base` with the present fields merged in.
    pub fn resolve(&self, base: &VoiceSettings) -> VoiceSettings {
        base.merged(&self.patch(base))
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Default settings for every instrument, keyed by instrument id.
///
/// ```rust
/// use tambor_config::DefaultsTable;
/// use tambor_synth::InstrumentKind;
///
/// let table = DefaultsTable::from_toml("[instruments.kick]\ndecay = 0.8\n").unwrap();
/// let kick = table.settings_for(InstrumentKind::Kick);
/// assert_eq!(kick.adsr.decay, 0.8);
/// assert_eq!(kick.detune, 8.0); // built-in kick value
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DefaultsTable {
    /// Format version.
    #[serde(default = "current_version")]
    pub version: u32,

    /// Entries keyed by [`InstrumentKind::id`].
    #[serde(default)]
    pub instruments: BTreeMap<String, InstrumentDefaults>,
}

impl DefaultsTable {
    /// Empty table at the current version; every instrument uses built-ins.
    pub fn new() -> Self {
        Self {
            version: CURRENT_VERSION,
            instruments: BTreeMap::new(),
        }
    }

    /// Fully populated table of the built-in settings.
    pub fn factory() -> Self {
        let instruments = InstrumentKind::ALL
            .into_iter()
            .map(|kind| {
                let entry = InstrumentDefaults::from_settings(&kind.default_settings());
                (kind.id().to_string(), entry)
            })
            .collect();
        Self {
            version: CURRENT_VERSION,
            instruments,
        }
    }

    /// Load a table from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::io(FileOp::Read, path, e))?;
        let table = Self::from_toml(&content)?;
        tracing::info!(
            path = %path.display(),
            version = table.version,
            entries = table.instruments.len(),
            "loaded defaults table"
        );
        Ok(table)
    }

    /// Parse a table from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let table: Self = toml::from_str(toml_str)?;
        table.check_version()?;
        Ok(table)
    }

    /// Save the table to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::io(FileOp::CreateDir, parent, e))?;
        }
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::io(FileOp::Write, path, e))?;
        tracing::debug!(path = %path.display(), "saved defaults table");
        Ok(())
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject tables from a newer release; warn about older ones.
    pub fn check_version(&self) -> Result<()> {
        if self.version > CURRENT_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: self.version,
                supported: CURRENT_VERSION,
            });
        }
        if self.version < CURRENT_VERSION {
            tracing::warn!(
                found = self.version,
                current = CURRENT_VERSION,
                "defaults table predates the current format; missing fields use built-ins"
            );
        }
        Ok(())
    }

    /// Entry for `kind`, if the table has one.
    pub fn get(&self, kind: InstrumentKind) -> Option<&InstrumentDefaults> {
        self.instruments.get(kind.id())
    }

    /// Replace the entry for `kind`.
    pub fn set(&mut self, kind: InstrumentKind, entry: InstrumentDefaults) {
        self.instruments.insert(kind.id().to_string(), entry);
    }

    /// Settings for `kind`: table entry, then built-in, then generic default.
    pub fn settings_for(&self, kind: InstrumentKind) -> VoiceSettings {
        let base = kind.default_settings();
        match self.get(kind) {
            Some(entry) => entry.resolve(&base),
            None => base,
        }
    }

    /// Settings for the instrument with id `id`.
    pub fn settings_for_id(&self, id: &str) -> Result<VoiceSettings> {
        let kind: InstrumentKind = id
            .parse()
            .map_err(|_| ConfigError::UnknownInstrument(id.to_string()))?;
        Ok(self.settings_for(kind))
    }

    /// Resolved settings for every instrument.
    ///
    /// Entries whose key is not an instrument id are skipped with a warning.
    pub fn resolve_all(&self) -> BTreeMap<InstrumentKind, VoiceSettings> {
        for id in self.instruments.keys() {
            if id.parse::<InstrumentKind>().is_err() {
                tracing::warn!(id = %id, "ignoring defaults for unknown instrument");
            }
        }
        InstrumentKind::ALL
            .into_iter()
            .map(|kind| (kind, self.settings_for(kind)))
            .collect()
    }

    /// Check every entry, collecting all problems.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        let mut errors = validate_table(self);
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ValidationError::Multiple(errors)),
        }
    }
}

impl Default for DefaultsTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tambor_synth::{Adsr, DrumKind};

    #[test]
    fn factory_covers_every_instrument() {
        let table = DefaultsTable::factory();
        assert_eq!(table.instruments.len(), InstrumentKind::ALL.len());
        for kind in InstrumentKind::ALL {
            assert_eq!(table.settings_for(kind), kind.default_settings(), "{kind}");
        }
    }

    #[test]
    fn empty_table_falls_back_to_built_ins() {
        let table = DefaultsTable::new();
        let snare = table.settings_for(InstrumentKind::Snare);
        assert_eq!(snare, InstrumentKind::Snare.default_settings());
    }

    #[test]
    fn partial_entry_coalesces_per_field() {
        let table = DefaultsTable::from_toml(
            r#"
            [instruments.hihat]
            release = 0.2
            "#,
        )
        .unwrap();
        let hat = table.settings_for(InstrumentKind::HiHat);
        let builtin = InstrumentKind::HiHat.default_settings();
        assert_eq!(hat.adsr.release, 0.2);
        assert_eq!(hat.adsr.attack, builtin.adsr.attack);
        assert_eq!(hat.filter_cutoff, builtin.filter_cutoff);
    }

    #[test]
    fn missing_version_means_current() {
        let table = DefaultsTable::from_toml("").unwrap();
        assert_eq!(table.version, CURRENT_VERSION);
        assert!(table.instruments.is_empty());
    }

    #[test]
    fn newer_version_is_rejected() {
        let err = DefaultsTable::from_toml("version = 99").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsupportedVersion { found: 99, supported: CURRENT_VERSION }
        ));
    }

    #[test]
    fn older_version_still_loads() {
        let table = DefaultsTable::from_toml("version = 0\n[instruments.tom]\ndecay = 0.5\n");
        assert_eq!(table.unwrap().settings_for(InstrumentKind::Tom).adsr.decay, 0.5);
    }

    #[test]
    fn short_drawbar_list_sets_leading_bars() {
        let entry = InstrumentDefaults {
            drawbars: Some(vec![2.0, 4.0]),
            ..Default::default()
        };
        let base = InstrumentKind::Organ.default_settings();
        let organ = entry.resolve(&base);
        assert_eq!(organ.drawbars[0], 2.0);
        assert_eq!(organ.drawbars[1], 4.0);
        assert_eq!(organ.drawbars[2..], base.drawbars[2..]);
    }

    #[test]
    fn sample_name_wins_over_index() {
        let entry = InstrumentDefaults {
            sample_index: Some(2),
            sample_name: Some("tight".into()),
            ..Default::default()
        };
        let base = InstrumentKind::Wavetable(DrumKind::Snare).default_settings();
        assert_eq!(
            entry.resolve(&base).selected_sample,
            SampleSelection::Name("tight".into())
        );
    }

    #[test]
    fn out_of_range_values_are_clamped_on_resolve() {
        let entry = InstrumentDefaults {
            sustain: Some(3.0),
            attack: Some(-1.0),
            ..Default::default()
        };
        let s = entry.resolve(&VoiceSettings::default());
        assert_eq!(s.adsr.sustain, 1.0);
        assert_eq!(s.adsr.attack, 0.0);
    }

    #[test]
    fn from_settings_round_trips_through_resolve() {
        let settings = VoiceSettings::default()
            .with_adsr(Adsr::new(0.01, 0.2, 0.3, 0.4))
            .merged(&SettingsPatch::new().start_point(Some(10)).looping(true));
        let entry = InstrumentDefaults::from_settings(&settings);
        assert_eq!(entry.resolve(&VoiceSettings::default()), settings);
        assert!(!entry.is_empty());
        assert!(InstrumentDefaults::default().is_empty());
    }

    #[test]
    fn unknown_id_lookup_fails() {
        let table = DefaultsTable::factory();
        assert!(matches!(
            table.settings_for_id("cowbell"),
            Err(ConfigError::UnknownInstrument(_))
        ));
        assert!(table.settings_for_id("clap").is_ok());
    }
}
