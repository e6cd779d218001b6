//! Wavetable playback of pre-resampled drum samples.
//!
//! Tables are built offline: every source sample is resampled once to the
//! bank rate and kept at full length. Nothing is normalised, truncated or
//! resized at playback time, so one-shot timing is exactly that of the source.
//!
//! Playback reads a fractional cursor with linear interpolation between
//! `floor(cursor)` and `floor(cursor) + 1` (clamped to the table end) and
//! advances it by
//!
//! ```text
//! step = 2^((pitch - base_pitch) / 12) * table_rate / sample_rate
//! ```
//!
//! At `pitch == base_pitch` with matching rates the step is exactly 1 and the
//! table is reproduced sample for sample.

use crate::kind::DrumKind;
use crate::retrigger::RetriggerCrossfader;
use crate::settings::{Adsr, SampleSelection, SettingsPatch, VoiceSettings};
use crate::voice::{Voice, sanitize_pitch, sanitize_sample_rate, sanitize_velocity};
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use libm::floor;
use tambor_core::pitch_ratio;

/// Rate tables are resampled to unless a bank says otherwise.
pub const DEFAULT_TABLE_RATE: f32 = 44100.0;

/// Named, immutable sample buffer.
///
/// Cloning shares the samples.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedTable {
    name: String,
    samples: Arc<[f32]>,
}

impl NamedTable {
    /// Wrap samples under a name.
    pub fn new(name: impl Into<String>, samples: impl Into<Arc<[f32]>>) -> Self {
        Self {
            name: name.into(),
            samples: samples.into(),
        }
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Table samples.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Shared handle to the samples.
    pub fn shared(&self) -> Arc<[f32]> {
        Arc::clone(&self.samples)
    }

    /// Length in samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the table holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Tables grouped by drum sub-type, all at one sample rate.
#[derive(Debug, Clone, Default)]
pub struct WavetableBank {
    rate: f32,
    tables: BTreeMap<DrumKind, Vec<NamedTable>>,
}

impl WavetableBank {
    /// Empty bank at `rate`.
    pub fn new(rate: f32) -> Self {
        Self {
            rate: sanitize_sample_rate(rate),
            tables: BTreeMap::new(),
        }
    }

    /// Sample rate of every table in the bank.
    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Add a table for `drum`, keeping insertion order.
    pub fn insert(&mut self, drum: DrumKind, table: NamedTable) {
        self.tables.entry(drum).or_default().push(table);
    }

    /// Tables for `drum`, in insertion order.
    pub fn tables(&self, drum: DrumKind) -> &[NamedTable] {
        self.tables.get(&drum).map_or(&[], Vec::as_slice)
    }

    /// Drum types that have at least one table.
    pub fn kinds(&self) -> impl Iterator<Item = DrumKind> + '_ {
        self.tables.keys().copied()
    }

    /// Total number of tables.
    pub fn len(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    /// True when the bank holds no tables.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Index of the table `selection` names, if present.
pub fn resolve_selection(tables: &[NamedTable], selection: &SampleSelection) -> Option<usize> {
    match selection {
        SampleSelection::Index(i) => (*i < tables.len()).then_some(*i),
        SampleSelection::Name(name) => tables.iter().position(|t| t.name == *name),
    }
}

/// Linear interpolation at a fractional position, clamped to the last sample.
#[inline]
pub(crate) fn interpolate(samples: &[f32], position: f64) -> f32 {
    let last = samples.len() - 1;
    let index = (floor(position) as usize).min(last);
    let next = (index + 1).min(last);
    let frac = (position - index as f64) as f32;
    let a = samples[index];
    if frac <= 0.0 || next == index {
        a
    } else {
        a + (samples[next] - a) * frac
    }
}

/// One-shot table player for a single drum sub-type.
#[derive(Debug, Clone)]
pub struct WavetableVoice {
    drum: DrumKind,
    tables: Vec<NamedTable>,
    table_rate: f32,
    settings: VoiceSettings,
    current: Option<usize>,
    cursor: f64,
    step: f64,
    velocity: f32,
    crossfader: RetriggerCrossfader,
    sample_rate: f32,
    active: bool,
}

impl WavetableVoice {
    /// Voice over `tables` recorded at `table_rate`.
    pub fn new(
        drum: DrumKind,
        tables: Vec<NamedTable>,
        table_rate: f32,
        settings: VoiceSettings,
        sample_rate: f32,
    ) -> Self {
        let sample_rate = sanitize_sample_rate(sample_rate);

        #[cfg(feature = "tracing")]
        tracing::debug!(drum = drum.id(), tables = tables.len(), "wavetable voice constructed");

        Self {
            drum,
            tables,
            table_rate: sanitize_sample_rate(table_rate),
            settings,
            current: None,
            cursor: 0.0,
            step: 1.0,
            velocity: 0.0,
            crossfader: RetriggerCrossfader::new(sample_rate),
            sample_rate,
            active: false,
        }
    }

    /// Voice over the bank's tables for `drum`.
    pub fn from_bank(
        drum: DrumKind,
        bank: &WavetableBank,
        settings: VoiceSettings,
        sample_rate: f32,
    ) -> Self {
        Self::new(drum, bank.tables(drum).to_vec(), bank.rate(), settings, sample_rate)
    }

    /// Voice with no tables yet; it plays silence.
    pub fn empty(drum: DrumKind, settings: VoiceSettings, sample_rate: f32) -> Self {
        Self::new(drum, Vec::new(), DEFAULT_TABLE_RATE, settings, sample_rate)
    }

    /// Drum sub-type.
    pub fn drum(&self) -> DrumKind {
        self.drum
    }

    /// Tables available to this voice.
    pub fn tables(&self) -> &[NamedTable] {
        &self.tables
    }

    /// Swap in a new table set. Playback of the current note stops.
    ///
    /// This drops the old tables, so call it from the control side.
    pub fn set_tables(&mut self, tables: Vec<NamedTable>, table_rate: f32) {
        self.tables = tables;
        self.table_rate = sanitize_sample_rate(table_rate);
        self.current = None;
        self.active = false;
        self.crossfader.reset();
    }

    /// Table the current note plays, if any.
    pub fn current_table(&self) -> Option<&NamedTable> {
        self.current.and_then(|i| self.tables.get(i))
    }

    /// Fractional read position in table samples.
    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    /// Cursor advance per output sample.
    pub fn step(&self) -> f64 {
        self.step
    }
}

impl Voice for WavetableVoice {
    fn trigger(&mut self, velocity: f32, pitch: f32, _adsr: Option<Adsr>) {
        let was_active = self.active;
        let pitch = sanitize_pitch(pitch, self.settings.base_pitch);
        self.velocity = sanitize_velocity(velocity);
        self.current = resolve_selection(&self.tables, &self.settings.selected_sample);
        self.step = f64::from(pitch_ratio(pitch, self.settings.base_pitch))
            * (f64::from(self.table_rate) / f64::from(self.sample_rate));
        self.cursor = self.settings.start_point.unwrap_or(0) as f64;
        self.crossfader.trigger(was_active);
        self.active = true;
    }

    fn process(&mut self) -> f32 {
        if !self.active {
            return 0.0;
        }

        let Some(table) = self.current.and_then(|i| self.tables.get(i)) else {
            self.active = false;
            return 0.0;
        };
        let samples = table.samples();
        if samples.is_empty() || self.cursor >= samples.len() as f64 {
            self.active = false;
            self.crossfader.reset();
            return 0.0;
        }

        let raw = interpolate(samples, self.cursor) * self.velocity;
        self.cursor += self.step;
        self.crossfader.process(raw)
    }

    fn update_settings(&mut self, patch: SettingsPatch) {
        let reselect = patch.selected_sample.is_some();
        self.settings.apply(patch);
        if reselect && !self.active {
            self.current = resolve_selection(&self.tables, &self.settings.selected_sample);
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
