//! Defaults-table validation.
//!
//! Resolution clamps bad values silently, so a table with a typo still plays.
//! Validation is the loud counterpart: it reports every field that resolution
//! would have to clamp or ignore, so tools can show the problems to a user.
//!
//! # Example
//!
//! ```rust
//! use tambor_config::{DefaultsTable, validate_table};
//!
//! let table = DefaultsTable::from_toml("[instruments.kick]\nsustain = 1.5\n").unwrap();
//! let errors = validate_table(&table);
//! assert_eq!(errors.len(), 1);
//! ```

use tambor_synth::{DRAWBAR_COUNT, DRAWBAR_MAX, InstrumentKind, MAX_SEGMENT_SECONDS};
use thiserror::Error;

use crate::defaults::{DefaultsTable, InstrumentDefaults};

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Key is not an instrument id.
    #[error("unknown instrument: {0}")]
    UnknownInstrument(String),

    /// Value out of range (or not a number).
    #[error("'{param}' for '{instrument}' is {value}, expected [{min}, {max}]")]
    OutOfRange {
        /// Instrument id.
        instrument: String,
        /// Field name.
        param: &'static str,
        /// Offending value.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// Drawbar list longer than the organ has drawbars.
    #[error("'{instrument}' lists {count} drawbars, at most {max} are used", max = DRAWBAR_COUNT)]
    DrawbarCount {
        /// Instrument id.
        instrument: String,
        /// Number of listed levels.
        count: usize,
    },

    /// Trim start at or after trim end.
    #[error("trim for '{instrument}' is empty: start {start} >= end {end}")]
    InvertedTrim {
        /// Instrument id.
        instrument: String,
        /// Trim start.
        start: usize,
        /// Trim end.
        end: usize,
    },

    /// Several problems at once.
    #[error("{} problems: {}", .0.len(), joined(.0))]
    Multiple(Vec<ValidationError>),
}

fn joined(errors: &[ValidationError]) -> String {
    let mut out = String::new();
    for (i, error) in errors.iter().enumerate() {
        if i > 0 {
            out.push_str("; ");
        }
        out.push_str(&error.to_string());
    }
    out
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn check_range(
    errors: &mut Vec<ValidationError>,
    instrument: &str,
    param: &'static str,
    value: Option<f32>,
    min: f32,
    max: f32,
) {
    if let Some(value) = value
        && !(min..=max).contains(&value)
    {
        errors.push(ValidationError::OutOfRange {
            instrument: instrument.to_string(),
            param,
            value,
            min,
            max,
        });
    }
}

/// Every problem in one table entry.
pub fn validate_entry(instrument: &str, entry: &InstrumentDefaults) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let e = &mut errors;

    check_range(e, instrument, "attack", entry.attack, 0.0, MAX_SEGMENT_SECONDS);
    check_range(e, instrument, "decay", entry.decay, 0.0, MAX_SEGMENT_SECONDS);
    check_range(e, instrument, "sustain", entry.sustain, 0.0, 1.0);
    check_range(e, instrument, "release", entry.release, 0.0, MAX_SEGMENT_SECONDS);
    check_range(e, instrument, "detune", entry.detune, -100.0, 100.0);
    check_range(e, instrument, "filter_cutoff", entry.filter_cutoff, 20.0, 20_000.0);
    check_range(e, instrument, "resonance", entry.resonance, 0.0, 1.0);
    check_range(e, instrument, "noise_level", entry.noise_level, 0.0, 1.0);
    check_range(e, instrument, "base_pitch", entry.base_pitch, 0.0, 127.0);

    if let Some(levels) = &entry.drawbars {
        if levels.len() > DRAWBAR_COUNT {
            e.push(ValidationError::DrawbarCount {
                instrument: instrument.to_string(),
                count: levels.len(),
            });
        }
        for &level in levels.iter().take(DRAWBAR_COUNT) {
            check_range(e, instrument, "drawbars", Some(level), 0.0, DRAWBAR_MAX);
        }
    }

    if let (Some(start), Some(end)) = (entry.start_point, entry.end_point)
        && start >= end
    {
        e.push(ValidationError::InvertedTrim {
            instrument: instrument.to_string(),
            start,
            end,
        });
    }

    errors
}

/// Every problem in a table, in key order.
pub fn validate_table(table: &DefaultsTable) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (id, entry) in &table.instruments {
        if id.parse::<InstrumentKind>().is_err() {
            errors.push(ValidationError::UnknownInstrument(id.clone()));
            continue;
        }
        errors.extend(validate_entry(id, entry));
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_table_is_valid() {
        assert_eq!(validate_table(&DefaultsTable::factory()), Vec::new());
        assert!(DefaultsTable::factory().validate().is_ok());
    }

    #[test]
    fn reports_every_bad_field() {
        let entry = InstrumentDefaults {
            attack: Some(-0.1),
            sustain: Some(1.5),
            drawbars: Some(vec![9.0; 10]),
            start_point: Some(100),
            end_point: Some(100),
            ..Default::default()
        };
        let errors = validate_entry("organ", &entry);
        // attack, sustain, count, nine levels, trim
        assert_eq!(errors.len(), 13);
        assert!(errors.contains(&ValidationError::InvertedTrim {
            instrument: "organ".into(),
            start: 100,
            end: 100,
        }));
    }

    #[test]
    fn nan_is_out_of_range() {
        let entry = InstrumentDefaults {
            decay: Some(f32::NAN),
            ..Default::default()
        };
        let errors = validate_entry("tom", &entry);
        assert!(matches!(
            errors.as_slice(),
            [ValidationError::OutOfRange { param: "decay", .. }]
        ));
    }

    #[test]
    fn unknown_instrument_is_reported() {
        let mut table = DefaultsTable::new();
        table
            .instruments
            .insert("cowbell".into(), InstrumentDefaults::default());
        assert_eq!(
            validate_table(&table),
            vec![ValidationError::UnknownInstrument("cowbell".into())]
        );
    }

    #[test]
    fn multiple_errors_are_joined() {
        let table = DefaultsTable::from_toml(
            "[instruments.kick]\nsustain = 2.0\n[instruments.snare]\nresonance = -1.0\n",
        )
        .unwrap();
        let err = table.validate().unwrap_err();
        let ValidationError::Multiple(errors) = &err else {
            panic!("expected multiple errors, got {err:?}");
        };
        assert_eq!(errors.len(), 2);
        assert!(err.to_string().contains("; "));
    }
}
