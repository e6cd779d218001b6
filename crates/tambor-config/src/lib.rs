//! Default-settings configuration for tambor instruments.
//!
//! This crate owns the one explicit, versioned table of starting settings for
//! every instrument, independent of any UI. A host loads it once at startup
//! and resolves [`VoiceSettings`](tambor_synth::VoiceSettings) from it when
//! building voices.
//!
//! # Features
//!
//! - **Defaults table**: TOML load/save with a format version
//! - **Null-coalescing resolution**: table entry, then built-in, then generic
//! - **Validation**: every out-of-range field reported, not just the first
//! - **Factory table**: the built-in settings as a complete table
//!
//! # Example
//!
//! ```rust,no_run
//! use tambor_config::DefaultsTable;
//! use tambor_synth::{DrumVoice, InstrumentKind};
//!
//! let table = DefaultsTable::load("defaults.toml").unwrap_or_else(|_| DefaultsTable::factory());
//! let settings = table.settings_for(InstrumentKind::Snare);
//! let voice = DrumVoice::new(InstrumentKind::Snare, settings, 48000.0);
//! ```

mod defaults;
mod error;

/// Defaults-table validation.
pub mod validation;

pub use defaults::{CURRENT_VERSION, DefaultsTable, InstrumentDefaults};
pub use error::{ConfigError, FileOp, Result};
pub use validation::{ValidationError, ValidationResult, validate_entry, validate_table};
