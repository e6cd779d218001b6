//! Audio file I/O for tambor.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`read_wav`] and [`write_wav`] for loading and saving mono audio
//! - **Resampling**: [`resample_linear`] converts a buffer to another rate once, offline
//! - **Wavetable banks**: [`load_bank`] builds a [`WavetableBank`](tambor_synth::WavetableBank)
//!   from a directory of WAV files
//!
//! Nothing here runs on the audio thread. Banks and sample buffers are built
//! up front and handed to voices as shared, immutable slices.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tambor_io::{load_bank, write_wav, WavSpec};
//! use tambor_synth::{DrumKind, DrumVoice, InstrumentKind, Voice};
//!
//! let bank = load_bank("kits/808", 44100.0)?;
//! let settings = InstrumentKind::Wavetable(DrumKind::Kick).default_settings();
//! let mut kick = DrumVoice::wavetable(DrumKind::Kick, &bank, settings, 44100.0);
//!
//! kick.trigger(1.0, 36.0, None);
//! let mut out = vec![0.0; 44100];
//! kick.process_block(&mut out);
//! write_wav("kick.wav", &out, WavSpec { sample_rate: 44100, ..Default::default() })?;
//! # Ok::<(), tambor_io::Error>(())
//! ```

mod bank;
mod resample;
mod wav;

pub use bank::{drum_for_dir, load_bank, load_tables};
pub use resample::resample_linear;
pub use wav::{BitDepth, SourceInfo, WavSpec, read_wav, write_wav};

use std::path::PathBuf;

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A bank directory held no usable tables.
    #[error("no tables found under '{}'", .0.display())]
    EmptyBank(PathBuf),

    /// A table directory name is not a drum kind.
    #[error("unknown table kind: {0}")]
    UnknownTableKind(String),

    /// The WAV file contains no sample frames.
    #[error("empty audio file: '{}'", .0.display())]
    EmptyFile(PathBuf),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
