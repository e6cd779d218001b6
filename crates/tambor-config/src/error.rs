//! Errors from loading, saving and resolving defaults tables.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Filesystem step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOp {
    /// Reading a table.
    Read,
    /// Writing a table.
    Write,
    /// Creating the table's parent directory.
    CreateDir,
}

impl fmt::Display for FileOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::CreateDir => "create directory",
        })
    }
}

/// Defaults-table error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file or directory operation failed.
    #[error("could not {op} '{}': {source}", .path.display())]
    Io {
        /// What was being done.
        op: FileOp,
        /// Path involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Table text is not valid TOML for a defaults table.
    #[error("invalid defaults table: {0}")]
    Parse(#[from] toml::de::Error),

    /// Table could not be encoded.
    #[error("could not encode defaults table: {0}")]
    Encode(#[from] toml::ser::Error),

    /// Instrument id not in the closed set.
    #[error("unknown instrument: {0}")]
    UnknownInstrument(String),

    /// Table written by a newer release.
    #[error("defaults table version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version found in the file.
        found: u32,
        /// Highest version this build reads.
        supported: u32,
    },

    /// Entries hold out-of-range values.
    #[error("invalid defaults: {0}")]
    Validation(#[from] crate::validation::ValidationError),
}

impl ConfigError {
    pub(crate) fn io(op: FileOp, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Path of the file involved, for filesystem errors.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Result alias for defaults-table operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
