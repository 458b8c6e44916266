//! Error types for timesync-core

use std::path::PathBuf;

use crate::sync::PathKind;

/// Result type for timesync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Which side of the synchronisation a path belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRole {
    Target,
    Reference,
}

impl std::fmt::Display for PathRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Target => write!(f, "Target"),
            Self::Reference => write!(f, "Reference"),
        }
    }
}

/// Errors that can occur in timesync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A root path does not exist
    #[error("{role} path does not exist: {path}")]
    PathNotFound { path: PathBuf, role: PathRole },

    /// One root is a file and the other a directory
    #[error("Target {target} is a {target_kind} but reference {reference} is a {reference_kind}")]
    MismatchedPathType {
        target: PathBuf,
        reference: PathBuf,
        target_kind: PathKind,
        reference_kind: PathKind,
    },

    /// A supplied value is outside its allowed range
    #[error("Invalid value: {message}")]
    Validation { message: String },

    /// An explicitly requested configuration file is missing
    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// A configuration file is not valid TOML for the settings schema
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Filesystem error from timesync-fs
    #[error(transparent)]
    Fs(#[from] timesync_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Whether a directory sync records this error against one file and
    /// moves on, rather than aborting.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Self::Fs(
                timesync_fs::Error::Access { .. }
                    | timesync_fs::Error::Permission { .. }
                    | timesync_fs::Error::TimestampOutOfRange { .. }
            )
        )
    }
}
