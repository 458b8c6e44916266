//! Error types for timesync-fs

use std::path::PathBuf;

/// Result type for timesync-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in timesync-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Opening the file or reading/writing its timestamps failed
    #[error("Cannot access timestamps of {path}: {source}")]
    Access {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was readable but its timestamps could not be written
    #[error("Permission denied writing timestamps of {path}: {source}")]
    Permission {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A directory could not be enumerated
    #[error("Failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A native timestamp falls outside the representable range
    #[error("Timestamp of {path} is out of range")]
    TimestampOutOfRange { path: PathBuf },
}

impl Error {
    pub fn access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Access {
            path: path.into(),
            source,
        }
    }

    /// Classify a failure on the write handle.
    ///
    /// `PermissionDenied` becomes [`Error::Permission`], anything else
    /// stays an access failure.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            Self::Permission {
                path: path.into(),
                source,
            }
        } else {
            Self::access(path, source)
        }
    }

    pub fn directory_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryRead {
            path: path.into(),
            source,
        }
    }

    /// The path this error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Access { path, .. }
            | Self::Permission { path, .. }
            | Self::DirectoryRead { path, .. }
            | Self::TimestampOutOfRange { path } => path,
        }
    }
}
