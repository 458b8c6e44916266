//! Reading and writing the timestamp triple of a single file
//!
//! Every call opens its own handle and releases it before returning, on
//! success and on every error path alike. No handle outlives a call.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use filetime::FileTime;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Whether [`write_times`] can set the creation time on this platform.
pub const CREATION_TIME_SETTABLE: bool = cfg!(any(windows, target_os = "macos"));

/// One of the three timestamps tracked per file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeField {
    Created,
    Modified,
    Accessed,
}

impl TimeField {
    pub const ALL: [TimeField; 3] = [Self::Created, Self::Modified, Self::Accessed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Accessed => "accessed",
        }
    }
}

impl std::fmt::Display for TimeField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Creation, modification and access time of a file.
///
/// Always fully populated. Transformations return a new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileTimes {
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
    accessed: DateTime<Utc>,
}

impl FileTimes {
    pub fn new(created: DateTime<Utc>, modified: DateTime<Utc>, accessed: DateTime<Utc>) -> Self {
        Self {
            created,
            modified,
            accessed,
        }
    }

    /// A triple with the same instant in all three fields.
    pub fn uniform(at: DateTime<Utc>) -> Self {
        Self::new(at, at, at)
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    pub fn accessed(&self) -> DateTime<Utc> {
        self.accessed
    }

    pub fn get(&self, field: TimeField) -> DateTime<Utc> {
        match field {
            TimeField::Created => self.created,
            TimeField::Modified => self.modified,
            TimeField::Accessed => self.accessed,
        }
    }

    /// Apply `f` to each field independently.
    pub fn map(&self, f: impl Fn(DateTime<Utc>) -> DateTime<Utc>) -> Self {
        Self::new(f(self.created), f(self.modified), f(self.accessed))
    }
}

fn open_options(write: bool) -> OpenOptions {
    let mut options = OpenOptions::new();
    if write {
        options.write(true);
    } else {
        options.read(true);
    }

    #[cfg(windows)]
    {
        use std::os::windows::fs::OpenOptionsExt;

        const FILE_SHARE_READ: u32 = 0x0000_0001;
        const FILE_SHARE_WRITE: u32 = 0x0000_0002;
        const FILE_SHARE_DELETE: u32 = 0x0000_0004;
        options.share_mode(FILE_SHARE_READ | FILE_SHARE_WRITE | FILE_SHARE_DELETE);
    }

    options
}

fn to_datetime(path: &Path, time: FileTime) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(time.unix_seconds(), time.nanoseconds()).ok_or_else(|| {
        Error::TimestampOutOfRange {
            path: path.to_path_buf(),
        }
    })
}

/// Read the timestamp triple of `path`.
///
/// When the filesystem does not record a creation time, the modification
/// time stands in for it.
pub fn read_times(path: &Path) -> Result<FileTimes> {
    let file: File = open_options(false)
        .open(path)
        .map_err(|e| Error::access(path, e))?;
    let metadata = file.metadata().map_err(|e| Error::access(path, e))?;

    let modified = to_datetime(path, FileTime::from_last_modification_time(&metadata))?;
    let accessed = to_datetime(path, FileTime::from_last_access_time(&metadata))?;
    let created = match FileTime::from_creation_time(&metadata) {
        Some(time) => to_datetime(path, time)?,
        None => {
            tracing::debug!(
                path = %path.display(),
                "No creation time recorded, using modification time"
            );
            modified
        }
    };

    Ok(FileTimes::new(created, modified, accessed))
}

/// Write the timestamp triple to `path` in one call on one handle.
///
/// The creation time is only applied where [`CREATION_TIME_SETTABLE`] holds.
pub fn write_times(path: &Path, times: &FileTimes) -> Result<()> {
    let file: File = open_options(true)
        .open(path)
        .map_err(|e| Error::write(path, e))?;

    let native = fs::FileTimes::new()
        .set_accessed(SystemTime::from(times.accessed()))
        .set_modified(SystemTime::from(times.modified()));

    #[cfg(windows)]
    let native = {
        use std::os::windows::fs::FileTimesExt;
        native.set_created(SystemTime::from(times.created()))
    };

    #[cfg(target_os = "macos")]
    let native = {
        use std::os::macos::fs::FileTimesExt;
        native.set_created(SystemTime::from(times.created()))
    };

    file.set_times(native).map_err(|e| Error::write(path, e))?;
    tracing::debug!(path = %path.display(), "Wrote timestamps");
    Ok(())
}
