//! Non-recursive directory listing

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    /// Full path of the entry
    pub path: PathBuf,
    /// File name as UTF-8 (lossy)
    pub name: String,
    /// Whether the entry is a directory (symlinks are followed)
    pub is_dir: bool,
}

/// List the immediate children of `dir`, sorted by file name.
pub fn list_dir(dir: &Path) -> Result<Vec<DirEntryInfo>> {
    let read_dir = fs::read_dir(dir).map_err(|e| Error::directory_read(dir, e))?;

    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| Error::directory_read(dir, e))?;
        let path = entry.path();
        // `Path::is_dir` follows symlinks, unlike `DirEntry::file_type`
        let is_dir = path.is_dir();
        entries.push(DirEntryInfo {
            name: entry.file_name().to_string_lossy().into_owned(),
            path,
            is_dir,
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::debug!(dir = %dir.display(), count = entries.len(), "Listed directory");
    Ok(entries)
}
