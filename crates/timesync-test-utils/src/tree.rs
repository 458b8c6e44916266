//! [`TestTree`] builder for timestamp synchronisation scenarios.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use filetime::FileTime;
use tempfile::TempDir;

/// Build a UTC instant, panicking on invalid input.
pub fn utc(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
        .single()
        .expect("utc: invalid date")
}

/// Modification and access time as stored on disk.
///
/// Creation time is left out: most Unix filesystems cannot set it, so
/// tests compare the two fields every platform supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskTimes {
    pub modified: FileTime,
    pub accessed: FileTime,
}

impl DiskTimes {
    /// Stat `path` without opening it.
    pub fn of(path: &Path) -> Self {
        let metadata = fs::metadata(path).expect("DiskTimes::of: stat failed");
        Self {
            modified: FileTime::from_last_modification_time(&metadata),
            accessed: FileTime::from_last_access_time(&metadata),
        }
    }

    pub fn modified_utc(&self) -> DateTime<Utc> {
        to_utc(self.modified)
    }

    pub fn accessed_utc(&self) -> DateTime<Utc> {
        to_utc(self.accessed)
    }
}

fn to_utc(time: FileTime) -> DateTime<Utc> {
    DateTime::from_timestamp(time.unix_seconds(), time.nanoseconds())
        .expect("timestamp out of range")
}

fn to_file_time(at: DateTime<Utc>) -> FileTime {
    FileTime::from_unix_time(at.timestamp(), at.timestamp_subsec_nanos())
}

/// A temporary directory holding target and reference files.
///
/// # Example
///
/// ```rust,no_run
/// use timesync_test_utils::{TestTree, utc};
///
/// let tree = TestTree::new();
/// tree.file_at("reference/a.raw", utc(2024, 5, 1, 10, 0, 0));
/// tree.file_at("target/a.jpg", utc(2024, 6, 1, 10, 0, 0));
/// let before = tree.snapshot();
/// ```
pub struct TestTree {
    temp_dir: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `rel` inside the tree.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Create a directory (and parents).
    pub fn dir(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Create a file whose modification and access time are both `at`.
    pub fn file_at(&self, rel: &str, at: DateTime<Utc>) -> PathBuf {
        self.file_with(rel, at, at)
    }

    /// Create a file with distinct modification and access times.
    pub fn file_with(
        &self,
        rel: &str,
        modified: DateTime<Utc>,
        accessed: DateTime<Utc>,
    ) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, rel.as_bytes()).unwrap();
        filetime::set_file_times(&path, to_file_time(accessed), to_file_time(modified))
            .expect("TestTree::file_with: failed to set times");
        path
    }

    /// Make `path` read-only.
    ///
    /// Returns `false` when the file can still be opened for writing, as it
    /// can for a privileged user; callers should skip permission checks then.
    pub fn make_read_only(&self, path: &Path) -> bool {
        let mut permissions = fs::metadata(path).unwrap().permissions();
        permissions.set_readonly(true);
        fs::set_permissions(path, permissions).unwrap();
        fs::OpenOptions::new().write(true).open(path).is_err()
    }

    /// Stored times of every regular file below the root, keyed by
    /// relative path.
    pub fn snapshot(&self) -> BTreeMap<PathBuf, DiskTimes> {
        let mut out = BTreeMap::new();
        collect(self.root(), self.root(), &mut out);
        out
    }
}

fn collect(root: &Path, dir: &Path, out: &mut BTreeMap<PathBuf, DiskTimes>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(root, &path, out);
        } else {
            let rel = path.strip_prefix(root).unwrap().to_path_buf();
            out.insert(rel, DiskTimes::of(&path));
        }
    }
}
