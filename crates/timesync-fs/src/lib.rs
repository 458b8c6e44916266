//! Filesystem layer for timesync
//!
//! Reads and writes the creation, modification and access timestamps of
//! single files, lists directories, and normalises user-supplied paths.

pub mod error;
pub mod listing;
pub mod path;
pub mod times;

pub use error::{Error, Result};
pub use listing::{DirEntryInfo, list_dir};
pub use path::{match_stem, normalize_input};
pub use times::{FileTimes, TimeField, read_times, write_times};
