//! Outcome types for preview and apply runs

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use timesync_fs::FileTimes;

use super::plan::PlanKind;

/// Whether a run may write timestamps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Compute and report, never write
    #[default]
    Preview,
    /// Write the shifted reference timestamps to targets
    Apply,
}

impl SyncMode {
    pub fn is_preview(&self) -> bool {
        *self == Self::Preview
    }
}

/// Category of a per-file failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// Timestamps could not be read or written
    Access,
    /// Timestamps were readable but writing was refused
    Permission,
}

/// A per-file failure recorded in a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&timesync_fs::Error> for FileFailure {
    fn from(error: &timesync_fs::Error) -> Self {
        let kind = match error {
            timesync_fs::Error::Permission { .. } => FailureKind::Permission,
            _ => FailureKind::Access,
        };
        Self {
            kind,
            message: error.to_string(),
        }
    }
}

impl From<&crate::Error> for FileFailure {
    fn from(error: &crate::Error) -> Self {
        match error {
            crate::Error::Fs(fs_error) => Self::from(fs_error),
            other => Self {
                kind: FailureKind::Access,
                message: other.to_string(),
            },
        }
    }
}

/// What happened to one target file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub target: PathBuf,
    pub reference: PathBuf,
    /// Target timestamps before the run; `None` if they could not be read
    pub before: Option<FileTimes>,
    /// Shifted reference timestamps; `None` if they could not be read
    pub after: Option<FileTimes>,
    /// Whether `after` was written to the target
    pub applied: bool,
    pub error: Option<FileFailure>,
}

impl SyncOutcome {
    /// An outcome whose timestamps were read and computed.
    pub fn computed(
        target: impl Into<PathBuf>,
        reference: impl Into<PathBuf>,
        before: FileTimes,
        after: FileTimes,
    ) -> Self {
        Self {
            target: target.into(),
            reference: reference.into(),
            before: Some(before),
            after: Some(after),
            applied: false,
            error: None,
        }
    }

    /// An outcome for a pair whose timestamps could not be read.
    pub fn unreadable(
        target: impl Into<PathBuf>,
        reference: impl Into<PathBuf>,
        failure: FileFailure,
    ) -> Self {
        Self {
            target: target.into(),
            reference: reference.into(),
            before: None,
            after: None,
            applied: false,
            error: Some(failure),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Report from a preview or apply run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub mode: SyncMode,
    /// Hours added to every reference timestamp
    pub shift: i64,
    pub kind: PlanKind,
    /// One outcome per matched pair, in processing order
    pub outcomes: Vec<SyncOutcome>,
    /// Targets without a reference
    pub unmatched: Vec<String>,
    /// References hidden by a same-stem reference
    pub shadowed: Vec<PathBuf>,
}

impl SyncReport {
    /// Create an empty report
    pub fn new(mode: SyncMode, shift: i64, kind: PlanKind) -> Self {
        Self {
            mode,
            shift,
            kind,
            outcomes: Vec::new(),
            unmatched: Vec::new(),
            shadowed: Vec::new(),
        }
    }

    pub fn applied_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.applied).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(SyncOutcome::is_failed)
    }

    /// Outcomes that failed, in processing order.
    pub fn failures(&self) -> impl Iterator<Item = &SyncOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }
}
