//! Work computed before any timestamp is read

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::matcher::{MatchEntry, MatchResult};

/// Whether a root path is a file or a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    File,
    Directory,
}

impl PathKind {
    pub fn of(metadata: &std::fs::Metadata) -> Self {
        if metadata.is_dir() {
            Self::Directory
        } else {
            Self::File
        }
    }
}

impl std::fmt::Display for PathKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Directory => write!(f, "directory"),
        }
    }
}

/// Shape of a plan, carried into reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanKind {
    Single,
    Tree,
}

/// The matched work for one run.
///
/// Computed once and reused for both preview and apply, so the files that
/// are written are exactly the files that were shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncPlan {
    /// A single target file and its reference file
    Single(MatchEntry),
    /// Every matched pair of two directories
    Tree {
        target_dir: PathBuf,
        reference_dir: PathBuf,
        matches: MatchResult,
    },
}

impl SyncPlan {
    pub fn kind(&self) -> PlanKind {
        match self {
            Self::Single(_) => PlanKind::Single,
            Self::Tree { .. } => PlanKind::Tree,
        }
    }

    /// Matched pairs, in processing order.
    pub fn entries(&self) -> &[MatchEntry] {
        match self {
            Self::Single(entry) => std::slice::from_ref(entry),
            Self::Tree { matches, .. } => &matches.entries,
        }
    }

    /// Names of targets without a reference.
    pub fn unmatched(&self) -> &[String] {
        match self {
            Self::Single(_) => &[],
            Self::Tree { matches, .. } => &matches.unmatched,
        }
    }

    /// References hidden by a same-stem reference.
    pub fn shadowed(&self) -> &[PathBuf] {
        match self {
            Self::Single(_) => &[],
            Self::Tree { matches, .. } => &matches.shadowed,
        }
    }
}
