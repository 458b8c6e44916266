//! Core orchestration layer for timesync
//!
//! This crate sits between the filesystem layer and the CLI and implements:
//!
//! - **Shift**: hour offsets applied to a timestamp triple
//! - **Matcher**: pairing target files with reference files by file stem
//! - **SyncEngine**: planning, previewing and applying timestamp transfers
//! - **Workflow**: the preview → confirm → apply state machine
//! - **Configuration**: layered TOML settings
//!
//! # Architecture
//!
//! ```text
//!        timesync-cli
//!             |
//!        timesync-core
//!             |
//!        timesync-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use timesync_core::{MatchPolicy, ShiftHours, SyncEngine, Workflow};
//!
//! # fn main() -> timesync_core::Result<()> {
//! let engine = SyncEngine::new(MatchPolicy::default());
//! let plan = engine.plan(Path::new("photos/jpg"), Path::new("photos/raw"))?;
//! let previewed = Workflow::new(engine, plan, ShiftHours::new(-5)?).preview()?;
//! println!("{} files would change", previewed.report().outcomes.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod matcher;
pub mod shift;
pub mod sync;

pub use config::{ConfigResolver, Settings, TimeDisplay};
pub use error::{Error, PathRole, Result};
pub use matcher::{MatchEntry, MatchPolicy, MatchResult, match_files};
pub use shift::{ShiftHours, shift};
pub use sync::{
    Decision, FailureKind, FileFailure, PathKind, PlanKind, SyncEngine, SyncMode, SyncOutcome,
    SyncPlan, SyncReport, Workflow, WorkflowState, sync_one, sync_path, sync_tree,
};
