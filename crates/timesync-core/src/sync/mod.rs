//! Timestamp synchronisation between target and reference paths
//!
//! This module provides:
//! - **plan**: root checks, directory listing and matching, done once
//! - **engine**: executing a plan in preview or apply mode
//! - **report**: per-file outcomes and run summaries
//! - **workflow**: the preview → confirm → apply state machine

mod engine;
mod plan;
mod report;
mod workflow;

pub use engine::{SyncEngine, sync_one, sync_path, sync_tree};
pub use plan::{PathKind, PlanKind, SyncPlan};
pub use report::{FailureKind, FileFailure, SyncMode, SyncOutcome, SyncReport};
pub use workflow::{
    Confirmed, Decision, Done, Idle, Previewed, Workflow, WorkflowState, WorkflowStep,
};
