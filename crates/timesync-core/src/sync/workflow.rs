//! The preview → confirm → apply state machine
//!
//! ```text
//! Idle --preview--> Previewed --confirm(true)--> Confirmed --apply--> Done
//!                       |
//!                       +--confirm(false) / finish--> Done
//! ```
//!
//! Each state is a distinct type, so applying without a preview and a
//! positive confirmation does not compile. The plan computed up front is
//! carried through every state and never recomputed.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::shift::ShiftHours;

use super::engine::SyncEngine;
use super::plan::SyncPlan;
use super::report::{SyncMode, SyncReport};

/// Runtime name of a workflow state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowState {
    Idle,
    Preview,
    Apply,
    Done,
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Preview => "preview",
            Self::Apply => "apply",
            Self::Done => "done",
        };
        write!(f, "{}", name)
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Marker implemented by every workflow state type.
pub trait WorkflowStep: sealed::Sealed {
    const STATE: WorkflowState;
}

/// Nothing has been read yet
#[derive(Debug)]
pub struct Idle;

/// The preview ran; waiting for a decision
#[derive(Debug)]
pub struct Previewed {
    report: SyncReport,
}

/// The user approved the preview
#[derive(Debug)]
pub struct Confirmed;

/// Terminal state
#[derive(Debug)]
pub struct Done {
    report: SyncReport,
    applied: bool,
}

impl sealed::Sealed for Idle {}
impl sealed::Sealed for Previewed {}
impl sealed::Sealed for Confirmed {}
impl sealed::Sealed for Done {}

impl WorkflowStep for Idle {
    const STATE: WorkflowState = WorkflowState::Idle;
}
impl WorkflowStep for Previewed {
    const STATE: WorkflowState = WorkflowState::Preview;
}
impl WorkflowStep for Confirmed {
    const STATE: WorkflowState = WorkflowState::Apply;
}
impl WorkflowStep for Done {
    const STATE: WorkflowState = WorkflowState::Done;
}

/// A synchronisation run moving through its states
#[derive(Debug)]
pub struct Workflow<S: WorkflowStep> {
    engine: SyncEngine,
    plan: SyncPlan,
    shift: ShiftHours,
    step: S,
}

/// Outcome of the confirmation step
#[derive(Debug)]
pub enum Decision {
    Approved(Workflow<Confirmed>),
    Declined(Workflow<Done>),
}

impl<S: WorkflowStep> Workflow<S> {
    pub fn state(&self) -> WorkflowState {
        S::STATE
    }

    fn into_step<T: WorkflowStep>(self, step: T) -> Workflow<T> {
        tracing::debug!(from = %S::STATE, to = %T::STATE, "Workflow transition");
        Workflow {
            engine: self.engine,
            plan: self.plan,
            shift: self.shift,
            step,
        }
    }
}

impl Workflow<Idle> {
    pub fn new(engine: SyncEngine, plan: SyncPlan, shift: ShiftHours) -> Self {
        Self {
            engine,
            plan,
            shift,
            step: Idle,
        }
    }

    /// Run the plan without writing anything.
    pub fn preview(self) -> Result<Workflow<Previewed>> {
        let report = self.engine.execute(&self.plan, self.shift, SyncMode::Preview)?;
        Ok(self.into_step(Previewed { report }))
    }
}

impl Workflow<Previewed> {
    pub fn report(&self) -> &SyncReport {
        &self.step.report
    }

    /// Record the user's answer to the confirmation prompt.
    pub fn confirm(self, approved: bool) -> Decision {
        if approved {
            Decision::Approved(self.into_step(Confirmed))
        } else {
            tracing::info!("Apply declined");
            let report = self.step.report.clone();
            Decision::Declined(self.into_step(Done {
                report,
                applied: false,
            }))
        }
    }

    /// End after the preview without asking.
    pub fn finish(self) -> Workflow<Done> {
        let report = self.step.report.clone();
        self.into_step(Done {
            report,
            applied: false,
        })
    }
}

impl Workflow<Confirmed> {
    /// Write the shifted timestamps for every pair of the previewed plan.
    pub fn apply(self) -> Result<Workflow<Done>> {
        let report = self.engine.execute(&self.plan, self.shift, SyncMode::Apply)?;
        Ok(self.into_step(Done {
            report,
            applied: true,
        }))
    }
}

impl Workflow<Done> {
    /// The apply report, or the preview report if nothing was applied.
    pub fn report(&self) -> &SyncReport {
        &self.step.report
    }

    /// Whether the apply phase ran.
    pub fn applied(&self) -> bool {
        self.step.applied
    }

    pub fn into_report(self) -> SyncReport {
        self.step.report
    }
}
