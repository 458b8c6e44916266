//! SyncEngine implementation
//!
//! The engine turns a target and a reference path into a [`SyncPlan`] and
//! executes that plan in preview or apply mode.

use std::fs;
use std::path::Path;

use timesync_fs::{list_dir, read_times, times::CREATION_TIME_SETTABLE, write_times};

use crate::error::PathRole;
use crate::matcher::{MatchEntry, MatchPolicy, match_files};
use crate::shift::ShiftHours;
use crate::{Error, Result};

use super::plan::{PathKind, SyncPlan};
use super::report::{FileFailure, SyncMode, SyncOutcome, SyncReport};

/// Engine for planning and executing timestamp synchronisation
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncEngine {
    policy: MatchPolicy,
}

impl SyncEngine {
    /// Create an engine that matches directory contents with `policy`.
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    /// Check both roots and compute the work for a run.
    ///
    /// # Errors
    ///
    /// - [`Error::PathNotFound`] if either root is missing
    /// - [`Error::MismatchedPathType`] if one root is a file and the other a
    ///   directory; neither root's contents are touched in that case
    /// - a directory-read error if a directory cannot be listed
    pub fn plan(&self, target: &Path, reference: &Path) -> Result<SyncPlan> {
        let target_kind = root_kind(target, PathRole::Target)?;
        let reference_kind = root_kind(reference, PathRole::Reference)?;

        if target_kind != reference_kind {
            return Err(Error::MismatchedPathType {
                target: target.to_path_buf(),
                reference: reference.to_path_buf(),
                target_kind,
                reference_kind,
            });
        }

        match target_kind {
            PathKind::File => Ok(SyncPlan::Single(MatchEntry::new(target, reference))),
            PathKind::Directory => self.plan_tree(target, reference),
        }
    }

    fn plan_tree(&self, target_dir: &Path, reference_dir: &Path) -> Result<SyncPlan> {
        let targets = list_dir(target_dir)?;
        let references = list_dir(reference_dir)?;
        let matches = match_files(&targets, &references, self.policy);

        tracing::info!(
            target_dir = %target_dir.display(),
            reference_dir = %reference_dir.display(),
            matched = matches.entries.len(),
            unmatched = matches.unmatched.len(),
            "Planned directory sync"
        );

        Ok(SyncPlan::Tree {
            target_dir: target_dir.to_path_buf(),
            reference_dir: reference_dir.to_path_buf(),
            matches,
        })
    }

    /// Execute `plan`, writing timestamps only in [`SyncMode::Apply`].
    ///
    /// For a single pair, a read failure is returned as an error. For a
    /// directory plan, per-file failures are recorded in the report and
    /// every remaining pair is still attempted.
    pub fn execute(
        &self,
        plan: &SyncPlan,
        shift: ShiftHours,
        mode: SyncMode,
    ) -> Result<SyncReport> {
        let mut report = SyncReport::new(mode, shift.get(), plan.kind());
        report.unmatched = plan.unmatched().to_vec();
        report.shadowed = plan.shadowed().to_vec();

        if !mode.is_preview() && !CREATION_TIME_SETTABLE && !plan.entries().is_empty() {
            tracing::warn!(
                "Creation time cannot be set here, writing modification and access times only"
            );
        }

        match plan {
            SyncPlan::Single(entry) => {
                report.outcomes.push(sync_one(&entry.target, &entry.reference, shift, mode)?);
            }
            SyncPlan::Tree { .. } => {
                for entry in plan.entries() {
                    match sync_one(&entry.target, &entry.reference, shift, mode) {
                        Ok(outcome) => report.outcomes.push(outcome),
                        Err(err) if err.is_per_file() => {
                            tracing::warn!(
                                target_file = %entry.target.display(),
                                error = %err,
                                "Skipping file"
                            );
                            report.outcomes.push(SyncOutcome::unreadable(
                                &entry.target,
                                &entry.reference,
                                FileFailure::from(&err),
                            ));
                        }
                        Err(err) => return Err(err),
                    }
                }
            }
        }

        tracing::info!(
            ?mode,
            processed = report.outcomes.len(),
            applied = report.applied_count(),
            failed = report.failed_count(),
            "Sync finished"
        );
        Ok(report)
    }
}

fn root_kind(path: &Path, role: PathRole) -> Result<PathKind> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(PathKind::of(&metadata)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::PathNotFound {
            path: path.to_path_buf(),
            role,
        }),
        Err(e) => Err(timesync_fs::Error::access(path, e).into()),
    }
}

/// Synchronise one target file with one reference file.
///
/// Reads both triples, shifts the reference triple and, in
/// [`SyncMode::Apply`], writes it to the target. A write failure is
/// recorded in the returned outcome rather than returned as an error, so
/// the before/after values stay available for reporting.
///
/// # Errors
///
/// Returns an access error if either file's timestamps cannot be read.
pub fn sync_one(
    target: &Path,
    reference: &Path,
    shift: ShiftHours,
    mode: SyncMode,
) -> Result<SyncOutcome> {
    let reference_times = read_times(reference)?;
    let before = read_times(target)?;
    let after = shift.apply(&reference_times);

    let mut outcome = SyncOutcome::computed(target, reference, before, after);
    tracing::debug!(
        target_file = %target.display(),
        reference = %reference.display(),
        %shift,
        "Computed timestamps"
    );

    if !mode.is_preview() {
        match write_times(target, &after) {
            Ok(()) => outcome.applied = true,
            Err(err) => {
                tracing::warn!(
                    target_file = %target.display(),
                    error = %err,
                    "Failed to write timestamps"
                );
                outcome.error = Some(FileFailure::from(&err));
            }
        }
    }

    Ok(outcome)
}

/// Synchronise every matched pair of two directories.
///
/// Uses the default [`MatchPolicy`]. Per-file failures are recorded in
/// the report; only a directory that cannot be listed aborts the run.
pub fn sync_tree(
    target_dir: &Path,
    reference_dir: &Path,
    shift: ShiftHours,
    mode: SyncMode,
) -> Result<SyncReport> {
    let engine = SyncEngine::default();
    let plan = engine.plan_tree(target_dir, reference_dir)?;
    engine.execute(&plan, shift, mode)
}

/// Synchronise two files or two directories, whichever both paths are.
///
/// # Errors
///
/// Fails with [`Error::MismatchedPathType`] when one path is a file and
/// the other a directory.
pub fn sync_path(
    target: &Path,
    reference: &Path,
    shift: ShiftHours,
    mode: SyncMode,
) -> Result<SyncReport> {
    let engine = SyncEngine::default();
    let plan = engine.plan(target, reference)?;
    engine.execute(&plan, shift, mode)
}
