//! Human-readable and JSON rendering of sync reports

use std::fmt::Write as _;

use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use serde::Serialize;
use timesync_core::{SyncMode, SyncOutcome, SyncReport, TimeDisplay};
use timesync_fs::TimeField;

use crate::error::Result;

/// Renders reports for the terminal in the configured time zone
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    display: TimeDisplay,
}

impl Renderer {
    pub fn new(display: TimeDisplay) -> Self {
        Self { display }
    }

    /// Format an instant with sub-second digits only when present.
    pub fn timestamp(&self, at: DateTime<Utc>) -> String {
        match self.display {
            TimeDisplay::Utc => at.format("%Y-%m-%d %H:%M:%S%.f UTC").to_string(),
            TimeDisplay::Local => at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S%.f %:z")
                .to_string(),
        }
    }

    /// Render a full report: heading, one block per file, then summary.
    pub fn report(&self, report: &SyncReport) -> String {
        let mut out = String::new();

        let heading = match report.mode {
            SyncMode::Preview => "Previewing timestamp changes",
            SyncMode::Apply => "Applying timestamp changes",
        };
        let _ = writeln!(
            out,
            "{} {} (shift {:+}h)",
            "=>".blue().bold(),
            heading,
            report.shift
        );

        for outcome in &report.outcomes {
            out.push('\n');
            self.outcome(&mut out, report.mode, outcome);
        }

        if !report.unmatched.is_empty() {
            out.push('\n');
            for name in &report.unmatched {
                let _ = writeln!(
                    out,
                    "{} No matching reference for: {}",
                    "SKIP".yellow().bold(),
                    name
                );
            }
        }

        for path in &report.shadowed {
            let _ = writeln!(
                out,
                "{} Ignored duplicate reference: {}",
                "SKIP".yellow().bold(),
                path.display()
            );
        }

        out.push('\n');
        let _ = writeln!(out, "{}", summary(report));
        out
    }

    fn outcome(&self, out: &mut String, mode: SyncMode, outcome: &SyncOutcome) {
        let _ = writeln!(
            out,
            "File: {}  (reference: {})",
            outcome.target.display().to_string().bold(),
            outcome.reference.display()
        );

        if let (Some(before), Some(after)) = (&outcome.before, &outcome.after) {
            for field in TimeField::ALL {
                let _ = writeln!(
                    out,
                    "  {:<9} before: {}   after: {}",
                    field.as_str(),
                    self.timestamp(before.get(field)),
                    self.timestamp(after.get(field)).cyan()
                );
            }
        }

        match &outcome.error {
            Some(failure) => {
                let _ = writeln!(out, "  {} {}", "FAILED".red().bold(), failure.message);
            }
            None if !mode.is_preview() && outcome.applied => {
                let _ = writeln!(out, "  {}", "updated".green());
            }
            None => {}
        }
    }
}

fn summary(report: &SyncReport) -> String {
    let failed = report.failed_count();
    let done = match report.mode {
        SyncMode::Preview => format!(
            "{} file(s) would be updated",
            report.outcomes.len() - failed
        ),
        SyncMode::Apply => format!("{} file(s) updated", report.applied_count()),
    };
    let line = format!(
        "{}, {} without a reference, {} failed",
        done,
        report.unmatched.len(),
        failed
    );
    if failed > 0 {
        line.yellow().to_string()
    } else {
        line.green().to_string()
    }
}

/// The single document printed by `--json`
#[derive(Debug, Serialize)]
struct JsonRun<'a> {
    preview: &'a SyncReport,
    /// `null` unless the changes were applied
    apply: Option<&'a SyncReport>,
}

/// Serialize a run for `--json` output.
pub fn json(preview: &SyncReport, apply: Option<&SyncReport>) -> Result<String> {
    Ok(serde_json::to_string_pretty(&JsonRun { preview, apply })?)
}
