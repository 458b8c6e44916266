//! The sync command: resolve inputs, preview, confirm, apply
//!
//! Every value is resolved flag first, then environment (through clap),
//! then configuration file, then an interactive prompt.

use std::path::PathBuf;

use colored::Colorize;
use timesync_core::{
    ConfigResolver, Decision, MatchPolicy, PlanKind, Settings, ShiftHours, SyncEngine, SyncReport,
    TimeDisplay, Workflow,
};
use timesync_fs::normalize_input;

use crate::cli::Cli;
use crate::error::{CliError, Result};
use crate::interactive::Prompter;
use crate::render::{self, Renderer};

/// Fully resolved inputs for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    pub target: PathBuf,
    pub reference: PathBuf,
    pub shift: ShiftHours,
    pub policy: MatchPolicy,
    pub display: TimeDisplay,
}

/// Combine flags, settings and prompts into a [`SyncRequest`].
///
/// A shift given by flag, environment or config is validated before any
/// prompt is shown.
pub fn resolve_request(
    cli: &Cli,
    settings: &Settings,
    prompter: &mut dyn Prompter,
) -> Result<SyncRequest> {
    let given_shift = cli
        .shift
        .or(settings.shift)
        .map(ShiftHours::new)
        .transpose()?;

    let target = path_or_prompt(cli.target.as_deref(), "Target file or directory", prompter)?;
    let reference = path_or_prompt(
        cli.reference.as_deref(),
        "Reference file or directory",
        prompter,
    )?;

    let shift = match given_shift {
        Some(shift) => shift,
        None => prompter.shift()?,
    };

    let policy = cli
        .match_policy
        .map(MatchPolicy::from)
        .or(settings.match_policy)
        .unwrap_or_default();

    let display = if cli.utc {
        TimeDisplay::Utc
    } else {
        settings.time_display.unwrap_or_default()
    };

    Ok(SyncRequest {
        target,
        reference,
        shift,
        policy,
        display,
    })
}

fn path_or_prompt(
    given: Option<&str>,
    label: &str,
    prompter: &mut dyn Prompter,
) -> Result<PathBuf> {
    let normalized = given.map(normalize_input).filter(|p| !p.is_empty());
    let path = match normalized {
        Some(path) => path,
        None => prompter.path(label)?,
    };
    Ok(PathBuf::from(path))
}

/// Run the sync command end to end.
///
/// With `--json`, stdout carries exactly one document holding the preview
/// report and, when changes were applied, the apply report. The human
/// preview then goes to stderr so it can still be confirmed.
pub fn run_sync(cli: &Cli, resolver: ConfigResolver, prompter: &mut dyn Prompter) -> Result<()> {
    let settings = resolver.resolve()?;
    let request = resolve_request(cli, &settings, prompter)?;
    tracing::debug!(?request, "Resolved sync request");

    let renderer = Renderer::new(request.display);
    let engine = SyncEngine::new(request.policy);
    let plan = engine.plan(&request.target, &request.reference)?;

    let previewed = Workflow::new(engine, plan, request.shift).preview()?;
    let preview = previewed.report().clone();
    if !cli.json {
        print!("{}", renderer.report(&preview));
    }

    if cli.preview {
        previewed.finish();
        emit_json(cli.json, &preview, None)?;
        status(
            cli.json,
            &format!("{} Preview only, no files were changed.", "OK".green().bold()),
        );
        return Ok(());
    }

    if preview.outcomes.iter().all(|o| o.is_failed()) {
        previewed.finish();
        emit_json(cli.json, &preview, None)?;
        status(cli.json, &format!("{} Nothing to apply.", "OK".green().bold()));
        return Ok(());
    }

    if cli.json {
        eprint!("{}", renderer.report(&preview));
    }
    let approved = prompter.confirm("Apply these changes?")?;
    match previewed.confirm(approved) {
        Decision::Declined(_) => {
            emit_json(cli.json, &preview, None)?;
            status(
                cli.json,
                &format!("{} Cancelled. No files were changed.", "=>".blue().bold()),
            );
            Ok(())
        }
        Decision::Approved(confirmed) => {
            let done = confirmed.apply()?;
            let report = done.report();
            if cli.json {
                emit_json(true, &preview, Some(report))?;
            } else {
                print!("{}", renderer.report(report));
            }

            if report.kind == PlanKind::Single && report.has_failures() {
                return Err(CliError::user(format!(
                    "Failed to write timestamps to {}",
                    request.target.display()
                )));
            }
            Ok(())
        }
    }
}

fn emit_json(json: bool, preview: &SyncReport, apply: Option<&SyncReport>) -> Result<()> {
    if json {
        println!("{}", render::json(preview, apply)?);
    }
    Ok(())
}

/// Status lines go to stderr in JSON mode so stdout stays parseable.
fn status(json: bool, message: &str) {
    if json {
        eprintln!("{}", message);
    } else {
        println!("{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::VecDeque;
    use std::fs;
    use timesync_test_utils::{DiskTimes, TestTree, utc};

    /// Answers prompts from a script and records what was asked.
    #[derive(Default)]
    struct ScriptedPrompter {
        paths: VecDeque<String>,
        shift: Option<i64>,
        confirm: bool,
        asked: Vec<String>,
    }

    impl Prompter for ScriptedPrompter {
        fn path(&mut self, label: &str) -> Result<String> {
            self.asked.push(label.to_string());
            self.paths
                .pop_front()
                .ok_or_else(|| CliError::user("no scripted path"))
        }

        fn shift(&mut self) -> Result<ShiftHours> {
            self.asked.push("shift".to_string());
            Ok(ShiftHours::new(self.shift.unwrap_or(0))?)
        }

        fn confirm(&mut self, question: &str) -> Result<bool> {
            self.asked.push(question.to_string());
            Ok(self.confirm)
        }
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("timesync").chain(args.iter().copied()))
    }

    fn isolated_resolver(tree: &TestTree) -> ConfigResolver {
        ConfigResolver::new().with_global_config_dir(tree.path("no-global-config"))
    }

    #[test]
    fn flags_skip_prompts() {
        let cli = cli(&["-t", " \"jpg\" ", "-r", "raw", "-s", "-5"]);
        let mut prompter = ScriptedPrompter::default();

        let request = resolve_request(&cli, &Settings::default(), &mut prompter).unwrap();

        assert_eq!(request.target, PathBuf::from("jpg"));
        assert_eq!(request.reference, PathBuf::from("raw"));
        assert_eq!(request.shift.get(), -5);
        assert_eq!(request.policy, MatchPolicy::LongestFirst);
        assert_eq!(request.display, TimeDisplay::Local);
        assert!(prompter.asked.is_empty());
    }

    #[test]
    fn missing_values_are_prompted_in_order() {
        let cli = cli(&[]);
        let mut prompter = ScriptedPrompter {
            paths: VecDeque::from(["a.jpg".to_string(), "a.raw".to_string()]),
            shift: Some(2),
            ..Default::default()
        };

        let request = resolve_request(&cli, &Settings::default(), &mut prompter).unwrap();

        assert_eq!(request.target, PathBuf::from("a.jpg"));
        assert_eq!(request.reference, PathBuf::from("a.raw"));
        assert_eq!(request.shift.get(), 2);
        assert_eq!(
            prompter.asked,
            vec![
                "Target file or directory".to_string(),
                "Reference file or directory".to_string(),
                "shift".to_string(),
            ]
        );
    }

    #[test]
    fn settings_fill_gaps_and_flags_win() {
        let settings = Settings {
            shift: Some(4),
            match_policy: Some(MatchPolicy::Lexical),
            time_display: Some(TimeDisplay::Utc),
        };
        let mut prompter = ScriptedPrompter::default();

        let from_settings =
            resolve_request(&cli(&["-t", "a", "-r", "b"]), &settings, &mut prompter).unwrap();
        assert_eq!(from_settings.shift.get(), 4);
        assert_eq!(from_settings.policy, MatchPolicy::Lexical);
        assert_eq!(from_settings.display, TimeDisplay::Utc);

        let overridden = resolve_request(
            &cli(&["-t", "a", "-r", "b", "-s", "1", "--match-policy", "longest"]),
            &settings,
            &mut prompter,
        )
        .unwrap();
        assert_eq!(overridden.shift.get(), 1);
        assert_eq!(overridden.policy, MatchPolicy::LongestFirst);
        assert!(prompter.asked.is_empty());
    }

    #[test]
    fn out_of_range_shift_fails_before_prompting() {
        let mut prompter = ScriptedPrompter::default();

        let result = resolve_request(&cli(&["-s", "25"]), &Settings::default(), &mut prompter);

        assert!(matches!(
            result,
            Err(CliError::Core(timesync_core::Error::Validation { .. }))
        ));
        assert!(prompter.asked.is_empty());
    }

    #[test]
    fn out_of_range_shift_from_config_is_rejected() {
        let settings = Settings {
            shift: Some(-30),
            ..Default::default()
        };
        let result = resolve_request(
            &cli(&["-t", "a", "-r", "b"]),
            &settings,
            &mut ScriptedPrompter::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn approved_run_applies_shifted_times() {
        let tree = TestTree::new();
        let target = tree.file_with("a.jpg", utc(2024, 6, 1, 12, 0, 0), utc(2024, 6, 1, 12, 0, 0));
        let reference = tree.file_with("a.raw", utc(2020, 1, 1, 8, 0, 0), utc(2020, 1, 1, 9, 0, 0));
        let cli = cli(&[
            "-t",
            target.to_str().unwrap(),
            "-r",
            reference.to_str().unwrap(),
            "-s",
            "3",
        ]);
        let mut prompter = ScriptedPrompter {
            confirm: true,
            ..Default::default()
        };

        run_sync(&cli, isolated_resolver(&tree), &mut prompter).unwrap();

        let times = DiskTimes::of(&target);
        assert_eq!(times.modified_utc(), utc(2020, 1, 1, 11, 0, 0));
        assert_eq!(times.accessed_utc(), utc(2020, 1, 1, 12, 0, 0));
        assert_eq!(prompter.asked, vec!["Apply these changes?".to_string()]);
    }

    #[test]
    fn declined_run_changes_nothing() {
        let tree = TestTree::new();
        tree.dir("jpg");
        tree.dir("raw");
        tree.file_with("jpg/a.jpg", utc(2024, 6, 1, 12, 0, 0), utc(2024, 6, 1, 12, 0, 0));
        tree.file_with("raw/a.raw", utc(2020, 1, 1, 8, 0, 0), utc(2020, 1, 1, 8, 0, 0));
        let before = tree.snapshot();
        let cli = cli(&[
            "-t",
            tree.path("jpg").to_str().unwrap(),
            "-r",
            tree.path("raw").to_str().unwrap(),
            "-s",
            "0",
        ]);

        run_sync(&cli, isolated_resolver(&tree), &mut ScriptedPrompter::default()).unwrap();

        assert_eq!(tree.snapshot(), before);
    }

    #[test]
    fn preview_flag_never_asks_to_apply() {
        let tree = TestTree::new();
        let target = tree.file_with("a.jpg", utc(2024, 6, 1, 12, 0, 0), utc(2024, 6, 1, 12, 0, 0));
        let reference = tree.file_with("a.raw", utc(2020, 1, 1, 8, 0, 0), utc(2020, 1, 1, 8, 0, 0));
        let before = tree.snapshot();
        let cli = cli(&[
            "-t",
            target.to_str().unwrap(),
            "-r",
            reference.to_str().unwrap(),
            "-s",
            "1",
            "--preview",
        ]);
        let mut prompter = ScriptedPrompter {
            confirm: true,
            ..Default::default()
        };

        run_sync(&cli, isolated_resolver(&tree), &mut prompter).unwrap();

        assert!(prompter.asked.is_empty());
        assert_eq!(tree.snapshot(), before);
    }

    #[test]
    fn mismatched_path_types_fail() {
        let tree = TestTree::new();
        let target = tree.file_at("a.jpg", utc(2024, 6, 1, 12, 0, 0));
        let reference = tree.dir("raw");
        let cli = cli(&[
            "-t",
            target.to_str().unwrap(),
            "-r",
            reference.to_str().unwrap(),
            "-s",
            "0",
        ]);

        let result = run_sync(&cli, isolated_resolver(&tree), &mut ScriptedPrompter::default());

        assert!(matches!(
            result,
            Err(CliError::Core(timesync_core::Error::MismatchedPathType { .. }))
        ));
    }

    #[test]
    fn explicit_config_supplies_shift() {
        let tree = TestTree::new();
        let target = tree.file_with("a.jpg", utc(2024, 6, 1, 12, 0, 0), utc(2024, 6, 1, 12, 0, 0));
        let reference = tree.file_with("a.raw", utc(2020, 1, 1, 8, 0, 0), utc(2020, 1, 1, 8, 0, 0));
        let config = tree.path("extra.toml");
        fs::write(&config, "shift = -2\n").unwrap();
        let cli = cli(&["-t", target.to_str().unwrap(), "-r", reference.to_str().unwrap()]);
        let mut prompter = ScriptedPrompter {
            confirm: true,
            ..Default::default()
        };

        run_sync(
            &cli,
            isolated_resolver(&tree).with_explicit(&config),
            &mut prompter,
        )
        .unwrap();

        assert_eq!(DiskTimes::of(&target).modified_utc(), utc(2020, 1, 1, 6, 0, 0));
        assert!(!prompter.asked.contains(&"shift".to_string()));
    }
}
