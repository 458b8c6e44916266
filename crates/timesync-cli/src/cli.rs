//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use timesync_core::MatchPolicy;

/// timesync - Copy file timestamps from reference files onto target files
///
/// Targets and references are paired by file name stem, so edited exports
/// such as `IMG_0042_edit.jpg` receive the times of `IMG_0042.CR2`.
///
/// Examples:
///   timesync -t photo.jpg -r photo.raw
///   timesync -t jpg/ -r raw/ --shift -5 --preview
#[derive(Parser, Debug)]
#[command(name = "timesync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Target file or directory whose timestamps are overwritten
    #[arg(short, long, env = "TIMESYNC_TARGET")]
    pub target: Option<String>,

    /// Reference file or directory whose timestamps are copied
    #[arg(short, long, env = "TIMESYNC_REFERENCE")]
    pub reference: Option<String>,

    /// Hours added to the reference timestamps (-24 to 24)
    #[arg(short, long, env = "TIMESYNC_SHIFT", allow_negative_numbers = true)]
    pub shift: Option<i64>,

    /// Preview the changes without prompting to apply them
    #[arg(short, long, alias = "test")]
    pub preview: bool,

    /// Output reports as JSON for scripting
    #[arg(long)]
    pub json: bool,

    /// Show timestamps in UTC instead of local time
    #[arg(long)]
    pub utc: bool,

    /// Order in which reference stems are tried against a target
    #[arg(long, value_enum)]
    pub match_policy: Option<MatchPolicyArg>,

    /// Additional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Command-line spelling of [`MatchPolicy`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MatchPolicyArg {
    /// Longest reference stem first
    Longest,
    /// Reference stems in lexicographic order
    Lexical,
}

impl From<MatchPolicyArg> for MatchPolicy {
    fn from(arg: MatchPolicyArg) -> Self {
        match arg {
            MatchPolicyArg::Longest => MatchPolicy::LongestFirst,
            MatchPolicyArg::Lexical => MatchPolicy::Lexical,
        }
    }
}
