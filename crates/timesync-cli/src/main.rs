//! timesync CLI
//!
//! Copies creation, modification and access times from reference files
//! onto target files, optionally shifted by whole hours.

mod cli;
mod commands;
mod error;
mod interactive;
mod logging;
mod render;

use clap::Parser;
use colored::Colorize;
use timesync_core::ConfigResolver;

use cli::Cli;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: failed to initialize logging: {}", "warning".yellow().bold(), e);
    }

    let mut resolver = ConfigResolver::new();
    if let Some(ref path) = cli.config {
        resolver = resolver.with_explicit(path.clone());
    }

    let mut prompter = interactive::prompter();
    commands::run_sync(&cli, resolver, prompter.as_mut())
}
