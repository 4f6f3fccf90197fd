//! tapfix CLI
//!
//! Drives a disposable Homebrew tap by hand: the same fixture the test
//! suites use, with real `git` and `brew`.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tap_fixture::logging::init_with_default(filter).map_err(|e| CliError::Logging(e.to_string()))?;
    tracing::debug!("Verbose mode enabled");

    let config = commands::load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Smoke { versions } => commands::run_smoke(config, &versions),
        Commands::Cleanup => commands::run_cleanup(config),
        Commands::Render { version } => commands::run_render(&config, &version),
    }
}
