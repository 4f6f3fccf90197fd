//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use semver::Version;

/// tapfix - drive a disposable Homebrew tap
#[derive(Parser, Debug)]
#[command(name = "tapfix")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Fixture configuration file (TOML)
    #[arg(short, long, global = true, env = "TAPFIX_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Provision the tap, then publish, install and uninstall each version
    ///
    /// Cleanup always runs, even when a step fails.
    ///
    /// Examples:
    ///   tapfix smoke                 # Publish and install 1.0.0
    ///   tapfix smoke 1.0.0 1.1.0     # Upgrade path across two versions
    Smoke {
        /// Versions to publish in order
        #[arg(default_values_t = [Version::new(1, 0, 0)])]
        versions: Vec<Version>,
    },

    /// Remove leftovers of a crashed run: uninstall the package and untap
    Cleanup,

    /// Print the formula that would be published for a version
    Render {
        /// Version to render
        version: Version,
    },
}
