//! Disposable Homebrew tap fixture
//!
//! Provisions a throwaway git repository, registers it with `brew` as a tap,
//! publishes versioned formulas into it and drives the install/uninstall
//! lifecycle, verifying each external command by its exit code.
//!
//! - [`runner`] launches external commands and applies the verification policy
//! - [`formula`] renders the package definition
//! - [`TapFixture`] ties provisioning, publishing and the lifecycle together
//!
//! Teardown always runs to completion: [`TapFixture::cleanup`] (and `Drop`)
//! uninstall the package if this fixture installed it and deregister the tap
//! on a best-effort basis.

pub mod config;
pub mod error;
pub mod fixture;
pub mod formula;
pub mod logging;
pub mod runner;
pub mod state;

pub use config::{FixtureConfig, GitIdentity, Tool, ToolPaths};
pub use error::{Error, Result};
pub use fixture::TapFixture;
pub use formula::FormulaTemplate;
pub use runner::{CommandRunner, ExitOutcome, Invocation, SystemRunner, Verify};
pub use state::InstallState;

pub use semver::Version;
