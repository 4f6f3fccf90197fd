//! Shared test utilities for the tap-fixture workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`runner`]: [`ScriptedRunner`], a fake [`CommandRunner`](tap_fixture::CommandRunner)
//! - [`git`]: inspection of the tap repository a fixture produced

pub mod git;
pub mod runner;

pub use runner::{Response, ScriptedRunner};
