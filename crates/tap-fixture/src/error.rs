//! Error types for tap-fixture

use std::path::PathBuf;

/// Result type for tap-fixture operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the fixture
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to launch {program}: {source}")]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} did not exit normally")]
    Terminated { program: PathBuf },

    #[error("{program} exited with code {code}")]
    UncleanExit { program: PathBuf, code: i32 },

    #[error("Executable '{name}' not found in PATH")]
    ToolNotFound { name: String },

    #[error("Package is already installed. Run uninstall before installing again")]
    AlreadyInstalled,

    #[error("Fixture is not provisioned. Run setup first")]
    NotProvisioned,

    #[error("Fixture is already provisioned at {root}")]
    AlreadyProvisioned { root: PathBuf },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid fixture config at {path}: {message}")]
    ConfigFile { path: PathBuf, message: String },

    #[error("Invalid fixture config: {message}")]
    Config { message: String },

    #[error("Invalid formula template: {reason}")]
    InvalidTemplate { reason: String },

    #[error("Invalid version: {0}")]
    InvalidVersion(#[from] semver::Error),

    #[error("Cannot express {path} as a file URL")]
    InvalidTapPath { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True for caller mistakes, as opposed to failures of the environment
    /// or of the external tools.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::AlreadyInstalled | Self::NotProvisioned | Self::AlreadyProvisioned { .. }
        )
    }
}
