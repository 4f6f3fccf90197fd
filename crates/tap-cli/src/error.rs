//! Error types for tap-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from the fixture
    #[error(transparent)]
    Fixture(#[from] tap_fixture::Error),

    /// Logging could not be initialized
    #[error("Failed to initialize logging: {0}")]
    Logging(String),

    /// The smoke run stopped at a step
    #[error("{step} failed: {source}")]
    Step {
        step: String,
        #[source]
        source: tap_fixture::Error,
    },
}

impl CliError {
    pub fn step(step: impl Into<String>, source: tap_fixture::Error) -> Self {
        Self::Step {
            step: step.into(),
            source,
        }
    }
}
