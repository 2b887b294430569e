//! Error types for the optcheck validation subsystem

use thiserror::Error;

/// Result type alias for optcheck operations
pub type OptcheckResult<T> = Result<T, OptcheckError>;

/// Main error type for the validation subsystem
///
/// Validator outcomes (build failure, mismatch, ...) are deliberately
/// NOT represented here: a failed validation is an expected first-class
/// result, carried as data in [`crate::result::ValidationResult`]. Only
/// conditions that terminate a check early are errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptcheckError {
    /// Trajectory text that does not decode into a record
    #[error("Malformed trajectory record: {0}")]
    MalformedRecord(String),

    /// Benchmark URI that does not resolve in the corpus
    #[error("Unknown benchmark: {0}")]
    UnknownBenchmark(String),

    /// Commandline token that does not resolve in the action space
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// A transformation failed mid-replay; the remaining actions were
    /// not applied and the environment holds the partial state
    #[error("Replay aborted at action {index} ({token}): {detail}")]
    ReplayAborted {
        index: usize,
        token: String,
        detail: String,
    },

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),
}

impl OptcheckError {
    /// Create a new malformed-record error
    pub fn malformed_record(message: impl Into<String>) -> Self {
        Self::MalformedRecord(message.into())
    }

    /// Create a new unknown-benchmark error
    pub fn unknown_benchmark(uri: impl Into<String>) -> Self {
        Self::UnknownBenchmark(uri.into())
    }

    /// Create a new unknown-action error naming the offending token
    pub fn unknown_action(token: impl Into<String>) -> Self {
        Self::UnknownAction(token.into())
    }

    /// Create a new replay-aborted error
    pub fn replay_aborted(
        index: usize,
        token: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::ReplayAborted {
            index,
            token: token.into(),
            detail: detail.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<std::io::Error> for OptcheckError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for OptcheckError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
