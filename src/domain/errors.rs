//! Domain errors for the Qualigate orchestrator.

use thiserror::Error;

/// Domain-level errors that can occur while building or persisting a run.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A package result was recorded twice in one run.
    #[error("Result already recorded for package: {0}")]
    DuplicateResult(String),

    /// The run report could not be written. Fatal for a run.
    #[error("Report persistence failed: {0}")]
    ReportPersistence(String),

    /// The discovery cache could not be written.
    #[error("Package cache write failed: {0}")]
    CacheWrite(String),

    /// JSON encoding or decoding failed.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A configured scan pattern did not compile.
    #[error("Invalid pattern {pattern}: {reason}")]
    InvalidPattern {
        /// Pattern source
        pattern: String,
        /// Compiler message
        reason: String,
    },
}

/// Result alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
