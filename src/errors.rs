/*!
 * Error types for the blocktrans library.
 *
 * This module contains custom error types for different parts of the
 * pipeline, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Failures a translation collaborator can report for a single fragment.
///
/// `RateLimited` and `Timeout` are transient and retried; `RateLimited`
/// additionally triggers a concurrency backoff because it is a capacity
/// signal, while `Timeout` reflects latency and does not. `InvalidInput`
/// is terminal for the fragment and is recorded as a failure sentinel.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslateError {
    /// The provider signalled that the caller exceeded its capacity
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The call did not complete within the configured deadline, or the
    /// transport failed transiently
    #[error("timed out: {0}")]
    Timeout(String),

    /// The provider rejected the fragment itself; retrying cannot help
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl TranslateError {
    /// Whether the batch translator should retry the same fragment.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::InvalidInput(_))
    }
}

/// Errors raised while loading the terminology map.
#[derive(Error, Debug)]
pub enum TerminologyError {
    #[error("failed to read terminology file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse terminology file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Document-level failures. Per-task failures never surface here; they
/// degrade to markers in the output instead.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The extraction collaborator produced no blocks for this document
    #[error("document contains no blocks")]
    EmptyDocument,

    /// The block stream could not be deserialized
    #[error("failed to parse block stream: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the translation collaborator
    #[error("Translation error: {0}")]
    Translate(#[from] TranslateError),

    /// Error loading terminology
    #[error("Terminology error: {0}")]
    Terminology(#[from] TerminologyError),

    /// Document-level pipeline failure
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
