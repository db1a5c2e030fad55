//! Classifier error types.
//!
//! None of these reach an end caller. [`ClassifierAdapter`](crate::ClassifierAdapter)
//! logs them and converts every one into a fail-closed result whose
//! violation text is the error's `Display`.

use std::time::Duration;

use cpe_core::ResultValidationError;

/// Errors from a classification attempt.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Provider returned a non-2xx status.
    #[error("classifier {endpoint} returned {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Provider answered without any usable message.
    #[error("classifier returned no message")]
    EmptyResponse,
    /// Text output held no parsable JSON object.
    #[error("classifier output is not valid JSON: {0}")]
    Malformed(String),
    /// Output parsed but failed the result schema.
    #[error("classifier output rejected: {0}")]
    InvalidResult(#[from] ResultValidationError),
    /// Provider-specific failure.
    #[error("classifier provider error: {0}")]
    Provider(String),
    /// No provider is configured.
    #[error("no semantic classifier configured")]
    NotConfigured,
    /// The classification did not finish within its bound.
    #[error("classifier timed out after {0:?}")]
    Timeout(Duration),
    /// The caller cancelled the classification.
    #[error("classification cancelled")]
    Cancelled,
    /// The provider task panicked or was aborted.
    #[error("classifier task failed: {0}")]
    TaskFailed(String),
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}
