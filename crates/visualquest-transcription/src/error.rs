//! Transcription adapter error types.

use thiserror::Error;
use visualquest_core::error::DomainError;

/// Errors from the speech-to-text service.
#[derive(Debug, Error)]
pub enum TranscriptionError {
    /// The HTTP request itself failed (connect, timeout, TLS).
    #[error("http request failed: {0}")]
    Http(String),

    /// The service returned a non-success status.
    #[error("service returned status {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned by the service.
        message: String,
    },

    /// The response body could not be parsed.
    #[error("failed to parse service response: {0}")]
    ResponseParsing(String),

    /// The service processed the clip but reported a failure.
    #[error("transcript failed: {0}")]
    TranscriptFailed(String),

    /// The transcript did not complete within the polling budget.
    #[error("transcript still pending after {polls} polls")]
    Timeout {
        /// Number of status polls performed.
        polls: u32,
    },
}

impl From<TranscriptionError> for DomainError {
    fn from(err: TranscriptionError) -> Self {
        DomainError::Transcription(err.to_string())
    }
}
