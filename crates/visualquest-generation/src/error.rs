//! Generation adapter error types.

use thiserror::Error;
use visualquest_core::error::DomainError;

/// Errors from the model provider.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The HTTP request itself failed (connect, timeout, TLS).
    #[error("http request failed: {0}")]
    Http(String),

    /// The provider returned a non-success status.
    #[error("provider returned status {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned by the provider.
        message: String,
    },

    /// The response body could not be parsed.
    #[error("failed to parse provider response: {0}")]
    ResponseParsing(String),

    /// The provider returned a response with no completion in it.
    #[error("provider returned no completion")]
    EmptyCompletion,
}

impl From<GenerationError> for DomainError {
    fn from(err: GenerationError) -> Self {
        DomainError::Generation(err.to_string())
    }
}
