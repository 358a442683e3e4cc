//! Speech-to-text abstraction.

use async_trait::async_trait;

use crate::error::DomainError;

/// Port for transcribing a spoken decision into text.
///
/// The transcribed text is treated identically to typed input downstream.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribes an audio clip into text.
    async fn transcribe(&self, audio: &[u8]) -> Result<String, DomainError>;
}
