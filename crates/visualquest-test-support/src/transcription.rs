//! Test transcribers — mock `Transcriber` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use visualquest_core::error::DomainError;
use visualquest_core::transcription::Transcriber;

/// A transcriber that returns a canned transcript and records the byte
/// length of every clip it receives.
#[derive(Debug)]
pub struct ScriptedTranscriber {
    text: String,
    received: Mutex<Vec<usize>>,
}

impl ScriptedTranscriber {
    /// Create a scripted transcriber returning `text` for every clip.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Returns the byte lengths of the clips received, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn received_lengths(&self) -> Vec<usize> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transcriber for ScriptedTranscriber {
    async fn transcribe(&self, audio: &[u8]) -> Result<String, DomainError> {
        self.received.lock().unwrap().push(audio.len());
        Ok(self.text.clone())
    }
}

/// A transcriber whose every call fails.
#[derive(Debug)]
pub struct FailingTranscriber;

#[async_trait]
impl Transcriber for FailingTranscriber {
    async fn transcribe(&self, _audio: &[u8]) -> Result<String, DomainError> {
        Err(DomainError::Transcription(
            "speech service unavailable".into(),
        ))
    }
}
