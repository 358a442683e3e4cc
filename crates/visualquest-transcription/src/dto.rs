//! Wire types for the speech-to-text service.

use serde::{Deserialize, Serialize};

/// Response to an audio upload.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    /// Service-hosted URL of the uploaded clip.
    pub upload_url: String,
}

/// Request to create a transcript job.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptRequest {
    /// URL of the audio to transcribe.
    pub audio_url: String,
}

/// Lifecycle status of a transcript job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptStatus {
    /// Waiting to be processed.
    Queued,
    /// Being processed.
    Processing,
    /// Finished; `text` is populated.
    Completed,
    /// Failed; `error` is populated.
    Error,
}

/// A transcript job as returned on creation and on every status poll.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptResponse {
    /// Job identifier.
    pub id: String,
    /// Current job status.
    pub status: TranscriptStatus,
    /// The transcript text, present once completed.
    #[serde(default)]
    pub text: Option<String>,
    /// The failure reason, present on error.
    #[serde(default)]
    pub error: Option<String>,
}
