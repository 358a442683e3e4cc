//! Client for an AssemblyAI-style transcription service.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, instrument};
use visualquest_core::error::DomainError;
use visualquest_core::transcription::Transcriber;

use crate::dto::{TranscriptRequest, TranscriptResponse, TranscriptStatus, UploadResponse};
use crate::error::TranscriptionError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
const DEFAULT_MAX_POLLS: u32 = 100;

/// Client for an AssemblyAI-style speech-to-text API.
///
/// Transcription is a three-step flow: upload the raw clip, create a
/// transcript job from the uploaded URL, then poll the job until it reports
/// `completed` or `error`.
#[derive(Debug, Clone)]
pub struct AssemblyAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    poll_interval: Duration,
    max_polls: u32,
}

impl AssemblyAiClient {
    /// Creates a new client with default polling behavior.
    ///
    /// # Errors
    ///
    /// Returns `TranscriptionError::Http` if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(api_key: String, base_url: String) -> Result<Self, TranscriptionError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TranscriptionError::Http(e.to_string()))?;

        debug!(url = %base_url, "created transcription client");

        Ok(Self {
            http,
            api_key,
            base_url,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        })
    }

    /// Overrides the poll interval and budget.
    #[must_use]
    pub fn with_polling(mut self, poll_interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = poll_interval;
        self.max_polls = max_polls;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    async fn checked(
        response: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<reqwest::Response, TranscriptionError> {
        let response = response.map_err(|e| {
            error!(error = %e, "transcription request failed");
            TranscriptionError::Http(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(status = %status, message = %message, "transcription service returned an error");
            return Err(TranscriptionError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    /// Uploads the raw clip; returns the service-hosted audio URL.
    async fn upload(&self, audio: &[u8]) -> Result<String, TranscriptionError> {
        let response = self
            .http
            .post(self.endpoint("/v2/upload"))
            .header("authorization", &self.api_key)
            .body(audio.to_vec())
            .send()
            .await;

        let parsed: UploadResponse = Self::checked(response)
            .await?
            .json()
            .await
            .map_err(|e| TranscriptionError::ResponseParsing(e.to_string()))?;
        Ok(parsed.upload_url)
    }

    /// Creates a transcript job; returns its ID.
    async fn submit(&self, audio_url: String) -> Result<String, TranscriptionError> {
        let response = self
            .http
            .post(self.endpoint("/v2/transcript"))
            .header("authorization", &self.api_key)
            .json(&TranscriptRequest { audio_url })
            .send()
            .await;

        let parsed: TranscriptResponse = Self::checked(response)
            .await?
            .json()
            .await
            .map_err(|e| TranscriptionError::ResponseParsing(e.to_string()))?;
        Ok(parsed.id)
    }

    /// Polls the job until it completes, fails, or exhausts the budget.
    async fn poll(&self, transcript_id: &str) -> Result<String, TranscriptionError> {
        let url = self.endpoint(&format!("/v2/transcript/{transcript_id}"));

        for _ in 0..self.max_polls {
            let response = self
                .http
                .get(&url)
                .header("authorization", &self.api_key)
                .send()
                .await;

            let parsed: TranscriptResponse = Self::checked(response)
                .await?
                .json()
                .await
                .map_err(|e| TranscriptionError::ResponseParsing(e.to_string()))?;

            match parsed.status {
                TranscriptStatus::Completed => {
                    return parsed.text.ok_or_else(|| {
                        TranscriptionError::ResponseParsing(
                            "completed transcript carried no text".to_owned(),
                        )
                    });
                }
                TranscriptStatus::Error => {
                    return Err(TranscriptionError::TranscriptFailed(
                        parsed
                            .error
                            .unwrap_or_else(|| "no failure reason given".to_owned()),
                    ));
                }
                TranscriptStatus::Queued | TranscriptStatus::Processing => {
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }

        Err(TranscriptionError::Timeout {
            polls: self.max_polls,
        })
    }
}

#[async_trait]
impl Transcriber for AssemblyAiClient {
    #[instrument(skip(self, audio), fields(bytes = audio.len()))]
    async fn transcribe(&self, audio: &[u8]) -> Result<String, DomainError> {
        let audio_url = self.upload(audio).await?;
        let transcript_id = self.submit(audio_url).await?;
        let text = self.poll(&transcript_id).await?;

        debug!(chars = text.len(), "transcription complete");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> AssemblyAiClient {
        AssemblyAiClient::new(
            "test-key".to_owned(),
            "https://api.example.com/".to_owned(),
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint_joins_cleanly() {
        let client = test_client();
        assert_eq!(
            client.endpoint("/v2/upload"),
            "https://api.example.com/v2/upload"
        );
        assert_eq!(
            client.endpoint("/v2/transcript/j1"),
            "https://api.example.com/v2/transcript/j1"
        );
    }

    #[test]
    fn test_with_polling_overrides_budget() {
        let client = test_client().with_polling(Duration::from_millis(10), 2);
        assert_eq!(client.poll_interval, Duration::from_millis(10));
        assert_eq!(client.max_polls, 2);
    }

    #[test]
    fn test_errors_collapse_into_domain_transcription() {
        let err = TranscriptionError::TranscriptFailed("bad audio".to_owned());
        match DomainError::from(err) {
            DomainError::Transcription(msg) => assert!(msg.contains("bad audio")),
            other => panic!("expected Transcription, got {other:?}"),
        }
    }
}
