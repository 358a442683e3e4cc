//! Client for OpenAI-compatible chat completions endpoints.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, instrument};
use visualquest_core::error::DomainError;
use visualquest_core::generation::{ImagePayload, StoryGenerator};

use crate::dto::{ChatMessage, ChatRequest, ChatResponse};
use crate::error::GenerationError;
use crate::prompts;

/// Per-request timeout. The source app blocked indefinitely on slow
/// generations; a bound keeps a stuck provider from pinning a session.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for any OpenAI-compatible chat completions API.
///
/// One vision model handles image description; one text model handles
/// narration, the choice rewrite, and the conclusion.
#[derive(Debug, Clone)]
pub struct OpenAiCompatClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    vision_model: String,
    story_model: String,
}

impl OpenAiCompatClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Http` if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(
        api_key: String,
        base_url: String,
        vision_model: String,
        story_model: String,
    ) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GenerationError::Http(e.to_string()))?;

        debug!(
            url = %base_url,
            vision_model = %vision_model,
            story_model = %story_model,
            "created generation client"
        );

        Ok(Self {
            http,
            api_key,
            base_url,
            vision_model,
            story_model,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Sends one chat completion request and returns the completion text.
    #[instrument(skip(self, messages), fields(model = %model))]
    async fn chat(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
    ) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: model.to_owned(),
            messages,
        };

        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "generation request failed");
                GenerationError::Http(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(status = %status, message = %message, "provider returned an error");
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            error!(error = %e, "failed to parse provider response");
            GenerationError::ResponseParsing(e.to_string())
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(GenerationError::EmptyCompletion)?;

        debug!(chars = content.len(), "received completion");
        Ok(content)
    }
}

#[async_trait]
impl StoryGenerator for OpenAiCompatClient {
    async fn describe_image(&self, image: &ImagePayload) -> Result<String, DomainError> {
        let messages = vec![ChatMessage::user_with_image(
            prompts::image_analysis(),
            image.data_url(),
        )];
        Ok(self.chat(&self.vision_model, messages).await?)
    }

    async fn narrate(&self, context: &str) -> Result<String, DomainError> {
        let messages = vec![ChatMessage::system(prompts::narration(context))];
        Ok(self.chat(&self.story_model, messages).await?)
    }

    async fn rewrite_with_choices(&self, draft: &str) -> Result<String, DomainError> {
        let messages = vec![ChatMessage::system(prompts::rewrite(draft))];
        Ok(self.chat(&self.story_model, messages).await?)
    }

    async fn conclude(&self, context: &str) -> Result<String, DomainError> {
        let messages = vec![ChatMessage::system(prompts::conclusion(context))];
        Ok(self.chat(&self.story_model, messages).await?)
    }
}
