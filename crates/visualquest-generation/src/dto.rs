//! Wire types for OpenAI-compatible chat completions endpoints.

use serde::{Deserialize, Serialize};

/// One request message.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// Role: "system" or "user".
    pub role: String,
    /// Message content — plain text, or text plus an image part.
    pub content: MessageContent,
}

impl ChatMessage {
    /// A plain system message. The original prompts ride in the system role.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system".to_owned(),
            content: MessageContent::Text(text.into()),
        }
    }

    /// A user message pairing prompt text with an image `data:` URL, the
    /// shape vision models expect.
    pub fn user_with_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            role: "user".to_owned(),
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_url.into(),
                    },
                },
            ]),
        }
    }
}

/// Message content: a bare string or a list of typed parts.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text content.
    Text(String),
    /// Multi-part content (text and image parts).
    Parts(Vec<ContentPart>),
}

/// One part of a multi-part message.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// A text part.
    Text {
        /// The text.
        text: String,
    },
    /// An image part.
    ImageUrl {
        /// The image reference.
        image_url: ImageUrl,
    },
}

/// An image reference inside a message part.
#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    /// The image URL (a `data:` URL here).
    pub url: String,
}

/// Chat completion request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model identifier.
    pub model: String,
    /// Conversation messages.
    pub messages: Vec<ChatMessage>,
}

/// A message inside a response choice.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionMessage {
    /// Role of the completion (normally "assistant").
    pub role: String,
    /// The completion text.
    pub content: String,
}

/// A choice in the response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// The completion message.
    pub message: CompletionMessage,
    /// Reason the model stopped.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token usage statistics.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatUsage {
    /// Tokens in the prompt.
    #[serde(default)]
    pub prompt_tokens: Option<u32>,
    /// Tokens in the completion.
    #[serde(default)]
    pub completion_tokens: Option<u32>,
    /// Total tokens.
    #[serde(default)]
    pub total_tokens: Option<u32>,
}

/// Chat completion response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Response choices.
    pub choices: Vec<ChatChoice>,
    /// Token usage, when the provider reports it.
    #[serde(default)]
    pub usage: Option<ChatUsage>,
}
