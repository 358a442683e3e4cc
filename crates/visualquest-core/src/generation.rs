//! Story generation abstraction.
//!
//! The session context drives all narrative generation through the
//! [`StoryGenerator`] trait. Production implementations call a remote
//! model provider; tests inject scripted implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Image formats accepted for starting an adventure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageContentType {
    /// `image/png`
    #[serde(rename = "image/png")]
    Png,
    /// `image/jpeg`
    #[serde(rename = "image/jpeg")]
    Jpeg,
}

impl ImageContentType {
    /// Parses a MIME type string.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for any type other than
    /// `image/png` or `image/jpeg`.
    pub fn parse(mime: &str) -> Result<Self, DomainError> {
        match mime {
            "image/png" => Ok(Self::Png),
            "image/jpeg" | "image/jpg" => Ok(Self::Jpeg),
            other => Err(DomainError::Validation(format!(
                "unsupported image content type: {other}"
            ))),
        }
    }

    /// Returns the canonical MIME type string.
    #[must_use]
    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

impl std::fmt::Display for ImageContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_mime())
    }
}

/// An image attached to a session, held as base64 so it can travel in
/// event payloads and model requests without re-encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload {
    /// The image MIME type.
    pub content_type: ImageContentType,
    /// Base64-encoded image bytes.
    pub data_base64: String,
}

impl ImagePayload {
    /// Renders the payload as a `data:` URL for vision model requests.
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, self.data_base64)
    }
}

/// Port for all narrative generation calls.
///
/// Each method is one stateless request to the model provider: the only
/// context the model sees is what is embedded in the prompt string.
#[async_trait]
pub trait StoryGenerator: Send + Sync {
    /// Describes the attached image with a vision model.
    async fn describe_image(&self, image: &ImagePayload) -> Result<String, DomainError>;

    /// Generates a story segment from prior context (an image description
    /// or the player's latest decision).
    async fn narrate(&self, context: &str) -> Result<String, DomainError>;

    /// Rewrites a draft segment so it ends with exactly three enumerated
    /// choices for the player.
    async fn rewrite_with_choices(&self, draft: &str) -> Result<String, DomainError>;

    /// Generates the story's conclusion from the player's final decision.
    async fn conclude(&self, context: &str) -> Result<String, DomainError>;
}
