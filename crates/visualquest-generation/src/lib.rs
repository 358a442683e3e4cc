//! VisualQuest — remote story generation adapter.
//!
//! Implements the [`visualquest_core::generation::StoryGenerator`] port
//! against any OpenAI-compatible chat completions endpoint: one vision model
//! for image description and one text model for narration, the three-choice
//! rewrite pass, and the conclusion.

pub mod client;
pub mod dto;
pub mod error;
pub mod prompts;

pub use client::OpenAiCompatClient;
pub use error::GenerationError;
