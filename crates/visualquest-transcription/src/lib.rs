//! VisualQuest — remote speech-to-text adapter.
//!
//! Implements the [`visualquest_core::transcription::Transcriber`] port
//! against an AssemblyAI-style service: upload the clip, create a transcript
//! job, poll until it completes.

pub mod client;
pub mod dto;
pub mod error;

pub use client::AssemblyAiClient;
pub use error::TranscriptionError;
