//! Shared test mocks and utilities for the VisualQuest service.

mod clock;
mod generation;
mod repository;
mod transcription;

pub use clock::FixedClock;
pub use generation::{FailingGenerator, ScriptedGenerator};
pub use repository::{EmptyEventRepository, FailingEventRepository, RecordingEventRepository};
pub use transcription::{FailingTranscriber, ScriptedTranscriber};
