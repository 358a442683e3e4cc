//! Shared application state.

use std::sync::Arc;

use visualquest_core::clock::Clock;
use visualquest_core::generation::StoryGenerator;
use visualquest_core::repository::EventRepository;
use visualquest_core::transcription::Transcriber;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock used to timestamp domain events.
    pub clock: Arc<dyn Clock>,
    /// Event store backing session streams.
    pub event_repository: Arc<dyn EventRepository>,
    /// The story generation adapter.
    pub generator: Arc<dyn StoryGenerator>,
    /// The speech-to-text adapter.
    pub transcriber: Arc<dyn Transcriber>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        event_repository: Arc<dyn EventRepository>,
        generator: Arc<dyn StoryGenerator>,
        transcriber: Arc<dyn Transcriber>,
    ) -> Self {
        Self {
            clock,
            event_repository,
            generator,
            transcriber,
        }
    }
}
