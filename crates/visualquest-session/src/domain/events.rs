//! Domain events for the narrative session context.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use visualquest_core::event::{DomainEvent, EventMetadata};
use visualquest_core::generation::ImagePayload;

use super::segment::DecisionSource;

/// Emitted when an image is attached to the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAttached {
    /// The session the image belongs to.
    pub session_id: Uuid,
    /// The attached image.
    pub image: ImagePayload,
}

/// Emitted when the adventure is started with a configured step limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdventureStarted {
    /// The session identifier.
    pub session_id: Uuid,
    /// Number of decisions before the story concludes.
    pub step_limit: u32,
}

/// Emitted when the vision model has described the attached image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageDescribed {
    /// The session identifier.
    pub session_id: Uuid,
    /// Identifier of the caption segment appended to history.
    pub segment_id: Uuid,
    /// The image description.
    pub caption: String,
}

/// Emitted when a story segment (opening or continuation) is generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneNarrated {
    /// The session identifier.
    pub session_id: Uuid,
    /// Identifier of the story segment appended to history.
    pub segment_id: Uuid,
    /// The generated story text, ending in three enumerated choices.
    pub narrative: String,
}

/// Emitted when the player's decision is accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecorded {
    /// The session identifier.
    pub session_id: Uuid,
    /// Identifier of the decision segment appended to history.
    pub segment_id: Uuid,
    /// The decision text.
    pub text: String,
    /// Whether the decision was typed or transcribed from speech.
    pub source: DecisionSource,
}

/// Emitted when the story's conclusion is generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdventureConcluded {
    /// The session identifier.
    pub session_id: Uuid,
    /// Identifier of the conclusion segment appended to history.
    pub segment_id: Uuid,
    /// The generated conclusion text.
    pub narrative: String,
}

/// Event type identifier for [`ImageAttached`].
pub const IMAGE_ATTACHED_EVENT_TYPE: &str = "adventure.image_attached";

/// Event type identifier for [`AdventureStarted`].
pub const ADVENTURE_STARTED_EVENT_TYPE: &str = "adventure.started";

/// Event type identifier for [`ImageDescribed`].
pub const IMAGE_DESCRIBED_EVENT_TYPE: &str = "adventure.image_described";

/// Event type identifier for [`SceneNarrated`].
pub const SCENE_NARRATED_EVENT_TYPE: &str = "adventure.scene_narrated";

/// Event type identifier for [`DecisionRecorded`].
pub const DECISION_RECORDED_EVENT_TYPE: &str = "adventure.decision_recorded";

/// Event type identifier for [`AdventureConcluded`].
pub const ADVENTURE_CONCLUDED_EVENT_TYPE: &str = "adventure.concluded";

/// Event payload variants for the narrative session context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AdventureEventKind {
    /// An image has been attached.
    ImageAttached(ImageAttached),
    /// The adventure has started.
    AdventureStarted(AdventureStarted),
    /// The attached image has been described.
    ImageDescribed(ImageDescribed),
    /// A story segment has been generated.
    SceneNarrated(SceneNarrated),
    /// A player decision has been recorded.
    DecisionRecorded(DecisionRecorded),
    /// The adventure has concluded.
    AdventureConcluded(AdventureConcluded),
}

/// Domain event envelope for the narrative session context.
#[derive(Debug, Clone)]
pub struct AdventureEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: AdventureEventKind,
}

impl DomainEvent for AdventureEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            AdventureEventKind::ImageAttached(_) => IMAGE_ATTACHED_EVENT_TYPE,
            AdventureEventKind::AdventureStarted(_) => ADVENTURE_STARTED_EVENT_TYPE,
            AdventureEventKind::ImageDescribed(_) => IMAGE_DESCRIBED_EVENT_TYPE,
            AdventureEventKind::SceneNarrated(_) => SCENE_NARRATED_EVENT_TYPE,
            AdventureEventKind::DecisionRecorded(_) => DECISION_RECORDED_EVENT_TYPE,
            AdventureEventKind::AdventureConcluded(_) => ADVENTURE_CONCLUDED_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("AdventureEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
