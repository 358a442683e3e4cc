//! Narrative segments — the units of session history.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The role a segment plays in the adventure history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// The vision model's description of the attached image.
    Caption,
    /// A generated story segment (opening or continuation).
    Story,
    /// A decision supplied by the player.
    Decision,
    /// The generated ending of the adventure.
    Conclusion,
}

/// One unit of narrative or decision text in session history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment identifier.
    pub id: Uuid,
    /// What kind of history entry this is.
    pub kind: SegmentKind,
    /// The segment text.
    pub text: String,
}

/// How a decision reached the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    /// The player typed the decision.
    Typed,
    /// The decision was spoken and transcribed.
    Transcribed,
}
