//! Commands for the narrative session context.

use uuid::Uuid;
use visualquest_core::command::Command;
use visualquest_core::generation::ImagePayload;

use super::segment::DecisionSource;

/// Command to attach (or replace) the session's image.
#[derive(Debug, Clone)]
pub struct AttachImage {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to attach the image to.
    pub session_id: Uuid,
    /// The image payload.
    pub image: ImagePayload,
}

impl Command for AttachImage {
    fn command_type(&self) -> &'static str {
        "adventure.attach_image"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to start the adventure from the attached image.
#[derive(Debug, Clone)]
pub struct StartAdventure {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to start.
    pub session_id: Uuid,
    /// Number of decisions before the story concludes.
    pub step_limit: u32,
}

impl Command for StartAdventure {
    fn command_type(&self) -> &'static str {
        "adventure.start"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to submit a player decision.
#[derive(Debug, Clone)]
pub struct SubmitDecision {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session the decision belongs to.
    pub session_id: Uuid,
    /// The decision text (typed, or already transcribed from speech).
    pub text: String,
    /// How the decision reached the service.
    pub source: DecisionSource,
}

impl Command for SubmitDecision {
    fn command_type(&self) -> &'static str {
        "adventure.submit_decision"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to reset the session to its initial empty state.
#[derive(Debug, Clone)]
pub struct ResetAdventure {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to reset.
    pub session_id: Uuid,
}

impl Command for ResetAdventure {
    fn command_type(&self) -> &'static str {
        "adventure.reset"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
