//! Aggregate root for the narrative session context.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use visualquest_core::aggregate::AggregateRoot;
use visualquest_core::clock::Clock;
use visualquest_core::error::DomainError;
use visualquest_core::event::{DomainEvent, EventMetadata};
use visualquest_core::generation::ImagePayload;

use super::events::{
    AdventureConcluded, AdventureEvent, AdventureEventKind, AdventureStarted, DecisionRecorded,
    ImageAttached, ImageDescribed, SceneNarrated,
};
use super::segment::{DecisionSource, Segment, SegmentKind};

/// Smallest accepted step limit.
pub const MIN_STEP_LIMIT: u32 = 1;

/// Largest accepted step limit.
pub const MAX_STEP_LIMIT: u32 = 20;

/// Step limit applied when the client does not supply one.
pub const DEFAULT_STEP_LIMIT: u32 = 5;

/// Lifecycle phase of an adventure session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No image attached yet.
    Idle,
    /// An image is attached; the adventure has not started.
    ImageSelected,
    /// A story segment is owed for the latest input.
    Generating,
    /// The story is waiting for the player's next decision.
    AwaitingChoice,
    /// The final decision is in; a conclusion is owed.
    Concluding,
    /// The adventure has concluded.
    Complete,
}

/// Which kind of generation the next decision requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextGeneration {
    /// The story continues; generate the next segment with choices.
    Continuation,
    /// This is the final decision; generate the conclusion.
    Conclusion,
}

/// The response generated for an accepted decision.
#[derive(Debug, Clone)]
pub enum DecisionResponse {
    /// A continuation segment ending in three choices.
    Continuation(String),
    /// The story's conclusion.
    Conclusion(String),
}

/// The aggregate root for one adventure session.
///
/// All state is derived by replaying the session's event stream; history is
/// append-only and only a stream purge (reset) clears it.
#[derive(Debug)]
pub struct Adventure {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    /// Current lifecycle phase.
    pub(crate) phase: Phase,
    /// Decisions accepted so far.
    pub(crate) step_count: u32,
    /// Configured number of decisions before the conclusion.
    pub(crate) step_limit: u32,
    /// The image the adventure is seeded from.
    pub(crate) active_image: Option<ImagePayload>,
    /// Ordered session history.
    pub(crate) segments: Vec<Segment>,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<AdventureEvent>,
}

impl Adventure {
    /// Creates a new, empty adventure session.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            phase: Phase::Idle,
            step_count: 0,
            step_limit: DEFAULT_STEP_LIMIT,
            active_image: None,
            segments: Vec::new(),
            uncommitted_events: Vec::new(),
        }
    }

    /// Returns the current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the number of decisions accepted so far.
    #[must_use]
    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    /// Returns the configured step limit.
    #[must_use]
    pub fn step_limit(&self) -> u32 {
        self.step_limit
    }

    /// Returns the ordered session history.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the next sequence number for a new event.
    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    fn emit(&mut self, kind: AdventureEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let mut event = AdventureEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: String::new(),
                aggregate_id: self.id,
                sequence_number: self.next_sequence_number(),
                correlation_id,
                causation_id: correlation_id,
                occurred_at: clock.now(),
            },
            kind,
        };
        // The envelope derives its type name from the payload variant.
        let event_type = event.event_type().to_owned();
        event.metadata.event_type = event_type;

        self.uncommitted_events.push(event);
    }

    /// Validates that an image can currently be attached.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` once the adventure has started.
    pub fn ensure_can_attach_image(&self) -> Result<(), DomainError> {
        match self.phase {
            Phase::Idle | Phase::ImageSelected => Ok(()),
            _ => Err(DomainError::Validation(
                "an adventure is already in progress; reset before attaching a new image"
                    .to_owned(),
            )),
        }
    }

    /// Attaches (or replaces) the session's image, producing an
    /// `ImageAttached` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` once the adventure has started.
    pub fn attach_image(
        &mut self,
        image: ImagePayload,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_can_attach_image()?;

        self.emit(
            AdventureEventKind::ImageAttached(ImageAttached {
                session_id: self.id,
                image,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Validates that the adventure can start and returns the attached image.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the step limit is out of bounds,
    /// no image is attached, or the story has already begun.
    pub fn ensure_can_start(&self, step_limit: u32) -> Result<&ImagePayload, DomainError> {
        if !(MIN_STEP_LIMIT..=MAX_STEP_LIMIT).contains(&step_limit) {
            return Err(DomainError::Validation(format!(
                "step limit must be between {MIN_STEP_LIMIT} and {MAX_STEP_LIMIT}, got {step_limit}"
            )));
        }
        if !self.segments.is_empty() {
            return Err(DomainError::Validation(
                "the adventure has already started; reset to begin a new one".to_owned(),
            ));
        }
        match self.phase {
            Phase::ImageSelected => self.active_image.as_ref().ok_or_else(|| {
                DomainError::Validation("no image attached; attach an image first".to_owned())
            }),
            Phase::Idle => Err(DomainError::Validation(
                "no image attached; attach an image first".to_owned(),
            )),
            _ => Err(DomainError::Validation(
                "the adventure has already started; reset to begin a new one".to_owned(),
            )),
        }
    }

    /// Starts the adventure: records the step limit, the image caption, and
    /// the opening story segment as one atomic batch of events.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` under the same conditions as
    /// [`Adventure::ensure_can_start`].
    pub fn start(
        &mut self,
        step_limit: u32,
        caption: String,
        opening: String,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_can_start(step_limit)?;

        self.emit(
            AdventureEventKind::AdventureStarted(AdventureStarted {
                session_id: self.id,
                step_limit,
            }),
            correlation_id,
            clock,
        );
        self.emit(
            AdventureEventKind::ImageDescribed(ImageDescribed {
                session_id: self.id,
                segment_id: Uuid::new_v4(),
                caption,
            }),
            correlation_id,
            clock,
        );
        self.emit(
            AdventureEventKind::SceneNarrated(SceneNarrated {
                session_id: self.id,
                segment_id: Uuid::new_v4(),
                narrative: opening,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Validates that a decision can be accepted and reports whether it
    /// requires a continuation or the conclusion.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the text is blank or the session
    /// is not awaiting a choice.
    pub fn ensure_can_decide(&self, text: &str) -> Result<NextGeneration, DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::Validation("decision text is empty".to_owned()));
        }
        match self.phase {
            Phase::AwaitingChoice => {}
            Phase::Complete => {
                return Err(DomainError::Validation(
                    "the adventure has concluded; reset to begin a new one".to_owned(),
                ));
            }
            _ => {
                return Err(DomainError::Validation(
                    "no story in progress; start the adventure first".to_owned(),
                ));
            }
        }
        if self.step_count + 1 < self.step_limit {
            Ok(NextGeneration::Continuation)
        } else {
            Ok(NextGeneration::Conclusion)
        }
    }

    /// Records an accepted decision together with its generated response
    /// (continuation or conclusion) as one atomic batch of events.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` under the same conditions as
    /// [`Adventure::ensure_can_decide`], or if the response kind does not
    /// match the session's progress.
    pub fn record_decision(
        &mut self,
        text: String,
        source: DecisionSource,
        response: DecisionResponse,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let expected = self.ensure_can_decide(&text)?;
        match (expected, &response) {
            (NextGeneration::Continuation, DecisionResponse::Continuation(_))
            | (NextGeneration::Conclusion, DecisionResponse::Conclusion(_)) => {}
            _ => {
                return Err(DomainError::Validation(
                    "decision response does not match adventure progress".to_owned(),
                ));
            }
        }

        self.emit(
            AdventureEventKind::DecisionRecorded(DecisionRecorded {
                session_id: self.id,
                segment_id: Uuid::new_v4(),
                text,
                source,
            }),
            correlation_id,
            clock,
        );
        match response {
            DecisionResponse::Continuation(narrative) => {
                self.emit(
                    AdventureEventKind::SceneNarrated(SceneNarrated {
                        session_id: self.id,
                        segment_id: Uuid::new_v4(),
                        narrative,
                    }),
                    correlation_id,
                    clock,
                );
            }
            DecisionResponse::Conclusion(narrative) => {
                self.emit(
                    AdventureEventKind::AdventureConcluded(AdventureConcluded {
                        session_id: self.id,
                        segment_id: Uuid::new_v4(),
                        narrative,
                    }),
                    correlation_id,
                    clock,
                );
            }
        }
        Ok(())
    }
}

impl AggregateRoot for Adventure {
    type Event = AdventureEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            AdventureEventKind::ImageAttached(payload) => {
                self.active_image = Some(payload.image.clone());
                self.phase = Phase::ImageSelected;
            }
            AdventureEventKind::AdventureStarted(payload) => {
                self.step_limit = payload.step_limit;
                self.phase = Phase::Generating;
            }
            AdventureEventKind::ImageDescribed(payload) => {
                self.segments.push(Segment {
                    id: payload.segment_id,
                    kind: SegmentKind::Caption,
                    text: payload.caption.clone(),
                });
            }
            AdventureEventKind::SceneNarrated(payload) => {
                self.segments.push(Segment {
                    id: payload.segment_id,
                    kind: SegmentKind::Story,
                    text: payload.narrative.clone(),
                });
                self.phase = Phase::AwaitingChoice;
            }
            AdventureEventKind::DecisionRecorded(payload) => {
                self.segments.push(Segment {
                    id: payload.segment_id,
                    kind: SegmentKind::Decision,
                    text: payload.text.clone(),
                });
                self.step_count += 1;
                self.phase = if self.step_count < self.step_limit {
                    Phase::Generating
                } else {
                    Phase::Concluding
                };
            }
            AdventureEventKind::AdventureConcluded(payload) => {
                self.segments.push(Segment {
                    id: payload.segment_id,
                    kind: SegmentKind::Conclusion,
                    text: payload.narrative.clone(),
                });
                self.phase = Phase::Complete;
            }
        }
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}
