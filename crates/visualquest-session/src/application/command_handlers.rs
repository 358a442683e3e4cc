//! Command handlers for the narrative session context.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: load aggregate, execute command, persist events.
//! Handlers that need generated content call the story generator between the
//! guard and the emit, so a failed generation call leaves the stream
//! untouched and surfaces as an error instead of story text.

use uuid::Uuid;
use visualquest_core::aggregate::AggregateRoot;
use visualquest_core::clock::Clock;
use visualquest_core::error::DomainError;
use visualquest_core::event::DomainEvent;
use visualquest_core::generation::StoryGenerator;
use visualquest_core::repository::{EventRepository, StoredEvent};

use crate::domain::aggregates::{Adventure, DecisionResponse, NextGeneration};
use crate::domain::commands::{AttachImage, ResetAdventure, StartAdventure, SubmitDecision};
use crate::domain::events::{AdventureEvent, AdventureEventKind};
use crate::domain::segment::{Segment, SegmentKind};

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct AdventureCommandResult {
    /// The aggregate ID affected by the command.
    pub aggregate_id: Uuid,
    /// The stored events produced and persisted.
    pub stored_events: Vec<StoredEvent>,
    /// History segments appended by this command, in order.
    pub segments: Vec<Segment>,
    /// Whether this command concluded the adventure.
    pub concluded: bool,
}

fn to_stored_event(event: &AdventureEvent) -> StoredEvent {
    let meta = event.metadata();
    StoredEvent {
        event_id: meta.event_id,
        aggregate_id: meta.aggregate_id,
        event_type: event.event_type().to_owned(),
        payload: event.to_payload(),
        sequence_number: meta.sequence_number,
        correlation_id: meta.correlation_id,
        causation_id: meta.causation_id,
        occurred_at: meta.occurred_at,
    }
}

/// Maps an event to the history segment it appends, if any.
fn segment_of(event: &AdventureEvent) -> Option<Segment> {
    match &event.kind {
        AdventureEventKind::ImageDescribed(payload) => Some(Segment {
            id: payload.segment_id,
            kind: SegmentKind::Caption,
            text: payload.caption.clone(),
        }),
        AdventureEventKind::SceneNarrated(payload) => Some(Segment {
            id: payload.segment_id,
            kind: SegmentKind::Story,
            text: payload.narrative.clone(),
        }),
        AdventureEventKind::DecisionRecorded(payload) => Some(Segment {
            id: payload.segment_id,
            kind: SegmentKind::Decision,
            text: payload.text.clone(),
        }),
        AdventureEventKind::AdventureConcluded(payload) => Some(Segment {
            id: payload.segment_id,
            kind: SegmentKind::Conclusion,
            text: payload.narrative.clone(),
        }),
        AdventureEventKind::ImageAttached(_) | AdventureEventKind::AdventureStarted(_) => None,
    }
}

/// Reconstitutes an `Adventure` from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub(crate) fn reconstitute(
    session_id: Uuid,
    existing_events: &[StoredEvent],
) -> Result<Adventure, DomainError> {
    let mut adventure = Adventure::new(session_id);
    for stored in existing_events {
        let kind: AdventureEventKind =
            serde_json::from_value(stored.payload.clone()).map_err(|e| {
                DomainError::Infrastructure(format!("event deserialization failed: {e}"))
            })?;
        let event = AdventureEvent {
            metadata: visualquest_core::event::EventMetadata {
                event_id: stored.event_id,
                event_type: stored.event_type.clone(),
                aggregate_id: stored.aggregate_id,
                sequence_number: stored.sequence_number,
                correlation_id: stored.correlation_id,
                causation_id: stored.causation_id,
                occurred_at: stored.occurred_at,
            },
            kind,
        };
        adventure.apply(&event);
    }
    Ok(adventure)
}

/// Persists the aggregate's uncommitted events and builds the command result.
async fn persist_uncommitted(
    adventure: &Adventure,
    repo: &dyn EventRepository,
) -> Result<AdventureCommandResult, DomainError> {
    let uncommitted = adventure.uncommitted_events();

    let stored_events: Vec<StoredEvent> = uncommitted.iter().map(to_stored_event).collect();
    let segments: Vec<Segment> = uncommitted.iter().filter_map(segment_of).collect();
    let concluded = uncommitted
        .iter()
        .any(|e| matches!(e.kind, AdventureEventKind::AdventureConcluded(_)));

    repo.append_events(adventure.id, adventure.version(), &stored_events)
        .await?;

    Ok(AdventureCommandResult {
        aggregate_id: adventure.id,
        stored_events,
        segments,
        concluded,
    })
}

/// Handles the `AttachImage` command: reconstitutes the session (creating it
/// on first touch), attaches the image, and persists the resulting event.
///
/// # Errors
///
/// Returns `DomainError` if the adventure has already started or if event
/// loading or appending fails.
pub async fn handle_attach_image(
    command: &AttachImage,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<AdventureCommandResult, DomainError> {
    let existing_events = repo.load_events(command.session_id).await?;
    let mut adventure = reconstitute(command.session_id, &existing_events)?;

    adventure.attach_image(command.image.clone(), command.correlation_id, clock)?;

    persist_uncommitted(&adventure, repo).await
}

/// Handles the `StartAdventure` command: describes the attached image with
/// the vision model, generates the opening story segment (with the
/// three-choice rewrite pass), and persists the whole batch atomically.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the session cannot start,
/// `DomainError::Generation` if any model call fails, or other variants if
/// event loading or appending fails.
pub async fn handle_start_adventure(
    command: &StartAdventure,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
    generator: &dyn StoryGenerator,
) -> Result<AdventureCommandResult, DomainError> {
    let existing_events = repo.load_events(command.session_id).await?;
    let mut adventure = reconstitute(command.session_id, &existing_events)?;

    // Guard before paying for any model call.
    let image = adventure.ensure_can_start(command.step_limit)?.clone();

    let caption = generator.describe_image(&image).await?;
    let draft = generator.narrate(&caption).await?;
    let opening = generator.rewrite_with_choices(&draft).await?;

    adventure.start(
        command.step_limit,
        caption,
        opening,
        command.correlation_id,
        clock,
    )?;

    persist_uncommitted(&adventure, repo).await
}

/// Handles the `SubmitDecision` command: records the decision together with
/// the generated continuation, or the conclusion once the decision brings
/// the session to its step limit.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown session,
/// `DomainError::Validation` if no decision is currently accepted,
/// `DomainError::Generation` if any model call fails, or other variants if
/// event loading or appending fails.
pub async fn handle_submit_decision(
    command: &SubmitDecision,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
    generator: &dyn StoryGenerator,
) -> Result<AdventureCommandResult, DomainError> {
    let existing_events = repo.load_events(command.session_id).await?;
    if existing_events.is_empty() {
        return Err(DomainError::AggregateNotFound(command.session_id));
    }
    let mut adventure = reconstitute(command.session_id, &existing_events)?;

    // Guard before paying for any model call. The model only ever sees the
    // decision text itself; no conversation history is forwarded.
    let response = match adventure.ensure_can_decide(&command.text)? {
        NextGeneration::Continuation => {
            let draft = generator.narrate(&command.text).await?;
            DecisionResponse::Continuation(generator.rewrite_with_choices(&draft).await?)
        }
        NextGeneration::Conclusion => {
            DecisionResponse::Conclusion(generator.conclude(&command.text).await?)
        }
    };

    adventure.record_decision(
        command.text.clone(),
        command.source,
        response,
        command.correlation_id,
        clock,
    )?;

    persist_uncommitted(&adventure, repo).await
}

/// Handles the `ResetAdventure` command: purges the session's event stream,
/// returning it to the initial empty-history state. Valid from any phase;
/// resetting an unknown session is a no-op.
///
/// # Errors
///
/// Returns `DomainError` if the purge fails.
pub async fn handle_reset_adventure(
    command: &ResetAdventure,
    repo: &dyn EventRepository,
) -> Result<(), DomainError> {
    repo.purge_events(command.session_id).await
}
