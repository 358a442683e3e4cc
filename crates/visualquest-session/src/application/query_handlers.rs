//! Query handlers for the narrative session context.
//!
//! This module contains query handlers that reconstitute the adventure
//! from stored events and return read-only view DTOs.

use serde::Serialize;
use uuid::Uuid;
use visualquest_core::error::DomainError;
use visualquest_core::repository::EventRepository;

use crate::application::command_handlers;
use crate::domain::aggregates::Phase;
use crate::domain::segment::Segment;

/// Read-only view of an adventure session aggregate.
#[derive(Debug, Serialize)]
pub struct AdventureView {
    /// The session identifier.
    pub session_id: Uuid,
    /// Current lifecycle phase.
    pub phase: Phase,
    /// Decisions accepted so far.
    pub step_count: u32,
    /// Configured number of decisions before the conclusion.
    pub step_limit: u32,
    /// Ordered session history.
    pub segments: Vec<Segment>,
    /// Current version (event count).
    pub version: i64,
}

/// Retrieves an adventure session by its aggregate ID.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub async fn get_adventure_by_id(
    session_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<AdventureView, DomainError> {
    let stored_events = repo.load_events(session_id).await?;
    if stored_events.is_empty() {
        return Err(DomainError::AggregateNotFound(session_id));
    }
    let adventure = command_handlers::reconstitute(session_id, &stored_events)?;
    Ok(AdventureView {
        session_id,
        phase: adventure.phase(),
        step_count: adventure.step_count(),
        step_limit: adventure.step_limit(),
        segments: adventure.segments().to_vec(),
        version: adventure.version,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;
    use visualquest_core::error::DomainError;
    use visualquest_core::generation::{ImageContentType, ImagePayload};
    use visualquest_core::repository::StoredEvent;

    use crate::application::query_handlers::get_adventure_by_id;
    use crate::domain::aggregates::Phase;
    use crate::domain::events::{AdventureEventKind, ImageAttached};
    use visualquest_test_support::{EmptyEventRepository, RecordingEventRepository};

    #[tokio::test]
    async fn test_get_adventure_by_id_returns_view_with_state() {
        // Arrange
        let session_id = Uuid::new_v4();
        let fixed_now = Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap();

        let events = vec![StoredEvent {
            event_id: Uuid::new_v4(),
            aggregate_id: session_id,
            event_type: "adventure.image_attached".to_owned(),
            payload: serde_json::to_value(AdventureEventKind::ImageAttached(ImageAttached {
                session_id,
                image: ImagePayload {
                    content_type: ImageContentType::Png,
                    data_base64: "aGVsbG8=".to_owned(),
                },
            }))
            .unwrap(),
            sequence_number: 1,
            correlation_id: Uuid::new_v4(),
            causation_id: Uuid::new_v4(),
            occurred_at: fixed_now,
        }];
        let repo = RecordingEventRepository::new(Ok(events));

        // Act
        let view = get_adventure_by_id(session_id, &repo).await.unwrap();

        // Assert
        assert_eq!(view.session_id, session_id);
        assert_eq!(view.phase, Phase::ImageSelected);
        assert_eq!(view.step_count, 0);
        assert!(view.segments.is_empty());
        assert_eq!(view.version, 1);
    }

    #[tokio::test]
    async fn test_get_adventure_by_id_returns_not_found_when_no_events() {
        // Arrange
        let session_id = Uuid::new_v4();
        let repo = EmptyEventRepository;

        // Act
        let result = get_adventure_by_id(session_id, &repo).await;

        // Assert
        assert!(result.is_err());
        match result.unwrap_err() {
            DomainError::AggregateNotFound(id) => assert_eq!(id, session_id),
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
    }
}
