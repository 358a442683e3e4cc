//! In-memory implementation of the `EventRepository` trait.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use visualquest_core::error::DomainError;
use visualquest_core::repository::{EventRepository, StoredEvent};

/// Process-memory event repository keyed by aggregate ID.
///
/// Appends enforce optimistic concurrency: `expected_version` must equal the
/// stream's current length or the append is rejected with a conflict.
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    streams: RwLock<HashMap<Uuid, Vec<StoredEvent>>>,
}

impl InMemoryEventRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_poisoned() -> DomainError {
        DomainError::Infrastructure("session store lock poisoned".to_owned())
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        let streams = self.streams.read().map_err(|_| Self::lock_poisoned())?;
        Ok(streams.get(&aggregate_id).cloned().unwrap_or_default())
    }

    #[allow(clippy::cast_possible_wrap)]
    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        let mut streams = self.streams.write().map_err(|_| Self::lock_poisoned())?;
        let stream = streams.entry(aggregate_id).or_default();

        let actual = stream.len() as i64;
        if actual != expected_version {
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id,
                expected: expected_version,
                actual,
            });
        }

        stream.extend_from_slice(events);
        Ok(())
    }

    async fn purge_events(&self, aggregate_id: Uuid) -> Result<(), DomainError> {
        let mut streams = self.streams.write().map_err(|_| Self::lock_poisoned())?;
        streams.remove(&aggregate_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn stored_event(aggregate_id: Uuid, sequence_number: i64) -> StoredEvent {
        StoredEvent {
            event_id: Uuid::new_v4(),
            aggregate_id,
            event_type: "adventure.scene_narrated".to_owned(),
            payload: serde_json::json!({ "narrative": "The fog parts..." }),
            sequence_number,
            correlation_id: Uuid::new_v4(),
            causation_id: Uuid::new_v4(),
            occurred_at: Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_load_events_on_unknown_stream_is_empty() {
        // Arrange
        let repo = InMemoryEventRepository::new();

        // Act
        let events = repo.load_events(Uuid::new_v4()).await.unwrap();

        // Assert
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_append_then_load_round_trip() {
        // Arrange
        let repo = InMemoryEventRepository::new();
        let aggregate_id = Uuid::new_v4();
        let events = vec![stored_event(aggregate_id, 1), stored_event(aggregate_id, 2)];

        // Act
        repo.append_events(aggregate_id, 0, &events).await.unwrap();
        let loaded = repo.load_events(aggregate_id).await.unwrap();

        // Assert
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].sequence_number, 1);
        assert_eq!(loaded[1].sequence_number, 2);
    }

    #[tokio::test]
    async fn test_append_with_stale_version_conflicts() {
        // Arrange
        let repo = InMemoryEventRepository::new();
        let aggregate_id = Uuid::new_v4();
        repo.append_events(aggregate_id, 0, &[stored_event(aggregate_id, 1)])
            .await
            .unwrap();

        // Act — a second writer that never saw the first append.
        let result = repo
            .append_events(aggregate_id, 0, &[stored_event(aggregate_id, 1)])
            .await;

        // Assert
        match result.unwrap_err() {
            DomainError::ConcurrencyConflict {
                aggregate_id: id,
                expected,
                actual,
            } => {
                assert_eq!(id, aggregate_id);
                assert_eq!(expected, 0);
                assert_eq!(actual, 1);
            }
            other => panic!("expected ConcurrencyConflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_purge_clears_the_stream() {
        // Arrange
        let repo = InMemoryEventRepository::new();
        let aggregate_id = Uuid::new_v4();
        repo.append_events(aggregate_id, 0, &[stored_event(aggregate_id, 1)])
            .await
            .unwrap();

        // Act
        repo.purge_events(aggregate_id).await.unwrap();

        // Assert
        assert!(repo.load_events(aggregate_id).await.unwrap().is_empty());
        // A fresh stream accepts version-0 appends again.
        repo.append_events(aggregate_id, 0, &[stored_event(aggregate_id, 1)])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_purge_unknown_stream_is_noop() {
        // Arrange
        let repo = InMemoryEventRepository::new();

        // Act & Assert
        repo.purge_events(Uuid::new_v4()).await.unwrap();
    }
}
