//! Agenda track persistence boundary and its in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{AggregateId, ConferenceId, Version};
use kernel::Aggregate;
use messaging::{AppError, Result};
use tokio::sync::RwLock;

use super::AgendaTrack;

/// Loads and stores agenda tracks, with the same optimistic concurrency
/// rules as submissions.
#[async_trait]
pub trait AgendaTrackRepository: Send + Sync {
    async fn get(&self, id: AggregateId) -> Result<Option<AgendaTrack>>;

    async fn browse_by_conference(&self, conference_id: ConferenceId) -> Result<Vec<AgendaTrack>>;

    async fn exists(&self, id: AggregateId) -> Result<bool>;

    async fn add(&self, track: &AgendaTrack) -> Result<()>;

    /// Stores `track` if the persisted copy is still at `expected_version`.
    async fn update(&self, track: &AgendaTrack, expected_version: Version) -> Result<()>;

    async fn delete(&self, track: &AgendaTrack) -> Result<()>;
}

#[derive(Debug, Default)]
struct InMemoryAgendaTrackState {
    tracks: HashMap<AggregateId, AgendaTrack>,
    fail_on_write: bool,
}

/// In-memory agenda track store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAgendaTrackRepository {
    state: Arc<RwLock<InMemoryAgendaTrackState>>,
}

impl InMemoryAgendaTrackRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the repository to fail every write.
    pub async fn set_fail_on_write(&self, fail: bool) {
        self.state.write().await.fail_on_write = fail;
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.tracks.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn unavailable() -> AppError {
    AppError::Persistence("agenda track store unavailable".to_string())
}

fn persisted(track: &AgendaTrack) -> AgendaTrack {
    let mut stored = track.clone();
    stored.take_events();
    stored
}

#[async_trait]
impl AgendaTrackRepository for InMemoryAgendaTrackRepository {
    async fn get(&self, id: AggregateId) -> Result<Option<AgendaTrack>> {
        Ok(self.state.read().await.tracks.get(&id).cloned())
    }

    async fn browse_by_conference(&self, conference_id: ConferenceId) -> Result<Vec<AgendaTrack>> {
        let state = self.state.read().await;
        Ok(state
            .tracks
            .values()
            .filter(|track| track.conference_id() == conference_id)
            .cloned()
            .collect())
    }

    async fn exists(&self, id: AggregateId) -> Result<bool> {
        Ok(self.state.read().await.tracks.contains_key(&id))
    }

    async fn add(&self, track: &AgendaTrack) -> Result<()> {
        let mut state = self.state.write().await;
        if state.fail_on_write {
            return Err(unavailable());
        }
        if let Some(existing) = state.tracks.get(&track.id()) {
            return Err(AppError::ConcurrencyConflict {
                aggregate_id: track.id(),
                expected: Version::initial(),
                actual: existing.version(),
            });
        }

        state.tracks.insert(track.id(), persisted(track));
        tracing::debug!(track_id = %track.id(), "agenda track added");
        Ok(())
    }

    async fn update(&self, track: &AgendaTrack, expected_version: Version) -> Result<()> {
        let mut state = self.state.write().await;
        if state.fail_on_write {
            return Err(unavailable());
        }

        let actual = state
            .tracks
            .get(&track.id())
            .map(|stored| stored.version())
            .ok_or_else(|| AppError::not_found(AgendaTrack::aggregate_type(), track.id()))?;
        if actual != expected_version {
            return Err(AppError::ConcurrencyConflict {
                aggregate_id: track.id(),
                expected: expected_version,
                actual,
            });
        }

        state.tracks.insert(track.id(), persisted(track));
        tracing::debug!(
            track_id = %track.id(),
            version = %track.version(),
            "agenda track updated"
        );
        Ok(())
    }

    async fn delete(&self, track: &AgendaTrack) -> Result<()> {
        let mut state = self.state.write().await;
        if state.fail_on_write {
            return Err(unavailable());
        }

        state
            .tracks
            .remove(&track.id())
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(AgendaTrack::aggregate_type(), track.id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use common::AgendaSlotId;

    fn track(conference_id: ConferenceId) -> AgendaTrack {
        AgendaTrack::create(AggregateId::new(), conference_id, "Room A").unwrap()
    }

    #[tokio::test]
    async fn add_then_get_returns_copy_without_pending_events() {
        let repository = InMemoryAgendaTrackRepository::new();
        let track = track(ConferenceId::new());

        repository.add(&track).await.unwrap();

        let stored = repository.get(track.id()).await.unwrap().unwrap();
        assert_eq!(stored.name(), "Room A");
        assert!(stored.events().is_empty());
        assert!(repository.exists(track.id()).await.unwrap());
        assert!(repository.add(&track).await.unwrap_err().is_concurrency_conflict());
    }

    #[tokio::test]
    async fn update_stores_slots_and_rejects_stale_versions() {
        let repository = InMemoryAgendaTrackRepository::new();
        let mut track = track(ConferenceId::new());
        repository.add(&track).await.unwrap();
        track.take_events();

        let expected = track.version();
        let from = Utc.with_ymd_and_hms(2026, 9, 10, 9, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2026, 9, 10, 10, 0, 0).unwrap();
        track
            .add_regular_slot(AgendaSlotId::new(), from, to, None)
            .unwrap();
        repository.update(&track, expected).await.unwrap();

        let stored = repository.get(track.id()).await.unwrap().unwrap();
        assert_eq!(stored.slots().len(), 1);
        assert_eq!(stored.version(), Version::new(2));

        let error = repository.update(&track, expected).await.unwrap_err();
        assert!(error.is_concurrency_conflict());
    }

    #[tokio::test]
    async fn browse_filters_by_conference_and_delete_removes() {
        let repository = InMemoryAgendaTrackRepository::new();
        let conference = ConferenceId::new();
        let kept = track(conference);
        let removed = track(conference);
        repository.add(&kept).await.unwrap();
        repository.add(&removed).await.unwrap();
        repository.add(&track(ConferenceId::new())).await.unwrap();

        repository.delete(&removed).await.unwrap();

        let tracks = repository.browse_by_conference(conference).await.unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id(), kept.id());
        assert_eq!(repository.len().await, 2);
        assert!(matches!(
            repository.delete(&removed).await,
            Err(AppError::NotFound { kind: "AgendaTrack", .. })
        ));
    }

    #[tokio::test]
    async fn failing_store_rejects_writes() {
        let repository = InMemoryAgendaTrackRepository::new();
        repository.set_fail_on_write(true).await;

        let error = repository.add(&track(ConferenceId::new())).await.unwrap_err();
        assert!(matches!(error, AppError::Persistence(_)));
        assert!(repository.is_empty().await);
    }
}
