//! Speakers who present submissions.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{AggregateId, SpeakerId, Version};
use kernel::{Aggregate, AggregateRoot};
use messaging::{AppError, Result};
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeakerError {
    #[error("speaker {id} has an empty full name")]
    EmptySpeakerFullName { id: SpeakerId },
}

impl From<SpeakerError> for AppError {
    fn from(error: SpeakerError) -> Self {
        AppError::validation(error)
    }
}

/// A person presenting one or more submissions.
#[derive(Debug, Clone)]
pub struct Speaker {
    root: AggregateRoot,
    full_name: String,
}

impl Aggregate for Speaker {
    fn aggregate_type() -> &'static str {
        "Speaker"
    }

    fn root(&self) -> &AggregateRoot {
        &self.root
    }

    fn root_mut(&mut self) -> &mut AggregateRoot {
        &mut self.root
    }
}

impl Speaker {
    pub fn create(
        id: SpeakerId,
        full_name: impl Into<String>,
    ) -> std::result::Result<Self, SpeakerError> {
        let full_name = full_name.into();
        if full_name.trim().is_empty() {
            return Err(SpeakerError::EmptySpeakerFullName { id });
        }

        let mut root = AggregateRoot::new(AggregateId::from(id));
        root.increment_version();
        Ok(Self { root, full_name })
    }

    pub fn speaker_id(&self) -> SpeakerId {
        SpeakerId::from(self.id())
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }
}

/// Loads and stores speakers.
#[async_trait]
pub trait SpeakerRepository: Send + Sync {
    async fn get(&self, id: SpeakerId) -> Result<Option<Speaker>>;

    /// Returns the known speakers among `ids`. Unknown ids are skipped.
    async fn browse(&self, ids: &[SpeakerId]) -> Result<Vec<Speaker>>;

    async fn exists(&self, id: SpeakerId) -> Result<bool>;

    async fn add(&self, speaker: &Speaker) -> Result<()>;
}

/// In-memory speaker store.
#[derive(Debug, Clone, Default)]
pub struct InMemorySpeakerRepository {
    speakers: Arc<RwLock<HashMap<SpeakerId, Speaker>>>,
}

impl InMemorySpeakerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SpeakerRepository for InMemorySpeakerRepository {
    async fn get(&self, id: SpeakerId) -> Result<Option<Speaker>> {
        Ok(self.speakers.read().await.get(&id).cloned())
    }

    async fn browse(&self, ids: &[SpeakerId]) -> Result<Vec<Speaker>> {
        let speakers = self.speakers.read().await;
        Ok(ids.iter().filter_map(|id| speakers.get(id).cloned()).collect())
    }

    async fn exists(&self, id: SpeakerId) -> Result<bool> {
        Ok(self.speakers.read().await.contains_key(&id))
    }

    async fn add(&self, speaker: &Speaker) -> Result<()> {
        let mut speakers = self.speakers.write().await;
        if let Some(existing) = speakers.get(&speaker.speaker_id()) {
            return Err(AppError::ConcurrencyConflict {
                aggregate_id: speaker.id(),
                expected: Version::initial(),
                actual: existing.version(),
            });
        }

        let mut stored = speaker.clone();
        stored.take_events();
        speakers.insert(speaker.speaker_id(), stored);
        tracing::debug!(speaker_id = %speaker.speaker_id(), "speaker added");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_full_name_is_rejected() {
        let id = SpeakerId::new();
        assert_eq!(
            Speaker::create(id, " ").unwrap_err(),
            SpeakerError::EmptySpeakerFullName { id }
        );
    }

    #[test]
    fn created_speaker_keeps_its_identity() {
        let id = SpeakerId::new();
        let speaker = Speaker::create(id, "Grace Hopper").unwrap();
        assert_eq!(speaker.speaker_id(), id);
        assert_eq!(speaker.full_name(), "Grace Hopper");
        assert_eq!(speaker.version(), Version::first());
    }

    #[tokio::test]
    async fn browse_skips_unknown_ids() {
        let repository = InMemorySpeakerRepository::new();
        let known = Speaker::create(SpeakerId::new(), "Ada Lovelace").unwrap();
        repository.add(&known).await.unwrap();

        let found = repository
            .browse(&[known.speaker_id(), SpeakerId::new()])
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].full_name(), "Ada Lovelace");
        assert!(repository.exists(known.speaker_id()).await.unwrap());
        assert!(repository.add(&known).await.unwrap_err().is_concurrency_conflict());
    }
}
