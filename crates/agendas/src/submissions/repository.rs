//! Submission persistence boundary and its in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::{AggregateId, ConferenceId, Version};
use kernel::Aggregate;
use messaging::{AppError, Result};
use tokio::sync::RwLock;

use super::Submission;

/// Loads and stores submissions.
///
/// Writes are guarded by optimistic concurrency: `add` only succeeds for an
/// unknown id, `update` only when the stored version still equals the one
/// the caller loaded.
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn get(&self, id: AggregateId) -> Result<Option<Submission>>;

    async fn browse_by_conference(&self, conference_id: ConferenceId) -> Result<Vec<Submission>>;

    async fn exists(&self, id: AggregateId) -> Result<bool>;

    async fn add(&self, submission: &Submission) -> Result<()>;

    /// Stores `submission` if the persisted copy is still at `expected_version`.
    async fn update(&self, submission: &Submission, expected_version: Version) -> Result<()>;

    async fn delete(&self, submission: &Submission) -> Result<()>;
}

#[derive(Debug, Default)]
struct InMemorySubmissionState {
    submissions: HashMap<AggregateId, Submission>,
    fail_on_write: bool,
    write_latency: Option<Duration>,
}

/// In-memory submission store.
#[derive(Debug, Clone, Default)]
pub struct InMemorySubmissionRepository {
    state: Arc<RwLock<InMemorySubmissionState>>,
}

impl InMemorySubmissionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the repository to fail every write.
    pub async fn set_fail_on_write(&self, fail: bool) {
        self.state.write().await.fail_on_write = fail;
    }

    /// Delays every successful write by `latency` after it was committed.
    pub async fn set_write_latency(&self, latency: Option<Duration>) {
        self.state.write().await.write_latency = latency;
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.submissions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn settle(&self, latency: Option<Duration>) {
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

// Stored copies never carry pending events.
fn persisted(submission: &Submission) -> Submission {
    let mut stored = submission.clone();
    stored.take_events();
    stored
}

#[async_trait]
impl SubmissionRepository for InMemorySubmissionRepository {
    async fn get(&self, id: AggregateId) -> Result<Option<Submission>> {
        Ok(self.state.read().await.submissions.get(&id).cloned())
    }

    async fn browse_by_conference(&self, conference_id: ConferenceId) -> Result<Vec<Submission>> {
        let state = self.state.read().await;
        Ok(state
            .submissions
            .values()
            .filter(|submission| submission.conference_id() == conference_id)
            .cloned()
            .collect())
    }

    async fn exists(&self, id: AggregateId) -> Result<bool> {
        Ok(self.state.read().await.submissions.contains_key(&id))
    }

    async fn add(&self, submission: &Submission) -> Result<()> {
        let latency = {
            let mut state = self.state.write().await;
            if state.fail_on_write {
                return Err(AppError::Persistence("submission store unavailable".to_string()));
            }

            if let Some(existing) = state.submissions.get(&submission.id()) {
                return Err(AppError::ConcurrencyConflict {
                    aggregate_id: submission.id(),
                    expected: Version::initial(),
                    actual: existing.version(),
                });
            }

            state
                .submissions
                .insert(submission.id(), persisted(submission));
            state.write_latency
        };

        tracing::debug!(submission_id = %submission.id(), "submission added");
        self.settle(latency).await;
        Ok(())
    }

    async fn update(&self, submission: &Submission, expected_version: Version) -> Result<()> {
        let latency = {
            let mut state = self.state.write().await;
            if state.fail_on_write {
                return Err(AppError::Persistence("submission store unavailable".to_string()));
            }

            let actual = state
                .submissions
                .get(&submission.id())
                .map(|stored| stored.version())
                .ok_or_else(|| AppError::not_found("Submission", submission.id()))?;

            if actual != expected_version {
                return Err(AppError::ConcurrencyConflict {
                    aggregate_id: submission.id(),
                    expected: expected_version,
                    actual,
                });
            }

            state
                .submissions
                .insert(submission.id(), persisted(submission));
            state.write_latency
        };

        tracing::debug!(
            submission_id = %submission.id(),
            version = %submission.version(),
            "submission updated"
        );
        self.settle(latency).await;
        Ok(())
    }

    async fn delete(&self, submission: &Submission) -> Result<()> {
        let mut state = self.state.write().await;
        if state.fail_on_write {
            return Err(AppError::Persistence("submission store unavailable".to_string()));
        }

        state
            .submissions
            .remove(&submission.id())
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("Submission", submission.id()))
    }
}
