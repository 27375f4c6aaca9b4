//! Agenda items derived from approved submissions.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{AggregateId, ConferenceId, SpeakerId};
use kernel::Aggregate;
use messaging::{AppError, DispatchContext, DomainEventHandler, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::submissions::{Submission, SubmissionApproved, SubmissionRepository};

/// A talk scheduled on a conference agenda.
///
/// Shares its id with the submission it was created from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaItem {
    pub id: AggregateId,
    pub conference_id: ConferenceId,
    pub title: String,
    pub description: String,
    pub level: u8,
    pub tags: Vec<String>,
    pub speakers: Vec<SpeakerId>,
}

impl From<&Submission> for AgendaItem {
    fn from(submission: &Submission) -> Self {
        Self {
            id: submission.id(),
            conference_id: submission.conference_id(),
            title: submission.title().to_string(),
            description: submission.description().to_string(),
            level: submission.level(),
            tags: submission.tags().to_vec(),
            speakers: submission.speakers().to_vec(),
        }
    }
}

/// Loads and stores agenda items.
#[async_trait]
pub trait AgendaItemRepository: Send + Sync {
    async fn get(&self, id: AggregateId) -> Result<Option<AgendaItem>>;

    async fn browse_by_conference(&self, conference_id: ConferenceId) -> Result<Vec<AgendaItem>>;

    async fn exists(&self, id: AggregateId) -> Result<bool>;

    /// Stores a new item. Adding an item equal to the stored one succeeds
    /// without changes; a different item under the same id is rejected.
    async fn add(&self, item: AgendaItem) -> Result<()>;

    /// Replaces a stored item.
    async fn update(&self, item: AgendaItem) -> Result<()>;

    async fn delete(&self, id: AggregateId) -> Result<()>;
}

const AGENDA_ITEM: &str = "AgendaItem";

fn unavailable() -> AppError {
    AppError::Persistence("agenda store unavailable".to_string())
}

#[derive(Debug, Default)]
struct InMemoryAgendaItemState {
    items: HashMap<AggregateId, AgendaItem>,
    fail_on_add: bool,
}

/// In-memory agenda item store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAgendaItemRepository {
    state: Arc<RwLock<InMemoryAgendaItemState>>,
}

impl InMemoryAgendaItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the repository to fail every add.
    pub async fn set_fail_on_add(&self, fail: bool) {
        self.state.write().await.fail_on_add = fail;
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AgendaItemRepository for InMemoryAgendaItemRepository {
    async fn get(&self, id: AggregateId) -> Result<Option<AgendaItem>> {
        Ok(self.state.read().await.items.get(&id).cloned())
    }

    async fn browse_by_conference(&self, conference_id: ConferenceId) -> Result<Vec<AgendaItem>> {
        let state = self.state.read().await;
        Ok(state
            .items
            .values()
            .filter(|item| item.conference_id == conference_id)
            .cloned()
            .collect())
    }

    async fn exists(&self, id: AggregateId) -> Result<bool> {
        Ok(self.state.read().await.items.contains_key(&id))
    }

    async fn add(&self, item: AgendaItem) -> Result<()> {
        let mut state = self.state.write().await;
        if state.fail_on_add {
            return Err(unavailable());
        }
        match state.items.get(&item.id) {
            Some(stored) if *stored == item => {
                tracing::debug!(agenda_item_id = %item.id, "agenda item already stored");
                return Ok(());
            }
            Some(_) => {
                return Err(AppError::Persistence(format!(
                    "agenda item {} already exists with different content",
                    item.id
                )));
            }
            None => {}
        }

        state.items.insert(item.id, item);
        Ok(())
    }

    async fn update(&self, item: AgendaItem) -> Result<()> {
        let mut state = self.state.write().await;
        match state.items.get_mut(&item.id) {
            Some(stored) => {
                *stored = item;
                Ok(())
            }
            None => Err(AppError::not_found(AGENDA_ITEM, item.id)),
        }
    }

    async fn delete(&self, id: AggregateId) -> Result<()> {
        self.state
            .write()
            .await
            .items
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(AGENDA_ITEM, id))
    }
}

/// Puts approved submissions on the agenda.
///
/// Runs after the approval was persisted, so the submission it loads is the
/// approved one. A submission approved twice keeps its first agenda item,
/// including when two approvals race past the `exists` check.
pub struct AgendaItemOnSubmissionApproved {
    submissions: Arc<dyn SubmissionRepository>,
    agenda_items: Arc<dyn AgendaItemRepository>,
}

impl AgendaItemOnSubmissionApproved {
    pub fn new(
        submissions: Arc<dyn SubmissionRepository>,
        agenda_items: Arc<dyn AgendaItemRepository>,
    ) -> Self {
        Self {
            submissions,
            agenda_items,
        }
    }
}

#[async_trait]
impl DomainEventHandler<SubmissionApproved> for AgendaItemOnSubmissionApproved {
    async fn handle(&self, _ctx: &DispatchContext, event: &SubmissionApproved) -> Result<()> {
        if self.agenda_items.exists(event.submission_id).await? {
            tracing::debug!(
                submission_id = %event.submission_id,
                "submission already on the agenda"
            );
            return Ok(());
        }

        let submission = self
            .submissions
            .get(event.submission_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(Submission::aggregate_type(), event.submission_id)
            })?;

        self.agenda_items.add(AgendaItem::from(&submission)).await?;
        tracing::info!(
            submission_id = %event.submission_id,
            conference_id = %submission.conference_id(),
            "agenda item added"
        );
        Ok(())
    }
}
