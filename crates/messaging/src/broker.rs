//! Message broker boundary and the in-process broker.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::integration::IntegrationEvent;

/// Default capacity of the in-process broadcast channel and of the retained
/// batch history.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Publishes integration events to consumers outside the current module.
///
/// Delivery is at-least-once; no ordering is promised across separate calls.
#[async_trait]
pub trait MessageBroker: Send + Sync {
    async fn publish(&self, messages: &[Arc<dyn IntegrationEvent>]) -> Result<()>;
}

/// A message as it leaves the broker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishedMessage {
    pub id: Uuid,
    pub message_type: String,
    pub payload: serde_json::Value,
    pub published_at: DateTime<Utc>,
}

impl PublishedMessage {
    fn from_event(event: &dyn IntegrationEvent) -> Result<Self> {
        let payload = event
            .payload()
            .map_err(|e| AppError::Publish(format!("{}: {e}", event.message_type())))?;

        Ok(Self {
            id: Uuid::new_v4(),
            message_type: event.message_type().to_string(),
            payload,
            published_at: Utc::now(),
        })
    }
}

#[derive(Debug, Default)]
struct BrokerState {
    batches: VecDeque<Vec<Arc<dyn IntegrationEvent>>>,
    retained: usize,
    published: usize,
    fail_on_publish: bool,
}

/// In-process broker.
///
/// Accepted batches are recorded, and each message is forwarded as a
/// [`PublishedMessage`] to subscribers of the broadcast channel, which is
/// how other modules in the same process consume integration events.
///
/// The recorded history keeps at most `capacity` batches, dropping the
/// oldest first; [`publish_count`](Self::publish_count) still counts every
/// accepted call.
#[derive(Debug, Clone)]
pub struct InMemoryMessageBroker {
    state: Arc<RwLock<BrokerState>>,
    sender: broadcast::Sender<PublishedMessage>,
}

impl InMemoryMessageBroker {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a broker whose subscribers may lag by up to `capacity` messages
    /// and which retains the last `capacity` batches.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, _) = broadcast::channel(capacity);
        Self {
            state: Arc::new(RwLock::new(BrokerState {
                retained: capacity,
                ..BrokerState::default()
            })),
            sender,
        }
    }

    /// Subscribes to messages published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<PublishedMessage> {
        self.sender.subscribe()
    }

    /// Configures the broker to reject every publish call.
    pub async fn set_fail_on_publish(&self, fail: bool) {
        self.state.write().await.fail_on_publish = fail;
    }

    /// Returns the retained batches in publish order.
    pub async fn published_batches(&self) -> Vec<Vec<Arc<dyn IntegrationEvent>>> {
        self.state.read().await.batches.iter().cloned().collect()
    }

    /// Returns the number of accepted publish calls, including those whose
    /// batches are no longer retained.
    pub async fn publish_count(&self) -> usize {
        self.state.read().await.published
    }
}

impl Default for InMemoryMessageBroker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageBroker for InMemoryMessageBroker {
    #[tracing::instrument(skip_all, fields(messages = messages.len()))]
    async fn publish(&self, messages: &[Arc<dyn IntegrationEvent>]) -> Result<()> {
        let outgoing = {
            let mut state = self.state.write().await;
            if state.fail_on_publish {
                return Err(AppError::Publish("broker unavailable".to_string()));
            }

            let outgoing = messages
                .iter()
                .map(|message| PublishedMessage::from_event(&**message))
                .collect::<Result<Vec<_>>>()?;
            if state.batches.len() == state.retained {
                state.batches.pop_front();
            }
            state.batches.push_back(messages.to_vec());
            state.published += 1;
            outgoing
        };

        for message in outgoing {
            tracing::debug!(
                message_type = %message.message_type,
                id = %message.id,
                "message published"
            );
            // Sending only fails when nobody is subscribed.
            let _ = self.sender.send(message);
        }

        metrics::counter!("integration_messages_published_total").increment(messages.len() as u64);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Serialize)]
    struct SpeakerInvited {
        name: String,
    }

    impl IntegrationEvent for SpeakerInvited {
        fn message_type(&self) -> &'static str {
            "speaker_invited"
        }

        fn payload(&self) -> serde_json::Result<serde_json::Value> {
            serde_json::to_value(self)
        }
    }

    fn invited(name: &str) -> Arc<dyn IntegrationEvent> {
        Arc::new(SpeakerInvited {
            name: name.to_string(),
        })
    }

    #[tokio::test]
    async fn publish_records_batch_and_notifies_subscribers() {
        let broker = InMemoryMessageBroker::new();
        let mut receiver = broker.subscribe();

        broker
            .publish(&[invited("Ada"), invited("Grace")])
            .await
            .unwrap();

        assert_eq!(broker.publish_count().await, 1);
        assert_eq!(broker.published_batches().await[0].len(), 2);

        let first = receiver.recv().await.unwrap();
        let second = receiver.recv().await.unwrap();
        assert_eq!(first.message_type, "speaker_invited");
        assert_eq!(first.payload["name"], "Ada");
        assert_eq!(second.payload["name"], "Grace");
    }

    #[tokio::test]
    async fn empty_batch_is_accepted() {
        let broker = InMemoryMessageBroker::new();
        broker.publish(&[]).await.unwrap();
        assert_eq!(broker.publish_count().await, 1);
        assert!(broker.published_batches().await[0].is_empty());
    }

    #[tokio::test]
    async fn failing_broker_rejects_and_records_nothing() {
        let broker = InMemoryMessageBroker::new();
        broker.set_fail_on_publish(true).await;

        let result = broker.publish(&[invited("Ada")]).await;
        assert!(matches!(result, Err(AppError::Publish(_))));
        assert_eq!(broker.publish_count().await, 0);
    }

    #[tokio::test]
    async fn publishing_without_subscribers_succeeds() {
        let broker = InMemoryMessageBroker::with_capacity(4);
        broker.publish(&[invited("Ada")]).await.unwrap();
        assert_eq!(broker.publish_count().await, 1);
    }

    #[tokio::test]
    async fn history_keeps_only_the_latest_batches() {
        let broker = InMemoryMessageBroker::with_capacity(2);

        for name in ["Ada", "Grace", "Barbara"] {
            broker.publish(&[invited(name)]).await.unwrap();
        }

        assert_eq!(broker.publish_count().await, 3);
        let batches = broker.published_batches().await;
        assert_eq!(batches.len(), 2);
        let names: Vec<_> = batches
            .iter()
            .map(|batch| batch[0].payload().unwrap()["name"].clone())
            .collect();
        assert_eq!(names, ["Grace", "Barbara"]);
    }
}
