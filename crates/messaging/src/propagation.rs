//! Post-commit propagation of drained aggregate events.

use std::sync::Arc;

use kernel::EventBatch;

use crate::broker::MessageBroker;
use crate::context::DispatchContext;
use crate::error::Result;
use crate::events::DomainEventDispatcher;
use crate::integration::MessageMapper;

/// Runs the steps a command handler takes once its aggregate is persisted:
/// local dispatch of the drained events, translation to integration
/// messages, then publication.
///
/// Each step only starts after the previous one completed. A dispatch
/// failure leaves the broker untouched; the persisted state is never rolled
/// back by anything in here.
#[derive(Clone)]
pub struct EventPropagator {
    dispatcher: DomainEventDispatcher,
    mapper: Arc<MessageMapper>,
    broker: Arc<dyn MessageBroker>,
}

impl EventPropagator {
    pub fn new(
        dispatcher: DomainEventDispatcher,
        mapper: Arc<MessageMapper>,
        broker: Arc<dyn MessageBroker>,
    ) -> Self {
        Self {
            dispatcher,
            mapper,
            broker,
        }
    }

    pub async fn propagate(&self, ctx: &DispatchContext, events: EventBatch) -> Result<()> {
        if events.is_empty() {
            tracing::trace!("no domain events to propagate");
            return Ok(());
        }

        self.dispatcher.dispatch(ctx, &events).await?;

        let messages = self.mapper.map(&events);
        tracing::debug!(
            events = events.len(),
            messages = messages.len(),
            "publishing integration messages"
        );
        self.broker.publish(&messages).await
    }
}

impl std::fmt::Debug for EventPropagator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventPropagator")
            .field("dispatcher", &self.dispatcher)
            .field("mapper", &self.mapper)
            .finish_non_exhaustive()
    }
}
