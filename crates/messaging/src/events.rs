//! Domain event handlers and their dispatcher.

use std::sync::Arc;

use async_trait::async_trait;
use kernel::DomainEvent;

use crate::context::DispatchContext;
use crate::error::{AppError, Result};
use crate::registry::EventHandlerRegistry;

/// Handles one domain event type. Any number of handlers may subscribe to a type.
#[async_trait]
pub trait DomainEventHandler<E: DomainEvent>: Send + Sync {
    async fn handle(&self, ctx: &DispatchContext, event: &E) -> Result<()>;
}

/// Delivers drained aggregate events to their local handlers.
///
/// Events are processed in batch order and each event's handlers in
/// registration order. The first failing handler aborts the batch: its
/// error is returned as [`AppError::Dispatch`] and nothing after it runs.
/// Nothing is retried here.
#[derive(Debug, Clone)]
pub struct DomainEventDispatcher {
    registry: Arc<EventHandlerRegistry>,
}

impl DomainEventDispatcher {
    pub fn new(registry: Arc<EventHandlerRegistry>) -> Self {
        Self { registry }
    }

    #[tracing::instrument(
        skip_all,
        fields(events = events.len(), correlation_id = %ctx.correlation_id())
    )]
    pub async fn dispatch(
        &self,
        ctx: &DispatchContext,
        events: &[Arc<dyn DomainEvent>],
    ) -> Result<()> {
        for event in events {
            let event_type = event.event_type();
            let handlers = self.registry.resolve_all(event.concrete_type_id());

            if handlers.is_empty() {
                tracing::trace!(event_type, "no handlers for domain event");
                continue;
            }

            for handler in handlers {
                tracing::debug!(
                    event_type,
                    handler = handler.name(),
                    aggregate_id = %event.aggregate_id(),
                    "handling domain event"
                );

                if let Err(error) = handler.handle(ctx, Arc::clone(event)).await {
                    tracing::error!(
                        event_type,
                        handler = handler.name(),
                        %error,
                        "domain event handler failed"
                    );
                    metrics::counter!("domain_event_failures_total", "event" => event_type)
                        .increment(1);
                    return Err(AppError::Dispatch {
                        event: event_type,
                        handler: handler.name(),
                        source: Box::new(error),
                    });
                }
            }

            metrics::counter!("domain_events_dispatched_total", "event" => event_type).increment(1);
        }

        Ok(())
    }
}
