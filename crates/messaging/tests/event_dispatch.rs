//! Integration tests for domain event fan-out and fail-fast dispatch.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use common::AggregateId;
use kernel::DomainEvent;
use messaging::{
    AppError, DispatchContext, DomainEventDispatcher, DomainEventHandler, EventHandlerRegistry,
};

#[derive(Debug)]
struct SlotBooked {
    id: AggregateId,
    slot: u32,
}

impl DomainEvent for SlotBooked {
    fn event_type(&self) -> &'static str {
        "SlotBooked"
    }

    fn aggregate_id(&self) -> AggregateId {
        self.id
    }
}

#[derive(Debug)]
struct SlotReleased {
    id: AggregateId,
}

impl DomainEvent for SlotReleased {
    fn event_type(&self) -> &'static str {
        "SlotReleased"
    }

    fn aggregate_id(&self) -> AggregateId {
        self.id
    }
}

type Journal = Arc<Mutex<Vec<String>>>;

/// Appends `<name>:<slot>` for every booking; fails on the configured slot.
struct BookingRecorder {
    name: &'static str,
    journal: Journal,
    fail_on_slot: Option<u32>,
}

#[async_trait]
impl DomainEventHandler<SlotBooked> for BookingRecorder {
    async fn handle(&self, _ctx: &DispatchContext, event: &SlotBooked) -> messaging::Result<()> {
        if self.fail_on_slot == Some(event.slot) {
            return Err(AppError::Persistence(format!("slot {} unavailable", event.slot)));
        }
        self.journal
            .lock()
            .unwrap()
            .push(format!("{}:{}", self.name, event.slot));
        Ok(())
    }
}

struct ReleaseRecorder {
    journal: Journal,
}

#[async_trait]
impl DomainEventHandler<SlotReleased> for ReleaseRecorder {
    async fn handle(&self, _ctx: &DispatchContext, _event: &SlotReleased) -> messaging::Result<()> {
        self.journal.lock().unwrap().push("released".to_string());
        Ok(())
    }
}

fn booked(slot: u32) -> Arc<dyn DomainEvent> {
    Arc::new(SlotBooked {
        id: AggregateId::new(),
        slot,
    })
}

fn released() -> Arc<dyn DomainEvent> {
    Arc::new(SlotReleased {
        id: AggregateId::new(),
    })
}

fn setup(fail_on_slot: Option<u32>) -> (DomainEventDispatcher, Journal) {
    let journal: Journal = Arc::default();
    let registry = EventHandlerRegistry::new();
    registry.register::<SlotBooked, _>(Arc::new(BookingRecorder {
        name: "first",
        journal: journal.clone(),
        fail_on_slot,
    }));
    registry.register::<SlotBooked, _>(Arc::new(BookingRecorder {
        name: "second",
        journal: journal.clone(),
        fail_on_slot: None,
    }));
    registry.register::<SlotReleased, _>(Arc::new(ReleaseRecorder {
        journal: journal.clone(),
    }));
    (DomainEventDispatcher::new(Arc::new(registry)), journal)
}

mod fan_out {
    use super::*;

    #[tokio::test]
    async fn every_handler_sees_every_event_in_order() {
        let (dispatcher, journal) = setup(None);

        dispatcher
            .dispatch(&DispatchContext::new(), &[booked(1), released(), booked(2)])
            .await
            .unwrap();

        assert_eq!(
            *journal.lock().unwrap(),
            ["first:1", "second:1", "released", "first:2", "second:2"]
        );
    }

    #[tokio::test]
    async fn events_without_handlers_are_skipped() {
        let dispatcher = DomainEventDispatcher::new(Arc::new(EventHandlerRegistry::new()));
        dispatcher
            .dispatch(&DispatchContext::new(), &[booked(1), released()])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        let (dispatcher, journal) = setup(None);
        dispatcher.dispatch(&DispatchContext::new(), &[]).await.unwrap();
        assert!(journal.lock().unwrap().is_empty());
    }
}

mod fail_fast {
    use super::*;

    #[tokio::test]
    async fn failure_stops_the_rest_of_the_batch() {
        let (dispatcher, journal) = setup(Some(2));

        let error = dispatcher
            .dispatch(
                &DispatchContext::new(),
                &[booked(1), booked(2), released(), booked(3)],
            )
            .await
            .unwrap_err();

        match error {
            AppError::Dispatch {
                event,
                handler,
                source,
            } => {
                assert_eq!(event, "SlotBooked");
                assert!(handler.ends_with("BookingRecorder"));
                assert!(matches!(*source, AppError::Persistence(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // The second handler of the failing event and every later event never ran.
        assert_eq!(*journal.lock().unwrap(), ["first:1", "second:1"]);
    }
}
