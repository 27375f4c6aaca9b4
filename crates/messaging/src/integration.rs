//! Integration events and the mapper deriving them from domain events.

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use kernel::DomainEvent;
use kernel::event::AsAny;

/// A message meant for consumers outside the module that raised it.
///
/// Integration events use external vocabulary and are the only events
/// handed to the [`MessageBroker`](crate::MessageBroker).
pub trait IntegrationEvent: AsAny + fmt::Debug + Send + Sync {
    /// Returns the stable message name external consumers subscribe to.
    fn message_type(&self) -> &'static str;

    /// Returns the message body as JSON.
    fn payload(&self) -> serde_json::Result<serde_json::Value>;
}

impl dyn IntegrationEvent {
    /// Returns the message as `M` if that is its concrete type.
    pub fn downcast_ref<M: IntegrationEvent>(&self) -> Option<&M> {
        <dyn IntegrationEvent as AsAny>::as_any_ref(self).downcast_ref::<M>()
    }

    pub fn is<M: IntegrationEvent>(&self) -> bool {
        <dyn IntegrationEvent as AsAny>::as_any_ref(self).is::<M>()
    }
}

type Conversion =
    Arc<dyn Fn(&(dyn DomainEvent + 'static)) -> Option<Arc<dyn IntegrationEvent>> + Send + Sync>;

/// Translates domain events into integration events.
///
/// Conversions are registered per domain event type when the mapper is
/// built. [`map`](Self::map) is a pure, order-preserving transformation:
/// each event with a conversion yields exactly one message and events
/// without one are dropped as internal-only.
#[derive(Clone, Default)]
pub struct MessageMapper {
    conversions: HashMap<TypeId, Conversion>,
}

impl MessageMapper {
    pub fn builder() -> MessageMapperBuilder {
        MessageMapperBuilder::default()
    }

    /// Maps a batch of domain events, preserving their order.
    pub fn map(&self, events: &[Arc<dyn DomainEvent>]) -> Vec<Arc<dyn IntegrationEvent>> {
        events
            .iter()
            .filter_map(|event| match self.conversions.get(&event.concrete_type_id()) {
                Some(convert) => convert(&**event),
                None => {
                    tracing::trace!(
                        event_type = event.event_type(),
                        "no integration mapping for domain event"
                    );
                    None
                }
            })
            .collect()
    }

    /// Returns true if events of type `E` are translated.
    pub fn maps<E: DomainEvent>(&self) -> bool {
        self.conversions.contains_key(&TypeId::of::<E>())
    }
}

impl fmt::Debug for MessageMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageMapper")
            .field("conversions", &self.conversions.len())
            .finish()
    }
}

/// Collects conversions for a [`MessageMapper`].
#[derive(Default)]
pub struct MessageMapperBuilder {
    conversions: HashMap<TypeId, Conversion>,
}

impl MessageMapperBuilder {
    /// Registers the conversion for domain event type `E`.
    ///
    /// A domain event maps to at most one message; registering `E` again
    /// replaces the earlier conversion.
    pub fn map<E, M, F>(mut self, convert: F) -> Self
    where
        E: DomainEvent,
        M: IntegrationEvent,
        F: Fn(&E) -> M + Send + Sync + 'static,
    {
        let conversion: Conversion = Arc::new(move |event: &(dyn DomainEvent + 'static)| {
            event
                .downcast_ref::<E>()
                .map(|event| Arc::new(convert(event)) as Arc<dyn IntegrationEvent>)
        });

        if self.conversions.insert(TypeId::of::<E>(), conversion).is_some() {
            tracing::warn!(
                event = type_name::<E>(),
                "integration mapping replaced for domain event"
            );
        }
        self
    }

    pub fn build(self) -> MessageMapper {
        MessageMapper {
            conversions: self.conversions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::AggregateId;
    use serde::Serialize;

    #[derive(Debug)]
    struct TalkApproved {
        id: AggregateId,
    }

    impl DomainEvent for TalkApproved {
        fn event_type(&self) -> &'static str {
            "TalkApproved"
        }

        fn aggregate_id(&self) -> AggregateId {
            self.id
        }
    }

    #[derive(Debug)]
    struct TalkRenamed {
        id: AggregateId,
    }

    impl DomainEvent for TalkRenamed {
        fn event_type(&self) -> &'static str {
            "TalkRenamed"
        }

        fn aggregate_id(&self) -> AggregateId {
            self.id
        }
    }

    #[derive(Debug, PartialEq, Serialize)]
    struct TalkAccepted {
        talk_id: AggregateId,
    }

    impl IntegrationEvent for TalkAccepted {
        fn message_type(&self) -> &'static str {
            "talk_accepted"
        }

        fn payload(&self) -> serde_json::Result<serde_json::Value> {
            serde_json::to_value(self)
        }
    }

    fn mapper() -> MessageMapper {
        MessageMapper::builder()
            .map(|event: &TalkApproved| TalkAccepted { talk_id: event.id })
            .build()
    }

    #[test]
    fn mapped_events_keep_order_and_unmapped_are_dropped() {
        let first = AggregateId::new();
        let second = AggregateId::new();
        let events: Vec<Arc<dyn DomainEvent>> = vec![
            Arc::new(TalkApproved { id: first }),
            Arc::new(TalkRenamed { id: first }),
            Arc::new(TalkApproved { id: second }),
        ];

        let messages = mapper().map(&events);

        let ids: Vec<_> = messages
            .iter()
            .map(|m| m.downcast_ref::<TalkAccepted>().unwrap().talk_id)
            .collect();
        assert_eq!(ids, [first, second]);
    }

    #[test]
    fn mapping_is_repeatable_and_leaves_input_untouched() {
        let id = AggregateId::new();
        let events: Vec<Arc<dyn DomainEvent>> =
            vec![Arc::new(TalkRenamed { id }), Arc::new(TalkApproved { id })];
        let mapper = mapper();

        let once = mapper.map(&events);
        let twice = mapper.map(&events);

        assert_eq!(events.len(), 2);
        assert_eq!(once.len(), 1);
        assert_eq!(
            once[0].downcast_ref::<TalkAccepted>(),
            twice[0].downcast_ref::<TalkAccepted>()
        );
    }

    #[test]
    fn empty_mapper_drops_everything() {
        let events: Vec<Arc<dyn DomainEvent>> = vec![Arc::new(TalkApproved {
            id: AggregateId::new(),
        })];
        let mapper = MessageMapper::default();
        assert!(mapper.map(&events).is_empty());
        assert!(!mapper.maps::<TalkApproved>());
    }

    #[test]
    fn payload_uses_external_field_names() {
        let id = AggregateId::new();
        let events: Vec<Arc<dyn DomainEvent>> = vec![Arc::new(TalkApproved { id })];
        let messages = mapper().map(&events);

        assert_eq!(messages[0].message_type(), "talk_accepted");
        assert_eq!(
            messages[0].payload().unwrap(),
            serde_json::json!({ "talk_id": id })
        );
    }
}
