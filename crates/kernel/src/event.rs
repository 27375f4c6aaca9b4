//! Domain event trait.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use common::AggregateId;

/// Erases a concrete value to [`Any`].
///
/// Implemented for every `'static` type; trait objects built on top of it
/// recover their concrete type through the inherent helpers on `dyn Trait`.
#[doc(hidden)]
pub trait AsAny: Any {
    fn as_any_ref(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any_ref(&self) -> &dyn Any {
        self
    }
}

/// Trait for domain events.
///
/// Domain events record facts that already happened inside an aggregate.
/// They are immutable, named in past tense, and travel as a side channel:
/// the aggregate's fields stay the source of truth.
pub trait DomainEvent: AsAny + fmt::Debug + Send + Sync {
    /// Returns the stable event type name, used in logs and error context.
    fn event_type(&self) -> &'static str;

    /// Returns the identity of the aggregate that recorded the event.
    fn aggregate_id(&self) -> AggregateId;
}

impl dyn DomainEvent {
    /// Returns the concrete event as [`Any`].
    pub fn as_any(&self) -> &dyn Any {
        <dyn DomainEvent as AsAny>::as_any_ref(self)
    }

    /// Returns the [`TypeId`] of the concrete event type.
    pub fn concrete_type_id(&self) -> TypeId {
        self.as_any().type_id()
    }

    /// Returns the event as `E` if that is its concrete type.
    pub fn downcast_ref<E: DomainEvent>(&self) -> Option<&E> {
        self.as_any().downcast_ref::<E>()
    }

    /// Returns true if the concrete type of the event is `E`.
    pub fn is<E: DomainEvent>(&self) -> bool {
        self.as_any().is::<E>()
    }
}

/// An ordered batch of events drained from one aggregate.
pub type EventBatch = Vec<Arc<dyn DomainEvent>>;
