//! Aggregate root building block.

use std::sync::Arc;

use common::{AggregateId, Version};

use crate::event::{DomainEvent, EventBatch};

/// Identity, version counter and pending-event buffer shared by all aggregates.
///
/// Concrete aggregates embed an `AggregateRoot` and drive it from their
/// mutation methods. A mutation validates first, applies its field
/// changes, then calls [`increment_version`](Self::increment_version)
/// and/or [`add_event`](Self::add_event).
///
/// The version moves forward at most once per unit of work. A unit of
/// work ends when the orchestrating handler drains the buffer with
/// [`take_events`](Self::take_events) after a successful write, so a
/// factory that calls several validating setters still yields a single
/// increment.
#[derive(Debug, Clone)]
pub struct AggregateRoot {
    id: AggregateId,
    version: Version,
    events: EventBatch,
    version_incremented: bool,
}

impl AggregateRoot {
    /// Creates a root for a new aggregate at [`Version::initial`].
    pub fn new(id: AggregateId) -> Self {
        Self::with_version(id, Version::initial())
    }

    /// Creates a root for an aggregate rehydrated at a known version.
    pub fn with_version(id: AggregateId, version: Version) -> Self {
        Self {
            id,
            version,
            events: Vec::new(),
            version_incremented: false,
        }
    }

    pub fn id(&self) -> AggregateId {
        self.id
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns the events recorded since the last clear, in insertion order.
    pub fn events(&self) -> &[Arc<dyn DomainEvent>] {
        &self.events
    }

    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Moves the version forward, once per unit of work.
    pub fn increment_version(&mut self) {
        if self.version_incremented {
            return;
        }
        self.version = self.version.next();
        self.version_incremented = true;
    }

    /// Records an event. Recording implies the unit's version increment.
    pub fn add_event(&mut self, event: impl DomainEvent) {
        self.increment_version();
        self.events.push(Arc::new(event));
    }

    /// Discards every buffered event without closing the unit of work.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Drains the buffer and closes the unit of work.
    pub fn take_events(&mut self) -> EventBatch {
        self.version_incremented = false;
        std::mem::take(&mut self.events)
    }
}

/// Uniform access to the [`AggregateRoot`] embedded in a domain aggregate.
pub trait Aggregate: Send + Sync {
    /// Returns the aggregate type name, used in errors and logs.
    fn aggregate_type() -> &'static str
    where
        Self: Sized;

    fn root(&self) -> &AggregateRoot;

    fn root_mut(&mut self) -> &mut AggregateRoot;

    fn id(&self) -> AggregateId {
        self.root().id()
    }

    fn version(&self) -> Version {
        self.root().version()
    }

    fn events(&self) -> &[Arc<dyn DomainEvent>] {
        self.root().events()
    }

    /// Drains pending events. Call only after the aggregate was persisted.
    fn take_events(&mut self) -> EventBatch {
        self.root_mut().take_events()
    }
}
