//! Dispatch and event-propagation core.
//!
//! This crate routes commands to exactly one handler, fans domain events out
//! to local handlers, and turns a subset of those events into integration
//! messages for the outside world:
//! - [`CommandRegistry`] and [`EventHandlerRegistry`] keyed by the concrete type
//! - [`CommandDispatcher`] resolving one handler per command, per call
//! - [`DomainEventDispatcher`] invoking every handler of each event, fail-fast
//! - [`MessageMapper`] translating domain events to [`IntegrationEvent`]s
//! - [`MessageBroker`] publish boundary with an in-memory implementation
//! - [`EventPropagator`] running dispatch, mapping and publishing after a commit

pub mod broker;
pub mod command;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod integration;
pub mod propagation;
pub mod registry;

pub use broker::{InMemoryMessageBroker, MessageBroker, PublishedMessage};
pub use command::{Command, CommandHandler};
pub use context::DispatchContext;
pub use dispatcher::CommandDispatcher;
pub use error::{AppError, Result};
pub use events::{DomainEventDispatcher, DomainEventHandler};
pub use integration::{IntegrationEvent, MessageMapper, MessageMapperBuilder};
pub use propagation::EventPropagator;
pub use registry::{CommandRegistry, EventHandlerRegistry, RegisteredEventHandler};
