//! Error taxonomy for command and event processing.

use std::error::Error as StdError;
use std::fmt::Display;

use common::{AggregateId, Version};
use thiserror::Error;

/// Boxed domain error carried by [`AppError::Validation`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors surfaced by command handlers and the dispatch pipeline.
///
/// Nothing in the pipeline swallows or translates these: a handler's error
/// reaches the caller of the dispatcher with its kind unchanged.
#[derive(Debug, Error)]
pub enum AppError {
    /// An aggregate precondition was violated; the aggregate was left unmodified.
    #[error("validation failed: {0}")]
    Validation(BoxError),

    /// An aggregate (or a referenced entity) does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The persisted version did not match the version the write expected.
    #[error("version conflict on {aggregate_id}: expected {expected}, found {actual}")]
    ConcurrencyConflict {
        aggregate_id: AggregateId,
        expected: Version,
        actual: Version,
    },

    /// No handler is registered for the command type.
    #[error("no handler registered for command {0}")]
    HandlerNotFound(&'static str),

    /// A second handler was registered for a command type.
    #[error("a handler is already registered for command {0}")]
    HandlerAlreadyRegistered(&'static str),

    /// A domain event handler failed.
    #[error("handler {handler} failed on event {event}: {source}")]
    Dispatch {
        event: &'static str,
        handler: &'static str,
        #[source]
        source: Box<AppError>,
    },

    /// The message broker rejected a batch.
    #[error("publish failed: {0}")]
    Publish(String),

    /// Opaque failure from a repository.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl AppError {
    /// Wraps a domain error as a validation failure.
    pub fn validation(error: impl StdError + Send + Sync + 'static) -> Self {
        AppError::Validation(Box::new(error))
    }

    pub fn not_found(kind: &'static str, id: impl Display) -> Self {
        AppError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Returns the domain error behind a validation failure if it is an `E`.
    pub fn validation_error<E: StdError + 'static>(&self) -> Option<&E> {
        match self {
            AppError::Validation(error) => error.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Returns true for errors raised by a write that lost an optimistic-concurrency race.
    pub fn is_concurrency_conflict(&self) -> bool {
        matches!(self, AppError::ConcurrencyConflict { .. })
    }
}

/// Result type for command and event processing.
pub type Result<T> = std::result::Result<T, AppError>;
