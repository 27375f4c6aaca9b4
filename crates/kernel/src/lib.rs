//! Domain building blocks shared by every module.
//!
//! This crate provides:
//! - [`DomainEvent`] trait for facts recorded by aggregate mutations
//! - [`AggregateRoot`], the pending-event buffer and version counter embedded in aggregates
//! - [`Aggregate`] trait giving orchestrating code uniform access to that buffer

pub mod aggregate;
pub mod event;

pub use aggregate::{Aggregate, AggregateRoot};
pub use event::{DomainEvent, EventBatch};
