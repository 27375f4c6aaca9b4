//! Agenda track invariant violations.

use chrono::{DateTime, Utc};
use common::{AgendaSlotId, AggregateId};
use messaging::AppError;
use thiserror::Error;

/// Errors raised by the [`AgendaTrack`](super::AgendaTrack) aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgendaTrackError {
    #[error("agenda track {id} defines an empty name")]
    EmptyName { id: AggregateId },

    #[error("agenda track {id} has a slot ending at {to} before it starts at {from}")]
    InvalidSlotTime {
        id: AggregateId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },

    #[error("agenda track {id} already has slot {existing} in that time range")]
    OverlappingSlot {
        id: AggregateId,
        existing: AgendaSlotId,
    },

    #[error("agenda track {id} has no slot {slot_id}")]
    SlotNotFound {
        id: AggregateId,
        slot_id: AgendaSlotId,
    },

    #[error("slot {slot_id} of agenda track {id} is a placeholder")]
    PlaceholderSlotAssignment {
        id: AggregateId,
        slot_id: AgendaSlotId,
    },

    #[error("agenda item {agenda_item_id} belongs to another conference than track {id}")]
    ForeignAgendaItem {
        id: AggregateId,
        agenda_item_id: AggregateId,
    },

    #[error("agenda item {agenda_item_id} is already assigned on track {id}")]
    AgendaItemAlreadyAssigned {
        id: AggregateId,
        agenda_item_id: AggregateId,
    },
}

impl From<AgendaTrackError> for AppError {
    fn from(error: AgendaTrackError) -> Self {
        AppError::validation(error)
    }
}
