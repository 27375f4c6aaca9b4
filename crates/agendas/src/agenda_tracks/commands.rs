//! Agenda track commands.

use chrono::{DateTime, Utc};
use common::{AgendaSlotId, AggregateId, ConferenceId};
use messaging::Command;

/// Command to open a new track on a conference agenda.
#[derive(Debug, Clone)]
pub struct CreateAgendaTrack {
    pub track_id: AggregateId,
    pub conference_id: ConferenceId,
    pub name: String,
}

impl CreateAgendaTrack {
    /// Creates a CreateAgendaTrack command with a generated track ID.
    pub fn new(conference_id: ConferenceId, name: impl Into<String>) -> Self {
        Self {
            track_id: AggregateId::new(),
            conference_id,
            name: name.into(),
        }
    }
}

impl Command for CreateAgendaTrack {
    type Output = AggregateId;
}

/// Command to add a slot to a track. Returns the new slot's id.
///
/// A slot with a `placeholder` label is reserved for something other than a
/// talk; otherwise it is a regular talk slot.
#[derive(Debug, Clone)]
pub struct AddAgendaSlot {
    pub track_id: AggregateId,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub participants_limit: Option<u32>,
    pub placeholder: Option<String>,
}

impl AddAgendaSlot {
    pub fn regular(track_id: AggregateId, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            track_id,
            from,
            to,
            participants_limit: None,
            placeholder: None,
        }
    }

    pub fn placeholder(
        track_id: AggregateId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            placeholder: Some(label.into()),
            ..Self::regular(track_id, from, to)
        }
    }

    pub fn with_participants_limit(mut self, limit: u32) -> Self {
        self.participants_limit = Some(limit);
        self
    }
}

impl Command for AddAgendaSlot {
    type Output = AgendaSlotId;
}

/// Command to schedule an agenda item into a regular slot.
#[derive(Debug, Clone, Copy)]
pub struct AssignAgendaItem {
    pub track_id: AggregateId,
    pub slot_id: AgendaSlotId,
    pub agenda_item_id: AggregateId,
}

impl Command for AssignAgendaItem {
    type Output = ();
}
