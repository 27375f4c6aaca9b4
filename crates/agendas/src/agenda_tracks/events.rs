//! Agenda track domain events.

use chrono::{DateTime, Utc};
use common::{AggregateId, ConferenceId};
use kernel::DomainEvent;
use serde::{Deserialize, Serialize};

/// A track was opened on a conference agenda.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgendaTrackCreated {
    pub track_id: AggregateId,
    pub conference_id: ConferenceId,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent for AgendaTrackCreated {
    fn event_type(&self) -> &'static str {
        "AgendaTrackCreated"
    }

    fn aggregate_id(&self) -> AggregateId {
        self.track_id
    }
}
