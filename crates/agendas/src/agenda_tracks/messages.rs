//! Integration messages published for agenda tracks.

use common::AggregateId;
use messaging::{IntegrationEvent, MessageMapperBuilder};
use serde::{Deserialize, Serialize};

use super::AgendaTrackCreated;

/// Published when a track has been opened on an agenda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaTrackCreatedMessage {
    pub track_id: AggregateId,
}

impl IntegrationEvent for AgendaTrackCreatedMessage {
    fn message_type(&self) -> &'static str {
        "agendas.agenda_track_created"
    }

    fn payload(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

/// Adds the agenda track mappings to `builder`.
pub fn map_track_events(builder: MessageMapperBuilder) -> MessageMapperBuilder {
    builder.map::<AgendaTrackCreated, _, _>(|event| AgendaTrackCreatedMessage {
        track_id: event.track_id,
    })
}
