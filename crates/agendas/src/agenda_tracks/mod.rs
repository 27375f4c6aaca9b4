//! Agenda tracks and the time slots they are split into.

mod aggregate;
mod commands;
mod error;
mod events;
mod handlers;
mod messages;
mod repository;

pub use aggregate::{AgendaSlot, AgendaTrack, SlotKind};
pub use commands::{AddAgendaSlot, AssignAgendaItem, CreateAgendaTrack};
pub use error::AgendaTrackError;
pub use events::AgendaTrackCreated;
pub use handlers::{AddAgendaSlotHandler, AssignAgendaItemHandler, CreateAgendaTrackHandler};
pub use messages::{AgendaTrackCreatedMessage, map_track_events};
pub use repository::{AgendaTrackRepository, InMemoryAgendaTrackRepository};
