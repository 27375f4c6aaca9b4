//! Agendas module of the conference backend.
//!
//! Speakers submit talks to a conference; reviewers approve or reject them,
//! and approved talks become agenda items:
//! - [`submissions`]: the `Submission` aggregate, its commands, handlers and
//!   integration messages
//! - [`speakers`]: the `Speaker` aggregate and its store
//! - [`agenda_items`]: the agenda read side fed by approvals
//! - [`agenda_tracks`]: the `AgendaTrack` aggregate, its slots and commands
//! - [`AgendasModule`]: registers everything with the dispatch core

pub mod agenda_items;
pub mod agenda_tracks;
pub mod module;
pub mod speakers;
pub mod submissions;

pub use agenda_items::{
    AgendaItem, AgendaItemOnSubmissionApproved, AgendaItemRepository, InMemoryAgendaItemRepository,
};
pub use agenda_tracks::{AgendaTrack, AgendaTrackRepository, InMemoryAgendaTrackRepository};
pub use module::{AgendasModule, mapper};
pub use speakers::{InMemorySpeakerRepository, Speaker, SpeakerError, SpeakerRepository};
