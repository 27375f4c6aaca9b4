//! Composition root of the conference backend.
//!
//! Builds the dispatch registries, the in-memory adapters and the broker,
//! and registers every module against them.

pub mod config;
pub mod error;
pub mod telemetry;

use std::sync::Arc;

use agendas::submissions::InMemorySubmissionRepository;
use agendas::{
    AgendasModule, InMemoryAgendaItemRepository, InMemoryAgendaTrackRepository,
    InMemorySpeakerRepository,
};
use messaging::{CommandDispatcher, CommandRegistry, EventHandlerRegistry, InMemoryMessageBroker};

pub use config::{Config, LogFormat};
pub use error::{Error, Result};

/// A fully wired application instance.
#[derive(Debug, Clone)]
pub struct App {
    dispatcher: CommandDispatcher,
    events: Arc<EventHandlerRegistry>,
    submissions: InMemorySubmissionRepository,
    speakers: InMemorySpeakerRepository,
    agenda_items: InMemoryAgendaItemRepository,
    agenda_tracks: InMemoryAgendaTrackRepository,
    broker: InMemoryMessageBroker,
}

impl App {
    /// Creates the adapters and registers every module's handlers.
    pub fn build(config: &Config) -> Result<Self> {
        let submissions = InMemorySubmissionRepository::new();
        let speakers = InMemorySpeakerRepository::new();
        let agenda_items = InMemoryAgendaItemRepository::new();
        let agenda_tracks = InMemoryAgendaTrackRepository::new();
        let broker = InMemoryMessageBroker::with_capacity(config.broker_capacity);

        let commands = CommandRegistry::new();
        let events = Arc::new(EventHandlerRegistry::new());

        AgendasModule {
            submissions: Arc::new(submissions.clone()),
            speakers: Arc::new(speakers.clone()),
            agenda_items: Arc::new(agenda_items.clone()),
            agenda_tracks: Arc::new(agenda_tracks.clone()),
            broker: Arc::new(broker.clone()),
        }
        .register(&commands, &events)?;

        tracing::info!(
            broker_capacity = config.broker_capacity,
            commands = commands.registered_commands().len(),
            "application built"
        );

        Ok(Self {
            dispatcher: CommandDispatcher::new(Arc::new(commands)),
            events,
            submissions,
            speakers,
            agenda_items,
            agenda_tracks,
            broker,
        })
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    pub fn event_handlers(&self) -> &EventHandlerRegistry {
        &self.events
    }

    pub fn submissions(&self) -> &InMemorySubmissionRepository {
        &self.submissions
    }

    pub fn speakers(&self) -> &InMemorySpeakerRepository {
        &self.speakers
    }

    pub fn agenda_items(&self) -> &InMemoryAgendaItemRepository {
        &self.agenda_items
    }

    pub fn agenda_tracks(&self) -> &InMemoryAgendaTrackRepository {
        &self.agenda_tracks
    }

    pub fn broker(&self) -> &InMemoryMessageBroker {
        &self.broker
    }
}
