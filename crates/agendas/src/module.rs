//! Wiring of the Agendas handlers into the dispatch registries.

use std::any::type_name;
use std::sync::Arc;

use messaging::{
    AppError, Command, CommandRegistry, DomainEventDispatcher, EventHandlerRegistry,
    EventPropagator, MessageBroker, MessageMapper, Result,
};

use crate::agenda_items::{AgendaItemOnSubmissionApproved, AgendaItemRepository};
use crate::agenda_tracks::{
    AddAgendaSlot, AddAgendaSlotHandler, AgendaTrackRepository, AssignAgendaItem,
    AssignAgendaItemHandler, CreateAgendaTrack, CreateAgendaTrackHandler, map_track_events,
};
use crate::speakers::SpeakerRepository;
use crate::submissions::{
    ApproveSubmission, ApproveSubmissionHandler, CreateSubmission, CreateSubmissionHandler,
    RejectSubmission, RejectSubmissionHandler, SubmissionApproved, SubmissionRepository,
    map_submission_events,
};

/// Builds the mapper for every Agendas event published outside the module.
pub fn mapper() -> MessageMapper {
    map_track_events(map_submission_events(MessageMapper::builder())).build()
}

/// Everything the Agendas handlers depend on.
#[derive(Clone)]
pub struct AgendasModule {
    pub submissions: Arc<dyn SubmissionRepository>,
    pub speakers: Arc<dyn SpeakerRepository>,
    pub agenda_items: Arc<dyn AgendaItemRepository>,
    pub agenda_tracks: Arc<dyn AgendaTrackRepository>,
    pub broker: Arc<dyn MessageBroker>,
}

impl AgendasModule {
    /// Registers the module's command handler factories and event handlers.
    ///
    /// Command handlers publish through `events`, which must be the registry
    /// backing the application's [`DomainEventDispatcher`]. If any of the
    /// module's commands already has a handler, nothing is registered.
    pub fn register(
        &self,
        commands: &CommandRegistry,
        events: &Arc<EventHandlerRegistry>,
    ) -> Result<()> {
        ensure_vacant::<CreateSubmission>(commands)?;
        ensure_vacant::<ApproveSubmission>(commands)?;
        ensure_vacant::<RejectSubmission>(commands)?;
        ensure_vacant::<CreateAgendaTrack>(commands)?;
        ensure_vacant::<AddAgendaSlot>(commands)?;
        ensure_vacant::<AssignAgendaItem>(commands)?;

        let propagator = EventPropagator::new(
            DomainEventDispatcher::new(Arc::clone(events)),
            Arc::new(mapper()),
            Arc::clone(&self.broker),
        );

        let (submissions, speakers, create) = (
            Arc::clone(&self.submissions),
            Arc::clone(&self.speakers),
            propagator.clone(),
        );
        commands.register::<CreateSubmission, _, _>(move |_ctx| {
            CreateSubmissionHandler::new(submissions.clone(), speakers.clone(), create.clone())
        })?;

        let (submissions, approve) = (Arc::clone(&self.submissions), propagator.clone());
        commands.register::<ApproveSubmission, _, _>(move |_ctx| {
            ApproveSubmissionHandler::new(submissions.clone(), approve.clone())
        })?;

        let (submissions, reject) = (Arc::clone(&self.submissions), propagator.clone());
        commands.register::<RejectSubmission, _, _>(move |_ctx| {
            RejectSubmissionHandler::new(submissions.clone(), reject.clone())
        })?;

        let (tracks, create) = (Arc::clone(&self.agenda_tracks), propagator.clone());
        commands.register::<CreateAgendaTrack, _, _>(move |_ctx| {
            CreateAgendaTrackHandler::new(tracks.clone(), create.clone())
        })?;

        let (tracks, add_slot) = (Arc::clone(&self.agenda_tracks), propagator.clone());
        commands.register::<AddAgendaSlot, _, _>(move |_ctx| {
            AddAgendaSlotHandler::new(tracks.clone(), add_slot.clone())
        })?;

        let (tracks, agenda_items, assign) = (
            Arc::clone(&self.agenda_tracks),
            Arc::clone(&self.agenda_items),
            propagator,
        );
        commands.register::<AssignAgendaItem, _, _>(move |_ctx| {
            AssignAgendaItemHandler::new(tracks.clone(), agenda_items.clone(), assign.clone())
        })?;

        events.register::<SubmissionApproved, _>(Arc::new(AgendaItemOnSubmissionApproved::new(
            Arc::clone(&self.submissions),
            Arc::clone(&self.agenda_items),
        )));

        tracing::info!(
            commands = ?commands.registered_commands(),
            "agendas module registered"
        );
        Ok(())
    }
}

fn ensure_vacant<C: Command>(commands: &CommandRegistry) -> Result<()> {
    if commands.contains::<C>() {
        return Err(AppError::HandlerAlreadyRegistered(type_name::<C>()));
    }
    Ok(())
}

impl std::fmt::Debug for AgendasModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgendasModule").finish_non_exhaustive()
    }
}
