//! Command handlers for agenda tracks.

use std::sync::Arc;

use async_trait::async_trait;
use common::{AgendaSlotId, AggregateId};
use kernel::Aggregate;
use messaging::{AppError, CommandHandler, DispatchContext, EventPropagator, Result};

use crate::agenda_items::AgendaItemRepository;

use super::{
    AddAgendaSlot, AgendaTrack, AgendaTrackRepository, AssignAgendaItem, CreateAgendaTrack,
};

/// Handles [`CreateAgendaTrack`].
pub struct CreateAgendaTrackHandler {
    tracks: Arc<dyn AgendaTrackRepository>,
    propagator: EventPropagator,
}

impl CreateAgendaTrackHandler {
    pub fn new(tracks: Arc<dyn AgendaTrackRepository>, propagator: EventPropagator) -> Self {
        Self { tracks, propagator }
    }
}

#[async_trait]
impl CommandHandler<CreateAgendaTrack> for CreateAgendaTrackHandler {
    async fn handle(
        &self,
        ctx: &DispatchContext,
        command: CreateAgendaTrack,
    ) -> Result<AggregateId> {
        let mut track = AgendaTrack::create(command.track_id, command.conference_id, command.name)?;

        self.tracks.add(&track).await?;
        tracing::info!(
            track_id = %track.id(),
            conference_id = %track.conference_id(),
            "agenda track created"
        );

        self.propagator.propagate(ctx, track.take_events()).await?;
        Ok(track.id())
    }
}

/// Handles [`AddAgendaSlot`].
pub struct AddAgendaSlotHandler {
    tracks: Arc<dyn AgendaTrackRepository>,
    propagator: EventPropagator,
}

impl AddAgendaSlotHandler {
    pub fn new(tracks: Arc<dyn AgendaTrackRepository>, propagator: EventPropagator) -> Self {
        Self { tracks, propagator }
    }
}

#[async_trait]
impl CommandHandler<AddAgendaSlot> for AddAgendaSlotHandler {
    async fn handle(&self, ctx: &DispatchContext, command: AddAgendaSlot) -> Result<AgendaSlotId> {
        let mut track = load(&*self.tracks, command.track_id).await?;
        let expected = track.version();
        let slot_id = AgendaSlotId::new();

        match command.placeholder {
            Some(label) => track.add_placeholder_slot(slot_id, command.from, command.to, label)?,
            None => track.add_regular_slot(
                slot_id,
                command.from,
                command.to,
                command.participants_limit,
            )?,
        }

        self.tracks.update(&track, expected).await?;
        tracing::info!(track_id = %track.id(), %slot_id, "agenda slot added");

        self.propagator.propagate(ctx, track.take_events()).await?;
        Ok(slot_id)
    }
}

/// Handles [`AssignAgendaItem`].
pub struct AssignAgendaItemHandler {
    tracks: Arc<dyn AgendaTrackRepository>,
    agenda_items: Arc<dyn AgendaItemRepository>,
    propagator: EventPropagator,
}

impl AssignAgendaItemHandler {
    pub fn new(
        tracks: Arc<dyn AgendaTrackRepository>,
        agenda_items: Arc<dyn AgendaItemRepository>,
        propagator: EventPropagator,
    ) -> Self {
        Self {
            tracks,
            agenda_items,
            propagator,
        }
    }
}

#[async_trait]
impl CommandHandler<AssignAgendaItem> for AssignAgendaItemHandler {
    async fn handle(&self, ctx: &DispatchContext, command: AssignAgendaItem) -> Result<()> {
        let mut track = load(&*self.tracks, command.track_id).await?;
        let item = self
            .agenda_items
            .get(command.agenda_item_id)
            .await?
            .ok_or_else(|| AppError::not_found("AgendaItem", command.agenda_item_id))?;

        let expected = track.version();
        track.assign_agenda_item(command.slot_id, &item)?;

        self.tracks.update(&track, expected).await?;
        tracing::info!(
            track_id = %track.id(),
            slot_id = %command.slot_id,
            agenda_item_id = %item.id,
            "agenda item assigned"
        );

        self.propagator.propagate(ctx, track.take_events()).await
    }
}

async fn load(tracks: &dyn AgendaTrackRepository, id: AggregateId) -> Result<AgendaTrack> {
    tracks
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(AgendaTrack::aggregate_type(), id))
}
