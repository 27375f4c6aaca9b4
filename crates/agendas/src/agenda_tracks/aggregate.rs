//! Agenda track aggregate implementation.

use chrono::{DateTime, Utc};
use common::{AgendaSlotId, AggregateId, ConferenceId};
use kernel::{Aggregate, AggregateRoot};
use serde::{Deserialize, Serialize};

use super::{AgendaTrackCreated, AgendaTrackError};
use crate::agenda_items::AgendaItem;

/// What a slot is reserved for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotKind {
    /// A talk slot, optionally holding an agenda item.
    Regular {
        participants_limit: Option<u32>,
        agenda_item_id: Option<AggregateId>,
    },
    /// A break, keynote or anything else that is not a submitted talk.
    Placeholder { label: String },
}

/// A time range on a track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaSlot {
    pub id: AgendaSlotId,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub kind: SlotKind,
}

impl AgendaSlot {
    fn overlaps(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
        self.from < to && from < self.to
    }

    pub fn agenda_item_id(&self) -> Option<AggregateId> {
        match self.kind {
            SlotKind::Regular { agenda_item_id, .. } => agenda_item_id,
            SlotKind::Placeholder { .. } => None,
        }
    }
}

/// A named track of a conference agenda, such as a room or a theme.
///
/// Slots never overlap and are kept ordered by start time.
#[derive(Debug, Clone)]
pub struct AgendaTrack {
    root: AggregateRoot,
    conference_id: ConferenceId,
    name: String,
    slots: Vec<AgendaSlot>,
}

impl Aggregate for AgendaTrack {
    fn aggregate_type() -> &'static str {
        "AgendaTrack"
    }

    fn root(&self) -> &AggregateRoot {
        &self.root
    }

    fn root_mut(&mut self) -> &mut AggregateRoot {
        &mut self.root
    }
}

// Query methods
impl AgendaTrack {
    pub fn conference_id(&self) -> ConferenceId {
        self.conference_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slots(&self) -> &[AgendaSlot] {
        &self.slots
    }

    pub fn slot(&self, slot_id: AgendaSlotId) -> Option<&AgendaSlot> {
        self.slots.iter().find(|slot| slot.id == slot_id)
    }
}

// Command methods
impl AgendaTrack {
    /// Creates an empty track and records [`AgendaTrackCreated`].
    pub fn create(
        id: AggregateId,
        conference_id: ConferenceId,
        name: impl Into<String>,
    ) -> Result<Self, AgendaTrackError> {
        let mut track = Self {
            root: AggregateRoot::new(id),
            conference_id,
            name: String::new(),
            slots: Vec::new(),
        };
        track.change_name(name)?;

        track.root.add_event(AgendaTrackCreated {
            track_id: id,
            conference_id,
            name: track.name.clone(),
            occurred_at: Utc::now(),
        });
        Ok(track)
    }

    pub fn change_name(&mut self, name: impl Into<String>) -> Result<(), AgendaTrackError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AgendaTrackError::EmptyName { id: self.id() });
        }

        self.name = name;
        self.root.increment_version();
        Ok(())
    }

    /// Adds a talk slot with no agenda item yet.
    pub fn add_regular_slot(
        &mut self,
        id: AgendaSlotId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        participants_limit: Option<u32>,
    ) -> Result<(), AgendaTrackError> {
        let kind = SlotKind::Regular {
            participants_limit,
            agenda_item_id: None,
        };
        self.add_slot(AgendaSlot { id, from, to, kind })
    }

    pub fn add_placeholder_slot(
        &mut self,
        id: AgendaSlotId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        label: impl Into<String>,
    ) -> Result<(), AgendaTrackError> {
        let kind = SlotKind::Placeholder {
            label: label.into(),
        };
        self.add_slot(AgendaSlot { id, from, to, kind })
    }

    /// Puts `item` into a regular slot, replacing whatever the slot held.
    ///
    /// The item must belong to the track's conference and may occupy only
    /// one slot of the track.
    pub fn assign_agenda_item(
        &mut self,
        slot_id: AgendaSlotId,
        item: &AgendaItem,
    ) -> Result<(), AgendaTrackError> {
        let id = self.id();
        let index = self
            .slots
            .iter()
            .position(|slot| slot.id == slot_id)
            .ok_or(AgendaTrackError::SlotNotFound { id, slot_id })?;
        if let SlotKind::Placeholder { .. } = self.slots[index].kind {
            return Err(AgendaTrackError::PlaceholderSlotAssignment { id, slot_id });
        }
        if item.conference_id != self.conference_id {
            return Err(AgendaTrackError::ForeignAgendaItem {
                id,
                agenda_item_id: item.id,
            });
        }
        if self
            .slots
            .iter()
            .any(|slot| slot.id != slot_id && slot.agenda_item_id() == Some(item.id))
        {
            return Err(AgendaTrackError::AgendaItemAlreadyAssigned {
                id,
                agenda_item_id: item.id,
            });
        }

        if let SlotKind::Regular { agenda_item_id, .. } = &mut self.slots[index].kind {
            *agenda_item_id = Some(item.id);
        }
        self.root.increment_version();
        Ok(())
    }

    fn add_slot(&mut self, slot: AgendaSlot) -> Result<(), AgendaTrackError> {
        if slot.from >= slot.to {
            return Err(AgendaTrackError::InvalidSlotTime {
                id: self.id(),
                from: slot.from,
                to: slot.to,
            });
        }
        if let Some(existing) = self
            .slots
            .iter()
            .find(|existing| existing.id == slot.id || existing.overlaps(slot.from, slot.to))
        {
            return Err(AgendaTrackError::OverlappingSlot {
                id: self.id(),
                existing: existing.id,
            });
        }

        let position = self.slots.partition_point(|existing| existing.from < slot.from);
        self.slots.insert(position, slot);
        self.root.increment_version();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use common::{SpeakerId, Version};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 10, hour, 0, 0).unwrap()
    }

    fn track() -> AgendaTrack {
        let mut track =
            AgendaTrack::create(AggregateId::new(), ConferenceId::new(), "Main hall").unwrap();
        track.take_events();
        track
    }

    fn item(conference_id: ConferenceId) -> AgendaItem {
        AgendaItem {
            id: AggregateId::new(),
            conference_id,
            title: "Unsafe, carefully".to_string(),
            description: "Soundness arguments in practice".to_string(),
            level: 4,
            tags: Vec::new(),
            speakers: vec![SpeakerId::new()],
        }
    }

    #[test]
    fn create_records_single_created_event_at_version_one() {
        let id = AggregateId::new();
        let conference_id = ConferenceId::new();
        let track = AgendaTrack::create(id, conference_id, "Workshops").unwrap();

        assert_eq!(track.version(), Version::first());
        assert!(track.slots().is_empty());
        assert_eq!(track.events().len(), 1);
        let created = track.events()[0]
            .downcast_ref::<AgendaTrackCreated>()
            .unwrap();
        assert_eq!(created.track_id, id);
        assert_eq!(created.conference_id, conference_id);
        assert_eq!(created.name, "Workshops");
    }

    #[test]
    fn blank_name_is_rejected() {
        let id = AggregateId::new();
        let result = AgendaTrack::create(id, ConferenceId::new(), "  ");
        assert_eq!(result.unwrap_err(), AgendaTrackError::EmptyName { id });
    }

    #[test]
    fn slots_are_kept_in_start_order() {
        let mut track = track();
        let (late, early) = (AgendaSlotId::new(), AgendaSlotId::new());

        track.add_regular_slot(late, at(14), at(15), Some(80)).unwrap();
        track
            .add_placeholder_slot(early, at(12), at(13), "Lunch")
            .unwrap();

        let ids: Vec<_> = track.slots().iter().map(|slot| slot.id).collect();
        assert_eq!(ids, [early, late]);
        assert_eq!(track.version(), Version::new(2));
    }

    #[test]
    fn overlapping_or_empty_ranges_are_rejected() {
        let mut track = track();
        let existing = AgendaSlotId::new();
        track.add_regular_slot(existing, at(10), at(11), None).unwrap();

        let overlap = track.add_regular_slot(
            AgendaSlotId::new(),
            at(10) + Duration::minutes(30),
            at(12),
            None,
        );
        assert_eq!(
            overlap.unwrap_err(),
            AgendaTrackError::OverlappingSlot {
                id: track.id(),
                existing
            }
        );

        let empty = track.add_placeholder_slot(AgendaSlotId::new(), at(13), at(13), "Coffee");
        assert!(matches!(
            empty,
            Err(AgendaTrackError::InvalidSlotTime { .. })
        ));

        // Touching ranges do not overlap.
        track
            .add_regular_slot(AgendaSlotId::new(), at(11), at(12), None)
            .unwrap();
        assert_eq!(track.slots().len(), 2);
    }

    #[test]
    fn agenda_item_goes_into_regular_slot_only() {
        let mut track = track();
        let (talk, lunch) = (AgendaSlotId::new(), AgendaSlotId::new());
        track.add_regular_slot(talk, at(9), at(10), None).unwrap();
        track
            .add_placeholder_slot(lunch, at(12), at(13), "Lunch")
            .unwrap();
        let item = item(track.conference_id());

        track.assign_agenda_item(talk, &item).unwrap();
        assert_eq!(track.slot(talk).unwrap().agenda_item_id(), Some(item.id));

        assert_eq!(
            track.assign_agenda_item(lunch, &item).unwrap_err(),
            AgendaTrackError::PlaceholderSlotAssignment {
                id: track.id(),
                slot_id: lunch
            }
        );
        let unknown = AgendaSlotId::new();
        assert_eq!(
            track.assign_agenda_item(unknown, &item).unwrap_err(),
            AgendaTrackError::SlotNotFound {
                id: track.id(),
                slot_id: unknown
            }
        );
    }

    #[test]
    fn agenda_item_must_match_conference_and_occupy_one_slot() {
        let mut track = track();
        let (first, second) = (AgendaSlotId::new(), AgendaSlotId::new());
        track.add_regular_slot(first, at(9), at(10), None).unwrap();
        track.add_regular_slot(second, at(10), at(11), None).unwrap();

        let foreign = item(ConferenceId::new());
        assert!(matches!(
            track.assign_agenda_item(first, &foreign),
            Err(AgendaTrackError::ForeignAgendaItem { .. })
        ));

        let item = item(track.conference_id());
        track.assign_agenda_item(first, &item).unwrap();
        assert!(matches!(
            track.assign_agenda_item(second, &item),
            Err(AgendaTrackError::AgendaItemAlreadyAssigned { .. })
        ));
        assert_eq!(track.slot(second).unwrap().agenda_item_id(), None);

        // Re-assigning to the same slot is allowed.
        track.assign_agenda_item(first, &item).unwrap();
    }
}
