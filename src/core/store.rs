use rand::Rng;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    event::{Calendar, Event, EventDraft},
    persist::{PersistResult, Slot, codec},
    types::{Color, Day, EventId, MAX_EVENTS_PER_DAY},
    validate::{EventForm, ValidationError, validate_day},
};

use super::indices::IdIndex;

/// Rejected edit/delete addressing or form input. State is unchanged
/// whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The day has no event sequence at all.
    #[error("day {0} has no events")]
    DayNotFound(Day),
    /// The index is past the end of the day's sequence.
    #[error("day {day} has {len} events, index {index} is out of range")]
    IndexOutOfRange {
        /// Addressed day.
        day: Day,
        /// Requested position.
        index: usize,
        /// Current sequence length.
        len: usize,
    },
    /// The id does not name a live event.
    #[error("no event with id {0}")]
    UnknownId(EventId),
    /// Form input failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Result of [`EventStore::add_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Event appended.
    Added {
        /// Handle of the new event.
        id: EventId,
        /// Position within the day.
        index: usize,
    },
    /// Day already held [`MAX_EVENTS_PER_DAY`] events; nothing changed.
    DayFull,
}

impl AddOutcome {
    /// True when the event was appended.
    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added { .. })
    }
}

/// Authoritative day → events mapping with write-through persistence.
///
/// Every successful mutation is applied in memory first and then the whole
/// mapping is written to the slot. A failed write is logged and leaves the
/// in-memory change in place; [`EventStore::is_persisted`] reports it.
pub struct EventStore {
    events: Calendar,
    ids: IdIndex,
    slot: Box<dyn Slot>,
    persisted: bool,
}

impl EventStore {
    /// Loads the mapping from `slot`. Missing or corrupt data yields an
    /// empty calendar.
    pub fn open(slot: impl Slot + 'static) -> Self {
        let mut events = codec::load(&slot);
        for (day, seq) in events.iter_mut() {
            if seq.len() > MAX_EVENTS_PER_DAY {
                warn!(
                    day,
                    stored = seq.len(),
                    "stored day exceeds event cap, dropping the extras"
                );
                seq.truncate(MAX_EVENTS_PER_DAY);
            }
        }
        Self::with_calendar(events, slot)
    }

    /// Starts empty without reading `slot`, so the first mutation replaces
    /// whatever the slot held. Use [`EventStore::open`] to keep stored events.
    pub fn empty_overwriting(slot: impl Slot + 'static) -> Self {
        Self::with_calendar(Calendar::new(), slot)
    }

    fn with_calendar(events: Calendar, slot: impl Slot + 'static) -> Self {
        Self {
            ids: IdIndex::for_calendar(&events),
            events,
            slot: Box::new(slot),
            persisted: true,
        }
    }

    /// Full mapping, for rendering.
    pub fn events(&self) -> &Calendar {
        &self.events
    }

    /// Events of `day` in display order.
    pub fn day(&self, day: Day) -> &[Event] {
        self.events.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Days holding at least one event, ascending.
    pub fn days(&self) -> impl Iterator<Item = (Day, &[Event])> + '_ {
        self.events
            .iter()
            .filter(|(_, seq)| !seq.is_empty())
            .map(|(day, seq)| (*day, seq.as_slice()))
    }

    /// Number of events on `day`.
    pub fn event_count(&self, day: Day) -> usize {
        self.day(day).len()
    }

    /// True when another add on `day` would be refused.
    pub fn is_day_full(&self, day: Day) -> bool {
        self.event_count(day) >= MAX_EVENTS_PER_DAY
    }

    /// Event at `index` of `day`.
    pub fn get(&self, day: Day, index: usize) -> Option<&Event> {
        self.day(day).get(index)
    }

    /// Appends a new event with a random colour. A full day is left as is.
    pub fn add_event(&mut self, day: Day, draft: EventDraft) -> AddOutcome {
        self.add_event_with_rng(day, draft, &mut rand::thread_rng())
    }

    /// [`EventStore::add_event`] drawing the colour from `rng`.
    pub fn add_event_with_rng<R: Rng + ?Sized>(
        &mut self,
        day: Day,
        draft: EventDraft,
        rng: &mut R,
    ) -> AddOutcome {
        if self.is_day_full(day) {
            debug!(day, "day full, add ignored");
            return AddOutcome::DayFull;
        }

        let event = Event::from_draft(draft, Color::random_with(rng));
        let seq = self.events.entry(day).or_default();
        seq.push(event);
        let index = seq.len() - 1;
        let id = self.ids.push(day);
        debug!(day, index, id, "event added");

        self.write_through();
        AddOutcome::Added { id, index }
    }

    /// Replaces name, time, and invitees of the event at `index`, keeping
    /// its colour.
    pub fn edit_event(
        &mut self,
        day: Day,
        index: usize,
        draft: EventDraft,
    ) -> Result<(), StoreError> {
        self.check_position(day, index)?;
        if let Some(event) = self.events.get_mut(&day).and_then(|seq| seq.get_mut(index)) {
            event.apply(draft);
        }
        debug!(day, index, "event edited");

        self.write_through();
        Ok(())
    }

    /// Removes the event at `index`; later events on the day shift down.
    pub fn delete_event(&mut self, day: Day, index: usize) -> Result<Event, StoreError> {
        self.check_position(day, index)?;
        let seq = self
            .events
            .get_mut(&day)
            .ok_or(StoreError::DayNotFound(day))?;
        let removed = seq.remove(index);
        self.ids.remove_at(day, index);
        debug!(day, index, "event deleted");

        self.write_through();
        Ok(removed)
    }

    /// Validates `day` and `form`, then behaves as [`EventStore::add_event`].
    pub fn add_form(&mut self, day: Day, form: &EventForm) -> Result<AddOutcome, StoreError> {
        validate_day(day)?;
        let draft = form.validate()?;
        Ok(self.add_event(day, draft))
    }

    /// Validates `form`, then behaves as [`EventStore::edit_event`].
    pub fn edit_form(
        &mut self,
        day: Day,
        index: usize,
        form: &EventForm,
    ) -> Result<(), StoreError> {
        let draft = form.validate()?;
        self.edit_event(day, index, draft)
    }

    /// Ids of `day`'s events, parallel to [`EventStore::day`].
    pub fn day_ids(&self, day: Day) -> &[EventId] {
        self.ids.ids(day)
    }

    /// Current day and position of `id`.
    pub fn locate(&self, id: EventId) -> Option<(Day, usize)> {
        self.ids.locate(id)
    }

    /// Event named by `id`.
    pub fn get_by_id(&self, id: EventId) -> Option<&Event> {
        let (day, index) = self.locate(id)?;
        self.get(day, index)
    }

    /// [`EventStore::edit_event`] addressed by id.
    pub fn edit_by_id(&mut self, id: EventId, draft: EventDraft) -> Result<(), StoreError> {
        let (day, index) = self.locate(id).ok_or(StoreError::UnknownId(id))?;
        self.edit_event(day, index, draft)
    }

    /// [`EventStore::delete_event`] addressed by id.
    pub fn delete_by_id(&mut self, id: EventId) -> Result<Event, StoreError> {
        let (day, index) = self.locate(id).ok_or(StoreError::UnknownId(id))?;
        self.delete_event(day, index)
    }

    /// False when the most recent write to the slot failed.
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Writes the current mapping to the slot, reporting failure to the
    /// caller instead of only logging it.
    pub fn persist_now(&mut self) -> PersistResult<()> {
        let blob = codec::encode(&self.events)?;
        let res = self.slot.write(&blob);
        self.persisted = res.is_ok();
        res
    }

    fn write_through(&mut self) {
        if let Err(err) = self.persist_now() {
            warn!(error = %err, "calendar not saved, keeping in-memory changes");
        }
    }

    fn check_position(&self, day: Day, index: usize) -> Result<(), StoreError> {
        let seq = self.events.get(&day).ok_or(StoreError::DayNotFound(day))?;
        if index >= seq.len() {
            return Err(StoreError::IndexOutOfRange {
                day,
                index,
                len: seq.len(),
            });
        }
        Ok(())
    }
}
