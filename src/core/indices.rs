use std::collections::BTreeMap;

use hashbrown::HashMap;

use crate::{
    event::Calendar,
    types::{Day, EventId},
};

/// Session-scoped ids kept parallel to each day's event sequence.
#[derive(Debug)]
pub struct IdIndex {
    by_id: HashMap<EventId, Day>,
    by_day: BTreeMap<Day, Vec<EventId>>,
    next_id: EventId,
}

impl Default for IdIndex {
    fn default() -> Self {
        Self {
            by_id: HashMap::new(),
            by_day: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl IdIndex {
    /// Assigns ids to every event of `calendar` in day then position order.
    pub fn for_calendar(calendar: &Calendar) -> Self {
        let mut index = Self::default();
        for (day, events) in calendar {
            for _ in events {
                index.push(*day);
            }
        }
        index
    }

    /// Allocates an id for an event appended to `day`.
    pub fn push(&mut self, day: Day) -> EventId {
        let id = self.next_id;
        self.next_id += 1;
        self.by_id.insert(id, day);
        self.by_day.entry(day).or_default().push(id);
        id
    }

    /// Drops the id at `index` of `day`, shifting later ids down.
    pub fn remove_at(&mut self, day: Day, index: usize) -> Option<EventId> {
        let ids = self.by_day.get_mut(&day)?;
        if index >= ids.len() {
            return None;
        }
        let id = ids.remove(index);
        self.by_id.remove(&id);
        Some(id)
    }

    /// Ids of `day` in display order.
    pub fn ids(&self, day: Day) -> &[EventId] {
        self.by_day.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Current day and position of `id`.
    pub fn locate(&self, id: EventId) -> Option<(Day, usize)> {
        let day = *self.by_id.get(&id)?;
        let index = self.ids(day).iter().position(|x| *x == id)?;
        Some((day, index))
    }
}
