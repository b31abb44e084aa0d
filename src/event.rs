//! Event record, draft, and calendar mapping types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Color, Day};

/// Day-of-month to ordered events. Insertion order is display order.
pub type Calendar = BTreeMap<Day, Vec<Event>>;

/// Fully materialized calendar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Display name.
    pub name: String,
    /// 12-hour clock time, `H:MM AM|PM`.
    pub time: String,
    /// Invitee email addresses in entry order.
    pub invitees: Vec<String>,
    /// Display colour fixed at creation.
    pub color: Color,
}

impl Event {
    /// Materializes `draft` with the given colour.
    pub fn from_draft(draft: EventDraft, color: Color) -> Self {
        Self {
            name: draft.name,
            time: draft.time,
            invitees: draft.invitees,
            color,
        }
    }

    /// Overwrites the user-editable fields, leaving the colour untouched.
    pub fn apply(&mut self, draft: EventDraft) {
        self.name = draft.name;
        self.time = draft.time;
        self.invitees = draft.invitees;
    }

    /// Returns the user-editable fields as a draft.
    pub fn to_draft(&self) -> EventDraft {
        EventDraft {
            name: self.name.clone(),
            time: self.time.clone(),
            invitees: self.invitees.clone(),
        }
    }
}

/// Add/edit payload: everything but the colour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    /// Display name.
    pub name: String,
    /// 12-hour clock time, `H:MM AM|PM`.
    pub time: String,
    /// Invitee email addresses in entry order.
    pub invitees: Vec<String>,
}

impl EventDraft {
    /// Builds a draft from borrowed parts.
    pub fn new<I, S>(name: &str, time: &str, invitees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            time: time.to_string(),
            invitees: invitees.into_iter().map(Into::into).collect(),
        }
    }
}
