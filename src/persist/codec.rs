//! JSON encoding of the whole calendar mapping.
//!
//! Day keys are written as decimal strings (`{"15":[...]}`) and events as
//! `{"name","time","invitees","color"}` records. There is no version field.

use tracing::{debug, warn};

use crate::event::Calendar;

use super::{PersistResult, Slot};

/// Serializes the full mapping into one blob.
pub fn encode(calendar: &Calendar) -> PersistResult<String> {
    Ok(serde_json::to_string(calendar)?)
}

/// Parses a blob, returning `None` when it does not have the calendar shape.
pub fn decode(blob: &str) -> Option<Calendar> {
    serde_json::from_str(blob).ok()
}

/// Loads the calendar from `slot`. Absent, unreadable, or corrupt data all
/// yield an empty mapping.
pub fn load(slot: &dyn Slot) -> Calendar {
    let blob = match slot.read() {
        Ok(Some(blob)) => blob,
        Ok(None) => {
            debug!("calendar slot empty, starting fresh");
            return Calendar::new();
        }
        Err(err) => {
            warn!(error = %err, "calendar slot unreadable, starting fresh");
            return Calendar::new();
        }
    };

    match serde_json::from_str::<Calendar>(&blob) {
        Ok(calendar) => {
            debug!(days = calendar.len(), "calendar loaded");
            calendar
        }
        Err(err) => {
            warn!(error = %err, bytes = blob.len(), "calendar slot corrupt, starting fresh");
            Calendar::new()
        }
    }
}
