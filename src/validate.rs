//! Entry-form validation for event name, time, and invitees.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::{event::EventDraft, types::Day};

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(1[0-2]|0?[1-9]):([0-5][0-9])\s?(AM|PM)$").expect("time regex")
});

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

/// Highest day number accepted from user input.
pub const MAX_DAY: Day = 31;

/// Rejected form input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Name is empty after trimming.
    #[error("event name must not be empty")]
    EmptyName,
    /// Time is empty.
    #[error("event time must not be empty")]
    EmptyTime,
    /// Time is not `H:MM AM|PM`.
    #[error("event time {0:?} must look like H:MM AM or H:MM PM")]
    BadTime(String),
    /// Invitee field is empty.
    #[error("at least one invitee is required")]
    NoInvitees,
    /// One comma-separated invitee is not an email address.
    #[error("one or more invitees have invalid email addresses: {0:?}")]
    BadInvitee(String),
    /// Day outside `1..=31`.
    #[error("day {0} is outside 1..=31")]
    BadDay(Day),
}

/// Raw, unvalidated dialog input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventForm {
    /// Event name as typed.
    pub name: String,
    /// Event time as typed.
    pub time: String,
    /// Comma-separated invitee emails as typed.
    pub invitees: String,
}

impl EventForm {
    /// Builds a form from borrowed input.
    pub fn new(name: &str, time: &str, invitees: &str) -> Self {
        Self {
            name: name.to_string(),
            time: time.to_string(),
            invitees: invitees.to_string(),
        }
    }

    /// Checks every field and returns the normalized draft.
    pub fn validate(&self) -> Result<EventDraft, ValidationError> {
        Ok(EventDraft {
            name: validate_name(&self.name)?,
            time: validate_time(&self.time)?,
            invitees: validate_invitees(&self.invitees)?,
        })
    }
}

/// Trims `name` and rejects it when nothing is left.
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(name.to_string())
}

/// Accepts `H:MM AM|PM` (hour 1-12, minute 00-59) and returns it
/// canonicalized as `H:MM AM` without a leading zero.
pub fn validate_time(time: &str) -> Result<String, ValidationError> {
    let time = time.trim();
    if time.is_empty() {
        return Err(ValidationError::EmptyTime);
    }
    let caps = TIME_RE
        .captures(time)
        .ok_or_else(|| ValidationError::BadTime(time.to_string()))?;
    let hour: u8 = caps[1]
        .parse()
        .map_err(|_| ValidationError::BadTime(time.to_string()))?;
    Ok(format!(
        "{hour}:{} {}",
        &caps[2],
        caps[3].to_ascii_uppercase()
    ))
}

/// Splits on commas, trims each segment, and requires every one to be an
/// email address.
pub fn validate_invitees(invitees: &str) -> Result<Vec<String>, ValidationError> {
    if invitees.trim().is_empty() {
        return Err(ValidationError::NoInvitees);
    }
    invitees
        .split(',')
        .map(str::trim)
        .map(|email| {
            if EMAIL_RE.is_match(email) {
                Ok(email.to_string())
            } else {
                Err(ValidationError::BadInvitee(email.to_string()))
            }
        })
        .collect()
}

/// Rejects days outside the displayed month's possible range.
pub fn validate_day(day: Day) -> Result<Day, ValidationError> {
    if (1..=MAX_DAY).contains(&day) {
        Ok(day)
    } else {
        Err(ValidationError::BadDay(day))
    }
}
