//! Shared primitive IDs, limits, and the event colour type.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// 1-based day-of-month.
pub type Day = u32;
/// Session-scoped event handle, assigned on load or add.
pub type EventId = u64;

/// Maximum number of events a single day may hold.
pub const MAX_EVENTS_PER_DAY: usize = 3;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Display colour of an event, `#` followed by six upper-case hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    /// Draws a colour with each hex digit chosen uniformly from `rng`.
    pub fn random_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut color = String::with_capacity(7);
        color.push('#');
        for _ in 0..6 {
            color.push(HEX_DIGITS[rng.gen_range(0..HEX_DIGITS.len())] as char);
        }
        Self(color)
    }

    /// Returns the colour code including the leading `#`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
