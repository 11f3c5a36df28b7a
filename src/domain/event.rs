//! Vela Event
//!
//! One observed multiplier from the game feed. Values are either a real
//! multiplier (>= 1.0) or the -1.0 "no signal" sentinel the capture script
//! emits between rounds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Sentinel value meaning "no signal" for the current round
pub const NO_SIGNAL_SENTINEL: f64 = -1.0;

/// Smallest real multiplier the game can produce
pub const MIN_MULTIPLIER: f64 = 1.0;

/// Opaque event identifier, assigned in arrival order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl EventId {
    /// Identifier of the first event in an empty store
    pub const FIRST: EventId = EventId(1);

    /// Identifier following this one
    pub fn next(self) -> EventId {
        EventId(self.0.saturating_add(1))
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ValueError {
    #[error("Invalid multiplier {0}: must be -1 or >= 1")]
    OutOfRange(f64),

    #[error("Multiplier is not a finite number")]
    NotFinite,
}

/// Check a candidate multiplier against the feed invariant
pub fn validate_value(value: f64) -> Result<f64, ValueError> {
    if !value.is_finite() {
        return Err(ValueError::NotFinite);
    }
    if value == NO_SIGNAL_SENTINEL || value >= MIN_MULTIPLIER {
        Ok(value)
    } else {
        Err(ValueError::OutOfRange(value))
    }
}

/// An accepted multiplier observation (a "vela")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub value: f64,
    pub observed_at: DateTime<Utc>,
}

impl Event {
    /// Build an event, enforcing the value invariant
    pub fn new(id: EventId, value: f64, observed_at: DateTime<Utc>) -> Result<Self, ValueError> {
        let value = validate_value(value)?;
        Ok(Self { id, value, observed_at })
    }

    /// True for the -1.0 "no signal" marker
    pub fn is_no_signal(&self) -> bool {
        self.value == NO_SIGNAL_SENTINEL
    }
}

/// Extract the raw multipliers of a window, oldest-first
pub fn values(events: &[Event]) -> Vec<f64> {
    events.iter().map(|e| e.value).collect()
}
