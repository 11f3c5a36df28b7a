//! Domain Layer - Core types for the multiplier feed
//!
//! Pure data types and invariants with no I/O. Storage and scheduling happen
//! through the ports and application layers.

pub mod event;
pub mod signal;
pub mod pattern;
pub mod control;

pub use event::{Event, EventId, ValueError, validate_value, NO_SIGNAL_SENTINEL};
pub use signal::{Signal, ConfidenceTier, SignalSource};
pub use pattern::{PatternAlert, PatternKind, AlertSeverity};
pub use control::ControlState;
