//! Event Store Port
//!
//! Append-only, bounded sequence of accepted events. Backends must keep
//! insertion order, evict oldest-first once the retention cap is exceeded,
//! and hand out consistent snapshots to concurrent readers.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Event;

/// Retention cap used when none is configured
pub const DEFAULT_RETENTION_CAP: usize = 100;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Refusing to store invalid multiplier {0}")]
    InvalidEvent(f64),

    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Failed to serialize events: {0}")]
    Serialization(String),

    #[error("Event file is corrupted: {0}")]
    Corrupted(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Append an event, evicting the oldest entries beyond the retention cap
    async fn append(&self, event: Event) -> Result<(), StoreError>;

    /// Most recently appended event
    async fn latest(&self) -> Result<Option<Event>, StoreError>;

    /// Last `n` events, oldest-first, length `min(n, len)`
    async fn last_n(&self, n: usize) -> Result<Vec<Event>, StoreError>;

    /// Number of events currently retained
    async fn len(&self) -> Result<usize, StoreError>;

    /// `last_n` and `len` taken from the same state
    async fn last_n_with_len(&self, n: usize) -> Result<(Vec<Event>, usize), StoreError>;

    /// Maximum number of events retained
    fn retention_cap(&self) -> usize;

    /// Short backend name for logs
    fn backend_type(&self) -> &'static str;
}

/// Guard shared by backends so nothing invalid reaches storage
pub(crate) fn ensure_storable(event: &Event) -> Result<(), StoreError> {
    crate::domain::validate_value(event.value)
        .map(|_| ())
        .map_err(|_| StoreError::InvalidEvent(event.value))
}
