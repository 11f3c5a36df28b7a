//! In-Memory Event Store
//!
//! Bounded ring of events behind a tokio `RwLock`. Used by tests and by
//! deployments that do not need history to survive a restart.

use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::RwLock;

use crate::domain::Event;
use crate::ports::event_store::{ensure_storable, EventStore, StoreError, DEFAULT_RETENTION_CAP};

/// Capped, chronologically ordered event buffer shared by the store backends
#[derive(Debug, Clone)]
pub(crate) struct EventBuffer {
    events: VecDeque<Event>,
    cap: usize,
}

impl EventBuffer {
    pub(crate) fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            events: VecDeque::with_capacity(cap),
            cap,
        }
    }

    /// Rebuild from persisted events, keeping only the newest `cap`
    pub(crate) fn from_events(events: Vec<Event>, cap: usize) -> Self {
        let mut buffer = Self::new(cap);
        for event in events {
            buffer.push(event);
        }
        buffer
    }

    /// Push and evict oldest-first; returns how many were evicted
    pub(crate) fn push(&mut self, event: Event) -> usize {
        self.events.push_back(event);
        let mut evicted = 0;
        while self.events.len() > self.cap {
            self.events.pop_front();
            evicted += 1;
        }
        evicted
    }

    pub(crate) fn latest(&self) -> Option<&Event> {
        self.events.back()
    }

    pub(crate) fn last_n(&self, n: usize) -> Vec<Event> {
        let skip = self.events.len().saturating_sub(n);
        self.events.iter().skip(skip).cloned().collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }

    pub(crate) fn cap(&self) -> usize {
        self.cap
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }
}

/// Volatile event store
#[derive(Debug)]
pub struct InMemoryEventStore {
    buffer: RwLock<EventBuffer>,
    retention_cap: usize,
}

impl Default for InMemoryEventStore {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION_CAP)
    }
}

impl InMemoryEventStore {
    /// Create an empty store retaining at most `retention_cap` events
    pub fn new(retention_cap: usize) -> Self {
        let buffer = EventBuffer::new(retention_cap);
        Self {
            retention_cap: buffer.cap(),
            buffer: RwLock::new(buffer),
        }
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append(&self, event: Event) -> Result<(), StoreError> {
        ensure_storable(&event)?;
        let mut buffer = self.buffer.write().await;
        let evicted = buffer.push(event);
        if evicted > 0 {
            tracing::trace!("Evicted {} event(s) past retention cap {}", evicted, buffer.cap());
        }
        Ok(())
    }

    async fn latest(&self) -> Result<Option<Event>, StoreError> {
        Ok(self.buffer.read().await.latest().cloned())
    }

    async fn last_n(&self, n: usize) -> Result<Vec<Event>, StoreError> {
        Ok(self.buffer.read().await.last_n(n))
    }

    async fn len(&self) -> Result<usize, StoreError> {
        Ok(self.buffer.read().await.len())
    }

    async fn last_n_with_len(&self, n: usize) -> Result<(Vec<Event>, usize), StoreError> {
        let buffer = self.buffer.read().await;
        Ok((buffer.last_n(n), buffer.len()))
    }

    fn retention_cap(&self) -> usize {
        self.retention_cap
    }

    fn backend_type(&self) -> &'static str {
        "memory"
    }
}
