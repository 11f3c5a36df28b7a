//! Ports Layer - Trait definitions for external dependencies
//!
//! Following hexagonal architecture, storage is reached only through the
//! `EventStore` trait so the in-memory and durable backends are interchangeable.

pub mod event_store;

pub use event_store::{EventStore, StoreError, DEFAULT_RETENTION_CAP};

#[cfg(test)]
pub use event_store::MockEventStore;
