//! Ingestion Gate
//!
//! Validates producer submissions and drops consecutive duplicates before they
//! reach the store. The capture script polls the game at a fixed rate and sees
//! the same value many times per round, so only value transitions are stored.

use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::{validate_value, Event, EventId, ValueError};
use crate::ports::{EventStore, StoreError};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum IngestError {
    #[error("Rejected value: {0}")]
    InvalidValue(#[from] ValueError),

    #[error("Event store failure: {0}")]
    Storage(#[from] StoreError),
}

/// Outcome of a successful submission
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// A new event was stored
    Accepted(Event),
    /// Same value as the latest event; nothing was stored
    Duplicate(Event),
}

impl Submission {
    pub fn event(&self) -> &Event {
        match self {
            Submission::Accepted(e) | Submission::Duplicate(e) => e,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Submission::Duplicate(_))
    }
}

/// Single entry point for producer values
pub struct IngestionGate {
    store: Arc<dyn EventStore>,
    /// Serializes check-and-append so concurrent submissions see each other
    append_lock: Mutex<()>,
}

impl IngestionGate {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self {
            store,
            append_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<dyn EventStore> {
        &self.store
    }

    /// Validate and store `candidate`, or return the latest event if unchanged
    pub async fn submit(&self, candidate: f64) -> Result<Submission, IngestError> {
        let value = validate_value(candidate).map_err(|e| {
            tracing::warn!("Rejected multiplier {}: {}", candidate, e);
            e
        })?;

        let _guard = self.append_lock.lock().await;

        let latest = self.store.latest().await?;
        if let Some(ref last) = latest {
            if last.value == value {
                tracing::debug!("Duplicate {:.2}x ignored (latest {})", value, last.id);
                return Ok(Submission::Duplicate(last.clone()));
            }
        }

        let id = latest.map_or(EventId::FIRST, |e| e.id.next());
        let event = Event::new(id, value, Utc::now())?;

        self.store.append(event.clone()).await.map_err(|e| {
            tracing::error!("Failed to store {:.2}x: {}", value, e);
            e
        })?;

        tracing::info!("Vela {} accepted: {:.2}x", event.id, event.value);
        Ok(Submission::Accepted(event))
    }

    /// Submit `values` in order. Invalid values are reported per item and
    /// skipped; the first storage failure aborts the batch.
    pub async fn submit_batch(
        &self,
        values: &[f64],
    ) -> Result<Vec<(f64, Result<Submission, ValueError>)>, StoreError> {
        let mut outcomes = Vec::with_capacity(values.len());
        for &value in values {
            match self.submit(value).await {
                Ok(submission) => outcomes.push((value, Ok(submission))),
                Err(IngestError::InvalidValue(e)) => outcomes.push((value, Err(e))),
                Err(IngestError::Storage(e)) => return Err(e),
            }
        }
        Ok(outcomes)
    }
}
