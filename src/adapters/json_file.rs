//! JSON File Event Store
//!
//! Durable backend that keeps the retained window in memory and mirrors it to
//! a JSON file after every append, so history survives restarts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use super::memory::EventBuffer;
use crate::domain::{validate_value, Event};
use crate::ports::event_store::{ensure_storable, EventStore, StoreError};

/// Default event file name inside a data directory
pub const DEFAULT_EVENT_FILE: &str = "velas.json";

/// On-disk layout
#[derive(Debug, Serialize, Deserialize)]
struct EventFile {
    retention_cap: usize,
    events: Vec<Event>,
}

#[derive(Debug)]
pub struct JsonFileEventStore {
    path: PathBuf,
    buffer: RwLock<EventBuffer>,
    retention_cap: usize,
}

impl JsonFileEventStore {
    /// Open the store at `path`, loading any events already on disk.
    ///
    /// A missing or empty file starts an empty store. Events beyond
    /// `retention_cap` are trimmed oldest-first.
    pub fn open(path: impl Into<PathBuf>, retention_cap: usize) -> Result<Self, StoreError> {
        let path = path.into();
        let events = load_events(&path)?;
        let loaded = events.len();
        let buffer = EventBuffer::from_events(events, retention_cap);

        tracing::info!(
            "Event store opened at {} ({} event(s) loaded, {} retained, cap {})",
            path.display(),
            loaded,
            buffer.len(),
            buffer.cap()
        );

        Ok(Self {
            path,
            retention_cap: buffer.cap(),
            buffer: RwLock::new(buffer),
        })
    }

    /// Default file path for a data directory
    pub fn default_path(data_dir: &Path) -> PathBuf {
        data_dir.join(DEFAULT_EVENT_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn load_events(path: &Path) -> Result<Vec<Event>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path).map_err(|e| StoreError::Io(e.to_string()))?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let file: EventFile =
        serde_json::from_str(&content).map_err(|e| StoreError::Corrupted(e.to_string()))?;

    let mut previous = None;
    for event in &file.events {
        if validate_value(event.value).is_err() {
            return Err(StoreError::Corrupted(format!(
                "event {} has invalid multiplier {}",
                event.id, event.value
            )));
        }
        if previous.is_some_and(|p| event.id <= p) {
            return Err(StoreError::Corrupted(format!(
                "event {} is out of order",
                event.id
            )));
        }
        previous = Some(event.id);
    }

    Ok(file.events)
}

/// Write via a sibling temp file and rename so readers never see a partial file
fn save_events(path: &Path, buffer: &EventBuffer) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }
    }

    let file = EventFile {
        retention_cap: buffer.cap(),
        events: buffer.iter().cloned().collect(),
    };
    let content = serde_json::to_string_pretty(&file)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content).map_err(|e| StoreError::Io(e.to_string()))?;
    fs::rename(&tmp, path).map_err(|e| StoreError::Io(e.to_string()))?;
    Ok(())
}

#[async_trait]
impl EventStore for JsonFileEventStore {
    async fn append(&self, event: Event) -> Result<(), StoreError> {
        ensure_storable(&event)?;
        let mut buffer = self.buffer.write().await;

        // Persist the candidate state first so a failed write leaves memory untouched
        let mut next = buffer.clone();
        next.push(event);
        save_events(&self.path, &next)?;
        *buffer = next;
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
        "json_file"
    }
}
