//! Application Layer - Ingestion, dashboard queries and the feed loop

pub mod ingestion;
pub mod dashboard;
pub mod feed;

pub use ingestion::{IngestionGate, IngestError, Submission};
pub use dashboard::{Dashboard, DashboardSnapshot};
pub use feed::{FeedOrchestrator, FeedSummary};
