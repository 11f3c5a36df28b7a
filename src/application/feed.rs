//! Feed Orchestrator
//!
//! Main loop: drains producer values from a channel into the ingestion gate
//! and, on a fixed cadence, logs a dashboard snapshot.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};

use super::dashboard::Dashboard;
use super::ingestion::{IngestError, IngestionGate, Submission};

/// Counters for one run of the feed loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSummary {
    pub accepted: u64,
    pub duplicates: u64,
    pub rejected: u64,
    pub storage_failures: u64,
    pub snapshots: u64,
}

#[derive(Clone)]
pub struct FeedOrchestrator {
    gate: Arc<IngestionGate>,
    dashboard: Arc<Dashboard>,
    is_running: Arc<RwLock<bool>>,
    stop_requested: Arc<RwLock<bool>>,
    poll_interval: Duration,
}

impl FeedOrchestrator {
    pub fn new(gate: Arc<IngestionGate>, dashboard: Arc<Dashboard>) -> Self {
        Self {
            gate,
            dashboard,
            is_running: Arc::new(RwLock::new(false)),
            stop_requested: Arc::new(RwLock::new(false)),
            poll_interval: Duration::from_secs(2),
        }
    }

    /// Set custom dashboard polling interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    /// Request the loop to stop after the current step. Sticky: a stop
    /// issued before `run` makes `run` return immediately.
    pub async fn stop(&self) {
        *self.stop_requested.write().await = true;
        *self.is_running.write().await = false;
    }

    /// Run until the producer channel closes or `stop` is called
    pub async fn run(&self, mut values: mpsc::Receiver<f64>) -> FeedSummary {
        let mut summary = FeedSummary::default();
        {
            let stop_requested = self.stop_requested.read().await;
            if *stop_requested {
                tracing::info!("Feed stop requested before start");
                return summary;
            }
            // held across the flip so a concurrent stop() lands after it
            *self.is_running.write().await = true;
        }

        tracing::info!(
            "Feed started - store: {}, poll interval: {:?}",
            self.gate.store().backend_type(),
            self.poll_interval
        );

        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // first tick fires immediately
        ticker.tick().await;

        while !*self.stop_requested.read().await {
            tokio::select! {
                received = values.recv() => match received {
                    Some(value) => self.ingest(value, &mut summary).await,
                    None => {
                        tracing::info!("Producer channel closed");
                        break;
                    }
                },
                _ = ticker.tick() => self.poll(&mut summary).await,
            }
        }

        *self.is_running.write().await = false;
        tracing::info!(
            "Feed stopped - accepted: {}, duplicates: {}, rejected: {}, storage failures: {}",
            summary.accepted,
            summary.duplicates,
            summary.rejected,
            summary.storage_failures
        );
        summary
    }

    async fn ingest(&self, value: f64, summary: &mut FeedSummary) {
        match self.gate.submit(value).await {
            Ok(Submission::Accepted(_)) => summary.accepted += 1,
            Ok(Submission::Duplicate(_)) => summary.duplicates += 1,
            // the gate already logged the reason
            Err(IngestError::InvalidValue(_)) => summary.rejected += 1,
            Err(IngestError::Storage(_)) => summary.storage_failures += 1,
        }
    }

    async fn poll(&self, summary: &mut FeedSummary) {
        match self.dashboard.snapshot().await {
            Ok(snapshot) => {
                summary.snapshots += 1;
                let trend = snapshot.statistics.trend;
                tracing::info!(
                    "Last: {} | MA5: {} | Trend: {} ({:+.2}%) | Volatility: {} | Next: {} ({}) | Alerts: {}",
                    snapshot
                        .latest
                        .as_ref()
                        .map_or_else(|| "-".to_string(), |e| format!("{:.2}x", e.value)),
                    snapshot
                        .statistics
                        .moving_averages
                        .short
                        .map_or_else(|| "-".to_string(), |v| format!("{:.2}", v)),
                    trend.direction,
                    trend.change_pct,
                    snapshot.statistics.volatility.level,
                    snapshot
                        .prediction
                        .value
                        .map_or_else(|| "-".to_string(), |v| format!("{:.2}x", v)),
                    snapshot.prediction.confidence,
                    snapshot.patterns.len()
                );
                for alert in &snapshot.patterns {
                    tracing::debug!("Pattern {}: {}", alert.kind, alert.message);
                }
            }
            Err(e) => tracing::error!("Snapshot failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryEventStore;
    use crate::analytics::AnalyticsConfig;
    use crate::domain::ControlState;
    use crate::ports::EventStore;

    fn orchestrator() -> (FeedOrchestrator, Arc<dyn EventStore>) {
        let store: Arc<dyn EventStore> = Arc::new(InMemoryEventStore::default());
        let gate = Arc::new(IngestionGate::new(Arc::clone(&store)));
        let dashboard = Arc::new(Dashboard::new(
            Arc::clone(&store),
            AnalyticsConfig::default(),
            ControlState::default(),
        ));
        (
            FeedOrchestrator::new(gate, dashboard).with_poll_interval(Duration::from_millis(10)),
            store,
        )
    }

    #[tokio::test]
    async fn test_drains_channel_and_counts() {
        let (feed, store) = orchestrator();
        let (tx, rx) = mpsc::channel(16);

        for v in [1.5, 1.5, 2.0, 0.3, -1.0, -1.0, 3.4] {
            tx.send(v).await.unwrap();
        }
        drop(tx);

        let summary = feed.run(rx).await;
        assert_eq!(summary.accepted, 4);
        assert_eq!(summary.duplicates, 2);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.storage_failures, 0);
        assert_eq!(store.len().await.unwrap(), 4);
        assert!(!feed.is_running().await);
    }

    #[tokio::test]
    async fn test_stop_ends_loop() {
        let (feed, _store) = orchestrator();
        let (tx, rx) = mpsc::channel::<f64>(4);

        let handle = {
            let feed = feed.clone();
            tokio::spawn(async move { feed.run(rx).await })
        };

        tokio::time::sleep(Duration::from_millis(30)).await;
        feed.stop().await;

        let summary = tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(summary.snapshots >= 1);
        drop(tx);
    }

    #[tokio::test]
    async fn test_stop_before_run_is_honoured() {
        let (feed, store) = orchestrator();
        let (tx, rx) = mpsc::channel::<f64>(4);
        tx.send(2.5).await.unwrap();

        feed.stop().await;
        let summary = tokio::time::timeout(Duration::from_millis(300), feed.run(rx))
            .await
            .expect("run should return when stopped beforehand");

        assert_eq!(summary, FeedSummary::default());
        assert_eq!(store.len().await.unwrap(), 0);
        assert!(!feed.is_running().await);
        drop(tx);
    }
}
