//! Dashboard Queries
//!
//! Pull-based read side: each query takes a fresh window from the store and
//! runs the pure analytics engines over it. Operator controls only affect the
//! prediction query.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::analytics::{AnalyticsConfig, PatternDetector, Predictor, Statistics, StatisticsEngine};
use crate::domain::{ControlState, Event, PatternAlert, Signal, ValueError};
use crate::ports::{EventStore, StoreError};

/// Everything the dashboard renders in one poll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<Utc>,
    pub latest: Option<Event>,
    pub stored_events: usize,
    pub statistics: Statistics,
    pub prediction: Signal,
    pub patterns: Vec<PatternAlert>,
}

pub struct Dashboard {
    store: Arc<dyn EventStore>,
    statistics: StatisticsEngine,
    predictor: Predictor,
    detector: PatternDetector,
    controls: Arc<RwLock<ControlState>>,
}

impl Dashboard {
    pub fn new(store: Arc<dyn EventStore>, config: AnalyticsConfig, controls: ControlState) -> Self {
        Self {
            store,
            statistics: StatisticsEngine::new(config.statistics),
            predictor: Predictor::new(config.prediction),
            detector: PatternDetector::new(config.patterns),
            controls: Arc::new(RwLock::new(controls)),
        }
    }

    /// Shared handle for whatever admin surface flips the controls
    pub fn controls(&self) -> Arc<RwLock<ControlState>> {
        Arc::clone(&self.controls)
    }

    pub async fn set_maintenance_mode(&self, enabled: bool) {
        self.controls.write().await.maintenance_mode = enabled;
        tracing::info!("Maintenance mode {}", if enabled { "enabled" } else { "disabled" });
    }

    pub async fn set_manual_override(&self, value: Option<f64>) -> Result<(), ValueError> {
        self.controls.write().await.set_override(value)?;
        match value {
            Some(v) => tracing::info!("Manual override set to {:.2}x", v),
            None => tracing::info!("Manual override cleared"),
        }
        Ok(())
    }

    pub async fn statistics(&self) -> Result<Statistics, StoreError> {
        let window = self.store.last_n(self.statistics.config().window).await?;
        Ok(self.statistics.compute(&window))
    }

    /// Next-round signal, honouring maintenance mode and manual override
    pub async fn prediction(&self) -> Result<Signal, StoreError> {
        let controls = self.controls.read().await.clone();
        let window = if controls.supersedes_prediction() {
            Vec::new()
        } else {
            self.store.last_n(self.predictor.config().window).await?
        };
        Ok(controls.resolve_signal(|| self.predictor.predict(&window)))
    }

    pub async fn patterns(&self) -> Result<Vec<PatternAlert>, StoreError> {
        let window = self.store.last_n(self.detector.config().window).await?;
        Ok(self.detector.detect(&window))
    }

    /// All three queries over a single consistent store read
    pub async fn snapshot(&self) -> Result<DashboardSnapshot, StoreError> {
        let widest = self
            .statistics
            .config()
            .window
            .max(self.predictor.config().window)
            .max(self.detector.config().window);
        let (events, stored_events) = self.store.last_n_with_len(widest).await?;

        let controls = self.controls.read().await.clone();
        let prediction = controls.resolve_signal(|| {
            self.predictor.predict(tail(&events, self.predictor.config().window))
        });

        Ok(DashboardSnapshot {
            generated_at: Utc::now(),
            latest: events.last().cloned(),
            stored_events,
            statistics: self.statistics.compute(tail(&events, self.statistics.config().window)),
            prediction,
            patterns: self.detector.detect(tail(&events, self.detector.config().window)),
        })
    }
}

fn tail(events: &[Event], n: usize) -> &[Event] {
    &events[events.len().saturating_sub(n)..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryEventStore;
    use crate::analytics::TrendDirection;
    use crate::application::ingestion::IngestionGate;
    use crate::domain::{ConfidenceTier, EventId, PatternKind, SignalSource};
    use crate::ports::MockEventStore;

    async fn seeded(values: &[f64], controls: ControlState) -> Dashboard {
        let store: Arc<dyn EventStore> = Arc::new(InMemoryEventStore::default());
        let gate = IngestionGate::new(Arc::clone(&store));
        for &v in values {
            gate.submit(v).await.unwrap();
        }
        Dashboard::new(store, AnalyticsConfig::default(), controls)
    }

    #[tokio::test]
    async fn test_empty_store_queries_are_defined() {
        let dashboard = seeded(&[], ControlState::default()).await;

        let stats = dashboard.statistics().await.unwrap();
        assert_eq!(stats.sample_size, 0);
        assert!(dashboard.prediction().await.unwrap().value.is_none());
        assert!(dashboard.patterns().await.unwrap().is_empty());

        let snapshot = dashboard.snapshot().await.unwrap();
        assert!(snapshot.latest.is_none());
        assert_eq!(snapshot.stored_events, 0);
    }

    #[tokio::test]
    async fn test_statistics_use_last_twenty() {
        let mut values: Vec<f64> = (0..30).map(|i| 50.0 + i as f64).collect();
        values.extend([1.0, 9.0]);
        let dashboard = seeded(&values, ControlState::default()).await;

        let stats = dashboard.statistics().await.unwrap();
        assert_eq!(stats.sample_size, 20);
        assert!(stats.moving_averages.long.is_some());
    }

    #[tokio::test]
    async fn test_prediction_uses_last_ten() {
        let mut values = vec![2.0, 2.5, 2.0, 2.5, 2.0, 2.5, 2.0, 2.5, 2.0, 10.0];
        values.insert(0, 40.0);
        let dashboard = seeded(&values, ControlState::default()).await;

        let signal = dashboard.prediction().await.unwrap();
        assert_eq!(signal.computed_from, 10);
        assert_eq!(signal.confidence, ConfidenceTier::High);
        assert_eq!(signal.source, SignalSource::Computed);
    }

    #[tokio::test]
    async fn test_override_supersedes_prediction_only() {
        let controls = ControlState {
            maintenance_mode: false,
            manual_override: Some(2.25),
        };
        let dashboard = seeded(&[1.5, 1.8, 1.2, 1.9, 1.4], controls).await;

        let signal = dashboard.prediction().await.unwrap();
        assert_eq!(signal.value, Some(2.25));
        assert_eq!(signal.source, SignalSource::ManualOverride);

        // patterns and statistics are untouched
        let kinds: Vec<PatternKind> = dashboard.patterns().await.unwrap().iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![PatternKind::SequenceBaixa, PatternKind::Oportunidade]);
        assert_eq!(dashboard.statistics().await.unwrap().sample_size, 5);
    }

    #[tokio::test]
    async fn test_controls_flip_at_runtime() {
        let dashboard = seeded(&[2.0, 3.0, 4.0], ControlState::default()).await;
        assert_eq!(dashboard.prediction().await.unwrap().source, SignalSource::Computed);

        dashboard.set_maintenance_mode(true).await;
        let withheld = dashboard.prediction().await.unwrap();
        assert_eq!(withheld.source, SignalSource::Maintenance);
        assert!(withheld.value.is_none());

        dashboard.set_maintenance_mode(false).await;
        dashboard.set_manual_override(Some(5.0)).await.unwrap();
        assert_eq!(dashboard.prediction().await.unwrap().value, Some(5.0));

        assert!(dashboard.set_manual_override(Some(0.2)).await.is_err());
        dashboard.set_manual_override(None).await.unwrap();
        assert_eq!(dashboard.prediction().await.unwrap().source, SignalSource::Computed);
    }

    #[tokio::test]
    async fn test_snapshot_matches_individual_queries() {
        let dashboard = seeded(
            &[1.0, 1.1, 1.0, 9.0, 9.1, 9.0, 1.5, 2.7, 1.1, 1.3, 1.2, 8.0],
            ControlState::default(),
        )
        .await;

        let snapshot = dashboard.snapshot().await.unwrap();
        assert_eq!(snapshot.statistics, dashboard.statistics().await.unwrap());
        assert_eq!(snapshot.prediction, dashboard.prediction().await.unwrap());
        assert_eq!(snapshot.patterns, dashboard.patterns().await.unwrap());
        assert_eq!(snapshot.latest.as_ref().map(|e| e.value), Some(8.0));
    }

    #[tokio::test]
    async fn test_snapshot_reads_store_once() {
        let mut store = MockEventStore::new();
        store.expect_last_n_with_len().times(1).returning(|_| {
            let events = [1.4, 2.6, 1.9]
                .iter()
                .enumerate()
                .map(|(i, &v)| Event::new(EventId(55 + i as u64), v, Utc::now()).unwrap())
                .collect();
            Ok((events, 57))
        });
        store.expect_last_n().never();
        store.expect_len().never();

        let dashboard = Dashboard::new(Arc::new(store), AnalyticsConfig::default(), ControlState::default());
        let snapshot = dashboard.snapshot().await.unwrap();

        assert_eq!(snapshot.stored_events, 57);
        assert_eq!(snapshot.latest.map(|e| e.id), Some(EventId(57)));
        assert_eq!(snapshot.statistics.sample_size, 3);
    }

    #[tokio::test]
    async fn test_queries_are_idempotent() {
        let dashboard = seeded(&[1.0, 1.2, 9.0, 9.5], ControlState::default()).await;
        let first = dashboard.statistics().await.unwrap();
        let second = dashboard.statistics().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.trend.direction, TrendDirection::Rising);
    }
}
