//! Prediction Module
//!
//! Suggests the next multiplier from the last few rounds. This is a simple
//! momentum/reversion heuristic for display, not a statistical forecast.

use super::params::PredictionConfig;
use super::window::{half_means, mean, round2, tail};
use crate::domain::event::{values, Event};
use crate::domain::{ConfidenceTier, Signal};

#[derive(Debug, Clone, Default)]
pub struct Predictor {
    config: PredictionConfig,
}

impl Predictor {
    pub fn new(config: PredictionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PredictionConfig {
        &self.config
    }

    /// Predict from the most recent `config.window` events of `recent`
    pub fn predict(&self, recent: &[Event]) -> Signal {
        let all = values(recent);
        let window = tail(&all, self.config.window);
        let n = window.len();
        let confidence = self.confidence(n);

        let value = match n {
            0 => None,
            1 | 2 => Some(self.config.sparse_value),
            _ => self.estimate(window),
        };

        Signal::computed(value, confidence, n)
    }

    fn estimate(&self, window: &[f64]) -> Option<f64> {
        let overall = mean(window)?;
        let (first, second) = half_means(window)?;

        let factor = if second > first {
            self.config.momentum_factor
        } else {
            self.config.reversion_factor
        };

        let raw = (overall * factor).clamp(self.config.floor, self.config.ceiling);
        Some(round2(raw))
    }

    fn confidence(&self, n: usize) -> ConfidenceTier {
        if n >= self.config.high_confidence_events {
            ConfidenceTier::High
        } else if n >= self.config.medium_confidence_events {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }
}

/// Prediction with the default parameters
pub fn predict(last10: &[Event]) -> Signal {
    Predictor::default().predict(last10)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EventId, SignalSource};
    use chrono::Utc;

    fn window(values: &[f64]) -> Vec<Event> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Event::new(EventId(i as u64 + 1), v, Utc::now()).unwrap())
            .collect()
    }

    #[test]
    fn test_no_events_no_value() {
        let signal = predict(&[]);
        assert_eq!(signal.value, None);
        assert_eq!(signal.confidence, ConfidenceTier::Low);
        assert_eq!(signal.computed_from, 0);
        assert_eq!(signal.source, SignalSource::Computed);
    }

    #[test]
    fn test_sparse_window_uses_fixed_default() {
        let one = predict(&window(&[7.0]));
        assert_eq!(one.value, Some(1.5));
        assert_eq!(one.confidence, ConfidenceTier::Low);

        let two = predict(&window(&[7.0, 30.0]));
        assert_eq!(two.value, Some(1.5));
    }

    #[test]
    fn test_momentum_when_second_half_higher() {
        let signal = predict(&window(&[2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 10.0]));
        // mean 2.8 * 1.2
        assert_eq!(signal.value, Some(3.36));
        assert_eq!(signal.confidence, ConfidenceTier::High);
        assert_eq!(signal.computed_from, 10);
    }

    #[test]
    fn test_reversion_when_second_half_not_higher() {
        // mean 3.0, halves equal -> 3.0 * 0.9
        let signal = predict(&window(&[3.0, 3.0, 3.0, 3.0]));
        assert_eq!(signal.value, Some(2.7));
        assert_eq!(signal.confidence, ConfidenceTier::Low);
    }

    #[test]
    fn test_clamped_to_ceiling_and_floor() {
        let high = predict(&window(&[5.0, 20.0, 40.0]));
        assert_eq!(high.value, Some(10.0));

        let low = predict(&window(&[1.0, 1.0, 1.0, 1.0, 1.0]));
        assert_eq!(low.value, Some(1.2));
        assert_eq!(low.confidence, ConfidenceTier::Medium);
    }

    #[test]
    fn test_sentinels_pull_towards_floor() {
        let signal = predict(&window(&[-1.0, -1.0, -1.0]));
        assert_eq!(signal.value, Some(1.2));
    }

    #[test]
    fn test_only_last_ten_considered() {
        let mut values = vec![50.0; 5];
        values.extend([2.0; 10]);
        let signal = predict(&window(&values));
        // ten 2.0s: halves equal -> reversion 1.8
        assert_eq!(signal.value, Some(1.8));
        assert_eq!(signal.computed_from, 10);
    }
}
