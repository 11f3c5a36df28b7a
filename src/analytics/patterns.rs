//! Pattern Detector
//!
//! Scans the recent window for four heuristic conditions. Checks are
//! independent and may fire together; alerts are emitted in a fixed order:
//! sequence_baixa, alta_volatilidade, tendencia_forte, oportunidade.

use super::params::PatternConfig;
use super::window::{half_means, min_max, percent_change, tail};
use crate::domain::event::{values, Event};
use crate::domain::{AlertSeverity, PatternAlert, PatternKind};

#[derive(Debug, Clone, Default)]
pub struct PatternDetector {
    config: PatternConfig,
}

impl PatternDetector {
    pub fn new(config: PatternConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PatternConfig {
        &self.config
    }

    /// Detect patterns in `events` (oldest-first). Pure and deterministic.
    pub fn detect(&self, events: &[Event]) -> Vec<PatternAlert> {
        let all = values(events);
        let window = tail(&all, self.config.window);
        if window.len() < self.config.min_events {
            return Vec::new();
        }

        let recent = tail(window, self.config.recent_events);
        let low_count = recent
            .iter()
            .filter(|&&v| v < self.config.low_multiplier)
            .count();

        let mut alerts = Vec::with_capacity(4);

        if low_count >= self.config.low_run_count {
            alerts.push(PatternAlert::new(
                PatternKind::SequenceBaixa,
                AlertSeverity::Warning,
                format!(
                    "{} de {} velas abaixo de {:.1}x",
                    low_count,
                    recent.len(),
                    self.config.low_multiplier
                ),
            ));
        }

        if let Some((min, max)) = min_max(recent) {
            let amplitude = max - min;
            if amplitude > self.config.amplitude_threshold {
                alerts.push(PatternAlert::new(
                    PatternKind::AltaVolatilidade,
                    AlertSeverity::Info,
                    format!("Amplitude de {:.2}x nas últimas {} velas", amplitude, recent.len()),
                ));
            }
        }

        if let Some(alert) = self.strong_trend(window) {
            alerts.push(alert);
        }

        if let Some(&latest) = window.last() {
            if low_count >= self.config.opportunity_low_count
                && latest < self.config.opportunity_ceiling
            {
                alerts.push(PatternAlert::new(
                    PatternKind::Oportunidade,
                    AlertSeverity::Success,
                    format!(
                        "Última vela {:.2}x após {} baixas: possível recuperação",
                        latest, low_count
                    ),
                ));
            }
        }

        alerts
    }

    fn strong_trend(&self, window: &[f64]) -> Option<PatternAlert> {
        let slice = tail(window, self.config.strong_trend_events);
        if slice.len() != self.config.strong_trend_events {
            return None;
        }

        let (first, second) = half_means(slice)?;
        let change = percent_change(first, second);
        if change.abs() <= self.config.strong_trend_pct {
            return None;
        }

        let alert = if change > 0.0 {
            PatternAlert::new(
                PatternKind::TendenciaForte,
                AlertSeverity::Success,
                format!("Tendência forte de alta: {:+.1}%", change),
            )
        } else {
            PatternAlert::new(
                PatternKind::TendenciaForte,
                AlertSeverity::Warning,
                format!("Tendência forte de baixa: {:+.1}%", change),
            )
        };
        Some(alert)
    }
}

/// Pattern detection with the default thresholds
pub fn detect(last15: &[Event]) -> Vec<PatternAlert> {
    PatternDetector::default().detect(last15)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventId;
    use chrono::Utc;

    fn window(values: &[f64]) -> Vec<Event> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Event::new(EventId(i as u64 + 1), v, Utc::now()).unwrap())
            .collect()
    }

    fn kinds(alerts: &[PatternAlert]) -> Vec<PatternKind> {
        alerts.iter().map(|a| a.kind).collect()
    }

    #[test]
    fn test_fewer_than_five_events_is_empty() {
        assert!(detect(&[]).is_empty());
        assert!(detect(&window(&[1.0, 1.1, 1.2, 1.3])).is_empty());
    }

    #[test]
    fn test_gate_and_recent_slice_are_independent() {
        let detector = PatternDetector::new(PatternConfig {
            min_events: 4,
            recent_events: 3,
            ..PatternConfig::default()
        });

        // four events pass the gate; the leading 1.1 falls outside the recent slice
        let alerts = detector.detect(&window(&[1.1, 3.0, 1.2, 1.3]));
        assert_eq!(kinds(&alerts), vec![PatternKind::Oportunidade]);
        assert!(alerts[0].message.contains("após 2 baixas"));

        assert!(detector.detect(&window(&[1.1, 1.2, 1.3])).is_empty());
    }

    #[test]
    fn test_low_run_and_opportunity() {
        let alerts = detect(&window(&[1.5, 1.8, 1.2, 1.9, 1.4]));
        assert_eq!(
            kinds(&alerts),
            vec![PatternKind::SequenceBaixa, PatternKind::Oportunidade]
        );
        assert_eq!(alerts[0].severity, AlertSeverity::Warning);
        assert!(alerts[0].message.starts_with("5 de 5"));
        assert_eq!(alerts[1].severity, AlertSeverity::Success);
    }

    #[test]
    fn test_two_lows_only_opportunity() {
        let alerts = detect(&window(&[3.0, 1.5, 4.0, 1.1, 2.2]));
        assert_eq!(kinds(&alerts), vec![PatternKind::Oportunidade]);
    }

    #[test]
    fn test_no_opportunity_when_latest_high() {
        let alerts = detect(&window(&[1.1, 1.2, 1.3, 2.0, 2.6]));
        assert_eq!(kinds(&alerts), vec![PatternKind::SequenceBaixa]);
    }

    #[test]
    fn test_high_amplitude() {
        let alerts = detect(&window(&[2.0, 5.5, 3.0, 2.2, 3.1]));
        assert_eq!(kinds(&alerts), vec![PatternKind::AltaVolatilidade]);
        assert_eq!(alerts[0].severity, AlertSeverity::Info);
        assert!(alerts[0].message.contains("3.50x"));
    }

    #[test]
    fn test_amplitude_exactly_threshold_does_not_fire() {
        let alerts = detect(&window(&[2.0, 5.0, 3.0, 2.2, 3.1]));
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_strong_trend_needs_ten_events() {
        // nine events rising sharply: not evaluated
        let alerts = detect(&window(&[2.0, 2.0, 2.0, 2.0, 4.0, 4.0, 4.0, 4.0, 4.0]));
        assert!(!kinds(&alerts).contains(&PatternKind::TendenciaForte));
    }

    #[test]
    fn test_strong_rising_trend() {
        let alerts = detect(&window(&[2.0, 2.0, 2.0, 2.0, 2.0, 3.0, 3.0, 3.0, 3.0, 3.0]));
        assert_eq!(kinds(&alerts), vec![PatternKind::TendenciaForte]);
        assert_eq!(alerts[0].severity, AlertSeverity::Success);
        assert!(alerts[0].message.contains("+50.0%"));
    }

    #[test]
    fn test_strong_falling_trend() {
        let alerts = detect(&window(&[4.0, 4.0, 4.0, 4.0, 4.0, 3.0, 3.0, 3.0, 3.0, 3.0]));
        assert_eq!(kinds(&alerts), vec![PatternKind::TendenciaForte]);
        assert_eq!(alerts[0].severity, AlertSeverity::Warning);
    }

    #[test]
    fn test_strong_trend_uses_last_ten_of_fifteen() {
        // first five are noise; the last ten are flat
        let mut values = vec![20.0; 5];
        values.extend([3.0; 10]);
        let alerts = detect(&window(&values));
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_all_four_fire_in_order() {
        let alerts = detect(&window(&[
            10.0, 10.0, 10.0, 10.0, 10.0, 1.1, 1.2, 1.3, 5.0, 1.4,
        ]));
        assert_eq!(
            kinds(&alerts),
            vec![
                PatternKind::SequenceBaixa,
                PatternKind::AltaVolatilidade,
                PatternKind::TendenciaForte,
                PatternKind::Oportunidade,
            ]
        );
        assert_eq!(alerts[2].severity, AlertSeverity::Warning);
    }

    #[test]
    fn test_deterministic() {
        let events = window(&[1.5, 7.0, 1.2, 1.9, 1.4, 2.2, 8.8]);
        assert_eq!(detect(&events), detect(&events));
    }
}
