use serde::{Deserialize, Serialize};
use std::fmt;

/// How much data backed a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceTier::High => write!(f, "high"),
            ConfidenceTier::Medium => write!(f, "medium"),
            ConfidenceTier::Low => write!(f, "low"),
        }
    }
}

/// Where the value of a signal came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
    /// Derived from recent events by the prediction heuristic
    Computed,
    /// Fixed value set by an operator
    ManualOverride,
    /// Withheld while maintenance mode is on
    Maintenance,
}

impl fmt::Display for SignalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalSource::Computed => write!(f, "computed"),
            SignalSource::ManualOverride => write!(f, "manual_override"),
            SignalSource::Maintenance => write!(f, "maintenance"),
        }
    }
}

/// Suggested next multiplier with its confidence tier.
///
/// This is a heuristic hint for the dashboard, not a probability.
/// A `None` value means there is not enough data (or the signal is withheld).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub value: Option<f64>,
    pub confidence: ConfidenceTier,
    /// Number of events the value was derived from
    pub computed_from: usize,
    pub source: SignalSource,
}

impl Signal {
    /// Signal produced by the prediction heuristic
    pub fn computed(value: Option<f64>, confidence: ConfidenceTier, computed_from: usize) -> Self {
        Self {
            value,
            confidence,
            computed_from,
            source: SignalSource::Computed,
        }
    }

    /// Operator-supplied value that supersedes the computed one
    pub fn manual(value: f64) -> Self {
        Self {
            value: Some(value),
            confidence: ConfidenceTier::High,
            computed_from: 0,
            source: SignalSource::ManualOverride,
        }
    }

    /// Empty signal emitted while maintenance mode is active
    pub fn withheld() -> Self {
        Self {
            value: None,
            confidence: ConfidenceTier::Low,
            computed_from: 0,
            source: SignalSource::Maintenance,
        }
    }

    /// True when there was not enough data to suggest a value
    pub fn is_insufficient(&self) -> bool {
        self.value.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_constructors() {
        let computed = Signal::computed(Some(2.4), ConfidenceTier::Medium, 6);
        assert_eq!(computed.source, SignalSource::Computed);
        assert_eq!(computed.computed_from, 6);

        let manual = Signal::manual(3.0);
        assert_eq!(manual.value, Some(3.0));
        assert_eq!(manual.confidence, ConfidenceTier::High);

        let withheld = Signal::withheld();
        assert!(withheld.is_insufficient());
        assert_eq!(withheld.source, SignalSource::Maintenance);
    }

    #[test]
    fn test_serialized_shape() {
        let signal = Signal::computed(None, ConfidenceTier::Low, 0);
        let json = serde_json::to_value(&signal).unwrap();
        assert_eq!(json["value"], serde_json::Value::Null);
        assert_eq!(json["confidence"], "low");
        assert_eq!(json["source"], "computed");
    }
}
