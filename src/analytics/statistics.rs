//! Statistics Engine
//!
//! Moving averages, trend, volatility and extremes over the recent window.
//! Every function here is total: an empty or short window yields a zeroed
//! result with `None` for the fields that need more data.
//!
//! Trend compares the mean of the two window halves (`mid = n / 2`).
//! Volatility is the coefficient of variation: population std / mean * 100.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::params::StatisticsConfig;
use super::window::{half_means, mean, min_max, percent_change, population_std_dev, round2, tail};
use crate::domain::event::{values, Event};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    #[serde(rename = "alta")]
    Rising,
    #[serde(rename = "baixa")]
    Falling,
    #[serde(rename = "estável")]
    Stable,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Rising => write!(f, "alta"),
            TrendDirection::Falling => write!(f, "baixa"),
            TrendDirection::Stable => write!(f, "estável"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolatilityLevel {
    #[serde(rename = "baixa")]
    Low,
    #[serde(rename = "média")]
    Medium,
    #[serde(rename = "alta")]
    High,
}

impl fmt::Display for VolatilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolatilityLevel::Low => write!(f, "baixa"),
            VolatilityLevel::Medium => write!(f, "média"),
            VolatilityLevel::High => write!(f, "alta"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovingAverages {
    pub short: Option<f64>,
    pub medium: Option<f64>,
    pub long: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub direction: TrendDirection,
    /// Percent change from first-half mean to second-half mean
    pub change_pct: f64,
}

impl Trend {
    fn flat() -> Self {
        Self {
            direction: TrendDirection::Stable,
            change_pct: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Volatility {
    pub level: VolatilityLevel,
    /// Coefficient of variation as a percentage
    pub coefficient_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extremes {
    pub max: f64,
    pub min: f64,
    pub amplitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub sample_size: usize,
    pub moving_averages: MovingAverages,
    pub trend: Trend,
    pub volatility: Volatility,
    pub extremes: Option<Extremes>,
}

/// Stateless statistics calculator
#[derive(Debug, Clone, Default)]
pub struct StatisticsEngine {
    config: StatisticsConfig,
}

impl StatisticsEngine {
    pub fn new(config: StatisticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StatisticsConfig {
        &self.config
    }

    /// Compute all statistics for a window of events, oldest-first
    pub fn compute(&self, window: &[Event]) -> Statistics {
        let values = values(window);

        Statistics {
            sample_size: values.len(),
            moving_averages: self.moving_averages(&values),
            trend: self.trend(&values),
            volatility: self.volatility(&values),
            extremes: extremes(&values),
        }
    }

    fn moving_averages(&self, values: &[f64]) -> MovingAverages {
        MovingAverages {
            short: moving_average(values, self.config.moving_average_short),
            medium: moving_average(values, self.config.moving_average_medium),
            long: moving_average(values, self.config.moving_average_long),
        }
    }

    fn trend(&self, values: &[f64]) -> Trend {
        let Some((first, second)) = half_means(values) else {
            return Trend::flat();
        };
        let change = percent_change(first, second);
        let threshold = self.config.trend_threshold_pct;

        let direction = if change > threshold {
            TrendDirection::Rising
        } else if change < -threshold {
            TrendDirection::Falling
        } else {
            TrendDirection::Stable
        };

        Trend {
            direction,
            change_pct: round2(change),
        }
    }

    fn volatility(&self, values: &[f64]) -> Volatility {
        let coefficient = match (mean(values), population_std_dev(values)) {
            (Some(m), Some(sd)) if m != 0.0 => sd / m * 100.0,
            _ => 0.0,
        };

        let level = if coefficient < self.config.volatility_low_pct {
            VolatilityLevel::Low
        } else if coefficient < self.config.volatility_medium_pct {
            VolatilityLevel::Medium
        } else {
            VolatilityLevel::High
        };

        Volatility {
            level,
            coefficient_pct: round2(coefficient),
        }
    }
}

/// Mean of the last `period` values, `None` when fewer are available
pub fn moving_average(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    mean(tail(values, period)).map(round2)
}

fn extremes(values: &[f64]) -> Option<Extremes> {
    let (min, max) = min_max(values)?;
    Some(Extremes {
        max: round2(max),
        min: round2(min),
        amplitude: round2(max - min),
    })
}

/// Statistics with the default thresholds
pub fn compute_statistics(window: &[Event]) -> Statistics {
    StatisticsEngine::default().compute(window)
}
