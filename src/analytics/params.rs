//! Analytics Parameters
//!
//! Window sizes and thresholds used by the statistics, prediction and pattern
//! engines. The values are empirical; defaults match the production dashboard.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_STATISTICS_WINDOW: usize = 20;
pub const DEFAULT_PREDICTION_WINDOW: usize = 10;
pub const DEFAULT_PATTERN_WINDOW: usize = 15;

pub const DEFAULT_MOVING_AVERAGE_SHORT: usize = 5;
pub const DEFAULT_MOVING_AVERAGE_MEDIUM: usize = 10;
pub const DEFAULT_MOVING_AVERAGE_LONG: usize = 20;

/// Percent change between half-means that counts as a trend
pub const DEFAULT_TREND_THRESHOLD_PCT: f64 = 5.0;
/// Coefficient of variation below which volatility is "baixa"
pub const DEFAULT_VOLATILITY_LOW_PCT: f64 = 30.0;
/// Coefficient of variation below which volatility is "média"
pub const DEFAULT_VOLATILITY_MEDIUM_PCT: f64 = 50.0;

pub const DEFAULT_MOMENTUM_FACTOR: f64 = 1.2;
pub const DEFAULT_REVERSION_FACTOR: f64 = 0.9;
pub const DEFAULT_PREDICTION_FLOOR: f64 = 1.2;
pub const DEFAULT_PREDICTION_CEILING: f64 = 10.0;
/// Value suggested when only 1-2 events exist
pub const DEFAULT_SPARSE_PREDICTION: f64 = 1.5;
pub const DEFAULT_HIGH_CONFIDENCE_EVENTS: usize = 10;
pub const DEFAULT_MEDIUM_CONFIDENCE_EVENTS: usize = 5;

pub const DEFAULT_PATTERN_MIN_EVENTS: usize = 5;
pub const DEFAULT_PATTERN_RECENT_EVENTS: usize = 5;
pub const DEFAULT_LOW_MULTIPLIER: f64 = 2.0;
pub const DEFAULT_LOW_RUN_COUNT: usize = 3;
pub const DEFAULT_AMPLITUDE_THRESHOLD: f64 = 3.0;
pub const DEFAULT_STRONG_TREND_EVENTS: usize = 10;
pub const DEFAULT_STRONG_TREND_PCT: f64 = 15.0;
pub const DEFAULT_OPPORTUNITY_LOW_COUNT: usize = 2;
pub const DEFAULT_OPPORTUNITY_CEILING: f64 = 2.5;

/// Statistics engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsConfig {
    /// Events pulled from the store for a statistics query
    pub window: usize,
    pub moving_average_short: usize,
    pub moving_average_medium: usize,
    pub moving_average_long: usize,
    pub trend_threshold_pct: f64,
    pub volatility_low_pct: f64,
    pub volatility_medium_pct: f64,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_STATISTICS_WINDOW,
            moving_average_short: DEFAULT_MOVING_AVERAGE_SHORT,
            moving_average_medium: DEFAULT_MOVING_AVERAGE_MEDIUM,
            moving_average_long: DEFAULT_MOVING_AVERAGE_LONG,
            trend_threshold_pct: DEFAULT_TREND_THRESHOLD_PCT,
            volatility_low_pct: DEFAULT_VOLATILITY_LOW_PCT,
            volatility_medium_pct: DEFAULT_VOLATILITY_MEDIUM_PCT,
        }
    }
}

impl StatisticsConfig {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.window == 0 {
            return Err(ParamsError::ZeroWindow("statistics.window"));
        }
        for (name, size) in [
            ("statistics.moving_average_short", self.moving_average_short),
            ("statistics.moving_average_medium", self.moving_average_medium),
            ("statistics.moving_average_long", self.moving_average_long),
        ] {
            if size == 0 {
                return Err(ParamsError::ZeroWindow(name));
            }
        }
        if self.trend_threshold_pct < 0.0 {
            return Err(ParamsError::NegativeThreshold("statistics.trend_threshold_pct", self.trend_threshold_pct));
        }
        if self.volatility_low_pct < 0.0 || self.volatility_low_pct > self.volatility_medium_pct {
            return Err(ParamsError::Inverted(
                "statistics.volatility_low_pct",
                self.volatility_low_pct,
                "statistics.volatility_medium_pct",
                self.volatility_medium_pct,
            ));
        }
        Ok(())
    }
}

/// Prediction heuristic configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    pub window: usize,
    pub momentum_factor: f64,
    pub reversion_factor: f64,
    pub floor: f64,
    pub ceiling: f64,
    pub sparse_value: f64,
    pub high_confidence_events: usize,
    pub medium_confidence_events: usize,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_PREDICTION_WINDOW,
            momentum_factor: DEFAULT_MOMENTUM_FACTOR,
            reversion_factor: DEFAULT_REVERSION_FACTOR,
            floor: DEFAULT_PREDICTION_FLOOR,
            ceiling: DEFAULT_PREDICTION_CEILING,
            sparse_value: DEFAULT_SPARSE_PREDICTION,
            high_confidence_events: DEFAULT_HIGH_CONFIDENCE_EVENTS,
            medium_confidence_events: DEFAULT_MEDIUM_CONFIDENCE_EVENTS,
        }
    }
}

impl PredictionConfig {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.window == 0 {
            return Err(ParamsError::ZeroWindow("prediction.window"));
        }
        if self.floor > self.ceiling {
            return Err(ParamsError::Inverted("prediction.floor", self.floor, "prediction.ceiling", self.ceiling));
        }
        if self.momentum_factor <= 0.0 {
            return Err(ParamsError::NegativeThreshold("prediction.momentum_factor", self.momentum_factor));
        }
        if self.reversion_factor <= 0.0 {
            return Err(ParamsError::NegativeThreshold("prediction.reversion_factor", self.reversion_factor));
        }
        if self.medium_confidence_events > self.high_confidence_events {
            return Err(ParamsError::Inverted(
                "prediction.medium_confidence_events",
                self.medium_confidence_events as f64,
                "prediction.high_confidence_events",
                self.high_confidence_events as f64,
            ));
        }
        Ok(())
    }
}

/// Pattern detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    pub window: usize,
    /// Minimum events before any pattern is evaluated
    pub min_events: usize,
    /// Trailing slice used for the low count and the amplitude check
    pub recent_events: usize,
    pub low_multiplier: f64,
    pub low_run_count: usize,
    pub amplitude_threshold: f64,
    /// Exact slice length required for the strong-trend check
    pub strong_trend_events: usize,
    pub strong_trend_pct: f64,
    pub opportunity_low_count: usize,
    pub opportunity_ceiling: f64,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_PATTERN_WINDOW,
            min_events: DEFAULT_PATTERN_MIN_EVENTS,
            recent_events: DEFAULT_PATTERN_RECENT_EVENTS,
            low_multiplier: DEFAULT_LOW_MULTIPLIER,
            low_run_count: DEFAULT_LOW_RUN_COUNT,
            amplitude_threshold: DEFAULT_AMPLITUDE_THRESHOLD,
            strong_trend_events: DEFAULT_STRONG_TREND_EVENTS,
            strong_trend_pct: DEFAULT_STRONG_TREND_PCT,
            opportunity_low_count: DEFAULT_OPPORTUNITY_LOW_COUNT,
            opportunity_ceiling: DEFAULT_OPPORTUNITY_CEILING,
        }
    }
}

impl PatternConfig {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.window == 0 {
            return Err(ParamsError::ZeroWindow("patterns.window"));
        }
        if self.min_events == 0 {
            return Err(ParamsError::ZeroWindow("patterns.min_events"));
        }
        if self.recent_events == 0 {
            return Err(ParamsError::ZeroWindow("patterns.recent_events"));
        }
        if self.strong_trend_events < 2 {
            return Err(ParamsError::ZeroWindow("patterns.strong_trend_events"));
        }
        if self.amplitude_threshold < 0.0 {
            return Err(ParamsError::NegativeThreshold("patterns.amplitude_threshold", self.amplitude_threshold));
        }
        if self.strong_trend_pct < 0.0 {
            return Err(ParamsError::NegativeThreshold("patterns.strong_trend_pct", self.strong_trend_pct));
        }
        Ok(())
    }
}

/// All analytics parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub statistics: StatisticsConfig,
    pub prediction: PredictionConfig,
    pub patterns: PatternConfig,
}

impl AnalyticsConfig {
    pub fn validate(&self) -> Result<(), ParamsError> {
        self.statistics.validate()?;
        self.prediction.validate()?;
        self.patterns.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamsError {
    #[error("{0} must be greater than zero")]
    ZeroWindow(&'static str),

    #[error("{0} must not be negative, got {1}")]
    NegativeThreshold(&'static str, f64),

    #[error("{0} ({1}) must not exceed {2} ({3})")]
    Inverted(&'static str, f64, &'static str, f64),
}
