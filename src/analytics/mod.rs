//! Analytics Layer - Rolling statistics, next-round signal and pattern alerts
//!
//! Read-only consumers of the event window:
//! - `StatisticsEngine`: moving averages (5/10/20), half-window trend,
//!   coefficient-of-variation volatility, extremes
//! - `Predictor`: momentum/reversion heuristic with confidence tiering
//! - `PatternDetector`: advisory alerts over the last 15 events
//!
//! All engines are pure functions of their input window and never fail.

pub mod params;
pub mod window;
pub mod statistics;
pub mod prediction;
pub mod patterns;

pub use params::{AnalyticsConfig, StatisticsConfig, PredictionConfig, PatternConfig, ParamsError};
pub use statistics::{
    compute_statistics, Statistics, StatisticsEngine, MovingAverages, Trend, TrendDirection,
    Volatility, VolatilityLevel, Extremes,
};
pub use prediction::{predict, Predictor};
pub use patterns::{detect, PatternDetector};
