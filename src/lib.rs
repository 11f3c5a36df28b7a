//! Vela Sentinel - Multiplier feed ingestion and analytics
//!
//! Ingests multiplier events ("velas") from an external game, drops
//! consecutive duplicates, keeps a bounded history and derives rolling
//! statistics, a next-round signal and pattern alerts for a dashboard.
//!
//! # Modules
//!
//! - `domain`: Core types (Event, Signal, PatternAlert, ControlState)
//! - `ports`: Trait abstractions (EventStore)
//! - `analytics`: Statistics, prediction and pattern detection
//! - `adapters`: Store backends, stdin producer, CLI
//! - `config`: Configuration loading and validation
//! - `application`: Ingestion gate, dashboard queries, feed loop

pub mod domain;
pub mod ports;
pub mod analytics;
pub mod adapters;
pub mod config;
pub mod application;
