//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - Memory: volatile event store
//! - JSON file: durable event store
//! - Producer: line-oriented multiplier source (stdin)
//! - CLI: Command-line interface handlers

pub mod memory;
pub mod json_file;
pub mod producer;
pub mod cli;

pub use memory::InMemoryEventStore;
pub use json_file::JsonFileEventStore;
pub use producer::{parse_multiplier, spawn_line_producer};
pub use cli::CliApp;
