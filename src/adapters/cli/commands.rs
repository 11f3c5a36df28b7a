//! CLI Command Definitions
//!
//! Argument structures for every vela-sentinel command.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Vela Sentinel - multiplier feed ingestion and analytics
#[derive(Parser, Debug)]
#[command(
    name = "vela-sentinel",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Multiplier feed ingestion and analytics",
    long_about = "Vela Sentinel stores multiplier events from the game feed, drops \
                  consecutive duplicates and derives rolling statistics, a next-round \
                  signal and pattern alerts for the dashboard."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/vela.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read multipliers from stdin (one per line) and poll the dashboard
    Run(RunCmd),

    /// Submit one or more multipliers
    Ingest(IngestCmd),

    /// Show rolling statistics
    Stats(QueryCmd),

    /// Show the next-round signal
    Predict(QueryCmd),

    /// Show active pattern alerts
    Patterns(QueryCmd),

    /// Show statistics, signal and alerts together
    Snapshot(QueryCmd),
}

/// Start the feed loop
#[derive(Parser, Debug)]
pub struct RunCmd {
    /// Override dashboard polling interval in milliseconds
    #[arg(long, value_name = "MS")]
    pub poll_interval_ms: Option<u64>,
}

/// Submit multipliers
#[derive(Parser, Debug)]
pub struct IngestCmd {
    /// Multipliers to submit in order (-1 marks "no signal")
    #[arg(value_name = "VALUE", required = true, allow_negative_numbers = true)]
    pub values: Vec<f64>,
}

/// Read-side query
#[derive(Parser, Debug)]
pub struct QueryCmd {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
