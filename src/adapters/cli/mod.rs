//! CLI Adapter
//!
//! Command-line interface for vela-sentinel.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{CliApp, Command, RunCmd, IngestCmd, QueryCmd, OutputFormat};

/// Initialize the CLI application
pub fn init() -> CliApp {
    use clap::Parser;
    CliApp::parse()
}
