//! Vela Sentinel - Multiplier feed ingestion and analytics
//!
//! Binary entry point: loads config, builds the store and runs one command.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing_subscriber::{fmt, EnvFilter};

use vela_sentinel::adapters::cli::{self, Command, IngestCmd, OutputFormat, QueryCmd, RunCmd};
use vela_sentinel::adapters::{spawn_line_producer, InMemoryEventStore, JsonFileEventStore};
use vela_sentinel::application::{Dashboard, FeedOrchestrator, IngestionGate, Submission};
use vela_sentinel::config::{load_config, Config, StoreBackend};
use vela_sentinel::ports::EventStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let app = cli::init();
    let config = load_config(&app.config)
        .with_context(|| format!("Failed to load configuration from {}", app.config.display()))?;
    init_logging(app.verbose, app.debug, &config.logging.level)?;

    let store = build_store(&config)?;
    let gate = Arc::new(IngestionGate::new(Arc::clone(&store)));
    let dashboard = Arc::new(Dashboard::new(
        Arc::clone(&store),
        config.analytics.clone(),
        config.control.clone(),
    ));

    match app.command {
        Command::Run(cmd) => run_command(cmd, &config, gate, dashboard).await,
        Command::Ingest(cmd) => ingest_command(cmd, &gate).await,
        Command::Stats(cmd) => {
            let stats = dashboard.statistics().await?;
            print_output(&cmd, &stats, || {
                let ma = stats.moving_averages;
                let mut out = format!(
                    "Events: {}\nMA5: {}  MA10: {}  MA20: {}\nTrend: {} ({:+.2}%)\nVolatility: {} ({:.2}%)",
                    stats.sample_size,
                    fmt_opt(ma.short),
                    fmt_opt(ma.medium),
                    fmt_opt(ma.long),
                    stats.trend.direction,
                    stats.trend.change_pct,
                    stats.volatility.level,
                    stats.volatility.coefficient_pct,
                );
                if let Some(ext) = stats.extremes {
                    out.push_str(&format!(
                        "\nMax: {:.2}x  Min: {:.2}x  Amplitude: {:.2}",
                        ext.max, ext.min, ext.amplitude
                    ));
                }
                out
            })
        }
        Command::Predict(cmd) => {
            let signal = dashboard.prediction().await?;
            print_output(&cmd, &signal, || {
                format!(
                    "Next: {}  Confidence: {}  From: {} event(s)  Source: {}",
                    signal.value.map_or_else(|| "insufficient data".to_string(), |v| format!("{:.2}x", v)),
                    signal.confidence,
                    signal.computed_from,
                    signal.source
                )
            })
        }
        Command::Patterns(cmd) => {
            let alerts = dashboard.patterns().await?;
            print_output(&cmd, &alerts, || {
                if alerts.is_empty() {
                    return "No patterns detected".to_string();
                }
                alerts
                    .iter()
                    .map(|a| format!("[{:?}] {}: {}", a.severity, a.kind, a.message))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        Command::Snapshot(cmd) => {
            let snapshot = dashboard.snapshot().await?;
            print_output(&cmd, &snapshot, || {
                format!(
                    "Stored: {}  Latest: {}  Trend: {}  Volatility: {}  Next: {}  Alerts: {}",
                    snapshot.stored_events,
                    snapshot
                        .latest
                        .as_ref()
                        .map_or_else(|| "-".to_string(), |e| format!("{:.2}x", e.value)),
                    snapshot.statistics.trend.direction,
                    snapshot.statistics.volatility.level,
                    fmt_opt(snapshot.prediction.value),
                    snapshot.patterns.len()
                )
            })
        }
    }
}

fn init_logging(verbose: bool, debug: bool, config_level: &str) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config_level))
    };

    fmt().with_env_filter(filter).with_target(false).init();
    Ok(())
}

fn build_store(config: &Config) -> Result<Arc<dyn EventStore>> {
    let cap = config.store.retention_cap;
    let store: Arc<dyn EventStore> = match config.store.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory event store - history is lost on exit");
            Arc::new(InMemoryEventStore::new(cap))
        }
        StoreBackend::JsonFile => {
            let path = config
                .store
                .get_path()
                .context("json_file backend requires store.path")?;
            Arc::new(
                JsonFileEventStore::open(&path, cap)
                    .with_context(|| format!("Failed to open event store at {}", path.display()))?,
            )
        }
    };
    Ok(store)
}

async fn run_command(
    cmd: RunCmd,
    config: &Config,
    gate: Arc<IngestionGate>,
    dashboard: Arc<Dashboard>,
) -> Result<()> {
    let poll_ms = cmd.poll_interval_ms.unwrap_or(config.feed.poll_interval_ms).max(1);
    let orchestrator = FeedOrchestrator::new(gate, dashboard)
        .with_poll_interval(Duration::from_millis(poll_ms));

    let (tx, rx) = mpsc::channel(config.feed.channel_capacity);
    let producer = spawn_line_producer(BufReader::new(tokio::io::stdin()), tx);

    // Setup Ctrl+C handler
    let orch = orchestrator.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Shutdown signal received");
        orch.stop().await;
    });

    let summary = orchestrator.run(rx).await;
    producer.abort();

    println!(
        "Accepted: {}  Duplicates: {}  Rejected: {}  Storage failures: {}",
        summary.accepted, summary.duplicates, summary.rejected, summary.storage_failures
    );
    Ok(())
}

async fn ingest_command(cmd: IngestCmd, gate: &IngestionGate) -> Result<()> {
    let outcomes = gate
        .submit_batch(&cmd.values)
        .await
        .context("Event store failure, remaining values were not ingested")?;

    for (value, outcome) in outcomes {
        match outcome {
            Ok(Submission::Accepted(event)) => {
                println!("accepted  {} {:.2}x at {}", event.id, event.value, event.observed_at)
            }
            Ok(Submission::Duplicate(event)) => {
                println!("duplicate {} {:.2}x", event.id, event.value)
            }
            Err(e) => println!("rejected  {}: {}", value, e),
        }
    }
    Ok(())
}

fn print_output<T, F>(cmd: &QueryCmd, value: &T, text: F) -> Result<()>
where
    T: serde::Serialize,
    F: FnOnce() -> String,
{
    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => println!("{}", text()),
    }
    Ok(())
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}
