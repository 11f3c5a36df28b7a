//! Line Producer
//!
//! Reads one multiplier per line from any async reader (stdin in production)
//! and forwards parsed values to the feed channel. The producer is untrusted:
//! unparsable lines are logged and skipped, range checks are left to the gate.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Parse a producer line such as `2.35`, `2,35` or `2.35x`
pub fn parse_multiplier(line: &str) -> Option<f64> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = trimmed
        .trim_end_matches(['x', 'X'])
        .trim()
        .replace(',', ".");
    normalized.parse::<f64>().ok()
}

/// Spawn a task that forwards parsed lines until EOF or the receiver drops.
/// Returns the number of lines forwarded.
pub fn spawn_line_producer<R>(reader: R, tx: mpsc::Sender<f64>) -> JoinHandle<usize>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = reader.lines();
        let mut forwarded = 0;

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("Producer read error: {}", e);
                    break;
                }
            };

            let Some(value) = parse_multiplier(&line) else {
                if !line.trim().is_empty() {
                    tracing::warn!("Ignoring unparsable producer line: {:?}", line);
                }
                continue;
            };

            if tx.send(value).await.is_err() {
                tracing::debug!("Feed closed, producer stopping");
                break;
            }
            forwarded += 1;
        }

        forwarded
    })
}
