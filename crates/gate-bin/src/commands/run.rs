//! `run`: drive the gate from host events on stdin.

use crate::events::parse_event;
use crate::host::{HostDirectory, StdoutRemover};
use admission_gate::{GateController, PlayerId};
use gate_config_and_utils::VerifierConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use whitelist_http_transport::ReqwestTransport;

/// Default time to wait for in-flight lookups once input ends.
pub const DEFAULT_DRAIN_TIMEOUT_SECS: u64 = 15;

const AUDIT_CHANNEL_CAPACITY: usize = 256;

/// Counts of what a host stream contained.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FeedSummary {
    pub connects: u64,
    pub disconnects: u64,
    pub malformed: u64,
}

/// Run the gate until stdin closes, then drain.
pub async fn run(
    config: VerifierConfig,
    drain_timeout_secs: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let directory = Arc::new(HostDirectory::new());
    let remover = Arc::new(StdoutRemover::new(directory.clone(), std::io::stdout()));
    let transport = Arc::new(ReqwestTransport::new(
        config.request_timeout(),
        tokio::runtime::Handle::current(),
    )?);
    let gate = GateController::new(&config, transport, directory.clone(), remover);

    info!(
        enabled = gate.is_enabled(),
        base_url = config.base_url().unwrap_or(""),
        "Whitelist gate started"
    );

    let (sender, receiver) = mpsc::channel(AUDIT_CHANNEL_CAPACITY);
    let worker = gate.attach(receiver);

    let summary = feed(BufReader::new(tokio::io::stdin()), &directory, &sender).await?;
    drop(sender);
    worker.await?;

    info!(
        connects = summary.connects,
        disconnects = summary.disconnects,
        malformed = summary.malformed,
        "Input closed, draining"
    );

    if !gate.wait_idle(Duration::from_secs(drain_timeout_secs)).await {
        warn!(
            in_flight = gate.in_flight(),
            "Drain timed out with lookups still in flight"
        );
    }

    let stats = gate.stats();
    info!(
        stats = %serde_json::to_string(&stats)?,
        no_verdict = stats.no_verdict(),
        "Whitelist gate stopped"
    );

    Ok(())
}

/// Apply host events to the directory and forward connects as audits.
///
/// Malformed lines are logged and skipped. Returns when the reader ends or
/// the audit channel closes.
pub async fn feed<R>(
    reader: R,
    directory: &HostDirectory,
    audits: &mpsc::Sender<PlayerId>,
) -> std::io::Result<FeedSummary>
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = FeedSummary::default();
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let event = match parse_event(&line) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => {
                summary.malformed += 1;
                warn!(error = %e, line = %line, "Ignoring malformed host event");
                continue;
            }
        };

        if event.disconnected {
            summary.disconnects += 1;
            directory.disconnect(event.player_id);
            continue;
        }

        summary.connects += 1;
        directory.connect(event.player_id, event.identity, event.name);
        if audits.send(event.player_id).await.is_err() {
            warn!("Audit channel closed, stopping input");
            break;
        }
    }

    Ok(summary)
}
