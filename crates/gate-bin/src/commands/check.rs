//! `check`: one-off lookup of a single identity.

use crate::host::{HostDirectory, StdoutRemover};
use admission_gate::{AuditOutcome, GateController, GateStatsSnapshot, PlayerId};
use gate_config_and_utils::VerifierConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use whitelist_http_transport::ReqwestTransport;

const CHECK_PLAYER: PlayerId = PlayerId(0);

/// Extra wait on top of the request timeout before giving up.
const CHECK_GRACE: Duration = Duration::from_secs(1);

/// What a single lookup concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckResult {
    Admitted,
    Removed,
    NoVerdict,
    Skipped,
}

impl CheckResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckResult::Admitted => "admitted",
            CheckResult::Removed => "removed",
            CheckResult::NoVerdict => "no-verdict",
            CheckResult::Skipped => "skipped",
        }
    }

    fn from_stats(stats: &GateStatsSnapshot) -> Self {
        if stats.removed > 0 {
            CheckResult::Removed
        } else if stats.admitted > 0 {
            CheckResult::Admitted
        } else {
            CheckResult::NoVerdict
        }
    }
}

/// Run the lookup and print the result on stdout.
pub async fn check(
    config: VerifierConfig,
    identity: &str,
) -> Result<CheckResult, Box<dyn std::error::Error>> {
    let directory = Arc::new(HostDirectory::new());
    directory.connect(CHECK_PLAYER, identity.to_string(), None);
    let remover = Arc::new(StdoutRemover::new(directory.clone(), std::io::sink()));
    let transport = Arc::new(ReqwestTransport::new(
        config.request_timeout(),
        tokio::runtime::Handle::current(),
    )?);
    let gate = GateController::new(&config, transport, directory, remover);

    let result = match gate.on_audit_success(CHECK_PLAYER) {
        AuditOutcome::Skipped(reason) => {
            warn!(reason = ?reason, "Lookup skipped");
            CheckResult::Skipped
        }
        AuditOutcome::Issued(_) => {
            gate.wait_idle(config.request_timeout() + CHECK_GRACE).await;
            CheckResult::from_stats(&gate.stats())
        }
    };

    println!("{}", result.as_str());
    Ok(result)
}
