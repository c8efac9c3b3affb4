//! Gate controller: audit events in, verdicts out.
//!
//! Per player the flow is `Unaudited → Auditing → {Admitted | Removed}`.
//! The controller does not store that state; it is carried by the session
//! issued on audit and ended by [`GateController::complete`], which is the
//! single transition every transport callback funnels into.

use crate::client::RemoteVerifierClient;
use crate::enforcer::AdmissionEnforcer;
use crate::error::{GateError, GateResult};
use crate::ports::{HttpTransport, PlayerDirectory, PlayerRemover, RestCallback};
use crate::registry::SessionRegistry;
use crate::stats::{GateStats, GateStatsSnapshot};
use crate::types::{decode_verdict, DecodedVerdict, PlayerId, PlayerIdentity, SessionId, Verdict};
use chrono::Utc;
use gate_config_and_utils::VerifierConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Poll cadence for [`GateController::wait_idle`].
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Result of handling one audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    /// A lookup was dispatched under this session.
    Issued(SessionId),
    /// No lookup was made; the player stays admitted.
    Skipped(SkipReason),
}

/// Why an audit did not issue a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No usable base URL was configured at startup.
    VerificationDisabled,
    /// The player's identity was blank after normalization.
    EmptyIdentity,
}

/// Terminal result of one transport request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome<'a> {
    Success { body: &'a str },
    Error { code: u16 },
    Timeout,
}

impl SessionOutcome<'_> {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionOutcome::Success { .. } => "success",
            SessionOutcome::Error { .. } => "error",
            SessionOutcome::Timeout => "timeout",
        }
    }

    /// Map a transport result to a verdict, or to the reason there is none.
    fn into_verdict(self) -> GateResult<DecodedVerdict> {
        match self {
            SessionOutcome::Success { body } => decode_verdict(body),
            SessionOutcome::Error { code } => Err(GateError::Transport { code }),
            SessionOutcome::Timeout => Err(GateError::Timeout),
        }
    }
}

struct GateInner {
    /// `None` when verification is disabled.
    client: Option<RemoteVerifierClient>,
    registry: SessionRegistry,
    enforcer: AdmissionEnforcer,
    directory: Arc<dyn PlayerDirectory>,
    stats: GateStats,
}

impl GateInner {
    fn complete(&self, session_id: SessionId, outcome: SessionOutcome<'_>) -> GateResult<Verdict> {
        let session = match self.registry.resolve(session_id) {
            Ok(session) => session,
            Err(err) => {
                self.stats.record_unknown_session();
                warn!(
                    session_id = %session_id,
                    outcome = outcome.as_str(),
                    "Callback for unknown session ignored"
                );
                return Err(err);
            }
        };

        let player_id = session.player_id;
        let elapsed_ms = (Utc::now() - session.issued_at).num_milliseconds();

        match outcome.into_verdict() {
            Ok(decoded) => {
                debug!(
                    %player_id,
                    session_id = %session_id,
                    verdict = decoded.verdict.as_str(),
                    steam_id = decoded.steam_id.as_deref().unwrap_or(""),
                    elapsed_ms,
                    "Whitelist verdict received"
                );
                self.enforcer.apply(player_id, decoded.verdict);
                match decoded.verdict {
                    Verdict::Whitelisted => self.stats.record_admitted(),
                    Verdict::NotWhitelisted => self.stats.record_removed(),
                }
                Ok(decoded.verdict)
            }
            Err(err) => {
                match &err {
                    GateError::Transport { code } => {
                        self.stats.record_transport_error();
                        warn!(
                            %player_id,
                            session_id = %session_id,
                            code,
                            elapsed_ms,
                            "HTTP error, player kept"
                        );
                    }
                    GateError::Timeout => {
                        self.stats.record_timeout();
                        warn!(
                            %player_id,
                            session_id = %session_id,
                            elapsed_ms,
                            "HTTP timeout, player kept"
                        );
                    }
                    GateError::Decode(e) => {
                        self.stats.record_decode_failure();
                        warn!(
                            %player_id,
                            session_id = %session_id,
                            error = %e,
                            "DecodeFailure: malformed whitelist response, player kept"
                        );
                    }
                    GateError::ConfigMissing | GateError::UnknownSession(_) => {}
                }
                Err(err)
            }
        }
    }
}

/// Callback handed to the transport for one session.
///
/// Carries its own session and player ids, so the answer lands on the right
/// session even if the player has left or been audited again since.
struct SessionCallback {
    session_id: SessionId,
    player_id: PlayerId,
    gate: Arc<GateInner>,
}

impl SessionCallback {
    fn finish(&self, outcome: SessionOutcome<'_>) {
        // complete() logs every failure path itself.
        let _ = self.gate.complete(self.session_id, outcome);
    }
}

impl RestCallback for SessionCallback {
    fn on_success(&self, body: &str, size: usize) {
        debug!(
            player_id = %self.player_id,
            session_id = %self.session_id,
            size,
            "Whitelist response"
        );
        self.finish(SessionOutcome::Success { body });
    }

    fn on_error(&self, code: u16) {
        self.finish(SessionOutcome::Error { code });
    }

    fn on_timeout(&self) {
        self.finish(SessionOutcome::Timeout);
    }
}

/// Entry point of the gate. Owns the verifier client and the session registry.
///
/// Cheap to clone; clones share the same registry and counters.
#[derive(Clone)]
pub struct GateController {
    inner: Arc<GateInner>,
}

impl GateController {
    /// Create the controller.
    ///
    /// The base URL is taken from `config` once, here, and never reloaded.
    /// Without one the gate runs in skip mode and never touches `transport`.
    pub fn new(
        config: &VerifierConfig,
        transport: Arc<dyn HttpTransport>,
        directory: Arc<dyn PlayerDirectory>,
        remover: Arc<dyn PlayerRemover>,
    ) -> Self {
        let client = match config.base_url() {
            Some(base_url) => {
                info!(base_url, "Whitelist verification enabled");
                Some(RemoteVerifierClient::new(base_url, transport))
            }
            None => {
                warn!(
                    error = %GateError::ConfigMissing,
                    "Whitelist verification disabled, all players admitted"
                );
                None
            }
        };

        Self {
            inner: Arc::new(GateInner {
                client,
                registry: SessionRegistry::new(),
                enforcer: AdmissionEnforcer::new(directory.clone(), remover),
                directory,
                stats: GateStats::default(),
            }),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.client.is_some()
    }

    /// Handle the host's audit-success event for `player_id`.
    ///
    /// Never blocks: the lookup is dispatched and the verdict is applied
    /// later from the transport callback.
    pub fn on_audit_success(&self, player_id: PlayerId) -> AuditOutcome {
        let inner = &self.inner;
        inner.stats.record_audit();
        debug!(%player_id, "Audit succeeded");

        let Some(client) = &inner.client else {
            inner.stats.record_skipped();
            info!(%player_id, "SKIP: empty base url");
            return AuditOutcome::Skipped(SkipReason::VerificationDisabled);
        };

        let identity = PlayerIdentity::new(player_id, inner.directory.identity_of(player_id));
        debug!(%player_id, raw = %identity.raw, "Resolved identity");

        if identity.normalized.is_empty() {
            inner.stats.record_skipped();
            warn!(%player_id, "SKIP: blank identity, not querying whitelist");
            return AuditOutcome::Skipped(SkipReason::EmptyIdentity);
        }

        let session_id = inner.registry.issue(player_id, identity.normalized.as_str());
        let callback = Arc::new(SessionCallback {
            session_id,
            player_id,
            gate: Arc::clone(inner),
        });
        inner.stats.record_issued();
        client.verify(&identity.normalized, callback);

        AuditOutcome::Issued(session_id)
    }

    /// Resolve `session_id` with a transport outcome and act on it.
    ///
    /// Returns the applied verdict, or the reason no verdict was applied.
    /// Only `Ok(Verdict::NotWhitelisted)` ever removes a player.
    pub fn complete(
        &self,
        session_id: SessionId,
        outcome: SessionOutcome<'_>,
    ) -> GateResult<Verdict> {
        self.inner.complete(session_id, outcome)
    }

    /// Lookup URL the gate would use for a raw identity, if enabled.
    pub fn url_for(&self, raw_identity: &str) -> Option<String> {
        let normalized = crate::types::normalize_identity(raw_identity);
        self.inner
            .client
            .as_ref()
            .map(|client| client.url_for(&normalized))
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.inner.registry
    }

    pub fn in_flight(&self) -> usize {
        self.inner.registry.in_flight()
    }

    pub fn stats(&self) -> GateStatsSnapshot {
        self.inner.stats.snapshot()
    }

    /// Subscribe to a stream of audit events.
    ///
    /// Each received player id is handled as by [`on_audit_success`](Self::on_audit_success).
    /// The task ends when every sender is dropped.
    pub fn attach(&self, mut receiver: mpsc::Receiver<PlayerId>) -> JoinHandle<()> {
        let gate = self.clone();
        tokio::spawn(async move {
            while let Some(player_id) = receiver.recv().await {
                gate.on_audit_success(player_id);
            }
            debug!("Audit event channel closed");
        })
    }

    /// Wait until no session is in flight, up to `timeout`.
    ///
    /// Returns `false` if sessions were still pending when time ran out.
    pub async fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.inner.registry.is_empty() {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(IDLE_POLL_INTERVAL).await;
        }
    }
}

impl std::fmt::Debug for GateController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateController")
            .field("enabled", &self.is_enabled())
            .field("in_flight", &self.in_flight())
            .finish_non_exhaustive()
    }
}
