//! Gate counters.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counters for every way a verification can end.
///
/// Observation only; nothing in the gate branches on these.
#[derive(Debug, Default)]
pub struct GateStats {
    audits: AtomicU64,
    skipped: AtomicU64,
    issued: AtomicU64,
    admitted: AtomicU64,
    removed: AtomicU64,
    transport_errors: AtomicU64,
    timeouts: AtomicU64,
    decode_failures: AtomicU64,
    unknown_sessions: AtomicU64,
}

/// Point-in-time copy of [`GateStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GateStatsSnapshot {
    pub audits: u64,
    pub skipped: u64,
    pub issued: u64,
    pub admitted: u64,
    pub removed: u64,
    pub transport_errors: u64,
    pub timeouts: u64,
    pub decode_failures: u64,
    pub unknown_sessions: u64,
}

impl GateStatsSnapshot {
    /// Sessions that ended without a verdict.
    pub fn no_verdict(&self) -> u64 {
        self.transport_errors + self.timeouts + self.decode_failures
    }
}

impl GateStats {
    pub(crate) fn record_audit(&self) {
        self.audits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_issued(&self) {
        self.issued.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_admitted(&self) {
        self.admitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_removed(&self) {
        self.removed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_transport_error(&self) {
        self.transport_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_decode_failure(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unknown_session(&self) {
        self.unknown_sessions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> GateStatsSnapshot {
        GateStatsSnapshot {
            audits: self.audits.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            issued: self.issued.load(Ordering::Relaxed),
            admitted: self.admitted.load(Ordering::Relaxed),
            removed: self.removed.load(Ordering::Relaxed),
            transport_errors: self.transport_errors.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            unknown_sessions: self.unknown_sessions.load(Ordering::Relaxed),
        }
    }
}
