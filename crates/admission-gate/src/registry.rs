//! In-flight verification sessions.
//!
//! Every session in the registry has been issued and has not yet received its
//! terminal callback. Resolving removes it, so the registry only ever holds
//! outstanding requests.

use crate::error::{GateError, GateResult};
use crate::types::{PlayerId, SessionId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// One outstanding whitelist request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationSession {
    pub id: SessionId,
    pub player_id: PlayerId,
    /// Normalized identity the request was issued for.
    pub identity: String,
    pub issued_at: DateTime<Utc>,
}

/// Keyed set of in-flight sessions.
///
/// Callbacks arrive from transport tasks in any order, so all access goes
/// through a mutex. The lock is never held while calling out of the registry.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<SessionId, VerificationSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session for `player_id` and insert it.
    pub fn issue(&self, player_id: PlayerId, identity: impl Into<String>) -> SessionId {
        let session = VerificationSession {
            id: SessionId::new(),
            player_id,
            identity: identity.into(),
            issued_at: Utc::now(),
        };
        let id = session.id;

        let in_flight = {
            let mut sessions = self.lock();
            sessions.insert(id, session);
            sessions.len()
        };

        debug!(session_id = %id, %player_id, in_flight, "Session issued");
        id
    }

    /// Remove and return a session.
    ///
    /// Returns `UnknownSession` if it was already resolved or never existed.
    pub fn resolve(&self, id: SessionId) -> GateResult<VerificationSession> {
        let removed = self.lock().remove(&id);
        removed.ok_or(GateError::UnknownSession(id))
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.lock().contains_key(&id)
    }

    /// Number of in-flight sessions.
    pub fn in_flight(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// In-flight sessions for one player, oldest first.
    pub fn sessions_for(&self, player_id: PlayerId) -> Vec<VerificationSession> {
        let mut sessions: Vec<VerificationSession> = self
            .lock()
            .values()
            .filter(|session| session.player_id == player_id)
            .cloned()
            .collect();
        sessions.sort_by_key(|session| session.issued_at);
        sessions
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, VerificationSession>> {
        // Every critical section is a single map operation, so a poisoned
        // map is still consistent.
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
