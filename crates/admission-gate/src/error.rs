//! Error types for whitelist verification.
//!
//! None of these are fatal. Each one resolves to "leave the player alone",
//! and the controller logs it with the player and session it belongs to.

use crate::types::SessionId;
use thiserror::Error;

/// Everything that can stop a verification from producing a verdict.
#[derive(Debug, Error)]
pub enum GateError {
    /// No usable verifier base URL; verification is skipped for the process.
    #[error("Verifier base url is not configured")]
    ConfigMissing,

    /// The remote call failed at the network or HTTP layer.
    ///
    /// `code` is the HTTP status, or 0 when no response was received.
    #[error("Transport error: code {code}")]
    Transport {
        /// HTTP status or 0.
        code: u16,
    },

    /// The transport's time budget elapsed without an answer.
    #[error("Verifier request timed out")]
    Timeout,

    /// A response arrived but did not carry a boolean `whitelisted` field.
    #[error("Decode failure: {0}")]
    Decode(#[from] serde_json::Error),

    /// A callback arrived for a session that is not in the registry.
    #[error("Unknown session: {0}")]
    UnknownSession(SessionId),
}

/// Result type alias using GateError.
pub type GateResult<T> = Result<T, GateError>;
