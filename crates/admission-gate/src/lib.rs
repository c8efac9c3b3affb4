//! Admission gate: whitelist verification for audited players.
//!
//! When the host confirms a player's identity, the gate asks a remote
//! whitelist service about that identity and, if the answer is an explicit
//! "not whitelisted", removes the player.
//!
//! # Architecture
//!
//! ```text
//! host audit event → GateController → RemoteVerifierClient → HttpTransport
//!                         │                                       │
//!                  SessionRegistry ◄──── RestCallback ◄───────────┘
//!                         │
//!                  AdmissionEnforcer → PlayerRemover
//! ```
//!
//! # Design Principles
//!
//! - **Non-blocking**: an audit returns as soon as the request is dispatched
//! - **Exactly-once**: a session is resolved by one callback; late or duplicate
//!   callbacks find nothing in the registry and are ignored
//! - **Fail-open**: only a decoded `NotWhitelisted` verdict removes a player

mod client;
mod controller;
mod enforcer;
mod error;
pub mod ports;
mod registry;
mod stats;
mod types;

pub use client::RemoteVerifierClient;
pub use controller::{AuditOutcome, GateController, SessionOutcome, SkipReason};
pub use enforcer::AdmissionEnforcer;
pub use error::{GateError, GateResult};
pub use ports::{HttpTransport, PlayerDirectory, PlayerRemover, RestCallback};
pub use registry::{SessionRegistry, VerificationSession};
pub use stats::{GateStats, GateStatsSnapshot};
pub use types::{
    decode_verdict, normalize_identity, DecodedVerdict, KickReason, PlayerId, PlayerIdentity,
    SessionId, Verdict, TRANSPORT_ERROR_NO_STATUS,
};
