//! Core types shared across the gate.

use crate::error::GateResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Transport error code used when no HTTP response was received at all.
pub const TRANSPORT_ERROR_NO_STATUS: u16 = 0;

/// Host-assigned player handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub i32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for PlayerId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

/// Identifier of one issued verification request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a fresh session id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trim and lower-case an identity string.
pub fn normalize_identity(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A player's identity as seen at audit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerIdentity {
    pub player_id: PlayerId,
    pub raw: String,
    pub normalized: String,
}

impl PlayerIdentity {
    /// Build an identity, normalizing `raw` once.
    pub fn new(player_id: PlayerId, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let normalized = normalize_identity(&raw);
        Self {
            player_id,
            raw,
            normalized,
        }
    }
}

/// Remote decision about a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Whitelisted,
    NotWhitelisted,
}

impl Verdict {
    pub fn from_flag(whitelisted: bool) -> Self {
        if whitelisted {
            Verdict::Whitelisted
        } else {
            Verdict::NotWhitelisted
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Whitelisted => "whitelisted",
            Verdict::NotWhitelisted => "not_whitelisted",
        }
    }
}

/// Reason code handed to the host when removing a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KickReason {
    /// Removed by server administration (not whitelisted).
    Administrative,
}

impl KickReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            KickReason::Administrative => "administrative",
        }
    }
}

/// Response body of the whitelist endpoint.
#[derive(Debug, Deserialize)]
struct WhitelistResponse {
    whitelisted: bool,
    #[serde(rename = "steamId", default)]
    steam_id: Option<serde_json::Value>,
}

/// A verdict together with the optional linked account the backend reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedVerdict {
    pub verdict: Verdict,
    pub steam_id: Option<String>,
}

/// Decode a whitelist response body.
///
/// The body must be a JSON object with a boolean `whitelisted` field. The
/// optional `steamId` is informational; a non-string value is dropped
/// rather than failing the decode.
pub fn decode_verdict(body: &str) -> GateResult<DecodedVerdict> {
    let response: WhitelistResponse = serde_json::from_str(body)?;
    let steam_id = response
        .steam_id
        .and_then(|value| value.as_str().map(str::to_owned));
    Ok(DecodedVerdict {
        verdict: Verdict::from_flag(response.whitelisted),
        steam_id,
    })
}
