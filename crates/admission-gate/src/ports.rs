//! Collaborator traits the gate consumes.
//!
//! The host side supplies player data and the removal action. The HTTP side
//! supplies the non-blocking GET. The gate only calls in, it never polls.

use crate::types::{KickReason, PlayerId};
use std::sync::Arc;

/// Receiver of the single terminal result of one GET.
///
/// A transport must call exactly one of these methods per request. The gate
/// tolerates a second call (it finds no session and ignores it) but does not
/// rely on that.
pub trait RestCallback: Send + Sync {
    /// A response with a 2xx status arrived.
    fn on_success(&self, body: &str, size: usize);

    /// The request failed. `code` is the HTTP status, or
    /// [`TRANSPORT_ERROR_NO_STATUS`](crate::TRANSPORT_ERROR_NO_STATUS) when no
    /// response was received.
    fn on_error(&self, code: u16);

    /// The transport's time budget elapsed.
    fn on_timeout(&self);
}

/// Non-blocking HTTP GET.
pub trait HttpTransport: Send + Sync {
    /// Start a GET for `url` and return immediately. The result is
    /// delivered later through `callback`.
    fn get(&self, url: &str, callback: Arc<dyn RestCallback>);
}

/// Host lookup of player identity.
pub trait PlayerDirectory: Send + Sync {
    /// Raw identity string of the player (may carry whitespace or mixed case).
    fn identity_of(&self, player_id: PlayerId) -> String;

    /// Display name, used only for log lines.
    fn name_of(&self, _player_id: PlayerId) -> Option<String> {
        None
    }
}

/// Host action that removes a player from the session.
///
/// Removing a player who has already left must be a harmless no-op.
pub trait PlayerRemover: Send + Sync {
    fn remove_player(&self, player_id: PlayerId, reason: KickReason);
}
