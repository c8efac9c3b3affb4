//! Host-side collaborators for the stdin/stdout runner.

use admission_gate::{KickReason, PlayerDirectory, PlayerId, PlayerRemover};
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
struct PlayerRecord {
    identity: String,
    name: Option<String>,
    connected: bool,
}

/// Players announced by the host.
#[derive(Debug, Default)]
pub struct HostDirectory {
    players: RwLock<HashMap<PlayerId, PlayerRecord>>,
}

impl HostDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a connected player, replacing any previous record.
    pub fn connect(&self, player_id: PlayerId, identity: String, name: Option<String>) {
        let mut players = self.players.write().unwrap_or_else(|e| e.into_inner());
        players.insert(
            player_id,
            PlayerRecord {
                identity,
                name,
                connected: true,
            },
        );
    }

    /// Mark a player as gone. Its record stays so late verdicts still log a name.
    pub fn disconnect(&self, player_id: PlayerId) {
        let mut players = self.players.write().unwrap_or_else(|e| e.into_inner());
        if let Some(record) = players.get_mut(&player_id) {
            record.connected = false;
        }
    }

    pub fn is_connected(&self, player_id: PlayerId) -> bool {
        let players = self.players.read().unwrap_or_else(|e| e.into_inner());
        players
            .get(&player_id)
            .map(|record| record.connected)
            .unwrap_or(false)
    }
}

impl PlayerDirectory for HostDirectory {
    fn identity_of(&self, player_id: PlayerId) -> String {
        let players = self.players.read().unwrap_or_else(|e| e.into_inner());
        players
            .get(&player_id)
            .map(|record| record.identity.clone())
            .unwrap_or_default()
    }

    fn name_of(&self, player_id: PlayerId) -> Option<String> {
        let players = self.players.read().unwrap_or_else(|e| e.into_inner());
        players.get(&player_id).and_then(|record| record.name.clone())
    }
}

#[derive(Serialize)]
struct KickLine {
    action: &'static str,
    player_id: PlayerId,
    reason: KickReason,
}

/// Writes one JSON kick line per removal for the host to act on.
///
/// Removing a player that already disconnected is a no-op.
pub struct StdoutRemover<W> {
    directory: Arc<HostDirectory>,
    out: Mutex<W>,
}

impl<W: Write + Send> StdoutRemover<W> {
    pub fn new(directory: Arc<HostDirectory>, out: W) -> Self {
        Self {
            directory,
            out: Mutex::new(out),
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl<W: Write + Send> PlayerRemover for StdoutRemover<W> {
    fn remove_player(&self, player_id: PlayerId, reason: KickReason) {
        if !self.directory.is_connected(player_id) {
            debug!(player_id = %player_id, "Player already gone, nothing to remove");
            return;
        }

        let line = KickLine {
            action: "kick",
            player_id,
            reason,
        };
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = write_line(&mut *out, &line) {
            warn!(player_id = %player_id, error = %e, "Failed to write kick line");
        }
    }
}

fn write_line<W: Write>(out: &mut W, line: &KickLine) -> std::io::Result<()> {
    serde_json::to_writer(&mut *out, line)?;
    writeln!(out)?;
    out.flush()
}
