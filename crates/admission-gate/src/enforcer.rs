//! Admission enforcer: turns a verdict into a host action.

use crate::ports::{PlayerDirectory, PlayerRemover};
use crate::types::{KickReason, PlayerId, Verdict};
use std::sync::Arc;
use tracing::info;

/// Applies verdicts.
///
/// `Whitelisted` is a no-op apart from the log line. `NotWhitelisted` removes
/// the player with [`KickReason::Administrative`] and no grace period.
#[derive(Clone)]
pub struct AdmissionEnforcer {
    directory: Arc<dyn PlayerDirectory>,
    remover: Arc<dyn PlayerRemover>,
}

impl AdmissionEnforcer {
    pub fn new(directory: Arc<dyn PlayerDirectory>, remover: Arc<dyn PlayerRemover>) -> Self {
        Self { directory, remover }
    }

    pub fn apply(&self, player_id: PlayerId, verdict: Verdict) {
        let name = self.directory.name_of(player_id).unwrap_or_default();

        match verdict {
            Verdict::Whitelisted => {
                info!(%player_id, name = %name, "ACCEPT");
            }
            Verdict::NotWhitelisted => {
                info!(%player_id, name = %name, "DENY");
                // The host treats removal of a departed player as a no-op.
                self.remover
                    .remove_player(player_id, KickReason::Administrative);
            }
        }
    }
}

impl std::fmt::Debug for AdmissionEnforcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionEnforcer").finish_non_exhaustive()
    }
}
