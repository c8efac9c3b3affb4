//! Shared harness for gate integration tests.
//!
//! - `ManualTransport`: records every GET and keeps its callback so a test can
//!   deliver results in any order
//! - `StaticDirectory`: fixed identities and names per player
//! - `RecordingRemover`: remembers every removal, ignoring disconnected players

#![allow(dead_code)]

use admission_gate::{
    GateController, HttpTransport, KickReason, PlayerDirectory, PlayerId, PlayerRemover,
    RestCallback,
};
use gate_config_and_utils::VerifierConfig;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub const BASE_URL: &str = "http://wl.example/api";

/// One request seen by the transport.
#[derive(Clone)]
pub struct PendingRequest {
    pub url: String,
    pub callback: Arc<dyn RestCallback>,
}

impl PendingRequest {
    pub fn succeed(&self, body: &str) {
        self.callback.on_success(body, body.len());
    }

    pub fn fail(&self, code: u16) {
        self.callback.on_error(code);
    }

    pub fn time_out(&self) {
        self.callback.on_timeout();
    }
}

/// Transport that never sends anything on its own.
#[derive(Default)]
pub struct ManualTransport {
    requests: Mutex<Vec<PendingRequest>>,
}

impl ManualTransport {
    pub fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|request| request.url.clone())
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The n-th request issued (0-based).
    pub fn request(&self, index: usize) -> PendingRequest {
        self.requests.lock().unwrap()[index].clone()
    }
}

impl HttpTransport for ManualTransport {
    fn get(&self, url: &str, callback: Arc<dyn RestCallback>) {
        self.requests.lock().unwrap().push(PendingRequest {
            url: url.to_string(),
            callback,
        });
    }
}

#[derive(Default)]
pub struct StaticDirectory {
    identities: Mutex<HashMap<PlayerId, String>>,
    names: Mutex<HashMap<PlayerId, String>>,
}

impl StaticDirectory {
    pub fn add(&self, player_id: i32, identity: &str, name: &str) {
        let player_id = PlayerId(player_id);
        self.identities
            .lock()
            .unwrap()
            .insert(player_id, identity.to_string());
        self.names.lock().unwrap().insert(player_id, name.to_string());
    }
}

impl PlayerDirectory for StaticDirectory {
    fn identity_of(&self, player_id: PlayerId) -> String {
        self.identities
            .lock()
            .unwrap()
            .get(&player_id)
            .cloned()
            .unwrap_or_default()
    }

    fn name_of(&self, player_id: PlayerId) -> Option<String> {
        self.names.lock().unwrap().get(&player_id).cloned()
    }
}

#[derive(Default)]
pub struct RecordingRemover {
    removed: Mutex<Vec<(PlayerId, KickReason)>>,
    disconnected: Mutex<HashSet<PlayerId>>,
}

impl RecordingRemover {
    pub fn removed(&self) -> Vec<(PlayerId, KickReason)> {
        self.removed.lock().unwrap().clone()
    }

    pub fn removed_players(&self) -> Vec<PlayerId> {
        self.removed().into_iter().map(|(player, _)| player).collect()
    }

    pub fn disconnect(&self, player_id: i32) {
        self.disconnected.lock().unwrap().insert(PlayerId(player_id));
    }
}

impl PlayerRemover for RecordingRemover {
    fn remove_player(&self, player_id: PlayerId, reason: KickReason) {
        if self.disconnected.lock().unwrap().contains(&player_id) {
            return;
        }
        self.removed.lock().unwrap().push((player_id, reason));
    }
}

/// A gate wired to manual collaborators.
pub struct TestGate {
    pub gate: GateController,
    pub transport: Arc<ManualTransport>,
    pub directory: Arc<StaticDirectory>,
    pub remover: Arc<RecordingRemover>,
}

impl TestGate {
    pub fn new(config: VerifierConfig) -> Self {
        let transport = Arc::new(ManualTransport::default());
        let directory = Arc::new(StaticDirectory::default());
        let remover = Arc::new(RecordingRemover::default());
        let gate = GateController::new(
            &config,
            transport.clone(),
            directory.clone(),
            remover.clone(),
        );
        Self {
            gate,
            transport,
            directory,
            remover,
        }
    }

    pub fn enabled() -> Self {
        Self::new(VerifierConfig::with_url(BASE_URL))
    }
}
