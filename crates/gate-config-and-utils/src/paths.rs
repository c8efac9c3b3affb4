//! File system paths for the gate.

use crate::config::CONFIG_FILE_NAME;
use crate::{CoreError, CoreResult};
use std::path::PathBuf;

/// Directory name under the home directory.
const BASE_DIR_NAME: &str = ".whitelist-gate";
/// Structured log file name under the logs directory.
const LOG_FILE_NAME: &str = "gate.jsonl";

/// Manages file system paths for the gate.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directory for runtime files (~/.whitelist-gate)
    base_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance rooted at `~/.whitelist-gate`.
    pub fn new() -> CoreResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| CoreError::Path("Could not determine home directory".to_string()))?;

        Ok(Self {
            base_dir: home.join(BASE_DIR_NAME),
        })
    }

    /// Create a new Paths instance with a custom base directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.whitelist-gate).
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the verifier config path (~/.whitelist-gate/WhitelistURL.json).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE_NAME)
    }

    /// Get the logs directory (~/.whitelist-gate/logs).
    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Get the structured log file path (~/.whitelist-gate/logs/gate.jsonl).
    pub fn log_file(&self) -> PathBuf {
        self.logs_dir().join(LOG_FILE_NAME)
    }

    /// Ensure all required directories exist.
    pub fn ensure_dirs(&self) -> CoreResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}
