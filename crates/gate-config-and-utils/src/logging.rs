//! Logging initialization for the gate.
//!
//! Logs go to stderr in compact form so a host process can keep stdout for
//! its own protocol. When a log file is given, every event is also appended
//! to it as one JSON object per line, which makes it easy to tail:
//!
//! ```text
//! tail -f ~/.whitelist-gate/logs/gate.jsonl | jq
//! ```

use crate::{CoreError, CoreResult};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the logging system.
///
/// The filter comes from `RUST_LOG` when set, otherwise from `level`.
///
/// # Example
///
/// ```ignore
/// init_logging("info", Some(&paths.log_file()))?;
/// tracing::info!("Gate started");
/// ```
pub fn init_logging(level: &str, log_file: Option<&Path>) -> CoreResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact();

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            // Append mode so several gate processes can share one file
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(fmt::layer().json().with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CoreError::Config(format!("logging already initialized: {e}")))
}
