//! Configuration and logging for the whitelist admission gate.

mod config;
mod error;
mod logging;
mod paths;

pub use config::{
    VerifierConfig, CONFIG_FILE_NAME, DEFAULT_LOG_LEVEL, DEFAULT_REQUEST_TIMEOUT_SECS,
};
pub use error::{CoreError, CoreResult};
pub use logging::init_logging;
pub use paths::Paths;
