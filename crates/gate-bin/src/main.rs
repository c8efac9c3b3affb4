//! Whitelist gate - admits or removes players based on a remote whitelist.

mod commands;
mod events;
mod host;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gate_config_and_utils::{init_logging, Paths, VerifierConfig, DEFAULT_LOG_LEVEL};
use tracing::warn;

/// Whitelist gate command-line interface.
#[derive(Parser)]
#[command(name = "whitelist-gate")]
#[command(about = "Remote whitelist verification for player admission")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error). Overrides the config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Base directory for config and logs. Defaults to ~/.whitelist-gate
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// Explicit verifier config file. Defaults to <base-dir>/WhitelistURL.json
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read host events from stdin and write removals to stdout
    Run {
        /// How long to wait for in-flight lookups after stdin closes
        #[arg(long, default_value_t = commands::run::DEFAULT_DRAIN_TIMEOUT_SECS)]
        drain_timeout_secs: u64,
    },
    /// Look up a single identity and print the verdict
    Check {
        /// Raw player identity, normalized before the lookup
        identity: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let paths = match cli.base_dir {
        Some(base) => Paths::with_base_dir(base),
        None => Paths::new()?,
    };
    let config_path = cli.config.unwrap_or_else(|| paths.config_file());
    let loaded = VerifierConfig::load_path(&config_path);

    let level = cli
        .log_level
        .or_else(|| loaded.as_ref().ok().map(|config| config.log_level.clone()))
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

    // Fall back to stderr-only logging when the log directory is not writable
    let log_file = paths.log_file();
    let file_logging = paths
        .ensure_dirs()
        .and_then(|_| init_logging(&level, Some(&log_file)));
    if let Err(file_err) = file_logging {
        init_logging(&level, None)?;
        warn!(path = %log_file.display(), error = %file_err, "File logging unavailable");
    }

    let config = VerifierConfig::or_disabled(loaded, &config_path);

    match cli.command {
        Some(Commands::Run { drain_timeout_secs }) => {
            commands::run::run(config, drain_timeout_secs).await?;
        }
        None => {
            commands::run::run(config, commands::run::DEFAULT_DRAIN_TIMEOUT_SECS).await?;
        }
        Some(Commands::Check { identity }) => {
            commands::check::check(config, &identity).await?;
        }
    }

    Ok(())
}
