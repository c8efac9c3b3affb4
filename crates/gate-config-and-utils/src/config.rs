//! Verifier configuration for the gate.
//!
//! The configuration lives in a small JSON document, `WhitelistURL.json`:
//!
//! ```json
//! { "url": "http://wl.example/api/whitelist/armaId", "request_timeout_secs": 10 }
//! ```
//!
//! An empty or unusable `url` disables verification for the lifetime of the
//! process. The file is read once at startup and never reloaded.

use crate::{CoreError, CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// File name of the verifier configuration inside the base directory.
pub const CONFIG_FILE_NAME: &str = "WhitelistURL.json";

/// Default transport time budget for a single whitelist lookup.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Verifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerifierConfig {
    /// Base URL of the whitelist endpoint. Empty means disabled.
    #[serde(default)]
    pub url: String,
    /// Transport time budget for one lookup, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl VerifierConfig {
    /// Create a config pointing at `url` with default settings.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Create a config with verification disabled.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Load configuration from the base directory, falling back to defaults
    /// when the file does not exist.
    ///
    /// Environment variables override the file:
    /// `GATE_VERIFIER_URL`, `GATE_REQUEST_TIMEOUT_SECS`, `GATE_LOG_LEVEL`.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        Self::load_path(&paths.config_file())
    }

    /// Same as [`load`](Self::load) but for an explicit config file.
    pub fn load_path(path: &Path) -> CoreResult<Self> {
        let mut config = if path.exists() {
            Self::load_from_file(path)?
        } else {
            Self::default()
        };

        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Settle a load result into the config the gate runs with.
    ///
    /// A broken config file never aborts startup: the gate admits everyone
    /// and logs `ConfigMissing`. Environment overrides still apply. Call this
    /// once logging is up; an unusable URL or timeout is reported here and
    /// nowhere else.
    pub fn or_disabled(loaded: CoreResult<Self>, source: &Path) -> Self {
        let mut config = match loaded {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    path = %source.display(),
                    error = %e,
                    "ConfigMissing: verifier config unreadable, verification disabled"
                );
                let mut config = Self::disabled();
                config.apply_overrides(|name| std::env::var(name).ok());
                config
            }
        };
        config.sanitize();
        config
    }

    /// Reset a zero timeout and warn about a URL that will disable the gate.
    fn sanitize(&mut self) {
        if self.request_timeout_secs == 0 {
            warn!(
                default_secs = DEFAULT_REQUEST_TIMEOUT_SECS,
                "Zero request timeout would fail every lookup, using default"
            );
            self.request_timeout_secs = DEFAULT_REQUEST_TIMEOUT_SECS;
        }
        if let Err(CoreError::InvalidUrl(e)) = self.base_url_parsed() {
            warn!(url = self.url.trim(), error = %e, "Verifier base url is not a valid URL");
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: VerifierConfig = serde_json::from_str(&content)?;
        info!(path = %path.display(), "Loaded verifier config");
        Ok(config)
    }

    /// Apply overrides from a variable lookup (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("GATE_VERIFIER_URL") {
            self.url = url;
        }
        if let Some(secs) = lookup("GATE_REQUEST_TIMEOUT_SECS")
            .and_then(non_empty)
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
        {
            self.request_timeout_secs = secs;
        }
        if let Some(level) = lookup("GATE_LOG_LEVEL").and_then(non_empty) {
            self.log_level = level;
        }
    }

    /// The base URL, or `None` when verification is disabled.
    ///
    /// A URL that does not parse counts as disabled.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url_parsed().ok().map(|_| self.url.trim())
    }

    /// Whether a usable base URL is configured.
    pub fn is_enabled(&self) -> bool {
        self.base_url().is_some()
    }

    /// Validate the base URL.
    ///
    /// Empty is `CoreError::Config`, unparsable is `CoreError::InvalidUrl`.
    pub fn base_url_parsed(&self) -> CoreResult<Url> {
        let trimmed = self.url.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Config("verifier url is empty".to_string()));
        }
        Url::parse(trimmed).map_err(CoreError::from)
    }

    /// Transport time budget for one lookup.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn non_empty(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config_is_disabled() {
        let config = VerifierConfig::default();
        assert_eq!(config.url, "");
        assert!(!config.is_enabled());
        assert_eq!(config.base_url(), None);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_config_load_from_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config_path, r#"{ "url": "http://wl.example/api" }"#).unwrap();

        let config = VerifierConfig::load_from_file(&config_path).unwrap();
        assert_eq!(config.base_url(), Some("http://wl.example/api"));
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_config_empty_url_disables() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config_path, r#"{ "url": "   " }"#).unwrap();

        let config = VerifierConfig::load_from_file(&config_path).unwrap();
        assert!(!config.is_enabled());
    }

    #[test]
    fn test_config_missing_url_field_disables() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config_path, r#"{ "request_timeout_secs": 3 }"#).unwrap();

        let config = VerifierConfig::load_from_file(&config_path).unwrap();
        assert!(!config.is_enabled());
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_config_invalid_url_disables() {
        let config = VerifierConfig::with_url("not a valid url");
        assert!(!config.is_enabled());
        assert!(config.base_url_parsed().is_err());
    }

    #[test]
    fn test_config_non_string_url_is_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config_path, r#"{ "url": 42 }"#).unwrap();

        let result = VerifierConfig::load_from_file(&config_path);
        assert!(matches!(result, Err(CoreError::Json(_))));
    }

    #[test]
    fn test_config_load_nonexistent_uses_defaults() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        assert!(!paths.config_file().exists());
        assert!(VerifierConfig::load(&paths).is_ok());
        assert!(VerifierConfig::load_from_file(&paths.config_file()).is_err());
    }

    #[test]
    fn test_broken_file_falls_back_to_disabled() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());
        std::fs::write(paths.config_file(), "not json").unwrap();

        let loaded = VerifierConfig::load(&paths);
        assert!(loaded.is_err());
        let config = VerifierConfig::or_disabled(loaded, &paths.config_file());
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_load_path_reads_explicit_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom.json");
        std::fs::write(&config_path, r#"{ "url": "http://wl.example/api", "log_level": "warn" }"#)
            .unwrap();

        let mut config = VerifierConfig::load_from_file(&config_path).unwrap();
        config.apply_overrides(|_| None);
        assert_eq!(config.base_url(), Some("http://wl.example/api"));
        assert_eq!(config.log_level, "warn");

        assert!(VerifierConfig::load_path(&config_path).is_ok());
        assert!(VerifierConfig::load_path(&dir.path().join("absent.json")).is_ok());
    }

    #[test]
    fn test_base_url_is_trimmed_and_validated() {
        let config = VerifierConfig::with_url("  http://wl.example/api  ");
        assert_eq!(config.base_url(), Some("http://wl.example/api"));
        assert!(config.base_url_parsed().is_ok());

        let blank = VerifierConfig::with_url("   ");
        assert!(matches!(blank.base_url_parsed(), Err(CoreError::Config(_))));
        assert_eq!(blank.base_url(), None);

        let garbage = VerifierConfig::with_url("not a url");
        assert!(matches!(garbage.base_url_parsed(), Err(CoreError::InvalidUrl(_))));
        assert_eq!(garbage.base_url(), None);
    }

    #[test]
    fn test_zero_timeout_override_is_ignored() {
        let mut config = VerifierConfig::default();
        config.request_timeout_secs = 4;
        config.apply_overrides(lookup_from(&[("GATE_REQUEST_TIMEOUT_SECS", "0")]));
        assert_eq!(config.request_timeout(), Duration::from_secs(4));
    }

    #[test]
    fn test_zero_timeout_in_file_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &config_path,
            r#"{ "url": "http://wl.example/api", "request_timeout_secs": 0 }"#,
        )
        .unwrap();

        let loaded = VerifierConfig::load_from_file(&config_path);
        let config = VerifierConfig::or_disabled(loaded, &config_path);
        assert_eq!(
            config.request_timeout(),
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_overrides() {
        let mut config = VerifierConfig::with_url("http://file.example");
        config.apply_overrides(lookup_from(&[
            ("GATE_VERIFIER_URL", "http://env.example/api"),
            ("GATE_REQUEST_TIMEOUT_SECS", "2"),
            ("GATE_LOG_LEVEL", "debug"),
        ]));

        assert_eq!(config.base_url(), Some("http://env.example/api"));
        assert_eq!(config.request_timeout(), Duration::from_secs(2));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_overrides_ignore_garbage_timeout() {
        let mut config = VerifierConfig::default();
        config.apply_overrides(lookup_from(&[
            ("GATE_REQUEST_TIMEOUT_SECS", "soon"),
            ("GATE_LOG_LEVEL", "  "),
        ]));

        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_empty_env_url_disables() {
        let mut config = VerifierConfig::with_url("http://file.example");
        config.apply_overrides(lookup_from(&[("GATE_VERIFIER_URL", "")]));
        assert!(!config.is_enabled());
    }
}
