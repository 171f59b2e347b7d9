//! Configuration loading and resolution
//!
//! One `Config` is constructed at startup and passed to every component that
//! needs it. Each field resolves with the priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (handled by the clap `env` attribute upstream)
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::Result;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Default listen address (host:port)
const DEFAULT_BIND: &str = "127.0.0.1:5000";

/// Default base URL of the OpenBD bibliographic lookup service
const DEFAULT_OPENBD_URL: &str = "https://api.openbd.jp/v1";

/// Default ceiling on the external metadata fetch, in seconds
const DEFAULT_METADATA_TIMEOUT_SECS: u64 = 10;

/// Resolved application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file path
    pub database: PathBuf,
    /// Listen address (host:port)
    pub bind: String,
    /// Base URL of the bibliographic metadata service
    pub openbd_url: String,
    /// Timeout for metadata lookups
    pub metadata_timeout_secs: u64,
}

/// Optional values parsed from the TOML config file
#[derive(Debug, Default, Deserialize)]
pub struct TomlConfig {
    pub database: Option<PathBuf>,
    pub bind: Option<String>,
    pub openbd_url: Option<String>,
    pub metadata_timeout_secs: Option<u64>,
}

/// Values already resolved from CLI arguments and environment variables
#[derive(Debug, Default)]
pub struct Overrides {
    pub database: Option<PathBuf>,
    pub bind: Option<String>,
    pub openbd_url: Option<String>,
    pub config_file: Option<PathBuf>,
}

impl Config {
    /// Resolve the full configuration from overrides, the TOML file, and
    /// compiled defaults.
    ///
    /// A missing config file is not an error; an unparsable one is reported
    /// as a warning and ignored so a bad edit cannot keep the service down.
    pub fn resolve(overrides: Overrides) -> Result<Self> {
        let toml_config = load_toml_config(overrides.config_file.as_deref());

        Ok(Self {
            database: overrides
                .database
                .or(toml_config.database)
                .unwrap_or_else(default_database_path),
            bind: overrides
                .bind
                .or(toml_config.bind)
                .unwrap_or_else(|| DEFAULT_BIND.to_string()),
            openbd_url: overrides
                .openbd_url
                .or(toml_config.openbd_url)
                .unwrap_or_else(|| DEFAULT_OPENBD_URL.to_string()),
            metadata_timeout_secs: toml_config
                .metadata_timeout_secs
                .unwrap_or(DEFAULT_METADATA_TIMEOUT_SECS),
        })
    }

    /// Metadata lookup timeout as a `Duration`
    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_secs(self.metadata_timeout_secs)
    }
}

/// Load the TOML config file, tolerating absence and parse failures
fn load_toml_config(explicit_path: Option<&std::path::Path>) -> TomlConfig {
    let path = match explicit_path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) => p,
            None => return TomlConfig::default(),
        },
    };

    if !path.exists() {
        return TomlConfig::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str::<TomlConfig>(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring unparsable config file {}: {}", path.display(), e);
                TomlConfig::default()
            }
        },
        Err(e) => {
            warn!("Ignoring unreadable config file {}: {}", path.display(), e);
            TomlConfig::default()
        }
    }
}

/// Default configuration file path: `<config_dir>/loantrack/config.toml`
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("loantrack").join("config.toml"))
}

/// Default database path: `<data_local_dir>/loantrack/loantrack.db`
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("loantrack").join("loantrack.db"))
        .unwrap_or_else(|| PathBuf::from("loantrack.db"))
}
