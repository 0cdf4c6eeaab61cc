use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::filter::{FilterAction, SecretFilter};

/// Seconds between sync passes when the config leaves the interval unset.
pub const DEFAULT_SYNC_INTERVAL_SEC: u64 = 15;

/// Connect/request timeout for remote calls when the config leaves it unset.
pub const DEFAULT_REQUEST_TIMEOUT_SEC: u64 = 30;

/// Top-level daemon configuration, loaded once at startup and immutable for
/// the process lifetime.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Seconds between sync passes. Zero or absent falls back to
    /// [`DEFAULT_SYNC_INTERVAL_SEC`].
    #[serde(default)]
    pub sync_interval_sec: u64,

    /// Timeout applied to each remote call, both connect and full request.
    /// Zero or absent falls back to [`DEFAULT_REQUEST_TIMEOUT_SEC`].
    #[serde(default)]
    pub request_timeout_sec: u64,

    /// Remote file store endpoint and credentials.
    pub backend: BackendConfig,

    /// History files to keep in sync, processed sequentially each pass.
    #[serde(default)]
    pub history_files: Vec<HistoryTarget>,

    /// Secret filter applied to merged history before persisting.
    #[serde(default)]
    pub filter: FilterConfig,

    /// Optional log destination; absent means stdout.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

/// Connection settings for the Filebrowser backend.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    pub username: String,
    pub password: String,
}

/// One history file to keep in sync. The remote copy lives under the same
/// path on the backend as the file does locally.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryTarget {
    /// Local path of the history file.
    pub path: PathBuf,
    /// Shell this history belongs to (bash, zsh, fish); used in log output.
    pub shell: String,
}

/// Secret filter section of the configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Regular expressions tried in order against each history line.
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Defaults to `redact` when unset.
    #[serde(default)]
    pub action: FilterAction,
}

impl Config {
    /// Loads a YAML configuration file, applying interval and timeout
    /// defaults the same way for absent and zero values.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        let mut config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        if config.sync_interval_sec == 0 {
            config.sync_interval_sec = DEFAULT_SYNC_INTERVAL_SEC;
        }
        if config.request_timeout_sec == 0 {
            config.request_timeout_sec = DEFAULT_REQUEST_TIMEOUT_SEC;
        }

        Ok(config)
    }

    /// Builds the configured secret filter, or `None` when filtering is off.
    ///
    /// An invalid pattern is a configuration error: no partially built
    /// filter is ever returned.
    pub fn build_filter(&self) -> Result<Option<SecretFilter>> {
        if !self.filter.enabled {
            return Ok(None);
        }
        SecretFilter::new(&self.filter.patterns, self.filter.action).map(Some)
    }
}

/// Default config location: `<platform config dir>/shellsync/config.yaml`
/// (e.g. `~/.config/shellsync/config.yaml` on Linux).
pub fn default_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("failed to locate the user config directory")?;
    Ok(base.join("shellsync").join("config.yaml"))
}
