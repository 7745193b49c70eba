//! TOML configuration loading.
//!
//! A host may keep discovery settings in a small TOML file.  Every field is
//! optional; missing fields fall back to [`DiscoveryConfig::default`]:
//!
//! ```toml
//! # Only list broadcasts under "room/".
//! namespace_prefix = "room"
//! # Wait at most 1.5 seconds for announcements.
//! time_budget_ms = 1500
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use broadcast_discovery_core::BroadcastPath;

use crate::domain::config::{DiscoveryConfig, DEFAULT_TIME_BUDGET};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// On-disk shape of [`DiscoveryConfig`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscoveryConfigFile {
    /// Namespace prefix; empty subscribes to every broadcast.
    #[serde(default)]
    pub namespace_prefix: String,
    /// Collection time budget in milliseconds.
    #[serde(default = "default_time_budget_ms")]
    pub time_budget_ms: u64,
}

fn default_time_budget_ms() -> u64 {
    DEFAULT_TIME_BUDGET.as_millis() as u64
}

impl Default for DiscoveryConfigFile {
    fn default() -> Self {
        Self {
            namespace_prefix: String::new(),
            time_budget_ms: default_time_budget_ms(),
        }
    }
}

impl From<DiscoveryConfigFile> for DiscoveryConfig {
    fn from(file: DiscoveryConfigFile) -> Self {
        Self {
            namespace_prefix: BroadcastPath::new(file.namespace_prefix),
            time_budget: Duration::from_millis(file.time_budget_ms),
        }
    }
}

impl From<&DiscoveryConfig> for DiscoveryConfigFile {
    fn from(config: &DiscoveryConfig) -> Self {
        Self {
            namespace_prefix: config.namespace_prefix.to_string(),
            time_budget_ms: config.time_budget.as_millis() as u64,
        }
    }
}

/// Parses a [`DiscoveryConfig`] from TOML text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the TOML is malformed or a field has the
/// wrong type.
pub fn parse_config(content: &str) -> Result<DiscoveryConfig, ConfigError> {
    let file: DiscoveryConfigFile = toml::from_str(content)?;
    Ok(file.into())
}

/// Renders `config` as TOML text.
///
/// # Errors
///
/// Returns [`ConfigError::Serialize`] if serialization fails.
pub fn render_config(config: &DiscoveryConfig) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(&DiscoveryConfigFile::from(config))?)
}

/// Loads a [`DiscoveryConfig`] from `path`, returning the defaults if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<DiscoveryConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(DiscoveryConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
