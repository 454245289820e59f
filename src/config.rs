use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::constants::{DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECONDS};
use crate::error::{Result, StatsError};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Config {
    /// Load from `path` (the CLI defaults it to [`DEFAULT_CONFIG_PATH`]), then
    /// apply env overrides. A missing file falls back to defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                StatsError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
            })?;
            toml::from_str::<Config>(&content)?
        } else {
            warn!("Config file '{}' not found, using defaults", path.display());
            Config::default()
        };
        config.apply_env_overrides()?;
        debug!(base_url = %config.api.base_url, timeout = config.api.timeout_seconds, "Configuration loaded");
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(base) = std::env::var("CASE_STATS_API_BASE") {
            if !base.trim().is_empty() {
                self.api.base_url = base.trim().to_string();
            }
        }
        if let Ok(timeout) = std::env::var("CASE_STATS_TIMEOUT_SECONDS") {
            self.api.timeout_seconds = timeout.trim().parse().map_err(|e| {
                StatsError::Config(format!("Invalid CASE_STATS_TIMEOUT_SECONDS '{}': {}", timeout, e))
            })?;
        }
        Ok(())
    }
}
