//! Dashboard configuration persistence
//!
//! Stored as JSON in `<config_dir>/echboard/config.json`. Missing or
//! unreadable files fall back to defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::CoreError;
use crate::table::DEFAULT_PAGE_SIZE;

const CONFIG_FILE: &str = "config.json";

/// Default simulation API location
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Base URL of the simulation API
    pub api_base_url: String,
    /// Append the forecast horizon to charts and tables
    pub forecast_enabled: bool,
    /// Rows per table page
    pub page_size: usize,
    /// HTTP request timeout
    pub request_timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            forecast_enabled: true,
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout_secs: 30,
        }
    }
}

impl DashboardConfig {
    /// `<config_dir>/echboard`
    pub fn default_dir() -> Result<PathBuf, CoreError> {
        dirs::config_dir()
            .map(|d| d.join("echboard"))
            .ok_or(CoreError::ConfigDirNotFound)
    }

    /// `<dir>/config.json`
    pub fn path(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE)
    }

    /// Load from `<dir>/config.json`.
    /// Returns defaults on any I/O or parse error (graceful degradation).
    pub fn load(dir: &Path) -> Self {
        let path = Self::path(dir);
        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid config {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Persist to `<dir>/config.json`.
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir).context("Failed to create config directory")?;
        let path = Self::path(dir);
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize configuration")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write configuration to {}", path.display()))
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.page_size == 0 {
            return Err(CoreError::InvalidConfig {
                message: "page_size must be at least 1".to_string(),
            });
        }
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"))
        {
            return Err(CoreError::InvalidConfig {
                message: format!("api_base_url must be an http(s) URL: {}", self.api_base_url),
            });
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
