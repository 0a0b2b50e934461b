//! Bot settings loaded from a TOML file.
//!
//! Secrets (the Discord token, the database URL) come from the environment;
//! everything else lives in `config.toml`. Every field has a default, so a
//! missing file is not an error.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Environment variable overriding the settings file location
pub const CONFIG_PATH_ENV: &str = "GUILDMATE_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Top-level settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Prefix for text commands and custom command invocations
    pub prefix: String,
    /// Guild to register slash commands in instead of globally (faster updates while developing)
    pub dev_guild_id: Option<u64>,
    /// Guild Wars 2 API settings
    pub gw2: Gw2Settings,
    /// Pager settings
    pub pagination: PaginationSettings,
}

/// Guild Wars 2 API client settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Gw2Settings {
    /// Base URL of the API, without the `/v2` suffix
    pub api_base_url: String,
    /// Per-request timeout
    pub request_timeout_secs: u64,
}

/// Pager settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PaginationSettings {
    /// Lines per page
    pub page_size: usize,
    /// How long the page buttons stay active
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prefix: "!".to_string(),
            dev_guild_id: None,
            gw2: Gw2Settings::default(),
            pagination: PaginationSettings::default(),
        }
    }
}

impl Default for Gw2Settings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.guildwars2.com".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            page_size: 10,
            timeout_secs: 300,
        }
    }
}

impl Settings {
    fn validate(self) -> Result<Self> {
        if self.prefix.trim().is_empty() {
            return Err(Error::Config {
                message: "prefix cannot be empty".to_string(),
            });
        }
        if self.pagination.page_size == 0 {
            return Err(Error::Config {
                message: "pagination.page_size must be at least 1".to_string(),
            });
        }
        Ok(self)
    }
}

/// Parses settings from TOML text.
pub fn parse_settings(contents: &str) -> Result<Settings> {
    toml::from_str::<Settings>(contents)
        .map_err(|e| Error::Config {
            message: format!("Failed to parse settings: {e}"),
        })?
        .validate()
}

/// Loads settings from a TOML file.
///
/// A missing file yields [`Settings::default`].
///
/// # Errors
/// Returns an error if the file exists but cannot be read, the TOML syntax is
/// invalid, or a value is out of range.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        info!("No settings file at {path:?}, using defaults.");
        return Ok(Settings::default());
    }

    debug!("Loading settings from {path:?}");
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read settings file {path:?}: {e}"),
    })?;
    parse_settings(&contents)
}

/// Loads settings from `$GUILDMATE_CONFIG`, or `./config.toml` when unset.
pub fn load_default_settings() -> Result<Settings> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_settings(path)
}
