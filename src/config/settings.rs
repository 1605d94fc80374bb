// Settings module for configuration
//
// This module defines the settings structure and loading/saving functions
// for the server configuration.

use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Number of worker threads
    pub workers: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: crate::defaults::SERVER_HOST.to_string(),
            port: crate::defaults::SERVER_PORT,
            workers: num_cpus::get(),
        }
    }
}

/// User record store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Path to the JSON document holding the full user collection
    pub path: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: crate::defaults::STORE_PATH.to_string(),
        }
    }
}

/// Weather data provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Base URL of the weather API
    pub base_url: String,
    /// User-Agent header sent with every provider request
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: crate::defaults::PROVIDER_BASE_URL.to_string(),
            user_agent: crate::defaults::PROVIDER_USER_AGENT.to_string(),
            timeout_secs: crate::defaults::PROVIDER_TIMEOUT_SECS,
        }
    }
}

/// Complete settings for the server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server settings
    pub server: ServerSettings,
    /// Record store settings
    pub store: StoreSettings,
    /// Weather provider settings
    pub provider: ProviderSettings,
}

/// Load settings from a file
pub fn load(path: impl AsRef<Path>) -> Result<Settings> {
    let config_str = match fs::read_to_string(&path) {
        Ok(config_str) => config_str,
        Err(_) => {
            // If the file doesn't exist, create default settings
            let default_settings = Settings::default();
            save(&default_settings, path)?;
            return Ok(default_settings);
        }
    };

    let settings: Settings = toml::from_str(&config_str)?;
    Ok(settings)
}

/// Save settings to a file
pub fn save(settings: &Settings, path: impl AsRef<Path>) -> Result<()> {
    let config_str = toml::to_string_pretty(settings)?;

    // Create parent directories if they don't exist
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, config_str)?;
    Ok(())
}
