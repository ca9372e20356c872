//! Configuration management.
//!
//! Configuration is read from `~/.config/whisker/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is
//! created. The `CAT_API_KEY` environment variable overrides the key from
//! the file.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use serde::Deserialize;

use crate::api::http::DEFAULT_BASE_URL;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
}

/// Remote API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the API. Must end with a trailing slash.
    pub base_url: String,
    /// API key sent as the `x-api-key` header. Optional; the public
    /// endpoints work without one at reduced rate limits.
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with
    /// comments. Missing fields in the config file use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
                path: config_path.clone(),
                source: e,
            })?;
            toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: config_path,
                source: e,
            })?
        } else {
            Self::create_default_config(&config_path)?;
            Self::default()
        };

        if let Ok(key) = std::env::var("CAT_API_KEY") {
            if !key.is_empty() {
                config.api.api_key = Some(key);
            }
        }

        Ok(config)
    }

    /// Get the default config file path: `~/.config/whisker/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("whisker").join("config.toml"))
    }

    fn create_default_config(path: &PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# Whisker Configuration
#
# All values below are the defaults; uncomment and edit to override.

[api]
# Base URL of the cat image API. Must end with a trailing slash.
# base_url = "https://api.thecatapi.com/v1/"

# API key sent as the x-api-key header. Without a key the public
# endpoints still work, with stricter rate limits. The CAT_API_KEY
# environment variable takes precedence over this value.
# api_key = "live_..."

# Request timeout in seconds.
# timeout_secs = 10
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
