//! Process-wide configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Deserializer};

use crate::error::{OneHackError, OneHackResult};

static DEFAULT_API_BASE: &str = "https://api.onehack.live/api";
static DEFAULT_CACHE_DIR: &str = "~/.local/share/onehack";
static DEFAULT_STORAGE_KEY: &str = "bookmarkedHackathons";
static DEFAULT_REFRESH_INTERVAL: &str = "9m";
static DEFAULT_REQUEST_TIMEOUT: &str = "10s";

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_DIR)
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_refresh_interval() -> Duration {
    Duration::from_secs(9 * 60)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(&s).map_err(serde::de::Error::custom)
}

/// Configuration at ~/.config/onehack/config.toml, overridable with
/// `ONEHACK_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct OneHackConfig {
    /// Base URL of the listing API (ends in `/api`).
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Base URL of the bookmark API.
    #[serde(default = "default_api_base")]
    pub bookmark_api_base: String,

    /// Where the local bookmark cache lives.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Name of the cache slot holding the bookmark list.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    #[serde(
        default = "default_refresh_interval",
        deserialize_with = "deserialize_duration"
    )]
    pub refresh_interval: Duration,

    #[serde(
        default = "default_request_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub request_timeout: Duration,
}

impl Default for OneHackConfig {
    fn default() -> Self {
        OneHackConfig {
            api_base: default_api_base(),
            bookmark_api_base: default_api_base(),
            cache_dir: default_cache_dir(),
            storage_key: default_storage_key(),
            refresh_interval: default_refresh_interval(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl OneHackConfig {
    pub fn config_dir() -> OneHackResult<PathBuf> {
        Ok(dirs::config_dir()
            .ok_or_else(|| OneHackError::Config("Could not determine config directory".into()))?
            .join("onehack"))
    }

    pub fn config_path() -> OneHackResult<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load from the default location, creating a commented-out config file
    /// on first use.
    pub fn load() -> OneHackResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from `path` (which may be missing), then apply environment overrides.
    pub fn load_from(path: &Path) -> OneHackResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("ONEHACK"))
            .build()
            .map_err(|e| OneHackError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| OneHackError::Config(e.to_string()))
    }

    /// Cache directory with `~` expanded.
    pub fn cache_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.cache_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> OneHackResult<()> {
        let contents = format!(
            "\
# onehack configuration

# Hackathon listing API:
# api_base = \"{DEFAULT_API_BASE}\"

# Bookmark API (requires login):
# bookmark_api_base = \"{DEFAULT_API_BASE}\"

# Where bookmarks are cached locally:
# cache_dir = \"{DEFAULT_CACHE_DIR}\"
# storage_key = \"{DEFAULT_STORAGE_KEY}\"

# How often `onehack watch` refreshes bookmarks:
# refresh_interval = \"{DEFAULT_REFRESH_INTERVAL}\"

# Give up on a request after:
# request_timeout = \"{DEFAULT_REQUEST_TIMEOUT}\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                OneHackError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| OneHackError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
