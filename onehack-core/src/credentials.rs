//! Stored login for the bookmark API.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::OneHackConfig;
use crate::error::{OneHackError, OneHackResult};

/// Saved at ~/.config/onehack/credentials.toml by `onehack login`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl Credentials {
    pub fn path() -> OneHackResult<PathBuf> {
        Ok(OneHackConfig::config_dir()?.join("credentials.toml"))
    }

    /// Load saved credentials; a missing file means signed out.
    pub fn load() -> OneHackResult<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> OneHackResult<Self> {
        if !path.exists() {
            return Ok(Credentials::default());
        }

        let contents = std::fs::read_to_string(path)?;

        toml::from_str(&contents).map_err(|e| {
            OneHackError::Config(format!(
                "Failed to parse credentials from {}: {e}",
                path.display()
            ))
        })
    }

    pub fn save(&self) -> OneHackResult<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> OneHackResult<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| OneHackError::Serialization(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;

        // Owner-only, the file holds a bearer token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    pub fn clear() -> OneHackResult<()> {
        let path = Self::path()?;
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    pub fn is_logged_in(&self) -> bool {
        self.user_id.is_some()
    }
}
