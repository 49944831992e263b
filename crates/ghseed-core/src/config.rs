use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::GhseedError;
use crate::models::Visibility;

/// Per-user preferences, stored at `~/.ghseed/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Organization new repositories are created under. `None` means the
    /// personal account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_org: Option<String>,

    /// Visibility used when `init` is given neither `--public` nor `--private`.
    #[serde(default)]
    pub default_visibility: Visibility,
}

impl Preferences {
    /// Returns the ghseed home directory (`~/.ghseed/`).
    pub fn home_dir() -> Result<PathBuf, GhseedError> {
        let base = dirs::home_dir().ok_or_else(|| GhseedError::Config {
            message: "could not determine home directory".into(),
        })?;
        Ok(base.join(".ghseed"))
    }

    /// Returns the path to the preference file.
    pub fn config_path() -> Result<PathBuf, GhseedError> {
        Ok(Self::home_dir()?.join("config.toml"))
    }

    /// Load preferences from the default location. Never fails: a missing,
    /// unreadable or corrupt file yields the built-in defaults.
    pub fn load() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_from(&path),
            Err(e) => {
                tracing::warn!("{e}; using default preferences");
                Self::default()
            }
        }
    }

    /// Load preferences from a specific path, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("could not read {}: {e}; using defaults", path.display());
                return Self::default();
            }
        };
        match toml::from_str(&content) {
            Ok(prefs) => prefs,
            Err(e) => {
                tracing::warn!(
                    "ignoring corrupt preference file {}: {}",
                    path.display(),
                    e.message()
                );
                Self::default()
            }
        }
    }

    /// Save preferences to the default location.
    pub fn save(&self) -> Result<(), GhseedError> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Save preferences to a specific path, creating its parent directory.
    pub fn save_to(&self, path: &Path) -> Result<(), GhseedError> {
        let persistence = |message: String| GhseedError::Persistence {
            path: path.to_path_buf(),
            message,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| persistence(e.to_string()))?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| persistence(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| persistence(e.to_string()))?;
        tracing::debug!("saved preferences to {}", path.display());
        Ok(())
    }
}
