//! User settings and well-known directories
//!
//! Settings are stored in TOML format at
//! `<user-config-dir>/raven-installer/config.toml`. The file is loaded once by
//! the CLI and handed to the operations in [`crate::operations`]; nothing in
//! the library reads it on its own.
//!
//! # Examples
//!
//! ```no_run
//! use raven::Settings;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load()?;
//! println!("Game directory: {}", settings.game_dir()?.display());
//! # Ok(())
//! # }
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory name used under both the user config and user cache directories
pub const APP_DIR_NAME: &str = "raven-installer";

/// User settings file (`<user-config-dir>/raven-installer/config.toml`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Game installation directory; empty until `raven setup` has run
    #[serde(rename = "GameLocation", default)]
    pub game_location: String,

    /// HTTP client settings
    #[serde(default)]
    pub network: NetworkSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSettings {
    /// Timeout for establishing a connection, in seconds (0 = none)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Deadline for a whole request including the body, in seconds (0 = none)
    #[serde(default)]
    pub timeout_secs: u64,
}

fn default_connect_timeout_secs() -> u64 {
    30
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            timeout_secs: 0,
        }
    }
}

impl NetworkSettings {
    /// Build the blocking HTTP client used for the manifest and all artifacts
    pub fn client(&self) -> Result<reqwest::blocking::Client> {
        let secs = |s: u64| (s > 0).then(|| Duration::from_secs(s));
        let mut builder = reqwest::blocking::Client::builder()
            .user_agent(concat!("raven/", env!("CARGO_PKG_VERSION")))
            .timeout(secs(self.timeout_secs));
        if let Some(connect) = secs(self.connect_timeout_secs) {
            builder = builder.connect_timeout(connect);
        }
        Ok(builder.build()?)
    }
}

impl Settings {
    /// Get the settings file path
    ///
    /// Uses RAVEN_CONFIG_DIR if set, otherwise the platform config directory
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(config_dir) = std::env::var("RAVEN_CONFIG_DIR") {
            return Ok(PathBuf::from(config_dir).join("config.toml"));
        }

        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Other("Could not find user config directory".to_string()))?;
        Ok(config_dir.join(APP_DIR_NAME).join("config.toml"))
    }

    /// Load settings from the default path, or defaults if the file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| Error::io_at(format!("read settings {}", path.display()), e))?;
        Ok(toml::from_str(&content)?)
    }

    /// Save settings to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)
            .map_err(|e| Error::io_at(format!("write settings {}", path.display()), e))?;
        Ok(())
    }

    /// The configured game directory, or [`Error::NotConfigured`]
    pub fn game_dir(&self) -> Result<&Path> {
        if self.game_location.trim().is_empty() {
            return Err(Error::NotConfigured);
        }
        Ok(Path::new(&self.game_location))
    }

    /// `<game>/BepInEx/plugins`, where every installed mod gets its own directory
    pub fn plugins_dir(&self) -> Result<PathBuf> {
        Ok(plugins_dir(self.game_dir()?))
    }
}

pub fn plugins_dir(game_dir: &Path) -> PathBuf {
    game_dir.join("BepInEx").join("plugins")
}

/// Root of the per-user cache; artifacts live in `<root>/raven-installer/`
///
/// Uses RAVEN_CACHE_DIR if set, otherwise the platform cache directory
pub fn cache_root() -> Result<PathBuf> {
    if let Ok(cache_dir) = std::env::var("RAVEN_CACHE_DIR") {
        return Ok(PathBuf::from(cache_dir));
    }
    dirs::cache_dir()
        .ok_or_else(|| Error::Other("cache directory not available".to_string()))
}
