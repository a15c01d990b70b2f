use std::{fs, path::PathBuf};

use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{PillboxError, Result};

/// Application configuration settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Directory where the reminder collection is stored
    pub data_dir: PathBuf,

    /// Directory holding the static assets the cache pre-fetches
    pub assets_dir: PathBuf,

    /// Background ticker cadence in seconds
    pub tick_interval_secs: u64,

    /// Coarser foreground fallback cadence in seconds
    pub fallback_interval_secs: u64,

    /// How long an alarm rings before auto-stop, in seconds
    pub alarm_duration_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        let (data_dir, assets_dir) = match ProjectDirs::from("", "", "pillbox") {
            Some(dirs) => (
                dirs.data_dir().to_path_buf(),
                dirs.data_dir().join("assets"),
            ),
            // No home directory; fall back to the working directory
            None => (PathBuf::from(".pillbox"), PathBuf::from(".pillbox/assets")),
        };

        Self {
            data_dir,
            assets_dir,
            tick_interval_secs: 5,
            fallback_interval_secs: 15,
            alarm_duration_secs: 30,
        }
    }
}

impl Config {
    /// Loads configuration from a JSON file, or the defaults when no
    /// path is given.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let Some(path) = path else {
            debug!("No config file given, using defaults");
            return Ok(Self::default());
        };

        let content = fs::read_to_string(&path).map_err(|e| PillboxError::ConfigError {
            message: format!("Cannot read config file {}: {}", path.display(), e),
        })?;
        serde_json::from_str(&content).map_err(|e| PillboxError::ConfigError {
            message: format!("Invalid config file {}: {}", path.display(), e),
        })
    }
}
