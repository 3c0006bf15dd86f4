use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use super::error::SettingsError;

/// Environment variable holding the path of a settings file.
pub const SETTINGS_PATH_VAR: &str = "MEDIA_MONOPOLY_SETTINGS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Rules that can be changed before a game starts.
pub struct Settings {
    /// The game ends after this many minutes, and the richest player wins.
    #[serde(default = "default_time_limit_minutes")]
    pub time_limit_minutes: u64,
    /// Whether upgrading a channel requires owning its whole group.
    #[serde(default = "default_uniform_build")]
    pub uniform_build: bool,
}

fn default_time_limit_minutes() -> u64 {
    60
}

fn default_uniform_build() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_limit_minutes: default_time_limit_minutes(),
            uniform_build: default_uniform_build(),
        }
    }
}

impl Settings {
    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(self.time_limit_minutes.saturating_mul(60))
    }

    pub fn from_json_str(data: &str) -> Result<Settings, SettingsError> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn from_file(path: &Path) -> Result<Settings, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Settings::from_json_str(&contents)
    }

    /// Load settings from the file named by `MEDIA_MONOPOLY_SETTINGS`, or
    /// use the defaults if it's unset or can't be loaded.
    pub fn load_from_env() -> Settings {
        let path = match env::var(SETTINGS_PATH_VAR) {
            Ok(path) => PathBuf::from(path),
            Err(_) => return Settings::default(),
        };

        match Settings::from_file(&path) {
            Ok(settings) => {
                tracing::info!(
                    target: "media_monopoly::settings",
                    path = %path.display(),
                    time_limit_minutes = settings.time_limit_minutes,
                    uniform_build = settings.uniform_build,
                    "settings.loaded"
                );
                settings
            }
            Err(err) => {
                tracing::warn!(
                    target: "media_monopoly::settings",
                    path = %path.display(),
                    error = %err,
                    "settings.load_failed"
                );
                Settings::default()
            }
        }
    }
}
