//! Persistent user preferences and the location of the history file.

use dirs_next as dirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::plotting::SmoothingMethod;

/// Environment variable that overrides where the workout history is stored.
pub const HISTORY_ENV: &str = "GYM_TRACKER_HISTORY";

const HISTORY_DIR: &str = "gym_tracker";
const HISTORY_FILE: &str = "workout_history.json";

fn default_ma_window() -> usize {
    3
}

/// Preferences that survive restarts.
///
/// Every field has a default so settings files written by older versions
/// keep loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Explicit history file; falls back to the data directory when unset.
    pub history_file: Option<String>,
    /// Directory of the last export or import, used to seed file dialogs.
    pub last_dir: Option<String>,
    /// Exercise shown in the progress graph.
    pub selected_exercise: Option<String>,
    pub show_smoothed: bool,
    #[serde(default = "default_ma_window")]
    pub ma_window: usize,
    pub smoothing_method: SmoothingMethod,
    /// Open the HTML report in the browser after writing it.
    pub open_report: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            history_file: None,
            last_dir: None,
            selected_exercise: None,
            show_smoothed: false,
            ma_window: default_ma_window(),
            smoothing_method: SmoothingMethod::SimpleMA,
            open_report: true,
        }
    }
}

impl Settings {
    const FILE: &'static str = "gym_tracker_settings.json";

    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(Self::FILE))
    }

    /// Load settings from the JSON configuration file, or defaults when it is
    /// missing or unreadable.
    pub fn load() -> Self {
        if let Some(path) = Self::path() {
            if let Ok(data) = std::fs::read_to_string(&path) {
                match serde_json::from_str(&data) {
                    Ok(cfg) => return cfg,
                    Err(e) => log::warn!("Ignoring invalid settings file {}: {e}", path.display()),
                }
            }
        }
        Self::default()
    }

    pub fn save(&self) {
        if let Some(path) = Self::path() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match serde_json::to_string_pretty(self) {
                Ok(data) => {
                    if let Err(e) = std::fs::write(&path, data) {
                        log::error!("Failed to save settings: {e}");
                    }
                }
                Err(e) => log::error!("Failed to serialize settings: {e}"),
            }
        }
    }

    /// Where the workout history lives.
    ///
    /// The [`HISTORY_ENV`] variable takes precedence over the configured file,
    /// which takes precedence over the platform data directory.
    pub fn history_path(&self) -> PathBuf {
        if let Some(p) = std::env::var_os(HISTORY_ENV).filter(|p| !p.is_empty()) {
            return PathBuf::from(p);
        }
        if let Some(p) = self.history_file.as_ref().filter(|p| !p.is_empty()) {
            return PathBuf::from(p);
        }
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(HISTORY_DIR)
            .join(HISTORY_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use std::env;
    use std::sync::Mutex;

    static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    #[test]
    fn settings_roundtrip() {
        let s = Settings {
            history_file: Some("/tmp/history.json".into()),
            last_dir: Some("/tmp".into()),
            selected_exercise: Some("Bench".into()),
            show_smoothed: true,
            ma_window: 5,
            smoothing_method: SmoothingMethod::EMA,
            open_report: false,
        };
        let json = serde_json::to_string(&s).unwrap();
        let loaded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(s, loaded);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let loaded: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(loaded, Settings::default());
        assert_eq!(loaded.ma_window, 3);
        assert!(loaded.open_report);
    }

    #[test]
    fn settings_persist_in_config_dir() {
        let _guard = ENV_MUTEX.lock().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let prev_config = env::var_os("XDG_CONFIG_HOME");
        unsafe {
            env::set_var("XDG_CONFIG_HOME", dir.path());
        }

        let s = Settings {
            selected_exercise: Some("Squat".into()),
            ..Default::default()
        };
        s.save();
        assert_eq!(Settings::load().selected_exercise.as_deref(), Some("Squat"));

        std::fs::write(Settings::path().unwrap(), "not json").unwrap();
        assert_eq!(Settings::load(), Settings::default());

        if let Some(val) = prev_config {
            unsafe {
                env::set_var("XDG_CONFIG_HOME", val);
            }
        } else {
            unsafe {
                env::remove_var("XDG_CONFIG_HOME");
            }
        }
    }

    #[test]
    fn env_var_overrides_history_file() {
        let _guard = ENV_MUTEX.lock().unwrap();

        let s = Settings {
            history_file: Some("/from/settings.json".into()),
            ..Default::default()
        };
        unsafe {
            env::set_var(HISTORY_ENV, "/from/env.json");
        }
        assert_eq!(s.history_path(), PathBuf::from("/from/env.json"));

        unsafe {
            env::remove_var(HISTORY_ENV);
        }
        assert_eq!(s.history_path(), PathBuf::from("/from/settings.json"));
        assert!(
            Settings::default()
                .history_path()
                .ends_with("gym_tracker/workout_history.json")
        );
    }
}
