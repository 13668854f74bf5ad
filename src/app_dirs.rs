use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// `$HOME/.local/state/flick`, or the platform data dir without a HOME
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(PathBuf::from(home).join(".local").join("state").join("flick"))
        } else {
            ProjectDirs::from("", "", "flick").map(|pd| pd.data_local_dir().to_path_buf())
        }
    }

    pub fn db_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("scores.db"))
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("flick.log"))
    }

    pub fn config_path() -> PathBuf {
        match ProjectDirs::from("", "", "flick") {
            Some(pd) => pd.config_dir().join("config.json"),
            None => PathBuf::from("flick_config.json"),
        }
    }
}
