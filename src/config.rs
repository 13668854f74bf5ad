use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::grid::min_cell_size;

/// Largest playfield side accepted from config or flags
pub const MAX_PLAYFIELD_EXTENT: f64 = 100_000.0;

/// Inbound session parameters. Playfield units are abstract; the UI maps
/// them onto whatever surface it draws on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub session_duration_secs: f64,
    pub target_radius: f64,
    pub active_target_count: usize,
    pub grid_cell_size: f64,
    pub playfield_width: f64,
    pub playfield_height: f64,
    /// One-second steps shown before the clock starts
    pub countdown_ticks: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_duration_secs: 30.0,
            target_radius: 40.0,
            active_target_count: 3,
            grid_cell_size: 100.0,
            playfield_width: 1300.0,
            playfield_height: 650.0,
            countdown_ticks: 3,
        }
    }
}

impl SessionConfig {
    /// Replace unusable values with defaults. Never fails.
    pub fn validate(self) -> Self {
        let d = Self::default();
        let positive = |v: f64, fallback: f64| if v.is_finite() && v > 0.0 { v } else { fallback };
        let extent = |v: f64, fallback: f64| {
            let v = positive(v, fallback);
            if v > MAX_PLAYFIELD_EXTENT {
                fallback
            } else {
                v
            }
        };

        let playfield_width = extent(self.playfield_width, d.playfield_width);
        let playfield_height = extent(self.playfield_height, d.playfield_height);
        // keep the spawn grid bounded however fine the requested spacing
        let grid_cell_size = positive(self.grid_cell_size, d.grid_cell_size)
            .max(min_cell_size(playfield_width, playfield_height));

        Self {
            session_duration_secs: positive(self.session_duration_secs, d.session_duration_secs),
            target_radius: positive(self.target_radius, d.target_radius),
            active_target_count: self.active_target_count,
            grid_cell_size,
            playfield_width,
            playfield_height,
            countdown_ticks: self.countdown_ticks,
        }
    }
}

/// Everything persisted between runs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub player: String,
    pub session: SessionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player: "player".to_string(),
            session: SessionConfig::default(),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
