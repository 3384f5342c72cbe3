//! Editor configuration
//!
//! Read from a RON file (`raymap.ron` by default, or `RAYMAP_CONFIG`).
//! Every field has a default, so the file may list only what it changes
//! and a missing file is not an error.

use std::fmt;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Default config file name
pub const CONFIG_FILE: &str = "raymap.ron";

/// Environment variable overriding the config path
pub const CONFIG_ENV: &str = "RAYMAP_CONFIG";

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::Parse(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub window_width: i32,
    pub window_height: i32,
    /// Side of the square area the map is fitted into, in pixels
    pub grid_view_size: f32,
    /// Fixed tick length
    pub tick_interval_ms: u64,
    /// How often the console thread checks for shutdown
    pub console_poll_ms: u64,
    /// Directory map and entity files are resolved against
    pub data_dir: String,
    /// Map loaded at startup and written at shutdown
    pub default_map_file: String,
    /// Size of a new map when nothing can be loaded
    pub default_width: i32,
    pub default_height: i32,
    /// Tile textures; cell value `n` draws `tile_textures[n - 1]`
    pub tile_textures: Vec<String>,
    /// Entity textures, one per entity kind in wire order
    pub entity_textures: Vec<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            window_width: 1000,
            window_height: 700,
            grid_view_size: 700.0,
            tick_interval_ms: 16,
            console_poll_ms: 100,
            data_dir: ".".to_string(),
            default_map_file: "map.dat".to_string(),
            default_width: 16,
            default_height: 16,
            tile_textures: [
                "texture-1.png",
                "texture-2.png",
                "texture-3.png",
                "texture-4.png",
                "texture-5.png",
                "texture-6.png",
                "safeDoor.png",
                "brickWall.png",
                "crackedBrickWall.png",
                "tiledFloor.png",
                "blueBrickWall.png",
                "crackedBlueBrickWall.png",
                "carpet.png",
                "tiledCeiling.png",
            ]
            .iter()
            .map(|name| format!("textures/{}", name))
            .collect(),
            entity_textures: [
                "key.png",
                "bomb.png",
                "enemy.png",
                "enemy.png",
                "bullet.png",
                "bullet.png",
                "coin.png",
            ]
            .iter()
            .map(|name| format!("textures/{}", name))
            .collect(),
        }
    }
}

impl EditorConfig {
    /// Parse a config from RON text
    pub fn from_ron(contents: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(contents)?)
    }

    /// Read a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    /// Resolve the config path (explicit, then env, then default) and load
    /// it. Falls back to defaults when the file is missing or invalid.
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        let env_path = std::env::var(CONFIG_ENV).ok().filter(|s| !s.is_empty());
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env_path.map(Into::into))
            .unwrap_or_else(|| CONFIG_FILE.into());

        match Self::load(&path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!("Failed to load {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}
