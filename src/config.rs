//! Game configuration.
//!
//! Every value has a default matching the classic arcade tuning, so an empty
//! (or missing) TOML file is a valid configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Env var naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "DRONE_SHOOTER_CONFIG";

/// Looked up in the working directory when the env var is unset.
pub const DEFAULT_CONFIG_FILE: &str = "drone_shooter.toml";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub canvas: CanvasConfig,
    pub rules: Rules,
    pub display: DisplayConfig,
    /// Root holding `images/` and `sounds/`.
    pub assets_dir: PathBuf,
    /// Log destination. The terminal is in raw mode, so stderr is a poor fit.
    pub log_file: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            rules: Rules::default(),
            display: DisplayConfig::default(),
            assets_dir: PathBuf::from("assets"),
            log_file: Some(PathBuf::from("drone_shooter.log")),
        }
    }
}

/// Logical drawing area in canvas pixels. All bounds checks use these.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
        }
    }
}

// ── Gameplay tuning ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Chance per frame that a drone enters from the right edge.
    pub drone_spawn_chance: f64,
    /// Score at which the boss appears.
    pub boss_score_threshold: u32,
    /// When false the boss appears at most once per game.
    pub boss_respawn: bool,
    pub max_player_bullets: usize,
    pub starting_lives: u32,
    pub starting_bombs: u32,
    pub max_bombs: u32,
    /// Hits the shield absorbs before it drops.
    pub shield_hits: u32,
    pub bomb_effect_frames: u32,
    pub explosion_frames: u32,
    /// Chance per frame that a shield or bomb pickup enters.
    pub powerup_chance: f64,
    pub drone_points: u32,
    pub boss_points: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            drone_spawn_chance: 0.02,
            boss_score_threshold: 100,
            boss_respawn: false,
            max_player_bullets: 10,
            starting_lives: 3,
            starting_bombs: 1,
            max_bombs: 3,
            shield_hits: 5,
            bomb_effect_frames: 30,
            explosion_frames: 12,
            powerup_chance: 0.002,
            drone_points: 10,
            boss_points: 50,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Target frame duration in milliseconds (16 ≈ 60 FPS).
    pub frame_ms: u64,
    /// Ring the terminal bell for hit and game-over cues when no audio
    /// device is available.
    pub bell: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            bell: false,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| GameError::Config {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text, path)
    }

    /// Resolve the config source: env var, then the default file, then
    /// built-in defaults. An env var pointing at a missing file is an error.
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::from_file(Path::new(&path));
        }
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            return Self::from_file(default_path);
        }
        Ok(Self::default())
    }
}
