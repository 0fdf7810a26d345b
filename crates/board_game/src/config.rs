//! Game configuration
//!
//! One file, TOML or RON, with a section per concern. Every field has a
//! default so partial files are accepted.

use std::path::PathBuf;

use board_engine::board::{BehaviorTable, BoardLayout};
use board_engine::config::{CollisionConfig, Config, PhysicsConfig};
use board_engine::foundation::math::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Loop and logging settings
    pub engine: EngineSettings,

    /// Map file and board geometry
    pub board: BoardSettings,

    /// Body and collision tuning
    pub physics: PhysicsConfig,

    /// Power gauge settings
    pub power: PowerConfig,

    /// Follow camera settings
    pub camera: CameraConfig,

    /// Which motion model drives the player
    pub motion: MotionMode,
}

impl Config for GameConfig {}

/// Loop and logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Default log filter, overridden by `RUST_LOG`
    pub log_level: String,

    /// Simulation ticks per second
    pub tick_rate: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            tick_rate: 60,
        }
    }
}

/// Map file and board geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    /// ASCII map to load
    pub map_path: PathBuf,

    /// Empty margin around the tiles
    pub border: f32,

    /// World size the board is fitted into
    pub screen_size: Vec2,

    /// Map character to cell behaviors
    pub cells: BehaviorTable,
}

impl BoardSettings {
    /// Grid placement derived from border and screen size
    pub fn layout(&self) -> BoardLayout {
        BoardLayout::new(self.border, self.screen_size)
    }
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            map_path: PathBuf::from("resources/map/00.txt"),
            border: 10.0,
            screen_size: Vec2::new(800.0, 600.0),
            cells: BehaviorTable::default(),
        }
    }
}

/// Power gauge settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerConfig {
    /// Gauge growth per second while charging
    pub refill_rate: f32,

    /// Gauge cap
    pub max: f32,

    /// Gauge level after release
    pub min: f32,

    /// Power used for direction-key moves
    pub key_power: f32,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            refill_rate: 200.0,
            max: 100.0,
            min: 1.0,
            key_power: 20.0,
        }
    }
}

/// Follow camera settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Fraction of the remaining distance covered per second
    pub follow_rate: f32,

    /// Distance under which the camera does not move
    pub dead_zone: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            follow_rate: 5.0,
            dead_zone: 0.1,
        }
    }
}

/// Player motion model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionMode {
    /// Gravity, impulsion and tile collisions
    #[default]
    Ballistic,

    /// Fixed power budget bouncing off the board edges
    Power,
}

impl GameConfig {
    /// Collision tuning shortcut
    pub const fn collision(&self) -> &CollisionConfig {
        &self.physics.collision
    }
}
