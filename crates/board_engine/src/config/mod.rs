//! Configuration system
//!
//! Engine-side tuning structures plus the [`Config`] trait that loads and
//! saves any serde type as TOML or RON, picked by file extension.

use std::path::Path;

pub use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            ConfigFormat::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

#[derive(Debug, Clone, Copy)]
enum ConfigFormat {
    Toml,
    Ron,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Tuning for per-axis tile collision response
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Factor applied to downward speed on landing (negated, partial bounce)
    pub bounce_factor: f32,
    /// Vertical speed below which a landing body comes to rest
    pub rest_speed: f32,
    /// Horizontal damping applied while resting on a tile
    pub ground_damping: f32,
    /// Horizontal speed below which a resting body stops sliding
    pub rest_horizontal_speed: f32,
    /// Factor applied to horizontal speed when hitting a tile side
    pub wall_restitution: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            bounce_factor: 0.5,
            rest_speed: 50.0,
            ground_damping: 0.9,
            rest_horizontal_speed: 5.0,
            wall_restitution: 0.9,
        }
    }
}

/// Body and integrator tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Constant gravity, positive `y` points down the screen
    pub gravity: Vec3,
    /// Body radius in world units
    pub radius: f32,
    /// Factor the standing impulsion is multiplied by after each tick
    pub impulsion_decay: f32,
    /// Impulsion produced per unit of power by a `move-player` command
    pub impulse_scale: f32,
    /// Speed multiplier of the power-budget motion model
    pub power_speed: f32,
    /// Tile collision response
    pub collision: CollisionConfig,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, 500.0, 0.0),
            radius: 20.0,
            impulsion_decay: 0.2,
            impulse_scale: 100.0,
            power_speed: 12.0,
            collision: CollisionConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Sample {
        physics: PhysicsConfig,
    }

    impl Config for Sample {}

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("board_engine_{}_{name}", std::process::id()))
    }

    #[test]
    fn test_toml_round_trip() {
        let path = temp_path("round_trip.toml");
        let mut sample = Sample::default();
        sample.physics.radius = 12.5;
        sample.save_to_file(&path).unwrap();

        let loaded = Sample::load_from_file(&path).unwrap();
        assert_eq!(loaded, sample);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_ron_round_trip() {
        let path = temp_path("round_trip.ron");
        let sample = Sample::default();
        sample.save_to_file(&path).unwrap();
        assert_eq!(Sample::load_from_file(&path).unwrap(), sample);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let err = Sample::default().save_to_file(temp_path("config.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let sample: Sample = toml::from_str("[physics]\nradius = 8.0\n").unwrap();
        assert_eq!(sample.physics.radius, 8.0);
        assert_eq!(sample.physics.collision, CollisionConfig::default());
    }
}
