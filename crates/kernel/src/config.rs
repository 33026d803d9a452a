use std::path::Path;

use blockcraft_common::ConfigError;
use blockcraft_terrain::TerrainConfig;
use serde::{Deserialize, Serialize};

/// Player body and motion constants. Speeds are per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Half-width of the player's box on X and Z.
    pub radius: f32,
    pub height: f32,
    /// Camera height above the feet.
    pub eye_height: f32,
    pub speed: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    /// Tallest obstacle the player walks onto without jumping. Zero disables
    /// stepping, so a one-block ledge needs a jump.
    pub step_height: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radius: 0.35,
            height: 1.75,
            eye_height: 1.6,
            speed: 0.09,
            gravity: 0.012,
            jump_impulse: 0.28,
            step_height: 0.0,
        }
    }
}

impl PlayerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_positive("player.radius", self.radius)?;
        ConfigError::require_positive("player.height", self.height)?;
        ConfigError::require_positive("player.speed", self.speed)?;
        ConfigError::require_positive("player.gravity", self.gravity)?;
        ConfigError::require_positive("player.jump_impulse", self.jump_impulse)?;
        ConfigError::require_finite("player.eye_height", self.eye_height)?;
        ConfigError::require_finite("player.step_height", self.step_height)?;
        if self.step_height < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "player.step_height",
                reason: format!("expected >= 0, got {}", self.step_height),
            });
        }
        if self.eye_height > self.height {
            return Err(ConfigError::OutOfRange {
                field: "player.eye_height",
                reason: format!(
                    "eye at {} is above the top of a {}-tall body",
                    self.eye_height, self.height
                ),
            });
        }
        Ok(())
    }
}

/// Full simulation configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub player: PlayerConfig,
    pub terrain: TerrainConfig,
    pub interaction: InteractionConfig,
    pub spawn: SpawnConfig,
}

/// Pointer picking limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Maximum distance from the eye at which blocks and terrain are picked.
    pub reach: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self { reach: 12.0 }
    }
}

/// Where the player starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub x: f32,
    pub z: f32,
    /// Drop height above the terrain surface.
    pub clearance: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            x: 0.0,
            z: 20.0,
            clearance: 2.0,
        }
    }
}

/// Failure to load a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum LoadConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(#[from] ConfigError),
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.player.validate()?;
        self.terrain.validate()?;
        ConfigError::require_positive("interaction.reach", self.interaction.reach)?;
        ConfigError::require_finite("spawn.x", self.spawn.x)?;
        ConfigError::require_finite("spawn.z", self.spawn.z)?;
        ConfigError::require_finite("spawn.clearance", self.spawn.clearance)?;
        Ok(())
    }

    /// Parse YAML and validate. Missing keys take their defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, LoadConfigError> {
        let config: SimConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml_str(&text)?;
        tracing::info!(path = %path.as_ref().display(), "loaded config");
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, LoadConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}
