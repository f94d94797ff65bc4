//! World configuration
//!
//! Every tunable the driver needs to build a [`World`](crate::sim::World).
//! Defaults mirror [`crate::consts`]; a JSON document only has to name the
//! fields it wants to change.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, ConfigResult};
use crate::sim::ShapeKind;

/// One tier of the shape batch spawned whenever the arena runs low
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeQuota {
    pub kind: ShapeKind,
    /// Shapes of this tier per batch
    pub count: usize,
    /// Collision radius (also the drawn size)
    pub size: f32,
    /// Exp granted on destruction; also the shape's starting health
    pub reward: f32,
}

impl ShapeQuota {
    pub const fn new(kind: ShapeKind, count: usize, size: f32, reward: f32) -> Self {
        Self {
            kind,
            count,
            size,
            reward,
        }
    }
}

/// The standard batch: 50 squares, 30 triangles, 15 pentagons
pub fn default_shape_batch() -> Vec<ShapeQuota> {
    vec![
        ShapeQuota::new(ShapeKind::Square, 50, 20.0, 10.0),
        ShapeQuota::new(ShapeKind::Triangle, 30, 25.0, 25.0),
        ShapeQuota::new(ShapeKind::Pentagon, 15, 35.0, 75.0),
    ]
}

/// Multipliers applied to bot base stats (bots are a little stronger)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotBonus {
    pub bullet_damage: f32,
    pub bullet_speed: f32,
    pub reload: f32,
}

impl Default for BotBonus {
    fn default() -> Self {
        Self {
            bullet_damage: 1.3,
            bullet_speed: 1.1,
            reload: 0.9,
        }
    }
}

impl BotBonus {
    /// No bonus at all; bots use the player's base stats
    pub fn none() -> Self {
        Self {
            bullet_damage: 1.0,
            bullet_speed: 1.0,
            reload: 1.0,
        }
    }
}

/// Explicit construction parameters for a world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// RNG seed; equal seeds and inputs give identical runs
    pub seed: u64,

    // === Arena ===
    pub world_width: f32,
    pub world_height: f32,

    // === Population ===
    pub bot_count: usize,
    pub bot_bonus: BotBonus,
    /// Replenish shapes when fewer than this many are alive
    pub shape_floor: usize,
    pub shape_batch: Vec<ShapeQuota>,

    // === Respawn ===
    pub player_respawn_ticks: u64,
    pub bot_respawn_ticks: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            bot_count: BOT_COUNT,
            bot_bonus: BotBonus::default(),
            shape_floor: SHAPE_FLOOR,
            shape_batch: default_shape_batch(),
            player_respawn_ticks: PLAYER_RESPAWN_TICKS,
            bot_respawn_ticks: BOT_RESPAWN_TICKS,
        }
    }
}

impl WorldConfig {
    /// Default configuration with the given seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// World dimensions as a vector
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.world_width, self.world_height)
    }

    /// Number of shapes in one replenishment batch
    pub fn batch_size(&self) -> usize {
        self.shape_batch.iter().map(|q| q.count).sum()
    }

    /// Parse and validate a JSON document. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!(
            "Loaded world config from {} ({} bots, seed {})",
            path.display(),
            config.bot_count,
            config.seed
        );
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> ConfigResult<()> {
        let min_side = TANK_RADIUS * 4.0;
        for (field, value) in [
            ("world_width", self.world_width),
            ("world_height", self.world_height),
        ] {
            if !value.is_finite() || value < min_side {
                return Err(ConfigError::Invalid {
                    field,
                    value: value as f64,
                    reason: "must be at least two tank diameters",
                });
            }
        }

        if self.shape_floor == 0 {
            return Err(ConfigError::Invalid {
                field: "shape_floor",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        if self.batch_size() == 0 {
            return Err(ConfigError::Invalid {
                field: "shape_batch",
                value: 0.0,
                reason: "a batch must spawn at least one shape",
            });
        }
        for quota in &self.shape_batch {
            if !(quota.size > 0.0) {
                return Err(ConfigError::Invalid {
                    field: "shape_batch.size",
                    value: quota.size as f64,
                    reason: "must be positive",
                });
            }
            if !(quota.reward > 0.0) {
                return Err(ConfigError::Invalid {
                    field: "shape_batch.reward",
                    value: quota.reward as f64,
                    reason: "must be positive",
                });
            }
        }

        for (field, value) in [
            ("bot_bonus.bullet_damage", self.bot_bonus.bullet_damage),
            ("bot_bonus.bullet_speed", self.bot_bonus.bullet_speed),
            ("bot_bonus.reload", self.bot_bonus.reload),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::Invalid {
                    field,
                    value: value as f64,
                    reason: "multiplier must be positive",
                });
            }
        }

        Ok(())
    }
}
