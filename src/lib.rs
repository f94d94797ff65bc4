//! Tank Arena - simulation core for a diep.io-style arena shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, bot AI, collisions, progression)
//! - `config`: World configuration with JSON overrides
//! - `leaderboard`: Live score ranking for the HUD
//! - `error`: Configuration errors

pub mod config;
pub mod error;
pub mod leaderboard;
pub mod sim;

pub use config::WorldConfig;
pub use error::{ConfigError, ConfigResult};
pub use leaderboard::Leaderboard;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation rate used to convert wall-clock delays into ticks
    pub const TICKS_PER_SECOND: u64 = 60;

    /// World dimensions
    pub const WORLD_WIDTH: f32 = 4000.0;
    pub const WORLD_HEIGHT: f32 = 4000.0;

    /// Number of AI tanks in a default world
    pub const BOT_COUNT: usize = 8;

    /// Entity radii
    pub const TANK_RADIUS: f32 = 25.0;
    pub const BULLET_RADIUS: f32 = 5.0;
    /// Distance past the tank body where bullets appear
    pub const BARREL_OFFSET: f32 = 15.0;

    /// Progression caps
    pub const MAX_LEVEL: u32 = 45;
    pub const MAX_STAT_LEVEL: u8 = 7;
    /// Exp required for level 1 -> 2
    pub const BASE_EXP_TO_LEVEL: f32 = 100.0;
    /// Per-level growth of the exp curve; f64 because f32 1.1 is too coarse
    pub const EXP_GROWTH: f64 = 1.1;
    /// Exp awarded per level of a killed tank
    pub const KILL_EXP_PER_LEVEL: f32 = 20.0;

    /// Flat penetration lost when a bullet hits a tank
    pub const BULLET_TANK_PENETRATION_COST: f32 = 10.0;
    /// Flat damage a tank takes from ramming a shape
    pub const SHAPE_CONTACT_DAMAGE: f32 = 5.0;

    /// Shapes are replenished whenever fewer than this many remain
    pub const SHAPE_FLOOR: usize = 95;

    /// Respawn delays (3s player, 5s bots)
    pub const PLAYER_RESPAWN_TICKS: u64 = 3 * TICKS_PER_SECOND;
    pub const BOT_RESPAWN_TICKS: u64 = 5 * TICKS_PER_SECOND;

    /// Bot AI tuning
    pub const AI_PLAYER_RANGE: f32 = 600.0;
    pub const AI_BOT_PREFERENCE: f32 = 0.8;
    pub const AI_SHAPE_FALLBACK_BEYOND: f32 = 400.0;
    pub const AI_SHAPE_RANGE: f32 = 300.0;
    pub const AI_APPROACH_BEYOND: f32 = 250.0;
    pub const AI_RETREAT_WITHIN: f32 = 150.0;
    pub const AI_FIRE_CHANCE_PLAYER: f32 = 0.15;
    pub const AI_FIRE_CHANCE_OTHER: f32 = 0.12;
    pub const AI_WANDER_MIN_TICKS: f32 = 60.0;
    pub const AI_WANDER_SPAN_TICKS: f32 = 120.0;

    /// Joystick drag distance (pixels) that maps to full speed
    pub const JOYSTICK_MAX_DRAG: f32 = 60.0;
}

/// Unit vector pointing along `angle` (radians)
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle (radians) of the vector from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    delta.y.atan2(delta.x)
}

/// Clamp a circle's center so the whole circle stays inside `[0, size]`
#[inline]
pub fn clamp_to_bounds(pos: Vec2, radius: f32, size: Vec2) -> Vec2 {
    Vec2::new(
        pos.x.clamp(radius, (size.x - radius).max(radius)),
        pos.y.clamp(radius, (size.y - radius).max(radius)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_direction_is_unit() {
        for i in 0..16 {
            let angle = i as f32 * PI / 8.0;
            assert!((direction(angle).length() - 1.0).abs() < 1e-5);
        }
        let right = direction(0.0);
        assert!((right.x - 1.0).abs() < 1e-6 && right.y.abs() < 1e-6);
    }

    #[test]
    fn test_angle_between() {
        let angle = angle_between(Vec2::new(10.0, 10.0), Vec2::new(10.0, 20.0));
        assert!((angle - PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_clamp_to_bounds_keeps_body_inside() {
        let size = Vec2::new(4000.0, 4000.0);
        assert_eq!(
            clamp_to_bounds(Vec2::new(-50.0, 5000.0), 25.0, size),
            Vec2::new(25.0, 3975.0)
        );
        let inside = Vec2::new(100.0, 200.0);
        assert_eq!(clamp_to_bounds(inside, 25.0, size), inside);
    }
}
