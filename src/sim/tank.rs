//! Tanks: movement, firing, health
//!
//! Progression (exp, levels, upgrades) lives in [`super::progression`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{BOT_COLOR, Bullet, PLAYER_COLOR, Rgb, TankId};
use super::stats::{StatBlock, UpgradeLevels};
use crate::consts::*;
use crate::direction;

/// Who drives the tank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Player,
    Bot,
}

/// Something an AI tank is aiming at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    Tank(TankId),
    Shape(u32),
}

/// AI scratch state (unused while the player is driven by input)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiState {
    pub target: Option<Target>,
    /// Current wander direction (magnitude <= 1)
    pub direction: Vec2,
    /// Ticks until the wander direction is re-rolled
    pub retarget_timer: f32,
}

/// A player or bot tank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tank {
    pub id: TankId,
    pub name: String,
    pub role: Role,
    pub color: Rgb,
    pub pos: Vec2,
    pub radius: f32,
    /// Facing angle (radians)
    pub angle: f32,
    pub alive: bool,

    pub level: u32,
    /// Exp toward the next level
    pub exp: f32,
    /// Total exp earned; only the player's is ever reset
    pub score: f32,
    pub exp_to_next_level: f32,
    pub upgrade_points: u32,
    pub upgrade_levels: UpgradeLevels,
    pub base_stats: StatBlock,
    /// Always `base_stats.upgraded(&upgrade_levels)`
    pub stats: StatBlock,

    pub health: f32,
    /// Ticks until the next shot; only counts down on fire attempts
    pub shoot_cooldown: f32,

    pub ai: AiState,
}

impl Tank {
    pub fn new(id: TankId, name: &str, role: Role, pos: Vec2, base_stats: StatBlock) -> Self {
        let color = match role {
            Role::Player => PLAYER_COLOR,
            Role::Bot => BOT_COLOR,
        };
        Self {
            id,
            name: name.to_string(),
            role,
            color,
            pos,
            radius: TANK_RADIUS,
            angle: 0.0,
            alive: true,
            level: 1,
            exp: 0.0,
            score: 0.0,
            exp_to_next_level: BASE_EXP_TO_LEVEL,
            upgrade_points: 0,
            upgrade_levels: UpgradeLevels::default(),
            base_stats,
            stats: base_stats,
            health: base_stats.max_health(),
            shoot_cooldown: 0.0,
            ai: AiState::default(),
        }
    }

    pub fn is_player(&self) -> bool {
        self.role == Role::Player
    }

    /// Move along a direction of magnitude <= 1, scaled by move speed.
    /// Bounds are the caller's concern.
    pub fn move_by(&mut self, dir: Vec2) {
        self.pos += dir * self.stats.move_speed();
    }

    /// Fire if the cooldown has elapsed; otherwise tick the cooldown down.
    /// The returned bullet has no ID yet (see `World::spawn_bullet`).
    pub fn shoot(&mut self) -> Option<Bullet> {
        if self.shoot_cooldown <= 0.0 {
            self.shoot_cooldown = self.stats.reload();
            let facing = direction(self.angle);
            return Some(Bullet {
                id: 0,
                pos: self.pos + facing * (self.radius + BARREL_OFFSET),
                vel: facing * self.stats.bullet_speed(),
                radius: BULLET_RADIUS,
                damage: self.stats.bullet_damage(),
                penetration: self.stats.bullet_penetration(),
                owner: self.id,
            });
        }
        self.shoot_cooldown -= 1.0;
        None
    }

    /// Heal toward max health without overshooting. Dead tanks stay at zero.
    pub fn regenerate(&mut self) {
        if self.alive && self.health < self.stats.max_health() {
            self.health = (self.health + self.stats.health_regen()).min(self.stats.max_health());
        }
    }

    /// Apply damage. Returns true only on the alive -> dead transition.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.alive {
            return false;
        }
        self.health -= amount;
        if self.health <= 0.0 {
            self.health = 0.0;
            self.alive = false;
            return true;
        }
        false
    }

    /// Return to play at `pos` with full health
    pub fn respawn(&mut self, pos: Vec2) {
        self.pos = pos;
        self.health = self.stats.max_health();
        self.alive = true;
        self.shoot_cooldown = 0.0;
        self.ai.target = None;
    }

    pub fn health_fraction(&self) -> f32 {
        (self.health / self.stats.max_health()).clamp(0.0, 1.0)
    }
}
