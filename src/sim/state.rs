//! World state and passive entity types
//!
//! All state that must survive a serialize/restore round lives here.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::tank::{Role, Tank};
use crate::config::{ShapeQuota, WorldConfig};
use crate::consts::*;
use crate::error::ConfigResult;
use crate::{clamp_to_bounds, direction};

/// Packed `0xRRGGBB` color
pub type Rgb = u32;

pub const PLAYER_COLOR: Rgb = 0x4A90E2;
pub const BOT_COLOR: Rgb = 0xE74C3C;

/// CSS hex form of a packed color (`#4A90E2`)
pub fn css_color(color: Rgb) -> String {
    format!("#{:06X}", color & 0xFF_FFFF)
}

/// Stable handle to a tank slot. Tanks are never removed, only marked dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TankId(pub u32);

impl TankId {
    /// The player always occupies the first slot
    pub const PLAYER: TankId = TankId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    /// Remaining penetration; the bullet is spent at zero or below
    pub penetration: f32,
    /// Firing tank (non-owning handle)
    pub owner: TankId,
}

impl Bullet {
    /// Advance one tick
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    pub fn is_spent(&self) -> bool {
        self.penetration <= 0.0
    }

    /// Inside `[0, size]` on both axes (edges count as inside)
    pub fn in_bounds(&self, size: Vec2) -> bool {
        self.pos.x >= 0.0 && self.pos.x <= size.x && self.pos.y >= 0.0 && self.pos.y <= size.y
    }
}

/// Shape geometry families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Square,
    Triangle,
    Pentagon,
}

impl ShapeKind {
    pub fn vertex_count(self) -> usize {
        match self {
            ShapeKind::Square => 4,
            ShapeKind::Triangle => 3,
            ShapeKind::Pentagon => 5,
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            ShapeKind::Square => 0xFFD700,
            ShapeKind::Triangle => 0xFF6B6B,
            ShapeKind::Pentagon => 0xFF69B4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Square => "square",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Pentagon => "pentagon",
        }
    }

    /// Polygon vertices in world space for a shape of `size` at `center`
    pub fn outline(self, center: Vec2, size: f32, rotation: f32) -> Vec<Vec2> {
        let rot = direction(rotation);
        let local: Vec<Vec2> = match self {
            // Axis-aligned square of side `size` before rotation
            ShapeKind::Square => {
                let h = size / 2.0;
                vec![
                    Vec2::new(-h, -h),
                    Vec2::new(h, -h),
                    Vec2::new(h, h),
                    Vec2::new(-h, h),
                ]
            }
            ShapeKind::Triangle | ShapeKind::Pentagon => {
                let n = self.vertex_count();
                (0..n)
                    .map(|i| {
                        let angle = i as f32 * std::f32::consts::TAU / n as f32
                            - std::f32::consts::FRAC_PI_2;
                        direction(angle) * size
                    })
                    .collect()
            }
        };
        local.into_iter().map(|v| center + rot.rotate(v)).collect()
    }
}

/// A destructible shape that yields exp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    pub id: u32,
    pub kind: ShapeKind,
    pub pos: Vec2,
    /// Collision radius and drawn size
    pub radius: f32,
    pub color: Rgb,
    pub health: f32,
    pub max_health: f32,
    /// Exp granted to whoever destroys it
    pub exp: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
}

impl Shape {
    pub fn new(id: u32, quota: &ShapeQuota, pos: Vec2) -> Self {
        Self {
            id,
            kind: quota.kind,
            pos,
            radius: quota.size,
            color: quota.kind.color(),
            health: quota.reward,
            max_health: quota.reward,
            exp: quota.reward,
            rotation: 0.0,
            rotation_speed: 0.0,
        }
    }

    /// Spin (cosmetic only)
    pub fn rotate(&mut self) {
        self.rotation = (self.rotation + self.rotation_speed).rem_euclid(std::f32::consts::TAU);
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0.0
    }

    pub fn outline(&self) -> Vec<Vec2> {
        self.kind.outline(self.pos, self.radius, self.rotation)
    }
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    TankKilled {
        victim: TankId,
        /// `None` when the tank died ramming a shape
        killer: Option<TankId>,
        victim_level: u32,
    },
    LevelUp {
        tank: TankId,
        level: u32,
    },
    Respawned {
        tank: TankId,
    },
    ShapeDestroyed {
        by: TankId,
        kind: ShapeKind,
        exp: f32,
    },
    ShapesSpawned {
        count: usize,
    },
}

/// A respawn waiting for its tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRespawn {
    pub tank: TankId,
    pub due_tick: u64,
}

/// Deferred respawns, processed at tick boundaries. At most one per tank.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RespawnQueue {
    pending: Vec<PendingRespawn>,
}

impl RespawnQueue {
    /// Schedule a respawn, replacing any pending one for the same tank
    pub fn schedule(&mut self, tank: TankId, due_tick: u64) {
        self.pending.retain(|p| p.tank != tank);
        self.pending.push(PendingRespawn { tank, due_tick });
    }

    /// Remove and return every respawn due at or before `now`, earliest first
    pub fn take_due(&mut self, now: u64) -> Vec<TankId> {
        let mut due: Vec<PendingRespawn> = Vec::new();
        self.pending.retain(|p| {
            if p.due_tick <= now {
                due.push(*p);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|p| (p.due_tick, p.tank));
        due.into_iter().map(|p| p.tank).collect()
    }

    pub fn due_tick(&self, tank: TankId) -> Option<u64> {
        self.pending.iter().find(|p| p.tank == tank).map(|p| p.due_tick)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub config: WorldConfig,
    /// Seeded RNG; the only randomness source in the simulation
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Tank slots; the player is slot 0, bots follow. Never empty: restoring
    /// a world without a player in slot 0 fails to deserialize.
    #[serde(deserialize_with = "deserialize_tanks")]
    pub tanks: Vec<Tank>,
    /// Live bullets (in firing order)
    pub bullets: Vec<Bullet>,
    /// Live shapes (in spawn order)
    pub shapes: Vec<Shape>,
    pub respawns: RespawnQueue,
    /// Camera center for renderers (not gameplay state)
    #[serde(skip)]
    pub camera: Vec2,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next bullet/shape ID
    next_id: u32,
}

/// Tank slots must start with the player so `World::player` always resolves
fn deserialize_tanks<'de, D>(deserializer: D) -> Result<Vec<Tank>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let tanks = Vec::<Tank>::deserialize(deserializer)?;
    match tanks.first() {
        Some(first) if first.is_player() && first.id == TankId::PLAYER => Ok(tanks),
        _ => Err(serde::de::Error::custom(
            "tank slot 0 must hold the player",
        )),
    }
}

impl World {
    /// Build a world: player at the center, bots scattered, one shape batch.
    /// The config is trusted; use [`World::try_new`] for external configs.
    pub fn new(config: WorldConfig) -> Self {
        let size = config.world_size();
        let mut world = Self {
            rng: Pcg32::seed_from_u64(config.seed),
            config,
            time_ticks: 0,
            tanks: Vec::new(),
            bullets: Vec::new(),
            shapes: Vec::new(),
            respawns: RespawnQueue::default(),
            camera: size / 2.0,
            events: Vec::new(),
            next_id: 1,
        };

        world.tanks.push(Tank::new(
            TankId::PLAYER,
            "Player",
            Role::Player,
            size / 2.0,
            super::stats::StatBlock::base(),
        ));

        let bot_base = world.bot_base_stats();
        for i in 0..world.config.bot_count {
            let id = TankId(world.tanks.len() as u32);
            let pos = world.random_position(TANK_RADIUS);
            world.tanks.push(Tank::new(
                id,
                &format!("Bot {}", i + 1),
                Role::Bot,
                pos,
                bot_base,
            ));
        }

        world.spawn_shape_batch();
        log::info!(
            "World {}x{} ready: {} bots, {} shapes, seed {}",
            size.x,
            size.y,
            world.config.bot_count,
            world.shapes.len(),
            world.config.seed
        );
        world
    }

    /// Validate the config, then build the world
    pub fn try_new(config: WorldConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Bot base stats: the shared base with the configured bonus folded in
    fn bot_base_stats(&self) -> super::stats::StatBlock {
        use super::stats::{StatBlock, StatKind};
        let bonus = self.config.bot_bonus;
        let mut base = StatBlock::base();
        base[StatKind::BulletDamage] *= bonus.bullet_damage;
        base[StatKind::BulletSpeed] *= bonus.bullet_speed;
        base[StatKind::Reload] *= bonus.reload;
        base
    }

    pub fn size(&self) -> Vec2 {
        self.config.world_size()
    }

    /// Allocate a new bullet/shape ID. Wraps after `u32::MAX`; IDs only need
    /// to be unique among live entities.
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub fn player(&self) -> &Tank {
        &self.tanks[TankId::PLAYER.index()]
    }

    pub fn player_mut(&mut self) -> &mut Tank {
        &mut self.tanks[TankId::PLAYER.index()]
    }

    /// Lookup by handle; `None` for stale handles
    pub fn tank(&self, id: TankId) -> Option<&Tank> {
        self.tanks.get(id.index())
    }

    pub fn tank_mut(&mut self, id: TankId) -> Option<&mut Tank> {
        self.tanks.get_mut(id.index())
    }

    pub fn bots(&self) -> impl Iterator<Item = &Tank> {
        self.tanks.iter().filter(|t| !t.is_player())
    }

    /// Uniform position keeping a circle of `radius` inside the world
    pub fn random_position(&mut self, radius: f32) -> Vec2 {
        let size = self.size();
        let pos = Vec2::new(
            self.rng.random::<f32>() * size.x,
            self.rng.random::<f32>() * size.y,
        );
        clamp_to_bounds(pos, radius, size)
    }

    /// Push a bullet, assigning its ID
    pub fn spawn_bullet(&mut self, mut bullet: Bullet) {
        bullet.id = self.next_entity_id();
        self.bullets.push(bullet);
    }

    /// Spawn one full batch of every configured shape tier
    pub fn spawn_shape_batch(&mut self) {
        let size = self.size();
        let batch = self.config.shape_batch.clone();
        let mut count = 0;
        for quota in &batch {
            for _ in 0..quota.count {
                let pos = Vec2::new(
                    self.rng.random::<f32>() * size.x,
                    self.rng.random::<f32>() * size.y,
                );
                let id = self.next_entity_id();
                let mut shape = Shape::new(id, quota, pos);
                shape.rotation = self.rng.random::<f32>() * std::f32::consts::TAU;
                shape.rotation_speed = (self.rng.random::<f32>() - 0.5) * 0.02;
                self.shapes.push(shape);
                count += 1;
            }
        }
        log::debug!("Spawned {} shapes ({} alive)", count, self.shapes.len());
        self.events.push(GameEvent::ShapesSpawned { count });
    }

    /// Grant exp to a tank, recording level-ups. Stale handles are skipped.
    pub fn award_exp(&mut self, id: TankId, amount: f32) {
        let Some(tank) = self.tanks.get_mut(id.index()) else {
            log::warn!("Exp award to unknown tank {:?} dropped", id);
            return;
        };
        let before = tank.level;
        let gained = tank.add_exp(amount, &mut self.rng);
        if gained > 0 {
            for level in before + 1..=tank.level {
                self.events.push(GameEvent::LevelUp { tank: id, level });
            }
            if tank.is_player() {
                log::info!(
                    "Player reached level {} ({} upgrade points)",
                    tank.level,
                    tank.upgrade_points
                );
            }
        }
    }

    /// Record a death and queue the respawn for the victim's role
    pub fn handle_death(&mut self, victim: TankId, killer: Option<TankId>) {
        let Some(tank) = self.tanks.get(victim.index()) else {
            return;
        };
        let victim_level = tank.level;
        let delay = match tank.role {
            Role::Player => self.config.player_respawn_ticks,
            Role::Bot => self.config.bot_respawn_ticks,
        };
        let killer_name = killer
            .and_then(|k| self.tank(k))
            .map(|t| t.name.as_str())
            .unwrap_or("a shape");
        if tank.is_player() {
            log::info!(
                "Player killed by {} at level {} (score {})",
                killer_name,
                victim_level,
                tank.score.floor()
            );
        } else {
            log::debug!("{} killed by {}", tank.name, killer_name);
        }

        self.respawns.schedule(victim, self.time_ticks + delay);
        self.events.push(GameEvent::TankKilled {
            victim,
            killer,
            victim_level,
        });
    }

    /// Bring a tank back at a random spot. The player also loses all progress.
    pub fn respawn_tank(&mut self, id: TankId) {
        if self.tank(id).is_none() {
            log::warn!("Dropping respawn for unknown tank {:?}", id);
            return;
        }
        let pos = self.random_position(TANK_RADIUS);
        let tank = &mut self.tanks[id.index()];
        if tank.is_player() {
            tank.reset_progress();
        }
        tank.respawn(pos);
        log::debug!("{} respawned at ({:.0}, {:.0})", tank.name, pos.x, pos.y);
        self.events.push(GameEvent::Respawned { tank: id });
    }

    /// Take all events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spend one player upgrade point. Invalid requests are ignored.
    pub fn upgrade_player(&mut self, stat: super::stats::StatKind) -> bool {
        self.player_mut().upgrade(stat)
    }

    /// String-keyed upgrade entry point for UIs; unknown keys are a no-op
    pub fn upgrade_player_by_key(&mut self, key: &str) -> bool {
        self.player_mut().upgrade_by_key(key)
    }
}
