//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one call to [`tick`] per frame)
//! - Seeded RNG only (`World::rng`)
//! - Stable iteration order (tank slots, then spawn order)
//! - No rendering or platform dependencies

pub mod ai;
pub mod collision;
pub mod input;
pub mod progression;
pub mod snapshot;
pub mod state;
pub mod stats;
pub mod tank;
pub mod tick;

pub use ai::{TargetChoice, blend_direction, select_target};
pub use collision::{circles_overlap, resolve_collisions};
pub use input::{JoystickDrag, KeyState, RawInput, aim_angle, movement_from_keys};
pub use progression::exp_for_level;
pub use snapshot::{
    BulletView, DeathScreen, HudSnapshot, RenderSnapshot, ShapeView, StatBar, TankView,
};
pub use state::{
    BOT_COLOR, Bullet, GameEvent, PLAYER_COLOR, PendingRespawn, RespawnQueue, Rgb, Shape,
    ShapeKind, TankId, World, css_color,
};
pub use stats::{STAT_COUNT, StatBlock, StatKind, UpgradeLevels};
pub use tank::{AiState, Role, Tank, Target};
pub use tick::{TickInput, tick};
