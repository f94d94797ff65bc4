//! Fixed-step simulation tick
//!
//! One call advances the world by one frame. Order: due respawns, player,
//! bots, bullets and shapes, collisions, camera, shape replenishment.

use glam::Vec2;

use super::ai;
use super::collision::resolve_collisions;
use super::state::{TankId, World};
use crate::clamp_to_bounds;

/// Player commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Movement direction, magnitude <= 1 (longer vectors are normalized)
    pub movement: Vec2,
    /// World-space aim angle; `None` keeps the current facing
    pub aim_angle: Option<f32>,
    /// Fire held this tick
    pub fire: bool,
    /// Demo mode - the bot AI drives the player
    pub autopilot: bool,
}

/// Advance the world by one tick
pub fn tick(world: &mut World, input: &TickInput) {
    world.time_ticks += 1;

    for id in world.respawns.take_due(world.time_ticks) {
        world.respawn_tank(id);
    }

    if world.player().alive {
        if input.autopilot {
            ai::update_tank(world, TankId::PLAYER);
        } else {
            update_player(world, input);
        }
    }

    for i in 1..world.tanks.len() {
        ai::update_tank(world, TankId(i as u32));
    }

    let size = world.size();
    for bullet in &mut world.bullets {
        bullet.advance();
    }
    world
        .bullets
        .retain(|b| b.in_bounds(size) && !b.is_spent());
    for shape in &mut world.shapes {
        shape.rotate();
    }

    resolve_collisions(world);

    world.camera = world.player().pos;

    if world.shapes.len() < world.config.shape_floor {
        world.spawn_shape_batch();
    }
}

/// Apply direct player input: move, aim, fire, regenerate, clamp
fn update_player(world: &mut World, input: &TickInput) {
    let size = world.size();
    let movement = if !input.movement.is_finite() {
        Vec2::ZERO
    } else if input.movement.length_squared() > 1.0 {
        input.movement.normalize()
    } else {
        input.movement
    };

    let player = world.player_mut();
    player.move_by(movement);
    if let Some(angle) = input.aim_angle.filter(|a| a.is_finite()) {
        player.angle = angle;
    }
    let bullet = if input.fire { player.shoot() } else { None };
    player.regenerate();
    player.pos = clamp_to_bounds(player.pos, player.radius, size);

    if let Some(bullet) = bullet {
        world.spawn_bullet(bullet);
    }
}
