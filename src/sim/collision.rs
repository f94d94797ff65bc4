//! Collision detection and combat resolution
//!
//! Everything in the arena is a circle. Three passes run in a fixed order
//! each tick: bullets vs shapes, bullets vs tanks, tank bodies vs shapes.
//! Damage from every pass lands in the same tick.

use glam::Vec2;

use super::state::{GameEvent, TankId, World};
use crate::consts::*;

/// Strict circle overlap: touching circles do not collide
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance(b) < a_radius + b_radius
}

/// Run all three combat passes
pub fn resolve_collisions(world: &mut World) {
    bullets_vs_shapes(world);
    bullets_vs_tanks(world);
    tanks_vs_shapes(world);
}

/// Bullets chip shapes; penetration drops by the shape's remaining health.
/// A bullet keeps going through every shape it overlaps this pass.
pub fn bullets_vs_shapes(world: &mut World) {
    for b in 0..world.bullets.len() {
        let mut s = 0;
        while s < world.shapes.len() {
            let bullet = &mut world.bullets[b];
            let shape = &mut world.shapes[s];
            if !circles_overlap(bullet.pos, bullet.radius, shape.pos, shape.radius) {
                s += 1;
                continue;
            }

            shape.health -= bullet.damage;
            bullet.penetration -= shape.health;

            if shape.is_destroyed() {
                let owner = bullet.owner;
                let shape = world.shapes.remove(s);
                world.events.push(GameEvent::ShapeDestroyed {
                    by: owner,
                    kind: shape.kind,
                    exp: shape.exp,
                });
                world.award_exp(owner, shape.exp);
                continue;
            }
            s += 1;
        }
    }
}

/// Bullets hit every alive tank except their owner
pub fn bullets_vs_tanks(world: &mut World) {
    for b in 0..world.bullets.len() {
        for t in 0..world.tanks.len() {
            let bullet = &mut world.bullets[b];
            let tank = &mut world.tanks[t];
            if !tank.alive || tank.id == bullet.owner {
                continue;
            }
            if !circles_overlap(bullet.pos, bullet.radius, tank.pos, tank.radius) {
                continue;
            }

            let died = tank.take_damage(bullet.damage);
            bullet.penetration -= BULLET_TANK_PENETRATION_COST;

            if died {
                let victim = tank.id;
                let reward = tank.level as f32 * KILL_EXP_PER_LEVEL;
                let killer = bullet.owner;
                world.handle_death(victim, Some(killer));
                world.award_exp(killer, reward);
            }
        }
    }
}

/// Ramming: shapes take body damage, tanks take a flat hit
pub fn tanks_vs_shapes(world: &mut World) {
    for t in 0..world.tanks.len() {
        let id = TankId(t as u32);
        let mut s = 0;
        while s < world.shapes.len() {
            let tank = &mut world.tanks[t];
            if !tank.alive {
                break;
            }
            let shape = &mut world.shapes[s];
            if !circles_overlap(tank.pos, tank.radius, shape.pos, shape.radius) {
                s += 1;
                continue;
            }

            shape.health -= tank.stats.body_damage();
            let died = tank.take_damage(SHAPE_CONTACT_DAMAGE);
            let destroyed = shape.is_destroyed();

            if died {
                world.handle_death(id, None);
            }
            if destroyed {
                let shape = world.shapes.remove(s);
                world.events.push(GameEvent::ShapeDestroyed {
                    by: id,
                    kind: shape.kind,
                    exp: shape.exp,
                });
                world.award_exp(id, shape.exp);
                continue;
            }
            s += 1;
        }
    }
}
