//! Bot decision making
//!
//! Each alive bot runs one step per tick: refresh the wander direction, pick
//! a target, aim and maybe fire, blend movement, move, clamp, regenerate.
//! The same step drives the player in autopilot mode.

use glam::Vec2;
use rand::Rng;

use super::state::{Shape, TankId, World};
use super::tank::{Target, Tank};
use crate::consts::*;
use crate::{angle_between, clamp_to_bounds};

/// A chosen target with its position and distance at decision time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetChoice {
    pub target: Target,
    pub pos: Vec2,
    pub distance: f32,
}

/// Pick a target for tank `me`.
///
/// Priority: the player within range sets the initial threshold, other bots
/// must be clearly closer (`AI_BOT_PREFERENCE`), and shapes are a fallback
/// when nothing was found or the pick is far away.
pub fn select_target(tanks: &[Tank], shapes: &[Shape], me: TankId) -> Option<TargetChoice> {
    let this = tanks.get(me.index())?;
    let origin = this.pos;

    let mut best: Option<TargetChoice> = None;
    let mut closest = AI_PLAYER_RANGE;

    if !this.is_player() {
        if let Some(player) = tanks.iter().find(|t| t.is_player() && t.alive) {
            let distance = origin.distance(player.pos);
            if distance < closest {
                closest = distance;
                best = Some(TargetChoice {
                    target: Target::Tank(player.id),
                    pos: player.pos,
                    distance,
                });
            }
        }
    }

    for other in tanks {
        if other.is_player() || other.id == me || !other.alive {
            continue;
        }
        let distance = origin.distance(other.pos);
        if distance < closest * AI_BOT_PREFERENCE {
            closest = distance;
            best = Some(TargetChoice {
                target: Target::Tank(other.id),
                pos: other.pos,
                distance,
            });
        }
    }

    if best.is_none() || closest > AI_SHAPE_FALLBACK_BEYOND {
        let nearest_shape = shapes
            .iter()
            .map(|s| (s, origin.distance(s.pos)))
            .filter(|(_, d)| *d < AI_SHAPE_RANGE)
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((shape, distance)) = nearest_shape {
            best = Some(TargetChoice {
                target: Target::Shape(shape.id),
                pos: shape.pos,
                distance,
            });
        }
    }

    best
}

/// Blend the wander direction with approach/retreat relative to the target
pub fn blend_direction(current: Vec2, origin: Vec2, choice: &TargetChoice) -> Vec2 {
    if choice.distance <= 0.0 {
        return current;
    }
    let toward = (choice.pos - origin) / choice.distance;
    if choice.distance > AI_APPROACH_BEYOND {
        toward * 0.7 + current * 0.3
    } else if choice.distance < AI_RETREAT_WITHIN {
        -toward * 0.5 + current * 0.5
    } else {
        current
    }
}

/// Random unit vector (zero if the roll lands exactly on the origin)
fn random_direction<R: Rng>(rng: &mut R) -> Vec2 {
    let raw = Vec2::new(
        (rng.random::<f32>() - 0.5) * 2.0,
        (rng.random::<f32>() - 0.5) * 2.0,
    );
    raw.normalize_or_zero()
}

/// Run one AI step for tank `id`. Dead or unknown tanks are skipped.
pub fn update_tank(world: &mut World, id: TankId) {
    let size = world.size();
    let Some(tank) = world.tanks.get(id.index()) else {
        return;
    };
    if !tank.alive {
        return;
    }
    let origin = tank.pos;
    let mut ai = tank.ai.clone();

    // Wander direction refresh
    ai.retarget_timer -= 1.0;
    if ai.retarget_timer <= 0.0 {
        ai.direction = random_direction(&mut world.rng);
        ai.retarget_timer = AI_WANDER_MIN_TICKS + world.rng.random::<f32>() * AI_WANDER_SPAN_TICKS;
    }

    let choice = select_target(&world.tanks, &world.shapes, id);
    ai.target = choice.map(|c| c.target);

    let mut angle = None;
    let mut wants_fire = false;
    if let Some(choice) = &choice {
        angle = Some(angle_between(origin, choice.pos));
        let fire_chance = if choice.target == Target::Tank(TankId::PLAYER) {
            AI_FIRE_CHANCE_PLAYER
        } else {
            AI_FIRE_CHANCE_OTHER
        };
        wants_fire = world.rng.random::<f32>() < fire_chance;
        ai.direction = blend_direction(ai.direction, origin, choice);
    }

    let tank = &mut world.tanks[id.index()];
    if let Some(angle) = angle {
        tank.angle = angle;
    }
    let bullet = if wants_fire { tank.shoot() } else { None };
    tank.move_by(ai.direction);
    tank.pos = clamp_to_bounds(tank.pos, tank.radius, size);
    tank.regenerate();
    tank.ai = ai;

    if let Some(bullet) = bullet {
        world.spawn_bullet(bullet);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ShapeQuota, WorldConfig};
    use crate::sim::state::ShapeKind;

    /// World with no shapes in reach and tanks placed by hand
    fn world_with(bots: usize) -> World {
        let mut world = World::new(WorldConfig {
            bot_count: bots,
            ..WorldConfig::with_seed(5)
        });
        world.shapes.clear();
        world.player_mut().pos = Vec2::new(2000.0, 2000.0);
        for (i, tank) in world.tanks.iter_mut().enumerate().skip(1) {
            tank.pos = Vec2::new(100.0 + i as f32 * 1000.0, 3900.0);
        }
        world
    }

    fn shape_at(world: &mut World, pos: Vec2) -> u32 {
        let id = world.next_entity_id();
        let quota = ShapeQuota::new(ShapeKind::Square, 1, 20.0, 10.0);
        world.shapes.push(Shape::new(id, &quota, pos));
        id
    }

    #[test]
    fn test_player_in_range_is_target() {
        let mut world = world_with(1);
        world.tanks[1].pos = Vec2::new(2500.0, 2000.0);
        let choice = select_target(&world.tanks, &world.shapes, TankId(1)).unwrap();
        assert_eq!(choice.target, Target::Tank(TankId::PLAYER));
        assert!((choice.distance - 500.0).abs() < 1e-3);
    }

    #[test]
    fn test_player_out_of_range_ignored() {
        let mut world = world_with(1);
        world.tanks[1].pos = Vec2::new(2700.0, 2000.0);
        assert!(select_target(&world.tanks, &world.shapes, TankId(1)).is_none());
    }

    #[test]
    fn test_dead_player_ignored() {
        let mut world = world_with(1);
        world.tanks[1].pos = Vec2::new(2100.0, 2000.0);
        world.player_mut().take_damage(1000.0);
        assert!(select_target(&world.tanks, &world.shapes, TankId(1)).is_none());
    }

    #[test]
    fn test_bot_must_be_clearly_closer_than_player() {
        let mut world = world_with(2);
        world.tanks[1].pos = Vec2::new(2500.0, 2000.0); // player at 500
        // 450 > 500 * 0.8: player stays the target
        world.tanks[2].pos = Vec2::new(2500.0, 2450.0);
        let choice = select_target(&world.tanks, &world.shapes, TankId(1)).unwrap();
        assert_eq!(choice.target, Target::Tank(TankId::PLAYER));

        // 350 < 400: the bot wins
        world.tanks[2].pos = Vec2::new(2500.0, 2350.0);
        let choice = select_target(&world.tanks, &world.shapes, TankId(1)).unwrap();
        assert_eq!(choice.target, Target::Tank(TankId(2)));
    }

    #[test]
    fn test_shape_fallback_when_target_far() {
        let mut world = world_with(1);
        world.tanks[1].pos = Vec2::new(2500.0, 2000.0); // player at 500 > 400
        let shape = shape_at(&mut world, Vec2::new(2500.0, 2200.0));
        let choice = select_target(&world.tanks, &world.shapes, TankId(1)).unwrap();
        assert_eq!(choice.target, Target::Shape(shape));
    }

    #[test]
    fn test_close_player_beats_shapes() {
        let mut world = world_with(1);
        world.tanks[1].pos = Vec2::new(2300.0, 2000.0); // player at 300 <= 400
        shape_at(&mut world, Vec2::new(2300.0, 2050.0));
        let choice = select_target(&world.tanks, &world.shapes, TankId(1)).unwrap();
        assert_eq!(choice.target, Target::Tank(TankId::PLAYER));
    }

    #[test]
    fn test_nearest_shape_wins() {
        let mut world = world_with(1);
        let far = shape_at(&mut world, Vec2::new(1300.0, 3900.0));
        let near = shape_at(&mut world, Vec2::new(1150.0, 3900.0));
        let choice = select_target(&world.tanks, &world.shapes, TankId(1)).unwrap();
        assert_eq!(choice.target, Target::Shape(near));
        assert_ne!(choice.target, Target::Shape(far));
    }

    #[test]
    fn test_autopilot_player_skips_itself() {
        let mut world = world_with(1);
        world.tanks[1].pos = Vec2::new(2300.0, 2000.0);
        let choice = select_target(&world.tanks, &world.shapes, TankId::PLAYER).unwrap();
        assert_eq!(choice.target, Target::Tank(TankId(1)));
    }

    #[test]
    fn test_blend_bands() {
        let origin = Vec2::ZERO;
        let current = Vec2::new(0.0, 1.0);
        let choice = |d: f32| TargetChoice {
            target: Target::Shape(1),
            pos: Vec2::new(d, 0.0),
            distance: d,
        };

        let far = blend_direction(current, origin, &choice(300.0));
        assert!((far - Vec2::new(0.7, 0.3)).length() < 1e-5);

        let near = blend_direction(current, origin, &choice(100.0));
        assert!((near - Vec2::new(-0.5, 0.5)).length() < 1e-5);

        let mid = blend_direction(current, origin, &choice(200.0));
        assert_eq!(mid, current);
    }

    #[test]
    fn test_update_keeps_bot_in_bounds() {
        let mut world = world_with(1);
        world.tanks[1].pos = Vec2::new(0.0, 0.0);
        world.tanks[1].ai.direction = Vec2::new(-1.0, -1.0).normalize();
        world.tanks[1].ai.retarget_timer = 100.0;
        update_tank(&mut world, TankId(1));
        let bot = &world.tanks[1];
        assert_eq!(bot.pos, Vec2::new(TANK_RADIUS, TANK_RADIUS));
        assert!(bot.ai.retarget_timer < 100.0);
    }

    #[test]
    fn test_update_refreshes_wander_direction() {
        let mut world = world_with(1);
        world.tanks[1].ai.retarget_timer = 0.0;
        update_tank(&mut world, TankId(1));
        let ai = &world.tanks[1].ai;
        assert!((ai.direction.length() - 1.0).abs() < 1e-4);
        assert!(ai.retarget_timer >= AI_WANDER_MIN_TICKS);
        assert!(ai.retarget_timer <= AI_WANDER_MIN_TICKS + AI_WANDER_SPAN_TICKS);
    }

    #[test]
    fn test_update_aims_at_target() {
        let mut world = world_with(1);
        world.tanks[1].pos = Vec2::new(2000.0, 2500.0);
        world.tanks[1].ai.retarget_timer = 100.0;
        update_tank(&mut world, TankId(1));
        // Player is straight "up" (negative y)
        assert!((world.tanks[1].angle + std::f32::consts::FRAC_PI_2).abs() < 1e-3);
        assert_eq!(world.tanks[1].ai.target, Some(Target::Tank(TankId::PLAYER)));
    }

    #[test]
    fn test_dead_bot_does_nothing() {
        let mut world = world_with(1);
        world.tanks[1].take_damage(1000.0);
        let before = world.tanks[1].pos;
        update_tank(&mut world, TankId(1));
        assert_eq!(world.tanks[1].pos, before);
        assert_eq!(world.tanks[1].health, 0.0);
    }

    #[test]
    fn test_bot_eventually_fires() {
        let mut world = world_with(1);
        world.tanks[1].pos = Vec2::new(2000.0, 2400.0);
        for _ in 0..200 {
            update_tank(&mut world, TankId(1));
        }
        assert!(!world.bullets.is_empty());
        assert!(world.bullets.iter().all(|b| b.owner == TankId(1)));
    }
}
