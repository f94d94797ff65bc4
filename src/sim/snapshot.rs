//! Read-only views for renderers and the HUD
//!
//! Snapshots copy what a frontend draws so it never borrows the world
//! across frames.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Rgb, ShapeKind, TankId, World};
use super::stats::StatKind;
use super::tank::Tank;
use crate::consts::MAX_STAT_LEVEL;
use crate::leaderboard::Leaderboard;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeView {
    pub kind: ShapeKind,
    pub pos: Vec2,
    pub radius: f32,
    pub color: Rgb,
    pub rotation: f32,
    /// World-space polygon
    pub outline: Vec<Vec2>,
    pub health: f32,
    pub max_health: f32,
    pub show_health_bar: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BulletView {
    pub pos: Vec2,
    pub radius: f32,
    /// Owner's color
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankView {
    pub id: TankId,
    pub name: String,
    pub pos: Vec2,
    pub radius: f32,
    pub color: Rgb,
    pub angle: f32,
    pub health: f32,
    pub max_health: f32,
    pub show_health_bar: bool,
    pub is_player: bool,
}

impl TankView {
    fn of(tank: &Tank) -> Self {
        let max_health = tank.stats.max_health();
        Self {
            id: tank.id,
            name: tank.name.clone(),
            pos: tank.pos,
            radius: tank.radius,
            color: tank.color,
            angle: tank.angle,
            health: tank.health,
            max_health,
            show_health_bar: tank.health < max_health,
            is_player: tank.is_player(),
        }
    }
}

/// Shown while the player waits to respawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathScreen {
    pub score: u64,
    pub level: u32,
}

/// Everything a renderer draws for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub camera: Vec2,
    pub world_size: Vec2,
    pub shapes: Vec<ShapeView>,
    pub bullets: Vec<BulletView>,
    /// Alive bots, then the player if alive (draw order)
    pub tanks: Vec<TankView>,
    pub death_screen: Option<DeathScreen>,
}

/// One upgrade bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatBar {
    pub stat: StatKind,
    pub level: u8,
    /// `level / 7`
    pub fill: f32,
}

/// HUD text and bars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub level: u32,
    pub score: u64,
    pub upgrade_points: u32,
    pub health: f32,
    pub max_health: f32,
    pub exp: f32,
    pub exp_to_next_level: f32,
    pub stat_bars: Vec<StatBar>,
    pub leaderboard: Leaderboard,
}

impl World {
    pub fn render_snapshot(&self) -> RenderSnapshot {
        let shapes = self
            .shapes
            .iter()
            .map(|s| ShapeView {
                kind: s.kind,
                pos: s.pos,
                radius: s.radius,
                color: s.color,
                rotation: s.rotation,
                outline: s.outline(),
                health: s.health,
                max_health: s.max_health,
                show_health_bar: s.health < s.max_health,
            })
            .collect();

        let bullets = self
            .bullets
            .iter()
            .map(|b| BulletView {
                pos: b.pos,
                radius: b.radius,
                color: self.tank(b.owner).map_or(0xFFFFFF, |t| t.color),
            })
            .collect();

        let player = self.player();
        let mut tanks: Vec<TankView> = self.bots().filter(|t| t.alive).map(TankView::of).collect();
        if player.alive {
            tanks.push(TankView::of(player));
        }

        let death_screen = (!player.alive).then(|| DeathScreen {
            score: player.score.floor() as u64,
            level: player.level,
        });

        RenderSnapshot {
            camera: self.camera,
            world_size: self.size(),
            shapes,
            bullets,
            tanks,
            death_screen,
        }
    }

    pub fn hud(&self) -> HudSnapshot {
        let player = self.player();
        let stat_bars = StatKind::ALL
            .iter()
            .map(|&stat| {
                let level = player.upgrade_levels[stat];
                StatBar {
                    stat,
                    level,
                    fill: level as f32 / MAX_STAT_LEVEL as f32,
                }
            })
            .collect();

        HudSnapshot {
            level: player.level,
            score: player.score.floor() as u64,
            upgrade_points: player.upgrade_points,
            health: player.health,
            max_health: player.stats.max_health(),
            exp: player.exp,
            exp_to_next_level: player.exp_to_next_level,
            stat_bars,
            leaderboard: Leaderboard::from_tanks(&self.tanks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;

    fn world() -> World {
        World::new(WorldConfig {
            bot_count: 3,
            ..WorldConfig::with_seed(8)
        })
    }

    #[test]
    fn test_draw_order_puts_player_last() {
        let mut world = world();
        world.tanks[2].take_damage(1000.0);
        let snap = world.render_snapshot();
        assert_eq!(snap.shapes.len(), world.shapes.len());
        assert_eq!(snap.tanks.len(), 3);
        let last = snap.tanks.last().unwrap();
        assert!(last.is_player);
        assert!(snap.tanks[..2].iter().all(|t| !t.is_player));
        assert!(snap.tanks.iter().all(|t| t.id != TankId(2)));
        assert!(snap.death_screen.is_none());
    }

    #[test]
    fn test_health_bar_only_when_damaged() {
        let mut world = world();
        world.tanks[1].take_damage(10.0);
        let snap = world.render_snapshot();
        let bot1 = snap.tanks.iter().find(|t| t.id == TankId(1)).unwrap();
        let bot2 = snap.tanks.iter().find(|t| t.id == TankId(2)).unwrap();
        assert!(bot1.show_health_bar);
        assert!(!bot2.show_health_bar);
        assert!(snap.shapes.iter().all(|s| !s.show_health_bar));
    }

    #[test]
    fn test_death_screen() {
        let mut world = world();
        world.player_mut().score = 123.7;
        world.player_mut().level = 4;
        world.player_mut().take_damage(1000.0);
        let snap = world.render_snapshot();
        assert!(snap.tanks.iter().all(|t| !t.is_player));
        assert_eq!(snap.death_screen, Some(DeathScreen { score: 123, level: 4 }));
    }

    #[test]
    fn test_hud_bars_and_leaderboard() {
        let mut world = world();
        world.player_mut().upgrade_points = 2;
        world.upgrade_player(StatKind::Reload);
        world.upgrade_player_by_key("reload");
        world.player_mut().score = 42.9;

        let hud = world.hud();
        assert_eq!(hud.score, 42);
        assert_eq!(hud.upgrade_points, 0);
        assert_eq!(hud.stat_bars.len(), 8);
        let reload = hud.stat_bars[StatKind::Reload.index()];
        assert_eq!(reload.stat, StatKind::Reload);
        assert_eq!(reload.level, 2);
        assert!((reload.fill - 2.0 / 7.0).abs() < 1e-6);
        assert_eq!(hud.leaderboard.entries.len(), 4);
        assert_eq!(hud.leaderboard.rank_of(TankId::PLAYER), Some(1));
    }
}
