//! Experience, leveling and stat upgrades

use rand::Rng;

use super::stats::{StatKind, UpgradeLevels};
use super::tank::Tank;
use crate::consts::*;

/// Exp needed to advance from `level` to `level + 1`.
///
/// Evaluated in f64: in f32 the curve rounds up across an integer at
/// level 28 (1310.9994 becomes 1311).
pub fn exp_for_level(level: u32) -> f32 {
    let growth = EXP_GROWTH.powi(level.saturating_sub(1) as i32);
    (BASE_EXP_TO_LEVEL as f64 * growth).floor() as f32
}

impl Tank {
    /// Add exp (and score). Returns the number of levels gained.
    ///
    /// Bots spend every new point immediately on a random stat; the player
    /// banks points for [`Tank::upgrade`].
    pub fn add_exp<R: Rng>(&mut self, amount: f32, rng: &mut R) -> u32 {
        self.exp += amount;
        self.score += amount;

        let mut gained = 0;
        while self.exp >= self.exp_to_next_level && self.level < MAX_LEVEL {
            self.exp -= self.exp_to_next_level;
            self.level += 1;
            self.exp_to_next_level = exp_for_level(self.level);
            self.upgrade_points += 1;
            gained += 1;

            if !self.is_player() {
                self.auto_upgrade(rng);
            }
        }
        gained
    }

    /// Spend a point on `stat`. Ignored (returns false) without points or
    /// when the stat is maxed.
    pub fn upgrade(&mut self, stat: StatKind) -> bool {
        if self.upgrade_points == 0 || self.upgrade_levels.is_maxed(stat) {
            return false;
        }
        self.upgrade_levels.raise(stat);
        self.upgrade_points -= 1;
        self.apply_upgrades();
        true
    }

    /// [`Tank::upgrade`] keyed by UI stat name; unknown keys are a no-op
    pub fn upgrade_by_key(&mut self, key: &str) -> bool {
        match StatKind::from_key(key) {
            Some(stat) => self.upgrade(stat),
            None => false,
        }
    }

    /// Bot auto-spend: one uniformly random stat, no retry if it is maxed
    pub fn auto_upgrade<R: Rng>(&mut self, rng: &mut R) -> Option<StatKind> {
        let stat = StatKind::ALL[rng.random_range(0..StatKind::ALL.len())];
        if self.upgrade(stat) { Some(stat) } else { None }
    }

    /// Recompute current stats from base and levels, clamping health
    pub fn apply_upgrades(&mut self) {
        self.stats = self.base_stats.upgraded(&self.upgrade_levels);
        if self.health > self.stats.max_health() {
            self.health = self.stats.max_health();
        }
    }

    /// Back to level 1 with no upgrades (player death)
    pub fn reset_progress(&mut self) {
        self.level = 1;
        self.exp = 0.0;
        self.score = 0.0;
        self.exp_to_next_level = BASE_EXP_TO_LEVEL;
        self.upgrade_points = 0;
        self.upgrade_levels = UpgradeLevels::default();
        self.stats = self.base_stats;
        self.health = self.stats.max_health();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::TankId;
    use crate::sim::stats::StatBlock;
    use crate::sim::tank::Role;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn player() -> Tank {
        Tank::new(TankId::PLAYER, "Player", Role::Player, Vec2::ZERO, StatBlock::base())
    }

    fn bot() -> Tank {
        Tank::new(TankId(1), "Bot 1", Role::Bot, Vec2::ZERO, StatBlock::base())
    }

    #[test]
    fn test_exp_curve() {
        assert_eq!(exp_for_level(1), 100.0);
        assert_eq!(exp_for_level(2), 110.0);
        assert_eq!(exp_for_level(3), 121.0);
        assert_eq!(exp_for_level(4), 133.0);
    }

    #[test]
    fn test_exp_curve_matches_double_precision() {
        for level in 1..=MAX_LEVEL {
            let expected = (100.0_f64 * 1.1_f64.powi(level as i32 - 1)).floor();
            assert_eq!(exp_for_level(level) as f64, expected, "level {}", level);
        }
        assert_eq!(exp_for_level(28), 1310.0);
    }

    #[test]
    fn test_zero_exp_is_noop() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut t = player();
        assert_eq!(t.add_exp(0.0, &mut rng), 0);
        assert_eq!(t.level, 1);
        assert_eq!(t.exp, 0.0);
        assert_eq!(t.upgrade_points, 0);
    }

    #[test]
    fn test_single_level_up() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut t = player();
        assert_eq!(t.add_exp(150.0, &mut rng), 1);
        assert_eq!(t.level, 2);
        assert_eq!(t.exp, 50.0);
        assert_eq!(t.exp_to_next_level, 110.0);
        assert_eq!(t.upgrade_points, 1);
        assert_eq!(t.score, 150.0);
    }

    #[test]
    fn test_multiple_level_ups_in_one_grant() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut t = player();
        // 100 + 110 + 121 = 331
        assert_eq!(t.add_exp(340.0, &mut rng), 3);
        assert_eq!(t.level, 4);
        assert!((t.exp - 9.0).abs() < 1e-3);
        assert_eq!(t.upgrade_points, 3);
    }

    #[test]
    fn test_level_cap() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut t = player();
        t.add_exp(1.0e9, &mut rng);
        assert_eq!(t.level, MAX_LEVEL);
        assert_eq!(t.upgrade_points, MAX_LEVEL - 1);
        // Exp keeps accruing past the cap
        assert!(t.exp > t.exp_to_next_level);
    }

    #[test]
    fn test_upgrade_without_points_is_ignored() {
        let mut t = player();
        assert!(!t.upgrade(StatKind::MoveSpeed));
        assert_eq!(t.upgrade_levels[StatKind::MoveSpeed], 0);
        assert_eq!(t.upgrade_points, 0);
        assert_eq!(t.stats.move_speed(), 3.0);
    }

    #[test]
    fn test_upgrade_spends_point_and_recomputes() {
        let mut t = player();
        t.upgrade_points = 2;
        assert!(t.upgrade(StatKind::MaxHealth));
        assert_eq!(t.upgrade_points, 1);
        assert_eq!(t.upgrade_levels[StatKind::MaxHealth], 1);
        assert!((t.stats.max_health() - 120.0).abs() < 1e-4);
        // Health is not topped up, only clamped
        assert_eq!(t.health, 100.0);
    }

    #[test]
    fn test_upgrade_maxed_stat_is_ignored() {
        let mut t = player();
        t.upgrade_points = 10;
        for _ in 0..7 {
            assert!(t.upgrade(StatKind::Reload));
        }
        assert!(!t.upgrade(StatKind::Reload));
        assert_eq!(t.upgrade_points, 3);
        assert!((t.stats.reload() - 30.0 * 0.85_f32.powi(7)).abs() < 1e-3);
    }

    #[test]
    fn test_upgrade_by_unknown_key_is_noop() {
        let mut t = player();
        t.upgrade_points = 1;
        assert!(!t.upgrade_by_key("luck"));
        assert_eq!(t.upgrade_points, 1);
        assert!(t.upgrade_by_key("bulletSpeed"));
        assert_eq!(t.upgrade_levels[StatKind::BulletSpeed], 1);
    }

    #[test]
    fn test_apply_upgrades_is_idempotent() {
        let mut t = player();
        t.upgrade_points = 3;
        t.upgrade(StatKind::BodyDamage);
        t.upgrade(StatKind::HealthRegen);
        let first = t.stats;
        t.apply_upgrades();
        t.apply_upgrades();
        assert_eq!(first, t.stats);
    }

    #[test]
    fn test_apply_upgrades_clamps_health() {
        let mut t = player();
        t.health = 150.0;
        t.apply_upgrades();
        assert_eq!(t.health, 100.0);
    }

    #[test]
    fn test_bots_auto_spend() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut t = bot();
        t.add_exp(340.0, &mut rng);
        assert_eq!(t.level, 4);
        // Nothing can be maxed after three picks, so every point was spent
        assert_eq!(t.upgrade_points, 0);
        assert_eq!(t.upgrade_levels.total(), 3);
    }

    #[test]
    fn test_auto_upgrade_on_maxed_stat_wastes_nothing_but_the_call() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut t = bot();
        t.upgrade_points = 1;
        // Max every stat so any pick fails
        for stat in StatKind::ALL {
            t.upgrade_points += 7;
            for _ in 0..7 {
                t.upgrade(stat);
            }
        }
        assert_eq!(t.upgrade_points, 1);
        assert_eq!(t.auto_upgrade(&mut rng), None);
        assert_eq!(t.upgrade_points, 1);
    }

    #[test]
    fn test_reset_progress() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut t = player();
        t.add_exp(500.0, &mut rng);
        t.upgrade(StatKind::MaxHealth);
        t.health = 3.0;
        t.reset_progress();
        assert_eq!(t.level, 1);
        assert_eq!(t.exp, 0.0);
        assert_eq!(t.score, 0.0);
        assert_eq!(t.exp_to_next_level, 100.0);
        assert_eq!(t.upgrade_points, 0);
        assert_eq!(t.upgrade_levels.total(), 0);
        assert_eq!(t.stats, t.base_stats);
        assert_eq!(t.health, 100.0);
    }
}
