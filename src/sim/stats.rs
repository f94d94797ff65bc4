//! Tank stats and upgrade formulas
//!
//! Eight upgradable stats, each stored in a fixed slot indexed by [`StatKind`].
//! Current stats are always recomputed from base values and upgrade levels.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::consts::MAX_STAT_LEVEL;

/// Number of upgradable stats
pub const STAT_COUNT: usize = 8;

/// Upgradable tank stat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    HealthRegen,
    MaxHealth,
    BodyDamage,
    BulletSpeed,
    BulletPenetration,
    BulletDamage,
    Reload,
    MoveSpeed,
}

impl StatKind {
    /// All stats in slot order (also the upgrade panel order)
    pub const ALL: [StatKind; STAT_COUNT] = [
        StatKind::HealthRegen,
        StatKind::MaxHealth,
        StatKind::BodyDamage,
        StatKind::BulletSpeed,
        StatKind::BulletPenetration,
        StatKind::BulletDamage,
        StatKind::Reload,
        StatKind::MoveSpeed,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Key used by UI collaborators (`data-stat` attributes)
    pub fn key(self) -> &'static str {
        match self {
            StatKind::HealthRegen => "healthRegen",
            StatKind::MaxHealth => "maxHealth",
            StatKind::BodyDamage => "bodyDamage",
            StatKind::BulletSpeed => "bulletSpeed",
            StatKind::BulletPenetration => "bulletPenetration",
            StatKind::BulletDamage => "bulletDamage",
            StatKind::Reload => "reload",
            StatKind::MoveSpeed => "moveSpeed",
        }
    }

    /// Parse a UI stat key; accepts camelCase and snake_case spellings
    pub fn from_key(key: &str) -> Option<Self> {
        let normalized: String = key
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "healthregen" => Some(StatKind::HealthRegen),
            "maxhealth" => Some(StatKind::MaxHealth),
            "bodydamage" => Some(StatKind::BodyDamage),
            "bulletspeed" => Some(StatKind::BulletSpeed),
            "bulletpenetration" => Some(StatKind::BulletPenetration),
            "bulletdamage" => Some(StatKind::BulletDamage),
            "reload" => Some(StatKind::Reload),
            "movespeed" => Some(StatKind::MoveSpeed),
            _ => None,
        }
    }

    /// Value of this stat at `level` upgrades over `base`
    pub fn upgraded(self, base: f32, level: u8) -> f32 {
        let level = level.min(MAX_STAT_LEVEL);
        match self {
            // Cooldown shrinks geometrically
            StatKind::Reload => base * 0.85_f32.powi(level as i32),
            StatKind::HealthRegen => base + level as f32 * 0.15,
            StatKind::MaxHealth
            | StatKind::BodyDamage
            | StatKind::BulletSpeed
            | StatKind::BulletPenetration
            | StatKind::BulletDamage
            | StatKind::MoveSpeed => base * (1.0 + level as f32 * 0.2),
        }
    }
}

/// One value per stat
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatBlock([f32; STAT_COUNT]);

impl StatBlock {
    pub fn from_fn(f: impl FnMut(StatKind) -> f32) -> Self {
        Self(StatKind::ALL.map(f))
    }

    /// Base stats shared by every tank
    pub fn base() -> Self {
        Self::from_fn(|stat| match stat {
            StatKind::HealthRegen => 0.1,
            StatKind::MaxHealth => 100.0,
            StatKind::BodyDamage => 10.0,
            StatKind::BulletSpeed => 8.0,
            StatKind::BulletPenetration => 10.0,
            StatKind::BulletDamage => 10.0,
            StatKind::Reload => 30.0,
            StatKind::MoveSpeed => 3.0,
        })
    }

    /// Current stats for the given upgrade levels
    pub fn upgraded(&self, levels: &UpgradeLevels) -> Self {
        Self::from_fn(|stat| stat.upgraded(self[stat], levels[stat]))
    }

    pub fn max_health(&self) -> f32 {
        self[StatKind::MaxHealth]
    }

    pub fn health_regen(&self) -> f32 {
        self[StatKind::HealthRegen]
    }

    pub fn body_damage(&self) -> f32 {
        self[StatKind::BodyDamage]
    }

    pub fn bullet_speed(&self) -> f32 {
        self[StatKind::BulletSpeed]
    }

    pub fn bullet_penetration(&self) -> f32 {
        self[StatKind::BulletPenetration]
    }

    pub fn bullet_damage(&self) -> f32 {
        self[StatKind::BulletDamage]
    }

    pub fn reload(&self) -> f32 {
        self[StatKind::Reload]
    }

    pub fn move_speed(&self) -> f32 {
        self[StatKind::MoveSpeed]
    }
}

impl Default for StatBlock {
    fn default() -> Self {
        Self::base()
    }
}

impl Index<StatKind> for StatBlock {
    type Output = f32;

    fn index(&self, stat: StatKind) -> &f32 {
        &self.0[stat.index()]
    }
}

impl IndexMut<StatKind> for StatBlock {
    fn index_mut(&mut self, stat: StatKind) -> &mut f32 {
        &mut self.0[stat.index()]
    }
}

/// Upgrade tier (0..=7) per stat
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeLevels([u8; STAT_COUNT]);

impl UpgradeLevels {
    pub fn get(&self, stat: StatKind) -> u8 {
        self.0[stat.index()]
    }

    pub fn is_maxed(&self, stat: StatKind) -> bool {
        self.get(stat) >= MAX_STAT_LEVEL
    }

    /// Raise one tier; returns false if the stat is already maxed
    pub fn raise(&mut self, stat: StatKind) -> bool {
        if self.is_maxed(stat) {
            return false;
        }
        self.0[stat.index()] += 1;
        true
    }

    /// Sum of all tiers
    pub fn total(&self) -> u32 {
        self.0.iter().map(|&l| l as u32).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKind, u8)> + '_ {
        StatKind::ALL.iter().map(move |&stat| (stat, self.get(stat)))
    }
}

impl Index<StatKind> for UpgradeLevels {
    type Output = u8;

    fn index(&self, stat: StatKind) -> &u8 {
        &self.0[stat.index()]
    }
}
