//! Live leaderboard
//!
//! Top five alive tanks by score, rebuilt from the world on demand.

use serde::{Deserialize, Serialize};

use crate::sim::{Tank, TankId};

/// Maximum number of ranked tanks
pub const MAX_LEADERBOARD_ENTRIES: usize = 5;

/// A single ranked tank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub tank: TankId,
    pub name: String,
    /// Score, floored
    pub score: u64,
    pub is_player: bool,
}

/// Ranked view, highest score first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Rank the alive tanks. Ties keep slot order.
    pub fn from_tanks(tanks: &[Tank]) -> Self {
        let mut board = Self::new();
        for tank in tanks.iter().filter(|t| t.alive) {
            board.insert(LeaderboardEntry {
                tank: tank.id,
                name: tank.name.clone(),
                score: tank.score.max(0.0).floor() as u64,
                is_player: tank.is_player(),
            });
        }
        board
    }

    /// Sorted insert (descending), trimmed to the maximum size.
    /// Returns the 1-indexed rank or None if the entry fell off the end.
    pub fn insert(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        let pos = self
            .entries
            .iter()
            .position(|e| entry.score > e.score)
            .unwrap_or(self.entries.len());
        if pos >= MAX_LEADERBOARD_ENTRIES {
            return None;
        }
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_LEADERBOARD_ENTRIES);
        Some(pos + 1)
    }

    /// 1-indexed rank of a tank, if listed
    pub fn rank_of(&self, tank: TankId) -> Option<usize> {
        self.entries.iter().position(|e| e.tank == tank).map(|i| i + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Role, StatBlock};
    use glam::Vec2;

    fn tank(id: u32, score: f32) -> Tank {
        let role = if id == 0 { Role::Player } else { Role::Bot };
        let mut t = Tank::new(TankId(id), &format!("T{id}"), role, Vec2::ZERO, StatBlock::base());
        t.score = score;
        t
    }

    #[test]
    fn test_sorted_and_truncated() {
        let tanks: Vec<Tank> = [10.0, 50.0, 30.0, 70.0, 0.0, 20.0, 60.0]
            .iter()
            .enumerate()
            .map(|(i, s)| tank(i as u32, *s))
            .collect();
        let board = Leaderboard::from_tanks(&tanks);
        let scores: Vec<u64> = board.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![70, 60, 50, 30, 20]);
        assert_eq!(board.top_score(), Some(70));
        assert_eq!(board.rank_of(TankId(3)), Some(1));
        assert_eq!(board.rank_of(TankId(0)), None);
    }

    #[test]
    fn test_dead_tanks_excluded() {
        let mut tanks = vec![tank(0, 5.0), tank(1, 500.0)];
        tanks[1].take_damage(1000.0);
        let board = Leaderboard::from_tanks(&tanks);
        assert_eq!(board.entries.len(), 1);
        assert!(board.entries[0].is_player);
    }

    #[test]
    fn test_ties_keep_slot_order() {
        let tanks = vec![tank(0, 40.0), tank(1, 40.0), tank(2, 40.0)];
        let board = Leaderboard::from_tanks(&tanks);
        let ids: Vec<TankId> = board.entries.iter().map(|e| e.tank).collect();
        assert_eq!(ids, vec![TankId(0), TankId(1), TankId(2)]);
    }

    #[test]
    fn test_score_is_floored() {
        let board = Leaderboard::from_tanks(&[tank(0, 99.9)]);
        assert_eq!(board.entries[0].score, 99);
    }

    #[test]
    fn test_insert_past_end_is_rejected() {
        let mut board = Leaderboard::new();
        for i in 0..MAX_LEADERBOARD_ENTRIES {
            let entry = LeaderboardEntry {
                tank: TankId(i as u32),
                name: String::new(),
                score: 100,
                is_player: false,
            };
            assert_eq!(board.insert(entry), Some(i + 1));
        }
        let low = LeaderboardEntry {
            tank: TankId(9),
            name: String::new(),
            score: 1,
            is_player: false,
        };
        assert_eq!(board.insert(low), None);
        assert_eq!(board.entries.len(), MAX_LEADERBOARD_ENTRIES);
    }
}
