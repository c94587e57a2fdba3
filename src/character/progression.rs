//! Experience, levels, and point grants.
//!
//! Resource-cap growth on level-up depends on the owner's stats, so it is
//! applied by [`Player::gain_experience`](super::player::Player::gain_experience);
//! this module only tracks the counters.

use crate::core::config::BattleConfig;
use crate::error::{BattleError, Result};
use serde::{Deserialize, Serialize};

/// XP required to advance from `level` to `level + 1`.
///
/// `floor(base_xp * xp_scaling^(level - 1))`; level 0 is treated as level 1.
pub fn xp_to_next_level(level: u32, config: &BattleConfig) -> u64 {
    let exponent = level.saturating_sub(1) as f64;
    (config.base_xp * config.xp_scaling.powf(exponent)).floor() as u64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    pub level: u32,
    pub experience: u64,
    pub available_stat_points: u32,
    pub skill_points: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            level: 1,
            experience: 0,
            available_stat_points: 0,
            skill_points: 0,
        }
    }
}

impl Progression {
    /// Adds experience and returns every level reached, in order.
    ///
    /// Non-positive amounts are ignored. Once `max_level` is reached the
    /// remaining experience stays in the counter but grants nothing.
    pub fn add_experience(&mut self, amount: i64, config: &BattleConfig) -> Vec<u32> {
        if amount <= 0 {
            return Vec::new();
        }
        self.experience = self.experience.saturating_add(amount as u64);

        let mut levels = Vec::new();
        while self.level < config.max_level {
            let needed = xp_to_next_level(self.level, config);
            if self.experience < needed {
                break;
            }
            self.experience -= needed;
            self.grant_level(config);
            levels.push(self.level);
        }
        levels
    }

    /// Advances one level without spending experience.
    pub fn force_level_up(&mut self, config: &BattleConfig) -> Result<u32> {
        if self.level >= config.max_level {
            return Err(BattleError::MaxLevelReached(config.max_level));
        }
        self.grant_level(config);
        Ok(self.level)
    }

    fn grant_level(&mut self, config: &BattleConfig) {
        self.level += 1;
        self.available_stat_points += config.stat_points_per_level;
        self.skill_points += config.skill_points_per_level;
    }

    /// Takes one stat point, failing without mutation if none are left.
    pub fn spend_stat_point(&mut self) -> Result<()> {
        if self.available_stat_points == 0 {
            return Err(BattleError::InsufficientStats);
        }
        self.available_stat_points -= 1;
        Ok(())
    }

    pub fn xp_to_next(&self, config: &BattleConfig) -> u64 {
        xp_to_next_level(self.level, config)
    }

    /// Percent progress toward the next level (100.0 at the cap).
    pub fn xp_progress(&self, config: &BattleConfig) -> f64 {
        if self.level >= config.max_level {
            return 100.0;
        }
        let needed = self.xp_to_next(config).max(1);
        (self.experience as f64 / needed as f64 * 100.0).min(100.0)
    }

    pub fn is_max_level(&self, config: &BattleConfig) -> bool {
        self.level >= config.max_level
    }
}
