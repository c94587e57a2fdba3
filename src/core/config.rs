//! Tunable battle parameters.
//!
//! Every formula in the crate reads its constants from a [`BattleConfig`]
//! rather than from literals, so balance passes only need a JSON file.

use super::constants::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    // Progression
    pub base_xp: f64,
    pub xp_scaling: f64,
    pub max_level: u32,
    pub stat_points_per_level: u32,
    pub skill_points_per_level: u32,

    // Starting pools
    pub default_health: u32,
    pub default_mana: u32,
    pub default_stamina: u32,

    // Player combat
    pub base_crit: f64,
    pub crit_multiplier: f64,
    pub base_dodge: f64,
    pub flee_base: f64,
    pub unarmed_damage: u32,

    // Opponent combat
    pub opponent_flee_chance: f64,
    pub self_buff_multiplier: f64,
    /// Fractional spread of a plain opponent attack (0.1 = ±10%).
    pub enemy_damage_variance: f64,

    // Containers
    pub max_inventory_size: usize,
    pub combat_log_capacity: usize,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            base_xp: XP_CURVE_BASE,
            xp_scaling: XP_CURVE_EXPONENT,
            max_level: MAX_LEVEL,
            stat_points_per_level: STAT_POINTS_PER_LEVEL,
            skill_points_per_level: SKILL_POINTS_PER_LEVEL,
            default_health: DEFAULT_HEALTH,
            default_mana: DEFAULT_MANA,
            default_stamina: DEFAULT_STAMINA,
            base_crit: BASE_CRIT_CHANCE,
            crit_multiplier: CRIT_MULTIPLIER,
            base_dodge: BASE_DODGE_CHANCE,
            flee_base: FLEE_BASE_CHANCE,
            unarmed_damage: UNARMED_DAMAGE,
            opponent_flee_chance: OPPONENT_FLEE_CHANCE,
            self_buff_multiplier: SELF_BUFF_MULTIPLIER,
            enemy_damage_variance: ENEMY_DAMAGE_VARIANCE,
            max_inventory_size: MAX_INVENTORY_SIZE,
            combat_log_capacity: COMBAT_LOG_CAPACITY,
        }
    }
}

impl BattleConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
