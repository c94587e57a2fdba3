//! Simulation configuration.

use crate::character::class::CharacterClass;
use crate::combat::enemy::{dragon, goblin, orc, random_enemy, skeleton, troll, wolf, Opponent, Rank};
use crate::core::config::BattleConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which opponent each run fights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimOpponent {
    /// A fresh random common enemy per run.
    Random,
    Goblin,
    Orc,
    Skeleton,
    Wolf,
    Troll,
    Dragon,
}

impl SimOpponent {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "random" => Some(SimOpponent::Random),
            "goblin" => Some(SimOpponent::Goblin),
            "orc" => Some(SimOpponent::Orc),
            "skeleton" => Some(SimOpponent::Skeleton),
            "wolf" => Some(SimOpponent::Wolf),
            "troll" => Some(SimOpponent::Troll),
            "dragon" => Some(SimOpponent::Dragon),
            _ => None,
        }
    }

    /// Creates the opponent. Dragons ignore `rank` and are always bosses.
    pub fn spawn(&self, level: u32, rank: Rank, rng: &mut impl Rng) -> Opponent {
        match self {
            SimOpponent::Random => random_enemy(level, level, &[rank], rng),
            SimOpponent::Goblin => goblin(level, rank),
            SimOpponent::Orc => orc(level, rank),
            SimOpponent::Skeleton => skeleton(level, rank),
            SimOpponent::Wolf => wolf(level, rank),
            SimOpponent::Troll => troll(level, Some(rank)),
            SimOpponent::Dragon => dragon(level),
        }
    }
}

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of simulated encounters
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    pub class: CharacterClass,

    /// Player level before the fight
    pub player_level: u32,

    pub opponent: SimOpponent,
    pub opponent_level: u32,
    pub rank: Rank,

    /// Disallow fleeing for the player
    pub boss_battle: bool,

    /// Damage of the starting weapon (None = unarmed)
    pub weapon_damage: Option<u32>,

    /// Healing potions in the starting inventory
    pub potions: u32,
    pub potion_heal: u32,

    /// Health fraction below which the autopilot drinks a potion
    pub heal_threshold: f64,

    pub battle: BattleConfig,

    /// Log verbosity (0 = silent, 1 = summary, 2 = detailed)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 1000,
            seed: None,
            class: CharacterClass::Warrior,
            player_level: 1,
            opponent: SimOpponent::Random,
            opponent_level: 1,
            rank: Rank::Normal,
            boss_battle: false,
            weapon_damage: Some(8),
            potions: 3,
            potion_heal: 40,
            heal_threshold: 0.3,
            battle: BattleConfig::default(),
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Quick config for one class against random common enemies
    pub fn class_balance_test(class: CharacterClass) -> Self {
        Self {
            num_runs: 200,
            class,
            ..Default::default()
        }
    }

    /// Boss fight with fleeing disabled
    pub fn boss_test(player_level: u32) -> Self {
        Self {
            num_runs: 100,
            player_level,
            opponent: SimOpponent::Dragon,
            opponent_level: player_level,
            rank: Rank::Boss,
            boss_battle: true,
            weapon_damage: Some(20),
            potions: 5,
            potion_heal: 80,
            ..Default::default()
        }
    }
}
