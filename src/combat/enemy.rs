//! AI-controlled opponents.
//!
//! All scaling happens once in [`Opponent::spawn`]: health, damage, defense,
//! XP and the gold range are multiplied by level × rank × difficulty.

use super::behavior::{AiState, BehaviorTag};
use super::combatant::Combatant;
use super::loot::{LootEntry, LootTable};
use crate::character::resources::ResourcePools;
use crate::character::stats::StatBlock;
use crate::core::config::BattleConfig;
use crate::core::constants::{
    BERSERK_DAMAGE_MULTIPLIER, BERSERK_HEALTH_PERCENT, GOLD_MAX_PER_MULT, GOLD_MIN_PER_MULT,
    LEVEL_SCALING_PER_LEVEL,
};
use crate::items::Item;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Rank and difficulty
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    Minion,
    Normal,
    Elite,
    Boss,
    Legendary,
}

impl Rank {
    pub fn multiplier(&self) -> f64 {
        match self {
            Rank::Minion => 0.5,
            Rank::Normal => 1.0,
            Rank::Elite => 1.5,
            Rank::Boss => 2.5,
            Rank::Legendary => 5.0,
        }
    }

    /// Boss and Legendary opponents halve the player's flee chance.
    pub fn is_boss_tier(&self) -> bool {
        matches!(self, Rank::Boss | Rank::Legendary)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Rank::Minion => "Minion",
            Rank::Normal => "Normal",
            Rank::Elite => "Elite",
            Rank::Boss => "Boss",
            Rank::Legendary => "Legendary",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Nightmare,
}

impl Difficulty {
    pub fn multiplier(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.5,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.5,
            Difficulty::Nightmare => 2.0,
        }
    }
}

// ============================================================================
// Enemy kinds
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Goblin,
    Orc,
    Troll,
    Dragon,
    Skeleton,
    Wolf,
    Bandit,
    DarkKnight,
}

/// Reference numbers for an enemy kind before any scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindBase {
    pub health: u32,
    pub damage: u32,
    pub xp_reward: u64,
}

impl EnemyKind {
    pub fn base(&self) -> KindBase {
        let (health, damage, xp_reward) = match self {
            EnemyKind::Goblin => (30, 5, 15),
            EnemyKind::Orc => (60, 12, 35),
            EnemyKind::Troll => (100, 20, 75),
            EnemyKind::Dragon => (300, 50, 500),
            EnemyKind::Skeleton => (25, 8, 20),
            EnemyKind::Wolf => (35, 10, 25),
            EnemyKind::Bandit => (45, 15, 40),
            EnemyKind::DarkKnight => (150, 35, 150),
        };
        KindBase {
            health,
            damage,
            xp_reward,
        }
    }
}

// ============================================================================
// Abilities
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityEffect {
    /// Annotated on the event only; the target does not lose a turn.
    Stun,
    /// Permanently raises the user's base damage instead of hitting.
    SelfBuff,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub damage_multiplier: f64,
    pub effect: Option<AbilityEffect>,
    pub cooldown: u32,
    pub current_cooldown: u32,
}

impl Ability {
    pub fn new(name: impl Into<String>, damage_multiplier: f64, cooldown: u32) -> Self {
        Self {
            name: name.into(),
            damage_multiplier,
            effect: None,
            cooldown,
            current_cooldown: 0,
        }
    }

    pub fn with_effect(mut self, effect: AbilityEffect) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn is_ready(&self) -> bool {
        self.current_cooldown == 0
    }

    pub fn trigger(&mut self) {
        self.current_cooldown = self.cooldown;
    }

    pub fn tick(&mut self) {
        self.current_cooldown = self.current_cooldown.saturating_sub(1);
    }
}

/// The ability kit every opponent of `rank` starts with.
pub fn abilities_for_rank(rank: Rank) -> Vec<Ability> {
    let mut abilities = Vec::new();
    if matches!(rank, Rank::Elite | Rank::Boss | Rank::Legendary) {
        abilities.push(Ability::new("Power Strike", 1.5, 3));
    }
    if rank.is_boss_tier() {
        abilities.push(Ability::new("Crushing Blow", 2.0, 5).with_effect(AbilityEffect::Stun));
    }
    if rank == Rank::Legendary {
        abilities.push(Ability::new("Enrage", 0.5, 7).with_effect(AbilityEffect::SelfBuff));
    }
    abilities
}

// ============================================================================
// Opponent
// ============================================================================

/// Unscaled description of an opponent.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyTemplate {
    pub name: String,
    pub kind: EnemyKind,
    pub health: u32,
    /// Overrides the kind's base damage when set.
    pub damage: Option<u32>,
    pub defense: u32,
    pub behavior: BehaviorTag,
}

impl EnemyTemplate {
    pub fn new(name: impl Into<String>, kind: EnemyKind, behavior: BehaviorTag) -> Self {
        let base = kind.base();
        Self {
            name: name.into(),
            kind,
            health: base.health,
            damage: None,
            defense: 0,
            behavior,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Opponent {
    pub name: String,
    pub kind: EnemyKind,
    pub level: u32,
    pub rank: Rank,
    pub difficulty: Difficulty,
    pub behavior: BehaviorTag,
    pub stats: StatBlock,
    pub pools: ResourcePools,
    pub base_damage: u32,
    pub base_defense: u32,
    pub xp_reward: u64,
    pub abilities: Vec<Ability>,
    pub loot: LootTable,
    pub is_defending: bool,
    pub turns_in_combat: u32,
}

fn scale(value: f64, multiplier: f64) -> u64 {
    (value * multiplier) as u64
}

fn scale_u32(value: u32, multiplier: f64) -> u32 {
    u32::try_from(scale(value as f64, multiplier)).unwrap_or(u32::MAX)
}

impl Opponent {
    pub fn spawn(template: EnemyTemplate, level: u32, rank: Rank, difficulty: Difficulty) -> Self {
        let level = level.max(1);
        let level_mult = 1.0 + (level - 1) as f64 * LEVEL_SCALING_PER_LEVEL;
        let mult = level_mult * rank.multiplier() * difficulty.multiplier();

        let base = template.kind.base();
        let max_health = scale_u32(template.health, mult);
        let base_damage = scale_u32(template.damage.unwrap_or(base.damage), mult);
        let base_defense = scale_u32(template.defense, mult);
        let xp_reward = scale(base.xp_reward as f64, mult);
        let gold_range = (scale(GOLD_MIN_PER_MULT, mult), scale(GOLD_MAX_PER_MULT, mult));

        tracing::debug!(
            name = %template.name,
            level,
            %rank,
            health = max_health,
            damage = base_damage,
            "opponent created"
        );

        Self {
            name: template.name,
            kind: template.kind,
            level,
            rank,
            difficulty,
            behavior: template.behavior,
            stats: StatBlock::default(),
            pools: ResourcePools::full(max_health, 0, 0),
            base_damage,
            base_defense,
            xp_reward,
            abilities: abilities_for_rank(rank),
            loot: LootTable::new(gold_range, xp_reward),
            is_defending: false,
            turns_in_combat: 0,
        }
    }

    pub fn with_loot(mut self, entry: LootEntry) -> Self {
        self.loot.add_entry(entry);
        self
    }

    pub fn add_loot(&mut self, item: Item, drop_chance: f64) {
        self.loot.add_entry(LootEntry::with_chance(item, drop_chance));
    }

    pub fn has_ready_ability(&self) -> bool {
        self.abilities.iter().any(Ability::is_ready)
    }

    pub fn ai_state(&self) -> AiState {
        AiState {
            health_percentage: self.health_percentage(),
            ability_ready: self.has_ready_ability(),
        }
    }

    /// Current attack power, with the berserker bonus below 30% health.
    pub fn attack_power(&self) -> u32 {
        if self.behavior == BehaviorTag::Berserker && self.health_percentage() < BERSERK_HEALTH_PERCENT {
            (self.base_damage as f64 * BERSERK_DAMAGE_MULTIPLIER) as u32
        } else {
            self.base_damage
        }
    }

    /// A plain attack's raw damage with ±variance applied.
    pub fn roll_attack_damage(&self, config: &BattleConfig, rng: &mut impl Rng) -> u32 {
        let spread = config.enemy_damage_variance.max(0.0);
        let factor = if spread > 0.0 {
            rng.gen_range(1.0 - spread..=1.0 + spread)
        } else {
            1.0
        };
        (self.attack_power() as f64 * factor) as u32
    }

    /// Picks a ready ability uniformly, starts its cooldown, and returns it.
    pub fn trigger_random_ability(&mut self, rng: &mut impl Rng) -> Option<Ability> {
        let ready: Vec<usize> = self
            .abilities
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_ready())
            .map(|(i, _)| i)
            .collect();
        let index = *ready.choose(rng)?;
        let ability = &mut self.abilities[index];
        ability.trigger();
        Some(ability.clone())
    }

    pub fn apply_self_buff(&mut self, multiplier: f64) {
        self.base_damage = (self.base_damage as f64 * multiplier) as u32;
    }

    pub fn tick_abilities(&mut self) {
        for ability in &mut self.abilities {
            ability.tick();
        }
    }
}

impl Combatant for Opponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn stats(&self) -> &StatBlock {
        &self.stats
    }

    fn pools(&self) -> &ResourcePools {
        &self.pools
    }

    fn pools_mut(&mut self) -> &mut ResourcePools {
        &mut self.pools
    }

    fn defense(&self) -> u32 {
        if self.is_defending {
            self.base_defense.saturating_mul(2)
        } else {
            self.base_defense
        }
    }

    /// Opponents never dodge.
    fn dodge_chance(&self, _config: &BattleConfig) -> f64 {
        0.0
    }

    fn is_defending(&self) -> bool {
        self.is_defending
    }

    fn set_defending(&mut self, defending: bool) {
        self.is_defending = defending;
    }
}

// ============================================================================
// Factories
// ============================================================================

fn template(name: &str, kind: EnemyKind, health: u32, damage: u32, defense: u32, behavior: BehaviorTag) -> EnemyTemplate {
    EnemyTemplate {
        health,
        damage: Some(damage),
        defense,
        ..EnemyTemplate::new(name, kind, behavior)
    }
}

pub fn goblin(level: u32, rank: Rank) -> Opponent {
    let t = template("Goblin", EnemyKind::Goblin, 30, 8, 2, BehaviorTag::Coward);
    Opponent::spawn(t, level, rank, Difficulty::Normal)
}

pub fn orc(level: u32, rank: Rank) -> Opponent {
    let t = template("Orc Warrior", EnemyKind::Orc, 60, 15, 5, BehaviorTag::Aggressive);
    Opponent::spawn(t, level, rank, Difficulty::Normal)
}

pub fn skeleton(level: u32, rank: Rank) -> Opponent {
    let t = template("Skeleton", EnemyKind::Skeleton, 25, 10, 0, BehaviorTag::Aggressive);
    Opponent::spawn(t, level, rank, Difficulty::Normal)
}

pub fn wolf(level: u32, rank: Rank) -> Opponent {
    let t = template("Wild Wolf", EnemyKind::Wolf, 35, 12, 2, BehaviorTag::Berserker);
    Opponent::spawn(t, level, rank, Difficulty::Normal)
}

/// Trolls default to Elite rank.
pub fn troll(level: u32, rank: Option<Rank>) -> Opponent {
    let t = template("Cave Troll", EnemyKind::Troll, 100, 25, 10, BehaviorTag::Defensive);
    Opponent::spawn(t, level, rank.unwrap_or(Rank::Elite), Difficulty::Normal)
}

pub fn dragon(level: u32) -> Opponent {
    let t = template("Ancient Dragon", EnemyKind::Dragon, 300, 50, 25, BehaviorTag::Tactical);
    Opponent::spawn(t, level, Rank::Boss, Difficulty::Normal)
}

const DEFAULT_RANDOM_RANKS: [Rank; 3] = [Rank::Minion, Rank::Normal, Rank::Elite];

/// A random common enemy. Trolls join the pool for Elite and Boss rolls.
pub fn random_enemy(min_level: u32, max_level: u32, allowed_ranks: &[Rank], rng: &mut impl Rng) -> Opponent {
    let (low, high) = if min_level <= max_level {
        (min_level, max_level)
    } else {
        (max_level, min_level)
    };
    let level = rng.gen_range(low..=high);

    let ranks = if allowed_ranks.is_empty() {
        &DEFAULT_RANDOM_RANKS[..]
    } else {
        allowed_ranks
    };
    let rank = ranks.choose(rng).copied().unwrap_or(Rank::Normal);

    let mut creators: Vec<fn(u32, Rank) -> Opponent> = vec![goblin, orc, skeleton, wolf];
    if matches!(rank, Rank::Elite | Rank::Boss) {
        creators.push(|level, rank| troll(level, Some(rank)));
    }
    match creators.choose(rng) {
        Some(create) => create(level, rank),
        None => goblin(level, rank),
    }
}
