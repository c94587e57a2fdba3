//! Shared combat math.
//!
//! Pure functions over stat snapshots. Anything random takes the caller's
//! RNG so a seeded session replays identically.

use crate::character::stats::StatBlock;
use crate::core::config::BattleConfig;
use crate::core::constants::{
    AGILITY_CRIT_DIVISOR, AGILITY_DODGE_DIVISOR, AGILITY_FLEE_DIVISOR, LUCK_CRIT_DIVISOR,
    MIN_DAMAGE_TAKEN, STRENGTH_DAMAGE_DIVISOR, VITALITY_DEFENSE_DIVISOR,
};
use rand::Rng;

/// Result of an attack calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackResult {
    /// Damage dealt (after crit multiplier if applicable).
    pub damage: u32,
    /// Whether this attack was a critical hit.
    pub is_crit: bool,
}

/// Outcome of one hit landing on a combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    Dodged,
    Hit(u32),
}

impl DamageOutcome {
    pub fn amount(&self) -> u32 {
        match self {
            DamageOutcome::Dodged => 0,
            DamageOutcome::Hit(amount) => *amount,
        }
    }

    pub fn was_dodged(&self) -> bool {
        matches!(self, DamageOutcome::Dodged)
    }
}

/// Raw attack damage: weapon damage (or the unarmed default) plus strength/2.
pub fn attack_damage(weapon_damage: Option<u32>, stats: &StatBlock, config: &BattleConfig) -> u32 {
    weapon_damage.unwrap_or(config.unarmed_damage) + stats.strength / STRENGTH_DAMAGE_DIVISOR
}

/// Equipment defense plus vitality/3, doubled while defending.
pub fn defense(equipment_defense: u32, stats: &StatBlock, is_defending: bool) -> u32 {
    let base = equipment_defense + stats.vitality / VITALITY_DEFENSE_DIVISOR;
    if is_defending {
        base.saturating_mul(2)
    } else {
        base
    }
}

pub fn crit_chance(stats: &StatBlock, config: &BattleConfig) -> f64 {
    config.base_crit
        + stats.luck as f64 / LUCK_CRIT_DIVISOR
        + stats.agility as f64 / AGILITY_CRIT_DIVISOR
}

pub fn dodge_chance(stats: &StatBlock, config: &BattleConfig) -> f64 {
    config.base_dodge + stats.agility as f64 / AGILITY_DODGE_DIVISOR
}

/// Player flee chance, halved against boss-tier opponents.
pub fn flee_chance(stats: &StatBlock, boss_tier: bool, config: &BattleConfig) -> f64 {
    let chance = config.flee_base + stats.agility as f64 / AGILITY_FLEE_DIVISOR;
    if boss_tier {
        chance / 2.0
    } else {
        chance
    }
}

/// Rolls `[0, 1)` against `chance`.
pub fn roll_chance(chance: f64, rng: &mut impl Rng) -> bool {
    rng.gen::<f64>() < chance
}

/// Applies the crit multiplier, truncating toward zero.
pub fn apply_crit(damage: u32, multiplier: f64) -> u32 {
    (damage as f64 * multiplier) as u32
}

/// Rolls a crit and scales `damage` if it lands.
pub fn roll_attack(damage: u32, crit_chance: f64, multiplier: f64, rng: &mut impl Rng) -> AttackResult {
    if roll_chance(crit_chance, rng) {
        AttackResult {
            damage: apply_crit(damage, multiplier),
            is_crit: true,
        }
    } else {
        AttackResult {
            damage,
            is_crit: false,
        }
    }
}

/// Damage after defense, never below 1.
pub fn actual_damage_taken(raw_damage: u32, effective_defense: u32) -> u32 {
    raw_damage
        .saturating_sub(effective_defense)
        .max(MIN_DAMAGE_TAKEN)
}

/// Dodge roll first, then defense. Defense is only consulted on a hit.
pub fn resolve_incoming(
    raw_damage: u32,
    dodge_chance: f64,
    effective_defense: u32,
    rng: &mut impl Rng,
) -> DamageOutcome {
    if dodge_chance > 0.0 && roll_chance(dodge_chance, rng) {
        return DamageOutcome::Dodged;
    }
    DamageOutcome::Hit(actual_damage_taken(raw_damage, effective_defense))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    /// RNG whose `gen::<f64>()` is always just under 1.0.
    fn never_rng() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    /// RNG whose `gen::<f64>()` is always 0.0.
    fn always_rng() -> StepRng {
        StepRng::new(0, 0)
    }

    #[test]
    fn test_unarmed_damage() {
        let config = BattleConfig::default();
        let stats = StatBlock::new(15, 10, 10, 10, 5);
        assert_eq!(attack_damage(None, &stats, &config), 5 + 7);
    }

    #[test]
    fn test_weapon_damage() {
        let config = BattleConfig::default();
        let stats = StatBlock::default();
        assert_eq!(attack_damage(Some(12), &stats, &config), 17);
    }

    #[test]
    fn test_defense_doubles_when_defending() {
        let stats = StatBlock::new(10, 10, 10, 10, 5);
        assert_eq!(defense(4, &stats, false), 7);
        assert_eq!(defense(4, &stats, true), 14);
    }

    #[test]
    fn test_crit_chance_formula() {
        let config = BattleConfig::default();
        let stats = StatBlock::new(10, 10, 10, 10, 5);
        let chance = crit_chance(&stats, &config);
        assert!((chance - 0.15).abs() < f64::EPSILON, "got {chance}");
    }

    #[test]
    fn test_dodge_chance_formula() {
        let config = BattleConfig::default();
        let stats = StatBlock::new(10, 20, 10, 10, 5);
        assert!((dodge_chance(&stats, &config) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_boss_halves_flee_chance() {
        let config = BattleConfig::default();
        let stats = StatBlock::new(10, 12, 10, 10, 5);
        let normal = flee_chance(&stats, false, &config);
        let boss = flee_chance(&stats, true, &config);
        assert_eq!(boss, normal / 2.0);
    }

    #[test]
    fn test_damage_floor_is_one() {
        assert_eq!(actual_damage_taken(5, 1000), 1);
        assert_eq!(actual_damage_taken(0, 0), 1);
        assert_eq!(actual_damage_taken(30, 0), 30);
        assert_eq!(actual_damage_taken(30, 12), 18);
    }

    #[test]
    fn test_crit_truncates() {
        assert_eq!(apply_crit(15, 1.5), 22);
        assert_eq!(apply_crit(10, 1.5), 15);
    }

    #[test]
    fn test_roll_attack_forced() {
        let hit = roll_attack(10, 0.5, 1.5, &mut always_rng());
        assert_eq!(hit, AttackResult { damage: 15, is_crit: true });
        let plain = roll_attack(10, 0.5, 1.5, &mut never_rng());
        assert_eq!(plain, AttackResult { damage: 10, is_crit: false });
    }

    #[test]
    fn test_dodge_skips_defense() {
        let outcome = resolve_incoming(50, 0.2, 0, &mut always_rng());
        assert_eq!(outcome, DamageOutcome::Dodged);
        assert_eq!(outcome.amount(), 0);
    }

    #[test]
    fn test_zero_dodge_never_dodges() {
        let outcome = resolve_incoming(50, 0.0, 10, &mut always_rng());
        assert_eq!(outcome, DamageOutcome::Hit(40));
    }

    #[test]
    fn test_hit_applies_defense() {
        let outcome = resolve_incoming(5, 0.2, 1000, &mut never_rng());
        assert_eq!(outcome, DamageOutcome::Hit(1));
    }
}
