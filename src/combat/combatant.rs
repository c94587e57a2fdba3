//! Capabilities shared by both sides of a battle.

use super::math::{resolve_incoming, DamageOutcome};
use crate::character::resources::ResourcePools;
use crate::character::stats::StatBlock;
use crate::core::config::BattleConfig;
use rand::Rng;

pub trait Combatant {
    fn name(&self) -> &str;
    fn stats(&self) -> &StatBlock;
    fn pools(&self) -> &ResourcePools;
    fn pools_mut(&mut self) -> &mut ResourcePools;

    /// Effective defense right now, including the defending bonus.
    fn defense(&self) -> u32;
    fn dodge_chance(&self, config: &BattleConfig) -> f64;

    fn is_defending(&self) -> bool;
    fn set_defending(&mut self, defending: bool);

    /// Rolls dodge, applies defense with the damage floor, and drains health.
    fn take_damage(&mut self, raw_damage: u32, config: &BattleConfig, rng: &mut impl Rng) -> DamageOutcome
    where
        Self: Sized,
    {
        let outcome = resolve_incoming(raw_damage, self.dodge_chance(config), self.defense(), rng);
        if let DamageOutcome::Hit(amount) = outcome {
            self.pools_mut().health.drain(amount);
        }
        outcome
    }

    fn health(&self) -> u32 {
        self.pools().health.current()
    }

    fn health_percentage(&self) -> f64 {
        self.pools().health.percentage()
    }

    fn is_alive(&self) -> bool {
        !self.pools().health.is_empty()
    }
}
