use crate::core::constants::{BASE_ATTRIBUTE_VALUE, BASE_LUCK};
use crate::error::BattleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use std::str::FromStr;

pub const NUM_STATS: usize = 5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StatKind {
    Strength,
    Agility,
    Intelligence,
    Vitality,
    Luck,
}

impl StatKind {
    pub fn all() -> [StatKind; NUM_STATS] {
        [
            StatKind::Strength,
            StatKind::Agility,
            StatKind::Intelligence,
            StatKind::Vitality,
            StatKind::Luck,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            StatKind::Strength => "strength",
            StatKind::Agility => "agility",
            StatKind::Intelligence => "intelligence",
            StatKind::Vitality => "vitality",
            StatKind::Luck => "luck",
        }
    }

    pub fn abbrev(&self) -> &'static str {
        match self {
            StatKind::Strength => "STR",
            StatKind::Agility => "AGI",
            StatKind::Intelligence => "INT",
            StatKind::Vitality => "VIT",
            StatKind::Luck => "LCK",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StatKind {
    type Err = BattleError;

    /// Accepts the full name or the abbreviation, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        StatKind::all()
            .into_iter()
            .find(|kind| {
                kind.name().eq_ignore_ascii_case(wanted) || kind.abbrev().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| BattleError::UnknownStat(s.to_string()))
    }
}

/// The five primary attributes shared by players and opponents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatBlock {
    pub strength: u32,
    pub agility: u32,
    pub intelligence: u32,
    pub vitality: u32,
    pub luck: u32,
}

impl Default for StatBlock {
    fn default() -> Self {
        Self {
            strength: BASE_ATTRIBUTE_VALUE,
            agility: BASE_ATTRIBUTE_VALUE,
            intelligence: BASE_ATTRIBUTE_VALUE,
            vitality: BASE_ATTRIBUTE_VALUE,
            luck: BASE_LUCK,
        }
    }
}

impl StatBlock {
    pub fn new(strength: u32, agility: u32, intelligence: u32, vitality: u32, luck: u32) -> Self {
        Self {
            strength,
            agility,
            intelligence,
            vitality,
            luck,
        }
    }

    /// All-zero block, used as the identity for bonus sums.
    pub fn zero() -> Self {
        Self::new(0, 0, 0, 0, 0)
    }

    pub fn get(&self, kind: StatKind) -> u32 {
        match kind {
            StatKind::Strength => self.strength,
            StatKind::Agility => self.agility,
            StatKind::Intelligence => self.intelligence,
            StatKind::Vitality => self.vitality,
            StatKind::Luck => self.luck,
        }
    }

    pub fn set(&mut self, kind: StatKind, value: u32) {
        match kind {
            StatKind::Strength => self.strength = value,
            StatKind::Agility => self.agility = value,
            StatKind::Intelligence => self.intelligence = value,
            StatKind::Vitality => self.vitality = value,
            StatKind::Luck => self.luck = value,
        }
    }

    pub fn increment(&mut self, kind: StatKind) {
        self.set(kind, self.get(kind).saturating_add(1));
    }
}

impl Add for StatBlock {
    type Output = StatBlock;

    fn add(self, other: StatBlock) -> StatBlock {
        StatBlock {
            strength: self.strength.saturating_add(other.strength),
            agility: self.agility.saturating_add(other.agility),
            intelligence: self.intelligence.saturating_add(other.intelligence),
            vitality: self.vitality.saturating_add(other.vitality),
            luck: self.luck.saturating_add(other.luck),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stats() {
        let stats = StatBlock::default();
        assert_eq!(stats.strength, 10);
        assert_eq!(stats.agility, 10);
        assert_eq!(stats.intelligence, 10);
        assert_eq!(stats.vitality, 10);
        assert_eq!(stats.luck, 5);
    }

    #[test]
    fn test_add_is_pairwise() {
        let base = StatBlock::new(10, 10, 10, 10, 5);
        let bonus = StatBlock::new(5, 2, 1, 0, 0);
        let total = base + bonus;
        assert_eq!(total, StatBlock::new(15, 12, 11, 10, 5));
        // operands are untouched
        assert_eq!(base.strength, 10);
    }

    #[test]
    fn test_add_zero_is_identity() {
        let stats = StatBlock::new(3, 4, 5, 6, 7);
        assert_eq!(stats + StatBlock::zero(), stats);
    }

    #[test]
    fn test_get_set_increment() {
        let mut stats = StatBlock::default();
        stats.set(StatKind::Vitality, 16);
        stats.increment(StatKind::Luck);
        assert_eq!(stats.get(StatKind::Vitality), 16);
        assert_eq!(stats.get(StatKind::Luck), 6);
    }

    #[test]
    fn test_stat_kind_parses_case_insensitively() {
        assert_eq!("Strength".parse::<StatKind>().unwrap(), StatKind::Strength);
        assert_eq!("AGILITY".parse::<StatKind>().unwrap(), StatKind::Agility);
        assert_eq!("vit".parse::<StatKind>().unwrap(), StatKind::Vitality);
    }

    #[test]
    fn test_unknown_stat_is_rejected() {
        let err = "charisma".parse::<StatKind>().unwrap_err();
        assert_eq!(err, BattleError::UnknownStat("charisma".into()));
    }
}
