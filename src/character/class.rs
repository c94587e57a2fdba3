use super::stats::StatBlock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Class bonuses applied once at character creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassBonuses {
    pub health: u32,
    pub mana: u32,
    pub stamina: u32,
    pub strength: u32,
    pub agility: u32,
    pub intelligence: u32,
}

impl ClassBonuses {
    pub fn stats(&self) -> StatBlock {
        StatBlock::new(self.strength, self.agility, self.intelligence, 0, 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CharacterClass {
    #[default]
    Warrior,
    Mage,
    Rogue,
    Ranger,
}

impl CharacterClass {
    pub fn all() -> [CharacterClass; 4] {
        [
            CharacterClass::Warrior,
            CharacterClass::Mage,
            CharacterClass::Rogue,
            CharacterClass::Ranger,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            CharacterClass::Warrior => "Warrior",
            CharacterClass::Mage => "Mage",
            CharacterClass::Rogue => "Rogue",
            CharacterClass::Ranger => "Ranger",
        }
    }

    pub fn bonuses(&self) -> ClassBonuses {
        let (health, mana, stamina, strength, agility, intelligence) = match self {
            CharacterClass::Warrior => (30, 0, 20, 5, 2, 1),
            CharacterClass::Mage => (0, 50, 10, 1, 2, 5),
            CharacterClass::Rogue => (10, 20, 30, 2, 5, 2),
            CharacterClass::Ranger => (15, 25, 25, 3, 4, 3),
        };
        ClassBonuses {
            health,
            mana,
            stamina,
            strength,
            agility,
            intelligence,
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warrior_bonuses() {
        let b = CharacterClass::Warrior.bonuses();
        assert_eq!((b.health, b.mana, b.stamina), (30, 0, 20));
        assert_eq!(b.stats(), StatBlock::new(5, 2, 1, 0, 0));
    }

    #[test]
    fn test_mage_favors_intelligence() {
        for class in CharacterClass::all() {
            if class != CharacterClass::Mage {
                assert!(CharacterClass::Mage.bonuses().intelligence > class.bonuses().intelligence);
            }
        }
    }
}
