//! Victory rewards.
//!
//! Gold range and XP are fixed when the opponent is created. Item drops are
//! independent trials per entry, so any subset of the table can drop.

use crate::character::player::Player;
use crate::core::config::BattleConfig;
use crate::core::constants::DEFAULT_DROP_CHANCE;
use crate::error::BattleError;
use crate::items::Item;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    pub item: Item,
    pub drop_chance: f64,
}

impl LootEntry {
    pub fn new(item: Item) -> Self {
        Self {
            item,
            drop_chance: DEFAULT_DROP_CHANCE,
        }
    }

    pub fn with_chance(item: Item, drop_chance: f64) -> Self {
        Self { item, drop_chance }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootTable {
    /// Inclusive gold range.
    pub gold_range: (u64, u64),
    pub xp_reward: u64,
    pub items: Vec<LootEntry>,
}

impl Default for LootTable {
    fn default() -> Self {
        Self {
            gold_range: (1, 10),
            xp_reward: 10,
            items: Vec::new(),
        }
    }
}

/// What a defeated opponent dropped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LootRoll {
    pub gold: u64,
    pub xp: u64,
    pub items: Vec<Item>,
}

impl LootTable {
    pub fn new(gold_range: (u64, u64), xp_reward: u64) -> Self {
        Self {
            gold_range,
            xp_reward,
            items: Vec::new(),
        }
    }

    pub fn add_entry(&mut self, entry: LootEntry) {
        self.items.push(entry);
    }

    pub fn roll(&self, rng: &mut impl Rng) -> LootRoll {
        let (low, high) = self.gold_range;
        let gold = if low >= high {
            low
        } else {
            rng.gen_range(low..=high)
        };

        let items = self
            .items
            .iter()
            .filter(|entry| rng.gen::<f64>() < entry.drop_chance)
            .map(|entry| entry.item.clone())
            .collect();

        LootRoll {
            gold,
            xp: self.xp_reward,
            items,
        }
    }
}

/// Result of handing a [`LootRoll`] to the player.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RewardReport {
    pub xp: u64,
    pub gold: u64,
    pub levels_gained: Vec<u32>,
    pub items_received: Vec<Item>,
    /// Items that could not be stored, with the reason.
    pub items_skipped: Vec<(Item, BattleError)>,
}

/// Grants XP, then gold, then each item on its own.
///
/// A full inventory only skips the item that did not fit.
pub fn apply_rewards(player: &mut Player, loot: LootRoll, config: &BattleConfig) -> RewardReport {
    let xp = i64::try_from(loot.xp).unwrap_or(i64::MAX);
    let levels_gained = player.gain_experience(xp, config);
    player.gold = player.gold.saturating_add(loot.gold);

    let mut report = RewardReport {
        xp: loot.xp,
        gold: loot.gold,
        levels_gained,
        ..Default::default()
    };

    for item in loot.items {
        let received = item.clone();
        match player.add_item(item) {
            Ok(()) => report.items_received.push(received),
            Err((err, item)) => {
                tracing::warn!(player = %player.name, item = %item.name, %err, "loot skipped");
                report.items_skipped.push((item, err));
            }
        }
    }

    tracing::info!(
        player = %player.name,
        xp = report.xp,
        gold = report.gold,
        items = report.items_received.len(),
        skipped = report.items_skipped.len(),
        "rewards applied"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::class::CharacterClass;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn table_with(chance: f64) -> LootTable {
        let mut table = LootTable::new((5, 20), 15);
        table.add_entry(LootEntry::with_chance(Item::healing_potion("Potion", 20), chance));
        table
    }

    #[test]
    fn test_certain_drop_always_drops() {
        let table = table_with(1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1000 {
            assert_eq!(table.roll(&mut rng).items.len(), 1);
        }
    }

    #[test]
    fn test_zero_chance_never_drops() {
        let table = table_with(0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(table.roll(&mut rng).items.is_empty());
        }
    }

    #[test]
    fn test_drops_are_independent() {
        let mut table = LootTable::new((1, 1), 0);
        table.add_entry(LootEntry::with_chance(Item::weapon("A", 1), 1.0));
        table.add_entry(LootEntry::with_chance(Item::weapon("B", 1), 1.0));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(table.roll(&mut rng).items.len(), 2);
    }

    #[test]
    fn test_drop_rate_is_roughly_chance() {
        let table = table_with(0.25);
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let trials = 10_000;
        let drops = (0..trials)
            .filter(|_| !table.roll(&mut rng).items.is_empty())
            .count();
        let rate = drops as f64 / trials as f64;
        assert!((0.22..0.28).contains(&rate), "rate {rate}");
    }

    #[test]
    fn test_gold_within_range_and_xp_fixed() {
        let table = table_with(0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..500 {
            let roll = table.roll(&mut rng);
            assert!((5..=20).contains(&roll.gold));
            assert_eq!(roll.xp, 15);
        }
    }

    #[test]
    fn test_default_drop_chance() {
        assert_eq!(LootEntry::new(Item::weapon("X", 1)).drop_chance, 0.1);
    }

    #[test]
    fn test_full_inventory_skips_only_that_item() {
        let config = BattleConfig {
            max_inventory_size: 1,
            ..Default::default()
        };
        let mut player = Player::new("Hero", CharacterClass::Warrior, &config);
        let loot = LootRoll {
            gold: 30,
            xp: 100,
            items: vec![Item::weapon("First", 3), Item::weapon("Second", 4)],
        };
        let report = apply_rewards(&mut player, loot, &config);

        assert_eq!(report.levels_gained, vec![2]);
        assert_eq!(player.gold, 30);
        assert_eq!(report.items_received.len(), 1);
        assert_eq!(report.items_skipped.len(), 1);
        assert_eq!(report.items_skipped[0].0.name, "Second");
        assert_eq!(
            report.items_skipped[0].1,
            BattleError::InventoryFull { capacity: 1 }
        );
        assert!(player.inventory.contains("First"));
    }
}
