//! The player-controlled combatant.

use super::class::CharacterClass;
use super::progression::Progression;
use super::resources::{ResourceKind, ResourcePools};
use super::stats::{StatBlock, StatKind};
use crate::combat::combatant::Combatant;
use crate::combat::math;
use crate::core::config::BattleConfig;
use crate::core::constants::{
    DEFAULT_BUFF_DURATION, HEALTH_PER_LEVEL, MANA_PER_LEVEL, RESOURCE_GROWTH_STAT_DIVISOR,
    STAMINA_PER_LEVEL,
};
use crate::error::{BattleError, Result};
use crate::items::{EquipmentSlot, Equipment, Inventory, Item, ItemKind, StatusEffect};
use serde::{Deserialize, Serialize};

/// What happened when an item was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemUseOutcome {
    /// A potion was drunk. Amounts are what was actually restored.
    Restored {
        health: u32,
        mana: u32,
        stamina: u32,
    },
    /// A consumable granted a timed buff.
    Buffed(StatusEffect),
    /// The item has nothing to apply. It is kept.
    NoEffect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub class: CharacterClass,
    pub stats: StatBlock,
    pub pools: ResourcePools,
    pub progression: Progression,
    pub equipment: Equipment,
    pub inventory: Inventory,
    pub gold: u64,
    pub is_defending: bool,
    pub status_effects: Vec<StatusEffect>,
}

impl Player {
    /// Creates a level-1 character with class bonuses applied.
    pub fn new(name: impl Into<String>, class: CharacterClass, config: &BattleConfig) -> Self {
        let bonuses = class.bonuses();
        Self {
            name: name.into(),
            class,
            stats: StatBlock::default() + bonuses.stats(),
            pools: ResourcePools::full(
                config.default_health + bonuses.health,
                config.default_mana + bonuses.mana,
                config.default_stamina + bonuses.stamina,
            ),
            progression: Progression::default(),
            equipment: Equipment::new(),
            inventory: Inventory::new(config.max_inventory_size),
            gold: 0,
            is_defending: false,
            status_effects: Vec::new(),
        }
    }

    pub fn level(&self) -> u32 {
        self.progression.level
    }

    // ------------------------------------------------------------------
    // Progression
    // ------------------------------------------------------------------

    /// Adds experience, growing resource caps for every level gained.
    pub fn gain_experience(&mut self, amount: i64, config: &BattleConfig) -> Vec<u32> {
        let levels = self.progression.add_experience(amount, config);
        for level in &levels {
            self.grow_resources();
            tracing::info!(player = %self.name, level, "level up");
        }
        levels
    }

    /// Forces a single level-up regardless of experience.
    pub fn level_up(&mut self, config: &BattleConfig) -> Result<u32> {
        let level = self.progression.force_level_up(config)?;
        self.grow_resources();
        tracing::info!(player = %self.name, level, "level up (forced)");
        Ok(level)
    }

    fn grow_resources(&mut self) {
        let health = HEALTH_PER_LEVEL + self.stats.vitality / RESOURCE_GROWTH_STAT_DIVISOR;
        let mana = MANA_PER_LEVEL + self.stats.intelligence / RESOURCE_GROWTH_STAT_DIVISOR;
        let stamina = STAMINA_PER_LEVEL + self.stats.agility / RESOURCE_GROWTH_STAT_DIVISOR;
        self.pools.health.grow_max(health);
        self.pools.mana.grow_max(mana);
        self.pools.stamina.grow_max(stamina);
        self.pools.refill_all();
    }

    /// Spends one stat point on `stat_name`. Nothing changes on failure.
    pub fn allocate_stat_point(&mut self, stat_name: &str) -> Result<StatKind> {
        if self.progression.available_stat_points == 0 {
            return Err(BattleError::InsufficientStats);
        }
        let kind: StatKind = stat_name.parse()?;
        self.progression.spend_stat_point()?;
        self.stats.increment(kind);
        tracing::debug!(player = %self.name, stat = %kind, value = self.stats.get(kind), "stat point allocated");
        Ok(kind)
    }

    // ------------------------------------------------------------------
    // Inventory
    // ------------------------------------------------------------------

    pub fn add_item(&mut self, item: Item) -> std::result::Result<(), (BattleError, Item)> {
        let name = item.name.clone();
        self.inventory.add(item)?;
        tracing::debug!(player = %self.name, item = %name, "item acquired");
        Ok(())
    }

    pub fn remove_item(&mut self, name: &str) -> Result<Item> {
        self.inventory.remove(name)
    }

    pub fn get_item(&self, name: &str) -> Option<&Item> {
        self.inventory.get(name)
    }

    pub fn use_item(&mut self, name: &str) -> Result<ItemUseOutcome> {
        if !self.is_alive() {
            return Err(BattleError::CharacterDead(self.name.clone()));
        }
        let item = self
            .inventory
            .get(name)
            .ok_or_else(|| BattleError::ItemNotFound(name.to_string()))?;

        let outcome = match item.kind {
            ItemKind::Potion if item.has_restorative_effect() => {
                let (heal, mana, stamina) = (item.heal, item.mana, item.stamina);
                ItemUseOutcome::Restored {
                    health: heal.map_or(0, |n| self.pools.get_mut(ResourceKind::Health).restore(n)),
                    mana: mana.map_or(0, |n| self.pools.get_mut(ResourceKind::Mana).restore(n)),
                    stamina: stamina.map_or(0, |n| self.pools.get_mut(ResourceKind::Stamina).restore(n)),
                }
            }
            ItemKind::Consumable if item.buff.is_some() => {
                let effect = StatusEffect {
                    source: item.name.clone(),
                    effect: item.buff.clone().unwrap_or_default(),
                    turns_remaining: item.duration.unwrap_or(DEFAULT_BUFF_DURATION),
                };
                self.status_effects.push(effect.clone());
                ItemUseOutcome::Buffed(effect)
            }
            ItemKind::Potion | ItemKind::Consumable => ItemUseOutcome::NoEffect,
            _ => return Err(BattleError::ItemNotUsable(item.name.clone())),
        };

        if outcome != ItemUseOutcome::NoEffect {
            let used = self.inventory.remove(name)?;
            tracing::debug!(player = %self.name, item = %used.name, ?outcome, "item used");
        }
        Ok(outcome)
    }

    /// Moves an inventory item into its slot, swapping out the old one.
    pub fn equip_item(&mut self, name: &str) -> Result<EquipmentSlot> {
        let item = self
            .inventory
            .get(name)
            .ok_or_else(|| BattleError::ItemNotFound(name.to_string()))?;
        let slot = item
            .equip_slot()
            .ok_or_else(|| BattleError::ItemNotEquippable(item.name.clone()))?;

        // taking one off a larger stack frees no slot for the swapped-out item
        if item.quantity > 1 && self.inventory.is_full() {
            if let Some(old) = self.equipment.get(slot) {
                if !self.inventory.contains(&old.name) {
                    return Err(BattleError::InventoryFull {
                        capacity: self.inventory.capacity(),
                    });
                }
            }
        }

        let item = self.inventory.remove(name)?;
        let item_name = item.name.clone();
        if let Some(old) = self.equipment.set(slot, item) {
            if let Err((err, _)) = self.inventory.add(old) {
                tracing::warn!(player = %self.name, %err, "lost unequipped item");
            }
        }
        tracing::debug!(player = %self.name, item = %item_name, %slot, "item equipped");
        Ok(slot)
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Result<Item> {
        let item = self
            .equipment
            .take(slot)
            .ok_or_else(|| BattleError::NothingEquipped(slot.name().to_string()))?;
        let returned = item.clone();
        if let Err((err, item)) = self.inventory.add(item) {
            self.equipment.set(slot, item);
            return Err(err);
        }
        Ok(returned)
    }

    // ------------------------------------------------------------------
    // Combat
    // ------------------------------------------------------------------

    /// Finds the weapon an attack would use.
    ///
    /// `None` means the equipped weapon (or bare hands). A name must match an
    /// inventory weapon or the equipped weapon.
    pub fn resolve_weapon(&self, weapon_name: Option<&str>) -> Result<Option<&Item>> {
        let Some(name) = weapon_name else {
            return Ok(self.equipment.weapon.as_ref());
        };
        self.inventory
            .iter()
            .find(|item| item.kind == ItemKind::Weapon && item.matches_name(name))
            .or_else(|| self.equipment.weapon.as_ref().filter(|w| w.matches_name(name)))
            .map(Some)
            .ok_or_else(|| BattleError::InvalidWeapon(name.to_string()))
    }

    pub fn attack_damage(&self, weapon: Option<&Item>, config: &BattleConfig) -> u32 {
        math::attack_damage(weapon.and_then(|w| w.damage), &self.stats, config)
    }

    pub fn crit_chance(&self, config: &BattleConfig) -> f64 {
        math::crit_chance(&self.stats, config)
    }

    pub fn flee_chance(&self, boss_tier: bool, config: &BattleConfig) -> f64 {
        math::flee_chance(&self.stats, boss_tier, config)
    }

    /// Counts down buffs by one turn and drops the expired ones.
    pub fn tick_status_effects(&mut self) -> Vec<StatusEffect> {
        for effect in &mut self.status_effects {
            effect.turns_remaining = effect.turns_remaining.saturating_sub(1);
        }
        let (expired, active) = self
            .status_effects
            .drain(..)
            .partition(|e| e.turns_remaining == 0);
        self.status_effects = active;
        expired
    }

    pub fn full_restore(&mut self) {
        self.pools.refill_all();
        self.status_effects.clear();
    }
}

impl Combatant for Player {
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
        math::defense(self.equipment.defense_bonus(), &self.stats, self.is_defending)
    }

    fn dodge_chance(&self, config: &BattleConfig) -> f64 {
        math::dodge_chance(&self.stats, config)
    }

    fn is_defending(&self) -> bool {
        self.is_defending
    }

    fn set_defending(&mut self, defending: bool) {
        self.is_defending = defending;
    }
}
