use super::types::{EquipmentSlot, Item};
use serde::{Deserialize, Serialize};

/// Player equipment slots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    #[serde(default)]
    pub weapon: Option<Item>,
    #[serde(default)]
    pub armor: Option<Item>,
    #[serde(default)]
    pub accessory: Option<Item>,
    #[serde(default)]
    pub shield: Option<Item>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipmentSlot) -> Option<&Item> {
        match slot {
            EquipmentSlot::Weapon => self.weapon.as_ref(),
            EquipmentSlot::Armor => self.armor.as_ref(),
            EquipmentSlot::Accessory => self.accessory.as_ref(),
            EquipmentSlot::Shield => self.shield.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: EquipmentSlot) -> &mut Option<Item> {
        match slot {
            EquipmentSlot::Weapon => &mut self.weapon,
            EquipmentSlot::Armor => &mut self.armor,
            EquipmentSlot::Accessory => &mut self.accessory,
            EquipmentSlot::Shield => &mut self.shield,
        }
    }

    /// Puts `item` in `slot`, returning whatever was there.
    pub fn set(&mut self, slot: EquipmentSlot, item: Item) -> Option<Item> {
        self.slot_mut(slot).replace(item)
    }

    pub fn take(&mut self, slot: EquipmentSlot) -> Option<Item> {
        self.slot_mut(slot).take()
    }

    pub fn iter_equipped(&self) -> impl Iterator<Item = &Item> {
        [&self.weapon, &self.armor, &self.accessory, &self.shield]
            .into_iter()
            .filter_map(|slot| slot.as_ref())
    }

    /// Sum of the `defense` field over every equipped item.
    pub fn defense_bonus(&self) -> u32 {
        self.iter_equipped().filter_map(|item| item.defense).sum()
    }

    pub fn weapon_damage(&self) -> Option<u32> {
        self.weapon.as_ref().and_then(|w| w.damage)
    }
}
