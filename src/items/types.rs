use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Weapon,
    Armor,
    Potion,
    Consumable,
    Accessory,
    Quest,
}

impl ItemKind {
    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::Weapon => "weapon",
            ItemKind::Armor => "armor",
            ItemKind::Potion => "potion",
            ItemKind::Consumable => "consumable",
            ItemKind::Accessory => "accessory",
            ItemKind::Quest => "quest",
        }
    }

    pub fn is_usable(&self) -> bool {
        matches!(self, ItemKind::Potion | ItemKind::Consumable)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Accessory,
    Shield,
}

impl EquipmentSlot {
    pub fn all() -> [EquipmentSlot; 4] {
        [
            EquipmentSlot::Weapon,
            EquipmentSlot::Armor,
            EquipmentSlot::Accessory,
            EquipmentSlot::Shield,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            EquipmentSlot::Weapon => "weapon",
            EquipmentSlot::Armor => "armor",
            EquipmentSlot::Accessory => "accessory",
            EquipmentSlot::Shield => "shield",
        }
    }

    /// Case-insensitive slot lookup by name.
    pub fn from_name(name: &str) -> Option<EquipmentSlot> {
        EquipmentSlot::all()
            .into_iter()
            .find(|slot| slot.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for EquipmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub const SHIELD_SUBTYPE: &str = "shield";

fn single() -> u32 {
    1
}

fn is_single(quantity: &u32) -> bool {
    *quantity == 1
}

/// An item as handed to the battle core by the item loader.
///
/// Only the fields combat reads are typed. Anything else in the source
/// record (value, weight, description...) lands in `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defense: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heal: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mana: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stamina: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buff: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    /// Size of the stack this record stands for.
    #[serde(default = "single", skip_serializing_if = "is_single")]
    pub quantity: u32,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Item {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            name: name.into(),
            kind,
            subtype: None,
            damage: None,
            defense: None,
            heal: None,
            mana: None,
            stamina: None,
            buff: None,
            duration: None,
            quantity: 1,
            extra: BTreeMap::new(),
        }
    }

    pub fn weapon(name: impl Into<String>, damage: u32) -> Self {
        Self {
            damage: Some(damage),
            ..Self::new(name, ItemKind::Weapon)
        }
    }

    pub fn armor(name: impl Into<String>, defense: u32) -> Self {
        Self {
            defense: Some(defense),
            ..Self::new(name, ItemKind::Armor)
        }
    }

    pub fn shield(name: impl Into<String>, defense: u32) -> Self {
        Self {
            subtype: Some(SHIELD_SUBTYPE.to_string()),
            ..Self::armor(name, defense)
        }
    }

    pub fn healing_potion(name: impl Into<String>, heal: u32) -> Self {
        Self {
            heal: Some(heal),
            ..Self::new(name, ItemKind::Potion)
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }

    pub fn is_shield(&self) -> bool {
        self.subtype
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(SHIELD_SUBTYPE))
    }

    /// Slot this item goes in, if it can be equipped at all.
    ///
    /// The shield marker wins over the base type, so a weapon, armor or
    /// accessory tagged `shield` still goes to the shield slot.
    pub fn equip_slot(&self) -> Option<EquipmentSlot> {
        if self.is_shield() {
            return Some(EquipmentSlot::Shield);
        }
        match self.kind {
            ItemKind::Weapon => Some(EquipmentSlot::Weapon),
            ItemKind::Armor => Some(EquipmentSlot::Armor),
            ItemKind::Accessory => Some(EquipmentSlot::Accessory),
            ItemKind::Potion | ItemKind::Consumable | ItemKind::Quest => None,
        }
    }

    /// True if the item restores anything when drunk.
    pub fn has_restorative_effect(&self) -> bool {
        self.heal.is_some() || self.mana.is_some() || self.stamina.is_some()
    }
}

/// A temporary buff granted by a consumable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub source: String,
    pub effect: String,
    pub turns_remaining: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_parses_from_loader_record() {
        let record = json!({
            "name": "Iron Sword",
            "type": "weapon",
            "damage": 12,
            "value": 40,
            "description": "Standard issue"
        });
        let item: Item = serde_json::from_value(record).unwrap();
        assert_eq!(item.kind, ItemKind::Weapon);
        assert_eq!(item.damage, Some(12));
        assert_eq!(item.heal, None);
        assert_eq!(item.quantity, 1);
        assert_eq!(item.extra.get("value"), Some(&json!(40)));
        assert_eq!(item.extra.get("description"), Some(&json!("Standard issue")));
    }

    #[test]
    fn test_unknown_fields_survive_reserialization() {
        let item = Item::weapon("Bow", 8).with_extra("range", json!(30));
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], json!("weapon"));
        assert_eq!(value["range"], json!(30));
        assert!(value.get("quantity").is_none());
        let back: Item = serde_json::from_value(value).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_equip_slot_by_kind() {
        assert_eq!(Item::weapon("Axe", 10).equip_slot(), Some(EquipmentSlot::Weapon));
        assert_eq!(Item::armor("Mail", 5).equip_slot(), Some(EquipmentSlot::Armor));
        assert_eq!(Item::healing_potion("Tonic", 20).equip_slot(), None);
    }

    #[test]
    fn test_shield_subtype_overrides_kind() {
        let shield = Item::shield("Buckler", 4);
        assert_eq!(shield.kind, ItemKind::Armor);
        assert_eq!(shield.equip_slot(), Some(EquipmentSlot::Shield));

        let spiked = Item {
            subtype: Some(SHIELD_SUBTYPE.to_string()),
            ..Item::weapon("Spiked Shield", 3)
        };
        assert_eq!(spiked.equip_slot(), Some(EquipmentSlot::Shield));
    }

    #[test]
    fn test_name_match_is_case_insensitive() {
        let item = Item::weapon("Iron Sword", 10);
        assert!(item.matches_name("iron sword"));
        assert!(item.matches_name("IRON SWORD"));
        assert!(!item.matches_name("iron"));
    }

    #[test]
    fn test_slot_from_name() {
        assert_eq!(EquipmentSlot::from_name("Shield"), Some(EquipmentSlot::Shield));
        assert_eq!(EquipmentSlot::from_name("ring"), None);
    }
}
