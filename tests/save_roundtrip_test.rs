//! Integration test: character persistence
//!
//! Snapshot a character mid-adventure, push it through JSON and the
//! checksummed binary envelope, and rebuild it.

use duel::character::{
    decode_snapshot, encode_snapshot, CharacterClass, CharacterSnapshot, Player,
};
use duel::core::BattleConfig;
use duel::error::SnapshotError;
use duel::items::{EquipmentSlot, Item};
use serde_json::json;

fn seasoned_player(config: &BattleConfig) -> Player {
    let mut player = Player::new("Aria", CharacterClass::Ranger, config);
    player.gain_experience(400, config);
    player.allocate_stat_point("agility").unwrap();
    player.gold = 321;
    player.add_item(Item::weapon("Longbow", 14)).unwrap();
    player.add_item(Item::shield("Buckler", 3)).unwrap();
    player.equip_item("Longbow").unwrap();
    player.equip_item("Buckler").unwrap();
    player
        .add_item(Item::healing_potion("Health Potion", 30).with_extra("rarity", json!("common")))
        .unwrap();
    player.pools.health.drain(17);
    player
}

#[test]
fn test_json_roundtrip_preserves_character() {
    let config = BattleConfig::default();
    let player = seasoned_player(&config);

    let json = player.to_snapshot().to_json().unwrap();
    let restored = Player::from_snapshot(CharacterSnapshot::from_json(&json).unwrap(), &config);

    assert_eq!(restored, player);
    assert_eq!(
        restored.equipment.get(EquipmentSlot::Shield).map(|i| i.name.as_str()),
        Some("Buckler")
    );
    let potion = restored.get_item("health potion").unwrap();
    assert_eq!(potion.extra.get("rarity"), Some(&json!("common")));
}

#[test]
fn test_envelope_roundtrip() {
    let config = BattleConfig::default();
    let snapshot = seasoned_player(&config).to_snapshot();
    let bytes = encode_snapshot(&snapshot).unwrap();
    assert_eq!(decode_snapshot(&bytes).unwrap(), snapshot);
}

#[test]
fn test_envelope_detects_tampering() {
    let config = BattleConfig::default();
    let mut bytes = encode_snapshot(&seasoned_player(&config).to_snapshot()).unwrap();
    let middle = bytes.len() / 2;
    bytes[middle] ^= 0x01;
    assert!(matches!(
        decode_snapshot(&bytes),
        Err(SnapshotError::ChecksumMismatch)
    ));
}

#[test]
fn test_envelope_detects_truncation() {
    let config = BattleConfig::default();
    let bytes = encode_snapshot(&seasoned_player(&config).to_snapshot()).unwrap();
    assert!(matches!(
        decode_snapshot(&bytes[..bytes.len() - 1]),
        Err(SnapshotError::Truncated { .. })
    ));
}

#[test]
fn test_hand_edited_save_is_clamped() {
    let config = BattleConfig::default();
    let mut snapshot = seasoned_player(&config).to_snapshot();
    snapshot.health = snapshot.max_health + 500;
    snapshot.mana = 9_999;
    let player = Player::from_snapshot(snapshot.clone(), &config);
    assert_eq!(player.pools.health.current(), snapshot.max_health);
    assert_eq!(player.pools.mana.current(), snapshot.max_mana);
}

#[test]
fn test_minimal_json_uses_defaults() {
    let config = BattleConfig::default();
    let json = r#"{
        "name": "Newbie",
        "class": "Mage",
        "level": 1,
        "experience": 0,
        "health": 100, "max_health": 100,
        "mana": 100, "max_mana": 100,
        "stamina": 110, "max_stamina": 110,
        "stats": {"strength": 11, "agility": 12, "intelligence": 15, "vitality": 10, "luck": 5},
        "available_stat_points": 0
    }"#;
    let player = Player::from_snapshot(CharacterSnapshot::from_json(json).unwrap(), &config);
    assert_eq!(player.gold, 0);
    assert!(player.inventory.is_empty());
    assert!(player.equipment.weapon.is_none());
}
