//! Character snapshots for the persistence layer.
//!
//! [`CharacterSnapshot`] is the flat field-value view a save system stores.
//! [`encode_snapshot`] wraps one in a checksummed envelope:
//! - Version magic (8 bytes)
//! - Data length (4 bytes)
//! - JSON snapshot (variable length)
//! - SHA256 checksum over everything before it (32 bytes)

use super::class::CharacterClass;
use super::player::Player;
use super::progression::Progression;
use super::resources::{ResourcePool, ResourcePools};
use super::stats::StatBlock;
use crate::core::config::BattleConfig;
use crate::core::constants::SNAPSHOT_MAGIC;
use crate::error::SnapshotError;
use crate::items::{Equipment, Inventory, Item, StatusEffect};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const MAGIC_LEN: usize = 8;
const LEN_LEN: usize = 4;
const CHECKSUM_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub name: String,
    pub class: CharacterClass,
    pub level: u32,
    pub experience: u64,
    pub health: u32,
    pub max_health: u32,
    pub mana: u32,
    pub max_mana: u32,
    pub stamina: u32,
    pub max_stamina: u32,
    pub stats: StatBlock,
    pub available_stat_points: u32,
    #[serde(default)]
    pub skill_points: u32,
    #[serde(default)]
    pub gold: u64,
    #[serde(default)]
    pub equipment: Equipment,
    #[serde(default)]
    pub inventory: Vec<Item>,
    #[serde(default)]
    pub status_effects: Vec<StatusEffect>,
}

impl Player {
    pub fn to_snapshot(&self) -> CharacterSnapshot {
        CharacterSnapshot {
            name: self.name.clone(),
            class: self.class,
            level: self.progression.level,
            experience: self.progression.experience,
            health: self.pools.health.current(),
            max_health: self.pools.health.max(),
            mana: self.pools.mana.current(),
            max_mana: self.pools.mana.max(),
            stamina: self.pools.stamina.current(),
            max_stamina: self.pools.stamina.max(),
            stats: self.stats,
            available_stat_points: self.progression.available_stat_points,
            skill_points: self.progression.skill_points,
            gold: self.gold,
            equipment: self.equipment.clone(),
            inventory: self.inventory.items().to_vec(),
            status_effects: self.status_effects.clone(),
        }
    }

    /// Rebuilds a player. Pool maximums are set before currents, so a
    /// stored `current > max` is clamped rather than carried over.
    pub fn from_snapshot(snapshot: CharacterSnapshot, config: &BattleConfig) -> Self {
        let capacity = config.max_inventory_size.max(snapshot.inventory.len());
        let mut inventory = Inventory::new(capacity);
        for item in snapshot.inventory {
            if let Err((err, item)) = inventory.add(item) {
                tracing::warn!(item = %item.name, %err, "dropping item from snapshot");
            }
        }

        Self {
            name: snapshot.name,
            class: snapshot.class,
            stats: snapshot.stats,
            pools: ResourcePools {
                health: ResourcePool::new(snapshot.health, snapshot.max_health),
                mana: ResourcePool::new(snapshot.mana, snapshot.max_mana),
                stamina: ResourcePool::new(snapshot.stamina, snapshot.max_stamina),
            },
            progression: Progression {
                level: snapshot.level.max(1),
                experience: snapshot.experience,
                available_stat_points: snapshot.available_stat_points,
                skill_points: snapshot.skill_points,
            },
            equipment: snapshot.equipment,
            inventory,
            gold: snapshot.gold,
            is_defending: false,
            status_effects: snapshot.status_effects,
        }
    }
}

impl CharacterSnapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

fn checksum(magic: u64, data_len: u32, data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(magic.to_le_bytes());
    hasher.update(data_len.to_le_bytes());
    hasher.update(data);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Serializes a snapshot into the checksummed envelope.
pub fn encode_snapshot(snapshot: &CharacterSnapshot) -> Result<Vec<u8>, SnapshotError> {
    let data = serde_json::to_vec(snapshot)?;
    let data_len = data.len() as u32;

    let mut bytes = Vec::with_capacity(MAGIC_LEN + LEN_LEN + data.len() + CHECKSUM_LEN);
    bytes.extend_from_slice(&SNAPSHOT_MAGIC.to_le_bytes());
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes.extend_from_slice(&data);
    bytes.extend_from_slice(&checksum(SNAPSHOT_MAGIC, data_len, &data));
    Ok(bytes)
}

/// Verifies and decodes an envelope produced by [`encode_snapshot`].
pub fn decode_snapshot(bytes: &[u8]) -> Result<CharacterSnapshot, SnapshotError> {
    let header = MAGIC_LEN + LEN_LEN;
    if bytes.len() < header {
        return Err(SnapshotError::Truncated {
            needed: header,
            available: bytes.len(),
        });
    }

    let (magic_bytes, rest) = bytes.split_at(MAGIC_LEN);
    let (len_bytes, rest) = rest.split_at(LEN_LEN);
    let mut magic_buf = [0u8; MAGIC_LEN];
    magic_buf.copy_from_slice(magic_bytes);
    let magic = u64::from_le_bytes(magic_buf);
    if magic != SNAPSHOT_MAGIC {
        return Err(SnapshotError::VersionMismatch {
            expected: SNAPSHOT_MAGIC,
            found: magic,
        });
    }

    let mut len_buf = [0u8; LEN_LEN];
    len_buf.copy_from_slice(len_bytes);
    let data_len = u32::from_le_bytes(len_buf);
    let needed = data_len as usize + CHECKSUM_LEN;
    if rest.len() < needed {
        return Err(SnapshotError::Truncated {
            needed: header + needed,
            available: bytes.len(),
        });
    }

    let (data, rest) = rest.split_at(data_len as usize);
    let stored = &rest[..CHECKSUM_LEN];
    if checksum(magic, data_len, data).as_slice() != stored {
        return Err(SnapshotError::ChecksumMismatch);
    }

    let snapshot = serde_json::from_slice(data)?;
    tracing::debug!(bytes = bytes.len(), "snapshot decoded");
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::ItemKind;

    fn sample_player() -> Player {
        let config = BattleConfig::default();
        let mut player = Player::new("Aria", CharacterClass::Ranger, &config);
        player.gain_experience(300, &config);
        player.gold = 42;
        player.add_item(Item::weapon("Longbow", 11)).unwrap();
        player.add_item(Item::healing_potion("Health Potion", 25)).unwrap();
        player.equip_item("Longbow").unwrap();
        player.pools.health.drain(17);
        player
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let config = BattleConfig::default();
        let player = sample_player();
        let restored = Player::from_snapshot(player.to_snapshot(), &config);
        assert_eq!(restored, player);
    }

    #[test]
    fn test_from_snapshot_clamps_current_to_max() {
        let config = BattleConfig::default();
        let mut snapshot = sample_player().to_snapshot();
        snapshot.health = 9_999;
        snapshot.max_health = 80;
        let player = Player::from_snapshot(snapshot, &config);
        assert_eq!(player.pools.health.current(), 80);
        assert_eq!(player.pools.health.max(), 80);
    }

    #[test]
    fn test_json_tolerates_missing_optional_fields() {
        let json = r#"{
            "name": "Old Save",
            "class": "Mage",
            "level": 3,
            "experience": 10,
            "health": 90, "max_health": 120,
            "mana": 60, "max_mana": 70,
            "stamina": 100, "max_stamina": 110,
            "stats": {"strength": 11, "agility": 12, "intelligence": 15, "vitality": 10, "luck": 5},
            "available_stat_points": 2
        }"#;
        let snapshot = CharacterSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.gold, 0);
        assert!(snapshot.inventory.is_empty());
    }

    #[test]
    fn test_envelope_roundtrip() {
        let snapshot = sample_player().to_snapshot();
        let bytes = encode_snapshot(&snapshot).unwrap();
        assert_eq!(decode_snapshot(&bytes).unwrap(), snapshot);
    }

    #[test]
    fn test_envelope_detects_corruption() {
        let snapshot = sample_player().to_snapshot();
        let mut bytes = encode_snapshot(&snapshot).unwrap();
        bytes[20] ^= 0xFF;
        assert!(matches!(
            decode_snapshot(&bytes),
            Err(SnapshotError::ChecksumMismatch)
        ));
    }

    #[test]
    fn test_envelope_rejects_wrong_magic() {
        let mut bytes = encode_snapshot(&sample_player().to_snapshot()).unwrap();
        bytes[0] ^= 0x01;
        assert!(matches!(
            decode_snapshot(&bytes),
            Err(SnapshotError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn test_envelope_rejects_truncation() {
        let bytes = encode_snapshot(&sample_player().to_snapshot()).unwrap();
        assert!(matches!(
            decode_snapshot(&bytes[..bytes.len() - 1]),
            Err(SnapshotError::Truncated { .. })
        ));
        assert!(matches!(
            decode_snapshot(&bytes[..4]),
            Err(SnapshotError::Truncated { .. })
        ));
    }

    #[test]
    fn test_extra_item_fields_survive() {
        let config = BattleConfig::default();
        let mut player = Player::new("Bo", CharacterClass::Rogue, &config);
        let gem = Item::new("Ruby", ItemKind::Quest).with_extra("value", serde_json::json!(250));
        player.add_item(gem.clone()).unwrap();
        let bytes = encode_snapshot(&player.to_snapshot()).unwrap();
        let restored = Player::from_snapshot(decode_snapshot(&bytes).unwrap(), &config);
        assert_eq!(restored.get_item("ruby"), Some(&gem));
    }
}
