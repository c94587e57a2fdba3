// Starting resources
pub const DEFAULT_HEALTH: u32 = 100;
pub const DEFAULT_MANA: u32 = 50;
pub const DEFAULT_STAMINA: u32 = 100;

// XP and leveling
pub const XP_CURVE_BASE: f64 = 100.0;
pub const XP_CURVE_EXPONENT: f64 = 1.5;
pub const MAX_LEVEL: u32 = 100;
pub const STAT_POINTS_PER_LEVEL: u32 = 5;
pub const SKILL_POINTS_PER_LEVEL: u32 = 1;

// Resource growth per level: flat + stat / divisor
pub const HEALTH_PER_LEVEL: u32 = 10;
pub const MANA_PER_LEVEL: u32 = 5;
pub const STAMINA_PER_LEVEL: u32 = 5;
pub const RESOURCE_GROWTH_STAT_DIVISOR: u32 = 5;

// Base attributes
pub const BASE_ATTRIBUTE_VALUE: u32 = 10;
pub const BASE_LUCK: u32 = 5;

// Combat
pub const BASE_CRIT_CHANCE: f64 = 0.05;
pub const CRIT_MULTIPLIER: f64 = 1.5;
pub const BASE_DODGE_CHANCE: f64 = 0.1;
pub const FLEE_BASE_CHANCE: f64 = 0.3;
pub const UNARMED_DAMAGE: u32 = 5;
pub const STRENGTH_DAMAGE_DIVISOR: u32 = 2;
pub const VITALITY_DEFENSE_DIVISOR: u32 = 3;
pub const LUCK_CRIT_DIVISOR: f64 = 100.0;
pub const AGILITY_CRIT_DIVISOR: f64 = 200.0;
pub const AGILITY_DODGE_DIVISOR: f64 = 100.0;
pub const AGILITY_FLEE_DIVISOR: f64 = 200.0;
pub const MIN_DAMAGE_TAKEN: u32 = 1;

// Opponents
pub const OPPONENT_FLEE_CHANCE: f64 = 0.3;
pub const SELF_BUFF_MULTIPLIER: f64 = 1.3;
pub const ENEMY_DAMAGE_VARIANCE: f64 = 0.1;
pub const BERSERK_HEALTH_PERCENT: f64 = 30.0;
pub const BERSERK_DAMAGE_MULTIPLIER: f64 = 1.5;
pub const LEVEL_SCALING_PER_LEVEL: f64 = 0.1;
pub const GOLD_MIN_PER_MULT: f64 = 5.0;
pub const GOLD_MAX_PER_MULT: f64 = 20.0;
pub const DEFAULT_DROP_CHANCE: f64 = 0.1;

// Items
pub const MAX_INVENTORY_SIZE: usize = 50;
pub const DEFAULT_BUFF_DURATION: u32 = 3;

// Combat log
pub const COMBAT_LOG_CAPACITY: usize = 50;

// Snapshot envelope
pub const SNAPSHOT_MAGIC: u64 = 0x4455_454C_5341_5601; // "DUELSAV" + version 1
