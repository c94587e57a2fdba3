//! Error types for battle operations.
//!
//! Every [`BattleError`] is recoverable at the orchestrator boundary: the
//! offending action is reported and the same half-turn is re-prompted.
//! Only [`SnapshotError`] (persistence corruption) can abort an operation,
//! and it never touches an in-progress combat session.

use thiserror::Error;

/// How an error should be handled by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// Retry with a different action (e.g. pick another item).
    Recoverable,
    /// Input was invalid and should not be retried unchanged.
    Validation,
    /// Stored data is unusable.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Fatal)
    }
}

/// Failures raised by character, inventory, and combat operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    #[error("item '{0}' not found")]
    ItemNotFound(String),

    #[error("item '{0}' cannot be used")]
    ItemNotUsable(String),

    #[error("item '{0}' cannot be equipped")]
    ItemNotEquippable(String),

    #[error("inventory full (capacity {capacity})")]
    InventoryFull { capacity: usize },

    #[error("'{0}' is not a weapon you carry")]
    InvalidWeapon(String),

    #[error("{0} is dead")]
    CharacterDead(String),

    #[error("no stat points available")]
    InsufficientStats,

    #[error("already at max level {0}")]
    MaxLevelReached(u32),

    #[error("unknown stat '{0}'")]
    UnknownStat(String),

    #[error("fleeing is not allowed in this battle")]
    FleeNotAllowed,

    #[error("nothing equipped in the {0} slot")]
    NothingEquipped(String),
}

impl BattleError {
    pub const fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InventoryFull { .. }
            | Self::InsufficientStats
            | Self::MaxLevelReached(_)
            | Self::FleeNotAllowed
            | Self::CharacterDead(_) => ErrorSeverity::Recoverable,
            Self::ItemNotFound(_)
            | Self::ItemNotUsable(_)
            | Self::ItemNotEquippable(_)
            | Self::InvalidWeapon(_)
            | Self::UnknownStat(_)
            | Self::NothingEquipped(_) => ErrorSeverity::Validation,
        }
    }
}

/// Failures decoding or encoding a character snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot magic mismatch: expected {expected:#018x}, found {found:#018x}")]
    VersionMismatch { expected: u64, found: u64 },

    #[error("snapshot truncated: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    #[error("snapshot checksum mismatch")]
    ChecksumMismatch,

    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SnapshotError {
    pub const fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }
}

pub type Result<T> = std::result::Result<T, BattleError>;
