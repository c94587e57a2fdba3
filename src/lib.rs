//! Duel - turn-based combat engine library
//!
//! One player against one AI opponent: combat math, behavior policies,
//! loot, progression, and a deterministic turn loop driven by an injected
//! RNG and action source.

pub mod character;
pub mod combat;
pub mod core;
pub mod error;
pub mod items;
pub mod simulator;
