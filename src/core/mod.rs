//! Balance constants and runtime configuration.

pub mod config;
pub mod constants;

pub use config::BattleConfig;
pub use constants::*;
