//! Turn-based combat: math, opponents, AI policies, loot, and the turn loop.

pub mod behavior;
pub mod combatant;
pub mod enemy;
pub mod events;
pub mod loot;
pub mod math;
pub mod orchestrator;
pub mod session;

pub use behavior::*;
pub use combatant::*;
pub use enemy::*;
pub use events::*;
pub use loot::*;
pub use math::*;
pub use orchestrator::*;
pub use session::*;
