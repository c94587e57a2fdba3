//! Player character: stats, resources, progression, and persistence.

pub mod class;
pub mod player;
pub mod progression;
pub mod resources;
pub mod save;
pub mod stats;

pub use class::*;
pub use player::*;
pub use progression::*;
pub use resources::*;
pub use save::*;
pub use stats::*;
