//! Item records, inventory, and equipment.

pub mod equipment;
pub mod inventory;
pub mod types;

pub use equipment::*;
pub use inventory::*;
pub use types::*;
