//! Bounded resource pools (health, mana, stamina).
//!
//! A pool's `current` value is private; every way of changing it clamps to
//! `[0, max]`, including deserialization, so an out-of-range value can never
//! be observed.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Resource Kind
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Health,
    Mana,
    Stamina,
}

impl ResourceKind {
    pub fn all() -> [ResourceKind; 3] {
        [ResourceKind::Health, ResourceKind::Mana, ResourceKind::Stamina]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Health => "health",
            ResourceKind::Mana => "mana",
            ResourceKind::Stamina => "stamina",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Resource Pool
// ============================================================================

/// Unchecked wire shape; converted through [`ResourcePool::new`] on load.
#[derive(Deserialize)]
struct RawPool {
    current: u32,
    max: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPool")]
pub struct ResourcePool {
    current: u32,
    max: u32,
}

impl From<RawPool> for ResourcePool {
    fn from(raw: RawPool) -> Self {
        ResourcePool::new(raw.current, raw.max)
    }
}

impl ResourcePool {
    /// Creates a pool, clamping `current` into `[0, max]`.
    pub fn new(current: u32, max: u32) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }

    pub fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn set_current(&mut self, value: u32) {
        self.current = value.min(self.max);
    }

    /// Changes the cap. Shrinking below `current` drags `current` down.
    pub fn set_max(&mut self, max: u32) {
        self.max = max;
        self.current = self.current.min(max);
    }

    pub fn grow_max(&mut self, amount: u32) {
        self.set_max(self.max.saturating_add(amount));
    }

    /// Adds up to `amount`, returning what was actually restored.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let before = self.current;
        self.set_current(self.current.saturating_add(amount));
        self.current - before
    }

    /// Removes up to `amount`, returning what was actually drained.
    pub fn drain(&mut self, amount: u32) -> u32 {
        let before = self.current;
        self.current = self.current.saturating_sub(amount);
        before - self.current
    }

    pub fn refill(&mut self) {
        self.current = self.max;
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    pub fn is_full(&self) -> bool {
        self.current == self.max
    }

    /// Current as a percentage of max (0.0 for a zero-capacity pool).
    pub fn percentage(&self) -> f64 {
        if self.max == 0 {
            return 0.0;
        }
        self.current as f64 / self.max as f64 * 100.0
    }
}

// ============================================================================
// Resource Pools
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePools {
    pub health: ResourcePool,
    pub mana: ResourcePool,
    pub stamina: ResourcePool,
}

impl ResourcePools {
    pub fn full(health: u32, mana: u32, stamina: u32) -> Self {
        Self {
            health: ResourcePool::full(health),
            mana: ResourcePool::full(mana),
            stamina: ResourcePool::full(stamina),
        }
    }

    pub fn get(&self, kind: ResourceKind) -> &ResourcePool {
        match kind {
            ResourceKind::Health => &self.health,
            ResourceKind::Mana => &self.mana,
            ResourceKind::Stamina => &self.stamina,
        }
    }

    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut ResourcePool {
        match kind {
            ResourceKind::Health => &mut self.health,
            ResourceKind::Mana => &mut self.mana,
            ResourceKind::Stamina => &mut self.stamina,
        }
    }

    pub fn refill_all(&mut self) {
        for kind in ResourceKind::all() {
            self.get_mut(kind).refill();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_bounded(pool: &ResourcePool) {
        assert!(pool.current() <= pool.max(), "{pool:?} out of bounds");
    }

    #[test]
    fn test_new_clamps_current() {
        let pool = ResourcePool::new(150, 100);
        assert_eq!(pool.current(), 100);
    }

    #[test]
    fn test_set_current_clamps() {
        let mut pool = ResourcePool::full(100);
        pool.set_current(500);
        assert_eq!(pool.current(), 100);
        pool.set_current(0);
        assert_eq!(pool.current(), 0);
    }

    #[test]
    fn test_shrinking_max_clamps_current() {
        let mut pool = ResourcePool::full(100);
        pool.set_max(40);
        assert_eq!(pool.current(), 40);
        assert_eq!(pool.max(), 40);
    }

    #[test]
    fn test_drain_and_restore_report_actual_amounts() {
        let mut pool = ResourcePool::new(30, 100);
        assert_eq!(pool.drain(50), 30);
        assert!(pool.is_empty());
        assert_eq!(pool.restore(250), 100);
        assert!(pool.is_full());
    }

    #[test]
    fn test_mutation_sequence_stays_bounded() {
        let mut pool = ResourcePool::full(60);
        for step in 0..200u32 {
            match step % 5 {
                0 => {
                    pool.drain(step * 3);
                }
                1 => {
                    pool.restore(step * 7);
                }
                2 => pool.set_max(step % 90),
                3 => pool.set_current(step * 11),
                _ => pool.grow_max(step % 13),
            }
            assert_bounded(&pool);
        }
    }

    #[test]
    fn test_percentage() {
        assert_eq!(ResourcePool::new(25, 100).percentage(), 25.0);
        assert_eq!(ResourcePool::new(0, 0).percentage(), 0.0);
    }

    #[test]
    fn test_deserialize_clamps_current() {
        let pool: ResourcePool = serde_json::from_str(r#"{"current": 999, "max": 80}"#).unwrap();
        assert_eq!(pool.current(), 80);
        assert_eq!(pool.max(), 80);
    }

    #[test]
    fn test_refill_all() {
        let mut pools = ResourcePools::full(100, 50, 100);
        pools.health.drain(60);
        pools.get_mut(ResourceKind::Mana).drain(10);
        pools.refill_all();
        assert!(pools.health.is_full());
        assert_eq!(pools.get(ResourceKind::Mana).current(), 50);
    }
}
