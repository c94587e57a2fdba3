//! Bounded, ordered item storage.

use super::types::Item;
use crate::error::{BattleError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<Item>,
    capacity: usize,
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Stores an item. A name already held (case-insensitive) joins that
    /// stack; only a new name takes a slot, and a full inventory hands the
    /// item back inside the error.
    pub fn add(&mut self, mut item: Item) -> std::result::Result<(), (BattleError, Item)> {
        item.quantity = item.quantity.max(1);
        if let Some(stack) = self.items.iter_mut().find(|held| held.matches_name(&item.name)) {
            stack.quantity = stack.quantity.saturating_add(item.quantity);
            return Ok(());
        }
        if self.is_full() {
            return Err((
                BattleError::InventoryFull {
                    capacity: self.capacity,
                },
                item,
            ));
        }
        self.items.push(item);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.matches_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn quantity(&self, name: &str) -> u32 {
        self.get(name).map_or(0, |item| item.quantity)
    }

    /// Items held across every stack.
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Takes a single item out of the matching stack. The entry goes away,
    /// order preserved, once its stack is empty.
    pub fn remove(&mut self, name: &str) -> Result<Item> {
        let index = self
            .items
            .iter()
            .position(|item| item.matches_name(name))
            .ok_or_else(|| BattleError::ItemNotFound(name.to_string()))?;
        let stack = &mut self.items[index];
        if stack.quantity > 1 {
            stack.quantity -= 1;
            return Ok(Item {
                quantity: 1,
                ..stack.clone()
            });
        }
        Ok(self.items.remove(index))
    }
}
