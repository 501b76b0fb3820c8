//! Slot-based item storage
//!
//! An inventory is a fixed set of slots, each holding a stack of item
//! handles. Stacking rules (which identifiers stack, stack limits) live in
//! the world transfer code, which can see the items themselves; the
//! inventory is deliberately a dumb container of handles.

use crate::core::types::ItemId;
use serde::{Deserialize, Serialize};

/// A fixed-size set of item slots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<Vec<ItemId>>,
}

impl Inventory {
    pub fn new(slot_count: usize) -> Self {
        Self {
            slots: vec![Vec::new(); slot_count],
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, index: usize) -> &[ItemId] {
        &self.slots[index]
    }

    /// All items across all slots, in slot order
    pub fn all_items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.slots.iter().flatten().copied()
    }

    /// Index of the slot holding the given item
    pub fn slot_of(&self, item: ItemId) -> Option<usize> {
        self.slots.iter().position(|s| s.contains(&item))
    }

    /// Copy of a slot's current contents
    ///
    /// Taken before a transfer mutates the slot, so whole-stack pulls iterate
    /// a stable snapshot rather than a shifting live stack.
    pub fn snapshot_slot(&self, index: usize) -> Vec<ItemId> {
        self.slots[index].clone()
    }

    /// First slot satisfying the given predicate on its contents
    pub fn first_slot_where<F>(&self, pred: F) -> Option<usize>
    where
        F: Fn(&[ItemId]) -> bool,
    {
        self.slots.iter().position(|s| pred(s))
    }

    pub fn insert_at(&mut self, index: usize, item: ItemId) {
        self.slots[index].push(item);
    }

    /// Remove the item wherever it sits. Returns false if it was not held.
    pub fn remove(&mut self, item: ItemId) -> bool {
        for slot in &mut self.slots {
            if let Some(pos) = slot.iter().position(|&i| i == item) {
                slot.remove(pos);
                return true;
            }
        }
        false
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.slots.iter().any(|s| s.contains(&item))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.is_empty())
    }
}
