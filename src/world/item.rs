//! Item instances and the global item registry
//!
//! The registry keeps every live item plus the registration order. The order
//! matters: the incremental item search walks it index by index across
//! several ticks, so it must be stable while items are merely mutated and
//! tolerate shrinking when items despawn.

use crate::core::types::{AgentId, EquipSlot, Ident, ItemId, Team, VesselId};
use crate::entity::inventory::Inventory;
use ahash::AHashMap;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Where an item currently is
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ItemLocation {
    /// Loose in the world, on some vessel
    World { vessel: VesselId, position: Vec2 },
    /// Inside another item's storage
    InItem(ItemId),
    /// In an agent's inventory or equipped
    InAgent(AgentId),
}

/// The outermost owner of an item's containment chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootOwner {
    /// The item itself is loose in the world
    Loose,
    Agent(AgentId),
    /// The outermost container item (itself loose in the world)
    Item(ItemId),
}

/// Item storage capability: an inventory plus access rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Storage {
    pub inventory: Inventory,
    /// Agents must hold an item with this tag to open the storage
    pub required_access: Option<Ident>,
    /// Contents may be used in place but never removed (lockers welded
    /// shut, mission caches)
    pub no_take: bool,
}

impl Storage {
    pub fn new(slot_count: usize) -> Self {
        Self {
            inventory: Inventory::new(slot_count),
            required_access: None,
            no_take: false,
        }
    }
}

/// Functional capabilities attached to an item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Component {
    /// The item can be picked up at all
    Pickable,
    MeleeWeapon {
        combat_rating: f32,
        lethal_damage: f32,
    },
    RangedWeapon {
        combat_rating: f32,
        lethal_damage: f32,
        loaded: bool,
    },
    Storage(Storage),
}

impl Component {
    /// Whether this component is in a usable/loaded state
    ///
    /// Only ranged weapons can report unloaded; everything else is always
    /// ready.
    pub fn is_loaded(&self) -> bool {
        match self {
            Component::RangedWeapon { loaded, .. } => *loaded,
            _ => true,
        }
    }

    /// Lethal damage this component could deal, if any
    pub fn lethal_damage(&self) -> f32 {
        match self {
            Component::MeleeWeapon { lethal_damage, .. }
            | Component::RangedWeapon { lethal_damage, .. } => *lethal_damage,
            _ => 0.0,
        }
    }
}

/// A live item instance
///
/// Prefab data (identifier, tags, stack size) is denormalized onto the
/// instance at spawn time so the hot search path never chases a prefab
/// lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub identifier: Ident,
    pub tags: Vec<Ident>,
    pub variant_of: Option<Ident>,
    pub condition: f32,
    pub max_condition: f32,
    pub max_stack: u32,
    pub preferred_slot: Option<EquipSlot>,
    pub location: ItemLocation,
    /// The agent currently holding or claiming this item, if any
    pub claimed_by: Option<AgentId>,
    pub spawned_in_outpost: bool,
    /// Only this team may use the item at all
    pub restricted_to_team: Option<Team>,
    /// Cleared for wreck debris and welded fixtures
    pub interactable: bool,
    pub components: Vec<Component>,
}

impl Item {
    pub fn has_tag(&self, tag: &Ident) -> bool {
        self.tags.contains(tag)
    }

    /// Whether the agent's team may use this item
    pub fn accessible_by(&self, team: Team) -> bool {
        self.restricted_to_team.map_or(true, |t| t == team)
    }

    pub fn is_pickable(&self) -> bool {
        self.components
            .iter()
            .any(|c| matches!(c, Component::Pickable))
    }

    /// All components report loaded
    pub fn is_loaded(&self) -> bool {
        self.components.iter().all(Component::is_loaded)
    }

    pub fn storage(&self) -> Option<&Storage> {
        self.components.iter().find_map(|c| match c {
            Component::Storage(s) => Some(s),
            _ => None,
        })
    }

    pub fn storage_mut(&mut self) -> Option<&mut Storage> {
        self.components.iter_mut().find_map(|c| match c {
            Component::Storage(s) => Some(s),
            _ => None,
        })
    }

    /// Combat rating and lethal damage of the first weapon component
    pub fn weapon_stats(&self) -> Option<(f32, f32)> {
        self.components.iter().find_map(|c| match c {
            Component::MeleeWeapon {
                combat_rating,
                lethal_damage,
            }
            | Component::RangedWeapon {
                combat_rating,
                lethal_damage,
                ..
            } => Some((*combat_rating, *lethal_damage)),
            _ => None,
        })
    }

    /// Summed lethal damage across every component
    pub fn summed_lethal_damage(&self) -> f32 {
        self.components.iter().map(Component::lethal_damage).sum()
    }
}

/// Containment chains are a few levels deep in practice; the cap guards
/// against a malformed parent cycle.
const MAX_CONTAINMENT_DEPTH: usize = 32;

/// Registry of all live items
///
/// Registration order is the scan order for the incremental item search.
pub struct ItemRegistry {
    next_id: u64,
    order: Vec<ItemId>,
    items: AHashMap<ItemId, Item>,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            order: Vec::new(),
            items: AHashMap::new(),
        }
    }

    /// Number of live items (also the scan sequence length)
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Item handle at a scan index, if the registry still reaches that far
    pub fn at_index(&self, index: usize) -> Option<ItemId> {
        self.order.get(index).copied()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(&id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    /// Register a new item, assigning its handle
    ///
    /// The caller passes a constructor so the item can carry its own id.
    pub fn register<F>(&mut self, build: F) -> ItemId
    where
        F: FnOnce(ItemId) -> Item,
    {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        self.items.insert(id, build(id));
        self.order.push(id);
        id
    }

    /// Remove an item from the registry and the scan order
    pub fn despawn(&mut self, id: ItemId) -> Option<Item> {
        let item = self.items.remove(&id)?;
        self.order.retain(|&i| i != id);
        Some(item)
    }

    /// Immediate containing item, if the item sits in one
    pub fn immediate_container(&self, id: ItemId) -> Option<ItemId> {
        match self.get(id)?.location {
            ItemLocation::InItem(parent) => Some(parent),
            _ => None,
        }
    }

    /// Walk parent links to the outermost owner
    pub fn root_owner(&self, id: ItemId) -> RootOwner {
        let mut current = id;
        for _ in 0..MAX_CONTAINMENT_DEPTH {
            match self.get(current).map(|i| i.location) {
                Some(ItemLocation::InItem(parent)) => current = parent,
                Some(ItemLocation::InAgent(agent)) => return RootOwner::Agent(agent),
                Some(ItemLocation::World { .. }) | None => {
                    return if current == id {
                        RootOwner::Loose
                    } else {
                        RootOwner::Item(current)
                    };
                }
            }
        }
        RootOwner::Loose
    }
}

impl Default for ItemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_item(id: ItemId, identifier: &str, location: ItemLocation) -> Item {
        Item {
            id,
            identifier: Ident::new(identifier),
            tags: Vec::new(),
            variant_of: None,
            condition: 100.0,
            max_condition: 100.0,
            max_stack: 1,
            preferred_slot: None,
            location,
            claimed_by: None,
            spawned_in_outpost: false,
            restricted_to_team: None,
            interactable: true,
            components: vec![Component::Pickable],
        }
    }

    fn loose(vessel: u32) -> ItemLocation {
        ItemLocation::World {
            vessel: VesselId(vessel),
            position: Vec2::ZERO,
        }
    }

    #[test]
    fn test_registration_order_is_scan_order() {
        let mut reg = ItemRegistry::new();
        let a = reg.register(|id| bare_item(id, "wrench", loose(0)));
        let b = reg.register(|id| bare_item(id, "crowbar", loose(0)));

        assert_eq!(reg.at_index(0), Some(a));
        assert_eq!(reg.at_index(1), Some(b));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_despawn_shrinks_scan_order() {
        let mut reg = ItemRegistry::new();
        let a = reg.register(|id| bare_item(id, "wrench", loose(0)));
        let b = reg.register(|id| bare_item(id, "crowbar", loose(0)));

        assert!(reg.despawn(a).is_some());
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.at_index(0), Some(b));
        assert_eq!(reg.at_index(1), None);
        assert!(!reg.contains(a));
    }

    #[test]
    fn test_root_owner_walks_chain() {
        let mut reg = ItemRegistry::new();
        let cabinet = reg.register(|id| {
            let mut item = bare_item(id, "cabinet", loose(0));
            item.components.push(Component::Storage(Storage::new(4)));
            item
        });
        let toolbox = reg.register(|id| {
            let mut item = bare_item(id, "toolbox", ItemLocation::InItem(cabinet));
            item.components.push(Component::Storage(Storage::new(2)));
            item
        });
        let wrench = reg.register(|id| bare_item(id, "wrench", ItemLocation::InItem(toolbox)));

        assert_eq!(reg.root_owner(cabinet), RootOwner::Loose);
        assert_eq!(reg.root_owner(toolbox), RootOwner::Item(cabinet));
        assert_eq!(reg.root_owner(wrench), RootOwner::Item(cabinet));
        assert_eq!(reg.immediate_container(wrench), Some(toolbox));
    }

    #[test]
    fn test_root_owner_held_by_agent() {
        let mut reg = ItemRegistry::new();
        let agent = AgentId::new();
        let bag = reg.register(|id| {
            let mut item = bare_item(id, "bag", ItemLocation::InAgent(agent));
            item.components.push(Component::Storage(Storage::new(4)));
            item
        });
        let flare = reg.register(|id| bare_item(id, "flare", ItemLocation::InItem(bag)));

        assert_eq!(reg.root_owner(flare), RootOwner::Agent(agent));
    }

    #[test]
    fn test_loaded_state() {
        let mut item = bare_item(ItemId(0), "rifle", loose(0));
        item.components.push(Component::RangedWeapon {
            combat_rating: 50.0,
            lethal_damage: 40.0,
            loaded: false,
        });
        assert!(!item.is_loaded());
        assert_eq!(item.weapon_stats(), Some((50.0, 40.0)));
    }
}
