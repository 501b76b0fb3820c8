//! Shared world state: vessels, agents, and the item population

pub mod item;
pub mod pathfind;
pub mod prefab;
pub mod spawn;
pub mod vessel;

pub use item::{Component, Item, ItemLocation, ItemRegistry, RootOwner, Storage};
pub use pathfind::{OpenWater, PathQuery};
pub use prefab::{ComponentSpec, ItemPrefab, PrefabCatalog};
pub use spawn::{SpawnPoll, SpawnQueue, SpawnTicket};
pub use vessel::{Hull, Vessel};

use crate::core::config::AcquireTuning;
use crate::core::error::{Result, TideholdError};
use crate::core::types::{AgentId, EquipSlot, HullId, Ident, ItemId, PrefabId, Team, Tick, VesselId};
use crate::entity::agent::Agent;
use ahash::AHashMap;
use glam::Vec2;

/// How an item will be placed on an agent during a transfer
enum Placement {
    Equip(EquipSlot),
    /// Equip after moving the currently equipped item into a storage slot
    EquipDisplacing {
        slot: EquipSlot,
        displaced: ItemId,
        stow_slot: usize,
    },
    Stow(usize),
}

/// The simulation world
///
/// Owns every registry the acquisition logic touches. All lookups are
/// handle-based so containment chains and ownership can be walked without
/// holding borrows across mutations.
pub struct World {
    pub current_tick: Tick,
    pub tuning: AcquireTuning,
    pub items: ItemRegistry,
    pub agents: AHashMap<AgentId, Agent>,
    pub vessels: AHashMap<VesselId, Vessel>,
    pub hulls: AHashMap<HullId, Hull>,
    pub prefabs: PrefabCatalog,
    pub spawns: SpawnQueue,
    next_vessel: u32,
    next_hull: u32,
}

impl World {
    pub fn new() -> Self {
        Self {
            current_tick: 0,
            tuning: AcquireTuning::default(),
            items: ItemRegistry::new(),
            agents: AHashMap::new(),
            vessels: AHashMap::new(),
            hulls: AHashMap::new(),
            prefabs: PrefabCatalog::new(),
            spawns: SpawnQueue::new(),
            next_vessel: 0,
            next_hull: 0,
        }
    }

    /// Advance the simulation clock and fulfil pending spawn requests
    pub fn tick(&mut self) {
        self.current_tick += 1;
        self.process_spawns();
    }

    // === SETUP ===

    pub fn add_vessel(&mut self, name: impl Into<String>, team: Team) -> VesselId {
        let id = VesselId(self.next_vessel);
        self.next_vessel += 1;
        self.vessels.insert(id, Vessel::new(id, name, team));
        id
    }

    /// Dock two vessels so crews can cross between them
    pub fn link_vessels(&mut self, a: VesselId, b: VesselId) {
        if let Some(va) = self.vessels.get_mut(&a) {
            if !va.links.contains(&b) {
                va.links.push(b);
            }
        }
        if let Some(vb) = self.vessels.get_mut(&b) {
            if !vb.links.contains(&a) {
                vb.links.push(a);
            }
        }
    }

    pub fn add_hull(&mut self, vessel: VesselId) -> HullId {
        let id = HullId(self.next_hull);
        self.next_hull += 1;
        self.hulls.insert(id, Hull::new(id, vessel));
        id
    }

    pub fn add_agent(&mut self, agent: Agent) -> AgentId {
        let id = agent.id;
        self.agents.insert(id, agent);
        id
    }

    // === ITEM CREATION ===

    fn instantiate(&mut self, prefab_id: PrefabId, location: ItemLocation) -> Result<ItemId> {
        let prefab = self
            .prefabs
            .get(prefab_id)
            .ok_or_else(|| TideholdError::PrefabNotFound(format!("{prefab_id:?}")))?
            .clone();
        let id = self.items.register(|id| Item {
            id,
            identifier: prefab.identifier.clone(),
            tags: prefab.tags.clone(),
            variant_of: prefab.variant_of.clone(),
            condition: prefab.max_condition,
            max_condition: prefab.max_condition,
            max_stack: prefab.max_stack,
            preferred_slot: prefab.preferred_slot,
            location,
            claimed_by: None,
            spawned_in_outpost: false,
            restricted_to_team: None,
            interactable: true,
            components: prefab.components.iter().map(ComponentSpec::instantiate).collect(),
        });
        Ok(id)
    }

    /// Spawn an item loose in the world
    pub fn spawn_loose(
        &mut self,
        prefab: PrefabId,
        vessel: VesselId,
        position: Vec2,
    ) -> Result<ItemId> {
        if !self.vessels.contains_key(&vessel) {
            return Err(TideholdError::VesselNotFound(vessel));
        }
        self.instantiate(prefab, ItemLocation::World { vessel, position })
    }

    /// Spawn an item inside a container item's storage
    pub fn spawn_in_container(&mut self, prefab: PrefabId, container: ItemId) -> Result<ItemId> {
        let template = self
            .prefabs
            .get(prefab)
            .ok_or_else(|| TideholdError::PrefabNotFound(format!("{prefab:?}")))?;
        let ident = template.identifier.clone();
        let max_stack = template.max_stack;
        match self.items.get(container) {
            None => return Err(TideholdError::ItemNotFound(container)),
            Some(item) if item.storage().is_none() => {
                return Err(TideholdError::NotAContainer(container))
            }
            Some(_) => {}
        }
        let slot = self
            .container_slot_for(container, &ident, max_stack)
            .ok_or(TideholdError::InventoryFull)?;
        let id = self.instantiate(prefab, ItemLocation::InItem(container))?;
        if let Some(storage) = self.items.get_mut(container).and_then(Item::storage_mut) {
            storage.inventory.insert_at(slot, id);
        }
        Ok(id)
    }

    /// Spawn an item directly into an agent's storage slots
    pub fn spawn_on_agent(&mut self, prefab: PrefabId, agent_id: AgentId) -> Result<ItemId> {
        let template = self
            .prefabs
            .get(prefab)
            .ok_or_else(|| TideholdError::PrefabNotFound(format!("{prefab:?}")))?;
        let ident = template.identifier.clone();
        let max_stack = template.max_stack;
        if !self.agents.contains_key(&agent_id) {
            return Err(TideholdError::AgentNotFound(agent_id));
        }
        let slot = self
            .agent_slot_for(agent_id, &ident, max_stack)
            .ok_or(TideholdError::InventoryFull)?;
        let id = self.instantiate(prefab, ItemLocation::InAgent(agent_id))?;
        if let Some(agent) = self.agents.get_mut(&agent_id) {
            agent.inventory.insert_at(slot, id);
            if let Some(item) = self.items.get_mut(id) {
                item.claimed_by = Some(agent_id);
            }
        }
        Ok(id)
    }

    /// Remove an item and everything stored inside it
    pub fn despawn_item(&mut self, id: ItemId) {
        let mut worklist = vec![id];
        while let Some(current) = worklist.pop() {
            // Detach the handle from whatever holds it
            match self.items.get(current).map(|i| i.location) {
                Some(ItemLocation::InItem(parent)) => {
                    if let Some(storage) = self.items.get_mut(parent).and_then(Item::storage_mut) {
                        storage.inventory.remove(current);
                    }
                }
                Some(ItemLocation::InAgent(holder)) => {
                    if let Some(agent) = self.agents.get_mut(&holder) {
                        agent.inventory.remove(current);
                        agent.equipped.retain(|_, &mut held| held != current);
                    }
                }
                _ => {}
            }
            if let Some(item) = self.items.despawn(current) {
                if let Some(storage) = item.storage() {
                    worklist.extend(storage.inventory.all_items());
                }
            }
        }
    }

    // === CONTAINMENT AND POSITION QUERIES ===

    /// Vessel the item effectively sits on, through its containment root
    pub fn item_vessel(&self, item: ItemId) -> Option<VesselId> {
        match self.items.root_owner(item) {
            RootOwner::Loose => match self.items.get(item)?.location {
                ItemLocation::World { vessel, .. } => Some(vessel),
                _ => None,
            },
            RootOwner::Agent(agent) => self.agents.get(&agent)?.vessel,
            RootOwner::Item(root) => match self.items.get(root)?.location {
                ItemLocation::World { vessel, .. } => Some(vessel),
                _ => None,
            },
        }
    }

    /// World position the item can be reached at (its containment root)
    pub fn item_anchor_position(&self, item: ItemId) -> Option<Vec2> {
        match self.items.root_owner(item) {
            RootOwner::Loose => match self.items.get(item)?.location {
                ItemLocation::World { position, .. } => Some(position),
                _ => None,
            },
            RootOwner::Agent(agent) => Some(self.agents.get(&agent)?.position),
            RootOwner::Item(root) => match self.items.get(root)?.location {
                ItemLocation::World { position, .. } => Some(position),
                _ => None,
            },
        }
    }

    /// Whether the item's containment root is the given agent
    pub fn owned_by(&self, item: ItemId, agent: AgentId) -> bool {
        self.items.root_owner(item) == RootOwner::Agent(agent)
    }

    /// Whether some other agent currently holds or claims the item
    pub fn taken_by_other(&self, item: ItemId, agent: AgentId) -> bool {
        self.items
            .get(item)
            .and_then(|i| i.claimed_by)
            .map_or(false, |claimant| claimant != agent)
    }

    pub fn vessels_reachable(&self, from: VesselId, to: VesselId) -> bool {
        from == to
            || self
                .vessels
                .get(&from)
                .map_or(false, |vessel| vessel.is_linked_to(to))
    }

    /// Lethal pressure check: outside any hull, or in a flooded hull without
    /// enough protection
    pub fn dangerous_pressure(&self, agent: &Agent) -> bool {
        match agent.current_hull {
            None => true,
            Some(hull_id) => self.hulls.get(&hull_id).map_or(true, |hull| {
                hull.pressure > 0.0 && agent.pressure_protection <= 0.0
            }),
        }
    }

    // === HELD-ITEM QUERIES ===

    /// Every item the agent carries, recursing through held containers
    pub fn held_items_recursive(&self, agent_id: AgentId) -> Vec<ItemId> {
        let Some(agent) = self.agents.get(&agent_id) else {
            return Vec::new();
        };
        let mut stack: Vec<ItemId> = agent.direct_items().collect();
        let mut held = Vec::new();
        while let Some(id) = stack.pop() {
            held.push(id);
            if let Some(storage) = self.items.get(id).and_then(Item::storage) {
                stack.extend(storage.inventory.all_items());
            }
        }
        held
    }

    /// Whether the agent carries an item bearing the given tag
    pub fn agent_holds_tag(&self, agent_id: AgentId, tag: &Ident) -> bool {
        self.held_items_recursive(agent_id)
            .iter()
            .any(|&id| self.items.get(id).map_or(false, |i| i.has_tag(tag)))
    }

    /// Whether the agent holds the item, optionally requiring it equipped
    pub fn agent_holds(&self, agent_id: AgentId, item: ItemId, require_equipped: bool) -> bool {
        if self.items.root_owner(item) != RootOwner::Agent(agent_id) {
            return false;
        }
        if require_equipped {
            self.agents
                .get(&agent_id)
                .map_or(false, |agent| agent.has_equipped(item))
        } else {
            true
        }
    }

    /// Whether the agent satisfies a container's access requirement
    pub fn storage_access_ok(&self, container: ItemId, agent_id: AgentId) -> bool {
        match self
            .items
            .get(container)
            .and_then(Item::storage)
            .and_then(|s| s.required_access.as_ref())
        {
            None => true,
            Some(tag) => self.agent_holds_tag(agent_id, tag),
        }
    }

    // === REACH ===

    /// Whether the agent is close enough to touch the item's reach anchor
    pub fn within_reach_item(&self, agent_id: AgentId, item: ItemId) -> bool {
        let Some(agent) = self.agents.get(&agent_id) else {
            return false;
        };
        self.item_anchor_position(item)
            .map_or(false, |anchor| {
                agent.position.distance(anchor) <= self.tuning.default_reach
            })
    }

    /// Whether two agents are close enough to interact
    pub fn within_reach_agent(&self, agent_id: AgentId, other_id: AgentId) -> bool {
        match (self.agents.get(&agent_id), self.agents.get(&other_id)) {
            (Some(a), Some(b)) => a.position.distance(b.position) <= self.tuning.default_reach,
            _ => false,
        }
    }

    // === TRANSFER ===

    /// Move an item into an agent's possession
    ///
    /// With `equip`, the item goes into its preferred equip slot (a hand by
    /// default; `wear` additionally allows head/torso slots), displacing the
    /// current occupant into storage. Without it, or when no equip slot
    /// works, the item is stowed. Returns false and leaves everything
    /// untouched when there is no room.
    pub fn take_item(&mut self, taker: AgentId, item_id: ItemId, equip: bool, wear: bool) -> bool {
        let Some(item) = self.items.get(item_id) else {
            return false;
        };
        let Some(agent) = self.agents.get(&taker) else {
            return false;
        };
        let ident = item.identifier.clone();
        let max_stack = item.max_stack;
        let preferred = item.preferred_slot;

        let placement = if equip {
            self.plan_equip(agent, item_id, preferred, wear)
        } else {
            None
        };
        let placement = match placement.or_else(|| {
            self.agent_slot_for(taker, &ident, max_stack)
                .map(Placement::Stow)
        }) {
            Some(p) => p,
            None => {
                tracing::debug!(agent = ?taker, item = %ident, "transfer failed: no room");
                return false;
            }
        };

        self.detach(item_id);

        let Some(agent) = self.agents.get_mut(&taker) else {
            return false;
        };
        match placement {
            Placement::Equip(slot) => {
                agent.equipped.insert(slot, item_id);
            }
            Placement::EquipDisplacing {
                slot,
                displaced,
                stow_slot,
            } => {
                agent.equipped.remove(&slot);
                agent.inventory.insert_at(stow_slot, displaced);
                agent.equipped.insert(slot, item_id);
            }
            Placement::Stow(slot) => {
                agent.inventory.insert_at(slot, item_id);
            }
        }
        if let Some(item) = self.items.get_mut(item_id) {
            item.location = ItemLocation::InAgent(taker);
            item.claimed_by = Some(taker);
        }
        true
    }

    /// Pick the equip placement, if one is possible
    fn plan_equip(
        &self,
        agent: &Agent,
        item_id: ItemId,
        preferred: Option<EquipSlot>,
        wear: bool,
    ) -> Option<Placement> {
        let slot = match preferred {
            Some(slot) if slot.is_worn() => {
                if wear {
                    slot
                } else {
                    return None;
                }
            }
            Some(slot) => agent.free_hand().unwrap_or(slot),
            None => return None,
        };
        match agent.equipped.get(&slot) {
            None => Some(Placement::Equip(slot)),
            Some(&occupant) if occupant == item_id => Some(Placement::Equip(slot)),
            Some(&occupant) => {
                let displaced = self.items.get(occupant)?;
                let stow_slot =
                    self.agent_slot_for(agent.id, &displaced.identifier, displaced.max_stack)?;
                Some(Placement::EquipDisplacing {
                    slot,
                    displaced: occupant,
                    stow_slot,
                })
            }
        }
    }

    /// Storage slot an item of this identifier can join: a non-full stack of
    /// the same identifier first, then any empty slot
    fn agent_slot_for(&self, agent_id: AgentId, ident: &Ident, max_stack: u32) -> Option<usize> {
        let agent = self.agents.get(&agent_id)?;
        agent
            .inventory
            .first_slot_where(|slot| {
                !slot.is_empty()
                    && slot.len() < max_stack as usize
                    && self
                        .items
                        .get(slot[0])
                        .map_or(false, |first| &first.identifier == ident)
            })
            .or_else(|| agent.inventory.first_slot_where(|slot| slot.is_empty()))
    }

    fn container_slot_for(&self, container: ItemId, ident: &Ident, max_stack: u32) -> Option<usize> {
        let storage = self.items.get(container).and_then(Item::storage)?;
        storage
            .inventory
            .first_slot_where(|slot| {
                !slot.is_empty()
                    && slot.len() < max_stack as usize
                    && self
                        .items
                        .get(slot[0])
                        .map_or(false, |first| &first.identifier == ident)
            })
            .or_else(|| storage.inventory.first_slot_where(|slot| slot.is_empty()))
    }

    /// Remove the item's handle from whatever currently holds it
    fn detach(&mut self, item_id: ItemId) {
        match self.items.get(item_id).map(|i| i.location) {
            Some(ItemLocation::InItem(parent)) => {
                if let Some(storage) = self.items.get_mut(parent).and_then(Item::storage_mut) {
                    storage.inventory.remove(item_id);
                }
            }
            Some(ItemLocation::InAgent(holder)) => {
                if let Some(agent) = self.agents.get_mut(&holder) {
                    agent.inventory.remove(item_id);
                    agent.equipped.retain(|_, &mut held| held != item_id);
                }
            }
            _ => {}
        }
    }

    // === SPAWN QUEUE ===

    fn process_spawns(&mut self) {
        let requests = self.spawns.drain_pending();
        for request in requests {
            let result = match self.spawn_on_agent(request.prefab, request.destination) {
                Ok(item) => {
                    if request.mark_outpost {
                        if let Some(spawned) = self.items.get_mut(item) {
                            spawned.spawned_in_outpost = true;
                        }
                    }
                    tracing::debug!(?item, prefab = ?request.prefab, "spawn request fulfilled");
                    SpawnPoll::Spawned(item)
                }
                Err(err) => {
                    tracing::debug!(prefab = ?request.prefab, %err, "spawn request failed");
                    SpawnPoll::Failed
                }
            };
            self.spawns.record(request.ticket, result);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::prefab::ItemPrefab;

    fn world_with_vessel() -> (World, VesselId, HullId) {
        let mut world = World::new();
        let vessel = world.add_vessel("Typhon", Team::Crew);
        let hull = world.add_hull(vessel);
        (world, vessel, hull)
    }

    fn crew_agent(world: &mut World, vessel: VesselId, hull: HullId) -> AgentId {
        world.add_agent(Agent::new("Hekter", Team::Crew).aboard(vessel, hull, Vec2::ZERO))
    }

    #[test]
    fn test_spawn_loose_and_anchor() {
        let (mut world, vessel, _) = world_with_vessel();
        let wrench = world.prefabs.add(ItemPrefab::new("wrench"));
        let id = world
            .spawn_loose(wrench, vessel, Vec2::new(50.0, 0.0))
            .unwrap();

        assert_eq!(world.item_vessel(id), Some(vessel));
        assert_eq!(world.item_anchor_position(id), Some(Vec2::new(50.0, 0.0)));
        assert_eq!(world.items.root_owner(id), RootOwner::Loose);
    }

    #[test]
    fn test_nested_anchor_is_root_position() {
        let (mut world, vessel, _) = world_with_vessel();
        let cabinet_prefab = world.prefabs.add(
            ItemPrefab::new("cabinet").with_component(ComponentSpec::Storage {
                slots: 4,
                required_access: None,
                no_take: false,
            }),
        );
        let wrench_prefab = world.prefabs.add(ItemPrefab::new("wrench"));

        let cabinet = world
            .spawn_loose(cabinet_prefab, vessel, Vec2::new(300.0, 0.0))
            .unwrap();
        let wrench = world.spawn_in_container(wrench_prefab, cabinet).unwrap();

        assert_eq!(world.item_anchor_position(wrench), Some(Vec2::new(300.0, 0.0)));
        assert_eq!(world.items.root_owner(wrench), RootOwner::Item(cabinet));
        assert_eq!(world.item_vessel(wrench), Some(vessel));
    }

    #[test]
    fn test_take_item_stow_and_stacking() {
        let (mut world, vessel, hull) = world_with_vessel();
        let agent = crew_agent(&mut world, vessel, hull);
        let mut flare = ItemPrefab::new("flare");
        flare.max_stack = 4;
        let flare = world.prefabs.add(flare);

        let a = world.spawn_loose(flare, vessel, Vec2::ZERO).unwrap();
        let b = world.spawn_loose(flare, vessel, Vec2::ZERO).unwrap();

        assert!(world.take_item(agent, a, false, false));
        assert!(world.take_item(agent, b, false, false));

        let inv = &world.agents[&agent].inventory;
        assert_eq!(inv.slot_of(a), inv.slot_of(b), "same-identifier items stack");
        assert!(world.agent_holds(agent, a, false));
        assert_eq!(world.items.get(a).unwrap().claimed_by, Some(agent));
    }

    #[test]
    fn test_take_item_equip_displaces_held() {
        let (mut world, vessel, hull) = world_with_vessel();
        let agent = crew_agent(&mut world, vessel, hull);
        let mut wrench = ItemPrefab::new("wrench");
        wrench.preferred_slot = Some(EquipSlot::RightHand);
        let wrench = world.prefabs.add(wrench);

        let first = world.spawn_loose(wrench, vessel, Vec2::ZERO).unwrap();
        let second = world.spawn_loose(wrench, vessel, Vec2::ZERO).unwrap();

        assert!(world.take_item(agent, first, true, false));
        assert!(world.agents[&agent].has_equipped(first));

        // Second wrench takes the free hand
        assert!(world.take_item(agent, second, true, false));
        let agent_state = &world.agents[&agent];
        assert!(agent_state.has_equipped(first) && agent_state.has_equipped(second));
    }

    #[test]
    fn test_take_item_fails_when_full() {
        let (mut world, vessel, hull) = world_with_vessel();
        let agent = crew_agent(&mut world, vessel, hull);
        let crate_prefab = world.prefabs.add(ItemPrefab::new("supplycrate"));

        // Fill every storage slot with unstackable crates
        for _ in 0..crate::entity::agent::AGENT_STORAGE_SLOTS {
            let id = world.spawn_loose(crate_prefab, vessel, Vec2::ZERO).unwrap();
            assert!(world.take_item(agent, id, false, false));
        }
        let overflow = world.spawn_loose(crate_prefab, vessel, Vec2::ZERO).unwrap();
        assert!(!world.take_item(agent, overflow, false, false));
        assert_eq!(
            world.items.get(overflow).unwrap().location,
            ItemLocation::World {
                vessel,
                position: Vec2::ZERO
            },
            "failed transfer leaves the item in place"
        );
    }

    #[test]
    fn test_wear_required_for_worn_slots() {
        let (mut world, vessel, hull) = world_with_vessel();
        let agent = crew_agent(&mut world, vessel, hull);
        let mut helmet = ItemPrefab::new("divinghelmet");
        helmet.preferred_slot = Some(EquipSlot::Head);
        let helmet = world.prefabs.add(helmet);

        let id = world.spawn_loose(helmet, vessel, Vec2::ZERO).unwrap();
        assert!(world.take_item(agent, id, true, false));
        // Without wear it lands in storage, not on the head
        assert!(!world.agents[&agent].has_equipped(id));

        let second = world.spawn_loose(helmet, vessel, Vec2::ZERO).unwrap();
        assert!(world.take_item(agent, second, true, true));
        assert!(world.agents[&agent].has_equipped_in(second, EquipSlot::Head));
    }

    #[test]
    fn test_spawn_queue_fulfilment() {
        let (mut world, vessel, hull) = world_with_vessel();
        let agent = crew_agent(&mut world, vessel, hull);
        let wrench = world.prefabs.add(ItemPrefab::new("wrench"));

        let ticket = world.spawns.enqueue(wrench, agent, true);
        assert_eq!(world.spawns.poll(ticket), SpawnPoll::Pending);

        world.tick();
        match world.spawns.poll(ticket) {
            SpawnPoll::Spawned(item) => {
                assert!(world.agent_holds(agent, item, false));
                assert!(world.items.get(item).unwrap().spawned_in_outpost);
            }
            other => panic!("expected fulfilment, got {other:?}"),
        }
    }

    #[test]
    fn test_despawn_cascades_into_contents() {
        let (mut world, vessel, _) = world_with_vessel();
        let cabinet_prefab = world.prefabs.add(
            ItemPrefab::new("cabinet").with_component(ComponentSpec::Storage {
                slots: 4,
                required_access: None,
                no_take: false,
            }),
        );
        let wrench_prefab = world.prefabs.add(ItemPrefab::new("wrench"));
        let cabinet = world.spawn_loose(cabinet_prefab, vessel, Vec2::ZERO).unwrap();
        let wrench = world.spawn_in_container(wrench_prefab, cabinet).unwrap();

        world.despawn_item(cabinet);
        assert!(!world.items.contains(cabinet));
        assert!(!world.items.contains(wrench));
        assert_eq!(world.items.len(), 0);
    }

    #[test]
    fn test_vessel_reachability() {
        let mut world = World::new();
        let sub = world.add_vessel("Typhon", Team::Crew);
        let outpost = world.add_vessel("Seaview", Team::OutpostNpc);
        let wreck = world.add_vessel("Perdition", Team::Hostile);
        world.link_vessels(sub, outpost);

        assert!(world.vessels_reachable(sub, sub));
        assert!(world.vessels_reachable(sub, outpost));
        assert!(world.vessels_reachable(outpost, sub));
        assert!(!world.vessels_reachable(sub, wreck));
    }

    #[test]
    fn test_dangerous_pressure() {
        let (mut world, vessel, hull) = world_with_vessel();
        let agent_id = crew_agent(&mut world, vessel, hull);

        assert!(!world.dangerous_pressure(&world.agents[&agent_id]));

        if let Some(h) = world.hulls.get_mut(&hull) {
            h.pressure = 40.0;
        }
        assert!(world.dangerous_pressure(&world.agents[&agent_id]));

        if let Some(agent) = world.agents.get_mut(&agent_id) {
            agent.pressure_protection = 100.0;
        }
        assert!(!world.dangerous_pressure(&world.agents[&agent_id]));

        if let Some(agent) = world.agents.get_mut(&agent_id) {
            agent.current_hull = None;
        }
        assert!(world.dangerous_pressure(&world.agents[&agent_id]));
    }
}
