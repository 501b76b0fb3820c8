//! Per-agent state
//!
//! An agent is a crew member (player-adjacent or NPC) aboard a vessel.
//! Everything the acquisition logic needs to know about the body lives here;
//! behavior lives in `crate::acquire`.

use crate::core::types::{AgentId, EquipSlot, HullId, ItemId, Team, VesselId};
use crate::entity::inventory::Inventory;
use ahash::AHashMap;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Storage slots carried by every agent (pockets and a small pack)
pub const AGENT_STORAGE_SLOTS: usize = 8;

/// A crew agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub team: Team,
    pub vessel: Option<VesselId>,
    pub current_hull: Option<HullId>,
    pub position: Vec2,
    /// Pressure the agent can shrug off (diving suit, hardened body)
    pub pressure_protection: f32,
    /// Handcuffed, stunned grip, or otherwise unable to manipulate items
    pub lock_hands: bool,
    /// Player-crew agents voice their failures; NPCs stay quiet
    pub on_player_team: bool,
    pub inventory: Inventory,
    pub equipped: AHashMap<EquipSlot, ItemId>,
}

impl Agent {
    pub fn new(name: impl Into<String>, team: Team) -> Self {
        Self {
            id: AgentId::new(),
            name: name.into(),
            team,
            vessel: None,
            current_hull: None,
            position: Vec2::ZERO,
            pressure_protection: 0.0,
            lock_hands: false,
            on_player_team: team == Team::Crew,
            inventory: Inventory::new(AGENT_STORAGE_SLOTS),
            equipped: AHashMap::new(),
        }
    }

    pub fn aboard(mut self, vessel: VesselId, hull: HullId, position: Vec2) -> Self {
        self.vessel = Some(vessel);
        self.current_hull = Some(hull);
        self.position = position;
        self
    }

    /// Whether the item is equipped in any slot
    pub fn has_equipped(&self, item: ItemId) -> bool {
        self.equipped.values().any(|&i| i == item)
    }

    /// Whether the item is equipped in exactly the given slot
    pub fn has_equipped_in(&self, item: ItemId, slot: EquipSlot) -> bool {
        self.equipped.get(&slot) == Some(&item)
    }

    /// Items directly on the agent: equipped plus storage slots
    ///
    /// Does not recurse into held containers; the world-level queries do.
    pub fn direct_items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.equipped
            .values()
            .copied()
            .chain(self.inventory.all_items())
    }

    /// First free hand, if any
    pub fn free_hand(&self) -> Option<EquipSlot> {
        [EquipSlot::RightHand, EquipSlot::LeftHand]
            .into_iter()
            .find(|slot| !self.equipped.contains_key(slot))
    }
}
