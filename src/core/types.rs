//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for crew agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub Uuid);

impl AgentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a live item instance in the world registry
///
/// Item ids are assigned sequentially at spawn time. The registry keeps the
/// registration order, which is the order the incremental search walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u64);

/// Unique identifier for vessels (submarines, stations, wrecks)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VesselId(pub u32);

/// Unique identifier for hull compartments within a vessel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HullId(pub u32);

/// Index into the prefab catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrefabId(pub u32);

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// Team affiliation, used for ownership and stealing checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// The player's crew
    Crew,
    /// Friendly NPCs native to an outpost
    OutpostNpc,
    /// Hostile forces
    Hostile,
}

/// Equipment slots on an agent's body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipSlot {
    RightHand,
    LeftHand,
    Head,
    Torso,
}

impl EquipSlot {
    /// Slots that require the `wear` policy to equip into
    pub fn is_worn(&self) -> bool {
        matches!(self, EquipSlot::Head | EquipSlot::Torso)
    }
}

/// Lower-case identifier/tag atom
///
/// Used for item classes ("wrench"), tags ("weapon"), container classes and
/// utterance ids. Normalized to lower case on construction so lookups never
/// depend on caller casing, including when deserialized from data files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct Ident(String);

impl Ident {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Ident {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Ident {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
