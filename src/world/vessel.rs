//! Vessels and hull compartments
//!
//! A vessel is a submarine, station or wreck. Vessels can be linked by
//! docking ports; agents only consider items on their own vessel or on a
//! directly linked one.

use crate::core::types::{HullId, Team, VesselId};
use serde::{Deserialize, Serialize};

/// A vessel in the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vessel {
    pub id: VesselId,
    pub name: String,
    pub team: Team,
    /// Outpost vessels mark their native items, which matters for the
    /// stealing rules.
    pub is_outpost: bool,
    /// Vessels docked directly to this one
    pub links: Vec<VesselId>,
}

impl Vessel {
    pub fn new(id: VesselId, name: impl Into<String>, team: Team) -> Self {
        Self {
            id,
            name: name.into(),
            team,
            is_outpost: false,
            links: Vec::new(),
        }
    }

    pub fn outpost(mut self) -> Self {
        self.is_outpost = true;
        self
    }

    pub fn is_linked_to(&self, other: VesselId) -> bool {
        self.links.contains(&other)
    }
}

/// A hull compartment within a vessel
///
/// Only pressure matters here: a flooded hull with positive pressure is
/// lethal to an unprotected agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hull {
    pub id: HullId,
    pub vessel: VesselId,
    pub pressure: f32,
}

impl Hull {
    pub fn new(id: HullId, vessel: VesselId) -> Self {
        Self {
            id,
            vessel,
            pressure: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vessel_links() {
        let mut sub = Vessel::new(VesselId(0), "Typhon", Team::Crew);
        let outpost = Vessel::new(VesselId(1), "Seaview Station", Team::OutpostNpc).outpost();
        sub.links.push(outpost.id);

        assert!(sub.is_linked_to(VesselId(1)));
        assert!(!outpost.is_linked_to(VesselId(0)));
        assert!(outpost.is_outpost);
    }
}
