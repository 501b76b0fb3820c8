//! Pathfinder query contract
//!
//! The acquisition logic only ever asks a single question: can the agent
//! reach this position at all. The query is synchronous and potentially
//! expensive, so callers limit themselves to one invocation per objective
//! per tick.

use crate::core::types::VesselId;
use glam::Vec2;

/// Reachability oracle backed by whatever pathfinder the host simulation runs
pub trait PathQuery {
    /// Whether a walkable route exists between the two positions within the
    /// given vessel context
    fn is_reachable(&self, start: Vec2, end: Vec2, vessel: VesselId) -> bool;
}

/// Trivial oracle that reports everything reachable
///
/// Used by the headless demo and anywhere reachability is not under test.
pub struct OpenWater;

impl PathQuery for OpenWater {
    fn is_reachable(&self, _start: Vec2, _end: Vec2, _vessel: VesselId) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_water_always_reachable() {
        let oracle = OpenWater;
        assert!(oracle.is_reachable(Vec2::ZERO, Vec2::new(5000.0, -200.0), VesselId(0)));
    }
}
