//! Budgeted incremental item search
//!
//! Walks the global item registry a bounded number of entries per tick,
//! keeping the best-scoring acceptable candidate found so far. Many agents
//! scan the same registry independently in the same tick, so per-tick cost
//! has to stay flat no matter how many items the world holds; the trade is
//! search latency, paid by low-priority objectives first.

use crate::acquire::filter::{candidate_matches, CandidateQuery};
use crate::acquire::objective::MoveTarget;
use crate::core::config::AcquireTuning;
use crate::core::types::{AgentId, ItemId, Team};
use crate::world::item::{Item, RootOwner};
use crate::world::pathfind::PathQuery;
use crate::world::World;

/// Caller-supplied score for a candidate, multiplied into the priority
pub type ItemScorer = dyn Fn(&Item) -> f32 + Send + Sync;

/// Result of one budgeted scan step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStep {
    /// More registry entries remain
    InProgress,
    /// The cursor reached the end of the registry
    Exhausted,
}

/// Everything one scan step needs besides the search state itself
pub struct ScanParams<'a> {
    pub query: CandidateQuery<'a>,
    /// Permit taking items whose ownership territory disagrees with the
    /// agent's team
    pub allow_stealing: bool,
    /// Score by combat utility instead of condition
    pub combat_priority: bool,
    /// Container identifiers never taken from
    pub ignored_containers: &'a [crate::core::types::Ident],
    pub scorer: Option<&'a ItemScorer>,
    /// Registry entries to inspect this step
    pub budget: usize,
    /// Gate each would-be best candidate behind a pathfinder query
    pub check_path: bool,
    pub paths: &'a dyn PathQuery,
}

/// Incremental search state over the item registry
///
/// The cursor only moves forward within a pass; the best score never
/// decreases. Ties keep the earlier-found candidate, so registry order is
/// the tie-break.
#[derive(Debug, Clone, Default)]
pub struct ItemSearch {
    cursor: usize,
    best_score: f32,
    best: Option<(ItemId, MoveTarget)>,
    done: bool,
}

impl ItemSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all progress for a fresh pass
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// End the pass without scanning (own-inventory short-circuit)
    pub fn finish(&mut self) {
        self.done = true;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn best_score(&self) -> f32 {
        self.best_score
    }

    pub fn best(&self) -> Option<(ItemId, MoveTarget)> {
        self.best
    }

    /// Adopt a candidate found outside the scan (inventory check, spawn)
    pub fn adopt(&mut self, item: ItemId, target: MoveTarget) {
        self.best = Some((item, target));
    }

    /// Inspect up to `budget` registry entries, advancing the cursor
    /// unconditionally past each
    ///
    /// A full pass over N entries therefore finishes in exactly
    /// ceil(N / budget) calls. The registry may shrink between calls; the
    /// cursor simply runs off the shorter end.
    pub fn advance(&mut self, world: &World, agent_id: AgentId, params: &ScanParams<'_>) -> SearchStep {
        if self.done {
            return SearchStep::Exhausted;
        }
        let len = world.items.len();
        let Some(agent) = world.agents.get(&agent_id) else {
            return SearchStep::InProgress;
        };
        let tuning = &world.tuning;
        let mut path_queried = false;

        for _ in 0..params.budget.max(1) {
            if self.cursor >= len {
                break;
            }
            let index = self.cursor;
            self.cursor += 1;
            let Some(item_id) = world.items.at_index(index) else {
                continue;
            };
            let Some(item) = world.items.get(item_id) else {
                continue;
            };

            // Both sides need a resolvable vessel context
            let Some(item_vessel) = world.item_vessel(item_id) else {
                continue;
            };
            let Some(my_vessel) = agent.vessel else {
                continue;
            };
            // Own holdings are the inventory check's business; re-targeting
            // a held item would spin forever on multi-count objectives
            if world.owned_by(item_id, agent_id) {
                continue;
            }
            // Outpost property stays with the outpost, ship property with the ship
            if !params.allow_stealing
                && ((agent.team == Team::OutpostNpc) != item.spawned_in_outpost)
            {
                continue;
            }
            if !candidate_matches(agent, item, &params.query) {
                continue;
            }
            if let Some(container_id) = world.items.immediate_container(item_id) {
                let Some(container) = world.items.get(container_id) else {
                    continue;
                };
                if container.storage().map_or(false, |s| s.no_take) {
                    continue;
                }
                if params.query.ignored_items.contains(&container_id) {
                    continue;
                }
                if params.ignored_containers.contains(&container.identifier) {
                    continue;
                }
                if !world.storage_access_ok(container_id, agent_id) {
                    continue;
                }
            }
            if !world.vessels_reachable(my_vessel, item_vessel) {
                continue;
            }
            if world.taken_by_other(item_id, agent_id) {
                continue;
            }

            let mut score = params.scorer.map_or(1.0, |scorer| scorer(item));
            let root = world.items.root_owner(item_id);
            if let RootOwner::Item(root_id) = root {
                let Some(root_item) = world.items.get(root_id) else {
                    continue;
                };
                if !root_item.interactable {
                    continue;
                }
                if !world.storage_access_ok(root_id, agent_id) {
                    continue;
                }
                // Item inside an item inside an item: prefer shallower finds
                if world.items.immediate_container(item_id) != Some(root_id) {
                    score *= tuning.nested_container_penalty;
                }
            }

            let Some(anchor) = world.item_anchor_position(item_id) else {
                continue;
            };
            score *= distance_factor(agent.position, anchor, params.combat_priority, tuning);
            if params.combat_priority {
                score *= combat_factor(item, tuning);
            } else {
                score *= item.condition / item.max_condition;
            }

            // Branch-and-bound: never trade down, and never trade sideways
            if self.best.is_some() && score <= self.best_score {
                continue;
            }
            // One pathfinder call per step, spent on the first contender
            if params.check_path && !path_queried {
                path_queried = true;
                if !params.paths.is_reachable(agent.position, anchor, my_vessel) {
                    continue;
                }
            }

            self.best_score = score;
            let target = match root {
                RootOwner::Loose => MoveTarget::Item(item_id),
                RootOwner::Agent(holder) => MoveTarget::Agent(holder),
                RootOwner::Item(root_id) => MoveTarget::Item(root_id),
            };
            self.best = Some((item_id, target));
        }

        if self.cursor >= len {
            self.done = true;
            SearchStep::Exhausted
        } else {
            SearchStep::InProgress
        }
    }
}

/// Distance falloff: full weight close by, fading to a floor far away
///
/// Vertical travel means ladders, so it is ignored inside the slack band and
/// heavily penalized beyond it.
fn distance_factor(from: glam::Vec2, to: glam::Vec2, combat: bool, tuning: &AcquireTuning) -> f32 {
    let mut y_dist = (from.y - to.y).abs();
    y_dist = if y_dist > tuning.vertical_slack {
        y_dist * tuning.vertical_penalty
    } else {
        0.0
    };
    let dist = (from.x - to.x).abs() + y_dist;
    let floor = if combat {
        tuning.combat_distance_floor
    } else {
        0.0
    };
    let blend = inverse_lerp(tuning.near_distance, tuning.far_distance, dist).clamp(0.0, 1.0);
    lerp(1.0, floor, blend)
}

/// Combat usefulness of an item, normalized to roughly 0..1
///
/// Rated weapons use their rating; everything else falls back to estimated
/// lethal damage, capped so improvised junk never outranks a real weapon.
fn combat_factor(item: &Item, tuning: &AcquireTuning) -> f32 {
    match item.weapon_stats() {
        Some((rating, _)) if rating > 0.0 => rating / tuning.combat_rating_scale,
        Some((_, lethal)) => (lethal / tuning.lethal_damage_scale).min(tuning.combat_fallback_cap),
        None => (item.summed_lethal_damage() / tuning.lethal_damage_scale)
            .min(tuning.combat_fallback_cap),
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if (b - a).abs() < f32::EPSILON {
        0.0
    } else {
        (value - a) / (b - a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::item::{Component, ItemLocation};
    use glam::Vec2;

    #[test]
    fn test_distance_factor_full_score_when_near() {
        let tuning = AcquireTuning::default();
        let factor = distance_factor(Vec2::ZERO, Vec2::new(80.0, 0.0), false, &tuning);
        assert!((factor - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_distance_factor_floors_at_far_distance() {
        let tuning = AcquireTuning::default();
        let normal = distance_factor(Vec2::ZERO, Vec2::new(20_000.0, 0.0), false, &tuning);
        let combat = distance_factor(Vec2::ZERO, Vec2::new(20_000.0, 0.0), true, &tuning);
        assert!((normal - 0.0).abs() < 1e-6);
        assert!((combat - tuning.combat_distance_floor).abs() < 1e-6);
    }

    #[test]
    fn test_vertical_distance_slack_and_penalty() {
        let tuning = AcquireTuning::default();
        // One deck over: vertical ignored entirely
        let near = distance_factor(Vec2::ZERO, Vec2::new(0.0, 90.0), false, &tuning);
        assert!((near - 1.0).abs() < 1e-6);
        // Well beyond slack: multiplied, so worth less than the same
        // distance horizontally
        let vertical = distance_factor(Vec2::ZERO, Vec2::new(0.0, 500.0), false, &tuning);
        let horizontal = distance_factor(Vec2::ZERO, Vec2::new(500.0, 0.0), false, &tuning);
        assert!(vertical < horizontal);
    }

    #[test]
    fn test_combat_factor_prefers_rated_weapons() {
        let tuning = AcquireTuning::default();
        let weapon = |rating, lethal| Item {
            id: crate::core::types::ItemId(0),
            identifier: crate::core::types::Ident::new("weapon"),
            tags: Vec::new(),
            variant_of: None,
            condition: 100.0,
            max_condition: 100.0,
            max_stack: 1,
            preferred_slot: None,
            location: ItemLocation::World {
                vessel: crate::core::types::VesselId(0),
                position: Vec2::ZERO,
            },
            claimed_by: None,
            spawned_in_outpost: false,
            restricted_to_team: None,
            interactable: true,
            components: vec![Component::MeleeWeapon {
                combat_rating: rating,
                lethal_damage: lethal,
            }],
        };

        let rated = combat_factor(&weapon(80.0, 10.0), &tuning);
        assert!((rated - 0.8).abs() < 1e-6);

        // Unrated weapons fall back to lethal damage, capped
        let unrated = combat_factor(&weapon(0.0, 900.0), &tuning);
        assert!((unrated - tuning.combat_fallback_cap).abs() < 1e-6);
    }
}
