//! Candidate filtering - pure predicates over items
//!
//! The filter decides whether an item is acceptable at all; scoring decides
//! which acceptable item to go for. Keeping the predicate side-effect free
//! means the search can re-evaluate it at any point without drift.

use crate::core::types::{AgentId, Ident, ItemId};
use crate::entity::agent::Agent;
use crate::world::item::Item;
use crate::world::World;
use ahash::AHashSet;

/// Caller-supplied veto over candidate items
pub type ItemPredicate = dyn Fn(&Item) -> bool + Send + Sync;

/// What the agent is looking for, plus everything ruled out so far
pub struct CandidateQuery<'a> {
    /// Acceptable identifiers or tags
    pub wanted: &'a [Ident],
    /// Identifiers/tags explicitly ruled out (parsed from `!`-prefixed input)
    pub ignored_tags: &'a [Ident],
    /// Items ruled out for this objective's lifetime
    pub ignored_items: &'a AHashSet<ItemId>,
    /// Minimum acceptable condition, absolute units
    pub min_condition: f32,
    /// Admit items whose prefab is a variant of a wanted identifier
    pub allow_variants: bool,
    /// Reject items with any unloaded component
    pub require_loaded: bool,
    pub extra_filter: Option<&'a ItemPredicate>,
}

/// Whether the item satisfies the query for this agent
///
/// Pure: no side effects, same answer for the same item and agent state.
pub fn candidate_matches(agent: &Agent, item: &Item, query: &CandidateQuery<'_>) -> bool {
    if !item.accessible_by(agent.team) {
        return false;
    }
    if query.ignored_items.contains(&item.id) {
        return false;
    }
    if query
        .ignored_tags
        .iter()
        .any(|tag| item.identifier == *tag || item.has_tag(tag))
    {
        return false;
    }
    if item.condition < query.min_condition {
        return false;
    }
    if let Some(filter) = query.extra_filter {
        if !filter(item) {
            return false;
        }
    }
    if query.require_loaded && !item.is_loaded() {
        return false;
    }
    query.wanted.iter().any(|id| {
        *id == item.identifier
            || item.has_tag(id)
            || (query.allow_variants && item.variant_of.as_ref() == Some(id))
    })
}

/// First matching item the agent already carries, searching nested containers
pub fn find_held_match(
    world: &World,
    agent_id: AgentId,
    query: &CandidateQuery<'_>,
) -> Option<ItemId> {
    let agent = world.agents.get(&agent_id)?;
    world
        .held_items_recursive(agent_id)
        .into_iter()
        .find(|&id| {
            world
                .items
                .get(id)
                .map_or(false, |item| candidate_matches(agent, item, query))
        })
}

/// How many matching items the agent already carries
pub fn count_held_matches(
    world: &World,
    agent_id: AgentId,
    query: &CandidateQuery<'_>,
) -> usize {
    let Some(agent) = world.agents.get(&agent_id) else {
        return 0;
    };
    world
        .held_items_recursive(agent_id)
        .into_iter()
        .filter(|&id| {
            world
                .items
                .get(id)
                .map_or(false, |item| candidate_matches(agent, item, query))
        })
        .count()
}
