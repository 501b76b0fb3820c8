//! Get-item objectives: data model and lifecycle
//!
//! One objective per agent per wanted item (or item class). The owning
//! scheduler ticks it until it reports completed or abandoned; a soft reset
//! after contention rewinds the search but never the exclusion set, which is
//! what guarantees forward progress across retries.

use crate::acquire::filter::{count_held_matches, CandidateQuery, ItemPredicate};
use crate::acquire::navigation::{NavTaskId, Navigator};
use crate::acquire::search::{ItemSearch, ItemScorer};
use crate::core::types::{AgentId, EquipSlot, Ident, ItemId};
use crate::world::item::RootOwner;
use crate::world::spawn::SpawnTicket;
use crate::world::World;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};

/// Optional caller veto on the failure utterance
pub type SpeechGate = dyn Fn() -> bool + Send + Sync;

/// Where the agent must walk to lay hands on the target: the containment
/// root - a holding agent, the outermost container, or the item itself when
/// it lies loose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveTarget {
    Agent(AgentId),
    Item(ItemId),
}

/// What the owning scheduler sees each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveStatus {
    InProgress,
    Completed,
    Abandoned,
}

/// Internal phase of the acquisition state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Scanning the registry (or waiting on a spawn request)
    Seeking,
    /// Target known, checking it is still worth pursuing
    Validating,
    /// Walking toward the move target
    Navigating,
    /// In reach, attempting the transfer
    Interacting,
    Completed,
    Abandoned,
}

/// Policy knobs for a get-item objective
///
/// Immutable once the objective is built. Each flag is independent; the
/// state machine combines them exactly as documented on each field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetItemPolicy {
    /// Equip the item rather than just stowing it
    pub equip: bool,
    /// Allow equipping into worn slots (head, torso)
    pub wear: bool,
    /// Look through the agent's own inventory before scanning the world
    pub check_inventory: bool,
    /// Take items whose ownership territory disagrees with the agent's team
    pub allow_stealing: bool,
    /// Keep seeking even when the surrounding pressure would kill the agent
    pub allow_dangerous_pressure: bool,
    /// Accept prefab variants of the wanted identifiers
    pub allow_variants: bool,
    /// Reject items with any unloaded component
    pub require_loaded: bool,
    /// After taking the target, also pull the rest of its stack
    pub take_whole_stack: bool,
    /// Score candidates by combat utility instead of condition
    pub combat_priority: bool,
    /// Pathfinder-check each would-be best candidate (normally the state
    /// machine enables this itself for order-level objectives)
    pub check_path_per_item: bool,
    /// Conjure the cheapest matching item if the search comes up empty
    pub spawn_if_not_found: bool,
    /// Voice a throttled complaint on abandonment
    pub speak_on_failure: bool,
    /// Minimum acceptable condition, absolute units
    pub min_condition: f32,
    /// Completion requires the target equipped in exactly this slot
    pub equip_slot: Option<EquipSlot>,
}

impl Default for GetItemPolicy {
    fn default() -> Self {
        Self {
            equip: true,
            wear: false,
            check_inventory: true,
            allow_stealing: false,
            allow_dangerous_pressure: false,
            allow_variants: false,
            require_loaded: false,
            take_whole_stack: false,
            combat_priority: false,
            check_path_per_item: false,
            spawn_if_not_found: false,
            speak_on_failure: false,
            min_condition: 1.0,
            equip_slot: None,
        }
    }
}

/// Split a caller tag list on the `!` negation marker
///
/// `["weapon", "!toy"]` wants anything tagged weapon but never anything
/// tagged toy.
pub fn split_negated(tags: &[Ident]) -> (Vec<Ident>, Vec<Ident>) {
    let mut wanted = Vec::new();
    let mut ignored = Vec::new();
    for tag in tags {
        match tag.as_str().strip_prefix('!') {
            Some(rest) => ignored.push(Ident::new(rest)),
            None => wanted.push(tag.clone()),
        }
    }
    (wanted, ignored)
}

/// The containment root as a move target, if the item still exists
pub(crate) fn resolve_move_target(world: &World, item: ItemId) -> Option<MoveTarget> {
    if !world.items.contains(item) {
        return None;
    }
    Some(match world.items.root_owner(item) {
        RootOwner::Loose => MoveTarget::Item(item),
        RootOwner::Agent(holder) => MoveTarget::Agent(holder),
        RootOwner::Item(root) => MoveTarget::Item(root),
    })
}

/// An agent's intent to obtain an item
///
/// Built either around a specific item (explicit-target mode, no fallback)
/// or around a set of identifiers/tags (search mode, retries on contention).
pub struct GetItemObjective {
    pub(crate) agent: AgentId,
    pub(crate) policy: GetItemPolicy,
    /// `None` means pure explicit-target mode
    pub(crate) wanted: Option<Vec<Ident>>,
    pub(crate) ignored_tags: Vec<Ident>,
    pub(crate) ignored_containers: Vec<Ident>,
    pub(crate) explicit_target: Option<ItemId>,
    /// Items ruled out for this objective's lifetime; grows on contention
    /// and navigation failure, survives soft resets
    pub(crate) ignored_items: AHashSet<ItemId>,
    pub(crate) target_item: Option<ItemId>,
    pub(crate) move_to: Option<MoveTarget>,
    pub(crate) item_count: usize,
    /// Runtime copies of the equip/wear policy; a failed stow forces one
    /// retry with both enabled
    pub(crate) equip: bool,
    pub(crate) wear: bool,
    /// Runtime copy of the per-candidate path check; the state machine may
    /// switch it on for order-level objectives
    pub(crate) check_path_per_item: bool,
    pub(crate) search: ItemSearch,
    pub(crate) phase: Phase,
    pub(crate) nav_task: Option<NavTaskId>,
    pub(crate) spawn_ticket: Option<SpawnTicket>,
    pub(crate) scorer: Option<Box<ItemScorer>>,
    pub(crate) extra_filter: Option<Box<ItemPredicate>>,
    pub(crate) speech_gate: Option<Box<SpeechGate>>,
    pub(crate) utterance: Ident,
}

impl GetItemObjective {
    /// Objective for one specific item, handed in by the caller
    ///
    /// No tag fallback exists: if this exact item becomes unobtainable the
    /// objective abandons rather than retries.
    pub fn for_item(world: &World, agent: AgentId, target: ItemId, policy: GetItemPolicy) -> Self {
        let move_to = resolve_move_target(world, target);
        let equip = policy.equip;
        let wear = policy.wear;
        let check_path = policy.check_path_per_item;
        Self {
            agent,
            policy,
            wanted: None,
            ignored_tags: Vec::new(),
            ignored_containers: Vec::new(),
            explicit_target: Some(target),
            ignored_items: AHashSet::new(),
            target_item: Some(target),
            move_to,
            item_count: 1,
            equip,
            wear,
            check_path_per_item: check_path,
            search: ItemSearch::new(),
            phase: Phase::Validating,
            nav_task: None,
            spawn_ticket: None,
            scorer: None,
            extra_filter: None,
            speech_gate: None,
            utterance: Ident::new("cannotfinditem"),
        }
    }

    /// Objective for any item matching the given identifiers or tags
    ///
    /// Tags prefixed with `!` become exclusions instead.
    pub fn for_tags(agent: AgentId, tags: &[Ident], policy: GetItemPolicy) -> Self {
        let (wanted, ignored_tags) = split_negated(tags);
        let equip = policy.equip;
        let wear = policy.wear;
        let check_path = policy.check_path_per_item;
        Self {
            agent,
            policy,
            wanted: Some(wanted),
            ignored_tags,
            ignored_containers: Vec::new(),
            explicit_target: None,
            ignored_items: AHashSet::new(),
            target_item: None,
            move_to: None,
            item_count: 1,
            equip,
            wear,
            check_path_per_item: check_path,
            search: ItemSearch::new(),
            phase: Phase::Seeking,
            nav_task: None,
            spawn_ticket: None,
            scorer: None,
            extra_filter: None,
            speech_gate: None,
            utterance: Ident::new("cannotfinditem"),
        }
    }

    /// Require this many matching items before the objective completes
    pub fn with_item_count(mut self, count: usize) -> Self {
        self.item_count = count.max(1);
        self
    }

    /// Never take items out of containers with these identifiers
    pub fn with_ignored_containers(mut self, identifiers: &[&str]) -> Self {
        self.ignored_containers = identifiers.iter().map(|i| Ident::new(i)).collect();
        self
    }

    /// Multiply candidate scores through this callback
    pub fn with_scorer(mut self, scorer: Box<ItemScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    /// Additional caller veto over candidates
    pub fn with_filter(mut self, filter: Box<ItemPredicate>) -> Self {
        self.extra_filter = Some(filter);
        self
    }

    /// Gate the failure utterance on a caller condition
    pub fn with_speech_gate(mut self, gate: Box<SpeechGate>) -> Self {
        self.speech_gate = Some(gate);
        self
    }

    /// Override the failure utterance identifier
    pub fn with_utterance(mut self, utterance: impl Into<Ident>) -> Self {
        self.utterance = utterance.into();
        self
    }

    // === ACCESSORS ===

    pub fn agent(&self) -> AgentId {
        self.agent
    }

    pub fn policy(&self) -> &GetItemPolicy {
        &self.policy
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn target_item(&self) -> Option<ItemId> {
        self.target_item
    }

    pub fn move_target(&self) -> Option<MoveTarget> {
        self.move_to
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn ignored_items(&self) -> &AHashSet<ItemId> {
        &self.ignored_items
    }

    pub fn done_seeking(&self) -> bool {
        self.search.is_done()
    }

    pub fn search_cursor(&self) -> usize {
        self.search.cursor()
    }

    pub fn best_priority(&self) -> f32 {
        self.search.best_score()
    }

    /// The filter view of this objective's current wants and exclusions
    pub(crate) fn candidate_query(&self) -> CandidateQuery<'_> {
        CandidateQuery {
            wanted: self.wanted.as_deref().unwrap_or(&[]),
            ignored_tags: &self.ignored_tags,
            ignored_items: &self.ignored_items,
            min_condition: self.policy.min_condition,
            allow_variants: self.policy.allow_variants,
            require_loaded: self.policy.require_loaded,
            extra_filter: self.extra_filter.as_deref(),
        }
    }

    /// Rewind search progress and the current target, keeping exclusions
    ///
    /// An explicit target is restored and re-validated; a tag search starts
    /// its next pass from registry index 0.
    pub(crate) fn soft_reset(&mut self, world: &World, nav: &mut dyn Navigator) {
        if let Some(task) = self.nav_task.take() {
            nav.cancel(task);
        }
        self.target_item = self.explicit_target;
        self.move_to = self
            .explicit_target
            .and_then(|target| resolve_move_target(world, target));
        self.search.reset();
        self.phase = if self.explicit_target.is_some() {
            Phase::Validating
        } else {
            Phase::Seeking
        };
    }

    /// Scheduler-facing completion check, independent of the tick logic
    pub fn is_completed(&self, world: &World) -> bool {
        if self.phase == Phase::Completed {
            return true;
        }
        let Some(target) = self.target_item else {
            // Not yet ready
            return false;
        };
        if self.wanted.is_some() && self.item_count > 1 {
            return count_held_matches(world, self.agent, &self.candidate_query())
                >= self.item_count;
        }
        if self.equip {
            if let Some(slot) = self.policy.equip_slot {
                return world
                    .agents
                    .get(&self.agent)
                    .map_or(false, |a| a.has_equipped_in(target, slot));
            }
        }
        world.agent_holds(self.agent, target, self.equip)
    }
}
