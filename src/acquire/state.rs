//! Per-tick drive of a get-item objective
//!
//! One call per agent per simulation tick. While the search is incomplete
//! each tick advances the budgeted scan and returns; once a target exists
//! the tick validates it, walks toward it, and finally attempts the
//! transfer. Contention is resolved optimistically: the window between
//! picking a candidate and grabbing it is not atomic, and losing the race
//! is an ordinary soft reset, never an error.

use crate::acquire::filter::{count_held_matches, find_held_match, CandidateQuery};
use crate::acquire::navigation::{NavStatus, Navigator};
use crate::acquire::objective::{
    resolve_move_target, GetItemObjective, MoveTarget, ObjectiveStatus, Phase,
};
use crate::acquire::search::{ScanParams, SearchStep};
use crate::acquire::speech::SpeechSink;
use crate::core::types::{ItemId, Team};
use crate::world::pathfind::PathQuery;
use crate::world::World;

/// The high-level directive the agent is currently operating under
///
/// Only used to decide when the expensive per-candidate path check is worth
/// enabling: leak-repair crews and followers constantly move through areas
/// where many matching items are unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderKind {
    None,
    RepairLeaks,
    FollowWithGoto,
    Other,
}

/// Collaborators and scheduler context for one tick
pub struct AcquireContext<'a> {
    pub nav: &'a mut dyn Navigator,
    pub paths: &'a dyn PathQuery,
    pub speech: &'a mut dyn SpeechSink,
    /// Current priority of this objective in the owning scheduler
    pub priority: f32,
    pub active_order: OrderKind,
    /// Whether this objective is the current order (gates speech)
    pub is_current_order: bool,
}

impl GetItemObjective {
    /// Advance the objective by one tick
    pub fn tick(&mut self, world: &mut World, ctx: &mut AcquireContext<'_>) -> ObjectiveStatus {
        match self.phase {
            Phase::Completed => return ObjectiveStatus::Completed,
            Phase::Abandoned => return ObjectiveStatus::Abandoned,
            _ => {}
        }

        // Hard terminal conditions, checked regardless of mode
        let lock_hands = match world.agents.get(&self.agent) {
            Some(agent) => agent.lock_hands,
            None => return self.abandon(world, ctx, "agent no longer exists"),
        };
        if lock_hands {
            return self.abandon(world, ctx, "agent cannot manipulate items");
        }
        if world
            .agents
            .get(&self.agent)
            .and_then(|a| a.vessel)
            .is_none()
        {
            return self.abandon(world, ctx, "agent is outside any vessel");
        }

        if self.wanted.is_some() && !self.search.is_done() {
            self.phase = Phase::Seeking;
            if self.policy.check_inventory {
                self.try_inventory_shortcut(world);
            }
            if !self.search.is_done() {
                return self.seek_step(world, ctx);
            }
            // Own-inventory match: fall through and act on it this tick
        }

        // A spawn request stands in for the search result until it lands
        if self.target_item.is_none() {
            if let Some(ticket) = self.spawn_ticket {
                self.phase = Phase::Seeking;
                return match world.spawns.poll(ticket) {
                    crate::world::spawn::SpawnPoll::Pending => ObjectiveStatus::InProgress,
                    crate::world::spawn::SpawnPoll::Spawned(item) => {
                        self.spawn_ticket = None;
                        self.target_item = Some(item);
                        self.move_to = resolve_move_target(world, item);
                        ObjectiveStatus::InProgress
                    }
                    crate::world::spawn::SpawnPoll::Failed => {
                        self.abandon(world, ctx, "spawn request failed")
                    }
                };
            }
        }

        self.phase = Phase::Validating;
        let Some(target) = self.target_item else {
            return self.abandon(world, ctx, "no target and no search tags");
        };
        if !world.items.contains(target) {
            return self.abandon(world, ctx, "target no longer exists");
        }
        if self.search.is_done() && self.move_to.is_none() {
            return self.abandon(world, ctx, "move target unresolved");
        }
        if world.taken_by_other(target, self.agent) {
            return if self.explicit_target.is_none() {
                tracing::debug!(?target, "target claimed by another agent, retrying");
                self.ignored_items.insert(target);
                self.soft_reset(world, ctx.nav);
                ObjectiveStatus::InProgress
            } else {
                self.abandon(world, ctx, "target claimed by another agent")
            };
        }

        let can_interact = match self.move_to {
            Some(MoveTarget::Agent(other)) if other == self.agent => true,
            Some(MoveTarget::Agent(other)) => world.within_reach_agent(self.agent, other),
            Some(MoveTarget::Item(anchor)) => world.within_reach_item(self.agent, anchor),
            None => false,
        };

        if can_interact {
            self.interact(world, ctx, target)
        } else {
            self.navigate(world, ctx, target)
        }
    }

    /// End the pass early when the agent's own holdings already satisfy the
    /// required count
    fn try_inventory_shortcut(&mut self, world: &World) {
        let found = {
            let query = self.candidate_query();
            if count_held_matches(world, self.agent, &query) >= self.item_count {
                find_held_match(world, self.agent, &query)
            } else {
                None
            }
        };
        if let Some(item) = found {
            self.search.finish();
            let target = resolve_move_target(world, item);
            if let Some(target) = target {
                self.search.adopt(item, target);
            }
            self.target_item = Some(item);
            self.move_to = target;
        }
    }

    /// One budgeted scan step, plus end-of-pass fallout
    fn seek_step(&mut self, world: &mut World, ctx: &mut AcquireContext<'_>) -> ObjectiveStatus {
        let pressure_danger = world
            .agents
            .get(&self.agent)
            .map_or(true, |agent| world.dangerous_pressure(agent));
        if !self.policy.allow_dangerous_pressure && pressure_danger {
            return self.abandon(world, ctx, "pressure here would be lethal");
        }

        // Expensive per-candidate path checks pay off only for order-level
        // objectives that keep moving through unreachable territory
        if !self.check_path_per_item {
            self.check_path_per_item = ctx.priority >= world.tuning.order_priority_floor
                && matches!(
                    ctx.active_order,
                    OrderKind::RepairLeaks | OrderKind::FollowWithGoto
                );
        }

        let budget = ctx
            .priority
            .clamp(world.tuning.min_scan_budget, world.tuning.max_scan_budget)
            as usize;
        let params = ScanParams {
            query: CandidateQuery {
                wanted: self.wanted.as_deref().unwrap_or(&[]),
                ignored_tags: &self.ignored_tags,
                ignored_items: &self.ignored_items,
                min_condition: self.policy.min_condition,
                allow_variants: self.policy.allow_variants,
                require_loaded: self.policy.require_loaded,
                extra_filter: self.extra_filter.as_deref(),
            },
            allow_stealing: self.policy.allow_stealing,
            combat_priority: self.policy.combat_priority,
            ignored_containers: &self.ignored_containers,
            scorer: self.scorer.as_deref(),
            budget,
            check_path: self.check_path_per_item,
            paths: ctx.paths,
        };
        let step = self.search.advance(world, self.agent, &params);

        // The best-so-far is the target the completion check sees mid-pass
        if let Some((item, target)) = self.search.best() {
            self.target_item = Some(item);
            self.move_to = Some(target);
        }

        if step == SearchStep::Exhausted && self.target_item.is_none() {
            if !self.policy.spawn_if_not_found {
                return self.abandon(world, ctx, "nothing matching exists");
            }
            if self.spawn_ticket.is_none() {
                let wanted = self.wanted.as_deref().unwrap_or(&[]);
                match world.prefabs.cheapest_matching(wanted) {
                    Some(prefab) => {
                        let mark_outpost = world.agents.get(&self.agent).map_or(false, |agent| {
                            agent.team == Team::OutpostNpc
                                && agent
                                    .vessel
                                    .and_then(|v| world.vessels.get(&v))
                                    .map_or(false, |v| v.is_outpost)
                        });
                        let ticket = world.spawns.enqueue(prefab, self.agent, mark_outpost);
                        tracing::debug!(?prefab, "search exhausted, spawning replacement");
                        self.spawn_ticket = Some(ticket);
                    }
                    None => return self.abandon(world, ctx, "no matching prefab to spawn"),
                }
            }
        }
        ObjectiveStatus::InProgress
    }

    /// In reach: attempt the pick/equip
    fn interact(
        &mut self,
        world: &mut World,
        ctx: &mut AcquireContext<'_>,
        target: ItemId,
    ) -> ObjectiveStatus {
        self.phase = Phase::Interacting;
        if let Some(task) = self.nav_task.take() {
            ctx.nav.cancel(task);
        }

        let pickable = world
            .items
            .get(target)
            .map_or(false, |item| item.is_pickable());
        if !pickable {
            return self.abandon(world, ctx, "target is not pickable");
        }

        // Snapshot the source slot before the transfer mutates it
        let stack_snapshot: Vec<ItemId> = if self.policy.take_whole_stack {
            world
                .items
                .immediate_container(target)
                .and_then(|container| {
                    let storage = world.items.get(container)?.storage()?;
                    let slot = storage.inventory.slot_of(target)?;
                    Some(storage.inventory.snapshot_slot(slot))
                })
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        if world.take_item(self.agent, target, self.equip, self.wear) {
            for other in stack_snapshot {
                if other == target {
                    continue;
                }
                // Best-effort: a full inventory leaves the rest behind
                let _ = world.take_item(self.agent, other, false, false);
            }
            if self.wanted.is_none() {
                self.phase = Phase::Completed;
                return ObjectiveStatus::Completed;
            }
            let satisfied = {
                let query = self.candidate_query();
                count_held_matches(world, self.agent, &query) >= self.item_count
            };
            if satisfied {
                self.phase = Phase::Completed;
                ObjectiveStatus::Completed
            } else {
                tracing::debug!(?target, need = self.item_count, "more items required, searching again");
                self.soft_reset(world, ctx.nav);
                ObjectiveStatus::InProgress
            }
        } else if !self.equip {
            // Stowing failed: force full equip semantics for one retry
            tracing::debug!(?target, "transfer failed, retrying with equip");
            self.equip = true;
            self.wear = true;
            ObjectiveStatus::InProgress
        } else {
            self.abandon(world, ctx, "could not take the item")
        }
    }

    /// Out of reach: keep a navigation sub-task running toward the target
    fn navigate(
        &mut self,
        world: &mut World,
        ctx: &mut AcquireContext<'_>,
        target: ItemId,
    ) -> ObjectiveStatus {
        self.phase = Phase::Navigating;
        let Some(move_to) = self.move_to else {
            // Explicit target still resolving; nothing to walk toward yet
            return ObjectiveStatus::InProgress;
        };

        // If the containment root moved, the item is no longer where we're
        // headed - someone picked it up mid-flight
        if resolve_move_target(world, target) != Some(move_to) {
            tracing::debug!(?target, "containment root changed mid-navigation");
            return self.nav_failed(world, ctx, target);
        }

        match self.nav_task {
            None => {
                self.nav_task =
                    Some(ctx.nav
                        .begin(world, self.agent, move_to, world.tuning.default_reach));
            }
            Some(task) => match ctx.nav.poll(task) {
                NavStatus::InProgress => {}
                NavStatus::Arrived => {
                    ctx.nav.cancel(task);
                    self.nav_task = None;
                }
                NavStatus::Failed => {
                    ctx.nav.cancel(task);
                    self.nav_task = None;
                    return self.nav_failed(world, ctx, target);
                }
            },
        }
        ObjectiveStatus::InProgress
    }

    /// Navigation failed or was aborted: exclude and retry, or give up
    fn nav_failed(
        &mut self,
        world: &mut World,
        ctx: &mut AcquireContext<'_>,
        target: ItemId,
    ) -> ObjectiveStatus {
        if let Some(task) = self.nav_task.take() {
            ctx.nav.cancel(task);
        }
        if self.explicit_target.is_none() {
            self.ignored_items.insert(target);
            if let Some(MoveTarget::Item(root)) = self.move_to {
                if root != target {
                    self.ignored_items.insert(root);
                }
            }
            self.soft_reset(world, ctx.nav);
            ObjectiveStatus::InProgress
        } else {
            self.abandon(world, ctx, "could not reach the target")
        }
    }

    /// Terminal failure: mark abandoned and maybe complain about it
    fn abandon(
        &mut self,
        world: &World,
        ctx: &mut AcquireContext<'_>,
        reason: &str,
    ) -> ObjectiveStatus {
        self.phase = Phase::Abandoned;
        tracing::debug!(agent = ?self.agent, reason, "get-item objective abandoned");
        if self.policy.speak_on_failure {
            let on_player_team = world
                .agents
                .get(&self.agent)
                .map_or(false, |a| a.on_player_team);
            let gate_open = self.speech_gate.as_ref().map_or(true, |gate| gate());
            if on_player_team && ctx.is_current_order && gate_open {
                ctx.speech.speak(
                    self.agent,
                    &self.utterance,
                    world.tuning.speech_throttle,
                    world.current_tick,
                );
            }
        }
        ObjectiveStatus::Abandoned
    }
}
