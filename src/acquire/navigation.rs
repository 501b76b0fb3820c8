//! Navigation sub-task contract
//!
//! Acquisition never moves the agent itself; it hands a destination to a
//! navigator and polls the task each tick. The navigator is owned by the
//! host simulation - the one here walks agents in a straight line and
//! exists for the headless demo and tests.

use crate::acquire::objective::MoveTarget;
use crate::core::types::AgentId;
use crate::world::World;
use ahash::AHashMap;

/// Handle to a running navigation task
///
/// Minted by whichever `Navigator` implementation owns the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NavTaskId(pub u64);

/// Poll result for a navigation task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavStatus {
    InProgress,
    /// Within reach of the destination
    Arrived,
    /// No route, destination gone, or the host gave up
    Failed,
}

/// Drives an agent toward a destination over multiple ticks
pub trait Navigator {
    /// Start moving the agent toward the destination, stopping within reach
    fn begin(&mut self, world: &World, agent: AgentId, dest: MoveTarget, reach: f32) -> NavTaskId;

    fn poll(&self, task: NavTaskId) -> NavStatus;

    /// Drop the task; safe to call on finished or unknown tasks
    fn cancel(&mut self, task: NavTaskId);
}

struct NavTask {
    agent: AgentId,
    dest: MoveTarget,
    reach: f32,
    status: NavStatus,
}

/// Straight-line navigator with a fixed walk speed
///
/// No obstacle awareness: it closes the distance to the destination anchor
/// every update and arrives when within reach. Fails when the destination
/// stops resolving to a position.
pub struct DirectNavigator {
    next_id: u64,
    speed: f32,
    tasks: AHashMap<NavTaskId, NavTask>,
}

impl DirectNavigator {
    pub fn new(speed: f32) -> Self {
        Self {
            next_id: 0,
            speed,
            tasks: AHashMap::new(),
        }
    }

    /// Advance every running task by one tick of movement
    pub fn update(&mut self, world: &mut World) {
        for task in self.tasks.values_mut() {
            if task.status != NavStatus::InProgress {
                continue;
            }
            let dest = match task.dest {
                MoveTarget::Item(item) => world.item_anchor_position(item),
                MoveTarget::Agent(other) => world.agents.get(&other).map(|a| a.position),
            };
            let Some(dest) = dest else {
                task.status = NavStatus::Failed;
                continue;
            };
            let Some(agent) = world.agents.get_mut(&task.agent) else {
                task.status = NavStatus::Failed;
                continue;
            };
            let offset = dest - agent.position;
            let distance = offset.length();
            if distance <= task.reach {
                task.status = NavStatus::Arrived;
                continue;
            }
            let step = self.speed.min(distance - task.reach * 0.5);
            agent.position += offset / distance * step;
        }
    }
}

impl Navigator for DirectNavigator {
    fn begin(&mut self, world: &World, agent: AgentId, dest: MoveTarget, reach: f32) -> NavTaskId {
        let id = NavTaskId(self.next_id);
        self.next_id += 1;
        // Already in reach counts as arrived on the first poll
        let dest_pos = match dest {
            MoveTarget::Item(item) => world.item_anchor_position(item),
            MoveTarget::Agent(other) => world.agents.get(&other).map(|a| a.position),
        };
        let status = match (dest_pos, world.agents.get(&agent)) {
            (Some(pos), Some(a)) if a.position.distance(pos) <= reach => NavStatus::Arrived,
            (Some(_), Some(_)) => NavStatus::InProgress,
            _ => NavStatus::Failed,
        };
        self.tasks.insert(
            id,
            NavTask {
                agent,
                dest,
                reach,
                status,
            },
        );
        id
    }

    fn poll(&self, task: NavTaskId) -> NavStatus {
        self.tasks
            .get(&task)
            .map_or(NavStatus::Failed, |t| t.status)
    }

    fn cancel(&mut self, task: NavTaskId) {
        self.tasks.remove(&task);
    }
}
