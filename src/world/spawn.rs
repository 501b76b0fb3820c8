//! Asynchronous item spawn requests
//!
//! Callers enqueue a request and hold on to a ticket; the world fulfils
//! pending requests during its own update, usually a tick later. Requesters
//! poll their ticket instead of being called back, so fulfilment can never
//! re-enter objective logic mid-tick.

use crate::core::types::{AgentId, ItemId, PrefabId};
use ahash::AHashMap;

/// Handle to a pending spawn request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpawnTicket(u64);

/// Poll result for a spawn ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnPoll {
    /// Not processed yet
    Pending,
    /// The item now exists in the destination inventory
    Spawned(ItemId),
    /// The request could not be fulfilled (destination gone or full)
    Failed,
}

#[derive(Debug, Clone)]
pub(crate) struct SpawnRequest {
    pub ticket: SpawnTicket,
    pub prefab: PrefabId,
    pub destination: AgentId,
    /// Mark the spawned item as outpost-native (used when outpost NPCs
    /// conjure their own gear, keeping the stealing rules coherent)
    pub mark_outpost: bool,
}

/// Queue of item creation requests awaiting fulfilment
pub struct SpawnQueue {
    next_ticket: u64,
    pending: Vec<SpawnRequest>,
    results: AHashMap<SpawnTicket, SpawnPoll>,
}

impl SpawnQueue {
    pub fn new() -> Self {
        Self {
            next_ticket: 0,
            pending: Vec::new(),
            results: AHashMap::new(),
        }
    }

    /// Request an item be created directly in an agent's inventory
    pub fn enqueue(
        &mut self,
        prefab: PrefabId,
        destination: AgentId,
        mark_outpost: bool,
    ) -> SpawnTicket {
        let ticket = SpawnTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending.push(SpawnRequest {
            ticket,
            prefab,
            destination,
            mark_outpost,
        });
        ticket
    }

    /// Check on a previously enqueued request
    pub fn poll(&self, ticket: SpawnTicket) -> SpawnPoll {
        self.results.get(&ticket).copied().unwrap_or(SpawnPoll::Pending)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn drain_pending(&mut self) -> Vec<SpawnRequest> {
        std::mem::take(&mut self.pending)
    }

    pub(crate) fn record(&mut self, ticket: SpawnTicket, result: SpawnPoll) {
        self.results.insert(ticket, result);
    }
}

impl Default for SpawnQueue {
    fn default() -> Self {
        Self::new()
    }
}
