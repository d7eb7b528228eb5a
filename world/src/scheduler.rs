//! Virtual-time task scheduler keyed on the world clock.

use std::{
    cmp::{Ordering, Reverse},
    collections::{BinaryHeap, HashSet},
    time::Duration,
};

use lane_siege_core::{AttackerId, Placement};

/// Handle identifying one scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct TaskId(u64);

/// Work the world performs when a scheduled entry comes due.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Task {
    /// Recurring wave cadence pulse. Re-armed by the world on fire.
    WaveCadence,
    /// Commits a previewed wave's placements to the grid.
    CommitWave { placements: Vec<Placement> },
    /// Restores an attacker's base speed after a slow effect wears off.
    SlowExpiry { attacker: AttackerId },
    /// Lands a mid-leap attacker at the recorded position.
    LeapLanding { attacker: AttackerId, position: f32 },
}

#[derive(Debug)]
struct Entry {
    due: Duration,
    id: TaskId,
    task: Task,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.id == other.id
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due.cmp(&other.due).then(self.id.cmp(&other.id))
    }
}

/// Min-heap of pending tasks with lazy cancellation.
///
/// Cancelled identifiers stay in the heap and are discarded when they
/// surface, so `cancel` never searches and cancelling an unknown or
/// already-cancelled identifier is a no-op.
#[derive(Debug, Default)]
pub(crate) struct Scheduler {
    next_id: u64,
    heap: BinaryHeap<Reverse<Entry>>,
    live: HashSet<TaskId>,
}

impl Scheduler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn schedule(&mut self, due: Duration, task: Task) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let _ = self.live.insert(id);
        self.heap.push(Reverse(Entry { due, id, task }));
        id
    }

    pub(crate) fn cancel(&mut self, id: TaskId) {
        let _ = self.live.remove(&id);
    }

    /// Pops the next task due at or before `now`, skipping cancelled entries.
    pub(crate) fn pop_due(&mut self, now: Duration) -> Option<Task> {
        while let Some(Reverse(entry)) = self.heap.peek() {
            if entry.due > now {
                return None;
            }
            let Some(Reverse(entry)) = self.heap.pop() else {
                return None;
            };
            if self.live.remove(&entry.id) {
                return Some(entry.task);
            }
        }
        None
    }
}
