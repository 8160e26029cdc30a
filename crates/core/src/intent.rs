//! Queued, pollable units of combat behavior and the per-participant FIFO
//! that serializes them. An intent carries its own progress and is advanced
//! by exactly one step per simulation tick; nothing here suspends a stack or
//! hides a scheduler.

use std::collections::VecDeque;

use crate::pathing::PathTicket;
use crate::types::{AbandonReason, ParticipantId, Pos};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntentStatus {
    InProgress,
    Complete,
    Abandoned(AbandonReason),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveStage {
    /// Path request in flight; no AP committed yet. The cost is computed and
    /// spent the moment the path arrives, before any movement happens.
    AwaitingPath { ticket: PathTicket },
    /// Committed and walking, one waypoint per tick.
    Walking { path: Vec<Pos>, next: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveIntent {
    pub destination: Pos,
    pub stage: MoveStage,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    Move(MoveIntent),
    Attack { target: ParticipantId },
}

/// Strictly sequential executor state for one participant: a FIFO of pending
/// intents plus the single-flight flag. At most one intent is ever in flight;
/// enqueueing while one executes only appends.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionQueue {
    entries: VecDeque<Intent>,
    executing: bool,
}

impl ActionQueue {
    pub fn push(&mut self, intent: Intent) {
        self.entries.push_back(intent);
    }

    /// Take the head intent for one step of execution, marking the queue as
    /// executing. Returns `None` when nothing is queued.
    pub fn begin(&mut self) -> Option<Intent> {
        let intent = self.entries.pop_front()?;
        self.executing = true;
        Some(intent)
    }

    /// Put an in-progress intent back at the head for the next tick.
    pub fn put_back(&mut self, intent: Intent) {
        self.entries.push_front(intent);
    }

    /// The in-flight intent finished (or was abandoned); release the flag.
    pub fn settle(&mut self) {
        self.executing = false;
    }

    /// Cancellation: drop every pending intent and reset the in-flight flag
    /// so nothing resumes after a turn or combat ends.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.executing = false;
    }

    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &Intent> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_executing(&self) -> bool {
        self.executing
    }

    pub fn is_idle(&self) -> bool {
        self.entries.is_empty() && !self.executing
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;

    fn targets(n: usize) -> Vec<ParticipantId> {
        let mut arena: SlotMap<ParticipantId, ()> = SlotMap::with_key();
        (0..n).map(|_| arena.insert(())).collect()
    }

    #[test]
    fn queue_preserves_fifo_order() {
        let ids = targets(2);
        let mut queue = ActionQueue::default();
        queue.push(Intent::Attack { target: ids[0] });
        queue.push(Intent::Attack { target: ids[1] });

        let first = queue.begin().expect("head intent");
        assert_eq!(first, Intent::Attack { target: ids[0] });
        assert!(queue.is_executing());
        queue.settle();

        let second = queue.begin().expect("second intent");
        assert_eq!(second, Intent::Attack { target: ids[1] });
    }

    #[test]
    fn put_back_keeps_intent_at_head() {
        let ids = targets(2);
        let mut queue = ActionQueue::default();
        queue.push(Intent::Attack { target: ids[0] });
        queue.push(Intent::Attack { target: ids[1] });

        let head = queue.begin().expect("head intent");
        queue.put_back(head.clone());
        assert_eq!(queue.begin().as_ref(), Some(&head));
    }

    #[test]
    fn clear_resets_execution_flag() {
        let ids = targets(1);
        let mut queue = ActionQueue::default();
        queue.push(Intent::Attack { target: ids[0] });
        let _ = queue.begin();
        assert!(queue.is_executing());

        queue.clear();
        assert!(queue.is_idle());
        assert_eq!(queue.begin(), None);
    }
}
