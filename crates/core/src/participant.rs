use crate::intent::ActionQueue;
use crate::stats::{Attributes, StatBlock};
use crate::types::{Controller, ParticipantId, Pos};

/// Lifecycle of a turn-taking entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Not in combat; free to roam.
    Idle,
    /// Combat active, waiting for the scheduler to hand over the turn.
    Waiting,
    /// The scheduler has activated this participant.
    ActiveTurn,
    /// Dead or evicted; terminal.
    Removed,
}

pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub controller: Controller,
    pub pos: Pos,
    pub stats: StatBlock,
    pub phase: Phase,
    /// True only while the scheduler has activated this participant. The
    /// scheduler is the sole authority that sets it; end-of-turn and death
    /// are the only paths that clear it.
    pub my_turn: bool,
    /// Disabled participants never enter a roster and never count toward
    /// either side's end condition.
    pub enabled: bool,
    /// Autonomous movement outside combat; halted for the whole encounter.
    pub roaming: bool,
    /// Set once the decision source has populated the queue this turn, so
    /// the executor knows an empty queue means "done" rather than "not yet
    /// planned".
    pub turn_planned: bool,
    pub queue: ActionQueue,
}

impl Participant {
    pub fn new(
        id: ParticipantId,
        name: &str,
        controller: Controller,
        attributes: Attributes,
        pos: Pos,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            controller,
            pos,
            stats: StatBlock::new(attributes),
            phase: Phase::Idle,
            my_turn: false,
            enabled: true,
            roaming: true,
            turn_planned: false,
            queue: ActionQueue::default(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.enabled && !self.stats.is_dead && self.stats.vitals.hp > 0 && self.phase != Phase::Removed
    }

    /// Combat-start broadcast. Valid from `Idle`; anything else is a stale
    /// caller and the call is ignored. `roll` is the session's initiative
    /// die draw for this entry.
    pub(crate) fn on_combat_start(&mut self, roll: u32) {
        if self.phase != Phase::Idle {
            return;
        }
        self.stats.roll_initiative(roll);
        self.queue.clear();
        self.roaming = false;
        self.my_turn = false;
        self.turn_planned = false;
        self.phase = Phase::Waiting;
    }

    /// Scheduler hand-over: AP back to maximum, queue cleared, flag raised.
    pub(crate) fn start_turn(&mut self) {
        self.my_turn = true;
        self.turn_planned = false;
        self.stats.restore_ap();
        self.queue.clear();
        self.phase = Phase::ActiveTurn;
    }

    /// Drop the active turn: flag down, queue cancelled. Idempotent when the
    /// participant was not active.
    pub(crate) fn clear_turn(&mut self) {
        self.my_turn = false;
        self.queue.clear();
        if self.phase == Phase::ActiveTurn {
            self.phase = Phase::Waiting;
        }
    }

    /// Combat-end broadcast: back to roaming, queue cancelled.
    pub(crate) fn on_combat_end(&mut self) {
        if !matches!(self.phase, Phase::Waiting | Phase::ActiveTurn) {
            return;
        }
        self.my_turn = false;
        self.queue.clear();
        self.roaming = true;
        self.phase = Phase::Idle;
    }

    /// Death transition; terminal.
    pub(crate) fn mark_removed(&mut self) {
        self.my_turn = false;
        self.queue.clear();
        self.phase = Phase::Removed;
    }
}
