//! The combat session: composition root that owns the participant arena, the
//! turn scheduler, the pathfinding client, the RNG, and the event log, and
//! steps the whole simulation one tick at a time.
//!
//! The session is plain owned state handed to whoever hosts it; there are no
//! globals and no background threads. Ticks are cooperative: the host calls
//! [`CombatSession::tick`] in its own loop, and everything that happens —
//! intent execution, AI planning, turn hand-overs, death — happens inside
//! that call, in a deterministic order.

mod commands;
mod execution;
mod planner;

#[cfg(test)]
pub(crate) mod test_support;

pub use planner::{AiPlanner, PlanContext, ScriptedPlanner, TurnPlanner};

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};
use slotmap::{Key, SecondaryMap, SlotMap};

use crate::config::CombatConfig;
use crate::participant::Participant;
use crate::pathing::Pathfinder;
use crate::scheduler::TurnScheduler;
use crate::stats::Attributes;
use crate::types::{CombatEvent, Controller, IgnoredOp, Mode, ParticipantId, Pos};

pub struct CombatSession {
    seed: u64,
    tick: u64,
    mode: Mode,
    config: CombatConfig,
    rng: ChaCha8Rng,
    participants: SlotMap<ParticipantId, Participant>,
    planners: SecondaryMap<ParticipantId, Box<dyn TurnPlanner>>,
    scheduler: TurnScheduler,
    pathfinder: Box<dyn Pathfinder>,
    log: Vec<CombatEvent>,
    next_seq: u64,
}

impl CombatSession {
    pub fn new(seed: u64, config: CombatConfig, pathfinder: Box<dyn Pathfinder>) -> Self {
        Self {
            seed,
            tick: 0,
            mode: Mode::Exploration,
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            participants: SlotMap::with_key(),
            planners: SecondaryMap::new(),
            scheduler: TurnScheduler::new(),
            pathfinder,
            log: Vec::new(),
            next_seq: 0,
        }
    }

    pub fn spawn(
        &mut self,
        name: &str,
        controller: Controller,
        attributes: Attributes,
        pos: Pos,
    ) -> ParticipantId {
        let id = self
            .participants
            .insert_with_key(|id| Participant::new(id, name, controller, attributes, pos));
        if controller == Controller::Ai {
            self.planners.insert(id, Box::new(AiPlanner::default()));
        }
        id
    }

    /// Swap the decision source for an AI participant. Player participants
    /// never consult a planner; their commands arrive via `apply_command`.
    pub fn set_planner(&mut self, id: ParticipantId, planner: Box<dyn TurnPlanner>) {
        self.planners.insert(id, planner);
    }

    /// Remove a participant from the world entirely. Mid-combat this evicts
    /// the roster entry first, so the scheduler never holds a dangling key.
    pub fn despawn(&mut self, id: ParticipantId) {
        if self.scheduler.is_active() {
            let Self { scheduler, participants, log, .. } = self;
            scheduler.remove_participant(id, participants, log);
        }
        self.participants.remove(id);
        self.planners.remove(id);
        self.after_scheduler();
    }

    /// Open an encounter over `candidates`: initiative is rolled for each in
    /// the order given (one die draw per entry, so the roll sequence is part
    /// of the deterministic record), then the scheduler builds the roster and
    /// hands out the first turn.
    ///
    /// Rejected before any die draw while a combat is already running; a
    /// rejected call must not advance the RNG stream.
    pub fn start_encounter(&mut self, candidates: &[ParticipantId]) {
        if self.scheduler.is_active() {
            self.log.push(CombatEvent::OperationIgnored { op: IgnoredOp::StartCombatWhileActive });
            return;
        }

        let die = self.config.initiative_die.max(1);
        for &id in candidates {
            let roll = (self.rng.next_u64() % u64::from(die)) as u32 + 1;
            if let Some(p) = self.participants.get_mut(id) {
                p.on_combat_start(roll);
            }
        }

        let Self { scheduler, participants, log, .. } = self;
        scheduler.start_combat(candidates, participants, log);

        if self.scheduler.is_active() {
            self.mode = Mode::Combat;
            self.log.push(CombatEvent::ModeChanged { mode: Mode::Combat });
            self.plan_active_if_needed();
        }
    }

    /// Advance the simulation by exactly one tick.
    ///
    /// In combat this steps the active participant's in-flight intent by one
    /// unit of progress (one waypoint, one poll, one swing) and lets an AI
    /// whose queue has drained yield the turn. In exploration it only ages
    /// the survival clocks.
    pub fn tick(&mut self) {
        self.tick += 1;
        match self.mode {
            Mode::Exploration => self.tick_exploration(),
            Mode::Combat => self.tick_combat(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    pub fn log(&self) -> &[CombatEvent] {
        &self.log
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.get(id)
    }

    pub fn participants(&self) -> impl Iterator<Item = (ParticipantId, &Participant)> {
        self.participants.iter()
    }

    pub fn active_participant(&self) -> Option<ParticipantId> {
        self.scheduler.active_participant()
    }

    pub fn roster(&self) -> &[ParticipantId] {
        self.scheduler.roster()
    }

    pub fn is_combat_active(&self) -> bool {
        self.scheduler.is_active()
    }

    pub fn snapshot_hash(&self) -> u64 {
        use std::hash::Hasher;
        use xxhash_rust::xxh3::Xxh3;

        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u64(self.tick);
        hasher.write_u64(self.next_seq);
        hasher.write_u8(match self.mode {
            Mode::Exploration => 0,
            Mode::Combat => 1,
        });

        for &id in self.scheduler.roster() {
            hasher.write_u64(id.data().as_ffi());
        }
        if let Some(active) = self.scheduler.active_participant() {
            hasher.write_u64(active.data().as_ffi());
        }

        // SlotMap iteration is slot-ordered, so the walk is deterministic
        // for a given spawn/despawn history.
        for (id, p) in &self.participants {
            hasher.write_u64(id.data().as_ffi());
            hasher.write_i32(p.pos.y);
            hasher.write_i32(p.pos.x);
            hasher.write_u32(p.stats.vitals.hp);
            hasher.write_u32(p.stats.vitals.ap);
            hasher.write_u32(p.stats.vitals.hunger);
            hasher.write_u32(p.stats.vitals.thirst);
            hasher.write_u32(p.stats.initiative);
            hasher.write_u8(u8::from(p.my_turn));
        }

        hasher.finish()
    }

    fn tick_exploration(&mut self) {
        let interval = self.config.needs_decay_interval;
        if interval == 0 || !self.tick.is_multiple_of(interval) {
            return;
        }
        for p in self.participants.values_mut() {
            if p.enabled && !p.stats.is_dead {
                p.stats.decay_needs();
            }
        }
    }

    /// Combat ended (or a participant left): reconcile mode with the
    /// scheduler and make sure the new active participant, if any and
    /// AI-controlled, has a plan.
    fn after_scheduler(&mut self) {
        if self.mode == Mode::Combat && !self.scheduler.is_active() {
            self.mode = Mode::Exploration;
            self.log.push(CombatEvent::ModeChanged { mode: Mode::Exploration });
            return;
        }
        self.plan_active_if_needed();
    }
}
