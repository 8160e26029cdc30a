//! Turn ordering for one encounter: the initiative-sorted roster, the cursor
//! identifying the active participant, and the end-of-combat conditions.
//!
//! The roster holds keys only. Liveness is always re-checked against the
//! participant arena the session passes in, so entries that died or were
//! despawned since the last call are evicted, never merely skipped.

use slotmap::SlotMap;

use crate::participant::Participant;
use crate::types::{CombatEndReason, CombatEvent, Controller, IgnoredOp, ParticipantId};

type Arena = SlotMap<ParticipantId, Participant>;

#[derive(Debug, Default)]
pub struct TurnScheduler {
    roster: Vec<ParticipantId>,
    /// Index of the active participant; `None` is the before-first position
    /// (combat just started or inactive).
    cursor: Option<usize>,
    active: bool,
}

impl TurnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn roster(&self) -> &[ParticipantId] {
        &self.roster
    }

    pub fn active_participant(&self) -> Option<ParticipantId> {
        if !self.active {
            return None;
        }
        self.cursor.and_then(|i| self.roster.get(i).copied())
    }

    /// Build the roster and hand the first turn out. Rejected with a logged
    /// warning while a combat is already running. Callers roll initiative
    /// before this; the sort is stable, so equal initiative keeps submission
    /// order.
    pub fn start_combat(
        &mut self,
        candidates: &[ParticipantId],
        participants: &mut Arena,
        log: &mut Vec<CombatEvent>,
    ) {
        if self.active {
            log.push(CombatEvent::OperationIgnored { op: IgnoredOp::StartCombatWhileActive });
            return;
        }

        let mut roster: Vec<ParticipantId> = Vec::with_capacity(candidates.len());
        for &id in candidates {
            if roster.contains(&id) {
                continue;
            }
            if participants.get(id).is_some_and(Participant::is_alive) {
                roster.push(id);
            }
        }

        if roster.is_empty() {
            // Degenerate roster is a combat-end condition, not an error.
            log.push(CombatEvent::CombatEnded { reason: CombatEndReason::NoSurvivors });
            return;
        }

        roster.sort_by(|&a, &b| {
            participants[b].stats.initiative.cmp(&participants[a].stats.initiative)
        });

        log.push(CombatEvent::CombatStarted { roster: roster.clone() });
        self.roster = roster;
        self.cursor = None;
        self.active = true;
        self.advance_turn(participants, log);
    }

    /// Move to the next live participant, evicting dead or disabled entries
    /// along the way, or end combat when one side has no one left.
    pub fn advance_turn(&mut self, participants: &mut Arena, log: &mut Vec<CombatEvent>) {
        if !self.active {
            log.push(CombatEvent::OperationIgnored { op: IgnoredOp::AdvanceTurnWhileInactive });
            return;
        }

        if let Some(i) = self.cursor
            && let Some(&current) = self.roster.get(i)
            && let Some(p) = participants.get_mut(current)
        {
            p.clear_turn();
        }

        if let Some(reason) = self.end_condition(participants) {
            self.finish(reason, participants, log);
            return;
        }

        let mut idx = match self.cursor {
            Some(i) if i + 1 < self.roster.len() => i + 1,
            _ => 0,
        };

        loop {
            if self.roster.is_empty() {
                self.finish(CombatEndReason::NoSurvivors, participants, log);
                return;
            }
            if idx >= self.roster.len() {
                idx = 0;
            }
            let id = self.roster[idx];
            if participants.get(id).is_some_and(Participant::is_alive) {
                break;
            }
            // Evict, never skip: stale entries leave the roster immediately.
            self.roster.remove(idx);
            if let Some(p) = participants.get_mut(id) {
                p.mark_removed();
            }
            if let Some(reason) = self.end_condition(participants) {
                self.finish(reason, participants, log);
                return;
            }
        }

        self.cursor = Some(idx);
        let id = self.roster[idx];
        if let Some(p) = participants.get_mut(id) {
            p.start_turn();
        }
        log.push(CombatEvent::TurnChanged { active: id });
    }

    /// Convenience wrapper around `advance_turn`; no-op while inactive or
    /// before the first turn.
    pub fn end_current_turn(&mut self, participants: &mut Arena, log: &mut Vec<CombatEvent>) {
        if !self.active || self.cursor.is_none() {
            log.push(CombatEvent::OperationIgnored { op: IgnoredOp::EndTurnWhileInactive });
            return;
        }
        self.advance_turn(participants, log);
    }

    /// Evict `id` from the roster. Removing the active participant steps the
    /// cursor back and advances, so the vacated slot's successor is the next
    /// to act; removing an earlier entry shifts the cursor to keep it on the
    /// same logical participant.
    pub fn remove_participant(
        &mut self,
        id: ParticipantId,
        participants: &mut Arena,
        log: &mut Vec<CombatEvent>,
    ) {
        if !self.active {
            return;
        }
        let Some(pos) = self.roster.iter().position(|&p| p == id) else {
            return;
        };

        self.roster.remove(pos);
        if let Some(p) = participants.get_mut(id) {
            p.mark_removed();
        }

        match self.cursor {
            Some(i) if i == pos => {
                // Pre-emptive eviction of the active slot: step back, then
                // advance past the vacancy.
                self.cursor = pos.checked_sub(1);
                self.advance_turn(participants, log);
            }
            Some(i) if i > pos => {
                self.cursor = Some(i - 1);
                if let Some(reason) = self.end_condition(participants) {
                    self.finish(reason, participants, log);
                }
            }
            _ => {
                if let Some(reason) = self.end_condition(participants) {
                    self.finish(reason, participants, log);
                }
            }
        }
    }

    /// Tear the encounter down. Idempotent; returns every remaining roster
    /// member to its out-of-combat state.
    pub fn end_combat(&mut self, participants: &mut Arena, _log: &mut Vec<CombatEvent>) {
        if !self.active {
            return;
        }
        for &id in &self.roster {
            if let Some(p) = participants.get_mut(id) {
                p.on_combat_end();
            }
        }
        self.roster.clear();
        self.cursor = None;
        self.active = false;
    }

    fn finish(
        &mut self,
        reason: CombatEndReason,
        participants: &mut Arena,
        log: &mut Vec<CombatEvent>,
    ) {
        log.push(CombatEvent::CombatEnded { reason });
        self.end_combat(participants, log);
    }

    /// Pure check over the live, filtered roster: combat ends when nobody is
    /// left alive, or when either side has been fully eliminated. Dead and
    /// disabled entries never count toward a side.
    fn end_condition(&self, participants: &Arena) -> Option<CombatEndReason> {
        let mut any_player = false;
        let mut any_enemy = false;
        for &id in &self.roster {
            let Some(p) = participants.get(id) else { continue };
            if !p.is_alive() {
                continue;
            }
            match p.controller {
                Controller::Player => any_player = true,
                Controller::Ai => any_enemy = true,
            }
        }
        if !any_player && !any_enemy {
            Some(CombatEndReason::NoSurvivors)
        } else if !any_player {
            Some(CombatEndReason::PlayersEliminated)
        } else if !any_enemy {
            Some(CombatEndReason::EnemiesEliminated)
        } else {
            None
        }
    }
}
