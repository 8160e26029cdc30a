//! Per-tick execution: pop the active participant's head intent, advance it
//! one step, and put it back if it survived the step. Death, turn yield, and
//! the combat-end mode flip all funnel through here.

use super::{CombatSession, PlanContext};
use crate::intent::{Intent, IntentStatus, MoveIntent, MoveStage};
use crate::participant::Participant;
use crate::pathing::PathPoll;
use crate::types::{AbandonReason, CombatEvent, Controller, ParticipantId};

impl CombatSession {
    pub(super) fn tick_combat(&mut self) {
        self.plan_active_if_needed();

        let Some(active) = self.scheduler.active_participant() else {
            return;
        };

        let Some(intent) = self.participants[active].queue.begin() else {
            // Nothing queued. An AI that has already planned is done with
            // its turn; a player keeps the turn until an explicit EndTurn.
            let p = &self.participants[active];
            if p.controller == Controller::Ai && p.turn_planned {
                self.finish_turn();
            }
            return;
        };

        let (status, survivor) = self.step_intent(active, intent);

        match status {
            IntentStatus::InProgress => {
                if let Some(intent) = survivor {
                    self.participants[active].queue.put_back(intent);
                }
            }
            IntentStatus::Complete => {
                self.participants[active].queue.settle();
                self.log.push(CombatEvent::IntentCompleted { who: active });
            }
            IntentStatus::Abandoned(reason) => {
                self.participants[active].queue.settle();
                self.log.push(CombatEvent::IntentAbandoned { who: active, reason });
            }
        }
    }

    /// Advance `intent` one step on behalf of `actor`. Returns the status
    /// plus the intent itself when it must resume next tick.
    fn step_intent(
        &mut self,
        actor: ParticipantId,
        intent: Intent,
    ) -> (IntentStatus, Option<Intent>) {
        match intent {
            Intent::Move(m) => self.step_move(actor, m),
            Intent::Attack { target } => (self.step_attack(actor, target), None),
        }
    }

    fn step_move(
        &mut self,
        actor: ParticipantId,
        m: MoveIntent,
    ) -> (IntentStatus, Option<Intent>) {
        let destination = m.destination;
        let (path, mut next) = match m.stage {
            MoveStage::AwaitingPath { ticket } => match self.pathfinder.poll(ticket) {
                PathPoll::Pending => {
                    return (IntentStatus::InProgress, Some(Intent::Move(m)));
                }
                PathPoll::Failed => {
                    return (IntentStatus::Abandoned(AbandonReason::PathFailed), None);
                }
                PathPoll::Ready(path) => {
                    // The commit point for a deferred path: charge the full
                    // cost now, before the first step is taken.
                    let cost = self.config.move_cost(path.len());
                    let available = self.participants[actor].stats.vitals.ap;
                    if cost > available {
                        return (IntentStatus::Abandoned(AbandonReason::InsufficientAp), None);
                    }
                    self.spend_ap(actor, cost);
                    (path, 0)
                }
            },
            MoveStage::Walking { path, next } => (path, next),
        };

        let Some(&step) = path.get(next) else {
            // Empty path: already standing on the destination.
            return (IntentStatus::Complete, None);
        };
        self.participants[actor].pos = step;
        next += 1;
        if next >= path.len() {
            (IntentStatus::Complete, None)
        } else {
            let stage = MoveStage::Walking { path, next };
            (IntentStatus::InProgress, Some(Intent::Move(MoveIntent { destination, stage })))
        }
    }

    /// One swing, resolved in a single tick. The target was valid when the
    /// attack was queued; it may have died since, in which case the intent
    /// is abandoned (the AP stays spent — the wind-up happened).
    fn step_attack(&mut self, actor: ParticipantId, target: ParticipantId) -> IntentStatus {
        if !self.participants.get(target).is_some_and(Participant::is_alive) {
            return IntentStatus::Abandoned(AbandonReason::TargetGone);
        }

        let amount =
            self.config.attack_base_damage + self.participants[actor].stats.attributes.strength / 2;
        self.log.push(CombatEvent::AttackLanded { attacker: actor, target, amount });

        if self.participants[target].stats.apply_damage(amount) {
            self.handle_death(target);
        }
        IntentStatus::Complete
    }

    fn handle_death(&mut self, who: ParticipantId) {
        self.log.push(CombatEvent::ParticipantDied { who });
        let Self { scheduler, participants, log, .. } = self;
        scheduler.remove_participant(who, participants, log);
        self.participants.remove(who);
        self.planners.remove(who);
        self.after_scheduler();
    }

    /// Yield the active turn and hand the scheduler the next one.
    pub(super) fn finish_turn(&mut self) {
        let Self { scheduler, participants, log, .. } = self;
        scheduler.end_current_turn(participants, log);
        self.after_scheduler();
    }

    /// An AI participant whose turn just started gets exactly one planning
    /// pass; the resulting commands run through the normal validation path.
    pub(super) fn plan_active_if_needed(&mut self) {
        let Some(active) = self.scheduler.active_participant() else {
            return;
        };
        {
            let p = &self.participants[active];
            if p.controller != Controller::Ai || p.turn_planned {
                return;
            }
        }
        // Planned even when no planner is registered, so a planner-less AI
        // yields instead of stalling the encounter.
        self.participants[active].turn_planned = true;
        if !self.planners.contains_key(active) {
            return;
        }

        let commands = {
            let Self { participants, planners, config, .. } = self;
            let ctx = PlanContext { me: active, participants, config };
            planners[active].plan(&ctx)
        };

        for command in commands {
            // A planner that overspends or mistargets loses that command,
            // nothing more; the rejection lands in the log.
            let _ = self.apply_command(active, command);
        }
    }
}
