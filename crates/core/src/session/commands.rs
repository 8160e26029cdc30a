//! Command application: the single entry point through which both player
//! input and AI plans mutate the encounter. Rejections leave state untouched
//! apart from a diagnostic event; accepted commands bump the input sequence
//! so hosts can journal them.

use super::CombatSession;
use crate::intent::{Intent, MoveIntent, MoveStage};
use crate::pathing::PathPoll;
use crate::types::{CombatCommand, CombatEvent, CommandError, Mode, ParticipantId, Pos};

impl CombatSession {
    /// Apply one command on behalf of `actor`. Ownership of the turn is
    /// checked here, so stale input (arriving after the turn moved on) is
    /// rejected rather than executed against the wrong participant.
    pub fn apply_command(
        &mut self,
        actor: ParticipantId,
        command: CombatCommand,
    ) -> Result<(), CommandError> {
        match self.try_apply(actor, command) {
            Ok(()) => {
                self.next_seq += 1;
                Ok(())
            }
            Err(error) => {
                self.log.push(CombatEvent::CommandRejected { actor, error: error.clone() });
                Err(error)
            }
        }
    }

    fn try_apply(
        &mut self,
        actor: ParticipantId,
        command: CombatCommand,
    ) -> Result<(), CommandError> {
        if self.mode != Mode::Combat {
            return Err(CommandError::NotInCombat);
        }
        let Some(p) = self.participants.get(actor) else {
            return Err(CommandError::NoSuchParticipant);
        };
        if !p.my_turn {
            return Err(CommandError::NotYourTurn);
        }

        match command {
            CombatCommand::Move { to } => self.queue_move(actor, to),
            CombatCommand::Attack { target } => self.queue_attack(actor, target),
            CombatCommand::EndTurn => {
                self.finish_turn();
                Ok(())
            }
        }
    }

    /// Enqueue a move. The cost depends on the waypoint count, which only
    /// the pathfinder knows, so we poll once right away: an immediate answer
    /// lets us charge (or reject) synchronously, while a pending one defers
    /// the AP commit to the tick the path arrives.
    fn queue_move(&mut self, actor: ParticipantId, to: Pos) -> Result<(), CommandError> {
        let from = self.projected_pos(actor);
        let ticket = self.pathfinder.request(from, to);

        let stage = match self.pathfinder.poll(ticket) {
            PathPoll::Failed => return Err(CommandError::NoPath),
            PathPoll::Ready(path) => {
                let cost = self.config.move_cost(path.len());
                let available = self.participants[actor].stats.vitals.ap;
                if cost > available {
                    return Err(CommandError::InsufficientAp { needed: cost, available });
                }
                self.spend_ap(actor, cost);
                MoveStage::Walking { path, next: 0 }
            }
            PathPoll::Pending => MoveStage::AwaitingPath { ticket },
        };

        self.participants[actor]
            .queue
            .push(Intent::Move(MoveIntent { destination: to, stage }));
        Ok(())
    }

    /// Enqueue an attack; the flat cost is known up front and charged here.
    fn queue_attack(&mut self, actor: ParticipantId, target: ParticipantId) -> Result<(), CommandError> {
        if target == actor {
            return Err(CommandError::InvalidTarget);
        }
        if !self.participants.get(target).is_some_and(|t| t.is_alive()) {
            return Err(CommandError::InvalidTarget);
        }

        let cost = self.config.attack_ap_cost;
        let available = self.participants[actor].stats.vitals.ap;
        if cost > available {
            return Err(CommandError::InsufficientAp { needed: cost, available });
        }
        self.spend_ap(actor, cost);
        self.participants[actor].queue.push(Intent::Attack { target });
        Ok(())
    }

    /// Where `actor` will stand once everything already queued has run:
    /// the destination of the last queued move, or the current tile. Paths
    /// for follow-up moves start there, so chained moves connect.
    fn projected_pos(&self, actor: ParticipantId) -> Pos {
        let p = &self.participants[actor];
        p.queue
            .entries()
            .rev()
            .find_map(|intent| match intent {
                Intent::Move(m) => Some(m.destination),
                _ => None,
            })
            .unwrap_or(p.pos)
    }

    pub(super) fn spend_ap(&mut self, who: ParticipantId, amount: u32) {
        let stats = &mut self.participants[who].stats;
        stats.spend_ap(amount);
        self.log.push(CombatEvent::ApSpent { who, amount, remaining: stats.vitals.ap });
    }
}
