//! Decision sources. A planner turns a read-only view of the encounter into
//! a batch of commands for the participant whose turn just started; the
//! session feeds the batch through the same validation path player commands
//! take, so a buggy planner can waste its turn but never corrupt state.

use slotmap::SlotMap;

use crate::config::CombatConfig;
use crate::participant::Participant;
use crate::types::{CombatCommand, Controller, ParticipantId, Pos, manhattan};

/// Read-only view handed to a planner at the start of its participant's turn.
pub struct PlanContext<'a> {
    pub me: ParticipantId,
    pub participants: &'a SlotMap<ParticipantId, Participant>,
    pub config: &'a CombatConfig,
}

impl PlanContext<'_> {
    pub fn me(&self) -> &Participant {
        &self.participants[self.me]
    }

    /// Living participants on the opposing side, nearest first; ties broken
    /// by position so planning is deterministic.
    pub fn enemies_by_distance(&self) -> Vec<ParticipantId> {
        let me = self.me();
        let mut enemies: Vec<(u32, Pos, ParticipantId)> = self
            .participants
            .iter()
            .filter(|&(id, p)| id != self.me && p.is_alive() && p.controller != me.controller)
            .map(|(id, p)| (manhattan(me.pos, p.pos), p.pos, id))
            .collect();
        enemies.sort();
        enemies.into_iter().map(|(_, _, id)| id).collect()
    }
}

pub trait TurnPlanner {
    /// Produce the whole turn's worth of commands up front. Returning an
    /// empty batch yields the turn immediately.
    fn plan(&mut self, ctx: &PlanContext<'_>) -> Vec<CombatCommand>;
}

/// Baseline hostile AI: close on the nearest living opponent, then spend the
/// remaining AP on attacks. No `EndTurn` is emitted; the session yields the
/// turn on its own once the queue drains.
#[derive(Debug, Default)]
pub struct AiPlanner;

impl TurnPlanner for AiPlanner {
    fn plan(&mut self, ctx: &PlanContext<'_>) -> Vec<CombatCommand> {
        let me = ctx.me();
        let Some(&target) = ctx.enemies_by_distance().first() else {
            return Vec::new();
        };
        let target_pos = ctx.participants[target].pos;

        let mut commands = Vec::new();
        let mut budget = me.stats.vitals.ap;
        let mut stand = me.pos;
        let distance = manhattan(me.pos, target_pos);

        if distance > 1 {
            // Close as much of the gap as this turn's AP allows, even when
            // the target stays out of reach.
            let gap = distance - 1;
            let per_segment = ctx.config.move_ap_per_segment;
            let affordable = if per_segment == 0 { gap } else { budget / per_segment };
            let steps = gap.min(affordable);
            if steps == 0 {
                return Vec::new();
            }
            stand = advance_along(me.pos, target_pos, steps);
            budget -= ctx.config.move_cost(steps as usize);
            commands.push(CombatCommand::Move { to: stand });
        }

        if manhattan(stand, target_pos) <= 1 {
            while budget >= ctx.config.attack_ap_cost {
                budget -= ctx.config.attack_ap_cost;
                commands.push(CombatCommand::Attack { target });
            }
        }

        commands
    }
}

/// Walk `steps` tiles from `from` toward `to` along the rank-then-file route
/// the reference pathfinder takes, stopping short of `to` itself.
fn advance_along(from: Pos, to: Pos, steps: u32) -> Pos {
    let mut cursor = from;
    let mut left = steps;
    while left > 0 && cursor.y != to.y {
        cursor.y += (to.y - cursor.y).signum();
        left -= 1;
    }
    while left > 0 && cursor.x != to.x {
        cursor.x += (to.x - cursor.x).signum();
        left -= 1;
    }
    cursor
}

/// Scripted planner for tests: plays each prepared batch in order, then
/// yields every turn after the script runs out.
#[derive(Debug, Default)]
pub struct ScriptedPlanner {
    batches: Vec<Vec<CombatCommand>>,
    cursor: usize,
}

impl ScriptedPlanner {
    pub fn new(batches: Vec<Vec<CombatCommand>>) -> Self {
        Self { batches, cursor: 0 }
    }
}

impl TurnPlanner for ScriptedPlanner {
    fn plan(&mut self, _ctx: &PlanContext<'_>) -> Vec<CombatCommand> {
        let batch = self.batches.get(self.cursor).cloned().unwrap_or_default();
        self.cursor += 1;
        batch
    }
}
