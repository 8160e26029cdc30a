//! Deterministic replay: rebuild a session from an encounter setup, re-apply
//! the journaled player commands at their recorded tick boundaries, and run
//! the simulation until combat closes. AI turns are not in the journal; the
//! planner regenerates them, which only works because every source of
//! nondeterminism funnels through the seeded session RNG.

use crate::journal::CommandJournal;
use crate::pathing::Pathfinder;
use crate::session::CombatSession;
use crate::types::{CombatEndReason, CombatEvent};

/// Hard ceiling on simulated ticks; a replay that runs this long is stuck,
/// not slow.
const MAX_TICKS: u64 = 100_000;

#[derive(Debug, PartialEq, Eq)]
pub enum ReplayError {
    /// The roster never entered combat (for example, an empty spawn list).
    NeverStarted,
    /// A journaled command was rejected on re-application; the journal does
    /// not match this build or was recorded against different state.
    CommandRejected { seq: u64 },
    /// The session's input sequence diverged from the journal's, meaning the
    /// regenerated AI turns differ from the live run.
    SeqDiverged { expected: u64, found: u64 },
    /// Commands remained after combat ended.
    TrailingCommands { seq: u64 },
    /// The tick ceiling was hit before combat ended.
    Stalled,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ReplayResult {
    pub end_reason: CombatEndReason,
    pub final_snapshot_hash: u64,
    pub final_tick: u64,
}

/// Rebuild the encounter described by `journal` and drive it to its end.
/// The pathfinder must behave identically to the one used in the live run,
/// timing included; a different answer delay shifts AP commits across ticks
/// and changes the trajectory.
pub fn replay_encounter(
    journal: &CommandJournal,
    pathfinder: Box<dyn Pathfinder>,
) -> Result<ReplayResult, ReplayError> {
    let setup = &journal.setup;
    let mut session = CombatSession::new(setup.seed, setup.config.clone(), pathfinder);

    let ids: Vec<_> = setup
        .spawns
        .iter()
        .map(|s| session.spawn(&s.name, s.controller, s.attributes.clone(), s.pos))
        .collect();
    session.start_encounter(&ids);
    if !session.is_combat_active() {
        return Err(ReplayError::NeverStarted);
    }

    let mut records = journal.commands.iter().peekable();
    while session.is_combat_active() {
        while let Some(&record) = records.peek()
            && record.tick <= session.current_tick()
        {
            let expected = session.next_seq();
            if record.seq != expected {
                return Err(ReplayError::SeqDiverged { expected, found: record.seq });
            }
            session
                .apply_command(record.actor, record.command.clone())
                .map_err(|_| ReplayError::CommandRejected { seq: record.seq })?;
            records.next();
        }

        session.tick();
        if session.current_tick() > MAX_TICKS {
            return Err(ReplayError::Stalled);
        }
    }

    if let Some(&record) = records.peek() {
        return Err(ReplayError::TrailingCommands { seq: record.seq });
    }

    let end_reason = session
        .log()
        .iter()
        .rev()
        .find_map(|event| match event {
            CombatEvent::CombatEnded { reason } => Some(*reason),
            _ => None,
        })
        .ok_or(ReplayError::NeverStarted)?;

    Ok(ReplayResult {
        end_reason,
        final_snapshot_hash: session.snapshot_hash(),
        final_tick: session.current_tick(),
    })
}
