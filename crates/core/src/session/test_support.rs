//! Shared test fixtures for the session test suites.
//! This module exists to avoid repeating spawn and encounter setup across
//! many tests. It does not own production gameplay logic.

use super::*;
use crate::pathing::RookPathfinder;

pub(crate) fn session() -> CombatSession {
    CombatSession::new(7, CombatConfig::default(), Box::new(RookPathfinder::new()))
}

pub(crate) fn session_with(pathfinder: Box<dyn Pathfinder>) -> CombatSession {
    CombatSession::new(7, CombatConfig::default(), pathfinder)
}

/// A player and one AI grunt, ten tiles apart. Dexterity gaps are wide
/// enough (12 vs 2, on a d10) that the player always wins initiative.
pub(crate) fn duel(session: &mut CombatSession) -> (ParticipantId, ParticipantId) {
    let hero = spawn_fast_player(session, "hero", Pos { y: 5, x: 2 });
    let grunt = spawn_slow_grunt(session, "grunt", Pos { y: 5, x: 12 });
    (hero, grunt)
}

pub(crate) fn spawn_fast_player(session: &mut CombatSession, name: &str, pos: Pos) -> ParticipantId {
    let mut attributes = Attributes::uniform(4);
    attributes.dexterity = 12;
    session.spawn(name, Controller::Player, attributes, pos)
}

pub(crate) fn spawn_slow_grunt(session: &mut CombatSession, name: &str, pos: Pos) -> ParticipantId {
    let mut attributes = Attributes::uniform(4);
    attributes.dexterity = 2;
    session.spawn(name, Controller::Ai, attributes, pos)
}

/// Step until combat closes or the budget runs out; returns ticks consumed.
pub(crate) fn run_to_combat_end(session: &mut CombatSession, max_ticks: u32) -> u32 {
    for step in 0..max_ticks {
        if !session.is_combat_active() {
            return step;
        }
        session.tick();
    }
    max_ticks
}
