use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct ParticipantId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

pub fn manhattan(a: Pos, b: Pos) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

/// Who produces intents for a participant, fixed at spawn time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Controller {
    Player,
    Ai,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Exploration,
    Combat,
}

/// A player or AI instruction for the active participant. Accepted commands
/// are journalable; see `journal::CommandJournal`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatCommand {
    Move { to: Pos },
    Attack { target: ParticipantId },
    EndTurn,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandError {
    NotInCombat,
    NotYourTurn,
    NoSuchParticipant,
    InvalidTarget,
    InsufficientAp { needed: u32, available: u32 },
    NoPath,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombatEndReason {
    NoSurvivors,
    PlayersEliminated,
    EnemiesEliminated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbandonReason {
    PathFailed,
    InsufficientAp,
    TargetGone,
}

/// Invalid-state calls that are ignored rather than failed; surfaced in the
/// event log as diagnostics so callers can spot their own mistakes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoredOp {
    StartCombatWhileActive,
    AdvanceTurnWhileInactive,
    EndTurnWhileInactive,
}

/// Observable combat happenings, appended to the session log in the order the
/// state mutations completed. The host drains this for UI, sound, and the
/// turn-changed / combat-ended notifications the session layer reacts to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CombatEvent {
    CombatStarted { roster: Vec<ParticipantId> },
    TurnChanged { active: ParticipantId },
    ModeChanged { mode: Mode },
    ApSpent { who: ParticipantId, amount: u32, remaining: u32 },
    IntentCompleted { who: ParticipantId },
    IntentAbandoned { who: ParticipantId, reason: AbandonReason },
    AttackLanded { attacker: ParticipantId, target: ParticipantId, amount: u32 },
    ParticipantDied { who: ParticipantId },
    CombatEnded { reason: CombatEndReason },
    CommandRejected { actor: ParticipantId, error: CommandError },
    OperationIgnored { op: IgnoredOp },
}
