//! In-memory command journal: everything needed to rebuild an encounter from
//! scratch (seed, tuning, spawn list) plus the ordered player commands that
//! were accepted during the live run. AI commands are never journaled; the
//! planner re-derives them deterministically on replay.

use serde::{Deserialize, Serialize};

use crate::config::CombatConfig;
use crate::stats::Attributes;
use crate::types::{CombatCommand, Controller, ParticipantId, Pos};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnSpec {
    pub name: String,
    pub controller: Controller,
    pub attributes: Attributes,
    pub pos: Pos,
}

/// Everything the session constructor and the opening `start_encounter` call
/// consume. Spawn order matters: it fixes both the participant keys and the
/// initiative roll sequence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncounterSetup {
    pub seed: u64,
    pub config: CombatConfig,
    pub spawns: Vec<SpawnSpec>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommandRecord {
    /// The session's input sequence number at the moment the command was
    /// accepted. AI commands consume sequence numbers too, so player records
    /// are sparse; the gaps are re-filled identically on replay.
    pub seq: u64,
    /// Tick boundary the command was applied at.
    pub tick: u64,
    pub actor: ParticipantId,
    pub command: CombatCommand,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommandJournal {
    pub format_version: u16,
    pub setup: EncounterSetup,
    pub commands: Vec<CommandRecord>,
}

impl CommandJournal {
    pub fn new(setup: EncounterSetup) -> Self {
        Self { format_version: 1, setup, commands: Vec::new() }
    }

    pub fn append(&mut self, seq: u64, tick: u64, actor: ParticipantId, command: CombatCommand) {
        self.commands.push(CommandRecord { seq, tick, actor, command });
    }
}
