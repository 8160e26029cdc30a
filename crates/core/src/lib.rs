pub mod config;
pub mod intent;
pub mod journal;
pub mod journal_file;
pub mod participant;
pub mod pathing;
pub mod replay;
pub mod scheduler;
pub mod session;
pub mod stats;
pub mod types;

pub use config::CombatConfig;
pub use intent::{ActionQueue, Intent, IntentStatus, MoveIntent, MoveStage};
pub use journal::{CommandJournal, CommandRecord, EncounterSetup, SpawnSpec};
pub use journal_file::{JournalLoadError, JournalWriter, LoadedJournal, load_journal_from_file};
pub use participant::{Participant, Phase};
pub use pathing::{DelayedPathfinder, FailingPathfinder, PathPoll, PathTicket, Pathfinder, RookPathfinder};
pub use replay::{ReplayError, ReplayResult, replay_encounter};
pub use scheduler::TurnScheduler;
pub use session::{AiPlanner, CombatSession, PlanContext, ScriptedPlanner, TurnPlanner};
pub use stats::{Attributes, StatBlock, Vitals};
pub use types::*;
