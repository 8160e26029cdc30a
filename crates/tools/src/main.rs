use anyhow::{Context, Result};
use clap::Parser;
use skirmish::journal_file::load_journal_from_file;
use skirmish::{ReplayResult, RookPathfinder, replay_encounter};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSONL journal file to replay
    #[arg(short, long)]
    journal: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let loaded = load_journal_from_file(&args.journal)
        .map_err(|e| anyhow::anyhow!("Failed to load journal: {e}"))?;

    let result: ReplayResult = replay_encounter(&loaded.journal, Box::new(RookPathfinder::new()))
        .map_err(|e| anyhow::anyhow!("Replay failed during execution: {e:?}"))
        .with_context(|| format!("journal: {}", args.journal.display()))?;

    println!("Replay complete.");
    println!("Final Tick: {}", result.final_tick);
    println!("End Reason: {:?}", result.end_reason);
    println!("Snapshot Hash: {}", result.final_snapshot_hash);

    Ok(())
}
