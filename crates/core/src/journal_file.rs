//! File-backed JSONL journal with SHA-256 hash chain for crash recovery.
//!
//! The file format is line-delimited JSON (`.jsonl`):
//! - Line 1: header with `format_version` and the full `EncounterSetup`.
//! - Lines 2+: one record per accepted player command, each carrying a
//!   SHA-256 hash chain (`prev_sha256_hex`, `sha256_hex`) for corruption
//!   detection.
//!
//! Writing flushes each record immediately so the file survives crashes.
//! Loading validates every line's JSON shape and SHA-256 chain, stopping
//! at the first invalid or incomplete line.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::journal::{CommandJournal, CommandRecord, EncounterSetup};

/// First line of the JSONL journal file.
#[derive(Serialize, Deserialize, Debug, Clone)]
struct FileHeader {
    format_version: u16,
    setup: EncounterSetup,
}

/// Full record line written to the JSONL file.
#[derive(Serialize, Deserialize, Debug, Clone)]
struct FileRecord {
    record: CommandRecord,
    prev_sha256_hex: String,
    sha256_hex: String,
}

/// The initial previous-hash used for the first record in a chain.
const INITIAL_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Compute `hex(SHA-256(record_json || prev_sha256_hex))`.
fn compute_record_sha256(record_json: &str, prev_sha256_hex: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(record_json.as_bytes());
    hasher.update(prev_sha256_hex.as_bytes());
    let result = hasher.finalize();
    format!("{result:064x}")
}

/// Appends accepted player commands to a JSONL file with a SHA-256 hash
/// chain.
pub struct JournalWriter {
    writer: BufWriter<File>,
    last_sha256_hex: String,
}

impl JournalWriter {
    /// Create a new journal file, writing the header line immediately.
    pub fn create(path: &Path, setup: &EncounterSetup) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        let header = FileHeader { format_version: 1, setup: setup.clone() };
        let header_json = serde_json::to_string(&header).map_err(io::Error::other)?;
        writeln!(writer, "{header_json}")?;
        writer.flush()?;

        Ok(Self { writer, last_sha256_hex: INITIAL_HASH.to_string() })
    }

    /// Resume appending to an existing journal after loading it.
    /// `last_sha256_hex` comes from `LoadedJournal`.
    pub fn resume(path: &Path, last_sha256_hex: String) -> io::Result<Self> {
        let file = OpenOptions::new().append(true).open(path)?;
        let writer = BufWriter::new(file);
        Ok(Self { writer, last_sha256_hex })
    }

    /// Append one accepted command and flush immediately.
    pub fn append(&mut self, record: &CommandRecord) -> io::Result<()> {
        let record_json = serde_json::to_string(record).map_err(io::Error::other)?;
        let sha256_hex = compute_record_sha256(&record_json, &self.last_sha256_hex);

        let line = FileRecord {
            record: record.clone(),
            prev_sha256_hex: self.last_sha256_hex.clone(),
            sha256_hex: sha256_hex.clone(),
        };

        let line_json = serde_json::to_string(&line).map_err(io::Error::other)?;
        writeln!(self.writer, "{line_json}")?;
        self.writer.flush()?;

        self.last_sha256_hex = sha256_hex;
        Ok(())
    }
}

/// Successfully loaded journal with metadata needed for resuming appends.
#[derive(Debug)]
pub struct LoadedJournal {
    pub journal: CommandJournal,
    /// SHA-256 hex of the last valid record (or the initial hash if empty).
    pub last_sha256_hex: String,
}

/// Describes why a journal file could not be fully loaded.
#[derive(Debug)]
pub enum JournalLoadError {
    /// Underlying I/O failure.
    Io(io::Error),
    /// The file contains no lines at all.
    EmptyFile,
    /// The header line could not be parsed as valid JSON.
    InvalidHeader { line: usize, message: String },
    /// A record line could not be parsed or its fields are inconsistent.
    InvalidRecord { line: usize, message: String },
    /// A line is incomplete (for example, file ended without trailing newline).
    IncompleteLine { line: usize },
    /// The SHA-256 chain is broken (prev hash mismatch or recomputed hash
    /// does not match stored hash).
    HashChainBroken { line: usize },
}

impl fmt::Display for JournalLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "journal I/O error: {e}"),
            Self::EmptyFile => write!(f, "journal file is empty"),
            Self::InvalidHeader { line, message } => {
                write!(f, "invalid journal header at line {line}: {message}")
            }
            Self::InvalidRecord { line, message } => {
                write!(f, "invalid journal record at line {line}: {message}")
            }
            Self::IncompleteLine { line } => {
                write!(f, "incomplete journal line at line {line}")
            }
            Self::HashChainBroken { line } => {
                write!(f, "SHA-256 hash chain broken at line {line}")
            }
        }
    }
}

/// Load and validate a JSONL journal file.
///
/// Returns the in-memory journal plus metadata for resuming appends.
/// Stops at the first invalid, incomplete, or hash-broken line and returns
/// an error describing the problem.
pub fn load_journal_from_file(path: &Path) -> Result<LoadedJournal, JournalLoadError> {
    let content = fs::read_to_string(path).map_err(JournalLoadError::Io)?;
    if content.is_empty() {
        return Err(JournalLoadError::EmptyFile);
    }
    let has_trailing_newline = content.ends_with('\n');
    let lines: Vec<&str> = content.lines().collect();
    if lines.is_empty() {
        return Err(JournalLoadError::EmptyFile);
    }
    if !has_trailing_newline {
        return Err(JournalLoadError::IncompleteLine { line: lines.len() });
    }

    let header: FileHeader = serde_json::from_str(lines[0])
        .map_err(|e| JournalLoadError::InvalidHeader { line: 1, message: e.to_string() })?;

    let mut journal = CommandJournal {
        format_version: header.format_version,
        setup: header.setup,
        commands: Vec::new(),
    };

    let mut prev_sha256_hex = INITIAL_HASH.to_string();
    let mut last_seq: Option<u64> = None;

    for (line_index, line) in lines.iter().skip(1).enumerate() {
        let line_number = line_index + 2; // 1-indexed; header is line 1

        if line.is_empty() {
            return Err(JournalLoadError::InvalidRecord {
                line: line_number,
                message: "empty line".to_string(),
            });
        }

        let file_record: FileRecord = serde_json::from_str(line).map_err(|e| {
            JournalLoadError::InvalidRecord { line: line_number, message: e.to_string() }
        })?;

        // Player records are sparse over the session's sequence space (AI
        // commands consume numbers too), so only monotonicity is checkable.
        if let Some(last) = last_seq
            && file_record.record.seq <= last
        {
            return Err(JournalLoadError::InvalidRecord {
                line: line_number,
                message: format!(
                    "seq {} does not increase past {last}",
                    file_record.record.seq
                ),
            });
        }

        if file_record.prev_sha256_hex != prev_sha256_hex {
            return Err(JournalLoadError::HashChainBroken { line: line_number });
        }

        let record_json = serde_json::to_string(&file_record.record).map_err(|e| {
            JournalLoadError::InvalidRecord { line: line_number, message: e.to_string() }
        })?;
        let expected_sha256 = compute_record_sha256(&record_json, &prev_sha256_hex);

        if file_record.sha256_hex != expected_sha256 {
            return Err(JournalLoadError::HashChainBroken { line: line_number });
        }

        last_seq = Some(file_record.record.seq);
        prev_sha256_hex = file_record.sha256_hex;
        journal.commands.push(file_record.record);
    }

    Ok(LoadedJournal { journal, last_sha256_hex: prev_sha256_hex })
}

#[cfg(test)]
mod tests;
