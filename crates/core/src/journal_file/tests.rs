use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use super::*;
use crate::config::CombatConfig;
use crate::journal::SpawnSpec;
use crate::stats::Attributes;
use crate::types::{CombatCommand, Controller, ParticipantId, Pos};

fn make_test_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(name)
}

fn setup() -> EncounterSetup {
    EncounterSetup {
        seed: 42,
        config: CombatConfig::default(),
        spawns: vec![
            SpawnSpec {
                name: "hero".to_string(),
                controller: Controller::Player,
                attributes: Attributes::uniform(6),
                pos: Pos { y: 1, x: 1 },
            },
            SpawnSpec {
                name: "grunt".to_string(),
                controller: Controller::Ai,
                attributes: Attributes::uniform(4),
                pos: Pos { y: 1, x: 8 },
            },
        ],
    }
}

fn record(seq: u64, tick: u64) -> CommandRecord {
    CommandRecord { seq, tick, actor: ParticipantId::default(), command: CombatCommand::EndTurn }
}

#[test]
fn schema_roundtrip_header_and_records() {
    let dir = tempdir().unwrap();
    let path = make_test_path(dir.path(), "roundtrip.jsonl");

    let mut writer = JournalWriter::create(&path, &setup()).unwrap();
    writer.append(&record(0, 0)).unwrap();
    writer
        .append(&CommandRecord {
            seq: 4,
            tick: 7,
            actor: ParticipantId::default(),
            command: CombatCommand::Move { to: Pos { y: 3, x: 3 } },
        })
        .unwrap();
    writer.append(&record(9, 12)).unwrap();

    let loaded = load_journal_from_file(&path).unwrap();
    assert_eq!(loaded.journal.format_version, 1);
    assert_eq!(loaded.journal.setup.seed, 42);
    assert_eq!(loaded.journal.setup.spawns.len(), 2);
    assert_eq!(loaded.journal.commands.len(), 3);

    assert!(matches!(loaded.journal.commands[0].command, CombatCommand::EndTurn));
    assert!(matches!(loaded.journal.commands[1].command, CombatCommand::Move { .. }));
    assert_eq!(loaded.journal.commands[1].tick, 7);
    assert_eq!(loaded.journal.commands[2].seq, 9);

    assert_ne!(loaded.last_sha256_hex, INITIAL_HASH);
}

#[test]
fn hash_chain_detects_tampered_record() {
    let dir = tempdir().unwrap();
    let path = make_test_path(dir.path(), "tampered.jsonl");

    let mut writer = JournalWriter::create(&path, &setup()).unwrap();
    writer.append(&record(0, 0)).unwrap();
    writer
        .append(&CommandRecord {
            seq: 1,
            tick: 3,
            actor: ParticipantId::default(),
            command: CombatCommand::Move { to: Pos { y: 5, x: 5 } },
        })
        .unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let mut lines: Vec<String> = content.lines().map(String::from).collect();
    assert!(lines.len() >= 3, "expected header + 2 records");

    lines[2] = lines[2].replace("\"x\":5", "\"x\":6");
    fs::write(&path, lines.join("\n") + "\n").unwrap();

    let result = load_journal_from_file(&path);
    assert!(
        matches!(result, Err(JournalLoadError::HashChainBroken { line: 3 })),
        "expected hash chain broken at line 3, got: {result:?}"
    );
}

#[test]
fn hash_chain_detects_deleted_record() {
    let dir = tempdir().unwrap();
    let path = make_test_path(dir.path(), "deleted.jsonl");

    let mut writer = JournalWriter::create(&path, &setup()).unwrap();
    for i in 0..3 {
        writer.append(&record(i, i * 5)).unwrap();
    }

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4); // header + 3 records
    let tampered = format!("{}\n{}\n{}\n", lines[0], lines[1], lines[3]);
    fs::write(&path, tampered).unwrap();

    let result = load_journal_from_file(&path);
    assert!(
        matches!(
            result,
            Err(JournalLoadError::HashChainBroken { .. })
                | Err(JournalLoadError::InvalidRecord { .. })
        ),
        "expected chain corruption error, got: {result:?}"
    );
}

#[test]
fn non_increasing_seq_is_rejected() {
    let dir = tempdir().unwrap();
    let path = make_test_path(dir.path(), "repeat_seq.jsonl");

    let mut writer = JournalWriter::create(&path, &setup()).unwrap();
    writer.append(&record(3, 0)).unwrap();
    writer.append(&record(3, 1)).unwrap();

    let result = load_journal_from_file(&path);
    assert!(
        matches!(result, Err(JournalLoadError::InvalidRecord { line: 3, .. })),
        "expected invalid record at line 3, got: {result:?}"
    );
}

#[test]
fn truncated_last_line_returns_error() {
    let dir = tempdir().unwrap();
    let path = make_test_path(dir.path(), "truncated.jsonl");

    let mut writer = JournalWriter::create(&path, &setup()).unwrap();
    writer.append(&record(0, 0)).unwrap();

    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    write!(file, "{{\"record\":{{\"seq\":1,\"tick").unwrap(); // no newline, truncated JSON

    let result = load_journal_from_file(&path);
    assert!(
        matches!(result, Err(JournalLoadError::IncompleteLine { line: 3 })),
        "expected incomplete line at line 3, got: {result:?}"
    );
}

#[test]
fn empty_file_returns_error() {
    let dir = tempdir().unwrap();
    let path = make_test_path(dir.path(), "empty.jsonl");
    fs::write(&path, "").unwrap();

    let result = load_journal_from_file(&path);
    assert!(
        matches!(result, Err(JournalLoadError::EmptyFile)),
        "expected EmptyFile error, got: {result:?}"
    );
}

#[test]
fn header_only_file_loads_empty_journal() {
    let dir = tempdir().unwrap();
    let path = make_test_path(dir.path(), "header_only.jsonl");

    let _writer = JournalWriter::create(&path, &setup()).unwrap();

    let loaded = load_journal_from_file(&path).unwrap();
    assert_eq!(loaded.journal.setup.seed, 42);
    assert!(loaded.journal.commands.is_empty());
    assert_eq!(loaded.last_sha256_hex, INITIAL_HASH);
}

#[test]
fn resume_appends_continue_hash_chain() {
    let dir = tempdir().unwrap();
    let path = make_test_path(dir.path(), "resume.jsonl");

    let mut writer = JournalWriter::create(&path, &setup()).unwrap();
    writer.append(&record(0, 0)).unwrap();
    drop(writer);

    let loaded = load_journal_from_file(&path).unwrap();
    assert_eq!(loaded.journal.commands.len(), 1);

    let mut writer = JournalWriter::resume(&path, loaded.last_sha256_hex).unwrap();
    writer.append(&record(2, 8)).unwrap();
    drop(writer);

    let reloaded = load_journal_from_file(&path).unwrap();
    assert_eq!(reloaded.journal.commands.len(), 2);
    assert_eq!(reloaded.journal.commands[0].seq, 0);
    assert_eq!(reloaded.journal.commands[1].seq, 2);
}

#[test]
fn invalid_header_returns_error() {
    let dir = tempdir().unwrap();
    let path = make_test_path(dir.path(), "bad_header.jsonl");
    fs::write(&path, "not valid json\n").unwrap();

    let result = load_journal_from_file(&path);
    assert!(
        matches!(result, Err(JournalLoadError::InvalidHeader { line: 1, .. })),
        "expected invalid header error, got: {result:?}"
    );
}
