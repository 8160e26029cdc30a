use skirmish::{
    Attributes, CombatCommand, CombatConfig, CombatEvent, CombatSession, CommandJournal,
    Controller, EncounterSetup, Pos, RookPathfinder, SpawnSpec, manhattan,
};

fn spec(name: &str, controller: Controller, dexterity: u32, pos: Pos) -> SpawnSpec {
    let mut attributes = Attributes::uniform(4);
    attributes.dexterity = dexterity;
    SpawnSpec { name: name.to_string(), controller, attributes, pos }
}

fn skirmish_setup(seed: u64) -> EncounterSetup {
    EncounterSetup {
        seed,
        config: CombatConfig::default(),
        spawns: vec![
            spec("hero", Controller::Player, 12, Pos { y: 5, x: 2 }),
            spec("grunt-a", Controller::Ai, 2, Pos { y: 5, x: 12 }),
            spec("grunt-b", Controller::Ai, 2, Pos { y: 8, x: 5 }),
        ],
    }
}

/// Play an encounter to the end with a fixed player policy (attack the
/// nearest enemy while AP lasts, then yield), journaling every accepted
/// player command.
fn drive(setup: EncounterSetup) -> (CommandJournal, CombatSession) {
    let mut session =
        CombatSession::new(setup.seed, setup.config.clone(), Box::new(RookPathfinder::new()));
    let ids: Vec<_> = setup
        .spawns
        .iter()
        .map(|s| session.spawn(&s.name, s.controller, s.attributes.clone(), s.pos))
        .collect();
    session.start_encounter(&ids);

    let mut journal = CommandJournal::new(setup);
    let mut guard = 0;
    while session.is_combat_active() {
        if let Some(active) = session.active_participant() {
            let p = session.participant(active).expect("active participant exists");
            if p.controller == Controller::Player && p.queue.is_idle() {
                let command = player_policy(&session, active);
                let seq = session.next_seq();
                let tick = session.current_tick();
                if session.apply_command(active, command.clone()).is_ok() {
                    journal.append(seq, tick, active, command);
                }
            }
        }
        session.tick();
        guard += 1;
        assert!(guard < 10_000, "driver failed to terminate");
    }
    (journal, session)
}

fn player_policy(session: &CombatSession, me: skirmish::ParticipantId) -> CombatCommand {
    let my = session.participant(me).expect("policy actor exists");
    if my.stats.vitals.ap < session.config().attack_ap_cost {
        return CombatCommand::EndTurn;
    }
    let target = session
        .participants()
        .filter(|&(id, p)| id != me && p.is_alive() && p.controller == Controller::Ai)
        .min_by_key(|&(_, p)| (manhattan(my.pos, p.pos), p.pos))
        .map(|(id, _)| id);
    match target {
        Some(target) => CombatCommand::Attack { target },
        None => CombatCommand::EndTurn,
    }
}

#[test]
fn identical_seeds_produce_identical_trajectories() {
    let (journal1, session1) = drive(skirmish_setup(12345));
    let (journal2, session2) = drive(skirmish_setup(12345));

    assert_eq!(journal1, journal2);
    assert_eq!(session1.snapshot_hash(), session2.snapshot_hash());
    assert_eq!(session1.current_tick(), session2.current_tick());
    let log1: Vec<&CombatEvent> = session1.log().iter().collect();
    let log2: Vec<&CombatEvent> = session2.log().iter().collect();
    assert_eq!(log1, log2, "event sequences must match exactly");
}

#[test]
fn different_seeds_produce_different_hashes() {
    let (_, session1) = drive(skirmish_setup(123));
    let (_, session2) = drive(skirmish_setup(456));

    assert_ne!(
        session1.snapshot_hash(),
        session2.snapshot_hash(),
        "different initiative rolls should show up in the snapshot"
    );
}

#[test]
fn driver_ends_with_enemies_eliminated() {
    let (_, session) = drive(skirmish_setup(777));
    assert!(session.log().iter().any(|e| matches!(
        e,
        CombatEvent::CombatEnded { reason: skirmish::CombatEndReason::EnemiesEliminated }
    )));
    let survivors: Vec<_> = session.participants().collect();
    assert_eq!(survivors.len(), 1, "only the hero should remain spawned");
}
