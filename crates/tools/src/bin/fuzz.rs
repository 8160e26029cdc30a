use anyhow::Result;
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use skirmish::{
    Attributes, CombatCommand, CombatConfig, CombatSession, Controller, Pos, RookPathfinder,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 64)]
    encounters: u32,
    #[arg(short, long, default_value_t = 2000)]
    ticks: u64,
}

fn pos(rng: &mut ChaCha8Rng) -> Pos {
    Pos { y: (rng.next_u64() % 16) as i32, x: (rng.next_u64() % 16) as i32 }
}

fn main() -> Result<()> {
    let args = Args::parse();
    println!("Starting fuzz harness on seed {} for {} encounters...", args.seed, args.encounters);

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    for round in 0..args.encounters {
        let session_seed = rng.next_u64();
        let mut session =
            CombatSession::new(session_seed, CombatConfig::default(), Box::new(RookPathfinder::new()));

        let players = 1 + (rng.next_u64() % 2) as usize;
        let enemies = 1 + (rng.next_u64() % 3) as usize;
        let mut ids = Vec::new();
        for i in 0..players {
            let attributes = Attributes::uniform(2 + (rng.next_u64() % 8) as u32);
            let p = pos(&mut rng);
            ids.push(session.spawn(&format!("p{i}"), Controller::Player, attributes, p));
        }
        for i in 0..enemies {
            let attributes = Attributes::uniform(2 + (rng.next_u64() % 6) as u32);
            let p = pos(&mut rng);
            ids.push(session.spawn(&format!("e{i}"), Controller::Ai, attributes, p));
        }

        session.start_encounter(&ids);

        let mut ended_naturally = false;
        for _ in 0..args.ticks {
            if !session.is_combat_active() {
                ended_naturally = true;
                break;
            }

            // Players throw random commands at the session; rejections are
            // expected and must leave state consistent.
            if let Some(active) = session.active_participant()
                && session.participant(active).is_some_and(|p| p.controller == Controller::Player)
            {
                let command = match rng.next_u64() % 4 {
                    0 => CombatCommand::Move { to: pos(&mut rng) },
                    1 => {
                        let target = ids[(rng.next_u64() as usize) % ids.len()];
                        CombatCommand::Attack { target }
                    }
                    _ => CombatCommand::EndTurn,
                };
                let _ = session.apply_command(active, command);
            }

            session.tick();
            assert_invariants(&session);
        }

        assert!(
            ended_naturally || !session.is_combat_active(),
            "encounter {round} (seed {session_seed}) never terminated"
        );
    }

    println!("Fuzzing completed successfully.");
    Ok(())
}

fn assert_invariants(session: &CombatSession) {
    let mut active_turns = 0;
    for (id, p) in session.participants() {
        let v = &p.stats.vitals;
        assert!(v.hp <= v.max_hp, "Invariant failed: HP > Max HP");
        assert!(v.ap <= v.max_ap, "Invariant failed: AP > Max AP");
        assert!(v.hunger <= v.max_hunger && v.thirst <= v.max_thirst);
        if p.my_turn {
            active_turns += 1;
        }
        if p.stats.is_dead {
            assert!(
                !session.roster().contains(&id),
                "Invariant failed: dead participant still in roster"
            );
        }
    }
    assert!(active_turns <= 1, "Invariant failed: more than one active turn");
    if let Some(active) = session.active_participant() {
        assert!(
            session.participant(active).is_some_and(|p| p.my_turn),
            "Invariant failed: active participant without its turn flag"
        );
    }
}
