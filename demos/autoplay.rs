extern crate piece_race;

use piece_race::board::GameState;
use piece_race::error::RaceError;
use piece_race::mcts::MctsPlanner;
use piece_race::random::seeded;
use piece_race::turn::{TurnStart, roll_initiative};

const MAX_ROUNDS: u32 = 500;
const ITERATIONS: u32 = 300;

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

fn main() -> Result<(), RaceError> {
    init_tracing();

    // Create a new match between two automated players
    let mut rng = seeded(2024);
    let mut game = GameState::new(&mut rng);
    let first = game.add_player("Alpha", true)?;
    let second = game.add_player("Beta", true)?;

    // One planner per seat, each with its own random stream
    let mut planners = [
        MctsPlanner::builder(first).with_seed(1).build()?,
        MctsPlanner::builder(second).with_seed(2).build()?,
    ];

    println!("{game}\n");

    for round in 1..=MAX_ROUNDS {
        let initiative = roll_initiative(&mut rng);
        let Some(actor) = initiative.actor else {
            println!("round {round}: dice {:?} tie, nobody moves", initiative.rolls);
            continue;
        };

        let name = game.players()[actor].name().to_string();
        match game.begin_turn(actor, &mut rng)? {
            TurnStart::Blocked => println!("round {round}: {name} is blocked"),
            TurnStart::Drew(card) => {
                let action = planners[actor].plan_action(&game, ITERATIONS)?;
                let report = game.resolve_turn(actor, action, &mut rng)?;
                println!(
                    "round {round}: {name} drew {card}, played {}, moved {} -> {}",
                    report.action, report.from, report.to
                );
            }
        }

        if game.is_finished() {
            break;
        }
    }

    println!("\n{game}");
    match game.winner() {
        Some(winner) => println!("The winner is {}", game.players()[winner].name()),
        None => println!("No winner after {MAX_ROUNDS} rounds"),
    }
    Ok(())
}
