use std::env;

use anyhow::{Context, Result};
use chess_rules::{Game, GameEndState};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

const DEFAULT_MAX_PLIES: usize = 200;

fn main() -> Result<()> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).
    let args: Vec<String> = env::args().collect();
    let max_plies = match args.get(1) {
        Some(arg) => arg
            .parse()
            .with_context(|| format!("Invalid ply limit '{arg}'"))?,
        None => DEFAULT_MAX_PLIES,
    };
    let mut rng = match args.get(2) {
        Some(arg) => StdRng::seed_from_u64(
            arg.parse()
                .with_context(|| format!("Invalid seed '{arg}'"))?,
        ),
        None => StdRng::from_entropy(),
    };

    let mut game = Game::new().context("Failed to set up the board")?;
    while game.history().len() < max_plies {
        if game.make_random_move(&mut rng)?.is_some() {
            break;
        }
        if game.is_in_check() {
            info!("Check to {}", game.current_player());
        }
    }

    println!("{}", game.board());
    match game.end_state() {
        Some(GameEndState::CheckMate(winner)) => println!("Checkmate, {winner} wins"),
        Some(GameEndState::StaleMate) => println!("Stalemate"),
        Some(GameEndState::InsufficientMaterial) => println!("Draw, insufficient material"),
        None => println!("No result after {} plies", game.history().len()),
    }
    Ok(())
}
