use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use tile_match_solver::engine::{Board, Game, SOLVED_EXAMPLE, SOLVED_SCORE, TILE_COUNT};
use tile_match_solver::moves::Move;
use tile_match_solver::utils::board_from_str;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play the 3x3 tile matching puzzle", long_about = None)]
struct Args {
    /// Start from these 36 edge values instead of a shuffled example board
    values: Option<String>,

    /// Seed for shuffling the example board (random if omitted)
    #[arg(short, long)]
    seed: Option<u64>,
}

enum Command {
    Play(Move),
    Hint,
    Undo,
    Quit,
}

fn parse_position(token: &str) -> Result<usize, String> {
    match token.parse::<usize>() {
        Ok(index) if index < TILE_COUNT => Ok(index),
        _ => Err(format!(
            "Invalid position '{}': positions are 0 to {}.",
            token,
            TILE_COUNT - 1
        )),
    }
}

fn parse_command(input: &str) -> Result<Command, String> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    match parts.as_slice() {
        ["q"] => Ok(Command::Quit),
        ["u"] => Ok(Command::Undo),
        ["h"] => Ok(Command::Hint),
        ["s", first, second] => Ok(Command::Play(Move::Swap {
            first: parse_position(first)?,
            second: parse_position(second)?,
        })),
        [direction @ ("r" | "l"), index] => Ok(Command::Play(Move::Rotate {
            index: parse_position(index)?,
            clockwise: *direction == "r",
        })),
        _ => Err("Invalid input format. Use 's i j', 'r i', 'l i', 'h', 'u' or 'q'.".to_string()),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let board = match &args.values {
        Some(values) => board_from_str(values).context("Invalid board values")?,
        None => {
            let mut board = Board::from_values(&SOLVED_EXAMPLE)?;
            board.shuffle_with_seed(args.seed.unwrap_or_else(rand::random));
            board
        }
    };
    let mut game = Game::new(board);
    println!("Welcome to the tile matching puzzle!");
    println!("Positions are numbered 0 1 2 / 3 4 5 / 6 7 8.");

    loop {
        println!("---------------------");
        println!(
            "Moves: {}, Matching edges: {}/{}",
            game.moves(),
            game.board().score(),
            SOLVED_SCORE
        );
        println!("{}", game.board());

        if game.is_solved() {
            println!();
            println!("---------------------");
            println!("SOLVED in {} moves!", game.moves());
            println!("---------------------");
            break;
        }

        print!("Enter 's i j' to swap, 'r i'/'l i' to rotate right/left, 'h' for a hint, 'u' to undo, 'q' to quit: ");
        io::stdout().flush().context("Failed to flush prompt")?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input).context("Failed to read input")? == 0 {
            println!();
            break;
        }

        match parse_command(input.trim()) {
            Ok(Command::Quit) => {
                println!("Thanks for playing!");
                break;
            }
            Ok(Command::Undo) => {
                if game.undo_last_move() {
                    println!("Move undone.");
                } else {
                    println!("Cannot undo further (no moves made).");
                }
            }
            Ok(Command::Hint) => {
                let positions: Vec<usize> = game.board().unmatched_positions().into_iter().collect();
                println!("Tiles touching an unmatched edge: {:?}", positions);
            }
            Ok(Command::Play(mv)) => match game.apply(mv) {
                Ok(()) => println!("Move processed: {}.", mv),
                Err(e) => println!("Invalid move: {}", e),
            },
            Err(message) => println!("{}", message),
        }
    }
    Ok(())
}
