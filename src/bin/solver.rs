use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tile_match_solver::engine::{Board, SOLVED_EXAMPLE, SOLVED_SCORE};
use tile_match_solver::solver::{
    SearchConfig, SearchEngine, SearchOutcome, DEFAULT_CHILDREN_PER_EXPANSION,
};
use tile_match_solver::utils::board_from_str;

// Spinner message refresh interval, in search iterations.
const PROGRESS_EVERY: u64 = 500;

#[derive(Parser, Debug)]
#[command(author, version, about = "Search for a fully matching 3x3 tile arrangement", long_about = None)]
struct Args {
    /// Board as 36 edge values: tiles row-major, each as top,right,bottom,left.
    /// Defaults to a built-in solved board (use --shuffle to mix it up).
    values: Option<String>,

    /// Read the board values from a file instead
    #[arg(short, long, conflicts_with = "values")]
    file: Option<PathBuf>,

    /// Shuffle the board before searching
    #[arg(long)]
    shuffle: bool,

    /// Seed for the shuffle and the search (random if omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Give up after this many expansions
    #[arg(short = 'i', long)]
    max_iterations: Option<u64>,

    /// Give up after this many seconds
    #[arg(short, long)]
    time_limit: Option<u64>,

    /// Children generated per expanded board
    #[arg(short, long, default_value_t = DEFAULT_CHILDREN_PER_EXPANSION)]
    children: usize,

    /// Suppress the progress spinner
    #[arg(short, long)]
    quiet: bool,
}

fn load_board(args: &Args) -> Result<Board<u8>> {
    let text = match (&args.file, &args.values) {
        (Some(path), _) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read board file {}", path.display()))?,
        (None, Some(values)) => values.clone(),
        (None, None) => return Ok(Board::from_values(&SOLVED_EXAMPLE)?),
    };
    board_from_str(&text).context("Invalid board values")
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut board = load_board(&args)?;
    println!("Loaded board ({}/{} edges matching):", board.score(), SOLVED_SCORE);
    println!("{}\n", board);
    let original_id = board.state_id();
    let seed = args.seed.unwrap_or_else(rand::random);

    if args.shuffle {
        board.shuffle_with_seed(seed);
        println!(
            "Board after shuffling with seed {} ({}/{} edges matching):",
            seed,
            board.score(),
            SOLVED_SCORE
        );
        println!("{}\n", board);
    }

    let config = SearchConfig {
        children_per_expansion: args.children,
        max_iterations: args.max_iterations,
        time_limit: args.time_limit.map(Duration::from_secs),
        seed: Some(seed),
    };
    println!("Searching for a solution (search seed {})...\n", seed);

    let progress = (!args.quiet).then(spinner);
    let mut engine = SearchEngine::new(config);
    let outcome = engine.solve_with_progress(&board, |stats| {
        if let Some(pb) = &progress {
            if stats.iterations % PROGRESS_EVERY == 0 {
                pb.set_message(format!(
                    "iterations: {}, states seen: {}, best: {}/{}",
                    stats.iterations, stats.states_seen, stats.best_score, SOLVED_SCORE
                ));
            }
        }
    });
    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }
    let outcome = outcome.context("search failed")?;

    let report = outcome.report();
    match &outcome {
        SearchOutcome::Solved(_) => {
            println!("Solution found!\n");
            println!("{}\n", report.board);
            println!("State: {}", report.board.state_id());
            if args.shuffle {
                let same = if report.matches(&original_id) { "yes" } else { "no" };
                println!("Matches the arrangement before shuffling: {}", same);
            }
        }
        SearchOutcome::Exhausted(_) => {
            println!("No solution found: search exhausted.\n");
            println!("Best board ({}/{}):\n{}\n", report.board.score(), SOLVED_SCORE, report.board);
        }
        SearchOutcome::TimedOut(_) => {
            println!("No solution found: time limit reached.\n");
            println!("Best board ({}/{}):\n{}\n", report.board.score(), SOLVED_SCORE, report.board);
        }
    }

    let stats = report.stats;
    println!(
        "Iterations: {}, children: {}, duplicates skipped: {}, states seen: {}, elapsed: {:.2?}",
        stats.iterations,
        stats.children_generated,
        stats.duplicates_skipped,
        stats.states_seen,
        stats.elapsed
    );
    Ok(())
}
