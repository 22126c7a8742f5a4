//! # Tile Match Solver Library
//!
//! This library provides the board model for a 3x3 edge-matching tile puzzle
//! and a randomized greedy best-first search that looks for an arrangement in
//! which every internal edge matches.
//!
//! It is used by two binaries:
//! - `player`: Allows interactive play via the command line.
//! - `solver`: Takes a board as a list of 36 edge values, optionally shuffles it,
//!   and searches for a solved arrangement.
//!
//! ## Modules
//! - `engine`: Contains the tile (`Tile`), board (`Board`), state identifier (`StateId`)
//!   and interactive session (`Game`) types, plus board rendering.
//! - `moves`: Defines board mutations (`Move`) and the random move-selection strategy.
//! - `solver`: Provides `SearchEngine`, its configuration and its outcomes.
//! - `error`: Defines `PuzzleError`, shared by every other module.
//! - `utils`: Provides utility functions, such as parsing boards and state identifiers from text.

pub mod engine;
pub mod error;
pub mod moves;
pub mod solver;
pub mod utils;
