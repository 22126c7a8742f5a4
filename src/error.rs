//! Error types shared by the board model, move generation and the search engine.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while building, mutating or searching a board.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    /// Board construction received the wrong number of edge values.
    #[error("invalid board size: expected {expected} edge values, found {found}")]
    InvalidBoardSize { expected: usize, found: usize },

    /// A swap or rotation referenced a position outside the 3x3 grid.
    #[error("tile index {index} is out of range (valid positions are 0..=8)")]
    IndexOutOfRange { index: usize },

    /// A swap was requested but fewer than two candidate positions exist.
    #[error("no unmatched pair available: {available} candidate position(s), need 2")]
    NoUnmatchedPairAvailable { available: usize },

    /// Text input contained a token that is not a valid edge value.
    #[error("invalid symbol '{token}' at position {position}")]
    InvalidSymbol { token: String, position: usize },

    /// The search used up its iteration budget without finding a solution.
    #[error("search exhausted after {iterations} iterations without a solution")]
    SearchExhausted { iterations: u64 },

    /// The search used up its time budget without finding a solution.
    #[error("search timed out after {elapsed:?} without a solution")]
    SearchTimedOut { elapsed: Duration },
}

/// Result type for puzzle operations
pub type PuzzleResult<T> = Result<T, PuzzleError>;
