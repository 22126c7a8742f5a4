//! Board mutations and the random move-selection strategy.
//!
//! The search engine only mutates tiles that still touch an unmatched edge. This
//! module turns such a set of candidate positions into a single random [`Move`]:
//! half the time a rotation of one candidate, half the time a swap of two distinct
//! candidates. When there are not enough candidates for a swap, a rotation is
//! used instead.
use crate::engine::{Board, Symbol};
use crate::error::{PuzzleError, PuzzleResult};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

/// A single mutation of a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    /// Rotate the tile at `index`; clockwise when `clockwise` is true.
    Rotate { index: usize, clockwise: bool },
    /// Exchange the tiles at two positions.
    Swap { first: usize, second: usize },
}

impl Move {
    /// Applies the move to `board`.
    ///
    /// # Errors
    /// Returns [`PuzzleError::IndexOutOfRange`] if the move names a position outside the grid.
    pub fn apply<S: Symbol>(&self, board: &mut Board<S>) -> PuzzleResult<()> {
        match *self {
            Move::Rotate { index, clockwise } => board.rotate_tile(index, clockwise),
            Move::Swap { first, second } => board.swap_tiles(first, second),
        }
    }

    /// Picks two distinct entries of `positions` uniformly at random and swaps them.
    ///
    /// `positions` is expected to hold distinct values, as produced by
    /// [`Board::unmatched_positions`].
    ///
    /// # Errors
    /// Returns [`PuzzleError::NoUnmatchedPairAvailable`] if `positions` has fewer than two entries.
    pub fn random_swap<R: Rng + ?Sized>(positions: &[usize], rng: &mut R) -> PuzzleResult<Move> {
        let picked: Vec<usize> = positions.choose_multiple(rng, 2).copied().collect();
        match picked.as_slice() {
            &[first, second] => Ok(Move::Swap { first, second }),
            _ => Err(PuzzleError::NoUnmatchedPairAvailable {
                available: positions.len(),
            }),
        }
    }

    /// Picks one entry of `positions` and a random direction.
    ///
    /// Returns `None` if `positions` is empty.
    pub fn random_rotation<R: Rng + ?Sized>(positions: &[usize], rng: &mut R) -> Option<Move> {
        let index = *positions.choose(rng)?;
        Some(Move::Rotate {
            index,
            clockwise: rng.gen_bool(0.5),
        })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Rotate {
                index,
                clockwise: true,
            } => write!(f, "rotate {} clockwise", index),
            Move::Rotate {
                index,
                clockwise: false,
            } => write!(f, "rotate {} counterclockwise", index),
            Move::Swap { first, second } => write!(f, "swap {} and {}", first, second),
        }
    }
}

/// Chooses one random move restricted to `positions`.
///
/// With probability one half the move is a rotation, otherwise a swap of two distinct
/// positions. A swap that cannot be formed (fewer than two positions) falls back to a
/// rotation. Returns `None` only when `positions` is empty.
///
/// # Examples
/// ```
/// use rand::rngs::SmallRng;
/// use rand::SeedableRng;
/// use tile_match_solver::moves::{choose_move, Move};
///
/// let mut rng = SmallRng::seed_from_u64(1);
/// // A single candidate can only ever be rotated.
/// assert!(matches!(choose_move(&[4], &mut rng), Some(Move::Rotate { index: 4, .. })));
/// assert_eq!(choose_move(&[], &mut rng), None);
/// ```
pub fn choose_move<R: Rng + ?Sized>(positions: &[usize], rng: &mut R) -> Option<Move> {
    if rng.gen_bool(0.5) {
        return Move::random_rotation(positions, rng);
    }
    match Move::random_swap(positions, rng) {
        Ok(mv) => Some(mv),
        Err(_) => Move::random_rotation(positions, rng),
    }
}
