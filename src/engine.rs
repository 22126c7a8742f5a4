//! Core board model for the 3x3 edge-matching puzzle.
//!
//! This module defines the puzzle's fundamental components:
//! - `Tile`: A square tile with four edge values that can be rotated in place.
//! - `Board`: Nine tiles on a fixed 3x3 grid, with the per-edge match status and score
//!   kept in sync with every swap and rotation.
//! - `StateId`: A canonical, round-trippable identifier of a board arrangement.
//! - `Game`: Manages an interactive session, including move count and history (for undo).
use crate::error::{PuzzleError, PuzzleResult};
use crate::moves::Move;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::Hash;

/// Any value that can label a tile edge.
///
/// Blanket-implemented for every type that can be compared, hashed and printed,
/// so plain integers, chars or small enums all work.
pub trait Symbol: Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display {}

impl<T> Symbol for T where T: Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display {}

/// Number of tiles on the board.
pub const TILE_COUNT: usize = 9;

/// Number of tile columns (and rows) of the square grid.
pub const GRID_WIDTH: usize = 3;

/// Number of internal edges between adjacent tiles.
pub const EDGE_COUNT: usize = 12;

/// Number of edge values needed to build a board (9 tiles x 4 edges).
pub const VALUE_COUNT: usize = TILE_COUNT * 4;

/// Score of a board on which every internal edge matches.
pub const SOLVED_SCORE: u8 = EDGE_COUNT as u8;

/// The fixed internal edges of the grid as `(lower, higher)` position pairs.
///
/// A position delta of 1 marks a horizontal neighbour pair, a delta of 3 a vertical one.
pub const EDGES: [(usize, usize); EDGE_COUNT] = [
    (0, 1),
    (0, 3),
    (1, 2),
    (1, 4),
    (2, 5),
    (3, 4),
    (3, 6),
    (4, 5),
    (4, 7),
    (5, 8),
    (6, 7),
    (7, 8),
];

/// A known solved arrangement, tiles row-major, edges in top/right/bottom/left order.
pub const SOLVED_EXAMPLE: [u8; VALUE_COUNT] = [
    1, 4, 3, 2, 3, 2, 2, 4, 2, 3, 5, 2, //
    3, 5, 2, 5, 2, 4, 1, 5, 5, 3, 3, 4, //
    2, 5, 3, 1, 1, 3, 2, 5, 3, 4, 1, 3,
];

const SHUFFLE_ROUNDS: usize = 50;

/// A single square tile.
///
/// ```text
/// +-------+
/// |   t   |
/// | l   r |
/// |   b   |
/// +-------+
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tile<S> {
    top: S,
    right: S,
    bottom: S,
    left: S,
}

impl<S: Symbol> Tile<S> {
    /// Creates a tile from its edges in `[top, right, bottom, left]` order.
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_match_solver::engine::Tile;
    /// let tile = Tile::new([1, 2, 3, 4]);
    /// assert_eq!(tile.top(), 1);
    /// assert_eq!(tile.left(), 4);
    /// ```
    pub fn new(edges: [S; 4]) -> Self {
        let [top, right, bottom, left] = edges;
        Tile {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn top(&self) -> S {
        self.top
    }

    pub fn right(&self) -> S {
        self.right
    }

    pub fn bottom(&self) -> S {
        self.bottom
    }

    pub fn left(&self) -> S {
        self.left
    }

    /// Returns the edges in `[top, right, bottom, left]` order.
    pub fn edges(&self) -> [S; 4] {
        [self.top, self.right, self.bottom, self.left]
    }

    /// Returns the tile's contribution to a board's [`StateId`].
    ///
    /// Every edge occupies its own slot, so two tiles share a signature only when
    /// all four edges are equal in the same orientation, however wide the symbols are.
    pub fn signature(&self) -> [S; 4] {
        self.edges()
    }

    /// Rotates the tile 90 degrees clockwise: the left edge becomes the top.
    pub fn rotate_right(&mut self) {
        *self = Tile {
            top: self.left,
            right: self.top,
            bottom: self.right,
            left: self.bottom,
        };
    }

    /// Rotates the tile 90 degrees counterclockwise: the right edge becomes the top.
    pub fn rotate_left(&mut self) {
        *self = Tile {
            top: self.right,
            right: self.bottom,
            bottom: self.left,
            left: self.top,
        };
    }
}

impl<S: Symbol> fmt::Display for Tile<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.top, self.right, self.bottom, self.left)
    }
}

/// Canonical identifier of a board arrangement.
///
/// Holds the nine tile signatures concatenated in board order. It is enough to rebuild
/// the board with [`Board::from_state_id`], which is what lets the search engine keep
/// only identifiers in its frontier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId<S>([S; VALUE_COUNT]);

impl<S: Symbol> StateId<S> {
    /// Wraps 36 edge values, tile by tile in `top, right, bottom, left` order.
    pub fn from_values(values: [S; VALUE_COUNT]) -> Self {
        StateId(values)
    }

    /// The 36 edge values in board order.
    pub fn values(&self) -> &[S; VALUE_COUNT] {
        &self.0
    }

    /// Iterates over the per-tile signatures in board order.
    pub fn tile_signatures(&self) -> impl Iterator<Item = &[S]> {
        self.0.chunks(4)
    }
}

impl<S: Symbol> fmt::Display for StateId<S> {
    /// Writes `t,r,b,l|t,r,b,l|...`, which `utils::parse_state_id` reads back.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (tile_idx, signature) in self.tile_signatures().enumerate() {
            if tile_idx > 0 {
                f.write_str("|")?;
            }
            for (edge_idx, value) in signature.iter().enumerate() {
                if edge_idx > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{}", value)?;
            }
        }
        Ok(())
    }
}

fn tiles_from_values<S: Symbol>(values: &[S; VALUE_COUNT]) -> [Tile<S>; TILE_COUNT] {
    std::array::from_fn(|i| {
        Tile::new([
            values[i * 4],
            values[i * 4 + 1],
            values[i * 4 + 2],
            values[i * 4 + 3],
        ])
    })
}

// Horizontal neighbours face each other with right/left edges, vertical ones with bottom/top.
fn facing_edges_match<S: Symbol>(first: &Tile<S>, second: &Tile<S>, delta: usize) -> bool {
    if delta == 1 {
        first.right == second.left
    } else {
        first.bottom == second.top
    }
}

/// The 3x3 puzzle board.
///
/// Positions are numbered row-major:
///
/// ```text
/// 0 1 2
/// 3 4 5
/// 6 7 8
/// ```
///
/// The match status of each internal edge and the resulting score are recomputed by
/// every mutating method before it returns, so they never describe a stale arrangement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board<S> {
    tiles: [Tile<S>; TILE_COUNT],
    matches: [bool; EDGE_COUNT],
    score: u8,
}

impl<S: Symbol> Board<S> {
    /// Builds a board from 36 edge values: nine tiles, row-major, each as
    /// top, right, bottom, left.
    ///
    /// # Errors
    /// Returns [`PuzzleError::InvalidBoardSize`] unless exactly 36 values are given.
    ///
    /// # Examples
    /// ```
    /// use tile_match_solver::engine::{Board, SOLVED_EXAMPLE};
    /// let board = Board::from_values(&SOLVED_EXAMPLE).unwrap();
    /// assert!(board.is_solved());
    /// assert!(Board::from_values(&SOLVED_EXAMPLE[..35]).is_err());
    /// ```
    pub fn from_values(values: &[S]) -> PuzzleResult<Self> {
        let values: &[S; VALUE_COUNT] =
            values.try_into().map_err(|_| PuzzleError::InvalidBoardSize {
                expected: VALUE_COUNT,
                found: values.len(),
            })?;
        Ok(Self::from_tiles(tiles_from_values(values)))
    }

    /// Builds a board from tiles in row-major order and computes its matches.
    pub fn from_tiles(tiles: [Tile<S>; TILE_COUNT]) -> Self {
        let mut board = Board {
            tiles,
            matches: [false; EDGE_COUNT],
            score: 0,
        };
        board.refresh();
        board
    }

    /// Rebuilds the exact arrangement an identifier was taken from.
    pub fn from_state_id(id: &StateId<S>) -> Self {
        Self::from_tiles(tiles_from_values(id.values()))
    }

    pub fn tiles(&self) -> &[Tile<S>; TILE_COUNT] {
        &self.tiles
    }

    /// Returns the tile at `index`.
    ///
    /// # Errors
    /// Returns [`PuzzleError::IndexOutOfRange`] if `index` is not in `0..=8`.
    pub fn tile(&self, index: usize) -> PuzzleResult<&Tile<S>> {
        self.tiles
            .get(index)
            .ok_or(PuzzleError::IndexOutOfRange { index })
    }

    /// Flattens the board back into the 36-value construction format.
    pub fn values(&self) -> [S; VALUE_COUNT] {
        std::array::from_fn(|i| self.tiles[i / 4].edges()[i % 4])
    }

    /// Exchanges the tiles at positions `first` and `second`.
    ///
    /// # Errors
    /// Returns [`PuzzleError::IndexOutOfRange`] if either position is not in `0..=8`;
    /// the board is left untouched in that case.
    pub fn swap_tiles(&mut self, first: usize, second: usize) -> PuzzleResult<()> {
        Self::check_index(first)?;
        Self::check_index(second)?;
        self.tiles.swap(first, second);
        self.refresh();
        Ok(())
    }

    /// Rotates the tile at `index` clockwise or counterclockwise.
    ///
    /// # Errors
    /// Returns [`PuzzleError::IndexOutOfRange`] if `index` is not in `0..=8`.
    pub fn rotate_tile(&mut self, index: usize, clockwise: bool) -> PuzzleResult<()> {
        let tile = self
            .tiles
            .get_mut(index)
            .ok_or(PuzzleError::IndexOutOfRange { index })?;
        if clockwise {
            tile.rotate_right();
        } else {
            tile.rotate_left();
        }
        self.refresh();
        Ok(())
    }

    /// Number of matched internal edges, from 0 to 12.
    pub fn score(&self) -> u8 {
        self.score
    }

    /// Match status of each edge, in the order of [`EDGES`].
    pub fn edge_matches(&self) -> &[bool; EDGE_COUNT] {
        &self.matches
    }

    /// Match status keyed by edge pair.
    pub fn match_map(&self) -> BTreeMap<(usize, usize), bool> {
        EDGES
            .iter()
            .copied()
            .zip(self.matches.iter().copied())
            .collect()
    }

    pub fn is_solved(&self) -> bool {
        self.score == SOLVED_SCORE
    }

    pub fn state_id(&self) -> StateId<S> {
        StateId(self.values())
    }

    /// Positions of every tile that touches at least one unmatched edge.
    ///
    /// Empty exactly when the board is solved.
    pub fn unmatched_positions(&self) -> BTreeSet<usize> {
        EDGES
            .iter()
            .zip(self.matches.iter())
            .filter(|(_, matched)| !**matched)
            .flat_map(|(&(first, second), _)| [first, second])
            .collect()
    }

    /// Mixes the board up with 50 rounds of random swaps and rotations.
    ///
    /// Each round picks two positions (possibly the same one), swaps them, then
    /// rotates each of the two positions in a random direction.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for _ in 0..SHUFFLE_ROUNDS {
            let first = rng.gen_range(0..TILE_COUNT);
            let second = rng.gen_range(0..TILE_COUNT);
            self.tiles.swap(first, second);
            for index in [first, second] {
                if rng.gen_bool(0.5) {
                    self.tiles[index].rotate_right();
                } else {
                    self.tiles[index].rotate_left();
                }
            }
        }
        self.refresh();
    }

    /// Shuffles with a `SmallRng` seeded from `seed`, so the same seed always
    /// produces the same arrangement.
    pub fn shuffle_with_seed(&mut self, seed: u64) {
        let mut rng = SmallRng::seed_from_u64(seed);
        self.shuffle(&mut rng);
    }

    fn check_index(index: usize) -> PuzzleResult<()> {
        if index < TILE_COUNT {
            Ok(())
        } else {
            Err(PuzzleError::IndexOutOfRange { index })
        }
    }

    fn refresh(&mut self) {
        for (slot, &(first, second)) in self.matches.iter_mut().zip(EDGES.iter()) {
            *slot = facing_edges_match(&self.tiles[first], &self.tiles[second], second - first);
        }
        self.score = self.matches.iter().filter(|&&matched| matched).count() as u8;
    }
}

// Five text lines per tile; `width` is the widest symbol on the board.
fn tile_box<S: Symbol>(tile: &Tile<S>, width: usize) -> [String; 5] {
    let blank = " ".repeat(width);
    let cell = |value: S| format!("{:^width$}", value.to_string());
    let border = format!("+{}+", "-".repeat(3 * width + 4));
    [
        border.clone(),
        format!("| {blank} {} {blank} |", cell(tile.top)),
        format!("| {} {blank} {} |", cell(tile.left), cell(tile.right)),
        format!("| {blank} {} {blank} |", cell(tile.bottom)),
        border,
    ]
}

impl<S: Symbol> fmt::Display for Board<S> {
    /// Draws the board as a 3x3 grid of tile boxes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .values()
            .iter()
            .map(|value| value.to_string().chars().count())
            .max()
            .unwrap_or(1);
        let boxes: Vec<[String; 5]> = self.tiles.iter().map(|t| tile_box(t, width)).collect();

        let mut lines = Vec::with_capacity(GRID_WIDTH * 5);
        for row in boxes.chunks(GRID_WIDTH) {
            for line_idx in 0..5 {
                let line: Vec<&str> = row.iter().map(|b| b[line_idx].as_str()).collect();
                lines.push(line.join(" "));
            }
        }
        write!(f, "{}", lines.join("\n"))
    }
}

/// An interactive puzzle session.
///
/// Tracks the current board, the number of moves made and the boards that preceded
/// each move, so moves can be undone one at a time.
///
/// # Examples
/// ```
/// use tile_match_solver::engine::{Board, Game, SOLVED_EXAMPLE};
/// use tile_match_solver::moves::Move;
///
/// let board = Board::from_values(&SOLVED_EXAMPLE).unwrap();
/// let mut game = Game::new(board);
/// game.apply(Move::Swap { first: 0, second: 1 }).unwrap();
/// assert!(!game.is_solved());
/// assert!(game.undo_last_move());
/// assert!(game.is_solved());
/// ```
#[derive(Clone, Debug)]
pub struct Game<S> {
    board: Board<S>,
    moves: u32,
    history: Vec<Board<S>>,
}

impl<S: Symbol> Game<S> {
    pub fn new(board: Board<S>) -> Self {
        Game {
            board,
            moves: 0,
            history: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board<S> {
        &self.board
    }

    /// Number of moves currently applied (undone moves are not counted).
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Applies a move to the board and records the previous board for undo.
    ///
    /// # Errors
    /// Returns [`PuzzleError::IndexOutOfRange`] if the move names an invalid position;
    /// the game state is unchanged in that case.
    pub fn apply(&mut self, mv: Move) -> PuzzleResult<()> {
        let mut next = self.board.clone();
        mv.apply(&mut next)?;
        self.history.push(std::mem::replace(&mut self.board, next));
        self.moves += 1;
        Ok(())
    }

    /// Reverts the last applied move.
    ///
    /// Returns `false` if there is nothing to undo.
    pub fn undo_last_move(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.board = previous;
                self.moves = self.moves.saturating_sub(1);
                true
            }
            None => false,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.board.is_solved()
    }
}
