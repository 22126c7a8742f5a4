//! Randomized greedy best-first search for a fully matching board.
//!
//! The engine keeps a max-priority frontier of `(score, StateId)` pairs. Each
//! iteration pops the best known state, rebuilds the board from its identifier and
//! derives a batch of children, each one random move away, touching only tiles that
//! still sit on an unmatched edge. Children already seen are dropped; the first
//! solved child ends the search.
use crate::engine::{Board, StateId, Symbol};
use crate::error::{PuzzleError, PuzzleResult};
use crate::moves::choose_move;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::time::{Duration, Instant};

/// Number of children derived from each expanded state unless configured otherwise.
pub const DEFAULT_CHILDREN_PER_EXPANSION: usize = 10;

/// Search engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Children generated per expanded state
    pub children_per_expansion: usize,

    /// Stop with [`SearchOutcome::Exhausted`] after this many expansions
    pub max_iterations: Option<u64>,

    /// Stop with [`SearchOutcome::TimedOut`] once this much time has passed
    pub time_limit: Option<Duration>,

    /// Seed for the move generator; `None` seeds from system entropy
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            children_per_expansion: DEFAULT_CHILDREN_PER_EXPANSION,
            max_iterations: None,
            time_limit: None,
            seed: None,
        }
    }
}

/// Counters describing a search run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States popped from the frontier and expanded.
    pub iterations: u64,
    /// Children derived, including duplicates.
    pub children_generated: u64,
    /// Children dropped because their identifier had been seen before.
    pub duplicates_skipped: u64,
    /// Distinct identifiers recorded so far.
    pub states_seen: usize,
    /// Highest score reached.
    pub best_score: u8,
    /// Wall-clock time since the search started.
    pub elapsed: Duration,
}

/// The board a search ended with and how it got there.
#[derive(Debug, Clone)]
pub struct SearchReport<S> {
    /// The solved board, or the best-scoring board seen when the budget ran out.
    pub board: Board<S>,
    /// Counters for the run that produced `board`.
    pub stats: SearchStats,
}

impl<S: Symbol> SearchReport<S> {
    /// Whether the reported board is exactly the arrangement `target`.
    pub fn matches(&self, target: &StateId<S>) -> bool {
        self.board.state_id() == *target
    }
}

/// How a search ended.
///
/// Running out of budget is an expected outcome, not a fault; use
/// [`SearchOutcome::into_result`] to treat it as an error.
#[derive(Debug, Clone)]
pub enum SearchOutcome<S> {
    Solved(SearchReport<S>),
    /// The iteration budget ran out, or no unexplored states were left.
    Exhausted(SearchReport<S>),
    TimedOut(SearchReport<S>),
}

impl<S: Symbol> SearchOutcome<S> {
    pub fn is_solved(&self) -> bool {
        matches!(self, SearchOutcome::Solved(_))
    }

    pub fn report(&self) -> &SearchReport<S> {
        match self {
            SearchOutcome::Solved(report)
            | SearchOutcome::Exhausted(report)
            | SearchOutcome::TimedOut(report) => report,
        }
    }

    /// Converts the outcome into a result that fails unless the board was solved.
    ///
    /// # Errors
    /// Returns [`PuzzleError::SearchExhausted`] or [`PuzzleError::SearchTimedOut`]
    /// when the search stopped on its budget.
    pub fn into_result(self) -> PuzzleResult<SearchReport<S>> {
        match self {
            SearchOutcome::Solved(report) => Ok(report),
            SearchOutcome::Exhausted(report) => Err(PuzzleError::SearchExhausted {
                iterations: report.stats.iterations,
            }),
            SearchOutcome::TimedOut(report) => Err(PuzzleError::SearchTimedOut {
                elapsed: report.stats.elapsed,
            }),
        }
    }
}

// Max-heap entry: higher score first, then earlier insertion first.
#[derive(Debug)]
struct FrontierEntry<S> {
    score: u8,
    order: u64,
    id: StateId<S>,
}

impl<S> PartialEq for FrontierEntry<S> {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score && self.order == other.order
    }
}

impl<S> Eq for FrontierEntry<S> {}

impl<S> Ord for FrontierEntry<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl<S> PartialOrd for FrontierEntry<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Randomized greedy best-first search engine.
///
/// The frontier, the seen-identifier set and the random generator belong to the
/// engine instance, so independent engines can run side by side. Every call to
/// [`SearchEngine::solve`] starts from a clean state.
///
/// # Examples
/// ```
/// use tile_match_solver::engine::{Board, SOLVED_EXAMPLE};
/// use tile_match_solver::solver::{SearchConfig, SearchEngine};
///
/// let board = Board::from_values(&SOLVED_EXAMPLE).unwrap();
/// let mut engine = SearchEngine::new(SearchConfig { seed: Some(1), ..SearchConfig::default() });
/// let outcome = engine.solve(&board).unwrap();
/// assert!(outcome.is_solved());
/// assert_eq!(outcome.report().stats.iterations, 0);
/// ```
pub struct SearchEngine<S> {
    config: SearchConfig,
    frontier: BinaryHeap<FrontierEntry<S>>,
    seen: HashSet<StateId<S>>,
    rng: SmallRng,
    next_order: u64,
}

impl<S: Symbol> SearchEngine<S> {
    pub fn new(config: SearchConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self {
            config,
            frontier: BinaryHeap::new(),
            seen: HashSet::new(),
            rng,
            next_order: 0,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Number of distinct identifiers recorded by the last search.
    pub fn states_seen(&self) -> usize {
        self.seen.len()
    }

    /// Number of states still waiting in the frontier.
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Drops the frontier and the seen set. A seeded engine also rewinds its
    /// generator, so repeated searches from the same board are reproducible.
    pub fn reset(&mut self) {
        self.frontier.clear();
        self.seen.clear();
        self.next_order = 0;
        if let Some(seed) = self.config.seed {
            self.rng = SmallRng::seed_from_u64(seed);
        }
    }

    /// Searches for a solved arrangement reachable from `start`.
    ///
    /// # Errors
    /// Returns [`PuzzleError::IndexOutOfRange`] if a generated move names a position
    /// outside the grid. Running out of budget is not an error; see [`SearchOutcome`].
    pub fn solve(&mut self, start: &Board<S>) -> PuzzleResult<SearchOutcome<S>> {
        self.solve_with_progress(start, |_| {})
    }

    /// Like [`SearchEngine::solve`], calling `on_iteration` after every expansion.
    ///
    /// Budgets are checked at the top of each iteration, never in the middle of one.
    ///
    /// # Errors
    /// Same as [`SearchEngine::solve`].
    pub fn solve_with_progress<F>(
        &mut self,
        start: &Board<S>,
        mut on_iteration: F,
    ) -> PuzzleResult<SearchOutcome<S>>
    where
        F: FnMut(&SearchStats),
    {
        self.reset();
        let started = Instant::now();
        let mut stats = SearchStats {
            best_score: start.score(),
            ..SearchStats::default()
        };

        if start.is_solved() {
            return Ok(SearchOutcome::Solved(self.report(start.clone(), stats, started)));
        }

        let mut best = start.clone();
        let start_id = start.state_id();
        self.seen.insert(start_id.clone());
        self.push(start.score(), start_id);

        loop {
            if let Some(max_iterations) = self.config.max_iterations {
                if stats.iterations >= max_iterations {
                    return Ok(SearchOutcome::Exhausted(self.report(best, stats, started)));
                }
            }
            if let Some(time_limit) = self.config.time_limit {
                if started.elapsed() >= time_limit {
                    return Ok(SearchOutcome::TimedOut(self.report(best, stats, started)));
                }
            }
            let Some(entry) = self.frontier.pop() else {
                return Ok(SearchOutcome::Exhausted(self.report(best, stats, started)));
            };
            stats.iterations += 1;

            let parent = Board::from_state_id(&entry.id);
            let positions: Vec<usize> = parent.unmatched_positions().into_iter().collect();

            for _ in 0..self.config.children_per_expansion {
                let Some(mv) = choose_move(&positions, &mut self.rng) else {
                    break;
                };
                let mut child = parent.clone();
                mv.apply(&mut child)?;
                stats.children_generated += 1;

                let id = child.state_id();
                if !self.seen.insert(id.clone()) {
                    stats.duplicates_skipped += 1;
                    continue;
                }

                if child.score() > best.score() {
                    stats.best_score = child.score();
                    best = child.clone();
                }
                if child.is_solved() {
                    return Ok(SearchOutcome::Solved(self.report(child, stats, started)));
                }
                self.push(child.score(), id);
            }

            stats.states_seen = self.seen.len();
            stats.elapsed = started.elapsed();
            on_iteration(&stats);
        }
    }

    fn push(&mut self, score: u8, id: StateId<S>) {
        self.frontier.push(FrontierEntry {
            score,
            order: self.next_order,
            id,
        });
        self.next_order += 1;
    }

    fn report(
        &self,
        board: Board<S>,
        mut stats: SearchStats,
        started: Instant,
    ) -> SearchReport<S> {
        stats.states_seen = self.seen.len();
        stats.elapsed = started.elapsed();
        SearchReport { board, stats }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{SOLVED_EXAMPLE, TILE_COUNT, VALUE_COUNT};

    fn solved_board() -> Board<u8> {
        Board::from_values(&SOLVED_EXAMPLE).unwrap()
    }

    fn seeded(seed: u64) -> SearchConfig {
        SearchConfig {
            seed: Some(seed),
            ..SearchConfig::default()
        }
    }

    #[test]
    fn test_presolved_board_returns_immediately() {
        let board = solved_board();
        let mut engine = SearchEngine::new(seeded(1));
        let outcome = engine.solve(&board).unwrap();

        assert!(outcome.is_solved());
        let report = outcome.report();
        assert_eq!(report.stats.iterations, 0);
        assert_eq!(report.stats.children_generated, 0);
        assert_eq!(report.board, board, "no mutation may be applied");
        assert!(report.matches(&board.state_id()));
        assert_eq!(engine.frontier_len(), 0);
    }

    #[test]
    fn test_uniform_board_is_terminal() {
        let board = Board::from_values(&[1u8; VALUE_COUNT]).unwrap();
        let outcome = SearchEngine::new(seeded(2)).solve(&board).unwrap();
        assert!(outcome.is_solved());
        assert_eq!(outcome.report().stats.iterations, 0);
    }

    #[test]
    fn test_finds_single_rotation_fix() {
        let mut board = solved_board();
        board.rotate_tile(4, true).unwrap();
        assert!(!board.is_solved());

        let mut engine = SearchEngine::new(SearchConfig {
            children_per_expansion: 200,
            max_iterations: Some(10_000),
            seed: Some(3),
            ..SearchConfig::default()
        });
        let report = engine
            .solve(&board)
            .unwrap()
            .into_result()
            .expect("a single rotation away should be found");

        assert!(report.board.is_solved());
        assert_eq!(report.board.score(), 12);
        assert_eq!(report.stats.best_score, 12);
        assert!(report.stats.iterations >= 1);
        assert!(report.stats.states_seen >= 2);
    }

    #[test]
    fn test_iteration_budget_reports_exhausted() {
        let mut board = solved_board();
        board.shuffle_with_seed(9);
        assert!(!board.is_solved());

        let mut engine = SearchEngine::new(SearchConfig {
            max_iterations: Some(0),
            seed: Some(4),
            ..SearchConfig::default()
        });
        let outcome = engine.solve(&board).unwrap();
        assert!(matches!(outcome, SearchOutcome::Exhausted(_)));
        assert_eq!(outcome.report().board, board, "best board is the start when nothing ran");
        assert_eq!(
            outcome.into_result().unwrap_err(),
            PuzzleError::SearchExhausted { iterations: 0 }
        );
    }

    #[test]
    fn test_time_budget_reports_timed_out() {
        let mut board = solved_board();
        board.shuffle_with_seed(10);

        let mut engine = SearchEngine::new(SearchConfig {
            time_limit: Some(Duration::ZERO),
            seed: Some(5),
            ..SearchConfig::default()
        });
        let outcome = engine.solve(&board).unwrap();
        assert!(matches!(outcome, SearchOutcome::TimedOut(_)));
        assert!(matches!(
            outcome.into_result(),
            Err(PuzzleError::SearchTimedOut { .. })
        ));
    }

    #[test]
    fn test_bounded_search_tracks_best_board() {
        let mut board = solved_board();
        board.shuffle_with_seed(12);
        let start_score = board.score();

        let mut engine = SearchEngine::new(SearchConfig {
            max_iterations: Some(50),
            seed: Some(6),
            ..SearchConfig::default()
        });
        let mut progress_calls = 0;
        let outcome = engine
            .solve_with_progress(&board, |stats| {
                progress_calls += 1;
                assert!(stats.states_seen >= 1);
            })
            .unwrap();
        let report = outcome.report();

        assert!(report.stats.best_score >= start_score);
        assert_eq!(report.board.score(), report.stats.best_score);
        assert_eq!(report.stats.states_seen, engine.states_seen());
        assert!(report.stats.children_generated >= report.stats.duplicates_skipped);
        if !outcome.is_solved() {
            assert_eq!(progress_calls, report.stats.iterations);
        }
    }

    #[test]
    fn test_seeded_search_is_reproducible() {
        let mut board = solved_board();
        board.shuffle_with_seed(13);
        let config = SearchConfig {
            max_iterations: Some(40),
            seed: Some(77),
            ..SearchConfig::default()
        };

        let first = SearchEngine::new(config.clone()).solve(&board).unwrap();
        let second = SearchEngine::new(config.clone()).solve(&board).unwrap();
        assert_eq!(first.report().board, second.report().board);
        assert_eq!(
            first.report().stats.children_generated,
            second.report().stats.children_generated
        );

        // Re-running on the same engine resets and rewinds the generator.
        let mut engine = SearchEngine::new(config);
        let third = engine.solve(&board).unwrap();
        let fourth = engine.solve(&board).unwrap();
        assert_eq!(third.report().board, fourth.report().board);
        assert_eq!(third.report().stats.iterations, fourth.report().stats.iterations);
    }

    #[test]
    fn test_reset_clears_search_state() {
        let mut board = solved_board();
        board.shuffle_with_seed(14);
        let mut engine = SearchEngine::new(SearchConfig {
            max_iterations: Some(5),
            seed: Some(8),
            ..SearchConfig::default()
        });
        engine.solve(&board).unwrap();
        assert!(engine.states_seen() > 0);

        engine.reset();
        assert_eq!(engine.states_seen(), 0);
        assert_eq!(engine.frontier_len(), 0);
    }

    #[test]
    fn test_zero_children_exhausts_frontier() {
        let mut board = solved_board();
        board.shuffle_with_seed(15);
        let mut engine = SearchEngine::new(SearchConfig {
            children_per_expansion: 0,
            seed: Some(9),
            ..SearchConfig::default()
        });
        let outcome = engine.solve(&board).unwrap();
        assert!(matches!(outcome, SearchOutcome::Exhausted(_)));
        assert_eq!(outcome.report().stats.iterations, 1);
    }

    #[test]
    fn test_children_only_touch_unmatched_tiles() {
        let mut board = solved_board();
        board.rotate_tile(0, true).unwrap();
        board.rotate_tile(0, true).unwrap();
        let unmatched = board.unmatched_positions();
        assert!(!unmatched.is_empty());

        let mut engine = SearchEngine::new(SearchConfig {
            children_per_expansion: 50,
            max_iterations: Some(1),
            seed: Some(17),
            ..SearchConfig::default()
        });
        let outcome = engine.solve(&board).unwrap();
        assert!(matches!(outcome, SearchOutcome::Exhausted(_)));
        assert!(engine.frontier_len() > 0);

        for entry in engine.frontier.iter() {
            let child = Board::from_state_id(&entry.id);
            for index in (0..TILE_COUNT).filter(|i| !unmatched.contains(i)) {
                assert_eq!(
                    child.tile(index).unwrap(),
                    board.tile(index).unwrap(),
                    "tile {} changed in {}",
                    index,
                    entry.id
                );
            }
        }
    }

    #[test]
    fn test_frontier_prefers_score_then_insertion_order() {
        let id = solved_board().state_id();
        let mut heap = BinaryHeap::new();
        for (order, score) in [(0, 5), (1, 9), (2, 5), (3, 9), (4, 1)] {
            heap.push(FrontierEntry {
                score,
                order,
                id: id.clone(),
            });
        }
        let popped: Vec<(u8, u64)> = std::iter::from_fn(|| heap.pop())
            .map(|e| (e.score, e.order))
            .collect();
        assert_eq!(popped, vec![(9, 1), (9, 3), (5, 0), (5, 2), (1, 4)]);
    }
}
