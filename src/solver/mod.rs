//! This module contains the solving strategies and their shared contract.
//!
//! All strategies implement the [Solver] trait: they mutate a [Board] in
//! place through the transactional [Workspace] interface, record every
//! mutation in an [ActionLog](crate::action::ActionLog), and report an
//! [Outcome]. The complete strategies (everything except simulated
//! annealing) either solve the board or prove that no solution is reachable;
//! annealing trades that completeness for speed on easy and medium puzzles.
//!
//! The closed set of strategies is also available through [SolverKind],
//! which is convenient for benchmarking and command-line style dispatch.

pub mod annealing;
pub mod arc_consistency;
pub mod backtracking;
pub mod heuristics;

pub use annealing::AnnealingSolver;
pub use arc_consistency::ArcConsistencySolver;
pub use backtracking::{BacktrackingSolver, ForwardCheckingSolver};
pub use heuristics::HeuristicSolver;

use crate::Board;
use crate::action::{Action, ActionLog};
use crate::error::SudokuResult;

use serde::{Deserialize, Serialize};

use std::fmt::{self, Display, Formatter};

/// The result classification of a solving run.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Outcome {

    /// The board was solved. The mutated board is guaranteed to satisfy
    /// [Board::is_solution].
    Solved,

    /// The strategy proved that no solution is reachable from the given
    /// cells. This is a legitimate outcome for unsolvable puzzles, not an
    /// error.
    Exhausted,

    /// The strategy stopped without an answer because its iteration or node
    /// budget expired. The caller may retry with a larger budget or, for
    /// stochastic strategies, a different seed.
    GaveUp
}

/// A trait for the solving strategies of this crate. A solver mutates the
/// provided board in place; on [Outcome::Solved] the board is a solution,
/// otherwise it is left in whatever state the strategy reached (for the
/// complete strategies that is the initial state, since every insertion on a
/// failed branch is undone).
pub trait Solver {

    /// Solves, or attempts to solve, the given board. Returns the full
    /// action trace of the attempt together with the outcome.
    ///
    /// # Errors
    ///
    /// `SudokuError::MutatedGivenCell` if the strategy attempts to mutate a
    /// given cell. This indicates a bug in the strategy and aborts the run
    /// immediately; the surrounding process is never terminated.
    fn solve(&mut self, board: &mut Board)
        -> SudokuResult<(ActionLog, Outcome)>;
}

/// The transactional view of a board that strategies mutate through. Every
/// insertion and deletion is forwarded to the board, which rejects mutations
/// of given cells, and appended to the action log on success.
pub(crate) struct Workspace<'a> {
    board: &'a mut Board,
    log: ActionLog
}

impl<'a> Workspace<'a> {
    pub(crate) fn new(board: &'a mut Board) -> Workspace<'a> {
        Workspace {
            board,
            log: ActionLog::new()
        }
    }

    pub(crate) fn board(&self) -> &Board {
        self.board
    }

    pub(crate) fn value(&self, x: usize, y: usize) -> Option<usize> {
        self.board.cell(x, y)
    }

    pub(crate) fn insert(&mut self, x: usize, y: usize, value: usize)
            -> SudokuResult<()> {
        self.board.insert(x, y, value)?;
        self.log.push(Action::Insert { x, y, value });
        Ok(())
    }

    pub(crate) fn delete(&mut self, x: usize, y: usize) -> SudokuResult<()> {
        self.board.delete(x, y)?;
        self.log.push(Action::Delete { x, y });
        Ok(())
    }

    /// Ends the run, appending the terminating [Action::Quit] to the log.
    pub(crate) fn finish(mut self, outcome: Outcome)
            -> (ActionLog, Outcome) {
        self.log.push(Action::Quit);
        (self.log, outcome)
    }
}

/// The ternary result of a recursive search below some branch. This is
/// internal to the backtracking-family strategies; at the root it is mapped
/// to an [Outcome].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Search {

    /// A solution was found below this branch.
    Solved,

    /// All candidates below this branch were tried without success.
    Failed,

    /// The node budget expired somewhere below this branch.
    Budget
}

impl Search {
    pub(crate) fn outcome(self) -> Outcome {
        match self {
            Search::Solved => Outcome::Solved,
            Search::Failed => Outcome::Exhausted,
            Search::Budget => Outcome::GaveUp
        }
    }
}

/// A counter for the optional cooperative node budget of the
/// backtracking-family strategies. The budget is checked before every
/// recursive call.
pub(crate) struct NodeBudget {
    limit: Option<u64>,
    visited: u64
}

impl NodeBudget {
    pub(crate) fn new(limit: Option<u64>) -> NodeBudget {
        NodeBudget {
            limit,
            visited: 0
        }
    }

    /// Consumes one node. Returns `false` if the budget is exhausted.
    pub(crate) fn consume(&mut self) -> bool {
        if let Some(limit) = self.limit {
            if self.visited >= limit {
                return false;
            }
        }

        self.visited += 1;
        true
    }
}

/// An enumeration of the five solving strategies, with their default
/// configurations. This is a convenience for callers that select a strategy
/// dynamically, for example from a command line argument or a benchmark
/// matrix; the strategies themselves can also be instantiated and configured
/// directly.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum SolverKind {

    /// See [BacktrackingSolver].
    Backtracking,

    /// See [HeuristicSolver].
    Heuristic,

    /// See [ForwardCheckingSolver].
    ForwardChecking,

    /// See [ArcConsistencySolver].
    ArcConsistency,

    /// See [AnnealingSolver]. Dispatch uses a thread-local random number
    /// generator; instantiate the solver directly for seeded, reproducible
    /// runs.
    Annealing
}

impl SolverKind {

    /// All five strategies, in the order they are documented.
    pub const ALL: [SolverKind; 5] = [
        SolverKind::Backtracking,
        SolverKind::Heuristic,
        SolverKind::ForwardChecking,
        SolverKind::ArcConsistency,
        SolverKind::Annealing
    ];

    /// Runs the strategy in its default configuration on the given board.
    ///
    /// # Errors
    ///
    /// As for [Solver::solve].
    pub fn solve(self, board: &mut Board)
            -> SudokuResult<(ActionLog, Outcome)> {
        match self {
            SolverKind::Backtracking =>
                BacktrackingSolver::new().solve(board),
            SolverKind::Heuristic => HeuristicSolver::new().solve(board),
            SolverKind::ForwardChecking =>
                ForwardCheckingSolver::new().solve(board),
            SolverKind::ArcConsistency =>
                ArcConsistencySolver::new().solve(board),
            SolverKind::Annealing =>
                AnnealingSolver::new_default().solve(board)
        }
    }
}

impl Display for SolverKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolverKind::Backtracking => "Backtracking",
            SolverKind::Heuristic => "CSP heuristics",
            SolverKind::ForwardChecking => "Forward Checking",
            SolverKind::ArcConsistency => "Arc-Consistency",
            SolverKind::Annealing => "Simulated Annealing"
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    use crate::error::SudokuError;

    /// World Puzzle Federation Sudoku GP 2020 Round 8, Puzzle 2, with its
    /// unique solution.
    pub(crate) const CLASSIC_PUZZLE: &str =
        "----81-----2--78---53---17-37-------6-------3-------24-69---23---59--4-----65----";

    pub(crate) const CLASSIC_SOLUTION: &str =
        "746281359912537846853496172374125698628749513591368724169874235285913467437652981";

    /// A small puzzle whose two empty regions keep every strategy fast.
    pub(crate) const NEARLY_SOLVED: &str =
        "4839216579673458212518764935481329767295641381367982453726895148142537696954-----";

    /// Two equal givens share row 0, so no solution exists.
    pub(crate) const CONTRADICTION: &str =
        "11-------------------------------------------------------------------------------";

    fn complete_kinds() -> Vec<SolverKind> {
        vec![
            SolverKind::Backtracking,
            SolverKind::Heuristic,
            SolverKind::ForwardChecking,
            SolverKind::ArcConsistency
        ]
    }

    #[test]
    fn complete_strategies_find_the_unique_solution() {
        let expected = Board::parse(CLASSIC_SOLUTION).unwrap();

        for kind in complete_kinds() {
            let mut board = Board::parse(CLASSIC_PUZZLE).unwrap();
            let (log, outcome) = kind.solve(&mut board).unwrap();

            assert_eq!(Outcome::Solved, outcome, "{} did not solve", kind);
            assert_eq!(expected.to_line(), board.to_line(),
                "{} found a different grid", kind);
            assert!(board.is_solution());
            assert!(log.len() > 0);
        }
    }

    #[test]
    fn contradictory_givens_are_exhausted() {
        for kind in complete_kinds() {
            let mut board = Board::parse(CONTRADICTION).unwrap();
            let initial = board.clone();
            let (_, outcome) = kind.solve(&mut board).unwrap();

            assert_eq!(Outcome::Exhausted, outcome,
                "{} claims a solution for a contradiction", kind);
            assert_eq!(initial, board,
                "{} left the board mutated after exhaustion", kind);
        }
    }

    #[test]
    fn forward_checking_matches_baseline_observationally() {
        for code in &[CLASSIC_PUZZLE, NEARLY_SOLVED, CONTRADICTION] {
            let mut baseline_board = Board::parse(code).unwrap();
            let mut fc_board = Board::parse(code).unwrap();

            let (_, baseline_outcome) = BacktrackingSolver::new()
                .solve(&mut baseline_board)
                .unwrap();
            let (_, fc_outcome) = ForwardCheckingSolver::new()
                .solve(&mut fc_board)
                .unwrap();

            assert_eq!(baseline_outcome, fc_outcome);
            assert_eq!(baseline_board, fc_board);
        }
    }

    #[test]
    fn single_given_row_is_completed() {
        let code = format!("123456789{}", "-".repeat(72));
        let mut board = Board::parse(&code).unwrap();
        let (_, outcome) =
            BacktrackingSolver::new().solve(&mut board).unwrap();

        assert_eq!(Outcome::Solved, outcome);
        assert!(board.is_solution());

        for x in 0..crate::SIZE {
            assert_eq!(Some(x + 1), board.get(x, 0).unwrap());
        }
    }

    #[test]
    fn replaying_the_log_reproduces_the_final_board() {
        let mut board = Board::parse(CLASSIC_PUZZLE).unwrap();
        let replayed = board.clone();
        let (log, outcome) =
            BacktrackingSolver::new().solve(&mut board).unwrap();
        assert_eq!(Outcome::Solved, outcome);

        let mut replayed = replayed;

        for action in &log {
            match *action {
                Action::Insert { x, y, value } =>
                    replayed.insert(x, y, value).unwrap(),
                Action::Delete { x, y } => replayed.delete(x, y).unwrap(),
                Action::Quit => { }
            }
        }

        assert_eq!(board, replayed);
    }

    #[test]
    fn log_ends_with_quit() {
        for kind in SolverKind::ALL.iter() {
            let mut board = Board::parse(NEARLY_SOLVED).unwrap();
            let (log, _) = kind.solve(&mut board).unwrap();

            assert_eq!(Some(&Action::Quit), log.as_slice().last());
            assert_eq!(1,
                log.iter().filter(|a| **a == Action::Quit).count());
        }
    }

    #[test]
    fn workspace_rejects_given_cell_mutation() {
        let mut board = Board::parse(CLASSIC_PUZZLE).unwrap();
        let mut workspace = Workspace::new(&mut board);

        assert_eq!(Err(SudokuError::MutatedGivenCell { x: 4, y: 0 }),
            workspace.insert(4, 0, 2));
        assert!(workspace.log.is_empty());
    }

    #[test]
    fn kind_displays_its_label() {
        assert_eq!("Backtracking",
            format!("{}", SolverKind::Backtracking));
        assert_eq!("CSP heuristics", format!("{}", SolverKind::Heuristic));
        assert_eq!("Simulated Annealing",
            format!("{}", SolverKind::Annealing));
    }
}
