//! This module contains the strategy that preprocesses the board with arc
//! consistency before searching.

use crate::Board;
use crate::action::ActionLog;
use crate::error::SudokuResult;
use crate::query;
use crate::set::ValueSet;
use crate::solver::{NodeBudget, Outcome, Search, Solver, Workspace};

use std::collections::VecDeque;

type Domains = [[ValueSet; crate::SIZE]; crate::SIZE];

/// A complete strategy that runs the AC-3 algorithm once before searching
/// and then backtracks chronologically over the pruned domains.
///
/// Every cell starts with an explicit domain: the singleton of its value for
/// occupied cells, otherwise the values that are legal initially. AC-3 then
/// processes a queue of directed arcs between neighbouring cells. For the
/// inequality constraints of this puzzle, revising an arc can only prune
/// when the target domain is a singleton, in which case that value is
/// removed from the source domain. Whenever a source domain shrinks, all
/// arcs pointing at it from its other empty neighbours are enqueued again,
/// since their revisions may now prune further. If any domain runs empty the
/// puzzle has no solution and the search is skipped entirely.
///
/// The subsequent search is the baseline of
/// [BacktrackingSolver](crate::solver::BacktrackingSolver) with one change:
/// the candidates of a cell are the intersection of its currently legal
/// values with its preprocessed domain. The pruned domains never exclude a
/// value that occurs in a solution, so the strategy reaches the same outcome
/// as the baseline.
///
/// An optional node budget provides a cooperative cancellation point, as
/// for the other backtracking-family strategies.
pub struct ArcConsistencySolver {
    node_limit: Option<u64>
}

impl ArcConsistencySolver {

    /// Creates a new arc-consistency solver without a node budget.
    pub fn new() -> ArcConsistencySolver {
        ArcConsistencySolver {
            node_limit: None
        }
    }

    /// Creates a new arc-consistency solver that gives up after visiting
    /// `node_limit` search nodes.
    pub fn with_node_limit(node_limit: u64) -> ArcConsistencySolver {
        ArcConsistencySolver {
            node_limit: Some(node_limit)
        }
    }

    fn initial_domains(board: &Board) -> SudokuResult<Domains> {
        let mut domains = [[ValueSet::new(); crate::SIZE]; crate::SIZE];

        for y in 0..crate::SIZE {
            for x in 0..crate::SIZE {
                domains[y][x] = match board.cell(x, y) {
                    Some(value) => ValueSet::singleton(value)?,
                    None => query::legal_values(board, x, y)
                };
            }
        }

        Ok(domains)
    }

    /// Runs AC-3 to a fixed point. Returns `false` if some domain ran
    /// empty, which proves the board unsolvable.
    fn propagate(board: &Board, domains: &mut Domains) -> SudokuResult<bool> {
        let mut queue = VecDeque::new();

        for y in 0..crate::SIZE {
            for x in 0..crate::SIZE {
                if board.cell(x, y).is_some() {
                    continue;
                }

                if domains[y][x].is_empty() {
                    return Ok(false);
                }

                for neighbour in query::neighbours(x, y) {
                    queue.push_back(((x, y), neighbour));
                }
            }
        }

        while let Some(((sx, sy), (tx, ty))) = queue.pop_front() {
            let singleton = match domains[ty][tx].single() {
                Some(value) => value,
                None => continue
            };

            if !domains[sy][sx].remove(singleton)? {
                continue;
            }

            if domains[sy][sx].is_empty() {
                return Ok(false);
            }

            for (nx, ny) in query::neighbours(sx, sy) {
                if board.cell(nx, ny).is_none() && (nx, ny) != (tx, ty) {
                    queue.push_back(((nx, ny), (sx, sy)));
                }
            }
        }

        Ok(true)
    }

    fn solve_rec(workspace: &mut Workspace<'_>, domains: &Domains,
            from: (usize, usize), budget: &mut NodeBudget)
            -> SudokuResult<Search> {
        if !budget.consume() {
            return Ok(Search::Budget);
        }

        let (x, y) = match query::first_empty_cell(workspace.board(), from) {
            Some(cell) => cell,
            None => return Ok(Search::Solved)
        };

        let candidates =
            query::legal_values(workspace.board(), x, y) & domains[y][x];

        for value in candidates {
            workspace.insert(x, y, value)?;

            match ArcConsistencySolver::solve_rec(workspace, domains, (x, y),
                    budget)? {
                Search::Solved => return Ok(Search::Solved),
                Search::Budget => return Ok(Search::Budget),
                Search::Failed => workspace.delete(x, y)?
            }
        }

        Ok(Search::Failed)
    }
}

impl Default for ArcConsistencySolver {
    fn default() -> ArcConsistencySolver {
        ArcConsistencySolver::new()
    }
}

impl Solver for ArcConsistencySolver {
    fn solve(&mut self, board: &mut Board)
            -> SudokuResult<(ActionLog, Outcome)> {
        let mut workspace = Workspace::new(board);

        if query::has_conflict(workspace.board()) {
            return Ok(workspace.finish(Outcome::Exhausted));
        }

        let mut domains =
            ArcConsistencySolver::initial_domains(workspace.board())?;

        if !ArcConsistencySolver::propagate(workspace.board(), &mut domains)? {
            return Ok(workspace.finish(Outcome::Exhausted));
        }

        let mut budget = NodeBudget::new(self.node_limit);
        let search = ArcConsistencySolver::solve_rec(&mut workspace, &domains,
            (0, 0), &mut budget)?;
        Ok(workspace.finish(search.outcome()))
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    use crate::solver::tests::{CLASSIC_PUZZLE, CLASSIC_SOLUTION};

    /// A puzzle with several naked singles, so propagation has visible
    /// effect.
    const EASY_PUZZLE: &str =
        "--3-2-6--9--3-5--1--18-64----81-29--7-------8--67-82----26-95--8--2-3--9--5-1-3--";

    #[test]
    fn arc_consistency_solves_classic_puzzle() {
        let mut board = Board::parse(CLASSIC_PUZZLE).unwrap();
        let (_, outcome) =
            ArcConsistencySolver::new().solve(&mut board).unwrap();

        assert_eq!(Outcome::Solved, outcome);
        assert_eq!(CLASSIC_SOLUTION, board.to_line());
    }

    #[test]
    fn propagation_never_prunes_solution_values() {
        let board = Board::parse(CLASSIC_PUZZLE).unwrap();
        let solution = Board::parse(CLASSIC_SOLUTION).unwrap();
        let mut domains =
            ArcConsistencySolver::initial_domains(&board).unwrap();

        assert!(ArcConsistencySolver::propagate(&board, &mut domains)
            .unwrap());

        for y in 0..crate::SIZE {
            for x in 0..crate::SIZE {
                let value = solution.cell(x, y).unwrap();
                assert!(domains[y][x].contains(value),
                    "value {} pruned from cell ({}, {})", value, x, y);
            }
        }
    }

    #[test]
    fn propagation_shrinks_some_domain() {
        let board = Board::parse(EASY_PUZZLE).unwrap();
        let initial = ArcConsistencySolver::initial_domains(&board).unwrap();
        let mut domains = initial;

        assert!(ArcConsistencySolver::propagate(&board, &mut domains)
            .unwrap());

        let shrunk = (0..crate::SIZE)
            .flat_map(|y| (0..crate::SIZE).map(move |x| (x, y)))
            .any(|(x, y)| domains[y][x].len() < initial[y][x].len());

        assert!(shrunk);
    }

    #[test]
    fn empty_domain_is_detected_before_searching() {
        // (0, 0) sees 2 to 9 in its row and 1 below it, so it has no
        // candidate although no two givens clash directly
        let code = format!("-234567891{}", "-".repeat(71));
        let mut board = Board::parse(&code).unwrap();
        let (log, outcome) =
            ArcConsistencySolver::new().solve(&mut board).unwrap();

        assert_eq!(Outcome::Exhausted, outcome);
        assert_eq!(1, log.len());
    }

    #[test]
    fn node_limit_gives_up() {
        let mut board = Board::parse(CLASSIC_PUZZLE).unwrap();
        let (_, outcome) = ArcConsistencySolver::with_node_limit(1)
            .solve(&mut board)
            .unwrap();

        assert_eq!(Outcome::GaveUp, outcome);
    }
}
