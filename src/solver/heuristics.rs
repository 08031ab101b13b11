//! This module contains the heuristic CSP strategy, which augments
//! backtracking with variable and value ordering.

use crate::Board;
use crate::action::ActionLog;
use crate::error::SudokuResult;
use crate::query;
use crate::set::ValueSet;
use crate::solver::{NodeBudget, Outcome, Search, Solver, Workspace};

use std::cmp::Reverse;

/// A complete strategy that orders the search with the classic CSP
/// heuristics instead of scanning cells row-major.
///
/// Cell selection uses minimum remaining values (MRV): the empty cell with
/// the fewest legal candidates is filled next, so that contradictions
/// surface as high in the search tree as possible. A cell with exactly one
/// candidate is taken immediately without scanning further. Ties are broken
/// by the degree heuristic, preferring the cell with the most filled
/// neighbours; cells sharing more than one unit with a filled neighbour
/// count that neighbour once per shared unit.
///
/// Candidate values are ordered least-constraining first: each candidate is
/// tentatively inserted, the remaining freedom of the empty neighbours is
/// summed, and the insertion is deleted again. Candidates are then tried in
/// descending order of that freedom. A candidate that leaves some neighbour
/// without any legal value is ranked last rather than skipped, which keeps
/// the ordering a pure reordering of the same candidate set. The probe
/// insertions and deletions go through the same transactional interface as
/// the search itself and therefore appear in the action log.
///
/// An optional node budget provides a cooperative cancellation point, as
/// for [BacktrackingSolver](crate::solver::BacktrackingSolver).
pub struct HeuristicSolver {
    node_limit: Option<u64>
}

impl HeuristicSolver {

    /// Creates a new heuristic solver without a node budget.
    pub fn new() -> HeuristicSolver {
        HeuristicSolver {
            node_limit: None
        }
    }

    /// Creates a new heuristic solver that gives up after visiting
    /// `node_limit` search nodes.
    pub fn with_node_limit(node_limit: u64) -> HeuristicSolver {
        HeuristicSolver {
            node_limit: Some(node_limit)
        }
    }

    /// Selects the next cell to fill by MRV with the degree heuristic as
    /// the tie breaker. Returns `None` if no empty cell remains.
    fn select_cell(board: &Board) -> Option<(usize, usize, ValueSet)> {
        let mut best: Option<(usize, usize, ValueSet, usize)> = None;

        for y in 0..crate::SIZE {
            for x in 0..crate::SIZE {
                if board.cell(x, y).is_some() {
                    continue;
                }

                let domain = query::legal_values(board, x, y);

                if domain.len() == 1 {
                    return Some((x, y, domain));
                }

                let degree = query::filled_neighbours(board, x, y);
                let replace = match best {
                    None => true,
                    Some((_, _, best_domain, best_degree)) =>
                        domain.len() < best_domain.len()
                            || (domain.len() == best_domain.len()
                                && degree > best_degree)
                };

                if replace {
                    best = Some((x, y, domain, degree));
                }
            }
        }

        best.map(|(x, y, domain, _)| (x, y, domain))
    }

    /// Sums the number of legal candidates over the empty neighbours of the
    /// given cell. Returns `i64::MIN` if some empty neighbour has no legal
    /// candidate at all.
    fn neighbour_freedom(board: &Board, x: usize, y: usize) -> i64 {
        let mut freedom = 0;

        for (nx, ny) in query::neighbours(x, y) {
            if board.cell(nx, ny).is_some() {
                continue;
            }

            let candidates = query::legal_values(board, nx, ny).len();

            if candidates == 0 {
                return i64::MIN;
            }

            freedom += candidates as i64;
        }

        freedom
    }

    /// Orders the candidates of the cell at `(x, y)` least-constraining
    /// first. Candidates with equal freedom stay in ascending value order.
    fn ordered_candidates(workspace: &mut Workspace<'_>, x: usize, y: usize,
            domain: ValueSet) -> SudokuResult<Vec<usize>> {
        let mut scored = Vec::with_capacity(domain.len());

        for value in domain {
            workspace.insert(x, y, value)?;
            let freedom =
                HeuristicSolver::neighbour_freedom(workspace.board(), x, y);
            workspace.delete(x, y)?;
            scored.push((value, freedom));
        }

        scored.sort_by_key(|&(_, freedom)| Reverse(freedom));
        Ok(scored.into_iter().map(|(value, _)| value).collect())
    }

    fn solve_rec(workspace: &mut Workspace<'_>, budget: &mut NodeBudget)
            -> SudokuResult<Search> {
        if !budget.consume() {
            return Ok(Search::Budget);
        }

        let (x, y, domain) =
            match HeuristicSolver::select_cell(workspace.board()) {
                Some(cell) => cell,
                None => return Ok(Search::Solved)
            };

        for value in
                HeuristicSolver::ordered_candidates(workspace, x, y, domain)? {
            workspace.insert(x, y, value)?;

            match HeuristicSolver::solve_rec(workspace, budget)? {
                Search::Solved => return Ok(Search::Solved),
                Search::Budget => return Ok(Search::Budget),
                Search::Failed => workspace.delete(x, y)?
            }
        }

        Ok(Search::Failed)
    }
}

impl Default for HeuristicSolver {
    fn default() -> HeuristicSolver {
        HeuristicSolver::new()
    }
}

impl Solver for HeuristicSolver {
    fn solve(&mut self, board: &mut Board)
            -> SudokuResult<(ActionLog, Outcome)> {
        let mut workspace = Workspace::new(board);

        if query::has_conflict(workspace.board()) {
            return Ok(workspace.finish(Outcome::Exhausted));
        }

        let mut budget = NodeBudget::new(self.node_limit);
        let search = HeuristicSolver::solve_rec(&mut workspace, &mut budget)?;
        Ok(workspace.finish(search.outcome()))
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    use crate::action::Action;
    use crate::solver::tests::{CLASSIC_PUZZLE, CLASSIC_SOLUTION,
        NEARLY_SOLVED};

    #[test]
    fn heuristic_solves_classic_puzzle() {
        let mut board = Board::parse(CLASSIC_PUZZLE).unwrap();
        let (_, outcome) = HeuristicSolver::new().solve(&mut board).unwrap();

        assert_eq!(Outcome::Solved, outcome);
        assert_eq!(CLASSIC_SOLUTION, board.to_line());
    }

    #[test]
    fn singleton_domain_is_selected_first() {
        // column 0 holds 1 to 8, so (0, 8) is the only cell with a single
        // candidate
        let code: String = (1..=8)
            .map(|digit| format!("{}--------", digit))
            .chain(Some("---------".to_owned()))
            .collect();
        let board = Board::parse(&code).unwrap();

        let (x, y, domain) = HeuristicSolver::select_cell(&board).unwrap();

        assert_eq!((0, 8), (x, y));
        assert_eq!(Some(9), domain.single());
    }

    #[test]
    fn equal_domains_fall_back_to_the_degree_heuristic() {
        // (2, 0) shares both its row and its block with the two givens,
        // counting each twice, and therefore beats every other cell with a
        // seven-element domain
        let code = format!("12{}", "-".repeat(79));
        let board = Board::parse(&code).unwrap();

        let (x, y, domain) = HeuristicSolver::select_cell(&board).unwrap();

        assert_eq!((2, 0), (x, y));
        assert_eq!(7, domain.len());
    }

    #[test]
    fn value_ordering_probes_are_logged() {
        let mut board = Board::parse(NEARLY_SOLVED).unwrap();
        let (log, outcome) = HeuristicSolver::new().solve(&mut board).unwrap();

        assert_eq!(Outcome::Solved, outcome);
        assert!(board.is_solution());

        // the puzzle solves without dead ends, so every deletion in the log
        // is a value-ordering probe being undone
        assert!(log.iter().any(|a| matches!(a, Action::Delete { .. })));
    }

    #[test]
    fn node_limit_gives_up() {
        let mut board = Board::parse(CLASSIC_PUZZLE).unwrap();
        let (_, outcome) = HeuristicSolver::with_node_limit(2)
            .solve(&mut board)
            .unwrap();

        assert_eq!(Outcome::GaveUp, outcome);
    }
}
