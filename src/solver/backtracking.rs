//! This module contains the baseline chronological backtracking strategy and
//! its forward-checking refinement.

use crate::Board;
use crate::action::ActionLog;
use crate::error::SudokuResult;
use crate::query;
use crate::solver::{NodeBudget, Outcome, Search, Solver, Workspace};

/// The baseline complete strategy: recursive chronological backtracking.
///
/// The next cell is always the first empty free cell in row-major order
/// (resuming at the most recently filled position), and candidate values are
/// tried in ascending order. A candidate is inserted, the search recurses,
/// and on failure the insertion is deleted again before the next candidate
/// is tried. When no empty cell remains, the board is solved; when the root
/// call runs out of candidates, the search space is exhausted and the puzzle
/// has no solution.
///
/// An optional node budget provides a cooperative cancellation point: it is
/// checked before every recursive call and yields [Outcome::GaveUp] once
/// exceeded.
pub struct BacktrackingSolver {
    node_limit: Option<u64>
}

impl BacktrackingSolver {

    /// Creates a new backtracking solver without a node budget.
    pub fn new() -> BacktrackingSolver {
        BacktrackingSolver {
            node_limit: None
        }
    }

    /// Creates a new backtracking solver that gives up after visiting
    /// `node_limit` search nodes.
    pub fn with_node_limit(node_limit: u64) -> BacktrackingSolver {
        BacktrackingSolver {
            node_limit: Some(node_limit)
        }
    }

    fn solve_rec(workspace: &mut Workspace<'_>, from: (usize, usize),
            budget: &mut NodeBudget) -> SudokuResult<Search> {
        if !budget.consume() {
            return Ok(Search::Budget);
        }

        let (x, y) = match query::first_empty_cell(workspace.board(), from) {
            Some(cell) => cell,
            None => return Ok(Search::Solved)
        };

        for value in query::legal_values(workspace.board(), x, y) {
            workspace.insert(x, y, value)?;

            match BacktrackingSolver::solve_rec(workspace, (x, y), budget)? {
                Search::Solved => return Ok(Search::Solved),
                Search::Budget => return Ok(Search::Budget),
                Search::Failed => workspace.delete(x, y)?
            }
        }

        Ok(Search::Failed)
    }
}

impl Default for BacktrackingSolver {
    fn default() -> BacktrackingSolver {
        BacktrackingSolver::new()
    }
}

impl Solver for BacktrackingSolver {
    fn solve(&mut self, board: &mut Board)
            -> SudokuResult<(ActionLog, Outcome)> {
        let mut workspace = Workspace::new(board);

        if query::has_conflict(workspace.board()) {
            return Ok(workspace.finish(Outcome::Exhausted));
        }

        let mut budget = NodeBudget::new(self.node_limit);
        let search =
            BacktrackingSolver::solve_rec(&mut workspace, (0, 0), &mut budget)?;
        Ok(workspace.finish(search.outcome()))
    }
}

/// A complete strategy with the same skeleton as [BacktrackingSolver], but
/// after each tentative insertion every neighbour of the filled cell is
/// scanned first: if some empty neighbour is left without any legal value,
/// the branch cannot succeed and is abandoned immediately, without
/// recursing. This prunes dead branches one level earlier than the baseline
/// and must never change which outcome is reached, only how fast.
pub struct ForwardCheckingSolver {
    node_limit: Option<u64>
}

impl ForwardCheckingSolver {

    /// Creates a new forward-checking solver without a node budget.
    pub fn new() -> ForwardCheckingSolver {
        ForwardCheckingSolver {
            node_limit: None
        }
    }

    /// Creates a new forward-checking solver that gives up after visiting
    /// `node_limit` search nodes.
    pub fn with_node_limit(node_limit: u64) -> ForwardCheckingSolver {
        ForwardCheckingSolver {
            node_limit: Some(node_limit)
        }
    }

    fn wipes_out_a_neighbour(board: &Board, x: usize, y: usize) -> bool {
        query::neighbours(x, y).into_iter()
            .any(|(nx, ny)| board.cell(nx, ny).is_none() &&
                !board.given(nx, ny) &&
                query::legal_values(board, nx, ny).is_empty())
    }

    fn solve_rec(workspace: &mut Workspace<'_>, from: (usize, usize),
            budget: &mut NodeBudget) -> SudokuResult<Search> {
        if !budget.consume() {
            return Ok(Search::Budget);
        }

        let (x, y) = match query::first_empty_cell(workspace.board(), from) {
            Some(cell) => cell,
            None => return Ok(Search::Solved)
        };

        for value in query::legal_values(workspace.board(), x, y) {
            workspace.insert(x, y, value)?;

            if ForwardCheckingSolver::wipes_out_a_neighbour(
                    workspace.board(), x, y) {
                workspace.delete(x, y)?;
                continue;
            }

            match ForwardCheckingSolver::solve_rec(workspace, (x, y),
                    budget)? {
                Search::Solved => return Ok(Search::Solved),
                Search::Budget => return Ok(Search::Budget),
                Search::Failed => workspace.delete(x, y)?
            }
        }

        Ok(Search::Failed)
    }
}

impl Default for ForwardCheckingSolver {
    fn default() -> ForwardCheckingSolver {
        ForwardCheckingSolver::new()
    }
}

impl Solver for ForwardCheckingSolver {
    fn solve(&mut self, board: &mut Board)
            -> SudokuResult<(ActionLog, Outcome)> {
        let mut workspace = Workspace::new(board);

        if query::has_conflict(workspace.board()) {
            return Ok(workspace.finish(Outcome::Exhausted));
        }

        let mut budget = NodeBudget::new(self.node_limit);
        let search = ForwardCheckingSolver::solve_rec(&mut workspace, (0, 0),
            &mut budget)?;
        Ok(workspace.finish(search.outcome()))
    }
}
