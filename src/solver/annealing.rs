//! This module contains the stochastic simulated-annealing strategy.

use crate::Board;
use crate::action::ActionLog;
use crate::error::SudokuResult;
use crate::query;
use crate::set::ValueSet;
use crate::solver::{Outcome, Solver, Workspace};

use rand::Rng;
use rand::rngs::ThreadRng;

/// The number of iterations after which the default configuration gives up.
pub const DEFAULT_MAX_ITERATIONS: u64 = 30_000;

/// The score of a solved board: nine distinct values in each of the nine
/// rows and each of the nine blocks.
const SCORE_MAX: usize = 162;

const TEMPERATURE_DECAY: f64 = 0.999;

/// An incomplete, stochastic strategy based on simulated annealing.
///
/// The free cells of every column are first filled with the values missing
/// from that column, in random order, so columns hold nine distinct values
/// throughout. A board is then scored by the number of distinct values in
/// its rows and blocks, 162 being a solution. Each iteration proposes to
/// swap the values of two random free cells in a random column (only
/// columns with at least two free cells are eligible). A proposal that
/// improves the score is always applied; a worsening or neutral one is
/// applied with probability `exp(delta / temperature)`, where the
/// temperature starts at 1 and decays by a factor of 0.999 per iteration.
///
/// If the best score seen since the last restart does not improve for
/// `2000 + 3000 / (162 - best)` consecutive iterations, the search has
/// settled into a local maximum: a random non-empty subset of the columns
/// is cleared and refilled randomly, and the search continues from there.
///
/// The strategy cannot prove unsolvability. It reports [Outcome::GaveUp]
/// when the iteration budget expires, when the givens are contradictory,
/// and when the board leaves no freedom to optimize (fewer than two free
/// cells in every column) but the forced filling is no solution.
pub struct AnnealingSolver<R: Rng> {
    rng: R,
    max_iterations: u64
}

impl AnnealingSolver<ThreadRng> {

    /// Creates a new annealing solver that uses a [ThreadRng] for its
    /// random decisions and the default iteration budget. Use
    /// [AnnealingSolver::new] with a seeded generator for reproducible
    /// runs.
    pub fn new_default() -> AnnealingSolver<ThreadRng> {
        AnnealingSolver::new(rand::thread_rng())
    }
}

impl<R: Rng> AnnealingSolver<R> {

    /// Creates a new annealing solver that uses the given random number
    /// generator and the default iteration budget.
    pub fn new(rng: R) -> AnnealingSolver<R> {
        AnnealingSolver::with_budget(rng, DEFAULT_MAX_ITERATIONS)
    }

    /// Creates a new annealing solver that gives up after `max_iterations`
    /// swap proposals.
    pub fn with_budget(rng: R, max_iterations: u64) -> AnnealingSolver<R> {
        AnnealingSolver {
            rng,
            max_iterations
        }
    }

    /// Fills the free cells of `column` with the values missing from it, in
    /// random order.
    fn fill_column(&mut self, workspace: &mut Workspace<'_>, column: usize,
            free_rows: &[usize]) -> SudokuResult<()> {
        let missing =
            ValueSet::full() - query::column_values(workspace.board(), column);
        let values = shuffle(&mut self.rng, missing.iter());

        for (&row, value) in free_rows.iter().zip(values) {
            workspace.insert(column, row, value)?;
        }

        Ok(())
    }

    /// Evaluates the score the board would have after swapping the two
    /// cells, without mutating it.
    fn successor_score(board: &Board, column: usize, row_1: usize,
            row_2: usize) -> SudokuResult<usize> {
        let mut successor = board.clone();
        let value_1 = board.cell(column, row_1);
        let value_2 = board.cell(column, row_2);

        if let Some(value) = value_2 {
            successor.insert(column, row_1, value)?;
        }

        if let Some(value) = value_1 {
            successor.insert(column, row_2, value)?;
        }

        Ok(score(&successor))
    }

    /// Applies an accepted swap through the transactional interface, so all
    /// four mutations appear in the action log.
    fn swap(workspace: &mut Workspace<'_>, column: usize, row_1: usize,
            row_2: usize) -> SudokuResult<()> {
        let value_1 = workspace.value(column, row_1);
        let value_2 = workspace.value(column, row_2);

        if let (Some(value_1), Some(value_2)) = (value_1, value_2) {
            workspace.delete(column, row_1)?;
            workspace.insert(column, row_1, value_2)?;
            workspace.delete(column, row_2)?;
            workspace.insert(column, row_2, value_1)?;
        }

        Ok(())
    }

    /// Clears and randomly refills a random non-empty subset of the
    /// columns. This is the escape from local maxima.
    fn randomize(&mut self, workspace: &mut Workspace<'_>,
            free_rows: &[Vec<usize>]) -> SudokuResult<()> {
        let count = self.rng.gen_range(1..=crate::SIZE);
        let mut columns = shuffle(&mut self.rng, 0..crate::SIZE);
        columns.truncate(count);

        for &column in &columns {
            for &row in &free_rows[column] {
                workspace.delete(column, row)?;
            }
        }

        for &column in &columns {
            self.fill_column(workspace, column, &free_rows[column])?;
        }

        Ok(())
    }

    fn run(&mut self, workspace: &mut Workspace<'_>) -> SudokuResult<Outcome> {
        let free_rows: Vec<Vec<usize>> = (0..crate::SIZE)
            .map(|x| (0..crate::SIZE)
                .filter(|&y| workspace.value(x, y).is_none())
                .collect())
            .collect();

        for column in 0..crate::SIZE {
            self.fill_column(workspace, column, &free_rows[column])?;
        }

        let mut current = score(workspace.board());

        if current == SCORE_MAX {
            return Ok(Outcome::Solved);
        }

        let swappable: Vec<usize> = (0..crate::SIZE)
            .filter(|&x| free_rows[x].len() >= 2)
            .collect();

        if swappable.is_empty() {
            // the filling was forced, so there is nothing left to optimize
            return Ok(Outcome::GaveUp);
        }

        let mut temperature = 1.0;
        let mut best = current;
        let mut stuck = 0;

        for _ in 0..self.max_iterations {
            let column = swappable[self.rng.gen_range(0..swappable.len())];
            let rows = &free_rows[column];
            let index_1 = self.rng.gen_range(0..rows.len());
            let mut index_2 = self.rng.gen_range(0..(rows.len() - 1));

            if index_2 >= index_1 {
                index_2 += 1;
            }

            let (row_1, row_2) = (rows[index_1], rows[index_2]);
            let successor = Self::successor_score(
                workspace.board(), column, row_1, row_2)?;

            if successor == SCORE_MAX {
                Self::swap(workspace, column, row_1, row_2)?;
                return Ok(Outcome::Solved);
            }

            let delta = successor as f64 - current as f64;

            if delta > 0.0
                    || (delta / temperature).exp() > self.rng.gen::<f64>() {
                Self::swap(workspace, column, row_1, row_2)?;
                current = successor;
            }

            if current > best {
                best = current;
                stuck = 0;
            }
            else {
                stuck += 1;

                if stuck > 2000 + 3000 / (SCORE_MAX - best) as u64 {
                    self.randomize(workspace, &free_rows)?;
                    current = score(workspace.board());
                    best = current;
                    stuck = 0;

                    if current == SCORE_MAX {
                        return Ok(Outcome::Solved);
                    }
                }
            }

            temperature *= TEMPERATURE_DECAY;
        }

        Ok(Outcome::GaveUp)
    }
}

impl<R: Rng> Solver for AnnealingSolver<R> {
    fn solve(&mut self, board: &mut Board)
            -> SudokuResult<(ActionLog, Outcome)> {
        let mut workspace = Workspace::new(board);

        if query::has_conflict(workspace.board()) {
            return Ok(workspace.finish(Outcome::GaveUp));
        }

        let outcome = self.run(&mut workspace)?;
        Ok(workspace.finish(outcome))
    }
}

/// The number of distinct values over all rows and blocks. Columns are not
/// counted, since the annealing moves keep them distinct by construction.
fn score(board: &Board) -> usize {
    let mut score = 0;

    for row in 0..crate::SIZE {
        score += query::row_values(board, row).len();
    }

    for block_y in (0..crate::SIZE).step_by(crate::BLOCK) {
        for block_x in (0..crate::SIZE).step_by(crate::BLOCK) {
            score += query::block_values(board, block_x, block_y).len();
        }
    }

    score
}

fn shuffle<T>(rng: &mut impl Rng, values: impl Iterator<Item = T>) -> Vec<T> {
    let mut vec: Vec<T> = values.collect();
    let len = vec.len();

    for i in 1..len {
        let j = rng.gen_range(0..=i);
        vec.swap(i, j);
    }

    vec
}

#[cfg(test)]
mod tests {

    use super::*;

    use crate::solver::tests::{CONTRADICTION, NEARLY_SOLVED};

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const EASY_PUZZLE: &str =
        "--3-2-6--9--3-5--1--18-64----81-29--7-------8--67-82----26-95--8--2-3--9--5-1-3--";

    const NEARLY_SOLVED_SOLUTION: &str =
        "483921657967345821251876493548132976729564138136798245372689514814253769695417382";

    #[test]
    fn forced_filling_is_recognized_as_solved() {
        // the five free cells sit in five different columns, so the filling
        // is forced and completes the unique solution
        let mut board = Board::parse(NEARLY_SOLVED).unwrap();
        let mut solver = AnnealingSolver::new(ChaCha8Rng::seed_from_u64(17));
        let (_, outcome) = solver.solve(&mut board).unwrap();

        assert_eq!(Outcome::Solved, outcome);
        assert_eq!(NEARLY_SOLVED_SOLUTION, board.to_line());
    }

    #[test]
    fn contradictory_givens_give_up_immediately() {
        let mut board = Board::parse(CONTRADICTION).unwrap();
        let (log, outcome) = AnnealingSolver::new_default()
            .solve(&mut board)
            .unwrap();

        assert_eq!(Outcome::GaveUp, outcome);
        assert_eq!(1, log.len());
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let mut first_board = Board::parse(EASY_PUZZLE).unwrap();
        let mut second_board = Board::parse(EASY_PUZZLE).unwrap();

        let (first_log, first_outcome) =
            AnnealingSolver::new(ChaCha8Rng::seed_from_u64(42))
                .solve(&mut first_board)
                .unwrap();
        let (second_log, second_outcome) =
            AnnealingSolver::new(ChaCha8Rng::seed_from_u64(42))
                .solve(&mut second_board)
                .unwrap();

        assert_eq!(first_outcome, second_outcome);
        assert_eq!(first_log, second_log);
        assert_eq!(first_board, second_board);
    }

    #[test]
    fn outcome_matches_board_state() {
        for seed in 0..4 {
            let mut board = Board::parse(EASY_PUZZLE).unwrap();
            let givens = board.clone();
            let mut solver =
                AnnealingSolver::new(ChaCha8Rng::seed_from_u64(seed));
            let (_, outcome) = solver.solve(&mut board).unwrap();

            match outcome {
                Outcome::Solved => assert!(board.is_solution()),
                Outcome::GaveUp => assert!(!board.is_solution()),
                Outcome::Exhausted =>
                    panic!("annealing cannot prove exhaustion")
            }

            for y in 0..crate::SIZE {
                for x in 0..crate::SIZE {
                    if givens.is_given(x, y).unwrap() {
                        assert_eq!(givens.cell(x, y), board.cell(x, y));
                    }
                }
            }
        }
    }

    #[test]
    fn budget_of_zero_gives_up_after_filling() {
        let mut board = Board::parse(EASY_PUZZLE).unwrap();
        let mut solver = AnnealingSolver::with_budget(
            ChaCha8Rng::seed_from_u64(3), 0);
        let (_, outcome) = solver.solve(&mut board).unwrap();

        assert_eq!(Outcome::GaveUp, outcome);
        assert!(board.is_complete());
    }
}
