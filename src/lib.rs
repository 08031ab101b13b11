// Code lints

#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused_import_braces)]
#![warn(unused_lifetimes)]
#![warn(unused_qualifications)]

// Doc lints

#![warn(missing_docs)]

//! This crate implements a solving engine for classic 9x9 Sudoku. It offers
//! five interchangeable search strategies which share one mutable board
//! abstraction with transactional insert/delete semantics:
//!
//! * [BacktrackingSolver](solver::BacktrackingSolver), plain chronological
//! backtracking
//! * [HeuristicSolver](solver::HeuristicSolver), backtracking ordered by the
//! CSP heuristics minimum-remaining-values, degree, and
//! least-constraining-value
//! * [ForwardCheckingSolver](solver::ForwardCheckingSolver), backtracking
//! with early pruning of branches that empty a neighbour's options
//! * [ArcConsistencySolver](solver::ArcConsistencySolver), backtracking after
//! an AC-3 style domain reduction
//! * [AnnealingSolver](solver::AnnealingSolver), stochastic local search by
//! simulated annealing
//!
//! Every mutation a solver attempts, including dead ends that are undone
//! later, is recorded in an [ActionLog](action::ActionLog). Replaying the log
//! in order reconstructs the whole exploration path, for example to animate
//! it, while the board itself only reflects the net effect.
//!
//! # Parsing and printing boards
//!
//! A puzzle is written as a single line of 81 characters, one per cell in
//! row-major order, where `-` denotes an empty cell and the digits 1 to 9
//! denote given cells (see [Board::parse]).
//!
//! ```
//! use sudoku_search::Board;
//!
//! let board = Board::parse(&format!("123456789{}", "-".repeat(72))).unwrap();
//! assert!(board.is_given(0, 0).unwrap());
//! assert!(!board.is_given(0, 1).unwrap());
//! println!("{}", board);
//! ```
//!
//! # Solving boards
//!
//! All strategies implement the [Solver](solver::Solver) trait. A solve call
//! mutates the board in place and returns the action log together with an
//! [Outcome](solver::Outcome) which states whether the board was solved, the
//! search space was exhausted, or the solver gave up.
//!
//! ```
//! use sudoku_search::Board;
//! use sudoku_search::solver::{BacktrackingSolver, Outcome, Solver};
//!
//! let mut board = Board::parse(&format!("123456789{}", "-".repeat(72)))
//!     .unwrap();
//! let (log, outcome) = BacktrackingSolver::new().solve(&mut board).unwrap();
//!
//! assert_eq!(Outcome::Solved, outcome);
//! assert!(board.is_solution());
//! assert!(log.len() > 0);
//! ```

pub mod action;
pub mod error;
pub mod query;
pub mod set;
pub mod solver;

use crate::error::{ParseError, ParseResult, SudokuError, SudokuResult};

use std::fmt::{self, Display, Formatter};

/// The number of cells along one axis of the board.
pub const SIZE: usize = 9;

/// The number of cells along one axis of a block.
pub const BLOCK: usize = 3;

const CELLS: usize = SIZE * SIZE;

pub(crate) fn index(x: usize, y: usize) -> usize {
    y * SIZE + x
}

/// A 9x9 Sudoku board. Each cell either holds a value from 1 to 9 or is
/// empty. Additionally, the board tracks which cells are *given*, that is,
/// fixed by the puzzle. Given cells are decided at construction time and can
/// never be mutated afterwards; all other cells are *free* and may be filled
/// and cleared by solvers.
///
/// `Board` implements `Clone` to produce independent snapshots, which the
/// solvers rely on for trial evaluations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Board {
    cells: [Option<usize>; CELLS],
    given: [bool; CELLS]
}

impl Board {

    /// Creates a new, completely empty board without any given cells.
    pub fn new_empty() -> Board {
        Board {
            cells: [None; CELLS],
            given: [false; CELLS]
        }
    }

    /// Parses a board from its line code: exactly 81 characters, one per
    /// cell in row-major order (the cell at column `x` and row `y` is at
    /// index `y * 9 + x`). `-` denotes an empty free cell and the digits 1
    /// to 9 denote given cells. Surrounding whitespace is ignored.
    ///
    /// As an example, the code
    ///
    /// ```text
    /// --3-2-6--9--3-5--1--18-64----81-29--7-------8--67-82----26-95--8--2-3--9--5-1-3--
    /// ```
    ///
    /// describes a puzzle with 32 given cells.
    ///
    /// # Errors
    ///
    /// Any specialization of `ParseError` (see that documentation).
    pub fn parse(code: &str) -> ParseResult<Board> {
        let code = code.trim();
        let length = code.chars().count();

        if length != CELLS {
            return Err(ParseError::WrongLength(length));
        }

        let mut board = Board::new_empty();

        for (i, c) in code.chars().enumerate() {
            match c {
                '-' => { },
                '1'..='9' => {
                    board.cells[i] = Some(c as usize - '0' as usize);
                    board.given[i] = true;
                },
                _ => return Err(ParseError::InvalidCharacter(c))
            }
        }

        Ok(board)
    }

    /// Converts the board into its line code: 81 characters in row-major
    /// order, with `-` for empty cells and digits for filled cells. Note
    /// that solver-filled free cells are printed the same way as given
    /// cells, so parsing the result of a partially solved board marks all
    /// filled cells as given.
    pub fn to_line(&self) -> String {
        self.cells.iter()
            .map(|cell| match cell {
                Some(value) => (b'0' + *value as u8) as char,
                None => '-'
            })
            .collect()
    }

    fn check_bounds(x: usize, y: usize) -> SudokuResult<()> {
        if x >= SIZE || y >= SIZE {
            Err(SudokuError::OutOfBounds)
        }
        else {
            Ok(())
        }
    }

    /// Gets the content of the cell at the specified position, where `None`
    /// represents an empty cell.
    ///
    /// # Arguments
    ///
    /// * `x`: The column of the desired cell. Must be in the range `[0, 9[`.
    /// * `y`: The row of the desired cell. Must be in the range `[0, 9[`.
    ///
    /// # Errors
    ///
    /// If `x` or `y` are not in the specified range. In that case,
    /// `SudokuError::OutOfBounds` is returned.
    pub fn get(&self, x: usize, y: usize) -> SudokuResult<Option<usize>> {
        Board::check_bounds(x, y)?;
        Ok(self.cells[index(x, y)])
    }

    /// Indicates whether the cell at the specified position is a given cell,
    /// that is, fixed by the puzzle and immutable.
    ///
    /// # Arguments
    ///
    /// * `x`: The column of the checked cell. Must be in the range `[0, 9[`.
    /// * `y`: The row of the checked cell. Must be in the range `[0, 9[`.
    ///
    /// # Errors
    ///
    /// If `x` or `y` are not in the specified range. In that case,
    /// `SudokuError::OutOfBounds` is returned.
    pub fn is_given(&self, x: usize, y: usize) -> SudokuResult<bool> {
        Board::check_bounds(x, y)?;
        Ok(self.given[index(x, y)])
    }

    /// Inserts the given value into the free cell at the specified position.
    /// If the cell already holds a value, it is overwritten.
    ///
    /// # Arguments
    ///
    /// * `x`: The column of the assigned cell. Must be in the range `[0, 9[`.
    /// * `y`: The row of the assigned cell. Must be in the range `[0, 9[`.
    /// * `value`: The value to assign. Must be in the range `[1, 9]`.
    ///
    /// # Errors
    ///
    /// * `SudokuError::OutOfBounds` if `x` or `y` are not in the specified
    /// range.
    /// * `SudokuError::InvalidValue` if `value` is not in the specified
    /// range.
    /// * `SudokuError::MutatedGivenCell` if the cell at the specified
    /// position is given. The board remains unchanged in all error cases.
    pub fn insert(&mut self, x: usize, y: usize, value: usize)
            -> SudokuResult<()> {
        Board::check_bounds(x, y)?;

        if value < 1 || value > SIZE {
            return Err(SudokuError::InvalidValue);
        }

        if self.given[index(x, y)] {
            return Err(SudokuError::MutatedGivenCell { x, y });
        }

        self.cells[index(x, y)] = Some(value);
        Ok(())
    }

    /// Deletes the value of the free cell at the specified position, leaving
    /// it empty. Deleting an already empty cell is permitted and does
    /// nothing.
    ///
    /// # Arguments
    ///
    /// * `x`: The column of the cleared cell. Must be in the range `[0, 9[`.
    /// * `y`: The row of the cleared cell. Must be in the range `[0, 9[`.
    ///
    /// # Errors
    ///
    /// * `SudokuError::OutOfBounds` if `x` or `y` are not in the specified
    /// range.
    /// * `SudokuError::MutatedGivenCell` if the cell at the specified
    /// position is given. The board remains unchanged in all error cases.
    pub fn delete(&mut self, x: usize, y: usize) -> SudokuResult<()> {
        Board::check_bounds(x, y)?;

        if self.given[index(x, y)] {
            return Err(SudokuError::MutatedGivenCell { x, y });
        }

        self.cells[index(x, y)] = None;
        Ok(())
    }

    pub(crate) fn cell(&self, x: usize, y: usize) -> Option<usize> {
        self.cells[index(x, y)]
    }

    pub(crate) fn given(&self, x: usize, y: usize) -> bool {
        self.given[index(x, y)]
    }

    /// Counts the number of given cells of this board.
    pub fn count_givens(&self) -> usize {
        self.given.iter().filter(|&&g| g).count()
    }

    /// Indicates whether this board is complete, i.e. no cell is empty.
    /// Completeness says nothing about validity.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    /// Indicates whether this board is a solution, that is, it is complete
    /// and every row, every column, and every one of the nine blocks
    /// contains all values from 1 to 9 exactly once.
    pub fn is_solution(&self) -> bool {
        if !self.is_complete() {
            return false;
        }

        for i in 0..SIZE {
            if query::row_values(self, i).len() != SIZE {
                return false;
            }

            if query::column_values(self, i).len() != SIZE {
                return false;
            }
        }

        for block_y in 0..BLOCK {
            for block_x in 0..BLOCK {
                let values =
                    query::block_values(self, block_x * BLOCK, block_y * BLOCK);

                if values.len() != SIZE {
                    return false;
                }
            }
        }

        true
    }
}

fn line(start: char, thick_sep: char, thin_sep: char,
        segment: impl Fn(usize) -> char, pad: char, end: char) -> String {
    let mut result = String::new();

    for x in 0..SIZE {
        if x == 0 {
            result.push(start);
        }
        else if x % BLOCK == 0 {
            result.push(thick_sep);
        }
        else {
            result.push(thin_sep);
        }

        result.push(pad);
        result.push(segment(x));
        result.push(pad);
    }

    result.push(end);
    result.push('\n');
    result
}

fn to_char(cell: Option<usize>) -> char {
    if let Some(value) = cell {
        (b'0' + value as u8) as char
    }
    else {
        ' '
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let top_row = line('╔', '╦', '╤', |_| '═', '═', '╗');
        let thin_separator = line('╟', '╫', '┼', |_| '─', '─', '╢');
        let thick_separator = line('╠', '╬', '╪', |_| '═', '═', '╣');
        let bottom_row = line('╚', '╩', '╧', |_| '═', '═', '╝');

        for y in 0..SIZE {
            if y == 0 {
                f.write_str(top_row.as_str())?;
            }
            else if y % BLOCK == 0 {
                f.write_str(thick_separator.as_str())?;
            }
            else {
                f.write_str(thin_separator.as_str())?;
            }

            let content =
                line('║', '║', '│', |x| to_char(self.cell(x, y)), ' ', '║');
            f.write_str(content.as_str())?;
        }

        let bottom_row = &bottom_row[..bottom_row.len() - 1];
        f.write_str(bottom_row)
    }
}
