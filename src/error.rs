//! This module contains the error and result definitions used in this crate.

/// Errors that can be raised by operations on a [Board](crate::Board) and by
/// the solvers working on it. Note that an unsolvable puzzle is *not* an
/// error, it is reported through [Outcome](crate::solver::Outcome).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SudokuError {

    /// Indicates that the specified coordinates (column and row) lie outside
    /// the 9x9 grid, that is, at least one of them is greater than 8.
    OutOfBounds,

    /// Indicates that a number is invalid as a cell value. This is the case
    /// if it is 0 or greater than 9.
    InvalidValue,

    /// Indicates that an insertion into or deletion from a given cell was
    /// attempted. Given cells are fixed for the lifetime of a solving run,
    /// so this always signals a bug in the calling strategy. The offending
    /// coordinates are contained in this variant. The board is guaranteed to
    /// be unchanged by the failed operation.
    MutatedGivenCell {

        /// The column (x-coordinate) of the given cell.
        x: usize,

        /// The row (y-coordinate) of the given cell.
        y: usize
    }
}

/// Syntactic sugar for `Result<V, SudokuError>`.
pub type SudokuResult<V> = Result<V, SudokuError>;

/// An enumeration of the errors that may occur when parsing a
/// [Board](crate::Board) from its 81-character line code.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseError {

    /// Indicates that the code does not consist of exactly 81 characters
    /// (ignoring surrounding whitespace). The actual length is contained in
    /// this variant.
    WrongLength(usize),

    /// Indicates that the code contains a character which is neither a digit
    /// from 1 to 9 nor the empty-cell marker `-`. The offending character is
    /// contained in this variant.
    InvalidCharacter(char)
}

/// Syntactic sugar for `Result<V, ParseError>`.
pub type ParseResult<V> = Result<V, ParseError>;
