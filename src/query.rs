//! This module contains the pure constraint queries shared by all solvers:
//! the legal-value set of a cell under row/column/block uniqueness, neighbour
//! enumeration, and the wrap-around scan for the next empty cell.
//!
//! None of these functions mutate the board; they always reflect its current
//! contents.

use crate::{Board, BLOCK, SIZE};
use crate::set::ValueSet;

/// Returns the set of values present in row `y`, ignoring empty cells.
pub fn row_values(board: &Board, y: usize) -> ValueSet {
    let mut values = ValueSet::new();

    for x in 0..SIZE {
        if let Some(value) = board.cell(x, y) {
            values.insert(value).unwrap();
        }
    }

    values
}

/// Returns the set of values present in column `x`, ignoring empty cells.
pub fn column_values(board: &Board, x: usize) -> ValueSet {
    let mut values = ValueSet::new();

    for y in 0..SIZE {
        if let Some(value) = board.cell(x, y) {
            values.insert(value).unwrap();
        }
    }

    values
}

fn block_origin(coordinate: usize) -> usize {
    (coordinate / BLOCK) * BLOCK
}

/// Returns the set of values present in the 3x3 block containing the cell at
/// the given position, ignoring empty cells.
pub fn block_values(board: &Board, x: usize, y: usize) -> ValueSet {
    let block_x = block_origin(x);
    let block_y = block_origin(y);
    let mut values = ValueSet::new();

    for other_y in block_y..(block_y + BLOCK) {
        for other_x in block_x..(block_x + BLOCK) {
            if let Some(value) = board.cell(other_x, other_y) {
                values.insert(value).unwrap();
            }
        }
    }

    values
}

/// Returns the set of values that can be legally placed in the cell at the
/// given position, that is, all values from 1 to 9 which do not yet occur in
/// its row, its column, or its block. The content of the queried cell itself
/// is part of those views, so querying a filled cell yields a set that does
/// not contain its current value.
pub fn legal_values(board: &Board, x: usize, y: usize) -> ValueSet {
    ValueSet::full()
        - (row_values(board, y)
            | column_values(board, x)
            | block_values(board, x, y))
}

/// Returns all cells sharing a row, column, or block with the cell at the
/// given position, excluding that cell itself. Cells that share both a line
/// and the block appear more than once; all consumers in this crate only
/// test membership or tolerate duplicates, so no deduplication is performed.
pub fn neighbours(x: usize, y: usize) -> Vec<(usize, usize)> {
    let mut result = Vec::with_capacity(3 * (SIZE - 1));

    for i in 0..SIZE {
        if i != x {
            result.push((i, y));
        }

        if i != y {
            result.push((x, i));
        }
    }

    let block_x = block_origin(x);
    let block_y = block_origin(y);

    for other_y in block_y..(block_y + BLOCK) {
        for other_x in block_x..(block_x + BLOCK) {
            if other_x != x || other_y != y {
                result.push((other_x, other_y));
            }
        }
    }

    result
}

/// Counts the filled cells in the row, the column, and the block of the cell
/// at the given position. Cells shared between those views are counted once
/// per view, and the queried cell itself is included whenever it is filled.
/// This is the connectedness measure used by the degree heuristic.
pub fn filled_neighbours(board: &Board, x: usize, y: usize) -> usize {
    let mut count = 0;

    for i in 0..SIZE {
        if board.cell(i, y).is_some() {
            count += 1;
        }

        if board.cell(x, i).is_some() {
            count += 1;
        }
    }

    let block_x = block_origin(x);
    let block_y = block_origin(y);

    for other_y in block_y..(block_y + BLOCK) {
        for other_x in block_x..(block_x + BLOCK) {
            if board.cell(other_x, other_y).is_some() {
                count += 1;
            }
        }
    }

    count
}

fn filled_in_row(board: &Board, y: usize) -> usize {
    (0..SIZE).filter(|&x| board.cell(x, y).is_some()).count()
}

fn filled_in_column(board: &Board, x: usize) -> usize {
    (0..SIZE).filter(|&y| board.cell(x, y).is_some()).count()
}

fn filled_in_block(board: &Board, x: usize, y: usize) -> usize {
    let block_x = block_origin(x);
    let block_y = block_origin(y);
    let mut count = 0;

    for other_y in block_y..(block_y + BLOCK) {
        for other_x in block_x..(block_x + BLOCK) {
            if board.cell(other_x, other_y).is_some() {
                count += 1;
            }
        }
    }

    count
}

/// Indicates whether any row, column, or block of the board contains the
/// same value in two cells. A board in this state can never be extended to a
/// solution, no matter which values are placed in the remaining empty cells,
/// since uniqueness is already violated. Boards mutated exclusively through
/// values from [legal_values] stay conflict-free, so for the backtracking
/// strategies this only triggers on contradictory givens.
pub fn has_conflict(board: &Board) -> bool {
    for i in 0..SIZE {
        if row_values(board, i).len() != filled_in_row(board, i) {
            return true;
        }

        if column_values(board, i).len() != filled_in_column(board, i) {
            return true;
        }
    }

    for block_y in 0..BLOCK {
        for block_x in 0..BLOCK {
            let x = block_x * BLOCK;
            let y = block_y * BLOCK;

            if block_values(board, x, y).len() != filled_in_block(board, x, y) {
                return true;
            }
        }
    }

    false
}

/// Finds the next empty free cell of the board in row-major order, starting
/// at `from` and wrapping around to the top-left corner when the end of the
/// board is reached without a hit. Returns `None` if the board has no empty
/// free cell at all.
pub fn first_empty_cell(board: &Board, from: (usize, usize))
        -> Option<(usize, usize)> {
    let start = crate::index(from.0, from.1);

    for i in (start..SIZE * SIZE).chain(0..start) {
        let x = i % SIZE;
        let y = i / SIZE;

        if board.cell(x, y).is_none() && !board.given(x, y) {
            return Some((x, y));
        }
    }

    None
}
