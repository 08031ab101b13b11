//! This module contains the [Action] and [ActionLog] types which record the
//! trace of a solving run.
//!
//! The log is ordered and append-only. It contains *every* mutation a solver
//! attempted, including the insertions that backtracking later undoes with
//! matching deletions, and is terminated by [Action::Quit]. A consumer that
//! replays the log in order therefore reconstructs the entire exploration
//! path (which is what an animation sink wants), while the net effect of the
//! replayed actions equals the final board state.

use serde::{Deserialize, Serialize};

use std::slice::Iter;

/// A single mutation of the board during a solving run. Both [Action::Insert]
/// and [Action::Delete] only ever target free cells.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Action {

    /// The value `value` was written into the free cell at column `x` and
    /// row `y`.
    Insert {

        /// The column of the mutated cell.
        x: usize,

        /// The row of the mutated cell.
        y: usize,

        /// The inserted value, in the range `[1, 9]`.
        value: usize
    },

    /// The free cell at column `x` and row `y` was emptied. During
    /// backtracking this logically undoes the most recent insertion at the
    /// same coordinates, but the log itself is never rewritten.
    Delete {

        /// The column of the mutated cell.
        x: usize,

        /// The row of the mutated cell.
        y: usize
    },

    /// The solving run ended. This is always the last action of a log,
    /// regardless of the outcome.
    Quit
}

/// The ordered, append-only record of all [Action]s of one solving run.
/// Solvers own their log while running and hand it over to the caller on
/// completion.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ActionLog {
    actions: Vec<Action>
}

impl ActionLog {

    /// Creates a new, empty action log.
    pub fn new() -> ActionLog {
        ActionLog {
            actions: Vec::new()
        }
    }

    pub(crate) fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// Returns the number of actions recorded in this log.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Indicates whether this log contains no actions.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns an iterator over the recorded actions in the order they were
    /// taken.
    pub fn iter(&self) -> Iter<'_, Action> {
        self.actions.iter()
    }

    /// Returns the recorded actions as a slice, in the order they were
    /// taken.
    pub fn as_slice(&self) -> &[Action] {
        &self.actions
    }

    /// Consumes this log and returns the recorded actions as a vector.
    pub fn into_vec(self) -> Vec<Action> {
        self.actions
    }
}

impl<'a> IntoIterator for &'a ActionLog {
    type Item = &'a Action;
    type IntoIter = Iter<'a, Action>;

    fn into_iter(self) -> Iter<'a, Action> {
        self.iter()
    }
}
