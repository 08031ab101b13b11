//! This module contains the definition of the [ValueSet] used for storing
//! candidate values of cells, both as transient legal-value results and as
//! the persistent domains of the arc-consistency solver.

use crate::error::{SudokuError, SudokuResult};

use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Sub, SubAssign};

/// The lowest value a [ValueSet] can contain.
pub const MIN_VALUE: usize = 1;

/// The highest value a [ValueSet] can contain.
pub const MAX_VALUE: usize = 9;

const FULL_BITS: u16 = 0b11_1111_1110;

/// A set of cell values from 1 to 9, implemented as a bit mask. Each value is
/// represented by one bit of a `u16`, which makes membership tests and the
/// set operations used by the solvers cheap.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ValueSet {
    bits: u16
}

impl ValueSet {

    /// Creates a new, empty `ValueSet`.
    pub fn new() -> ValueSet {
        ValueSet {
            bits: 0
        }
    }

    /// Creates a new `ValueSet` containing every value from 1 to 9.
    pub fn full() -> ValueSet {
        ValueSet {
            bits: FULL_BITS
        }
    }

    /// Creates a new `ValueSet` containing only the given value.
    ///
    /// # Errors
    ///
    /// If `value` is 0 or greater than 9. In that case,
    /// `SudokuError::InvalidValue` is returned.
    pub fn singleton(value: usize) -> SudokuResult<ValueSet> {
        let mut set = ValueSet::new();
        set.insert(value)?;
        Ok(set)
    }

    fn mask(value: usize) -> SudokuResult<u16> {
        if value < MIN_VALUE || value > MAX_VALUE {
            Err(SudokuError::InvalidValue)
        }
        else {
            Ok(1u16 << value)
        }
    }

    /// Indicates whether this set contains the given value. Values outside
    /// the range from 1 to 9 are never contained.
    pub fn contains(&self, value: usize) -> bool {
        if let Ok(mask) = ValueSet::mask(value) {
            self.bits & mask != 0
        }
        else {
            false
        }
    }

    /// Inserts the given value into this set, such that [ValueSet::contains]
    /// returns `true` for it afterwards. Returns `true` if the set changed,
    /// that is, the value was not present before.
    ///
    /// # Errors
    ///
    /// If `value` is 0 or greater than 9. In that case,
    /// `SudokuError::InvalidValue` is returned.
    pub fn insert(&mut self, value: usize) -> SudokuResult<bool> {
        let mask = ValueSet::mask(value)?;
        let changed = self.bits & mask == 0;
        self.bits |= mask;
        Ok(changed)
    }

    /// Removes the given value from this set, such that [ValueSet::contains]
    /// returns `false` for it afterwards. Returns `true` if the set changed,
    /// that is, the value was present before.
    ///
    /// # Errors
    ///
    /// If `value` is 0 or greater than 9. In that case,
    /// `SudokuError::InvalidValue` is returned.
    pub fn remove(&mut self, value: usize) -> SudokuResult<bool> {
        let mask = ValueSet::mask(value)?;
        let changed = self.bits & mask != 0;
        self.bits &= !mask;
        Ok(changed)
    }

    /// Indicates whether this set is empty, i.e. contains no values.
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Returns the number of values contained in this set.
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// If this set contains exactly one value, returns that value, and `None`
    /// otherwise. This is the shape the arc-consistency reduction tests for.
    pub fn single(&self) -> Option<usize> {
        if self.len() == 1 {
            Some(self.bits.trailing_zeros() as usize)
        }
        else {
            None
        }
    }

    /// Returns an iterator over the values contained in this set in ascending
    /// order.
    pub fn iter(&self) -> ValueSetIter {
        ValueSetIter {
            bits: self.bits
        }
    }
}

/// An iterator over the content of a [ValueSet] in ascending order.
pub struct ValueSetIter {
    bits: u16
}

impl Iterator for ValueSetIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.bits == 0 {
            None
        }
        else {
            let value = self.bits.trailing_zeros() as usize;
            self.bits &= self.bits - 1;
            Some(value)
        }
    }
}

impl IntoIterator for ValueSet {
    type Item = usize;
    type IntoIter = ValueSetIter;

    fn into_iter(self) -> ValueSetIter {
        self.iter()
    }
}

impl BitAnd for ValueSet {
    type Output = ValueSet;

    fn bitand(self, rhs: ValueSet) -> ValueSet {
        ValueSet {
            bits: self.bits & rhs.bits
        }
    }
}

impl BitAndAssign for ValueSet {
    fn bitand_assign(&mut self, rhs: ValueSet) {
        self.bits &= rhs.bits;
    }
}

impl BitOr for ValueSet {
    type Output = ValueSet;

    fn bitor(self, rhs: ValueSet) -> ValueSet {
        ValueSet {
            bits: self.bits | rhs.bits
        }
    }
}

impl BitOrAssign for ValueSet {
    fn bitor_assign(&mut self, rhs: ValueSet) {
        self.bits |= rhs.bits;
    }
}

impl Sub for ValueSet {
    type Output = ValueSet;

    fn sub(self, rhs: ValueSet) -> ValueSet {
        ValueSet {
            bits: self.bits & !rhs.bits
        }
    }
}

impl SubAssign for ValueSet {
    fn sub_assign(&mut self, rhs: ValueSet) {
        self.bits &= !rhs.bits;
    }
}

/// Creates a new [ValueSet] that contains the listed values.
///
/// ```
/// use sudoku_search::values;
///
/// let set = values!(2, 4);
/// assert!(set.contains(2));
/// assert!(!set.contains(3));
/// ```
#[macro_export]
macro_rules! values {
    ($($v:expr),*) => {
        {
            #[allow(unused_mut)]
            let mut set = $crate::set::ValueSet::new();
            $(set.insert($v).unwrap();)*
            set
        }
    };
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn new_set_is_empty() {
        let set = ValueSet::new();
        assert!(set.is_empty());
        assert!(!set.contains(1));
        assert!(!set.contains(9));
        assert_eq!(0, set.len());
    }

    #[test]
    fn full_set_contains_every_value() {
        let set = ValueSet::full();
        assert_eq!(9, set.len());

        for value in 1..=9 {
            assert!(set.contains(value));
        }
    }

    #[test]
    fn singleton_set_contains_only_given_value() {
        let set = ValueSet::singleton(3).unwrap();
        assert_eq!(1, set.len());
        assert!(set.contains(3));
        assert!(!set.contains(1));
        assert_eq!(Some(3), set.single());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let mut set = ValueSet::new();
        assert_eq!(Err(SudokuError::InvalidValue), set.insert(0));
        assert_eq!(Err(SudokuError::InvalidValue), set.insert(10));
        assert_eq!(Err(SudokuError::InvalidValue), set.remove(0));
        assert!(set.is_empty());
    }

    #[test]
    fn manipulation() {
        let mut set = ValueSet::new();
        assert!(set.insert(2).unwrap());
        assert!(set.insert(6).unwrap());
        assert!(!set.insert(2).unwrap());
        assert_eq!(2, set.len());

        assert!(set.remove(2).unwrap());
        assert!(!set.remove(2).unwrap());
        assert!(!set.contains(2));
        assert!(set.contains(6));
        assert_eq!(1, set.len());
    }

    #[test]
    fn iteration_is_ascending() {
        let set = values!(7, 1, 4);
        let collected: Vec<usize> = set.iter().collect();
        assert_eq!(vec![1, 4, 7], collected);
    }

    #[test]
    fn single_requires_exactly_one_element() {
        assert_eq!(None, ValueSet::new().single());
        assert_eq!(None, values!(2, 3).single());
        assert_eq!(Some(5), values!(5).single());
    }

    #[test]
    fn operators() {
        let lhs = values!(2, 4);
        let rhs = values!(3, 4);

        assert_eq!(values!(4), lhs & rhs);
        assert_eq!(values!(2, 3, 4), lhs | rhs);
        assert_eq!(values!(2), lhs - rhs);
    }
}
