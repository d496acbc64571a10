//! A set of values kept in comparator order.

use std::fmt;

use crate::compare::Comparator;
use crate::sorted_array::SortedArray;
use crate::sorted_list::SortedList;

/// A [`SortedArray`] that refuses values comparing equal to one already stored.
///
/// # Examples
///
/// ```
/// use classic_ds::{compare, EqualitySet};
///
/// let mut set = EqualitySet::new(compare::strings());
/// assert!(set.add("pear"));
/// assert!(!set.add("pear"));
/// assert!(set.add("Apple"));
///
/// assert_eq!(set.size(), 2);
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec!["Apple", "pear"]);
/// ```
pub struct EqualitySet<T> {
    items: SortedArray<T>,
}

impl<T: Clone> Clone for EqualitySet<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for EqualitySet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.items.iter()).finish()
    }
}

impl<T> EqualitySet<T> {
    /// An empty set ordered by `compare`.
    pub fn new(compare: Comparator<T>) -> Self {
        Self {
            items: SortedArray::new(compare),
        }
    }

    /// Adds `value` unless an equal value is already present. Returns whether it was added.
    pub fn add(&mut self, value: T) -> bool {
        if self.items.contains(&value) {
            return false;
        }
        self.items.add(value)
    }

    /// Removes the value equal to `value`. Returns whether there was one.
    pub fn remove(&mut self, value: &T) -> bool {
        self.items.remove(value)
    }

    /// Whether a value equal to `value` is present.
    pub fn contains(&self, value: &T) -> bool {
        self.items.contains(value)
    }

    /// Number of values in the set.
    pub fn size(&self) -> usize {
        self.items.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates the values in comparator order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> Extend<T> for EqualitySet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}
