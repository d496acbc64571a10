//! A sorted list kept in one contiguous buffer.
//!
//! Lookups binary search the buffer. Insertion and removal shift the tail, so this suits lists
//! that are read far more often than they change.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::compare::Comparator;
use crate::sorted_list::SortedList;

/// A sorted list backed by a `Vec`.
pub struct SortedArray<T> {
    items: Vec<T>,
    compare: Comparator<T>,
}

impl<T: Clone> Clone for SortedArray<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            compare: Rc::clone(&self.compare),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SortedArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.items).finish()
    }
}

impl<T> SortedArray<T> {
    /// An empty array ordered by `compare`.
    pub fn new(compare: Comparator<T>) -> Self {
        Self {
            items: Vec::new(),
            compare,
        }
    }

    /// The items as a sorted slice.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Position of an item for which `probe` returns `Ordering::Equal`, if there is one.
    pub fn position_by<F>(&self, probe: F) -> Option<usize>
    where
        F: FnMut(&T) -> Ordering,
    {
        self.items.binary_search_by(probe).ok()
    }

    /// Builds an array ordered by `compare` out of `f` applied to every item of this one.
    pub fn map<U, F>(&self, compare: Comparator<U>, f: F) -> SortedArray<U>
    where
        F: FnMut(&T) -> U,
    {
        let mut items: Vec<U> = self.items.iter().map(f).collect();
        items.sort_by(|a, b| compare(a, b));
        SortedArray { items, compare }
    }

    /// Builds an array with the same ordering holding only the items matching `predicate`.
    /// The survivors are already in order so nothing is re-sorted.
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        T: Clone,
        F: FnMut(&T) -> bool,
    {
        Self {
            items: self
                .items
                .iter()
                .filter(|item| predicate(item))
                .cloned()
                .collect(),
            compare: Rc::clone(&self.compare),
        }
    }
}

impl<T> SortedList<T> for SortedArray<T> {
    type Iter<'a> = std::slice::Iter<'a, T> where T: 'a;

    fn with_comparator(compare: Comparator<T>) -> Self {
        Self::new(compare)
    }

    fn comparator(&self) -> &Comparator<T> {
        &self.compare
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    /// Inserts after any run of equal items so equal items keep their insertion order.
    fn add(&mut self, value: T) -> bool {
        let index = self
            .items
            .partition_point(|item| (self.compare)(item, &value) != Ordering::Greater);
        self.items.insert(index, value);
        true
    }

    fn find_by<F>(&self, probe: F) -> Option<&T>
    where
        F: FnMut(&T) -> Ordering,
    {
        self.position_by(probe).map(|index| &self.items[index])
    }

    fn remove_by<F>(&mut self, probe: F) -> bool
    where
        F: FnMut(&T) -> Ordering,
    {
        match self.position_by(probe) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a SortedArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}


#[cfg(test)]
crate::test::sorted_list::sorted_list_suite!(SortedArray);
