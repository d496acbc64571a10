//! The ordered-container contract shared by [`AvlSortedList`](crate::AvlSortedList),
//! [`BinarySortedList`](crate::BinarySortedList) and [`SortedArray`](crate::SortedArray).

use std::cmp::Ordering;
use std::rc::Rc;

use crate::compare::Comparator;

/// A collection that keeps its items in ascending order under a [`Comparator`].
///
/// Lookups take a *probe*: a closure reporting how an item orders relative to the key being
/// searched for, the same convention as [`slice::binary_search_by`]. The `find`, `contains`
/// and `remove` helpers build the probe from the list's own comparator.
///
/// # Examples
///
/// ```
/// use classic_ds::{compare, AvlSortedList, SortedList};
///
/// let list = AvlSortedList::from_iter_with(compare::natural(), [13, 234, 1, 345, -5, 234, 6]);
///
/// assert_eq!(list.len(), 7);
/// assert_eq!(list.to_vec(), vec![-5, 1, 6, 13, 234, 234, 345]);
/// assert!(list.contains(&345));
/// assert_eq!(list.find_by(|item| item.cmp(&6)), Some(&6));
/// ```
pub trait SortedList<T> {
    /// Ascending iterator over the items, duplicates included.
    type Iter<'a>: Iterator<Item = &'a T>
    where
        Self: 'a,
        T: 'a;

    /// Creates an empty list ordered by `compare`.
    fn with_comparator(compare: Comparator<T>) -> Self
    where
        Self: Sized;

    /// The ordering this list is kept in.
    fn comparator(&self) -> &Comparator<T>;

    /// Number of items, duplicates included.
    fn len(&self) -> usize;

    /// Inserts `value`. Returns `false` if the list declined to store it.
    fn add(&mut self, value: T) -> bool;

    /// Finds an item for which `probe` returns [`Ordering::Equal`].
    fn find_by<F>(&self, probe: F) -> Option<&T>
    where
        F: FnMut(&T) -> Ordering;

    /// Removes one occurrence of an item for which `probe` returns [`Ordering::Equal`].
    /// Returns `false` if there was none.
    fn remove_by<F>(&mut self, probe: F) -> bool
    where
        F: FnMut(&T) -> Ordering;

    /// Iterates the items in ascending order.
    fn iter(&self) -> Self::Iter<'_>;

    /// Creates a list ordered by `compare` holding every item of `items`.
    fn from_iter_with<I>(compare: Comparator<T>, items: I) -> Self
    where
        Self: Sized,
        I: IntoIterator<Item = T>,
    {
        let mut list = Self::with_comparator(compare);
        list.add_many(items);
        list
    }

    /// Inserts every item of `items`.
    fn add_many<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            self.add(item);
        }
    }

    /// Whether the list holds no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finds an item comparing equal to `value`.
    fn find(&self, value: &T) -> Option<&T> {
        let compare = Rc::clone(self.comparator());
        self.find_by(|item| compare(item, value))
    }

    /// Whether an item comparing equal to `value` is present.
    fn contains(&self, value: &T) -> bool {
        self.find(value).is_some()
    }

    /// Removes one occurrence of an item comparing equal to `value`.
    fn remove(&mut self, value: &T) -> bool {
        let compare = Rc::clone(self.comparator());
        self.remove_by(|item| compare(item, value))
    }

    /// Calls `f` with every item and its position, in ascending order.
    fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&T, usize),
    {
        for (index, item) in self.iter().enumerate() {
            f(item, index);
        }
    }

    /// Copies the items out in ascending order.
    fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// A list with this list's ordering holding every item of `other` that this list
    /// contains.
    fn intersection_with<L>(&self, other: &L) -> Self
    where
        Self: Sized,
        T: Clone,
        L: SortedList<T>,
    {
        let mut intersection = Self::with_comparator(Rc::clone(self.comparator()));
        for item in other.iter().filter(|item| self.contains(*item)) {
            intersection.add(item.clone());
        }
        intersection
    }

    /// Whether both lists hold the same items with the same multiplicities, judged by this
    /// list's comparator.
    fn has_same_elements_as<L>(&self, other: &L) -> bool
    where
        L: SortedList<T>,
    {
        if self.len() != other.len() {
            return false;
        }
        let compare = self.comparator();
        let mut theirs: Vec<&T> = other.iter().collect();
        theirs.sort_by(|a, b| compare(*a, *b));
        self.iter()
            .zip(theirs)
            .all(|(mine, theirs)| compare(mine, theirs) == Ordering::Equal)
    }
}
