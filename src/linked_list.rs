//! A double-ended list whose lookups use a caller-supplied equality.

use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::compare::Comparator;

/// Decides whether two values are the same item.
pub type Equality<T> = Rc<dyn Fn(&T, &T) -> bool>;

/// A list that grows and shrinks at both ends.
///
/// The names of the end operations are the ones this crate has always used: `push` and `pop`
/// work at the back, `shift` inserts at the front and `unshift` removes from it.
///
/// # Examples
///
/// ```
/// use classic_ds::LinkedList;
///
/// let mut list = LinkedList::new(|a: &i32, b: &i32| a == b);
/// list.push(2);
/// list.push(3);
/// list.shift(1);
///
/// assert_eq!(list.peek_first(), Some(&1));
/// assert_eq!(list.pop(), Some(3));
/// assert_eq!(list.unshift(), Some(1));
/// assert_eq!(list.len(), 1);
/// ```
pub struct LinkedList<T> {
    items: VecDeque<T>,
    matches: Equality<T>,
}

impl<T: Clone> Clone for LinkedList<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            matches: Rc::clone(&self.matches),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for LinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.items).finish()
    }
}

impl<T: PartialEq + 'static> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new(|a: &T, b: &T| a == b)
    }
}

impl<T> LinkedList<T> {
    /// An empty list that treats two values as the same item when `matches` says so.
    pub fn new<F>(matches: F) -> Self
    where
        F: Fn(&T, &T) -> bool + 'static,
    {
        Self {
            items: VecDeque::new(),
            matches: Rc::new(matches),
        }
    }

    /// An empty list that treats two values as the same item when `compare` finds them equal.
    pub fn from_comparator(compare: Comparator<T>) -> Self
    where
        T: 'static,
    {
        Self::new(move |a, b| compare(a, b).is_eq())
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The front item.
    pub fn peek_first(&self) -> Option<&T> {
        self.items.front()
    }

    /// The back item.
    pub fn peek_last(&self) -> Option<&T> {
        self.items.back()
    }

    /// Appends `item` at the back.
    pub fn push(&mut self, item: T) {
        self.items.push_back(item);
    }

    /// Inserts `item` at the front.
    pub fn shift(&mut self, item: T) {
        self.items.push_front(item);
    }

    /// Removes the back item.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_back()
    }

    /// Removes the front item.
    pub fn unshift(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// The first item, from the front, matching `item`.
    pub fn find(&self, item: &T) -> Option<&T> {
        self.items.iter().find(|candidate| (self.matches)(candidate, item))
    }

    /// Whether some item matches `item`.
    pub fn contains(&self, item: &T) -> bool {
        self.find(item).is_some()
    }

    /// Removes every item matching `item`. Returns whether anything was removed.
    pub fn remove(&mut self, item: &T) -> bool {
        let before = self.items.len();
        let matches = Rc::clone(&self.matches);
        self.items.retain(|candidate| !matches(candidate, item));
        self.items.len() != before
    }

    /// Iterates from front to back.
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> Extend<T> for LinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<'a, T> IntoIterator for &'a LinkedList<T> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
