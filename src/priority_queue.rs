//! A binary heap ordered by a [`Comparator`].

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::compare::Comparator;

/// A queue that always hands out the item that sorts first under its comparator.
///
/// A natural-order comparator makes this a min-heap; [`compare::reversed`] makes it a
/// max-heap. Items that compare equal leave in no particular order.
///
/// [`compare::reversed`]: crate::compare::reversed
///
/// # Examples
///
/// ```
/// use classic_ds::{compare, PriorityQueue};
///
/// let mut queue = PriorityQueue::new(compare::natural());
/// queue.enqueue_many([5, 1, 4]);
/// assert_eq!(queue.dequeue(), Some(1));
///
/// let mut queue = PriorityQueue::new(compare::reversed(compare::natural()));
/// queue.enqueue_many([5, 1, 4]);
/// assert_eq!(queue.dequeue(), Some(5));
/// ```
pub struct PriorityQueue<T> {
    heap: Vec<T>,
    compare: Comparator<T>,
}

impl<T: Clone> Clone for PriorityQueue<T> {
    fn clone(&self) -> Self {
        Self {
            heap: self.heap.clone(),
            compare: Rc::clone(&self.compare),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PriorityQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityQueue")
            .field("heap", &self.heap)
            .finish()
    }
}

impl<T> PriorityQueue<T> {
    /// An empty queue ordered by `compare`.
    pub fn new(compare: Comparator<T>) -> Self {
        Self {
            heap: Vec::new(),
            compare,
        }
    }

    /// Number of queued items.
    pub fn count(&self) -> usize {
        self.heap.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// The item the next [`PriorityQueue::dequeue`] returns.
    pub fn peek(&self) -> Option<&T> {
        self.heap.first()
    }

    /// Queues `item`.
    pub fn enqueue(&mut self, item: T) {
        self.heap.push(item);
        self.sift_up(self.heap.len() - 1);
    }

    /// Queues every item of `items`.
    pub fn enqueue_many<I: IntoIterator<Item = T>>(&mut self, items: I) {
        for item in items {
            self.enqueue(item);
        }
    }

    /// Removes the first item.
    pub fn dequeue(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }
        let item = self.heap.swap_remove(0);
        self.sift_down(0);
        Some(item)
    }

    /// Keeps only the items for which `keep` returns `true`.
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, keep: F) {
        self.heap.retain(keep);
        for index in (0..self.heap.len() / 2).rev() {
            self.sift_down(index);
        }
    }

    fn before(&self, a: usize, b: usize) -> bool {
        (self.compare)(&self.heap[a], &self.heap[b]) == Ordering::Less
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.before(index, parent) {
                break;
            }
            self.heap.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut first = index;
            if left < self.heap.len() && self.before(left, first) {
                first = left;
            }
            if right < self.heap.len() && self.before(right, first) {
                first = right;
            }
            if first == index {
                return;
            }
            self.heap.swap(index, first);
            index = first;
        }
    }
}

impl<T> Extend<T> for PriorityQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.enqueue_many(iter);
    }
}
