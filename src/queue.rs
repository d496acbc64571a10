//! A first-in first-out queue.

use std::collections::VecDeque;

/// Items leave in the order they arrived.
///
/// # Examples
///
/// ```
/// use classic_ds::Queue;
///
/// let mut queue = Queue::new();
/// queue.enqueue("first");
/// queue.enqueue("second");
///
/// assert_eq!(queue.peek(), Some(&"first"));
/// assert_eq!(queue.dequeue(), Some("first"));
/// assert_eq!(queue.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Queue<T> {
    items: VecDeque<T>,
}

impl<T> Queue<T> {
    /// An empty queue.
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    /// Number of waiting items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds `item` at the back.
    pub fn add(&mut self, item: T) {
        self.items.push_back(item);
    }

    /// Same as [`Queue::add`].
    pub fn enqueue(&mut self, item: T) {
        self.add(item);
    }

    /// The item the next [`Queue::poll`] returns.
    pub fn peek(&self) -> Option<&T> {
        self.items.front()
    }

    /// Removes the front item.
    pub fn poll(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Same as [`Queue::poll`].
    pub fn dequeue(&mut self) -> Option<T> {
        self.poll()
    }
}

impl<T> Extend<T> for Queue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
