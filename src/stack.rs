//! A last-in first-out stack.

/// Items leave in the reverse of the order they arrived.
///
/// # Examples
///
/// ```
/// use classic_ds::Stack;
///
/// let mut stack = Stack::new();
/// stack.push(1);
/// stack.push(2);
///
/// assert_eq!(stack.peek(), Some(&2));
/// assert_eq!(stack.pop(), Some(2));
/// assert_eq!(stack.count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Stack<T> {
    /// An empty stack.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Number of items.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Whether the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Puts `item` on top.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// The top item.
    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    /// Removes the top item.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }
}

impl<T> Extend<T> for Stack<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}
