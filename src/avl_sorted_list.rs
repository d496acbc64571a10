//! A sorted list kept in a self-balancing Binary Search Tree (specifically, an AVL tree).
//!
//! Values that compare equal share a single node which counts its occurrences, so adding the
//! same value many times does not grow the tree.
//!
//! # Examples
//!
//! ```
//! use classic_ds::{compare, AvlSortedList, SortedList};
//!
//! let mut list = AvlSortedList::new(compare::numbers());
//!
//! // Nothing in here yet.
//! assert_eq!(list.find(&1.5), None);
//!
//! list.add(1.5);
//! list.add(-3.0);
//! list.add(1.5);
//! assert_eq!(list.len(), 3);
//! assert_eq!(list.distinct_len(), 2);
//!
//! // Removing takes away one occurrence at a time.
//! assert!(list.remove(&1.5));
//! assert_eq!(list.to_vec(), vec![-3.0, 1.5]);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;
use std::ptr::NonNull;
use std::rc::Rc;

use tracing::trace;

use crate::compare::Comparator;
use crate::sorted_list::SortedList;

/// A sorted list backed by an AVL tree. Adding, finding and removing are `O(lg N)` in the
/// number of distinct values.
pub struct AvlSortedList<T> {
    // This is a `Link` instead of an `Option<Box<Node>>` so that it can be moved around with the
    // list without the children's parent pointers breaking.
    root: Link<T>,
    len: usize,
    compare: Comparator<T>,
}

impl<T> Drop for AvlSortedList<T> {
    fn drop(&mut self) {
        if let Some(root) = self.root.0.take() {
            // SAFETY: We own the root we're dropping so this won't be called twice. The root was
            // initially allocated using `Box::new` (in `Node::new_boxed`) so this should be well
            // aligned, etc.
            unsafe { drop(Box::from_raw(root.as_ptr())) };
        }
    }
}

impl<T: Clone> Clone for AvlSortedList<T> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone_boxed(),
            len: self.len,
            compare: Rc::clone(&self.compare),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for AvlSortedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> AvlSortedList<T> {
    /// Generate a new, empty list ordered by `compare`.
    pub fn new(compare: Comparator<T>) -> Self {
        Self {
            root: Link(None),
            len: 0,
            compare,
        }
    }

    /// Number of distinct values, i.e. the number of nodes in the tree.
    pub fn distinct_len(&self) -> usize {
        self.root().map_or(0, |root| root.descendants + 1)
    }

    /// Height of the tree. An empty list has height 0 and a single node has height 1.
    pub fn height(&self) -> usize {
        self.root().map_or(0, |root| root.height)
    }

    /// The smallest value, if any.
    pub fn first(&self) -> Option<&T> {
        let mut node = self.root()?;
        while let Some(left) = node.left() {
            node = left;
        }
        Some(&node.value)
    }

    /// The largest value, if any.
    pub fn last(&self) -> Option<&T> {
        let mut node = self.root()?;
        while let Some(right) = node.right() {
            node = right;
        }
        Some(&node.value)
    }

    /// Iterates the values in ascending order. Each value is yielded once per occurrence.
    pub fn iter(&self) -> Iter<'_, T> {
        let mut iter = Iter {
            stack: Vec::with_capacity(self.height()),
            pending: None,
            remaining: self.len,
        };
        iter.push_left_spine(self.root());
        iter
    }

    /// Builds a list ordered by `compare` out of `f` applied to every value of this one.
    ///
    /// # Examples
    ///
    /// ```
    /// use classic_ds::{compare, AvlSortedList, SortedList};
    ///
    /// let words = AvlSortedList::from_iter_with(compare::strings(), ["pear", "fig", "banana"]);
    /// let lengths = words.map(compare::natural(), |word| word.len());
    ///
    /// assert_eq!(lengths.to_vec(), vec![3, 4, 6]);
    /// ```
    pub fn map<U, F>(&self, compare: Comparator<U>, f: F) -> AvlSortedList<U>
    where
        F: FnMut(&T) -> U,
    {
        AvlSortedList::from_iter_with(compare, self.iter().map(f))
    }

    /// Builds a list with the same ordering holding only the values matching `predicate`.
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        T: Clone,
        F: FnMut(&T) -> bool,
    {
        let mut filtered = Self::new(Rc::clone(&self.compare));
        for value in self.iter().filter(|value| predicate(value)) {
            filtered.add(value.clone());
        }
        filtered
    }

    /// Inserts `value`. A value comparing equal to one already present bumps that node's
    /// occurrence count instead of adding a node.
    pub fn add(&mut self, value: T) {
        let mut parent = None;
        let mut cursor = self.root.0;
        let mut side = Ordering::Equal;
        while let Some(mut ptr) = cursor {
            // SAFETY: Every pointer reachable from the root is a live node owned by this list and
            // we hold `&mut self`, so nothing else can be borrowing it.
            let node = unsafe { ptr.as_mut() };
            side = (self.compare)(&value, &node.value);
            match side {
                Ordering::Less => cursor = node.left.0,
                Ordering::Greater => cursor = node.right.0,
                Ordering::Equal => {
                    node.occurrences += 1;
                    self.len += 1;
                    return;
                }
            }
            parent = Some(ptr);
        }

        let mut new_node = Node::new_boxed(value);
        new_node.parent = Link(parent);
        let new_node = Link(Some(NonNull::from(Box::leak(new_node))));
        match parent {
            None => self.root = new_node,
            // SAFETY: `parent` is a live node of this list (see above) and the new node isn't
            // referenced by anything else yet.
            Some(mut parent) => unsafe {
                if side == Ordering::Less {
                    parent.as_mut().left = new_node;
                } else {
                    parent.as_mut().right = new_node;
                }
            },
        }
        self.len += 1;
        self.retrace(parent);
    }

    /// Removes one occurrence of the value for which `probe` returns `Ordering::Equal`.
    /// Returns `false` if there is no such value.
    pub fn remove_by<F>(&mut self, probe: F) -> bool
    where
        F: FnMut(&T) -> Ordering,
    {
        let Some(mut target) = self.find_node(probe) else {
            return false;
        };
        // SAFETY: `find_node` only returns live nodes of this list and we hold `&mut self`.
        let node = unsafe { target.as_mut() };
        if node.occurrences > 1 {
            node.occurrences -= 1;
        } else {
            // SAFETY: `target` is a live node of this list and nothing borrows it past here.
            unsafe { self.unlink(target) };
        }
        self.len -= 1;
        true
    }

    /// Finds the value for which `probe` returns `Ordering::Equal`.
    pub fn find_by<F>(&self, probe: F) -> Option<&T>
    where
        F: FnMut(&T) -> Ordering,
    {
        // SAFETY: The node is owned by this list and the returned reference borrows `self`.
        self.find_node(probe).map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// Like [`AvlSortedList::find_by`] but hands out the value mutably. The caller must not
    /// change how the value orders.
    pub(crate) fn find_by_mut<F>(&mut self, probe: F) -> Option<&mut T>
    where
        F: FnMut(&T) -> Ordering,
    {
        // SAFETY: The node is owned by this list and the returned reference borrows `self`
        // mutably, so no other reference into the tree can exist alongside it.
        self.find_node(probe).map(|node| unsafe { &mut (*node.as_ptr()).value })
    }

    fn root(&self) -> Option<&Node<T>> {
        self.root.node()
    }

    fn find_node<F>(&self, mut probe: F) -> Option<NonNull<Node<T>>>
    where
        F: FnMut(&T) -> Ordering,
    {
        let mut cursor = self.root.0;
        while let Some(ptr) = cursor {
            // SAFETY: Every pointer reachable from the root is a live node owned by this list.
            let node = unsafe { ptr.as_ref() };
            cursor = match probe(&node.value) {
                Ordering::Less => node.right.0,
                Ordering::Greater => node.left.0,
                Ordering::Equal => return Some(ptr),
            };
        }
        None
    }

    /// Rebalances every node from `cursor` up to the root.
    fn retrace(&mut self, mut cursor: Option<NonNull<Node<T>>>) {
        while let Some(node) = cursor {
            // SAFETY: `node` is a live node of this list. `rebalance` returns the root of the
            // subtree `node` was the root of, which is live as well.
            cursor = unsafe {
                let subtree = self.rebalance(node);
                subtree.as_ref().parent.0
            };
        }
    }

    /// Recomputes the cached fields of `node` and rotates if it is out of balance. Returns the
    /// node now rooting the subtree. See [the Wikipedia page][wiki] for the four cases.
    ///
    /// [wiki]: https://en.wikipedia.org/wiki/AVL_tree#Rebalancing
    ///
    /// # Safety
    ///
    /// `node` must be a live node of this list.
    unsafe fn rebalance(&mut self, mut node: NonNull<Node<T>>) -> NonNull<Node<T>> {
        node.as_mut().fix_height();
        match node.as_ref().balance_factor() {
            2.. => {
                let left = node.as_ref().left.0.expect("Left heavy => left child");
                if left.as_ref().balance_factor() < 0 {
                    self.rotate_left(left);
                }
                self.rotate_right(node)
            }
            ..=-2 => {
                let right = node.as_ref().right.0.expect("Right heavy => right child");
                if right.as_ref().balance_factor() > 0 {
                    self.rotate_right(right);
                }
                self.rotate_left(node)
            }
            _ => node,
        }
    }

    /// Rotate `old_root` to the right. This moves its left child up vertically and `old_root`
    /// down vertically. Used to rebalance the tree when the left child is too tall.
    ///
    /// # Diagram
    ///
    /// ```text
    ///    Option<parent>            Option<parent>
    ///      /                         /
    ///   old_root                  new_root
    ///    /     \                  /     \
    /// new_root  z     rotate ->  x    old_root
    ///  / \                               /  \
    /// x   y                             y    z
    /// ```
    ///
    /// # Safety
    ///
    /// `old_root` must be a live node of this list with a left child.
    unsafe fn rotate_right(&mut self, mut old_root: NonNull<Node<T>>) -> NonNull<Node<T>> {
        let mut new_root = old_root.as_ref().left.0.expect("Rotate right => left child");
        let old_parent = old_root.as_ref().parent;

        old_root.as_mut().left = new_root.as_ref().right;
        old_root.as_mut().fix_left_child_parent();
        old_root.as_mut().parent = Link(Some(new_root));

        new_root.as_mut().right = Link(Some(old_root));
        new_root.as_mut().parent = old_parent;
        self.replace_child(old_parent, old_root, Link(Some(new_root)));

        old_root.as_mut().fix_height();
        new_root.as_mut().fix_height();
        trace!(height = new_root.as_ref().height, "rotated right");
        new_root
    }

    /// The mirror image of [`AvlSortedList::rotate_right`].
    ///
    /// # Safety
    ///
    /// `old_root` must be a live node of this list with a right child.
    unsafe fn rotate_left(&mut self, mut old_root: NonNull<Node<T>>) -> NonNull<Node<T>> {
        let mut new_root = old_root.as_ref().right.0.expect("Rotate left => right child");
        let old_parent = old_root.as_ref().parent;

        old_root.as_mut().right = new_root.as_ref().left;
        old_root.as_mut().fix_right_child_parent();
        old_root.as_mut().parent = Link(Some(new_root));

        new_root.as_mut().left = Link(Some(old_root));
        new_root.as_mut().parent = old_parent;
        self.replace_child(old_parent, old_root, Link(Some(new_root)));

        old_root.as_mut().fix_height();
        new_root.as_mut().fix_height();
        trace!(height = new_root.as_ref().height, "rotated left");
        new_root
    }

    /// Points whichever slot of `parent` held `old` (or the root when there is no parent) at
    /// `new`.
    ///
    /// # Safety
    ///
    /// `parent` must be empty or a live node of this list.
    unsafe fn replace_child(&mut self, parent: Link<T>, old: NonNull<Node<T>>, new: Link<T>) {
        match parent.0 {
            None => self.root = new,
            Some(mut parent) => {
                let parent = parent.as_mut();
                if parent.left.0 == Some(old) {
                    parent.left = new;
                } else {
                    parent.right = new;
                }
            }
        }
    }

    /// Splices `target` out of the tree, frees it, and rebalances upward from the lowest node
    /// whose subtree changed.
    ///
    /// With two children the in-order predecessor (the largest node of the left subtree) takes
    /// `target`'s place, keeping its own value and occurrence count.
    ///
    /// # Safety
    ///
    /// `target` must be a live node of this list with no outstanding borrows.
    unsafe fn unlink(&mut self, target: NonNull<Node<T>>) {
        let node = target.as_ref();
        let (left, right, parent) = (node.left, node.right, node.parent);

        let retrace_from = match (left.0, right.0) {
            (Some(mut left_node), Some(mut right_node)) => {
                let mut predecessor = left_node;
                while let Some(next) = predecessor.as_ref().right.0 {
                    predecessor = next;
                }

                let retrace_from = if predecessor == left_node {
                    predecessor
                } else {
                    // Lift the predecessor out, leaving its left child in its old slot.
                    let mut predecessor_parent = predecessor
                        .as_ref()
                        .parent
                        .0
                        .expect("Predecessor below the left child => parent");
                    predecessor_parent.as_mut().right = predecessor.as_ref().left;
                    predecessor_parent.as_mut().fix_right_child_parent();

                    predecessor.as_mut().left = Link(Some(left_node));
                    left_node.as_mut().parent = Link(Some(predecessor));
                    predecessor_parent
                };

                predecessor.as_mut().right = Link(Some(right_node));
                right_node.as_mut().parent = Link(Some(predecessor));
                predecessor.as_mut().parent = parent;
                self.replace_child(parent, target, Link(Some(predecessor)));
                trace!("spliced in-order predecessor into a two-child node");
                Some(retrace_from)
            }
            (child, None) | (None, child) => {
                if let Some(mut child) = child {
                    child.as_mut().parent = parent;
                }
                self.replace_child(parent, target, Link(child));
                trace!(had_child = child.is_some(), "detached node");
                parent.0
            }
        };

        // The node no longer owns its children. Clear the links so dropping it frees only itself.
        let mut removed = Box::from_raw(target.as_ptr());
        removed.left = Link(None);
        removed.right = Link(None);
        drop(removed);

        self.retrace(retrace_from);
    }
}

impl<T> SortedList<T> for AvlSortedList<T> {
    type Iter<'a> = Iter<'a, T> where T: 'a;

    fn with_comparator(compare: Comparator<T>) -> Self {
        Self::new(compare)
    }

    fn comparator(&self) -> &Comparator<T> {
        &self.compare
    }

    fn len(&self) -> usize {
        self.len
    }

    fn add(&mut self, value: T) -> bool {
        AvlSortedList::add(self, value);
        true
    }

    fn find_by<F>(&self, probe: F) -> Option<&T>
    where
        F: FnMut(&T) -> Ordering,
    {
        AvlSortedList::find_by(self, probe)
    }

    fn remove_by<F>(&mut self, probe: F) -> bool
    where
        F: FnMut(&T) -> Ordering,
    {
        AvlSortedList::remove_by(self, probe)
    }

    fn iter(&self) -> Iter<'_, T> {
        AvlSortedList::iter(self)
    }
}

impl<T> Extend<T> for AvlSortedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl<'a, T> IntoIterator for &'a AvlSortedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over an [`AvlSortedList`]. It walks the tree with an explicit stack of
/// ancestors rather than recursing.
pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
    /// The value last yielded and how many more times it has to be yielded.
    pending: Option<(&'a T, usize)>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    fn push_left_spine(&mut self, mut node: Option<&'a Node<T>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left();
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some((value, repeats)) = &mut self.pending {
            if *repeats > 0 {
                *repeats -= 1;
                self.remaining -= 1;
                return Some(*value);
            }
        }

        let node = self.stack.pop()?;
        self.push_left_spine(node.right());
        self.pending = Some((&node.value, node.occurrences - 1));
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

struct Link<T>(Option<NonNull<Node<T>>>);

impl<T> Clone for Link<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Link<T> {}

impl<T> Link<T> {
    fn node(&self) -> Option<&Node<T>> {
        // SAFETY: If the link is not `None` then it points at a live `Node` owned by the same
        // list as this link. Mutation only happens through `&mut AvlSortedList`, which can't
        // coexist with the borrow handed out here.
        unsafe { self.0.as_ref().map(|ptr| ptr.as_ref()) }
    }

    fn node_mut(&mut self) -> Option<&mut Node<T>> {
        // SAFETY: See `Link::node`.
        unsafe { self.0.as_mut().map(|ptr| ptr.as_mut()) }
    }

    /// Deep copies the subtree behind this link. The copy's root keeps the original's parent
    /// pointer, which the caller has to fix.
    fn clone_boxed(&self) -> Self
    where
        T: Clone,
    {
        Link(self.node().map(|node| {
            let copy = Box::leak(Box::new(node.clone()));
            copy.fix_left_child_parent();
            copy.fix_right_child_parent();
            NonNull::from(copy)
        }))
    }
}

struct Node<T> {
    value: T,
    occurrences: usize,
    left: Link<T>,
    right: Link<T>,
    parent: Link<T>,
    height: usize,
    descendants: usize,
}

impl<T> Drop for Node<T> {
    fn drop(&mut self) {
        // SAFETY: Dropping a node doesn't drop its parent and we are the only owners of these
        // children so we won't drop them twice. They were initially allocated using `Box::new`
        // (in `Node::new_boxed`) so they should be well aligned, etc.
        unsafe {
            if let Some(left) = self.left.0.take() {
                drop(Box::from_raw(left.as_ptr()));
            }
            if let Some(right) = self.right.0.take() {
                drop(Box::from_raw(right.as_ptr()));
            }
        }
    }
}

impl<T: Clone> Clone for Node<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            occurrences: self.occurrences,
            left: self.left.clone_boxed(),
            right: self.right.clone_boxed(),
            parent: self.parent,
            height: self.height,
            descendants: self.descendants,
        }
    }
}

impl<T> Node<T> {
    fn new_boxed(value: T) -> Box<Self> {
        Box::new(Node {
            value,
            occurrences: 1,
            left: Link(None),
            right: Link(None),
            parent: Link(None),
            height: 1,
            descendants: 0,
        })
    }

    fn left(&self) -> Option<&Self> {
        self.left.node()
    }

    fn right(&self) -> Option<&Self> {
        self.right.node()
    }

    fn fix_left_child_parent(&mut self) {
        let self_ptr = NonNull::from(&*self);
        if let Some(left) = self.left.node_mut() {
            left.parent = Link(Some(self_ptr));
        }
    }

    fn fix_right_child_parent(&mut self) {
        let self_ptr = NonNull::from(&*self);
        if let Some(right) = self.right.node_mut() {
            right.parent = Link(Some(self_ptr));
        }
    }

    /// Recomputes `height` and `descendants` from the children.
    fn fix_height(&mut self) {
        let (left_height, left_count) = self.left().map_or((0, 0), |n| (n.height, n.descendants + 1));
        let (right_height, right_count) =
            self.right().map_or((0, 0), |n| (n.height, n.descendants + 1));
        self.height = left_height.max(right_height) + 1;
        self.descendants = left_count + right_count;
    }

    /// The height of the left subtree minus the height of the right subtree.
    fn balance_factor(&self) -> isize {
        let left_height = self.left().map_or(0, |n| n.height);
        let right_height = self.right().map_or(0, |n| n.height);
        left_height as isize - right_height as isize
    }
}



#[cfg(test)]
crate::test::sorted_list::sorted_list_suite!(AvlSortedList);
