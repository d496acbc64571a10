//! A sorted list kept in a plain, unbalanced Binary Search Tree.
//!
//! Every node holds the group of values that compare equal to each other, in the order they
//! were added. Nothing rebalances the tree, so adding values in sorted order degrades it into
//! a linked list. Use [`AvlSortedList`](crate::AvlSortedList) when that matters.
//!
//! # Examples
//!
//! ```
//! use classic_ds::{compare, BinarySortedList, SortedList};
//!
//! let mut unique = BinarySortedList::with_duplicates(compare::natural(), false);
//! assert!(unique.add(3));
//! assert!(!unique.add(3));
//!
//! let mut list = BinarySortedList::new(compare::natural());
//! list.add_many([3, 1, 3]);
//! assert_eq!(list.to_vec(), vec![1, 3, 3]);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::compare::Comparator;
use crate::sorted_list::SortedList;

/// A sorted list backed by an unbalanced BST.
pub struct BinarySortedList<T> {
    root: Tree<T>,
    len: usize,
    allow_duplicates: bool,
    compare: Comparator<T>,
}

impl<T> Drop for BinarySortedList<T> {
    // The tree can be as deep as it is long, so tear it down with an explicit stack.
    fn drop(&mut self) {
        let mut stack = vec![std::mem::take(&mut self.root)];
        while let Some(tree) = stack.pop() {
            if let Tree::Node(mut node) = tree {
                stack.push(std::mem::take(&mut node.left));
                stack.push(std::mem::take(&mut node.right));
            }
        }
    }
}

impl<T: Clone> Clone for BinarySortedList<T> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            len: self.len,
            allow_duplicates: self.allow_duplicates,
            compare: Rc::clone(&self.compare),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for BinarySortedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> BinarySortedList<T> {
    /// An empty list ordered by `compare` that keeps duplicates.
    pub fn new(compare: Comparator<T>) -> Self {
        Self::with_duplicates(compare, true)
    }

    /// An empty list ordered by `compare`. When `allow_duplicates` is `false`, adding a value
    /// that compares equal to a stored one is ignored.
    pub fn with_duplicates(compare: Comparator<T>, allow_duplicates: bool) -> Self {
        Self {
            root: Tree::Leaf,
            len: 0,
            allow_duplicates,
            compare,
        }
    }

    /// Whether equal values may be stored more than once.
    pub fn allows_duplicates(&self) -> bool {
        self.allow_duplicates
    }

    /// Iterates the values in ascending order. Equal values come out in the order they were
    /// added.
    pub fn iter(&self) -> Iter<'_, T> {
        let mut iter = Iter {
            stack: Vec::new(),
            group: <&[T]>::default().iter(),
            remaining: self.len,
        };
        iter.push_left_spine(&self.root);
        iter
    }

    /// Builds a list ordered by `compare` out of `f` applied to every value of this one. The
    /// duplicate policy carries over.
    pub fn map<U, F>(&self, compare: Comparator<U>, f: F) -> BinarySortedList<U>
    where
        F: FnMut(&T) -> U,
    {
        let mut mapped = BinarySortedList::with_duplicates(compare, self.allow_duplicates);
        mapped.add_many(self.iter().map(f));
        mapped
    }

    /// Builds a list with the same ordering holding only the values matching `predicate`.
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        T: Clone,
        F: FnMut(&T) -> bool,
    {
        let mut filtered = Self::with_duplicates(Rc::clone(&self.compare), self.allow_duplicates);
        filtered.add_many(self.iter().filter(|value| predicate(value)).cloned());
        filtered
    }
}

impl<T> SortedList<T> for BinarySortedList<T> {
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
        let mut slot = &mut self.root;
        loop {
            let side = match slot {
                Tree::Leaf => break,
                Tree::Node(node) => (self.compare)(&value, node.key()),
            };
            if side == Ordering::Equal {
                if !self.allow_duplicates {
                    return false;
                }
                if let Tree::Node(node) = slot {
                    node.values.push(value);
                }
                self.len += 1;
                return true;
            }
            slot = slot.child_mut(side);
        }
        *slot = Tree::Node(Box::new(Node::new(value)));
        self.len += 1;
        true
    }

    fn find_by<F>(&self, mut probe: F) -> Option<&T>
    where
        F: FnMut(&T) -> Ordering,
    {
        let mut tree = &self.root;
        while let Tree::Node(node) = tree {
            tree = match probe(node.key()) {
                Ordering::Less => &node.right,
                Ordering::Greater => &node.left,
                Ordering::Equal => return Some(node.key()),
            };
        }
        None
    }

    fn remove_by<F>(&mut self, mut probe: F) -> bool
    where
        F: FnMut(&T) -> Ordering,
    {
        let mut slot = &mut self.root;
        loop {
            let side = match slot {
                Tree::Leaf => return false,
                Tree::Node(node) => probe(node.key()).reverse(),
            };
            if side == Ordering::Equal {
                break;
            }
            slot = slot.child_mut(side);
        }

        match slot {
            Tree::Node(node) if node.values.len() > 1 => {
                node.values.remove(0);
            }
            _ => slot.unlink(),
        }
        self.len -= 1;
        true
    }

    fn iter(&self) -> Iter<'_, T> {
        BinarySortedList::iter(self)
    }
}

impl<T> Extend<T> for BinarySortedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.add_many(iter);
    }
}

impl<'a, T> IntoIterator for &'a BinarySortedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over a [`BinarySortedList`].
pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
    group: std::slice::Iter<'a, T>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    fn push_left_spine(&mut self, mut tree: &'a Tree<T>) {
        while let Tree::Node(node) = tree {
            self.stack.push(node);
            tree = &node.left;
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let value = match self.group.next() {
            Some(value) => value,
            None => {
                let node = self.stack.pop()?;
                self.push_left_spine(&node.right);
                self.group = node.values.iter();
                self.group.next()?
            }
        };
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

enum Tree<T> {
    Leaf,
    Node(Box<Node<T>>),
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Tree::Leaf
    }
}

impl<T: Clone> Clone for Tree<T> {
    // Copies nodes in pre-order, then links them up from the back so no step recurses.
    fn clone(&self) -> Self {
        let mut copies: Vec<(Option<(usize, Ordering)>, Box<Node<T>>)> = Vec::new();
        let mut stack = vec![(None, self)];
        while let Some((parent, tree)) = stack.pop() {
            if let Tree::Node(node) = tree {
                let index = copies.len();
                copies.push((
                    parent,
                    Box::new(Node {
                        values: node.values.clone(),
                        left: Tree::Leaf,
                        right: Tree::Leaf,
                    }),
                ));
                stack.push((Some((index, Ordering::Less)), &node.left));
                stack.push((Some((index, Ordering::Greater)), &node.right));
            }
        }

        let mut root = Tree::Leaf;
        while let Some((parent, node)) = copies.pop() {
            let copy = Tree::Node(node);
            match parent {
                None => root = copy,
                Some((index, Ordering::Less)) => copies[index].1.left = copy,
                Some((index, _)) => copies[index].1.right = copy,
            }
        }
        root
    }
}

impl<T> Tree<T> {
    /// The left subtree for `Ordering::Less`, the right one otherwise.
    fn child_mut(&mut self, side: Ordering) -> &mut Self {
        match self {
            Tree::Leaf => unreachable!("Only nodes have children"),
            Tree::Node(node) => {
                if side == Ordering::Less {
                    &mut node.left
                } else {
                    &mut node.right
                }
            }
        }
    }

    /// Removes the node at the root of this subtree. With two children its in-order
    /// predecessor takes its place.
    fn unlink(&mut self) {
        let Tree::Node(mut node) = std::mem::take(self) else {
            return;
        };
        *self = match (std::mem::take(&mut node.left), std::mem::take(&mut node.right)) {
            (Tree::Leaf, child) | (child, Tree::Leaf) => child,
            (mut left, right) => {
                let mut predecessor = left.take_largest().expect("Non-empty left subtree");
                predecessor.left = left;
                predecessor.right = right;
                Tree::Node(predecessor)
            }
        };
    }

    /// Detaches the largest node of this subtree, leaving its left child in its place.
    fn take_largest(&mut self) -> Option<Box<Node<T>>> {
        let mut slot = self;
        while matches!(slot, Tree::Node(node) if matches!(node.right, Tree::Node(_))) {
            slot = slot.child_mut(Ordering::Greater);
        }
        match std::mem::take(slot) {
            Tree::Leaf => None,
            Tree::Node(mut node) => {
                *slot = std::mem::take(&mut node.left);
                Some(node)
            }
        }
    }
}

struct Node<T> {
    /// Never empty.
    values: Vec<T>,
    left: Tree<T>,
    right: Tree<T>,
}

impl<T> Node<T> {
    fn new(value: T) -> Self {
        Self {
            values: vec![value],
            left: Tree::Leaf,
            right: Tree::Leaf,
        }
    }

    fn key(&self) -> &T {
        &self.values[0]
    }
}


#[cfg(test)]
crate::test::sorted_list::sorted_list_suite!(BinarySortedList);
