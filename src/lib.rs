//! Classic data structures, mostly for educational purposes.
//!
//! ## Ordered containers
//!
//! Every ordered container is ordered by a [`Comparator`]: a shared closure imposing a total
//! order on its items. The [`compare`] module has ready-made comparators for numbers, strings,
//! timestamps, [`Comparable`] types and keys extracted from records. Containers implementing
//! [`SortedList`] keep their items in ascending order and share one API:
//!
//! - [`AvlSortedList`] keeps its items in an AVL tree. The heights of the two subtrees of any
//!   node differ by at most one, so lookups, inserts and removals take `O(lg N)`.
//! - [`BinarySortedList`] keeps them in a plain Binary Search Tree that never rebalances.
//! - [`SortedArray`] keeps them in one contiguous buffer.
//!
//! [`EqualitySet`] builds a set on top of [`SortedArray`].
//!
//! ## Graphs
//!
//! [`GraphNode`]s are shared handles to nodes with directed edges. They announce edge changes
//! to registered listeners and let guards veto new edges before they are made. A [`Graph`]
//! tracks a set of nodes and everything reachable from them, and a [`Tree`] is a view over a
//! graph that refuses every edge closing a cycle.
//!
//! ## Everything else
//!
//! [`LinkedList`], [`Queue`], [`Stack`] and [`PriorityQueue`] are the usual linear containers.
//! [`Trie`] stores words as a prefix tree and answers prefix, suffix, anagram and random
//! sampling queries.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod avl_sorted_list;
pub mod binary_sorted_list;
pub mod compare;
mod error;
pub mod equality_set;
mod events;
pub mod graph;
pub mod graph_node;
pub mod linked_list;
pub mod priority_queue;
pub mod queue;
pub mod sorted_array;
pub mod sorted_list;
pub mod stack;
pub mod tree;
pub mod trie;


pub use avl_sorted_list::AvlSortedList;
pub use binary_sorted_list::BinarySortedList;
pub use compare::{Comparable, Comparator};
pub use equality_set::EqualitySet;
pub use error::{Error, Result};
pub use events::ListenerId;
pub use graph::Graph;
pub use graph_node::{GraphNode, NodeId, Path, WeakGraphNode};
pub use linked_list::LinkedList;
pub use priority_queue::PriorityQueue;
pub use queue::Queue;
pub use sorted_array::SortedArray;
pub use sorted_list::SortedList;
pub use stack::Stack;
pub use tree::Tree;
pub use trie::{HashTrieNode, SortedTrie, SortedTrieNode, Trie, TrieNode, WordMatch};
