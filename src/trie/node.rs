//! Node storage for [`Trie`](super::Trie).

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::avl_sorted_list::AvlSortedList;
use crate::compare;

/// One node of a trie: the children reached by each next character, whether a word ends
/// here, and the data attached to that word.
///
/// A node can end a word and still lead to longer ones, as "go" does for "goat".
pub trait TrieNode: Default {
    /// Data attached to the words of a trie.
    type Data;

    /// The child reached by `ch`.
    fn child(&self, ch: char) -> Option<&Self>;

    /// The child reached by `ch`, mutably.
    fn child_mut(&mut self, ch: char) -> Option<&mut Self>;

    /// The child reached by `ch`, created empty if there is none yet.
    fn child_or_insert(&mut self, ch: char) -> &mut Self;

    /// Drops the child reached by `ch` and everything below it. Returns whether there was one.
    fn remove_child(&mut self, ch: char) -> bool;

    /// Every child with the character leading to it. Iteration order is up to the node type.
    fn children(&self) -> Vec<(char, &Self)>;

    /// Number of children.
    fn child_count(&self) -> usize;

    /// Whether a word ends at this node.
    fn is_end_of_word(&self) -> bool;

    /// Marks or unmarks this node as the end of a word.
    fn set_end_of_word(&mut self, end: bool);

    /// Data attached to the word ending here.
    fn data(&self) -> Option<&Self::Data>;

    /// Slot for the data attached to the word ending here.
    fn data_mut(&mut self) -> &mut Option<Self::Data>;

    /// Whether this node neither ends a word nor leads anywhere.
    fn is_empty(&self) -> bool {
        !self.is_end_of_word() && self.child_count() == 0
    }
}

/// A node keeping its children in a hash map. Children come out in no particular order.
#[derive(Debug, Clone)]
pub struct HashTrieNode<D = ()> {
    children: HashMap<char, HashTrieNode<D>>,
    end_of_word: bool,
    data: Option<D>,
}

impl<D> Default for HashTrieNode<D> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            end_of_word: false,
            data: None,
        }
    }
}

impl<D> TrieNode for HashTrieNode<D> {
    type Data = D;

    fn child(&self, ch: char) -> Option<&Self> {
        self.children.get(&ch)
    }

    fn child_mut(&mut self, ch: char) -> Option<&mut Self> {
        self.children.get_mut(&ch)
    }

    fn child_or_insert(&mut self, ch: char) -> &mut Self {
        self.children.entry(ch).or_default()
    }

    fn remove_child(&mut self, ch: char) -> bool {
        self.children.remove(&ch).is_some()
    }

    fn children(&self) -> Vec<(char, &Self)> {
        self.children.iter().map(|(ch, node)| (*ch, node)).collect()
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn is_end_of_word(&self) -> bool {
        self.end_of_word
    }

    fn set_end_of_word(&mut self, end: bool) {
        self.end_of_word = end;
    }

    fn data(&self) -> Option<&D> {
        self.data.as_ref()
    }

    fn data_mut(&mut self) -> &mut Option<D> {
        &mut self.data
    }
}

/// A node keeping its children in an [`AvlSortedList`] ordered by character, so they come out
/// in character order.
#[derive(Debug, Clone)]
pub struct SortedTrieNode<D = ()> {
    children: AvlSortedList<SortedChild<D>>,
    end_of_word: bool,
    data: Option<D>,
}

#[derive(Debug, Clone)]
struct SortedChild<D> {
    ch: char,
    node: SortedTrieNode<D>,
}

fn probe<D>(ch: char) -> impl Fn(&SortedChild<D>) -> Ordering {
    move |child| child.ch.cmp(&ch)
}

impl<D: 'static> Default for SortedTrieNode<D> {
    fn default() -> Self {
        Self {
            children: AvlSortedList::new(compare::by_key(
                |child: &SortedChild<D>| child.ch,
                compare::natural(),
            )),
            end_of_word: false,
            data: None,
        }
    }
}

impl<D: 'static> TrieNode for SortedTrieNode<D> {
    type Data = D;

    fn child(&self, ch: char) -> Option<&Self> {
        self.children.find_by(probe(ch)).map(|child| &child.node)
    }

    fn child_mut(&mut self, ch: char) -> Option<&mut Self> {
        self.children
            .find_by_mut(probe(ch))
            .map(|child| &mut child.node)
    }

    fn child_or_insert(&mut self, ch: char) -> &mut Self {
        if self.children.find_by(probe(ch)).is_none() {
            self.children.add(SortedChild {
                ch,
                node: Self::default(),
            });
        }
        self.children
            .find_by_mut(probe(ch))
            .map(|child| &mut child.node)
            .expect("Child was just inserted")
    }

    fn remove_child(&mut self, ch: char) -> bool {
        self.children.remove_by(probe(ch))
    }

    fn children(&self) -> Vec<(char, &Self)> {
        self.children
            .iter()
            .map(|child| (child.ch, &child.node))
            .collect()
    }

    fn child_count(&self) -> usize {
        self.children.distinct_len()
    }

    fn is_end_of_word(&self) -> bool {
        self.end_of_word
    }

    fn set_end_of_word(&mut self, end: bool) {
        self.end_of_word = end;
    }

    fn data(&self) -> Option<&D> {
        self.data.as_ref()
    }

    fn data_mut(&mut self) -> &mut Option<D> {
        &mut self.data
    }
}
