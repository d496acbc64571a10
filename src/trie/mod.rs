//! Prefix trees over words.
//!
//! A [`Trie`] stores words character by character. Words sharing a prefix share the nodes of
//! that prefix, which makes prefix queries and anagram-style searches cheap. The node type
//! decides how children are stored: [`HashTrieNode`] uses a hash map and [`SortedTrieNode`]
//! keeps them in an [`AvlSortedList`](crate::AvlSortedList), which makes every listing come
//! out in lexicographic order.
//!
//! # Examples
//!
//! ```
//! use classic_ds::SortedTrie;
//!
//! let mut trie = SortedTrie::<()>::new();
//! for word in ["goat", "go", "gopher", "cat"] {
//!     trie.add_word(word);
//! }
//!
//! assert!(trie.contains_word("go"));
//! assert!(!trie.contains_word("gop"));
//! assert_eq!(trie.words_with_prefix("go"), vec!["go", "goat", "gopher"]);
//! assert_eq!(trie.longest_word_length(), Some(6));
//!
//! trie.remove_word("gopher");
//! assert_eq!(trie.longest_word_length(), Some(4));
//! ```

mod node;

pub use node::{HashTrieNode, SortedTrieNode, TrieNode};

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops::{Bound, RangeBounds};

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use crate::compare;
use crate::priority_queue::PriorityQueue;

/// A trie whose nodes keep their children sorted by character.
pub type SortedTrie<D = ()> = Trie<SortedTrieNode<D>>;

/// A word found by [`Trie::find_words_with_characters`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordMatch {
    /// The word.
    pub word: String,
    /// The letters wildcards stood for, in the order they appear in `word`.
    pub insertions: Vec<char>,
}

/// A set of words stored as a prefix tree of `N` nodes.
///
/// Besides the words themselves the trie tracks how many words of each length it holds, so
/// the longest and shortest lengths stay exact as words come and go.
pub struct Trie<N = HashTrieNode> {
    root: N,
    num_words: usize,
    longest_lengths: PriorityQueue<usize>,
    shortest_lengths: PriorityQueue<usize>,
    length_counts: HashMap<usize, usize>,
}

impl<N: TrieNode> Default for Trie<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: TrieNode> fmt::Debug for Trie<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<N: TrieNode + Clone> Clone for Trie<N> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            num_words: self.num_words,
            longest_lengths: self.longest_lengths.clone(),
            shortest_lengths: self.shortest_lengths.clone(),
            length_counts: self.length_counts.clone(),
        }
    }
}

impl<N: TrieNode> Trie<N> {
    /// An empty trie.
    pub fn new() -> Self {
        Self {
            root: N::default(),
            num_words: 0,
            longest_lengths: PriorityQueue::new(compare::reversed(compare::natural())),
            shortest_lengths: PriorityQueue::new(compare::natural()),
            length_counts: HashMap::new(),
        }
    }

    /// Number of words.
    pub fn num_words(&self) -> usize {
        self.num_words
    }

    /// Whether the trie holds no words.
    pub fn is_empty(&self) -> bool {
        self.num_words == 0
    }

    /// Length in characters of the longest word.
    pub fn longest_word_length(&self) -> Option<usize> {
        self.longest_lengths.peek().copied()
    }

    /// Length in characters of the shortest word.
    pub fn shortest_word_length(&self) -> Option<usize> {
        self.shortest_lengths.peek().copied()
    }

    /// Adds `word`. Returns `false` if it was already present.
    pub fn add_word(&mut self, word: &str) -> bool {
        self.insert(word).1
    }

    /// Adds `word` if needed and attaches `data` to it, replacing whatever was attached
    /// before. Returns `false` if the word was already present.
    pub fn add_word_with_data(&mut self, word: &str, data: N::Data) -> bool {
        let (node, added) = self.insert(word);
        *node.data_mut() = Some(data);
        added
    }

    fn insert(&mut self, word: &str) -> (&mut N, bool) {
        let mut node = &mut self.root;
        for ch in word.chars() {
            node = node.child_or_insert(ch);
        }
        if node.is_end_of_word() {
            return (node, false);
        }

        node.set_end_of_word(true);
        self.num_words += 1;
        let length = word.chars().count();
        let count = self.length_counts.entry(length).or_insert(0);
        if *count == 0 {
            self.longest_lengths.enqueue(length);
            self.shortest_lengths.enqueue(length);
        }
        *count += 1;
        trace!(word, words = self.num_words, "word added");
        (node, true)
    }

    /// The data attached to `word`, if the word is present and has any.
    pub fn word_data(&self, word: &str) -> Option<&N::Data> {
        self.word_node(word)?.data()
    }

    /// Whether `word` is present. Prefixes of stored words don't count.
    pub fn contains_word(&self, word: &str) -> bool {
        self.word_node(word).is_some()
    }

    /// Removes `word` and its data, pruning the nodes no other word needs. Returns `false` if
    /// it was not present.
    pub fn remove_word(&mut self, word: &str) -> bool {
        let chars: Vec<char> = word.chars().collect();
        if !unmark(&mut self.root, &chars) {
            return false;
        }

        self.num_words -= 1;
        if let Entry::Occupied(mut count) = self.length_counts.entry(chars.len()) {
            *count.get_mut() -= 1;
            if *count.get() == 0 {
                count.remove();
            }
        }
        discard_stale(&mut self.longest_lengths, &self.length_counts);
        discard_stale(&mut self.shortest_lengths, &self.length_counts);
        trace!(word, words = self.num_words, "word removed");
        true
    }

    /// Every word. See [`Trie::iter`] for the order.
    pub fn all_words(&self) -> Vec<String> {
        self.iter().collect()
    }

    /// Every word starting with `prefix`, `prefix` itself included if it is a word.
    pub fn words_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.words_from(prefix).collect()
    }

    /// Every word starting with `prefix` and ending with `suffix`. The two may overlap.
    pub fn words_with_prefix_suffix(&self, prefix: &str, suffix: &str) -> Vec<String> {
        self.words_from(prefix)
            .filter(|word| word.ends_with(suffix))
            .collect()
    }

    /// Every word spelled by picking characters from `chars` in any order, each at most once.
    /// `None` is a wildcard standing for any one letter; the letters wildcards stood for are
    /// reported in [`WordMatch::insertions`].
    ///
    /// With `must_include_all` only words using every entry of `chars` are returned, otherwise
    /// any word using a subset of them is.
    pub fn find_words_with_characters(
        &self,
        chars: &[Option<char>],
        must_include_all: bool,
    ) -> Vec<WordMatch> {
        let mut found = Vec::new();
        search_characters(
            &self.root,
            &mut String::new(),
            &mut Vec::new(),
            chars,
            must_include_all,
            &mut found,
        );
        found
    }

    /// Up to `count` distinct words whose length in characters lies in `lengths`, sampled
    /// with the thread RNG. See [`Trie::random_words_with`].
    pub fn random_words<R>(&self, count: usize, lengths: R) -> Vec<String>
    where
        R: RangeBounds<usize>,
    {
        self.random_words_with(&mut rand::thread_rng(), count, lengths)
    }

    /// Up to `count` distinct words whose length in characters lies in `lengths`, sampled
    /// with `rng`. Fewer words come back only when fewer match. Ranges that are empty or
    /// outside the stored word lengths give no words.
    pub fn random_words_with<G, R>(&self, rng: &mut G, count: usize, lengths: R) -> Vec<String>
    where
        G: Rng + ?Sized,
        R: RangeBounds<usize>,
    {
        let min = match lengths.start_bound() {
            Bound::Included(&min) => min,
            Bound::Excluded(&min) => min.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let max = match lengths.end_bound() {
            Bound::Included(&max) => max,
            Bound::Excluded(&0) => return Vec::new(),
            Bound::Excluded(&max) => max - 1,
            Bound::Unbounded => usize::MAX,
        };
        let (Some(longest), Some(shortest)) =
            (self.longest_word_length(), self.shortest_word_length())
        else {
            return Vec::new();
        };
        if min > max || min > longest || max < shortest {
            return Vec::new();
        }

        let mut taken = HashSet::new();
        let mut words = Vec::new();
        for _ in 0..count {
            let picked = random_word(&self.root, &mut String::new(), 0, (min, max), &taken, rng);
            let Some(word) = picked else {
                break;
            };
            taken.insert(word.clone());
            words.push(word);
        }
        words
    }

    /// Iterates the words depth first. With [`SortedTrieNode`]s that is lexicographic order.
    pub fn iter(&self) -> Words<'_, N> {
        Words {
            stack: vec![(String::new(), &self.root)],
        }
    }

    fn words_from(&self, prefix: &str) -> Words<'_, N> {
        Words {
            stack: self
                .word_prefix_node(prefix)
                .map(|node| (prefix.to_owned(), node))
                .into_iter()
                .collect(),
        }
    }

    fn word_prefix_node(&self, prefix: &str) -> Option<&N> {
        prefix
            .chars()
            .try_fold(&self.root, |node, ch| node.child(ch))
    }

    fn word_node(&self, word: &str) -> Option<&N> {
        self.word_prefix_node(word)
            .filter(|node| node.is_end_of_word())
    }
}

impl<'a, N: TrieNode> IntoIterator for &'a Trie<N> {
    type Item = String;
    type IntoIter = Words<'a, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<N: TrieNode> Extend<String> for Trie<N> {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        for word in iter {
            self.add_word(&word);
        }
    }
}

impl<'w, N: TrieNode> Extend<&'w str> for Trie<N> {
    fn extend<I: IntoIterator<Item = &'w str>>(&mut self, iter: I) {
        for word in iter {
            self.add_word(word);
        }
    }
}

/// Depth-first iterator over the words of a [`Trie`].
pub struct Words<'a, N> {
    stack: Vec<(String, &'a N)>,
}

impl<'a, N: TrieNode> Iterator for Words<'a, N> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while let Some((word, node)) = self.stack.pop() {
            for (ch, child) in node.children().into_iter().rev() {
                let mut longer = word.clone();
                longer.push(ch);
                self.stack.push((longer, child));
            }
            if node.is_end_of_word() {
                return Some(word);
            }
        }
        None
    }
}

/// Clears the end-of-word mark at the end of `chars` below `node` and prunes the nodes left
/// empty on the way back up. Returns whether a word was there to remove.
fn unmark<N: TrieNode>(node: &mut N, chars: &[char]) -> bool {
    let Some((&ch, rest)) = chars.split_first() else {
        if !node.is_end_of_word() {
            return false;
        }
        node.set_end_of_word(false);
        node.data_mut().take();
        return true;
    };
    let Some(child) = node.child_mut(ch) else {
        return false;
    };
    if !unmark(child, rest) {
        return false;
    }
    if child.is_empty() {
        node.remove_child(ch);
    }
    true
}

/// Pops lengths no word has anymore off the top of `lengths`. Lengths further down are
/// checked when they surface, or swept out once they make up half the queue.
fn discard_stale(lengths: &mut PriorityQueue<usize>, counts: &HashMap<usize, usize>) {
    while let Some(&length) = lengths.peek() {
        if counts.contains_key(&length) {
            break;
        }
        lengths.dequeue();
    }
    if lengths.count() > 2 * counts.len() {
        lengths.retain(|length| counts.contains_key(length));
    }
}

fn search_characters<N: TrieNode>(
    node: &N,
    prefix: &mut String,
    insertions: &mut Vec<char>,
    chars: &[Option<char>],
    must_include_all: bool,
    found: &mut Vec<WordMatch>,
) {
    let mut tried = HashSet::new();
    for (index, &wanted) in chars.iter().enumerate() {
        if !tried.insert(wanted) {
            continue;
        }
        let remaining: Vec<Option<char>> = chars[..index]
            .iter()
            .chain(&chars[index + 1..])
            .copied()
            .collect();
        let steps = match wanted {
            None => node.children(),
            Some(ch) => node.child(ch).map(|child| (ch, child)).into_iter().collect(),
        };
        for (ch, child) in steps {
            prefix.push(ch);
            if wanted.is_none() {
                insertions.push(ch);
            }
            if child.is_end_of_word() && (!must_include_all || remaining.is_empty()) {
                found.push(WordMatch {
                    word: prefix.clone(),
                    insertions: insertions.clone(),
                });
            }
            search_characters(child, prefix, insertions, &remaining, must_include_all, found);
            if wanted.is_none() {
                insertions.pop();
            }
            prefix.pop();
        }
    }
}

/// Walks down from `node` in random order looking for a word not in `taken` whose length is
/// within `(min, max)`. A word with longer words below it is returned before descending with
/// probability one in (children + 1). Falls back to the other branches, so `None` means no
/// such word is left.
fn random_word<N, G>(
    node: &N,
    prefix: &mut String,
    depth: usize,
    (min, max): (usize, usize),
    taken: &HashSet<String>,
    rng: &mut G,
) -> Option<String>
where
    N: TrieNode,
    G: Rng + ?Sized,
{
    let eligible = node.is_end_of_word() && depth >= min && !taken.contains(prefix.as_str());
    let mut children = if depth < max {
        node.children()
    } else {
        Vec::new()
    };
    if eligible && rng.gen_range(0..=children.len()) == children.len() {
        return Some(prefix.clone());
    }

    children.shuffle(rng);
    for (ch, child) in children {
        prefix.push(ch);
        let word = random_word(child, prefix, depth + 1, (min, max), taken, rng);
        prefix.pop();
        if word.is_some() {
            return word;
        }
    }
    eligible.then(|| prefix.clone())
}
