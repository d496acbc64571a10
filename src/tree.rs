//! A rooted tree view over a [`Graph`].
//!
//! A [`Tree`] presents a node and everything reachable from it as a tree. It refuses every
//! edge that would close a cycle, and it caches its depth and leaves until the next edge
//! change anywhere in the backing graph.
//!
//! # Examples
//!
//! ```
//! use classic_ds::{Error, GraphNode, Tree};
//!
//! let a = GraphNode::new("a");
//! let b = GraphNode::new("b");
//! let tree = Tree::new(a.clone())?;
//!
//! tree.add_child_node(&b)?;
//! assert_eq!(tree.depth(), 1);
//! assert_eq!(tree.leaf_nodes(), vec![b.clone()]);
//!
//! // Closing a cycle is refused and leaves the tree as it was.
//! let err = b.add_connection_to(&a).unwrap_err();
//! assert_eq!(err, Error::CycleDetected { from: b.id(), to: a.id() });
//! assert_eq!(b.out_degree(), 0);
//! # Ok::<(), Error>(())
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::error::{Error, Result};
use crate::events::ListenerId;
use crate::graph::Graph;
use crate::graph_node::{GraphNode, Path};

/// A tree view rooted at a [`GraphNode`].
///
/// Child views returned by [`Tree::children`] share the backing graph with the tree they came
/// from, so edge changes made through any of them are seen by all. They share its cycle guard
/// too, which stays registered until the last of them is dropped.
pub struct Tree<T: 'static> {
    root: GraphNode<T>,
    graph: Graph<T>,
    cache: Rc<TreeCache<T>>,
    guard: Rc<CycleGuard<T>>,
    subscriptions: Vec<ListenerId>,
}

/// The no-cycle guard on a backing graph, unregistered on drop.
struct CycleGuard<T: 'static> {
    graph: Graph<T>,
    id: ListenerId,
}

impl<T: 'static> CycleGuard<T> {
    fn register(graph: &Graph<T>) -> Self {
        let id = graph.add_connection_guard(|from, to| {
            if to == from || to.has_path_to_node(from) || to.reaches_cycle() {
                return Err(Error::CycleDetected {
                    from: from.id(),
                    to: to.id(),
                });
            }
            Ok(())
        });
        Self {
            graph: graph.clone(),
            id,
        }
    }
}

impl<T: 'static> Drop for CycleGuard<T> {
    fn drop(&mut self) {
        self.graph.unsubscribe(self.id);
    }
}

/// Derived properties of one view, each with its own stale flag.
struct TreeCache<T> {
    depth: Cached<usize>,
    leaf_nodes: Cached<Vec<GraphNode<T>>>,
}

impl<T> TreeCache<T> {
    fn mark_changed(&self) {
        self.depth.invalidate();
        self.leaf_nodes.invalidate();
    }
}

struct Cached<V> {
    stale: Cell<bool>,
    value: RefCell<V>,
}

impl<V: Clone + Default> Cached<V> {
    fn new() -> Self {
        Self {
            stale: Cell::new(true),
            value: RefCell::new(V::default()),
        }
    }

    fn invalidate(&self) {
        self.stale.set(true);
    }

    /// The cached value, recomputed with `compute` first if it is stale.
    fn get_or_update(&self, compute: impl FnOnce() -> V) -> V {
        if self.stale.get() {
            let fresh = compute();
            *self.value.borrow_mut() = fresh;
            self.stale.set(false);
        }
        self.value.borrow().clone()
    }
}

impl<T: 'static> Drop for Tree<T> {
    fn drop(&mut self) {
        for id in self.subscriptions.drain(..) {
            self.graph.unsubscribe(id);
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("root", &self.root)
            .field("node_count", &self.node_count())
            .finish()
    }
}

impl<T: 'static> Tree<T> {
    /// A tree rooted at `root`, backed by a new graph holding everything reachable from it.
    ///
    /// Fails with [`Error::CycleDetected`] if a cycle can already be reached from `root`.
    pub fn new(root: GraphNode<T>) -> Result<Self> {
        let graph = Graph::new();
        graph.add_node(&root);
        if let Some(cycle) = graph.cycles().into_iter().next() {
            let [.., from, to] = cycle.as_slice() else {
                unreachable!("A cycle has at least one edge");
            };
            return Err(Error::CycleDetected {
                from: from.id(),
                to: to.id(),
            });
        }

        let guard = Rc::new(CycleGuard::register(&graph));
        Ok(Self::view(root, graph, guard))
    }

    /// A view of `root` over an existing graph already watched by `guard`.
    fn view(root: GraphNode<T>, graph: Graph<T>, guard: Rc<CycleGuard<T>>) -> Self {
        let cache = Rc::new(TreeCache {
            depth: Cached::new(),
            leaf_nodes: Cached::new(),
        });
        let subscriptions = vec![
            graph.on_connection_added(Self::invalidator(&cache)),
            graph.on_connection_removed(Self::invalidator(&cache)),
        ];
        Self {
            root,
            graph,
            cache,
            guard,
            subscriptions,
        }
    }

    fn invalidator(cache: &Rc<TreeCache<T>>) -> impl Fn(&GraphNode<T>, &GraphNode<T>) + 'static {
        let cache: Weak<TreeCache<T>> = Rc::downgrade(cache);
        move |from, to| {
            if let Some(cache) = cache.upgrade() {
                debug!(from = %from.id(), to = %to.id(), "tree changed");
                cache.mark_changed();
            }
        }
    }

    /// The root node.
    pub fn root(&self) -> &GraphNode<T> {
        &self.root
    }

    /// The backing graph.
    pub fn graph(&self) -> &Graph<T> {
        &self.graph
    }

    /// Number of nodes in the backing graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// A view for every child of the root, in edge order.
    pub fn children(&self) -> Vec<Tree<T>> {
        self.root
            .out_connections()
            .into_iter()
            .map(|child| Self::view(child, self.graph.clone(), Rc::clone(&self.guard)))
            .collect()
    }

    /// The nodes without children under the root. A root without children is its own single
    /// leaf.
    pub fn leaf_nodes(&self) -> Vec<GraphNode<T>> {
        self.cache.leaf_nodes.get_or_update(|| {
            let children = self.children();
            if children.is_empty() {
                vec![self.root.clone()]
            } else {
                children.iter().flat_map(Tree::leaf_nodes).collect()
            }
        })
    }

    /// Number of leaves. See [`Tree::leaf_nodes`].
    pub fn leaf_node_count(&self) -> usize {
        self.leaf_nodes().len()
    }

    /// Number of edges on the longest path from the root down to a leaf. A lone root has
    /// depth 0.
    pub fn depth(&self) -> usize {
        self.cache.depth.get_or_update(|| {
            self.children()
                .iter()
                .map(|child| child.depth() + 1)
                .max()
                .unwrap_or(0)
        })
    }

    /// Connects the root to `node`. Fails with [`Error::CycleDetected`], leaving the tree
    /// untouched, if that would close a cycle.
    pub fn add_child_node(&self, node: &GraphNode<T>) -> Result<bool> {
        let added = self.root.add_connection_to(node)?;
        self.cache.mark_changed();
        Ok(added)
    }

    /// Removes `node` from the backing graph along with every edge pointing at it. Returns
    /// `false` if it was not part of the graph.
    pub fn remove_child_node(&self, node: &GraphNode<T>) -> bool {
        let removed = self.graph.remove_node(node);
        self.cache.mark_changed();
        removed
    }

    /// One path from the root to each leaf. A lone root has no paths.
    pub fn enumerate_paths_from_root_to_leaves(&self) -> Vec<Path<T>> {
        self.leaf_nodes()
            .iter()
            .flat_map(|leaf| self.root.paths_to_node(leaf))
            .collect()
    }
}
