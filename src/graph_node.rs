//! Shared, directed graph nodes.
//!
//! A [`GraphNode`] is a cheap handle: cloning it clones the handle, not the node. Two handles
//! are equal when they point at the same node, whatever the values inside. Edges are strong
//! handles, so nodes connected in a cycle keep each other alive until one of them calls
//! [`GraphNode::disconnect_all`].
//!
//! # Examples
//!
//! ```
//! use classic_ds::GraphNode;
//!
//! let a = GraphNode::new('a');
//! let b = GraphNode::new('b');
//! let c = GraphNode::new('c');
//! let d = GraphNode::new('d');
//!
//! a.add_connection_to(&b)?;
//! b.add_connection_to(&c)?;
//! a.add_connection_to(&d)?;
//! d.add_connection_to(&c)?;
//!
//! let paths = a.paths_to_node(&c);
//! assert_eq!(paths, vec![vec![a.clone(), b.clone(), c.clone()], vec![a.clone(), d, c.clone()]]);
//! assert_eq!(a.min_path_length_to_node(&c), Some(2));
//! assert!(!c.has_path_to_node(&a));
//! # Ok::<(), classic_ds::Error>(())
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::error::Result;
use crate::events::{ListenerId, ListenerIds, Listeners};

/// A sequence of nodes, each connected to the next.
pub type Path<T> = Vec<GraphNode<T>>;

type ConnectionListener<T> = dyn Fn(&GraphNode<T>);
type ConnectionGuard<T> = dyn Fn(&GraphNode<T>) -> Result<()>;

/// Identity of a graph node, stable for as long as the node is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:x}", self.0)
    }
}

/// A handle to a node holding a value and an ordered set of out-edges.
pub struct GraphNode<T>(Rc<NodeInner<T>>);

struct NodeInner<T> {
    value: T,
    out: RefCell<Vec<GraphNode<T>>>,
    ids: ListenerIds,
    added: Listeners<ConnectionListener<T>>,
    removed: Listeners<ConnectionListener<T>>,
    guards: Listeners<ConnectionGuard<T>>,
}

/// A handle that does not keep its node alive.
pub struct WeakGraphNode<T>(Weak<NodeInner<T>>);

impl<T> Clone for WeakGraphNode<T> {
    fn clone(&self) -> Self {
        Self(Weak::clone(&self.0))
    }
}

impl<T> WeakGraphNode<T> {
    /// The node, if it is still alive.
    pub fn upgrade(&self) -> Option<GraphNode<T>> {
        self.0.upgrade().map(GraphNode)
    }
}

impl<T> Clone for GraphNode<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> PartialEq for GraphNode<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Eq for GraphNode<T> {}

impl<T> Hash for GraphNode<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl<T: fmt::Debug> fmt::Debug for GraphNode<T> {
    // Edges are printed as ids since they may lead back here.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let out: Vec<NodeId> = self.0.out.borrow().iter().map(GraphNode::id).collect();
        f.debug_struct("GraphNode")
            .field("id", &self.id())
            .field("value", &self.0.value)
            .field("out", &out)
            .finish()
    }
}

impl<T> GraphNode<T> {
    /// A new node with no edges.
    pub fn new(value: T) -> Self {
        Self(Rc::new(NodeInner {
            value,
            out: RefCell::new(Vec::new()),
            ids: ListenerIds::default(),
            added: Listeners::default(),
            removed: Listeners::default(),
            guards: Listeners::default(),
        }))
    }

    /// The value this node holds.
    pub fn value(&self) -> &T {
        &self.0.value
    }

    /// This node's identity.
    pub fn id(&self) -> NodeId {
        NodeId(Rc::as_ptr(&self.0) as *const () as usize)
    }

    /// A handle that doesn't keep this node alive.
    pub fn downgrade(&self) -> WeakGraphNode<T> {
        WeakGraphNode(Rc::downgrade(&self.0))
    }

    /// The nodes this one has edges to, in the order the edges were added.
    pub fn out_connections(&self) -> Vec<GraphNode<T>> {
        self.0.out.borrow().clone()
    }

    /// Number of out-edges.
    pub fn out_degree(&self) -> usize {
        self.0.out.borrow().len()
    }

    /// Whether there is an edge from this node to `node`.
    pub fn is_connected_to(&self, node: &GraphNode<T>) -> bool {
        self.0.out.borrow().contains(node)
    }

    /// Adds an edge from this node to `node`.
    ///
    /// Returns `Ok(false)` without doing anything when the edge already exists. Otherwise every
    /// connection guard is asked first; the first one to refuse aborts the call with its error
    /// and the edge is not added. Once added, the connection-added listeners are called in
    /// registration order.
    pub fn add_connection_to(&self, node: &GraphNode<T>) -> Result<bool> {
        if self.is_connected_to(node) {
            return Ok(false);
        }
        for guard in self.0.guards.snapshot() {
            if let Err(err) = guard(node) {
                debug!(from = %self.id(), to = %node.id(), %err, "connection rejected");
                return Err(err);
            }
        }

        self.0.out.borrow_mut().push(node.clone());
        trace!(from = %self.id(), to = %node.id(), "connection added");
        for listener in self.0.added.snapshot() {
            listener(node);
        }
        Ok(true)
    }

    /// Removes the edge from this node to `node`, calling the connection-removed listeners.
    /// Returns `false` if there was no such edge.
    pub fn remove_connection_to(&self, node: &GraphNode<T>) -> bool {
        let removed = {
            let mut out = self.0.out.borrow_mut();
            match out.iter().position(|n| n == node) {
                Some(index) => Some(out.remove(index)),
                None => None,
            }
        };
        match removed {
            Some(removed) => {
                trace!(from = %self.id(), to = %removed.id(), "connection removed");
                for listener in self.0.removed.snapshot() {
                    listener(&removed);
                }
                true
            }
            None => false,
        }
    }

    /// Removes every out-edge, calling the connection-removed listeners for each. This is how a
    /// cycle of nodes is torn down.
    pub fn disconnect_all(&self) {
        let out = std::mem::take(&mut *self.0.out.borrow_mut());
        for removed in &out {
            for listener in self.0.removed.snapshot() {
                listener(removed);
            }
        }
    }

    /// Registers `listener` to be called with the target of every edge added from this node.
    pub fn on_connection_added<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&GraphNode<T>) + 'static,
    {
        let id = self.0.ids.next();
        self.0.added.push(id, Rc::new(listener));
        id
    }

    /// Registers `listener` to be called with the target of every edge removed from this node.
    pub fn on_connection_removed<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&GraphNode<T>) + 'static,
    {
        let id = self.0.ids.next();
        self.0.removed.push(id, Rc::new(listener));
        id
    }

    /// Registers `guard` to vet every new edge from this node before it is added. A guard
    /// returning an error stops the edge from being added.
    pub fn add_connection_guard<F>(&self, guard: F) -> ListenerId
    where
        F: Fn(&GraphNode<T>) -> Result<()> + 'static,
    {
        let id = self.0.ids.next();
        self.0.guards.push(id, Rc::new(guard));
        id
    }

    /// Removes a listener or guard registered on this node. Returns `false` if `id` is not
    /// registered here.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.0.added.remove(id) || self.0.removed.remove(id) || self.0.guards.remove(id)
    }

    /// Number of listeners and guards registered on this node.
    pub fn subscription_count(&self) -> usize {
        self.0.added.len() + self.0.removed.len() + self.0.guards.len()
    }

    /// Every simple path from this node to `target`, in depth-first order.
    ///
    /// No node is entered twice on one path, so the search terminates on cyclic graphs. The
    /// only repeated node a path can hold is `self` at both ends, when `target` is `self` and
    /// the path closes a cycle. The search stops at `target`, so a path never runs through it.
    ///
    /// The number of simple paths grows exponentially with how densely the graph is
    /// connected.
    pub fn paths_to_node(&self, target: &GraphNode<T>) -> Vec<Path<T>> {
        self.collect_paths(target, HashSet::new())
    }

    fn collect_paths(&self, target: &GraphNode<T>, mut visited: HashSet<NodeId>) -> Vec<Path<T>> {
        if !visited.insert(self.id()) {
            return Vec::new();
        }

        let mut paths = Vec::new();
        for next in self.out_connections() {
            if next == *target {
                paths.push(vec![self.clone(), next]);
                continue;
            }
            // Each branch gets its own copy so siblings can revisit what this branch saw.
            for tail in next.collect_paths(target, visited.clone()) {
                let mut path = Vec::with_capacity(tail.len() + 1);
                path.push(self.clone());
                path.extend(tail);
                paths.push(path);
            }
        }
        paths
    }

    /// The first of the fewest-edge paths from this node to `target` found by
    /// [`GraphNode::paths_to_node`].
    pub fn min_path_to_node(&self, target: &GraphNode<T>) -> Option<Path<T>> {
        self.paths_to_node(target)
            .into_iter()
            .reduce(|shortest, path| {
                if path.len() < shortest.len() {
                    path
                } else {
                    shortest
                }
            })
    }

    /// The number of edges on the shortest path from this node to `target`, or `None` if
    /// `target` can't be reached. A node reaches itself only through a cycle.
    pub fn min_path_length_to_node(&self, target: &GraphNode<T>) -> Option<usize> {
        let mut seen = HashSet::new();
        let mut queue: VecDeque<(GraphNode<T>, usize)> = self
            .out_connections()
            .into_iter()
            .map(|node| (node, 1))
            .collect();
        while let Some((node, edges)) = queue.pop_front() {
            if node == *target {
                return Some(edges);
            }
            if seen.insert(node.id()) {
                queue.extend(node.out_connections().into_iter().map(|n| (n, edges + 1)));
            }
        }
        None
    }

    /// Whether `target` can be reached from this node over at least one edge.
    pub fn has_path_to_node(&self, target: &GraphNode<T>) -> bool {
        self.min_path_length_to_node(target).is_some()
    }

    /// Whether any cycle can be reached from this node, including one through the node itself.
    pub fn reaches_cycle(&self) -> bool {
        // Nodes on the current depth-first path are `true`, finished nodes `false`.
        let mut on_path: HashMap<NodeId, bool> = HashMap::new();
        let mut stack = vec![(self.clone(), self.out_connections().into_iter())];
        on_path.insert(self.id(), true);

        while let Some((node, children)) = stack.last_mut() {
            match children.next() {
                Some(child) => match on_path.get(&child.id()) {
                    Some(true) => return true,
                    Some(false) => {}
                    None => {
                        on_path.insert(child.id(), true);
                        let grandchildren = child.out_connections().into_iter();
                        stack.push((child, grandchildren));
                    }
                },
                None => {
                    on_path.insert(node.id(), false);
                    stack.pop();
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::error::Error;

    fn values(paths: &[Path<i32>]) -> Vec<Vec<i32>> {
        paths
            .iter()
            .map(|path| path.iter().map(|node| *node.value()).collect())
            .collect()
    }

    #[test]
    fn connections_are_idempotent() {
        let a = GraphNode::new(1);
        let b = GraphNode::new(2);

        assert_eq!(a.add_connection_to(&b), Ok(true));
        assert_eq!(a.add_connection_to(&b), Ok(false));
        assert_eq!(a.out_degree(), 1);
    }

    #[test]
    fn identity_is_by_reference() {
        let a = GraphNode::new(1);
        let twin = GraphNode::new(1);
        let source = GraphNode::new(0);

        assert_ne!(a, twin);
        assert_eq!(a, a.clone());
        source.add_connection_to(&a).unwrap();
        source.add_connection_to(&twin).unwrap();
        assert_eq!(source.out_degree(), 2);
    }

    #[test]
    fn remove_connection() {
        let a = GraphNode::new(1);
        let b = GraphNode::new(2);
        let c = GraphNode::new(3);
        a.add_connection_to(&b).unwrap();
        a.add_connection_to(&c).unwrap();

        assert!(a.remove_connection_to(&b));
        assert!(!a.remove_connection_to(&b));
        assert_eq!(a.out_connections(), vec![c]);
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let a = GraphNode::new(1);
        let b = GraphNode::new(2);
        let calls = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&calls);
        a.on_connection_added(move |to| first.borrow_mut().push(("first", *to.value())));
        let second = Rc::clone(&calls);
        a.on_connection_added(move |to| second.borrow_mut().push(("second", *to.value())));
        let removed = Rc::clone(&calls);
        a.on_connection_removed(move |to| removed.borrow_mut().push(("removed", *to.value())));

        a.add_connection_to(&b).unwrap();
        a.add_connection_to(&b).unwrap();
        a.remove_connection_to(&b);
        a.remove_connection_to(&b);

        assert_eq!(
            *calls.borrow(),
            vec![("first", 2), ("second", 2), ("removed", 2)]
        );
    }

    #[test]
    fn unsubscribed_listeners_stay_quiet() {
        let a = GraphNode::new(1);
        let b = GraphNode::new(2);
        let count = Rc::new(Cell::new(0));

        let counter = Rc::clone(&count);
        let id = a.on_connection_added(move |_| counter.set(counter.get() + 1));
        assert_eq!(a.subscription_count(), 1);
        assert!(a.unsubscribe(id));
        assert!(!a.unsubscribe(id));

        a.add_connection_to(&b).unwrap();
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn listener_may_add_connections() {
        let a = GraphNode::new(1);
        let b = GraphNode::new(2);
        let c = GraphNode::new(3);

        let weak_a = a.downgrade();
        let extra = c.clone();
        a.on_connection_added(move |_| {
            if let Some(a) = weak_a.upgrade() {
                a.add_connection_to(&extra).unwrap();
            }
        });

        a.add_connection_to(&b).unwrap();
        assert_eq!(a.out_connections(), vec![b, c]);
    }

    #[test]
    fn guards_reject_before_commit() {
        let a = GraphNode::new(1);
        let b = GraphNode::new(2);
        let added = Rc::new(Cell::new(false));

        let a_id = a.id();
        a.add_connection_guard(move |to| {
            Err(Error::CycleDetected {
                from: a_id,
                to: to.id(),
            })
        });
        let flag = Rc::clone(&added);
        a.on_connection_added(move |_| flag.set(true));

        assert_eq!(
            a.add_connection_to(&b),
            Err(Error::CycleDetected {
                from: a.id(),
                to: b.id()
            })
        );
        assert_eq!(a.out_degree(), 0);
        assert!(!added.get());
    }

    #[test]
    fn paths_through_a_diamond() {
        let a = GraphNode::new(1);
        let b = GraphNode::new(2);
        let c = GraphNode::new(3);
        let d = GraphNode::new(4);
        a.add_connection_to(&b).unwrap();
        b.add_connection_to(&c).unwrap();
        a.add_connection_to(&d).unwrap();
        d.add_connection_to(&c).unwrap();

        assert_eq!(values(&a.paths_to_node(&c)), vec![vec![1, 2, 3], vec![1, 4, 3]]);
        assert_eq!(a.min_path_to_node(&c), Some(vec![a.clone(), b.clone(), c.clone()]));
        assert_eq!(a.min_path_length_to_node(&c), Some(2));
        assert!(c.paths_to_node(&a).is_empty());
        assert_eq!(c.min_path_to_node(&a), None);
        assert_eq!(c.min_path_length_to_node(&a), None);
    }

    #[test]
    fn min_path_prefers_the_first_of_the_shortest() {
        let a = GraphNode::new(1);
        let b = GraphNode::new(2);
        let c = GraphNode::new(3);
        let d = GraphNode::new(4);
        a.add_connection_to(&b).unwrap();
        b.add_connection_to(&c).unwrap();
        c.add_connection_to(&d).unwrap();
        a.add_connection_to(&c).unwrap();
        b.add_connection_to(&d).unwrap();

        assert_eq!(
            values(&a.paths_to_node(&d)),
            vec![vec![1, 2, 3, 4], vec![1, 2, 4], vec![1, 3, 4]]
        );
        assert_eq!(
            a.min_path_to_node(&d).map(|path| path.iter().map(|n| *n.value()).collect::<Vec<_>>()),
            Some(vec![1, 2, 4])
        );
        assert_eq!(a.min_path_length_to_node(&d), Some(2));
    }

    #[test]
    fn self_loop_terminates() {
        let a = GraphNode::new(1);
        a.add_connection_to(&a).unwrap();

        assert_eq!(values(&a.paths_to_node(&a)), vec![vec![1, 1]]);
        assert_eq!(a.min_path_length_to_node(&a), Some(1));
        assert!(a.has_path_to_node(&a));
        a.disconnect_all();
    }

    #[test]
    fn cycle_through_start() {
        let a = GraphNode::new(1);
        let b = GraphNode::new(2);
        let c = GraphNode::new(3);
        a.add_connection_to(&b).unwrap();
        b.add_connection_to(&c).unwrap();
        c.add_connection_to(&a).unwrap();
        b.add_connection_to(&a).unwrap();

        assert_eq!(values(&a.paths_to_node(&a)), vec![vec![1, 2, 3, 1], vec![1, 2, 1]]);
        assert_eq!(a.min_path_length_to_node(&a), Some(2));
        // The cycle doesn't run through `c` twice.
        assert_eq!(values(&a.paths_to_node(&c)), vec![vec![1, 2, 3]]);

        for node in [&a, &b, &c] {
            node.disconnect_all();
        }
    }

    #[test]
    fn no_cycle_means_no_path_to_self() {
        let a = GraphNode::new(1);
        let b = GraphNode::new(2);
        a.add_connection_to(&b).unwrap();

        assert!(!a.has_path_to_node(&a));
        assert!(a.paths_to_node(&a).is_empty());
        assert!(a.has_path_to_node(&b));
    }

    #[test]
    fn reaches_cycle_looks_past_the_start() {
        let a = GraphNode::new(1);
        let b = GraphNode::new(2);
        let c = GraphNode::new(3);
        let d = GraphNode::new(4);
        a.add_connection_to(&b).unwrap();
        a.add_connection_to(&c).unwrap();
        b.add_connection_to(&d).unwrap();
        c.add_connection_to(&d).unwrap();
        assert!(!a.reaches_cycle());

        d.add_connection_to(&c).unwrap();
        assert!(a.reaches_cycle());
        assert!(!a.has_path_to_node(&a));
        assert!(b.reaches_cycle());

        d.disconnect_all();
    }

    #[test]
    fn disconnect_all_releases_cycles() {
        let a = GraphNode::new(1);
        let b = GraphNode::new(2);
        a.add_connection_to(&b).unwrap();
        b.add_connection_to(&a).unwrap();

        let weak_b = b.downgrade();
        b.disconnect_all();
        drop(b);
        assert!(weak_b.upgrade().is_some());
        a.disconnect_all();
        assert!(weak_b.upgrade().is_none());
    }

    #[test]
    fn debug_prints_edges_as_ids() {
        let a = GraphNode::new("a");
        a.add_connection_to(&a).unwrap();
        let printed = format!("{a:?}");
        assert!(printed.contains(&format!("out: [{:?}]", a.id())));
        assert!(printed.contains("\"a\""));
        a.disconnect_all();
    }
}
