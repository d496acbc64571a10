//! A mutable directed graph over shared [`GraphNode`]s.
//!
//! A [`Graph`] keeps a membership set of nodes. Adding a node pulls in everything reachable
//! from it, and the graph keeps listening to its members so that edges added later pull their
//! targets in as well. Membership is by identity.
//!
//! # Examples
//!
//! ```
//! use classic_ds::{Graph, GraphNode};
//!
//! let a = GraphNode::new(17);
//! let b = GraphNode::new(19);
//! a.add_connection_to(&b)?;
//!
//! let graph = Graph::new();
//! graph.add_node(&a);
//! assert_eq!(graph.node_count(), 2);
//!
//! // Edges added later are picked up too.
//! let c = GraphNode::new(20);
//! a.add_connection_to(&c)?;
//! assert!(graph.has_node(&c));
//! assert_eq!(graph.enumerate_paths().len(), 2);
//! # Ok::<(), classic_ds::Error>(())
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::error::Result;
use crate::events::{ListenerId, ListenerIds, Listeners};
use crate::graph_node::{GraphNode, Path};

type EdgeListener<T> = dyn Fn(&GraphNode<T>, &GraphNode<T>);
type EdgeGuard<T> = dyn Fn(&GraphNode<T>, &GraphNode<T>) -> Result<()>;

/// A handle to a directed graph. Cloning the handle shares the graph.
pub struct Graph<T: 'static>(Rc<GraphInner<T>>);

struct GraphInner<T> {
    members: RefCell<Vec<Member<T>>>,
    ids: ListenerIds,
    added: Listeners<EdgeListener<T>>,
    removed: Listeners<EdgeListener<T>>,
    guards: Listeners<EdgeGuard<T>>,
}

/// A member node and what the graph registered on it.
struct Member<T> {
    node: GraphNode<T>,
    subscriptions: [ListenerId; 3],
}

impl<T> Drop for GraphInner<T> {
    fn drop(&mut self) {
        for member in self.members.get_mut().drain(..) {
            for id in member.subscriptions {
                member.node.unsubscribe(id);
            }
        }
    }
}

impl<T: 'static> Clone for Graph<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: 'static> Default for Graph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Graph<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph").field("nodes", &self.nodes()).finish()
    }
}

impl<T: 'static> Graph<T> {
    /// An empty graph.
    pub fn new() -> Self {
        Self(Rc::new(GraphInner {
            members: RefCell::new(Vec::new()),
            ids: ListenerIds::default(),
            added: Listeners::default(),
            removed: Listeners::default(),
            guards: Listeners::default(),
        }))
    }

    /// Number of member nodes.
    pub fn node_count(&self) -> usize {
        self.0.members.borrow().len()
    }

    /// The member nodes in the order they joined.
    pub fn nodes(&self) -> Vec<GraphNode<T>> {
        self.0
            .members
            .borrow()
            .iter()
            .map(|member| member.node.clone())
            .collect()
    }

    /// Whether `node` is a member.
    pub fn has_node(&self, node: &GraphNode<T>) -> bool {
        self.0.members.borrow().iter().any(|member| member.node == *node)
    }

    /// Adds `node` and, recursively, every node reachable from it. Returns `false` if `node`
    /// was already a member.
    pub fn add_node(&self, node: &GraphNode<T>) -> bool {
        if self.has_node(node) {
            return false;
        }

        let subscriptions = [
            node.on_connection_added(self.forward(node, |graph, from, to| {
                graph.add_node(to);
                for listener in graph.0.added.snapshot() {
                    listener(from, to);
                }
            })),
            node.on_connection_removed(self.forward(node, |graph, from, to| {
                for listener in graph.0.removed.snapshot() {
                    listener(from, to);
                }
            })),
            node.add_connection_guard({
                let graph = Rc::downgrade(&self.0);
                let from = node.downgrade();
                move |to| match (graph.upgrade(), from.upgrade()) {
                    (Some(graph), Some(from)) => {
                        for guard in graph.guards.snapshot() {
                            guard(&from, to)?;
                        }
                        Ok(())
                    }
                    _ => Ok(()),
                }
            }),
        ];
        self.0.members.borrow_mut().push(Member {
            node: node.clone(),
            subscriptions,
        });
        debug!(node = %node.id(), nodes = self.node_count(), "node added to graph");

        for next in node.out_connections() {
            self.add_node(&next);
        }
        true
    }

    /// Wraps `handler` into a node listener that runs it with this graph and the edge, as
    /// long as both the graph and `from` are alive and `from` is still a member.
    fn forward<F>(&self, from: &GraphNode<T>, handler: F) -> impl Fn(&GraphNode<T>) + 'static
    where
        F: Fn(&Graph<T>, &GraphNode<T>, &GraphNode<T>) + 'static,
    {
        let graph: Weak<GraphInner<T>> = Rc::downgrade(&self.0);
        let from = from.downgrade();
        move |to| {
            let (Some(graph), Some(from)) = (graph.upgrade(), from.upgrade()) else {
                return;
            };
            let graph = Graph(graph);
            if graph.has_node(&from) {
                handler(&graph, &from, to);
            }
        }
    }

    /// Removes `node` and every edge from the remaining members to it. Nodes only reachable
    /// through `node` stay members. Returns `false` if `node` was not a member.
    pub fn remove_node(&self, node: &GraphNode<T>) -> bool {
        let member = {
            let mut members = self.0.members.borrow_mut();
            match members.iter().position(|member| member.node == *node) {
                Some(index) => members.remove(index),
                None => return false,
            }
        };
        for id in member.subscriptions {
            node.unsubscribe(id);
        }
        for remaining in self.nodes() {
            remaining.remove_connection_to(node);
        }
        debug!(node = %node.id(), nodes = self.node_count(), "node removed from graph");
        true
    }

    /// Whether any member lies on a cycle.
    pub fn has_cycle(&self) -> bool {
        self.nodes().iter().any(|node| node.has_path_to_node(node))
    }

    /// Every cycle through every member, as paths that start and end at that member. A cycle
    /// through several members is reported once per member on it.
    pub fn cycles(&self) -> Vec<Path<T>> {
        self.nodes()
            .iter()
            .flat_map(|node| node.paths_to_node(node))
            .collect()
    }

    /// Every simple path between every ordered pair of members, a member paired with itself
    /// included.
    pub fn enumerate_paths(&self) -> Vec<Path<T>> {
        let nodes = self.nodes();
        let mut paths = Vec::new();
        for from in &nodes {
            for to in &nodes {
                paths.extend(from.paths_to_node(to));
            }
        }
        paths
    }

    /// The members matching `predicate`.
    pub fn find_nodes<F>(&self, mut predicate: F) -> Vec<GraphNode<T>>
    where
        F: FnMut(&GraphNode<T>) -> bool,
    {
        self.nodes().into_iter().filter(|node| predicate(node)).collect()
    }

    /// Registers `listener` to be called with `(from, to)` for every edge added from a member.
    /// It runs after the target has joined the graph.
    pub fn on_connection_added<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&GraphNode<T>, &GraphNode<T>) + 'static,
    {
        let id = self.0.ids.next();
        self.0.added.push(id, Rc::new(listener));
        id
    }

    /// Registers `listener` to be called with `(from, to)` for every edge removed from a
    /// member.
    pub fn on_connection_removed<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&GraphNode<T>, &GraphNode<T>) + 'static,
    {
        let id = self.0.ids.next();
        self.0.removed.push(id, Rc::new(listener));
        id
    }

    /// Registers `guard` to vet every new edge from a member before it is added.
    pub fn add_connection_guard<F>(&self, guard: F) -> ListenerId
    where
        F: Fn(&GraphNode<T>, &GraphNode<T>) -> Result<()> + 'static,
    {
        let id = self.0.ids.next();
        self.0.guards.push(id, Rc::new(guard));
        id
    }

    /// Removes a listener or guard registered on this graph. Returns `false` if `id` is not
    /// registered here.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.0.added.remove(id) || self.0.removed.remove(id) || self.0.guards.remove(id)
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
    fn add_node_is_transitive() {
        let a = GraphNode::new(1);
        let b = GraphNode::new(2);
        let c = GraphNode::new(3);
        a.add_connection_to(&b).unwrap();
        b.add_connection_to(&c).unwrap();

        let graph = Graph::new();
        assert!(graph.add_node(&a));
        assert!(!graph.add_node(&c));
        assert_eq!(graph.nodes(), vec![a, b, c]);
    }

    #[test]
    fn enumerate_paths_grows_with_new_edges() {
        let seventeen = GraphNode::new(17);
        let nineteen = GraphNode::new(19);
        seventeen.add_connection_to(&nineteen).unwrap();

        let graph = Graph::new();
        graph.add_node(&seventeen);
        assert_eq!(values(&graph.enumerate_paths()), vec![vec![17, 19]]);

        let twenty = GraphNode::new(20);
        seventeen.add_connection_to(&twenty).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(values(&graph.enumerate_paths()), vec![vec![17, 19], vec![17, 20]]);

        let fifty = GraphNode::new(50);
        twenty.add_connection_to(&fifty).unwrap();
        assert_eq!(
            values(&graph.enumerate_paths()),
            vec![vec![17, 19], vec![17, 20], vec![17, 20, 50], vec![20, 50]]
        );
    }

    #[test]
    fn remove_node_drops_edges_into_it() {
        let a = GraphNode::new(1);
        let b = GraphNode::new(2);
        let c = GraphNode::new(3);
        a.add_connection_to(&b).unwrap();
        c.add_connection_to(&b).unwrap();
        b.add_connection_to(&c).unwrap();

        let graph = Graph::new();
        graph.add_node(&a);
        assert!(graph.remove_node(&b));
        assert!(!graph.remove_node(&b));

        assert_eq!(graph.nodes(), vec![a.clone(), c.clone()]);
        assert_eq!(a.out_degree(), 0);
        assert_eq!(c.out_degree(), 0);
        // The removed node keeps its own edges.
        assert_eq!(b.out_connections(), vec![c]);
    }

    #[test]
    fn removed_nodes_are_no_longer_followed() {
        let a = GraphNode::new(1);
        let b = GraphNode::new(2);
        let graph = Graph::new();
        graph.add_node(&a);
        graph.remove_node(&a);
        assert_eq!(a.subscription_count(), 0);

        a.add_connection_to(&b).unwrap();
        assert!(!graph.has_node(&b));
    }

    #[test]
    fn cycles_and_has_cycle() {
        let a = GraphNode::new(1);
        let b = GraphNode::new(2);
        let c = GraphNode::new(3);
        a.add_connection_to(&b).unwrap();
        b.add_connection_to(&c).unwrap();

        let graph = Graph::new();
        graph.add_node(&a);
        assert!(!graph.has_cycle());
        assert!(graph.cycles().is_empty());

        c.add_connection_to(&b).unwrap();
        assert!(graph.has_cycle());
        assert_eq!(values(&graph.cycles()), vec![vec![2, 3, 2], vec![3, 2, 3]]);

        c.disconnect_all();
    }

    #[test]
    fn graph_listeners_see_member_edges() {
        let a = GraphNode::new(1);
        let b = GraphNode::new(2);
        let outsider = GraphNode::new(99);
        let graph = Graph::new();
        graph.add_node(&a);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let added = Rc::clone(&seen);
        graph.on_connection_added(move |from, to| {
            added.borrow_mut().push(("added", *from.value(), *to.value()))
        });
        let removed = Rc::clone(&seen);
        let removed_id = graph.on_connection_removed(move |from, to| {
            removed.borrow_mut().push(("removed", *from.value(), *to.value()))
        });

        a.add_connection_to(&b).unwrap();
        outsider.add_connection_to(&b).unwrap();
        a.remove_connection_to(&b);
        assert!(graph.unsubscribe(removed_id));
        a.add_connection_to(&b).unwrap();
        a.remove_connection_to(&b);

        assert_eq!(
            *seen.borrow(),
            vec![("added", 1, 2), ("removed", 1, 2), ("added", 1, 2)]
        );
    }

    #[test]
    fn graph_guards_vet_member_edges() {
        let a = GraphNode::new(1);
        let b = GraphNode::new(2);
        let graph = Graph::new();
        graph.add_node(&a);

        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        graph.add_connection_guard(move |from, to| {
            counter.set(counter.get() + 1);
            if *to.value() > 1 {
                Err(Error::CycleDetected {
                    from: from.id(),
                    to: to.id(),
                })
            } else {
                Ok(())
            }
        });

        assert!(a.add_connection_to(&b).is_err());
        assert!(!graph.has_node(&b));
        assert_eq!(a.add_connection_to(&a), Ok(true));
        assert_eq!(calls.get(), 2);
        a.disconnect_all();
    }

    #[test]
    fn dropping_the_graph_unsubscribes() {
        let a = GraphNode::new(1);
        let b = GraphNode::new(2);
        a.add_connection_to(&b).unwrap();

        let graph = Graph::new();
        graph.add_node(&a);
        assert_eq!(a.subscription_count(), 3);
        assert_eq!(b.subscription_count(), 3);

        drop(graph);
        assert_eq!(a.subscription_count(), 0);
        assert_eq!(b.subscription_count(), 0);
    }

    #[test]
    fn find_nodes_filters_members() {
        let a = GraphNode::new(1);
        let b = GraphNode::new(2);
        let c = GraphNode::new(3);
        a.add_connection_to(&b).unwrap();
        a.add_connection_to(&c).unwrap();
        let graph = Graph::new();
        graph.add_node(&a);

        let odd = graph.find_nodes(|node| node.value() % 2 == 1);
        assert_eq!(odd, vec![a, c]);
    }
}
