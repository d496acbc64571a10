use std::collections::HashSet;

use classic_ds::{Graph, GraphNode, Tree};

use crate::Edge;

fn nodes() -> Vec<GraphNode<usize>> {
    (0..Edge::NODES).map(GraphNode::new).collect()
}

fn connect(nodes: &[GraphNode<usize>], edges: &[Edge]) {
    for &Edge(from, to) in edges {
        // Only a guard can make this fail and none is registered.
        nodes[from].add_connection_to(&nodes[to]).unwrap();
    }
}

/// Edges are strong handles. Cut them so cyclic graphs don't outlive the test.
fn disconnect(nodes: &[GraphNode<usize>]) {
    for node in nodes {
        node.disconnect_all();
    }
}

#[quickcheck]
fn paths_are_simple_and_end_at_the_target(edges: Vec<Edge>) -> bool {
    let nodes = nodes();
    connect(&nodes, &edges);

    let ok = nodes.iter().all(|from| {
        nodes.iter().all(|to| {
            from.paths_to_node(to).iter().all(|path| {
                let interior: HashSet<_> = path[1..path.len() - 1].iter().map(GraphNode::id).collect();
                path.len() >= 2
                    && path[0] == *from
                    && path[path.len() - 1] == *to
                    && path.windows(2).all(|pair| pair[0].is_connected_to(&pair[1]))
                    && interior.len() == path.len() - 2
                    && !interior.contains(&from.id())
                    && !interior.contains(&to.id())
            })
        })
    });
    disconnect(&nodes);
    ok
}

#[quickcheck]
fn shortest_lengths_agree_with_enumeration(edges: Vec<Edge>) -> bool {
    let nodes = nodes();
    connect(&nodes, &edges);

    let ok = nodes.iter().all(|from| {
        nodes.iter().all(|to| {
            let enumerated = from.min_path_to_node(to).map(|path| path.len() - 1);
            from.min_path_length_to_node(to) == enumerated
                && from.has_path_to_node(to) == enumerated.is_some()
        })
    });
    disconnect(&nodes);
    ok
}

#[quickcheck]
fn duplicate_edges_are_ignored(edges: Vec<Edge>) -> bool {
    let nodes = nodes();
    connect(&nodes, &edges);
    connect(&nodes, &edges);

    let distinct: HashSet<(usize, usize)> = edges.iter().map(|&Edge(from, to)| (from, to)).collect();
    let total: usize = nodes.iter().map(GraphNode::out_degree).sum();
    disconnect(&nodes);
    total == distinct.len()
}

#[quickcheck]
fn graph_tracks_everything_reachable(edges: Vec<Edge>, later: Vec<Edge>) -> bool {
    let nodes = nodes();
    connect(&nodes, &edges);
    let graph = Graph::new();
    graph.add_node(&nodes[0]);
    connect(&nodes, &later);

    let reachable: HashSet<usize> = std::iter::once(0)
        .chain(
            nodes
                .iter()
                .filter(|node| nodes[0].has_path_to_node(node))
                .map(|node| *node.value()),
        )
        .collect();
    let members: HashSet<usize> = graph.nodes().iter().map(|node| *node.value()).collect();
    let has_cycle = nodes.iter().any(|node| graph.has_node(node) && node.reaches_cycle());

    let ok = members == reachable && graph.has_cycle() == has_cycle;
    drop(graph);
    disconnect(&nodes);
    ok
}

#[quickcheck]
fn tree_never_holds_a_cycle(edges: Vec<Edge>) -> bool {
    let nodes = nodes();
    let tree = Tree::new(nodes[0].clone()).unwrap();

    for &Edge(from, to) in &edges {
        let would_close_cycle = tree.graph().has_node(&nodes[from])
            && (from == to || nodes[to].has_path_to_node(&nodes[from]) || nodes[to].reaches_cycle());
        let added = nodes[from].add_connection_to(&nodes[to]);
        if added.is_err() != would_close_cycle {
            return false;
        }
    }

    let ok = !tree.graph().has_cycle() && !nodes[0].reaches_cycle();
    drop(tree);
    disconnect(&nodes);
    ok
}
