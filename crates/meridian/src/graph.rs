//! Index over a borrowed node/edge set.
//!
//! Layout algorithms work on node indices rather than string ids. [`GraphIndex`]
//! resolves edge endpoints once, drops edges that reference unknown ids, and
//! exposes the adjacency views the algorithms need:
//!
//! - degree and undirected neighbor lists (circular, radial, timeline),
//! - incoming-edge counts and roots (tree root derivation),
//! - a petgraph [`DiGraph`] with cycle detection and cycle breaking
//!   (hierarchical ranking, DAG detection).
//!
//! The index borrows its inputs and never mutates them.

use std::collections::{HashMap, HashSet};

use log::trace;
use petgraph::{
    graph::{DiGraph, NodeIndex},
    visit::{Control, DfsEvent, depth_first_search},
};

use meridian_core::{AttributeValue, Edge, Node};

/// Borrowed view of a graph with resolved edge endpoints.
#[derive(Debug)]
pub struct GraphIndex<'a> {
    nodes: &'a [Node],
    index: HashMap<&'a str, usize>,
    edges: Vec<(usize, usize)>,
}

impl<'a> GraphIndex<'a> {
    /// Builds the index. Edges whose source or target is unknown are dropped.
    ///
    /// If an id occurs more than once the first occurrence wins.
    pub fn new(nodes: &'a [Node], edges: &[Edge]) -> Self {
        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            index.entry(node.id()).or_insert(i);
        }

        let resolved: Vec<(usize, usize)> = edges
            .iter()
            .filter_map(|edge| {
                let source = index.get(edge.source())?;
                let target = index.get(edge.target())?;
                Some((*source, *target))
            })
            .collect();

        if resolved.len() < edges.len() {
            trace!(
                dropped = edges.len() - resolved.len();
                "Ignoring edges with unknown endpoints"
            );
        }

        Self {
            nodes,
            index,
            edges: resolved,
        }
    }

    /// Returns the indexed nodes
    pub fn nodes(&self) -> &'a [Node] {
        self.nodes
    }

    /// Returns the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the index of the node with the given id
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Returns all valid edges as `(source, target)` index pairs, self-loops included.
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Returns valid edges without self-loops.
    pub fn proper_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges.iter().copied().filter(|(s, t)| s != t)
    }

    /// Number of incident proper edges per node, counting both directions.
    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.nodes.len()];
        for (s, t) in self.proper_edges() {
            degrees[s] += 1;
            degrees[t] += 1;
        }
        degrees
    }

    /// Number of incoming proper edges per node.
    pub fn in_degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.nodes.len()];
        for (_, t) in self.proper_edges() {
            degrees[t] += 1;
        }
        degrees
    }

    /// Indices of nodes without incoming proper edges, in input order.
    pub fn roots(&self) -> impl Iterator<Item = usize> {
        self.in_degrees()
            .into_iter()
            .enumerate()
            .filter_map(|(i, d)| (d == 0).then_some(i))
    }

    /// Neighbor lists treating every proper edge as undirected.
    ///
    /// Neighbors appear in edge order; parallel edges produce repeated entries.
    pub fn undirected_adjacency(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.nodes.len()];
        for (s, t) in self.proper_edges() {
            adjacency[s].push(t);
            adjacency[t].push(s);
        }
        adjacency
    }

    /// Symmetric connectivity test over proper edges.
    pub fn connections(&self) -> ConnectionSet {
        let mut pairs = HashSet::new();
        for (s, t) in self.proper_edges() {
            pairs.insert((s.min(t), s.max(t)));
        }
        ConnectionSet { pairs }
    }

    /// Directed petgraph view; node weights are the node indices.
    ///
    /// `NodeIndex::new(i)` in the returned graph corresponds to node `i`.
    pub fn digraph(&self) -> DiGraph<usize, ()> {
        build_digraph(self.nodes.len(), &self.edges)
    }

    /// Proper edges with every depth-first back-edge reversed.
    ///
    /// See [`acyclic_edges`].
    pub fn acyclic_edges(&self) -> Vec<(usize, usize)> {
        acyclic_edges(self.nodes.len(), &self.edges)
    }

    /// Returns true if a depth-first search finds no back-edge.
    pub fn is_acyclic(&self) -> bool {
        let graph = self.digraph();
        let result = depth_first_search(&graph, graph.node_indices(), |event| {
            if let DfsEvent::BackEdge(..) = event {
                return Control::Break(());
            }
            Control::Continue
        });
        !matches!(result, Control::Break(()))
    }

    /// Looks up an attribute on the node at `index`.
    pub fn attribute(&self, index: usize, key: &str) -> Option<&'a AttributeValue> {
        self.nodes[index].attribute(key)
    }
}

fn build_digraph(node_count: usize, edges: &[(usize, usize)]) -> DiGraph<usize, ()> {
    let mut graph = DiGraph::with_capacity(node_count, edges.len());
    for i in 0..node_count {
        graph.add_node(i);
    }
    for &(s, t) in edges {
        graph.add_edge(NodeIndex::new(s), NodeIndex::new(t), ());
    }
    graph
}

/// Drops self-loops and reverses every back-edge of a depth-first search
/// started from each node in index order.
///
/// The result is acyclic for any input. Callers that want a particular node
/// to stay a source should give it index 0.
pub fn acyclic_edges(node_count: usize, edges: &[(usize, usize)]) -> Vec<(usize, usize)> {
    let graph = build_digraph(node_count, edges);
    let mut back_edges = HashSet::new();
    depth_first_search(&graph, graph.node_indices(), |event| {
        if let DfsEvent::BackEdge(u, v) = event {
            back_edges.insert((u.index(), v.index()));
        }
    });

    edges
        .iter()
        .copied()
        .filter(|(s, t)| s != t)
        .map(|(s, t)| {
            if back_edges.contains(&(s, t)) {
                (t, s)
            } else {
                (s, t)
            }
        })
        .collect()
}

/// Unordered set of connected node pairs.
#[derive(Debug, Default)]
pub struct ConnectionSet {
    pairs: HashSet<(usize, usize)>,
}

impl ConnectionSet {
    /// Returns true if an edge joins `a` and `b` in either direction.
    pub fn connected(&self, a: usize, b: usize) -> bool {
        self.pairs.contains(&(a.min(b), a.max(b)))
    }
}
