//! Rank assignment over acyclic edge lists.
//!
//! All rankers start from a longest-path layering and differ in how they
//! shorten edges afterwards. Every ranker keeps `rank(source) < rank(target)`
//! for each edge and normalizes the smallest rank to 0.

use log::debug;
use petgraph::{
    algo::toposort,
    graph::{DiGraph, NodeIndex},
};

use crate::config::Ranker;

const MAX_BALANCE_PASSES: usize = 32;

struct Adjacency {
    predecessors: Vec<Vec<usize>>,
    successors: Vec<Vec<usize>>,
}

impl Adjacency {
    fn new(node_count: usize, edges: &[(usize, usize)]) -> Self {
        let mut predecessors = vec![Vec::new(); node_count];
        let mut successors = vec![Vec::new(); node_count];
        for &(s, t) in edges {
            successors[s].push(t);
            predecessors[t].push(s);
        }
        Self {
            predecessors,
            successors,
        }
    }
}

/// Ranks `node_count` nodes connected by `edges`, which must be acyclic.
pub fn assign_ranks(node_count: usize, edges: &[(usize, usize)], ranker: Ranker) -> Vec<usize> {
    if node_count == 0 {
        return Vec::new();
    }

    let order = topological_order(node_count, edges);
    let adjacency = Adjacency::new(node_count, edges);

    let mut ranks = longest_path(&order, &adjacency);
    match ranker {
        Ranker::LongestPath => {}
        Ranker::TightTree => tighten(&order, &adjacency, &mut ranks),
        Ranker::NetworkSimplex => balance(&order, &adjacency, &mut ranks),
    }

    normalize(&mut ranks);
    ranks
}

fn topological_order(node_count: usize, edges: &[(usize, usize)]) -> Vec<usize> {
    let mut graph = DiGraph::<(), ()>::with_capacity(node_count, edges.len());
    for _ in 0..node_count {
        graph.add_node(());
    }
    for &(s, t) in edges {
        graph.add_edge(NodeIndex::new(s), NodeIndex::new(t), ());
    }

    match toposort(&graph, None) {
        Ok(order) => order.into_iter().map(NodeIndex::index).collect(),
        Err(cycle) => {
            debug!(
                node = cycle.node_id().index();
                "Ranking input is cyclic, falling back to index order"
            );
            (0..node_count).collect()
        }
    }
}

fn longest_path(order: &[usize], adjacency: &Adjacency) -> Vec<usize> {
    let mut ranks = vec![0; order.len()];
    for &node in order {
        for &successor in &adjacency.successors[node] {
            ranks[successor] = ranks[successor].max(ranks[node] + 1);
        }
    }
    ranks
}

/// Pulls every node with successors down to just above its nearest successor.
fn tighten(order: &[usize], adjacency: &Adjacency, ranks: &mut [usize]) {
    for &node in order.iter().rev() {
        if let Some(nearest) = adjacency.successors[node].iter().map(|&s| ranks[s]).min() {
            ranks[node] = ranks[node].max(nearest.saturating_sub(1));
        }
    }
}

/// Moves each node within its feasible interval toward the side with more
/// incident edges. Every move strictly shortens the total edge length, so
/// the passes terminate.
fn balance(order: &[usize], adjacency: &Adjacency, ranks: &mut [usize]) {
    for _ in 0..MAX_BALANCE_PASSES {
        let mut changed = false;
        for &node in order {
            let incoming = adjacency.predecessors[node].len();
            let outgoing = adjacency.successors[node].len();

            let target = if incoming > outgoing {
                adjacency.predecessors[node]
                    .iter()
                    .map(|&p| ranks[p] + 1)
                    .max()
            } else if outgoing > incoming {
                adjacency.successors[node]
                    .iter()
                    .map(|&s| ranks[s].saturating_sub(1))
                    .min()
            } else {
                None
            };

            match target {
                Some(target) if target != ranks[node] => {
                    ranks[node] = target;
                    changed = true;
                }
                _ => {}
            }
        }
        if !changed {
            break;
        }
    }
}

fn normalize(ranks: &mut [usize]) {
    if let Some(&min) = ranks.iter().min() {
        for rank in ranks.iter_mut() {
            *rank -= min;
        }
    }
}
