//! Ranked (layered) layouts for directed graphs.
//!
//! Nodes get an integer rank so that edges point from lower to higher ranks,
//! ranks are stacked along the primary axis and nodes of one rank are spread
//! along the secondary axis. Cycles are broken first by reversing the
//! back-edges of a depth-first search, so cyclic input is ranked on a best
//! effort basis instead of failing.
//!
//! Three entry points share the placement step:
//!
//! - [`apply_hierarchical`] ranks the whole graph.
//! - [`apply_tree`] anchors the nodes reachable from a root at rank 0 and
//!   stacks everything else after them.
//! - [`apply_layered`] takes ranks from a node attribute instead of edges.

mod ordering;
mod rank;

use log::{debug, trace};
use petgraph::{graph::NodeIndex, visit::Bfs};

use meridian_core::{Edge, Node, Point};

use crate::{
    config::{Direction, HierarchicalOptions, Ranker},
    graph::{GraphIndex, acyclic_edges},
    layout::common,
};

/// Ranks every node from the edge structure and places the ranks.
///
/// Locked nodes are ranked like any other node, so their neighbors are
/// placed consistently, but they keep their input position.
///
/// # Examples
///
/// ```
/// use meridian::{apply_hierarchical, config::HierarchicalOptions};
/// use meridian_core::{Edge, Node};
///
/// let nodes = vec![Node::new("a"), Node::new("b"), Node::new("c")];
/// let edges = vec![Edge::new("ab", "a", "b"), Edge::new("bc", "b", "c")];
/// let laid_out = apply_hierarchical(&nodes, &edges, &HierarchicalOptions::default());
///
/// let ys: Vec<f32> = laid_out.iter().map(|node| node.position().y()).collect();
/// assert!(ys[0] < ys[1] && ys[1] < ys[2]);
/// ```
pub fn apply_hierarchical(
    nodes: &[Node],
    edges: &[Edge],
    options: &HierarchicalOptions,
) -> Vec<Node> {
    let graph = GraphIndex::new(nodes, edges);
    let dag = graph.acyclic_edges();
    let ranks = rank::assign_ranks(graph.node_count(), &dag, options.ranker);
    let layers = ordering::order_ranks(&ranks, &dag);

    debug!(
        node_count = nodes.len(),
        rank_count = layers.len(),
        ranker:? = options.ranker,
        direction:? = options.direction;
        "Applying hierarchical layout"
    );

    common::place(nodes, &place_layers(&layers, nodes.len(), options))
}

/// Ranks the tree reachable from `root_id` first, with the root at rank 0.
///
/// Nodes not reachable over directed edges are ranked on their own and
/// stacked after the tree. An unknown `root_id` leaves every node
/// unreachable, which is equivalent to [`apply_hierarchical`].
pub fn apply_tree(
    nodes: &[Node],
    edges: &[Edge],
    root_id: &str,
    options: &HierarchicalOptions,
) -> Vec<Node> {
    let graph = GraphIndex::new(nodes, edges);

    let tree = match graph.index_of(root_id) {
        Some(root) => reachable_from(&graph, root),
        None => {
            debug!(root_id; "Tree root is not a node, ranking the whole graph");
            Vec::new()
        }
    };

    let mut in_tree = vec![false; nodes.len()];
    for &node in &tree {
        in_tree[node] = true;
    }
    let rest: Vec<usize> = (0..nodes.len()).filter(|&i| !in_tree[i]).collect();

    let mut ranks = vec![0; nodes.len()];
    let mut dag = Vec::new();
    let tree_depth = rank_subgraph(&graph, &tree, options.ranker, 0, &mut ranks, &mut dag);
    rank_subgraph(&graph, &rest, options.ranker, tree_depth, &mut ranks, &mut dag);

    let layers = ordering::order_ranks(&ranks, &dag);
    debug!(
        node_count = nodes.len(),
        tree_size = tree.len(),
        rank_count = layers.len();
        "Applying tree layout"
    );

    common::place(nodes, &place_layers(&layers, nodes.len(), options))
}

/// Places one rank per value of the `layer_key` attribute.
///
/// Layer keys sort numerically when all of them parse as numbers and
/// lexically otherwise. Nodes without the attribute form the last layer.
/// Within a layer nodes keep input order.
pub fn apply_layered(
    nodes: &[Node],
    edges: &[Edge],
    layer_key: &str,
    options: &HierarchicalOptions,
) -> Vec<Node> {
    let graph = GraphIndex::new(nodes, edges);
    let mut groups = common::group_by_attribute(&graph, layer_key);
    common::sort_groups(&mut groups);

    for group in &groups {
        trace!(layer:? = group.key, size = group.members.len(); "Layer");
    }
    debug!(
        node_count = nodes.len(),
        layer_count = groups.len(),
        layer_key;
        "Applying layered layout"
    );

    let layers: Vec<Vec<usize>> = groups.into_iter().map(|group| group.members).collect();
    common::place(nodes, &place_layers(&layers, nodes.len(), options))
}

/// Suggests a direction from the positions the nodes already have.
///
/// Sums `target - source` over all valid edges. A dominant horizontal
/// displacement gives `LR` (or `RL` when it points left), otherwise `TB`
/// (or `BT` when it points up). Without edges the answer is `TB`.
pub fn detect_optimal_direction(nodes: &[Node], edges: &[Edge]) -> Direction {
    let graph = GraphIndex::new(nodes, edges);
    let displacement = graph
        .proper_edges()
        .map(|(s, t)| nodes[t].position().sub_point(nodes[s].position()))
        .filter(|delta| delta.is_finite())
        .fold(Point::default(), Point::add_point);

    if displacement.x().abs() > displacement.y().abs() {
        if displacement.x() < 0.0 {
            Direction::RL
        } else {
            Direction::LR
        }
    } else if displacement.y() < 0.0 {
        Direction::BT
    } else {
        Direction::TB
    }
}

/// Nodes reachable from `root` along directed edges, in BFS order with the
/// root first.
fn reachable_from(graph: &GraphIndex<'_>, root: usize) -> Vec<usize> {
    let digraph = graph.digraph();
    let mut bfs = Bfs::new(&digraph, NodeIndex::new(root));
    let mut reachable = Vec::new();
    while let Some(node) = bfs.next(&digraph) {
        reachable.push(node.index());
    }
    reachable
}

/// Ranks the subgraph induced by `members`, writing `offset + rank` into
/// `ranks` and the subgraph's acyclic edges into `dag`.
///
/// `members[0]` is the first node of the depth-first search that breaks
/// cycles, so it never has incoming edges afterwards. Returns the offset for
/// the next subgraph.
fn rank_subgraph(
    graph: &GraphIndex<'_>,
    members: &[usize],
    ranker: Ranker,
    offset: usize,
    ranks: &mut [usize],
    dag: &mut Vec<(usize, usize)>,
) -> usize {
    if members.is_empty() {
        return offset;
    }

    let mut local = vec![None; graph.node_count()];
    for (k, &node) in members.iter().enumerate() {
        local[node] = Some(k);
    }
    let local_edges: Vec<(usize, usize)> = graph
        .proper_edges()
        .filter_map(|(s, t)| Some((local[s]?, local[t]?)))
        .collect();

    let local_dag = acyclic_edges(members.len(), &local_edges);
    let local_ranks = rank::assign_ranks(members.len(), &local_dag, ranker);

    for (k, &node) in members.iter().enumerate() {
        ranks[node] = offset + local_ranks[k];
    }
    dag.extend(local_dag.iter().map(|&(s, t)| (members[s], members[t])));

    offset + local_ranks.iter().max().map_or(0, |max| max + 1)
}

/// Coordinates for every node given its rank and its slot within the rank.
fn place_layers(
    layers: &[Vec<usize>],
    node_count: usize,
    options: &HierarchicalOptions,
) -> Vec<Point> {
    let horizontal = options.direction.is_horizontal();
    let (primary_extent, secondary_extent) = if horizontal {
        (options.node_width, options.node_height)
    } else {
        (options.node_height, options.node_width)
    };
    let rank_step = options.rank_spacing + primary_extent;
    let node_step = options.node_spacing + secondary_extent;

    let widest = layers.iter().map(Vec::len).max().unwrap_or(0);
    let last_rank = layers.len().saturating_sub(1);
    let bias = options.align.bias();

    let mut positions = vec![Point::default(); node_count];
    for (rank, layer) in layers.iter().enumerate() {
        let slot = if options.direction.is_mirrored() {
            last_rank - rank
        } else {
            rank
        };
        let primary = slot as f32 * rank_step;
        let offset = (widest - layer.len()) as f32 * node_step * bias;

        for (i, &node) in layer.iter().enumerate() {
            let secondary = offset + i as f32 * node_step;
            positions[node] = if horizontal {
                Point::new(primary, secondary)
            } else {
                Point::new(secondary, primary)
            };
        }
    }
    positions
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::config::Align;

    fn chain() -> (Vec<Node>, Vec<Edge>) {
        let nodes = ["a", "b", "c"].into_iter().map(Node::new).collect();
        let edges = vec![Edge::new("ab", "a", "b"), Edge::new("bc", "b", "c")];
        (nodes, edges)
    }

    fn with_direction(direction: Direction) -> HierarchicalOptions {
        HierarchicalOptions {
            direction,
            ..HierarchicalOptions::default()
        }
    }

    #[test]
    fn test_top_to_bottom_chain() {
        let (nodes, edges) = chain();
        let result = apply_hierarchical(&nodes, &edges, &HierarchicalOptions::default());

        let ys: Vec<f32> = result.iter().map(|n| n.position().y()).collect();
        assert!(ys[0] < ys[1] && ys[1] < ys[2]);
        // rank step is rank_spacing + node_height
        assert_approx_eq!(f32, ys[1] - ys[0], 150.0);
    }

    #[test]
    fn test_bottom_to_top_is_mirrored_and_non_negative() {
        let (nodes, edges) = chain();
        let result = apply_hierarchical(&nodes, &edges, &with_direction(Direction::BT));

        let ys: Vec<f32> = result.iter().map(|n| n.position().y()).collect();
        assert!(ys[0] > ys[1] && ys[1] > ys[2]);
        assert!(ys.iter().all(|&y| y >= 0.0));
    }

    #[test]
    fn test_left_to_right_and_right_to_left() {
        let (nodes, edges) = chain();

        let lr = apply_hierarchical(&nodes, &edges, &with_direction(Direction::LR));
        assert!(lr[0].position().x() < lr[2].position().x());

        let rl = apply_hierarchical(&nodes, &edges, &with_direction(Direction::RL));
        assert!(rl[0].position().x() > rl[2].position().x());
    }

    #[test]
    fn test_cycle_is_ranked_without_looping() {
        let nodes: Vec<Node> = ["a", "b", "c"].into_iter().map(Node::new).collect();
        let edges = vec![
            Edge::new("ab", "a", "b"),
            Edge::new("bc", "b", "c"),
            Edge::new("ca", "c", "a"),
        ];
        let result = apply_hierarchical(&nodes, &edges, &HierarchicalOptions::default());

        assert!(result.iter().all(|n| n.position().is_finite()));
        assert!(result[0].position().y() < result[1].position().y());
        assert!(result[1].position().y() < result[2].position().y());
    }

    #[test]
    fn test_locked_node_keeps_position() {
        let (mut nodes, edges) = chain();
        nodes[1] = Node::new("b").with_position(-7.0, 3.5).with_locked(true);

        let result = apply_hierarchical(&nodes, &edges, &HierarchicalOptions::default());
        assert_eq!(result[1].position(), Point::new(-7.0, 3.5));
        assert!(result[0].position().y() < result[2].position().y());
    }

    #[test]
    fn test_alignment_of_narrow_rank() {
        // a -> b, a -> c: rank 0 holds one node, rank 1 holds two
        let nodes: Vec<Node> = ["a", "b", "c"].into_iter().map(Node::new).collect();
        let edges = vec![Edge::new("ab", "a", "b"), Edge::new("ac", "a", "c")];

        let start = HierarchicalOptions {
            align: Align::Start,
            ..HierarchicalOptions::default()
        };
        let result = apply_hierarchical(&nodes, &edges, &start);
        assert_approx_eq!(f32, result[0].position().x(), 0.0);

        let result = apply_hierarchical(&nodes, &edges, &HierarchicalOptions::default());
        // half of one node step (node_spacing + node_width)
        assert_approx_eq!(f32, result[0].position().x(), 100.0);
    }

    #[test]
    fn test_tree_root_is_first_rank_even_with_incoming_edge() {
        let nodes: Vec<Node> = ["x", "root", "leaf"].into_iter().map(Node::new).collect();
        let edges = vec![Edge::new("1", "x", "root"), Edge::new("2", "root", "leaf")];

        let result = apply_tree(&nodes, &edges, "root", &HierarchicalOptions::default());

        let root_y = result[1].position().y();
        assert_approx_eq!(f32, root_y, 0.0);
        assert!(result[2].position().y() > root_y);
        // "x" is not reachable from the root and is stacked after the tree
        assert!(result[0].position().y() > result[2].position().y());
    }

    #[test]
    fn test_tree_with_unknown_root_matches_hierarchical() {
        let (nodes, edges) = chain();
        let options = HierarchicalOptions::default();
        assert_eq!(
            apply_tree(&nodes, &edges, "ghost", &options),
            apply_hierarchical(&nodes, &edges, &options)
        );
    }

    #[test]
    fn test_layered_sorts_numeric_keys_and_puts_missing_last() {
        let nodes = vec![
            Node::new("a").with_attribute("level", 10),
            Node::new("b").with_attribute("level", 2),
            Node::new("c"),
            Node::new("d").with_attribute("level", "2"),
        ];
        let result = apply_layered(&nodes, &[], "level", &HierarchicalOptions::default());

        let y = |i: usize| result[i].position().y();
        assert_approx_eq!(f32, y(1), y(3));
        assert!(y(1) < y(0));
        assert!(y(0) < y(2));
    }

    #[test]
    fn test_layered_lexical_keys_keep_input_order_within_layer() {
        let nodes = vec![
            Node::new("a").with_attribute("phase", "hypothesis"),
            Node::new("b").with_attribute("phase", "analysis"),
            Node::new("c").with_attribute("phase", "hypothesis"),
        ];
        let options = HierarchicalOptions {
            align: Align::Start,
            ..HierarchicalOptions::default()
        };
        let result = apply_layered(&nodes, &[], "phase", &options);

        assert!(result[1].position().y() < result[0].position().y());
        assert!(result[0].position().x() < result[2].position().x());
    }

    #[test]
    fn test_detect_optimal_direction() {
        let nodes = vec![
            Node::new("a").with_position(0.0, 0.0),
            Node::new("b").with_position(200.0, 10.0),
        ];
        let forward = vec![Edge::new("ab", "a", "b")];
        let backward = vec![Edge::new("ba", "b", "a")];

        assert_eq!(detect_optimal_direction(&nodes, &forward), Direction::LR);
        assert_eq!(detect_optimal_direction(&nodes, &backward), Direction::RL);
        assert_eq!(detect_optimal_direction(&nodes, &[]), Direction::TB);

        let stacked = vec![
            Node::new("a").with_position(0.0, 300.0),
            Node::new("b").with_position(10.0, 0.0),
        ];
        assert_eq!(detect_optimal_direction(&stacked, &forward), Direction::BT);
    }

    #[test]
    fn test_empty_graph() {
        assert!(apply_hierarchical(&[], &[], &HierarchicalOptions::default()).is_empty());
        assert!(apply_tree(&[], &[], "root", &HierarchicalOptions::default()).is_empty());
        assert!(apply_layered(&[], &[], "level", &HierarchicalOptions::default()).is_empty());
    }
}
