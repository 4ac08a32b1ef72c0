//! Circular layouts: a single ring, concentric rings, a radial tree and an
//! Archimedean spiral.
//!
//! Angles start at `start_angle` and advance in the direction of `sweep`.
//! Every node keeps its angular slot even when it is locked; locked nodes
//! are just not moved into it.

use std::{cmp::Ordering, collections::VecDeque, f32::consts::TAU};

use log::debug;

use meridian_core::{Edge, Node, Point};

use crate::{
    config::{CircularOptions, SortBy},
    graph::GraphIndex,
    layout::common::{self, Group},
};

/// Places nodes evenly on a ring, or on one ring per group when
/// `options.concentric` is set.
///
/// Concentric groups come from `options.group_key`, sorted numerically when
/// every key is a number and lexically otherwise, with nodes lacking the
/// attribute outermost. Without a group key nodes are grouped by degree,
/// highest degree innermost. Group `k` sits on radius
/// `radius + k * ring_spacing`.
///
/// # Examples
///
/// ```
/// use meridian::{apply_circular, config::CircularOptions};
/// use meridian_core::Node;
///
/// let nodes: Vec<Node> = (0..4).map(|i| Node::new(format!("n{i}"))).collect();
/// let laid_out = apply_circular(&nodes, &[], &CircularOptions::default());
///
/// // first node at angle 0 on a ring of radius 300 around (500, 500)
/// assert_eq!(laid_out[0].position().x(), 800.0);
/// ```
pub fn apply_circular(nodes: &[Node], edges: &[Edge], options: &CircularOptions) -> Vec<Node> {
    let graph = GraphIndex::new(nodes, edges);
    let order = sorted_order(&graph, options.sort_by);

    let rings = if options.concentric {
        concentric_groups(&graph, &order, options.group_key.as_deref())
    } else {
        vec![order]
    };

    debug!(
        node_count = nodes.len(),
        ring_count = rings.len(),
        sort_by:? = options.sort_by;
        "Applying circular layout"
    );

    let mut positions = common::input_positions(nodes);
    for (k, ring) in rings.iter().enumerate() {
        let radius = options.radius + k as f32 * options.ring_spacing;
        place_ring(ring, radius, options, &mut positions);
    }
    common::place(nodes, &positions)
}

/// Places `root_id` at the center and every other node on the ring of its
/// breadth-first depth.
///
/// Depth `d` sits on radius `radius + (d - 1) * ring_spacing`. Edges are
/// followed in both directions. Nodes not reachable from the root join the
/// outermost ring; an unknown root puts every node on the first ring.
pub fn apply_radial(
    nodes: &[Node],
    edges: &[Edge],
    root_id: &str,
    options: &CircularOptions,
) -> Vec<Node> {
    let graph = GraphIndex::new(nodes, edges);
    let center = Point::new(options.center_x, options.center_y);
    let mut positions = common::input_positions(nodes);

    let rings = match graph.index_of(root_id) {
        Some(root) => {
            positions[root] = center;
            depth_rings(&graph, root)
        }
        None => {
            debug!(root_id; "Radial root is not a node, placing every node on one ring");
            vec![(0..nodes.len()).collect()]
        }
    };

    debug!(
        node_count = nodes.len(),
        depth = rings.len(),
        root_id;
        "Applying radial layout"
    );

    for (k, ring) in rings.iter().enumerate() {
        let radius = options.radius + k as f32 * options.ring_spacing;
        place_ring(ring, radius, options, &mut positions);
    }
    common::place(nodes, &positions)
}

/// Places node `i` at angle `start_angle + i * spiral_step` and radius
/// `spiral_growth * i * spiral_step`.
pub fn apply_spiral(nodes: &[Node], edges: &[Edge], options: &CircularOptions) -> Vec<Node> {
    let graph = GraphIndex::new(nodes, edges);
    let order = sorted_order(&graph, options.sort_by);
    let center = Point::new(options.center_x, options.center_y);

    debug!(
        node_count = nodes.len(),
        spiral_step = options.spiral_step,
        spiral_growth = options.spiral_growth;
        "Applying spiral layout"
    );

    let mut positions = common::input_positions(nodes);
    for (i, &node) in order.iter().enumerate() {
        let theta = i as f32 * options.spiral_step;
        let angle = options.start_angle + options.sweep.sign() * theta;
        positions[node] = center.polar_offset(options.spiral_growth * theta, angle);
    }
    common::place(nodes, &positions)
}

fn place_ring(ring: &[usize], radius: f32, options: &CircularOptions, positions: &mut [Point]) {
    if ring.is_empty() {
        return;
    }
    let center = Point::new(options.center_x, options.center_y);
    let step = options.sweep.sign() * TAU / ring.len() as f32;
    for (i, &node) in ring.iter().enumerate() {
        positions[node] = center.polar_offset(radius, options.start_angle + i as f32 * step);
    }
}

/// Node indices in placement order. Every sort is stable.
fn sorted_order(graph: &GraphIndex<'_>, sort_by: SortBy) -> Vec<usize> {
    let mut order: Vec<usize> = (0..graph.node_count()).collect();
    match sort_by {
        SortBy::None => {}
        SortBy::Degree => {
            let degrees = graph.degrees();
            order.sort_by(|&a, &b| degrees[b].cmp(&degrees[a]));
        }
        SortBy::Weight => {
            let weight = |i: usize| {
                graph
                    .attribute(i, "weight")
                    .and_then(|value| value.as_number())
                    .filter(|w| !w.is_nan())
            };
            order.sort_by(|&a, &b| match (weight(a), weight(b)) {
                (Some(a), Some(b)) => b.total_cmp(&a),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            });
        }
        SortBy::Label => {
            let nodes = graph.nodes();
            let labels: Vec<String> = nodes
                .iter()
                .map(|node| {
                    node.attribute("label")
                        .map(|label| label.as_key())
                        .unwrap_or_else(|| node.id().to_string())
                })
                .collect();
            order.sort_by(|&a, &b| labels[a].cmp(&labels[b]));
        }
    }
    order
}

/// Rings for the concentric layout, innermost first, each in `order`.
fn concentric_groups(
    graph: &GraphIndex<'_>,
    order: &[usize],
    group_key: Option<&str>,
) -> Vec<Vec<usize>> {
    let mut groups = match group_key {
        Some(key) => {
            let mut groups = common::group_by_attribute(graph, key);
            common::sort_groups(&mut groups);
            groups
        }
        None => degree_groups(graph),
    };

    let mut rank = vec![0; graph.node_count()];
    for (k, group) in groups.iter().enumerate() {
        for &member in &group.members {
            rank[member] = k;
        }
    }

    for group in &mut groups {
        group.members.clear();
    }
    for &node in order {
        groups[rank[node]].members.push(node);
    }
    groups.into_iter().map(|group| group.members).collect()
}

/// One group per distinct degree, highest degree first.
fn degree_groups(graph: &GraphIndex<'_>) -> Vec<Group> {
    let degrees = graph.degrees();
    let mut distinct = degrees.clone();
    distinct.sort_unstable_by(|a, b| b.cmp(a));
    distinct.dedup();

    distinct
        .into_iter()
        .map(|degree| Group {
            key: Some(degree.to_string()),
            members: (0..degrees.len()).filter(|&i| degrees[i] == degree).collect(),
        })
        .collect()
}

/// Nodes grouped by breadth-first depth from `root` over undirected edges,
/// starting at depth 1. Unreachable nodes join the last ring.
fn depth_rings(graph: &GraphIndex<'_>, root: usize) -> Vec<Vec<usize>> {
    let adjacency = graph.undirected_adjacency();
    let mut depth: Vec<Option<usize>> = vec![None; graph.node_count()];
    depth[root] = Some(0);

    let mut rings: Vec<Vec<usize>> = Vec::new();
    let mut queue = VecDeque::from([root]);
    while let Some(node) = queue.pop_front() {
        let next = depth[node].map_or(1, |d| d + 1);
        for &neighbor in &adjacency[node] {
            if depth[neighbor].is_some() {
                continue;
            }
            depth[neighbor] = Some(next);
            if rings.len() < next {
                rings.resize_with(next, Vec::new);
            }
            rings[next - 1].push(neighbor);
            queue.push_back(neighbor);
        }
    }

    let unreachable: Vec<usize> = (0..graph.node_count())
        .filter(|&i| depth[i].is_none())
        .collect();
    if !unreachable.is_empty() {
        match rings.last_mut() {
            Some(outermost) => outermost.extend(unreachable),
            None => rings.push(unreachable),
        }
    }
    rings
}

#[cfg(test)]
mod tests {
    use float_cmp::{approx_eq, assert_approx_eq};

    use super::*;
    use crate::config::Sweep;

    fn ring_nodes(count: usize) -> Vec<Node> {
        (0..count).map(|i| Node::new(format!("n{i}"))).collect()
    }

    fn angle_of(node: &Node, options: &CircularOptions) -> f32 {
        let p = node.position();
        (p.y() - options.center_y).atan2(p.x() - options.center_x)
    }

    fn radius_of(node: &Node, options: &CircularOptions) -> f32 {
        node.position()
            .sub_point(Point::new(options.center_x, options.center_y))
            .hypot()
    }

    #[test]
    fn test_six_nodes_are_evenly_spaced() {
        let options = CircularOptions::default();
        let result = apply_circular(&ring_nodes(6), &[], &options);

        let mut total = 0.0;
        for pair in result.windows(2) {
            let step =
                (angle_of(&pair[1], &options) - angle_of(&pair[0], &options)).rem_euclid(TAU);
            assert_approx_eq!(f32, step, TAU / 6.0, epsilon = 1e-4);
            total += step;
        }
        let closing =
            (angle_of(&result[0], &options) - angle_of(&result[5], &options)).rem_euclid(TAU);
        assert_approx_eq!(f32, total + closing, TAU, epsilon = 1e-4);

        for node in &result {
            assert_approx_eq!(f32, radius_of(node, &options), 300.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_counter_clockwise_sweep() {
        let options = CircularOptions {
            sweep: Sweep::CounterClockwise,
            ..CircularOptions::default()
        };
        let result = apply_circular(&ring_nodes(4), &[], &options);
        // a quarter turn backwards from angle 0 points up on a y-down screen
        assert!(result[1].position().y() < options.center_y);
    }

    #[test]
    fn test_sort_by_weight_puts_heaviest_first() {
        let nodes = vec![
            Node::new("light").with_attribute("weight", 1.0),
            Node::new("none"),
            Node::new("heavy").with_attribute("weight", 9.0),
        ];
        let options = CircularOptions {
            sort_by: SortBy::Weight,
            ..CircularOptions::default()
        };
        let result = apply_circular(&nodes, &[], &options);
        assert_approx_eq!(f32, angle_of(&result[2], &options), 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_sort_by_label_falls_back_to_id() {
        let nodes = vec![Node::new("z"), Node::new("m").with_attribute("label", "a")];
        let edges: Vec<Edge> = Vec::new();
        let graph = GraphIndex::new(&nodes, &edges);
        assert_eq!(sorted_order(&graph, SortBy::Label), vec![1, 0]);
    }

    #[test]
    fn test_sort_by_degree_is_stable() {
        let nodes = ring_nodes(4);
        let edges = vec![Edge::new("e", "n2", "n3")];
        let graph = GraphIndex::new(&nodes, &edges);
        assert_eq!(sorted_order(&graph, SortBy::Degree), vec![2, 3, 0, 1]);
    }

    #[test]
    fn test_concentric_by_key() {
        let nodes = vec![
            Node::new("a").with_attribute("tier", 2),
            Node::new("b").with_attribute("tier", 1),
            Node::new("c"),
        ];
        let options = CircularOptions {
            concentric: true,
            group_key: Some("tier".to_string()),
            ..CircularOptions::default()
        };
        let result = apply_circular(&nodes, &[], &options);

        assert_approx_eq!(f32, radius_of(&result[1], &options), 300.0, epsilon = 1e-3);
        assert_approx_eq!(f32, radius_of(&result[0], &options), 400.0, epsilon = 1e-3);
        assert_approx_eq!(f32, radius_of(&result[2], &options), 500.0, epsilon = 1e-3);
    }

    #[test]
    fn test_concentric_by_degree_puts_hub_inside() {
        let nodes = ring_nodes(4);
        let edges = vec![
            Edge::new("e1", "n0", "n1"),
            Edge::new("e2", "n0", "n2"),
            Edge::new("e3", "n0", "n3"),
        ];
        let options = CircularOptions {
            concentric: true,
            ..CircularOptions::default()
        };
        let result = apply_circular(&nodes, &edges, &options);

        assert_approx_eq!(f32, radius_of(&result[0], &options), 300.0, epsilon = 1e-3);
        for node in &result[1..] {
            assert_approx_eq!(f32, radius_of(node, &options), 400.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_radial_rings_by_depth() {
        let nodes = ring_nodes(5);
        let edges = vec![
            Edge::new("e1", "n0", "n1"),
            Edge::new("e2", "n2", "n0"),
            Edge::new("e3", "n1", "n3"),
        ];
        let options = CircularOptions::default();
        let result = apply_radial(&nodes, &edges, "n0", &options);

        assert_eq!(result[0].position(), Point::new(500.0, 500.0));
        assert_approx_eq!(f32, radius_of(&result[1], &options), 300.0, epsilon = 1e-3);
        assert_approx_eq!(f32, radius_of(&result[2], &options), 300.0, epsilon = 1e-3);
        assert_approx_eq!(f32, radius_of(&result[3], &options), 400.0, epsilon = 1e-3);
        // n4 is unreachable and joins the outermost ring
        assert_approx_eq!(f32, radius_of(&result[4], &options), 400.0, epsilon = 1e-3);
    }

    #[test]
    fn test_radial_isolated_root() {
        let options = CircularOptions::default();
        let result = apply_radial(&ring_nodes(3), &[], "n1", &options);
        assert_eq!(result[1].position(), Point::new(500.0, 500.0));
        assert_approx_eq!(f32, radius_of(&result[0], &options), 300.0, epsilon = 1e-3);
        assert_approx_eq!(f32, radius_of(&result[2], &options), 300.0, epsilon = 1e-3);
    }

    #[test]
    fn test_radial_unknown_root_uses_one_ring() {
        let options = CircularOptions::default();
        let result = apply_radial(&ring_nodes(3), &[], "ghost", &options);
        for node in &result {
            assert_approx_eq!(f32, radius_of(node, &options), 300.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_spiral_radius_grows() {
        let options = CircularOptions::default();
        let result = apply_spiral(&ring_nodes(5), &[], &options);

        assert_eq!(result[0].position(), Point::new(500.0, 500.0));
        let radii: Vec<f32> = result.iter().map(|n| radius_of(n, &options)).collect();
        assert!(radii.windows(2).all(|pair| pair[0] < pair[1]));
        // growth 30 per radian, 0.5 radians per node
        assert!(approx_eq!(f32, radii[2], 30.0, epsilon = 1e-3));
    }

    #[test]
    fn test_locked_node_keeps_slot() {
        let mut nodes = ring_nodes(4);
        nodes[0] = Node::new("n0").with_position(1.0, 1.0).with_locked(true);
        let options = CircularOptions::default();
        let result = apply_circular(&nodes, &[], &options);

        assert_eq!(result[0].position(), Point::new(1.0, 1.0));
        // n1 still sits a quarter turn from angle 0
        assert_approx_eq!(f32, angle_of(&result[1], &options), TAU / 4.0, epsilon = 1e-4);
    }

    #[test]
    fn test_empty() {
        let options = CircularOptions::default();
        assert!(apply_circular(&[], &[], &options).is_empty());
        assert!(apply_radial(&[], &[], "root", &options).is_empty());
        assert!(apply_spiral(&[], &[], &options).is_empty());
    }
}
