//! Force-directed layout.
//!
//! Nodes repel each other, edges act as springs toward a preferred length, and
//! a weak pull keeps everything near the center of the layout area. The
//! clustered variant adds a pull toward one virtual center per attribute
//! value, so nodes sharing a value end up near each other.
//!
//! Both variants are deterministic: the random jitter used to separate
//! coincident nodes comes from a fixed-seed generator.

mod simulation;

use std::f32::consts::{PI, TAU};

use log::debug;

use meridian_core::{Edge, Node, Point};

use crate::{
    config::ForceOptions,
    graph::GraphIndex,
    layout::common::{self, Group},
};

use simulation::{ClusterPull, Simulation};

/// Runs a force-directed simulation.
///
/// Unlocked nodes start at their current position; locked nodes are pinned
/// but still repel and attract their neighbors. An empty node list or
/// `iterations == 0` returns the input positions unchanged.
///
/// # Examples
///
/// ```
/// use meridian::{apply_force, config::ForceOptions};
/// use meridian_core::{Edge, Node};
///
/// let nodes = vec![Node::new("a"), Node::new("b")];
/// let edges = vec![Edge::new("ab", "a", "b")];
/// let laid_out = apply_force(&nodes, &edges, &ForceOptions::default());
///
/// assert_eq!(laid_out.len(), 2);
/// assert!(laid_out.iter().all(|node| node.position().is_finite()));
/// ```
pub fn apply_force(nodes: &[Node], edges: &[Edge], options: &ForceOptions) -> Vec<Node> {
    if nodes.is_empty() || options.iterations == 0 {
        return common::place(nodes, &common::input_positions(nodes));
    }

    let graph = GraphIndex::new(nodes, edges);
    debug!(
        node_count = nodes.len(),
        edge_count = graph.edges().len(),
        iterations = options.iterations;
        "Running force layout"
    );

    let positions = simulation(&graph, options).run();
    common::place(nodes, &positions)
}

/// Runs a force-directed simulation with an extra pull toward cluster centers.
///
/// Nodes are grouped by the attribute at `cluster_key`; nodes without it
/// form one extra group. Group centers sit evenly on a ring around the area
/// center, and every free node is pulled toward its group center with
/// `cluster_strength`.
pub fn apply_clustered_force(
    nodes: &[Node],
    edges: &[Edge],
    cluster_key: &str,
    options: &ForceOptions,
    cluster_strength: f32,
) -> Vec<Node> {
    if nodes.is_empty() || options.iterations == 0 {
        return common::place(nodes, &common::input_positions(nodes));
    }

    let graph = GraphIndex::new(nodes, edges);
    let groups = common::group_by_attribute(&graph, cluster_key);
    debug!(
        node_count = nodes.len(),
        cluster_count = groups.len(),
        cluster_key;
        "Running clustered force layout"
    );

    let area_center = Point::new(options.width / 2.0, options.height / 2.0);
    let clusters = ClusterPull {
        centers: cluster_centers(&groups, nodes.len(), area_center, options.link_distance),
        strength: cluster_strength,
    };

    let positions = simulation(&graph, options).with_clusters(clusters).run();
    common::place(nodes, &positions)
}

fn simulation(graph: &GraphIndex<'_>, options: &ForceOptions) -> Simulation {
    let nodes = graph.nodes();
    Simulation::new(
        common::input_positions(nodes),
        nodes.iter().map(Node::is_locked).collect(),
        graph.proper_edges(),
        options,
    )
}

/// Center of every node's group, with one center per group evenly spaced on
/// a ring. Neighboring centers sit about two link lengths apart.
fn cluster_centers(
    groups: &[Group],
    node_count: usize,
    area_center: Point,
    link_distance: f32,
) -> Vec<Point> {
    let mut centers = vec![area_center; node_count];
    if groups.len() < 2 {
        return centers;
    }

    let ring_radius = groups.len() as f32 * link_distance.max(1.0) / PI;
    let step = TAU / groups.len() as f32;
    for (k, group) in groups.iter().enumerate() {
        let center = area_center.polar_offset(ring_radius, k as f32 * step);
        for &member in &group.members {
            centers[member] = center;
        }
    }
    centers
}
