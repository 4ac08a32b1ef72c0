//! Algorithm recommendation and size-based option tuning.

use std::f32::consts::TAU;

use log::debug;

use meridian_core::{Edge, Node};

use crate::{
    config::{
        CircularOptions, ClusteredForceConfig, ForceOptions, HierarchicalOptions, LayeredConfig,
        LayoutConfig, LayoutKind, RadialConfig, Ranker, SwimLaneConfig, TimelineOptions,
        TreeConfig,
    },
    graph::GraphIndex,
};

/// Attributes checked, in order, for timestamps.
const TIME_KEYS: [&str; 2] = ["createdAt", "timestamp"];

/// Hierarchical layouts are recommended for DAGs below this many nodes.
const HIERARCHICAL_MAX_NODES: usize = 50;
/// Circular layouts are recommended for dense graphs below this many nodes.
const CIRCULAR_MAX_NODES: usize = 100;
/// Edge/node ratio above which a graph counts as dense.
const CIRCULAR_MIN_DENSITY: f32 = 2.0;

/// Distance between consecutive nodes on an auto-sized ring.
const RING_ARC_PER_NODE: f32 = 60.0;

/// Returns true if the directed graph has no cycle.
///
/// Self-loops are cycles. Edges with unknown endpoints are ignored.
///
/// # Examples
///
/// ```
/// use meridian::is_directed_acyclic;
/// use meridian_core::{Edge, Node};
///
/// let nodes = vec![Node::new("a"), Node::new("b"), Node::new("c")];
/// let mut edges = vec![Edge::new("ab", "a", "b"), Edge::new("bc", "b", "c")];
/// assert!(is_directed_acyclic(&nodes, &edges));
///
/// edges.push(Edge::new("ca", "c", "a"));
/// assert!(!is_directed_acyclic(&nodes, &edges));
/// ```
pub fn is_directed_acyclic(nodes: &[Node], edges: &[Edge]) -> bool {
    GraphIndex::new(nodes, edges).is_acyclic()
}

/// Suggests a layout algorithm from the shape of the graph.
///
/// In order of precedence:
///
/// 1. an empty graph gets [`LayoutKind::Force`],
/// 2. any node with a usable `createdAt` or `timestamp` attribute gets
///    [`LayoutKind::Timeline`],
/// 3. a DAG with fewer than 50 nodes gets [`LayoutKind::Hierarchical`],
/// 4. a graph with more than two edges per node and fewer than 100 nodes gets
///    [`LayoutKind::Circular`],
/// 5. everything else gets [`LayoutKind::Force`].
pub fn recommend_layout(nodes: &[Node], edges: &[Edge]) -> LayoutKind {
    if nodes.is_empty() {
        return LayoutKind::Force;
    }

    let kind = if detect_time_key(nodes).is_some() {
        LayoutKind::Timeline
    } else {
        let graph = GraphIndex::new(nodes, edges);
        let density = graph.edges().len() as f32 / nodes.len() as f32;

        if nodes.len() < HIERARCHICAL_MAX_NODES && graph.is_acyclic() {
            LayoutKind::Hierarchical
        } else if density > CIRCULAR_MIN_DENSITY && nodes.len() < CIRCULAR_MAX_NODES {
            LayoutKind::Circular
        } else {
            LayoutKind::Force
        }
    };

    debug!(recommended:? = kind, node_count = nodes.len(); "Recommended layout");
    kind
}

/// Default options for `kind`, scaled to the size of the graph.
///
/// - Force layouts get fewer iterations, weaker charge and a larger area as
///   the graph grows.
/// - Hierarchical layouts get wider spacing as edge density grows; trees use
///   the tight-tree ranker.
/// - Timelines get tighter spacing for large graphs, about `sqrt(n)` tracks
///   (3 to 10) and the first well-known attribute that carries timestamps.
/// - Circular layouts get a radius that leaves about 60 units between
///   neighboring nodes.
///
/// Auxiliary keys (cluster, layer, lane, root) are left unset.
pub fn auto_options(kind: LayoutKind, nodes: &[Node], edges: &[Edge]) -> LayoutConfig {
    let graph = GraphIndex::new(nodes, edges);
    let node_count = nodes.len();
    let density = if node_count == 0 {
        0.0
    } else {
        graph.edges().len() as f32 / node_count as f32
    };

    let config = match kind {
        LayoutKind::Force => LayoutConfig::Force(force_options(node_count)),
        LayoutKind::ClusteredForce => LayoutConfig::ClusteredForce(ClusteredForceConfig {
            force: force_options(node_count),
            ..ClusteredForceConfig::default()
        }),
        LayoutKind::Hierarchical => LayoutConfig::Hierarchical(hierarchical_options(density)),
        LayoutKind::Tree => LayoutConfig::Tree(TreeConfig {
            hierarchy: HierarchicalOptions {
                ranker: Ranker::TightTree,
                ..hierarchical_options(density)
            },
            ..TreeConfig::default()
        }),
        LayoutKind::Layered => LayoutConfig::Layered(LayeredConfig {
            hierarchy: hierarchical_options(density),
            ..LayeredConfig::default()
        }),
        LayoutKind::Timeline => LayoutConfig::Timeline(timeline_options(nodes)),
        LayoutKind::SwimLane => LayoutConfig::SwimLane(SwimLaneConfig {
            timeline: timeline_options(nodes),
            ..SwimLaneConfig::default()
        }),
        LayoutKind::Circular => LayoutConfig::Circular(circular_options(node_count)),
        LayoutKind::Radial => LayoutConfig::Radial(RadialConfig {
            circular: circular_options(node_count),
            ..RadialConfig::default()
        }),
        LayoutKind::Spiral => LayoutConfig::Spiral(circular_options(node_count)),
    };

    debug!(algorithm:? = kind, node_count, density; "Tuned layout options");
    config
}

/// First well-known key under which some node has a usable timestamp.
fn detect_time_key(nodes: &[Node]) -> Option<&'static str> {
    TIME_KEYS.into_iter().find(|key| {
        nodes.iter().any(|node| {
            node.attribute(key)
                .and_then(|value| value.as_timestamp_millis())
                .is_some()
        })
    })
}

fn force_options(node_count: usize) -> ForceOptions {
    let defaults = ForceOptions::default();
    let iterations = match node_count {
        0..100 => 300,
        100..500 => 200,
        500..1000 => 100,
        _ => 50,
    };
    // Grows with sqrt(n) past 50 nodes
    let scale = (node_count as f32 / 50.0).sqrt().max(1.0);

    ForceOptions {
        iterations,
        charge_strength: (defaults.charge_strength / scale).min(-30.0),
        width: defaults.width * scale,
        height: defaults.height * scale,
        ..defaults
    }
}

fn hierarchical_options(density: f32) -> HierarchicalOptions {
    let defaults = HierarchicalOptions::default();
    let factor = 1.0 + (density - 1.0).clamp(0.0, 3.0) * 0.5;
    HierarchicalOptions {
        node_spacing: defaults.node_spacing * factor,
        rank_spacing: defaults.rank_spacing * factor,
        ..defaults
    }
}

fn timeline_options(nodes: &[Node]) -> TimelineOptions {
    let defaults = TimelineOptions::default();
    let node_count = nodes.len();
    let spacing = match node_count {
        0..=50 => defaults.spacing,
        51..=200 => 100.0,
        _ => 80.0,
    };

    TimelineOptions {
        time_key: detect_time_key(nodes)
            .map(str::to_string)
            .unwrap_or(defaults.time_key.clone()),
        spacing,
        max_tracks: ((node_count as f32).sqrt().round() as usize).clamp(3, 10),
        ..defaults
    }
}

fn circular_options(node_count: usize) -> CircularOptions {
    let defaults = CircularOptions::default();
    let radius = node_count as f32 * RING_ARC_PER_NODE / TAU;
    CircularOptions {
        radius: radius.max(defaults.radius),
        ..defaults
    }
}
