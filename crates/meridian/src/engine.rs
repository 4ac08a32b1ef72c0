//! Dispatcher over every layout algorithm.
//!
//! [`apply_layout`] validates the auxiliary keys a configuration needs,
//! derives the ones that have a sensible default, runs the selected
//! algorithm and wraps the result with timing and bounding-box metadata.

mod interpolate;
mod recommend;

pub use interpolate::interpolate_node_positions;
pub use recommend::{auto_options, is_directed_acyclic, recommend_layout};

use std::time::{Duration, Instant};

use log::{debug, info};
use serde::{Serialize, Serializer};

use meridian_core::{Bounds, Edge, Node};

use crate::{
    config::{LayoutConfig, LayoutKind},
    error::ConfigurationError,
    graph::GraphIndex,
    layout,
};

/// Nodes with their new positions plus information about the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutResult {
    nodes: Vec<Node>,
    metadata: LayoutMetadata,
}

impl LayoutResult {
    /// Returns the laid out nodes, in input order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns the run metadata.
    pub fn metadata(&self) -> &LayoutMetadata {
        &self.metadata
    }

    /// Consumes the result, returning the laid out nodes.
    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}

/// Information about one layout run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutMetadata {
    algorithm: LayoutKind,
    node_count: usize,
    /// Number of edges whose endpoints both exist.
    edge_count: usize,
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    duration: Duration,
    bounds: Bounds,
}

impl LayoutMetadata {
    /// Returns the algorithm that produced the layout.
    pub fn algorithm(&self) -> LayoutKind {
        self.algorithm
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns the wall-clock time the algorithm took.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Returns the bounding box of the output positions.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64() * 1000.0)
}

/// Runs the layout algorithm selected by `config`.
///
/// # Arguments
///
/// * `nodes` - Nodes to lay out; ids must be unique
/// * `edges` - Edges between them; edges with unknown endpoints are ignored
/// * `config` - Algorithm and options
///
/// A `tree` layout without a root uses the first node without incoming
/// edges (or the first node); a `radial` layout without a root uses the node
/// with the most connections.
///
/// # Errors
///
/// Returns [`ConfigurationError`] when `clustered-force`, `layered` or
/// `swim-lane` is missing its attribute key, when a configured root is not a
/// node of the graph, or when a root is needed but the graph has no nodes.
///
/// # Examples
///
/// ```
/// use meridian::{apply_layout, config::{LayoutConfig, LayoutKind}};
/// use meridian_core::{Edge, Node};
///
/// let nodes = vec![Node::new("a"), Node::new("b")];
/// let edges = vec![Edge::new("ab", "a", "b")];
///
/// let config = LayoutConfig::default_for(LayoutKind::Hierarchical);
/// let result = apply_layout(&nodes, &edges, &config).expect("hierarchical needs no keys");
///
/// assert_eq!(result.metadata().algorithm(), LayoutKind::Hierarchical);
/// assert_eq!(result.metadata().edge_count(), 1);
/// ```
pub fn apply_layout(
    nodes: &[Node],
    edges: &[Edge],
    config: &LayoutConfig,
) -> Result<LayoutResult, ConfigurationError> {
    let kind = config.kind();
    let graph = GraphIndex::new(nodes, edges);
    let edge_count = graph.edges().len();

    info!(algorithm:? = kind, node_count = nodes.len(), edge_count; "Applying layout");

    let started = Instant::now();
    let laid_out = match config {
        LayoutConfig::Force(options) => layout::apply_force(nodes, edges, options),
        LayoutConfig::ClusteredForce(clustered) => {
            let cluster_key = required(clustered.cluster_key.as_deref(), kind, "cluster_key")?;
            layout::apply_clustered_force(
                nodes,
                edges,
                cluster_key,
                &clustered.force,
                clustered.cluster_strength,
            )
        }
        LayoutConfig::Hierarchical(options) => layout::apply_hierarchical(nodes, edges, options),
        LayoutConfig::Tree(tree) => {
            let root = resolve_root(&graph, tree.root_node_id.as_deref(), kind)?;
            layout::apply_tree(nodes, edges, nodes[root].id(), &tree.hierarchy)
        }
        LayoutConfig::Layered(layered) => {
            let layer_key = required(layered.layer_key.as_deref(), kind, "layer_key")?;
            layout::apply_layered(nodes, edges, layer_key, &layered.hierarchy)
        }
        LayoutConfig::Timeline(options) => layout::apply_timeline(nodes, edges, options),
        LayoutConfig::SwimLane(swim_lane) => {
            let lane_key = required(swim_lane.lane_key.as_deref(), kind, "lane_key")?;
            layout::apply_swim_lane(
                nodes,
                edges,
                lane_key,
                &swim_lane.timeline,
                swim_lane.lane_spacing,
            )
        }
        LayoutConfig::Circular(options) => layout::apply_circular(nodes, edges, options),
        LayoutConfig::Radial(radial) => {
            let root = resolve_root(&graph, radial.root_node_id.as_deref(), kind)?;
            layout::apply_radial(nodes, edges, nodes[root].id(), &radial.circular)
        }
        LayoutConfig::Spiral(options) => layout::apply_spiral(nodes, edges, options),
    };
    let duration = started.elapsed();

    let bounds = Bounds::from_points(laid_out.iter().map(Node::position));
    debug!(
        duration_ms = duration.as_secs_f64() * 1000.0,
        width = bounds.width(),
        height = bounds.height();
        "Layout complete"
    );

    Ok(LayoutResult {
        metadata: LayoutMetadata {
            algorithm: kind,
            node_count: laid_out.len(),
            edge_count,
            duration,
            bounds,
        },
        nodes: laid_out,
    })
}

fn required<'c>(
    value: Option<&'c str>,
    algorithm: LayoutKind,
    key: &'static str,
) -> Result<&'c str, ConfigurationError> {
    value.ok_or_else(|| ConfigurationError::missing_key(algorithm, key))
}

/// Index of the configured root, or of a root derived from the graph.
fn resolve_root(
    graph: &GraphIndex<'_>,
    configured: Option<&str>,
    algorithm: LayoutKind,
) -> Result<usize, ConfigurationError> {
    if let Some(root) = configured {
        return graph
            .index_of(root)
            .ok_or_else(|| ConfigurationError::UnknownRoot {
                algorithm,
                root: root.to_string(),
            });
    }

    let derived = match algorithm {
        LayoutKind::Radial => most_connected(graph),
        _ => graph
            .roots()
            .next()
            .or_else(|| (graph.node_count() > 0).then_some(0)),
    };
    if let Some(root) = derived {
        debug!(algorithm:? = algorithm, root = graph.nodes()[root].id(); "Derived layout root");
    }
    derived.ok_or_else(|| ConfigurationError::missing_key(algorithm, "root_node_id"))
}

/// Node with the highest degree, the first one on ties.
fn most_connected(graph: &GraphIndex<'_>) -> Option<usize> {
    graph
        .degrees()
        .into_iter()
        .enumerate()
        .max_by(|(ia, da), (ib, db)| da.cmp(db).then(ib.cmp(ia)))
        .map(|(index, _)| index)
}
