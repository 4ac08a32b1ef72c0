//! Meridian - graph layout algorithms for node-link visualizations.
//!
//! Given nodes and directed edges, Meridian computes a 2D position for every
//! node using one of four algorithm families:
//!
//! - force-directed simulation, optionally pulling nodes toward cluster
//!   centers,
//! - hierarchical (layered) placement, including rooted trees and layers taken
//!   from a node attribute,
//! - timelines ordered by a timestamp attribute, optionally split into lanes,
//! - circular arrangements: single or concentric rings, radial trees and
//!   spirals.
//!
//! [`apply_layout`] dispatches over all of them from a [`config::LayoutConfig`].
//! [`recommend_layout`] and [`auto_options`] pick an algorithm and options from
//! the shape of the graph, and [`interpolate_node_positions`] blends two
//! layouts for animated transitions.
//!
//! Every algorithm returns the nodes in input order with the same ids, never
//! moves a locked node, and only produces finite coordinates.
//!
//! # Examples
//!
//! ```
//! use meridian::{apply_layout, auto_options, recommend_layout};
//! use meridian_core::{Edge, Node};
//!
//! let nodes = vec![Node::new("api"), Node::new("db"), Node::new("cache")];
//! let edges = vec![Edge::new("e1", "api", "db"), Edge::new("e2", "api", "cache")];
//!
//! let kind = recommend_layout(&nodes, &edges);
//! let config = auto_options(kind, &nodes, &edges);
//! let result = apply_layout(&nodes, &edges, &config).expect("no keys needed");
//!
//! assert_eq!(result.nodes().len(), 3);
//! ```

pub mod config;
pub mod graph;
pub mod layout;

mod engine;
mod error;

pub use meridian_core::{AttributeValue, Attributes, Bounds, Edge, Node, Point};

pub use engine::{
    LayoutMetadata, LayoutResult, apply_layout, auto_options, interpolate_node_positions,
    is_directed_acyclic, recommend_layout,
};
pub use error::ConfigurationError;
pub use layout::{
    apply_circular, apply_clustered_force, apply_force, apply_hierarchical, apply_layered,
    apply_radial, apply_spiral, apply_swim_lane, apply_timeline, apply_tree,
    detect_optimal_direction,
};
