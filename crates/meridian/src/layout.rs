//! Layout algorithm families.
//!
//! Every algorithm is a free function from `(nodes, edges, options)` to a new
//! node list. The output keeps the input order and ids, never moves locked
//! nodes, and only contains finite positions. Algorithms that need an
//! auxiliary key (a cluster attribute, a root node, ...) take it as a plain
//! argument; validating and deriving those keys is the engine's job.

mod common;

pub mod circular;
pub mod force;
pub mod hierarchical;
pub mod timeline;

pub use circular::{apply_circular, apply_radial, apply_spiral};
pub use force::{apply_clustered_force, apply_force};
pub use hierarchical::{apply_hierarchical, apply_layered, apply_tree, detect_optimal_direction};
pub use timeline::{apply_swim_lane, apply_timeline};
