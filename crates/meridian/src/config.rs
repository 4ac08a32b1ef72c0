//! Configuration types for Meridian layouts.
//!
//! Every algorithm has an option struct whose defaults are the documented
//! defaults of that algorithm. [`LayoutConfig`] is the tagged union that picks
//! one algorithm and carries its options plus any auxiliary key it needs.
//! All types implement [`serde::Deserialize`] so configurations can be loaded
//! from TOML or JSON; missing fields fall back to their defaults.
//!
//! # Example
//!
//! ```
//! # use meridian::config::{LayoutConfig, LayoutKind};
//! let config: LayoutConfig = serde_json::from_str(
//!     r#"{"type": "swim-lane", "lane_key": "methodology", "spacing": 120}"#,
//! ).unwrap();
//! assert_eq!(config.kind(), LayoutKind::SwimLane);
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Payload-free tag of every layout algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutKind {
    #[default]
    Force,
    ClusteredForce,
    Hierarchical,
    Tree,
    Layered,
    Timeline,
    SwimLane,
    Circular,
    Radial,
    Spiral,
}

impl LayoutKind {
    /// All layout kinds, in declaration order.
    pub const ALL: [LayoutKind; 10] = [
        Self::Force,
        Self::ClusteredForce,
        Self::Hierarchical,
        Self::Tree,
        Self::Layered,
        Self::Timeline,
        Self::SwimLane,
        Self::Circular,
        Self::Radial,
        Self::Spiral,
    ];

    /// Returns the kebab-case name used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Force => "force",
            Self::ClusteredForce => "clustered-force",
            Self::Hierarchical => "hierarchical",
            Self::Tree => "tree",
            Self::Layered => "layered",
            Self::Timeline => "timeline",
            Self::SwimLane => "swim-lane",
            Self::Circular => "circular",
            Self::Radial => "radial",
            Self::Spiral => "spiral",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|kind| kind.as_str()).collect();
                format!("unknown layout `{s}`, expected one of: {}", names.join(", "))
            })
    }
}

// =============================================================================
// Force
// =============================================================================

/// Options for the force-directed simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceOptions {
    /// Pairwise repulsion; negative values push nodes apart.
    pub charge_strength: f32,
    /// Spring stiffness in `0..=1`.
    pub link_strength: f32,
    /// Target edge length.
    pub link_distance: f32,
    /// Pull toward the area center in `0..=1`.
    pub center_strength: f32,
    /// Minimum separation between node centers.
    pub collision_radius: f32,
    /// Number of simulation steps.
    pub iterations: usize,
    /// Layout area width.
    pub width: f32,
    /// Layout area height.
    pub height: f32,
}

impl Default for ForceOptions {
    fn default() -> Self {
        Self {
            charge_strength: -300.0,
            link_strength: 0.7,
            link_distance: 100.0,
            center_strength: 0.05,
            collision_radius: 30.0,
            iterations: 300,
            width: 1000.0,
            height: 1000.0,
        }
    }
}

/// Force layout with an extra pull toward per-group centers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteredForceConfig {
    /// Attribute whose value assigns a node to a cluster. Required.
    pub cluster_key: Option<String>,
    /// Strength of the pull toward the cluster center.
    pub cluster_strength: f32,
    #[serde(flatten)]
    pub force: ForceOptions,
}

impl Default for ClusteredForceConfig {
    fn default() -> Self {
        Self {
            cluster_key: None,
            cluster_strength: 0.3,
            force: ForceOptions::default(),
        }
    }
}

// =============================================================================
// Hierarchical
// =============================================================================

/// Flow direction of a hierarchical layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[allow(clippy::upper_case_acronyms)]
pub enum Direction {
    /// Ranks grow downward.
    #[default]
    TB,
    /// Ranks grow upward.
    BT,
    /// Ranks grow to the right.
    LR,
    /// Ranks grow to the left.
    RL,
}

impl Direction {
    /// Returns true if ranks are laid out along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LR | Self::RL)
    }

    /// Returns true if rank order runs against the axis.
    pub fn is_mirrored(self) -> bool {
        matches!(self, Self::BT | Self::RL)
    }
}

/// Rank assignment strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ranker {
    /// Longest path followed by edge-length balancing.
    #[default]
    NetworkSimplex,
    /// Every node as far from the sources as its longest incoming path.
    LongestPath,
    /// Longest path with nodes pulled down next to their successors.
    TightTree,
}

/// Placement of ranks that are narrower than the widest rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Start,
    #[default]
    Center,
    End,
}

impl Align {
    /// Fraction of the free space placed before the rank.
    pub fn bias(self) -> f32 {
        match self {
            Self::Start => 0.0,
            Self::Center => 0.5,
            Self::End => 1.0,
        }
    }
}

/// Options for ranked (layered) layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchicalOptions {
    pub direction: Direction,
    /// Gap between nodes of the same rank.
    pub node_spacing: f32,
    /// Gap between consecutive ranks.
    pub rank_spacing: f32,
    /// Nominal node width, used only for spacing.
    pub node_width: f32,
    /// Nominal node height, used only for spacing.
    pub node_height: f32,
    pub align: Align,
    pub ranker: Ranker,
}

impl Default for HierarchicalOptions {
    fn default() -> Self {
        Self {
            direction: Direction::TB,
            node_spacing: 50.0,
            rank_spacing: 100.0,
            node_width: 150.0,
            node_height: 50.0,
            align: Align::Center,
            ranker: Ranker::NetworkSimplex,
        }
    }
}

/// Root-anchored tree layout.
///
/// Trees rank with [`Ranker::TightTree`] unless another ranker is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TreeConfigFields")]
pub struct TreeConfig {
    /// Root node id; derived from the graph when unset.
    pub root_node_id: Option<String>,
    #[serde(flatten)]
    pub hierarchy: HierarchicalOptions,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfigFields::default().into()
    }
}

/// Wire form of [`TreeConfig`]. `ranker` is read here so that an absent
/// value can mean tight-tree instead of the hierarchical default.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TreeConfigFields {
    root_node_id: Option<String>,
    ranker: Option<Ranker>,
    #[serde(flatten)]
    hierarchy: HierarchicalOptions,
}

impl From<TreeConfigFields> for TreeConfig {
    fn from(fields: TreeConfigFields) -> Self {
        Self {
            root_node_id: fields.root_node_id,
            hierarchy: HierarchicalOptions {
                ranker: fields.ranker.unwrap_or(Ranker::TightTree),
                ..fields.hierarchy
            },
        }
    }
}

/// Layout with caller-defined layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayeredConfig {
    /// Attribute holding each node's layer. Required.
    pub layer_key: Option<String>,
    #[serde(flatten)]
    pub hierarchy: HierarchicalOptions,
}

// =============================================================================
// Timeline
// =============================================================================

/// Axis along which time flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Options for chronological layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineOptions {
    pub orientation: Orientation,
    /// Attribute holding the timestamp.
    pub time_key: String,
    /// Step along the time axis.
    pub spacing: f32,
    /// Gap between parallel tracks.
    pub track_spacing: f32,
    /// Time-axis coordinate of the first slot.
    pub start_offset: f32,
    /// Number of parallel tracks.
    pub max_tracks: usize,
    /// Window in milliseconds within which nodes share a group; 0 disables grouping.
    pub group_window: u64,
    /// Newest first.
    pub reverse: bool,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            time_key: "createdAt".to_string(),
            spacing: 150.0,
            track_spacing: 100.0,
            start_offset: 50.0,
            max_tracks: 5,
            group_window: 0,
            reverse: false,
        }
    }
}

/// Timeline split into one lane per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwimLaneConfig {
    /// Attribute holding each node's lane. Required.
    pub lane_key: Option<String>,
    /// Distance between consecutive lanes.
    pub lane_spacing: f32,
    #[serde(flatten)]
    pub timeline: TimelineOptions,
}

impl Default for SwimLaneConfig {
    fn default() -> Self {
        Self {
            lane_key: None,
            lane_spacing: 200.0,
            timeline: TimelineOptions::default(),
        }
    }
}

// =============================================================================
// Circular
// =============================================================================

/// Direction in which angles advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sweep {
    /// Increasing angles (clockwise with a y-down screen).
    #[default]
    Clockwise,
    CounterClockwise,
}

impl Sweep {
    /// Sign applied to angular steps.
    pub fn sign(self) -> f32 {
        match self {
            Self::Clockwise => 1.0,
            Self::CounterClockwise => -1.0,
        }
    }
}

/// Node order before placement on a ring or spiral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    None,
    /// Highest connection count first.
    Degree,
    /// Highest `weight` attribute first; nodes without one last.
    Weight,
    /// Lexical on the `label` attribute, falling back to the id.
    Label,
}

/// Options shared by the circular, concentric, radial and spiral layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircularOptions {
    pub center_x: f32,
    pub center_y: f32,
    /// Ring radius; the innermost ring for concentric and radial layouts.
    pub radius: f32,
    /// Angle of the first node, in radians.
    pub start_angle: f32,
    pub sweep: Sweep,
    pub sort_by: SortBy,
    /// One ring per group instead of a single ring.
    pub concentric: bool,
    /// Grouping attribute for concentric rings; degree is used when unset.
    pub group_key: Option<String>,
    /// Distance between consecutive rings.
    pub ring_spacing: f32,
    /// Radians between consecutive spiral nodes.
    pub spiral_step: f32,
    /// Spiral radius gained per radian.
    pub spiral_growth: f32,
}

impl Default for CircularOptions {
    fn default() -> Self {
        Self {
            center_x: 500.0,
            center_y: 500.0,
            radius: 300.0,
            start_angle: 0.0,
            sweep: Sweep::Clockwise,
            sort_by: SortBy::None,
            concentric: false,
            group_key: None,
            ring_spacing: 100.0,
            spiral_step: 0.5,
            spiral_growth: 30.0,
        }
    }
}

/// Radial tree around a root node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadialConfig {
    /// Root node id; derived from the graph when unset.
    pub root_node_id: Option<String>,
    #[serde(flatten)]
    pub circular: CircularOptions,
}

// =============================================================================
// Top level
// =============================================================================

/// A layout algorithm together with its options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum LayoutConfig {
    Force(ForceOptions),
    ClusteredForce(ClusteredForceConfig),
    Hierarchical(HierarchicalOptions),
    Tree(TreeConfig),
    Layered(LayeredConfig),
    Timeline(TimelineOptions),
    SwimLane(SwimLaneConfig),
    Circular(CircularOptions),
    Radial(RadialConfig),
    Spiral(CircularOptions),
}

impl LayoutConfig {
    /// Default configuration for the given algorithm.
    pub fn default_for(kind: LayoutKind) -> Self {
        match kind {
            LayoutKind::Force => Self::Force(ForceOptions::default()),
            LayoutKind::ClusteredForce => Self::ClusteredForce(ClusteredForceConfig::default()),
            LayoutKind::Hierarchical => Self::Hierarchical(HierarchicalOptions::default()),
            LayoutKind::Tree => Self::Tree(TreeConfig::default()),
            LayoutKind::Layered => Self::Layered(LayeredConfig::default()),
            LayoutKind::Timeline => Self::Timeline(TimelineOptions::default()),
            LayoutKind::SwimLane => Self::SwimLane(SwimLaneConfig::default()),
            LayoutKind::Circular => Self::Circular(CircularOptions::default()),
            LayoutKind::Radial => Self::Radial(RadialConfig::default()),
            LayoutKind::Spiral => Self::Spiral(CircularOptions::default()),
        }
    }

    /// Returns the algorithm tag of this configuration.
    pub fn kind(&self) -> LayoutKind {
        match self {
            Self::Force(_) => LayoutKind::Force,
            Self::ClusteredForce(_) => LayoutKind::ClusteredForce,
            Self::Hierarchical(_) => LayoutKind::Hierarchical,
            Self::Tree(_) => LayoutKind::Tree,
            Self::Layered(_) => LayoutKind::Layered,
            Self::Timeline(_) => LayoutKind::Timeline,
            Self::SwimLane(_) => LayoutKind::SwimLane,
            Self::Circular(_) => LayoutKind::Circular,
            Self::Radial(_) => LayoutKind::Radial,
            Self::Spiral(_) => LayoutKind::Spiral,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::default_for(LayoutKind::default())
    }
}

/// Top-level application configuration.
///
/// `layout` is optional: hosts fall back to [`crate::recommend_layout`] when
/// it is unset. `auto_tune` asks hosts to scale a recommended layout's options
/// with [`crate::auto_options`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    layout: Option<LayoutConfig>,

    #[serde(default)]
    auto_tune: bool,
}

impl AppConfig {
    /// Creates a new [`AppConfig`].
    pub fn new(layout: Option<LayoutConfig>, auto_tune: bool) -> Self {
        Self { layout, auto_tune }
    }

    /// Returns the configured layout, if any.
    pub fn layout(&self) -> Option<&LayoutConfig> {
        self.layout.as_ref()
    }

    /// Returns true if recommended layouts should be auto-tuned.
    pub fn auto_tune(&self) -> bool {
        self.auto_tune
    }
}
