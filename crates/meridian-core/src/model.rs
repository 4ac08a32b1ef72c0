//! Node and edge records consumed by the layout algorithms.
//!
//! The model has no persistent identity: callers build a node/edge set right
//! before a layout call and the engine returns a fresh node list. Layout
//! functions take `&[Node]` and `&[Edge]` and never write through them.

use serde::{Deserialize, Serialize};

use crate::{
    attribute::{AttributeValue, Attributes},
    geometry::Point,
};

/// A graph node with a position, a lock flag and free-form attributes.
///
/// A locked node is never moved by any layout algorithm; it still takes part
/// in the computation (it exerts forces, occupies a rank or a ring slot).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: String,
    #[serde(default)]
    position: Point,
    #[serde(default)]
    locked: bool,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    data: Attributes,
}

impl Node {
    /// Creates an unlocked node at the origin with no attributes.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            position: Point::default(),
            locked: false,
            data: Attributes::new(),
        }
    }

    /// Sets the position (builder style).
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Point::new(x, y);
        self
    }

    /// Marks the node as locked (builder style).
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// Adds or replaces an attribute (builder style).
    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Returns the node id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the current position
    pub fn position(&self) -> Point {
        self.position
    }

    /// Replaces the position
    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Returns true if layouts must leave this node where it is
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Looks up an attribute by name
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.data.get(key)
    }

    /// Returns all attributes in insertion order
    pub fn attributes(&self) -> &Attributes {
        &self.data
    }
}

/// A directed edge between two node ids.
///
/// Edges whose endpoints are not in the node set are ignored by every layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    id: String,
    source: String,
    target: String,
}

impl Edge {
    /// Creates a new edge
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }

    /// Returns the edge id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the source node id
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the target node id
    pub fn target(&self) -> &str {
        &self.target
    }
}
