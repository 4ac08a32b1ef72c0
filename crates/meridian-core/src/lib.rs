//! Meridian Core Types
//!
//! This crate provides the graph model shared by every Meridian layout
//! algorithm:
//!
//! - **Geometry**: [`geometry::Point`] and [`geometry::Bounds`]
//! - **Attributes**: typed, ordered node attributes ([`attribute`] module)
//! - **Model**: [`model::Node`] and [`model::Edge`] records

pub mod attribute;
pub mod geometry;
pub mod model;

pub use attribute::{AttributeValue, Attributes};
pub use geometry::{Bounds, Point};
pub use model::{Edge, Node};
