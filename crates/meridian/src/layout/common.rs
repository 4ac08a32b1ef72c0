//! Helpers shared by the layout algorithms.

use std::cmp::Ordering;

use indexmap::IndexMap;

use meridian_core::{Node, Point};

use crate::graph::GraphIndex;

/// Copies `nodes` with the computed `positions` applied.
///
/// `positions[i]` belongs to `nodes[i]`. Locked nodes keep their input
/// position. A non-finite computed position falls back to the input position,
/// or to the origin when that is not finite either.
pub fn place(nodes: &[Node], positions: &[Point]) -> Vec<Node> {
    debug_assert_eq!(nodes.len(), positions.len());

    nodes
        .iter()
        .zip(positions)
        .map(|(node, &position)| {
            let mut node = node.clone();
            if !node.is_locked() {
                node.set_position(finite_or(position, node.position()));
            }
            node
        })
        .collect()
}

/// Input positions of every node, used as the starting point of algorithms
/// that only move some nodes.
pub fn input_positions(nodes: &[Node]) -> Vec<Point> {
    nodes.iter().map(Node::position).collect()
}

fn finite_or(position: Point, fallback: Point) -> Point {
    if position.is_finite() {
        position
    } else if fallback.is_finite() {
        fallback
    } else {
        Point::default()
    }
}

/// Node indices that share one attribute value.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Grouping key, `None` for nodes without the attribute.
    pub key: Option<String>,
    pub members: Vec<usize>,
}

/// Groups node indices by [`as_key`](meridian_core::AttributeValue::as_key)
/// of the attribute at `key`.
///
/// Groups appear in order of first occurrence and members keep input order.
/// Nodes without the attribute are collected in a trailing group with key
/// `None`, present only if such nodes exist.
pub fn group_by_attribute(graph: &GraphIndex<'_>, key: &str) -> Vec<Group> {
    let mut keyed: IndexMap<String, Vec<usize>> = IndexMap::new();
    let mut missing = Vec::new();

    for index in 0..graph.node_count() {
        match graph.attribute(index, key) {
            Some(value) => keyed.entry(value.as_key()).or_default().push(index),
            None => missing.push(index),
        }
    }

    let mut groups: Vec<Group> = keyed
        .into_iter()
        .map(|(key, members)| Group {
            key: Some(key),
            members,
        })
        .collect();
    if !missing.is_empty() {
        groups.push(Group {
            key: None,
            members: missing,
        });
    }
    groups
}

/// Sorts groups by key: numerically when every key parses as a number,
/// lexically otherwise. The keyless group stays last.
pub fn sort_groups(groups: &mut [Group]) {
    let numeric = groups
        .iter()
        .filter_map(|group| group.key.as_deref())
        .all(|key| key.trim().parse::<f64>().is_ok());

    groups.sort_by(|a, b| match (a.key.as_deref(), b.key.as_deref()) {
        (Some(a), Some(b)) if numeric => parse_key(a).total_cmp(&parse_key(b)),
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Sorts groups lexically by key; the keyless group stays last.
pub fn sort_groups_lexically(groups: &mut [Group]) {
    groups.sort_by(|a, b| match (a.key.as_deref(), b.key.as_deref()) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

fn parse_key(key: &str) -> f64 {
    key.trim().parse().unwrap_or(f64::NAN)
}
