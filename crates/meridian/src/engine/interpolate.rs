//! Position blending for animated transitions.

use std::collections::HashMap;

use meridian_core::{Node, Point};

/// Blends the positions of `start` toward those of `end`.
///
/// The output follows `start`'s order. Nodes present in both lists (matched
/// by id) move to `start + (end - start) * progress`; nodes only in `start`
/// pass through unchanged and nodes only in `end` are not added.
///
/// `progress` is clamped to `[0, 1]` and a non-finite value counts as 0.
/// Progress 0 returns exactly the start positions and progress 1 exactly the
/// end positions.
///
/// # Examples
///
/// ```
/// use meridian::interpolate_node_positions;
/// use meridian_core::{Node, Point};
///
/// let start = vec![Node::new("a").with_position(0.0, 0.0)];
/// let end = vec![Node::new("a").with_position(100.0, 50.0)];
///
/// let frame = interpolate_node_positions(&start, &end, 0.5);
/// assert_eq!(frame[0].position(), Point::new(50.0, 25.0));
/// ```
pub fn interpolate_node_positions(start: &[Node], end: &[Node], progress: f32) -> Vec<Node> {
    let t = if progress.is_finite() {
        progress.clamp(0.0, 1.0)
    } else {
        0.0
    };

    let mut targets: HashMap<&str, Point> = HashMap::with_capacity(end.len());
    for node in end {
        targets.entry(node.id()).or_insert(node.position());
    }

    start
        .iter()
        .map(|node| {
            let mut node = node.clone();
            if let Some(&target) = targets.get(node.id()) {
                let position = if t == 0.0 {
                    node.position()
                } else if t == 1.0 {
                    target
                } else {
                    node.position().lerp(target, t)
                };
                node.set_position(position);
            }
            node
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn frames() -> (Vec<Node>, Vec<Node>) {
        let start = vec![
            Node::new("a").with_position(0.0, 0.0),
            Node::new("b").with_position(10.0, 10.0),
            Node::new("only-start").with_position(3.0, 3.0),
        ];
        let end = vec![
            Node::new("only-end").with_position(99.0, 99.0),
            Node::new("b").with_position(30.0, -10.0),
            Node::new("a").with_position(0.1, 0.7),
        ];
        (start, end)
    }

    #[test]
    fn test_endpoints_are_exact() {
        let (start, end) = frames();

        let first = interpolate_node_positions(&start, &end, 0.0);
        assert_eq!(first, start);

        let last = interpolate_node_positions(&start, &end, 1.0);
        assert_eq!(last[0].position(), Point::new(0.1, 0.7));
        assert_eq!(last[1].position(), Point::new(30.0, -10.0));
    }

    #[test]
    fn test_midpoint_for_shared_ids() {
        let (start, end) = frames();
        let mid = interpolate_node_positions(&start, &end, 0.5);

        assert_approx_eq!(f32, mid[1].position().x(), 20.0);
        assert_approx_eq!(f32, mid[1].position().y(), 0.0);
    }

    #[test]
    fn test_unmatched_nodes() {
        let (start, end) = frames();
        let mid = interpolate_node_positions(&start, &end, 0.5);

        let ids: Vec<&str> = mid.iter().map(Node::id).collect();
        assert_eq!(ids, vec!["a", "b", "only-start"]);
        assert_eq!(mid[2].position(), Point::new(3.0, 3.0));
    }

    #[test]
    fn test_progress_is_clamped() {
        let (start, end) = frames();
        assert_eq!(
            interpolate_node_positions(&start, &end, 7.0),
            interpolate_node_positions(&start, &end, 1.0)
        );
        assert_eq!(interpolate_node_positions(&start, &end, -1.0), start);
        assert_eq!(interpolate_node_positions(&start, &end, f32::NAN), start);
    }
}
