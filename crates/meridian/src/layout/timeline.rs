//! Chronological layouts.
//!
//! Time runs along one axis (x for horizontal timelines, y for vertical ones)
//! and parallel tracks spread along the other. Nodes are read in timestamp
//! order and walked slot by slot:
//!
//! 1. With a `group_window`, consecutive nodes close in time share a group.
//! 2. Each group is spread over the tracks so that connected nodes share a
//!    track and unconnected nodes do not.
//! 3. Nodes without a usable timestamp follow the last group, round-robin
//!    over the tracks.
//!
//! The swim-lane variant runs the same walk once per lane with a single
//! track.

mod tracks;

use log::{debug, trace};

use meridian_core::{Edge, Node, Point};

use crate::{
    config::{Orientation, TimelineOptions},
    graph::{ConnectionSet, GraphIndex},
    layout::common,
};

/// Position of a node along both timeline axes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Slot {
    /// Time-axis coordinate.
    time: f32,
    /// Track index.
    track: usize,
}

/// Lays nodes out in timestamp order.
///
/// Timestamps come from the attribute at `options.time_key`. When no node has
/// a usable timestamp, node `i` is placed at `start_offset + i * spacing` on
/// the first track.
///
/// # Examples
///
/// ```
/// use meridian::{apply_timeline, config::TimelineOptions};
/// use meridian_core::Node;
///
/// let nodes = vec![
///     Node::new("later").with_attribute("createdAt", "2024-03-02"),
///     Node::new("earlier").with_attribute("createdAt", "2024-03-01"),
/// ];
/// let laid_out = apply_timeline(&nodes, &[], &TimelineOptions::default());
///
/// assert!(laid_out[1].position().x() < laid_out[0].position().x());
/// ```
pub fn apply_timeline(nodes: &[Node], edges: &[Edge], options: &TimelineOptions) -> Vec<Node> {
    let graph = GraphIndex::new(nodes, edges);
    let connections = graph.connections();
    let members: Vec<usize> = (0..nodes.len()).collect();
    let track_count = options.max_tracks.max(1);

    debug!(
        node_count = nodes.len(),
        time_key = options.time_key.as_str(),
        track_count;
        "Applying timeline layout"
    );

    let slots = schedule(&graph, &connections, &members, options, track_count);

    let mut positions = common::input_positions(nodes);
    for (&node, slot) in members.iter().zip(&slots) {
        let track = options.start_offset + slot.track as f32 * options.track_spacing;
        positions[node] = orient(options.orientation, slot.time, track);
    }
    common::place(nodes, &positions)
}

/// Lays out one single-track timeline per value of the `lane_key` attribute.
///
/// Lanes sort lexically by key; nodes without the attribute form the last
/// lane. Lane `k` is offset by `k * lane_spacing` along the track axis.
pub fn apply_swim_lane(
    nodes: &[Node],
    edges: &[Edge],
    lane_key: &str,
    options: &TimelineOptions,
    lane_spacing: f32,
) -> Vec<Node> {
    let graph = GraphIndex::new(nodes, edges);
    let connections = graph.connections();
    let mut lanes = common::group_by_attribute(&graph, lane_key);
    common::sort_groups_lexically(&mut lanes);

    debug!(
        node_count = nodes.len(),
        lane_count = lanes.len(),
        lane_key;
        "Applying swim-lane layout"
    );

    let mut positions = common::input_positions(nodes);
    for (k, lane) in lanes.iter().enumerate() {
        trace!(lane:? = lane.key, size = lane.members.len(); "Scheduling lane");
        let track = options.start_offset + k as f32 * lane_spacing;
        let slots = schedule(&graph, &connections, &lane.members, options, 1);
        for (&node, slot) in lane.members.iter().zip(&slots) {
            positions[node] = orient(options.orientation, slot.time, track);
        }
    }
    common::place(nodes, &positions)
}

fn orient(orientation: Orientation, time: f32, track: f32) -> Point {
    match orientation {
        Orientation::Horizontal => Point::new(time, track),
        Orientation::Vertical => Point::new(track, time),
    }
}

/// Computes a slot for every entry of `members`, in the same order.
fn schedule(
    graph: &GraphIndex<'_>,
    connections: &ConnectionSet,
    members: &[usize],
    options: &TimelineOptions,
    track_count: usize,
) -> Vec<Slot> {
    let slot_time = |slot: usize| options.start_offset + slot as f32 * options.spacing;

    let mut timed: Vec<(usize, i64)> = Vec::new();
    let mut untimed: Vec<usize> = Vec::new();
    for (k, &node) in members.iter().enumerate() {
        match graph
            .attribute(node, &options.time_key)
            .and_then(|value| value.as_timestamp_millis())
        {
            Some(millis) => timed.push((k, millis)),
            None => untimed.push(k),
        }
    }

    let mut slots = vec![Slot::default(); members.len()];

    if timed.is_empty() {
        trace!(count = members.len(); "No usable timestamps, using index order");
        for (k, slot) in slots.iter_mut().enumerate() {
            *slot = Slot {
                time: slot_time(k),
                track: 0,
            };
        }
        return slots;
    }

    if options.reverse {
        timed.sort_by(|a, b| b.1.cmp(&a.1));
    } else {
        timed.sort_by_key(|&(_, millis)| millis);
    }

    let mut cursor = 0;
    for group in group_by_window(&timed, options.group_window) {
        let group_nodes: Vec<usize> = group.iter().map(|&(k, _)| members[k]).collect();
        let tracks = tracks::assign_tracks(&group_nodes, connections, track_count);

        let mut used = vec![0usize; track_count];
        for (&(k, _), &track) in group.iter().zip(&tracks) {
            slots[k] = Slot {
                time: slot_time(cursor + used[track]),
                track,
            };
            used[track] += 1;
        }
        cursor += tracks::depth(&tracks);
    }

    for (i, &k) in untimed.iter().enumerate() {
        slots[k] = Slot {
            time: slot_time(cursor + i / track_count),
            track: i % track_count,
        };
    }

    slots
}

/// Splits a sorted sequence into runs whose timestamps lie within `window`
/// of the run's first timestamp. A zero window gives one run per entry.
fn group_by_window(sorted: &[(usize, i64)], window: u64) -> Vec<&[(usize, i64)]> {
    if window == 0 {
        return sorted.chunks(1).collect();
    }

    let mut groups = Vec::new();
    let mut start = 0;
    for i in 1..sorted.len() {
        if sorted[i].1.abs_diff(sorted[start].1) > window {
            groups.push(&sorted[start..i]);
            start = i;
        }
    }
    if start < sorted.len() {
        groups.push(&sorted[start..]);
    }
    groups
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    const DAY: i64 = 86_400_000;

    fn daily(count: usize) -> Vec<Node> {
        (0..count)
            .map(|i| Node::new(format!("n{i}")).with_attribute("createdAt", i as i64 * DAY))
            .collect()
    }

    #[test]
    fn test_daily_nodes_increase_along_time_axis() {
        let mut nodes = daily(4);
        nodes.reverse();
        let result = apply_timeline(&nodes, &[], &TimelineOptions::default());

        // nodes are n3, n2, n1, n0; time order is the reverse
        let xs: Vec<f32> = result.iter().rev().map(|n| n.position().x()).collect();
        assert!(xs.windows(2).all(|pair| pair[0] < pair[1]), "{xs:?}");
        assert_approx_eq!(f32, xs[0], 50.0);
        assert_approx_eq!(f32, xs[1], 200.0);
    }

    #[test]
    fn test_reverse_puts_newest_first() {
        let nodes = daily(3);
        let options = TimelineOptions {
            reverse: true,
            ..TimelineOptions::default()
        };
        let result = apply_timeline(&nodes, &[], &options);
        assert!(result[2].position().x() < result[0].position().x());
    }

    #[test]
    fn test_vertical_orientation() {
        let nodes = daily(2);
        let options = TimelineOptions {
            orientation: Orientation::Vertical,
            ..TimelineOptions::default()
        };
        let result = apply_timeline(&nodes, &[], &options);
        assert!(result[0].position().y() < result[1].position().y());
        assert_approx_eq!(f32, result[0].position().x(), result[1].position().x());
    }

    #[test]
    fn test_group_window_spreads_group_over_tracks() {
        let nodes = vec![
            Node::new("a").with_attribute("createdAt", 0),
            Node::new("b").with_attribute("createdAt", 1_000),
            Node::new("c").with_attribute("createdAt", 10 * DAY),
        ];
        let options = TimelineOptions {
            group_window: 60_000,
            ..TimelineOptions::default()
        };
        let result = apply_timeline(&nodes, &[], &options);

        // a and b share a group slot on different tracks
        assert_approx_eq!(f32, result[0].position().x(), result[1].position().x());
        assert!(result[0].position().y() < result[1].position().y());
        // c starts the next slot
        assert_approx_eq!(f32, result[2].position().x(), 200.0);
    }

    #[test]
    fn test_connected_group_members_share_track() {
        let nodes = vec![
            Node::new("a").with_attribute("createdAt", 0),
            Node::new("b").with_attribute("createdAt", 1_000),
        ];
        let edges = vec![Edge::new("ab", "a", "b")];
        let options = TimelineOptions {
            group_window: 60_000,
            ..TimelineOptions::default()
        };
        let result = apply_timeline(&nodes, &edges, &options);

        assert_approx_eq!(f32, result[0].position().y(), result[1].position().y());
        assert!(result[0].position().x() < result[1].position().x());
    }

    #[test]
    fn test_untimed_nodes_follow_timed_ones() {
        let nodes = vec![
            Node::new("untimed").with_attribute("createdAt", "someday"),
            Node::new("timed").with_attribute("createdAt", "2024-01-01T00:00:00Z"),
        ];
        let result = apply_timeline(&nodes, &[], &TimelineOptions::default());
        assert!(result[1].position().x() < result[0].position().x());
    }

    #[test]
    fn test_untimed_round_robin_over_tracks() {
        let mut nodes = vec![Node::new("timed").with_attribute("createdAt", 0)];
        nodes.extend((0..3).map(|i| Node::new(format!("u{i}"))));
        let options = TimelineOptions {
            max_tracks: 2,
            ..TimelineOptions::default()
        };
        let result = apply_timeline(&nodes, &[], &options);

        // u0 and u1 share the slot after the timed node, u2 wraps to the next
        assert_approx_eq!(f32, result[1].position().x(), 200.0);
        assert_approx_eq!(f32, result[2].position().x(), 200.0);
        assert_approx_eq!(f32, result[3].position().x(), 350.0);
        assert_approx_eq!(f32, result[3].position().y(), result[1].position().y());
    }

    #[test]
    fn test_index_order_fallback_without_timestamps() {
        let nodes: Vec<Node> = (0..3).map(|i| Node::new(format!("n{i}"))).collect();
        let result = apply_timeline(&nodes, &[], &TimelineOptions::default());
        for (i, node) in result.iter().enumerate() {
            assert_approx_eq!(f32, node.position().x(), 50.0 + i as f32 * 150.0);
            assert_approx_eq!(f32, node.position().y(), 50.0);
        }
    }

    #[test]
    fn test_zero_max_tracks_is_one_track() {
        let nodes = vec![
            Node::new("a").with_attribute("createdAt", 0),
            Node::new("b").with_attribute("createdAt", 10),
        ];
        let options = TimelineOptions {
            max_tracks: 0,
            group_window: 1_000,
            ..TimelineOptions::default()
        };
        let result = apply_timeline(&nodes, &[], &options);
        assert_approx_eq!(f32, result[0].position().y(), result[1].position().y());
        assert!(result[0].position().x() < result[1].position().x());
    }

    #[test]
    fn test_swim_lanes_are_sorted_and_offset() {
        let nodes = vec![
            Node::new("a").with_attribute("team", "web").with_attribute("createdAt", 0),
            Node::new("b").with_attribute("team", "api").with_attribute("createdAt", DAY),
            Node::new("c").with_attribute("createdAt", 2 * DAY),
            Node::new("d").with_attribute("team", "web").with_attribute("createdAt", DAY),
        ];
        let result = apply_swim_lane(&nodes, &[], "team", &TimelineOptions::default(), 200.0);

        let y = |i: usize| result[i].position().y();
        assert_approx_eq!(f32, y(1), 50.0);
        assert_approx_eq!(f32, y(0), 250.0);
        assert_approx_eq!(f32, y(3), 250.0);
        assert_approx_eq!(f32, y(2), 450.0);
        // lanes are independent timelines
        assert_approx_eq!(f32, result[1].position().x(), 50.0);
        assert!(result[0].position().x() < result[3].position().x());
    }

    #[test]
    fn test_locked_node_is_not_moved() {
        let mut nodes = daily(3);
        nodes[1] = nodes[1].clone().with_position(-1.0, -1.0).with_locked(true);
        let result = apply_timeline(&nodes, &[], &TimelineOptions::default());
        assert_eq!(result[1].position(), Point::new(-1.0, -1.0));
    }

    #[test]
    fn test_group_by_window() {
        let sorted = [(0, 0), (1, 5), (2, 20), (3, 22)];
        let groups = group_by_window(&sorted, 10);
        assert_eq!(groups, vec![&sorted[0..2], &sorted[2..4]]);
        assert_eq!(group_by_window(&sorted, 0).len(), 4);
    }
}
