//! Greedy track assignment within one timeline group.

use crate::graph::ConnectionSet;

/// Assigns each of `members`, in order, to one of `track_count` tracks.
///
/// A candidate track scores one conflict for every already placed member
/// that is connected to the candidate but sits on another track, and one for
/// every unconnected member already on that track. The lowest score wins and
/// ties go to the lowest track index.
pub fn assign_tracks(
    members: &[usize],
    connections: &ConnectionSet,
    track_count: usize,
) -> Vec<usize> {
    let track_count = track_count.max(1);
    let mut tracks: Vec<usize> = Vec::with_capacity(members.len());

    for (i, &member) in members.iter().enumerate() {
        let placed = members[..i].iter().zip(&tracks);
        let best = (0..track_count)
            .min_by_key(|&candidate| {
                placed
                    .clone()
                    .filter(|&(&other, &track)| {
                        let connected = connections.connected(member, other);
                        (connected && track != candidate) || (!connected && track == candidate)
                    })
                    .count()
            })
            .unwrap_or(0);
        tracks.push(best);
    }

    tracks
}

/// Largest number of members sharing one track, at least 1.
pub fn depth(tracks: &[usize]) -> usize {
    let Some(&max_track) = tracks.iter().max() else {
        return 1;
    };
    let mut counts = vec![0usize; max_track + 1];
    for &track in tracks {
        counts[track] += 1;
    }
    counts.into_iter().max().unwrap_or(1).max(1)
}

#[cfg(test)]
mod tests {
    use meridian_core::{Edge, Node};

    use super::*;
    use crate::graph::GraphIndex;

    fn connections(count: usize, edges: &[(&str, &str)]) -> ConnectionSet {
        let nodes: Vec<Node> = (0..count).map(|i| Node::new(format!("n{i}"))).collect();
        let edges: Vec<Edge> = edges
            .iter()
            .enumerate()
            .map(|(i, (s, t))| Edge::new(format!("e{i}"), *s, *t))
            .collect();
        GraphIndex::new(&nodes, &edges).connections()
    }

    #[test]
    fn test_unconnected_members_spread_over_tracks() {
        let connections = connections(3, &[]);
        assert_eq!(assign_tracks(&[0, 1, 2], &connections, 5), vec![0, 1, 2]);
    }

    #[test]
    fn test_connected_members_share_a_track() {
        let connections = connections(3, &[("n0", "n1")]);
        assert_eq!(assign_tracks(&[0, 1, 2], &connections, 5), vec![0, 0, 1]);
    }

    #[test]
    fn test_more_members_than_tracks_wraps() {
        let connections = connections(3, &[]);
        let tracks = assign_tracks(&[0, 1, 2], &connections, 2);
        assert_eq!(tracks, vec![0, 1, 0]);
        assert_eq!(depth(&tracks), 2);
    }

    #[test]
    fn test_zero_tracks_behaves_like_one() {
        let connections = connections(2, &[]);
        assert_eq!(assign_tracks(&[0, 1], &connections, 0), vec![0, 0]);
    }

    #[test]
    fn test_depth_of_empty_is_one() {
        assert_eq!(depth(&[]), 1);
    }
}
