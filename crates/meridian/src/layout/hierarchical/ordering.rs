//! Order of nodes within each rank.
//!
//! Crossing minimisation is delegated to `rust-sugiyama`: the x-coordinate it
//! assigns a node decides that node's position within our rank. When the
//! crate panics or returns nothing, barycenter sweeps over our own ranks are
//! used instead. Nodes without edges keep input order at the end of their
//! rank.
//!
//! The panic hook is silenced while the crate runs, so a recovered panic
//! only shows up as a debug log record.

use std::{
    any::Any,
    cmp::Ordering,
    panic::{self, UnwindSafe},
    sync::{Mutex, PoisonError},
    thread,
};

use log::debug;
use rust_sugiyama::configure::Config;

const BARYCENTER_SWEEPS: usize = 4;

/// Held while the panic hook is swapped out.
static HOOK_LOCK: Mutex<()> = Mutex::new(());

/// Sort key of a node from the sugiyama layout: component index, then x.
type SugiyamaKey = Option<(usize, f64)>;

/// Groups nodes into ranks and orders each rank.
///
/// `ranks[i]` is the rank of node `i`; `edges` are the acyclic edges the
/// ranks were computed from.
pub fn order_ranks(ranks: &[usize], edges: &[(usize, usize)]) -> Vec<Vec<usize>> {
    let layer_count = ranks.iter().max().map_or(0, |max| max + 1);
    let mut layers: Vec<Vec<usize>> = vec![Vec::new(); layer_count];
    for (node, &rank) in ranks.iter().enumerate() {
        layers[rank].push(node);
    }

    match sugiyama_keys(ranks.len(), edges) {
        Some(keys) => {
            for layer in &mut layers {
                layer.sort_by(|&a, &b| compare_keys(keys[a], keys[b]));
            }
        }
        None => barycenter_sweeps(&mut layers, ranks.len(), edges),
    }

    layers
}

fn compare_keys(a: SugiyamaKey, b: SugiyamaKey) -> Ordering {
    match (a, b) {
        (Some((ca, xa)), Some((cb, xb))) => ca.cmp(&cb).then(xa.total_cmp(&xb)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn sugiyama_keys(node_count: usize, edges: &[(usize, usize)]) -> Option<Vec<SugiyamaKey>> {
    let sugiyama_edges: Vec<(u32, u32)> = edges
        .iter()
        .filter_map(|&(s, t)| Some((u32::try_from(s).ok()?, u32::try_from(t).ok()?)))
        .collect();
    if sugiyama_edges.is_empty() {
        return None;
    }

    debug!(
        node_count,
        edge_count = sugiyama_edges.len();
        "Ordering ranks with rust-sugiyama"
    );

    let layouts = catch_silently(move || {
        let config = Config {
            minimum_length: 1,
            vertex_spacing: 3.0,
            ..Default::default()
        };
        rust_sugiyama::from_edges(&sugiyama_edges, &config)
    });

    let layouts = match layouts {
        Ok(layouts) if !layouts.is_empty() => layouts,
        Ok(_) => {
            debug!("rust-sugiyama returned no layout, falling back to barycenter ordering");
            return None;
        }
        Err(err) => {
            let message = panic_message(err.as_ref());
            debug!(message; "rust-sugiyama panicked, falling back to barycenter ordering");
            return None;
        }
    };

    let mut linked = vec![false; node_count];
    for &(s, t) in edges {
        linked[s] = true;
        linked[t] = true;
    }

    let mut keys = vec![None; node_count];
    for (component, (coords, _, _)) in layouts.iter().enumerate() {
        for &(id, (x, _)) in coords {
            if id < node_count && linked[id] {
                keys[id] = Some((component, x));
            }
        }
    }
    Some(keys)
}

/// Runs `f`, returning its panic payload as `Err` without calling the
/// process-wide panic hook. Panics on other threads are not reported while
/// `f` runs.
fn catch_silently<R>(f: impl FnOnce() -> R + UnwindSafe) -> thread::Result<R> {
    let _guard = HOOK_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let result = panic::catch_unwind(f);
    panic::set_hook(hook);
    result
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else {
        "unknown error"
    }
}

/// Alternating down and up sweeps that sort each rank by the mean position
/// of its neighbors in the previously swept ranks.
fn barycenter_sweeps(layers: &mut [Vec<usize>], node_count: usize, edges: &[(usize, usize)]) {
    let mut predecessors = vec![Vec::new(); node_count];
    let mut successors = vec![Vec::new(); node_count];
    for &(s, t) in edges {
        successors[s].push(t);
        predecessors[t].push(s);
    }

    let mut positions = vec![0usize; node_count];
    for layer in layers.iter() {
        record_positions(layer, &mut positions);
    }

    for _ in 0..BARYCENTER_SWEEPS {
        for rank in 1..layers.len() {
            sort_by_barycenter(&mut layers[rank], &predecessors, &mut positions);
        }
        for rank in (0..layers.len().saturating_sub(1)).rev() {
            sort_by_barycenter(&mut layers[rank], &successors, &mut positions);
        }
    }
}

fn sort_by_barycenter(layer: &mut [usize], neighbors: &[Vec<usize>], positions: &mut [usize]) {
    let barycenter = |node: usize| -> f64 {
        let adjacent = &neighbors[node];
        if adjacent.is_empty() {
            positions[node] as f64
        } else {
            adjacent.iter().map(|&n| positions[n] as f64).sum::<f64>() / adjacent.len() as f64
        }
    };

    let mut keyed: Vec<(f64, usize)> = layer.iter().map(|&node| (barycenter(node), node)).collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    for (slot, (_, node)) in layer.iter_mut().zip(keyed) {
        *slot = node;
    }
    record_positions(layer, positions);
}

fn record_positions(layer: &[usize], positions: &mut [usize]) {
    for (i, &node) in layer.iter().enumerate() {
        positions[node] = i;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_edges_keeps_input_order() {
        let layers = order_ranks(&[0, 0, 0], &[]);
        assert_eq!(layers, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_every_node_is_ordered_once() {
        let ranks = [0, 0, 1, 1, 2, 1];
        let edges = [(0, 2), (0, 3), (1, 3), (2, 4), (3, 4)];
        let layers = order_ranks(&ranks, &edges);

        let mut seen: Vec<usize> = layers.iter().flatten().copied().collect();
        seen.sort();
        assert_eq!(seen, vec![0, 1, 2, 3, 4, 5]);
        for (rank, layer) in layers.iter().enumerate() {
            assert!(layer.iter().all(|&node| ranks[node] == rank));
        }
        // Node 5 has no edges and stays at the end of its rank
        assert_eq!(layers[1].last(), Some(&5));
    }

    #[test]
    fn test_barycenter_uncrosses_edges() {
        // 0 -> 3 and 1 -> 2 cross when rank 1 is [2, 3]
        let mut layers = vec![vec![0, 1], vec![2, 3]];
        barycenter_sweeps(&mut layers, 4, &[(0, 3), (1, 2)]);
        let first = layers[0].iter().position(|&n| n == 0);
        let second = layers[1].iter().position(|&n| n == 3);
        assert_eq!(first, second);
    }

    #[test]
    fn test_catch_silently_returns_value_or_payload() {
        assert_eq!(catch_silently(|| 7).ok(), Some(7));

        let err = catch_silently(|| -> usize { panic!("ordering failed") })
            .expect_err("panic should be caught");
        assert_eq!(panic_message(err.as_ref()), "ordering failed");
    }

    #[test]
    fn test_panic_message_from_str_and_string() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("boom"));
        assert_eq!(panic_message(owned.as_ref()), "boom");
        let borrowed: Box<dyn Any + Send> = Box::new("bang");
        assert_eq!(panic_message(borrowed.as_ref()), "bang");
    }
}
