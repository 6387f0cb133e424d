//! Graph topology analysis algorithms
//!
//! Triangle counting and local clustering coefficients. Edge weights are ignored.

use super::common::GraphView;
use std::collections::HashSet;

fn neighbor_set(view: &GraphView, u: usize) -> HashSet<usize> {
    view.neighbors(u).iter().copied().filter(|&v| v != u).collect()
}

/// Number of triangles each node participates in.
pub fn triangles_per_node(view: &GraphView) -> Vec<usize> {
    let neighbor_sets: Vec<HashSet<usize>> =
        (0..view.node_count).map(|u| neighbor_set(view, u)).collect();

    (0..view.node_count)
        .map(|u| {
            let neighbors = &neighbor_sets[u];
            // Each linked neighbor pair is seen from both ends.
            let linked: usize = neighbors
                .iter()
                .map(|&v| neighbor_sets[v].intersection(neighbors).count())
                .sum();
            linked / 2
        })
        .collect()
}

/// Triangle Counting
///
/// Returns total number of triangles in the graph, each counted once.
pub fn count_triangles(view: &GraphView) -> usize {
    triangles_per_node(view).iter().sum::<usize>() / 3
}

/// Local clustering coefficient of every node, indexed like the view.
///
/// The fraction of a node's neighbor pairs that are themselves connected.
/// Nodes with fewer than two neighbors have coefficient 0.
pub fn local_clustering_coefficients(view: &GraphView) -> Vec<f64> {
    let triangles = triangles_per_node(view);

    (0..view.node_count)
        .map(|u| {
            let k = view.neighbors(u).iter().filter(|&&v| v != u).count();
            if k < 2 {
                0.0
            } else {
                2.0 * triangles[u] as f64 / (k * (k - 1)) as f64
            }
        })
        .collect()
}
