//! Graph algorithms module
//!
//! Algorithms are implemented in the `skillnet-graph-algorithms` crate.
//! This module provides the integration/adapter layer.

pub mod stats;

use crate::graph::SkillGraph;
use indexmap::IndexMap;
use skillnet_graph_algorithms::GraphView;

// Re-export algorithms
pub use skillnet_graph_algorithms::{
    count_triangles, local_clustering_coefficients, modularity, weakly_connected_components,
    Dendrogram, HierarchicalClustering, Hierarchy, Louvain, LouvainConfig, WccResult,
};
pub use stats::{CoefficientHistogram, GraphStatistics};

/// Build a GraphView from the skill graph for algorithm execution.
///
/// Dense indices follow the graph's node order; edge `weight` becomes the view weight.
pub fn build_view(graph: &SkillGraph) -> GraphView {
    let index_to_node: Vec<u64> = graph.nodes().map(|n| n.id.as_u64()).collect();
    let positions: std::collections::HashMap<u64, usize> = index_to_node
        .iter()
        .enumerate()
        .map(|(idx, &id)| (id, idx))
        .collect();

    let edges: Vec<(usize, usize, f64)> = graph
        .edges()
        .filter_map(|e| {
            let u = *positions.get(&e.source.as_u64())?;
            let v = *positions.get(&e.target.as_u64())?;
            Some((u, v, e.weight as f64))
        })
        .collect();

    GraphView::from_edge_list(index_to_node, &edges)
}

/// Local clustering coefficient of every skill, in graph order
pub fn clustering_coefficients(graph: &SkillGraph) -> IndexMap<String, f64> {
    let view = build_view(graph);
    let coefs = local_clustering_coefficients(&view);

    graph
        .nodes()
        .zip(coefs)
        .map(|(node, coef)| (node.name.clone(), coef))
        .collect()
}
