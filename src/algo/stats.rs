//! Summary statistics for a skill graph

use super::{
    build_view, count_triangles, local_clustering_coefficients, weakly_connected_components,
};
use crate::graph::SkillGraph;
use serde::Serialize;

/// Graph-level summary logged after building and reported by the CLI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStatistics {
    pub node_count: usize,
    pub edge_count: usize,
    pub total_weight: u64,
    pub component_count: usize,
    pub triangle_count: usize,
    pub mean_clustering_coefficient: f64,
}

impl GraphStatistics {
    pub fn compute(graph: &SkillGraph) -> Self {
        let view = build_view(graph);
        let coefs = local_clustering_coefficients(&view);
        let mean = if coefs.is_empty() {
            0.0
        } else {
            coefs.iter().sum::<f64>() / coefs.len() as f64
        };

        GraphStatistics {
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            total_weight: graph.total_weight(),
            component_count: weakly_connected_components(&view).components.len(),
            triangle_count: count_triangles(&view),
            mean_clustering_coefficient: mean,
        }
    }
}

/// Equal-width histogram of clustering coefficients over [0, 1].
///
/// Operators read it to pick the `bad_coefs` pruning threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoefficientHistogram {
    /// Lower edge of every bin
    pub lower_bounds: Vec<f64>,
    /// Node count per bin; the last bin includes 1.0
    pub counts: Vec<usize>,
}

impl CoefficientHistogram {
    pub const DEFAULT_BINS: usize = 10;

    pub fn from_coefficients(coefficients: impl IntoIterator<Item = f64>, bins: usize) -> Self {
        let bins = bins.max(1);
        let width = 1.0 / bins as f64;
        let mut counts = vec![0; bins];

        for coef in coefficients {
            let bin = ((coef.clamp(0.0, 1.0) / width) as usize).min(bins - 1);
            counts[bin] += 1;
        }

        CoefficientHistogram {
            lower_bounds: (0..bins).map(|i| i as f64 * width).collect(),
            counts,
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_of_two_components() {
        let mut graph = SkillGraph::new();
        for name in ["a", "b", "c", "x", "y"] {
            graph.add_node(name);
        }
        graph.add_edge("a", "b", 2).unwrap();
        graph.add_edge("b", "c", 2).unwrap();
        graph.add_edge("a", "c", 2).unwrap();
        graph.add_edge("x", "y", 4).unwrap();

        let stats = GraphStatistics::compute(&graph);
        assert_eq!(stats.node_count, 5);
        assert_eq!(stats.edge_count, 4);
        assert_eq!(stats.total_weight, 10);
        assert_eq!(stats.component_count, 2);
        assert_eq!(stats.triangle_count, 1);
        assert!((stats.mean_clustering_coefficient - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_histogram_bins() {
        let hist = CoefficientHistogram::from_coefficients([0.0, 0.05, 0.55, 0.99, 1.0], 10);
        assert_eq!(hist.counts[0], 2);
        assert_eq!(hist.counts[5], 1);
        assert_eq!(hist.counts[9], 2);
        assert_eq!(hist.total(), 5);
        assert_eq!(hist.lower_bounds.len(), 10);
    }
}
