//! Shared utilities for graph algorithms
//!
//! Provides a read-only, optimized view of an undirected, weighted graph for algorithm execution.

use std::collections::HashMap;

/// Node Identifier type (u64)
pub type NodeId = u64;

/// A dense, integer-indexed view of an undirected graph using Compressed Sparse Row (CSR) format.
///
/// Every undirected edge `{u, v}` is stored in both rows `u` and `v`.
/// A self-loop is stored once, in its own row.
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// Mapping from dense index (0..N) back to NodeId
    pub index_to_node: Vec<NodeId>,
    /// Mapping from NodeId to dense index
    pub node_to_index: HashMap<NodeId, usize>,

    /// Offsets into `targets`. Size = node_count + 1
    pub offsets: Vec<usize>,
    /// Contiguous array of neighbor indices
    pub targets: Vec<usize>,
    /// Edge weights, aligned with `targets`
    pub weights: Vec<f64>,
}

impl GraphView {
    /// Get the number of incident edge entries of a node (by index)
    pub fn degree(&self, idx: usize) -> usize {
        self.offsets[idx + 1] - self.offsets[idx]
    }

    /// Get neighbors of a node
    pub fn neighbors(&self, idx: usize) -> &[usize] {
        let start = self.offsets[idx];
        let end = self.offsets[idx + 1];
        &self.targets[start..end]
    }

    /// Get weights aligned with [`GraphView::neighbors`]
    pub fn weights(&self, idx: usize) -> &[f64] {
        let start = self.offsets[idx];
        let end = self.offsets[idx + 1];
        &self.weights[start..end]
    }

    /// Weighted degree of a node. A self-loop contributes its weight twice.
    pub fn weighted_degree(&self, idx: usize) -> f64 {
        self.neighbors(idx)
            .iter()
            .zip(self.weights(idx))
            .map(|(&v, &w)| if v == idx { 2.0 * w } else { w })
            .sum()
    }

    /// Sum of all edge weights, each undirected edge counted once
    pub fn total_weight(&self) -> f64 {
        let mut total = 0.0;
        for u in 0..self.node_count {
            for (&v, &w) in self.neighbors(u).iter().zip(self.weights(u)) {
                if v >= u {
                    total += w;
                }
            }
        }
        total
    }

    /// Number of undirected edges (self-loops included)
    pub fn edge_count(&self) -> usize {
        (0..self.node_count)
            .map(|u| self.neighbors(u).iter().filter(|&&v| v >= u).count())
            .sum()
    }

    /// Build a view from an undirected edge list over dense indices.
    ///
    /// Each `(u, v, weight)` entry is one undirected edge; callers must not list
    /// the same pair twice.
    pub fn from_edge_list(index_to_node: Vec<NodeId>, edges: &[(usize, usize, f64)]) -> Self {
        let node_count = index_to_node.len();
        let node_to_index = index_to_node
            .iter()
            .enumerate()
            .map(|(idx, &id)| (id, idx))
            .collect();

        let mut rows: Vec<Vec<(usize, f64)>> = vec![Vec::new(); node_count];
        for &(u, v, w) in edges {
            rows[u].push((v, w));
            if u != v {
                rows[v].push((u, w));
            }
        }

        let mut offsets = Vec::with_capacity(node_count + 1);
        let mut targets = Vec::with_capacity(edges.len() * 2);
        let mut weights = Vec::with_capacity(edges.len() * 2);

        offsets.push(0);
        for row in rows {
            for (v, w) in row {
                targets.push(v);
                weights.push(w);
            }
            offsets.push(targets.len());
        }

        GraphView {
            node_count,
            index_to_node,
            node_to_index,
            offsets,
            targets,
            weights,
        }
    }
}
