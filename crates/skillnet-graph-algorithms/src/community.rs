//! Community detection algorithms
//!
//! Connected components, weighted modularity and the interface shared by
//! hierarchical community detectors.

use super::common::{GraphView, NodeId};
use std::collections::HashMap;

/// A hierarchy of partitions, finest (level 0) to coarsest.
pub trait Hierarchy {
    /// Number of levels in the hierarchy
    fn dendrogram_depth(&self) -> usize;

    /// Community of every node at `level`.
    ///
    /// Levels past the coarsest one return the coarsest partition.
    fn partition_at_level(&self, level: usize) -> HashMap<NodeId, usize>;
}

/// An algorithm producing a [`Hierarchy`] from a graph view.
pub trait HierarchicalClustering {
    type Output: Hierarchy;

    fn cluster(&self, view: &GraphView) -> Self::Output;
}

/// Weighted modularity of a partition.
///
/// `communities[i]` is the community of the node at dense index `i`.
/// Returns `None` when the graph has no edge weight, where modularity is undefined.
pub fn modularity(view: &GraphView, communities: &[usize], resolution: f64) -> Option<f64> {
    let links = view.total_weight();
    if links <= 0.0 {
        return None;
    }

    let slots = communities.iter().copied().max().map_or(0, |c| c + 1);
    let mut internal = vec![0.0; slots];
    let mut degree = vec![0.0; slots];

    for u in 0..view.node_count {
        let c = communities[u];
        degree[c] += view.weighted_degree(u);
        for (&v, &w) in view.neighbors(u).iter().zip(view.weights(u)) {
            if communities[v] != c {
                continue;
            }
            // Non-loop edges are visited from both ends.
            internal[c] += if v == u { w } else { w / 2.0 };
        }
    }

    let mut seen = vec![false; slots];
    let mut q = 0.0;
    for &c in communities {
        if seen[c] {
            continue;
        }
        seen[c] = true;
        q += internal[c] / links - resolution * (degree[c] / (2.0 * links)).powi(2);
    }
    Some(q)
}

/// Result of WCC algorithm
pub struct WccResult {
    /// Map of Component ID -> List of NodeIds
    pub components: HashMap<usize, Vec<NodeId>>,
    /// Map of NodeId -> Component ID
    pub node_component: HashMap<NodeId, usize>,
}

/// Union-Find data structure
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        UnionFind {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, i: usize) -> usize {
        if self.parent[i] != i {
            self.parent[i] = self.find(self.parent[i]); // Path compression
        }
        self.parent[i]
    }

    fn union(&mut self, i: usize, j: usize) {
        let root_i = self.find(i);
        let root_j = self.find(j);

        if root_i != root_j {
            if self.rank[root_i] < self.rank[root_j] {
                self.parent[root_i] = root_j;
            } else if self.rank[root_i] > self.rank[root_j] {
                self.parent[root_j] = root_i;
            } else {
                self.parent[root_j] = root_i;
                self.rank[root_i] += 1;
            }
        }
    }
}

/// Weakly Connected Components (WCC)
///
/// Finds all disjoint subgraphs in the graph. Isolated nodes form their own component.
pub fn weakly_connected_components(view: &GraphView) -> WccResult {
    let n = view.node_count;
    let mut uf = UnionFind::new(n);

    for u_idx in 0..n {
        for &v_idx in view.neighbors(u_idx) {
            uf.union(u_idx, v_idx);
        }
    }

    let mut components = HashMap::new();
    let mut node_component = HashMap::new();

    for i in 0..n {
        let root = uf.find(i);
        let node_id = view.index_to_node[i];

        components.entry(root).or_insert_with(Vec::new).push(node_id);
        node_component.insert(node_id, root);
    }

    WccResult {
        components,
        node_component,
    }
}
