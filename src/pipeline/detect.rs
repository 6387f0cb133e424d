//! Hierarchical community detection over the skill graph
//!
//! Writes, per skill:
//! - `cluster_group`: every level's community id joined with `-`, coarsest first
//! - `cluster_subgroup{k}`: the k-th segment of that path, for the first K levels

use super::{subgroup_key, PipelineError, PipelineResult, CLUSTER_GROUP};
use crate::algo::{build_view, HierarchicalClustering, Hierarchy, Louvain, LouvainConfig};
use crate::graph::SkillGraph;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info, warn};

/// Default number of `cluster_subgroup{k}` attributes
pub const DEFAULT_SUBGROUP_LEVELS: usize = 3;

#[derive(Debug, Clone)]
pub struct CommunityDetector<C = Louvain> {
    clustering: C,
    subgroup_levels: usize,
}

impl CommunityDetector<Louvain> {
    pub fn louvain(config: LouvainConfig, subgroup_levels: usize) -> Self {
        Self::new(Louvain::new(config), subgroup_levels)
    }
}

impl Default for CommunityDetector<Louvain> {
    fn default() -> Self {
        Self::louvain(LouvainConfig::default(), DEFAULT_SUBGROUP_LEVELS)
    }
}

impl<C: HierarchicalClustering> CommunityDetector<C> {
    pub fn new(clustering: C, subgroup_levels: usize) -> Self {
        Self {
            clustering,
            subgroup_levels,
        }
    }

    /// Cluster the graph and annotate every skill with its community path.
    ///
    /// Returns the attribute keys written. When the hierarchy has fewer levels
    /// than requested, only the available `cluster_subgroup{k}` keys are written.
    pub fn detect(&self, graph: &mut SkillGraph) -> PipelineResult<BTreeSet<String>> {
        let view = build_view(graph);
        let hierarchy = self.clustering.cluster(&view);
        let depth = hierarchy.dendrogram_depth();

        let partitions: Vec<_> = (0..depth)
            .map(|level| hierarchy.partition_at_level(level))
            .collect();
        for (level, partition) in partitions.iter().enumerate() {
            let communities: HashSet<usize> = partition.values().copied().collect();
            debug!("Level {}: {} communities", level, communities.len());
        }

        let levels = self.subgroup_levels.min(depth);
        if levels < self.subgroup_levels {
            warn!(
                "Community hierarchy has {} levels, fewer than the {} requested subgroup levels",
                depth, self.subgroup_levels
            );
        }

        for node in graph.nodes_mut() {
            let id = node.id.as_u64();
            // Finest level first in the hierarchy, stored coarsest first.
            let path = partitions
                .iter()
                .rev()
                .map(|partition| partition.get(&id).map(ToString::to_string))
                .collect::<Option<Vec<String>>>()
                .ok_or_else(|| PipelineError::IncompleteHierarchy(node.name.clone()))?;

            for (level, segment) in path.iter().take(levels).enumerate() {
                node.set_property(subgroup_key(level), segment.as_str());
            }
            node.set_property(CLUSTER_GROUP, path.join("-"));
        }

        let mut keys: BTreeSet<String> = (0..levels).map(subgroup_key).collect();
        keys.insert(CLUSTER_GROUP.to_string());

        info!(
            "Detected communities: {} levels, {} skills annotated",
            depth,
            graph.node_count()
        );
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillnet_graph_algorithms::GraphView;
    use std::collections::HashMap;

    /// Fixed three-level hierarchy: every node alone, then pairs, then everything.
    struct FixedHierarchy {
        ids: Vec<u64>,
    }

    impl Hierarchy for FixedHierarchy {
        fn dendrogram_depth(&self) -> usize {
            3
        }

        fn partition_at_level(&self, level: usize) -> HashMap<u64, usize> {
            self.ids
                .iter()
                .enumerate()
                .map(|(i, &id)| {
                    let community = match level {
                        0 => i,
                        1 => i / 2,
                        _ => 0,
                    };
                    (id, community)
                })
                .collect::<HashMap<_, _>>()
        }
    }

    struct Fixed;

    impl HierarchicalClustering for Fixed {
        type Output = FixedHierarchy;

        fn cluster(&self, view: &GraphView) -> FixedHierarchy {
            FixedHierarchy {
                ids: view.index_to_node.clone(),
            }
        }
    }

    fn path_graph() -> SkillGraph {
        let mut graph = SkillGraph::new();
        for name in ["a", "b", "c", "d"] {
            graph.add_node(name);
        }
        graph.add_edge("a", "b", 1).unwrap();
        graph.add_edge("b", "c", 1).unwrap();
        graph.add_edge("c", "d", 1).unwrap();
        graph
    }

    #[test]
    fn test_paths_are_reversed() {
        let mut graph = path_graph();
        let keys = CommunityDetector::new(Fixed, 3).detect(&mut graph).unwrap();

        let expected: BTreeSet<String> = [
            "cluster_group",
            "cluster_subgroup0",
            "cluster_subgroup1",
            "cluster_subgroup2",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        assert_eq!(keys, expected);

        let node = graph.node("d").unwrap();
        assert_eq!(node.get_str("cluster_group"), Some("0-1-3"));
        assert_eq!(node.get_str("cluster_subgroup0"), Some("0"));
        assert_eq!(node.get_str("cluster_subgroup1"), Some("1"));
        assert_eq!(node.get_str("cluster_subgroup2"), Some("3"));
    }

    #[test]
    fn test_fewer_subgroup_levels() {
        let mut graph = path_graph();
        let keys = CommunityDetector::new(Fixed, 1).detect(&mut graph).unwrap();

        assert_eq!(keys.len(), 2);
        let node = graph.node("c").unwrap();
        assert_eq!(node.get_str("cluster_group"), Some("0-1-2"));
        assert!(!node.has_property("cluster_subgroup1"));
    }

    #[test]
    fn test_shallow_hierarchy_writes_available_levels() {
        // No edges: a single level with every skill alone.
        let mut graph = SkillGraph::new();
        graph.add_node("a");
        graph.add_node("b");

        let keys = CommunityDetector::default().detect(&mut graph).unwrap();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains("cluster_subgroup0"));

        let a = graph.node("a").unwrap().get_str("cluster_group").unwrap().to_string();
        let b = graph.node("b").unwrap().get_str("cluster_group").unwrap().to_string();
        assert_ne!(a, b);
        assert_eq!(a.split('-').count(), 1);
    }
}
