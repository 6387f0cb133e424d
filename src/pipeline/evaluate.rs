//! Modularity diagnostics for a clustered skill graph

use super::{attribute, PipelineError, PipelineResult, CLUSTER_GROUP, TOP_LEVEL_GROUP};
use crate::algo::{build_view, modularity};
use crate::graph::SkillGraph;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Modularity of the `cluster_group` partition inside one top-level area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubgroupModularity {
    pub cluster: String,
    pub modularity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub granularity: String,
    /// Whole-graph modularity of the `granularity` partition
    pub overall: f64,
    /// Non-zero per-area scores, in first-seen area order
    pub subgroups: Vec<SubgroupModularity>,
}

/// Weighted modularity of the partition given by the `key` attribute.
///
/// `Ok(None)` when the graph has no edges.
pub fn partition_modularity(graph: &SkillGraph, key: &str) -> PipelineResult<Option<f64>> {
    let mut ids: IndexMap<String, usize> = IndexMap::new();
    let mut communities = Vec::with_capacity(graph.node_count());
    for node in graph.nodes() {
        let value = attribute(node, key)?;
        let next = ids.len();
        communities.push(*ids.entry(value).or_insert(next));
    }

    let view = build_view(graph);
    Ok(modularity(&view, &communities, 1.0))
}

/// Overall modularity under `granularity`, plus the modularity of
/// `cluster_group` within every `cluster_subgroup0` area.
///
/// Areas scoring zero (including areas without internal edges) are left out.
pub fn evaluate_communities(
    graph: &SkillGraph,
    granularity: &str,
) -> PipelineResult<EvaluationReport> {
    let overall =
        partition_modularity(graph, granularity)?.ok_or(PipelineError::EmptyGraph)?;
    info!("Overall network modularity: {:.2}", overall);

    let mut areas: IndexMap<String, Vec<&str>> = IndexMap::new();
    for node in graph.nodes() {
        areas
            .entry(attribute(node, TOP_LEVEL_GROUP)?)
            .or_default()
            .push(node.name.as_str());
    }

    let mut subgroups = Vec::new();
    for (cluster, members) in areas {
        let subgraph = graph.subgraph(members);
        let score = partition_modularity(&subgraph, CLUSTER_GROUP)?.unwrap_or(0.0);
        if score != 0.0 {
            info!("Cluster {} modularity: {:.2}", cluster, score);
            subgroups.push(SubgroupModularity {
                cluster,
                modularity: score,
            });
        }
    }

    Ok(EvaluationReport {
        granularity: granularity.to_string(),
        overall,
        subgroups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two triangles joined by a bridge c-d
    fn barbell() -> SkillGraph {
        let mut graph = SkillGraph::new();
        for name in ["a", "b", "c", "d", "e", "f"] {
            graph.add_node(name);
        }
        let edges = [
            ("a", "b"),
            ("b", "c"),
            ("a", "c"),
            ("d", "e"),
            ("e", "f"),
            ("d", "f"),
            ("c", "d"),
        ];
        for (a, b) in edges {
            graph.add_edge(a, b, 1).unwrap();
        }
        graph
    }

    /// One area per triangle
    fn two_areas() -> [(&'static str, &'static str); 6] {
        [
            ("a", "0"),
            ("b", "0"),
            ("c", "0"),
            ("d", "1"),
            ("e", "1"),
            ("f", "1"),
        ]
    }

    fn annotate(graph: &mut SkillGraph, key: &str, values: &[(&str, &str)]) {
        for (name, value) in values {
            graph.set_node_property(name, key, *value).unwrap();
        }
    }

    #[test]
    fn test_single_cluster_has_zero_modularity() {
        let mut graph = barbell();
        for name in ["a", "b", "c", "d", "e", "f"] {
            graph.set_node_property(name, "cluster_subgroup0", "0").unwrap();
        }

        let q = partition_modularity(&graph, "cluster_subgroup0").unwrap().unwrap();
        assert!(q.abs() < 1e-12);
    }

    #[test]
    fn test_two_triangles() {
        let mut graph = barbell();
        annotate(&mut graph, "cluster_subgroup0", &two_areas());

        // m = 7; each side: 3 internal edges, degree sum 7
        let expected = 2.0 * (3.0 / 7.0 - 0.25);
        let q = partition_modularity(&graph, "cluster_subgroup0").unwrap().unwrap();
        assert!((q - expected).abs() < 1e-12);
    }

    #[test]
    fn test_trivial_subgroups_are_suppressed() {
        let mut graph = barbell();
        annotate(&mut graph, "cluster_subgroup0", &two_areas());
        let paths = [
            ("a", "0-0"),
            ("b", "0-0"),
            ("c", "0-0"),
            ("d", "1-1"),
            ("e", "1-1"),
            ("f", "1-1"),
        ];
        annotate(&mut graph, "cluster_group", &paths);

        let report = evaluate_communities(&graph, "cluster_subgroup0").unwrap();
        assert!(report.overall > 0.0);
        assert!(report.subgroups.is_empty());
        assert_eq!(report.granularity, "cluster_subgroup0");
    }

    #[test]
    fn test_split_subgroup_is_reported() {
        // Path a-b-c-d inside one area, split in two halves
        let mut graph = SkillGraph::new();
        for name in ["a", "b", "c", "d"] {
            graph.add_node(name);
            graph.set_node_property(name, "cluster_subgroup0", "0").unwrap();
        }
        graph.add_edge("a", "b", 3).unwrap();
        graph.add_edge("b", "c", 1).unwrap();
        graph.add_edge("c", "d", 3).unwrap();
        let paths = [("a", "0-0"), ("b", "0-0"), ("c", "0-1"), ("d", "0-1")];
        annotate(&mut graph, "cluster_group", &paths);

        let report = evaluate_communities(&graph, "cluster_subgroup0").unwrap();
        assert_eq!(report.subgroups.len(), 1);
        assert_eq!(report.subgroups[0].cluster, "0");
        assert!(report.subgroups[0].modularity > 0.0);
    }

    #[test]
    fn test_graph_without_edges() {
        let mut graph = SkillGraph::new();
        graph.add_node("a");
        graph.set_node_property("a", "cluster_subgroup0", "0").unwrap();

        assert_eq!(partition_modularity(&graph, "cluster_subgroup0").unwrap(), None);
        assert!(matches!(
            evaluate_communities(&graph, "cluster_subgroup0"),
            Err(PipelineError::EmptyGraph)
        ));
    }
}
