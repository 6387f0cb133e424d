//! Presentation payload for one skill area
//!
//! An area is one `cluster_subgroup0_name` value. The payload holds the
//! induced subgraph of its skills, colored by `cluster_color`, plus a legend
//! of the finest labeled subgroups inside it.

use super::{attribute, name_key, subgroup_key, PipelineResult, CLUSTER_COLOR, TOP_LEVEL_GROUP};
use crate::graph::SkillGraph;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const NODE_SIZE: u32 = 50;
pub const EDGE_COLOR: &str = "silver";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewNode {
    pub id: String,
    pub color: String,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewEdge {
    pub source: String,
    pub target: String,
    pub color: String,
    pub weight: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterView {
    pub area: String,
    pub skill_count: usize,
    pub nodes: Vec<ViewNode>,
    pub edges: Vec<ViewEdge>,
    pub legend: Vec<LegendEntry>,
}

/// Distinct top-level area names, sorted
pub fn skill_areas(graph: &SkillGraph) -> Vec<String> {
    let key = name_key(TOP_LEVEL_GROUP);
    graph
        .nodes()
        .filter_map(|node| node.get_str(&key))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

impl ClusterView {
    /// Build the payload for `area`, or `None` when no skill belongs to it.
    ///
    /// Nodes must already carry `cluster_color`.
    pub fn for_area(graph: &SkillGraph, area: &str) -> PipelineResult<Option<Self>> {
        let area_key = name_key(TOP_LEVEL_GROUP);
        let members: Vec<&str> = graph
            .nodes()
            .filter(|node| node.get_str(&area_key) == Some(area))
            .map(|node| node.name.as_str())
            .collect();
        if members.is_empty() {
            return Ok(None);
        }

        let subgraph = graph.subgraph(members.iter().copied());
        let legend_key = finest_label_key(&subgraph);

        let mut nodes = Vec::with_capacity(subgraph.node_count());
        let mut legend: IndexMap<String, String> = IndexMap::new();
        for node in subgraph.nodes() {
            let color = attribute(node, CLUSTER_COLOR)?;
            let name = attribute(node, &legend_key)?;
            legend.insert(name, color.clone());
            nodes.push(ViewNode {
                id: node.name.clone(),
                color,
                size: NODE_SIZE,
            });
        }

        let edges = subgraph
            .edges()
            .map(|edge| {
                let (source, target) = subgraph.endpoints(edge);
                ViewEdge {
                    source: source.to_string(),
                    target: target.to_string(),
                    color: EDGE_COLOR.to_string(),
                    weight: edge.weight,
                }
            })
            .collect();

        Ok(Some(ClusterView {
            area: area.to_string(),
            skill_count: nodes.len(),
            nodes,
            edges,
            legend: legend
                .into_iter()
                .map(|(name, color)| LegendEntry { name, color })
                .collect(),
        }))
    }
}

/// Deepest `cluster_subgroup{k}_name` carried by every node of the graph
fn finest_label_key(graph: &SkillGraph) -> String {
    let mut level = 0;
    while graph.node_count() > 0
        && graph
            .nodes()
            .all(|node| node.has_property(&name_key(&subgroup_key(level + 1))))
    {
        level += 1;
    }
    name_key(&subgroup_key(level))
}
