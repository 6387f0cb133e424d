//! Random display colors per cluster path
//!
//! Colors are regenerated on every call and are not part of the
//! deterministic pipeline; only the presentation layer calls this.

use super::{attribute, PipelineResult, CLUSTER_COLOR, CLUSTER_GROUP};
use crate::graph::SkillGraph;
use indexmap::IndexMap;
use rand::Rng;

/// Assign a random `#rrggbb` color to every `cluster_group` and write it to
/// each member's `cluster_color`. Returns the group → color mapping.
pub fn add_cluster_colors(graph: &mut SkillGraph) -> PipelineResult<IndexMap<String, String>> {
    add_cluster_colors_with(graph, &mut rand::thread_rng())
}

/// [`add_cluster_colors`] with a caller-supplied RNG
pub fn add_cluster_colors_with<R: Rng>(
    graph: &mut SkillGraph,
    rng: &mut R,
) -> PipelineResult<IndexMap<String, String>> {
    let mut colors: IndexMap<String, String> = IndexMap::new();
    for node in graph.nodes() {
        let group = attribute(node, CLUSTER_GROUP)?;
        colors
            .entry(group)
            .or_insert_with(|| format!("#{:06x}", rng.gen_range(0..=0xFF_FFFFu32)));
    }

    for node in graph.nodes_mut() {
        let group = attribute(node, CLUSTER_GROUP)?;
        if let Some(color) = colors.get(&group) {
            node.set_property(CLUSTER_COLOR, color.as_str());
        }
    }
    Ok(colors)
}
