//! Skills taxonomy pipeline
//!
//! build → prune → detect → label → evaluate, then colors and the view payload
//! at the presentation boundary. Every stage takes the graph by reference and
//! only adds node attributes; nodes are removed only by the builder's pruning.

pub mod builder;
pub mod colors;
pub mod detect;
pub mod evaluate;
pub mod label;
pub mod stages;
pub mod view;

pub use builder::{
    build_skills_network, count_skill_pairs, prune_by_clustering_coefficient, symmetrize,
    BuildOutcome, PairCounts,
};
pub use colors::{add_cluster_colors, add_cluster_colors_with};
pub use detect::CommunityDetector;
pub use evaluate::{
    evaluate_communities, partition_modularity, EvaluationReport, SubgroupModularity,
};
pub use label::{cluster_label, label_communities};
pub use stages::{BuildStage, ClusterOutcome, ClusterStage};
pub use view::{skill_areas, ClusterView, LegendEntry, ViewEdge, ViewNode};

use crate::config::ConfigError;
use crate::graph::{GraphError, Node};
use crate::persistence::SnapshotError;
use std::path::PathBuf;
use thiserror::Error;

/// Full reversed cluster path, coarsest level first (e.g. `"2-0-5"`)
pub const CLUSTER_GROUP: &str = "cluster_group";

/// Coarsest subgroup attribute; selects a skill area in the view
pub const TOP_LEVEL_GROUP: &str = "cluster_subgroup0";

pub const CLUSTER_COLOR: &str = "cluster_color";

/// Separator between the top terms of a cluster label
pub const LABEL_SEPARATOR: &str = " | ";

/// Attribute key holding the path segment of `level` (0 = coarsest)
pub fn subgroup_key(level: usize) -> String {
    format!("cluster_subgroup{level}")
}

/// Attribute key holding the label of a granularity
pub fn name_key(granularity: &str) -> String {
    format!("{granularity}_name")
}

/// Errors raised by pipeline stages
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Skill '{node}' has no '{key}' attribute")]
    MissingAttribute { node: String, key: String },

    #[error("Community hierarchy does not cover skill '{0}'")]
    IncompleteHierarchy(String),

    #[error("Modularity is undefined for a graph without edges")]
    EmptyGraph,

    #[error("No usable input at {0}")]
    MissingInput(PathBuf),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// String form of a node attribute, or `MissingAttribute`
pub(crate) fn attribute(node: &Node, key: &str) -> PipelineResult<String> {
    node.get_str(key)
        .map(str::to_string)
        .ok_or_else(|| PipelineError::MissingAttribute {
            node: node.name.clone(),
            key: key.to_string(),
        })
}
