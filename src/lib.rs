//! Skillnet: a skills taxonomy built from occupation data
//!
//! Occupations list the skills they require. Skills required together become
//! weighted edges of a co-occurrence graph, which is pruned, clustered into a
//! hierarchy of communities and labeled from the skill titles themselves.
//!
//! # Pipeline
//!
//! - [`pipeline::build_skills_network`]: pair counting, symmetric aggregation,
//!   exclusive weight threshold
//! - [`pipeline::prune_by_clustering_coefficient`]: drops transversal skills
//! - [`pipeline::CommunityDetector`]: seeded hierarchical Louvain, coarsest level first
//! - [`pipeline::label_communities`]: top terms per cluster
//! - [`pipeline::evaluate_communities`]: modularity diagnostics
//! - [`pipeline::add_cluster_colors`] and [`pipeline::ClusterView`]: presentation payload
//!
//! ## Example Usage
//!
//! ```rust
//! use skillnet::occupations::{Occupation, OccupationMap};
//! use skillnet::pipeline::{build_skills_network, CommunityDetector};
//!
//! let mut occupations = OccupationMap::new();
//! occupations.insert("occA".into(), Occupation::with_skills(["skill1", "skill2"]));
//! occupations.insert("occB".into(), Occupation::with_skills(["skill1", "skill2", "skill3"]));
//! occupations.insert("occC".into(), Occupation::with_skills(["skill1", "skill3"]));
//!
//! let mut graph = build_skills_network(&occupations, 1).unwrap().graph;
//! assert_eq!(graph.edge_weight("skill1", "skill2"), Some(2));
//!
//! let keys = CommunityDetector::default().detect(&mut graph).unwrap();
//! assert!(keys.contains("cluster_group"));
//! ```

#![warn(clippy::all)]

pub mod algo;
pub mod config;
pub mod graph;
pub mod occupations;
pub mod persistence;
pub mod pipeline;
pub mod text;

// Re-export main types for convenience
pub use graph::{Edge, EdgeId, GraphError, GraphResult, Node, NodeId, PropertyMap, SkillGraph};

pub use config::{ConfigError, ConfigResult, DetectionConfig, NormalizerConfig, SkillnetConfig};

pub use occupations::{Occupation, OccupationMap};

pub use persistence::{load_graph, load_occupations, save_graph, SnapshotError, SnapshotResult};

pub use pipeline::{
    BuildStage, ClusterOutcome, ClusterStage, ClusterView, CommunityDetector, EvaluationReport,
    PipelineError, PipelineResult,
};

pub use text::{Lemmatizer, Lexicon, Normalizer};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
