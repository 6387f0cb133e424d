//! Configured pipeline stages
//!
//! [`BuildStage`]: occupations → pruned skill graph → `skills_graph_name`.
//! [`ClusterStage`]: skill graph → detected, labeled, evaluated graph →
//! `clustered_skills_graph_name`.

use super::{
    build_skills_network, evaluate_communities, label_communities,
    prune_by_clustering_coefficient, BuildOutcome, CommunityDetector, EvaluationReport,
    PipelineError, PipelineResult,
};
use crate::algo::GraphStatistics;
use crate::config::SkillnetConfig;
use crate::graph::SkillGraph;
use crate::occupations::OccupationMap;
use crate::persistence::{load_graph, load_occupations, save_graph};
use crate::text::Normalizer;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::{info, warn};

pub struct BuildStage {
    threshold: u64,
    bad_coefs: Option<f64>,
    input: PathBuf,
    output: PathBuf,
}

impl BuildStage {
    pub fn new(config: &SkillnetConfig) -> Self {
        Self {
            threshold: config.edgeweight_prunethreshold,
            bad_coefs: config.bad_coefs,
            input: config.occupations_path(),
            output: config.skills_graph_path(),
        }
    }

    /// Build and optionally prune the skill graph from in-memory records
    pub fn build(&self, occupations: &OccupationMap) -> PipelineResult<BuildOutcome> {
        let mut outcome = build_skills_network(occupations, self.threshold)?;
        if let Some(bad_coefs) = self.bad_coefs {
            outcome.pruned_skills =
                prune_by_clustering_coefficient(&mut outcome.graph, bad_coefs);
        }

        let stats = GraphStatistics::compute(&outcome.graph);
        info!(
            "Skills network: {} skills, {} edges, total weight {}, {} components, \
             mean clustering coefficient {:.3}",
            stats.node_count,
            stats.edge_count,
            stats.total_weight,
            stats.component_count,
            stats.mean_clustering_coefficient
        );
        Ok(outcome)
    }

    /// Load occupations, build, and save the skill graph
    pub fn run(&self) -> PipelineResult<BuildOutcome> {
        let occupations = load_occupations(&self.input)?
            .ok_or_else(|| PipelineError::MissingInput(self.input.clone()))?;
        let outcome = self.build(&occupations)?;
        if !save_graph(&outcome.graph, &self.output)? {
            warn!("Skills network was not saved to {}", self.output.display());
        }
        Ok(outcome)
    }
}

#[derive(Debug)]
pub struct ClusterOutcome {
    pub graph: SkillGraph,
    /// Attribute keys written by detection, each of which was labeled
    pub granularities: BTreeSet<String>,
    /// `None` when the graph had nothing to evaluate
    pub report: Option<EvaluationReport>,
}

pub struct ClusterStage {
    detector: CommunityDetector,
    normalizer: Normalizer,
    top_n: usize,
    granularity: String,
    input: PathBuf,
    output: PathBuf,
}

impl ClusterStage {
    pub fn new(config: &SkillnetConfig) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Self {
            detector: CommunityDetector::louvain(
                config.louvain(),
                config.detection.subgroup_levels,
            ),
            normalizer: config.build_normalizer()?,
            top_n: config.top_cluster_top_names,
            granularity: config.cluster_granularity.clone(),
            input: config.skills_graph_path(),
            output: config.clustered_graph_path(),
        })
    }

    /// Detect, label every granularity, and evaluate `cluster_granularity`
    pub fn cluster(&self, mut graph: SkillGraph) -> PipelineResult<ClusterOutcome> {
        let granularities = self.detector.detect(&mut graph)?;
        for granularity in &granularities {
            label_communities(&mut graph, granularity, self.top_n, &self.normalizer)?;
        }

        let report = match evaluate_communities(&graph, &self.granularity) {
            Ok(report) => Some(report),
            Err(e @ (PipelineError::EmptyGraph | PipelineError::MissingAttribute { .. })) => {
                warn!("Skipping community evaluation: {}", e);
                None
            }
            Err(e) => return Err(e),
        };

        Ok(ClusterOutcome {
            graph,
            granularities,
            report,
        })
    }

    /// Load the skill graph, cluster it, and save the clustered graph
    pub fn run(&self) -> PipelineResult<ClusterOutcome> {
        let graph = load_graph(&self.input)?
            .ok_or_else(|| PipelineError::MissingInput(self.input.clone()))?;
        let outcome = self.cluster(graph)?;
        if !save_graph(&outcome.graph, &self.output)? {
            warn!("Clustered network was not saved to {}", self.output.display());
        }
        Ok(outcome)
    }
}
