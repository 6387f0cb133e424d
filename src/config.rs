//! Pipeline configuration
//!
//! Loaded from a YAML document. Relative paths are resolved against an
//! explicit project root rather than the process working directory.

use crate::algo::LouvainConfig;
use crate::pipeline::{subgroup_key, CLUSTER_GROUP};
use crate::text::{Lexicon, Normalizer};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Hierarchical community detection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub seed: u64,
    pub resolution: f64,
    /// Number of `cluster_subgroup{k}` attributes to write
    pub subgroup_levels: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            resolution: 1.0,
            subgroup_levels: 3,
        }
    }
}

/// Label text normalization settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Extra lexicon merged over the bundled one
    pub lexicon_path: Option<PathBuf>,
    pub extra_stopwords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillnetConfig {
    /// Base for every relative path below
    #[serde(skip)]
    pub root: PathBuf,
    pub occupations_data_path: PathBuf,
    pub output_dir: PathBuf,
    /// Edges with weight <= this are dropped
    pub edgeweight_prunethreshold: u64,
    /// Skills with clustering coefficient < this are removed; `None` skips pruning
    pub bad_coefs: Option<f64>,
    pub skills_graph_name: String,
    pub clustered_skills_graph_name: String,
    pub top_cluster_top_names: usize,
    pub cluster_granularity: String,
    pub detection: DetectionConfig,
    pub normalizer: NormalizerConfig,
}

impl Default for SkillnetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            occupations_data_path: PathBuf::from("data/inputs/occupations.json.gz"),
            output_dir: PathBuf::from("data/outputs"),
            edgeweight_prunethreshold: 0,
            bad_coefs: None,
            skills_graph_name: "skills_graph.bin.gz".to_string(),
            clustered_skills_graph_name: "clustered_skills_graph.bin.gz".to_string(),
            top_cluster_top_names: 5,
            cluster_granularity: "cluster_subgroup0".to_string(),
            detection: DetectionConfig::default(),
            normalizer: NormalizerConfig::default(),
        }
    }
}

impl SkillnetConfig {
    /// Read and validate a YAML config file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> ConfigResult<Self> {
        let config: SkillnetConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.top_cluster_top_names == 0 {
            return Err(ConfigError::Invalid(
                "top_cluster_top_names must be greater than 0".to_string(),
            ));
        }

        if self.detection.subgroup_levels == 0 {
            return Err(ConfigError::Invalid(
                "detection.subgroup_levels must be greater than 0".to_string(),
            ));
        }

        if !(self.detection.resolution > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "detection.resolution must be positive, got {}",
                self.detection.resolution
            )));
        }

        if let Some(bad_coefs) = self.bad_coefs {
            if !(0.0..=1.0).contains(&bad_coefs) {
                return Err(ConfigError::Invalid(format!(
                    "bad_coefs must lie in [0, 1], got {}",
                    bad_coefs
                )));
            }
        }

        let levels = self.detection.subgroup_levels;
        let known_granularity = self.cluster_granularity == CLUSTER_GROUP
            || (0..levels).any(|level| self.cluster_granularity == subgroup_key(level));
        if !known_granularity {
            return Err(ConfigError::Invalid(format!(
                "cluster_granularity must be {} or one of {}..{}, got '{}'",
                CLUSTER_GROUP,
                subgroup_key(0),
                subgroup_key(levels - 1),
                self.cluster_granularity
            )));
        }

        Ok(())
    }

    pub fn occupations_path(&self) -> PathBuf {
        self.root.join(&self.occupations_data_path)
    }

    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.output_dir)
    }

    pub fn skills_graph_path(&self) -> PathBuf {
        self.output_path().join(&self.skills_graph_name)
    }

    pub fn clustered_graph_path(&self) -> PathBuf {
        self.output_path().join(&self.clustered_skills_graph_name)
    }

    pub fn louvain(&self) -> LouvainConfig {
        LouvainConfig {
            resolution: self.detection.resolution,
            seed: self.detection.seed,
        }
    }

    /// Normalizer with the bundled lexicon, the configured lexicon merged on
    /// top, and the configured extra stopwords.
    pub fn build_normalizer(&self) -> ConfigResult<Normalizer> {
        let mut lexicon = Lexicon::bundled();
        if let Some(path) = &self.normalizer.lexicon_path {
            let path = self.root.join(path);
            let extra = Lexicon::from_file(&path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            debug!("Merged {} lexicon entries from {}", extra.len(), path.display());
            lexicon.extend(extra);
        }

        let mut normalizer = Normalizer::with_lexicon(lexicon);
        normalizer.extend_stopwords(&self.normalizer.extra_stopwords);
        Ok(normalizer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASE: &str = r#"
occupations_data_path: data/inputs/occupations.json.gz
edgeweight_prunethreshold: 5
bad_coefs: 0.1
skills_graph_name: skills.bin
clustered_skills_graph_name: clustered.bin
top_cluster_top_names: 3
cluster_granularity: cluster_subgroup0
detection:
  seed: 7
"#;

    #[test]
    fn test_parse_with_defaults() {
        let config = SkillnetConfig::from_yaml_str(BASE).unwrap();

        assert_eq!(config.edgeweight_prunethreshold, 5);
        assert_eq!(config.bad_coefs, Some(0.1));
        assert_eq!(config.top_cluster_top_names, 3);
        assert_eq!(config.detection.seed, 7);
        assert_eq!(config.detection.subgroup_levels, 3);
        assert_eq!(config.detection.resolution, 1.0);
        assert_eq!(config.output_dir, PathBuf::from("data/outputs"));
        assert!(config.normalizer.extra_stopwords.is_empty());
    }

    #[test]
    fn test_paths_resolve_against_root() {
        let config = SkillnetConfig::from_yaml_str(BASE).unwrap().with_root("/srv/skills");

        assert_eq!(
            config.skills_graph_path(),
            PathBuf::from("/srv/skills/data/outputs/skills.bin")
        );
        assert_eq!(
            config.occupations_path(),
            PathBuf::from("/srv/skills/data/inputs/occupations.json.gz")
        );
    }

    #[test]
    fn test_validation() {
        let bad = SkillnetConfig {
            top_cluster_top_names: 0,
            ..SkillnetConfig::default()
        };
        assert!(matches!(bad.validate(), Err(ConfigError::Invalid(_))));

        let bad = SkillnetConfig {
            bad_coefs: Some(1.5),
            ..SkillnetConfig::default()
        };
        assert!(bad.validate().is_err());

        let mut bad = SkillnetConfig::default();
        bad.detection.resolution = 0.0;
        assert!(bad.validate().is_err());

        for granularity in ["cluster_subgrup0", "cluster_subgroup3", ""] {
            let bad = SkillnetConfig {
                cluster_granularity: granularity.to_string(),
                ..SkillnetConfig::default()
            };
            assert!(matches!(bad.validate(), Err(ConfigError::Invalid(_))), "{}", granularity);
        }
        for granularity in ["cluster_group", "cluster_subgroup0", "cluster_subgroup2"] {
            let good = SkillnetConfig {
                cluster_granularity: granularity.to_string(),
                ..SkillnetConfig::default()
            };
            assert!(good.validate().is_ok(), "{}", granularity);
        }

        assert!(SkillnetConfig::default().validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(BASE.as_bytes()).unwrap();

        let config = SkillnetConfig::load(file.path()).unwrap();
        assert_eq!(config.clustered_skills_graph_name, "clustered.bin");

        assert!(matches!(
            SkillnetConfig::load("/nonexistent/base.yaml"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_build_normalizer_with_extras() {
        let mut lexicon = NamedTempFile::new().unwrap();
        writeln!(lexicon, "soldering solder").unwrap();

        let mut config = SkillnetConfig::default();
        config.normalizer.lexicon_path = Some(lexicon.path().to_path_buf());
        config.normalizer.extra_stopwords = vec!["perform".to_string()];

        let normalizer = config.build_normalizer().unwrap();
        assert_eq!(normalizer.normalize_phrase("perform soldering"), vec!["solder"]);
    }
}
