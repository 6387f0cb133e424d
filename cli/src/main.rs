//! Skillnet CLI: runs the skills taxonomy pipeline from a YAML config

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use skillnet::algo::{clustering_coefficients, CoefficientHistogram, GraphStatistics};
use skillnet::pipeline::{
    add_cluster_colors, build_skills_network, skill_areas, BuildOutcome, ClusterOutcome,
};
use skillnet::{
    load_graph, load_occupations, BuildStage, ClusterStage, ClusterView, SkillnetConfig,
};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skillnet", version, about = "Skills taxonomy network tool")]
struct Cli {
    /// Pipeline configuration file
    #[arg(long, default_value = "config/base.yaml", global = true)]
    config: PathBuf,

    /// Project root that relative config paths are resolved against
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Override the configured output directory
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the weighted skills network from occupation data
    Build {
        /// Override edgeweight_prunethreshold
        #[arg(long)]
        threshold: Option<u64>,

        /// Override bad_coefs
        #[arg(long)]
        bad_coefs: Option<f64>,
    },
    /// Detect, label and evaluate skill communities
    Cluster {
        /// Override the detection seed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Build, then cluster
    Run {
        #[arg(long)]
        threshold: Option<u64>,

        #[arg(long)]
        seed: Option<u64>,
    },
    /// Clustering coefficient histogram of the unpruned network
    Coefficients {
        #[arg(long, default_value_t = CoefficientHistogram::DEFAULT_BINS)]
        bins: usize,
    },
    /// List skill areas of the clustered network
    Areas,
    /// Export the view of one skill area as JSON
    View {
        /// Skill area name (a cluster_subgroup0_name value)
        #[arg(long)]
        area: String,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = SkillnetConfig::load(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?
        .with_root(&cli.root);
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }

    match cli.command {
        Commands::Build { threshold, bad_coefs } => {
            if let Some(threshold) = threshold {
                config.edgeweight_prunethreshold = threshold;
            }
            if bad_coefs.is_some() {
                config.bad_coefs = bad_coefs;
            }
            config.validate()?;
            let outcome = BuildStage::new(&config)
                .run()
                .context("building skills network")?;
            print_build(&outcome, &cli.format)
        }
        Commands::Cluster { seed } => {
            if let Some(seed) = seed {
                config.detection.seed = seed;
            }
            let outcome = ClusterStage::new(&config)?
                .run()
                .context("clustering skills network")?;
            print_cluster(&outcome, &cli.format)
        }
        Commands::Run { threshold, seed } => {
            if let Some(threshold) = threshold {
                config.edgeweight_prunethreshold = threshold;
            }
            if let Some(seed) = seed {
                config.detection.seed = seed;
            }
            let built = BuildStage::new(&config)
                .run()
                .context("building skills network")?;
            print_build(&built, &cli.format)?;
            let clustered = ClusterStage::new(&config)?
                .run()
                .context("clustering skills network")?;
            print_cluster(&clustered, &cli.format)
        }
        Commands::Coefficients { bins } => run_coefficients(&config, bins, &cli.format),
        Commands::Areas => {
            let graph = load_clustered(&config.clustered_graph_path())?;
            let areas = skill_areas(&graph);
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&areas)?),
                OutputFormat::Table => {
                    let mut table = Table::new();
                    table.set_content_arrangement(ContentArrangement::Dynamic);
                    table.set_header(vec!["Skill area"]);
                    for area in &areas {
                        table.add_row(vec![area.clone()]);
                    }
                    println!("{}", table);
                    println!("{} area(s)", areas.len());
                }
            }
            Ok(())
        }
        Commands::View { area, output } => {
            let mut graph = load_clustered(&config.clustered_graph_path())?;
            add_cluster_colors(&mut graph)?;
            let Some(view) = ClusterView::for_area(&graph, &area)? else {
                bail!("no skill area named '{}'", area);
            };

            let json = serde_json::to_string_pretty(&view)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!(
                        "Wrote view of '{}' ({} skills) to {}",
                        area,
                        view.skill_count,
                        path.display()
                    );
                }
                None => println!("{}", json),
            }
            Ok(())
        }
    }
}

fn load_clustered(path: &Path) -> Result<skillnet::SkillGraph> {
    match load_graph(path).with_context(|| format!("loading {}", path.display()))? {
        Some(graph) => Ok(graph),
        None => bail!("{} is not a supported snapshot", path.display()),
    }
}

fn run_coefficients(config: &SkillnetConfig, bins: usize, format: &OutputFormat) -> Result<()> {
    if bins == 0 {
        bail!("--bins must be greater than 0");
    }
    let path = config.occupations_path();
    let occupations =
        load_occupations(&path).with_context(|| format!("loading {}", path.display()))?;
    let Some(occupations) = occupations else {
        bail!("{} is not a supported occupations file", path.display());
    };

    let graph = build_skills_network(&occupations, config.edgeweight_prunethreshold)?.graph;
    let coefficients = clustering_coefficients(&graph).into_values();
    let histogram = CoefficientHistogram::from_coefficients(coefficients, bins);

    match format {
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = histogram
                .lower_bounds
                .iter()
                .zip(&histogram.counts)
                .map(|(lower, count)| {
                    serde_json::json!({ "lower_bound": lower, "skills": count })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Coefficient", "Skills"]);
            for (lower, count) in histogram.lower_bounds.iter().zip(&histogram.counts) {
                table.add_row(vec![format!(">= {:.2}", lower), count.to_string()]);
            }
            println!("{}", table);
            println!("{} skill(s)", histogram.total());
        }
    }
    Ok(())
}

fn print_build(outcome: &BuildOutcome, format: &OutputFormat) -> Result<()> {
    let stats = GraphStatistics::compute(&outcome.graph);
    match format {
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "skills": stats.node_count,
                "edges": stats.edge_count,
                "total_weight": stats.total_weight,
                "components": stats.component_count,
                "triangles": stats.triangle_count,
                "mean_clustering_coefficient": stats.mean_clustering_coefficient,
                "pruned_skills": outcome.pruned_skills,
                "skipped_occupations": outcome.skipped_occupations,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Skills network", "Value"]);
            table.add_row(vec!["skills".to_string(), stats.node_count.to_string()]);
            table.add_row(vec!["edges".to_string(), stats.edge_count.to_string()]);
            table.add_row(vec!["total weight".to_string(), stats.total_weight.to_string()]);
            table.add_row(vec!["components".to_string(), stats.component_count.to_string()]);
            table.add_row(vec!["triangles".to_string(), stats.triangle_count.to_string()]);
            table.add_row(vec![
                "mean clustering coefficient".to_string(),
                format!("{:.3}", stats.mean_clustering_coefficient),
            ]);
            table.add_row(vec!["pruned skills".to_string(), outcome.pruned_skills.to_string()]);
            table.add_row(vec![
                "skipped occupations".to_string(),
                outcome.skipped_occupations.len().to_string(),
            ]);
            println!("{}", table);
        }
    }
    Ok(())
}

fn print_cluster(outcome: &ClusterOutcome, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "skills": outcome.graph.node_count(),
                "granularities": outcome.granularities,
                "evaluation": outcome.report,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Table => {
            let granularities: Vec<&str> =
                outcome.granularities.iter().map(String::as_str).collect();
            println!("Labeled granularities: {}", granularities.join(", "));
            let Some(report) = &outcome.report else {
                println!("(no modularity evaluation)");
                return Ok(());
            };

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Cluster", "Modularity"]);
            table.add_row(vec![
                format!("overall ({})", report.granularity),
                format!("{:.2}", report.overall),
            ]);
            for subgroup in &report.subgroups {
                table.add_row(vec![
                    subgroup.cluster.clone(),
                    format!("{:.2}", subgroup.modularity),
                ]);
            }
            println!("{}", table);
        }
    }
    Ok(())
}
