//! Cluster labels from the most frequent normalized terms of member skills

use super::{attribute, name_key, PipelineResult, LABEL_SEPARATOR};
use crate::graph::SkillGraph;
use crate::text::Normalizer;
use indexmap::IndexMap;
use tracing::{debug, info};

/// Label for one cluster: the `top_n` most frequent tokens joined with `" | "`.
///
/// Ties keep the order in which tokens were first seen.
pub fn cluster_label(token_lists: &[Vec<String>], top_n: usize) -> String {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for token in token_lists.iter().flatten() {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    // stable
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .into_iter()
        .take(top_n)
        .map(|(token, _)| token)
        .collect::<Vec<_>>()
        .join(LABEL_SEPARATOR)
}

/// Write `<granularity>_name` on every skill, labeling each cluster of
/// `granularity` from its members' names.
pub fn label_communities(
    graph: &mut SkillGraph,
    granularity: &str,
    top_n: usize,
    normalizer: &Normalizer,
) -> PipelineResult<()> {
    let mut members: IndexMap<String, Vec<String>> = IndexMap::new();
    for node in graph.nodes() {
        let cluster = attribute(node, granularity)?;
        members.entry(cluster).or_default().push(node.name.clone());
    }

    let labels: IndexMap<String, String> = members
        .into_iter()
        .map(|(cluster, names)| {
            let label = cluster_label(&normalizer.normalize(&names), top_n);
            debug!("{} {} -> {}", granularity, cluster, label);
            (cluster, label)
        })
        .collect();

    let key = name_key(granularity);
    for node in graph.nodes_mut() {
        let cluster = attribute(node, granularity)?;
        if let Some(label) = labels.get(&cluster) {
            node.set_property(key.as_str(), label.as_str());
        }
    }

    info!("Labeled {} clusters at {}", labels.len(), granularity);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineError;

    fn tokens(lists: &[&[&str]]) -> Vec<Vec<String>> {
        lists
            .iter()
            .map(|l| l.iter().map(|t| t.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_top_term_wins() {
        let normalizer = Normalizer::english();
        let lists = normalizer.normalize(&["data analysis", "data modelling"]);
        assert_eq!(cluster_label(&lists, 1), "data");
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let lists = tokens(&[&["plan", "budget"], &["budget", "audit", "plan"], &["audit"]]);
        assert_eq!(cluster_label(&lists, 2), "plan | budget");
        assert_eq!(cluster_label(&lists, 10), "plan | budget | audit");
        assert_eq!(cluster_label(&lists, 0), "");
    }

    #[test]
    fn test_label_communities_writes_name_attribute() {
        let mut graph = SkillGraph::new();
        for (name, cluster) in [
            ("manage budgets", "0"),
            ("plan budgets", "0"),
            ("weld metal", "1"),
        ] {
            graph.add_node(name);
            graph.set_node_property(name, "cluster_subgroup0", cluster).unwrap();
        }

        label_communities(&mut graph, "cluster_subgroup0", 1, &Normalizer::english()).unwrap();

        assert_eq!(
            graph.node("plan budgets").unwrap().get_str("cluster_subgroup0_name"),
            Some("budget")
        );
        assert_eq!(
            graph.node("weld metal").unwrap().get_str("cluster_subgroup0_name"),
            Some("weld")
        );
    }

    #[test]
    fn test_missing_granularity_is_an_error() {
        let mut graph = SkillGraph::new();
        graph.add_node("a");

        let err = label_communities(&mut graph, "cluster_subgroup1", 3, &Normalizer::english())
            .unwrap_err();
        assert!(matches!(err, PipelineError::MissingAttribute { .. }));
    }
}
