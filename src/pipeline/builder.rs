//! Skill co-occurrence graph construction and pruning

use crate::algo::clustering_coefficients;
use crate::graph::{GraphResult, SkillGraph};
use crate::occupations::OccupationMap;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Pair → number of occupations, in first-seen order
pub type PairCounts = IndexMap<(String, String), u64, FxBuildHasher>;

/// Result of [`build_skills_network`]
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub graph: SkillGraph,
    /// Occupations without a `hasEssentialSkill` relation
    pub skipped_occupations: Vec<String>,
    /// Skills removed by clustering coefficient pruning
    pub pruned_skills: usize,
}

/// Count every unordered pair of distinct essential skills per occupation.
///
/// Pairs keep the orientation they were enumerated in; see [`symmetrize`].
/// A skill listed twice for one occupation is counted once.
pub fn count_skill_pairs(occupations: &OccupationMap) -> (PairCounts, Vec<String>) {
    let mut counts = PairCounts::default();
    let mut skipped = Vec::new();

    for (id, occupation) in occupations {
        let Some(titles) = occupation.essential_skill_titles() else {
            warn!("Occupation {} has no hasEssentialSkill relation, skipping", id);
            skipped.push(id.clone());
            continue;
        };

        let mut seen = HashSet::new();
        let skills: Vec<&str> = titles.into_iter().filter(|t| seen.insert(*t)).collect();

        for (i, a) in skills.iter().enumerate() {
            for b in &skills[i + 1..] {
                *counts.entry((a.to_string(), b.to_string())).or_insert(0) += 1;
            }
        }
    }

    (counts, skipped)
}

/// Merge `(a, b)` and `(b, a)` into one lexicographically ordered key,
/// summing their counts.
pub fn symmetrize(counts: PairCounts) -> PairCounts {
    let mut merged = PairCounts::default();
    for ((a, b), count) in counts {
        let key = if a <= b { (a, b) } else { (b, a) };
        *merged.entry(key).or_insert(0) += count;
    }
    merged
}

/// Build the weighted, undirected skill graph.
///
/// Pairs whose weight is not strictly greater than `threshold` are dropped;
/// skills left without any edge are not added.
pub fn build_skills_network(
    occupations: &OccupationMap,
    threshold: u64,
) -> GraphResult<BuildOutcome> {
    let (counts, skipped_occupations) = count_skill_pairs(occupations);
    let pairs = symmetrize(counts);
    let pair_count = pairs.len();

    let mut graph = SkillGraph::new();
    for ((a, b), weight) in pairs {
        if weight <= threshold || a == b {
            continue;
        }
        graph.add_node(&a);
        graph.add_node(&b);
        graph.add_edge(&a, &b, weight)?;
    }

    debug!("Counted {} distinct skill pairs", pair_count);
    info!(
        "Built skills network: {} skills, {} edges (threshold {}, {} occupations skipped)",
        graph.node_count(),
        graph.edge_count(),
        threshold,
        skipped_occupations.len()
    );

    Ok(BuildOutcome {
        graph,
        skipped_occupations,
        pruned_skills: 0,
    })
}

/// Remove every skill whose local clustering coefficient is below `bad_coefs`.
///
/// Coefficients are computed once, before any removal, and all low-coefficient
/// skills are removed in a single batch. Returns the number of removed skills.
pub fn prune_by_clustering_coefficient(graph: &mut SkillGraph, bad_coefs: f64) -> usize {
    let doomed: Vec<String> = clustering_coefficients(graph)
        .into_iter()
        .filter(|(_, coef)| *coef < bad_coefs)
        .map(|(name, _)| name)
        .collect();

    graph.remove_nodes(doomed.iter().map(String::as_str));

    info!(
        "Removing {} skills based on clustering coefficient (< {})",
        doomed.len(),
        bad_coefs
    );
    doomed.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occupations::Occupation;

    fn occupations() -> OccupationMap {
        let mut map = OccupationMap::new();
        map.insert("occA".into(), Occupation::with_skills(["skill1", "skill2"]));
        map.insert("occB".into(), Occupation::with_skills(["skill1", "skill2", "skill3"]));
        map.insert("occC".into(), Occupation::with_skills(["skill1", "skill3"]));
        map
    }

    #[test]
    fn test_threshold_zero_keeps_all_pairs() {
        let outcome = build_skills_network(&occupations(), 0).unwrap();
        let graph = outcome.graph;

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.edge_weight("skill1", "skill2"), Some(2));
        assert_eq!(graph.edge_weight("skill1", "skill3"), Some(2));
        assert_eq!(graph.edge_weight("skill2", "skill3"), Some(1));
        assert!(outcome.skipped_occupations.is_empty());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let graph = build_skills_network(&occupations(), 1).unwrap().graph;

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edge_weight("skill1", "skill2"), Some(2));
        assert_eq!(graph.edge_weight("skill3", "skill1"), Some(2));
        assert_eq!(graph.edge_weight("skill2", "skill3"), None);

        let empty = build_skills_network(&occupations(), 2).unwrap().graph;
        assert_eq!(empty.node_count(), 0);
    }

    #[test]
    fn test_symmetrize_merges_orientations() {
        let mut counts = PairCounts::default();
        counts.insert(("b".into(), "a".into()), 2);
        counts.insert(("a".into(), "b".into()), 3);
        counts.insert(("a".into(), "c".into()), 1);

        let merged = symmetrize(counts);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[&("a".to_string(), "b".to_string())], 5);
        assert_eq!(merged[&("a".to_string(), "c".to_string())], 1);
    }

    #[test]
    fn test_opposite_orderings_aggregate() {
        let mut map = OccupationMap::new();
        map.insert("x".into(), Occupation::with_skills(["b", "a"]));
        map.insert("y".into(), Occupation::with_skills(["a", "b"]));

        let graph = build_skills_network(&map, 1).unwrap().graph;
        assert_eq!(graph.edge_weight("a", "b"), Some(2));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_missing_relation_is_skipped() {
        let mut map = occupations();
        map.insert("occD".into(), Occupation::default());
        map.insert("occE".into(), Occupation::with_skills(Vec::<String>::new()));

        let outcome = build_skills_network(&map, 0).unwrap();
        assert_eq!(outcome.skipped_occupations, vec!["occD".to_string()]);
        assert_eq!(outcome.graph.edge_count(), 3);
    }

    #[test]
    fn test_repeated_skill_makes_no_self_loop() {
        let mut map = OccupationMap::new();
        map.insert("x".into(), Occupation::with_skills(["a", "a", "b"]));

        let graph = build_skills_network(&map, 0).unwrap().graph;
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge_weight("a", "b"), Some(1));
    }

    #[test]
    fn test_prune_by_clustering_coefficient() {
        // Triangle a-b-c plus pendant d on c: coef(a)=coef(b)=1, coef(c)=1/3, coef(d)=0
        let mut graph = SkillGraph::new();
        for name in ["a", "b", "c", "d"] {
            graph.add_node(name);
        }
        graph.add_edge("a", "b", 1).unwrap();
        graph.add_edge("b", "c", 1).unwrap();
        graph.add_edge("a", "c", 1).unwrap();
        graph.add_edge("c", "d", 1).unwrap();

        let removed = prune_by_clustering_coefficient(&mut graph, 0.5);
        assert_eq!(removed, 2);
        assert!(graph.contains("a") && graph.contains("b"));
        assert!(!graph.contains("c") && !graph.contains("d"));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_prune_keeps_nodes_at_threshold() {
        let mut graph = SkillGraph::new();
        for name in ["a", "b", "c"] {
            graph.add_node(name);
        }
        graph.add_edge("a", "b", 1).unwrap();
        graph.add_edge("b", "c", 1).unwrap();
        graph.add_edge("a", "c", 1).unwrap();

        assert_eq!(prune_by_clustering_coefficient(&mut graph, 1.0), 0);
        assert_eq!(graph.node_count(), 3);
    }

    /// `hubs` skills each linked to every skill of a ring of `ring` leaves.
    fn hubs_over_ring(hubs: usize, ring: usize) -> SkillGraph {
        let mut graph = SkillGraph::new();
        for i in 0..ring {
            graph.add_node(&format!("leaf{}", i));
        }
        for i in 0..ring {
            graph
                .add_edge(&format!("leaf{}", i), &format!("leaf{}", (i + 1) % ring), 1)
                .unwrap();
        }
        for h in 0..hubs {
            let hub = format!("hub{}", h);
            graph.add_node(&hub);
            for i in 0..ring {
                graph.add_edge(&hub, &format!("leaf{}", i), 1).unwrap();
            }
        }
        graph
    }

    #[test]
    fn test_prune_removes_hubs_in_one_batch() {
        // hub: 2 / (ring - 1) ~ 0.03; leaf: 4h / ((h + 2)(h + 1)) ~ 0.17
        let mut graph = hubs_over_ring(20, 60);
        assert_eq!(graph.edge_count(), 60 + 20 * 60);

        let removed = prune_by_clustering_coefficient(&mut graph, 0.1);
        assert_eq!(removed, 20);
        assert_eq!(graph.node_count(), 60);
        assert_eq!(graph.edge_count(), 60);
        assert!(graph.nodes().all(|n| n.name.starts_with("leaf")));
        assert_eq!(graph.degree("leaf0"), 2);
        assert_eq!(graph.edge_weight("leaf59", "leaf0"), Some(1));

        let names: Vec<&str> = graph.nodes().map(|n| n.name.as_str()).take(3).collect();
        assert_eq!(names, vec!["leaf0", "leaf1", "leaf2"]);
    }
}
