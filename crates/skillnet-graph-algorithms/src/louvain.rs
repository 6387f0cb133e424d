//! Hierarchical Louvain community detection
//!
//! Each level moves single nodes between neighboring communities while
//! modularity improves, then collapses every community into one node of a
//! smaller graph. Levels are produced until a level no longer raises modularity.
//! Node visiting order is shuffled with a seeded RNG, so a fixed seed gives a
//! fixed dendrogram.

use super::common::{GraphView, NodeId};
use super::community::{HierarchicalClustering, Hierarchy};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::{BTreeMap, HashMap};

/// Smallest modularity improvement that keeps a pass or a level going
const MIN_GAIN: f64 = 1e-7;

/// Louvain configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LouvainConfig {
    /// Resolution parameter (1.0 is standard modularity)
    pub resolution: f64,
    /// Seed for the node visiting order
    pub seed: u64,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            seed: 42,
        }
    }
}

/// Louvain hierarchical clustering
#[derive(Debug, Clone, Default)]
pub struct Louvain {
    config: LouvainConfig,
}

impl Louvain {
    pub fn new(config: LouvainConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LouvainConfig {
        &self.config
    }
}

/// Output of [`Louvain`]: one partition per level.
///
/// `levels[0]` maps dense node indices to level-0 communities; `levels[k]`
/// maps level-(k-1) communities to level-k communities.
#[derive(Debug, Clone, PartialEq)]
pub struct Dendrogram {
    index_to_node: Vec<NodeId>,
    levels: Vec<Vec<usize>>,
}

impl Dendrogram {
    /// Number of distinct communities at `level`
    pub fn community_count(&self, level: usize) -> usize {
        self.levels
            .get(level)
            .and_then(|partition| partition.iter().max())
            .map_or(0, |&max| max + 1)
    }
}

impl Hierarchy for Dendrogram {
    fn dendrogram_depth(&self) -> usize {
        self.levels.len()
    }

    fn partition_at_level(&self, level: usize) -> HashMap<NodeId, usize> {
        let Some(first) = self.levels.first() else {
            return HashMap::new();
        };
        let last = level.min(self.levels.len() - 1);

        let mut partition = first.clone();
        for step in &self.levels[1..=last] {
            for community in partition.iter_mut() {
                *community = step[*community];
            }
        }

        self.index_to_node
            .iter()
            .copied()
            .zip(partition)
            .collect()
    }
}

impl HierarchicalClustering for Louvain {
    type Output = Dendrogram;

    fn cluster(&self, view: &GraphView) -> Dendrogram {
        let resolution = self.config.resolution;
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut graph = LevelGraph::from_view(view);

        if graph.total_weight <= 0.0 {
            return Dendrogram {
                index_to_node: view.index_to_node.clone(),
                levels: vec![(0..view.node_count).collect()],
            };
        }

        let mut levels = Vec::new();

        let mut status = Status::new(&graph);
        one_level(&graph, &mut status, resolution, &mut rng);
        let mut current = status.modularity(graph.total_weight, resolution);
        let (partition, count) = renumber(&status.node_to_community);
        graph = graph.induce(&partition, count);
        levels.push(partition);

        loop {
            let mut status = Status::new(&graph);
            one_level(&graph, &mut status, resolution, &mut rng);
            let next = status.modularity(graph.total_weight, resolution);
            if next - current < MIN_GAIN {
                break;
            }
            let (partition, count) = renumber(&status.node_to_community);
            graph = graph.induce(&partition, count);
            levels.push(partition);
            current = next;
        }

        Dendrogram {
            index_to_node: view.index_to_node.clone(),
            levels,
        }
    }
}

/// Working graph of one level; self-loops carry the collapsed internal weight.
struct LevelGraph {
    adjacency: Vec<Vec<(usize, f64)>>,
    loops: Vec<f64>,
    degrees: Vec<f64>,
    total_weight: f64,
}

impl LevelGraph {
    fn from_view(view: &GraphView) -> Self {
        let n = view.node_count;
        let mut adjacency = vec![Vec::new(); n];
        let mut loops = vec![0.0; n];

        for u in 0..n {
            for (&v, &w) in view.neighbors(u).iter().zip(view.weights(u)) {
                if u == v {
                    loops[u] += w;
                } else {
                    adjacency[u].push((v, w));
                }
            }
        }

        Self::assemble(adjacency, loops)
    }

    fn assemble(adjacency: Vec<Vec<(usize, f64)>>, loops: Vec<f64>) -> Self {
        let degrees = adjacency
            .iter()
            .zip(&loops)
            .map(|(row, &self_weight)| row.iter().map(|&(_, w)| w).sum::<f64>() + 2.0 * self_weight)
            .collect();
        let total_weight = adjacency.iter().flatten().map(|&(_, w)| w).sum::<f64>() / 2.0
            + loops.iter().sum::<f64>();

        Self {
            adjacency,
            loops,
            degrees,
            total_weight,
        }
    }

    fn len(&self) -> usize {
        self.adjacency.len()
    }

    /// Collapse every community of `partition` into a single node.
    fn induce(&self, partition: &[usize], community_count: usize) -> Self {
        let mut links: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        let mut loops = vec![0.0; community_count];

        for (u, row) in self.adjacency.iter().enumerate() {
            let cu = partition[u];
            loops[cu] += self.loops[u];
            for &(v, w) in row {
                if v < u {
                    continue;
                }
                let cv = partition[v];
                if cu == cv {
                    loops[cu] += w;
                } else {
                    *links.entry((cu.min(cv), cu.max(cv))).or_insert(0.0) += w;
                }
            }
        }

        let mut adjacency = vec![Vec::new(); community_count];
        for ((a, b), w) in links {
            adjacency[a].push((b, w));
            adjacency[b].push((a, w));
        }

        Self::assemble(adjacency, loops)
    }
}

/// Community bookkeeping for one level
struct Status {
    node_to_community: Vec<usize>,
    community_degree: Vec<f64>,
    community_internal: Vec<f64>,
}

impl Status {
    fn new(graph: &LevelGraph) -> Self {
        Self {
            node_to_community: (0..graph.len()).collect(),
            community_degree: graph.degrees.clone(),
            community_internal: graph.loops.clone(),
        }
    }

    fn remove(&mut self, graph: &LevelGraph, node: usize, community: usize, links: f64) {
        self.community_degree[community] -= graph.degrees[node];
        self.community_internal[community] -= links + graph.loops[node];
    }

    fn insert(&mut self, graph: &LevelGraph, node: usize, community: usize, links: f64) {
        self.node_to_community[node] = community;
        self.community_degree[community] += graph.degrees[node];
        self.community_internal[community] += links + graph.loops[node];
    }

    fn modularity(&self, total_weight: f64, resolution: f64) -> f64 {
        if total_weight <= 0.0 {
            return 0.0;
        }
        let mut seen = vec![false; self.node_to_community.len()];
        let mut q = 0.0;
        for &c in &self.node_to_community {
            if seen[c] {
                continue;
            }
            seen[c] = true;
            q += self.community_internal[c] / total_weight
                - resolution * (self.community_degree[c] / (2.0 * total_weight)).powi(2);
        }
        q
    }
}

/// Total link weight from `node` to each neighboring community, in adjacency order.
fn neighbor_communities(graph: &LevelGraph, status: &Status, node: usize) -> Vec<(usize, f64)> {
    let mut slots: HashMap<usize, usize> = HashMap::new();
    let mut out: Vec<(usize, f64)> = Vec::new();

    for &(v, w) in &graph.adjacency[node] {
        let c = status.node_to_community[v];
        match slots.get(&c) {
            Some(&slot) => out[slot].1 += w,
            None => {
                slots.insert(c, out.len());
                out.push((c, w));
            }
        }
    }
    out
}

fn links_to(neighbors: &[(usize, f64)], community: usize) -> f64 {
    neighbors
        .iter()
        .find(|&&(c, _)| c == community)
        .map_or(0.0, |&(_, w)| w)
}

/// Local moving phase: repeat passes over all nodes until no pass improves modularity.
fn one_level(graph: &LevelGraph, status: &mut Status, resolution: f64, rng: &mut StdRng) {
    let mut order: Vec<usize> = (0..graph.len()).collect();
    let mut current = status.modularity(graph.total_weight, resolution);

    loop {
        let mut modified = false;
        order.shuffle(rng);

        for &node in &order {
            let own = status.node_to_community[node];
            let degc_totw = graph.degrees[node] / (2.0 * graph.total_weight);
            let mut neighbors = neighbor_communities(graph, status, node);
            let own_links = links_to(&neighbors, own);

            let remove_cost = -own_links
                + resolution * (status.community_degree[own] - graph.degrees[node]) * degc_totw;
            status.remove(graph, node, own, own_links);

            let mut best = own;
            let mut best_gain = 0.0;
            neighbors.shuffle(rng);
            for &(community, links) in &neighbors {
                let gain = remove_cost + links
                    - resolution * status.community_degree[community] * degc_totw;
                if gain > best_gain {
                    best_gain = gain;
                    best = community;
                }
            }

            status.insert(graph, node, best, links_to(&neighbors, best));
            if best != own {
                modified = true;
            }
        }

        let next = status.modularity(graph.total_weight, resolution);
        if !modified || next - current < MIN_GAIN {
            break;
        }
        current = next;
    }
}

/// Relabel communities to 0..k in order of first appearance.
fn renumber(node_to_community: &[usize]) -> (Vec<usize>, usize) {
    let mut mapping: HashMap<usize, usize> = HashMap::new();
    let partition = node_to_community
        .iter()
        .map(|&c| {
            let next = mapping.len();
            *mapping.entry(c).or_insert(next)
        })
        .collect();
    (partition, mapping.len())
}
