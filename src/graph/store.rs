//! In-memory skill graph
//!
//! Undirected, weighted, no self-loops, at most one edge per skill pair.
//! Nodes and edges iterate in insertion order so that every stage that walks
//! the graph sees the same order on every run.

use super::edge::Edge;
use super::node::Node;
use super::types::{EdgeId, NodeId};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors that can occur during graph operations
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Skill '{0}' not found")]
    NodeNotFound(String),

    #[error("Skill '{0}' already exists")]
    NodeAlreadyExists(String),

    #[error("Self-loop on skill '{0}' is not allowed")]
    SelfLoop(String),

    #[error("Edge between '{0}' and '{1}' already exists")]
    DuplicateEdge(String, String),

    #[error("Edge {0} refers to a missing node")]
    DanglingEdge(EdgeId),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Weighted, undirected skill co-occurrence graph
///
/// - nodes: NodeId -> Node (insertion ordered)
/// - name_index: skill title -> NodeId
/// - edges: EdgeId -> Edge (insertion ordered)
/// - adjacency: NodeId -> (neighbor NodeId -> EdgeId)
#[derive(Debug, Clone, Default)]
pub struct SkillGraph {
    nodes: IndexMap<NodeId, Node>,
    name_index: HashMap<String, NodeId>,
    edges: IndexMap<EdgeId, Edge>,
    adjacency: HashMap<NodeId, IndexMap<NodeId, EdgeId>>,
    next_node_id: u64,
    next_edge_id: u64,
}

impl SkillGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        SkillGraph {
            next_node_id: 1,
            next_edge_id: 1,
            ..Default::default()
        }
    }

    /// Rebuild a graph from its nodes and edges, keeping their ids.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> GraphResult<Self> {
        let mut graph = SkillGraph::new();

        for node in nodes {
            if graph.name_index.contains_key(&node.name) {
                return Err(GraphError::NodeAlreadyExists(node.name));
            }
            graph.next_node_id = graph.next_node_id.max(node.id.as_u64() + 1);
            graph.name_index.insert(node.name.clone(), node.id);
            graph.adjacency.insert(node.id, IndexMap::new());
            graph.nodes.insert(node.id, node);
        }

        for edge in edges {
            if !graph.nodes.contains_key(&edge.source) || !graph.nodes.contains_key(&edge.target) {
                return Err(GraphError::DanglingEdge(edge.id));
            }
            graph.next_edge_id = graph.next_edge_id.max(edge.id.as_u64() + 1);
            graph.link(edge)?;
        }

        Ok(graph)
    }

    /// Add a skill node, returning the existing id if the skill is already present
    pub fn add_node(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.name_index.get(name) {
            return id;
        }

        let id = NodeId::new(self.next_node_id);
        self.next_node_id += 1;

        self.name_index.insert(name.to_string(), id);
        self.adjacency.insert(id, IndexMap::new());
        self.nodes.insert(id, Node::new(id, name));
        id
    }

    /// Add an undirected edge between two existing skills
    pub fn add_edge(&mut self, a: &str, b: &str, weight: u64) -> GraphResult<EdgeId> {
        let source = self.require(a)?;
        let target = self.require(b)?;

        let id = EdgeId::new(self.next_edge_id);
        self.link(Edge::new(id, source, target, weight))?;
        self.next_edge_id += 1;
        Ok(id)
    }

    fn link(&mut self, edge: Edge) -> GraphResult<()> {
        if edge.source == edge.target {
            return Err(GraphError::SelfLoop(self.name_of(edge.source).to_string()));
        }
        let exists = self
            .adjacency
            .get(&edge.source)
            .is_some_and(|row| row.contains_key(&edge.target));
        if exists {
            return Err(GraphError::DuplicateEdge(
                self.name_of(edge.source).to_string(),
                self.name_of(edge.target).to_string(),
            ));
        }

        self.adjacency
            .entry(edge.source)
            .or_default()
            .insert(edge.target, edge.id);
        self.adjacency
            .entry(edge.target)
            .or_default()
            .insert(edge.source, edge.id);
        self.edges.insert(edge.id, edge);
        Ok(())
    }

    fn require(&self, name: &str) -> GraphResult<NodeId> {
        self.name_index
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::NodeNotFound(name.to_string()))
    }

    fn name_of(&self, id: NodeId) -> &str {
        self.nodes.get(&id).map_or("", |n| n.name.as_str())
    }

    /// Remove a skill and all its incident edges
    pub fn remove_node(&mut self, name: &str) -> Option<Node> {
        self.remove_nodes([name]).pop()
    }

    /// Remove a batch of skills and all their incident edges.
    ///
    /// One pass over nodes and edges regardless of how many skills go, so
    /// dropping high-degree hubs stays linear. Unknown titles are ignored.
    /// Returns the removed nodes in graph order.
    pub fn remove_nodes<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) -> Vec<Node> {
        let doomed: HashSet<NodeId> = names
            .into_iter()
            .filter_map(|name| self.name_index.remove(name))
            .collect();
        if doomed.is_empty() {
            return Vec::new();
        }

        let mut touched = HashSet::new();
        for id in &doomed {
            if let Some(row) = self.adjacency.remove(id) {
                touched.extend(row.into_keys().filter(|n| !doomed.contains(n)));
            }
        }
        for neighbor in &touched {
            if let Some(row) = self.adjacency.get_mut(neighbor) {
                row.retain(|n, _| !doomed.contains(n));
            }
        }

        self.edges
            .retain(|_, e| !doomed.contains(&e.source) && !doomed.contains(&e.target));

        let mut removed = Vec::with_capacity(doomed.len());
        for (id, node) in std::mem::take(&mut self.nodes) {
            if doomed.contains(&id) {
                removed.push(node);
            } else {
                self.nodes.insert(id, node);
            }
        }
        removed
    }

    /// Look up a node id by skill title
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.name_index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.name_index.contains_key(name)
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.node_id(name).and_then(|id| self.nodes.get(&id))
    }

    /// Set an attribute on a skill node
    pub fn set_node_property(
        &mut self,
        name: &str,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> GraphResult<Option<String>> {
        let id = self.require(name)?;
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or_else(|| GraphError::NodeNotFound(name.to_string()))?;
        Ok(node.set_property(key, value))
    }

    /// Read an attribute of a skill node
    pub fn node_property(&self, name: &str, key: &str) -> Option<&str> {
        self.node(name).and_then(|n| n.get_str(key))
    }

    /// Weight of the edge between `a` and `b`, in either orientation
    pub fn edge_weight(&self, a: &str, b: &str) -> Option<u64> {
        let a = self.node_id(a)?;
        let b = self.node_id(b)?;
        let edge_id = self.adjacency.get(&a)?.get(&b)?;
        self.edges.get(edge_id).map(|e| e.weight)
    }

    /// Neighbors of a skill, in edge insertion order
    pub fn neighbors(&self, name: &str) -> impl Iterator<Item = &Node> + '_ {
        self.node_id(name)
            .and_then(|id| self.adjacency.get(&id))
            .into_iter()
            .flat_map(|row| row.keys())
            .filter_map(|id| self.nodes.get(id))
    }

    pub fn degree(&self, name: &str) -> usize {
        self.node_id(name)
            .and_then(|id| self.adjacency.get(&id))
            .map_or(0, |row| row.len())
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    /// Mutable access to all nodes in insertion order
    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> + '_ {
        self.nodes.values_mut()
    }

    /// All edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.values()
    }

    /// Skill titles of both endpoints of an edge
    pub fn endpoints(&self, edge: &Edge) -> (&str, &str) {
        (self.name_of(edge.source), self.name_of(edge.target))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Sum of all edge weights
    pub fn total_weight(&self) -> u64 {
        self.edges.values().map(|e| e.weight).sum()
    }

    /// Induced subgraph on the given skills; unknown titles are ignored.
    ///
    /// Node order, ids and attributes are preserved.
    pub fn subgraph<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> SkillGraph {
        let keep: HashSet<NodeId> =
            names.into_iter().filter_map(|n| self.node_id(n)).collect();

        let nodes = self
            .nodes
            .values()
            .filter(|n| keep.contains(&n.id))
            .cloned()
            .collect();
        let edges = self
            .edges
            .values()
            .filter(|e| keep.contains(&e.source) && keep.contains(&e.target))
            .cloned()
            .collect();

        // Parts come from a valid graph, so they cannot violate its invariants.
        SkillGraph::from_parts(nodes, edges).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> SkillGraph {
        let mut graph = SkillGraph::new();
        for name in ["python", "sql", "statistics"] {
            graph.add_node(name);
        }
        graph.add_edge("python", "sql", 3).unwrap();
        graph.add_edge("sql", "statistics", 2).unwrap();
        graph.add_edge("statistics", "python", 1).unwrap();
        graph
    }

    #[test]
    fn test_add_node_is_idempotent() {
        let mut graph = SkillGraph::new();
        let a = graph.add_node("python");
        let b = graph.add_node("python");
        assert_eq!(a, b);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_edge_weight_is_symmetric() {
        let graph = triangle();
        assert_eq!(graph.edge_weight("python", "sql"), Some(3));
        assert_eq!(graph.edge_weight("sql", "python"), Some(3));
        assert_eq!(graph.edge_weight("python", "excel"), None);
        assert_eq!(graph.total_weight(), 6);
        assert_eq!(graph.degree("sql"), 2);
    }

    #[test]
    fn test_rejects_self_loops_and_duplicates() {
        let mut graph = triangle();
        assert_eq!(
            graph.add_edge("sql", "sql", 1),
            Err(GraphError::SelfLoop("sql".to_string()))
        );
        assert_eq!(
            graph.add_edge("sql", "python", 1),
            Err(GraphError::DuplicateEdge("sql".to_string(), "python".to_string()))
        );
        assert_eq!(
            graph.add_edge("sql", "excel", 1),
            Err(GraphError::NodeNotFound("excel".to_string()))
        );
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_remove_node_drops_incident_edges() {
        let mut graph = triangle();
        let removed = graph.remove_node("sql").unwrap();
        assert_eq!(removed.name, "sql");

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge_weight("python", "statistics"), Some(1));
        assert_eq!(graph.neighbors("python").count(), 1);
        assert!(graph.remove_node("sql").is_none());
    }

    #[test]
    fn test_node_properties() {
        let mut graph = triangle();
        graph.set_node_property("python", "cluster_group", "0-1").unwrap();
        assert_eq!(graph.node_property("python", "cluster_group"), Some("0-1"));
        assert!(graph.set_node_property("excel", "cluster_group", "0").is_err());
    }

    #[test]
    fn test_subgraph_is_induced() {
        let mut graph = triangle();
        graph.set_node_property("sql", "cluster_group", "2").unwrap();

        let sub = graph.subgraph(["python", "sql", "unknown"]);
        assert_eq!(sub.node_count(), 2);
        assert_eq!(sub.edge_count(), 1);
        assert_eq!(sub.edge_weight("sql", "python"), Some(3));
        assert_eq!(sub.node_property("sql", "cluster_group"), Some("2"));
    }

    #[test]
    fn test_from_parts_round_trip_keeps_order() {
        let graph = triangle();
        let rebuilt = SkillGraph::from_parts(
            graph.nodes().cloned().collect(),
            graph.edges().cloned().collect(),
        )
        .unwrap();

        let names: Vec<&str> = rebuilt.nodes().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["python", "sql", "statistics"]);
        assert_eq!(rebuilt.edge_weight("statistics", "python"), Some(1));

        let mut rebuilt = rebuilt;
        let id = rebuilt.add_node("excel");
        assert_eq!(id, NodeId::new(4));
    }

    #[test]
    fn test_remove_nodes_in_batch() {
        let mut graph = triangle();
        graph.add_node("excel");
        graph.add_edge("excel", "python", 2).unwrap();

        let removed = graph.remove_nodes(["sql", "excel", "unknown"]);
        let names: Vec<&str> = removed.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["sql", "excel"]);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.degree("python"), 1);
        assert_eq!(graph.edge_weight("statistics", "python"), Some(1));
        assert!(graph.remove_nodes(Vec::<&str>::new()).is_empty());
    }

    #[test]
    fn test_remove_nodes_scales_with_hub_degree() {
        let (hubs, leaves) = (100, 500);
        let mut graph = SkillGraph::new();
        let leaf_names: Vec<String> = (0..leaves).map(|i| format!("leaf{}", i)).collect();
        for name in &leaf_names {
            graph.add_node(name);
        }
        let hub_names: Vec<String> = (0..hubs).map(|h| format!("hub{}", h)).collect();
        for hub in &hub_names {
            graph.add_node(hub);
            for leaf in &leaf_names {
                graph.add_edge(hub, leaf, 1).unwrap();
            }
        }
        assert_eq!(graph.edge_count(), hubs * leaves);

        let start = std::time::Instant::now();
        let removed = graph.remove_nodes(hub_names.iter().map(String::as_str));
        let elapsed = start.elapsed();

        assert_eq!(removed.len(), hubs);
        assert_eq!(graph.node_count(), leaves);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.degree("leaf0"), 0);
        assert!(elapsed.as_secs() < 2, "batch removal took {:?}", elapsed);
    }
}
