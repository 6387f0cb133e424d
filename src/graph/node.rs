//! Skill node
//!
//! A node is one skill title plus whatever attributes the pipeline stages
//! have written onto it (cluster paths, labels, colors).

use super::types::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Node attributes, ordered by key
pub type PropertyMap = BTreeMap<String, String>;

/// A skill node in the co-occurrence graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node
    pub id: NodeId,

    /// Skill title, unique within a graph
    pub name: String,

    /// Attributes accumulated by pipeline stages
    pub properties: PropertyMap,
}

impl Node {
    /// Create a new node without attributes
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Node {
            id,
            name: name.into(),
            properties: PropertyMap::new(),
        }
    }

    /// Set an attribute, returning the previous value
    pub fn set_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.properties.insert(key.into(), value.into())
    }

    /// Get an attribute value
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Check if property exists
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_properties() {
        let mut node = Node::new(NodeId::new(1), "manage budgets");
        assert_eq!(node.name, "manage budgets");
        assert!(!node.has_property("cluster_group"));

        assert_eq!(node.set_property("cluster_group", "0-1-2"), None);
        assert_eq!(node.get_str("cluster_group"), Some("0-1-2"));

        let old = node.set_property("cluster_group", "1-0-0");
        assert_eq!(old.as_deref(), Some("0-1-2"));
        assert_eq!(node.get_str("cluster_group"), Some("1-0-0"));
        assert_eq!(node.get_str("cluster_color"), None);
    }
}
