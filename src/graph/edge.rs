//! Undirected co-occurrence edge

use super::types::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};

/// An undirected, weighted edge between two distinct skills.
///
/// `source`/`target` only record insertion orientation; the edge is the same
/// seen from either end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier for this edge
    pub id: EdgeId,

    /// First endpoint
    pub source: NodeId,

    /// Second endpoint
    pub target: NodeId,

    /// Number of occupations in which both skills are essential
    pub weight: u64,
}

impl Edge {
    pub fn new(id: EdgeId, source: NodeId, target: NodeId, weight: u64) -> Self {
        Edge {
            id,
            source,
            target,
            weight,
        }
    }
}
