//! Skill co-occurrence graph
//!
//! - Skill nodes carrying pipeline attributes (cluster paths, labels, colors)
//! - Undirected edges weighted by co-occurrence count
//! - In-memory, insertion-ordered storage

pub mod edge;
pub mod node;
pub mod store;
pub mod types;

// Re-export main types
pub use edge::Edge;
pub use node::{Node, PropertyMap};
pub use store::{GraphError, GraphResult, SkillGraph};
pub use types::{EdgeId, NodeId};
