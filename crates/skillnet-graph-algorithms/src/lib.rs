pub mod common;
pub mod community;
pub mod louvain;
pub mod topology;

pub use common::{GraphView, NodeId};
pub use community::{
    modularity, weakly_connected_components, HierarchicalClustering, Hierarchy, WccResult,
};
pub use louvain::{Dendrogram, Louvain, LouvainConfig};
pub use topology::{count_triangles, local_clustering_coefficients, triangles_per_node};
