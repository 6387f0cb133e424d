//! Whole-object file persistence
//!
//! - Graph snapshots as bincode (`.bin`), gzip bincode (`.bin.gz`) or JSON (`.json`)
//! - Occupation records as JSON (`.json`) or gzip JSON (`.json.gz`)
//!
//! An unsupported extension is logged and yields no result instead of an error.

pub mod input;
pub mod snapshot;

pub use input::{load_occupations, InputFormat};
pub use snapshot::{
    load_graph, save_graph, GraphSnapshot, SnapshotFormat, SnapshotHeader, FORMAT_VERSION,
};

use crate::graph::GraphError;
use thiserror::Error;

/// Persistence errors
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot does not form a valid graph: {0}")]
    Graph(#[from] GraphError),

    #[error("Unsupported snapshot format version {0}")]
    UnsupportedVersion(u32),
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Lowercased file name of `path`, used for suffix matching
fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
