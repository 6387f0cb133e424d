//! Graph snapshots
//!
//! A snapshot is a header followed by every node (with its attributes) and
//! every edge, in graph order. Saves and loads are whole-file operations.

use super::{file_name, SnapshotError, SnapshotResult};
use crate::graph::{Edge, Node, SkillGraph};
use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Current snapshot layout version
pub const FORMAT_VERSION: u32 = 1;

/// On-disk encoding, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    /// `.bin`
    Bincode,
    /// `.bin.gz`
    CompressedBincode,
    /// `.json`
    Json,
}

impl SnapshotFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = file_name(path);
        if name.ends_with(".bin.gz") {
            Some(SnapshotFormat::CompressedBincode)
        } else if name.ends_with(".bin") {
            Some(SnapshotFormat::Bincode)
        } else if name.ends_with(".json") {
            Some(SnapshotFormat::Json)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub format_version: u32,
    pub created_at: DateTime<Utc>,
    pub node_count: usize,
    pub edge_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub header: SnapshotHeader,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphSnapshot {
    pub fn capture(graph: &SkillGraph) -> Self {
        GraphSnapshot {
            header: SnapshotHeader {
                format_version: FORMAT_VERSION,
                created_at: Utc::now(),
                node_count: graph.node_count(),
                edge_count: graph.edge_count(),
            },
            nodes: graph.nodes().cloned().collect(),
            edges: graph.edges().cloned().collect(),
        }
    }

    pub fn restore(self) -> SnapshotResult<SkillGraph> {
        if self.header.format_version > FORMAT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(self.header.format_version));
        }
        Ok(SkillGraph::from_parts(self.nodes, self.edges)?)
    }
}

/// Save `graph` to `path`, creating parent directories.
///
/// Returns `Ok(false)` without writing when the extension is not supported.
pub fn save_graph(graph: &SkillGraph, path: impl AsRef<Path>) -> SnapshotResult<bool> {
    let path = path.as_ref();
    let Some(format) = SnapshotFormat::from_path(path) else {
        warn!("{} does not have a supported file extension", path.display());
        return Ok(false);
    };

    let snapshot = GraphSnapshot::capture(graph);
    write_atomically(path, |writer| {
        match format {
            SnapshotFormat::Bincode => bincode::serialize_into(writer, &snapshot)?,
            SnapshotFormat::CompressedBincode => {
                let mut encoder = GzEncoder::new(writer, Compression::default());
                bincode::serialize_into(&mut encoder, &snapshot)?;
                encoder.finish()?;
            }
            SnapshotFormat::Json => serde_json::to_writer_pretty(writer, &snapshot)?,
        }
        Ok(())
    })?;

    info!(
        "Saved graph snapshot to {} ({} nodes, {} edges)",
        path.display(),
        snapshot.header.node_count,
        snapshot.header.edge_count
    );
    Ok(true)
}

/// Write `path` through a temp file in the same directory, renamed over
/// `path` only once `write` succeeds. On failure the previous file is kept.
fn write_atomically<F>(path: &Path, write: F) -> SnapshotResult<()>
where
    F: FnOnce(&mut BufWriter<NamedTempFile>) -> SnapshotResult<()>,
{
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent)?;
            parent
        }
        None => Path::new("."),
    };

    let mut writer = BufWriter::new(NamedTempFile::new_in(dir)?);
    write(&mut writer)?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Load a graph saved by [`save_graph`].
///
/// Returns `Ok(None)` when the extension is not supported.
pub fn load_graph(path: impl AsRef<Path>) -> SnapshotResult<Option<SkillGraph>> {
    let path = path.as_ref();
    let Some(format) = SnapshotFormat::from_path(path) else {
        warn!("{} does not have a supported file extension", path.display());
        return Ok(None);
    };

    let reader = BufReader::new(File::open(path)?);
    let snapshot: GraphSnapshot = match format {
        SnapshotFormat::Bincode => bincode::deserialize_from(reader)?,
        SnapshotFormat::CompressedBincode => bincode::deserialize_from(GzDecoder::new(reader))?,
        SnapshotFormat::Json => serde_json::from_reader(reader)?,
    };

    debug!(
        "Snapshot {} written at {}",
        path.display(),
        snapshot.header.created_at.to_rfc3339()
    );
    let graph = snapshot.restore()?;
    info!(
        "Loaded graph snapshot from {} ({} nodes, {} edges)",
        path.display(),
        graph.node_count(),
        graph.edge_count()
    );
    Ok(Some(graph))
}
