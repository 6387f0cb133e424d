//! Occupation record files

use super::{file_name, SnapshotResult};
use crate::occupations::{parse_occupations, OccupationMap};
use flate2::read::GzDecoder;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// `.json`
    Json,
    /// `.json.gz`
    CompressedJson,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = file_name(path);
        if name.ends_with(".json.gz") {
            Some(InputFormat::CompressedJson)
        } else if name.ends_with(".json") {
            Some(InputFormat::Json)
        } else {
            None
        }
    }
}

/// Load occupation records; `Ok(None)` when the extension is not supported.
pub fn load_occupations(path: impl AsRef<Path>) -> SnapshotResult<Option<OccupationMap>> {
    let path = path.as_ref();
    let Some(format) = InputFormat::from_path(path) else {
        warn!("{} does not have a supported file extension", path.display());
        return Ok(None);
    };

    let raw = fs::read(path)?;
    let bytes = match format {
        InputFormat::Json => raw,
        InputFormat::CompressedJson => {
            let mut decoded = Vec::new();
            GzDecoder::new(raw.as_slice()).read_to_end(&mut decoded)?;
            decoded
        }
    };

    let occupations = parse_occupations(&bytes)?;
    info!("Loaded {} occupations from {}", occupations.len(), path.display());
    Ok(Some(occupations))
}
