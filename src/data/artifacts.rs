// Persisted artifact shapes — the JSON documents this core consumes.
//
// Four artifacts, all produced by external tooling: raw data (a plain
// table), clean data (table + dropped columns), projection (N x d array
// + hyperparameters), and the fitted mapper (components, complex,
// graph, optional curvature/diagram analysis outputs). Curvature and
// diagram are opaque here — carried through, never interpreted.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cluster::complex::{Complex, ComponentRecord, Graph};
use crate::data::table::Table;
use crate::error::{Error, Result};

/// The clean artifact: the cleaned table plus the names of columns the
/// cleaning step dropped from the raw data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanArtifact {
    pub clean_data: Table,
    pub dropped_columns: Vec<String>,
}

/// Configuration the projection tool used (n_neighbors / min_dist /
/// dimensions, plus the seed when one was recorded).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionHyperparameters {
    pub n_neighbors: u32,
    pub min_dist: f64,
    pub dimensions: u32,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// The projection artifact: an N x d point cloud, row-aligned to the
/// raw and clean tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionArtifact {
    pub projection: Vec<Vec<f64>>,
    pub hyperparameters: ProjectionHyperparameters,
}

/// The fitted mapper itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mapper {
    pub components: Vec<ComponentRecord>,
    pub complex: Complex,
    pub graph: Graph,
    /// Precomputed edge curvatures (opaque analysis output).
    #[serde(default)]
    pub curvature: Vec<f64>,
    /// Precomputed persistence diagram (opaque analysis output).
    #[serde(default)]
    pub diagram: serde_json::Value,
}

/// The mapper artifact: the fitted mapper plus the hyperparameters
/// used to fit it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapperArtifact {
    pub mapper: Mapper,
    pub hyperparameters: serde_json::Value,
}

/// Read and parse a JSON artifact, mapping failures into the typed
/// taxonomy: unreadable path -> FileAccess, bad shape -> Format.
pub fn load_json<T: serde::de::DeserializeOwned>(
    path: &Path,
    artifact: &'static str,
) -> Result<T> {
    let contents = fs::read_to_string(path).map_err(|source| Error::FileAccess {
        artifact,
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|e| Error::format(artifact, e.to_string()))
}

/// Load the mapper artifact from disk.
pub fn load_mapper(path: &Path) -> Result<MapperArtifact> {
    load_json(path, "mapper")
}
