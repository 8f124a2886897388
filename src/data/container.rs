// DataContainer — owns the three row-aligned tabular artifacts.
//
// Points at the local raw, clean, and projection artifacts and loads
// each one lazily on first access, caching the parsed form for the
// lifetime of the container. Row alignment across the three artifacts
// is a precondition of every downstream computation, not something the
// accessors validate.

use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;

use crate::data::artifacts::{
    self, CleanArtifact, ProjectionArtifact, ProjectionHyperparameters,
};
use crate::data::table::Table;
use crate::error::{Error, Result};

#[derive(Debug)]
pub struct DataContainer {
    raw_path: PathBuf,
    clean_path: PathBuf,
    projection_path: PathBuf,

    raw: OnceCell<Table>,
    clean: OnceCell<CleanArtifact>,
    projection: OnceCell<ProjectionArtifact>,
}

impl DataContainer {
    /// Create a container over the three artifact paths.
    ///
    /// Fails immediately when any referenced path does not exist, so a
    /// bad reference surfaces at construction rather than on first use.
    pub fn new(
        raw: impl Into<PathBuf>,
        clean: impl Into<PathBuf>,
        projection: impl Into<PathBuf>,
    ) -> Result<Self> {
        let raw_path = raw.into();
        let clean_path = clean.into();
        let projection_path = projection.into();

        require_file(&raw_path, "raw")?;
        require_file(&clean_path, "clean")?;
        require_file(&projection_path, "projection")?;

        Ok(Self {
            raw_path,
            clean_path,
            projection_path,
            raw: OnceCell::new(),
            clean: OnceCell::new(),
            projection: OnceCell::new(),
        })
    }

    /// The raw data table, loaded on first access.
    pub fn raw(&self) -> Result<&Table> {
        self.raw
            .get_or_try_init(|| artifacts::load_json(&self.raw_path, "raw"))
    }

    /// The cleaned data table, loaded on first access.
    pub fn clean(&self) -> Result<&Table> {
        Ok(&self.clean_artifact()?.clean_data)
    }

    /// Columns the cleaning step dropped from the raw data.
    pub fn dropped_columns(&self) -> Result<&[String]> {
        Ok(&self.clean_artifact()?.dropped_columns)
    }

    /// The projected point cloud (N x d), loaded on first access.
    pub fn projection(&self) -> Result<&[Vec<f64>]> {
        Ok(&self.projection_artifact()?.projection)
    }

    /// The configuration used to produce the projection.
    pub fn projection_hyperparameters(&self) -> Result<&ProjectionHyperparameters> {
        Ok(&self.projection_artifact()?.hyperparameters)
    }

    fn clean_artifact(&self) -> Result<&CleanArtifact> {
        self.clean
            .get_or_try_init(|| artifacts::load_json(&self.clean_path, "clean"))
    }

    fn projection_artifact(&self) -> Result<&ProjectionArtifact> {
        self.projection
            .get_or_try_init(|| artifacts::load_json(&self.projection_path, "projection"))
    }
}

fn require_file(path: &Path, artifact: &'static str) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::FileAccess {
            artifact,
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        })
    }
}
