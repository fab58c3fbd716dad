//! Catalogue persistence.
//!
//! Load-on-start, save-after-mutation against a single JSON file holding the
//! root `{"projects": [...]}` object. Writes are best-effort and whole-file;
//! there is no partial update.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::catalog::Catalog;

/// File-backed store for the catalogue.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the catalogue. A missing file is an empty catalogue, not an
    /// error; a present-but-corrupt file is.
    pub fn load(&self) -> std::io::Result<Catalog> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "no catalogue file, starting empty");
            return Ok(Catalog::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let catalog: Catalog = serde_json::from_reader(reader)?;
        tracing::info!(
            path = %self.path.display(),
            projects = catalog.projects().len(),
            "catalogue loaded"
        );
        Ok(catalog)
    }

    /// Write the whole catalogue back to disk.
    pub fn save(&self, catalog: &Catalog) -> std::io::Result<()> {
        let file = File::create(&self.path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer(writer, catalog)?;
        tracing::info!(
            path = %self.path.display(),
            projects = catalog.projects().len(),
            "catalogue saved"
        );
        Ok(())
    }
}
