//! Atomic catalog persistence
//!
//! The catalog is serialized in full to a sibling `<name>.tmp` file, synced,
//! and renamed over the destination. A failed write removes the temp file and
//! leaves whatever was at the destination before.

use crate::catalog::types::Catalog;
use crate::{CatalogError, CatalogResult};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Writes catalogs to a fixed destination with write-temp-then-rename
#[derive(Debug, Clone)]
pub struct CatalogWriter {
    path: PathBuf,
}

impl CatalogWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The sibling temp file used while writing
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Serializes `catalog` as pretty JSON and atomically replaces the destination
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The destination now holds the new catalog
    /// * `Err(CatalogError)` - Nothing was replaced; the temp file is gone
    pub fn write(&self, catalog: &Catalog) -> CatalogResult<()> {
        let bytes = serde_json::to_vec_pretty(catalog)?;
        self.write_bytes(&bytes)
    }

    /// Atomically replaces the destination with `contents`
    pub fn write_bytes(&self, contents: &[u8]) -> CatalogResult<()> {
        tracing::info!("Saving catalog to {}", self.path.display());

        if self.path.file_name().is_none() {
            return Err(self.write_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "destination has no file name",
            )));
        }

        // Directory creation is implicit
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
            }
        }

        let temp = self.temp_path();
        let result = write_synced(&temp, contents).and_then(|()| fs::rename(&temp, &self.path));

        if let Err(source) = result {
            tracing::error!(
                "Error saving catalog to {}: {}",
                self.path.display(),
                source
            );
            if temp.exists() {
                if let Err(e) = fs::remove_file(&temp) {
                    tracing::warn!("Could not remove temp file {}: {}", temp.display(), e);
                }
            }
            return Err(self.write_error(source));
        }

        tracing::info!("Successfully saved catalog to {}", self.path.display());
        Ok(())
    }

    /// Removes a temp file left behind by an interrupted write
    ///
    /// Returns `true` if a stale file was found and removed.
    pub fn cleanup_stale_temp(&self) -> CatalogResult<bool> {
        let temp = self.temp_path();
        match fs::remove_file(&temp) {
            Ok(()) => {
                tracing::warn!("Removed stale temp file {}", temp.display());
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(self.write_error(e)),
        }
    }

    fn write_error(&self, source: io::Error) -> CatalogError {
        CatalogError::Write {
            path: self.path.display().to_string(),
            source,
        }
    }
}

fn write_synced(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents)?;
    file.sync_all()
}
