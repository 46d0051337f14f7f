use crate::types::RunManifest;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use thiserror::Error;

/// File name of the manifest inside a run directory.
pub const MANIFEST_FILE: &str = "ecpac_run.json";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistent storage for a run manifest.
pub struct ManifestStore {
    path: Utf8PathBuf,
}

impl ManifestStore {
    /// Create a store for the given run directory.
    ///
    /// The manifest is stored at `ecpac_run.json` within the run directory.
    pub fn new(run_dir: &Utf8Path) -> Self {
        Self {
            path: run_dir.join(MANIFEST_FILE),
        }
    }

    /// Get the path to the manifest file.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Load the manifest from disk.
    ///
    /// Returns None if the file doesn't exist.
    pub fn load(&self) -> Result<Option<RunManifest>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Serialize a manifest the way it is stored.
    pub fn to_json(manifest: &RunManifest) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(manifest)?)
    }

    /// Save the manifest to disk.
    ///
    /// Creates parent directories if needed.
    pub fn save(&self, manifest: &RunManifest) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, Self::to_json(manifest)?)?;
        Ok(())
    }
}
