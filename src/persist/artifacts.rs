//! Artifact directory layout.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::PersistError;
use crate::config;
use crate::impute::MedianTable;

pub const MODEL_FILE: &str = "diabetes_rf_model.json";
pub const FEATURE_NAMES_FILE: &str = "feature_names.txt";
pub const MEDIANS_FILE: &str = "median_values.json";

/// The three colocated artifacts written by training and read by prediction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    dir: PathBuf,
}

impl ArtifactPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory from `DIABETES_ARTIFACT_DIR`, defaulting to `artifacts`.
    pub fn from_env() -> Self {
        Self::new(config::artifact_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn model(&self) -> PathBuf {
        self.dir.join(MODEL_FILE)
    }

    pub fn feature_names(&self) -> PathBuf {
        self.dir.join(FEATURE_NAMES_FILE)
    }

    pub fn medians(&self) -> PathBuf {
        self.dir.join(MEDIANS_FILE)
    }

    /// Create the directory (and parents) if it doesn't exist.
    pub fn ensure_dir(&self) -> Result<(), PersistError> {
        fs::create_dir_all(&self.dir).map_err(|e| PersistError::io(&self.dir, e))
    }
}

/// Write feature names comma-joined on one line.
pub fn write_feature_names(path: &Path, names: &[String]) -> Result<(), PersistError> {
    fs::write(path, names.join(",")).map_err(|e| PersistError::io(path, e))
}

/// Write the median table as pretty-printed JSON.
pub fn save_medians(path: &Path, medians: &MedianTable) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(medians)?;
    fs::write(path, json).map_err(|e| PersistError::io(path, e))
}

/// Read the median table. A missing file is `Ok(None)`; anything else that
/// goes wrong is an error.
pub fn load_medians(path: &Path) -> Result<Option<MedianTable>, PersistError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(PersistError::io(path, e)),
    };
    Ok(Some(serde_json::from_str(&text)?))
}
