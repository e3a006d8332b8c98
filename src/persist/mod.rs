//! Model and artifact persistence.
//!
//! - [`schema`]: versioned JSON schema types for the forest
//! - [`save_model`] / [`load_model`]: forest ⇄ JSON file
//! - [`ArtifactPaths`]: the artifact directory layout shared by trainer and predictor
//!
//! # Example
//!
//! ```no_run
//! use diabetes_rf::persist::{ArtifactPaths, load_model};
//!
//! let paths = ArtifactPaths::new("artifacts");
//! let forest = load_model(&paths.model())?;
//! # Ok::<(), diabetes_rf::PersistError>(())
//! ```

mod artifacts;
mod convert;
pub mod schema;

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub use artifacts::{
    ArtifactPaths, FEATURE_NAMES_FILE, MEDIANS_FILE, MODEL_FILE, load_medians, save_medians,
    write_feature_names,
};

use crate::forest::{ForestValidationError, RandomForest};
use schema::ModelSchema;

/// Errors from reading or writing artifacts.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported model schema version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("invalid model: {0}")]
    Validation(String),

    #[error("invalid model structure: {0}")]
    Structure(#[from] ForestValidationError),
}

impl PersistError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        PersistError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// True when the underlying cause is a missing file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PersistError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Serialize a forest to its JSON schema. Structurally invalid forests are
/// refused.
pub fn model_to_json(forest: &RandomForest) -> Result<String, PersistError> {
    forest.validate()?;
    Ok(serde_json::to_string(&ModelSchema::from(forest))?)
}

/// Parse and validate a forest from JSON.
pub fn model_from_json(json: &str) -> Result<RandomForest, PersistError> {
    let schema: ModelSchema = serde_json::from_str(json)?;
    RandomForest::try_from(schema)
}

/// Write a forest to `path` as JSON.
///
/// The forest is validated first, so nothing is written that
/// [`load_model`] would reject.
pub fn save_model(forest: &RandomForest, path: &Path) -> Result<(), PersistError> {
    forest.validate()?;
    let file = File::create(path).map_err(|e| PersistError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &ModelSchema::from(forest))?;
    writer.flush().map_err(|e| PersistError::io(path, e))?;
    Ok(())
}

/// Read and validate a forest from `path`.
pub fn load_model(path: &Path) -> Result<RandomForest, PersistError> {
    let file = File::open(path).map_err(|e| PersistError::io(path, e))?;
    let schema: ModelSchema = serde_json::from_reader(BufReader::new(file))?;
    RandomForest::try_from(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::synthetic::synthetic_pima;
    use crate::data::{Dataset, Feature, FeatureRecord};
    use crate::forest::ForestConfig;

    fn fitted() -> RandomForest {
        let config = ForestConfig::builder().n_trees(4).max_depth(5).build().unwrap();
        RandomForest::fit(&synthetic_pima(100, 2), &config).unwrap()
    }

    #[test]
    fn file_round_trip_preserves_predictions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MODEL_FILE);
        let forest = fitted();

        save_model(&forest, &path).unwrap();
        let loaded = load_model(&path).unwrap();

        let data = synthetic_pima(30, 9);
        assert_eq!(
            loaded.predict_proba_batch(data.features()),
            forest.predict_proba_batch(data.features())
        );
    }

    #[test]
    fn json_is_deterministic() {
        let a = model_to_json(&fitted()).unwrap();
        let b = model_to_json(&fitted()).unwrap();
        assert_eq!(a, b);
        assert_eq!(model_from_json(&a).unwrap(), fitted());
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_model(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn refuses_to_write_infinite_thresholds() {
        // Glucose is the only varying column and positives sit at +inf, so
        // every root split lands on an infinite midpoint.
        let rows: Vec<(FeatureRecord, u8)> = (0..20)
            .map(|i| {
                let glucose = if i % 2 == 1 { f32::INFINITY } else { 100.0 };
                (FeatureRecord::zeros().with(Feature::Glucose, glucose), (i % 2) as u8)
            })
            .collect();
        let dataset = Dataset::from_records(&rows).unwrap();
        let config = ForestConfig::builder().n_trees(3).bootstrap(false).build().unwrap();
        let forest = RandomForest::fit(&dataset, &config).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MODEL_FILE);
        assert!(matches!(
            save_model(&forest, &path),
            Err(PersistError::Structure(_))
        ));
        assert!(!path.exists());
        assert!(model_to_json(&forest).is_err());
    }

    #[test]
    fn garbage_is_a_json_error() {
        assert!(matches!(
            model_from_json("{not json"),
            Err(PersistError::Json(_))
        ));
    }
}
