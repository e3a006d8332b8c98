//! Model-backed prediction.

use serde::{Deserialize, Serialize};

use super::{PredictError, PredictionInput};
use crate::data::schema::feature_names;
use crate::forest::RandomForest;
use crate::impute::MedianTable;
use crate::persist::{self, ArtifactPaths};

/// Result of scoring one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub has_diabetes: bool,
    /// Probability of the positive class.
    pub probability: f64,
    pub model_version: String,
}

/// A loaded forest plus the medians it was trained with.
#[derive(Debug, Clone)]
pub struct Predictor {
    forest: RandomForest,
    medians: MedianTable,
}

impl Predictor {
    /// Wrap a forest, checking it was trained on the expected columns.
    pub fn new(forest: RandomForest, medians: MedianTable) -> Result<Self, PredictError> {
        let expected = feature_names();
        if forest.meta().feature_names != expected {
            return Err(PredictError::FeatureMismatch {
                expected,
                found: forest.meta().feature_names.clone(),
            });
        }
        Ok(Self { forest, medians })
    }

    /// Load the model and median table from an artifact directory.
    ///
    /// A missing median file falls back to [`MedianTable::DEFAULT`]; a present
    /// but unreadable one is an error.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, PredictError> {
        let model_path = paths.model();
        if !model_path.is_file() {
            return Err(PredictError::ModelMissing { path: model_path });
        }
        let forest = persist::load_model(&model_path).map_err(|source| {
            if source.is_not_found() {
                PredictError::ModelMissing {
                    path: model_path.clone(),
                }
            } else {
                PredictError::ModelLoad {
                    path: model_path.clone(),
                    source,
                }
            }
        })?;

        let medians_path = paths.medians();
        let medians = match persist::load_medians(&medians_path) {
            Ok(Some(table)) => table,
            Ok(None) => {
                log::debug!(
                    "{} not found; using default medians",
                    medians_path.display()
                );
                MedianTable::DEFAULT
            }
            Err(source) => {
                return Err(PredictError::Medians {
                    path: medians_path,
                    source,
                });
            }
        };

        Self::new(forest, medians)
    }

    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }

    pub fn medians(&self) -> &MedianTable {
        &self.medians
    }

    /// Impute missing values and score.
    pub fn predict(&self, input: &PredictionInput) -> Prediction {
        let mut record = input.record();
        let imputed = self.medians.impute_record(&mut record);
        log::debug!("imputed {imputed} missing values: {record:?}");

        let [p0, p1] = self.forest.class_probabilities(&record);
        Prediction {
            has_diabetes: p1 > p0,
            probability: p1,
            model_version: self.forest.meta().version.clone(),
        }
    }
}
