//! diabetes-rf: a random-forest diabetes risk model.
//!
//! The crate has two halves that only meet through files on disk:
//!
//! - **Training** ([`training::run`]): acquire the Pima diabetes table (remote CSV,
//!   local CSV, or a seeded synthetic stand-in), impute missing measurements with
//!   column medians, fit a [`RandomForest`], evaluate it on a stratified hold-out
//!   split, and write the artifacts.
//! - **Inference** ([`inference::Predictor`]): load the artifacts, rebuild a full
//!   feature record from a partial JSON object, apply the same imputation with the
//!   persisted medians, and score it.
//!
//! # Key Types
//!
//! - [`FeatureRecord`] / [`Feature`] - The eight model inputs in fixed column order
//! - [`MedianTable`] - Imputation values for the five nullable-as-zero columns
//! - [`RandomForest`] / [`ForestConfig`] - The classifier and its hyperparameters
//! - [`ArtifactPaths`] - Where the trainer writes and the predictor reads
//!
//! # Missing Values
//!
//! In `Glucose`, `BloodPressure`, `SkinThickness`, `Insulin` and `BMI` a value of
//! exactly `0` means "not measured". Those zeros are always replaced by the
//! training-time median before the forest sees a row, at training and at
//! prediction time.

pub mod config;
pub mod data;
pub mod forest;
pub mod impute;
pub mod inference;
pub mod persist;
pub mod training;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use data::{Acquired, DataSource, Dataset, DatasetError, Feature, FeatureRecord, Provenance};
pub use forest::{ForestConfig, MaxFeatures, RandomForest, MODEL_VERSION};
pub use impute::MedianTable;
pub use inference::{Prediction, PredictionInput, PredictionResponse, PredictError, Predictor};
pub use persist::{ArtifactPaths, PersistError};
pub use training::{TrainError, TrainOptions, TrainReport, Verbosity};
pub use utils::{Parallelism, run_with_threads};
