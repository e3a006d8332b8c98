use std::path::PathBuf;

use crate::persist::PersistError;

/// Everything that can turn a prediction request into an error payload.
///
/// The `Display` text is what the caller sees in the `error` field.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("Invalid JSON input: {0}")]
    InvalidJson(String),

    #[error("Input must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("{key} must be a number, got {found}")]
    InvalidValue { key: &'static str, found: String },

    #[error("{key} must be a non-negative finite number")]
    OutOfRange { key: &'static str },

    #[error("Model file not found: {}. Please train the model first.", .path.display())]
    ModelMissing { path: PathBuf },

    #[error("Failed to load model from {}: {source}", .path.display())]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: PersistError,
    },

    #[error("Failed to load median values from {}: {source}", .path.display())]
    Medians {
        path: PathBuf,
        #[source]
        source: PersistError,
    },

    #[error("Model was trained on features {found:?}, expected {expected:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Failed to read input: {0}")]
    Input(#[from] std::io::Error),
}
