//! Schema types for model serialization.
//!
//! These types are the on-disk JSON format, kept separate from the runtime
//! [`RandomForest`](crate::RandomForest) so the format can be versioned and
//! validated independently. Floats are written as `f64`; every `f32` the
//! runtime stores survives the round trip exactly.

use serde::{Deserialize, Serialize};

use crate::data::Provenance;

/// Current on-disk format version.
pub const SCHEMA_VERSION: u32 = 1;

/// Model metadata schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetaSchema {
    /// Version tag reported with predictions.
    pub version: String,
    /// Number of features.
    pub num_features: usize,
    /// Feature names in column order.
    pub feature_names: Vec<String>,
    /// Rows in the training partition.
    pub n_train_samples: usize,
    /// Where the training data came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
}

/// Candidate-feature rule schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaxFeaturesSchema {
    Sqrt,
    All,
    Count { n: usize },
}

/// Hyperparameters the forest was fitted with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestParamsSchema {
    pub n_trees: u32,
    pub max_depth: u32,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeaturesSchema,
    pub bootstrap: bool,
    pub seed: u64,
}

/// Tree schema (SoA layout).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSchema {
    /// Number of nodes (internal + leaves).
    pub num_nodes: u32,
    /// Split feature index for each node (ignored for leaves).
    pub split_indices: Vec<u32>,
    /// Split threshold for each node (ignored for leaves).
    pub thresholds: Vec<f64>,
    /// Left child index for each node.
    pub children_left: Vec<u32>,
    /// Right child index for each node.
    pub children_right: Vec<u32>,
    /// Leaf flag for each node.
    pub is_leaf: Vec<bool>,
    /// Positive-class fraction for each node (ignored for split nodes).
    pub leaf_values: Vec<f64>,
}

/// Forest schema (collection of trees).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestSchema {
    /// Trees in fitting order.
    pub trees: Vec<TreeSchema>,
}

/// Full model file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSchema {
    pub schema_version: u32,
    pub model_type: String,
    pub meta: ModelMetaSchema,
    pub params: ForestParamsSchema,
    pub forest: ForestSchema,
}

impl ModelSchema {
    /// Model type string.
    pub const MODEL_TYPE: &'static str = "random_forest";
}
