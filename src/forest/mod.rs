//! Random forest classifier.
//!
//! - [`Tree`] / [`MutableTree`]: structure-of-arrays trees with probability leaves
//! - [`TreeGrower`]: CART growth with Gini impurity and per-node feature sampling
//! - [`ForestConfig`]: validated hyperparameters
//! - [`RandomForest`]: the bagged ensemble, its metadata and prediction methods

mod config;
mod grower;
mod model;
mod tree;

pub use config::{ConfigError, ForestConfig, MaxFeatures};
pub use grower::{GrowerParams, TreeGrower};
pub use model::{
    FitError, ForestMeta, ForestValidationError, MODEL_VERSION, RandomForest, tree_seed,
};
pub use tree::{MutableTree, NodeId, Tree, TreeValidationError};
