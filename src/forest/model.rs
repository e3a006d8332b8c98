//! Random forest classifier.

use ndarray::ArrayView2;
use rand::prelude::*;

use crate::data::{Dataset, Provenance, SampleAccessor};
use crate::utils::{Parallelism, run_with_threads};

use super::config::ForestConfig;
use super::grower::{GrowerParams, TreeGrower};
use super::tree::{Tree, TreeValidationError};

/// Version tag reported with every model prediction.
pub const MODEL_VERSION: &str = "random-forest-v1";

/// Errors from [`RandomForest::fit`].
#[derive(Debug, thiserror::Error)]
pub enum FitError {
    #[error("cannot fit a forest on an empty dataset")]
    EmptyDataset,

    #[error("invalid forest config: {0}")]
    Config(#[from] super::config::ConfigError),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Structural validation errors for [`RandomForest`].
#[derive(Debug, Clone, PartialEq)]
pub enum ForestValidationError {
    NoTrees,
    FeatureNamesLenMismatch { n_features: usize, len: usize },
    InvalidTree { tree_idx: usize, error: TreeValidationError },
}

impl std::fmt::Display for ForestValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoTrees => write!(f, "forest has no trees"),
            Self::FeatureNamesLenMismatch { n_features, len } => {
                write!(f, "{len} feature names for {n_features} features")
            }
            Self::InvalidTree { tree_idx, error } => write!(f, "tree {tree_idx}: {error}"),
        }
    }
}

impl std::error::Error for ForestValidationError {}

/// Introspection data stored with a fitted forest.
#[derive(Debug, Clone, PartialEq)]
pub struct ForestMeta {
    /// Model version tag.
    pub version: String,
    /// Feature names in column order.
    pub feature_names: Vec<String>,
    /// Number of features.
    pub n_features: usize,
    /// Rows in the training partition.
    pub n_train_samples: usize,
    /// Which acquisition branch produced the training data, when known.
    pub provenance: Option<Provenance>,
}

/// Bagged ensemble of CART classification trees.
///
/// Each tree's leaf holds the fraction of positive training samples that
/// reached it. [`class_probabilities`](Self::class_probabilities) averages those
/// fractions over all trees.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForest {
    trees: Vec<Tree>,
    config: ForestConfig,
    meta: ForestMeta,
}

impl RandomForest {
    /// Fit a forest, using the thread count from `config`.
    pub fn fit(dataset: &Dataset, config: &ForestConfig) -> Result<Self, FitError> {
        run_with_threads(config.thread_count(), |parallelism| {
            Self::fit_with(dataset, config, parallelism)
        })?
    }

    /// Fit a forest with an explicit parallelism mode.
    ///
    /// Assumes the caller has set up any thread pool. The result doesn't depend
    /// on `parallelism`: tree `i` draws all its randomness from its own RNG.
    pub fn fit_with(
        dataset: &Dataset,
        config: &ForestConfig,
        parallelism: Parallelism,
    ) -> Result<Self, FitError> {
        config.validate()?;
        if dataset.is_empty() {
            return Err(FitError::EmptyDataset);
        }

        let features = dataset.features();
        let n_features = features.ncols();
        let params = GrowerParams::from_config(config, n_features);
        let labels = dataset.labels();

        let trees = parallelism.maybe_par_map(0..config.n_trees as usize, |i| {
            let mut rng = StdRng::seed_from_u64(tree_seed(config.seed, i));
            TreeGrower::new(params.clone(), features, labels).grow(&mut rng)
        });

        let meta = ForestMeta {
            version: MODEL_VERSION.to_string(),
            feature_names: crate::data::schema::feature_names(),
            n_features,
            n_train_samples: dataset.n_samples(),
            provenance: None,
        };

        Ok(Self {
            trees,
            config: config.clone(),
            meta,
        })
    }

    /// Assemble a forest from already-built parts, validating its structure.
    pub fn from_parts(
        trees: Vec<Tree>,
        config: ForestConfig,
        meta: ForestMeta,
    ) -> Result<Self, ForestValidationError> {
        let forest = Self {
            trees,
            config,
            meta,
        };
        forest.validate()?;
        Ok(forest)
    }

    /// Tag the forest with the source of its training data.
    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.meta.provenance = Some(provenance);
        self
    }

    /// Validate structural invariants of every tree.
    pub fn validate(&self) -> Result<(), ForestValidationError> {
        if self.trees.is_empty() {
            return Err(ForestValidationError::NoTrees);
        }
        if self.meta.feature_names.len() != self.meta.n_features {
            return Err(ForestValidationError::FeatureNamesLenMismatch {
                n_features: self.meta.n_features,
                len: self.meta.feature_names.len(),
            });
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.meta.n_features)
                .map_err(|e| ForestValidationError::InvalidTree { tree_idx: i, error: e })?;
        }
        Ok(())
    }

    #[inline]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    pub fn meta(&self) -> &ForestMeta {
        &self.meta
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    /// `[p(label = 0), p(label = 1)]`: the mean over trees of the leaf class fractions.
    pub fn class_probabilities<S: SampleAccessor + ?Sized>(&self, sample: &S) -> [f64; 2] {
        let sum: f64 = self
            .trees
            .iter()
            .map(|t| t.predict_proba(sample) as f64)
            .sum();
        let p1 = (sum / self.trees.len().max(1) as f64).clamp(0.0, 1.0);
        [1.0 - p1, p1]
    }

    /// Arg-max class; ties resolve to 0.
    pub fn classify<S: SampleAccessor + ?Sized>(&self, sample: &S) -> u8 {
        let [p0, p1] = self.class_probabilities(sample);
        u8::from(p1 > p0)
    }

    /// Positive-class probability for every row of `features`.
    pub fn predict_proba_batch(&self, features: ArrayView2<'_, f32>) -> Vec<f64> {
        features
            .rows()
            .into_iter()
            .map(|row| self.class_probabilities(&row)[1])
            .collect()
    }

    /// Predicted labels for every row of `features`.
    pub fn classify_batch(&self, features: ArrayView2<'_, f32>) -> Vec<u8> {
        features
            .rows()
            .into_iter()
            .map(|row| self.classify(&row))
            .collect()
    }

    // =========================================================================
    // Feature Importance
    // =========================================================================

    /// Number of split nodes using each feature, summed over trees.
    pub fn split_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.meta.n_features];
        for tree in &self.trees {
            for node in 0..tree.n_nodes() {
                let node = node as u32;
                if !tree.is_leaf(node) {
                    if let Some(c) = counts.get_mut(tree.split_index(node) as usize) {
                        *c += 1;
                    }
                }
            }
        }
        counts
    }

    /// Split-count importance normalized to sum to 1, paired with feature names
    /// and sorted from most to least used.
    pub fn feature_importance(&self) -> Vec<(String, f64)> {
        let counts = self.split_counts();
        let total: usize = counts.iter().sum();
        let mut importance: Vec<(String, f64)> = self
            .meta
            .feature_names
            .iter()
            .zip(&counts)
            .map(|(name, &c)| {
                let share = if total == 0 { 0.0 } else { c as f64 / total as f64 };
                (name.clone(), share)
            })
            .collect();
        importance.sort_by(|a, b| b.1.total_cmp(&a.1));
        importance
    }
}

/// RNG seed for tree `index` of a forest seeded with `seed`.
#[inline]
pub fn tree_seed(seed: u64, index: usize) -> u64 {
    seed ^ 0x9E37_79B9_7F4A_7C15u64.wrapping_mul(index as u64 + 1)
}
