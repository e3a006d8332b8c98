//! Random forest configuration with builder pattern.
//!
//! [`ForestConfig`] uses the `bon` crate for builder generation and validates
//! at `build()`.
//!
//! # Example
//!
//! ```
//! use diabetes_rf::forest::{ForestConfig, MaxFeatures};
//!
//! // Defaults: 100 trees, depth 10, sqrt features, seed 42
//! let config = ForestConfig::builder().build().unwrap();
//! assert_eq!(config.n_trees, 100);
//!
//! let config = ForestConfig::builder()
//!     .n_trees(20)
//!     .max_depth(6)
//!     .max_features(MaxFeatures::All)
//!     .build()
//!     .unwrap();
//! ```

use std::num::NonZeroUsize;

use bon::Builder;
use serde::{Deserialize, Serialize};

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Number of trees must be at least 1.
    InvalidNTrees,
    /// Maximum depth must be at least 1.
    InvalidMaxDepth,
    /// A node needs at least two samples to be split.
    InvalidMinSamplesSplit(usize),
    /// Leaves must hold at least one sample.
    InvalidMinSamplesLeaf(usize),
    /// An explicit candidate-feature count must be at least 1.
    InvalidMaxFeatures,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNTrees => write!(f, "n_trees must be at least 1"),
            Self::InvalidMaxDepth => write!(f, "max_depth must be at least 1"),
            Self::InvalidMinSamplesSplit(v) => {
                write!(f, "min_samples_split must be at least 2, got {}", v)
            }
            Self::InvalidMinSamplesLeaf(v) => {
                write!(f, "min_samples_leaf must be at least 1, got {}", v)
            }
            Self::InvalidMaxFeatures => write!(f, "max_features count must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// MaxFeatures
// =============================================================================

/// How many features are drawn as split candidates at each node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    /// `max(1, floor(sqrt(n_features)))`.
    #[default]
    Sqrt,
    /// Every feature at every node.
    All,
    /// A fixed count, capped at `n_features`.
    Count(usize),
}

impl MaxFeatures {
    /// Number of candidate features for a model with `n_features` inputs.
    pub fn resolve(self, n_features: usize) -> usize {
        let k = match self {
            MaxFeatures::Sqrt => (n_features as f64).sqrt().floor() as usize,
            MaxFeatures::All => n_features,
            MaxFeatures::Count(k) => k,
        };
        k.clamp(1, n_features.max(1))
    }
}

// =============================================================================
// ForestConfig
// =============================================================================

/// Hyperparameters for fitting a [`RandomForest`](super::RandomForest).
///
/// Every tree is grown on a bootstrap sample with its own RNG, seeded from
/// `seed` and the tree index, so the fitted forest does not depend on
/// `n_threads`.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct ForestConfig {
    /// Number of trees. Default: 100.
    #[builder(default = 100)]
    pub n_trees: u32,

    /// Maximum tree depth (root at depth 0). Default: 10.
    #[builder(default = 10)]
    pub max_depth: u32,

    /// Minimum samples a node needs to be considered for splitting. Default: 5.
    #[builder(default = 5)]
    pub min_samples_split: usize,

    /// Minimum samples on each side of a split. Default: 2.
    #[builder(default = 2)]
    pub min_samples_leaf: usize,

    /// Candidate features per split. Default: `Sqrt`.
    #[builder(default)]
    pub max_features: MaxFeatures,

    /// Grow each tree on a bootstrap resample. Default: true.
    #[builder(default = true)]
    pub bootstrap: bool,

    /// Random seed. Default: 42.
    #[builder(default = 42)]
    pub seed: u64,

    /// Number of threads. `None` uses all available cores.
    #[serde(skip)]
    pub n_threads: Option<NonZeroUsize>,
}

/// Custom finishing function that validates the config.
impl<S: forest_config_builder::IsComplete> ForestConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any parameter is out of range.
    pub fn build(self) -> Result<ForestConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl ForestConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_trees == 0 {
            return Err(ConfigError::InvalidNTrees);
        }
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidMaxDepth);
        }
        if self.min_samples_split < 2 {
            return Err(ConfigError::InvalidMinSamplesSplit(self.min_samples_split));
        }
        if self.min_samples_leaf == 0 {
            return Err(ConfigError::InvalidMinSamplesLeaf(self.min_samples_leaf));
        }
        if self.max_features == MaxFeatures::Count(0) {
            return Err(ConfigError::InvalidMaxFeatures);
        }
        Ok(())
    }

    /// Thread count for [`run_with_threads`](crate::run_with_threads): 0 = auto.
    pub fn thread_count(&self) -> usize {
        self.n_threads.map_or(0, NonZeroUsize::get)
    }
}

impl Default for ForestConfig {
    fn default() -> Self {
        // Builder defaults satisfy `validate`.
        Self::builder().__build_internal()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn default_config_is_valid() {
        let config = ForestConfig::builder().build().unwrap();
        assert_eq!(config.n_trees, 100);
        assert_eq!(config.max_depth, 10);
        assert_eq!(config.min_samples_split, 5);
        assert_eq!(config.min_samples_leaf, 2);
        assert_eq!(config.max_features, MaxFeatures::Sqrt);
        assert!(config.bootstrap);
        assert_eq!(config.seed, 42);
        assert_eq!(config, ForestConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_eq!(
            ForestConfig::builder().n_trees(0).build(),
            Err(ConfigError::InvalidNTrees)
        );
        assert_eq!(
            ForestConfig::builder().max_depth(0).build(),
            Err(ConfigError::InvalidMaxDepth)
        );
        assert_eq!(
            ForestConfig::builder().min_samples_split(1).build(),
            Err(ConfigError::InvalidMinSamplesSplit(1))
        );
        assert_eq!(
            ForestConfig::builder().min_samples_leaf(0).build(),
            Err(ConfigError::InvalidMinSamplesLeaf(0))
        );
        assert_eq!(
            ForestConfig::builder()
                .max_features(MaxFeatures::Count(0))
                .build(),
            Err(ConfigError::InvalidMaxFeatures)
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            ConfigError::InvalidMinSamplesSplit(1).to_string(),
            "min_samples_split must be at least 2, got 1"
        );
    }

    #[rstest]
    #[case(MaxFeatures::Sqrt, 8, 2)]
    #[case(MaxFeatures::Sqrt, 9, 3)]
    #[case(MaxFeatures::Sqrt, 1, 1)]
    #[case(MaxFeatures::All, 8, 8)]
    #[case(MaxFeatures::Count(3), 8, 3)]
    #[case(MaxFeatures::Count(20), 8, 8)]
    fn max_features_resolve(#[case] mf: MaxFeatures, #[case] n: usize, #[case] expected: usize) {
        assert_eq!(mf.resolve(n), expected);
    }

    #[test]
    fn thread_count() {
        assert_eq!(ForestConfig::default().thread_count(), 0);
        let config = ForestConfig::builder()
            .n_threads(NonZeroUsize::new(3).unwrap())
            .build()
            .unwrap();
        assert_eq!(config.thread_count(), 3);
    }
}
