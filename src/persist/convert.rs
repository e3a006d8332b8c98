//! Conversion between runtime types and schema types.
//!
//! Runtime → schema conversions are infallible `From` impls. Schema → runtime
//! conversions are `TryFrom` and validate everything a hand-edited or truncated
//! file could get wrong before a tree is ever traversed.

use super::PersistError;
use super::schema::{
    ForestParamsSchema, ForestSchema, MaxFeaturesSchema, ModelMetaSchema, ModelSchema,
    SCHEMA_VERSION, TreeSchema,
};
use crate::forest::{ForestConfig, ForestMeta, MaxFeatures, RandomForest, Tree};

// =============================================================================
// Params
// =============================================================================

impl From<MaxFeatures> for MaxFeaturesSchema {
    fn from(mf: MaxFeatures) -> Self {
        match mf {
            MaxFeatures::Sqrt => Self::Sqrt,
            MaxFeatures::All => Self::All,
            MaxFeatures::Count(n) => Self::Count { n },
        }
    }
}

impl From<MaxFeaturesSchema> for MaxFeatures {
    fn from(schema: MaxFeaturesSchema) -> Self {
        match schema {
            MaxFeaturesSchema::Sqrt => Self::Sqrt,
            MaxFeaturesSchema::All => Self::All,
            MaxFeaturesSchema::Count { n } => Self::Count(n),
        }
    }
}

impl From<&ForestConfig> for ForestParamsSchema {
    fn from(config: &ForestConfig) -> Self {
        Self {
            n_trees: config.n_trees,
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            min_samples_leaf: config.min_samples_leaf,
            max_features: config.max_features.into(),
            bootstrap: config.bootstrap,
            seed: config.seed,
        }
    }
}

impl TryFrom<ForestParamsSchema> for ForestConfig {
    type Error = PersistError;

    fn try_from(schema: ForestParamsSchema) -> Result<Self, Self::Error> {
        let config = ForestConfig {
            n_trees: schema.n_trees,
            max_depth: schema.max_depth,
            min_samples_split: schema.min_samples_split,
            min_samples_leaf: schema.min_samples_leaf,
            max_features: schema.max_features.into(),
            bootstrap: schema.bootstrap,
            seed: schema.seed,
            n_threads: None,
        };
        config
            .validate()
            .map_err(|e| PersistError::Validation(format!("params: {e}")))?;
        Ok(config)
    }
}

// =============================================================================
// Trees
// =============================================================================

impl From<&Tree> for TreeSchema {
    fn from(tree: &Tree) -> Self {
        Self {
            num_nodes: tree.n_nodes() as u32,
            split_indices: tree.split_indices().to_vec(),
            thresholds: tree.split_thresholds().iter().map(|&t| t as f64).collect(),
            children_left: tree.left_children().to_vec(),
            children_right: tree.right_children().to_vec(),
            is_leaf: tree.leaf_flags().to_vec(),
            leaf_values: tree.leaf_values().iter().map(|&v| v as f64).collect(),
        }
    }
}

impl TryFrom<TreeSchema> for Tree {
    type Error = PersistError;

    /// Checks only that the node count matches; structure is checked when the
    /// whole forest is validated.
    fn try_from(schema: TreeSchema) -> Result<Self, Self::Error> {
        let n_nodes = schema.num_nodes as usize;
        if schema.is_leaf.len() != n_nodes {
            return Err(PersistError::Validation(format!(
                "tree declares {n_nodes} nodes but has {} leaf flags",
                schema.is_leaf.len()
            )));
        }

        Ok(Tree::new(
            schema.split_indices,
            schema.thresholds.into_iter().map(|t| t as f32).collect(),
            schema.children_left,
            schema.children_right,
            schema.is_leaf,
            schema.leaf_values.into_iter().map(|v| v as f32).collect(),
        ))
    }
}

impl From<&RandomForest> for ForestSchema {
    fn from(forest: &RandomForest) -> Self {
        Self {
            trees: forest.trees().iter().map(TreeSchema::from).collect(),
        }
    }
}

// =============================================================================
// Model
// =============================================================================

impl From<&ForestMeta> for ModelMetaSchema {
    fn from(meta: &ForestMeta) -> Self {
        Self {
            version: meta.version.clone(),
            num_features: meta.n_features,
            feature_names: meta.feature_names.clone(),
            n_train_samples: meta.n_train_samples,
            provenance: meta.provenance,
        }
    }
}

impl From<ModelMetaSchema> for ForestMeta {
    fn from(schema: ModelMetaSchema) -> Self {
        Self {
            version: schema.version,
            feature_names: schema.feature_names,
            n_features: schema.num_features,
            n_train_samples: schema.n_train_samples,
            provenance: schema.provenance,
        }
    }
}

impl From<&RandomForest> for ModelSchema {
    fn from(forest: &RandomForest) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            model_type: Self::MODEL_TYPE.to_string(),
            meta: forest.meta().into(),
            params: forest.config().into(),
            forest: forest.into(),
        }
    }
}

impl TryFrom<ModelSchema> for RandomForest {
    type Error = PersistError;

    fn try_from(schema: ModelSchema) -> Result<Self, Self::Error> {
        if schema.schema_version != SCHEMA_VERSION {
            return Err(PersistError::UnsupportedVersion {
                found: schema.schema_version,
                expected: SCHEMA_VERSION,
            });
        }
        if schema.model_type != ModelSchema::MODEL_TYPE {
            return Err(PersistError::Validation(format!(
                "expected model_type {:?}, got {:?}",
                ModelSchema::MODEL_TYPE,
                schema.model_type
            )));
        }

        let config = ForestConfig::try_from(schema.params)?;
        let trees = schema
            .forest
            .trees
            .into_iter()
            .map(Tree::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RandomForest::from_parts(trees, config, schema.meta.into())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Provenance;
    use crate::data::synthetic::synthetic_pima;

    fn fitted() -> RandomForest {
        let config = ForestConfig::builder()
            .n_trees(5)
            .max_depth(4)
            .max_features(MaxFeatures::Count(3))
            .build()
            .unwrap();
        RandomForest::fit(&synthetic_pima(120, 5), &config)
            .unwrap()
            .with_provenance(Provenance::Synthetic)
    }

    #[test]
    fn model_round_trip_is_lossless() {
        let forest = fitted();
        let schema = ModelSchema::from(&forest);
        assert_eq!(schema.params.max_features, MaxFeaturesSchema::Count { n: 3 });
        assert_eq!(schema.forest.trees.len(), 5);

        let restored = RandomForest::try_from(schema).unwrap();
        assert_eq!(restored.trees(), forest.trees());
        assert_eq!(restored.meta(), forest.meta());
        assert_eq!(restored.config(), forest.config());
    }

    #[test]
    fn wrong_version_is_rejected() {
        let mut schema = ModelSchema::from(&fitted());
        schema.schema_version = 99;
        assert!(matches!(
            RandomForest::try_from(schema),
            Err(PersistError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn wrong_model_type_is_rejected() {
        let mut schema = ModelSchema::from(&fitted());
        schema.model_type = "gbdt".into();
        assert!(matches!(
            RandomForest::try_from(schema),
            Err(PersistError::Validation(_))
        ));
    }

    #[test]
    fn invalid_params_are_rejected() {
        let mut schema = ModelSchema::from(&fitted());
        schema.params.min_samples_leaf = 0;
        assert!(matches!(
            RandomForest::try_from(schema),
            Err(PersistError::Validation(_))
        ));
    }

    #[test]
    fn node_count_mismatch_is_rejected() {
        let mut schema = ModelSchema::from(&fitted());
        schema.forest.trees[0].num_nodes += 1;
        assert!(matches!(
            RandomForest::try_from(schema),
            Err(PersistError::Validation(_))
        ));
    }

    #[test]
    fn dangling_child_is_rejected() {
        let mut schema = ModelSchema::from(&fitted());
        let tree = &mut schema.forest.trees[0];
        let split = tree.is_leaf.iter().position(|&l| !l).unwrap();
        tree.children_left[split] = 10_000;
        assert!(matches!(
            RandomForest::try_from(schema),
            Err(PersistError::Structure(_))
        ));
    }
}
