//! End-to-end training: acquire, impute, split, fit, evaluate, persist.

use crate::data::{DataSource, DatasetError, Provenance, acquire, stratified_split};
use crate::forest::{FitError, ForestConfig, RandomForest};
use crate::impute::MedianTable;
use crate::persist::{self, ArtifactPaths, PersistError};

use super::logger::{TrainingLogger, Verbosity};
use super::metrics::{ClassificationReport, log_loss, roc_auc};

/// Hold-out share used when none is given.
pub const DEFAULT_TEST_FRACTION: f32 = 0.2;
/// Split seed used when none is given.
pub const DEFAULT_SPLIT_SEED: u64 = 42;

/// Errors that abort training.
#[derive(Debug, thiserror::Error)]
pub enum TrainError {
    #[error("dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("fitting failed: {0}")]
    Fit(#[from] FitError),

    #[error("failed to write artifacts: {0}")]
    Persist(#[from] PersistError),

    #[error("test fraction must be in (0, 1), got {0}")]
    InvalidTestFraction(f32),
}

/// Everything [`run`] needs.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    pub source: DataSource,
    pub artifacts: ArtifactPaths,
    pub forest: ForestConfig,
    pub test_fraction: f32,
    pub split_seed: u64,
    pub verbosity: Verbosity,
}

impl TrainOptions {
    /// Default forest, 80/20 split with seed 42, `Info` output.
    pub fn new(source: DataSource, artifacts: ArtifactPaths) -> Self {
        Self {
            source,
            artifacts,
            forest: ForestConfig::default(),
            test_fraction: DEFAULT_TEST_FRACTION,
            split_seed: DEFAULT_SPLIT_SEED,
            verbosity: Verbosity::Info,
        }
    }
}

/// Summary of a finished training run.
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub provenance: Provenance,
    pub n_samples: usize,
    pub n_train: usize,
    pub n_test: usize,
    /// Zeros replaced by medians across the whole dataset.
    pub n_imputed: usize,
    pub medians: MedianTable,
    pub accuracy: f64,
    pub auc: f64,
    pub log_loss: f64,
    pub report: ClassificationReport,
    pub artifacts: ArtifactPaths,
}

/// Run the full training pipeline and write the three artifacts.
///
/// Medians are computed over the whole acquired dataset before the split, so
/// the persisted table is the one every training row was imputed with.
pub fn run(options: &TrainOptions) -> Result<TrainReport, TrainError> {
    let test_fraction = options.test_fraction;
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(TrainError::InvalidTestFraction(test_fraction));
    }
    options.forest.validate().map_err(FitError::from)?;

    let mut logger = TrainingLogger::new(options.verbosity);

    logger.info("Loading dataset...");
    let acquired = acquire(&options.source)?;
    let provenance = acquired.provenance();
    let mut dataset = acquired.into_dataset();
    if dataset.is_empty() {
        return Err(DatasetError::Empty.into());
    }
    logger.info(format_args!(
        "Dataset loaded ({provenance}). Shape: ({}, {})",
        dataset.n_samples(),
        crate::data::N_FEATURES + 1
    ));

    let medians = MedianTable::fit(&dataset);
    let n_imputed = medians.impute_dataset(&mut dataset);
    logger.debug(format_args!("imputed {n_imputed} missing values"));
    logger.debug(format_args!("medians: {medians:?}"));

    let (train_idx, test_idx) =
        stratified_split(dataset.labels(), test_fraction, options.split_seed);
    let train = dataset.select(&train_idx);
    let test = dataset.select(&test_idx);
    logger.info(format_args!(
        "Training set size: ({}, {})",
        train.n_samples(),
        crate::data::N_FEATURES
    ));
    logger.info(format_args!(
        "Test set size: ({}, {})",
        test.n_samples(),
        crate::data::N_FEATURES
    ));

    logger.start_training(options.forest.n_trees as usize);
    let forest = RandomForest::fit(&train, &options.forest)?.with_provenance(provenance);
    logger.finish_training();

    let predictions = forest.classify_batch(test.features());
    let probabilities = forest.predict_proba_batch(test.features());
    let report = ClassificationReport::new(test.labels(), &predictions);
    let auc = roc_auc(test.labels(), &probabilities);
    let loss = log_loss(test.labels(), &probabilities);

    logger.info(format_args!("\nModel Accuracy: {:.4}", report.accuracy));
    logger.info("\nClassification Report:");
    logger.info(&report);
    logger.debug(format_args!("auc: {auc:.4}  log-loss: {loss:.4}"));
    for (name, share) in forest.feature_importance() {
        logger.debug(format_args!("importance {name:<26} {share:.3}"));
    }

    let paths = &options.artifacts;
    paths.ensure_dir()?;
    persist::save_model(&forest, &paths.model())?;
    logger.info(format_args!("\nModel saved to: {}", paths.model().display()));
    persist::write_feature_names(&paths.feature_names(), &forest.meta().feature_names)?;
    persist::save_medians(&paths.medians(), &medians)?;
    logger.info(format_args!("Median values saved to: {}", paths.medians().display()));
    logger.info("Training completed successfully!");

    Ok(TrainReport {
        provenance,
        n_samples: dataset.n_samples(),
        n_train: train.n_samples(),
        n_test: test.n_samples(),
        n_imputed,
        medians,
        accuracy: report.accuracy,
        auc,
        log_loss: loss,
        report,
        artifacts: paths.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(dir: &std::path::Path) -> TrainOptions {
        let mut options = TrainOptions::new(DataSource::synthetic(), ArtifactPaths::new(dir));
        options.forest = ForestConfig::builder().n_trees(10).build().unwrap();
        options.verbosity = Verbosity::Silent;
        options
    }

    #[test]
    fn writes_all_artifacts() {
        let tmp = tempfile::tempdir().unwrap();
        let report = run(&options(tmp.path())).unwrap();

        assert_eq!(report.provenance, Provenance::Synthetic);
        assert_eq!(report.n_samples, 768);
        assert_eq!(report.n_train + report.n_test, 768);
        assert!(report.artifacts.model().is_file());
        assert!(report.artifacts.feature_names().is_file());
        assert!(report.artifacts.medians().is_file());
        assert!((0.0..=1.0).contains(&report.accuracy));
    }

    #[test]
    fn rejects_bad_test_fraction() {
        let tmp = tempfile::tempdir().unwrap();
        let mut opts = options(tmp.path());
        opts.test_fraction = 1.0;
        assert!(matches!(run(&opts), Err(TrainError::InvalidTestFraction(_))));
        assert!(!opts.artifacts.model().exists());
    }

    #[test]
    fn missing_csv_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let mut opts = options(tmp.path());
        opts.source = DataSource::File(tmp.path().join("missing.csv"));
        assert!(matches!(run(&opts), Err(TrainError::Dataset(_))));
    }
}
