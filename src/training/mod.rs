//! Training pipeline and evaluation.
//!
//! - [`run`]: the end-to-end trainer behind the `train` binary
//! - [`TrainingLogger`], [`Verbosity`]: operator-facing progress output
//! - [`ClassificationReport`] and friends: hold-out evaluation metrics

mod logger;
mod metrics;
mod pipeline;

pub use logger::{TrainingLogger, Verbosity};
pub use metrics::{ClassScores, ClassificationReport, ConfusionMatrix, accuracy, log_loss, roc_auc};
pub use pipeline::{
    DEFAULT_SPLIT_SEED, DEFAULT_TEST_FRACTION, TrainError, TrainOptions, TrainReport, run,
};
