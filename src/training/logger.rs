//! Operator-facing training output.
//!
//! Progress and evaluation results go to stdout, gated by [`Verbosity`].
//! Diagnostics (fallbacks, warnings) go through the `log` facade instead.

use std::fmt::Display;
use std::time::Instant;

/// How much the trainer prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Print nothing.
    #[default]
    Silent,
    /// Progress, sizes, accuracy and the classification report.
    Info,
    /// Also medians, imputation counts, AUC/log-loss and feature importance.
    Debug,
}

/// Prints training progress according to a [`Verbosity`].
#[derive(Debug)]
pub struct TrainingLogger {
    verbosity: Verbosity,
    started: Option<Instant>,
}

impl TrainingLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            started: None,
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn info(&self, message: impl Display) {
        if self.verbosity >= Verbosity::Info {
            println!("{message}");
        }
    }

    pub fn debug(&self, message: impl Display) {
        if self.verbosity >= Verbosity::Debug {
            println!("  {message}");
        }
    }

    pub fn start_training(&mut self, n_trees: usize) {
        self.started = Some(Instant::now());
        self.info(format_args!("Training Random Forest model ({n_trees} trees)..."));
    }

    pub fn finish_training(&mut self) {
        if let Some(started) = self.started.take() {
            self.debug(format_args!(
                "fitted in {:.2}s",
                started.elapsed().as_secs_f64()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_is_ordered() {
        assert!(Verbosity::Silent < Verbosity::Info);
        assert!(Verbosity::Info < Verbosity::Debug);
        assert_eq!(Verbosity::default(), Verbosity::Silent);
    }

    #[test]
    fn finish_without_start_is_a_no_op() {
        let mut logger = TrainingLogger::new(Verbosity::Silent);
        logger.finish_training();
        logger.start_training(3);
        logger.finish_training();
        assert!(logger.started.is_none());
    }
}
