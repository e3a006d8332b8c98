//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use diabetes_rf::training::{self, TrainOptions, TrainReport, Verbosity};
use diabetes_rf::{ArtifactPaths, DataSource, ForestConfig};

/// Train on the synthetic table with the default forest.
pub fn train_synthetic(dir: &Path) -> TrainReport {
    train_with(dir, ForestConfig::default())
}

/// Train on the synthetic table with a small forest.
pub fn train_small(dir: &Path) -> TrainReport {
    let config = ForestConfig::builder()
        .n_trees(15)
        .max_depth(6)
        .build()
        .expect("valid config");
    train_with(dir, config)
}

pub fn train_with(dir: &Path, forest: ForestConfig) -> TrainReport {
    let mut options = TrainOptions::new(DataSource::synthetic(), ArtifactPaths::new(dir));
    options.forest = forest;
    options.verbosity = Verbosity::Silent;
    training::run(&options).expect("training should succeed")
}

/// Run the `predict` binary against `artifact_dir`, feeding `stdin`.
pub fn run_predict(artifact_dir: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_predict"))
        .args(args)
        .env("DIABETES_ARTIFACT_DIR", artifact_dir)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn predict");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait for predict")
}

/// Parse the single stdout line of a `predict` run.
pub fn stdout_json(output: &Output) -> serde_json::Value {
    let text = String::from_utf8(output.stdout.clone()).expect("utf-8 stdout");
    let mut lines = text.lines();
    let line = lines.next().expect("one output line");
    assert!(lines.next().is_none(), "expected exactly one line, got {text:?}");
    serde_json::from_str(line).expect("stdout is JSON")
}
