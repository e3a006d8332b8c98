//! Environment-driven settings shared by the binaries.
//!
//! | Variable                      | Default                        |
//! |-------------------------------|--------------------------------|
//! | `DIABETES_ARTIFACT_DIR`       | `artifacts`                    |
//! | `DIABETES_DATASET_URL`        | [`DEFAULT_DATASET_URL`]        |
//! | `DIABETES_OFFLINE`            | unset (download allowed)       |
//! | `DIABETES_FETCH_TIMEOUT_SECS` | `15`                           |
//!
//! Command-line flags take precedence over these.

use std::path::PathBuf;
use std::time::Duration;

pub const ARTIFACT_DIR_VAR: &str = "DIABETES_ARTIFACT_DIR";
pub const DATASET_URL_VAR: &str = "DIABETES_DATASET_URL";
pub const OFFLINE_VAR: &str = "DIABETES_OFFLINE";
pub const FETCH_TIMEOUT_VAR: &str = "DIABETES_FETCH_TIMEOUT_SECS";

pub const DEFAULT_ARTIFACT_DIR: &str = "artifacts";
pub const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/jbrownlee/Datasets/master/pima-indians-diabetes.data.csv";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;

/// Directory holding the model, feature-name and median artifacts.
pub fn artifact_dir() -> PathBuf {
    non_empty_var(ARTIFACT_DIR_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACT_DIR))
}

pub fn dataset_url() -> String {
    non_empty_var(DATASET_URL_VAR).unwrap_or_else(|| DEFAULT_DATASET_URL.to_string())
}

/// Download timeout. Unparseable values fall back to the default.
pub fn fetch_timeout() -> Duration {
    let secs = match non_empty_var(FETCH_TIMEOUT_VAR) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring {FETCH_TIMEOUT_VAR}={raw:?}; using {DEFAULT_FETCH_TIMEOUT_SECS}s");
            DEFAULT_FETCH_TIMEOUT_SECS
        }),
        None => DEFAULT_FETCH_TIMEOUT_SECS,
    };
    Duration::from_secs(secs)
}

/// True when `DIABETES_OFFLINE` is set to anything other than `0`/`false`.
pub fn is_offline() -> bool {
    non_empty_var(OFFLINE_VAR).is_some_and(|v| is_truthy(&v))
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn is_truthy(value: &str) -> bool {
    !matches!(value.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off")
}
