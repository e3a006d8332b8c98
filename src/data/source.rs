//! Dataset acquisition.
//!
//! Acquisition is one explicit function, [`acquire`], returning which branch
//! produced the data. A failed download degrades to the synthetic table instead
//! of failing; an explicitly requested local file does not.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::dataset::Dataset;
use super::error::DatasetError;
use super::io::{fetch_csv, read_csv};
use super::synthetic::{SYNTHETIC_ROWS, SYNTHETIC_SEED, synthetic_pima};

/// Where the trainer should get its data.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// Download a CSV; fall back to the synthetic table on any failure.
    Remote { url: String, timeout: Duration },
    /// Read a local CSV. Failures are errors.
    File(PathBuf),
    /// Skip I/O and generate the synthetic table.
    Synthetic { rows: usize, seed: u64 },
}

impl DataSource {
    /// The default synthetic table (768 rows, seed 42).
    pub fn synthetic() -> Self {
        DataSource::Synthetic {
            rows: SYNTHETIC_ROWS,
            seed: SYNTHETIC_SEED,
        }
    }
}

/// Which branch produced the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Remote,
    File,
    Synthetic,
}

impl Provenance {
    pub fn as_str(self) -> &'static str {
        match self {
            Provenance::Remote => "remote",
            Provenance::File => "file",
            Provenance::Synthetic => "synthetic",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dataset tagged with the branch that produced it.
#[derive(Debug, Clone)]
pub enum Acquired {
    FromRemote(Dataset),
    FromFile(Dataset),
    Synthetic(Dataset),
}

impl Acquired {
    pub fn provenance(&self) -> Provenance {
        match self {
            Acquired::FromRemote(_) => Provenance::Remote,
            Acquired::FromFile(_) => Provenance::File,
            Acquired::Synthetic(_) => Provenance::Synthetic,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        match self {
            Acquired::FromRemote(ds) | Acquired::FromFile(ds) | Acquired::Synthetic(ds) => ds,
        }
    }

    pub fn into_dataset(self) -> Dataset {
        match self {
            Acquired::FromRemote(ds) | Acquired::FromFile(ds) | Acquired::Synthetic(ds) => ds,
        }
    }
}

/// Acquire a dataset from `source`.
pub fn acquire(source: &DataSource) -> Result<Acquired, DatasetError> {
    match source {
        DataSource::Remote { url, timeout } => match fetch_csv(url, *timeout) {
            Ok(ds) => {
                log::info!("Loaded {} rows from {url}", ds.n_samples());
                Ok(Acquired::FromRemote(ds))
            }
            Err(e) => {
                log::warn!("Could not load dataset from {url}: {e}");
                log::warn!(
                    "Falling back to synthetic data ({SYNTHETIC_ROWS} rows, seed {SYNTHETIC_SEED}); \
                     it only approximates the real table"
                );
                Ok(Acquired::Synthetic(synthetic_pima(SYNTHETIC_ROWS, SYNTHETIC_SEED)))
            }
        },
        DataSource::File(path) => {
            let ds = read_csv(path)?;
            log::info!("Loaded {} rows from {}", ds.n_samples(), path.display());
            Ok(Acquired::FromFile(ds))
        }
        DataSource::Synthetic { rows, seed } => {
            if *rows == 0 {
                return Err(DatasetError::Empty);
            }
            Ok(Acquired::Synthetic(synthetic_pima(*rows, *seed)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_branch_is_tagged() {
        let acquired = acquire(&DataSource::synthetic()).unwrap();
        assert_eq!(acquired.provenance(), Provenance::Synthetic);
        assert_eq!(acquired.dataset().n_samples(), SYNTHETIC_ROWS);
    }

    #[test]
    fn unreachable_remote_falls_back_to_synthetic() {
        let source = DataSource::Remote {
            // Reserved TLD, never resolves.
            url: "http://dataset.invalid/pima.csv".to_string(),
            timeout: Duration::from_secs(2),
        };
        let acquired = acquire(&source).unwrap();
        assert_eq!(acquired.provenance(), Provenance::Synthetic);
        assert_eq!(
            acquired.into_dataset(),
            synthetic_pima(SYNTHETIC_ROWS, SYNTHETIC_SEED)
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = acquire(&DataSource::File(PathBuf::from("/nonexistent/pima.csv"))).unwrap_err();
        assert!(matches!(err, DatasetError::Io(_)));
    }

    #[test]
    fn zero_synthetic_rows_is_an_error() {
        let err = acquire(&DataSource::Synthetic { rows: 0, seed: 1 }).unwrap_err();
        assert!(matches!(err, DatasetError::Empty));
    }
}
