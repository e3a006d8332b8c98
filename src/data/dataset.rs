//! Labelled feature matrix.

use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut1, Axis};

use super::error::DatasetError;
use super::record::FeatureRecord;
use super::schema::{Feature, N_FEATURES};

/// Labelled dataset with shape `[n_samples, N_FEATURES]`.
///
/// Features are sample-major (one row per record, columns in
/// [`Feature::ALL`] order). Labels are `0` (no diabetes) or `1` (diabetes).
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: Array2<f32>,
    labels: Vec<u8>,
}

impl Dataset {
    /// Create a dataset, validating shape and labels.
    pub fn new(features: Array2<f32>, labels: Vec<u8>) -> Result<Self, DatasetError> {
        let (n_rows, n_cols) = features.dim();
        if n_cols != N_FEATURES {
            return Err(DatasetError::Shape(format!(
                "expected {N_FEATURES} feature columns, got {n_cols}"
            )));
        }
        if labels.len() != n_rows {
            return Err(DatasetError::Shape(format!(
                "{n_rows} feature rows but {} labels",
                labels.len()
            )));
        }
        if let Some(&bad) = labels.iter().find(|&&l| l > 1) {
            return Err(DatasetError::InvalidLabel {
                line: 0,
                value: bad.to_string(),
            });
        }
        Ok(Self { features, labels })
    }

    /// Assemble from parts the caller has already shaped correctly.
    pub(crate) fn from_parts(features: Array2<f32>, labels: Vec<u8>) -> Self {
        debug_assert_eq!(features.ncols(), N_FEATURES);
        debug_assert_eq!(features.nrows(), labels.len());
        Self { features, labels }
    }

    /// Build from records and labels.
    pub fn from_records(rows: &[(FeatureRecord, u8)]) -> Result<Self, DatasetError> {
        let mut features = Array2::<f32>::zeros((rows.len(), N_FEATURES));
        for (mut row, (record, _)) in features.rows_mut().into_iter().zip(rows) {
            for (dst, &src) in row.iter_mut().zip(record.as_slice()) {
                *dst = src;
            }
        }
        let labels = rows.iter().map(|(_, label)| *label).collect();
        Self::new(features, labels)
    }

    #[inline]
    pub fn n_samples(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Feature matrix view `[n_samples, N_FEATURES]`.
    #[inline]
    pub fn features(&self) -> ArrayView2<'_, f32> {
        self.features.view()
    }

    #[inline]
    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    /// Feature values of one sample.
    #[inline]
    pub fn sample(&self, index: usize) -> ArrayView1<'_, f32> {
        self.features.row(index)
    }

    /// One sample as a [`FeatureRecord`].
    pub fn record(&self, index: usize) -> FeatureRecord {
        let mut record = FeatureRecord::zeros();
        for f in Feature::ALL {
            record.set(f, self.features[[index, f.index()]]);
        }
        record
    }

    /// All values of one column.
    #[inline]
    pub fn column(&self, feature: Feature) -> ArrayView1<'_, f32> {
        self.features.column(feature.index())
    }

    #[inline]
    pub fn column_mut(&mut self, feature: Feature) -> ArrayViewMut1<'_, f32> {
        self.features.column_mut(feature.index())
    }

    /// New dataset containing the given rows, in the given order.
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: self.features.select(Axis(0), indices),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }

    /// Number of samples per class, `[negatives, positives]`.
    pub fn class_counts(&self) -> [usize; 2] {
        let positives = self.labels.iter().filter(|&&l| l == 1).count();
        [self.labels.len() - positives, positives]
    }
}
