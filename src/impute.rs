//! Median imputation for nullable-as-zero columns.
//!
//! In the five [`Feature::NULLABLE`] columns a value of exactly `0` is a missing
//! measurement, never a real zero. [`MedianTable::fit`] computes each column's
//! median over its non-missing values once, at training time; the same table is
//! persisted and reused by the predictor, so single inference records are never
//! imputed with statistics of their own.

use serde::{Deserialize, Serialize};

use crate::data::{Dataset, Feature, FeatureRecord};
use crate::utils::median_in_place;

/// Per-column medians for the nullable-as-zero columns.
///
/// Serializes as a flat JSON object keyed by column name. Keys missing from a
/// persisted table take the built-in default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedianTable {
    #[serde(rename = "Glucose")]
    pub glucose: f32,
    #[serde(rename = "BloodPressure")]
    pub blood_pressure: f32,
    #[serde(rename = "SkinThickness")]
    pub skin_thickness: f32,
    #[serde(rename = "Insulin")]
    pub insulin: f32,
    #[serde(rename = "BMI")]
    pub bmi: f32,
}

impl MedianTable {
    /// Built-in medians used when no persisted table is available.
    pub const DEFAULT: MedianTable = MedianTable {
        glucose: 117.0,
        blood_pressure: 72.0,
        skin_thickness: 23.0,
        insulin: 30.5,
        bmi: 32.0,
    };

    /// Median for a nullable column, `None` for the other columns.
    pub fn get(&self, feature: Feature) -> Option<f32> {
        match feature {
            Feature::Glucose => Some(self.glucose),
            Feature::BloodPressure => Some(self.blood_pressure),
            Feature::SkinThickness => Some(self.skin_thickness),
            Feature::Insulin => Some(self.insulin),
            Feature::Bmi => Some(self.bmi),
            _ => None,
        }
    }

    fn slot_mut(&mut self, feature: Feature) -> Option<&mut f32> {
        match feature {
            Feature::Glucose => Some(&mut self.glucose),
            Feature::BloodPressure => Some(&mut self.blood_pressure),
            Feature::SkinThickness => Some(&mut self.skin_thickness),
            Feature::Insulin => Some(&mut self.insulin),
            Feature::Bmi => Some(&mut self.bmi),
            _ => None,
        }
    }

    /// Compute medians over the non-missing values of each nullable column.
    ///
    /// A column with no measured values at all keeps its built-in default.
    pub fn fit(dataset: &Dataset) -> MedianTable {
        let mut table = MedianTable::DEFAULT;
        for feature in Feature::NULLABLE {
            let mut observed: Vec<f32> = dataset
                .column(feature)
                .iter()
                .copied()
                .filter(|&v| !is_missing(v))
                .collect();

            match median_in_place(&mut observed) {
                Some(median) => {
                    if let Some(slot) = table.slot_mut(feature) {
                        *slot = median;
                    }
                }
                None => log::warn!(
                    "{} has no measured values; using default median {}",
                    feature.column_name(),
                    table.get(feature).unwrap_or_default()
                ),
            }
        }
        table
    }

    /// Replace missing values in one record. Returns how many were replaced.
    pub fn impute_record(&self, record: &mut FeatureRecord) -> usize {
        let mut replaced = 0;
        for feature in Feature::NULLABLE {
            if is_missing(record[feature]) {
                if let Some(median) = self.get(feature) {
                    record[feature] = median;
                    replaced += 1;
                }
            }
        }
        replaced
    }

    /// Replace missing values in every row. Returns how many were replaced.
    pub fn impute_dataset(&self, dataset: &mut Dataset) -> usize {
        let mut replaced = 0;
        for feature in Feature::NULLABLE {
            let Some(median) = self.get(feature) else {
                continue;
            };
            for v in dataset.column_mut(feature).iter_mut() {
                if is_missing(*v) {
                    *v = median;
                    replaced += 1;
                }
            }
        }
        replaced
    }
}

impl Default for MedianTable {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// `0` in a nullable column means "not measured".
#[inline]
fn is_missing(value: f32) -> bool {
    value == 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(rows: &[[f32; 8]]) -> Dataset {
        let rows: Vec<_> = rows
            .iter()
            .map(|r| (FeatureRecord::from_array(*r), 0u8))
            .collect();
        Dataset::from_records(&rows).unwrap()
    }

    #[test]
    fn fit_ignores_zeros() {
        let ds = dataset(&[
            [1.0, 100.0, 70.0, 0.0, 0.0, 30.0, 0.5, 30.0],
            [2.0, 0.0, 80.0, 20.0, 100.0, 0.0, 0.5, 40.0],
            [3.0, 140.0, 0.0, 40.0, 0.0, 36.0, 0.5, 50.0],
        ]);
        let table = MedianTable::fit(&ds);
        assert_eq!(table.glucose, 120.0);
        assert_eq!(table.blood_pressure, 75.0);
        assert_eq!(table.skin_thickness, 30.0);
        assert_eq!(table.insulin, 100.0);
        assert_eq!(table.bmi, 33.0);
    }

    #[test]
    fn fit_keeps_default_for_all_missing_column() {
        let ds = dataset(&[[1.0, 100.0, 70.0, 20.0, 0.0, 30.0, 0.5, 30.0]]);
        let table = MedianTable::fit(&ds);
        assert_eq!(table.insulin, MedianTable::DEFAULT.insulin);
    }

    #[test]
    fn impute_record_only_touches_nullable_zeros() {
        let mut record = FeatureRecord::zeros();
        let replaced = MedianTable::DEFAULT.impute_record(&mut record);
        assert_eq!(replaced, 5);
        assert_eq!(record.get(Feature::Glucose), 117.0);
        assert_eq!(record.get(Feature::Insulin), 30.5);
        assert_eq!(record.get(Feature::Pregnancies), 0.0);
        assert_eq!(record.get(Feature::DiabetesPedigreeFunction), 0.0);
        assert_eq!(record.get(Feature::Age), 0.0);
    }

    #[test]
    fn impute_record_keeps_measured_values() {
        let mut record = FeatureRecord::zeros().with(Feature::Glucose, 150.0);
        MedianTable::DEFAULT.impute_record(&mut record);
        assert_eq!(record.get(Feature::Glucose), 150.0);
    }

    #[test]
    fn impute_dataset_matches_impute_record() {
        let mut ds = dataset(&[
            [0.0, 0.0, 70.0, 0.0, 0.0, 30.0, 0.5, 30.0],
            [2.0, 90.0, 0.0, 20.0, 100.0, 0.0, 0.5, 40.0],
        ]);
        let table = MedianTable::DEFAULT;

        let expected: Vec<FeatureRecord> = (0..ds.n_samples())
            .map(|i| {
                let mut r = ds.record(i);
                table.impute_record(&mut r);
                r
            })
            .collect();

        assert_eq!(table.impute_dataset(&mut ds), 5);
        for (i, r) in expected.iter().enumerate() {
            assert_eq!(&ds.record(i), r);
        }
    }

    #[test]
    fn json_uses_column_names() {
        let json = serde_json::to_value(MedianTable::DEFAULT).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Glucose": 117.0,
                "BloodPressure": 72.0,
                "SkinThickness": 23.0,
                "Insulin": 30.5,
                "BMI": 32.0
            })
        );
    }

    #[test]
    fn missing_keys_take_defaults() {
        let table: MedianTable = serde_json::from_str(r#"{"Glucose": 99.0}"#).unwrap();
        assert_eq!(table.glucose, 99.0);
        assert_eq!(table.bmi, MedianTable::DEFAULT.bmi);
    }
}
