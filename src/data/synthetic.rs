//! Seeded synthetic stand-in for the Pima diabetes table.
//!
//! This exists so the training pipeline can run offline. Each column is drawn
//! independently from a normal distribution roughly matching the real table's
//! marginal mean/stddev, clipped to a plausible range, and the label is a fixed
//! noisy rule over thresholded features. It is **not** a faithful substitute for
//! the real data: correlations between features are absent and the label rule is
//! far simpler than real diabetes outcomes.

use ndarray::Array2;
use rand::prelude::*;
use rand_distr::StandardNormal;

use super::dataset::Dataset;
use super::schema::{Feature, N_FEATURES};

/// Rows in the synthetic table (same as the real one).
pub const SYNTHETIC_ROWS: usize = 768;

/// Seed used when the trainer falls back to synthetic data.
pub const SYNTHETIC_SEED: u64 = 42;

/// Exclusive upper bound for the uniform integer `Pregnancies` column.
const PREGNANCIES_MAX: u32 = 18;

/// Normal distribution clipped to `[min, max]`.
#[derive(Debug, Clone, Copy)]
struct ClippedNormal {
    feature: Feature,
    mean: f64,
    std: f64,
    min: f64,
    max: f64,
}

const NORMAL_COLUMNS: [ClippedNormal; 7] = [
    ClippedNormal { feature: Feature::Glucose, mean: 120.0, std: 32.0, min: 0.0, max: 200.0 },
    ClippedNormal { feature: Feature::BloodPressure, mean: 69.0, std: 19.0, min: 0.0, max: 122.0 },
    ClippedNormal { feature: Feature::SkinThickness, mean: 20.0, std: 16.0, min: 0.0, max: 99.0 },
    ClippedNormal { feature: Feature::Insulin, mean: 79.0, std: 115.0, min: 0.0, max: 846.0 },
    ClippedNormal { feature: Feature::Bmi, mean: 32.0, std: 7.0, min: 0.0, max: 67.0 },
    ClippedNormal {
        feature: Feature::DiabetesPedigreeFunction,
        mean: 0.47,
        std: 0.33,
        min: 0.0,
        max: 2.42,
    },
    ClippedNormal { feature: Feature::Age, mean: 33.0, std: 12.0, min: 21.0, max: 81.0 },
];

impl ClippedNormal {
    fn sample<R: Rng>(&self, rng: &mut R) -> f32 {
        let z: f64 = rng.sample(StandardNormal);
        (self.mean + self.std * z).clamp(self.min, self.max) as f32
    }
}

/// Label rule: weighted indicator sum plus uniform noise, thresholded at 0.5.
fn synthetic_label(row: &[f32], noise: f64) -> u8 {
    let indicator = |f: Feature, above: f32| if row[f.index()] > above { 1.0 } else { 0.0 };
    let score = indicator(Feature::Glucose, 125.0) * 0.4
        + indicator(Feature::Bmi, 30.0) * 0.2
        + indicator(Feature::Age, 45.0) * 0.2
        + indicator(Feature::BloodPressure, 85.0) * 0.1
        + noise * 0.1;
    u8::from(score > 0.5)
}

/// Generate the synthetic table.
///
/// Columns are filled one after another from a single RNG, then the labels,
/// so the output depends only on `rows` and `seed`.
pub fn synthetic_pima(rows: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut features = Array2::<f32>::zeros((rows, N_FEATURES));

    for v in features.column_mut(Feature::Pregnancies.index()).iter_mut() {
        *v = rng.gen_range(0..PREGNANCIES_MAX) as f32;
    }
    for column in &NORMAL_COLUMNS {
        for v in features.column_mut(column.feature.index()).iter_mut() {
            *v = column.sample(&mut rng);
        }
    }

    let labels: Vec<u8> = features
        .rows()
        .into_iter()
        .map(|row| {
            let noise: f64 = rng.r#gen();
            let values: Vec<f32> = row.to_vec();
            synthetic_label(&values, noise)
        })
        .collect();

    Dataset::from_parts(features, labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_table() {
        let a = synthetic_pima(100, 7);
        let b = synthetic_pima(100, 7);
        assert_eq!(a, b);
        let c = synthetic_pima(100, 8);
        assert_ne!(a, c);
    }

    #[test]
    fn respects_clip_ranges() {
        let ds = synthetic_pima(SYNTHETIC_ROWS, SYNTHETIC_SEED);
        assert_eq!(ds.n_samples(), SYNTHETIC_ROWS);
        for column in &NORMAL_COLUMNS {
            for &v in ds.column(column.feature).iter() {
                assert!(v as f64 >= column.min && v as f64 <= column.max, "{:?} = {v}", column.feature);
            }
        }
        for &v in ds.column(Feature::Pregnancies).iter() {
            assert!((0.0..18.0).contains(&v));
            assert_eq!(v.fract(), 0.0);
        }
    }

    #[test]
    fn both_classes_present() {
        let [neg, pos] = synthetic_pima(SYNTHETIC_ROWS, SYNTHETIC_SEED).class_counts();
        assert!(neg > 0 && pos > 0);
    }

    #[test]
    fn label_rule() {
        let mut row = [0.0f32; N_FEATURES];
        row[Feature::Glucose.index()] = 150.0;
        row[Feature::Bmi.index()] = 35.0;
        assert_eq!(synthetic_label(&row, 0.0), 1);

        row[Feature::Bmi.index()] = 25.0;
        // 0.4 + at most 0.1 of noise never clears 0.5
        assert_eq!(synthetic_label(&row, 0.99), 0);
    }
}
