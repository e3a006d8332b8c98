//! Fixed-weight rule scorer used when no trained model is wanted.
//!
//! Works on the raw request values (no imputation), so a missing glucose
//! reading simply contributes nothing.

use super::{Prediction, PredictionInput};
use crate::data::Feature;

pub const RULES_VERSION: &str = "rules-v1";

const MIN_SCORE: f64 = 0.05;
const MAX_SCORE: f64 = 0.95;

/// (feature, strict lower bound, weight)
const RULES: [(Feature, f32, f64); 4] = [
    (Feature::Glucose, 125.0, 0.5),
    (Feature::Bmi, 30.0, 0.2),
    (Feature::Age, 45.0, 0.2),
    (Feature::BloodPressure, 85.0, 0.1),
];

/// Score a request with the fixed rules.
pub fn score(input: &PredictionInput) -> Prediction {
    let record = input.record();
    let raw: f64 = RULES
        .iter()
        .filter(|(feature, bound, _)| record[*feature] > *bound)
        .map(|(_, _, weight)| weight)
        .sum();
    let probability = raw.clamp(MIN_SCORE, MAX_SCORE);

    Prediction {
        has_diabetes: probability >= 0.5,
        probability,
        model_version: RULES_VERSION.to_string(),
    }
}
