//! The predictor's process boundary: one JSON line and an exit code.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{PredictError, Prediction, PredictionInput, Predictor, rules};
use crate::persist::ArtifactPaths;

/// Body of a failed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub error: String,
    pub has_diabetes: bool,
    pub probability: f64,
}

impl ErrorPayload {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            has_diabetes: false,
            probability: 0.0,
        }
    }
}

/// What the predictor writes to stdout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionResponse {
    Success(Prediction),
    Failure(ErrorPayload),
}

impl PredictionResponse {
    pub fn from_result(result: Result<Prediction, PredictError>) -> Self {
        match result {
            Ok(prediction) => PredictionResponse::Success(prediction),
            Err(err) => {
                log::debug!("prediction failed: {err:?}");
                PredictionResponse::Failure(ErrorPayload::new(err.to_string()))
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PredictionResponse::Success(_))
    }

    /// `0` on success, `1` for any error payload.
    pub fn exit_code(&self) -> u8 {
        if self.is_success() { 0 } else { 1 }
    }
}

impl From<PredictError> for PredictionResponse {
    fn from(err: PredictError) -> Self {
        Self::from_result(Err(err))
    }
}

/// Compact single-line JSON.
impl fmt::Display for PredictionResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&line)
    }
}

/// Handle one raw request against the artifacts in `paths`.
///
/// The document is parsed before the model is loaded, so malformed JSON is
/// reported as such even when no model exists.
pub fn respond(paths: &ArtifactPaths, raw: &str) -> PredictionResponse {
    PredictionResponse::from_result(predict_raw(paths, raw))
}

/// Handle one raw request with the rule scorer.
pub fn respond_with_rules(raw: &str) -> PredictionResponse {
    let result = parse(raw)
        .and_then(|value| PredictionInput::from_value(&value))
        .map(|input| rules::score(&input));
    PredictionResponse::from_result(result)
}

fn predict_raw(paths: &ArtifactPaths, raw: &str) -> Result<Prediction, PredictError> {
    let value = parse(raw)?;
    let predictor = Predictor::load(paths)?;
    let input = PredictionInput::from_value(&value)?;
    Ok(predictor.predict(&input))
}

fn parse(raw: &str) -> Result<Value, PredictError> {
    serde_json::from_str(raw).map_err(|e| PredictError::InvalidJson(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_serializes_in_contract_order() {
        let response = PredictionResponse::Failure(ErrorPayload::new("boom"));
        assert_eq!(
            response.to_string(),
            r#"{"error":"boom","hasDiabetes":false,"probability":0.0}"#
        );
        assert_eq!(response.exit_code(), 1);
    }

    #[test]
    fn success_has_exit_code_zero() {
        let response = PredictionResponse::Success(Prediction {
            has_diabetes: false,
            probability: 0.25,
            model_version: "rules-v1".to_string(),
        });
        assert!(response.is_success());
        assert_eq!(response.exit_code(), 0);
        assert!(!response.to_string().contains("error"));
    }

    #[test]
    fn malformed_json_wins_over_missing_model() {
        let tmp = tempfile::tempdir().unwrap();
        let response = respond(&ArtifactPaths::new(tmp.path()), "{not json");
        match response {
            PredictionResponse::Failure(payload) => {
                assert!(payload.error.starts_with("Invalid JSON input: "));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn missing_model_is_a_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let response = respond(&ArtifactPaths::new(tmp.path()), r#"{"glucose": 150}"#);
        assert_eq!(response.exit_code(), 1);
        assert!(response.to_string().contains("Please train the model first."));
    }

    #[test]
    fn rules_need_no_artifacts() {
        let response = respond_with_rules(r#"{"glucose": 150, "bmi": 35}"#);
        match response {
            PredictionResponse::Success(p) => {
                assert!(p.has_diabetes);
                approx::assert_abs_diff_eq!(p.probability, 0.7, epsilon = 1e-12);
                assert_eq!(p.model_version, rules::RULES_VERSION);
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn failure_round_trips_through_untagged_enum() {
        let line = r#"{"error":"x","hasDiabetes":false,"probability":0.0}"#;
        let parsed: PredictionResponse = serde_json::from_str(line).unwrap();
        assert_eq!(parsed, PredictionResponse::Failure(ErrorPayload::new("x")));
    }
}
