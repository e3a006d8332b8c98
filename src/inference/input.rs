//! Building a [`FeatureRecord`] from a partial JSON object.

use serde_json::{Map, Value};

use super::PredictError;
use crate::data::{Feature, FeatureRecord};

/// A validated prediction request.
///
/// Every feature is present: keys absent from the request are `0`, which in a
/// nullable column means "missing" and is imputed later. Values are
/// non-negative and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionInput {
    record: FeatureRecord,
}

impl PredictionInput {
    /// Validate an already-built record.
    pub fn new(record: FeatureRecord) -> Result<Self, PredictError> {
        for feature in Feature::ALL {
            check_range(feature, record[feature])?;
        }
        Ok(Self { record })
    }

    /// Parse a raw JSON document.
    pub fn from_json_str(raw: &str) -> Result<Self, PredictError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| PredictError::InvalidJson(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Build from a JSON value, which must be an object.
    pub fn from_value(value: &Value) -> Result<Self, PredictError> {
        match value {
            Value::Object(map) => Self::from_map(map),
            other => Err(PredictError::NotAnObject(json_type(other))),
        }
    }

    /// Build from a JSON object keyed by the features' camelCase names.
    ///
    /// Values may be numbers or numeric strings. Unknown keys are ignored.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, PredictError> {
        let mut record = FeatureRecord::zeros();
        for feature in Feature::ALL {
            if let Some(value) = map.get(feature.input_key()) {
                record[feature] = parse_value(feature, value)?;
            }
        }
        Self::new(record)
    }

    /// The eight values in training column order.
    pub fn record(&self) -> FeatureRecord {
        self.record
    }
}

fn parse_value(feature: Feature, value: &Value) -> Result<f32, PredictError> {
    let key = feature.input_key();
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.map(|v| v as f32).ok_or_else(|| PredictError::InvalidValue {
        key,
        found: match value {
            Value::String(s) => format!("{s:?}"),
            other => json_type(other).to_string(),
        },
    })
}

fn check_range(feature: Feature, value: f32) -> Result<(), PredictError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PredictError::OutOfRange {
            key: feature.input_key(),
        })
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn absent_keys_default_to_zero() {
        let input = PredictionInput::from_value(&json!({"glucose": 150, "age": 50})).unwrap();
        let record = input.record();
        assert_eq!(record[Feature::Glucose], 150.0);
        assert_eq!(record[Feature::Age], 50.0);
        assert_eq!(record[Feature::Pregnancies], 0.0);
        assert_eq!(record[Feature::Insulin], 0.0);
    }

    #[test]
    fn every_key_maps_to_its_column() {
        let input = PredictionInput::from_value(&json!({
            "pregnancies": 1, "glucose": 2, "bloodPressure": 3, "skinThickness": 4,
            "insulin": 5, "bmi": 6, "diabetesPedigreeFunction": 7, "age": 8
        }))
        .unwrap();
        assert_eq!(
            input.record().to_array(),
            [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]
        );
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let input = PredictionInput::from_value(&json!({"bmi": " 35.5 ", "age": "50"})).unwrap();
        assert_eq!(input.record()[Feature::Bmi], 35.5);
        assert_eq!(input.record()[Feature::Age], 50.0);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let input = PredictionInput::from_value(&json!({"gender": "male", "glucose": 90})).unwrap();
        assert_eq!(input.record()[Feature::Glucose], 90.0);
    }

    #[rstest]
    #[case(json!({"glucose": null}), "glucose must be a number, got null")]
    #[case(json!({"bmi": true}), "bmi must be a number, got a boolean")]
    #[case(json!({"age": [1]}), "age must be a number, got an array")]
    #[case(json!({"insulin": "lots"}), "insulin must be a number, got \"lots\"")]
    #[case(json!({"age": -1}), "age must be a non-negative finite number")]
    #[case(json!({"glucose": "inf"}), "glucose must be a non-negative finite number")]
    #[case(json!({"bmi": 1e300}), "bmi must be a non-negative finite number")]
    #[case(json!([1, 2]), "Input must be a JSON object, got an array")]
    fn invalid_values_name_the_key(#[case] value: Value, #[case] message: &str) {
        let err = PredictionInput::from_value(&value).unwrap_err();
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = PredictionInput::from_json_str("{not json").unwrap_err();
        assert!(err.to_string().starts_with("Invalid JSON input: "));
    }

    #[test]
    fn key_order_does_not_matter() {
        let a = PredictionInput::from_json_str(r#"{"glucose": 150, "bmi": 35, "age": 50}"#).unwrap();
        let b = PredictionInput::from_json_str(r#"{"age": 50, "glucose": 150, "bmi": 35}"#).unwrap();
        assert_eq!(a, b);
    }
}
