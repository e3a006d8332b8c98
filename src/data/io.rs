//! Loading the diabetes table from CSV text, files, or HTTP.
//!
//! The canonical source is a headerless CSV with nine columns: the eight
//! features in [`Feature::ALL`] order followed by the `Outcome` label. A header
//! row is accepted and skipped when its first field is not numeric.

use std::fs;
use std::path::Path;
use std::time::Duration;

use ndarray::Array2;

use super::dataset::Dataset;
use super::error::DatasetError;
use super::schema::{Feature, LABEL_COLUMN, N_FEATURES};

const N_COLUMNS: usize = N_FEATURES + 1;

/// Parse CSV text into a dataset.
pub fn parse_csv(text: &str) -> Result<Dataset, DatasetError> {
    let mut values: Vec<f32> = Vec::new();
    let mut labels: Vec<u8> = Vec::new();
    let mut seen_data = false;

    for (line_idx, raw) in text.lines().enumerate() {
        let line_no = line_idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();

        // Header row: only allowed before any data.
        if !seen_data && fields[0].parse::<f32>().is_err() {
            log::debug!("skipping CSV header: {line}");
            seen_data = true;
            continue;
        }
        seen_data = true;

        if fields.len() != N_COLUMNS {
            return Err(DatasetError::ColumnCount {
                line: line_no,
                expected: N_COLUMNS,
                got: fields.len(),
            });
        }

        for (feature, field) in Feature::ALL.iter().zip(&fields[..N_FEATURES]) {
            let value = field
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| DatasetError::InvalidNumber {
                    line: line_no,
                    column: feature.column_name(),
                    value: field.to_string(),
                })?;
            values.push(value);
        }

        labels.push(parse_label(fields[N_FEATURES], line_no)?);
    }

    if labels.is_empty() {
        return Err(DatasetError::Empty);
    }

    let features = Array2::from_shape_vec((labels.len(), N_FEATURES), values)
        .map_err(|e| DatasetError::Shape(e.to_string()))?;
    Dataset::new(features, labels)
}

fn parse_label(field: &str, line: usize) -> Result<u8, DatasetError> {
    let value: f32 = field.parse().map_err(|_| DatasetError::InvalidNumber {
        line,
        column: LABEL_COLUMN,
        value: field.to_string(),
    })?;
    if value == 0.0 {
        Ok(0)
    } else if value == 1.0 {
        Ok(1)
    } else {
        Err(DatasetError::InvalidLabel {
            line,
            value: field.to_string(),
        })
    }
}

/// Read and parse a local CSV file.
pub fn read_csv(path: &Path) -> Result<Dataset, DatasetError> {
    let text = fs::read_to_string(path)?;
    parse_csv(&text)
}

/// Download and parse a CSV over HTTP(S).
pub fn fetch_csv(url: &str, timeout: Duration) -> Result<Dataset, DatasetError> {
    log::info!("Fetching dataset from {url}");
    let agent = ureq::AgentBuilder::new().timeout(timeout).build();
    let response = agent
        .get(url)
        .call()
        .map_err(|e| DatasetError::Http(e.to_string()))?;
    let body = response.into_string()?;
    parse_csv(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIMA_HEAD: &str = "\
6,148,72,35,0,33.6,0.627,50,1
1,85,66,29,0,26.6,0.351,31,0
8,183,64,0,0,23.3,0.672,32,1
";

    #[test]
    fn parses_headerless_rows() {
        let ds = parse_csv(PIMA_HEAD).unwrap();
        assert_eq!(ds.n_samples(), 3);
        assert_eq!(ds.labels(), &[1, 0, 1]);
        assert_eq!(ds.sample(0)[Feature::Bmi.index()], 33.6);
        assert_eq!(ds.sample(2)[Feature::SkinThickness.index()], 0.0);
    }

    #[test]
    fn skips_header_and_blank_lines() {
        let text = format!(
            "Pregnancies,Glucose,BloodPressure,SkinThickness,Insulin,BMI,DiabetesPedigreeFunction,Age,Outcome\n\n{PIMA_HEAD}\n"
        );
        let ds = parse_csv(&text).unwrap();
        assert_eq!(ds.n_samples(), 3);
    }

    #[test]
    fn rejects_short_rows() {
        let err = parse_csv("1,2,3\n").unwrap_err();
        assert!(matches!(
            err,
            DatasetError::ColumnCount { line: 1, expected: 9, got: 3 }
        ));
    }

    #[test]
    fn rejects_non_numeric_feature() {
        let err = parse_csv("1,85,66,29,0,abc,0.351,31,0\n").unwrap_err();
        match err {
            DatasetError::InvalidNumber { line, column, .. } => {
                assert_eq!(line, 1);
                assert_eq!(column, "BMI");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest::rstest]
    #[case("inf")]
    #[case("-inf")]
    #[case("NaN")]
    fn rejects_non_finite_feature(#[case] cell: &str) {
        let text = format!("1,{cell},66,29,0,26.6,0.351,31,0\n");
        match parse_csv(&text).unwrap_err() {
            DatasetError::InvalidNumber { line, column, value } => {
                assert_eq!(line, 1);
                assert_eq!(column, "Glucose");
                assert_eq!(value, cell);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_bad_label() {
        let err = parse_csv("1,85,66,29,0,26.6,0.351,31,2\n").unwrap_err();
        assert!(matches!(err, DatasetError::InvalidLabel { line: 1, .. }));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(parse_csv("\n\n"), Err(DatasetError::Empty)));
    }
}
