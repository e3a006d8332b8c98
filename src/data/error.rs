//! Errors raised while acquiring or shaping a dataset.

use std::io;

/// Errors that can occur when loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("line {line}: expected {expected} columns, got {got}")]
    ColumnCount {
        line: usize,
        expected: usize,
        got: usize,
    },

    #[error("line {line}: cannot parse {column} value {value:?}")]
    InvalidNumber {
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("line {line}: label must be 0 or 1, got {value}")]
    InvalidLabel { line: usize, value: String },

    #[error("shape mismatch: {0}")]
    Shape(String),

    #[error("dataset has no rows")]
    Empty,
}
