//! Tabular data for the diabetes model.
//!
//! - [`schema`]: the eight feature columns, their external keys and nullability
//! - [`FeatureRecord`]: one row of features in fixed column order
//! - [`Dataset`]: a labelled feature matrix
//! - [`io`]: CSV parsing and HTTP download
//! - [`synthetic`]: seeded offline stand-in for the real table
//! - [`source`]: explicit acquisition with a tagged result
//! - [`split`]: stratified train/test partitioning

mod dataset;
mod error;
pub mod io;
mod record;
pub mod schema;
pub mod source;
pub mod split;
pub mod synthetic;

pub use dataset::Dataset;
pub use error::DatasetError;
pub use record::{FeatureRecord, SampleAccessor};
pub use schema::{Feature, LABEL_COLUMN, N_FEATURES};
pub use source::{Acquired, DataSource, Provenance, acquire};
pub use split::stratified_split;
