//! Single-record prediction.
//!
//! [`PredictionInput`] turns a partial JSON object into a full feature record,
//! [`Predictor`] imputes and scores it, and [`response`] renders the result as
//! the one-line JSON contract the `predict` binary prints.

mod error;
mod input;
mod predictor;
pub mod response;
pub mod rules;

pub use error::PredictError;
pub use input::PredictionInput;
pub use predictor::{Prediction, Predictor};
pub use response::{ErrorPayload, PredictionResponse, respond, respond_with_rules};
