//! Visibility Guard - driving visibility inference
//!
//! Encodes categorical driving conditions against a frozen training schema,
//! asks a pre-fitted regression oracle for a visibility level and maps it to
//! a three-tier safety recommendation.

pub mod api;
pub mod constants;
pub mod error;
pub mod logic;

pub use error::{ArtifactLoadError, EncodeError, OracleError, PredictionError};
pub use logic::features::{encode, RawObservation, TrainingSchema, UnseenCategoryPolicy};
pub use logic::model::ModelOracle;
pub use logic::pipeline::{Prediction, Predictor};
pub use logic::safety::{classify, SafetyLabel};
