//! Features Module - Feature Encoding Engine
//!
//! Turns a categorical observation into the positional numeric vector the
//! model was trained on.

pub mod encoder;
pub mod layout;
pub mod observation;
pub mod vector;


// Re-export common types
pub use encoder::{encode, Encoded, Encoder, UnseenCategoryPolicy};
pub use layout::{ColumnDescriptor, ColumnKind, LayoutInfo, SchemaArtifact, TrainingSchema};
pub use observation::{CategoricalField, RawObservation};
pub use vector::FeatureVector;
