//! Model Module - Oracle backends and artifact loading
//!
//! Tách inference khỏi feature encoding.
//! Backends are interchangeable behind `ModelOracle`.

pub mod artifact;
pub mod linear;
pub mod oracle;
pub mod tree;

#[cfg(feature = "onnx")]
pub mod onnx;

// Re-export common types
pub use artifact::{load_model, load_schema, resolve_artifact_path, LoadedModel, ModelArtifact, ModelMetadata};
pub use linear::LinearOracle;
pub use oracle::{FnOracle, ModelOracle};
pub use tree::TreeEnsembleOracle;
