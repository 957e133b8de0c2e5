//! Error handling
//!
//! Startup failures (`ArtifactLoadError`) are fatal to the process.
//! Per-call failures (`PredictionError`) are fatal to that call only.

use std::fmt;

use thiserror::Error;

use crate::logic::features::CategoricalField;

/// Which startup artifact failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Model,
    Schema,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Model => write!(f, "model"),
            ArtifactKind::Schema => write!(f, "schema"),
        }
    }
}

/// Invalid training schema contents
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("schema has no columns")]
    Empty,

    #[error("duplicate schema column '{0}'")]
    DuplicateColumn(String),

    #[error("baseline declared for unknown field '{0}'")]
    UnknownBaselineField(String),
}

#[derive(Debug, Error)]
pub enum ArtifactLoadError {
    #[error("{kind} artifact not found: {path}")]
    NotFound { kind: ArtifactKind, path: String },

    #[error("failed to read {kind} artifact {path}: {source}")]
    Io {
        kind: ArtifactKind,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{kind} artifact checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch {
        kind: ArtifactKind,
        expected: String,
        actual: String,
    },

    #[error("malformed {kind} artifact {path}: {source}")]
    Malformed {
        kind: ArtifactKind,
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid schema artifact: {0}")]
    Schema(#[from] SchemaError),

    #[error("invalid model artifact: {0}")]
    InvalidModel(String),

    #[error("model expects {model} features but schema has {schema} columns")]
    ShapeMismatch { model: usize, schema: usize },
}

/// Feature vector built against a different schema
#[derive(Debug, Clone, PartialEq, Error)]
#[error("feature layout mismatch: expected hash {expected:08x} ({expected_len} columns), got {actual:08x} ({actual_len} columns)")]
pub struct LayoutMismatchError {
    pub expected: u32,
    pub expected_len: usize,
    pub actual: u32,
    pub actual_len: usize,
}

/// Raised only under `UnseenCategoryPolicy::Reject`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("unseen {field} category '{value}' has no schema column")]
    UnseenCategory {
        field: CategoricalField,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OracleError {
    #[error("oracle expects {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("oracle produced non-finite output {0}")]
    NonFinite(f64),

    #[error("oracle backend failure: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Layout(#[from] LayoutMismatchError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}
