//! Startup Artifacts - model parameters and training schema
//!
//! Both files are read once, optionally checked against a pinned SHA-256,
//! parsed and validated. Any failure here is fatal for the process.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::linear::{LinearOracle, LinearParams};
use super::oracle::ModelOracle;
use super::tree::{TreeEnsembleOracle, TreeEnsembleParams};
use crate::constants::DATA_DIR_NAME;
use crate::error::{ArtifactKind, ArtifactLoadError};
use crate::logic::features::{SchemaArtifact, TrainingSchema};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// JSON model artifact, dispatched on `"kind"`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearParams),
    TreeEnsemble(TreeEnsembleParams),
}

impl ModelArtifact {
    fn feature_names(&self) -> Option<&[String]> {
        match self {
            ModelArtifact::Linear(p) => p.feature_names.as_deref(),
            ModelArtifact::TreeEnsemble(p) => p.feature_names.as_deref(),
        }
    }
}

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub model_type: String,
    pub features: usize,
    pub sha256: String,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

pub struct LoadedModel {
    pub oracle: Box<dyn ModelOracle>,
    pub metadata: ModelMetadata,
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("oracle", &self.oracle.name())
            .field("metadata", &self.metadata)
            .finish()
    }
}

// ============================================================================
// PATH RESOLUTION
// ============================================================================

/// Use `configured` if it exists, else look for the same file name under the
/// user data directory. Falls back to `configured` so the load error names it.
pub fn resolve_artifact_path(configured: &str) -> PathBuf {
    let path = PathBuf::from(configured);
    if path.exists() {
        return path;
    }

    if let (Some(data_dir), Some(file_name)) = (dirs::data_dir(), path.file_name()) {
        let candidate = data_dir.join(DATA_DIR_NAME).join(file_name);
        if candidate.exists() {
            log::debug!("Resolved {} to {}", configured, candidate.display());
            return candidate;
        }
    }

    path
}

// ============================================================================
// CHECKSUM
// ============================================================================

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn read_verified(
    kind: ArtifactKind,
    path: &Path,
    expected_sha256: Option<&str>,
) -> Result<(Vec<u8>, String), ArtifactLoadError> {
    let display = path.display().to_string();

    if !path.exists() {
        return Err(ArtifactLoadError::NotFound { kind, path: display });
    }

    let bytes = fs::read(path).map_err(|source| ArtifactLoadError::Io {
        kind,
        path: display,
        source,
    })?;

    let actual = sha256_hex(&bytes);
    if let Some(expected) = expected_sha256 {
        if !expected.trim().eq_ignore_ascii_case(&actual) {
            return Err(ArtifactLoadError::ChecksumMismatch {
                kind,
                expected: expected.trim().to_ascii_lowercase(),
                actual,
            });
        }
    }

    Ok((bytes, actual))
}

// ============================================================================
// LOADING
// ============================================================================

/// Load the ordered training column list
pub fn load_schema(
    path: &Path,
    expected_sha256: Option<&str>,
) -> Result<TrainingSchema, ArtifactLoadError> {
    log::info!("Loading schema artifact from: {}", path.display());

    let (bytes, _) = read_verified(ArtifactKind::Schema, path, expected_sha256)?;
    let artifact: SchemaArtifact =
        serde_json::from_slice(&bytes).map_err(|source| ArtifactLoadError::Malformed {
            kind: ArtifactKind::Schema,
            path: path.display().to_string(),
            source,
        })?;

    let schema = TrainingSchema::from_artifact(artifact)?;
    log::info!(
        "Schema loaded: {} columns (hash: {:08x})",
        schema.len(),
        schema.layout_hash()
    );

    Ok(schema)
}

/// Load the fitted oracle and check it against `schema`
pub fn load_model(
    path: &Path,
    expected_sha256: Option<&str>,
    schema: &TrainingSchema,
) -> Result<LoadedModel, ArtifactLoadError> {
    log::info!("Loading model artifact from: {}", path.display());

    let (bytes, sha256) = read_verified(ArtifactKind::Model, path, expected_sha256)?;

    let oracle: Box<dyn ModelOracle> = if is_onnx(path) {
        load_onnx(&bytes, schema)?
    } else {
        let artifact: ModelArtifact =
            serde_json::from_slice(&bytes).map_err(|source| ArtifactLoadError::Malformed {
                kind: ArtifactKind::Model,
                path: path.display().to_string(),
                source,
            })?;

        if let Some(names) = artifact.feature_names() {
            if !names.iter().map(String::as_str).eq(schema.column_names()) {
                return Err(ArtifactLoadError::InvalidModel(
                    "feature_names do not match schema column order".to_string(),
                ));
            }
        }

        match artifact {
            ModelArtifact::Linear(p) => Box::new(LinearOracle::from_params(p)?),
            ModelArtifact::TreeEnsemble(p) => Box::new(TreeEnsembleOracle::from_params(p)?),
        }
    };

    if oracle.n_features() != schema.len() {
        return Err(ArtifactLoadError::ShapeMismatch {
            model: oracle.n_features(),
            schema: schema.len(),
        });
    }

    let metadata = ModelMetadata {
        model_path: path.display().to_string(),
        model_type: oracle.name().to_string(),
        features: oracle.n_features(),
        sha256,
        loaded_at: chrono::Utc::now(),
    };

    log::info!(
        "Model loaded successfully: {} ({} features, sha256 {})",
        metadata.model_type,
        metadata.features,
        metadata.sha256
    );

    Ok(LoadedModel { oracle, metadata })
}

fn is_onnx(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("onnx"))
        .unwrap_or(false)
}

#[cfg(feature = "onnx")]
fn load_onnx(bytes: &[u8], schema: &TrainingSchema) -> Result<Box<dyn ModelOracle>, ArtifactLoadError> {
    Ok(Box::new(super::onnx::OnnxOracle::from_memory(bytes, schema.len())?))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(_bytes: &[u8], _schema: &TrainingSchema) -> Result<Box<dyn ModelOracle>, ArtifactLoadError> {
    Err(ArtifactLoadError::InvalidModel(
        "ONNX models require the `onnx` feature".to_string(),
    ))
}
