//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Environment variables override these at startup; the core never reads them.

/// Default model artifact file (fitted oracle parameters)
pub const DEFAULT_MODEL_PATH: &str = "visibility_model.json";

/// Default schema artifact file (training column list)
pub const DEFAULT_SCHEMA_PATH: &str = "model_columns.json";

/// Subdirectory of the user data dir searched for artifacts
pub const DATA_DIR_NAME: &str = "visibility-guard";

/// Default log filter
pub const DEFAULT_LOG_FILTER: &str = "info";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Driving Safety Automation System";

// ============================================
// Environment variable names
// ============================================

pub const ENV_MODEL_PATH: &str = "VISIBILITY_MODEL_PATH";
pub const ENV_SCHEMA_PATH: &str = "VISIBILITY_SCHEMA_PATH";
pub const ENV_MODEL_SHA256: &str = "VISIBILITY_MODEL_SHA256";
pub const ENV_SCHEMA_SHA256: &str = "VISIBILITY_SCHEMA_SHA256";
pub const ENV_UNSEEN_POLICY: &str = "VISIBILITY_UNSEEN_POLICY";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get model artifact path from environment or use default
pub fn get_model_path() -> String {
    std::env::var(ENV_MODEL_PATH)
        .unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string())
}

/// Get schema artifact path from environment or use default
pub fn get_schema_path() -> String {
    std::env::var(ENV_SCHEMA_PATH)
        .unwrap_or_else(|_| DEFAULT_SCHEMA_PATH.to_string())
}

/// Expected SHA-256 of the model artifact, if pinned
pub fn get_model_sha256() -> Option<String> {
    non_empty_env(ENV_MODEL_SHA256)
}

/// Expected SHA-256 of the schema artifact, if pinned
pub fn get_schema_sha256() -> Option<String> {
    non_empty_env(ENV_SCHEMA_SHA256)
}

/// Raw unseen-category policy name, if set
pub fn get_unseen_policy() -> Option<String> {
    non_empty_env(ENV_UNSEEN_POLICY)
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
