//! Configuration module

use crate::constants;
use crate::error::ConfigError;
use crate::logic::features::UnseenCategoryPolicy;

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Model artifact path
    pub model_path: String,

    /// Schema artifact path
    pub schema_path: String,

    /// Pinned SHA-256 of the model artifact
    pub model_sha256: Option<String>,

    /// Pinned SHA-256 of the schema artifact
    pub schema_sha256: Option<String>,

    /// Handling of category values with no schema column
    pub unseen_policy: UnseenCategoryPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: constants::DEFAULT_MODEL_PATH.to_string(),
            schema_path: constants::DEFAULT_SCHEMA_PATH.to_string(),
            model_sha256: None,
            schema_sha256: None,
            unseen_policy: UnseenCategoryPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let unseen_policy = match constants::get_unseen_policy() {
            Some(raw) => parse_policy(&raw)?,
            None => UnseenCategoryPolicy::default(),
        };

        Ok(Self {
            model_path: constants::get_model_path(),
            schema_path: constants::get_schema_path(),
            model_sha256: constants::get_model_sha256(),
            schema_sha256: constants::get_schema_sha256(),
            unseen_policy,
        })
    }
}

fn parse_policy(raw: &str) -> Result<UnseenCategoryPolicy, ConfigError> {
    raw.parse().map_err(|reason| ConfigError::InvalidValue {
        name: constants::ENV_UNSEEN_POLICY,
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.model_path, "visibility_model.json");
        assert_eq!(config.schema_path, "model_columns.json");
        assert_eq!(config.unseen_policy, UnseenCategoryPolicy::Baseline);
        assert!(config.model_sha256.is_none());
    }

    #[test]
    fn test_parse_policy() {
        assert_eq!(parse_policy("reject"), Ok(UnseenCategoryPolicy::Reject));

        let err = parse_policy("loud").unwrap_err();
        assert!(err.to_string().contains(constants::ENV_UNSEEN_POLICY));
    }
}
