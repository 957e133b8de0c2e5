//! Linear regression oracle (intercept + coefficients).

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::oracle::{check_finite, check_width, ModelOracle};
use crate::error::{ArtifactLoadError, OracleError};
use crate::logic::features::FeatureVector;

/// Serialized linear model, one coefficient per schema column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearParams {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct LinearOracle {
    intercept: f64,
    coefficients: Array1<f64>,
}

impl LinearOracle {
    pub fn from_params(params: LinearParams) -> Result<Self, ArtifactLoadError> {
        if params.coefficients.is_empty() {
            return Err(ArtifactLoadError::InvalidModel(
                "linear model has no coefficients".to_string(),
            ));
        }
        if !params.intercept.is_finite() || params.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ArtifactLoadError::InvalidModel(
                "linear model has non-finite parameters".to_string(),
            ));
        }

        Ok(Self {
            intercept: params.intercept,
            coefficients: Array1::from(params.coefficients),
        })
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl ModelOracle for LinearOracle {
    fn predict(&self, features: &FeatureVector) -> Result<f64, OracleError> {
        check_width(self.coefficients.len(), features)?;
        check_finite(self.intercept + self.coefficients.dot(&features.as_array()))
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn name(&self) -> &str {
        "linear"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::TrainingSchema;

    fn params(intercept: f64, coefficients: Vec<f64>) -> LinearParams {
        LinearParams {
            intercept,
            coefficients,
            feature_names: None,
        }
    }

    #[test]
    fn test_linear_prediction() {
        let schema = TrainingSchema::from_columns(["a", "b", "c"]).unwrap();
        let mut vector = FeatureVector::zeros(&schema);
        vector.values = vec![1.0, 0.0, 1.0];

        let oracle = LinearOracle::from_params(params(60.0, vec![10.0, -5.0, -25.0])).unwrap();
        assert_eq!(oracle.predict(&vector), Ok(45.0));
        assert_eq!(oracle.n_features(), 3);
    }

    #[test]
    fn test_empty_coefficients_rejected() {
        assert!(LinearOracle::from_params(params(1.0, vec![])).is_err());
    }

    #[test]
    fn test_non_finite_parameters_rejected() {
        assert!(LinearOracle::from_params(params(f64::INFINITY, vec![1.0])).is_err());
        assert!(LinearOracle::from_params(params(0.0, vec![f64::NAN])).is_err());
    }
}
