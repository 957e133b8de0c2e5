//! Model Oracle - opaque scalar regression
//!
//! The rest of the crate only sees this trait: a fixed input width and a
//! `predict` that maps a positional feature vector to one value. Backends are
//! built once from an artifact and never mutated afterwards.

use crate::error::OracleError;
use crate::logic::features::FeatureVector;

// ============================================================================
// ORACLE TRAIT
// ============================================================================

/// Trait cho inference backends (linear, tree ensemble, ONNX, stubs)
pub trait ModelOracle: Send + Sync {
    /// Predict the visibility level for one vector.
    fn predict(&self, features: &FeatureVector) -> Result<f64, OracleError>;

    /// Input width the oracle was fitted on.
    fn n_features(&self) -> usize;

    /// Backend name for logs and status.
    fn name(&self) -> &str;
}

impl<T: ModelOracle + ?Sized> ModelOracle for Box<T> {
    fn predict(&self, features: &FeatureVector) -> Result<f64, OracleError> {
        (**self).predict(features)
    }

    fn n_features(&self) -> usize {
        (**self).n_features()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

// ============================================================================
// SHARED CHECKS
// ============================================================================

pub(crate) fn check_width(expected: usize, features: &FeatureVector) -> Result<(), OracleError> {
    if features.len() != expected {
        return Err(OracleError::ShapeMismatch {
            expected,
            actual: features.len(),
        });
    }
    Ok(())
}

pub(crate) fn check_finite(value: f64) -> Result<f64, OracleError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(OracleError::NonFinite(value))
    }
}

// ============================================================================
// CLOSURE ORACLE
// ============================================================================

/// Wraps a plain function as an oracle (stubs, embedded models)
pub struct FnOracle<F> {
    name: String,
    n_features: usize,
    f: F,
}

impl<F> FnOracle<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    pub fn new(name: impl Into<String>, n_features: usize, f: F) -> Self {
        Self {
            name: name.into(),
            n_features,
            f,
        }
    }
}

impl<F> ModelOracle for FnOracle<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn predict(&self, features: &FeatureVector) -> Result<f64, OracleError> {
        check_width(self.n_features, features)?;
        check_finite((self.f)(features.as_slice()))
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::TrainingSchema;

    fn vector(width: usize) -> FeatureVector {
        let names: Vec<String> = (0..width).map(|i| format!("f{}", i)).collect();
        FeatureVector::zeros(&TrainingSchema::from_columns(names).unwrap())
    }

    #[test]
    fn test_fn_oracle_predicts() {
        let oracle = FnOracle::new("const", 3, |_| 55.0);
        assert_eq!(oracle.predict(&vector(3)), Ok(55.0));
        assert_eq!(oracle.name(), "const");
    }

    #[test]
    fn test_width_mismatch_is_an_error() {
        let oracle = FnOracle::new("const", 3, |_| 55.0);
        assert_eq!(
            oracle.predict(&vector(2)),
            Err(OracleError::ShapeMismatch { expected: 3, actual: 2 })
        );
    }

    #[test]
    fn test_non_finite_output_is_an_error() {
        let oracle = FnOracle::new("nan", 1, |_| f64::NAN);
        assert!(matches!(oracle.predict(&vector(1)), Err(OracleError::NonFinite(_))));
    }

    #[test]
    fn test_boxed_oracle_delegates() {
        let boxed: Box<dyn ModelOracle> = Box::new(FnOracle::new("boxed", 1, |x| x[0] + 1.0));
        assert_eq!(boxed.n_features(), 1);
        assert_eq!(boxed.predict(&vector(1)), Ok(1.0));
    }
}
