//! Prediction Pipeline
//!
//! observation → encoder → oracle → classifier. The schema and oracle are
//! loaded once and only read afterwards, so a `Predictor` can be shared
//! across threads.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::{ArtifactLoadError, PredictionError};
use crate::logic::features::{
    CategoricalField, Encoder, RawObservation, TrainingSchema, UnseenCategoryPolicy,
};
use crate::logic::model::ModelOracle;
use crate::logic::safety::{classify_with_thresholds, SafetyLabel, SafetyThresholds};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Prediction output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Visibility rounded to 2 decimals (presentation)
    pub visibility: f64,
    /// Oracle output as returned
    pub raw_visibility: f64,
    /// Derived from `raw_visibility`, never from the rounded value
    pub label: SafetyLabel,
    /// Fields whose value had no schema column
    pub unseen: Vec<CategoricalField>,
    pub inference_time_us: u64,
}

/// Engine status for logs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub model_name: String,
    pub schema_columns: usize,
    pub layout_hash: u32,
    pub unseen_policy: UnseenCategoryPolicy,
    pub prediction_count: u64,
    pub failure_count: u64,
    pub avg_latency_ms: f64,
}

/// Round half away from zero to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============================================================================
// PREDICTOR
// ============================================================================

pub struct Predictor {
    schema: TrainingSchema,
    oracle: Box<dyn ModelOracle>,
    encoder: Encoder,
    thresholds: SafetyThresholds,
    latency_sum_us: AtomicU64,
    prediction_count: AtomicU64,
    failure_count: AtomicU64,
}

impl Predictor {
    pub fn new(
        schema: TrainingSchema,
        oracle: Box<dyn ModelOracle>,
        policy: UnseenCategoryPolicy,
    ) -> Result<Self, ArtifactLoadError> {
        if oracle.n_features() != schema.len() {
            return Err(ArtifactLoadError::ShapeMismatch {
                model: oracle.n_features(),
                schema: schema.len(),
            });
        }

        Ok(Self {
            schema,
            oracle,
            encoder: Encoder::new(policy),
            thresholds: SafetyThresholds::default(),
            latency_sum_us: AtomicU64::new(0),
            prediction_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
        })
    }

    pub fn with_thresholds(mut self, thresholds: SafetyThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn schema(&self) -> &TrainingSchema {
        &self.schema
    }

    pub fn predict_visibility(
        &self,
        time_of_day: &str,
        area: &str,
        weather: &str,
        road_type: &str,
    ) -> Result<Prediction, PredictionError> {
        self.predict(&RawObservation::new(time_of_day, area, weather, road_type))
    }

    pub fn predict(&self, observation: &RawObservation) -> Result<Prediction, PredictionError> {
        let result = self.run(observation);
        if result.is_err() {
            self.failure_count.fetch_add(1, Ordering::Relaxed);
        }
        result
    }

    fn run(&self, observation: &RawObservation) -> Result<Prediction, PredictionError> {
        let start_time = Instant::now();

        let encoded = self.encoder.encode(observation, &self.schema)?;
        encoded.vector.validate(&self.schema)?;

        for field in &encoded.unseen {
            log::warn!(
                "Unseen {} value '{}' encoded as baseline",
                field,
                observation.value(*field)
            );
        }
        if log::log_enabled!(log::Level::Debug) {
            log::debug!("Feature vector: {}", encoded.vector.to_log_entry(&self.schema));
        }

        let raw = self.oracle.predict(&encoded.vector)?;
        let label = classify_with_thresholds(raw, &self.thresholds);

        let inference_time_us = start_time.elapsed().as_micros() as u64;
        self.latency_sum_us.fetch_add(inference_time_us, Ordering::Relaxed);
        self.prediction_count.fetch_add(1, Ordering::Relaxed);

        Ok(Prediction {
            visibility: round2(raw),
            raw_visibility: raw,
            label,
            unseen: encoded.unseen,
            inference_time_us,
        })
    }

    pub fn status(&self) -> EngineStatus {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.prediction_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f64 / count as f64) / 1000.0 } else { 0.0 };

        EngineStatus {
            model_name: self.oracle.name().to_string(),
            schema_columns: self.schema.len(),
            layout_hash: self.schema.layout_hash(),
            unseen_policy: self.encoder.policy(),
            prediction_count: count,
            failure_count: self.failure_count.load(Ordering::Relaxed),
            avg_latency_ms: avg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EncodeError, OracleError};
    use crate::logic::model::FnOracle;
    use std::sync::Arc;

    fn reference_schema() -> TrainingSchema {
        TrainingSchema::from_columns([
            "Time of Day_Morning",
            "Time of Day_Night",
            "Urban/Rural_Urban",
            "Weather Conditions_Rain",
            "Weather Conditions_Fog",
            "Road Type_Highway",
        ])
        .unwrap()
    }

    fn predictor_returning(score: f64) -> Predictor {
        Predictor::new(
            reference_schema(),
            Box::new(FnOracle::new("stub", 6, move |_| score)),
            UnseenCategoryPolicy::Baseline,
        )
        .unwrap()
    }

    #[test]
    fn test_reference_end_to_end() {
        let expected = vec![0.0, 1.0, 1.0, 1.0, 0.0, 0.0];
        let oracle = FnOracle::new("checked", 6, move |x| {
            assert_eq!(x, expected.as_slice());
            72.345
        });
        let predictor = Predictor::new(
            reference_schema(),
            Box::new(oracle),
            UnseenCategoryPolicy::Baseline,
        )
        .unwrap();

        let prediction = predictor.predict_visibility("Night", "Urban", "Rain", "City").unwrap();
        assert_eq!(prediction.visibility, 72.35);
        assert_eq!(prediction.label, SafetyLabel::Safe);
        assert_eq!(prediction.unseen, vec![CategoricalField::RoadType]);
    }

    #[test]
    fn test_classification_uses_unrounded_score() {
        // Rounds up to 70.0 but is still below the SAFE threshold
        let prediction = predictor_returning(69.996)
            .predict_visibility("Morning", "Urban", "Fog", "Highway")
            .unwrap();

        assert_eq!(prediction.visibility, 70.0);
        assert_eq!(prediction.label, SafetyLabel::Caution);
    }

    #[test]
    fn test_idempotent() {
        let predictor = Predictor::new(
            reference_schema(),
            Box::new(FnOracle::new("sum", 6, |x| 30.0 + 10.0 * x.iter().sum::<f64>())),
            UnseenCategoryPolicy::Baseline,
        )
        .unwrap();

        let a = predictor.predict_visibility("Night", "Urban", "Fog", "Highway").unwrap();
        let b = predictor.predict_visibility("Night", "Urban", "Fog", "Highway").unwrap();
        assert_eq!(a.visibility, b.visibility);
        assert_eq!(a.label, b.label);
        assert_eq!(a.visibility, 70.0);
    }

    #[test]
    fn test_width_mismatch_rejected_at_construction() {
        let result = Predictor::new(
            reference_schema(),
            Box::new(FnOracle::new("narrow", 4, |_| 50.0)),
            UnseenCategoryPolicy::Baseline,
        );
        assert!(matches!(
            result,
            Err(ArtifactLoadError::ShapeMismatch { model: 4, schema: 6 })
        ));
    }

    #[test]
    fn test_oracle_failure_surfaces_without_partial_result() {
        let predictor = predictor_returning(f64::NAN);
        let err = predictor.predict_visibility("Night", "Urban", "Rain", "Highway").unwrap_err();

        assert!(matches!(err, PredictionError::Oracle(OracleError::NonFinite(_))));
        assert_eq!(predictor.status().failure_count, 1);
        assert_eq!(predictor.status().prediction_count, 0);
    }

    #[test]
    fn test_reject_policy_surfaces_encode_error() {
        let predictor = Predictor::new(
            reference_schema(),
            Box::new(FnOracle::new("stub", 6, |_| 50.0)),
            UnseenCategoryPolicy::Reject,
        )
        .unwrap();

        let err = predictor.predict_visibility("Night", "Urban", "Rain", "City").unwrap_err();
        assert!(matches!(
            err,
            PredictionError::Encode(EncodeError::UnseenCategory { field: CategoricalField::RoadType, .. })
        ));
    }

    #[test]
    fn test_status_counts_predictions() {
        let predictor = predictor_returning(55.0);
        for _ in 0..3 {
            predictor.predict_visibility("Morning", "Urban", "Rain", "Highway").unwrap();
        }

        let status = predictor.status();
        assert_eq!(status.prediction_count, 3);
        assert_eq!(status.model_name, "stub");
        assert_eq!(status.schema_columns, 6);
    }

    #[test]
    fn test_shared_across_threads() {
        let predictor = Arc::new(predictor_returning(42.0));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let p = Arc::clone(&predictor);
                std::thread::spawn(move || p.predict_visibility("Night", "Urban", "Fog", "Highway").unwrap())
            })
            .collect();

        for h in handles {
            assert_eq!(h.join().unwrap().label, SafetyLabel::Caution);
        }
        assert_eq!(predictor.status().prediction_count, 4);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(72.345), 72.35);
        assert_eq!(round2(39.994), 39.99);
        assert_eq!(round2(-12.344), -12.34);
    }
}
