//! Feature Encoder
//!
//! Reconciles a raw observation against the training schema. Candidate
//! indicator names are only ever looked up, so the output always has the
//! schema's width and order.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::layout::{ColumnKind, TrainingSchema};
use super::observation::{CategoricalField, RawObservation};
use super::vector::FeatureVector;
use crate::error::EncodeError;

/// What to do with a category value that has no schema column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnseenCategoryPolicy {
    /// Leave every indicator of the field at 0, i.e. treat it as the baseline
    #[default]
    Baseline,
    /// Fail the call unless the value is the schema's declared baseline
    Reject,
}

impl FromStr for UnseenCategoryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "baseline" | "fallback" => Ok(UnseenCategoryPolicy::Baseline),
            "reject" | "strict" => Ok(UnseenCategoryPolicy::Reject),
            other => Err(format!("unknown unseen-category policy '{}'", other)),
        }
    }
}

/// Encoder output plus the fields that fell back to baseline
#[derive(Debug, Clone, PartialEq)]
pub struct Encoded {
    pub vector: FeatureVector,
    pub unseen: Vec<CategoricalField>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Encoder {
    policy: UnseenCategoryPolicy,
}

impl Encoder {
    pub fn new(policy: UnseenCategoryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> UnseenCategoryPolicy {
        self.policy
    }

    pub fn encode(
        &self,
        observation: &RawObservation,
        schema: &TrainingSchema,
    ) -> Result<Encoded, EncodeError> {
        let (vector, misses) = encode_lenient(observation, schema);
        let mut unseen = Vec::new();

        for field in misses {
            let value = observation.value(field);
            if schema.baseline(field) == Some(value) {
                continue;
            }
            if self.policy == UnseenCategoryPolicy::Reject {
                return Err(EncodeError::UnseenCategory {
                    field,
                    value: value.to_string(),
                });
            }
            unseen.push(field);
        }

        Ok(Encoded { vector, unseen })
    }
}

/// Encode with the default fallback policy. Never fails.
pub fn encode(observation: &RawObservation, schema: &TrainingSchema) -> FeatureVector {
    encode_lenient(observation, schema).0
}

/// Fills the vector and returns the fields whose value had no column.
fn encode_lenient(
    observation: &RawObservation,
    schema: &TrainingSchema,
) -> (FeatureVector, Vec<CategoricalField>) {
    let mut vector = FeatureVector::zeros(schema);
    let mut misses = Vec::new();

    for (i, column) in schema.columns().iter().enumerate() {
        if column.kind == ColumnKind::Passthrough {
            let value = observation.numeric.get(&column.name).copied().unwrap_or(0.0);
            vector.set(i, value);
        }
    }

    for field in CategoricalField::ALL {
        match schema.position(&field.indicator_column(observation.value(field))) {
            Some(pos) => vector.set(pos, 1.0),
            None => misses.push(field),
        }
    }

    (vector, misses)
}
