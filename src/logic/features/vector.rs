//! Feature Vector - Core data structure for model input
//!
//! Values are positional: index `i` is the schema's column `i`.
//! The layout hash ties a vector to the schema it was built against.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use super::layout::TrainingSchema;
use crate::error::LayoutMismatchError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// CRC32 hash of the schema layout (for mismatch detection)
    pub layout_hash: u32,
    /// Values in schema column order
    pub values: Vec<f64>,
}

impl FeatureVector {
    /// Zeroed vector shaped for `schema`
    pub fn zeros(schema: &TrainingSchema) -> Self {
        Self {
            layout_hash: schema.layout_hash(),
            values: vec![0.0; schema.len()],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn as_array(&self) -> ArrayView1<'_, f64> {
        ArrayView1::from(self.values.as_slice())
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn get_by_name(&self, schema: &TrainingSchema, name: &str) -> Option<f64> {
        schema.position(name).and_then(|i| self.get(i))
    }

    pub(crate) fn set(&mut self, index: usize, value: f64) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }

    /// Validate that this vector was built for `schema`
    pub fn validate(&self, schema: &TrainingSchema) -> Result<(), LayoutMismatchError> {
        if self.layout_hash != schema.layout_hash() || self.values.len() != schema.len() {
            return Err(LayoutMismatchError {
                expected: schema.layout_hash(),
                expected_len: schema.len(),
                actual: self.layout_hash,
                actual_len: self.values.len(),
            });
        }
        Ok(())
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self, schema: &TrainingSchema) -> serde_json::Value {
        serde_json::json!({
            "layout_hash": self.layout_hash,
            "values": self.values,
            "named_values": schema.column_names()
                .zip(self.values.iter())
                .map(|(name, value)| (name.to_string(), *value))
                .collect::<std::collections::BTreeMap<_, _>>(),
        })
    }
}
