//! Safety Thresholds
//!
//! Chỉ constants và config - classify logic lives in `classifier.rs`.

use serde::{Deserialize, Serialize};

/// At or above this visibility = Safe
pub const SAFE_THRESHOLD: f64 = 70.0;

/// At or above this visibility (and below SAFE_THRESHOLD) = Caution
pub const CAUTION_THRESHOLD: f64 = 40.0;

/// Closed-open buckets: `[safe_min, ∞)`, `[caution_min, safe_min)`, below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafetyThresholds {
    pub safe_min: f64,
    pub caution_min: f64,
}

impl Default for SafetyThresholds {
    fn default() -> Self {
        Self {
            safe_min: SAFE_THRESHOLD,
            caution_min: CAUTION_THRESHOLD,
        }
    }
}
