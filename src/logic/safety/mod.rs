//! Safety Module - visibility score to driving recommendation

pub mod classifier;
pub mod rules;
pub mod types;

pub use classifier::{classify, classify_with_thresholds};
pub use rules::{SafetyThresholds, CAUTION_THRESHOLD, SAFE_THRESHOLD};
pub use types::SafetyLabel;
