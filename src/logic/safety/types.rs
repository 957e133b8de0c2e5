//! Safety Types
//!
//! KHÔNG chứa logic - chỉ data structures.

use serde::{Deserialize, Serialize};

/// Driving safety levels, ordered from highest to lowest visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SafetyLabel {
    /// Visibility is good enough to drive normally
    Safe,
    /// Drive, but slow down and stay alert
    Caution,
    /// Avoid driving
    Dangerous,
}

impl SafetyLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SafetyLabel::Safe => "SAFE",
            SafetyLabel::Caution => "CAUTION",
            SafetyLabel::Dangerous => "DANGEROUS",
        }
    }

    pub fn severity_level(&self) -> u8 {
        match self {
            SafetyLabel::Safe => 0,
            SafetyLabel::Caution => 1,
            SafetyLabel::Dangerous => 2,
        }
    }

    /// Driver-facing decision line
    pub fn recommendation(&self) -> &'static str {
        match self {
            SafetyLabel::Safe => "SAFE to drive 🟢",
            SafetyLabel::Caution => "OKAY – Drive with caution 🟡",
            SafetyLabel::Dangerous => "DANGEROUS – Avoid driving 🔴",
        }
    }
}

impl std::fmt::Display for SafetyLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
