//! Safety Classifier
//!
//! Input: unrounded visibility score. Output: SafetyLabel.
//! Boundary values belong to the safer bucket.

use super::rules::SafetyThresholds;
use super::types::SafetyLabel;

pub fn classify(score: f64) -> SafetyLabel {
    classify_with_thresholds(score, &SafetyThresholds::default())
}

pub fn classify_with_thresholds(score: f64, thresholds: &SafetyThresholds) -> SafetyLabel {
    if score >= thresholds.safe_min {
        SafetyLabel::Safe
    } else if score >= thresholds.caution_min {
        SafetyLabel::Caution
    } else {
        SafetyLabel::Dangerous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(classify(70.0), SafetyLabel::Safe);
        assert_eq!(classify(69.99), SafetyLabel::Caution);
        assert_eq!(classify(40.0), SafetyLabel::Caution);
        assert_eq!(classify(39.99), SafetyLabel::Dangerous);
    }

    #[test]
    fn test_extremes_are_total() {
        assert_eq!(classify(f64::INFINITY), SafetyLabel::Safe);
        assert_eq!(classify(f64::NEG_INFINITY), SafetyLabel::Dangerous);
        assert_eq!(classify(1e9), SafetyLabel::Safe);
        assert_eq!(classify(-250.0), SafetyLabel::Dangerous);
        assert_eq!(classify(f64::NAN), SafetyLabel::Dangerous);
    }

    #[test]
    fn test_monotone_over_range() {
        // Sweep 0..=100 in steps of 0.25; labels never get safer as score drops
        let mut previous = SafetyLabel::Safe;
        for step in (0..=400).rev() {
            let label = classify(step as f64 * 0.25);
            assert!(label >= previous);
            previous = label;
        }
        assert_eq!(previous, SafetyLabel::Dangerous);
    }

    #[test]
    fn test_custom_thresholds() {
        let strict = SafetyThresholds { safe_min: 85.0, caution_min: 60.0 };
        assert_eq!(classify_with_thresholds(80.0, &strict), SafetyLabel::Caution);
        assert_eq!(classify_with_thresholds(59.0, &strict), SafetyLabel::Dangerous);
    }

    #[test]
    fn test_label_strings() {
        assert_eq!(SafetyLabel::Caution.to_string(), "CAUTION");
        assert_eq!(serde_json::to_string(&SafetyLabel::Dangerous).unwrap(), "\"DANGEROUS\"");
        assert!(SafetyLabel::Safe.recommendation().starts_with("SAFE"));
        assert!(SafetyLabel::Safe.severity_level() < SafetyLabel::Dangerous.severity_level());
    }
}
