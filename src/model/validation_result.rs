//! ValidationResult: the per-validator outcome (§3).

use crate::model::violation::Violation;
use serde::{Deserialize, Serialize};

/// Outcome of running one validator over its target file set.
///
/// Invariant: `violations`, `low_confidence_violations`, and `overridden_violations` are
/// disjoint and their union equals everything the validator's rules produced, before merging
/// (§3, §8 "Partition integrity").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub validator: String,
    pub passed: bool,
    pub message: String,
    pub violations: Vec<Violation>,
    #[serde(rename = "lowConfidenceViolations")]
    pub low_confidence_violations: Vec<Violation>,
    #[serde(rename = "overriddenViolations")]
    pub overridden_violations: Vec<Violation>,
    pub details: Vec<String>,
}

impl ValidationResult {
    pub const PASS_MESSAGE: &'static str = "All checks passed";
    pub const FAIL_MESSAGE: &'static str = "Some checks failed";

    /// Raw result straight out of the executor, before the merger has partitioned anything:
    /// every produced violation starts out in `violations`.
    pub fn raw(validator: impl Into<String>, violations: Vec<Violation>, details: Vec<String>) -> Self {
        let passed = violations.is_empty();
        Self {
            validator: validator.into(),
            passed,
            message: if passed { Self::PASS_MESSAGE } else { Self::FAIL_MESSAGE }.to_string(),
            violations,
            low_confidence_violations: Vec::new(),
            overridden_violations: Vec::new(),
            details,
        }
    }

    /// A validator-fatal error result (§4.4 step 4, §7 "Unknown-operator error").
    pub fn error(validator: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        Self {
            validator: validator.into(),
            passed: false,
            message: format!("Validation error: {detail}"),
            violations: Vec::new(),
            low_confidence_violations: Vec::new(),
            overridden_violations: Vec::new(),
            details: Vec::new(),
        }
    }

    /// Total violations the validator's rules produced before any merge filtering (§4.9 stats).
    pub fn total_raw_violations(&self) -> usize {
        self.violations.len() + self.low_confidence_violations.len() + self.overridden_violations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_result_passes_when_no_violations() {
        let r = ValidationResult::raw("V", Vec::new(), Vec::new());
        assert!(r.passed);
        assert_eq!(r.message, ValidationResult::PASS_MESSAGE);
    }

    #[test]
    fn error_result_is_never_passed() {
        let r = ValidationResult::error("W", "Unknown operator: doesNotExist");
        assert!(!r.passed);
        assert_eq!(r.message, "Validation error: Unknown operator: doesNotExist");
    }
}
