//! Result Merger (§4.8): partitions a validator's raw violations into active, low-confidence,
//! and overridden buckets, annotates overridden ones, and recomputes `passed`.

use crate::model::validation_result::ValidationResult;
use crate::model::validator::Validator;
use crate::model::violation::OverrideAnnotation;
use crate::overrides::OverrideStore;

/// Partitions and annotates one validator's raw result against a confidence threshold and the
/// override store (§4.8).
///
/// Invariant (§8 "Partition integrity"): every violation the validator produced ends up in
/// exactly one of `violations`, `low_confidence_violations`, `overridden_violations`, and the
/// three buckets' combined length never changes across merging.
pub fn merge(validator: &Validator, mut result: ValidationResult, overrides: &OverrideStore) -> ValidationResult {
    let threshold = validator.resolved_confidence_threshold(0.7);
    let raw_violations = std::mem::take(&mut result.violations);
    let total_before = raw_violations.len();

    let mut active = Vec::new();
    let mut low_confidence = Vec::new();
    let mut overridden = Vec::new();

    for violation in raw_violations {
        let file_path = violation.file_path.clone().unwrap_or_default();

        if let Some(record) = overrides.get(&violation, &file_path) {
            let annotated = violation.with_override_info(OverrideAnnotation {
                reason: record.reason.clone(),
                by: record.added_by.clone(),
                at: record.added_at,
            });
            overridden.push(annotated);
        } else if violation.confidence < threshold {
            low_confidence.push(violation);
        } else {
            active.push(violation);
        }
    }

    debug_assert_eq!(active.len() + low_confidence.len() + overridden.len(), total_before);

    result.passed = active.is_empty();
    result.message = if result.passed {
        ValidationResult::PASS_MESSAGE.to_string()
    } else {
        ValidationResult::FAIL_MESSAGE.to_string()
    };
    result.violations = active;
    result.low_confidence_violations = low_confidence;
    result.overridden_violations = overridden;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::rule::Rule;
    use crate::model::validator::ValidatorType;
    use crate::model::violation::Violation;

    fn validator(threshold: Option<f64>) -> Validator {
        Validator {
            name: "V".to_string(),
            validator_type: ValidatorType::Content,
            rules: vec![Rule::operator("mustContain", serde_json::json!("x"))],
            file_pattern: None,
            confidence_threshold: threshold,
        }
    }

    #[test]
    fn low_confidence_violations_are_partitioned_out_and_fail_is_overridable() {
        let v = validator(Some(0.8));
        let overrides = OverrideStore::new("/nonexistent/overrides.json");

        let low = Violation::new("R1", "low", 0.5).with_file_path("a.rs");
        let high = Violation::new("R2", "high", 0.95).with_file_path("a.rs");
        let raw = ValidationResult::raw("V", vec![low, high], vec!["a.rs".to_string()]);

        let merged = merge(&v, raw, &overrides);
        assert_eq!(merged.violations.len(), 1);
        assert_eq!(merged.low_confidence_violations.len(), 1);
        assert!(!merged.passed);
    }

    #[test]
    fn overridden_violations_are_removed_from_active_and_annotated() {
        let v = validator(Some(0.5));
        let violation = Violation::new("R1", "flagged", 0.95).with_file_path("a.rs");

        let mut overrides = OverrideStore::new("/nonexistent/overrides.json");
        overrides.add(&violation, "a.rs", "known false positive", "alice");

        let raw = ValidationResult::raw("V", vec![violation], vec!["a.rs".to_string()]);
        let merged = merge(&v, raw, &overrides);

        assert!(merged.violations.is_empty());
        assert_eq!(merged.overridden_violations.len(), 1);
        let annotation = merged.overridden_violations[0].override_info.as_ref().unwrap();
        assert_eq!(annotation.reason, "known false positive");
        assert_eq!(annotation.by, "alice");
        assert!(merged.passed);
    }

    #[test]
    fn partition_preserves_total_violation_count() {
        let v = validator(Some(0.7));
        let overrides = OverrideStore::new("/nonexistent/overrides.json");
        let raw = ValidationResult::raw(
            "V",
            vec![
                Violation::new("R1", "a", 0.2).with_file_path("a.rs"),
                Violation::new("R2", "b", 0.9).with_file_path("b.rs"),
                Violation::new("R3", "c", 0.5).with_file_path("c.rs"),
            ],
            vec![],
        );
        let merged = merge(&v, raw, &overrides);
        assert_eq!(merged.total_raw_violations(), 3);
    }
}
