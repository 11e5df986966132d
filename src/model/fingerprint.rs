//! Deterministic cross-run identity for a violation (§4.6).
//!
//! The algorithm is fixed by the override-store contract: widening the truncation or swapping
//! the encoding would silently break suppression for every existing `.valence-overrides.json`
//! in the wild, so this is implemented exactly as specified rather than "improved."

use crate::model::violation::Violation;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const FINGERPRINT_LENGTH: usize = 16;
const MESSAGE_PREFIX_LENGTH: usize = 50;

/// Compute the 16-character base64-prefix fingerprint for a violation at `file_path`.
///
/// `file_path` is taken as a parameter rather than read off `violation.file_path` because the
/// override store keys structure violations (which carry no single file path) by the path the
/// caller is annotating, per §4.7's `add`/`isOverridden` signatures.
pub fn fingerprint(violation: &Violation, file_path: &str) -> String {
    let line = violation
        .line
        .map(|l| l.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let message_prefix: String = violation.message.chars().take(MESSAGE_PREFIX_LENGTH).collect();

    let joined = [violation.rule.as_str(), file_path, line.as_str(), message_prefix.as_str()]
        .join("|");

    let encoded = STANDARD.encode(joined.as_bytes());
    encoded.chars().take(FINGERPRINT_LENGTH).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::violation::Severity;

    fn violation(message: &str) -> Violation {
        Violation {
            rule: "mustContain".to_string(),
            file_path: None,
            line: Some(12),
            column: None,
            message: message.to_string(),
            code: None,
            severity: Severity::Error,
            confidence: 1.0,
            details: None,
            override_info: None,
        }
    }

    #[test]
    fn fingerprint_is_sixteen_characters() {
        let fp = fingerprint(&violation("Failed mustContain check"), "a.js");
        assert_eq!(fp.len(), FINGERPRINT_LENGTH);
    }

    #[test]
    fn fingerprint_is_stable_for_identical_inputs() {
        let v = violation("Failed mustContain check");
        assert_eq!(fingerprint(&v, "a.js"), fingerprint(&v, "a.js"));
    }

    #[test]
    fn fingerprint_differs_on_file_path() {
        let v = violation("Failed mustContain check");
        assert_ne!(fingerprint(&v, "a.js"), fingerprint(&v, "b.js"));
    }

    #[test]
    fn missing_line_uses_literal_unknown() {
        let mut v = violation("no location");
        v.line = None;
        let fp = fingerprint(&v, "a.js");
        assert_eq!(fp.len(), FINGERPRINT_LENGTH);
    }

    #[test]
    fn short_message_uses_full_message_not_padded() {
        let short = violation("short");
        let fp_short = fingerprint(&short, "a.js");

        // A message under 50 chars must not be treated differently from one that happens
        // to be exactly 50 chars after truncation — both just join the full string.
        assert_eq!(fp_short.len(), FINGERPRINT_LENGTH);
    }
}
