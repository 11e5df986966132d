//! Validator: a named, typed bundle of rules applied to a file set (§3).

use crate::model::rule::Rule;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// The payload shape a validator's rules expect, which dictates how the executor iterates
/// the file set (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidatorType {
    Content,
    Structure,
    Naming,
}

/// A named rule bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Validator {
    pub name: String,
    #[serde(rename = "type")]
    pub validator_type: ValidatorType,
    pub rules: Vec<Rule>,
    #[serde(rename = "filePattern", skip_serializing_if = "Option::is_none")]
    pub file_pattern: Option<String>,
    #[serde(rename = "confidenceThreshold", skip_serializing_if = "Option::is_none")]
    pub confidence_threshold: Option<f64>,
}

impl Validator {
    /// Compile `file_pattern`, if present, once per validator rather than once per file.
    pub fn compiled_file_pattern(&self) -> Option<std::result::Result<Regex, regex::Error>> {
        self.file_pattern.as_deref().map(Regex::new)
    }

    pub fn resolved_confidence_threshold(&self, default: f64) -> f64 {
        self.confidence_threshold.unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn validator_type_round_trips_through_json() {
        let v = Validator {
            name: "V".to_string(),
            validator_type: ValidatorType::Content,
            rules: vec![],
            file_pattern: Some(r"\.ts$".to_string()),
            confidence_threshold: Some(0.8),
        };
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["type"], json!("content"));

        let back: Validator = serde_json::from_value(json).unwrap();
        assert_eq!(back.validator_type, ValidatorType::Content);
        assert_eq!(back.confidence_threshold, Some(0.8));
    }

    #[test]
    fn compiled_file_pattern_is_none_when_absent() {
        let v = Validator {
            name: "V".to_string(),
            validator_type: ValidatorType::Structure,
            rules: vec![],
            file_pattern: None,
            confidence_threshold: None,
        };
        assert!(v.compiled_file_pattern().is_none());
    }
}
