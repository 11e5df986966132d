//! The canonical violation shape produced by rule evaluation.
//!
//! Architecture: Violation is a value type, not an entity — two violations with the same
//! fields are interchangeable. Confidence clamping and defaulting live on construction so
//! every violation anywhere downstream already satisfies the `[0,1]` invariant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity levels for a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::Error
    }
}

/// Free-form remediation metadata attached to a violation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ViolationDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_fix_suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
}

/// Annotation attached to a violation once the Result Merger finds it in the override store
/// (§4.8 step 2).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverrideAnnotation {
    #[serde(rename = "overrideReason")]
    pub reason: String,
    #[serde(rename = "overriddenBy")]
    pub by: String,
    #[serde(rename = "overriddenAt")]
    pub at: DateTime<Utc>,
}

/// A single rule failure, carrying location, message, severity, and confidence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Violation {
    pub rule: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub severity: Severity,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ViolationDetails>,
    #[serde(flatten)]
    pub override_info: Option<OverrideAnnotation>,
}

impl Violation {
    /// Build a violation, clamping `confidence` to `[0, 1]` (§3 invariant).
    pub fn new(rule: impl Into<String>, message: impl Into<String>, confidence: f64) -> Self {
        Self {
            rule: rule.into(),
            file_path: None,
            line: None,
            column: None,
            message: message.into(),
            code: None,
            severity: Severity::Error,
            confidence: clamp_confidence(confidence),
            details: None,
            override_info: None,
        }
    }

    /// Minimal violation synthesized by the dispatcher for the legacy boolean evaluator path.
    pub fn synthesize(rule: impl Into<String>, file_path: Option<String>, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            file_path,
            line: None,
            column: None,
            message: message.into(),
            code: None,
            severity: Severity::Error,
            confidence: 1.0,
            details: None,
            override_info: None,
        }
    }

    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn with_override_info(mut self, info: OverrideAnnotation) -> Self {
        self.override_info = Some(info);
        self
    }

    pub fn with_position(mut self, line: u32, column: u32) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_details(mut self, details: ViolationDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// Clamp and fill a confidence value missing from a deserialized partial violation (§3, §8).
    pub fn set_confidence(&mut self, confidence: Option<f64>) {
        self.confidence = clamp_confidence(confidence.unwrap_or(1.0));
    }
}

fn clamp_confidence(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
