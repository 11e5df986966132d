//! Profile: an ordered collection of validator references with severity buckets (§3).

use serde::{Deserialize, Serialize};

/// Raw profile document as loaded from disk (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDocument {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub validators: Vec<String>,
    #[serde(rename = "validationLevels", skip_serializing_if = "Option::is_none")]
    pub validation_levels: Option<ValidationLevels>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationLevels {
    #[serde(default)]
    pub critical: Vec<String>,
    #[serde(default)]
    pub important: Vec<String>,
    #[serde(default)]
    pub recommended: Vec<String>,
}

/// Severity buckets partitioning a resolved profile's validator names (§4.5 output).
#[derive(Debug, Clone, Default)]
pub struct SeverityBuckets {
    pub critical: Vec<String>,
    pub important: Vec<String>,
    pub recommended: Vec<String>,
}

impl From<Option<ValidationLevels>> for SeverityBuckets {
    fn from(levels: Option<ValidationLevels>) -> Self {
        match levels {
            Some(l) => Self { critical: l.critical, important: l.important, recommended: l.recommended },
            None => Self::default(),
        }
    }
}
