//! Rule: a single evaluator invocation unit (§3).

use crate::error::{Result, ValenceError};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One invocation unit referencing either a built-in operator or a plugin evaluator.
///
/// Invariant: exactly one of `operator`/`plugin` is set; validated by [`Rule::validate`] at
/// validator-load time, not on every dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Evaluator-specific fields passed through verbatim to plugin evaluators.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, JsonValue>,
}

impl Rule {
    pub fn operator(name: impl Into<String>, value: JsonValue) -> Self {
        Self {
            operator: Some(name.into()),
            plugin: None,
            value: Some(value),
            message: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn plugin(name: impl Into<String>) -> Self {
        Self {
            operator: None,
            plugin: Some(name.into()),
            value: None,
            message: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// A rule referencing a plugin.
    pub fn is_plugin(&self) -> bool {
        self.plugin.is_some()
    }

    /// Name to dispatch on: the operator name, or the plugin name.
    pub fn dispatch_name(&self) -> &str {
        self.plugin.as_deref().or(self.operator.as_deref()).unwrap_or("")
    }

    /// Enforce the operator-XOR-plugin invariant (§3).
    pub fn validate(&self) -> Result<()> {
        match (&self.operator, &self.plugin) {
            (Some(_), Some(_)) => Err(ValenceError::malformed_rule(
                "rule declares both 'operator' and 'plugin'; exactly one is required",
            )),
            (None, None) => Err(ValenceError::malformed_rule(
                "rule declares neither 'operator' nor 'plugin'; exactly one is required",
            )),
            _ => Ok(()),
        }
    }
}
