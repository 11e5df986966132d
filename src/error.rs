//! Error taxonomy for the validation engine
//!
//! Architecture: all fallible boundaries return a typed value from this enum rather than
//! letting exceptions or an opaque `anyhow::Error` leak across module lines. Fatal variants
//! (configuration) abort the orchestrator before any validator runs; every other variant is
//! absorbed into a `ValidationResult` or `Violation` by the component that encounters it, so
//! the orchestrator's own `Result` only ever carries the fatal rows.

use thiserror::Error;

/// Errors produced by the validation engine.
#[derive(Debug, Error)]
pub enum ValenceError {
    /// Unknown validator, unknown profile, or a malformed validator/profile document.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A rule references an operator absent from the registry.
    #[error("Unknown operator: {operator}")]
    UnknownOperator { operator: String },

    /// A rule's operator argument compiled to an invalid pattern.
    #[error("Invalid pattern in rule: {message}")]
    Pattern { message: String },

    /// A plugin could not be resolved or its exported shape was invalid.
    #[error("Plugin error: {message}")]
    Plugin { message: String },

    /// Filesystem I/O failure, surfaced with its originating path where known.
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON (de)serialization failure for a document or report artifact.
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// A rule declared both or neither of `operator`/`plugin`.
    #[error("Rule is malformed: {message}")]
    MalformedRule { message: String },
}

impl ValenceError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    pub fn unknown_operator(operator: impl Into<String>) -> Self {
        Self::UnknownOperator { operator: operator.into() }
    }

    pub fn pattern(message: impl Into<String>) -> Self {
        Self::Pattern { message: message.into() }
    }

    pub fn plugin(message: impl Into<String>) -> Self {
        Self::Plugin { message: message.into() }
    }

    pub fn malformed_rule(message: impl Into<String>) -> Self {
        Self::MalformedRule { message: message.into() }
    }
}

/// Result type for Valence operations.
pub type Result<T> = std::result::Result<T, ValenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_populate_message() {
        let e = ValenceError::config("bad profile");
        assert_eq!(e.to_string(), "Configuration error: bad profile");

        let e = ValenceError::unknown_operator("doesNotExist");
        assert_eq!(e.to_string(), "Unknown operator: doesNotExist");
    }

    #[test]
    fn io_error_converts_via_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let e: ValenceError = io_err.into();
        assert!(matches!(e, ValenceError::Io { .. }));
    }
}
