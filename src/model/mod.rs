//! Data model for the validation engine (§3).
//!
//! Validators and Rules are immutable value types after load; Violation and ValidationResult
//! are the shapes that flow from rule evaluation through the merger into the report generator.

pub mod fingerprint;
pub mod profile;
pub mod rule;
pub mod validation_result;
pub mod validator;
pub mod violation;

pub use fingerprint::fingerprint;
pub use profile::{ProfileDocument, SeverityBuckets, ValidationLevels};
pub use rule::Rule;
pub use validation_result::ValidationResult;
pub use validator::{Validator, ValidatorType};
pub use violation::{OverrideAnnotation, Severity, Violation, ViolationDetails};
