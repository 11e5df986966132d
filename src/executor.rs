//! Validator Executor (§4.4): runs one validator's rules over its target file set and produces
//! a [`ValidationResult`].
//!
//! Content and naming validators evaluate per file and stop at the first rule a given file
//! fails (further rules add no information once the file is already in violation); structure
//! validators evaluate the whole matched file set once per rule, with no such short-circuit,
//! since there is exactly one evaluation unit rather than one per file (§4.4).

use crate::dispatch::RuleDispatcher;
use crate::error::{Result, ValenceError};
use crate::model::validation_result::ValidationResult;
use crate::model::validator::{Validator, ValidatorType};
use crate::model::violation::Violation;
use crate::registry::{EvaluationContext, Payload};
use rayon::prelude::*;
use std::sync::{Arc, Mutex};

/// A file available to the executor: its path (as it should appear in output) and its content.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self { path: path.into(), content: content.into() }
    }

    fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Runs a validator's rules over its target file set (§4.4).
pub struct ValidatorExecutor<'a> {
    dispatcher: RuleDispatcher<'a>,
}

impl<'a> ValidatorExecutor<'a> {
    pub fn new(dispatcher: RuleDispatcher<'a>) -> Self {
        Self { dispatcher }
    }

    /// Execute `validator` against `files`, which must already have been filtered to those the
    /// caller wants considered; `target_files` resolves `file_pattern` filtering (§4.4 step 1).
    pub fn execute(&self, validator: &Validator, files: &[SourceFile]) -> ValidationResult {
        let targets = match self.resolve_targets(validator, files) {
            Ok(targets) => targets,
            Err(e) => return ValidationResult::error(&validator.name, e),
        };

        let outcome = match validator.validator_type {
            ValidatorType::Content => self.execute_per_file(validator, &targets),
            ValidatorType::Naming => self.execute_per_file(validator, &targets),
            ValidatorType::Structure => self.execute_structure(validator, &targets),
        };

        match outcome {
            Ok(violations) => {
                let mut violations = violations;
                violations.sort_by(|a, b| {
                    a.file_path.cmp(&b.file_path).then_with(|| a.rule.cmp(&b.rule))
                });
                let details = violations.iter().map(detail_line).collect();
                ValidationResult::raw(&validator.name, violations, details)
            }
            Err(e) => ValidationResult::error(&validator.name, e),
        }
    }

    fn resolve_targets(&self, validator: &Validator, files: &[SourceFile]) -> Result<Vec<SourceFile>> {
        match validator.compiled_file_pattern() {
            None => Ok(files.to_vec()),
            Some(Ok(pattern)) => Ok(files.iter().filter(|f| pattern.is_match(&f.path)).cloned().collect()),
            Some(Err(e)) => Err(ValenceError::pattern(format!(
                "validator '{}' has an invalid filePattern: {e}",
                validator.name
            ))),
        }
    }

    /// Content/naming: one evaluation per file, stopping at the first rule that file fails.
    fn execute_per_file(&self, validator: &Validator, targets: &[SourceFile]) -> Result<Vec<Violation>> {
        let violations = Arc::new(Mutex::new(Vec::new()));
        let fatal = Arc::new(Mutex::new(None));
        let context = EvaluationContext;

        targets.par_iter().for_each(|file| {
            if fatal.lock().expect("fatal mutex poisoned").is_some() {
                return;
            }

            let payload = match validator.validator_type {
                ValidatorType::Content => Payload::FileContent(&file.content),
                ValidatorType::Naming => Payload::FileName(file.file_name()),
                ValidatorType::Structure => unreachable!("structure dispatched separately"),
            };

            for rule in &validator.rules {
                match self.dispatcher.dispatch(rule, &payload, Some(&file.path), &context) {
                    Ok(file_violations) => {
                        if !file_violations.is_empty() {
                            violations.lock().expect("violation mutex poisoned").extend(file_violations);
                            break;
                        }
                    }
                    Err(e) => {
                        *fatal.lock().expect("fatal mutex poisoned") = Some(e);
                        break;
                    }
                }
            }
        });

        if let Some(e) = Arc::try_unwrap(fatal).expect("no outstanding references").into_inner().expect("mutex poisoned") {
            return Err(e);
        }

        Ok(Arc::try_unwrap(violations).expect("no outstanding references").into_inner().expect("mutex poisoned"))
    }

    /// Structure: one evaluation over the whole matched file set per rule, no short-circuit.
    fn execute_structure(&self, validator: &Validator, targets: &[SourceFile]) -> Result<Vec<Violation>> {
        let paths: Vec<String> = targets.iter().map(|f| f.path.clone()).collect();
        let payload = Payload::FilePathList(&paths);
        let context = EvaluationContext;

        let mut violations = Vec::new();
        for rule in &validator.rules {
            let rule_violations = self.dispatcher.dispatch(rule, &payload, None, &context)?;
            violations.extend(rule_violations);
        }
        Ok(violations)
    }
}

/// One human-readable failure line per violation, e.g. `"b.js: Failed mustContain check"` for a
/// per-file violation or just the message for a structure violation with no single file (§4.4
/// step 3).
fn detail_line(violation: &Violation) -> String {
    match &violation.file_path {
        Some(path) => format!("{path}: {}", violation.message),
        None => violation.message.clone(),
    }
}
