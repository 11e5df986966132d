//! Built-in operators (§4.1): `mustContain`, `matchesPattern`, `fileExists`, `hasExtension`.
//!
//! Each built-in receives the rule's `value` field as its argument and reports a bare pass/fail;
//! the dispatcher is the one that turns a failure into a violation message, defaulting to
//! `rule.message` or `"Failed <operator> check"` when the rule supplies neither (§4.3 step 3).

use super::{EvaluationContext, Evaluator, EvaluatorResult, Payload};
use crate::error::{Result, ValenceError};
use crate::model::rule::Rule;
use regex::{Regex, RegexBuilder};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Compiles a pattern once per distinct string and reuses it across every file a rule is
/// evaluated against (§4.1 "patterns are compiled once per rule and reused").
#[derive(Default)]
struct RegexCache {
    compiled: Mutex<HashMap<String, Arc<Regex>>>,
}

impl RegexCache {
    fn get_or_compile(
        &self,
        pattern: &str,
        build: impl FnOnce(&str) -> std::result::Result<Regex, regex::Error>,
    ) -> Result<Arc<Regex>> {
        let mut cache = self.compiled.lock().expect("regex cache mutex poisoned");
        if let Some(regex) = cache.get(pattern) {
            return Ok(regex.clone());
        }
        let regex = Arc::new(build(pattern).map_err(|e| ValenceError::pattern(e.to_string()))?);
        cache.insert(pattern.to_string(), regex.clone());
        Ok(regex)
    }
}

/// `mustContain`: file content must match the given pattern, case-insensitively.
#[derive(Default)]
struct MustContain {
    cache: RegexCache,
}

impl Evaluator for MustContain {
    fn evaluate(&self, payload: &Payload<'_>, rule: &Rule, _: &EvaluationContext) -> Result<EvaluatorResult> {
        let content = require_content(payload)?;
        let pattern = single_string(rule)?;
        let regex = self
            .cache
            .get_or_compile(&pattern, |p| RegexBuilder::new(p).case_insensitive(true).build())?;
        Ok(bare_result(regex.is_match(content)))
    }
}

/// `matchesPattern`: file content must match the given pattern, multiline and case-sensitive.
#[derive(Default)]
struct MatchesPattern {
    cache: RegexCache,
}

impl Evaluator for MatchesPattern {
    fn evaluate(&self, payload: &Payload<'_>, rule: &Rule, _: &EvaluationContext) -> Result<EvaluatorResult> {
        let content = require_content(payload)?;
        let pattern = single_string(rule)?;
        let regex = self
            .cache
            .get_or_compile(&pattern, |p| RegexBuilder::new(p).multi_line(true).build())?;
        Ok(bare_result(regex.is_match(content)))
    }
}

/// `fileExists`: `rule.value` names a path that must be accessible on the real filesystem. This
/// is the one built-in that performs genuine I/O rather than inspecting the per-file payload
/// (§4.1 "all synchronous except fileExists").
struct FileExists;

impl Evaluator for FileExists {
    fn evaluate(&self, _: &Payload<'_>, rule: &Rule, _: &EvaluationContext) -> Result<EvaluatorResult> {
        let path = single_string(rule)?;
        Ok(bare_result(Path::new(&path).exists()))
    }
}

/// `hasExtension`: the payload path's lowercased extension must be one of `rule.value`.
struct HasExtension;

impl Evaluator for HasExtension {
    fn evaluate(&self, payload: &Payload<'_>, rule: &Rule, _: &EvaluationContext) -> Result<EvaluatorResult> {
        let path = match payload {
            Payload::FileName(name) => *name,
            Payload::FilePathList(_) => {
                return Err(ValenceError::config("hasExtension does not support a structure payload"))
            }
            Payload::FileContent(_) => {
                return Err(ValenceError::config("hasExtension requires a file name, not content"))
            }
        };
        let extensions = string_list(rule)?;
        let actual = Path::new(path)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let allowed: Vec<String> = extensions.iter().map(|e| e.trim_start_matches('.').to_lowercase()).collect();
        Ok(bare_result(allowed.iter().any(|e| e == &actual)))
    }
}

fn bare_result(passed: bool) -> EvaluatorResult {
    if passed {
        EvaluatorResult::passed()
    } else {
        EvaluatorResult { passed: false, message: None, violations: Vec::new() }
    }
}

fn require_content<'a>(payload: &Payload<'a>) -> Result<&'a str> {
    match payload {
        Payload::FileContent(content) => Ok(*content),
        _ => Err(ValenceError::config("this operator requires file content")),
    }
}

fn single_string(rule: &Rule) -> Result<String> {
    match &rule.value {
        Some(JsonValue::String(s)) => Ok(s.clone()),
        _ => Err(ValenceError::config(format!(
            "rule '{}' requires a string 'value'",
            rule.dispatch_name()
        ))),
    }
}

fn string_list(rule: &Rule) -> Result<Vec<String>> {
    match &rule.value {
        Some(JsonValue::String(s)) => Ok(vec![s.clone()]),
        Some(JsonValue::Array(items)) => items
            .iter()
            .map(|item| match item {
                JsonValue::String(s) => Ok(s.clone()),
                _ => Err(ValenceError::config(format!(
                    "rule '{}' requires 'value' to be a string or array of strings",
                    rule.dispatch_name()
                ))),
            })
            .collect(),
        _ => Err(ValenceError::config(format!(
            "rule '{}' requires 'value' to be a string or array of strings",
            rule.dispatch_name()
        ))),
    }
}

/// Every built-in operator, keyed by its registry name (§4.1).
pub fn all() -> Vec<(&'static str, Arc<dyn Evaluator>)> {
    vec![
        ("mustContain", Arc::new(MustContain::default())),
        ("matchesPattern", Arc::new(MatchesPattern::default())),
        ("fileExists", Arc::new(FileExists)),
        ("hasExtension", Arc::new(HasExtension)),
    ]
}
