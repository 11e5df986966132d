//! Operator Registry (§4.1): central lookup of evaluators by name, with built-ins always present.
//!
//! Architecture: the polymorphic evaluator contract (§9) is realized as a tagged variant rather
//! than a trait object behind `dyn Any` — `Evaluator` is a plain trait object (`dyn Evaluator`),
//! and built-ins vs. plugins are distinguished only by how they got into the map, not by their
//! type. This mirrors the function-pointer-keyed registry pattern used elsewhere in the wider
//! validator ecosystem this crate draws on, adapted from per-file-type keys to per-name keys.

pub mod builtins;

use crate::error::Result;
use crate::model::rule::Rule;
use std::collections::HashMap;
use std::sync::Arc;

/// The payload an evaluator receives, varying by validator type (§4.3, §9).
#[derive(Debug, Clone)]
pub enum Payload<'a> {
    FileContent(&'a str),
    FilePathList(&'a [String]),
    FileName(&'a str),
}

/// Arbitrary per-run context made available to evaluators. Currently unused by built-ins;
/// plugin evaluators may use it for shared state across invocations within one run.
#[derive(Debug, Default, Clone)]
pub struct EvaluationContext;

/// Normalized outcome of one evaluator invocation (§3).
#[derive(Debug, Clone, Default)]
pub struct EvaluatorResult {
    pub passed: bool,
    pub message: Option<String>,
    pub violations: Vec<crate::model::Violation>,
}

impl EvaluatorResult {
    pub fn passed() -> Self {
        Self { passed: true, message: None, violations: Vec::new() }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { passed: false, message: Some(message.into()), violations: Vec::new() }
    }
}

/// A callable satisfying `evaluate(payload, rule, context) -> EvaluatorResult` (§3, §9).
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, payload: &Payload<'_>, rule: &Rule, context: &EvaluationContext) -> Result<EvaluatorResult>;
}

/// Central lookup of evaluators by name (§4.1).
///
/// Built-ins are registered eagerly at construction and may never be overwritten; plugin
/// entries are registered lazily by the Plugin Loader as rules reference them.
pub struct OperatorRegistry {
    evaluators: HashMap<String, Arc<dyn Evaluator>>,
    builtin_names: Vec<String>,
}

impl OperatorRegistry {
    /// A registry with every built-in operator of §4.1 already present.
    pub fn with_builtins() -> Self {
        let mut registry = Self { evaluators: HashMap::new(), builtin_names: Vec::new() };
        for (name, evaluator) in builtins::all() {
            registry.evaluators.insert(name.to_string(), evaluator);
            registry.builtin_names.push(name.to_string());
        }
        registry
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Evaluator>> {
        self.evaluators.get(name).cloned()
    }

    /// Register a plugin-supplied evaluator. Overwriting a built-in is forbidden (§4.1).
    pub fn register(&mut self, name: impl Into<String>, evaluator: Arc<dyn Evaluator>) -> Result<()> {
        let name = name.into();
        if self.builtin_names.contains(&name) {
            return Err(crate::error::ValenceError::config(format!(
                "cannot overwrite built-in operator '{name}'"
            )));
        }
        self.evaluators.insert(name, evaluator);
        Ok(())
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.evaluators.keys().cloned().collect();
        names.sort();
        names
    }
}
