//! Rule Dispatcher (§4.3): resolves one rule to an evaluator and turns its outcome into
//! violations.
//!
//! Resolution order is plugin before operator (§3, §4.3): a rule naming a `plugin` always
//! dispatches there, never falling back to the registry.

use crate::error::{Result, ValenceError};
use crate::model::rule::Rule;
use crate::model::violation::Violation;
use crate::plugins::PluginLoader;
use crate::registry::{EvaluationContext, EvaluatorResult, OperatorRegistry, Payload};

/// Dispatches rules against the operator registry and the plugin loader.
pub struct RuleDispatcher<'a> {
    registry: &'a OperatorRegistry,
    plugins: &'a PluginLoader,
}

impl<'a> RuleDispatcher<'a> {
    pub fn new(registry: &'a OperatorRegistry, plugins: &'a PluginLoader) -> Self {
        Self { registry, plugins }
    }

    /// Evaluate one rule against `payload` for `file_path`, returning the violations it produced.
    ///
    /// A plugin evaluator raising an error is not a fatal dispatch error (§4.3, §7 "Plugin
    /// execution error"): it is converted into a single failing violation so one bad plugin
    /// cannot abort the whole validator.
    pub fn dispatch(
        &self,
        rule: &Rule,
        payload: &Payload<'_>,
        file_path: Option<&str>,
        context: &EvaluationContext,
    ) -> Result<Vec<Violation>> {
        let name = rule.dispatch_name();

        let outcome = if rule.is_plugin() {
            match self.plugins.load(name) {
                Ok(evaluator) => match evaluator.evaluate(payload, rule, context) {
                    Ok(result) => result,
                    Err(e) => EvaluatorResult::failed(format!("Plugin execution error: {e}")),
                },
                Err(_) => EvaluatorResult::failed(format!("Plugin {name} not found")),
            }
        } else {
            let evaluator = self
                .registry
                .lookup(name)
                .ok_or_else(|| ValenceError::unknown_operator(name))?;
            evaluator.evaluate(payload, rule, context)?
        };

        Ok(self.to_violations(rule, file_path, outcome))
    }

    fn to_violations(&self, rule: &Rule, file_path: Option<&str>, outcome: EvaluatorResult) -> Vec<Violation> {
        if outcome.passed {
            return Vec::new();
        }

        if !outcome.violations.is_empty() {
            return outcome.violations;
        }

        let message = rule
            .message
            .clone()
            .or(outcome.message)
            .unwrap_or_else(|| format!("Failed {} check", rule.dispatch_name()));

        let mut violation = Violation::synthesize(rule.dispatch_name(), file_path.map(str::to_string), message);
        violation.set_confidence(rule_confidence(rule));
        vec![violation]
    }
}

fn rule_confidence(rule: &Rule) -> Option<f64> {
    rule.extra.get("confidence").and_then(|v| v.as_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context() -> EvaluationContext {
        EvaluationContext
    }

    #[test]
    fn unknown_operator_is_an_error() {
        let registry = OperatorRegistry::with_builtins();
        let plugins = PluginLoader::empty("/nonexistent");
        let dispatcher = RuleDispatcher::new(&registry, &plugins);
        let rule = Rule::operator("doesNotExist", json!("x"));
        let result = dispatcher.dispatch(&rule, &Payload::FileContent("x"), None, &context());
        assert!(matches!(result, Err(ValenceError::UnknownOperator { .. })));
    }

    #[test]
    fn missing_plugin_becomes_a_not_found_violation_not_a_fatal_error() {
        let registry = OperatorRegistry::with_builtins();
        let plugins = PluginLoader::empty("/nonexistent");
        let dispatcher = RuleDispatcher::new(&registry, &plugins);
        let rule = Rule::plugin("ValidateMissing");
        let violations = dispatcher.dispatch(&rule, &Payload::FileContent("x"), Some("a.ts"), &context()).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "Plugin ValidateMissing not found");
    }

    #[test]
    fn passing_operator_produces_no_violations() {
        let registry = OperatorRegistry::with_builtins();
        let plugins = PluginLoader::empty("/nonexistent");
        let dispatcher = RuleDispatcher::new(&registry, &plugins);
        let rule = Rule::operator("mustContain", json!("hello"));
        let violations = dispatcher.dispatch(&rule, &Payload::FileContent("hello world"), None, &context()).unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn failing_operator_honors_rule_message_override() {
        let registry = OperatorRegistry::with_builtins();
        let plugins = PluginLoader::empty("/nonexistent");
        let dispatcher = RuleDispatcher::new(&registry, &plugins);
        let rule = Rule::operator("mustContain", json!("absent")).with_message("custom message");
        let violations = dispatcher.dispatch(&rule, &Payload::FileContent("hello world"), None, &context()).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "custom message");
    }

    #[test]
    fn failing_operator_without_a_rule_message_defaults_to_failed_check() {
        let registry = OperatorRegistry::with_builtins();
        let plugins = PluginLoader::empty("/nonexistent");
        let dispatcher = RuleDispatcher::new(&registry, &plugins);
        let rule = Rule::operator("mustContain", json!("sequence"));
        let violations = dispatcher.dispatch(&rule, &Payload::FileContent("no match here"), None, &context()).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "Failed mustContain check");
    }
}
