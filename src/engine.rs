//! Engine Orchestrator: drives a full run from a named profile to a finished [`Report`].
//!
//! Owns the long-lived state for one run of the CLI: the operator registry, the plugin loader,
//! and the override store. Everything else (resolved validators, in-flight violations) is
//! transient per call to [`Engine::run`].

use crate::config::DocumentLoader;
use crate::dispatch::RuleDispatcher;
use crate::error::Result;
use crate::executor::{SourceFile, ValidatorExecutor};
use crate::merge;
use crate::overrides::OverrideStore;
use crate::plugins::PluginLoader;
use crate::profile_resolver::ProfileResolver;
use crate::registry::OperatorRegistry;
use crate::report::Report;
use chrono::Utc;

/// Top-level facade: construct once per CLI invocation, run one profile against one file set.
pub struct Engine {
    documents: DocumentLoader,
    registry: OperatorRegistry,
    plugins: PluginLoader,
    overrides: OverrideStore,
}

impl Engine {
    /// `documents_root` holds `validators/` and `profiles/` (§6); `plugins_root` holds the
    /// namespace directories the [`PluginLoader`] checks (§4.2); `overrides_path` is the
    /// override store's persisted file (§4.7).
    pub fn new(
        documents: DocumentLoader,
        plugins: PluginLoader,
        mut overrides: OverrideStore,
    ) -> Result<Self> {
        overrides.load()?;
        Ok(Self { documents, registry: OperatorRegistry::with_builtins(), plugins, overrides })
    }

    pub fn overrides_mut(&mut self) -> &mut OverrideStore {
        &mut self.overrides
    }

    pub fn documents(&self) -> &DocumentLoader {
        &self.documents
    }

    pub fn plugins(&self) -> &PluginLoader {
        &self.plugins
    }

    pub fn registry(&self) -> &OperatorRegistry {
        &self.registry
    }

    /// Run `profile_name`'s validators over `files` and produce a complete report (§4.1-§4.9).
    ///
    /// A missing profile, a missing validator, or an invalid validator document is a fatal
    /// configuration error that aborts the whole run before any file is touched (§4.5).
    pub fn run(&mut self, profile_name: &str, files: &[SourceFile]) -> Result<Report> {
        let resolver = ProfileResolver::new(&self.documents);
        let resolved = resolver.resolve(profile_name)?;

        let dispatcher = RuleDispatcher::new(&self.registry, &self.plugins);
        let executor = ValidatorExecutor::new(dispatcher);

        let mut results = Vec::with_capacity(resolved.validators.len());
        for validator in &resolved.validators {
            let raw = executor.execute(validator, files);
            let merged = merge::merge(validator, raw, &self.overrides);
            results.push(merged);
        }

        Ok(Report::new(resolved.name, results, Utc::now()))
    }

    /// Persist any override changes made during this run (§4.7).
    pub fn save_overrides(&mut self) -> Result<()> {
        self.overrides.save()
    }
}
