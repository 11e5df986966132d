//! Profile Resolver (§4.5): expands a named profile into its validators and severity buckets.

use crate::config::DocumentLoader;
use crate::error::{Result, ValenceError};
use crate::model::validator::Validator;
use crate::model::{ProfileDocument, SeverityBuckets};

/// A profile expanded into the validators it names and their severity buckets.
pub struct ResolvedProfile {
    pub name: String,
    pub validators: Vec<Validator>,
    pub severity: SeverityBuckets,
}

/// Expands named profiles into loaded validator documents (§4.5).
pub struct ProfileResolver<'a> {
    loader: &'a DocumentLoader,
}

impl<'a> ProfileResolver<'a> {
    pub fn new(loader: &'a DocumentLoader) -> Self {
        Self { loader }
    }

    /// Resolve `name` into its full validator set. A missing profile or a profile naming a
    /// validator that does not exist is a fatal configuration error (§4.5, §7).
    pub fn resolve(&self, name: &str) -> Result<ResolvedProfile> {
        let document: ProfileDocument = self.loader.load_profile(name)?;
        self.resolve_document(document)
    }

    /// Resolve an already-loaded profile document, for callers that constructed one in memory
    /// (e.g. an ad hoc profile built from CLI arguments rather than loaded from disk).
    pub fn resolve_document(&self, document: ProfileDocument) -> Result<ResolvedProfile> {
        let mut validators = Vec::with_capacity(document.validators.len());
        for validator_name in &document.validators {
            let validator = self.loader.load_validator(validator_name).map_err(|e| {
                ValenceError::config(format!(
                    "profile '{}' references unknown validator '{}': {e}",
                    document.name, validator_name
                ))
            })?;
            validators.push(validator);
        }

        Ok(ResolvedProfile {
            name: document.name,
            validators,
            severity: SeverityBuckets::from(document.validation_levels),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write(dir: &Path, sub: &str, name: &str, content: &str) {
        let path = dir.join(sub);
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join(format!("{name}.json")), content).unwrap();
    }

    #[test]
    fn resolves_profile_and_its_validators() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "validators",
            "NoTodo",
            r#"{"name":"NoTodo","type":"content","rules":[{"operator":"mustContain","value":"fn main"}]}"#,
        );
        write(
            tmp.path(),
            "profiles",
            "Default",
            r#"{"name":"Default","validators":["NoTodo"],"validationLevels":{"critical":["NoTodo"],"important":[],"recommended":[]}}"#,
        );

        let loader = DocumentLoader::new(tmp.path());
        let resolver = ProfileResolver::new(&loader);
        let resolved = resolver.resolve("Default").unwrap();
        assert_eq!(resolved.validators.len(), 1);
        assert_eq!(resolved.severity.critical, vec!["NoTodo".to_string()]);
    }

    #[test]
    fn missing_profile_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let loader = DocumentLoader::new(tmp.path());
        let resolver = ProfileResolver::new(&loader);
        assert!(resolver.resolve("Missing").is_err());
    }

    #[test]
    fn profile_referencing_unknown_validator_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "profiles",
            "Bad",
            r#"{"name":"Bad","validators":["DoesNotExist"],"validationLevels":null}"#,
        );
        let loader = DocumentLoader::new(tmp.path());
        let resolver = ProfileResolver::new(&loader);
        assert!(resolver.resolve("Bad").is_err());
    }
}
