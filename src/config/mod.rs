//! Document loading for profiles and validators (§6, §10).
//!
//! Architecture: this is the anti-corruption layer between on-disk JSON and the domain types in
//! [`crate::model`] — it owns path resolution and JSON parsing, nothing else. Loading is
//! JSON-only; there is no YAML front end.

use crate::error::{Result, ValenceError};
use crate::model::{ProfileDocument, Validator};
use std::fs;
use std::path::{Path, PathBuf};

/// Resolves profile and validator documents from a configured directory tree.
///
/// Expected layout: `<root>/validators/<name>.json` and `<root>/profiles/<name>.json`.
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    root: PathBuf,
}

impl DocumentLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn validators_dir(&self) -> PathBuf {
        self.root.join("validators")
    }

    fn profiles_dir(&self) -> PathBuf {
        self.root.join("profiles")
    }

    /// Load and validate a single validator document by name (§3 "operator-XOR-plugin").
    pub fn load_validator(&self, name: &str) -> Result<Validator> {
        let path = self.validators_dir().join(format!("{name}.json"));
        let validator = self.load_json::<Validator>(&path)?;
        for rule in &validator.rules {
            rule.validate()?;
        }
        Ok(validator)
    }

    /// Load a single profile document by name.
    pub fn load_profile(&self, name: &str) -> Result<ProfileDocument> {
        let path = self.profiles_dir().join(format!("{name}.json"));
        self.load_json::<ProfileDocument>(&path)
    }

    /// Every validator document present under the validators directory.
    pub fn list_validators(&self) -> Result<Vec<String>> {
        list_json_stems(&self.validators_dir())
    }

    /// Every profile document present under the profiles directory.
    pub fn list_profiles(&self) -> Result<Vec<String>> {
        list_json_stems(&self.profiles_dir())
    }

    fn load_json<T: serde::de::DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ValenceError::config(format!("failed to read '{}': {e}", path.display())))?;
        serde_json::from_str(&contents)
            .map_err(|e| ValenceError::config(format!("failed to parse '{}': {e}", path.display())))
    }
}

fn list_json_stems(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}
