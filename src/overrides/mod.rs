//! Override Store (§4.7): persists fingerprint-keyed suppressions across runs.
//!
//! Architecture: versioned-JSON load/save with a dirty flag, the same persistence idiom this
//! crate's cache used for file metadata, retargeted from path keys to violation fingerprints.

use crate::error::Result;
use crate::model::fingerprint;
use crate::model::violation::Violation;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const STORE_VERSION: &str = "1.0";

/// Status recorded against an override. Only one status is defined today (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideStatus {
    FalsePositive,
}

impl Default for OverrideStatus {
    fn default() -> Self {
        Self::FalsePositive
    }
}

/// One suppressed violation, keyed by its fingerprint in the store's map (§3, §6).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverrideRecord {
    #[serde(rename = "violationKey")]
    pub violation_key: String,
    pub rule: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    pub message: String,
    #[serde(default)]
    pub status: OverrideStatus,
    pub reason: String,
    #[serde(rename = "addedBy")]
    pub added_by: String,
    #[serde(rename = "addedAt")]
    pub added_at: DateTime<Utc>,
    #[serde(rename = "originalConfidence", skip_serializing_if = "Option::is_none")]
    pub original_confidence: Option<f64>,
    #[serde(rename = "importedAt", skip_serializing_if = "Option::is_none")]
    pub imported_at: Option<DateTime<Utc>>,
}

impl OverrideRecord {
    /// Build a record directly from its fields, for callers (e.g. the CLI) that do not have a
    /// full in-memory `Violation` to pass to [`OverrideStore::add`].
    pub fn new(
        violation_key: impl Into<String>,
        rule: impl Into<String>,
        file_path: impl Into<String>,
        line: Option<u32>,
        message: impl Into<String>,
        reason: impl Into<String>,
        added_by: impl Into<String>,
        original_confidence: Option<f64>,
    ) -> Self {
        Self {
            violation_key: violation_key.into(),
            rule: rule.into(),
            file_path: file_path.into(),
            line,
            message: message.into(),
            status: OverrideStatus::FalsePositive,
            reason: reason.into(),
            added_by: added_by.into(),
            added_at: Utc::now(),
            original_confidence,
            imported_at: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreData {
    version: String,
    #[serde(rename = "lastUpdated")]
    last_updated: DateTime<Utc>,
    #[serde(default)]
    overrides: HashMap<String, OverrideRecord>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self { version: STORE_VERSION.to_string(), last_updated: Utc::now(), overrides: HashMap::new() }
    }
}

/// A point-in-time export of the store, independent of its own persisted file (§4.7 `export`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    pub version: String,
    #[serde(rename = "exportedAt")]
    pub exported_at: DateTime<Utc>,
    pub overrides: HashMap<String, OverrideRecord>,
}

/// Statistics about the current override set (§4.7, §4.9).
#[derive(Debug, Clone, Serialize)]
pub struct OverrideStats {
    pub total: usize,
    #[serde(rename = "byRule")]
    pub by_rule: HashMap<String, usize>,
    #[serde(rename = "byUser")]
    pub by_user: HashMap<String, usize>,
    #[serde(rename = "recent7d")]
    pub recent_7d: usize,
}

/// Fingerprint-keyed store of suppressed violations (§4.7).
#[derive(Debug)]
pub struct OverrideStore {
    store_path: PathBuf,
    data: StoreData,
    dirty: bool,
}

impl OverrideStore {
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        Self { store_path: store_path.into(), data: StoreData::default(), dirty: false }
    }

    /// Load the store from disk, if present. A missing file is an empty store, not an error;
    /// invalid JSON is also treated as an empty store, with a warning traced (§9 "Invalid JSON
    /// in override store").
    pub fn load(&mut self) -> Result<()> {
        if !self.store_path.exists() {
            return Ok(());
        }

        let contents = fs::read_to_string(&self.store_path)?;
        match serde_json::from_str::<StoreData>(&contents) {
            Ok(data) => self.data = data,
            Err(e) => {
                tracing::warn!(
                    path = %self.store_path.display(),
                    error = %e,
                    "override store file is not valid JSON; starting from an empty store"
                );
                self.data = StoreData::default();
            }
        }
        Ok(())
    }

    /// Persist the store if it has unsaved changes. A write failure bubbles up as an I/O error
    /// rather than being silently swallowed (§9 "Save-failure recovery"); the in-memory map
    /// stays updated regardless, and the caller may retry the save.
    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        if let Some(parent) = self.store_path.parent() {
            fs::create_dir_all(parent)?;
        }

        self.data.last_updated = Utc::now();
        let serialized = serde_json::to_string_pretty(&self.data)?;
        fs::write(&self.store_path, serialized)?;
        self.dirty = false;
        Ok(())
    }

    /// Record a suppression for `violation`, computing its fingerprint from `violation` and
    /// `file_path` (§4.7 `add`). Returns the fingerprint used as the store key.
    pub fn add(
        &mut self,
        violation: &Violation,
        file_path: &str,
        reason: impl Into<String>,
        added_by: impl Into<String>,
    ) -> String {
        let key = fingerprint(violation, file_path);
        let record = OverrideRecord::new(
            key.clone(),
            violation.rule.clone(),
            file_path.to_string(),
            violation.line,
            violation.message.clone(),
            reason,
            added_by,
            Some(violation.confidence),
        );
        self.insert(key.clone(), record);
        key
    }

    /// Record a suppression from an already-assembled record (CLI path, where only the
    /// fingerprint and its constituent fields are known, not a live `Violation`).
    pub fn add_record(&mut self, record: OverrideRecord) -> String {
        let key = record.violation_key.clone();
        self.insert(key.clone(), record);
        key
    }

    fn insert(&mut self, key: String, record: OverrideRecord) {
        self.data.overrides.insert(key, record);
        self.dirty = true;
    }

    pub fn remove(&mut self, fingerprint: &str) -> bool {
        let removed = self.data.overrides.remove(fingerprint).is_some();
        if removed {
            self.dirty = true;
        }
        removed
    }

    pub fn is_overridden(&self, violation: &Violation, file_path: &str) -> bool {
        self.data.overrides.contains_key(&fingerprint(violation, file_path))
    }

    pub fn is_overridden_fingerprint(&self, fingerprint: &str) -> bool {
        self.data.overrides.contains_key(fingerprint)
    }

    pub fn get(&self, violation: &Violation, file_path: &str) -> Option<&OverrideRecord> {
        self.data.overrides.get(&fingerprint(violation, file_path))
    }

    pub fn get_by_fingerprint(&self, fingerprint: &str) -> Option<&OverrideRecord> {
        self.data.overrides.get(fingerprint)
    }

    pub fn stats(&self) -> OverrideStats {
        let mut by_rule: HashMap<String, usize> = HashMap::new();
        let mut by_user: HashMap<String, usize> = HashMap::new();
        let cutoff = Utc::now() - Duration::days(7);
        let mut recent_7d = 0;

        for record in self.data.overrides.values() {
            *by_rule.entry(record.rule.clone()).or_insert(0) += 1;
            *by_user.entry(record.added_by.clone()).or_insert(0) += 1;
            if record.added_at >= cutoff {
                recent_7d += 1;
            }
        }

        OverrideStats { total: self.data.overrides.len(), by_rule, by_user, recent_7d }
    }

    /// Merge or replace from an exported document (§4.7 `import`). Records taken in are stamped
    /// with `importedAt`.
    pub fn import(&mut self, path: impl AsRef<Path>, merge: bool) -> Result<usize> {
        let contents = fs::read_to_string(path.as_ref())?;
        let incoming: ExportDocument = serde_json::from_str(&contents)
            .map_err(|e| crate::error::ValenceError::config(format!("invalid override export file: {e}")))?;

        if !merge {
            self.data.overrides.clear();
        }

        let now = Utc::now();
        let count = incoming.overrides.len();
        for (key, mut record) in incoming.overrides {
            record.imported_at = Some(now);
            self.data.overrides.insert(key, record);
        }
        self.dirty = true;
        Ok(count)
    }

    /// Snapshot the current override set as an [`ExportDocument`] (§4.7 `export`).
    pub fn export(&self) -> ExportDocument {
        ExportDocument {
            version: STORE_VERSION.to_string(),
            exported_at: Utc::now(),
            overrides: self.data.overrides.clone(),
        }
    }

    pub fn export_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let serialized = serde_json::to_string_pretty(&self.export())?;
        fs::write(path, serialized)?;
        Ok(())
    }
}
