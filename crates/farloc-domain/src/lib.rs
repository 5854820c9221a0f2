use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// Result of asking whether a key or value already exists in a locale.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DuplicateCheckResult {
    pub is_duplicate: bool,
    /// First key already holding the queried value, when one exists.
    pub existing_key: Option<String>,
    /// Near matches above the similarity threshold, capped at 5.
    pub similar_keys: Vec<String>,
}

impl DuplicateCheckResult {
    pub fn clean() -> Self {
        DuplicateCheckResult {
            is_duplicate: false,
            existing_key: None,
            similar_keys: Vec::new(),
        }
    }
}

/// A group of keys sharing one normalized value within one locale.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DuplicateValue {
    pub value: String,
    pub keys: Vec<String>,
    pub locales: Vec<String>,
}

/// Report from a store-level duplicate scan.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DuplicateScanReport {
    pub schema_version: u32,
    pub total_duplicates: usize,
    pub duplicates_by_locale: BTreeMap<String, Vec<DuplicateValue>>,
    pub suggestions: Vec<String>,
}

/// Outcome of one batch key-resolution run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BatchSummary {
    pub schema_version: u32,
    pub resolved: usize,
    pub fallback: usize,
    /// Per-item warnings recorded for inputs that failed full resolution.
    pub warnings: Vec<String>,
}

/// Manifest of one store snapshot. Owns copies of the locale files listed in
/// `files`; restore overwrites exactly those files and nothing else.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BackupInfo {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub files: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StoreIssue {
    pub locale: String,
    pub key: Option<String>,
    /// Machine-readable category: "malformed" | "non-string" | "io"
    pub kind: String,
    pub message: String,
}

/// Report from a structural check of the persisted locale files.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StoreCheckReport {
    pub schema_version: u32,
    pub checked: usize,
    pub issues: Vec<StoreIssue>,
}

impl StoreCheckReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}
