use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Workspace-wide result alias.
pub type Result<T> = color_eyre::eyre::Result<T>;

/// One piece of translatable Persian text found by the (external) extractor.
/// Immutable input to key resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextMatch {
    pub text: String,
    /// Absolute or relative path to the file where this text comes from
    pub path: PathBuf,
    /// 1-based line number if available
    pub line: Option<usize>,
    /// 1-based column number if available
    pub column: Option<usize>,
    /// Short hint about where the text sits (e.g. "btn", "label")
    pub context: Option<String>,
}

/// A resolved translation identifier, handed to the (external) rewrite step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedKey {
    pub key: String,
    pub original_text: String,
    /// Heuristic quality score in [0, 1]; not a probability.
    pub confidence: f32,
    /// Alternative candidates, best first.
    pub suggestions: Vec<String>,
    pub path: Option<PathBuf>,
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub context: Option<String>,
}

/// One row of one locale's translation store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationEntry {
    pub key: String,
    pub value: String,
    pub locale: String,
    pub metadata: EntryMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryMetadata {
    pub added: DateTime<Utc>,
    pub source_file: Option<PathBuf>,
    pub confidence: Option<f32>,
}

/// Keep a lightweight error type for crates that still import it.
#[derive(Debug, Error)]
pub enum FarlocError {
    #[error("{0}")]
    Other(String),
}
