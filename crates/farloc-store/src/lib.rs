//! Per-locale translation stores: one flat JSON object per locale, keys
//! sorted, 2-space indent. Writes go through a temp file and rename so a
//! crashed run never leaves a half-written store behind.

pub mod backup;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use backup::BackupManager;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: malformed locale file: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path}: top level is not a flat object")]
    NotAnObject { path: PathBuf },
    #[error("{path}: value for key \"{key}\" is not a string")]
    NonStringValue { path: PathBuf, key: String },
    #[error("backup \"{id}\" not found")]
    BackupNotFound { id: String },
    #[error("backup \"{id}\" is corrupt: snapshot is missing \"{file}\"")]
    SnapshotCorrupt { id: String, file: String },
}

pub type Result<T> = std::result::Result<T, StoreError>;

pub(crate) fn io_err(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Structural check result for one locale file.
#[derive(Debug, Clone)]
pub struct StructureReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct LocaleStore {
    dir: PathBuf,
}

impl LocaleStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        LocaleStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn locale_path(&self, locale: &str) -> PathBuf {
        self.dir.join(format!("{locale}.json"))
    }

    /// Locales present on disk, sorted. The `.backups` subdirectory is not a
    /// locale and is never enumerated.
    pub fn locales(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        let entries = fs::read_dir(&self.dir).map_err(|e| io_err(&self.dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| io_err(&self.dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                out.push(stem.to_string());
            }
        }
        out.sort();
        Ok(out)
    }

    /// Read one locale's map. A missing file is an empty store, not an error;
    /// malformed content is a hard error carrying the path.
    pub fn read(&self, locale: &str) -> Result<BTreeMap<String, String>> {
        let path = self.locale_path(locale);
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        let value: serde_json::Value =
            serde_json::from_str(&content).map_err(|source| StoreError::Malformed {
                path: path.clone(),
                source,
            })?;
        let obj = match value {
            serde_json::Value::Object(map) => map,
            _ => return Err(StoreError::NotAnObject { path }),
        };
        let mut out = BTreeMap::new();
        for (key, value) in obj {
            match value {
                serde_json::Value::String(s) => {
                    out.insert(key, s);
                }
                _ => return Err(StoreError::NonStringValue { path, key }),
            }
        }
        Ok(out)
    }

    /// Write one locale's map, creating the parent directory as needed.
    /// Keys serialize sorted (BTreeMap) with 2-space indentation.
    pub fn write(&self, locale: &str, entries: &BTreeMap<String, String>) -> Result<()> {
        let path = self.locale_path(locale);
        let mut bytes =
            serde_json::to_vec_pretty(entries).map_err(|source| StoreError::Malformed {
                path: path.clone(),
                source,
            })?;
        bytes.push(b'\n');
        write_atomic(&path, &bytes)
    }

    /// Read-merge-write. New entries win on key collision. Returns
    /// (added, changed) counts.
    pub fn update<I>(&self, locale: &str, new_entries: I) -> Result<(usize, usize)>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut map = self.read(locale)?;
        let mut added = 0usize;
        let mut changed = 0usize;
        for (key, value) in new_entries {
            match map.insert(key, value.clone()) {
                None => added += 1,
                Some(old) if old != value => changed += 1,
                Some(_) => {}
            }
        }
        self.write(locale, &map)?;
        Ok((added, changed))
    }

    /// Check that the persisted file parses as a flat string-to-string
    /// object. Problems are reported, not raised; only I/O failures err.
    pub fn validate_structure(&self, locale: &str) -> Result<StructureReport> {
        let path = self.locale_path(locale);
        let mut errors = Vec::new();
        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
            match serde_json::from_str::<serde_json::Value>(&content) {
                Err(e) => errors.push(format!("malformed JSON: {e}")),
                Ok(serde_json::Value::Object(map)) => {
                    for (key, value) in map {
                        if !value.is_string() {
                            errors.push(format!("value for key \"{key}\" is not a string"));
                        }
                    }
                }
                Ok(_) => errors.push("top level is not an object".to_string()),
            }
        }
        Ok(StructureReport {
            is_valid: errors.is_empty(),
            errors,
        })
    }
}

/// Write via sibling temp file + rename. The store is never observable in a
/// half-written state.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes).map_err(|e| io_err(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| io_err(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, LocaleStore) {
        let tmp = TempDir::new().unwrap();
        let store = LocaleStore::new(tmp.path());
        (tmp, store)
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let (_tmp, store) = store();
        assert!(store.read("fa").unwrap().is_empty());
    }

    #[test]
    fn write_then_read_round_trips_sorted() {
        let (_tmp, store) = store();
        let mut map = BTreeMap::new();
        map.insert("b_key".to_string(), "دو".to_string());
        map.insert("a_key".to_string(), "یک".to_string());
        store.write("fa", &map).unwrap();

        let content = std::fs::read_to_string(store.locale_path("fa")).unwrap();
        let a = content.find("a_key").unwrap();
        let b = content.find("b_key").unwrap();
        assert!(a < b, "keys must serialize alphabetically");
        assert!(content.contains("  \"a_key\""), "2-space indent expected");
        assert!(content.ends_with('\n'));

        assert_eq!(store.read("fa").unwrap(), map);
    }

    #[test]
    fn update_merges_with_new_entries_winning() {
        let (_tmp, store) = store();
        let mut map = BTreeMap::new();
        map.insert("greet".to_string(), "سلام".to_string());
        map.insert("keep".to_string(), "ثابت".to_string());
        store.write("fa", &map).unwrap();

        let (added, changed) = store
            .update(
                "fa",
                [
                    ("greet".to_string(), "درود".to_string()),
                    ("bye".to_string(), "خداحافظ".to_string()),
                ],
            )
            .unwrap();
        assert_eq!((added, changed), (1, 1));

        let map = store.read("fa").unwrap();
        assert_eq!(map.get("greet").map(String::as_str), Some("درود"));
        assert_eq!(map.get("keep").map(String::as_str), Some("ثابت"));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn malformed_file_is_a_hard_error() {
        let (_tmp, store) = store();
        std::fs::write(store.locale_path("fa"), "{ not json").unwrap();
        assert!(matches!(
            store.read("fa"),
            Err(StoreError::Malformed { .. })
        ));
    }

    #[test]
    fn non_string_values_are_reported_by_key() {
        let (_tmp, store) = store();
        std::fs::write(
            store.locale_path("fa"),
            r#"{"ok": "درست", "bad": 42}"#,
        )
        .unwrap();

        assert!(matches!(
            store.read("fa"),
            Err(StoreError::NonStringValue { key, .. }) if key == "bad"
        ));

        let report = store.validate_structure("fa").unwrap();
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("bad"));
    }

    #[test]
    fn validate_structure_accepts_missing_and_clean_files() {
        let (_tmp, store) = store();
        assert!(store.validate_structure("fa").unwrap().is_valid);
        store
            .write("fa", &BTreeMap::from([("k".to_string(), "v".to_string())]))
            .unwrap();
        assert!(store.validate_structure("fa").unwrap().is_valid);
    }

    #[test]
    fn locales_skips_backups_dir() {
        let (_tmp, store) = store();
        store.write("fa", &BTreeMap::new()).unwrap();
        store.write("en", &BTreeMap::new()).unwrap();
        std::fs::create_dir_all(store.dir().join(".backups")).unwrap();
        assert_eq!(store.locales().unwrap(), vec!["en", "fa"]);
    }
}
