//! Sweeps persisted locale files for values already committed under more
//! than one key, and applies explicit consolidation decisions. Works off the
//! files directly, independent of any in-memory resolution registry.

use std::collections::BTreeMap;

use tracing::info;

use farloc_core::Result;
use farloc_domain::{DuplicateScanReport, DuplicateValue, SCHEMA_VERSION};
use farloc_store::{BackupManager, LocaleStore};

use crate::duplicates::normalize_value;

/// What to do with one group of duplicate-valued keys. Every mutation is an
/// explicit decision; ambiguous groups are never merged automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsolidationDecision {
    /// Keep exactly `target_key` mapped to the value, delete the others.
    Consolidate { target_key: String },
    /// Introduce `new_key` for the value, delete all old keys.
    Rename { new_key: String },
    /// Leave the group as it is.
    KeepSeparate,
}

#[derive(Debug, Clone)]
pub struct ConsolidationOutcome {
    pub locale: String,
    pub value: String,
    /// Key mapping to the value after the decision, when one survives.
    pub kept: Option<String>,
    pub removed: Vec<String>,
    pub backup_id: Option<String>,
    pub applied: bool,
}

/// Group every locale's keys by normalized value and report the groups that
/// share one value between two or more keys.
pub fn scan_store_duplicates(store: &LocaleStore) -> Result<DuplicateScanReport> {
    let mut report = DuplicateScanReport {
        schema_version: SCHEMA_VERSION,
        total_duplicates: 0,
        duplicates_by_locale: BTreeMap::new(),
        suggestions: Vec::new(),
    };

    for locale in store.locales()? {
        let map = store.read(&locale)?;
        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, value) in &map {
            groups
                .entry(normalize_value(value))
                .or_default()
                .push(key.clone());
        }

        let mut duplicates = Vec::new();
        for keys in groups.into_values() {
            if keys.len() < 2 {
                continue;
            }
            let value = keys
                .first()
                .and_then(|k| map.get(k))
                .cloned()
                .unwrap_or_default();
            report.suggestions.push(format!(
                "{locale}: keys [{}] share the value \"{value}\"; consider consolidating into \"{}\"",
                keys.join(", "),
                keys[0]
            ));
            duplicates.push(DuplicateValue {
                value,
                keys,
                locales: vec![locale.clone()],
            });
        }
        if !duplicates.is_empty() {
            report.total_duplicates += duplicates.len();
            report.duplicates_by_locale.insert(locale, duplicates);
        }
    }
    Ok(report)
}

/// Apply one decision to one duplicate group. When a backup manager is
/// passed, a snapshot is taken before the store is touched; `KeepSeparate`
/// never mutates and never snapshots.
pub fn consolidate(
    store: &LocaleStore,
    backups: Option<&BackupManager>,
    locale: &str,
    group: &DuplicateValue,
    decision: &ConsolidationDecision,
) -> Result<ConsolidationOutcome> {
    if let ConsolidationDecision::KeepSeparate = decision {
        info!(
            event = "consolidation_skipped",
            locale = %locale,
            value = %group.value,
            keys = ?group.keys
        );
        return Ok(ConsolidationOutcome {
            locale: locale.to_string(),
            value: group.value.clone(),
            kept: None,
            removed: Vec::new(),
            backup_id: None,
            applied: false,
        });
    }

    let backup_id = match backups {
        Some(mgr) => {
            let info = mgr.create_backup(&format!("before consolidating \"{}\"", group.value))?;
            info!(event = "backup_created", id = %info.id);
            Some(info.id)
        }
        None => None,
    };

    let mut map = store.read(locale)?;
    let (kept, removed) = match decision {
        ConsolidationDecision::Consolidate { target_key } => {
            let mut removed = Vec::new();
            for key in &group.keys {
                if key != target_key && map.remove(key).is_some() {
                    removed.push(key.clone());
                }
            }
            map.insert(target_key.clone(), group.value.clone());
            (Some(target_key.clone()), removed)
        }
        ConsolidationDecision::Rename { new_key } => {
            let mut removed = Vec::new();
            for key in &group.keys {
                if map.remove(key).is_some() {
                    removed.push(key.clone());
                }
            }
            map.insert(new_key.clone(), group.value.clone());
            (Some(new_key.clone()), removed)
        }
        ConsolidationDecision::KeepSeparate => unreachable!("handled above"),
    };
    store.write(locale, &map)?;
    info!(
        event = "consolidation_applied",
        locale = %locale,
        kept = ?kept,
        removed = ?removed
    );

    Ok(ConsolidationOutcome {
        locale: locale.to_string(),
        value: group.value.clone(),
        kept,
        removed,
        backup_id,
        applied: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seeded_store() -> (TempDir, LocaleStore) {
        let tmp = TempDir::new().unwrap();
        let store = LocaleStore::new(tmp.path());
        store
            .write(
                "fa",
                &BTreeMap::from([
                    ("a".to_string(), "x".to_string()),
                    ("b".to_string(), "x".to_string()),
                    ("c".to_string(), "y".to_string()),
                ]),
            )
            .unwrap();
        (tmp, store)
    }

    #[test]
    fn scan_partitions_duplicates_correctly() {
        let (_tmp, store) = seeded_store();
        let report = scan_store_duplicates(&store).unwrap();
        assert_eq!(report.total_duplicates, 1);
        let groups = &report.duplicates_by_locale["fa"];
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].value, "x");
        assert_eq!(groups[0].keys, vec!["a", "b"]);
        assert!(!report.suggestions.is_empty());
    }

    #[test]
    fn scan_groups_values_after_normalization() {
        let (_tmp, store) = seeded_store();
        store
            .update("fa", [("d".to_string(), "  X! ".to_string())])
            .unwrap();
        let report = scan_store_duplicates(&store).unwrap();
        let groups = &report.duplicates_by_locale["fa"];
        assert_eq!(groups[0].keys, vec!["a", "b", "d"]);
    }

    #[test]
    fn consolidate_keeps_exactly_one_key() {
        let (_tmp, store) = seeded_store();
        let group = DuplicateValue {
            value: "x".to_string(),
            keys: vec!["a".to_string(), "b".to_string()],
            locales: vec!["fa".to_string()],
        };
        let outcome = consolidate(
            &store,
            None,
            "fa",
            &group,
            &ConsolidationDecision::Consolidate {
                target_key: "a".to_string(),
            },
        )
        .unwrap();
        assert!(outcome.applied);
        assert_eq!(outcome.removed, vec!["b"]);

        let map = store.read("fa").unwrap();
        assert_eq!(map.get("a").map(String::as_str), Some("x"));
        assert!(!map.contains_key("b"));
        assert_eq!(map.get("c").map(String::as_str), Some("y"));
        assert_eq!(
            map.values().filter(|v| v.as_str() == "x").count(),
            1,
            "exactly one surviving key maps to the value"
        );
    }

    #[test]
    fn rename_replaces_all_old_keys() {
        let (_tmp, store) = seeded_store();
        let group = DuplicateValue {
            value: "x".to_string(),
            keys: vec!["a".to_string(), "b".to_string()],
            locales: vec!["fa".to_string()],
        };
        consolidate(
            &store,
            None,
            "fa",
            &group,
            &ConsolidationDecision::Rename {
                new_key: "shared_x".to_string(),
            },
        )
        .unwrap();

        let map = store.read("fa").unwrap();
        assert_eq!(map.get("shared_x").map(String::as_str), Some("x"));
        assert!(!map.contains_key("a"));
        assert!(!map.contains_key("b"));
    }

    #[test]
    fn keep_separate_mutates_nothing() {
        let (_tmp, store) = seeded_store();
        let before = store.read("fa").unwrap();
        let group = DuplicateValue {
            value: "x".to_string(),
            keys: vec!["a".to_string(), "b".to_string()],
            locales: vec!["fa".to_string()],
        };
        let outcome =
            consolidate(&store, None, "fa", &group, &ConsolidationDecision::KeepSeparate).unwrap();
        assert!(!outcome.applied);
        assert_eq!(store.read("fa").unwrap(), before);
    }

    #[test]
    fn consolidation_snapshots_when_backups_enabled() {
        let (_tmp, store) = seeded_store();
        let backups = BackupManager::for_store(&store);
        let group = DuplicateValue {
            value: "x".to_string(),
            keys: vec!["a".to_string(), "b".to_string()],
            locales: vec!["fa".to_string()],
        };
        let outcome = consolidate(
            &store,
            Some(&backups),
            "fa",
            &group,
            &ConsolidationDecision::Consolidate {
                target_key: "a".to_string(),
            },
        )
        .unwrap();

        let id = outcome.backup_id.expect("backup id recorded");
        backups.restore_backup(&id).unwrap();
        let map = store.read("fa").unwrap();
        assert!(map.contains_key("b"), "restore brings the old keys back");
    }
}
