//! Snapshot backups of the locale store. One subdirectory per snapshot under
//! `.backups/`, each holding copies of the locale files plus `manifest.json`.
//! Restore trusts the manifest, never the directory listing.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;

use farloc_domain::BackupInfo;

use crate::{io_err, LocaleStore, Result, StoreError};

pub const BACKUPS_DIR: &str = ".backups";
const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone)]
pub struct BackupManager {
    store_dir: PathBuf,
    backups_dir: PathBuf,
}

impl BackupManager {
    pub fn new(store_dir: impl Into<PathBuf>) -> Self {
        let store_dir = store_dir.into();
        let backups_dir = store_dir.join(BACKUPS_DIR);
        BackupManager {
            store_dir,
            backups_dir,
        }
    }

    pub fn for_store(store: &LocaleStore) -> Self {
        Self::new(store.dir())
    }

    fn snapshot_dir(&self, id: &str) -> PathBuf {
        self.backups_dir.join(id)
    }

    /// Snapshot every current locale file. Locale files that do not exist yet
    /// are simply absent from the manifest; an empty store still snapshots.
    pub fn create_backup(&self, description: &str) -> Result<BackupInfo> {
        let timestamp = Utc::now();
        let base = format!("backup_{}", timestamp.format("%Y%m%d_%H%M%S"));
        let mut id = base.clone();
        let mut n = 1usize;
        while self.snapshot_dir(&id).exists() {
            id = format!("{base}_{n}");
            n += 1;
        }
        let snapshot = self.snapshot_dir(&id);
        fs::create_dir_all(&snapshot).map_err(|e| io_err(&snapshot, e))?;

        let store = LocaleStore::new(&self.store_dir);
        let mut files = Vec::new();
        for locale in store.locales()? {
            let file = format!("{locale}.json");
            let src = self.store_dir.join(&file);
            let dst = snapshot.join(&file);
            fs::copy(&src, &dst).map_err(|e| io_err(&src, e))?;
            files.push(file);
        }

        let info = BackupInfo {
            id,
            timestamp,
            files,
            description: description.to_string(),
        };
        let manifest = snapshot.join(MANIFEST_FILE);
        let mut bytes = serde_json::to_vec_pretty(&info).map_err(|source| {
            StoreError::Malformed {
                path: manifest.clone(),
                source,
            }
        })?;
        bytes.push(b'\n');
        fs::write(&manifest, bytes).map_err(|e| io_err(&manifest, e))?;
        Ok(info)
    }

    fn read_manifest(&self, id: &str) -> Result<BackupInfo> {
        let snapshot = self.snapshot_dir(id);
        if !snapshot.exists() {
            return Err(StoreError::BackupNotFound { id: id.to_string() });
        }
        let manifest = snapshot.join(MANIFEST_FILE);
        let content = fs::read_to_string(&manifest).map_err(|e| io_err(&manifest, e))?;
        serde_json::from_str(&content).map_err(|source| StoreError::Malformed {
            path: manifest,
            source,
        })
    }

    /// All snapshots, newest first. Snapshots with an unreadable manifest are
    /// skipped here; restoring them fails loudly instead.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let entries =
            fs::read_dir(&self.backups_dir).map_err(|e| io_err(&self.backups_dir, e))?;
        let mut out = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_err(&self.backups_dir, e))?;
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if let Ok(info) = self.read_manifest(name) {
                    out.push(info);
                }
            }
        }
        out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| b.id.cmp(&a.id)));
        Ok(out)
    }

    /// Overwrite exactly the manifest-listed files from the snapshot. Every
    /// listed file must still exist in the snapshot, checked up front so a
    /// corrupt snapshot aborts before touching the store.
    pub fn restore_backup(&self, id: &str) -> Result<BackupInfo> {
        let info = self.read_manifest(id)?;
        let snapshot = self.snapshot_dir(id);
        for file in &info.files {
            if !snapshot.join(file).exists() {
                return Err(StoreError::SnapshotCorrupt {
                    id: id.to_string(),
                    file: file.clone(),
                });
            }
        }
        fs::create_dir_all(&self.store_dir).map_err(|e| io_err(&self.store_dir, e))?;
        for file in &info.files {
            let src = snapshot.join(file);
            let dst = self.store_dir.join(file);
            fs::copy(&src, &dst).map_err(|e| io_err(&src, e))?;
        }
        Ok(info)
    }

    pub fn delete_backup(&self, id: &str) -> Result<()> {
        let snapshot = self.snapshot_dir(id);
        if !snapshot.exists() {
            return Err(StoreError::BackupNotFound { id: id.to_string() });
        }
        fs::remove_dir_all(&snapshot).map_err(|e| io_err(&snapshot, e))
    }

    /// Keep the `keep` newest snapshots, delete the rest. No-op when the
    /// count is already within bounds. Returns the deleted ids.
    pub fn cleanup_old_backups(&self, keep: usize) -> Result<Vec<String>> {
        let backups = self.list_backups()?;
        let mut deleted = Vec::new();
        for info in backups.into_iter().skip(keep) {
            self.delete_backup(&info.id)?;
            deleted.push(info.id);
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn seeded_store() -> (TempDir, LocaleStore, BackupManager) {
        let tmp = TempDir::new().unwrap();
        let store = LocaleStore::new(tmp.path());
        store
            .write(
                "fa",
                &BTreeMap::from([("greet".to_string(), "سلام".to_string())]),
            )
            .unwrap();
        store
            .write(
                "en",
                &BTreeMap::from([("greet".to_string(), "hello".to_string())]),
            )
            .unwrap();
        let backups = BackupManager::for_store(&store);
        (tmp, store, backups)
    }

    #[test]
    fn backup_round_trip_restores_pre_mutation_state() {
        let (_tmp, store, backups) = seeded_store();
        let before = store.read("fa").unwrap();

        let info = backups.create_backup("before edit").unwrap();
        assert_eq!(info.files.len(), 2);

        store
            .write(
                "fa",
                &BTreeMap::from([("greet".to_string(), "درود".to_string())]),
            )
            .unwrap();
        assert_ne!(store.read("fa").unwrap(), before);

        backups.restore_backup(&info.id).unwrap();
        assert_eq!(store.read("fa").unwrap(), before);
    }

    #[test]
    fn manifest_lists_exactly_the_copied_files() {
        let (_tmp, _store, backups) = seeded_store();
        let info = backups.create_backup("snap").unwrap();
        let mut files = info.files.clone();
        files.sort();
        assert_eq!(files, vec!["en.json", "fa.json"]);
    }

    #[test]
    fn restore_of_corrupt_snapshot_is_a_hard_error() {
        let (tmp, _store, backups) = seeded_store();
        let info = backups.create_backup("snap").unwrap();
        std::fs::remove_file(
            tmp.path()
                .join(BACKUPS_DIR)
                .join(&info.id)
                .join("fa.json"),
        )
        .unwrap();

        assert!(matches!(
            backups.restore_backup(&info.id),
            Err(StoreError::SnapshotCorrupt { file, .. }) if file == "fa.json"
        ));
    }

    #[test]
    fn list_is_newest_first_and_cleanup_keeps_n() {
        let (_tmp, _store, backups) = seeded_store();
        let a = backups.create_backup("first").unwrap();
        let b = backups.create_backup("second").unwrap();
        let c = backups.create_backup("third").unwrap();

        let listed = backups.list_backups().unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].id, c.id);

        let deleted = backups.cleanup_old_backups(2).unwrap();
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0], a.id);

        assert!(matches!(
            backups.restore_backup(&a.id),
            Err(StoreError::BackupNotFound { .. })
        ));
        assert!(backups.restore_backup(&b.id).is_ok());
    }

    #[test]
    fn cleanup_is_noop_within_bounds() {
        let (_tmp, _store, backups) = seeded_store();
        backups.create_backup("only").unwrap();
        assert!(backups.cleanup_old_backups(5).unwrap().is_empty());
        assert_eq!(backups.list_backups().unwrap().len(), 1);
    }

    #[test]
    fn unknown_backup_id_errors() {
        let (_tmp, _store, backups) = seeded_store();
        assert!(matches!(
            backups.delete_backup("backup_nope"),
            Err(StoreError::BackupNotFound { .. })
        ));
    }
}
