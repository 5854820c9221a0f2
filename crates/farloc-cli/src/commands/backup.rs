use std::path::Path;

use color_eyre::eyre::Result;
use owo_colors::OwoColorize;
use tracing::debug;

use farloc_store::BackupManager;

pub fn run_create(dir: &Path, description: &str) -> Result<()> {
    debug!(event = "backup_create", dir = ?dir);
    let info = BackupManager::new(dir).create_backup(description)?;
    println!("✔ backup {} ({} file(s))", info.id, info.files.len());
    Ok(())
}

pub fn run_list(dir: &Path, use_color: bool) -> Result<()> {
    let backups = BackupManager::new(dir).list_backups()?;
    if backups.is_empty() {
        println!("no backups");
        return Ok(());
    }
    for info in backups {
        if use_color {
            println!(
                "{}  {}  {} file(s)  {}",
                info.id.green(),
                info.timestamp.format("%Y-%m-%d %H:%M:%S"),
                info.files.len(),
                info.description
            );
        } else {
            println!(
                "{}  {}  {} file(s)  {}",
                info.id,
                info.timestamp.format("%Y-%m-%d %H:%M:%S"),
                info.files.len(),
                info.description
            );
        }
    }
    Ok(())
}

pub fn run_restore(dir: &Path, id: &str) -> Result<()> {
    debug!(event = "backup_restore", id = %id);
    let info = BackupManager::new(dir).restore_backup(id)?;
    println!("✔ restored {} file(s) from {}", info.files.len(), info.id);
    Ok(())
}

pub fn run_delete(dir: &Path, id: &str) -> Result<()> {
    BackupManager::new(dir).delete_backup(id)?;
    println!("✔ deleted {id}");
    Ok(())
}

pub fn run_cleanup(dir: &Path, keep: usize) -> Result<()> {
    let deleted = BackupManager::new(dir).cleanup_old_backups(keep)?;
    if deleted.is_empty() {
        println!("nothing to clean up");
    } else {
        println!("✔ deleted {} old backup(s)", deleted.len());
    }
    Ok(())
}
