pub mod backup;
pub mod check;
pub mod consolidate;
pub mod resolve;
pub mod scan_dups;

use std::path::PathBuf;

/// Flag wins, then farloc.toml, then the conventional default.
pub fn resolve_store_dir(flag: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = flag {
        return dir;
    }
    if let Ok(cfg) = farloc_config::load_config() {
        if let Some(dir) = cfg.translations.and_then(|t| t.directory) {
            return PathBuf::from(dir);
        }
    }
    PathBuf::from("locales")
}
