//! High-level operations over the leaf crates: key resolution, duplicate
//! tracking, and store consolidation. Exposes stable entrypoints for the CLI
//! without it importing leaf crates directly.

pub mod duplicates;
pub mod resolve;
pub mod scan;

pub use farloc_core::{GeneratedKey, Result, TextMatch};

pub use duplicates::{DuplicateResolver, SimilarityThresholds};
pub use resolve::{KeyResolver, ResolveOutcome};
pub use scan::{consolidate, scan_store_duplicates, ConsolidationDecision, ConsolidationOutcome};

use std::collections::BTreeMap;

use farloc_store::LocaleStore;

/// Read every locale file and seed a resolver with the persisted state.
pub fn seed_resolver_from_store(resolver: &mut KeyResolver, store: &LocaleStore) -> Result<()> {
    let mut maps: Vec<(String, BTreeMap<String, String>)> = Vec::new();
    for locale in store.locales()? {
        let map = store.read(&locale)?;
        maps.push((locale, map));
    }
    resolver.load_existing(maps.iter().map(|(l, m)| (l.as_str(), m)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn seeding_from_store_blocks_existing_keys() {
        let tmp = TempDir::new().unwrap();
        let store = LocaleStore::new(tmp.path());
        store
            .write(
                "fa",
                &BTreeMap::from([("btn_save".to_string(), "ذخیره".to_string())]),
            )
            .unwrap();

        let mut resolver = KeyResolver::default();
        seed_resolver_from_store(&mut resolver, &store).unwrap();

        let outcome = resolver.resolve("ذخیره کن", "fa", Some("btn")).unwrap();
        assert_ne!(outcome.final_key, "btn_save");
    }
}
