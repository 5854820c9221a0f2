use std::path::PathBuf;

use color_eyre::eyre::{eyre, Result};
use owo_colors::OwoColorize;
use tracing::debug;

use farloc_services::duplicates::normalize_value;
use farloc_services::{consolidate, scan_store_duplicates, ConsolidationDecision};
use farloc_store::{BackupManager, LocaleStore};

pub struct ConsolidateArgs {
    pub dir: PathBuf,
    pub lang: String,
    pub value: String,
    pub keep: Option<String>,
    pub rename_to: Option<String>,
    pub keep_separate: bool,
    pub dry_run: bool,
    pub no_backup: bool,
    pub use_color: bool,
}

pub fn run_consolidate(args: ConsolidateArgs) -> Result<()> {
    debug!(
        event = "consolidate_args",
        lang = %args.lang,
        value = %args.value,
        keep = ?args.keep,
        rename_to = ?args.rename_to,
        keep_separate = args.keep_separate
    );

    let store = LocaleStore::new(&args.dir);
    let report = scan_store_duplicates(&store)?;
    let wanted = normalize_value(&args.value);
    let group = report
        .duplicates_by_locale
        .get(&args.lang)
        .and_then(|groups| {
            groups
                .iter()
                .find(|g| normalize_value(&g.value) == wanted)
        })
        .ok_or_else(|| {
            eyre!(
                "no duplicate group for value \"{}\" in locale {}",
                args.value,
                args.lang
            )
        })?;

    let decision = match (&args.keep, &args.rename_to, args.keep_separate) {
        (Some(target), None, false) => ConsolidationDecision::Consolidate {
            target_key: target.clone(),
        },
        (None, Some(new_key), false) => {
            // a rename introduces a brand-new key, so it goes through the
            // same naming rules as generated keys; the group's own keys are
            // about to disappear and do not count as taken
            let mut validator = farloc_validate::KeyValidator::default();
            let existing = store.read(&args.lang)?;
            validator.add_existing_keys(
                existing
                    .keys()
                    .filter(|k| !group.keys.contains(k))
                    .cloned(),
            );
            ConsolidationDecision::Rename {
                new_key: validator.normalize(new_key),
            }
        }
        (None, None, true) => ConsolidationDecision::KeepSeparate,
        _ => {
            return Err(eyre!(
                "pick exactly one of --keep, --rename-to, --keep-separate"
            ))
        }
    };

    if args.dry_run {
        println!(
            "DRY-RUN: {} group \"{}\" with keys [{}]",
            match &decision {
                ConsolidationDecision::Consolidate { target_key } =>
                    format!("would keep \"{target_key}\" for"),
                ConsolidationDecision::Rename { new_key } =>
                    format!("would rename to \"{new_key}\" for"),
                ConsolidationDecision::KeepSeparate => "would leave".to_string(),
            },
            group.value,
            group.keys.join(", ")
        );
        return Ok(());
    }

    let cfg = farloc_config::load_config().unwrap_or_default();
    let create_backups = cfg
        .processing
        .and_then(|p| p.create_backups)
        .unwrap_or(true);
    let backups = BackupManager::for_store(&store);
    let backups_ref = (create_backups && !args.no_backup).then_some(&backups);

    let outcome = consolidate(&store, backups_ref, &args.lang, group, &decision)?;
    if !outcome.applied {
        println!("✔ group left separate, store untouched");
        return Ok(());
    }
    if let Some(id) = &outcome.backup_id {
        println!("backup: {id}");
    }
    let kept = outcome.kept.unwrap_or_default();
    if args.use_color {
        println!(
            "✔ \"{}\" now lives under {}; removed {}",
            outcome.value.cyan(),
            kept.green(),
            outcome.removed.join(", ")
        );
    } else {
        println!(
            "✔ \"{}\" now lives under {}; removed {}",
            outcome.value,
            kept,
            outcome.removed.join(", ")
        );
    }
    Ok(())
}
