use std::path::PathBuf;

use color_eyre::eyre::{eyre, Result, WrapErr};
use owo_colors::OwoColorize;
use tracing::{debug, info, warn};

use farloc_core::TextMatch;
use farloc_services::{seed_resolver_from_store, KeyResolver, SimilarityThresholds};
use farloc_store::{BackupManager, LocaleStore};
use farloc_translit::SynthesisOptions;
use farloc_validate::KeyValidationRules;

pub struct ResolveArgs {
    pub dir: PathBuf,
    pub matches: PathBuf,
    pub lang: Option<String>,
    pub out_json: Option<PathBuf>,
    pub apply: bool,
    pub dry_run: bool,
    pub no_backup: bool,
    pub max_length: Option<usize>,
    pub prefix: Option<String>,
    pub no_context: bool,
    pub use_color: bool,
}

pub fn run_resolve(args: ResolveArgs) -> Result<()> {
    debug!(
        event = "resolve_args",
        matches = ?args.matches,
        lang = ?args.lang,
        apply = args.apply,
        dry_run = args.dry_run
    );

    let cfg = farloc_config::load_config().unwrap_or_default();
    let keys_cfg = cfg.keys.unwrap_or_default();
    if let Some(strategy) = keys_cfg.strategy.as_deref() {
        if strategy != "transliteration" {
            warn!(
                event = "unknown_strategy",
                strategy = %strategy,
                "falling back to transliteration"
            );
        }
    }

    let lang = args
        .lang
        .or(cfg.source_lang)
        .ok_or_else(|| eyre!("no locale given: pass --lang or set source_lang in farloc.toml"))?;

    let opts = SynthesisOptions {
        max_length: args
            .max_length
            .or(keys_cfg.max_length)
            .unwrap_or_else(|| SynthesisOptions::default().max_length),
        use_context: !args.no_context && keys_cfg.use_context.unwrap_or(true),
        prefix: args.prefix.or(keys_cfg.prefix),
    };
    let rules = KeyValidationRules {
        max_length: opts.max_length,
        ..Default::default()
    };
    let dup_cfg = cfg.duplicates.unwrap_or_default();
    let thresholds = SimilarityThresholds {
        key: dup_cfg
            .key_similarity
            .unwrap_or(SimilarityThresholds::default().key),
        value: dup_cfg
            .value_similarity
            .unwrap_or(SimilarityThresholds::default().value),
    };

    let content = std::fs::read_to_string(&args.matches)
        .wrap_err_with(|| format!("cannot read matches file {}", args.matches.display()))?;
    let matches: Vec<TextMatch> = serde_json::from_str(&content)
        .wrap_err_with(|| format!("matches file {} is not valid JSON", args.matches.display()))?;
    info!(event = "matches_loaded", count = matches.len());

    let store = LocaleStore::new(&args.dir);
    let mut resolver = KeyResolver::new(opts, rules, thresholds);
    seed_resolver_from_store(&mut resolver, &store)?;

    let (keys, summary) = resolver.resolve_batch(&matches, &lang);

    if let Some(path) = &args.out_json {
        let mut bytes = serde_json::to_vec_pretty(&keys)?;
        bytes.push(b'\n');
        std::fs::write(path, bytes)
            .wrap_err_with(|| format!("cannot write {}", path.display()))?;
        println!("✔ keys saved to {}", path.display());
    } else {
        for k in &keys {
            if args.use_color {
                println!(
                    "{}  {}  ({:.2})",
                    k.key.green(),
                    k.original_text,
                    k.confidence
                );
            } else {
                println!("{}  {}  ({:.2})", k.key, k.original_text, k.confidence);
            }
        }
    }

    for w in &summary.warnings {
        if args.use_color {
            eprintln!("{} {}", "⚠".yellow(), w);
        } else {
            eprintln!("⚠ {}", w);
        }
    }

    if args.apply {
        let entries: Vec<(String, String)> = keys
            .iter()
            .map(|k| (k.key.clone(), k.original_text.clone()))
            .collect();
        if args.dry_run {
            println!(
                "DRY-RUN: would write {} key(s) to {}",
                entries.len(),
                store.locale_path(&lang).display()
            );
            return Ok(());
        }
        let create_backups = cfg
            .processing
            .and_then(|p| p.create_backups)
            .unwrap_or(true);
        if create_backups && !args.no_backup {
            let backups = BackupManager::for_store(&store);
            let info = backups.create_backup("before resolve --apply")?;
            info!(event = "backup_created", id = %info.id);
        }
        let (added, changed) = store.update(&lang, entries)?;
        println!(
            "✔ store updated: {} added, {} changed in {}",
            added,
            changed,
            store.locale_path(&lang).display()
        );
    }

    println!(
        "resolved {} key(s), {} fallback(s)",
        summary.resolved, summary.fallback
    );
    Ok(())
}
