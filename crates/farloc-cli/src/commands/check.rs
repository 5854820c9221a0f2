use std::path::Path;

use color_eyre::eyre::{eyre, Result};
use owo_colors::OwoColorize;
use tracing::debug;

use farloc_domain::{StoreCheckReport, StoreIssue, SCHEMA_VERSION};
use farloc_store::LocaleStore;

pub fn run_check(dir: &Path, lang: Option<&str>, use_color: bool) -> Result<()> {
    debug!(event = "check_args", dir = ?dir, lang = ?lang);

    let store = LocaleStore::new(dir);
    let locales = match lang {
        Some(l) => vec![l.to_string()],
        None => store.locales()?,
    };

    let mut report = StoreCheckReport {
        schema_version: SCHEMA_VERSION,
        checked: 0,
        issues: Vec::new(),
    };
    for locale in &locales {
        report.checked += 1;
        let structure = store.validate_structure(locale)?;
        for error in structure.errors {
            report.issues.push(StoreIssue {
                locale: locale.clone(),
                key: None,
                kind: "structural".to_string(),
                message: error,
            });
        }
    }

    if report.is_valid() {
        println!("✔ {} locale file(s) clean", report.checked);
        return Ok(());
    }
    for issue in &report.issues {
        if use_color {
            println!(
                "{} [{}] {}: {}",
                "✖".red(),
                issue.kind,
                issue.locale.green(),
                issue.message
            );
        } else {
            println!("✖ [{}] {}: {}", issue.kind, issue.locale, issue.message);
        }
    }
    Err(eyre!("{} issue(s) found", report.issues.len()))
}
