use std::path::Path;

use color_eyre::eyre::Result;
use owo_colors::OwoColorize;
use tracing::debug;

use farloc_services::scan_store_duplicates;
use farloc_store::LocaleStore;

pub fn run_scan_dups(
    dir: &Path,
    lang: Option<&str>,
    format: &str,
    use_color: bool,
) -> Result<()> {
    debug!(event = "scan_dups_args", dir = ?dir, lang = ?lang, format = %format);

    let store = LocaleStore::new(dir);
    let mut report = scan_store_duplicates(&store)?;
    if let Some(lang) = lang {
        report.duplicates_by_locale.retain(|l, _| l == lang);
        report.total_duplicates = report
            .duplicates_by_locale
            .values()
            .map(Vec::len)
            .sum();
        report.suggestions.retain(|s| s.starts_with(lang));
    }

    match format {
        "json" => {
            serde_json::to_writer_pretty(std::io::stdout().lock(), &report)?;
            println!();
        }
        _ => {
            if report.total_duplicates == 0 {
                println!("✔ no duplicate values found");
                return Ok(());
            }
            for (locale, groups) in &report.duplicates_by_locale {
                println!("{locale}: {} duplicate value(s)", groups.len());
                for g in groups {
                    if use_color {
                        println!("  \"{}\" ← {}", g.value.cyan(), g.keys.join(", ").green());
                    } else {
                        println!("  \"{}\" ← {}", g.value, g.keys.join(", "));
                    }
                }
            }
            println!("TOTAL: {} duplicate value(s)", report.total_duplicates);
        }
    }
    Ok(())
}
