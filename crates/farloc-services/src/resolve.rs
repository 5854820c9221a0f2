//! Composes synthesis, validation, and duplicate resolution into one
//! "text -> final identifier" operation with a registry that guarantees
//! global uniqueness within a run.

use std::collections::BTreeMap;

use color_eyre::eyre::eyre;
use tracing::{debug, warn};

use farloc_core::{GeneratedKey, Result, TextMatch};
use farloc_domain::{BatchSummary, DuplicateCheckResult, SCHEMA_VERSION};
use farloc_translit::{synthesize, SynthesisOptions};
use farloc_validate::{KeyValidation, KeyValidationRules, KeyValidator};

use crate::duplicates::{DuplicateResolver, SimilarityThresholds};

/// Full trace of one resolution, for callers that want to explain the result.
#[derive(Debug)]
pub struct ResolveOutcome {
    pub generated: GeneratedKey,
    pub validation: KeyValidation,
    pub duplicate_check: DuplicateCheckResult,
    pub final_key: String,
}

#[derive(Debug)]
pub struct KeyResolver {
    opts: SynthesisOptions,
    validator: KeyValidator,
    duplicates: DuplicateResolver,
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self::new(
            SynthesisOptions::default(),
            KeyValidationRules::default(),
            SimilarityThresholds::default(),
        )
    }
}

impl KeyResolver {
    pub fn new(
        opts: SynthesisOptions,
        rules: KeyValidationRules,
        thresholds: SimilarityThresholds,
    ) -> Self {
        KeyResolver {
            opts,
            validator: KeyValidator::new(rules),
            duplicates: DuplicateResolver::with_thresholds(thresholds),
        }
    }

    /// Seed the registry and duplicate indexes from already-persisted
    /// translations, typically the output of `LocaleStore::read` per locale.
    pub fn load_existing<'a, I>(&mut self, maps: I)
    where
        I: IntoIterator<Item = (&'a str, &'a BTreeMap<String, String>)> + Clone,
    {
        for (_, map) in maps.clone() {
            self.validator.add_existing_keys(map.keys().cloned());
        }
        self.duplicates.load_from(maps);
    }

    /// Resolve one snippet of text to a final, unused identifier.
    pub fn resolve(
        &mut self,
        text: &str,
        locale: &str,
        context: Option<&str>,
    ) -> Result<ResolveOutcome> {
        if locale.trim().is_empty() {
            return Err(eyre!("locale must not be empty"));
        }

        let candidate = synthesize(text, context, &self.opts);
        let validation = self.validator.validate(&candidate.key);
        let mut key = if validation.is_valid {
            candidate.key.clone()
        } else {
            self.validator.normalize(&candidate.key)
        };

        let key_check = self.duplicates.check_key_duplicate(&key, Some(locale));
        let value_check = self.duplicates.check_value_duplicate(text, locale);
        // A duplicated value with a distinct candidate key keeps that key;
        // only a taken key forces a contextual/numeric suffix.
        let collides = key_check.is_duplicate || self.validator.is_used(&key);
        if collides {
            let taken = |k: &str| {
                self.validator.is_used(k) || self.duplicates.key_exists(k, Some(locale))
            };
            key = self.duplicates.resolve_conflict(&key, context, taken);
            debug!(
                event = "key_conflict_resolved",
                candidate = %candidate.key,
                resolved = %key
            );
        }

        self.validator.mark_key_as_used(&key);
        self.duplicates.add_entry(locale, &key, text);

        let duplicate_check = if value_check.is_duplicate {
            value_check
        } else {
            key_check
        };
        let generated = GeneratedKey {
            key: key.clone(),
            original_text: text.to_string(),
            confidence: candidate.confidence,
            suggestions: candidate.alternatives,
            path: None,
            line: None,
            column: None,
            context: context.map(String::from),
        };
        Ok(ResolveOutcome {
            generated,
            validation,
            duplicate_check,
            final_key: key,
        })
    }

    /// Resolve a whole batch. A bad item never aborts the batch: it falls
    /// back to the raw synthesized key and the failure is recorded for the
    /// caller.
    pub fn resolve_batch(
        &mut self,
        matches: &[TextMatch],
        locale: &str,
    ) -> (Vec<GeneratedKey>, BatchSummary) {
        let mut keys = Vec::with_capacity(matches.len());
        let mut summary = BatchSummary {
            schema_version: SCHEMA_VERSION,
            resolved: 0,
            fallback: 0,
            warnings: Vec::new(),
        };
        for m in matches {
            let context = m.context.as_deref();
            match self.resolve(&m.text, locale, context) {
                Ok(outcome) => {
                    summary.resolved += 1;
                    let mut generated = outcome.generated;
                    generated.path = Some(m.path.clone());
                    generated.line = m.line;
                    generated.column = m.column;
                    keys.push(generated);
                }
                Err(e) => {
                    summary.fallback += 1;
                    let msg = format!(
                        "{}:{}: falling back to unvalidated key: {e}",
                        m.path.display(),
                        m.line.unwrap_or(0)
                    );
                    warn!(event = "resolve_item_failed", detail = %msg);
                    summary.warnings.push(msg);
                    let candidate = synthesize(&m.text, context, &self.opts);
                    keys.push(GeneratedKey {
                        key: candidate.key,
                        original_text: m.text.clone(),
                        confidence: candidate.confidence,
                        suggestions: candidate.alternatives,
                        path: Some(m.path.clone()),
                        line: m.line,
                        column: m.column,
                        context: m.context.clone(),
                    });
                }
            }
        }
        (keys, summary)
    }

    /// Forget everything: used keys, duplicate indexes. A fresh run starts
    /// from a clean slate.
    pub fn reset(&mut self) {
        self.validator.reset();
        self.duplicates.clear();
    }

    pub fn validator(&self) -> &KeyValidator {
        &self.validator
    }

    pub fn duplicates(&self) -> &DuplicateResolver {
        &self.duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn matches(texts: &[(&str, Option<&str>)]) -> Vec<TextMatch> {
        texts
            .iter()
            .enumerate()
            .map(|(i, (text, ctx))| TextMatch {
                text: (*text).to_string(),
                path: PathBuf::from("src/app.js"),
                line: Some(i + 1),
                column: Some(1),
                context: ctx.map(String::from),
            })
            .collect()
    }

    #[test]
    fn same_text_different_context_gets_distinct_keys() {
        let mut r = KeyResolver::default();
        let first = r.resolve("ذخیره", "fa", Some("btn")).unwrap();
        assert_eq!(first.final_key, "btn_save");

        let second = r.resolve("ذخیره", "fa", Some("label")).unwrap();
        assert_eq!(second.final_key, "label_save");
        assert!(second.duplicate_check.is_duplicate);
    }

    #[test]
    fn batch_yields_distinct_keys() {
        let mut r = KeyResolver::default();
        let input = matches(&[
            ("ذخیره", Some("btn")),
            ("حذف", Some("btn")),
            ("ذخیره فایل", None),
            ("جستجو", Some("menu")),
        ]);
        let (keys, summary) = r.resolve_batch(&input, "fa");
        assert_eq!(keys.len(), 4);
        assert_eq!(summary.resolved, 4);
        let mut names: Vec<&str> = keys.iter().map(|k| k.key.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 4, "all keys must be unique");
    }

    #[test]
    fn bad_item_falls_back_without_aborting_batch() {
        let mut r = KeyResolver::default();
        let input = matches(&[("ذخیره", Some("btn"))]);
        let (keys, summary) = r.resolve_batch(&input, "");
        assert_eq!(keys.len(), 1);
        assert_eq!(summary.fallback, 1);
        assert_eq!(summary.warnings.len(), 1);
        assert_eq!(keys[0].key, "btn_save");
    }

    #[test]
    fn seeded_keys_are_never_reissued() {
        let mut r = KeyResolver::default();
        let fa = BTreeMap::from([("btn_save".to_string(), "چیز دیگر".to_string())]);
        r.load_existing([("fa", &fa)]);

        let outcome = r.resolve("ذخیره", "fa", Some("btn")).unwrap();
        assert_ne!(outcome.final_key, "btn_save");
    }

    #[test]
    fn reset_releases_all_keys() {
        let mut r = KeyResolver::default();
        let first = r.resolve("ذخیره", "fa", Some("btn")).unwrap();
        r.reset();
        let again = r.resolve("ذخیره", "fa", Some("btn")).unwrap();
        assert_eq!(first.final_key, again.final_key);
    }

    #[test]
    fn value_duplicate_reports_existing_key() {
        let mut r = KeyResolver::default();
        r.resolve("ذخیره", "fa", Some("btn")).unwrap();
        let second = r.resolve("ذخیره!", "fa", Some("form")).unwrap();
        assert!(second.duplicate_check.is_duplicate);
        assert_eq!(
            second.duplicate_check.existing_key.as_deref(),
            Some("btn_save")
        );
    }
}
