//! In-memory duplicate tracking: per locale, a key -> value map and a
//! normalized-value -> keys map. Values only count as "the same" after
//! normalization; near matches are suggestions, never hard duplicates.

use std::collections::{BTreeMap, HashMap};

use farloc_core::TranslationEntry;
use farloc_domain::{DuplicateCheckResult, DuplicateValue};
use farloc_translit::{is_source_letter, slugify};

/// Similarity floor for reporting near-matching keys.
pub const DEFAULT_KEY_SIMILARITY: f64 = 0.7;
/// Similarity floor for reporting near-matching values.
pub const DEFAULT_VALUE_SIMILARITY: f64 = 0.8;
/// Cap on reported near matches.
const SIMILAR_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy)]
pub struct SimilarityThresholds {
    pub key: f64,
    pub value: f64,
}

impl Default for SimilarityThresholds {
    fn default() -> Self {
        SimilarityThresholds {
            key: DEFAULT_KEY_SIMILARITY,
            value: DEFAULT_VALUE_SIMILARITY,
        }
    }
}

#[derive(Debug, Default)]
struct LocaleIndex {
    key_to_value: HashMap<String, String>,
    value_to_keys: HashMap<String, Vec<String>>,
}

#[derive(Debug, Default)]
pub struct DuplicateResolver {
    locales: HashMap<String, LocaleIndex>,
    thresholds: SimilarityThresholds,
}

impl DuplicateResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: SimilarityThresholds) -> Self {
        DuplicateResolver {
            thresholds,
            ..Self::default()
        }
    }

    /// Rebuild all indexes from per-locale maps.
    pub fn load_from<'a, I>(&mut self, maps: I)
    where
        I: IntoIterator<Item = (&'a str, &'a BTreeMap<String, String>)>,
    {
        self.locales.clear();
        for (locale, map) in maps {
            for (key, value) in map {
                self.add_entry(locale, key, value);
            }
        }
    }

    pub fn add_entry(&mut self, locale: &str, key: &str, value: &str) {
        let index = self.locales.entry(locale.to_string()).or_default();
        index.key_to_value.insert(key.to_string(), value.to_string());
        let keys = index
            .value_to_keys
            .entry(normalize_value(value))
            .or_default();
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    }

    /// Convenience for callers holding full translation entries.
    pub fn add_translation(&mut self, entry: &TranslationEntry) {
        self.add_entry(&entry.locale, &entry.key, &entry.value);
    }

    pub fn clear(&mut self) {
        self.locales.clear();
    }

    pub fn key_exists(&self, key: &str, locale: Option<&str>) -> bool {
        match locale {
            Some(l) => self
                .locales
                .get(l)
                .is_some_and(|ix| ix.key_to_value.contains_key(key)),
            None => self
                .locales
                .values()
                .any(|ix| ix.key_to_value.contains_key(key)),
        }
    }

    /// Exact key collision plus near-matching keys above the threshold.
    pub fn check_key_duplicate(&self, key: &str, locale: Option<&str>) -> DuplicateCheckResult {
        let mut result = DuplicateCheckResult::clean();
        result.is_duplicate = self.key_exists(key, locale);
        if result.is_duplicate {
            result.existing_key = Some(key.to_string());
        }

        let mut similar: Vec<(f64, String)> = Vec::new();
        let indexes: Vec<&LocaleIndex> = match locale {
            Some(l) => self.locales.get(l).into_iter().collect(),
            None => self.locales.values().collect(),
        };
        for ix in indexes {
            for existing in ix.key_to_value.keys() {
                if existing == key {
                    continue;
                }
                let s = similarity(existing, key);
                if s > self.thresholds.key {
                    similar.push((s, existing.clone()));
                }
            }
        }
        result.similar_keys = top_similar(similar);
        result
    }

    /// Exact duplicate when the normalized value already maps to a key in
    /// this locale; near-matching values contribute their keys as
    /// suggestions.
    pub fn check_value_duplicate(&self, value: &str, locale: &str) -> DuplicateCheckResult {
        let mut result = DuplicateCheckResult::clean();
        let Some(ix) = self.locales.get(locale) else {
            return result;
        };
        let normalized = normalize_value(value);
        if let Some(keys) = ix.value_to_keys.get(&normalized) {
            if let Some(first) = keys.first() {
                result.is_duplicate = true;
                result.existing_key = Some(first.clone());
            }
        }

        let mut similar: Vec<(f64, String)> = Vec::new();
        for (existing_value, keys) in &ix.value_to_keys {
            if *existing_value == normalized {
                continue;
            }
            let s = similarity(existing_value, &normalized);
            if s > self.thresholds.value {
                for k in keys {
                    similar.push((s, k.clone()));
                }
            }
        }
        result.similar_keys = top_similar(similar);
        result
    }

    /// Groups of >= 2 keys sharing one normalized value within `locale`.
    pub fn get_duplicate_values(&self, locale: &str) -> Vec<DuplicateValue> {
        let Some(ix) = self.locales.get(locale) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for keys in ix.value_to_keys.values() {
            if keys.len() < 2 {
                continue;
            }
            let mut keys = keys.clone();
            keys.sort();
            let value = keys
                .first()
                .and_then(|k| ix.key_to_value.get(k))
                .cloned()
                .unwrap_or_default();
            out.push(DuplicateValue {
                value,
                keys,
                locales: vec![locale.to_string()],
            });
        }
        out.sort_by(|a, b| a.keys.cmp(&b.keys));
        out
    }

    /// Derive a conflict-breaking suffix from the context, `_alt` when the
    /// context slugs away to nothing.
    pub fn generate_contextual_suffix(&self, base_key: &str, context: Option<&str>) -> String {
        let slug = slugify(context.unwrap_or_default());
        if slug.is_empty() {
            format!("{base_key}_alt")
        } else {
            format!("{base_key}_{slug}")
        }
    }

    /// Contextual suffix first, then an incrementing numeric suffix, until
    /// `is_used` clears the candidate.
    pub fn resolve_conflict<F>(&self, base_key: &str, context: Option<&str>, is_used: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        let contextual = self.generate_contextual_suffix(base_key, context);
        if !is_used(&contextual) {
            return contextual;
        }
        let mut n = 1usize;
        loop {
            let candidate = format!("{base_key}_{n}");
            if !is_used(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Best-first, deduplicated, capped list of near matches.
fn top_similar(mut scored: Vec<(f64, String)>) -> Vec<String> {
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for (_, key) in scored {
        if seen.insert(key.clone()) {
            out.push(key);
            if out.len() == SIMILAR_LIMIT {
                break;
            }
        }
    }
    out
}

/// Comparison form of a value: trimmed, lowercased, whitespace collapsed,
/// stripped to Persian/Arabic letters, Latin letters, and spaces.
pub fn normalize_value(value: &str) -> String {
    let kept: String = value
        .chars()
        .map(|c| if c == '\u{200C}' { ' ' } else { c })
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace() || is_source_letter(*c))
        .collect::<String>()
        .to_lowercase();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Levenshtein distance, two-row DP over characters.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        cur[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            cur[j + 1] = (prev[j + 1] + 1).min(cur[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

/// Normalized similarity in [0, 1]: `1 - distance / max(len)`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let la = a.chars().count();
    let lb = b.chars().count();
    let max = la.max(lb);
    if max == 0 {
        return 1.0;
    }
    1.0 - edit_distance(a, b) as f64 / max as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> DuplicateResolver {
        let mut r = DuplicateResolver::new();
        r.add_entry("fa", "btn_save", "ذخیره");
        r.add_entry("fa", "btn_cancel", "لغو");
        r.add_entry("en", "btn_save", "Save");
        r
    }

    #[test]
    fn similarity_is_symmetric_and_reflexive() {
        for (a, b) in [("save", "shave"), ("btn_save", "btn_sve"), ("", "x")] {
            assert_eq!(similarity(a, b), similarity(b, a));
        }
        assert_eq!(similarity("ذخیره", "ذخیره"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn edit_distance_basics() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("abc", "abc"), 0);
    }

    #[test]
    fn value_normalization_ignores_punctuation_and_case() {
        assert_eq!(normalize_value("  ذخیره!  "), "ذخیره");
        assert_eq!(normalize_value("Save File"), "save file");
        assert_eq!(normalize_value("ذخیره   کن"), "ذخیره کن");
    }

    #[test]
    fn exact_value_duplicate_is_detected_after_normalization() {
        let r = seeded();
        let check = r.check_value_duplicate("  ذخیره! ", "fa");
        assert!(check.is_duplicate);
        assert_eq!(check.existing_key.as_deref(), Some("btn_save"));
    }

    #[test]
    fn value_duplicates_are_per_locale() {
        let r = seeded();
        assert!(!r.check_value_duplicate("ذخیره", "en").is_duplicate);
    }

    #[test]
    fn similar_keys_are_suggestions_not_duplicates() {
        let r = seeded();
        let check = r.check_key_duplicate("btn_sav", Some("fa"));
        assert!(!check.is_duplicate);
        assert!(check.similar_keys.contains(&"btn_save".to_string()));
    }

    #[test]
    fn duplicate_value_groups_require_two_keys() {
        let mut r = seeded();
        assert!(r.get_duplicate_values("fa").is_empty());
        r.add_entry("fa", "confirm_save", "ذخیره");
        let groups = r.get_duplicate_values("fa");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].keys, vec!["btn_save", "confirm_save"]);
    }

    #[test]
    fn add_translation_indexes_full_entries() {
        use farloc_core::{EntryMetadata, TranslationEntry};
        let mut r = DuplicateResolver::new();
        r.add_translation(&TranslationEntry {
            key: "btn_save".into(),
            value: "ذخیره".into(),
            locale: "fa".into(),
            metadata: EntryMetadata {
                added: chrono::Utc::now(),
                source_file: None,
                confidence: Some(0.9),
            },
        });
        assert!(r.check_value_duplicate("ذخیره", "fa").is_duplicate);
    }

    #[test]
    fn contextual_suffix_falls_back_to_alt() {
        let r = DuplicateResolver::new();
        assert_eq!(
            r.generate_contextual_suffix("save", Some("label")),
            "save_label"
        );
        assert_eq!(r.generate_contextual_suffix("save", Some("!!")), "save_alt");
        assert_eq!(r.generate_contextual_suffix("save", None), "save_alt");
    }

    #[test]
    fn conflict_resolution_prefers_context_then_numbers() {
        let r = seeded();
        let used = |k: &str| k == "btn_save" || k == "btn_save_label" || k == "btn_save_1";
        assert_eq!(
            r.resolve_conflict("btn_save", Some("form"), used),
            "btn_save_form"
        );
        assert_eq!(
            r.resolve_conflict("btn_save", Some("label"), used),
            "btn_save_2"
        );
    }
}
