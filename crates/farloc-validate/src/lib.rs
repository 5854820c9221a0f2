//! Identifier naming rules. `validate` reports problems with concrete fixes;
//! `normalize` always produces a key that would pass `validate`, including
//! uniqueness against the validator's used-keys set.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use farloc_translit::truncate_key;

/// Generic suffix tokens tried, in order, when padding a too-short key.
const PAD_TOKENS: &[&str] = &["text", "label", "item"];

/// Forbidden key shapes. Each knows how to detect and how to repair itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForbiddenPattern {
    AllUnderscores,
    AllDigits,
    RepeatedUnderscores,
    EdgeUnderscore,
}

impl ForbiddenPattern {
    pub fn matches(&self, key: &str) -> bool {
        match self {
            ForbiddenPattern::AllUnderscores => {
                !key.is_empty() && key.chars().all(|c| c == '_')
            }
            ForbiddenPattern::AllDigits => {
                !key.is_empty() && key.chars().all(|c| c.is_ascii_digit())
            }
            ForbiddenPattern::RepeatedUnderscores => key.contains("__"),
            ForbiddenPattern::EdgeUnderscore => {
                key.starts_with('_') || key.ends_with('_')
            }
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            ForbiddenPattern::AllUnderscores => "key is only underscores",
            ForbiddenPattern::AllDigits => "key is only digits",
            ForbiddenPattern::RepeatedUnderscores => "key contains repeated underscores",
            ForbiddenPattern::EdgeUnderscore => "key starts or ends with an underscore",
        }
    }

    pub fn repair(&self, key: &str) -> String {
        match self {
            ForbiddenPattern::AllUnderscores => "key".to_string(),
            ForbiddenPattern::AllDigits => format!("key_{key}"),
            ForbiddenPattern::RepeatedUnderscores => collapse_underscores(key),
            ForbiddenPattern::EdgeUnderscore => key.trim_matches('_').to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyValidationRules {
    pub max_length: usize,
    pub min_length: usize,
    /// Regex every valid key must match in full.
    pub allowed_characters: String,
    pub forbidden_patterns: Vec<ForbiddenPattern>,
    pub reserved_words: Vec<String>,
    pub require_prefix: Option<String>,
    pub require_suffix: Option<String>,
    pub case_sensitive: bool,
}

impl Default for KeyValidationRules {
    fn default() -> Self {
        KeyValidationRules {
            max_length: 50,
            min_length: 2,
            allowed_characters: "^[a-z0-9_]+$".to_string(),
            forbidden_patterns: vec![
                ForbiddenPattern::AllUnderscores,
                ForbiddenPattern::AllDigits,
                ForbiddenPattern::RepeatedUnderscores,
                ForbiddenPattern::EdgeUnderscore,
            ],
            reserved_words: ["key", "value", "type", "id", "new", "default", "null", "true", "false"]
                .into_iter()
                .map(String::from)
                .collect(),
            require_prefix: None,
            require_suffix: None,
            case_sensitive: false,
        }
    }
}

/// Result of one validation pass.
#[derive(Debug, Clone, Default)]
pub struct KeyValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Machine-derivable fixes, one per reported problem where one exists.
    pub suggestions: Vec<String>,
}

/// Owns the rules plus the set of keys already taken this run.
#[derive(Debug)]
pub struct KeyValidator {
    rules: KeyValidationRules,
    allowed: Regex,
    used: HashSet<String>,
}

impl Default for KeyValidator {
    fn default() -> Self {
        Self::new(KeyValidationRules::default())
    }
}

impl KeyValidator {
    pub fn new(rules: KeyValidationRules) -> Self {
        let allowed = Regex::new(&rules.allowed_characters)
            .unwrap_or_else(|_| Regex::new("^[a-z0-9_]+$").expect("builtin pattern compiles"));
        KeyValidator {
            rules,
            allowed,
            used: HashSet::new(),
        }
    }

    pub fn rules(&self) -> &KeyValidationRules {
        &self.rules
    }

    /// Explicit rule update; recompiles the allowed-characters pattern.
    pub fn update_rules(&mut self, rules: KeyValidationRules) {
        *self = KeyValidator {
            used: std::mem::take(&mut self.used),
            ..Self::new(rules)
        };
    }

    pub fn validate(&self, key: &str) -> KeyValidation {
        let mut v = KeyValidation {
            is_valid: true,
            ..Default::default()
        };
        let len = key.chars().count();

        if len < self.rules.min_length {
            v.errors
                .push(format!("key is too short ({len} < {})", self.rules.min_length));
            v.suggestions.push(pad_key(key, self.rules.min_length));
        }
        if len > self.rules.max_length {
            v.errors
                .push(format!("key is too long ({len} > {})", self.rules.max_length));
            v.suggestions.push(truncate_key(key, self.rules.max_length));
        }

        if !self.allowed.is_match(key) {
            // In case-insensitive mode a purely casing problem is a warning,
            // anything else is an error.
            let lowered = key.to_lowercase();
            if !self.rules.case_sensitive && self.allowed.is_match(&lowered) {
                v.warnings.push("key contains uppercase characters".to_string());
                v.suggestions.push(lowered);
            } else {
                v.errors.push("key contains disallowed characters".to_string());
                v.suggestions.push(sanitize(&key.to_lowercase()));
            }
        }

        for pat in &self.rules.forbidden_patterns {
            if pat.matches(key) {
                v.errors.push(pat.describe().to_string());
                v.suggestions.push(pat.repair(key));
            }
        }

        if self.is_reserved(key) {
            v.errors.push(format!("\"{key}\" is a reserved word"));
            v.suggestions.push(format!("{key}_key"));
        }

        if let Some(prefix) = self.rules.require_prefix.as_deref() {
            if !key.starts_with(prefix) {
                v.errors.push(format!("key must start with \"{prefix}\""));
                v.suggestions.push(join_affix(prefix, key));
            }
        }
        if let Some(suffix) = self.rules.require_suffix.as_deref() {
            if !key.ends_with(suffix) {
                v.errors.push(format!("key must end with \"{suffix}\""));
                v.suggestions.push(join_affix(key, suffix));
            }
        }

        if self.used.contains(key) {
            v.errors.push(format!("key \"{key}\" is already in use"));
            v.suggestions.push(self.next_free(key));
        }

        v.is_valid = v.errors.is_empty();
        v
    }

    /// Rewrite `key` until it satisfies every rule and is unused. Idempotent:
    /// normalizing an already-normal key returns it unchanged. Does not mark
    /// the result as used; that stays an explicit step for the caller.
    pub fn normalize(&self, key: &str) -> String {
        let mut k = key.to_lowercase();
        k = sanitize(&k);

        for pat in &self.rules.forbidden_patterns {
            if pat.matches(&k) {
                k = pat.repair(&k);
            }
        }
        if k.is_empty() {
            k = "key".to_string();
        }

        if k.chars().count() > self.rules.max_length {
            k = truncate_key(&k, self.rules.max_length);
            k = k.trim_matches('_').to_string();
        }
        if k.chars().count() < self.rules.min_length {
            k = pad_key(&k, self.rules.min_length);
        }

        if self.is_reserved(&k) {
            k = format!("{k}_key");
        }

        if let Some(prefix) = self.rules.require_prefix.as_deref() {
            if !k.starts_with(prefix) {
                k = join_affix(prefix, &k);
            }
        }
        if let Some(suffix) = self.rules.require_suffix.as_deref() {
            if !k.ends_with(suffix) {
                k = join_affix(&k, suffix);
            }
        }

        self.next_free(&k)
    }

    /// Append `_1`, `_2`, ... until the key is unused, shortening the stem so
    /// the result stays within the length ceiling.
    fn next_free(&self, key: &str) -> String {
        if !self.used.contains(key) {
            return key.to_string();
        }
        let mut n = 1usize;
        loop {
            let suffix = format!("_{n}");
            let room = self.rules.max_length.saturating_sub(suffix.chars().count());
            let stem = truncate_key(key, room);
            let candidate = format!("{}{suffix}", stem.trim_end_matches('_'));
            if !self.used.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    fn is_reserved(&self, key: &str) -> bool {
        self.rules.reserved_words.iter().any(|w| {
            if self.rules.case_sensitive {
                w == key
            } else {
                w.eq_ignore_ascii_case(key)
            }
        })
    }

    pub fn add_existing_keys<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.used.extend(keys.into_iter().map(Into::into));
    }

    pub fn mark_key_as_used(&mut self, key: &str) {
        self.used.insert(key.to_string());
    }

    pub fn is_used(&self, key: &str) -> bool {
        self.used.contains(key)
    }

    pub fn used_count(&self) -> usize {
        self.used.len()
    }

    pub fn clear_used_keys(&mut self) {
        self.used.clear();
    }

    /// Restartable state for a fresh run.
    pub fn reset(&mut self) {
        self.clear_used_keys();
    }
}

/// Invalid characters become `_`; runs collapse; edges are trimmed.
fn sanitize(key: &str) -> String {
    let mapped: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    collapse_underscores(&mapped).trim_matches('_').to_string()
}

fn collapse_underscores(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut prev_underscore = false;
    for c in key.chars() {
        if c == '_' {
            if !prev_underscore {
                out.push(c);
            }
            prev_underscore = true;
        } else {
            out.push(c);
            prev_underscore = false;
        }
    }
    out
}

/// Pad a too-short key with a generic token, falling back to a counter when
/// every token is somehow still too short.
fn pad_key(key: &str, min_length: usize) -> String {
    let base = if key.is_empty() { "key" } else { key };
    for token in PAD_TOKENS {
        let candidate = format!("{base}_{token}");
        if candidate.chars().count() >= min_length {
            return candidate;
        }
    }
    let mut n = 1usize;
    loop {
        let candidate = format!("{base}_{n}");
        if candidate.chars().count() >= min_length {
            return candidate;
        }
        n += 1;
    }
}

fn join_affix(left: &str, right: &str) -> String {
    if left.ends_with('_') || right.starts_with('_') {
        format!("{left}{right}")
    } else {
        format!("{left}_{right}")
    }
}
