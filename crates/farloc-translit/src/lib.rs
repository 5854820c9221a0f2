//! Turns a snippet of Persian text into a candidate translation identifier.
//!
//! The pipeline is: normalize -> transliterate (word table first, then
//! single characters) -> slugify -> attach context/prefix -> truncate.
//! Scoring is a pure function of the inputs and outputs so it can be tested
//! without touching the tables.

mod tables;

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use tables::{CHAR_TABLE, DIGIT_TABLE, WORD_TABLE};

/// Sentinel identifier used when nothing translatable survives the pipeline.
pub const FALLBACK_KEY: &str = "untranslated_text";

pub const BASE_CONFIDENCE: f32 = 0.5;
pub const EXACT_WORD_BONUS: f32 = 0.3;
pub const SHAPE_BONUS: f32 = 0.1;
pub const WEAK_PENALTY: f32 = 0.2;

/// Context token used for the "same text, different context" alternative.
const ALT_CONTEXT: &str = "alt";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisOptions {
    pub max_length: usize,
    pub use_context: bool,
    pub prefix: Option<String>,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        SynthesisOptions {
            max_length: 50,
            use_context: true,
            prefix: None,
        }
    }
}

/// A synthesized candidate key plus scoring and fallbacks.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub key: String,
    pub confidence: f32,
    /// Up to 3 alternative candidates, best first.
    pub alternatives: Vec<String>,
}

/// Word table sorted by key length descending, built once. Longest-first
/// matching keeps compound forms from being split by their parts.
fn sorted_words() -> &'static [(&'static str, &'static str)] {
    static SORTED: OnceLock<Vec<(&'static str, &'static str)>> = OnceLock::new();
    SORTED.get_or_init(|| {
        let mut v: Vec<_> = WORD_TABLE.to_vec();
        v.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));
        v
    })
}

fn char_map() -> &'static HashMap<char, &'static str> {
    static MAP: OnceLock<HashMap<char, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| CHAR_TABLE.iter().copied().collect())
}

fn fold_digit(c: char) -> char {
    DIGIT_TABLE
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
        .unwrap_or(c)
}

/// True for code points in the Arabic-script blocks Persian text uses.
/// In-block punctuation (comma, semicolon, question mark, percent) does not
/// count as a letter.
pub fn is_source_letter(c: char) -> bool {
    if matches!(c, '،' | '؛' | '؟' | '٪' | '٫' | '٬' | '٭' | '۔') {
        return false;
    }
    matches!(c,
        '\u{0600}'..='\u{06FF}'
        | '\u{0750}'..='\u{077F}'
        | '\u{FB50}'..='\u{FDFF}'
        | '\u{FE70}'..='\u{FEFF}')
}

/// Trim, collapse whitespace, fold script digits to ASCII, and strip anything
/// outside source-script letters, Latin letters, digits, and whitespace.
/// ZWNJ separates Persian compounds, so it folds to a plain space.
pub fn normalize_text(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    for c in text.chars() {
        let c = fold_digit(c);
        if c == '\u{200C}' {
            cleaned.push(' ');
        } else if c.is_ascii_alphanumeric() || c.is_whitespace() || is_source_letter(c) {
            cleaned.push(c);
        }
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Transliterate normalized text. Returns the Latin text plus whether the
/// whole input matched a single word-table entry.
pub fn transliterate(text: &str) -> (String, bool) {
    let trimmed = text.trim();
    if let Some((_, hit)) = WORD_TABLE.iter().find(|(k, _)| *k == trimmed) {
        return ((*hit).to_string(), true);
    }

    let mut out = String::with_capacity(trimmed.len());
    let mut rest = trimmed;
    'outer: while !rest.is_empty() {
        for (word, latin) in sorted_words() {
            if rest.starts_with(word) {
                out.push_str(latin);
                rest = &rest[word.len()..];
                continue 'outer;
            }
        }
        let c = rest.chars().next().unwrap_or_default();
        match char_map().get(&c) {
            Some(mapped) => out.push_str(mapped),
            None => out.push(c),
        }
        rest = &rest[c.len_utf8()..];
    }
    (out, false)
}

/// Lowercase, keep only `[a-z0-9 ]`, turn whitespace runs into `_`, collapse
/// repeated `_`, trim edge `_`.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .collect();
    let mut out = String::with_capacity(kept.len());
    let mut last_underscore = true;
    for c in kept.chars() {
        if c == ' ' {
            if !last_underscore {
                out.push('_');
                last_underscore = true;
            }
        } else {
            out.push(c);
            last_underscore = false;
        }
    }
    out.trim_matches('_').to_string()
}

/// Word-preserving truncation: keep whole `_` segments while they fit, then
/// an abbreviated partial segment when at least 3 characters of room remain.
pub fn truncate_key(key: &str, max_length: usize) -> String {
    if key.chars().count() <= max_length {
        return key.to_string();
    }
    let segments: Vec<&str> = key.split('_').collect();
    let mut out = String::new();
    for seg in &segments {
        let sep = usize::from(!out.is_empty());
        if out.chars().count() + sep + seg.chars().count() <= max_length {
            if sep == 1 {
                out.push('_');
            }
            out.push_str(seg);
        } else {
            let room = max_length.saturating_sub(out.chars().count() + sep);
            if room >= 3 {
                if sep == 1 {
                    out.push('_');
                }
                out.extend(seg.chars().take(room));
            }
            break;
        }
    }
    if out.is_empty() {
        key.chars().take(max_length).collect()
    } else {
        out
    }
}

/// Heuristic confidence score for a synthesized key. Pure on purpose.
pub fn confidence_score(key: &str, exact_word_match: bool) -> f32 {
    let mut score = BASE_CONFIDENCE;
    if exact_word_match {
        score += EXACT_WORD_BONUS;
    }
    if key.contains('_') && key.chars().count() > 3 {
        score += SHAPE_BONUS;
    }
    if key.chars().count() < 3 || key == FALLBACK_KEY {
        score -= WEAK_PENALTY;
    }
    score.clamp(0.0, 1.0)
}

fn assemble(parts: &[Option<&str>], max_length: usize) -> String {
    let joined = parts
        .iter()
        .filter_map(|p| *p)
        .map(slugify)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    if joined.is_empty() {
        return FALLBACK_KEY.to_string();
    }
    truncate_key(&joined, max_length)
}

/// First letter of every `_` segment, e.g. "postal_code" -> "pc".
fn initials(slug: &str) -> Option<String> {
    let segs: Vec<&str> = slug.split('_').filter(|s| !s.is_empty()).collect();
    if segs.len() < 2 {
        return None;
    }
    Some(segs.iter().filter_map(|s| s.chars().next()).collect())
}

/// Synthesize a candidate identifier for `text`, optionally scoped by a
/// context token and a configured global prefix.
pub fn synthesize(text: &str, context: Option<&str>, opts: &SynthesisOptions) -> Candidate {
    let normalized = normalize_text(text);
    let (latin, exact) = transliterate(&normalized);
    let base = slugify(&latin);

    let prefix = opts.prefix.as_deref();
    let context = if opts.use_context { context } else { None };
    let key = assemble(&[prefix, context, Some(base.as_str())], opts.max_length);

    let mut alternatives = Vec::new();
    let plain = assemble(&[Some(base.as_str())], opts.max_length);
    if plain != key {
        alternatives.push(plain.clone());
    }
    if context.is_some() {
        let alt = assemble(
            &[prefix, Some(ALT_CONTEXT), Some(base.as_str())],
            opts.max_length,
        );
        if alt != key && !alternatives.contains(&alt) {
            alternatives.push(alt);
        }
    }
    if plain != FALLBACK_KEY {
        if let Some(abbrev) = initials(&plain) {
            if abbrev != key && !alternatives.contains(&abbrev) {
                alternatives.push(abbrev);
            }
        }
    }
    alternatives.truncate(3);

    let confidence = confidence_score(&key, exact);
    Candidate {
        key,
        confidence,
        alternatives,
    }
}
