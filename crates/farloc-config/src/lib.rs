use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FarlocConfig {
    pub source_lang: Option<String>,
    pub target_lang: Option<String>,
    pub list_limit: Option<usize>,
    pub translations: Option<TranslationsCfg>,
    pub keys: Option<KeysCfg>,
    pub processing: Option<ProcessingCfg>,
    pub duplicates: Option<DuplicatesCfg>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslationsCfg {
    /// Directory holding one `<locale>.json` per locale.
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeysCfg {
    /// Key synthesis strategy; only "transliteration" is implemented.
    pub strategy: Option<String>,
    pub max_length: Option<usize>,
    pub use_context: Option<bool>,
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessingCfg {
    pub create_backups: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DuplicatesCfg {
    pub key_similarity: Option<f64>,
    pub value_similarity: Option<f64>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{0}")]
    Other(String),
}

/// Search order: CWD/farloc.toml, $CONFIG_DIR/farloc/farloc.toml.
/// Earlier hits win field by field.
pub fn load_config() -> Result<FarlocConfig, ConfigError> {
    let mut merged = FarlocConfig::default();
    if let Ok(p) = std::env::current_dir() {
        let path = p.join("farloc.toml");
        if let Ok(s) = std::fs::read_to_string(&path) {
            if let Ok(cfg) = toml::from_str::<FarlocConfig>(&s) {
                merged = merge(merged, cfg);
            }
        }
    }
    if let Some(base) = dirs::config_dir() {
        let path = base.join("farloc").join("farloc.toml");
        if let Ok(s) = std::fs::read_to_string(&path) {
            if let Ok(cfg) = toml::from_str::<FarlocConfig>(&s) {
                merged = merge(merged, cfg);
            }
        }
    }
    Ok(merged)
}

fn merge(mut a: FarlocConfig, b: FarlocConfig) -> FarlocConfig {
    if a.source_lang.is_none() {
        a.source_lang = b.source_lang;
    }
    if a.target_lang.is_none() {
        a.target_lang = b.target_lang;
    }
    if a.list_limit.is_none() {
        a.list_limit = b.list_limit;
    }
    a.translations = merge_opt(a.translations, b.translations, merge_translations);
    a.keys = merge_opt(a.keys, b.keys, merge_keys);
    a.processing = merge_opt(a.processing, b.processing, merge_processing);
    a.duplicates = merge_opt(a.duplicates, b.duplicates, merge_duplicates);
    a
}

fn merge_opt<T: Default>(a: Option<T>, b: Option<T>, f: fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (None, Some(b)) => Some(b),
        (Some(a), None) => Some(a),
        (None, None) => None,
    }
}

fn merge_translations(mut a: TranslationsCfg, b: TranslationsCfg) -> TranslationsCfg {
    if a.directory.is_none() {
        a.directory = b.directory;
    }
    a
}

fn merge_keys(mut a: KeysCfg, b: KeysCfg) -> KeysCfg {
    if a.strategy.is_none() {
        a.strategy = b.strategy;
    }
    if a.max_length.is_none() {
        a.max_length = b.max_length;
    }
    if a.use_context.is_none() {
        a.use_context = b.use_context;
    }
    if a.prefix.is_none() {
        a.prefix = b.prefix;
    }
    a
}

fn merge_processing(mut a: ProcessingCfg, b: ProcessingCfg) -> ProcessingCfg {
    if a.create_backups.is_none() {
        a.create_backups = b.create_backups;
    }
    a
}

fn merge_duplicates(mut a: DuplicatesCfg, b: DuplicatesCfg) -> DuplicatesCfg {
    if a.key_similarity.is_none() {
        a.key_similarity = b.key_similarity;
    }
    if a.value_similarity.is_none() {
        a.value_similarity = b.value_similarity;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_prefers_first_hit() {
        let a = FarlocConfig {
            source_lang: Some("fa".into()),
            ..Default::default()
        };
        let b = FarlocConfig {
            source_lang: Some("ar".into()),
            target_lang: Some("en".into()),
            ..Default::default()
        };
        let m = merge(a, b);
        assert_eq!(m.source_lang.as_deref(), Some("fa"));
        assert_eq!(m.target_lang.as_deref(), Some("en"));
    }

    #[test]
    fn merge_descends_into_sections() {
        let a = FarlocConfig {
            keys: Some(KeysCfg {
                max_length: Some(40),
                ..Default::default()
            }),
            ..Default::default()
        };
        let b = FarlocConfig {
            keys: Some(KeysCfg {
                max_length: Some(50),
                prefix: Some("app".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let m = merge(a, b);
        let keys = m.keys.unwrap();
        assert_eq!(keys.max_length, Some(40));
        assert_eq!(keys.prefix.as_deref(), Some("app"));
    }

    #[test]
    fn parses_full_config() {
        let cfg: FarlocConfig = toml::from_str(
            r#"
            source_lang = "fa"
            target_lang = "en"

            [translations]
            directory = "locales"

            [keys]
            strategy = "transliteration"
            max_length = 50
            use_context = true
            prefix = "app"

            [processing]
            create_backups = true

            [duplicates]
            key_similarity = 0.7
            value_similarity = 0.8
            "#,
        )
        .unwrap();
        assert_eq!(cfg.source_lang.as_deref(), Some("fa"));
        assert_eq!(
            cfg.translations.unwrap().directory.as_deref(),
            Some("locales")
        );
        assert_eq!(cfg.keys.unwrap().max_length, Some(50));
        assert_eq!(cfg.processing.unwrap().create_backups, Some(true));
        assert_eq!(cfg.duplicates.unwrap().value_similarity, Some(0.8));
    }
}
