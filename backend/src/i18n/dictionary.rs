//! Dictionary-backed translator.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use super::{Language, Translator};

/// Translator backed by a multilingual dictionary.
///
/// The dictionary file is a JSON list of entries keyed by language column:
///
/// ```json
/// [{"DE": "zum Artikel", "EN-GB": "to the article"}]
/// ```
///
/// Entries without a `DE` column are ignored.
#[derive(Debug, Clone, Default)]
pub struct DictionaryTranslator {
    /// German source string → (language → translation)
    entries: HashMap<String, HashMap<Language, String>>,
}

impl DictionaryTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        let raw: Vec<HashMap<String, Value>> =
            serde_json::from_str(json).map_err(|e| format!("Invalid dictionary JSON: {}", e))?;

        let mut translator = Self::new();
        for entry in raw {
            let Some(source) = entry.get(Language::SOURCE.dictionary_key()).and_then(Value::as_str)
            else {
                continue;
            };
            for language in [Language::En] {
                if let Some(text) = entry.get(language.dictionary_key()).and_then(Value::as_str) {
                    translator.insert(source, language, text);
                }
            }
        }
        Ok(translator)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read dictionary file: {}", e))?;
        let translator = Self::from_json(&content)?;
        log::info!(
            "Loaded {} dictionary entries from {}",
            translator.len(),
            path.as_ref().display()
        );
        Ok(translator)
    }

    pub fn insert(&mut self, source: &str, language: Language, text: &str) {
        self.entries
            .entry(source.to_string())
            .or_default()
            .insert(language, text.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Translator for DictionaryTranslator {
    fn translate(&self, text: &str, language: Language) -> String {
        if language == Language::SOURCE {
            return text.to_string();
        }
        match self.entries.get(text).and_then(|m| m.get(&language)) {
            Some(translated) => translated.clone(),
            None => {
                let head: String = text.chars().take(30).collect();
                log::warn!("No {} translation for '{}'", language, head);
                text.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DICT: &str = r#"[
        {"DE": "zum Artikel", "EN-GB": "to the article"},
        {"DE": "Aufrufe", "EN-GB": "views"},
        {"EN-GB": "orphan"},
        {"DE": "nur deutsch"}
    ]"#;

    #[test]
    fn test_translate_known() {
        let t = DictionaryTranslator::from_json(DICT).unwrap();
        assert_eq!(t.translate("zum Artikel", Language::En), "to the article");
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_source_language_passthrough() {
        let t = DictionaryTranslator::from_json(DICT).unwrap();
        assert_eq!(t.translate("zum Artikel", Language::De), "zum Artikel");
    }

    #[test]
    fn test_unknown_falls_back_to_input() {
        let t = DictionaryTranslator::from_json(DICT).unwrap();
        assert_eq!(t.translate("nur deutsch", Language::En), "nur deutsch");
        assert_eq!(t.translate("unbekannt", Language::En), "unbekannt");
    }

    #[test]
    fn test_invalid_json() {
        assert!(DictionaryTranslator::from_json("{\"DE\": 1}").is_err());
    }
}
