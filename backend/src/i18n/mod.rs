//! Display-string translation.
//!
//! UI strings are authored in German. The language is chosen per request and
//! passed explicitly to a [`Translator`]; there is no ambient "current
//! language". The pipeline itself never translates anything.

pub mod dictionary;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use dictionary::DictionaryTranslator;

/// Supported UI / encyclopedia languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    De,
    En,
}

impl Language {
    /// Source language of all UI strings.
    pub const SOURCE: Language = Language::De;

    /// App code, also the Wikipedia subdomain.
    pub fn code(&self) -> &'static str {
        match self {
            Language::De => "de",
            Language::En => "en",
        }
    }

    /// Column key used in the translation dictionary.
    pub fn dictionary_key(&self) -> &'static str {
        match self {
            Language::De => "DE",
            Language::En => "EN-GB",
        }
    }

    /// MediaWiki API endpoint of this language edition.
    pub fn api_url(&self) -> String {
        format!("https://{}.wikipedia.org/w/api.php", self.code())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "de" | "de-de" | "german" | "deutsch" => Ok(Language::De),
            "en" | "en-gb" | "en-us" | "english" => Ok(Language::En),
            other => Err(format!("Unsupported language: {}", other)),
        }
    }
}

/// Translates German UI strings into a target language.
pub trait Translator: Send + Sync {
    /// Translation of `text` into `language`; falls back to `text` itself.
    fn translate(&self, text: &str, language: Language) -> String;
}

/// Returns every string unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn translate(&self, text: &str, _language: Language) -> String {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parse() {
        assert_eq!("de".parse::<Language>().unwrap(), Language::De);
        assert_eq!("EN-GB".parse::<Language>().unwrap(), Language::En);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::En.dictionary_key(), "EN-GB");
        assert_eq!(Language::De.api_url(), "https://de.wikipedia.org/w/api.php");
        assert_eq!(Language::default(), Language::SOURCE);
    }

    #[test]
    fn test_language_serde() {
        assert_eq!(serde_json::to_string(&Language::En).unwrap(), "\"en\"");
        let lang: Language = serde_json::from_str("\"de\"").unwrap();
        assert_eq!(lang, Language::De);
    }

    #[test]
    fn test_identity_translator() {
        assert_eq!(IdentityTranslator.translate("zum Artikel", Language::En), "zum Artikel");
    }
}
