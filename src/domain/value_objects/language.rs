//! Display languages and translated catalog names
//!
//! Name resolution is never cached: callers pass the language on every
//! lookup, so switching the display language needs no entity rebuild.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::EntityError;

/// Languages catalog definitions may carry names for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "de")]
    German,
}

impl Language {
    /// Language used when the requested one has no name
    pub const FALLBACK: Language = Language::English;

    pub const ALL: [Language; 2] = [Language::English, Language::German];

    /// Lowercase tag used as element name in definition files
    pub const fn tag(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::German => "de",
        }
    }

    /// Parse a tag, tolerating case and region suffixes (`de-AT`, `en_GB`)
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        let lang = normalized.split(['-', '_']).next().unwrap_or("");
        match lang {
            "en" | "english" => Some(Self::English),
            "de" | "german" | "deutsch" => Some(Self::German),
            _ => None,
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::FALLBACK
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = EntityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            EntityError::invalid("Language", "tag", format!("unsupported language '{}'", s))
        })
    }
}

/// Localized names of one catalog entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedNames(BTreeMap<Language, String>);

impl TranslatedNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// The same text for every supported language
    pub fn uniform(text: impl Into<String>) -> Self {
        let text = text.into();
        Self(Language::ALL.iter().map(|l| (*l, text.clone())).collect())
    }

    pub fn with(mut self, language: Language, name: impl Into<String>) -> Self {
        self.insert(language, name);
        self
    }

    pub fn insert(&mut self, language: Language, name: impl Into<String>) {
        self.0.insert(language, name.into());
    }

    pub fn get(&self, language: Language) -> Option<&str> {
        self.0.get(&language).map(String::as_str)
    }

    /// True when at least one language carries a non-blank name
    pub fn has_any(&self) -> bool {
        self.0.values().any(|n| !n.trim().is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Language, &str)> {
        self.0.iter().map(|(l, n)| (*l, n.as_str()))
    }

    /// Requested language, then English; `None` means the data lacks both
    pub fn resolve(&self, language: Language) -> Option<&str> {
        self.non_blank(language)
            .or_else(|| self.non_blank(Language::FALLBACK))
    }

    /// Resolved name, or an empty string when nothing resolves
    pub fn display_name(&self, language: Language) -> String {
        self.resolve(language).unwrap_or_default().to_string()
    }

    fn non_blank(&self, language: Language) -> Option<&str> {
        self.get(language).filter(|n| !n.trim().is_empty())
    }
}

impl FromIterator<(Language, String)> for TranslatedNames {
    fn from_iter<I: IntoIterator<Item = (Language, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_requested_language() {
        let names = TranslatedNames::new()
            .with(Language::English, "Fortitude")
            .with(Language::German, "Seelenstärke");
        assert_eq!(names.resolve(Language::German), Some("Seelenstärke"));
        assert_eq!(names.resolve(Language::English), Some("Fortitude"));
    }

    #[test]
    fn test_resolve_falls_back_to_english() {
        let names = TranslatedNames::new().with(Language::English, "Fortitude");
        assert_eq!(names.resolve(Language::German), Some("Fortitude"));

        let blank_german = names.clone().with(Language::German, "  ");
        assert_eq!(blank_german.resolve(Language::German), Some("Fortitude"));
    }

    #[test]
    fn test_resolve_empty_map_is_undefined() {
        let names = TranslatedNames::new();
        assert_eq!(names.resolve(Language::English), None);
        assert_eq!(names.display_name(Language::English), "");
        assert!(!names.has_any());
    }

    #[test]
    fn test_german_only_name_does_not_resolve_for_english() {
        let names = TranslatedNames::new().with(Language::German, "Geschick");
        assert_eq!(names.resolve(Language::English), None);
        assert!(names.has_any());
    }

    #[test]
    fn test_language_parse_tolerates_regions() {
        assert_eq!(Language::parse("de-AT"), Some(Language::German));
        assert_eq!(Language::parse("EN_gb"), Some(Language::English));
        assert_eq!(Language::parse("fr"), None);
        assert!("xx".parse::<Language>().is_err());
    }
}
