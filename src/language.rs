use crate::error::ParseLanguageError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Levels offered by the level selector. The engine itself accepts any level >= 1.
pub const LEVELS: [u32; 2] = [1, 2];

/// How keystrokes relate to the pronunciation the user must reproduce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMode {
    /// Pronunciation is typed directly, keystroke for keystroke.
    Direct,
    /// Latin keystrokes progressively resolve into the target script.
    Transliterated,
}

/// Languages a word pool can be fetched for
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
pub enum Language {
    #[default]
    #[serde(rename = "jp")]
    #[value(name = "jp", alias = "japanese")]
    Japanese,
    #[serde(rename = "de")]
    #[value(name = "de", alias = "german")]
    German,
    #[serde(rename = "fr")]
    #[value(name = "fr", alias = "french")]
    French,
    #[serde(rename = "ru")]
    #[value(name = "ru", alias = "russian")]
    Russian,
    #[serde(rename = "es")]
    #[value(name = "es", alias = "spanish")]
    Spanish,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::Japanese,
        Language::German,
        Language::French,
        Language::Russian,
        Language::Spanish,
    ];

    /// Two-letter code used on the wire
    pub fn code(&self) -> &'static str {
        match self {
            Language::Japanese => "jp",
            Language::German => "de",
            Language::French => "fr",
            Language::Russian => "ru",
            Language::Spanish => "es",
        }
    }

    pub fn entry_mode(&self) -> EntryMode {
        match self {
            Language::Japanese => EntryMode::Transliterated,
            _ => EntryMode::Direct,
        }
    }

    pub fn input_hint(&self) -> &'static str {
        match self.entry_mode() {
            EntryMode::Transliterated => "Type in Romaji → Kana",
            EntryMode::Direct => "Type the word exactly",
        }
    }

    /// The language after this one in selector order, wrapping around
    pub fn next(&self) -> Language {
        let idx = Self::ALL.iter().position(|l| l == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl FromStr for Language {
    type Err = ParseLanguageError;

    /// Accepts either the wire code (`jp`) or the English name (`japanese`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|l| l.code() == needle || l.to_string().to_lowercase() == needle)
            .ok_or_else(|| ParseLanguageError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<&str> = Language::ALL.iter().map(|l| l.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), Language::ALL.len());
    }

    #[test]
    fn test_only_japanese_is_transliterated() {
        for lang in Language::ALL {
            let expected = if lang == Language::Japanese {
                EntryMode::Transliterated
            } else {
                EntryMode::Direct
            };
            assert_eq!(lang.entry_mode(), expected, "{lang}");
        }
    }

    #[test]
    fn test_from_str_accepts_code_and_name() {
        assert_eq!("jp".parse::<Language>(), Ok(Language::Japanese));
        assert_eq!("German".parse::<Language>(), Ok(Language::German));
        assert_eq!(" RU ".parse::<Language>(), Ok(Language::Russian));
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "xx".parse::<Language>().unwrap_err();
        assert_eq!(err, ParseLanguageError("xx".to_string()));
        assert_eq!(err.to_string(), "unknown language: xx");
    }

    #[test]
    fn test_next_cycles_through_all() {
        let mut lang = Language::Japanese;
        for _ in 0..Language::ALL.len() {
            lang = lang.next();
        }
        assert_eq!(lang, Language::Japanese);
        assert_eq!(Language::Spanish.next(), Language::Japanese);
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(
            serde_json::to_string(&Language::French).unwrap(),
            "\"fr\""
        );
        let lang: Language = serde_json::from_str("\"es\"").unwrap();
        assert_eq!(lang, Language::Spanish);
    }

    #[test]
    fn test_display_is_label() {
        assert_eq!(Language::Japanese.to_string(), "Japanese");
        assert_eq!(Language::Spanish.to_string(), "Spanish");
    }
}
