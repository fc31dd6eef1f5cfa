use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

/// Optional grammatical class carried by some vocabularies (e.g. noun gender).
///
/// On the wire this is a string: `"0"`, `"1"` and `"2"` select a class,
/// anything else (including `null`) means the word is untagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum GrammaticalTag {
    #[default]
    None,
    ClassA,
    ClassB,
    ClassC,
}

impl GrammaticalTag {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "0" => GrammaticalTag::ClassA,
            "1" => GrammaticalTag::ClassB,
            "2" => GrammaticalTag::ClassC,
            _ => GrammaticalTag::None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            GrammaticalTag::None => "",
            GrammaticalTag::ClassA => "0",
            GrammaticalTag::ClassB => "1",
            GrammaticalTag::ClassC => "2",
        }
    }
}

impl From<Option<String>> for GrammaticalTag {
    fn from(code: Option<String>) -> Self {
        code.map_or(GrammaticalTag::None, |c| GrammaticalTag::from_code(&c))
    }
}

impl From<GrammaticalTag> for String {
    fn from(tag: GrammaticalTag) -> Self {
        tag.code().to_string()
    }
}

fn default_level() -> u32 {
    1
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A vocabulary entry as served by the word provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: u64,
    /// What is shown above the word: kanji for Japanese, a translation otherwise.
    #[serde(rename = "word")]
    pub display_form: String,
    /// The exact string the user has to reproduce.
    #[serde(rename = "pron")]
    pub target_pron: String,
    #[serde(rename = "romaji", default, deserialize_with = "null_as_empty")]
    pub transliteration_hint: String,
    #[serde(rename = "gram", default)]
    pub grammatical_tag: GrammaticalTag,
    #[serde(default = "default_level")]
    pub level: u32,
}

impl Word {
    pub fn new(id: u64, display_form: impl Into<String>, target_pron: impl Into<String>) -> Self {
        Self {
            id,
            display_form: display_form.into(),
            target_pron: target_pron.into(),
            transliteration_hint: String::new(),
            grammatical_tag: GrammaticalTag::None,
            level: default_level(),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.transliteration_hint = hint.into();
        self
    }

    pub fn with_tag(mut self, tag: GrammaticalTag) -> Self {
        self.grammatical_tag = tag;
        self
    }

    /// Length of the pronunciation target in characters
    pub fn target_len(&self) -> usize {
        self.target_pron.chars().count()
    }
}

/// The words fetched for one language/level selection.
///
/// Cloning is cheap and shares the same backing list, so pages regenerated
/// from a clone are drawn from the very same pool.
#[derive(Debug, Clone, Default)]
pub struct WordPool {
    words: Arc<[Word]>,
}

impl WordPool {
    pub fn new(words: Vec<Word>) -> Self {
        Self {
            words: words.into(),
        }
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// True when both handles share one backing list
    pub fn same_pool(&self, other: &WordPool) -> bool {
        Arc::ptr_eq(&self.words, &other.words)
    }
}

impl From<Vec<Word>> for WordPool {
    fn from(words: Vec<Word>) -> Self {
        WordPool::new(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_deserialization_from_api_shape() {
        let json_data = r#"
        {
            "id": 7,
            "romaji": "neko",
            "word": "猫",
            "pron": "ねこ",
            "gram": "",
            "level": 1
        }
        "#;

        let word: Word = serde_json::from_str(json_data).expect("Failed to deserialize word");

        assert_eq!(word.id, 7);
        assert_eq!(word.display_form, "猫");
        assert_eq!(word.target_pron, "ねこ");
        assert_eq!(word.transliteration_hint, "neko");
        assert_eq!(word.grammatical_tag, GrammaticalTag::None);
        assert_eq!(word.level, 1);
    }

    #[test]
    fn test_word_deserialization_with_missing_optional_fields() {
        let word: Word =
            serde_json::from_str(r#"{"id": 1, "word": "dog", "pron": "Hund"}"#).unwrap();

        assert_eq!(word.transliteration_hint, "");
        assert_eq!(word.grammatical_tag, GrammaticalTag::None);
        assert_eq!(word.level, 1);
    }

    #[test]
    fn test_word_deserialization_with_null_tag_and_hint() {
        let words: Vec<Word> = serde_json::from_str(
            r#"[{"id":1,"romaji":null,"word":"猫","pron":"ねこ","gram":null,"level":1}]"#,
        )
        .unwrap();

        assert_eq!(words[0].grammatical_tag, GrammaticalTag::None);
        assert_eq!(words[0].transliteration_hint, "");
        assert_eq!(words[0].target_pron, "ねこ");
    }

    #[test]
    fn test_grammatical_tag_codes() {
        assert_eq!(GrammaticalTag::from_code("0"), GrammaticalTag::ClassA);
        assert_eq!(GrammaticalTag::from_code("1"), GrammaticalTag::ClassB);
        assert_eq!(GrammaticalTag::from_code("2"), GrammaticalTag::ClassC);
        assert_eq!(GrammaticalTag::from_code(""), GrammaticalTag::None);
        assert_eq!(GrammaticalTag::from_code("m"), GrammaticalTag::None);
    }

    #[test]
    fn test_grammatical_tag_serializes_as_code() {
        let word = Word::new(3, "house", "Haus").with_tag(GrammaticalTag::ClassC);
        let json = serde_json::to_value(&word).unwrap();
        assert_eq!(json["gram"], "2");
        assert_eq!(json["pron"], "Haus");
        assert_eq!(json["word"], "house");
    }

    #[test]
    fn test_target_len_counts_chars_not_bytes() {
        assert_eq!(Word::new(1, "猫", "ねこ").target_len(), 2);
        assert_eq!(Word::new(2, "door", "Tür").target_len(), 3);
    }

    #[test]
    fn test_pool_clones_share_storage() {
        let pool = WordPool::new(vec![Word::new(1, "a", "a")]);
        let clone = pool.clone();
        let other = WordPool::new(vec![Word::new(1, "a", "a")]);

        assert!(pool.same_pool(&clone));
        assert!(!pool.same_pool(&other));
        assert_eq!(pool.len(), 1);
        assert!(WordPool::default().is_empty());
    }
}
