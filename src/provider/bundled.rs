use async_trait::async_trait;
use include_dir::{include_dir, Dir};

use super::WordProvider;
use crate::error::FetchError;
use crate::language::Language;
use crate::word::Word;

static LANG_DIR: Dir = include_dir!("src/lang");

/// Offline provider serving the word lists compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledWordProvider;

impl BundledWordProvider {
    /// Every bundled word for `language`, across all levels
    pub fn all_words(language: Language) -> Result<Vec<Word>, FetchError> {
        let file_name = format!("{}.json", language.code());
        let file = LANG_DIR
            .get_file(&file_name)
            .ok_or_else(|| FetchError::Unavailable(language.to_string()))?;

        let contents = file
            .contents_utf8()
            .ok_or_else(|| FetchError::Malformed(format!("{file_name} is not utf-8")))?;

        serde_json::from_str(contents).map_err(|e| FetchError::Malformed(format!("{file_name}: {e}")))
    }
}

#[async_trait]
impl WordProvider for BundledWordProvider {
    fn name(&self) -> &str {
        "bundled"
    }

    async fn fetch(&self, language: Language, level: u32) -> Result<Vec<Word>, FetchError> {
        Ok(Self::all_words(language)?
            .into_iter()
            .filter(|w| w.level == level)
            .collect())
    }
}
