//! In-memory provider and sink for exercising the session without a server.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ResultSink, WordProvider};
use crate::error::{FetchError, SubmitError};
use crate::language::Language;
use crate::metrics::SessionResult;
use crate::word::Word;

/// Serves fixed word lists and counts how often it was asked.
pub struct MockWordProvider {
    /// Words per language; languages without an entry get `default_words`.
    words: HashMap<Language, Vec<Word>>,
    default_words: Vec<Word>,
    fail: bool,
    fetch_count: AtomicU32,
    last_request: Mutex<Option<(Language, u32)>>,
}

impl MockWordProvider {
    /// A provider that answers every request with `words`.
    pub fn new(words: Vec<Word>) -> Self {
        Self {
            words: HashMap::new(),
            default_words: words,
            fail: false,
            fetch_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// A provider whose every fetch fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(vec![])
        }
    }

    pub fn with_language(mut self, language: Language, words: Vec<Word>) -> Self {
        self.words.insert(language, words);
        self
    }

    pub fn fetch_count(&self) -> u32 {
        self.fetch_count.load(Ordering::Relaxed)
    }

    pub fn last_request(&self) -> Option<(Language, u32)> {
        self.last_request.lock().ok().and_then(|r| *r)
    }
}

#[async_trait]
impl WordProvider for MockWordProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, language: Language, level: u32) -> Result<Vec<Word>, FetchError> {
        self.fetch_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some((language, level));
        }

        if self.fail {
            return Err(FetchError::Unreachable("mock".to_string()));
        }

        Ok(self
            .words
            .get(&language)
            .unwrap_or(&self.default_words)
            .clone())
    }
}

/// Records submitted results, or rejects them all when built with `failing`.
pub struct MockResultSink {
    fail: bool,
    attempts: AtomicU32,
    submitted: Mutex<Vec<SessionResult>>,
}

impl MockResultSink {
    pub fn new() -> Self {
        Self {
            fail: false,
            attempts: AtomicU32::new(0),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::Relaxed)
    }

    pub fn submitted(&self) -> Vec<SessionResult> {
        self.submitted
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

impl Default for MockResultSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResultSink for MockResultSink {
    fn name(&self) -> &str {
        "mock"
    }

    async fn submit(&self, result: &SessionResult) -> Result<(), SubmitError> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        if self.fail {
            return Err(SubmitError::Rejected("mock sink is failing".to_string()));
        }
        if let Ok(mut submitted) = self.submitted.lock() {
            submitted.push(*result);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counts_fetches_and_remembers_request() {
        let provider = MockWordProvider::new(vec![Word::new(1, "猫", "ねこ")]);

        let words = provider.fetch(Language::Japanese, 2).await.unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(provider.fetch_count(), 1);
        assert_eq!(provider.last_request(), Some((Language::Japanese, 2)));
    }

    #[tokio::test]
    async fn per_language_words_override_default() {
        let provider = MockWordProvider::new(vec![Word::new(1, "猫", "ねこ")])
            .with_language(Language::German, vec![Word::new(2, "dog", "Hund")]);

        let de = provider.fetch(Language::German, 1).await.unwrap();
        let jp = provider.fetch(Language::Japanese, 1).await.unwrap();
        assert_eq!(de[0].target_pron, "Hund");
        assert_eq!(jp[0].target_pron, "ねこ");
    }

    #[tokio::test]
    async fn failing_provider_errors() {
        let provider = MockWordProvider::failing();
        assert!(provider.fetch(Language::French, 1).await.is_err());
        assert_eq!(provider.fetch_count(), 1);
    }
}
