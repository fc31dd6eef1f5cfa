//! HTTP word provider and result sink for the MonkeyWords API.

use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;

use super::{ResultSink, WordProvider};
use crate::error::{FetchError, SubmitError};
use crate::language::Language;
use crate::metrics::SessionResult;
use crate::word::Word;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn build_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

fn trim_base(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Fetches word pools from `GET {base}/words?lang=..&level=..`.
pub struct HttpWordProvider {
    base_url: String,
    client: reqwest::Client,
}

impl HttpWordProvider {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: trim_base(base_url),
            client: build_client(),
        }
    }
}

#[async_trait]
impl WordProvider for HttpWordProvider {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self), fields(lang = language.code()))]
    async fn fetch(&self, language: Language, level: u32) -> Result<Vec<Word>, FetchError> {
        let url = format!(
            "{}/words?lang={}&level={}",
            self.base_url,
            language.code(),
            level
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(DEFAULT_TIMEOUT_SECS)
            } else {
                FetchError::Unreachable(format!("{} ({e})", self.base_url))
            }
        })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::Api { status, message });
        }

        let words: Vec<Word> = response
            .json()
            .await
            .map_err(|e| FetchError::Malformed(e.to_string()))?;

        tracing::debug!(count = words.len(), "fetched word pool");
        Ok(words)
    }
}

/// Posts results to `POST {base}/results`.
pub struct HttpResultSink {
    base_url: String,
    client: reqwest::Client,
}

impl HttpResultSink {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: trim_base(base_url),
            client: build_client(),
        }
    }
}

#[async_trait]
impl ResultSink for HttpResultSink {
    fn name(&self) -> &str {
        "http"
    }

    async fn submit(&self, result: &SessionResult) -> Result<(), SubmitError> {
        let response = self
            .client
            .post(format!("{}/results", self.base_url))
            .json(result)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SubmitError::Timeout(DEFAULT_TIMEOUT_SECS)
                } else {
                    SubmitError::Unreachable(format!("{} ({e})", self.base_url))
                }
            })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let message = response.text().await.unwrap_or_default();
            return Err(SubmitError::Api { status, message });
        }

        Ok(())
    }
}
