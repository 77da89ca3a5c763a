//! HTTP client for a batch key-phrase detection service
//!
//! Request:
//! ```json
//! {"TextList": ["book a flight", "..."], "LanguageCode": "en"}
//! ```
//! Response:
//! ```json
//! {"ResultList": [{"Index": 0, "KeyPhrases": [{"Text": "a flight", "Score": 0.99}]}],
//!  "ErrorList":  [{"Index": 1, "ErrorCode": "TextSizeLimitExceeded", "ErrorMessage": "..."}]}
//! ```

use super::KeyPhraseService;
use crate::config::{ExtractionConfig, MAX_EXTRACTION_BATCH_SIZE};
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// [`KeyPhraseService`] backed by a JSON/HTTP endpoint
pub struct HttpKeyPhraseService {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpKeyPhraseService {
    /// Create a client for `endpoint`
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }

    /// Build from configuration, resolving the bearer token from the environment
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(Error::Config("extraction.endpoint must be set".to_string()));
        }
        Self::new(
            config.endpoint.clone(),
            config.resolve_api_key(),
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait]
impl KeyPhraseService for HttpKeyPhraseService {
    async fn detect_key_phrases(
        &self,
        texts: &[String],
        language_code: &str,
    ) -> Result<Vec<Vec<String>>> {
        if texts.len() > MAX_EXTRACTION_BATCH_SIZE {
            return Err(Error::Extraction(format!(
                "batch of {} texts exceeds the limit of {}",
                texts.len(),
                MAX_EXTRACTION_BATCH_SIZE
            )));
        }

        let payload = BatchDetectRequest {
            text_list: texts,
            language_code,
        };

        let mut request = self.client.post(&self.endpoint).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Extraction(format!("Key phrase request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Extraction(format!(
                "Key phrase service returned {}: {}",
                status, body
            )));
        }

        let result: BatchDetectResponse = response
            .json()
            .await
            .map_err(|e| Error::Extraction(format!("Failed to parse key phrase response: {}", e)))?;

        for item in &result.error_list {
            tracing::warn!(
                index = item.index,
                code = %item.error_code,
                "Key phrase detection failed for text: {}",
                item.error_message
            );
        }

        let mut results = result.result_list;
        results.sort_by_key(|r| r.index);
        Ok(results
            .into_iter()
            .map(|r| r.key_phrases.into_iter().map(|p| p.text).collect())
            .collect())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct BatchDetectRequest<'a> {
    text_list: &'a [String],
    language_code: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BatchDetectResponse {
    #[serde(default)]
    result_list: Vec<BatchItemResult>,
    #[serde(default)]
    error_list: Vec<BatchItemError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BatchItemResult {
    index: usize,
    #[serde(default)]
    key_phrases: Vec<KeyPhrase>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct KeyPhrase {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BatchItemError {
    index: usize,
    #[serde(default)]
    error_code: String,
    #[serde(default)]
    error_message: String,
}
