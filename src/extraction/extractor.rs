//! Batching phrase extractor
//!
//! Splits texts into consecutive chunks no larger than the service ceiling,
//! calls the service once per chunk and flattens every returned phrase into
//! one list. A failed chunk contributes nothing; later chunks still run.

use super::KeyPhraseService;
use crate::config::MAX_EXTRACTION_BATCH_SIZE;
use std::sync::Arc;

/// What one extraction pass produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionReport {
    /// Every phrase from every successful chunk, chunk order preserved
    pub phrases: Vec<String>,
    /// Number of service calls issued
    pub batches: usize,
    /// Number of calls that failed and were dropped
    pub failed_batches: usize,
}

/// Chunks texts and collects key phrases from a [`KeyPhraseService`]
pub struct PhraseExtractor {
    service: Arc<dyn KeyPhraseService>,
    language_code: String,
    batch_size: usize,
}

impl PhraseExtractor {
    /// Create an extractor.
    ///
    /// `batch_size` is clamped to `1..=MAX_EXTRACTION_BATCH_SIZE`.
    pub fn new(
        service: Arc<dyn KeyPhraseService>,
        language_code: impl Into<String>,
        batch_size: usize,
    ) -> Self {
        Self {
            service,
            language_code: language_code.into(),
            batch_size: batch_size.clamp(1, MAX_EXTRACTION_BATCH_SIZE),
        }
    }

    /// Effective chunk size
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Extract phrases from every text, tolerating per-chunk failures
    pub async fn extract_phrases(&self, texts: &[String]) -> ExtractionReport {
        let mut report = ExtractionReport::default();

        for (index, chunk) in texts.chunks(self.batch_size).enumerate() {
            report.batches += 1;
            match self
                .service
                .detect_key_phrases(chunk, &self.language_code)
                .await
            {
                Ok(results) => {
                    let before = report.phrases.len();
                    report.phrases.extend(results.into_iter().flatten());
                    tracing::debug!(
                        batch = index,
                        texts = chunk.len(),
                        phrases = report.phrases.len() - before,
                        "Extracted key phrases"
                    );
                }
                Err(e) => {
                    report.failed_batches += 1;
                    tracing::warn!(
                        batch = index,
                        texts = chunk.len(),
                        error = %e,
                        "Key phrase batch failed, skipping"
                    );
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Returns each text's words as its phrases; fails on listed call indices
    struct WordService {
        calls: Mutex<Vec<usize>>,
        fail_calls: HashSet<usize>,
    }

    impl WordService {
        fn new(fail_calls: &[usize]) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_calls: fail_calls.iter().copied().collect(),
            }
        }

        fn call_sizes(&self) -> Vec<usize> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl KeyPhraseService for WordService {
        async fn detect_key_phrases(
            &self,
            texts: &[String],
            language_code: &str,
        ) -> Result<Vec<Vec<String>>> {
            assert_eq!(language_code, "en");
            let index = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(texts.len());
                calls.len() - 1
            };
            if self.fail_calls.contains(&index) {
                return Err(Error::Extraction(format!("throttled on call {}", index)));
            }
            Ok(texts
                .iter()
                .map(|t| t.split_whitespace().map(str::to_string).collect())
                .collect())
        }
    }

    fn texts(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("text{}", i)).collect()
    }

    #[tokio::test]
    async fn test_chunks_never_exceed_limit() {
        let service = Arc::new(WordService::new(&[]));
        let extractor = PhraseExtractor::new(service.clone(), "en", 25);

        let report = extractor.extract_phrases(&texts(60)).await;

        assert_eq!(service.call_sizes(), vec![25, 25, 10]);
        assert_eq!(report.batches, 3);
        assert_eq!(report.failed_batches, 0);
        assert_eq!(report.phrases.len(), 60);
        assert_eq!(report.phrases[0], "text0");
        assert_eq!(report.phrases[59], "text59");
    }

    #[tokio::test]
    async fn test_call_count_is_ceiling_division() {
        for n in [1usize, 24, 25, 26, 50, 51, 100] {
            let service = Arc::new(WordService::new(&[]));
            let extractor = PhraseExtractor::new(service.clone(), "en", 25);
            extractor.extract_phrases(&texts(n)).await;
            let sizes = service.call_sizes();
            assert_eq!(sizes.len(), n.div_ceil(25), "n = {}", n);
            assert!(sizes.iter().all(|&s| s <= 25));
            assert_eq!(sizes.iter().sum::<usize>(), n);
        }
    }

    #[tokio::test]
    async fn test_oversized_batch_size_is_clamped() {
        let service = Arc::new(WordService::new(&[]));
        let extractor = PhraseExtractor::new(service.clone(), "en", 100);
        assert_eq!(extractor.batch_size(), 25);

        extractor.extract_phrases(&texts(30)).await;
        assert_eq!(service.call_sizes(), vec![25, 5]);
    }

    #[tokio::test]
    async fn test_failed_chunk_is_dropped_others_kept() {
        let service = Arc::new(WordService::new(&[1]));
        let extractor = PhraseExtractor::new(service.clone(), "en", 2);

        let report = extractor
            .extract_phrases(&[
                "book flight".to_string(),
                "book hotel".to_string(),
                "lost bag".to_string(),
                "wifi password".to_string(),
                "late checkout".to_string(),
            ])
            .await;

        assert_eq!(service.call_sizes(), vec![2, 2, 1]);
        assert_eq!(report.batches, 3);
        assert_eq!(report.failed_batches, 1);
        assert_eq!(
            report.phrases,
            vec!["book", "flight", "book", "hotel", "late", "checkout"]
        );
    }

    #[tokio::test]
    async fn test_all_chunks_fail_yields_empty() {
        let service = Arc::new(WordService::new(&[0, 1]));
        let extractor = PhraseExtractor::new(service, "en", 25);

        let report = extractor.extract_phrases(&texts(30)).await;
        assert!(report.phrases.is_empty());
        assert_eq!(report.failed_batches, 2);
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_calls() {
        let service = Arc::new(WordService::new(&[]));
        let extractor = PhraseExtractor::new(service.clone(), "en", 25);

        let report = extractor.extract_phrases(&[]).await;
        assert_eq!(report, ExtractionReport::default());
        assert!(service.call_sizes().is_empty());
    }
}
