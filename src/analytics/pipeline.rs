//! Pipeline orchestrator
//!
//! ```text
//! READ_CORPUS ─▶ EXTRACT_TEXTS ─▶ empty? ─▶ EXTRACT_PHRASES ─▶ empty? ─▶ AGGREGATE ─▶ empty? ─▶ PUBLISH
//!      │               │                          │                          │
//!      └─ empty ───────┴── no-op ─────────────────┴──────────────────────────┘
//! ```
//!
//! Storage errors abort the run and become an `error` outcome. Extraction
//! chunk failures never do. Every call produces a [`RunOutcome`].

use super::aggregate::aggregate_top;
use super::publisher::ResultPublisher;
use super::reader::CorpusReader;
use super::types::{NoOpReason, RunOutcome, RunStatus};
use crate::config::FaqUpdaterConfig;
use crate::error::Result;
use crate::extraction::{KeyPhraseService, PhraseExtractor};
use crate::storage::{MessageStore, PhraseStore};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::Instrument;

/// Full-corpus key-phrase aggregation pipeline
pub struct Pipeline {
    reader: CorpusReader,
    extractor: PhraseExtractor,
    publisher: ResultPublisher,
    top_k: usize,
    last_outcome: RwLock<Option<RunOutcome>>,
}

impl Pipeline {
    /// Assemble a pipeline from its stages
    pub fn new(
        reader: CorpusReader,
        extractor: PhraseExtractor,
        publisher: ResultPublisher,
        top_k: usize,
    ) -> Self {
        Self {
            reader,
            extractor,
            publisher,
            top_k,
            last_outcome: RwLock::new(None),
        }
    }

    /// Wire a pipeline from configuration and injected collaborators
    pub fn from_config(
        config: &FaqUpdaterConfig,
        messages: Arc<dyn MessageStore>,
        phrases: Arc<dyn PhraseStore>,
        service: Arc<dyn KeyPhraseService>,
    ) -> Self {
        Self::new(
            CorpusReader::new(messages),
            PhraseExtractor::new(
                service,
                config.extraction.language_code.clone(),
                config.extraction.batch_size,
            ),
            ResultPublisher::new(phrases, config.analytics.write_batch_size),
            config.analytics.top_k,
        )
    }

    /// Outcome of the most recent run, if any
    pub async fn last_outcome(&self) -> Option<RunOutcome> {
        self.last_outcome.read().await.clone()
    }

    /// Execute one run and report how it ended
    pub async fn run(&self) -> RunOutcome {
        let run_id = uuid::Uuid::new_v4().to_string();
        let span = tracing::info_span!("analytics_run", run_id = %run_id);

        let mut outcome = RunOutcome {
            run_id,
            status: RunStatus::Ok,
            message_count: 0,
            phrase_count: 0,
            published_count: 0,
            failed_batches: 0,
            no_op_reason: None,
            aggregated_at: None,
            detail: String::new(),
        };

        let result = self.execute(&mut outcome).instrument(span.clone()).await;

        {
            let _enter = span.enter();
            match result {
                Ok(None) => {
                    outcome.detail = format!(
                        "Successfully processed {} messages and updated top {} phrases.",
                        outcome.message_count, outcome.published_count
                    );
                    tracing::info!(
                        messages = outcome.message_count,
                        phrases = outcome.phrase_count,
                        published = outcome.published_count,
                        failed_batches = outcome.failed_batches,
                        "Analytics run complete"
                    );
                }
                Ok(Some(reason)) => {
                    outcome.status = RunStatus::NoOp;
                    outcome.no_op_reason = Some(reason);
                    outcome.detail = reason.to_string();
                    tracing::info!(reason = %reason, "Analytics run skipped");
                }
                Err(e) => {
                    outcome.status = RunStatus::Error;
                    outcome.detail = e.to_string();
                    tracing::error!(error = %e, "Analytics run failed");
                }
            }
        }

        *self.last_outcome.write().await = Some(outcome.clone());
        outcome
    }

    /// Run the stages, filling counters as they complete.
    ///
    /// `Ok(Some(reason))` means a short-circuit; nothing was published.
    async fn execute(&self, outcome: &mut RunOutcome) -> Result<Option<NoOpReason>> {
        let messages = self.reader.read_all_messages().await?;
        outcome.message_count = messages.len();
        if messages.is_empty() {
            return Ok(Some(NoOpReason::NoMessages));
        }

        let texts: Vec<String> = messages
            .into_iter()
            .map(|m| m.body)
            // The service rejects blank documents, which would fail the whole chunk
            .filter(|body| !body.trim().is_empty())
            .collect();
        if texts.is_empty() {
            return Ok(Some(NoOpReason::NoMessageBodies));
        }

        let report = self.extractor.extract_phrases(&texts).await;
        outcome.phrase_count = report.phrases.len();
        outcome.failed_batches = report.failed_batches;
        if report.phrases.is_empty() {
            return Ok(Some(NoOpReason::NoKeyPhrases));
        }

        let ranked = aggregate_top(&report.phrases, self.top_k);
        if ranked.is_empty() {
            return Ok(Some(NoOpReason::NoRankedPhrases));
        }

        let as_of = Utc::now();
        outcome.published_count = self.publisher.publish_snapshot(&ranked, as_of).await?;
        outcome.aggregated_at = Some(as_of);
        Ok(None)
    }
}
