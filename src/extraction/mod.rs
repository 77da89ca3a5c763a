//! Key-phrase extraction
//!
//! ```text
//! texts ──chunk(≤25)──▶ KeyPhraseService ──▶ per-text phrase lists ──flatten──▶ phrases
//!                           │
//!                           └─ chunk failure: logged, chunk dropped, next chunk
//! ```
//!
//! [`KeyPhraseService`] is the seam to the external NLP capability;
//! [`HttpKeyPhraseService`] talks to it over JSON/HTTP. [`PhraseExtractor`]
//! owns the batching and failure-isolation policy.

pub mod client;
pub mod extractor;

pub use client::HttpKeyPhraseService;
pub use extractor::{ExtractionReport, PhraseExtractor};

use crate::error::Result;
use async_trait::async_trait;

/// Batch key-phrase detection capability
#[async_trait]
pub trait KeyPhraseService: Send + Sync {
    /// Detect key phrases for up to 25 texts in one call.
    ///
    /// Returns one phrase list per successfully analyzed text, in input
    /// order. Any error fails the whole call.
    async fn detect_key_phrases(
        &self,
        texts: &[String],
        language_code: &str,
    ) -> Result<Vec<Vec<String>>>;
}
