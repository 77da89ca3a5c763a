//! Analytics module - key-phrase aggregation pipeline
//!
//! Pulls the full message corpus, extracts key phrases in bounded batches,
//! counts them and publishes the top-K as a snapshot sharing one timestamp.
//!
//! ```text
//! CorpusReader ─▶ PhraseExtractor ─▶ aggregate_top ─▶ ResultPublisher
//!   (paginated)     (≤25 per call)     (stable top-K)   (batched upsert)
//! ```
//!
//! Each run re-aggregates the whole corpus. Incremental aggregation would
//! need a watermark over `receivedAt`, which the store does not track.

pub mod aggregate;
pub mod handler;
pub mod pipeline;
pub mod publisher;
pub mod reader;
pub mod types;

pub use aggregate::{aggregate_top, PhraseCount};
pub use handler::{analytics_router, ranked_phrases, AnalyticsState};
pub use pipeline::Pipeline;
pub use publisher::ResultPublisher;
pub use reader::CorpusReader;
pub use types::{NoOpReason, RankedPhrase, RunOutcome, RunStatus};
