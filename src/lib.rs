//! FAQ Updater - surfaces the most frequent key phrases from inbound messages
//!
//! Inbound text messages are stored as a corpus. Periodically the analytics
//! pipeline scans the whole corpus, asks an external service for key phrases
//! in bounded batches, counts them and publishes the top-K as a ranked
//! snapshot that clients read back as FAQ candidates.
//!
//! ## Architecture
//!
//! ```text
//!   POST /api/v1/messages                         GET /api/v1/faqs
//!           │                                            ▲
//!           ▼                                            │
//!   ┌───────────────┐                           ┌────────────────┐
//!   │ MessageStore  │                           │  PhraseStore   │
//!   └───────┬───────┘                           └────────▲───────┘
//!           │ scan (paginated)                           │ batch upsert
//!   ┌───────▼────────────────────────────────────────────┴───────┐
//!   │                     Analytics Pipeline                     │
//!   │  CorpusReader → PhraseExtractor → aggregate_top → Publisher │
//!   └───────────────────────────┬────────────────────────────────┘
//!                               │ ≤25 texts per call
//!                      ┌────────▼─────────┐
//!                      │ KeyPhraseService │  (external NLP)
//!                      └──────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`analytics`]: corpus reader, aggregation, publishing, orchestration
//! - [`extraction`]: key-phrase service client and batching extractor
//! - [`storage`]: message and phrase stores
//! - [`messages`]: message type and ingestion
//! - [`scheduler`]: interval trigger for the pipeline
//! - [`api`]: unified HTTP router
//! - [`config`]: configuration management

pub mod analytics;
pub mod api;
pub mod config;
pub mod error;
pub mod extraction;
pub mod messages;
pub mod scheduler;
pub mod storage;

pub use config::FaqUpdaterConfig;
pub use error::{Error, Result};
