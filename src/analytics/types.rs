//! Analytics wire types
//!
//! `RankedPhrase` is the persisted unit of a snapshot; `RunOutcome` is the
//! structured report every pipeline run produces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of a published snapshot, keyed by `phrase`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPhrase {
    pub phrase: String,
    pub count: u64,
    pub aggregated_at: DateTime<Utc>,
}

/// Final status of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunStatus {
    Ok,
    NoOp,
    Error,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::NoOp => write!(f, "no-op"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Why a run stopped early without publishing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoOpReason {
    /// The corpus is empty
    NoMessages,
    /// Every stored message has a blank body
    NoMessageBodies,
    /// Extraction returned nothing (or every batch failed)
    NoKeyPhrases,
    /// Aggregation produced an empty ranking
    NoRankedPhrases,
}

impl std::fmt::Display for NoOpReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoMessages => write!(f, "No messages to process"),
            Self::NoMessageBodies => write!(f, "No message bodies found to analyze"),
            Self::NoKeyPhrases => write!(f, "No key phrases detected"),
            Self::NoRankedPhrases => write!(f, "No ranked phrases to publish"),
        }
    }
}

/// Structured report of a single pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutcome {
    pub run_id: String,
    pub status: RunStatus,
    pub message_count: usize,
    pub phrase_count: usize,
    pub published_count: usize,
    pub failed_batches: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_op_reason: Option<NoOpReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregated_at: Option<DateTime<Utc>>,
    pub detail: String,
}

impl RunOutcome {
    /// Whether the run ended in `ok` or `no-op`
    pub fn is_success(&self) -> bool {
        self.status != RunStatus::Error
    }
}
