//! Result publisher - writes a ranked snapshot

use super::aggregate::PhraseCount;
use super::types::RankedPhrase;
use crate::error::{Error, Result};
use crate::storage::PhraseStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Upserts ranked phrases in write batches, all stamped with one timestamp
pub struct ResultPublisher {
    store: Arc<dyn PhraseStore>,
    write_batch_size: usize,
}

impl ResultPublisher {
    pub fn new(store: Arc<dyn PhraseStore>, write_batch_size: usize) -> Self {
        Self {
            store,
            write_batch_size: write_batch_size.max(1),
        }
    }

    /// Upsert every `(phrase, count)` tagged with `as_of`.
    ///
    /// Returns the number of entries written. Batches already written stay
    /// written if a later one fails. Phrases from earlier snapshots that are
    /// not in `ranked` are left untouched.
    pub async fn publish_snapshot(
        &self,
        ranked: &[PhraseCount],
        as_of: DateTime<Utc>,
    ) -> Result<usize> {
        let items: Vec<RankedPhrase> = ranked
            .iter()
            .map(|p| RankedPhrase {
                phrase: p.phrase.clone(),
                count: p.count,
                aggregated_at: as_of,
            })
            .collect();

        for batch in items.chunks(self.write_batch_size) {
            self.store.batch_upsert(batch).await.map_err(|e| match e {
                Error::StorageWrite(_) => e,
                other => Error::StorageWrite(other.to_string()),
            })?;
        }

        tracing::info!(
            published = items.len(),
            aggregated_at = %as_of,
            "Published ranked phrase snapshot"
        );
        Ok(items.len())
    }
}
