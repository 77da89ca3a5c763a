//! Corpus reader - drains a paginated message scan

use crate::error::{Error, Result};
use crate::messages::Message;
use crate::storage::MessageStore;
use std::sync::Arc;

/// Reads the entire message corpus, following continuation cursors
pub struct CorpusReader {
    store: Arc<dyn MessageStore>,
}

impl CorpusReader {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// Every stored message, in store-return order.
    ///
    /// Fails with `StorageRead` if any page fails; no partial result is
    /// returned.
    pub async fn read_all_messages(&self) -> Result<Vec<Message>> {
        let mut messages = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self
                .store
                .scan(cursor.as_deref())
                .await
                .map_err(|e| match e {
                    Error::StorageRead(_) => e,
                    other => Error::StorageRead(other.to_string()),
                })?;
            pages += 1;
            messages.extend(page.items);

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        tracing::debug!(pages, messages = messages.len(), "Read message corpus");
        Ok(messages)
    }
}
