//! Process-local store
//!
//! Keeps messages and ranked phrases in key-ordered maps so scans page
//! deterministically. Also holds the message snapshot that [`FileStore`] pages through.
//!
//! [`FileStore`]: super::FileStore

use super::{paginate, MessageStore, PhraseStore, ScanPage};
use crate::analytics::RankedPhrase;
use crate::error::Result;
use crate::messages::Message;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// In-memory message and phrase store
pub struct MemoryStore {
    page_size: usize,
    messages: RwLock<BTreeMap<String, Message>>,
    phrases: RwLock<BTreeMap<String, RankedPhrase>>,
}

impl MemoryStore {
    /// Create an empty store returning at most `page_size` messages per scan page
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            messages: RwLock::new(BTreeMap::new()),
            phrases: RwLock::new(BTreeMap::new()),
        }
    }

    /// Replace every stored message (used when refreshing from disk)
    pub(crate) async fn replace_messages(&self, messages: Vec<Message>) {
        *self.messages.write().await = messages.into_iter().map(|m| (m.id.clone(), m)).collect();
    }

    /// Number of stored messages
    pub async fn message_count(&self) -> usize {
        self.messages.read().await.len()
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn scan(&self, cursor: Option<&str>) -> Result<ScanPage<Message>> {
        let messages = self.messages.read().await;
        Ok(paginate(&messages, cursor, self.page_size))
    }

    async fn put(&self, message: Message) -> Result<()> {
        self.messages
            .write()
            .await
            .insert(message.id.clone(), message);
        Ok(())
    }
}

#[async_trait]
impl PhraseStore for MemoryStore {
    async fn batch_upsert(&self, items: &[RankedPhrase]) -> Result<()> {
        let mut phrases = self.phrases.write().await;
        for item in items {
            phrases.insert(item.phrase.clone(), item.clone());
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<RankedPhrase>> {
        Ok(self.phrases.read().await.values().cloned().collect())
    }
}
