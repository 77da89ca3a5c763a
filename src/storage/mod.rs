//! Storage layer - corpus and snapshot persistence
//!
//! Two narrow interfaces sit between the pipeline and durable storage:
//!
//! - [`MessageStore`]: scan-style paginated reads over the message corpus
//!   plus upsert-by-id for ingestion.
//! - [`PhraseStore`]: batched upsert-by-phrase for published snapshots plus
//!   a full read for the FAQ endpoint.
//!
//! Both are implemented by [`MemoryStore`] (process-local) and
//! [`FileStore`] (JSON files on disk).

pub mod file;
pub mod memory;

use crate::analytics::RankedPhrase;
use crate::error::Result;
use crate::messages::Message;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::ops::Bound;

pub use file::FileStore;
pub use memory::MemoryStore;

/// One page of a paginated scan
#[derive(Debug, Clone)]
pub struct ScanPage<T> {
    /// Items on this page, in store order
    pub items: Vec<T>,
    /// Exclusive start key for the next page; `None` once the scan is exhausted
    pub next_cursor: Option<String>,
}

/// Paginated read / upsert access to the message corpus
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Return the page starting after `cursor` (or the first page when `None`).
    async fn scan(&self, cursor: Option<&str>) -> Result<ScanPage<Message>>;

    /// Insert or replace a message by id.
    async fn put(&self, message: Message) -> Result<()>;
}

/// Upsert / read access to published ranked phrases
#[async_trait]
pub trait PhraseStore: Send + Sync {
    /// Upsert each item by `phrase`.
    ///
    /// Items are written independently; an error part-way through may leave
    /// earlier items written.
    async fn batch_upsert(&self, items: &[RankedPhrase]) -> Result<()>;

    /// Every stored entry, in no particular order.
    async fn list(&self) -> Result<Vec<RankedPhrase>>;
}

/// Take the page of `items` that follows `cursor`.
///
/// The cursor is resolved through the map's ordered index, so each page costs
/// `O(log n + page_size)`. The returned cursor is the key of the last item on
/// the page, and is only set when more items remain.
pub(crate) fn paginate<T: Clone>(
    items: &BTreeMap<String, T>,
    cursor: Option<&str>,
    page_size: usize,
) -> ScanPage<T> {
    let start = match cursor {
        Some(c) => Bound::Excluded(c.to_string()),
        None => Bound::Unbounded,
    };
    let mut remaining = items.range((start, Bound::Unbounded)).peekable();

    let page: Vec<(&String, &T)> = remaining.by_ref().take(page_size).collect();
    let next_cursor = match (page.last(), remaining.peek()) {
        (Some((key, _)), Some(_)) => Some(key.to_string()),
        _ => None,
    };

    ScanPage {
        items: page.into_iter().map(|(_, item)| item.clone()).collect(),
        next_cursor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed(n: usize) -> BTreeMap<String, usize> {
        (0..n).map(|i| (format!("k{:05}", i), i)).collect()
    }

    #[test]
    fn test_paginate_first_page() {
        let items = keyed(5);
        let page = paginate(&items, None, 2);
        assert_eq!(page.items, vec![0, 1]);
        assert_eq!(page.next_cursor.as_deref(), Some("k00001"));
    }

    #[test]
    fn test_paginate_follows_cursor_to_end() {
        let items = keyed(5);
        let mut cursor: Option<String> = None;
        let mut seen = Vec::new();
        let mut pages = 0;
        loop {
            let page = paginate(&items, cursor.as_deref(), 2);
            pages += 1;
            seen.extend(page.items);
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        assert_eq!(pages, 3);
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_paginate_exact_multiple_has_no_trailing_cursor() {
        let items = keyed(4);
        let page = paginate(&items, Some("k00001"), 2);
        assert_eq!(page.items, vec![2, 3]);
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn test_paginate_cursor_between_keys() {
        let items = keyed(4);
        // A cursor whose key is no longer stored still resumes after it
        let page = paginate(&items, Some("k00001x"), 10);
        assert_eq!(page.items, vec![2, 3]);
    }

    #[test]
    fn test_paginate_empty() {
        let items: BTreeMap<String, usize> = BTreeMap::new();
        let page = paginate(&items, None, 10);
        assert!(page.items.is_empty());
        assert!(page.next_cursor.is_none());
    }
}
