//! File-backed store with JSON persistence
//!
//! Directory layout:
//! ```text
//! ~/.faq-updater/
//! ├── messages/
//! │   ├── <sha256(id)>.json
//! │   └── ...
//! └── phrases/
//!     ├── <sha256(phrase)>.json
//!     └── ...
//! ```
//!
//! Files are named by the SHA-256 of their key so arbitrary ids and phrases
//! map to safe file names. Several processes may share one data directory:
//! a scan started without a cursor reloads the messages from disk, and later
//! pages of that scan are served from the reloaded snapshot. `list` always
//! reads the phrase directory. Records are written to a temporary file and
//! renamed into place, so readers never see a half-written file.

use super::{MemoryStore, MessageStore, PhraseStore, ScanPage};
use crate::analytics::RankedPhrase;
use crate::error::{Error, Result};
use crate::messages::Message;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Message and phrase store persisted as JSON files
pub struct FileStore {
    messages_dir: PathBuf,
    phrases_dir: PathBuf,
    messages: MemoryStore,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `base_dir`
    pub async fn open(base_dir: PathBuf, page_size: usize) -> Result<Self> {
        let messages_dir = base_dir.join("messages");
        let phrases_dir = base_dir.join("phrases");

        for dir in [&messages_dir, &phrases_dir] {
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                Error::StorageRead(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }

        let store = Self {
            messages_dir,
            phrases_dir,
            messages: MemoryStore::new(page_size),
        };
        store.reload_messages().await?;
        Ok(store)
    }

    async fn reload_messages(&self) -> Result<()> {
        let loaded = read_records::<Message>(&self.messages_dir).await?;
        tracing::debug!(
            messages = loaded.records.len(),
            skipped = loaded.skipped,
            "Reloaded messages from disk"
        );
        self.messages.replace_messages(loaded.records).await;
        Ok(())
    }

    fn message_path(&self, id: &str) -> PathBuf {
        self.messages_dir.join(file_name(id))
    }

    fn phrase_path(&self, phrase: &str) -> PathBuf {
        self.phrases_dir.join(file_name(phrase))
    }
}

#[async_trait]
impl MessageStore for FileStore {
    async fn scan(&self, cursor: Option<&str>) -> Result<ScanPage<Message>> {
        if cursor.is_none() {
            self.reload_messages().await?;
        }
        self.messages.scan(cursor).await
    }

    async fn put(&self, message: Message) -> Result<()> {
        write_json(&self.message_path(&message.id), &message).await?;
        self.messages.put(message).await
    }
}

#[async_trait]
impl PhraseStore for FileStore {
    async fn batch_upsert(&self, items: &[RankedPhrase]) -> Result<()> {
        for item in items {
            write_json(&self.phrase_path(&item.phrase), item).await?;
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<RankedPhrase>> {
        let loaded = read_records::<RankedPhrase>(&self.phrases_dir).await?;
        if loaded.skipped > 0 {
            tracing::debug!(skipped = loaded.skipped, "Skipped unreadable phrase files");
        }
        Ok(loaded.records)
    }
}

/// SHA-256 hex of a key plus the `.json` extension
fn file_name(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    format!("{:x}.json", hasher.finalize())
}

/// Serialize a record and move it into place, surfacing failures as `StorageWrite`
async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| Error::StorageWrite(format!("Failed to serialize {}: {}", path.display(), e)))?;
    let tmp = path.with_extension(format!("{}.tmp", uuid::Uuid::new_v4().simple()));
    tokio::fs::write(&tmp, json)
        .await
        .map_err(|e| Error::StorageWrite(format!("Failed to write {}: {}", tmp.display(), e)))?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(Error::StorageWrite(format!(
            "Failed to replace {}: {}",
            path.display(),
            e
        )));
    }
    Ok(())
}

/// Records read from one directory
struct Loaded<T> {
    records: Vec<T>,
    /// `.json` files that could not be read or parsed
    skipped: usize,
}

/// Read every `.json` record in `dir`.
///
/// A missing directory reads as empty. Corrupt files are skipped with a
/// warning; failing to list the directory is a `StorageRead` error.
async fn read_records<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Loaded<T>> {
    let mut loaded = Loaded {
        records: Vec::new(),
        skipped: 0,
    };
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(loaded),
        Err(e) => {
            return Err(Error::StorageRead(format!(
                "Failed to list {}: {}",
                dir.display(),
                e
            )))
        }
    };

    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                return Err(Error::StorageRead(format!(
                    "Failed to list {}: {}",
                    dir.display(),
                    e
                )))
            }
        };
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let parsed = match tokio::fs::read_to_string(&path).await {
            Ok(data) => serde_json::from_str(&data).map_err(|e| e.to_string()),
            // Replaced or removed by another writer since listing
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => Err(e.to_string()),
        };
        match parsed {
            Ok(record) => loaded.records.push(record),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable record");
                loaded.skipped += 1;
            }
        }
    }

    Ok(loaded)
}
