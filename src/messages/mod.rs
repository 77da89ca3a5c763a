//! Messages module - inbound message ingestion
//!
//! Validates `{id, sender, body}` payloads, stamps a receipt time and
//! stores them as [`Message`]s in the corpus the analytics pipeline scans.

pub mod handler;
pub mod types;

pub use handler::{messages_router, MessagesState};
pub use types::{IngestRequest, Message};

use crate::error::Result;
use crate::storage::MessageStore;
use chrono::Utc;

/// Validate a request, stamp it with the current time and store it
pub async fn ingest_message(store: &dyn MessageStore, request: IngestRequest) -> Result<Message> {
    let message = request.into_message(Utc::now())?;
    store.put(message.clone()).await?;
    tracing::debug!(id = %message.id, "Message ingested");
    Ok(message)
}
