//! Message wire types
//!
//! A `Message` is created once by ingestion and never modified or deleted
//! afterwards. All types use camelCase JSON serialization.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An inbound text message as stored in the corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender: String,
    pub body: String,
    pub received_at: DateTime<Utc>,
}

/// Request body for ingesting a message.
///
/// Accepts both the plain field names and the Twilio webhook names
/// (`MessageSid`, `From`, `Body`).
#[derive(Debug, Default, Deserialize)]
pub struct IngestRequest {
    #[serde(default, alias = "MessageSid", alias = "messageId")]
    pub id: Option<String>,
    #[serde(default, alias = "From", alias = "from")]
    pub sender: Option<String>,
    #[serde(default, alias = "Body")]
    pub body: Option<String>,
}

impl IngestRequest {
    /// Validate required fields and stamp the receipt time
    pub fn into_message(self, received_at: DateTime<Utc>) -> Result<Message> {
        let mut missing = Vec::new();

        let id = self.id.filter(|v| !v.trim().is_empty());
        if id.is_none() {
            missing.push("id");
        }
        let sender = self.sender.filter(|v| !v.trim().is_empty());
        if sender.is_none() {
            missing.push("sender");
        }
        if self.body.is_none() {
            missing.push("body");
        }

        match (id, sender, self.body) {
            (Some(id), Some(sender), Some(body)) => Ok(Message {
                id,
                sender,
                body,
                received_at,
            }),
            _ => Err(Error::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            ))),
        }
    }
}
