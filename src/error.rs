//! FAQ Updater error types

use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// FAQ Updater error type
#[derive(Error, Debug)]
pub enum Error {
    /// Reading from durable storage failed
    #[error("Storage read error: {0}")]
    StorageRead(String),

    /// Writing to durable storage failed
    #[error("Storage write error: {0}")]
    StorageWrite(String),

    /// A single key-phrase extraction batch failed.
    ///
    /// Recovered by the extractor; never aborts a pipeline run.
    #[error("Extraction batch error: {0}")]
    Extraction(String),

    /// Inbound payload failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// HTTP status an API handler should answer with for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error body returned by the HTTP API
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

impl From<&Error> for ApiError {
    fn from(err: &Error) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

/// Result type alias for FAQ Updater operations
pub type Result<T> = std::result::Result<T, Error>;
