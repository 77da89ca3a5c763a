//! FAQ Updater configuration management

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Upper bound on texts per extraction request imposed by the key-phrase service.
pub const MAX_EXTRACTION_BATCH_SIZE: usize = 25;

/// Main FAQ Updater configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaqUpdaterConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Key-phrase extraction service configuration
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Aggregation pipeline configuration
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

impl FaqUpdaterConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        let batch_size = self.extraction.batch_size;
        if batch_size == 0 || batch_size > MAX_EXTRACTION_BATCH_SIZE {
            return Err(Error::Config(format!(
                "extraction.batch_size must be between 1 and {}, got {}",
                MAX_EXTRACTION_BATCH_SIZE, batch_size
            )));
        }
        if self.extraction.language_code.trim().is_empty() {
            return Err(Error::Config(
                "extraction.language_code must not be empty".to_string(),
            ));
        }
        if self.analytics.top_k == 0 {
            return Err(Error::Config("analytics.top_k must be at least 1".to_string()));
        }
        if self.analytics.write_batch_size == 0 {
            return Err(Error::Config(
                "analytics.write_batch_size must be at least 1".to_string(),
            ));
        }
        if self.storage.page_size == 0 {
            return Err(Error::Config("storage.page_size must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed CORS origins (empty = any)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_origins: Vec::new(),
        }
    }
}

/// Storage backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Process-local, lost on restart
    Memory,

    /// JSON files under `data_dir` (default)
    #[default]
    File,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Which store implementation to use
    pub backend: StorageBackend,

    /// Base directory for the file backend
    pub data_dir: PathBuf,

    /// Items returned per corpus scan page
    pub page_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: default_data_dir(),
            page_size: 100,
        }
    }
}

/// Default base directory (~/.faq-updater/)
pub fn default_data_dir() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".faq-updater")
}

/// Key-phrase extraction service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// URL of the batch key-phrase detection endpoint
    pub endpoint: String,

    /// Language code declared on every request
    pub language_code: String,

    /// Texts per request (1..=25)
    pub batch_size: usize,

    /// Environment variable holding a bearer token, if the service needs one
    pub api_key_env: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8090/v1/key-phrases/batch".to_string(),
            language_code: "en".to_string(),
            batch_size: MAX_EXTRACTION_BATCH_SIZE,
            api_key_env: None,
            timeout_secs: 30,
        }
    }
}

impl ExtractionConfig {
    /// Resolve the bearer token from the environment.
    ///
    /// Tries the configured name first, then its UPPER_CASE form.
    pub fn resolve_api_key(&self) -> Option<String> {
        let name = self.api_key_env.as_ref()?;
        std::env::var(name)
            .or_else(|_| std::env::var(name.to_uppercase()))
            .ok()
    }
}

/// Aggregation pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Number of ranked phrases kept per run
    pub top_k: usize,

    /// Ranked phrases per storage write batch
    pub write_batch_size: usize,

    /// Seconds between scheduled runs (0 = scheduler disabled)
    pub interval_secs: u64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            write_batch_size: 25,
            interval_secs: 3600,
        }
    }
}
