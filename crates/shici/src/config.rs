//! Runtime configuration for the embedding endpoint, the vector store and ingestion
//!
//! Values come from environment variables with defaults; the binaries let CLI flags
//! override individual fields.

use std::time::Duration;

use crate::error::{Result, ShiciError};

pub const DEFAULT_EMBEDDING_URL: &str = "http://localhost:11434";
pub const DEFAULT_EMBEDDING_MODEL: &str = "viosay/conan-embedding-v1";
pub const DEFAULT_STORE_URL: &str = "http://localhost:6333";
pub const DEFAULT_COLLECTION: &str = "poems_analysis";
pub const DEFAULT_POEM_KIND: &str = "诗";

/// Settings for the text-embedding endpoint
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
  /// Base URL of the embedding service (e.g., "http://localhost:11434")
  pub base_url: String,
  /// Model identifier sent with every request
  pub model: String,
  /// Request timeout in seconds
  pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_EMBEDDING_URL.to_string(),
      model: DEFAULT_EMBEDDING_MODEL.to_string(),
      timeout_secs: 60,
    }
  }
}

/// Settings for the vector store
#[derive(Debug, Clone)]
pub struct StoreConfig {
  pub url: String,
  pub api_key: Option<String>,
  pub collection: String,
  pub timeout_secs: u64,
}

impl Default for StoreConfig {
  fn default() -> Self {
    Self {
      url: DEFAULT_STORE_URL.to_string(),
      api_key: None,
      collection: DEFAULT_COLLECTION.to_string(),
      timeout_secs: 60,
    }
  }
}

/// Batching, pacing and retry knobs for ingestion runs
#[derive(Debug, Clone)]
pub struct IngestConfig {
  /// Points accumulated before one upsert call
  pub batch_size: usize,
  /// Fixed pause after every full batch
  pub batch_delay: Duration,
  /// Category tag a record must carry to be ingested
  pub poem_kind: String,
  /// Upsert attempts per batch before the run aborts
  pub upsert_attempts: u32,
  /// First retry delay; doubles on every further attempt
  pub retry_base_delay: Duration,
  pub retry_max_delay: Duration,
}

impl Default for IngestConfig {
  fn default() -> Self {
    Self {
      batch_size: 100,
      batch_delay: Duration::from_secs(1),
      poem_kind: DEFAULT_POEM_KIND.to_string(),
      upsert_attempts: 3,
      retry_base_delay: Duration::from_millis(500),
      retry_max_delay: Duration::from_secs(8),
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct ShiciConfig {
  pub embedding: EmbeddingConfig,
  pub store: StoreConfig,
  pub ingest: IngestConfig,
}

/// Load a `.env` file from the working directory or its parents into the process environment.
/// Variables already set in the environment keep their values.
pub fn load_dotenv() -> Option<std::path::PathBuf> {
  dotenvy::dotenv().ok()
}

impl ShiciConfig {
  /// Build the configuration from process environment variables
  pub fn from_env() -> Result<Self> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Build the configuration from an arbitrary key lookup
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let mut config = Self::default();
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(url) = get("OLLAMA_API_URL") {
      config.embedding.base_url = trim_base_url(&url);
    }
    if let Some(model) = get("SHICI_EMBEDDING_MODEL") {
      config.embedding.model = model;
    }
    if let Some(url) = get("QDRANT_URL") {
      config.store.url = trim_base_url(&url);
    }
    config.store.api_key = get("QDRANT_API_KEY");
    if let Some(collection) = get("SHICI_COLLECTION") {
      config.store.collection = collection;
    }
    if let Some(secs) = get("SHICI_TIMEOUT_SECS") {
      let secs = parse_number::<u64>("SHICI_TIMEOUT_SECS", &secs)?;
      config.embedding.timeout_secs = secs;
      config.store.timeout_secs = secs;
    }
    if let Some(size) = get("SHICI_BATCH_SIZE") {
      config.ingest.batch_size = parse_number("SHICI_BATCH_SIZE", &size)?;
    }
    if let Some(ms) = get("SHICI_BATCH_DELAY_MS") {
      config.ingest.batch_delay = Duration::from_millis(parse_number("SHICI_BATCH_DELAY_MS", &ms)?);
    }
    if let Some(kind) = get("SHICI_POEM_KIND") {
      config.ingest.poem_kind = kind;
    }
    if let Some(attempts) = get("SHICI_UPSERT_ATTEMPTS") {
      config.ingest.upsert_attempts = parse_number("SHICI_UPSERT_ATTEMPTS", &attempts)?;
    }

    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<()> {
    if self.ingest.batch_size == 0 {
      return Err(ShiciError::config("batch size must be at least 1"));
    }
    if self.ingest.upsert_attempts == 0 {
      return Err(ShiciError::config("upsert attempts must be at least 1"));
    }
    if self.embedding.timeout_secs == 0 || self.store.timeout_secs == 0 {
      return Err(ShiciError::config("request timeout must be at least 1 second"));
    }
    if self.store.collection.is_empty() {
      return Err(ShiciError::config("collection name must not be empty"));
    }
    Ok(())
  }
}

fn trim_base_url(url: &str) -> String {
  url.trim_end_matches('/').to_string()
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
  value.parse().map_err(|_| ShiciError::config(format!("{key} must be a number, got '{value}'")))
}
