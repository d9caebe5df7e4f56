//! Error kinds for the ingestion and query paths

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShiciError {
  #[error("Embedding request failed: {message}")]
  EmbeddingRequest { message: String },

  #[error("Vector store {operation} failed: {message}")]
  StoreRequest { operation: String, message: String },

  #[error(
    "Collection '{collection}' holds {found}-dimensional vectors but the embedding model produces {expected}"
  )]
  DimensionMismatch { collection: String, expected: usize, found: usize },

  #[error("Upserting batch {batch} ({points} points) failed after {attempts} attempts: {message}")]
  StoreWrite { batch: usize, points: usize, attempts: u32, message: String },

  #[error("Query failed: {0}")]
  Query(#[source] Box<ShiciError>),

  #[error("Query text is empty")]
  EmptyQuery,

  #[error("Search hit has an unexpected payload: {message}")]
  MalformedHit { message: String },

  #[error("Failed to parse {} line {line}: {message}", path.display())]
  Load { path: PathBuf, line: usize, message: String },

  #[error("Checkpoint {} is unusable: {message}", path.display())]
  Checkpoint { path: PathBuf, message: String },

  #[error("Invalid configuration: {message}")]
  Config { message: String },

  #[error(transparent)]
  Io(#[from] std::io::Error),
}

impl ShiciError {
  pub fn embedding_request(message: impl Into<String>) -> Self {
    Self::EmbeddingRequest { message: message.into() }
  }

  pub fn store_request(operation: impl Into<String>, message: impl Into<String>) -> Self {
    Self::StoreRequest { operation: operation.into(), message: message.into() }
  }

  pub fn store_write(batch: usize, points: usize, attempts: u32, message: impl Into<String>) -> Self {
    Self::StoreWrite { batch, points, attempts, message: message.into() }
  }

  pub fn query(cause: ShiciError) -> Self {
    Self::Query(Box::new(cause))
  }

  pub fn malformed_hit(message: impl Into<String>) -> Self {
    Self::MalformedHit { message: message.into() }
  }

  pub fn load(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
    Self::Load { path: path.into(), line, message: message.into() }
  }

  pub fn checkpoint(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
    Self::Checkpoint { path: path.into(), message: message.into() }
  }

  pub fn config(message: impl Into<String>) -> Self {
    Self::Config { message: message.into() }
  }

  /// Whether the error ends an ingestion run rather than skipping one record
  pub fn is_fatal(&self) -> bool {
    !matches!(self, Self::EmbeddingRequest { .. })
  }
}

pub type Result<T> = std::result::Result<T, ShiciError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_store_write_message_names_batch() {
    let err = ShiciError::store_write(3, 100, 3, "connection reset");
    let message = err.to_string();
    assert!(message.contains("batch 3"));
    assert!(message.contains("100 points"));
    assert!(message.contains("3 attempts"));
  }

  #[test]
  fn test_query_error_keeps_cause() {
    let err = ShiciError::query(ShiciError::embedding_request("timeout"));
    assert!(err.to_string().contains("timeout"));
    assert!(std::error::Error::source(&err).is_some());
  }

  #[test]
  fn test_only_embedding_failures_are_recoverable() {
    assert!(!ShiciError::embedding_request("x").is_fatal());
    assert!(ShiciError::store_write(0, 1, 1, "x").is_fatal());
    assert!(ShiciError::DimensionMismatch { collection: "c".into(), expected: 1, found: 2 }
      .is_fatal());
  }
}
