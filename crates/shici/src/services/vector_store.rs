//! Vector store abstraction for collection management, upserts and similarity search
//!
//! The pipeline and query service only see this trait, so the store behind it
//! (Qdrant in production, in-memory fakes in tests) can be swapped freely.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::models::VectorPoint;

/// Similarity metric a collection is created with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Distance {
  Cosine,
  Euclid,
  Dot,
}

impl fmt::Display for Distance {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Distance::Cosine => "Cosine",
      Distance::Euclid => "Euclid",
      Distance::Dot => "Dot",
    };
    f.write_str(name)
  }
}

/// What the store reports about an existing collection
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionInfo {
  pub name: String,
  /// Vector size, when the store exposes a single unnamed vector config
  pub vector_dimension: Option<usize>,
  pub distance: Option<Distance>,
  pub points_count: Option<u64>,
}

/// A search hit as returned by the store, payload untouched
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPoint {
  pub id: String,
  pub score: f32,
  pub payload: serde_json::Value,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorStore: Send + Sync {
  /// Names of all collections
  async fn list_collections(&self) -> Result<Vec<String>>;

  async fn collection_info(&self, name: &str) -> Result<CollectionInfo>;

  async fn create_collection(&self, name: &str, dimension: usize, distance: Distance) -> Result<()>;

  /// Insert or replace points, keyed by point id
  async fn upsert(&self, collection: &str, points: &[VectorPoint]) -> Result<()>;

  /// Nearest neighbours of `vector`, best first
  async fn search(
    &self,
    collection: &str,
    vector: &[f32],
    limit: usize,
    score_threshold: Option<f32>,
  ) -> Result<Vec<ScoredPoint>>;
}
