//! Semantic search over the poem collection

use std::sync::Arc;

use crate::error::{Result, ShiciError};
use crate::models::{PointPayload, QueryResult};
use crate::services::embeddings::EmbeddingService;
use crate::services::vector_store::VectorStore;

pub const DEFAULT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
  pub limit: usize,
  /// Hits scoring below this are dropped by the store
  pub min_score: Option<f32>,
}

impl Default for SearchOptions {
  fn default() -> Self {
    Self { limit: DEFAULT_LIMIT, min_score: None }
  }
}

impl SearchOptions {
  pub fn with_limit(limit: usize) -> Self {
    Self { limit, ..Self::default() }
  }
}

pub struct QueryService {
  embedder: Arc<dyn EmbeddingService>,
  store: Arc<dyn VectorStore>,
  collection: String,
}

impl QueryService {
  pub fn new(
    embedder: Arc<dyn EmbeddingService>,
    store: Arc<dyn VectorStore>,
    collection: impl Into<String>,
  ) -> Self {
    Self { embedder, store, collection: collection.into() }
  }

  pub fn collection(&self) -> &str {
    &self.collection
  }

  /// Rank poems by similarity of their analysis to `query`
  pub async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<QueryResult>> {
    let query = query.trim();
    if query.is_empty() {
      return Err(ShiciError::EmptyQuery);
    }
    if options.limit == 0 {
      return Ok(Vec::new());
    }

    let vector = self.embedder.embed(query).await.map_err(ShiciError::query)?;
    let hits = self
      .store
      .search(&self.collection, &vector, options.limit, options.min_score)
      .await
      .map_err(ShiciError::query)?;
    tracing::debug!(query, hits = hits.len(), "search completed");

    let mut results = hits
      .into_iter()
      .map(|hit| {
        let payload: PointPayload = serde_json::from_value(hit.payload)
          .map_err(|e| ShiciError::malformed_hit(format!("point {}: {e}", hit.id)))?;
        Ok(QueryResult::from_hit(hit.score, payload))
      })
      .collect::<Result<Vec<_>>>()?;

    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(options.limit);
    Ok(results)
  }

  pub async fn search_theme(&self, theme: &str, options: &SearchOptions) -> Result<Vec<QueryResult>> {
    if theme.trim().is_empty() {
      return Err(ShiciError::EmptyQuery);
    }
    self.search(&format!("主题：{}", theme.trim()), options).await
  }

  pub async fn search_scenario(
    &self,
    scenario: &str,
    options: &SearchOptions,
  ) -> Result<Vec<QueryResult>> {
    if scenario.trim().is_empty() {
      return Err(ShiciError::EmptyQuery);
    }
    self.search(&format!("场景：{}", scenario.trim()), options).await
  }
}
