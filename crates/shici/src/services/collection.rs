//! Collection lifecycle: create on first use, verify on every later run

use std::sync::Arc;

use crate::error::{Result, ShiciError};
use crate::services::vector_store::{CollectionInfo, Distance, VectorStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
  Created,
  Existing,
}

pub struct CollectionManager {
  store: Arc<dyn VectorStore>,
  name: String,
}

impl CollectionManager {
  pub fn new(store: Arc<dyn VectorStore>, name: impl Into<String>) -> Self {
    Self { store, name: name.into() }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Make sure the collection exists and holds vectors of `dimension` length
  pub async fn ensure(&self, dimension: usize) -> Result<EnsureOutcome> {
    let collections = self.store.list_collections().await?;

    if collections.iter().any(|name| name == &self.name) {
      let info = self.store.collection_info(&self.name).await?;
      tracing::info!(
        collection = %self.name,
        dimension = ?info.vector_dimension,
        points = ?info.points_count,
        "using existing collection"
      );

      if let Some(found) = info.vector_dimension {
        if found != dimension {
          return Err(ShiciError::DimensionMismatch {
            collection: self.name.clone(),
            expected: dimension,
            found,
          });
        }
      }
      return Ok(EnsureOutcome::Existing);
    }

    self.store.create_collection(&self.name, dimension, Distance::Cosine).await?;
    tracing::info!(collection = %self.name, dimension, "created collection");
    Ok(EnsureOutcome::Created)
  }

  pub async fn info(&self) -> Result<CollectionInfo> {
    self.store.collection_info(&self.name).await
  }
}
