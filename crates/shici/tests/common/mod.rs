//! In-memory stand-ins for the embedding service and the vector store

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use shici::config::IngestConfig;
use shici::error::{Result, ShiciError};
use shici::models::VectorPoint;
use shici::services::{CollectionInfo, Distance, EmbeddingService, ScoredPoint, VectorStore};

/// Deterministic embedder: similar texts give similar vectors
pub struct FakeEmbedder {
  pub dimension: usize,
  /// Texts containing any of these fail to embed
  pub fail_containing: Vec<String>,
  /// Texts containing any of these come back one dimension short
  pub short_containing: Vec<String>,
  pub calls: Mutex<usize>,
}

impl FakeEmbedder {
  pub fn new(dimension: usize) -> Self {
    Self { dimension, fail_containing: Vec::new(), short_containing: Vec::new(), calls: Mutex::new(0) }
  }

  pub fn vector_for(&self, text: &str) -> Vec<f32> {
    let mut vector = vec![0.01; self.dimension];
    for (i, byte) in text.bytes().enumerate() {
      vector[(i + byte as usize) % self.dimension] += f32::from(byte) / 255.0;
    }
    vector
  }
}

#[async_trait]
impl EmbeddingService for FakeEmbedder {
  async fn embed(&self, text: &str) -> Result<Vec<f32>> {
    *self.calls.lock().unwrap() += 1;
    if self.fail_containing.iter().any(|s| text.contains(s.as_str())) {
      return Err(ShiciError::embedding_request("HTTP 500 Internal Server Error: model crashed"));
    }
    let mut vector = self.vector_for(text);
    if self.short_containing.iter().any(|s| text.contains(s.as_str())) {
      vector.pop();
    }
    Ok(vector)
  }
}

struct Collection {
  dimension: usize,
  points: HashMap<String, VectorPoint>,
}

/// Vector store keeping collections in memory with cosine search
#[derive(Default)]
pub struct InMemoryStore {
  collections: Mutex<HashMap<String, Collection>>,
  /// Sizes of successful upsert calls, in order
  pub upserts: Mutex<Vec<usize>>,
  pub failed_upserts: Mutex<usize>,
  /// Once set, every upsert after this many successes fails
  fail_after: Mutex<Option<usize>>,
  /// Upserts left to fail before writes go through again
  pending_failures: Mutex<usize>,
  pub created: Mutex<usize>,
}

impl InMemoryStore {
  pub fn with_collection(name: &str, dimension: usize) -> Self {
    let store = Self::default();
    store
      .collections
      .lock()
      .unwrap()
      .insert(name.to_string(), Collection { dimension, points: HashMap::new() });
    store
  }

  pub fn fail_upserts_after(&self, successes: usize) {
    *self.fail_after.lock().unwrap() = Some(successes);
  }

  pub fn fail_next_upserts(&self, count: usize) {
    *self.pending_failures.lock().unwrap() = count;
  }

  pub fn heal(&self) {
    *self.fail_after.lock().unwrap() = None;
  }

  pub fn upsert_sizes(&self) -> Vec<usize> {
    self.upserts.lock().unwrap().clone()
  }

  pub fn points(&self, collection: &str) -> Vec<VectorPoint> {
    let collections = self.collections.lock().unwrap();
    let mut points: Vec<_> =
      collections.get(collection).map(|c| c.points.values().cloned().collect()).unwrap_or_default();
    points.sort_by(|a, b| a.payload.original_id.cmp(&b.payload.original_id));
    points
  }

  pub fn dimension(&self, collection: &str) -> Option<usize> {
    self.collections.lock().unwrap().get(collection).map(|c| c.dimension)
  }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
  let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
  let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
  let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
  if norm_a == 0.0 || norm_b == 0.0 {
    0.0
  } else {
    dot / (norm_a * norm_b)
  }
}

#[async_trait]
impl VectorStore for InMemoryStore {
  async fn list_collections(&self) -> Result<Vec<String>> {
    Ok(self.collections.lock().unwrap().keys().cloned().collect())
  }

  async fn collection_info(&self, name: &str) -> Result<CollectionInfo> {
    let collections = self.collections.lock().unwrap();
    let collection = collections
      .get(name)
      .ok_or_else(|| ShiciError::store_request("get collection", format!("{name} not found")))?;
    Ok(CollectionInfo {
      name: name.to_string(),
      vector_dimension: Some(collection.dimension),
      distance: Some(Distance::Cosine),
      points_count: Some(collection.points.len() as u64),
    })
  }

  async fn create_collection(&self, name: &str, dimension: usize, _distance: Distance) -> Result<()> {
    *self.created.lock().unwrap() += 1;
    self
      .collections
      .lock()
      .unwrap()
      .insert(name.to_string(), Collection { dimension, points: HashMap::new() });
    Ok(())
  }

  async fn upsert(&self, collection: &str, points: &[VectorPoint]) -> Result<()> {
    {
      let mut pending = self.pending_failures.lock().unwrap();
      if *pending > 0 {
        *pending -= 1;
        *self.failed_upserts.lock().unwrap() += 1;
        return Err(ShiciError::store_request("upsert", "HTTP 503 Service Unavailable"));
      }
    }

    let successes = self.upserts.lock().unwrap().len();
    if matches!(*self.fail_after.lock().unwrap(), Some(limit) if successes >= limit) {
      *self.failed_upserts.lock().unwrap() += 1;
      return Err(ShiciError::store_request("upsert", "HTTP 503 Service Unavailable"));
    }

    let mut collections = self.collections.lock().unwrap();
    let target = collections
      .get_mut(collection)
      .ok_or_else(|| ShiciError::store_request("upsert", format!("{collection} not found")))?;
    for point in points {
      if point.vector.len() != target.dimension {
        return Err(ShiciError::store_request("upsert", "vector dimension error"));
      }
      target.points.insert(point.id.clone(), point.clone());
    }
    self.upserts.lock().unwrap().push(points.len());
    Ok(())
  }

  async fn search(
    &self,
    collection: &str,
    vector: &[f32],
    limit: usize,
    score_threshold: Option<f32>,
  ) -> Result<Vec<ScoredPoint>> {
    let collections = self.collections.lock().unwrap();
    let target = collections
      .get(collection)
      .ok_or_else(|| ShiciError::store_request("search", format!("{collection} not found")))?;

    let mut hits: Vec<ScoredPoint> = target
      .points
      .values()
      .map(|point| ScoredPoint {
        id: point.id.clone(),
        score: cosine(vector, &point.vector),
        payload: serde_json::to_value(&point.payload).unwrap_or(Value::Null),
      })
      .filter(|hit| score_threshold.map_or(true, |threshold| hit.score >= threshold))
      .collect();
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits.truncate(limit);
    Ok(hits)
  }
}

pub fn settings(batch_size: usize) -> IngestConfig {
  IngestConfig {
    batch_size,
    batch_delay: Duration::ZERO,
    upsert_attempts: 2,
    retry_base_delay: Duration::ZERO,
    retry_max_delay: Duration::ZERO,
    ..IngestConfig::default()
  }
}

/// A valid poem record with a numeric id
pub fn poem(id: usize) -> Value {
  json!({
    "id": id,
    "kind_cn": "诗",
    "title": format!("诗题{id}"),
    "author": format!("作者{}", id % 7),
    "content": format!("第{id}首诗的正文"),
    "analysis": {
      "theme": format!("主题{}", id % 5),
      "core_idea": format!("核心思想{id}"),
      "applicable_scenario": format!("场景{}", id % 3),
      "modern_significance": format!("意义{id}"),
    }
  })
}

pub fn write_jsonl(dir: &Path, records: &[Value]) -> PathBuf {
  let path = dir.join("poems.jsonl");
  let mut file = std::fs::File::create(&path).unwrap();
  for record in records {
    writeln!(file, "{record}").unwrap();
  }
  path
}
