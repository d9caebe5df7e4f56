//! Qdrant REST implementation of the VectorStore trait

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::StoreConfig;
use crate::error::{Result, ShiciError};
use crate::models::VectorPoint;
use crate::services::vector_store::{CollectionInfo, Distance, ScoredPoint, VectorStore};

/// Envelope every Qdrant response is wrapped in
#[derive(Deserialize)]
struct QdrantResponse<T> {
  result: T,
}

#[derive(Deserialize)]
struct CollectionsResult {
  collections: Vec<CollectionDescription>,
}

#[derive(Deserialize)]
struct CollectionDescription {
  name: String,
}

#[derive(Deserialize)]
struct CollectionInfoResult {
  #[serde(default)]
  points_count: Option<u64>,
  config: CollectionConfig,
}

#[derive(Deserialize)]
struct CollectionConfig {
  params: CollectionParams,
}

#[derive(Deserialize)]
struct CollectionParams {
  #[serde(default)]
  vectors: Value,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
  points: &'a [VectorPoint],
}

#[derive(Serialize)]
struct SearchRequest<'a> {
  vector: &'a [f32],
  limit: usize,
  with_payload: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  score_threshold: Option<f32>,
}

#[derive(Deserialize)]
struct SearchHit {
  id: Value,
  score: f32,
  #[serde(default)]
  payload: Value,
}

pub struct QdrantStore {
  client: Client,
  config: StoreConfig,
}

impl QdrantStore {
  pub fn new(config: StoreConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(|e| ShiciError::store_request("client setup", e.to_string()))?;

    Ok(Self { client, config })
  }

  pub fn collection_name(&self) -> &str {
    &self.config.collection
  }

  /// Append `segments` to the base URL, percent-encoding each one
  fn endpoint(&self, operation: &str, segments: &[&str]) -> Result<Url> {
    let base = &self.config.url;
    let mut url = Url::parse(base)
      .map_err(|e| ShiciError::store_request(operation, format!("invalid url {base}: {e}")))?;
    url
      .path_segments_mut()
      .map_err(|_| ShiciError::store_request(operation, format!("{base} cannot be a base url")))?
      .pop_if_empty()
      .extend(segments);
    Ok(url)
  }

  fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
    match &self.config.api_key {
      Some(key) => request.header("api-key", key),
      None => request,
    }
  }

  async fn send(&self, operation: &str, request: RequestBuilder) -> Result<Response> {
    let response = self
      .authorize(request)
      .send()
      .await
      .map_err(|e| ShiciError::store_request(operation, e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
      let error_text = response.text().await.unwrap_or_default();
      return Err(ShiciError::store_request(operation, format!("HTTP {status}: {error_text}")));
    }
    Ok(response)
  }

  async fn send_for<T: DeserializeOwned>(&self, operation: &str, request: RequestBuilder) -> Result<T> {
    let response = self.send(operation, request).await?;
    let body: QdrantResponse<T> = response
      .json()
      .await
      .map_err(|e| ShiciError::store_request(operation, format!("invalid response body: {e}")))?;
    Ok(body.result)
  }
}

/// Read the size and distance of a single unnamed vector config
fn parse_vector_params(vectors: &Value) -> (Option<usize>, Option<Distance>) {
  let size = vectors.get("size").and_then(Value::as_u64).map(|s| s as usize);
  let distance = vectors
    .get("distance")
    .and_then(Value::as_str)
    .and_then(|d| serde_json::from_value(Value::String(d.to_string())).ok());
  (size, distance)
}

fn point_id_text(id: &Value) -> String {
  match id {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

#[async_trait]
impl VectorStore for QdrantStore {
  async fn list_collections(&self) -> Result<Vec<String>> {
    let url = self.endpoint("list collections", &["collections"])?;
    let result: CollectionsResult = self.send_for("list collections", self.client.get(url)).await?;
    Ok(result.collections.into_iter().map(|c| c.name).collect())
  }

  async fn collection_info(&self, name: &str) -> Result<CollectionInfo> {
    let request = self.client.get(self.endpoint("get collection", &["collections", name])?);
    let result: CollectionInfoResult = self.send_for("get collection", request).await?;
    let (vector_dimension, distance) = parse_vector_params(&result.config.params.vectors);

    Ok(CollectionInfo {
      name: name.to_string(),
      vector_dimension,
      distance,
      points_count: result.points_count,
    })
  }

  async fn create_collection(&self, name: &str, dimension: usize, distance: Distance) -> Result<()> {
    let body = json!({ "vectors": { "size": dimension, "distance": distance.to_string() } });
    let url = self.endpoint("create collection", &["collections", name])?;
    let request = self.client.put(url).json(&body);
    self.send("create collection", request).await?;
    Ok(())
  }

  async fn upsert(&self, collection: &str, points: &[VectorPoint]) -> Result<()> {
    let mut url = self.endpoint("upsert", &["collections", collection, "points"])?;
    url.query_pairs_mut().append_pair("wait", "true");
    let request = self.client.put(url).json(&UpsertRequest { points });
    self.send("upsert", request).await?;
    Ok(())
  }

  async fn search(
    &self,
    collection: &str,
    vector: &[f32],
    limit: usize,
    score_threshold: Option<f32>,
  ) -> Result<Vec<ScoredPoint>> {
    let body = SearchRequest { vector, limit, with_payload: true, score_threshold };
    let url = self.endpoint("search", &["collections", collection, "points", "search"])?;
    let request = self.client.post(url).json(&body);
    let hits: Vec<SearchHit> = self.send_for("search", request).await?;

    Ok(
      hits
        .into_iter()
        .map(|hit| ScoredPoint { id: point_id_text(&hit.id), score: hit.score, payload: hit.payload })
        .collect(),
    )
  }
}
