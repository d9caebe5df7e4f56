//! Request and response bodies for the HTTP API

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::QueryResult;

/// Envelope for every search endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
  pub success: bool,

  /// Transaction ID for logging correlation
  pub transaction_id: Uuid,

  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub data: Option<T>,

  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub error: Option<String>,
}

impl<T> ApiResponse<T> {
  pub fn success(data: T, transaction_id: Uuid) -> Self {
    Self { success: true, transaction_id, data: Some(data), error: None }
  }

  pub fn failure(message: impl Into<String>, transaction_id: Uuid) -> Self {
    Self { success: false, transaction_id, data: None, error: Some(message.into()) }
  }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
  pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResponse {
  pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
  pub query: String,
  pub count: usize,
  pub results: Vec<QueryResult>,
}

/// Query string of `GET /v1/services/poems/search`
#[derive(Debug, Deserialize)]
pub struct SearchParams {
  pub q: Option<String>,
  pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct LimitParams {
  pub limit: Option<usize>,
}

/// Body of `POST /v1/poems/search`
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
  pub query: String,
  pub limit: Option<usize>,
  pub min_score: Option<f32>,
}
