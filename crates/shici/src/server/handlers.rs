//! Endpoint handlers

use axum::{
  extract::{Path, Query, State},
  http::StatusCode,
  response::Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Result, ShiciError};
use crate::models::QueryResult;
use crate::server::types::{
  ApiResponse, HealthResponse, LimitParams, SearchParams, SearchRequest, SearchResponse,
  VersionResponse,
};
use crate::services::{QueryService, SearchOptions};

type SearchReply = (StatusCode, Json<ApiResponse<SearchResponse>>);

/// GET /health
pub async fn health() -> Json<HealthResponse> {
  Json(HealthResponse { status: "ok".to_string() })
}

/// GET /version
pub async fn version() -> Json<ApiResponse<VersionResponse>> {
  let response = VersionResponse { version: env!("CARGO_PKG_VERSION").to_string() };
  Json(ApiResponse::success(response, Uuid::new_v4()))
}

fn options(limit: Option<usize>, min_score: Option<f32>) -> SearchOptions {
  let mut options = SearchOptions::default();
  if let Some(limit) = limit {
    options.limit = limit;
  }
  options.min_score = min_score;
  options
}

fn reply(query: String, outcome: Result<Vec<QueryResult>>) -> SearchReply {
  let transaction_id = Uuid::new_v4();

  match outcome {
    Ok(results) => {
      let response = SearchResponse { query, count: results.len(), results };
      (StatusCode::OK, Json(ApiResponse::success(response, transaction_id)))
    }
    Err(ShiciError::EmptyQuery) => (
      StatusCode::BAD_REQUEST,
      Json(ApiResponse::failure(ShiciError::EmptyQuery.to_string(), transaction_id)),
    ),
    Err(e) => {
      tracing::error!(%transaction_id, error = %e, "search failed");
      (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::failure(e.to_string(), transaction_id)))
    }
  }
}

/// GET /v1/services/poems/search?q=&limit=
pub async fn search(
  State(service): State<Arc<QueryService>>,
  Query(params): Query<SearchParams>,
) -> SearchReply {
  let query = params.q.unwrap_or_default();
  let outcome = service.search(&query, &options(params.limit, None)).await;
  reply(query, outcome)
}

/// GET /v1/services/poems/theme/{theme}?limit=
pub async fn search_theme(
  State(service): State<Arc<QueryService>>,
  Path(theme): Path<String>,
  Query(params): Query<LimitParams>,
) -> SearchReply {
  let outcome = service.search_theme(&theme, &options(params.limit, None)).await;
  reply(theme, outcome)
}

/// GET /v1/services/poems/scenario/{scenario}?limit=
pub async fn search_scenario(
  State(service): State<Arc<QueryService>>,
  Path(scenario): Path<String>,
  Query(params): Query<LimitParams>,
) -> SearchReply {
  let outcome = service.search_scenario(&scenario, &options(params.limit, None)).await;
  reply(scenario, outcome)
}

/// POST /v1/poems/search
pub async fn search_body(
  State(service): State<Arc<QueryService>>,
  Json(request): Json<SearchRequest>,
) -> SearchReply {
  let outcome = service.search(&request.query, &options(request.limit, request.min_score)).await;
  reply(request.query, outcome)
}
