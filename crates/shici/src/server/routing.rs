//! Axum router configuration for all endpoints

use axum::{
  routing::{get, post},
  Router,
};
use std::sync::Arc;

use crate::server::handlers;
use crate::services::QueryService;

/// Create the application router around a shared query service
pub fn create_router(service: Arc<QueryService>) -> Router {
  Router::new()
    .route("/health", get(handlers::health))
    .route("/version", get(handlers::version))
    .route("/v1/services/poems/search", get(handlers::search))
    .route("/v1/services/poems/theme/{theme}", get(handlers::search_theme))
    .route("/v1/services/poems/scenario/{scenario}", get(handlers::search_scenario))
    .route("/v1/poems/search", post(handlers::search_body))
    .with_state(service)
}
