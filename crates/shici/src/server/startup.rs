//! REST server startup and configuration

use anyhow::Result;
use axum::serve;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::server::routing::create_router;
use crate::services::QueryService;

/// Serve the search API on `addr` until the process is stopped
pub async fn start_server(addr: SocketAddr, service: Arc<QueryService>) -> Result<()> {
  tracing::info!(collection = service.collection(), "starting search server on {addr}");

  let app = create_router(service).layer(
    ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()),
  );

  let listener = TcpListener::bind(addr).await?;
  tracing::info!("server listening on {addr}");

  serve(listener, app).await.map_err(|e| anyhow::anyhow!("server error: {e}"))
}
