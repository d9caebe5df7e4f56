use anyhow::{Context, Result};
use colored::*;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::cli::display::{format_results, ingest_progress_bar, print_report};
use crate::cli::repl;
use crate::config::ShiciConfig;
use crate::services::{
  EmbeddingService, IngestionPipeline, OllamaEmbeddingClient, QdrantStore, QueryService, RunOptions,
  SearchOptions, VectorStore,
};

/// Clients for the two external services, shared by every command
pub struct Clients {
  pub embedder: Arc<dyn EmbeddingService>,
  pub store: Arc<dyn VectorStore>,
}

impl Clients {
  pub fn from_config(config: &ShiciConfig) -> Result<Self> {
    let embedder = OllamaEmbeddingClient::new(config.embedding.clone())
      .context("failed to set up the embedding client")?;
    let store = QdrantStore::new(config.store.clone()).context("failed to set up the store client")?;
    Ok(Self { embedder: Arc::new(embedder), store: Arc::new(store) })
  }

  pub fn query_service(&self, config: &ShiciConfig) -> QueryService {
    QueryService::new(self.embedder.clone(), self.store.clone(), config.store.collection.clone())
  }
}

/// Ingest a JSON-Lines file and print the run report with final collection statistics
pub async fn ingest(config: &ShiciConfig, input: &Path, options: &RunOptions) -> Result<()> {
  let clients = Clients::from_config(config)?;
  let progress = ingest_progress_bar();
  let pipeline = IngestionPipeline::new(
    clients.embedder.clone(),
    clients.store.clone(),
    config.store.collection.clone(),
    config.ingest.clone(),
  )
  .with_progress(progress.clone());

  println!(
    "{} Ingesting {} into {}",
    "→".blue(),
    input.display().to_string().cyan(),
    config.store.collection.yellow()
  );
  let started = Instant::now();
  let report = match pipeline.run(input, options).await {
    Ok(report) => report,
    Err(e) => {
      progress.abandon();
      return Err(e).with_context(|| format!("ingestion of {} failed", input.display()));
    }
  };

  let info = match pipeline.collections().info().await {
    Ok(info) => Some(info),
    Err(e) => {
      tracing::warn!(error = %e, "could not read collection statistics");
      None
    }
  };

  print_report(&report, info.as_ref(), started.elapsed());
  Ok(())
}

pub async fn search(config: &ShiciConfig, query: &str, options: &SearchOptions) -> Result<()> {
  let service = Clients::from_config(config)?.query_service(config);
  let results = service.search(query, options).await?;
  println!("{}", format_results(&results));
  Ok(())
}

pub async fn interactive(config: &ShiciConfig, options: &SearchOptions) -> Result<()> {
  let service = Clients::from_config(config)?.query_service(config);
  let stdin = io::stdin();
  let mut stdout = io::stdout();
  repl::run(&service, options, stdin.lock(), &mut stdout).await?;
  Ok(())
}
