//! Shici search server
//!
//! HTTP API over the poem collection. Ingestion is done with the `shici` CLI.

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;

use shici::cli::commands::Clients;
use shici::server::startup::start_server;
use shici::{config, logging, ShiciConfig};

#[derive(Parser)]
#[command(name = "shici_server")]
#[command(about = "Shici search API server")]
#[command(version)]
struct Args {
  /// Server bind address
  #[arg(long, default_value = "127.0.0.1:3000")]
  bind: SocketAddr,

  /// Enable verbose logging
  #[arg(short, long)]
  verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  config::load_dotenv();
  logging::init(args.verbose);

  let config = ShiciConfig::from_env()?;
  tracing::info!("Starting Shici search server v{}", env!("CARGO_PKG_VERSION"));

  let service = Clients::from_config(&config)?.query_service(&config);
  start_server(args.bind, Arc::new(service)).await
}
