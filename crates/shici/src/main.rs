use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use shici::cli::commands;
use shici::services::{RunOptions, SearchOptions};
use shici::{config, logging, ShiciConfig};

#[derive(Parser)]
#[command(name = "shici")]
#[command(about = "Shici - semantic search over classical Chinese poetry")]
#[command(version)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Collection to read from and write to
  #[arg(long, global = true)]
  collection: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Embed analysed poems from a JSON-Lines file into the collection
  Ingest {
    /// JSON-Lines file of analysed poems
    input: PathBuf,
    /// Continue from the checkpoint left by an aborted run
    #[arg(long)]
    resume: bool,
    /// Points per upsert
    #[arg(long)]
    batch_size: Option<usize>,
    /// Pause after every full batch, in milliseconds
    #[arg(long)]
    batch_delay_ms: Option<u64>,
  },
  /// Run a single query
  Search {
    /// Query text (space-separated words are joined)
    #[arg(required = true)]
    query: Vec<String>,
    /// Maximum number of results
    #[arg(short, long, default_value = "5")]
    limit: usize,
    /// Drop hits scoring below this similarity
    #[arg(long)]
    min_score: Option<f32>,
  },
  /// Read queries from stdin until `q`
  Interactive {
    #[arg(short, long, default_value = "5")]
    limit: usize,
  },
}

async fn handle(command: Command, mut config: ShiciConfig) -> Result<()> {
  match command {
    Command::Ingest { input, resume, batch_size, batch_delay_ms } => {
      if let Some(size) = batch_size {
        config.ingest.batch_size = size;
      }
      if let Some(ms) = batch_delay_ms {
        config.ingest.batch_delay = Duration::from_millis(ms);
      }
      config.validate()?;
      commands::ingest(&config, &input, &RunOptions { resume, checkpoint_path: None }).await
    }
    Command::Search { query, limit, min_score } => {
      let options = SearchOptions { limit, min_score };
      commands::search(&config, &query.join(" "), &options).await
    }
    Command::Interactive { limit } => {
      commands::interactive(&config, &SearchOptions::with_limit(limit)).await
    }
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  config::load_dotenv();
  logging::init(cli.verbose);

  let mut config = ShiciConfig::from_env()?;
  if let Some(collection) = cli.collection {
    config.store.collection = collection;
  }

  handle(cli.command, config).await
}
