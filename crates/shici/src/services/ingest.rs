//! Ingestion pipeline: JSON-Lines records in, batched vector points out
//!
//! Records are processed strictly one at a time. The collection is ensured on the first
//! successful embedding, points are upserted in fixed-size batches, and a checkpoint is
//! written after every committed batch so an aborted run can be resumed.

use indicatif::ProgressBar;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::IngestConfig;
use crate::error::{Result, ShiciError};
use crate::models::{PoemRecord, SkipReason, VectorPoint};
use crate::services::backoff::RetryPolicy;
use crate::services::checkpoint::{self, Checkpoint};
use crate::services::collection::CollectionManager;
use crate::services::embeddings::EmbeddingService;
use crate::services::records::load_records;
use crate::services::vector_store::VectorStore;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
  /// Continue from the checkpoint left by an aborted run
  pub resume: bool,
  /// Overrides the default `<input>.checkpoint.json` location
  pub checkpoint_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestionReport {
  /// Records turned into points during this run
  pub processed: usize,
  pub skipped: usize,
  /// Records in the input file
  pub total: usize,
  /// Batches upserted during this run
  pub batches: usize,
  /// Record index the run started from when resuming
  pub resumed_from: Option<usize>,
}

pub struct IngestionPipeline {
  embedder: Arc<dyn EmbeddingService>,
  store: Arc<dyn VectorStore>,
  collections: CollectionManager,
  settings: IngestConfig,
  retry: RetryPolicy,
  progress: ProgressBar,
}

impl IngestionPipeline {
  pub fn new(
    embedder: Arc<dyn EmbeddingService>,
    store: Arc<dyn VectorStore>,
    collection: impl Into<String>,
    settings: IngestConfig,
  ) -> Self {
    let collections = CollectionManager::new(store.clone(), collection);
    let retry = RetryPolicy::from_config(&settings);
    Self { embedder, store, collections, settings, retry, progress: ProgressBar::hidden() }
  }

  /// Advance `progress` by one for every record looked at, processed or skipped
  pub fn with_progress(mut self, progress: ProgressBar) -> Self {
    self.progress = progress;
    self
  }

  pub fn collections(&self) -> &CollectionManager {
    &self.collections
  }

  pub async fn run(&self, input: &Path, options: &RunOptions) -> Result<IngestionReport> {
    let records = load_records(input)?;
    let total = records.len();
    let checkpoint_path =
      options.checkpoint_path.clone().unwrap_or_else(|| checkpoint::checkpoint_path(input));

    let mut report = IngestionReport { total, ..IngestionReport::default() };
    let mut batches_committed = 0;
    let mut start = 0;

    if options.resume {
      match checkpoint::load(&checkpoint_path)? {
        Some(saved) if saved.matches(input, total) => {
          tracing::info!(
            next_record = saved.next_record,
            batches = saved.batches_committed,
            "resuming from checkpoint"
          );
          start = saved.next_record;
          batches_committed = saved.batches_committed;
          report.resumed_from = Some(start);
        }
        Some(_) => {
          tracing::warn!(
            path = %checkpoint_path.display(),
            "checkpoint belongs to a different input, starting from the beginning"
          );
        }
        None => tracing::info!("no checkpoint found, starting from the beginning"),
      }
    }

    self.progress.set_length(total as u64);
    self.progress.set_position(start as u64);

    let mut dimension: Option<usize> = None;
    let mut batch: Vec<VectorPoint> = Vec::with_capacity(self.settings.batch_size);

    for (index, value) in records.iter().enumerate().skip(start) {
      let record = match PoemRecord::from_value(value, &self.settings.poem_kind) {
        Ok(record) => record,
        Err(reason) => {
          self.skip(&mut report, index, &reason);
          continue;
        }
      };

      let vector = match self.embedder.embed(&record.analysis.combined_text()).await {
        Ok(vector) => vector,
        Err(e) if e.is_fatal() => return Err(e),
        Err(e) => {
          self.skip(&mut report, index, &SkipReason::EmbeddingFailed(e.to_string()));
          continue;
        }
      };

      match dimension {
        None => {
          self.collections.ensure(vector.len()).await?;
          dimension = Some(vector.len());
        }
        Some(expected) if expected != vector.len() => {
          tracing::error!(record = index, expected, found = vector.len(), "embedding dimension changed");
          self.skip(&mut report, index, &SkipReason::DimensionDrift { expected, found: vector.len() });
          continue;
        }
        Some(_) => {}
      }

      batch.push(VectorPoint::from_record(&record, index, vector));
      report.processed += 1;
      self.tick(&report);

      if batch.len() >= self.settings.batch_size {
        batches_committed += 1;
        self.commit(&batch, batches_committed, &checkpoint_path, input, total, index + 1).await?;
        report.batches += 1;
        batch.clear();

        tracing::info!(
          processed = report.processed,
          skipped = report.skipped,
          total,
          "progress"
        );
        if !self.settings.batch_delay.is_zero() {
          tokio::time::sleep(self.settings.batch_delay).await;
        }
      }
    }

    if !batch.is_empty() {
      batches_committed += 1;
      self.commit(&batch, batches_committed, &checkpoint_path, input, total, total).await?;
      report.batches += 1;
    }

    checkpoint::clear(&checkpoint_path)?;
    self.progress.finish_and_clear();
    tracing::info!(
      processed = report.processed,
      skipped = report.skipped,
      total,
      batches = report.batches,
      "ingestion finished"
    );
    Ok(report)
  }

  fn skip(&self, report: &mut IngestionReport, index: usize, reason: &SkipReason) {
    report.skipped += 1;
    tracing::warn!(record = index, %reason, "skipping record");
    self.tick(report);
  }

  fn tick(&self, report: &IngestionReport) {
    self.progress.set_message(format!("{} stored, {} skipped", report.processed, report.skipped));
    self.progress.inc(1);
  }

  /// Upsert one batch, then record how far the input has been committed
  async fn commit(
    &self,
    points: &[VectorPoint],
    batch_number: usize,
    checkpoint_path: &Path,
    input: &Path,
    total: usize,
    next_record: usize,
  ) -> Result<()> {
    self.upsert_with_retry(points, batch_number).await?;
    tracing::info!(batch = batch_number, points = points.len(), "batch upserted");
    checkpoint::save(checkpoint_path, &Checkpoint::new(input, total, next_record, batch_number))
  }

  async fn upsert_with_retry(&self, points: &[VectorPoint], batch_number: usize) -> Result<()> {
    let collection = self.collections.name();
    let mut attempt = 0;

    loop {
      attempt += 1;
      match self.store.upsert(collection, points).await {
        Ok(()) => return Ok(()),
        Err(e) if attempt >= self.retry.attempts => {
          tracing::error!(batch = batch_number, attempts = attempt, error = %e, "batch upsert failed");
          return Err(ShiciError::store_write(batch_number, points.len(), attempt, e.to_string()));
        }
        Err(e) => {
          let delay = self.retry.delay(attempt);
          tracing::warn!(
            batch = batch_number,
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %e,
            "batch upsert failed, retrying"
          );
          tokio::time::sleep(delay).await;
        }
      }
    }
  }
}
