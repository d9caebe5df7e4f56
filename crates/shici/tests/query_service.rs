mod common;

use std::sync::Arc;
use tempfile::TempDir;

use common::{poem, settings, write_jsonl, FakeEmbedder, InMemoryStore};
use shici::models::PoemRecord;
use shici::services::{IngestionPipeline, QueryService, RunOptions, SearchOptions};

const COLLECTION: &str = "poems_analysis";

async fn seeded(count: usize) -> (Arc<FakeEmbedder>, Arc<InMemoryStore>) {
  let dir = TempDir::new().unwrap();
  let records: Vec<_> = (0..count).map(poem).collect();
  let input = write_jsonl(dir.path(), &records);
  let embedder = Arc::new(FakeEmbedder::new(16));
  let store = Arc::new(InMemoryStore::default());

  IngestionPipeline::new(embedder.clone(), store.clone(), COLLECTION, settings(100))
    .run(&input, &RunOptions::default())
    .await
    .unwrap();
  (embedder, store)
}

#[tokio::test]
async fn test_limit_three_over_ten_points() {
  let (embedder, store) = seeded(10).await;
  let service = QueryService::new(embedder, store, COLLECTION);

  let results = service.search("思乡之情", &SearchOptions::with_limit(3)).await.unwrap();

  assert_eq!(results.len(), 3);
  assert!(results.windows(2).all(|pair| pair[0].score >= pair[1].score));
  for result in &results {
    assert_eq!(result.score, (result.score * 1000.0).round() / 1000.0);
  }
}

#[tokio::test]
async fn test_exact_analysis_text_ranks_its_poem_first() {
  let (embedder, store) = seeded(10).await;
  let service = QueryService::new(embedder, store, COLLECTION);

  let target = PoemRecord::from_value(&poem(7), "诗").unwrap();
  let results =
    service.search(&target.analysis.combined_text(), &SearchOptions::default()).await.unwrap();

  assert_eq!(results.len(), 5);
  assert_eq!(results[0].original_id, "7");
  assert_eq!(results[0].title, "诗题7");
  assert_eq!(results[0].score, 1.0);
  assert_eq!(results[0].analysis, target.analysis);
}

#[tokio::test]
async fn test_min_score_filters_weak_hits() {
  let (embedder, store) = seeded(10).await;
  let service = QueryService::new(embedder, store, COLLECTION);

  let target = PoemRecord::from_value(&poem(3), "诗").unwrap();
  let options = SearchOptions { limit: 10, min_score: Some(0.9999) };
  let results = service.search(&target.analysis.combined_text(), &options).await.unwrap();

  assert!(!results.is_empty());
  assert!(results.iter().all(|r| r.score >= 0.999));
  assert_eq!(results[0].original_id, "3");
}
