//! Display formatting utilities for CLI output

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::models::QueryResult;
use crate::services::{CollectionInfo, IngestionReport};

/// Render one hit as a block: rank and score, poem, then the four analysis fields
pub fn format_result(rank: usize, result: &QueryResult) -> String {
  let header = format!(
    "=== {}. {} ({}) ===",
    rank,
    result.title.yellow().bold(),
    result.author.cyan()
  );

  let mut lines = vec![
    header,
    format!("{} {:.3}", "相似度:".dimmed(), result.score),
    result.content.clone(),
    String::new(),
  ];
  for (label, value) in [
    ("主题", &result.analysis.theme),
    ("核心思想", &result.analysis.core_idea),
    ("适用场景", &result.analysis.applicable_scenario),
    ("现代意义", &result.analysis.modern_significance),
  ] {
    lines.push(format!("{} {}", format!("{label}:").blue().bold(), value));
  }

  lines.join("\n")
}

pub fn format_results(results: &[QueryResult]) -> String {
  if results.is_empty() {
    return format!("{}", "No matching poems found.".yellow());
  }

  results
    .iter()
    .enumerate()
    .map(|(i, result)| format_result(i + 1, result))
    .collect::<Vec<_>>()
    .join("\n\n")
}

/// Per-record progress bar for ingestion runs; the pipeline sets its length
pub fn ingest_progress_bar() -> ProgressBar {
  let bar = ProgressBar::new(0);
  let style = ProgressStyle::with_template(
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
  )
  .map(|style| style.progress_chars("#>-"))
  .unwrap_or_else(|_| ProgressStyle::default_bar());
  bar.set_style(style);
  bar.enable_steady_tick(Duration::from_millis(100));
  bar
}

pub fn print_report(report: &IngestionReport, info: Option<&CollectionInfo>, elapsed: Duration) {
  println!("{} Ingestion finished", "✓".green());
  if let Some(start) = report.resumed_from {
    println!("  Resumed from record {}", start.to_string().cyan());
  }
  println!("  Processed: {}", report.processed.to_string().green());
  println!("  Skipped:   {}", report.skipped.to_string().yellow());
  println!("  Total:     {}", report.total);
  println!("  Batches:   {}", report.batches);

  if let Some(info) = info {
    let points = info.points_count.map_or_else(|| "unknown".to_string(), |c| c.to_string());
    let dimension = info.vector_dimension.map_or_else(|| "unknown".to_string(), |d| d.to_string());
    println!("{} Collection {}", "ℹ".blue(), info.name.cyan());
    println!("  Points:    {points}");
    println!("  Dimension: {dimension}");
  }

  println!("  Elapsed:   {:.1}s", elapsed.as_secs_f64());
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::PoemAnalysis;

  fn result() -> QueryResult {
    QueryResult {
      score: 0.912,
      original_id: "7".to_string(),
      title: "静夜思".to_string(),
      author: "李白".to_string(),
      content: "床前明月光".to_string(),
      analysis: PoemAnalysis {
        theme: "思乡".to_string(),
        core_idea: "明月寄情".to_string(),
        applicable_scenario: "异乡夜晚".to_string(),
        modern_significance: "游子情怀".to_string(),
      },
    }
  }

  #[test]
  fn test_result_block_shows_every_field() {
    let block = format_result(1, &result());
    for expected in ["0.912", "静夜思", "李白", "床前明月光", "思乡", "明月寄情", "异乡夜晚", "游子情怀"]
    {
      assert!(block.contains(expected), "missing {expected} in {block}");
    }
  }

  #[test]
  fn test_empty_results_message() {
    assert!(format_results(&[]).contains("No matching poems found."));
  }

  #[test]
  fn test_results_are_numbered() {
    let output = format_results(&[result(), result()]);
    assert!(output.contains("1. "));
    assert!(output.contains("2. "));
  }

  #[test]
  fn test_ingest_progress_bar_starts_empty() {
    let bar = ingest_progress_bar();
    assert_eq!(bar.length(), Some(0));
    assert_eq!(bar.position(), 0);
    assert!(!bar.is_finished());
    bar.finish_and_clear();
  }
}
