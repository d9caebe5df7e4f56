use serde::{Deserialize, Serialize};

use super::point::PointPayload;
use super::poem::PoemAnalysis;

/// A ranked search hit with its poem un-flattened from the payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
  /// Similarity rounded to three decimals
  pub score: f64,
  pub original_id: String,
  pub title: String,
  pub author: String,
  pub content: String,
  pub analysis: PoemAnalysis,
}

impl QueryResult {
  pub fn from_hit(score: f32, payload: PointPayload) -> Self {
    Self {
      score: round_score(score),
      original_id: payload.original_id,
      title: payload.title,
      author: payload.author,
      content: payload.content,
      analysis: PoemAnalysis {
        theme: payload.theme,
        core_idea: payload.core_idea,
        applicable_scenario: payload.applicable_scenario,
        modern_significance: payload.modern_significance,
      },
    }
  }
}

pub fn round_score(score: f32) -> f64 {
  (f64::from(score) * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_round_score_keeps_three_decimals() {
    assert_eq!(round_score(0.87654), 0.877);
    assert_eq!(round_score(0.1), 0.1);
    assert_eq!(round_score(1.0), 1.0);
    assert_eq!(round_score(-0.12349), -0.123);
  }
}
