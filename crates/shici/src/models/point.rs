use serde::{Deserialize, Serialize};

use super::poem::PoemRecord;

/// Flattened poem fields stored alongside each vector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointPayload {
  #[serde(default)]
  pub original_id: String,
  pub title: String,
  pub content: String,
  pub author: String,
  pub theme: String,
  pub core_idea: String,
  pub applicable_scenario: String,
  pub modern_significance: String,
}

impl PointPayload {
  /// `index` is the record's position in the input and stands in for a missing external id
  pub fn from_record(record: &PoemRecord, index: usize) -> Self {
    Self {
      original_id: record.id.clone().unwrap_or_else(|| index.to_string()),
      title: record.title.clone(),
      content: record.content.clone(),
      author: record.author.clone(),
      theme: record.analysis.theme.clone(),
      core_idea: record.analysis.core_idea.clone(),
      applicable_scenario: record.analysis.applicable_scenario.clone(),
      modern_significance: record.analysis.modern_significance.clone(),
    }
  }
}

/// One unit written to the vector store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorPoint {
  pub id: String,
  pub vector: Vec<f32>,
  pub payload: PointPayload,
}

impl VectorPoint {
  pub fn from_record(record: &PoemRecord, index: usize, vector: Vec<f32>) -> Self {
    Self {
      id: record.point_id().to_string(),
      vector,
      payload: PointPayload::from_record(record, index),
    }
  }
}
