//! Poem records as produced by the upstream analysis step

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Analysis keys every ingestible record must carry, in payload order
pub const ANALYSIS_FIELDS: [&str; 4] =
  ["theme", "core_idea", "applicable_scenario", "modern_significance"];

/// The four-part analysis attached to a poem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoemAnalysis {
  pub theme: String,
  pub core_idea: String,
  pub applicable_scenario: String,
  pub modern_significance: String,
}

impl PoemAnalysis {
  /// Text sent to the embedding model for this poem
  pub fn combined_text(&self) -> String {
    // One label per line, no indentation; vectors from indented layouts are not comparable
    format!(
      "主题：{}\n核心思想：{}\n适用场景：{}\n现代意义：{}",
      self.theme, self.core_idea, self.applicable_scenario, self.modern_significance
    )
  }

  fn from_object(analysis: &serde_json::Map<String, Value>) -> Result<Self, SkipReason> {
    let field = |name: &'static str| match analysis.get(name) {
      None | Some(Value::Null) => Err(SkipReason::MissingField(name)),
      Some(value) => Ok(value_to_text(value)),
    };

    Ok(Self {
      theme: field("theme")?,
      core_idea: field("core_idea")?,
      applicable_scenario: field("applicable_scenario")?,
      modern_significance: field("modern_significance")?,
    })
  }
}

/// One poem with its analysis, validated for ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoemRecord {
  /// External identifier, already coerced to text
  pub id: Option<String>,
  pub title: String,
  pub author: String,
  pub content: String,
  pub kind_cn: String,
  pub analysis: PoemAnalysis,
}

/// Why a record was left out of the collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
  NotAnObject,
  WrongKind { kind: Option<String> },
  MissingAnalysis,
  MissingField(&'static str),
  EmbeddingFailed(String),
  DimensionDrift { expected: usize, found: usize },
}

impl fmt::Display for SkipReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SkipReason::NotAnObject => write!(f, "record is not a JSON object"),
      SkipReason::WrongKind { kind: Some(kind) } => write!(f, "category '{kind}' is not a poem"),
      SkipReason::WrongKind { kind: None } => write!(f, "record has no category"),
      SkipReason::MissingAnalysis => write!(f, "record has no analysis"),
      SkipReason::MissingField(name) => write!(f, "analysis is missing '{name}'"),
      SkipReason::EmbeddingFailed(message) => write!(f, "embedding failed: {message}"),
      SkipReason::DimensionDrift { expected, found } => {
        write!(f, "embedding has {found} dimensions, collection expects {expected}")
      }
    }
  }
}

impl PoemRecord {
  /// Validate a raw JSON record against the poem category and the analysis schema
  pub fn from_value(value: &Value, poem_kind: &str) -> Result<Self, SkipReason> {
    let object = value.as_object().ok_or(SkipReason::NotAnObject)?;

    let kind = object.get("kind_cn").and_then(Value::as_str);
    if kind != Some(poem_kind) {
      return Err(SkipReason::WrongKind { kind: kind.map(str::to_string) });
    }

    let analysis = match object.get("analysis") {
      Some(Value::Object(analysis)) => PoemAnalysis::from_object(analysis)?,
      _ => return Err(SkipReason::MissingAnalysis),
    };

    let text = |name: &str| object.get(name).map(value_to_text).unwrap_or_default();

    Ok(Self {
      id: object.get("id").filter(|id| !id.is_null()).map(value_to_text),
      title: text("title"),
      author: text("author"),
      content: text("content"),
      kind_cn: poem_kind.to_string(),
      analysis,
    })
  }

  /// Key the point identifier is derived from; stable across runs over the same source
  pub fn stable_key(&self) -> String {
    match &self.id {
      Some(id) => format!("poem:id:{id}"),
      None => format!("poem:text:{}\u{1f}{}\u{1f}{}", self.title, self.author, self.content),
    }
  }

  /// Deterministic point identifier, so re-ingesting overwrites instead of duplicating
  pub fn point_id(&self) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, self.stable_key().as_bytes())
  }
}

/// Coerce a JSON value to the text stored in payloads
pub fn value_to_text(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    Value::Null => String::new(),
    other => other.to_string(),
  }
}
