//! JSON-Lines input loading

use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Result, ShiciError};

/// Read every non-blank line of `path` as one JSON value, in file order
pub fn load_records(path: &Path) -> Result<Vec<Value>> {
  let reader = BufReader::new(File::open(path)?);
  let mut records = Vec::new();

  for (index, line) in reader.lines().enumerate() {
    let line = line?;
    let trimmed = line.trim();
    if trimmed.is_empty() {
      continue;
    }

    let value = serde_json::from_str(trimmed)
      .map_err(|e| ShiciError::load(path, index + 1, e.to_string()))?;
    records.push(value);
  }

  tracing::info!(path = %path.display(), records = records.len(), "loaded input records");
  Ok(records)
}
