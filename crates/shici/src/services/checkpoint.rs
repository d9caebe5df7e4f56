//! Resume marker written after every committed batch

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ShiciError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
  /// Input file the run was reading
  pub input: PathBuf,
  pub total_records: usize,
  /// Index of the first record not yet committed to the store
  pub next_record: usize,
  pub batches_committed: usize,
  pub updated_at: DateTime<Utc>,
}

impl Checkpoint {
  pub fn new(input: &Path, total_records: usize, next_record: usize, batches_committed: usize) -> Self {
    Self {
      input: input.to_path_buf(),
      total_records,
      next_record,
      batches_committed,
      updated_at: Utc::now(),
    }
  }

  /// Whether this checkpoint was written for the same input as the current run
  pub fn matches(&self, input: &Path, total_records: usize) -> bool {
    self.input == input && self.total_records == total_records && self.next_record <= total_records
  }
}

/// Default location: next to the input, `<input>.checkpoint.json`
pub fn checkpoint_path(input: &Path) -> PathBuf {
  let mut name = input.as_os_str().to_os_string();
  name.push(".checkpoint.json");
  PathBuf::from(name)
}

pub fn load(path: &Path) -> Result<Option<Checkpoint>> {
  if !path.exists() {
    return Ok(None);
  }
  let content = fs::read_to_string(path)?;
  let checkpoint =
    serde_json::from_str(&content).map_err(|e| ShiciError::checkpoint(path, e.to_string()))?;
  Ok(Some(checkpoint))
}

pub fn save(path: &Path, checkpoint: &Checkpoint) -> Result<()> {
  let content = serde_json::to_string_pretty(checkpoint)
    .map_err(|e| ShiciError::checkpoint(path, e.to_string()))?;
  fs::write(path, content)?;
  tracing::debug!(path = %path.display(), next_record = checkpoint.next_record, "checkpoint saved");
  Ok(())
}

pub fn clear(path: &Path) -> Result<()> {
  if path.exists() {
    fs::remove_file(path)?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn test_path_sits_next_to_input() {
    assert_eq!(
      checkpoint_path(Path::new("/data/poems.jsonl")),
      PathBuf::from("/data/poems.jsonl.checkpoint.json")
    );
  }

  #[test]
  fn test_save_load_clear() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("poems.jsonl");
    let path = checkpoint_path(&input);

    assert_eq!(load(&path).unwrap(), None);

    let checkpoint = Checkpoint::new(&input, 250, 200, 2);
    save(&path, &checkpoint).unwrap();
    assert_eq!(load(&path).unwrap(), Some(checkpoint));

    clear(&path).unwrap();
    assert!(!path.exists());
    clear(&path).unwrap();
  }

  #[test]
  fn test_corrupt_checkpoint_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("poems.jsonl.checkpoint.json");
    fs::write(&path, "not json").unwrap();

    assert!(matches!(load(&path), Err(ShiciError::Checkpoint { .. })));
  }

  #[test]
  fn test_matches_requires_same_input_and_size() {
    let checkpoint = Checkpoint::new(Path::new("a.jsonl"), 10, 5, 1);
    assert!(checkpoint.matches(Path::new("a.jsonl"), 10));
    assert!(!checkpoint.matches(Path::new("b.jsonl"), 10));
    assert!(!checkpoint.matches(Path::new("a.jsonl"), 11));
  }
}
