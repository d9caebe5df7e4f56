//! Exponential backoff with full jitter for store writes

use rand::Rng;
use std::time::Duration;

use crate::config::IngestConfig;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
  pub attempts: u32,
  pub base_delay: Duration,
  pub max_delay: Duration,
}

impl RetryPolicy {
  pub fn from_config(config: &IngestConfig) -> Self {
    Self {
      attempts: config.upsert_attempts.max(1),
      base_delay: config.retry_base_delay,
      max_delay: config.retry_max_delay,
    }
  }

  /// Upper bound of the pause after failed attempt number `attempt` (1-based)
  pub fn ceiling(&self, attempt: u32) -> Duration {
    let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
    self.base_delay.saturating_mul(factor).min(self.max_delay)
  }

  /// Random pause in `[0, ceiling(attempt)]`
  pub fn delay(&self, attempt: u32) -> Duration {
    let ceiling = self.ceiling(attempt);
    if ceiling.is_zero() {
      return Duration::ZERO;
    }
    let millis = rand::thread_rng().gen_range(0..=ceiling.as_millis() as u64);
    Duration::from_millis(millis)
  }
}
