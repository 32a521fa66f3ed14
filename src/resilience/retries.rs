//! Retry policy for outbound fetches.
//!
//! # Design Decisions
//! - Only transient network failures (connect errors, timeouts) are retried
//! - Non-2xx statuses are never retried: they are the origin's answer
//! - `max_attempts` counts the first attempt

use std::time::Duration;

use crate::config::RetryConfig;
use crate::error::FetchError;
use crate::resilience::backoff::calculate_backoff;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay_ms: u64,
    max_delay_ms: u64,
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        let max_attempts = if config.enabled { config.max_attempts.max(1) } else { 1 };
        Self {
            max_attempts,
            base_delay_ms: config.base_delay_ms,
            max_delay_ms: config.max_delay_ms,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before the next attempt, or `None` if `error` after `attempt` tries is final.
    pub fn next_delay(&self, attempt: u32, error: &FetchError) -> Option<Duration> {
        if attempt >= self.max_attempts || !error.is_transient() {
            return None;
        }
        Some(calculate_backoff(attempt, self.base_delay_ms, self.max_delay_ms))
    }
}
