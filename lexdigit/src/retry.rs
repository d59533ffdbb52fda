//! Bounded retry with linear backoff

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How often and how patiently a call is retried
///
/// Attempt `n` (1-based) that fails is followed by a pause of
/// `n × backoff` before the next attempt. The last failure is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Base backoff in milliseconds
    pub backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_ms: 1000,
        }
    }
}

impl RetryPolicy {
    /// Pause after the given failed attempt (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.backoff_ms.saturating_mul(u64::from(attempt)))
    }

    /// Run `operation` until it succeeds or attempts run out
    pub fn run<T, E, F>(&self, operation: F) -> Result<T, E>
    where
        F: FnMut(u32) -> Result<T, E>,
        E: std::fmt::Display,
    {
        self.run_with_sleep(operation, std::thread::sleep)
    }

    /// Like [`RetryPolicy::run`] with an injectable sleep function
    pub fn run_with_sleep<T, E, F, S>(&self, mut operation: F, mut sleep: S) -> Result<T, E>
    where
        F: FnMut(u32) -> Result<T, E>,
        S: FnMut(Duration),
        E: std::fmt::Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation(attempt) {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= max_attempts => {
                    log::warn!("Attempt {}/{} failed, giving up: {}", attempt, max_attempts, e);
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.delay_after(attempt);
                    log::warn!(
                        "Attempt {}/{} failed, retrying in {:?}: {}",
                        attempt,
                        max_attempts,
                        delay,
                        e
                    );
                    sleep(delay);
                    attempt += 1;
                }
            }
        }
    }
}
