//! Bounded waiting for remote jobs.
//!
//! A run is checked immediately, then after a delay that grows by
//! `multiplier` each round up to `max_interval`. Waiting stops with
//! `AiError::Timeout` once `max_attempts` checks have been made or the
//! next sleep would cross `deadline`.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::trace;

use crate::AiError;

#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    pub initial_interval: Duration,
    pub multiplier: f64,
    pub max_interval: Duration,
    pub max_attempts: u32,
    pub deadline: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(1),
            multiplier: 1.5,
            max_interval: Duration::from_secs(5),
            max_attempts: 60,
            deadline: Duration::from_secs(120),
        }
    }
}

impl PollPolicy {
    /// Fixed interval, no growth.
    pub fn fixed(interval: Duration, max_attempts: u32) -> Self {
        Self {
            initial_interval: interval,
            multiplier: 1.0,
            max_interval: interval,
            max_attempts,
            deadline: interval.saturating_mul(max_attempts.max(1)),
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Delay to use after `current`.
    pub fn next_delay(&self, current: Duration) -> Duration {
        let grown = current.mul_f64(self.multiplier.max(1.0));
        grown.min(self.max_interval)
    }

    /// Call `check` until it yields `Some`, sleeping between calls.
    ///
    /// Errors from `check` end the wait immediately. Returns the value
    /// together with the number of checks made.
    pub async fn poll_until<T, F, Fut>(&self, mut check: F) -> Result<(T, u32), AiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>, AiError>>,
    {
        let started = Instant::now();
        let mut delay = self.initial_interval;
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            if let Some(value) = check().await? {
                return Ok((value, attempts));
            }

            let elapsed = started.elapsed();
            if attempts >= self.max_attempts || elapsed + delay > self.deadline {
                return Err(AiError::Timeout {
                    attempts,
                    elapsed_ms: elapsed.as_millis(),
                });
            }

            trace!(attempts, delay_ms = delay.as_millis() as u64, "still pending");
            tokio::time::sleep(delay).await;
            delay = self.next_delay(delay);
        }
    }
}
