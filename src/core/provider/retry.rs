use std::{future::Future, time::Duration};

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::core::error::ProviderError;

/// Bounded exponential backoff for provider calls.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Attempts including the first one. Zero is treated as one.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub multiplier: f64,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts,
            initial_backoff,
            max_backoff: Duration::from_secs(8),
            multiplier: 2.0,
        }
    }

    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Single attempt, no waiting.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Wait before attempt `attempt` (0-indexed).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = self.multiplier.powi(attempt as i32 - 1);
        let millis = self.initial_backoff.as_millis() as f64 * factor;
        Duration::from_millis(millis as u64).min(self.max_backoff)
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Run `operation` until it succeeds, fails permanently, or attempts run
    /// out. Only [`ProviderError::Transient`] is retried.
    pub async fn run<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let attempts = self.attempts();
        let mut attempt = 0;
        loop {
            let delay = self.backoff_for(attempt);
            if !delay.is_zero() {
                debug!(%label, attempt = attempt + 1, ?delay, "retrying provider call");
                sleep(delay).await;
            }

            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_transient() => {
                    debug!(%label, error = %e, "not retryable");
                    return Err(e);
                }
                Err(e) => {
                    attempt += 1;
                    if attempt >= attempts {
                        warn!(%label, attempts, error = %e, "all attempts failed");
                        return Err(e);
                    }
                    warn!(
                        %label,
                        attempt,
                        remaining = attempts - attempt,
                        error = %e,
                        "attempt failed"
                    );
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}
