//! Bounded retry for upstream calls.
//!
//! This module provides the `RetryContext` used by the upstream client. Every failed attempt is
//! retried, regardless of its cause, until the attempt ceiling is reached; the caller then
//! receives a single `UpstreamError::MaxRetriesReached`.

use std::{future::Future, time::Duration};

use rand::Rng;

use crate::server::error::upstream::UpstreamError;

/// Delay strategy between two attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Wait the configured delay between every attempt
    Fixed,
    /// Double the delay after every failure, plus up to 50% random jitter
    Exponential,
}

/// Context for executing upstream operations with bounded retries.
///
/// # Retry Behavior
///
/// - **Max attempts**: 10 (default)
/// - **Delay**: 1 second between attempts (default), genuinely awaited
/// - **Retry conditions**: every error is retried, the upstream API gives no reliable signal
///   that a failure is permanent
///
/// # Example
///
/// ```ignore
/// let retry = RetryContext::new().with_max_attempts(3);
///
/// let body = retry
///     .execute_with_retry(url, || fetch_once(&http, url))
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct RetryContext {
    /// Maximum number of attempts before giving up
    max_attempts: u32,
    /// Delay after the first failure
    delay: Duration,
    backoff: Backoff,
}

impl Default for RetryContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryContext {
    /// Attempt ceiling used by [`RetryContext::new`]
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
    /// Base delay used by [`RetryContext::new`]
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);
    /// Upper bound for a single exponential delay
    pub const MAX_DELAY: Duration = Duration::from_secs(30);

    /// Creates a retry context with 10 attempts and a fixed 1 second delay.
    pub fn new() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            delay: Self::DEFAULT_DELAY,
            backoff: Backoff::Fixed,
        }
    }

    /// Sets the attempt ceiling, values below 1 are raised to 1.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Sets the base delay between attempts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets how the delay grows after each failure.
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait after the `failures`-th failed attempt (1-based).
    pub fn delay_for(&self, failures: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.delay,
            Backoff::Exponential => {
                let factor = 2_u32.saturating_pow(failures.saturating_sub(1));
                let base = self.delay.saturating_mul(factor).min(Self::MAX_DELAY);

                let jitter_ceiling = base.as_millis() as u64 / 2;
                let jitter = if jitter_ceiling == 0 {
                    0
                } else {
                    rand::rng().random_range(0..=jitter_ceiling)
                };

                base + Duration::from_millis(jitter)
            }
        }
    }

    /// Executes an operation until it succeeds or the attempt ceiling is reached.
    ///
    /// # Arguments
    /// - `target` - What is being fetched, used for logging and in the final error (usually a URL)
    /// - `operation` - Produces a fresh future for every attempt
    ///
    /// # Returns
    /// - `Ok(R)` - An attempt succeeded
    /// - `Err(UpstreamError::MaxRetriesReached)` - Every attempt failed
    pub async fn execute_with_retry<R, F, Fut>(
        &self,
        target: &str,
        mut operation: F,
    ) -> Result<R, UpstreamError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R, UpstreamError>>,
    {
        let mut failures = 0;

        loop {
            tracing::debug!(
                "Fetching {} (attempt {}/{})",
                target,
                failures + 1,
                self.max_attempts
            );

            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    failures += 1;
                    if failures >= self.max_attempts {
                        tracing::error!(
                            "Max attempts ({}) exceeded for {}: {}",
                            self.max_attempts,
                            target,
                            e
                        );

                        return Err(UpstreamError::MaxRetriesReached {
                            url: target.to_string(),
                            attempts: failures,
                            last_error: e.to_string(),
                        });
                    }

                    let delay = self.delay_for(failures);

                    tracing::warn!(
                        "Retrying {} (attempt {}/{}) after {:?}: {}",
                        target,
                        failures,
                        self.max_attempts,
                        delay,
                        e
                    );

                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
