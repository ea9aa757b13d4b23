// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Retry Logic with Exponential Backoff
 * Bounded, strictly sequential retries for a single fallible operation
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary - Enterprise Edition
 */

use crate::errors::ScannerResult;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry policy with exponential backoff
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Re-attempts after the first try; total attempts = max_retries + 1
    pub max_retries: u32,

    /// Delay before the first retry
    pub initial_delay: Duration,

    /// Upper bound on any single delay
    pub max_delay: Duration,

    /// Backoff multiplier (typically 2.0 for exponential)
    pub backoff_multiplier: f64,

    /// Off by default; jitter breaks the non-decreasing delay sequence
    pub enable_jitter: bool,

    /// Jitter factor (0.0 to 1.0)
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
            backoff_multiplier: 2.0,
            enable_jitter: false,
            jitter_factor: 0.3,
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries
    pub fn no_retry() -> Self {
        Self::default().with_max_retries(0)
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    pub fn with_jitter(mut self, jitter_factor: f64) -> Self {
        self.enable_jitter = true;
        self.jitter_factor = jitter_factor;
        self
    }

    /// `min(initial_delay * multiplier^attempt, max_delay)` for attempt index 0..max_retries
    pub fn delay(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let base = self.initial_delay.as_millis() as f64 * self.backoff_multiplier.powi(exponent);
        let max = self.max_delay.as_millis() as f64;
        let capped = if base.is_finite() { base.min(max) } else { max };

        let with_jitter = if self.enable_jitter && capped > 0.0 {
            let mut rng = rand::rng();
            let jitter_range = capped * self.jitter_factor;
            let jitter = rng.random_range(-jitter_range..=jitter_range);
            (capped + jitter).clamp(0.0, max)
        } else {
            capped
        };

        Duration::from_millis(with_jitter as u64)
    }
}

/// Result of a retried operation plus the retries it consumed
#[derive(Debug)]
pub struct RetryOutcome<T> {
    pub result: ScannerResult<T>,
    /// Re-attempts performed; 0 when the first attempt decided the outcome
    pub retries: u32,
}

impl<T> RetryOutcome<T> {
    pub fn into_result(self) -> ScannerResult<T> {
        self.result
    }
}

/// Run `operation` until it succeeds, fails non-retryably, or the budget is spent
///
/// Attempts are strictly sequential. After exhaustion the last failure is
/// returned unchanged.
pub async fn run_with_backoff<F, Fut, T>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> RetryOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ScannerResult<T>>,
{
    let mut retries: u32 = 0;

    loop {
        debug!(
            attempt = retries + 1,
            max_retries = policy.max_retries,
            operation = operation_name,
            "Executing operation"
        );

        let err = match operation().await {
            Ok(value) => {
                if retries > 0 {
                    debug!(
                        retries = retries,
                        operation = operation_name,
                        "Operation succeeded after retry"
                    );
                }
                return RetryOutcome {
                    result: Ok(value),
                    retries,
                };
            }
            Err(err) => err,
        };

        let is_retryable = err.is_retryable();
        warn!(
            attempt = retries + 1,
            operation = operation_name,
            error = %err,
            retryable = is_retryable,
            "Operation failed"
        );

        if !is_retryable {
            debug!(operation = operation_name, "Error is not retryable, aborting");
            return RetryOutcome {
                result: Err(err),
                retries,
            };
        }

        if retries >= policy.max_retries {
            warn!(
                operation = operation_name,
                attempts = retries + 1,
                "Max retry attempts reached"
            );
            return RetryOutcome {
                result: Err(err),
                retries,
            };
        }

        let backoff = policy.delay(retries);
        debug!(
            retry = retries + 1,
            backoff_ms = backoff.as_millis() as u64,
            operation = operation_name,
            "Backing off before retry"
        );
        tokio::time::sleep(backoff).await;
        retries += 1;
    }
}

/// Same as [`run_with_backoff`] when the retry count is not needed
pub async fn retry_with_backoff<F, Fut, T>(
    policy: &RetryPolicy,
    operation_name: &str,
    operation: F,
) -> ScannerResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ScannerResult<T>>,
{
    run_with_backoff(policy, operation_name, operation)
        .await
        .into_result()
}
