//! Retry policy for single listing-page fetches.
//!
//! The default policy never gives up on a page and does not wait between
//! attempts. That keeps a supervised, foreground run moving through flaky
//! network conditions, but it spins hot against an endpoint that fails
//! persistently. [`RetryPolicy::bounded`] exists for tests and for operators
//! who prefer a failure to a hang.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Upper bound on a single backoff sleep.
const DEFAULT_MAX_DELAY_MS: u64 = 60_000;

/// How a failing page fetch is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure; `None` retries forever.
    pub max_retries: Option<u32>,
    /// Base delay for exponential backoff: `backoff_base_ms * 2^(n-1)` before
    /// retry `n`. `0` retries immediately.
    pub backoff_base_ms: u64,
    /// Cap applied to each computed delay.
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    /// Retry forever with no delay.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_retries: None,
            backoff_base_ms: 0,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
        }
    }

    /// At most `max_retries` additional attempts with exponential backoff.
    #[must_use]
    pub const fn bounded(max_retries: u32, backoff_base_ms: u64) -> Self {
        Self {
            max_retries: Some(max_retries),
            backoff_base_ms,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
        }
    }

    /// Builds the policy from the configured retry limit and backoff base.
    #[must_use]
    pub const fn from_config(max_retries: Option<u32>, backoff_base_ms: u64) -> Self {
        Self {
            max_retries,
            backoff_base_ms,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
        }
    }

    fn allows_retry(&self, retries_so_far: u32) -> bool {
        self.max_retries.is_none_or(|max| retries_so_far < max)
    }

    /// Delay before retry number `retry` (1-based), before jitter.
    fn base_delay_ms(&self, retry: u32) -> u64 {
        let factor = 1u64 << (retry.saturating_sub(1)).min(20);
        self.backoff_base_ms
            .saturating_mul(factor)
            .min(self.max_delay_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Returns `true` for failures of the transport or the response body, which
/// may succeed on another attempt.
///
/// Structural errors (a page without `data.products`, a missing shard key)
/// and URL construction errors are deterministic and never retried.
pub(crate) fn is_retriable(err: &ScraperError) -> bool {
    matches!(
        err,
        ScraperError::Http(_)
            | ScraperError::UnexpectedStatus { .. }
            | ScraperError::Deserialize { .. }
    )
}

/// Runs `operation` until it succeeds, fails with a non-retriable error, or
/// `policy` runs out of retries. The last error is returned in the latter
/// two cases.
pub(crate) async fn retry_with_policy<T, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut retries = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || !policy.allows_retry(retries) {
                    return Err(err);
                }
                retries = retries.saturating_add(1);
                let base = policy.base_delay_ms(retries);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = if base == 0 {
                    0
                } else {
                    (base as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64
                };
                tracing::warn!(
                    attempt = retries,
                    max_retries = ?policy.max_retries,
                    delay_ms,
                    error = %err,
                    "listing fetch failed, retrying"
                );
                if delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }
}
