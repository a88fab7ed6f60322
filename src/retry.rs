//! Retry combinator
//!
//! One bounded retry loop shared by table-readiness probes and every vendor
//! statement-completion poll. The caller decides which errors are worth
//! another attempt; anything else ends the loop immediately.

use crate::error::{Error, Result};
use crate::types::BackoffType;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Bounds for a retry loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Lower bound of every delay
    pub min_delay: Duration,
    /// Upper bound of every delay
    pub max_delay: Duration,
    /// How the delay ceiling grows between attempts
    pub backoff_type: BackoffType,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            min_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(10),
            backoff_type: BackoffType::Exponential,
        }
    }
}

impl RetryPolicy {
    /// Policy with the given attempt budget and default delays
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Set the delay range
    #[must_use]
    pub fn with_delays(mut self, min: Duration, max: Duration) -> Self {
        self.min_delay = min;
        self.max_delay = max.max(min);
        self
    }

    /// Set the backoff strategy
    #[must_use]
    pub fn with_backoff(mut self, backoff_type: BackoffType) -> Self {
        self.backoff_type = backoff_type;
        self
    }

    /// Upper bound of the delay after a failed attempt (0-based)
    pub fn delay_ceiling(&self, attempt: u32) -> Duration {
        let delay = match self.backoff_type {
            BackoffType::Constant => self.min_delay,
            BackoffType::Linear => self.min_delay.saturating_mul(attempt.saturating_add(1)),
            BackoffType::Exponential => self.min_delay.saturating_mul(2u32.saturating_pow(attempt)),
        };
        delay.clamp(self.min_delay, self.max_delay.max(self.min_delay))
    }

    /// Randomized delay in `[min_delay, delay_ceiling(attempt)]`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let ceiling = self.delay_ceiling(attempt);
        if ceiling <= self.min_delay {
            return self.min_delay;
        }
        rand::thread_rng().gen_range(self.min_delay..=ceiling)
    }
}

/// Run `operation` until it succeeds, fails permanently, or the budget runs out
///
/// `operation` receives the 0-based attempt number. Errors for which
/// `is_retryable` returns false are returned as-is. Running out of attempts
/// on retryable errors yields [`Error::MaxRetriesExceeded`].
pub async fn retry<T, F, Fut, P>(policy: &RetryPolicy, mut operation: F, is_retryable: P) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
    P: Fn(&Error) -> bool,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if !is_retryable(&e) => return Err(e),
            Err(e) => {
                if attempt + 1 >= max_attempts {
                    warn!(
                        "Giving up after {} attempts, last error: {}",
                        max_attempts, e
                    );
                    return Err(Error::MaxRetriesExceeded {
                        max_retries: max_attempts,
                    });
                }

                let delay = policy.delay_for(attempt);
                debug!(
                    "Attempt {}/{} failed ({}), retrying in {:?}",
                    attempt + 1,
                    max_attempts,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
