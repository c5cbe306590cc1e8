//! Fixed-delay retry with random jitter.
//!
//! Every page fetch goes through [`retry`]. An attempt either produces a
//! value or a [`FetchError`]; failed attempts are retried after
//! `delay + uniform(0, max_jitter)` until the policy's attempt budget is
//! spent, at which point the last error is wrapped in
//! [`FetchError::Exhausted`].

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::FetchError;

/// Default number of attempts per URL.
const DEFAULT_ATTEMPTS: u32 = 3;

/// Default fixed delay between attempts.
const DEFAULT_DELAY: Duration = Duration::from_secs(2);

/// Default upper bound of the random jitter added to the delay.
const DEFAULT_MAX_JITTER: Duration = Duration::from_secs(1);

/// How many times to try a fetch and how long to wait between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
    max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            delay: DEFAULT_DELAY,
            max_jitter: DEFAULT_MAX_JITTER,
        }
    }
}

impl RetryPolicy {
    /// Sets the total number of attempts (at least one is always made).
    #[must_use]
    pub const fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Sets the fixed delay between attempts.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the upper bound of the random jitter added to the delay.
    #[must_use]
    pub const fn with_max_jitter(mut self, max_jitter: Duration) -> Self {
        self.max_jitter = max_jitter;
        self
    }

    /// Total number of attempts.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts.max(1)
    }

    /// Picks the wait before the next attempt.
    fn backoff(&self) -> Duration {
        let max_ms = u64::try_from(self.max_jitter.as_millis()).unwrap_or(u64::MAX);
        let jitter_ms = if max_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..max_ms)
        };
        self.delay + Duration::from_millis(jitter_ms)
    }
}

/// Runs `attempt` until it succeeds or the policy's attempts are spent.
///
/// `attempt` receives the 1-based attempt number and is called afresh for
/// each try. No wait follows the final attempt.
///
/// # Errors
///
/// Returns [`FetchError::Exhausted`] wrapping the last attempt's error once
/// every attempt has failed.
pub async fn retry<T, F, Fut>(
    policy: &RetryPolicy,
    url: &str,
    mut attempt: F,
) -> Result<T, FetchError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let attempts = policy.attempts();
    let mut n = 1;

    loop {
        match attempt(n).await {
            Ok(value) => return Ok(value),
            Err(e) if n >= attempts => {
                log::error!("{url}: attempt {n}/{attempts} failed, giving up: {e}");
                return Err(FetchError::Exhausted {
                    url: url.to_owned(),
                    attempts,
                    last: Box::new(e),
                });
            }
            Err(e) => {
                let wait = policy.backoff();
                log::warn!("{url}: attempt {n}/{attempts} failed ({e}), retrying in {wait:?}");
                tokio::time::sleep(wait).await;
                n += 1;
            }
        }
    }
}
