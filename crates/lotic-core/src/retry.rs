//! Bounded retry for outbound storage and cloud API calls.
//!
//! A [`RetryPolicy`] carries an exponential backoff schedule and a maximum
//! attempt count, either given directly or derived from a total wait budget
//! by summing backoff intervals until the budget is consumed. Only transient
//! failures ([`Error::is_transient`]) are retried; deterministic failures
//! surface on the first occurrence.

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::error::{Error, Result};

/// Default initial backoff interval.
const DEFAULT_INITIAL_INTERVAL: Duration = Duration::from_secs(30);
/// Default backoff multiplier.
const DEFAULT_MULTIPLIER: f64 = 2.0;
/// Default backoff interval cap.
const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(300);

/// An exponential backoff schedule with a bounded attempt count.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    initial_interval: Duration,
    multiplier: f64,
    max_interval: Duration,
    max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::with_budget(Duration::from_secs(15 * 60))
    }
}

impl RetryPolicy {
    /// Creates a policy with an explicit attempt count and the default
    /// exponential schedule (30s initial, doubling, capped at 5m).
    #[must_use]
    pub const fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            initial_interval: DEFAULT_INITIAL_INTERVAL,
            multiplier: DEFAULT_MULTIPLIER,
            max_interval: DEFAULT_MAX_INTERVAL,
            max_attempts,
        }
    }

    /// Creates a policy with a fixed delay between attempts.
    #[must_use]
    pub const fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            initial_interval: delay,
            multiplier: 1.0,
            max_interval: delay,
            max_attempts,
        }
    }

    /// Creates a policy whose attempt count is derived from a total wait
    /// budget, using the default exponential schedule.
    ///
    /// Attempts are added until their summed backoff meets the budget, with a
    /// floor of one attempt for degenerate budgets.
    #[must_use]
    pub fn with_budget(budget: Duration) -> Self {
        let mut policy = Self::with_max_attempts(0);
        policy.max_attempts = policy.attempts_within(budget);
        policy
    }

    /// Overrides the initial backoff interval.
    #[must_use]
    pub const fn initial_interval(mut self, interval: Duration) -> Self {
        self.initial_interval = interval;
        self
    }

    /// Overrides the backoff interval cap.
    #[must_use]
    pub const fn max_interval(mut self, interval: Duration) -> Self {
        self.max_interval = interval;
        self
    }

    /// Returns the configured attempt count, including the first attempt.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the backoff to sleep after the given 1-based failed attempt.
    #[must_use]
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let interval = self.initial_interval.as_secs_f64() * self.multiplier.powi(exponent);

        // cap in f64, the uncapped schedule overflows Duration once the
        // exponent grows
        Duration::from_secs_f64(interval.min(self.max_interval.as_secs_f64()))
    }

    fn attempts_within(&self, budget: Duration) -> u32 {
        let mut waited = Duration::ZERO;
        let mut count = 0;

        while waited < budget {
            count += 1;
            waited += self.backoff_for(count);
        }

        if count == 0 {
            warn!(?budget, "retry budget yields zero attempts, using one");
            return 1;
        }

        count
    }

    /// Runs the operation, retrying transient failures under this policy.
    ///
    /// # Errors
    ///
    /// Deterministic failures propagate on first occurrence. A transient
    /// failure on the final attempt surfaces as [`Error::RetryExhausted`]
    /// carrying the attempt count, elapsed time, and final cause.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let started = Instant::now();
        let mut attempt = 0;

        loop {
            attempt += 1;

            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    let backoff = self.backoff_for(attempt);
                    warn!(
                        operation,
                        attempt,
                        max_attempts = self.max_attempts,
                        ?backoff,
                        error = %err,
                        "transient failure, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(err) if err.is_transient() => {
                    return Err(Error::RetryExhausted {
                        attempts: attempt,
                        elapsed: started.elapsed(),
                        source: Box::new(err),
                    });
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn budget_derives_attempt_count() {
        let policy = RetryPolicy::fixed(0, Duration::from_secs(1));
        assert_eq!(policy.attempts_within(Duration::from_secs(5)), 5);

        // a zero budget still permits one attempt
        assert_eq!(policy.attempts_within(Duration::ZERO), 1);
    }

    #[test]
    fn large_budgets_derive_without_overflow() {
        // the capped schedule settles at 300s per attempt, so a six hour
        // budget is served by a finite attempt count
        let policy = RetryPolicy::with_budget(Duration::from_secs(6 * 3600));
        assert!(policy.max_attempts() > 4);

        assert_eq!(
            policy.backoff_for(policy.max_attempts()),
            Duration::from_secs(300)
        );
    }

    #[test]
    fn backoff_doubles_up_to_cap() {
        let policy = RetryPolicy::with_max_attempts(10);

        assert_eq!(policy.backoff_for(1), Duration::from_secs(30));
        assert_eq!(policy.backoff_for(2), Duration::from_secs(60));
        assert_eq!(policy.backoff_for(3), Duration::from_secs(120));
        assert_eq!(policy.backoff_for(4), Duration::from_secs(240));
        // capped
        assert_eq!(policy.backoff_for(5), Duration::from_secs(300));
        assert_eq!(policy.backoff_for(9), Duration::from_secs(300));
    }

    #[tokio::test]
    async fn transient_failures_are_retried_until_success() {
        let policy = RetryPolicy::fixed(5, Duration::from_millis(1));
        let calls = AtomicU32::new(0);

        let value = policy
            .run("flaky", || async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(Error::storage("connection reset"))
                } else {
                    Ok(42)
                }
            })
            .await
            .expect("should eventually succeed");

        assert_eq!(value, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn deterministic_failures_are_not_retried() {
        let policy = RetryPolicy::fixed(5, Duration::from_millis(1));
        let calls = AtomicU32::new(0);

        let err = policy
            .run::<(), _, _>("conflict", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(Error::ManifestExists {
                    uri: "s3://bucket/key".into(),
                })
            })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ManifestExists { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhaustion_reports_attempts_and_cause() {
        let policy = RetryPolicy::fixed(3, Duration::from_millis(1));

        let err = policy
            .run::<(), _, _>("down", || async { Err(Error::Throttled("slow down".into())) })
            .await
            .unwrap_err();

        match err {
            Error::RetryExhausted { attempts, source, .. } => {
                assert_eq!(attempts, 3);
                assert!(matches!(*source, Error::Throttled(_)));
            }
            other => panic!("expected RetryExhausted, got {other:?}"),
        }
    }
}
