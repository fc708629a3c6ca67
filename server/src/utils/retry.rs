//! Async retry utilities with a fixed delay between attempts

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use super::time::Clock;

/// Attempt budget with a fixed wait between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

/// Outcome of a single attempt
#[derive(Debug)]
pub enum Attempt<T, E> {
    Done(T),
    /// Transient failure; try again if attempts remain
    Retry(E),
    /// Permanent failure; stop immediately
    Fail(E),
}

#[derive(Debug, PartialEq, Eq)]
pub enum RetryError<E> {
    /// Every attempt ended in a retryable failure; carries the last one
    Exhausted { error: E, attempts: u32 },
    Fatal(E),
}

/// Run `operation` until it succeeds, fails permanently, or the policy runs out of attempts.
///
/// Waits `policy.delay` between attempts and never after the final one.
/// A policy with zero attempts still runs the operation once.
pub async fn retry_with_policy<F, Fut, T, E>(
    policy: RetryPolicy,
    clock: &dyn Clock,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Attempt<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        match operation().await {
            Attempt::Done(value) => return Ok(value),
            Attempt::Fail(e) => return Err(RetryError::Fatal(e)),
            Attempt::Retry(e) => {
                if attempts >= max_attempts {
                    return Err(RetryError::Exhausted { error: e, attempts });
                }
                let delay = policy.delay;
                tracing::warn!(
                    error = %e,
                    attempt = attempts,
                    max_attempts,
                    delay_ms = delay.as_millis(),
                    "Retrying after transient error"
                );
                clock.sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::ManualClock;
    use chrono::NaiveDate;
    use std::cell::Cell;

    fn clock() -> ManualClock {
        ManualClock::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }

    #[tokio::test]
    async fn test_success_on_first_try() {
        let clock = clock();
        let policy = RetryPolicy::fixed(3, Duration::from_secs(2));
        let result =
            retry_with_policy(policy, &clock, || async { Attempt::<_, &str>::Done(7) }).await;

        assert_eq!(result, Ok(7));
        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_success_after_retry() {
        let clock = clock();
        let calls = Cell::new(0);
        let policy = RetryPolicy::fixed(3, Duration::from_secs(2));
        let result = retry_with_policy(policy, &clock, || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move {
                if n < 3 {
                    Attempt::Retry("rate limited")
                } else {
                    Attempt::Done(n)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(3));
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_secs(2), Duration::from_secs(2)]
        );
    }

    #[tokio::test]
    async fn test_exhausted_without_trailing_sleep() {
        let clock = clock();
        let calls = Cell::new(0);
        let policy = RetryPolicy::fixed(3, Duration::from_secs(2));
        let result = retry_with_policy(policy, &clock, || {
            calls.set(calls.get() + 1);
            async { Attempt::<(), _>::Retry("rate limited") }
        })
        .await;

        assert_eq!(
            result,
            Err(RetryError::Exhausted {
                error: "rate limited",
                attempts: 3
            })
        );
        assert_eq!(calls.get(), 3);
        assert_eq!(clock.sleeps().len(), 2);
    }

    #[tokio::test]
    async fn test_fatal_stops_immediately() {
        let clock = clock();
        let calls = Cell::new(0);
        let policy = RetryPolicy::fixed(5, Duration::from_secs(2));
        let result = retry_with_policy(policy, &clock, || {
            calls.set(calls.get() + 1);
            async { Attempt::<(), _>::Fail("bad gateway") }
        })
        .await;

        assert_eq!(result, Err(RetryError::Fatal("bad gateway")));
        assert_eq!(calls.get(), 1);
        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_zero_attempts_runs_once() {
        let clock = clock();
        let calls = Cell::new(0);
        let policy = RetryPolicy::fixed(0, Duration::from_secs(2));
        let result = retry_with_policy(policy, &clock, || {
            calls.set(calls.get() + 1);
            async { Attempt::<(), _>::Retry("rate limited") }
        })
        .await;

        assert!(matches!(
            result,
            Err(RetryError::Exhausted { attempts: 1, .. })
        ));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_fixed_policy() {
        let policy = RetryPolicy::fixed(4, Duration::from_millis(100));
        assert_eq!(policy.max_attempts, 4);
        assert_eq!(policy.delay, Duration::from_millis(100));
    }
}
