use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backoff {
    /// Same delay before every retry
    Fixed,
    /// Delay grows with the attempt number: `base * attempt`
    Linear,
}

/// How often and how patiently a failed operation is retried.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Retry attempts after the first run (total runs = 1 + max_retries)
    pub max_retries: usize,
    pub base_delay: Duration,
    pub backoff: Backoff,
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based).
    pub fn delay_for(&self, attempt: usize) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.base_delay,
            Backoff::Linear => self.base_delay * attempt as u32,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_secs(5),
            backoff: Backoff::Linear,
        }
    }
}

/// Retries an async operation according to `policy`
///
/// `on_failure` is called with the attempt number and error of every failed
/// run, including the last one.
///
/// # Returns
/// Either the successful result or the error of the final attempt
pub async fn with_retry<F, Fut, T, E>(
    mut operation: F,
    policy: &RetryPolicy,
    mut on_failure: impl FnMut(usize, &E),
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(err) => {
                on_failure(attempt, &err);
                if attempt > policy.max_retries {
                    return Err(err);
                }
                let delay = policy.delay_for(attempt);
                debug!(
                    "Attempt {}/{} failed: {}. Retrying in {:?}...",
                    attempt,
                    policy.max_retries + 1,
                    err,
                    delay
                );
                attempt += 1;
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast_policy(max_retries: usize) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::from_millis(1),
            backoff: Backoff::Linear,
        }
    }

    #[test]
    fn test_linear_and_fixed_delays() {
        let linear = RetryPolicy::default();
        assert_eq!(linear.delay_for(1), Duration::from_secs(5));
        assert_eq!(linear.delay_for(3), Duration::from_secs(15));

        let fixed = RetryPolicy {
            backoff: Backoff::Fixed,
            ..linear
        };
        assert_eq!(fixed.delay_for(3), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_succeeds_after_failures() {
        let calls = AtomicUsize::new(0);
        let mut failures = Vec::new();
        let result: Result<&str, String> = with_retry(
            || async {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 { Err(format!("fail {n}")) } else { Ok("ok") }
            },
            &fast_policy(3),
            |attempt, _| failures.push(attempt),
        )
        .await;

        assert_eq!(result, Ok("ok"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(failures, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), String> = with_retry(
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("down".to_string())
            },
            &fast_policy(2),
            |_, _| {},
        )
        .await;

        assert_eq!(result, Err("down".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_no_retry_policy_runs_once() {
        let calls = AtomicUsize::new(0);
        let _: Result<(), String> = with_retry(
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("down".to_string())
            },
            &RetryPolicy {
                max_retries: 0,
                ..RetryPolicy::default()
            },
            |_, _| {},
        )
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
