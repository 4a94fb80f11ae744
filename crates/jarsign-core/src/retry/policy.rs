//! Retry policy and predicates
//!
//! The policy is a pure decision: given how many attempts have been made,
//! may another one be started, and how long to wait before it. Every retry
//! waits the same configured interval; there is no backoff growth and no
//! jitter.

use std::time::Duration;

/// Fixed-wait retry policy
///
/// Attempt indices are 1-based. The first call is attempt 1 and is not a
/// retry, so a policy with a limit of `n` allows at most `n + 1` attempts.
///
/// # Example
///
/// ```rust
/// use jarsign_core::retry::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new(2, Duration::from_secs(30));
///
/// assert!(policy.should_retry(1));
/// assert!(policy.should_retry(2));
/// assert!(!policy.should_retry(3));
/// assert_eq!(policy.max_attempts(), 3);
/// assert_eq!(policy.wait_before(2), Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    retry_limit: u32,
    wait: Duration,
}

impl RetryPolicy {
    /// Create a policy allowing `retry_limit` retries, `wait` apart
    pub fn new(retry_limit: u32, wait: Duration) -> Self {
        Self { retry_limit, wait }
    }

    /// A policy that makes exactly one attempt
    pub fn no_retry() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Number of retries allowed after the first attempt
    pub fn retry_limit(&self) -> u32 {
        self.retry_limit
    }

    /// Configured wait between attempts
    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Upper bound on the number of attempts
    pub fn max_attempts(&self) -> u32 {
        self.retry_limit.saturating_add(1)
    }

    /// Whether another attempt may follow the failed attempt `attempt`
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts()
    }

    /// Delay to observe before starting attempt `next_attempt`
    ///
    /// The first attempt never waits.
    pub fn wait_before(&self, next_attempt: u32) -> Duration {
        if next_attempt <= 1 {
            Duration::ZERO
        } else {
            self.wait
        }
    }
}

/// A predicate that determines whether an error should be retried
///
/// Errors rejected by the predicate end the retry loop immediately, no
/// matter how many attempts remain.
pub trait RetryPredicate<E: ?Sized>: Send + Sync {
    /// Determine whether the given error should be retried
    fn should_retry(&self, error: &E) -> bool;
}

/// A predicate that always returns true (all errors are retryable)
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysRetry;

impl<E: ?Sized> RetryPredicate<E> for AlwaysRetry {
    fn should_retry(&self, _error: &E) -> bool {
        true
    }
}

/// A predicate that never retries (no errors are retryable)
#[derive(Debug, Clone, Copy)]
pub struct NeverRetry;

impl<E: ?Sized> RetryPredicate<E> for NeverRetry {
    fn should_retry(&self, _error: &E) -> bool {
        false
    }
}

/// A predicate that uses a closure to determine retryability
pub struct ClosurePredicate<F> {
    predicate: F,
}

impl<F> ClosurePredicate<F> {
    /// Create a new closure-based predicate
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<E, F> RetryPredicate<E> for ClosurePredicate<F>
where
    F: Fn(&E) -> bool + Send + Sync,
{
    fn should_retry(&self, error: &E) -> bool {
        (self.predicate)(error)
    }
}
