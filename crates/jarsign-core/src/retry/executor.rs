//! Retry execution engine
//!
//! Drives a fallible async operation until it succeeds, the policy runs out
//! of retries, or the predicate rejects an error.

use std::error::Error;
use std::future::Future;
use std::time::Instant;

use super::error::RetryError;
use super::observer::{NoOpObserver, RetryObserver};
use super::policy::{AlwaysRetry, RetryPolicy, RetryPredicate};

/// Assembles a [`RetryExecutor`]
///
/// A fresh builder makes a single attempt and reports nothing.
///
/// # Example
///
/// ```rust
/// use jarsign_core::retry::{RetryExecutorBuilder, RetryPolicy, TracingObserver};
/// use std::time::Duration;
///
/// let executor = RetryExecutorBuilder::new()
///     .with_policy(RetryPolicy::new(3, Duration::from_secs(30)))
///     .with_observer(TracingObserver::new("sign"))
///     .build();
/// ```
pub struct RetryExecutorBuilder<P = AlwaysRetry, O = NoOpObserver> {
    policy: RetryPolicy,
    predicate: P,
    observer: O,
}

impl Default for RetryExecutorBuilder<AlwaysRetry, NoOpObserver> {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryExecutorBuilder<AlwaysRetry, NoOpObserver> {
    /// Create a new builder that makes a single attempt
    pub fn new() -> Self {
        Self {
            policy: RetryPolicy::no_retry(),
            predicate: AlwaysRetry,
            observer: NoOpObserver,
        }
    }
}

impl<P, O> RetryExecutorBuilder<P, O> {
    /// Set the retry policy
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Decide which errors are worth another attempt
    pub fn with_predicate<P2>(self, predicate: P2) -> RetryExecutorBuilder<P2, O> {
        RetryExecutorBuilder {
            policy: self.policy,
            predicate,
            observer: self.observer,
        }
    }

    /// Report attempts to `observer`
    pub fn with_observer<O2>(self, observer: O2) -> RetryExecutorBuilder<P, O2> {
        RetryExecutorBuilder {
            policy: self.policy,
            predicate: self.predicate,
            observer,
        }
    }

    /// Build the executor
    pub fn build(self) -> RetryExecutor<P, O> {
        RetryExecutor {
            policy: self.policy,
            predicate: self.predicate,
            observer: self.observer,
        }
    }
}

/// Runs an operation under a [`RetryPolicy`]
pub struct RetryExecutor<P, O> {
    policy: RetryPolicy,
    predicate: P,
    observer: O,
}

/// Attempt bookkeeping for one `execute` call
struct RetryState {
    attempts_made: u32,
    started: Instant,
}

impl RetryState {
    fn begin() -> Self {
        Self {
            attempts_made: 0,
            started: Instant::now(),
        }
    }

    fn next_attempt(&mut self) -> u32 {
        self.attempts_made = self.attempts_made.saturating_add(1);
        self.attempts_made
    }
}

impl<P, O> RetryExecutor<P, O>
where
    O: RetryObserver,
{
    /// The policy this executor follows
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `op` until it succeeds or no attempt is left
    ///
    /// The first attempt starts immediately. After a failed attempt the
    /// configured wait elapses before the next one; there is no wait after
    /// the final attempt.
    pub async fn execute<F, Fut, T, E>(&self, mut op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Error + Send + 'static,
        P: RetryPredicate<E>,
    {
        let mut state = RetryState::begin();

        loop {
            let attempt = state.next_attempt();
            self.observer
                .on_attempt_start(attempt, self.policy.max_attempts());

            let err = match op().await {
                Ok(result) => {
                    self.observer.on_success(attempt, state.started.elapsed());
                    return Ok(result);
                }
                Err(err) => err,
            };

            if !self.predicate.should_retry(&err) {
                self.observer.on_non_retryable(attempt, &err);
                return Err(RetryError::non_retryable(attempt, err));
            }

            if !self.policy.should_retry(attempt) {
                let elapsed = state.started.elapsed();
                self.observer.on_exhausted(attempt, &err, elapsed);
                return Err(RetryError::exhausted(attempt, err, elapsed));
            }

            let delay = self.policy.wait_before(attempt.saturating_add(1));
            self.observer
                .on_attempt_failed(attempt, &err, state.started.elapsed(), delay);

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }
}
