//! Retry observation and logging
//!
//! [`RetryObserver`] is the port every signing attempt is reported through.
//! [`TracingObserver`] turns the events into log lines.

use std::error::Error;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Receives attempt events from a [`crate::retry::RetryExecutor`]
///
/// Each callback receives the 1-based attempt index. Elapsed times are
/// measured from the start of the first attempt.
pub trait RetryObserver: Send + Sync {
    /// An attempt is about to start
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32);

    /// An attempt failed and another one follows after `delay`
    fn on_attempt_failed(&self, attempt: u32, error: &dyn Error, elapsed: Duration, delay: Duration);

    /// The operation succeeded
    fn on_success(&self, attempt: u32, elapsed: Duration);

    /// The last allowed attempt failed
    fn on_exhausted(&self, attempts: u32, final_error: &dyn Error, elapsed: Duration);

    /// The predicate rejected an error
    fn on_non_retryable(&self, attempt: u32, error: &dyn Error) {
        let _ = (attempt, error);
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl RetryObserver for NoOpObserver {
    fn on_attempt_start(&self, _attempt: u32, _max_attempts: u32) {}

    fn on_attempt_failed(
        &self,
        _attempt: u32,
        _error: &dyn Error,
        _elapsed: Duration,
        _delay: Duration,
    ) {
    }

    fn on_success(&self, _attempt: u32, _elapsed: Duration) {}

    fn on_exhausted(&self, _attempts: u32, _final_error: &dyn Error, _elapsed: Duration) {}
}

/// Logs attempt events through `tracing`
///
/// # Log Levels
///
/// - `on_attempt_start`: DEBUG
/// - `on_attempt_failed`: WARN
/// - `on_success`: INFO (if > 1 attempt) or DEBUG (first attempt)
/// - `on_exhausted`: ERROR
/// - `on_non_retryable`: WARN
#[derive(Debug, Clone)]
pub struct TracingObserver {
    /// Logged with every event, e.g. `sign app.jar`
    operation: String,
}

impl TracingObserver {
    /// Create a new tracing observer for the named operation
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new("sign")
    }
}

impl RetryObserver for TracingObserver {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        tracing::debug!(
            operation = %self.operation,
            attempt = attempt,
            max_attempts = max_attempts,
            "starting attempt"
        );
    }

    fn on_attempt_failed(&self, attempt: u32, error: &dyn Error, elapsed: Duration, delay: Duration) {
        tracing::warn!(
            operation = %self.operation,
            attempt = attempt,
            error = %error,
            elapsed_ms = elapsed.as_millis() as u64,
            delay_ms = delay.as_millis() as u64,
            "attempt failed, will retry"
        );
    }

    fn on_success(&self, attempt: u32, elapsed: Duration) {
        if attempt > 1 {
            tracing::info!(
                operation = %self.operation,
                attempt = attempt,
                elapsed_ms = elapsed.as_millis() as u64,
                "succeeded after retry"
            );
        } else {
            tracing::debug!(
                operation = %self.operation,
                elapsed_ms = elapsed.as_millis() as u64,
                "succeeded on first attempt"
            );
        }
    }

    fn on_exhausted(&self, attempts: u32, final_error: &dyn Error, elapsed: Duration) {
        tracing::error!(
            operation = %self.operation,
            attempts = attempts,
            error = %final_error,
            elapsed_ms = elapsed.as_millis() as u64,
            "all retry attempts exhausted"
        );
    }

    fn on_non_retryable(&self, attempt: u32, error: &dyn Error) {
        tracing::warn!(
            operation = %self.operation,
            attempt = attempt,
            error = %error,
            "giving up on non-retryable error"
        );
    }
}

/// Counts attempt events
#[derive(Debug, Default)]
pub struct StatsObserver {
    attempt_starts: AtomicU32,
    failures: AtomicU32,
    successes: AtomicU32,
    exhaustions: AtomicU32,
    rejections: AtomicU32,
}

impl StatsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempt_starts(&self) -> u32 {
        self.attempt_starts.load(Ordering::SeqCst)
    }

    /// Failed attempts that were followed by another one
    pub fn failures(&self) -> u32 {
        self.failures.load(Ordering::SeqCst)
    }

    pub fn successes(&self) -> u32 {
        self.successes.load(Ordering::SeqCst)
    }

    pub fn exhaustions(&self) -> u32 {
        self.exhaustions.load(Ordering::SeqCst)
    }

    /// Errors rejected by the predicate
    pub fn rejections(&self) -> u32 {
        self.rejections.load(Ordering::SeqCst)
    }
}

impl RetryObserver for StatsObserver {
    fn on_attempt_start(&self, _attempt: u32, _max_attempts: u32) {
        self.attempt_starts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_attempt_failed(
        &self,
        _attempt: u32,
        _error: &dyn Error,
        _elapsed: Duration,
        _delay: Duration,
    ) {
        self.failures.fetch_add(1, Ordering::SeqCst);
    }

    fn on_success(&self, _attempt: u32, _elapsed: Duration) {
        self.successes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_exhausted(&self, _attempts: u32, _final_error: &dyn Error, _elapsed: Duration) {
        self.exhaustions.fetch_add(1, Ordering::SeqCst);
    }

    fn on_non_retryable(&self, _attempt: u32, _error: &dyn Error) {
        self.rejections.fetch_add(1, Ordering::SeqCst);
    }
}

impl<T: RetryObserver + ?Sized> RetryObserver for std::sync::Arc<T> {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        (**self).on_attempt_start(attempt, max_attempts)
    }

    fn on_attempt_failed(&self, attempt: u32, error: &dyn Error, elapsed: Duration, delay: Duration) {
        (**self).on_attempt_failed(attempt, error, elapsed, delay)
    }

    fn on_success(&self, attempt: u32, elapsed: Duration) {
        (**self).on_success(attempt, elapsed)
    }

    fn on_exhausted(&self, attempts: u32, final_error: &dyn Error, elapsed: Duration) {
        (**self).on_exhausted(attempts, final_error, elapsed)
    }

    fn on_non_retryable(&self, attempt: u32, error: &dyn Error) {
        (**self).on_non_retryable(attempt, error)
    }
}
