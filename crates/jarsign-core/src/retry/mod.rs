//! Retry execution engine with a fixed-wait policy
//!
//! Signing calls go to a slow, rate-limited service, so every retry waits
//! the same configured interval.
//!
//! A [`RetryPolicy`] caps the attempts, a [`RetryPredicate`] stops early on
//! errors that retrying cannot fix, and every attempt is reported to a
//! [`RetryObserver`].
//!
//! # Example
//!
//! ```rust,no_run
//! use jarsign_core::retry::{RetryError, RetryExecutorBuilder, RetryPolicy, TracingObserver};
//! use std::time::Duration;
//!
//! async fn example() -> Result<Vec<u8>, RetryError<std::io::Error>> {
//!     RetryExecutorBuilder::new()
//!         .with_policy(RetryPolicy::new(3, Duration::from_secs(30)))
//!         .with_observer(TracingObserver::new("sign app.jar"))
//!         .build()
//!         .execute(|| async { Ok(b"signed".to_vec()) })
//!         .await
//! }
//! ```

mod error;
mod executor;
mod observer;
mod policy;

pub use error::RetryError;
pub use executor::{RetryExecutor, RetryExecutorBuilder};
pub use observer::{NoOpObserver, RetryObserver, StatsObserver, TracingObserver};
pub use policy::{AlwaysRetry, ClosurePredicate, NeverRetry, RetryPolicy, RetryPredicate};
