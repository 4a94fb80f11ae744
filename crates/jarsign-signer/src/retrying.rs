//! Signing with retries
//!
//! Only transient errors are retried. The first attempt starts immediately
//! and the configured wait elapses between failed attempts; the last error
//! is the one reported.

use crate::error::{SigningError, SigningFailure};
use crate::primitive::SigningPrimitive;
use jarsign_core::retry::{
    ClosurePredicate, RetryExecutorBuilder, RetryObserver, RetryPolicy, TracingObserver,
};
use jarsign_core::DigestAlgorithm;
use std::path::Path;
use std::sync::Arc;
use tracing::Instrument;

/// A signing primitive driven by a retry policy
#[derive(Clone)]
pub struct RetryingSigner {
    primitive: Arc<dyn SigningPrimitive>,
    policy: RetryPolicy,
    observer: Arc<dyn RetryObserver>,
}

impl RetryingSigner {
    /// Wrap `primitive`, logging attempts through `tracing`
    pub fn new(primitive: Arc<dyn SigningPrimitive>, policy: RetryPolicy) -> Self {
        Self {
            primitive,
            policy,
            observer: Arc::new(TracingObserver::default()),
        }
    }

    /// Report attempts to `observer` instead
    pub fn with_observer(mut self, observer: Arc<dyn RetryObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn primitive(&self) -> &Arc<dyn SigningPrimitive> {
        &self.primitive
    }

    /// Sign archive bytes
    pub async fn sign(
        &self,
        unsigned: &[u8],
        file_name: &str,
        digest: Option<DigestAlgorithm>,
    ) -> Result<Vec<u8>, SigningFailure> {
        let executor = RetryExecutorBuilder::new()
            .with_policy(self.policy)
            .with_predicate(ClosurePredicate::new(SigningError::is_transient))
            .with_observer(self.observer.clone())
            .build();

        let span = tracing::debug_span!("sign", file = file_name);
        executor
            .execute(|| self.primitive.sign(unsigned.to_vec(), file_name, digest))
            .instrument(span)
            .await
            .map_err(SigningFailure::from)
    }

    /// Sign the archive at `path` and return the signed bytes
    ///
    /// The file itself is left untouched.
    pub async fn sign_file(
        &self,
        path: &Path,
        file_name: &str,
        digest: Option<DigestAlgorithm>,
    ) -> Result<Vec<u8>, SigningFailure> {
        let unsigned = tokio::fs::read(path).await?;
        self.sign(&unsigned, file_name, digest).await
    }
}
