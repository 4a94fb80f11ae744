//! Scripted signing primitive

use super::fixtures::{entries, fake_sign, jar_id};
use async_trait::async_trait;
use jarsign_core::DigestAlgorithm;
use jarsign_signer::{SigningError, SigningPrimitive};
use std::collections::HashMap;
use std::sync::Mutex;

/// Alias used by the fake signature
pub const FAKE_ALIAS: &str = "FAKE";

/// One recorded call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignCall {
    pub id: String,
    pub file_name: String,
    pub digest: Option<DigestAlgorithm>,
    /// Whether the input still carried a `.SF` file
    pub had_signature: bool,
}

/// Signs fixtures with a fake signature, failing on demand
///
/// Failures are keyed by fixture id: a count of transient failures to
/// produce before succeeding, or `u32::MAX` to fail forever.
#[derive(Default)]
pub struct FakeSigner {
    calls: Mutex<Vec<SignCall>>,
    failures: Mutex<HashMap<String, u32>>,
}

impl FakeSigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every call for fixture `id`
    pub fn failing_forever(self, id: &str) -> Self {
        self.failing_times(id, u32::MAX)
    }

    /// Fail the first `times` calls for fixture `id`
    pub fn failing_times(self, id: &str, times: u32) -> Self {
        self.failures.lock().unwrap().insert(id.to_string(), times);
        self
    }

    pub fn calls(&self) -> Vec<SignCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Ids of signed fixtures in call order
    pub fn ids(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.id).collect()
    }

    pub fn calls_for(&self, id: &str) -> usize {
        self.calls().iter().filter(|c| c.id == id).count()
    }
}

#[async_trait]
impl SigningPrimitive for FakeSigner {
    async fn sign(
        &self,
        unsigned: Vec<u8>,
        file_name: &str,
        digest: Option<DigestAlgorithm>,
    ) -> Result<Vec<u8>, SigningError> {
        let id = jar_id(&unsigned);
        let had_signature = entries(&unsigned)
            .iter()
            .any(|(name, _)| name.to_ascii_uppercase().ends_with(".SF"));
        self.calls.lock().unwrap().push(SignCall {
            id: id.clone(),
            file_name: file_name.to_string(),
            digest,
            had_signature,
        });

        {
            let mut failures = self.failures.lock().unwrap();
            if let Some(remaining) = failures.get_mut(&id) {
                if *remaining > 0 {
                    if *remaining != u32::MAX {
                        *remaining -= 1;
                    }
                    return Err(SigningError::transient_with_diagnostic(
                        format!("signing service rejected {}", id),
                        "HTTP 503 Service Unavailable",
                    ));
                }
            }
        }

        Ok(fake_sign(&unsigned, FAKE_ALIAS))
    }

    fn describe(&self) -> String {
        "fake signer".to_string()
    }
}
