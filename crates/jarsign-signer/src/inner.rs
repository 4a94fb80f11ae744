//! Signing of archives nested inside an artifact
//!
//! Only direct entries of the outer archive are considered. Each nested
//! archive goes through detection, the resigning strategy and the retrying
//! signer, but its own nested archives are never expanded. The outer
//! archive is rewritten into a scratch file once every nested archive has
//! been handled.

use crate::error::SigningFailure;
use crate::report::NestedFailure;
use crate::resign::ResigningStrategy;
use crate::retrying::RetryingSigner;
use jarsign_archive::{extract_nested, find_nested_archives, open_archive, replace_entries};
use jarsign_core::{DigestAlgorithm, NestingDepth, SigningConfig};
use std::collections::BTreeMap;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// What happened to the nested archives of one artifact
#[derive(Debug, Default)]
pub struct NestedOutcome {
    /// Rewritten copy of the outer archive, `None` when nothing changed
    pub rewritten: Option<NamedTempFile>,
    /// Nested archives kept unsigned under continue-on-fail
    pub failures: Vec<NestedFailure>,
}

/// Signs first-level nested archives and rewrites the outer archive
pub struct InnerArchiveProcessor {
    signer: RetryingSigner,
    strategy: ResigningStrategy,
    depth: NestingDepth,
    continue_on_fail: bool,
    digest: Option<DigestAlgorithm>,
}

impl InnerArchiveProcessor {
    pub fn new(signer: RetryingSigner, config: &SigningConfig) -> Self {
        Self {
            signer,
            strategy: ResigningStrategy::new(config.resigning()),
            depth: config.max_depth(),
            continue_on_fail: config.continue_on_fail(),
            digest: config.digest_algorithm(),
        }
    }

    /// Sign the nested archives of `outer`
    ///
    /// The rewritten copy of `outer` lands in `scratch`; `outer` itself is
    /// never modified. Without continue-on-fail the first nested failure
    /// aborts and no rewritten copy is produced. With it, the failure is
    /// returned in [`NestedOutcome::failures`].
    pub async fn process(
        &self,
        outer: &Path,
        scratch: &Path,
    ) -> Result<NestedOutcome, SigningFailure> {
        if self.depth == NestingDepth::Ignore {
            return Ok(NestedOutcome::default());
        }

        let mut archive = open_archive(outer)?;
        let candidates = find_nested_archives(&mut archive)?;
        if candidates.is_empty() {
            return Ok(NestedOutcome::default());
        }
        debug!(
            "Found {} nested archives in {}",
            candidates.len(),
            outer.display()
        );

        let mut replacements = BTreeMap::new();
        let mut failures = Vec::new();
        for entry in &candidates {
            let extracted = extract_nested(&mut archive, entry, scratch)?;
            let outcome = self
                .strategy
                .execute(
                    extracted.path(),
                    entry.file_name(),
                    &self.signer,
                    self.digest,
                    scratch,
                )
                .await;

            match outcome {
                Ok(Some(signed)) => {
                    info!("Signed nested archive {}", entry.name);
                    replacements.insert(entry.name.clone(), signed);
                }
                Ok(None) => debug!("Nested archive {} left unchanged", entry.name),
                Err(failure) if self.continue_on_fail => {
                    warn!(
                        "Failed to sign nested archive {}, keeping it unsigned: {}",
                        entry.name, failure
                    );
                    failures.push(NestedFailure {
                        entry: entry.name.clone(),
                        failure,
                    });
                }
                Err(failure) => return Err(failure),
            }
        }
        drop(archive);

        let rewritten = if replacements.is_empty() {
            None
        } else {
            Some(replace_entries(outer, replacements, scratch)?)
        };
        Ok(NestedOutcome {
            rewritten,
            failures,
        })
    }
}
