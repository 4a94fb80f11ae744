//! Batch signing driver
//!
//! Artifacts are processed one after the other. For each archive the
//! pipeline is: already-signed check, resigning strategy, nested archives,
//! then the archive itself. The signed archive is written to a scratch file
//! next to the artifact and renamed over it only once signing succeeded, so
//! a failure never leaves a partially rewritten artifact behind. Scratch
//! files are removed on every exit path.

use crate::error::SigningFailure;
use crate::inner::InnerArchiveProcessor;
use crate::primitive::SigningPrimitive;
use crate::report::{ArtifactReport, BatchResult, BatchVerdict, NestedFailure, SigningResult};
use crate::resign::ResigningStrategy;
use crate::retrying::RetryingSigner;
use jarsign_archive::is_signed;
use jarsign_core::{Artifact, SigningConfig};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Signs a sequence of artifacts under one configuration
pub struct SigningOrchestrator {
    config: SigningConfig,
    signer: RetryingSigner,
    strategy: ResigningStrategy,
    inner: InnerArchiveProcessor,
}

impl SigningOrchestrator {
    /// Create an orchestrator retrying `primitive` as configured
    pub fn new(primitive: Arc<dyn SigningPrimitive>, config: SigningConfig) -> Self {
        let signer = RetryingSigner::new(primitive, config.retry_policy());
        Self::with_signer(signer, config)
    }

    /// Create an orchestrator around an existing retrying signer
    pub fn with_signer(signer: RetryingSigner, config: SigningConfig) -> Self {
        Self {
            strategy: ResigningStrategy::new(config.resigning()),
            inner: InnerArchiveProcessor::new(signer.clone(), &config),
            signer,
            config,
        }
    }

    pub fn config(&self) -> &SigningConfig {
        &self.config
    }

    /// Sign every archive in `artifacts`
    pub async fn run(&self, artifacts: &[Artifact]) -> BatchResult {
        let mut reports = Vec::with_capacity(artifacts.len());
        let mut absorbed_failure = false;

        for artifact in artifacts {
            if !artifact.is_archive() {
                info!("Skipping {}: not a jar archive", artifact);
                reports.push(ArtifactReport::skipped(artifact.clone()));
                continue;
            }

            info!("Signing {}", artifact);
            match self.sign_artifact(artifact).await {
                Ok((path, inner_failures)) => {
                    if inner_failures.is_empty() {
                        info!("Signed {}", path.display());
                    } else {
                        warn!(
                            "Signed {} with {} nested archives left unsigned",
                            path.display(),
                            inner_failures.len()
                        );
                        absorbed_failure = true;
                    }
                    reports.push(ArtifactReport::completed(
                        artifact.clone(),
                        SigningResult::Success {
                            path,
                            inner_failures,
                        },
                    ));
                }
                Err(failure) => {
                    let continuing = self.config.continue_on_fail();
                    if continuing {
                        warn!("Failed to sign {}: {}", artifact, failure);
                    } else {
                        error!("Failed to sign {}: {}", artifact, failure);
                    }
                    reports.push(ArtifactReport::completed(
                        artifact.clone(),
                        SigningResult::Failure(failure),
                    ));
                    if !continuing {
                        return BatchResult::new(reports, BatchVerdict::Aborted);
                    }
                    absorbed_failure = true;
                }
            }
        }

        let verdict = if absorbed_failure {
            BatchVerdict::PartialFailure
        } else {
            BatchVerdict::AllSucceeded
        };
        BatchResult::new(reports, verdict)
    }

    /// Run the full pipeline for one archive
    ///
    /// On success the artifact has been replaced by its signed version.
    /// Nested archives kept unsigned under continue-on-fail are returned
    /// alongside the path.
    pub async fn sign_artifact(
        &self,
        artifact: &Artifact,
    ) -> Result<(PathBuf, Vec<NestedFailure>), SigningFailure> {
        let path = artifact.path();
        let scratch = tempfile::Builder::new()
            .prefix(".jarsign-")
            .tempdir_in(parent_dir(path))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| artifact.to_string());

        let already_signed = is_signed(path)?;
        let prepared = self.strategy.prepare(path, already_signed, scratch.path())?;
        let Some(source) = prepared.source(path) else {
            return Ok((path.to_path_buf(), Vec::new()));
        };

        let nested = self.inner.process(source, scratch.path()).await?;
        let to_sign = nested.rewritten.as_ref().map_or(source, |f| f.path());

        let signed = self
            .signer
            .sign_file(to_sign, &file_name, self.config.digest_algorithm())
            .await?;

        replace_file(path, &signed, scratch.path())?;
        Ok((path.to_path_buf(), nested.failures))
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Atomically replace `path` with `content`, keeping its permissions
fn replace_file(path: &Path, content: &[u8], scratch: &Path) -> std::io::Result<()> {
    let permissions = fs::metadata(path)?.permissions();
    let mut output = tempfile::NamedTempFile::new_in(scratch)?;
    output.write_all(content)?;
    output.as_file().sync_all()?;
    fs::set_permissions(output.path(), permissions)?;
    output.persist(path).map_err(|e| e.error)?;
    Ok(())
}
