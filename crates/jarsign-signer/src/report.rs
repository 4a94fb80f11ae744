//! Per-artifact outcomes and batch verdicts

use crate::error::SigningFailure;
use jarsign_core::Artifact;
use std::path::PathBuf;

/// A nested archive that stayed unsigned under continue-on-fail
#[derive(Debug)]
pub struct NestedFailure {
    /// Entry name inside the outer archive, e.g. `lib/dep.jar`
    pub entry: String,
    pub failure: SigningFailure,
}

/// Outcome of signing one archive
#[derive(Debug)]
pub enum SigningResult {
    /// The archive at `path` is signed (or was left alone by the strategy)
    ///
    /// `inner_failures` lists nested archives that were kept unsigned.
    Success {
        path: PathBuf,
        inner_failures: Vec<NestedFailure>,
    },
    /// Signing failed
    Failure(SigningFailure),
}

impl SigningResult {
    /// True when the archive and every nested archive were signed
    pub fn is_success(&self) -> bool {
        match self {
            SigningResult::Success { inner_failures, .. } => inner_failures.is_empty(),
            SigningResult::Failure(_) => false,
        }
    }

    pub fn inner_failures(&self) -> &[NestedFailure] {
        match self {
            SigningResult::Success { inner_failures, .. } => inner_failures,
            SigningResult::Failure(_) => &[],
        }
    }

    pub fn failure(&self) -> Option<&SigningFailure> {
        match self {
            SigningResult::Failure(failure) => Some(failure),
            SigningResult::Success { .. } => None,
        }
    }
}

/// What happened to one enumerated artifact
#[derive(Debug)]
pub enum ArtifactStatus {
    /// Not an archive
    Skipped,
    Completed(SigningResult),
}

#[derive(Debug)]
pub struct ArtifactReport {
    pub artifact: Artifact,
    pub status: ArtifactStatus,
}

impl ArtifactReport {
    pub fn skipped(artifact: Artifact) -> Self {
        Self {
            artifact,
            status: ArtifactStatus::Skipped,
        }
    }

    pub fn completed(artifact: Artifact, result: SigningResult) -> Self {
        Self {
            artifact,
            status: ArtifactStatus::Completed(result),
        }
    }

    pub fn result(&self) -> Option<&SigningResult> {
        match &self.status {
            ArtifactStatus::Completed(result) => Some(result),
            ArtifactStatus::Skipped => None,
        }
    }
}

/// Overall outcome of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchVerdict {
    /// Every archive was signed or skipped
    AllSucceeded,
    /// Failures, nested ones included, were absorbed under continue-on-fail
    PartialFailure,
    /// A failure stopped the batch
    Aborted,
}

/// Reports for every artifact the batch reached, in order
#[derive(Debug)]
pub struct BatchResult {
    reports: Vec<ArtifactReport>,
    verdict: BatchVerdict,
}

impl BatchResult {
    pub fn new(reports: Vec<ArtifactReport>, verdict: BatchVerdict) -> Self {
        Self { reports, verdict }
    }

    pub fn reports(&self) -> &[ArtifactReport] {
        &self.reports
    }

    /// Signing results of processed archives, skipped artifacts excluded
    pub fn results(&self) -> impl Iterator<Item = &SigningResult> {
        self.reports.iter().filter_map(ArtifactReport::result)
    }

    pub fn verdict(&self) -> BatchVerdict {
        self.verdict
    }

    /// True only when nothing failed
    pub fn is_success(&self) -> bool {
        self.verdict == BatchVerdict::AllSucceeded
    }

    /// The failure that aborted the batch
    pub fn terminal_error(&self) -> Option<&SigningFailure> {
        if self.verdict != BatchVerdict::Aborted {
            return None;
        }
        self.results().last().and_then(SigningResult::failure)
    }

    /// Archives that failed or kept a nested archive unsigned
    pub fn failure_count(&self) -> usize {
        self.results().filter(|r| !r.is_success()).count()
    }

    pub fn success_count(&self) -> usize {
        self.results().filter(|r| r.is_success()).count()
    }

    /// Nested archives kept unsigned across the batch
    pub fn nested_failure_count(&self) -> usize {
        self.results().map(|r| r.inner_failures().len()).sum()
    }

    pub fn skipped_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.status, ArtifactStatus::Skipped))
            .count()
    }
}
