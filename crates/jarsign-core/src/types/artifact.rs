//! Build artifacts submitted for signing

use std::fmt;
use std::path::{Path, PathBuf};

/// File extension identifying signable archives
pub const ARCHIVE_EXTENSION: &str = "jar";

/// Whether an artifact is an archive the signing pipeline accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// A JAR archive
    Archive,
    /// Any other build output; never signed
    Other,
}

/// A single build output to sign
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    path: PathBuf,
    kind: ArtifactKind,
}

impl Artifact {
    /// Create an artifact, classifying it by file extension
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let kind = if has_archive_extension(&path) {
            ArtifactKind::Archive
        } else {
            ArtifactKind::Other
        };
        Self { path, kind }
    }

    /// Create an artifact with an explicit kind
    pub fn with_kind(path: impl Into<PathBuf>, kind: ArtifactKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Location of the artifact file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Classification of the artifact
    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    /// Whether the artifact goes through the signing pipeline
    pub fn is_archive(&self) -> bool {
        self.kind == ArtifactKind::Archive
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Check whether a path or entry name ends with `.jar` (case-insensitive)
pub fn has_archive_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(ARCHIVE_EXTENSION))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jar_is_archive() {
        let artifact = Artifact::new("target/bundle-1.0.jar");
        assert_eq!(artifact.kind(), ArtifactKind::Archive);
        assert!(artifact.is_archive());
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert!(Artifact::new("target/BUNDLE.JAR").is_archive());
    }

    #[test]
    fn test_other_outputs_are_not_archives() {
        assert_eq!(Artifact::new("target/bundle.pom").kind(), ArtifactKind::Other);
        assert_eq!(Artifact::new("target/site.zip").kind(), ArtifactKind::Other);
        assert_eq!(Artifact::new("target/jar").kind(), ArtifactKind::Other);
    }

    #[test]
    fn test_explicit_kind() {
        let artifact = Artifact::with_kind("target/app.war", ArtifactKind::Archive);
        assert!(artifact.is_archive());
        assert_eq!(artifact.to_string(), "target/app.war");
    }
}
