//! Handling of archives that are already signed

use crate::error::{SigningError, SigningFailure};
use crate::retrying::RetryingSigner;
use jarsign_archive::{is_signed, strip_signatures, StrippedArchive};
use jarsign_core::{DigestAlgorithm, ResigningMode};
use std::path::Path;
use tracing::info;

/// What to sign after the strategy has looked at an archive
#[derive(Debug)]
pub enum Prepared {
    /// Leave the archive as it is and report success
    Unchanged,
    /// Sign the archive itself
    Sign,
    /// Sign this copy with the previous signature removed
    SignCopy(StrippedArchive),
}

impl Prepared {
    /// File to hand to the signer, or `None` when nothing is signed
    pub fn source<'a>(&'a self, archive: &'a Path) -> Option<&'a Path> {
        match self {
            Prepared::Unchanged => None,
            Prepared::Sign => Some(archive),
            Prepared::SignCopy(stripped) => Some(stripped.file.path()),
        }
    }
}

/// Applies the configured [`ResigningMode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResigningStrategy {
    mode: ResigningMode,
}

impl ResigningStrategy {
    pub fn new(mode: ResigningMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ResigningMode {
        self.mode
    }

    /// Decide what to do with `archive`
    ///
    /// Unsigned archives are always signed. Stripped copies are created in
    /// `scratch`.
    pub fn prepare(
        &self,
        archive: &Path,
        already_signed: bool,
        scratch: &Path,
    ) -> Result<Prepared, SigningFailure> {
        if !already_signed {
            return Ok(Prepared::Sign);
        }

        match self.mode {
            ResigningMode::Resign => {
                info!("{} is already signed, signing it again", archive.display());
                Ok(Prepared::Sign)
            }
            ResigningMode::Reject => Err(SigningError::already_signed(archive).into()),
            ResigningMode::Ignore => {
                info!("{} is already signed, leaving it unchanged", archive.display());
                Ok(Prepared::Unchanged)
            }
            ResigningMode::Overwrite => {
                let stripped = strip_signatures(archive, scratch)?;
                info!(
                    "{} is already signed, removed {} signature entries before signing",
                    archive.display(),
                    stripped.removed.len()
                );
                Ok(Prepared::SignCopy(stripped))
            }
        }
    }

    /// Detect, apply the strategy and sign
    ///
    /// Returns the signed bytes, or `None` when the archive is left as is.
    pub async fn execute(
        &self,
        archive: &Path,
        file_name: &str,
        signer: &RetryingSigner,
        digest: Option<DigestAlgorithm>,
        scratch: &Path,
    ) -> Result<Option<Vec<u8>>, SigningFailure> {
        let already_signed = is_signed(archive)?;
        let prepared = self.prepare(archive, already_signed, scratch)?;
        match prepared.source(archive) {
            Some(source) => signer.sign_file(source, file_name, digest).await.map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn signed_jar(path: &Path) {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, content) in [
            (
                "META-INF/MANIFEST.MF",
                "Manifest-Version: 1.0\r\n\r\nName: A.class\r\nSHA-256-Digest: AA\r\n\r\n",
            ),
            (
                "META-INF/K.SF",
                "Signature-Version: 1.0\r\n\r\nName: A.class\r\nSHA-256-Digest: BB\r\n\r\n",
            ),
            ("META-INF/K.RSA", "block"),
            ("A.class", "code"),
        ] {
            writer.start_file(name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        std::fs::write(path, writer.finish().unwrap().into_inner()).unwrap();
    }

    #[test]
    fn test_unsigned_archives_are_always_signed() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("a.jar");
        for mode in [
            ResigningMode::Resign,
            ResigningMode::Reject,
            ResigningMode::Ignore,
            ResigningMode::Overwrite,
        ] {
            let prepared = ResigningStrategy::new(mode)
                .prepare(&archive, false, dir.path())
                .unwrap();
            assert!(matches!(prepared, Prepared::Sign), "{:?}", mode);
        }
    }

    #[test]
    fn test_reject_fails_without_signing() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("a.jar");
        let failure = ResigningStrategy::new(ResigningMode::Reject)
            .prepare(&archive, true, dir.path())
            .unwrap_err();
        assert!(matches!(failure.cause, SigningError::AlreadySigned { .. }));
        assert!(!failure.retries_exhausted);
    }

    #[test]
    fn test_ignore_leaves_archive_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("a.jar");
        let prepared = ResigningStrategy::new(ResigningMode::Ignore)
            .prepare(&archive, true, dir.path())
            .unwrap();
        assert!(prepared.source(&archive).is_none());
    }

    #[test]
    fn test_resign_signs_archive_itself() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("a.jar");
        let prepared = ResigningStrategy::new(ResigningMode::Resign)
            .prepare(&archive, true, dir.path())
            .unwrap();
        assert_eq!(prepared.source(&archive), Some(archive.as_path()));
    }

    #[test]
    fn test_overwrite_signs_stripped_copy() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("a.jar");
        signed_jar(&archive);

        let prepared = ResigningStrategy::new(ResigningMode::Overwrite)
            .prepare(&archive, true, dir.path())
            .unwrap();
        let source = prepared.source(&archive).unwrap();

        assert_ne!(source, archive.as_path());
        assert!(!is_signed(source).unwrap());
        assert!(is_signed(&archive).unwrap());
    }
}
