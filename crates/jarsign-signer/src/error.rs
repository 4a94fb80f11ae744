//! Error types for jarsign-signer

use jarsign_archive::ArchiveError;
use jarsign_core::retry::RetryError;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for a single signing step
pub type Result<T> = std::result::Result<T, SigningError>;

/// Failures of a single signing step
#[derive(Error, Debug)]
pub enum SigningError {
    /// Network or process failure, including timeouts. Retryable.
    #[error("{message}")]
    Transient {
        message: String,
        /// Raw output of the signing service or command
        diagnostic: Option<String>,
    },

    /// The archive is already signed and the strategy rejects it
    #[error("Archive is already signed: {}", path.display())]
    AlreadySigned { path: PathBuf },

    /// The archive is unreadable or corrupt
    #[error(transparent)]
    ArchiveFormat(#[from] ArchiveError),

    /// Local IO error outside the archive format
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The signing endpoint configuration is unusable
    #[error(transparent)]
    Config(#[from] jarsign_core::Error),
}

impl SigningError {
    /// Create a transient error without diagnostic output
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient {
            message: message.into(),
            diagnostic: None,
        }
    }

    /// Create a transient error carrying the raw diagnostic output
    pub fn transient_with_diagnostic(message: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self::Transient {
            message: message.into(),
            diagnostic: Some(diagnostic.into()),
        }
    }

    /// Create an already-signed error
    pub fn already_signed(path: impl Into<PathBuf>) -> Self {
        Self::AlreadySigned { path: path.into() }
    }

    /// Whether retrying may fix this error
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    /// Raw output of the signing service or command, if any
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::Transient { diagnostic, .. } => diagnostic.as_deref(),
            _ => None,
        }
    }
}

/// Final failure of an artifact or nested archive
#[derive(Debug)]
pub struct SigningFailure {
    pub cause: SigningError,
    /// True when every allowed attempt failed with a transient error
    pub retries_exhausted: bool,
    /// Calls made to the signing primitive
    pub attempts: u32,
}

impl SigningFailure {
    pub fn new(cause: SigningError) -> Self {
        Self {
            cause,
            retries_exhausted: false,
            attempts: 0,
        }
    }
}

impl fmt::Display for SigningFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.retries_exhausted {
            write!(f, "{} (gave up after {} attempts)", self.cause, self.attempts)
        } else {
            write!(f, "{}", self.cause)
        }
    }
}

impl std::error::Error for SigningFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

impl From<SigningError> for SigningFailure {
    fn from(cause: SigningError) -> Self {
        Self::new(cause)
    }
}

impl From<ArchiveError> for SigningFailure {
    fn from(err: ArchiveError) -> Self {
        Self::new(err.into())
    }
}

impl From<io::Error> for SigningFailure {
    fn from(err: io::Error) -> Self {
        Self::new(err.into())
    }
}

impl From<RetryError<SigningError>> for SigningFailure {
    fn from(err: RetryError<SigningError>) -> Self {
        let retries_exhausted = err.is_exhausted();
        let attempts = err.attempts();
        Self {
            cause: err.into_inner(),
            retries_exhausted,
            attempts,
        }
    }
}
