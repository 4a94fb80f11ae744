//! Error types for jarsign-archive

use std::io;
use thiserror::Error;

/// Result type alias for archive operations
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Failures while reading or rewriting an archive
///
/// All of these are fatal for the artifact being processed. None of them is
/// worth retrying.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// IO error while reading or writing archive files
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The ZIP container is unreadable or corrupt
    #[error("Invalid archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// `META-INF/MANIFEST.MF` or a signature file could not be parsed
    #[error("Malformed manifest {name}: {message}")]
    Manifest { name: String, message: String },

    /// A named entry does not exist in the archive
    #[error("Entry not found in archive: {name}")]
    EntryNotFound { name: String },
}

impl ArchiveError {
    /// Create a malformed manifest error
    pub fn manifest(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Manifest {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an entry not found error
    pub fn entry_not_found(name: impl Into<String>) -> Self {
        Self::EntryNotFound { name: name.into() }
    }
}
