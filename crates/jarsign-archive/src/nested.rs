//! Nested archive discovery and extraction
//!
//! Only the central directory of the outer archive is consulted. Archives
//! packed inside a nested archive are never listed.

use crate::entry::{is_nested_archive, open_archive};
use crate::error::{ArchiveError, Result};
use std::io::{self, Read, Seek};
use std::path::Path;
use tempfile::NamedTempFile;
use zip::ZipArchive;

/// A nested archive entry of an outer archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedEntry {
    /// Position in the outer archive's central directory
    pub index: usize,
    /// Full entry name, including directories
    pub name: String,
}

impl NestedEntry {
    /// Entry name without its directories
    pub fn file_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// List nested archive candidates in entry order
pub fn find_nested_archives<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Vec<NestedEntry>> {
    let mut nested = Vec::new();
    for index in 0..archive.len() {
        let entry = archive.by_index_raw(index)?;
        if is_nested_archive(entry.name(), entry.is_dir()) {
            nested.push(NestedEntry {
                index,
                name: entry.name().to_string(),
            });
        }
    }
    Ok(nested)
}

/// List nested archive candidates of the archive at `path`
pub fn find_nested_archives_in(path: &Path) -> Result<Vec<NestedEntry>> {
    let mut archive = open_archive(path)?;
    find_nested_archives(&mut archive)
}

/// Extract a nested entry to a temporary file inside `dir`
///
/// The file is removed when the returned handle is dropped.
pub fn extract_nested<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    entry: &NestedEntry,
    dir: &Path,
) -> Result<NamedTempFile> {
    let mut source = archive.by_index(entry.index)?;
    if source.name() != entry.name {
        return Err(ArchiveError::entry_not_found(&entry.name));
    }

    let mut target = tempfile::Builder::new()
        .prefix("nested-")
        .suffix(".jar")
        .tempfile_in(dir)?;
    io::copy(&mut source, target.as_file_mut())?;
    tracing::debug!("Extracted {} to {}", entry.name, target.path().display());
    Ok(target)
}
