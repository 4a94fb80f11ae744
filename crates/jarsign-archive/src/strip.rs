//! Removal of existing signatures

use crate::entry::{is_manifest, is_signature_related, open_archive, read_manifest};
use crate::error::Result;
use crate::rewrite::{rewrite_archive, EntryAction};
use std::io::BufWriter;
use std::path::Path;
use tempfile::NamedTempFile;

/// Result of stripping signatures from an archive
#[derive(Debug)]
pub struct StrippedArchive {
    /// Unsigned copy, deleted on drop
    pub file: NamedTempFile,
    /// Signature-related entries that were removed
    pub removed: Vec<String>,
}

/// Write an unsigned copy of `source` into `dir`
///
/// Signature files and blocks are dropped and the manifest loses its
/// per-entry digests. Every other entry is copied unchanged.
pub fn strip_signatures(source: &Path, dir: &Path) -> Result<StrippedArchive> {
    let mut archive = open_archive(source)?;
    let stripped_manifest =
        read_manifest(&mut archive)?.map(|manifest| manifest.without_digests().to_bytes());

    let file = tempfile::Builder::new()
        .prefix("unsigned-")
        .suffix(".jar")
        .tempfile_in(dir)?;

    let mut removed = Vec::new();
    let mut manifest = stripped_manifest;
    rewrite_archive(&mut archive, BufWriter::new(file.as_file()), |name| {
        if is_signature_related(name) {
            removed.push(name.to_string());
            EntryAction::Drop
        } else if is_manifest(name) {
            manifest
                .take()
                .map(EntryAction::Replace)
                .unwrap_or(EntryAction::Keep)
        } else {
            EntryAction::Keep
        }
    })?;

    tracing::debug!(
        "Removed {} signature entries from {}",
        removed.len(),
        source.display()
    );
    Ok(StrippedArchive { file, removed })
}
