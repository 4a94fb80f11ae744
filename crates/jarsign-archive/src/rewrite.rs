//! Entry-level archive rewriting
//!
//! Kept entries are copied raw, so their compressed bytes, CRC and headers
//! stay identical. Replaced entries keep their name, modification time,
//! permissions and compression method; only size and checksum change.

use crate::entry::open_archive;
use crate::error::{ArchiveError, Result};
use std::collections::BTreeMap;
use std::io::{BufWriter, Read, Seek, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// What to do with one entry while rewriting
#[derive(Debug)]
pub enum EntryAction {
    /// Copy the entry unchanged
    Keep,
    /// Write new content under the same name
    Replace(Vec<u8>),
    /// Leave the entry out
    Drop,
}

/// Counts of what a rewrite did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteSummary {
    pub kept: usize,
    pub replaced: usize,
    pub dropped: usize,
}

/// Rewrite `source` into `dest`, deciding per entry name
pub fn rewrite_archive<R, W, F>(
    source: &mut ZipArchive<R>,
    dest: W,
    mut action: F,
) -> Result<RewriteSummary>
where
    R: Read + Seek,
    W: Write + Seek,
    F: FnMut(&str) -> EntryAction,
{
    let mut writer = ZipWriter::new(dest);
    writer.set_raw_comment(source.comment().to_vec().into_boxed_slice());
    let mut summary = RewriteSummary::default();

    for index in 0..source.len() {
        let entry = source.by_index_raw(index)?;
        match action(entry.name()) {
            EntryAction::Keep => {
                writer.raw_copy_file(entry)?;
                summary.kept += 1;
            }
            EntryAction::Replace(content) => {
                let name = entry.name().to_string();
                let method = match entry.compression() {
                    CompressionMethod::Stored => CompressionMethod::Stored,
                    _ => CompressionMethod::Deflated,
                };
                let mut options = SimpleFileOptions::default()
                    .compression_method(method)
                    .large_file(content.len() as u64 >= u64::from(u32::MAX));
                if let Some(modified) = entry.last_modified() {
                    options = options.last_modified_time(modified);
                }
                if let Some(mode) = entry.unix_mode() {
                    options = options.unix_permissions(mode);
                }
                drop(entry);
                writer.start_file(name, options)?;
                writer.write_all(&content)?;
                summary.replaced += 1;
            }
            EntryAction::Drop => {
                tracing::debug!("Dropping entry {}", entry.name());
                summary.dropped += 1;
            }
        }
    }

    writer.finish()?.flush()?;
    Ok(summary)
}

/// Write a copy of `source` with the given entries replaced
///
/// The copy is a temporary file in `dir`; the original is never touched.
/// Every replacement must name an existing entry.
pub fn replace_entries(
    source: &Path,
    mut replacements: BTreeMap<String, Vec<u8>>,
    dir: &Path,
) -> Result<NamedTempFile> {
    let mut archive = open_archive(source)?;
    let output = tempfile::Builder::new()
        .prefix("rewrite-")
        .suffix(".jar")
        .tempfile_in(dir)?;

    let summary = rewrite_archive(&mut archive, BufWriter::new(output.as_file()), |name| {
        match replacements.remove(name) {
            Some(content) => EntryAction::Replace(content),
            None => EntryAction::Keep,
        }
    })?;

    if let Some(missing) = replacements.keys().next() {
        return Err(ArchiveError::entry_not_found(missing));
    }

    tracing::debug!(
        "Rewrote {}: {} entries kept, {} replaced",
        source.display(),
        summary.kept,
        summary.replaced
    );
    Ok(output)
}
