//! Entry naming rules and archive access helpers

use crate::error::{ArchiveError, Result};
use crate::manifest::{Manifest, MANIFEST_PATH};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Extensions of signature block files
pub const SIGNATURE_BLOCK_EXTENSIONS: &[&str] = &["RSA", "DSA", "EC"];

/// Open an archive file for reading
pub fn open_archive(path: &Path) -> Result<ZipArchive<BufReader<File>>> {
    let file = File::open(path)?;
    Ok(ZipArchive::new(BufReader::new(file))?)
}

/// Read a whole entry into memory, or `None` if the archive lacks it
pub fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<Vec<u8>>> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut bytes = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
    entry.read_to_end(&mut bytes)?;
    Ok(Some(bytes))
}

/// Read an entry that must exist
pub fn read_required_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Vec<u8>> {
    read_entry(archive, name)?.ok_or_else(|| ArchiveError::entry_not_found(name))
}

/// Names of all entries in central directory order
pub fn entry_names<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
    (0..archive.len())
        .map(|i| Ok(archive.by_index_raw(i)?.name().to_string()))
        .collect()
}

/// Split `META-INF/NAME.EXT` into (`NAME`, `EXT`) for files directly under
/// `META-INF/`
fn meta_inf_file(name: &str) -> Option<(&str, &str)> {
    let (dir, file) = name.split_at_checked("META-INF/".len())?;
    if !dir.eq_ignore_ascii_case("META-INF/") || file.is_empty() || file.contains('/') {
        return None;
    }
    Some(file.rsplit_once('.').unwrap_or((file, "")))
}

/// Whether `name` is a signature file (`META-INF/*.SF`)
pub fn is_signature_file(name: &str) -> bool {
    matches!(meta_inf_file(name), Some((_, ext)) if ext.eq_ignore_ascii_case("SF"))
}

/// Whether `name` is a signature block (`META-INF/*.RSA`, `.DSA`, `.EC`)
pub fn is_signature_block(name: &str) -> bool {
    matches!(meta_inf_file(name), Some((_, ext))
        if SIGNATURE_BLOCK_EXTENSIONS.iter().any(|b| ext.eq_ignore_ascii_case(b)))
}

/// Whether `name` belongs to a signature and never carries a signer itself
///
/// Covers `.SF` files, signature blocks and `META-INF/SIG-*` files.
pub fn is_signature_related(name: &str) -> bool {
    match meta_inf_file(name) {
        Some((stem, _)) => {
            is_signature_file(name)
                || is_signature_block(name)
                || stem.to_ascii_uppercase().starts_with("SIG-")
        }
        None => false,
    }
}

/// Whether `name` is the manifest
pub fn is_manifest(name: &str) -> bool {
    name.eq_ignore_ascii_case(MANIFEST_PATH)
}

/// Read and parse the manifest, whatever the case of its entry name
pub fn read_manifest<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Option<Manifest>> {
    let Some(name) = entry_names(archive)?.into_iter().find(|n| is_manifest(n)) else {
        return Ok(None);
    };
    let bytes = read_required_entry(archive, &name)?;
    Ok(Some(Manifest::parse(&name, &bytes)?))
}

/// Whether a named entry is a nested archive candidate
pub fn is_nested_archive(name: &str, is_dir: bool) -> bool {
    !is_dir && jarsign_core::types::has_archive_extension(Path::new(name))
}
