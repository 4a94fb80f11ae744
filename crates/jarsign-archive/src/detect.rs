//! Already-signed detection
//!
//! The check is a cheap heuristic, not a signature audit: only the first
//! content entry of the archive is examined. An archive whose first entry is
//! unsigned is reported as unsigned even if later entries carry signers.
//! Signature bytes are never verified cryptographically.

use crate::entry::{
    entry_names, is_manifest, is_signature_block, is_signature_file, is_signature_related,
    open_archive, read_manifest, read_required_entry, SIGNATURE_BLOCK_EXTENSIONS,
};
use crate::error::Result;
use crate::manifest::Manifest;
use std::collections::BTreeSet;
use std::io::{Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// A signer whose `.SF` file has a matching signature block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signer {
    /// Signature file name without directory and extension
    pub name: String,
    /// Entries listed in the signature file
    pub covered: BTreeSet<String>,
}

/// Signature state of an archive
#[derive(Debug, Clone, Default)]
pub struct SignatureScan {
    manifest: Option<Manifest>,
    signers: Vec<Signer>,
    first_entry: Option<String>,
}

impl SignatureScan {
    /// Scan an open archive
    pub fn read<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Self> {
        let names = entry_names(archive)?;

        let manifest = read_manifest(archive)?;

        let mut signers = Vec::new();
        for sf_name in names.iter().filter(|n| is_signature_file(n)) {
            let stem = &sf_name[..sf_name.len() - ".SF".len()];
            let has_block = SIGNATURE_BLOCK_EXTENSIONS.iter().any(|ext| {
                names
                    .iter()
                    .any(|n| is_signature_block(n) && n.eq_ignore_ascii_case(&format!("{}.{}", stem, ext)))
            });
            if !has_block {
                tracing::debug!("Ignoring {} without a signature block", sf_name);
                continue;
            }

            let sf = Manifest::parse(sf_name, &read_required_entry(archive, sf_name)?)?;
            signers.push(Signer {
                name: stem["META-INF/".len()..].to_string(),
                covered: sf
                    .entries()
                    .iter()
                    .filter_map(|s| s.name().map(str::to_string))
                    .collect(),
            });
        }

        let mut first_entry = None;
        for (index, name) in names.iter().enumerate() {
            if is_manifest(name) || is_signature_related(name) {
                continue;
            }
            if archive.by_index_raw(index)?.is_dir() {
                continue;
            }
            first_entry = Some(name.clone());
            break;
        }

        Ok(Self {
            manifest,
            signers,
            first_entry,
        })
    }

    /// Scan the archive at `path`
    pub fn read_path(path: &Path) -> Result<Self> {
        let mut archive = open_archive(path)?;
        Self::read(&mut archive)
    }

    /// Complete signers found in `META-INF/`
    pub fn signers(&self) -> &[Signer] {
        &self.signers
    }

    /// First content entry, the one the signed check looks at
    pub fn first_entry(&self) -> Option<&str> {
        self.first_entry.as_deref()
    }

    /// Whether `entry` has a manifest digest and is listed by a complete signer
    pub fn entry_has_signer(&self, entry: &str) -> bool {
        let digested = self
            .manifest
            .as_ref()
            .and_then(|m| m.entry(entry))
            .is_some_and(|s| s.has_digest());
        digested && self.signers.iter().any(|s| s.covered.contains(entry))
    }

    /// Whether the archive counts as already signed
    pub fn is_signed(&self) -> bool {
        self.first_entry
            .as_deref()
            .is_some_and(|entry| self.entry_has_signer(entry))
    }
}

/// Report whether the archive at `path` is already signed
pub fn is_signed(path: &Path) -> Result<bool> {
    Ok(SignatureScan::read_path(path)?.is_signed())
}
