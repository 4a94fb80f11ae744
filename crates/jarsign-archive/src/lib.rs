//! # jarsign-archive
//!
//! JAR inspection and entry-level rewriting:
//! - Manifest and signature file parsing
//! - Already-signed detection (first content entry heuristic)
//! - Nested archive discovery and extraction
//! - Entry replacement with byte-identical copies of untouched entries
//! - Signature removal
//!
//! Nothing here writes archive formats beyond copying, replacing and
//! dropping entries. Rewrites always produce a fresh temporary file; the
//! source archive is only ever read.

pub mod detect;
pub mod entry;
pub mod error;
pub mod manifest;
pub mod nested;
pub mod rewrite;
pub mod strip;

pub use detect::{is_signed, SignatureScan, Signer};
pub use entry::open_archive;
pub use error::{ArchiveError, Result};
pub use manifest::{Manifest, Section, MANIFEST_PATH};
pub use nested::{extract_nested, find_nested_archives, find_nested_archives_in, NestedEntry};
pub use rewrite::{replace_entries, rewrite_archive, EntryAction, RewriteSummary};
pub use strip::{strip_signatures, StrippedArchive};
