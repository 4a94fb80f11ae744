//! Checksum helpers

use sha2::{Digest, Sha256};
use std::path::Path;

/// Hex-encoded SHA-256 of a file's contents
pub fn sha256_file(path: &Path) -> String {
    let bytes = std::fs::read(path).expect("read file for checksum");
    hex::encode(Sha256::digest(&bytes))
}
