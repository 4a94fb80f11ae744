//! JAR fixtures
//!
//! Every fixture carries an `id.txt` entry naming it, so the fake signer can
//! tell which archive it was handed.

use sha2::{Digest, Sha256};
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// Entry identifying a fixture
pub const ID_ENTRY: &str = "id.txt";

/// Build an unsigned JAR identified by `id` with extra entries
pub fn jar(id: &str, entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    writer.start_file("META-INF/MANIFEST.MF", options).unwrap();
    writer.write_all(b"Manifest-Version: 1.0\r\n\r\n").unwrap();
    writer.start_file(ID_ENTRY, options).unwrap();
    writer.write_all(id.as_bytes()).unwrap();
    for (name, content) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Read every entry of an archive
pub fn entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut entry = archive.by_index(i).unwrap();
            let mut content = Vec::new();
            entry.read_to_end(&mut content).unwrap();
            (entry.name().to_string(), content)
        })
        .collect()
}

/// Content of one entry
pub fn entry(bytes: &[u8], name: &str) -> Option<Vec<u8>> {
    entries(bytes)
        .into_iter()
        .find(|(n, _)| n == name)
        .map(|(_, c)| c)
}

/// Identity of a fixture archive
pub fn jar_id(bytes: &[u8]) -> String {
    entry(bytes, ID_ENTRY)
        .map(|c| String::from_utf8(c).unwrap())
        .unwrap_or_default()
}

/// Add a fake signature covering every content entry
///
/// The result is laid out like `jarsigner` output: manifest with digests,
/// `.SF` and `.RSA` files, then content entries. Existing signatures are
/// replaced.
pub fn fake_sign(bytes: &[u8], alias: &str) -> Vec<u8> {
    let content: Vec<(String, Vec<u8>)> = entries(bytes)
        .into_iter()
        .filter(|(name, _)| !name.to_ascii_uppercase().starts_with("META-INF/"))
        .collect();

    let mut manifest = String::from("Manifest-Version: 1.0\r\n\r\n");
    let mut sf = String::from("Signature-Version: 1.0\r\n\r\n");
    for (name, data) in &content {
        let digest = hex::encode(Sha256::digest(data));
        manifest.push_str(&format!("Name: {}\r\nSHA-256-Digest: {}\r\n\r\n", name, digest));
        sf.push_str(&format!("Name: {}\r\nSHA-256-Digest: {}\r\n\r\n", name, &digest[..20]));
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    writer.start_file("META-INF/MANIFEST.MF", options).unwrap();
    writer.write_all(manifest.as_bytes()).unwrap();
    writer
        .start_file(format!("META-INF/{}.SF", alias), options)
        .unwrap();
    writer.write_all(sf.as_bytes()).unwrap();
    writer
        .start_file(format!("META-INF/{}.RSA", alias), options)
        .unwrap();
    writer.write_all(b"fake signature block").unwrap();
    for (name, data) in &content {
        writer.start_file(name.as_str(), options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Whether the archive carries the fake signature of `alias`
pub fn signed_by(bytes: &[u8], alias: &str) -> bool {
    entry(bytes, &format!("META-INF/{}.SF", alias)).is_some()
}

/// Write bytes to `dir/name` and return the path
pub fn write(dir: &Path, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
