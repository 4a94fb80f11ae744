//! Builder for JAR fixtures
//!
//! Produces archives laid out the way `jarsigner` writes them: the manifest
//! first, then signature files, then content entries in insertion order.

use sha2::{Digest, Sha256};
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Builder for JAR archives with optional fake signatures
#[derive(Debug, Clone, Default)]
pub struct JarBuilder {
    entries: Vec<(String, Vec<u8>)>,
    signer: Option<(String, Vec<String>)>,
    without_manifest: bool,
}

impl JarBuilder {
    /// Create an empty JAR with a plain manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file entry
    pub fn entry(mut self, name: &str, content: impl AsRef<[u8]>) -> Self {
        self.entries.push((name.to_string(), content.as_ref().to_vec()));
        self
    }

    /// Add a directory entry
    pub fn dir(mut self, name: &str) -> Self {
        let name = if name.ends_with('/') {
            name.to_string()
        } else {
            format!("{}/", name)
        };
        self.entries.push((name, Vec::new()));
        self
    }

    /// Sign the listed entries under `alias`
    pub fn signed_by(mut self, alias: &str, covered: &[&str]) -> Self {
        self.signer = Some((
            alias.to_uppercase(),
            covered.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    /// Sign every file entry under `alias`
    pub fn signed_all(self, alias: &str) -> Self {
        let names: Vec<String> = self
            .entries
            .iter()
            .filter(|(n, _)| !n.ends_with('/'))
            .map(|(n, _)| n.clone())
            .collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        self.signed_by(alias, &refs)
    }

    /// Omit `META-INF/MANIFEST.MF`
    pub fn without_manifest(mut self) -> Self {
        self.without_manifest = true;
        self
    }

    /// Build the archive bytes
    pub fn build(&self) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        if !self.without_manifest {
            let mut manifest = String::from("Manifest-Version: 1.0\r\nCreated-By: jarsign tests\r\n\r\n");
            let mut sf = String::from("Signature-Version: 1.0\r\n\r\n");
            if let Some((_, covered)) = &self.signer {
                for name in covered {
                    let content = self
                        .entries
                        .iter()
                        .find(|(n, _)| n == name)
                        .map(|(_, c)| c.as_slice())
                        .unwrap_or_default();
                    let digest = hex::encode(Sha256::digest(content));
                    manifest.push_str(&format!("Name: {}\r\nSHA-256-Digest: {}\r\n\r\n", name, digest));
                    sf.push_str(&format!("Name: {}\r\nSHA-256-Digest: {}\r\n\r\n", name, &digest[..16]));
                }
            }

            writer.start_file("META-INF/MANIFEST.MF", options).unwrap();
            writer.write_all(manifest.as_bytes()).unwrap();

            if let Some((alias, _)) = &self.signer {
                writer
                    .start_file(format!("META-INF/{}.SF", alias), options)
                    .unwrap();
                writer.write_all(sf.as_bytes()).unwrap();
                writer
                    .start_file(format!("META-INF/{}.RSA", alias), options)
                    .unwrap();
                writer.write_all(b"not a real PKCS#7 block").unwrap();
            }
        }

        for (name, content) in &self.entries {
            if name.ends_with('/') {
                writer.add_directory(name.as_str(), options).unwrap();
            } else {
                writer.start_file(name.as_str(), options).unwrap();
                writer.write_all(content).unwrap();
            }
        }

        writer.finish().unwrap().into_inner()
    }

    /// Build the archive and write it to `path`
    pub fn write_to(&self, path: &Path) {
        std::fs::write(path, self.build()).unwrap();
    }
}
