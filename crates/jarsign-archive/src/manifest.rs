//! JAR manifest format
//!
//! Used for `META-INF/MANIFEST.MF` and for signature files (`*.SF`), which
//! share the same layout: a main section followed by per-entry sections,
//! separated by blank lines. Each section is a list of `Key: Value` lines.
//! A line starting with a single space continues the previous value. No
//! line may exceed 72 bytes when written.

use crate::error::{ArchiveError, Result};

/// Path of the manifest inside a JAR
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// Maximum length of a manifest line in bytes, excluding the line break
const MAX_LINE_BYTES: usize = 72;

/// One section of a manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    attributes: Vec<(String, String)>,
}

impl Section {
    /// Look up an attribute (names are case-insensitive)
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Value of the `Name` attribute, present on every per-entry section
    pub fn name(&self) -> Option<&str> {
        self.get("Name")
    }

    /// Attributes in file order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether the section carries at least one `*-Digest` attribute
    pub fn has_digest(&self) -> bool {
        self.attributes.iter().any(|(k, _)| is_digest_key(k))
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    fn without_digests(&self) -> Section {
        Section {
            attributes: self
                .attributes
                .iter()
                .filter(|(k, _)| !is_digest_key(k))
                .cloned()
                .collect(),
        }
    }
}

fn is_digest_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key.len() > "-digest".len() && key.ends_with("-digest")
}

/// Parsed manifest or signature file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    main: Section,
    entries: Vec<Section>,
}

impl Manifest {
    /// Parse manifest bytes; `origin` names the file in error messages
    ///
    /// Continuation lines are joined before decoding, since a writer may
    /// wrap a line in the middle of a multi-byte character.
    pub fn parse(origin: &str, bytes: &[u8]) -> Result<Self> {
        let mut sections: Vec<Section> = Vec::new();
        let mut current = Section::default();
        let mut in_main = true;
        // logical line being assembled, with the number of its first line
        let mut pending: Option<(usize, Vec<u8>)> = None;

        for (index, line) in split_lines(bytes).enumerate() {
            let number = index + 1;

            if let Some(rest) = line.strip_prefix(b" ") {
                match pending.as_mut() {
                    Some((_, logical)) => logical.extend_from_slice(rest),
                    None => {
                        return Err(ArchiveError::manifest(
                            origin,
                            format!("line {}: continuation without an attribute", number),
                        ))
                    }
                }
                continue;
            }

            if let Some((start, logical)) = pending.take() {
                current.attributes.push(parse_attribute(origin, start, &logical)?);
            }

            if line.is_empty() {
                if !current.is_empty() || in_main {
                    sections.push(std::mem::take(&mut current));
                    in_main = false;
                }
                continue;
            }
            pending = Some((number, line.to_vec()));
        }

        if let Some((start, logical)) = pending {
            current.attributes.push(parse_attribute(origin, start, &logical)?);
        }
        if !current.is_empty() || in_main {
            sections.push(current);
        }

        let mut sections = sections.into_iter();
        let main = sections.next().unwrap_or_default();
        let entries: Vec<Section> = sections.collect();

        if let Some(unnamed) = entries.iter().position(|s| s.name().is_none()) {
            return Err(ArchiveError::manifest(
                origin,
                format!("section {} has no Name attribute", unnamed + 2),
            ));
        }

        Ok(Self { main, entries })
    }

    /// Main attributes
    pub fn main(&self) -> &Section {
        &self.main
    }

    /// Per-entry sections in file order
    pub fn entries(&self) -> &[Section] {
        &self.entries
    }

    /// Section for the given entry name
    pub fn entry(&self, name: &str) -> Option<&Section> {
        self.entries.iter().find(|s| s.name() == Some(name))
    }

    /// Copy of this manifest with every per-entry digest removed
    ///
    /// Sections that only held a name and digests are dropped entirely.
    pub fn without_digests(&self) -> Manifest {
        Manifest {
            main: self.main.clone(),
            entries: self
                .entries
                .iter()
                .map(Section::without_digests)
                .filter(|s| s.attributes.len() > 1)
                .collect(),
        }
    }

    /// Serialize with CRLF line breaks and 72-byte line wrapping
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = String::new();
        write_section(&mut out, &self.main);
        out.push_str("\r\n");
        for section in &self.entries {
            write_section(&mut out, section);
            out.push_str("\r\n");
        }
        out.into_bytes()
    }
}

fn split_lines(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    bytes
        .split(|&b| b == b'\n')
        .map(|l| l.strip_suffix(b"\r").unwrap_or(l))
}

/// Decode one logical `Key: Value` line
fn parse_attribute(origin: &str, number: usize, logical: &[u8]) -> Result<(String, String)> {
    let text = std::str::from_utf8(logical).map_err(|e| {
        ArchiveError::manifest(origin, format!("line {}: not valid UTF-8: {}", number, e))
    })?;
    let (key, value) = text.split_once(": ").ok_or_else(|| {
        ArchiveError::manifest(origin, format!("line {}: expected 'Name: value'", number))
    })?;
    Ok((key.to_string(), value.to_string()))
}

fn write_section(out: &mut String, section: &Section) {
    for (key, value) in &section.attributes {
        write_wrapped(out, &format!("{}: {}", key, value));
    }
}

fn write_wrapped(out: &mut String, line: &str) {
    let mut rest = line;
    let mut limit = MAX_LINE_BYTES;
    loop {
        if rest.len() <= limit {
            out.push_str(rest);
            out.push_str("\r\n");
            return;
        }
        let mut cut = limit;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        out.push_str(&rest[..cut]);
        out.push_str("\r\n ");
        rest = &rest[cut..];
        // continuation lines spend one byte on the leading space
        limit = MAX_LINE_BYTES - 1;
    }
}
