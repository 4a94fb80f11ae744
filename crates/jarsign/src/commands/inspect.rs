//! Inspect command

use crate::cli::InspectArgs;
use crate::output;
use anyhow::{bail, Context, Result};
use camino::Utf8Path;
use jarsign_archive::{find_nested_archives, open_archive, SignatureScan};
use serde::Serialize;

/// What `inspect` reports for one archive
#[derive(Debug, Serialize)]
struct ArchiveInfo {
    path: String,
    signed: bool,
    first_entry: Option<String>,
    signers: Vec<String>,
    nested: Vec<String>,
}

fn inspect(path: &Utf8Path) -> Result<ArchiveInfo> {
    let mut archive =
        open_archive(path.as_std_path()).with_context(|| format!("Failed to open {}", path))?;
    let scan = SignatureScan::read(&mut archive)
        .with_context(|| format!("Failed to read signatures of {}", path))?;
    let nested = find_nested_archives(&mut archive)
        .with_context(|| format!("Failed to list nested archives of {}", path))?;

    Ok(ArchiveInfo {
        path: path.to_string(),
        signed: scan.is_signed(),
        first_entry: scan.first_entry().map(String::from),
        signers: scan.signers().iter().map(|s| s.name.clone()).collect(),
        nested: nested.into_iter().map(|entry| entry.name).collect(),
    })
}

pub fn run(args: InspectArgs) -> Result<()> {
    let mut infos = Vec::with_capacity(args.paths.len());
    let mut failures = 0;

    for path in &args.paths {
        match inspect(path) {
            Ok(info) => infos.push(info),
            Err(e) => {
                output::error(&format!("{:#}", e));
                failures += 1;
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&infos)?);
    } else {
        for info in &infos {
            render(info);
        }
    }

    if failures > 0 {
        bail!("{} of {} archives could not be inspected", failures, args.paths.len());
    }
    Ok(())
}

fn render(info: &ArchiveInfo) {
    output::header(&info.path);
    output::kv("signed", if info.signed { "yes" } else { "no" });
    if let Some(entry) = &info.first_entry {
        output::kv("first entry", entry);
    }
    if !info.signers.is_empty() {
        output::kv("signers", &info.signers.join(", "));
    }
    if info.nested.is_empty() {
        output::kv("nested archives", "none");
    } else {
        output::kv("nested archives", &info.nested.len().to_string());
        for name in &info.nested {
            println!("    {}", name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_jar(dir: &TempDir, name: &str, entries: &[(&str, &[u8])]) -> Utf8PathBuf {
        let path = Utf8PathBuf::from_path_buf(dir.path().join(name)).unwrap();
        let mut writer = ZipWriter::new(std::fs::File::create(&path).unwrap());
        writer
            .start_file("META-INF/MANIFEST.MF", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"Manifest-Version: 1.0\r\n\r\n").unwrap();
        for (name, content) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    #[test]
    fn test_inspect_unsigned_with_nested() {
        let dir = TempDir::new().unwrap();
        let path = write_jar(
            &dir,
            "app.jar",
            &[("a.class", b"class"), ("lib/dep.jar", b"not inspected")],
        );

        let info = inspect(&path).unwrap();

        assert!(!info.signed);
        assert_eq!(info.first_entry.as_deref(), Some("a.class"));
        assert!(info.signers.is_empty());
        assert_eq!(info.nested, vec!["lib/dep.jar"]);
    }

    #[test]
    fn test_inspect_rejects_non_zip() {
        let dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("broken.jar")).unwrap();
        std::fs::write(&path, b"plain text").unwrap();

        assert!(inspect(&path).is_err());
    }

    #[test]
    fn test_run_reports_failures() {
        let dir = TempDir::new().unwrap();
        let good = write_jar(&dir, "app.jar", &[]);
        let missing = Utf8PathBuf::from_path_buf(dir.path().join("missing.jar")).unwrap();

        let err = run(InspectArgs {
            paths: vec![good, missing],
            json: true,
        })
        .unwrap_err();

        assert!(err.to_string().contains("1 of 2"));
    }
}
