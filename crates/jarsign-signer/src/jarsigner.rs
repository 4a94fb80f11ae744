//! Local `jarsigner` invocation
//!
//! The archive is written to a scratch file which `jarsigner` signs in
//! place. A non-zero exit status is a transient failure carrying the
//! command's combined output.

use crate::error::{Result, SigningError};
use crate::primitive::SigningPrimitive;
use async_trait::async_trait;
use jarsign_core::types::LocalEndpoint;
use jarsign_core::DigestAlgorithm;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Signs archives with a local `jarsigner` executable
pub struct JarsignerCommand {
    endpoint: LocalEndpoint,
}

impl JarsignerCommand {
    pub fn new(endpoint: LocalEndpoint) -> Self {
        Self { endpoint }
    }

    /// Locate the configured executable
    fn resolve_command(&self) -> Result<PathBuf> {
        which::which(&self.endpoint.command).map_err(|e| {
            jarsign_core::Error::invalid_config(format!(
                "cannot find '{}': {}",
                self.endpoint.command.display(),
                e
            ))
            .into()
        })
    }

    /// Arguments passed to `jarsigner` for signing `jar`
    pub fn arguments(&self, jar: &Path, digest: Option<DigestAlgorithm>) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();

        if let Some(proxy) = &self.endpoint.http_proxy {
            args.push(format!("-J-Dhttp.proxyHost={}", proxy.host()).into());
            args.push(format!("-J-Dhttp.proxyPort={}", proxy.port()).into());
        }
        if let Some(proxy) = &self.endpoint.https_proxy {
            args.push(format!("-J-Dhttps.proxyHost={}", proxy.host()).into());
            args.push(format!("-J-Dhttps.proxyPort={}", proxy.port()).into());
        }
        if let Some(digest) = digest {
            args.push("-digestalg".into());
            args.push(digest.standard_name().into());
        }
        if let Some(tsa) = &self.endpoint.tsa {
            args.push("-tsa".into());
            args.push(tsa.as_str().into());
        }
        args.push("-verbose".into());
        args.push("-keystore".into());
        args.push(self.endpoint.keystore.clone().into_os_string());
        args.push("-storepass".into());
        args.push(self.endpoint.storepass.clone().into());
        args.push(jar.as_os_str().to_owned());
        args.push(self.endpoint.alias.clone().into());

        args
    }

    async fn run(&self, jar: &Path, digest: Option<DigestAlgorithm>) -> Result<()> {
        let command = self.resolve_command()?;
        let timeout = self.endpoint.timeout;
        debug!("Running {} on {}", command.display(), jar.display());

        let child = Command::new(&command)
            .args(self.arguments(jar, digest))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                SigningError::transient(format!("Failed to start '{}': {}", command.display(), e))
            })?;

        // dropping the child on timeout kills the process
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(SigningError::transient(format!(
                    "Failed to wait for '{}': {}",
                    command.display(),
                    e
                )))
            }
            Err(_) => {
                return Err(SigningError::transient(format!(
                    "The '{}' command timed out after {:?}",
                    command.display(),
                    timeout
                )))
            }
        };

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            debug!("jarsigner output:\n{}", combined);
            return Ok(());
        }

        let code = output
            .status
            .code()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());
        Err(SigningError::transient_with_diagnostic(
            format!(
                "The '{}' command exited with value '{}'",
                command.display(),
                code
            ),
            combined,
        ))
    }
}

#[async_trait]
impl SigningPrimitive for JarsignerCommand {
    async fn sign(
        &self,
        unsigned: Vec<u8>,
        file_name: &str,
        digest: Option<DigestAlgorithm>,
    ) -> Result<Vec<u8>> {
        let scratch = tempfile::Builder::new().prefix("jarsigner-").tempdir()?;
        let jar = scratch.path().join(file_name);
        tokio::fs::write(&jar, &unsigned).await?;

        self.run(&jar, digest).await?;

        Ok(tokio::fs::read(&jar).await?)
    }

    fn describe(&self) -> String {
        format!("{} (alias {})", self.endpoint.command.display(), self.endpoint.alias)
    }
}
