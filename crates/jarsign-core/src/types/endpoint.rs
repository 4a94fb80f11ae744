//! Signing endpoint configuration
//!
//! Describes where signatures come from: a remote signing service reached
//! over HTTP, or a local `jarsigner` executable. The values are opaque to
//! the signing pipeline and only read by the primitive adapters.

use crate::error::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Default multipart part name expected by the signing service
pub const DEFAULT_PART_NAME: &str = "file";

/// Default timeout for a single signing call
pub const DEFAULT_SIGNING_TIMEOUT_SECS: u64 = 120;

/// Proxy host and port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    host: String,
    port: u16,
}

impl ProxyConfig {
    /// Create a proxy configuration; the port must be strictly positive
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(Error::invalid_config("proxy host must not be empty"));
        }
        if port == 0 {
            return Err(Error::invalid_config(format!(
                "proxy port must be strictly positive when proxy host '{}' is set",
                host
            )));
        }
        Ok(Self { host, port })
    }

    /// Parse `host:port`
    pub fn parse(value: &str) -> Result<Self> {
        let (host, port) = value.rsplit_once(':').ok_or_else(|| {
            Error::invalid_config(format!(
                "proxy '{}' must be given as host:port; a proxy host requires a port",
                value
            ))
        })?;
        let port = port.parse::<u16>().map_err(|_| {
            Error::invalid_config(format!("proxy port '{}' is not a valid port", port))
        })?;
        Self::new(host, port)
    }

    /// Build an optional proxy from separately configured host and port
    pub fn from_parts(host: Option<&str>, port: Option<u16>) -> Result<Option<Self>> {
        match host.map(str::trim).filter(|h| !h.is_empty()) {
            Some(host) => Self::new(host, port.unwrap_or(0)).map(Some),
            None => Ok(None),
        }
    }

    /// Proxy host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Proxy port
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Remote signing service reached through a multipart upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEndpoint {
    pub url: Url,
    pub part_name: String,
    pub timeout: Duration,
    pub http_proxy: Option<ProxyConfig>,
    pub https_proxy: Option<ProxyConfig>,
}

impl RemoteEndpoint {
    /// Create an endpoint for the given service URL with default settings
    pub fn new(url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| Error::invalid_config(format!("invalid signer URL '{}': {}", url, e)))?;
        Ok(Self {
            url,
            part_name: DEFAULT_PART_NAME.to_string(),
            timeout: Duration::from_secs(DEFAULT_SIGNING_TIMEOUT_SECS),
            http_proxy: None,
            https_proxy: None,
        })
    }

    fn validate(&self) -> Result<()> {
        if !matches!(self.url.scheme(), "http" | "https") {
            return Err(Error::invalid_config(format!(
                "signer URL must use http or https, got '{}'",
                self.url.scheme()
            )));
        }
        if self.part_name.trim().is_empty() {
            return Err(Error::invalid_config("multipart part name must not be empty"));
        }
        Ok(())
    }
}

/// Local `jarsigner` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalEndpoint {
    pub command: PathBuf,
    pub keystore: PathBuf,
    pub storepass: String,
    pub alias: String,
    pub tsa: Option<Url>,
    pub timeout: Duration,
    pub http_proxy: Option<ProxyConfig>,
    pub https_proxy: Option<ProxyConfig>,
}

impl LocalEndpoint {
    /// Create an invocation of `jarsigner` from PATH with the given key material
    pub fn new(
        keystore: impl Into<PathBuf>,
        storepass: impl Into<String>,
        alias: impl Into<String>,
    ) -> Self {
        Self {
            command: PathBuf::from("jarsigner"),
            keystore: keystore.into(),
            storepass: storepass.into(),
            alias: alias.into(),
            tsa: None,
            timeout: Duration::from_secs(DEFAULT_SIGNING_TIMEOUT_SECS),
            http_proxy: None,
            https_proxy: None,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.keystore.as_os_str().is_empty() {
            return Err(Error::missing_field("keystore"));
        }
        if self.alias.trim().is_empty() {
            return Err(Error::missing_field("alias"));
        }
        Ok(())
    }
}

/// Where signatures come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignerEndpoint {
    Remote(RemoteEndpoint),
    Local(LocalEndpoint),
}

impl SignerEndpoint {
    /// Per-call timeout
    pub fn timeout(&self) -> Duration {
        match self {
            SignerEndpoint::Remote(remote) => remote.timeout,
            SignerEndpoint::Local(local) => local.timeout,
        }
    }

    /// Validate the endpoint, consuming and returning it
    pub fn validated(self) -> Result<Self> {
        if self.timeout().is_zero() {
            return Err(Error::invalid_config("The timeout must be strictly positive"));
        }
        match &self {
            SignerEndpoint::Remote(remote) => remote.validate()?,
            SignerEndpoint::Local(local) => local.validate()?,
        }
        Ok(self)
    }
}
