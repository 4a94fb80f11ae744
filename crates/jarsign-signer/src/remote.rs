//! Remote signing service client
//!
//! The archive is uploaded as a multipart form; a successful response body
//! is the signed archive.

use crate::error::{Result, SigningError};
use crate::primitive::SigningPrimitive;
use async_trait::async_trait;
use jarsign_core::types::RemoteEndpoint;
use jarsign_core::{DigestAlgorithm, ProxyConfig};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Proxy};
use tracing::debug;

/// Content type of uploaded archives
const JAR_MIME_TYPE: &str = "application/java-archive";

/// Form field carrying the digest algorithm
const DIGEST_FIELD: &str = "digestalg";

/// Signs archives by uploading them to a signing service
pub struct RemoteSigner {
    client: Client,
    endpoint: RemoteEndpoint,
}

impl RemoteSigner {
    /// Create a client for the given endpoint
    pub fn new(endpoint: RemoteEndpoint) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(concat!("jarsign/", env!("CARGO_PKG_VERSION")))
            .timeout(endpoint.timeout);

        if let Some(proxy) = &endpoint.http_proxy {
            builder = builder.proxy(Proxy::http(proxy_url(proxy)).map_err(invalid_proxy)?);
        }
        if let Some(proxy) = &endpoint.https_proxy {
            builder = builder.proxy(Proxy::https(proxy_url(proxy)).map_err(invalid_proxy)?);
        }

        let client = builder.build().map_err(|e| {
            jarsign_core::Error::invalid_config(format!("cannot build HTTP client: {}", e))
        })?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &RemoteEndpoint {
        &self.endpoint
    }
}

fn proxy_url(proxy: &ProxyConfig) -> String {
    format!("http://{}:{}", proxy.host(), proxy.port())
}

fn invalid_proxy(e: reqwest::Error) -> SigningError {
    jarsign_core::Error::invalid_config(format!("invalid proxy: {}", e)).into()
}

fn transport_error(url: &str, e: reqwest::Error) -> SigningError {
    if e.is_timeout() {
        SigningError::transient(format!("Request to {} timed out", url))
    } else {
        SigningError::transient(format!("Request to {} failed: {}", url, e))
    }
}

#[async_trait]
impl SigningPrimitive for RemoteSigner {
    async fn sign(
        &self,
        unsigned: Vec<u8>,
        file_name: &str,
        digest: Option<DigestAlgorithm>,
    ) -> Result<Vec<u8>> {
        let url = self.endpoint.url.as_str();
        let part = Part::bytes(unsigned)
            .file_name(file_name.to_string())
            .mime_str(JAR_MIME_TYPE)
            .map_err(|e| SigningError::transient(format!("cannot build upload: {}", e)))?;
        let mut form = Form::new().part(self.endpoint.part_name.clone(), part);
        if let Some(digest) = digest {
            form = form.text(DIGEST_FIELD, digest.standard_name());
        }

        debug!("Uploading {} to {}", file_name, url);
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SigningError::transient_with_diagnostic(
                format!("Signing service {} answered {}", url, status),
                body,
            ));
        }

        let signed = response
            .bytes()
            .await
            .map_err(|e| transport_error(url, e))?;
        debug!("Received {} signed bytes for {}", signed.len(), file_name);
        Ok(signed.to_vec())
    }

    fn describe(&self) -> String {
        format!("signing service {}", self.endpoint.url)
    }
}
