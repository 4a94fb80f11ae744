//! The signing primitive port
//!
//! A primitive turns unsigned archive bytes into signed bytes. It may be
//! slow and it may fail; resilience is layered on top by
//! [`crate::RetryingSigner`].

use crate::error::Result;
use crate::jarsigner::JarsignerCommand;
use crate::remote::RemoteSigner;
use async_trait::async_trait;
use jarsign_core::{DigestAlgorithm, SignerEndpoint};
use std::sync::Arc;

/// An opaque signing operation
#[async_trait]
pub trait SigningPrimitive: Send + Sync {
    /// Sign `unsigned` and return the signed archive
    ///
    /// `file_name` is the archive's file name, used by transports that need
    /// one. `digest` overrides the primitive's default digest algorithm.
    async fn sign(
        &self,
        unsigned: Vec<u8>,
        file_name: &str,
        digest: Option<DigestAlgorithm>,
    ) -> Result<Vec<u8>>;

    /// Short description for logs
    fn describe(&self) -> String;
}

/// Build the primitive for a configured endpoint
pub fn primitive_for(endpoint: &SignerEndpoint) -> Result<Arc<dyn SigningPrimitive>> {
    let primitive: Arc<dyn SigningPrimitive> = match endpoint {
        SignerEndpoint::Remote(remote) => Arc::new(RemoteSigner::new(remote.clone())?),
        SignerEndpoint::Local(local) => Arc::new(JarsignerCommand::new(local.clone())),
    };
    Ok(primitive)
}
