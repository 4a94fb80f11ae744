//! # jarsign-signer
//!
//! The signing pipeline:
//! - [`SigningPrimitive`]: the opaque signing operation, with a remote
//!   service adapter ([`RemoteSigner`]) and a local `jarsigner` adapter
//!   ([`JarsignerCommand`])
//! - [`RetryingSigner`]: a primitive driven by a fixed-wait retry policy
//! - [`ResigningStrategy`]: what to do with archives that are already signed
//! - [`InnerArchiveProcessor`]: signing of first-level nested archives
//! - [`SigningOrchestrator`]: sequential batch processing with fail-fast or
//!   continue-on-fail semantics
//!
//! # Example
//!
//! ```rust,no_run
//! use jarsign_core::{Artifact, SignerEndpoint, SigningConfig};
//! use jarsign_core::types::RemoteEndpoint;
//! use jarsign_signer::{primitive_for, SigningOrchestrator};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let endpoint = SignerEndpoint::Remote(RemoteEndpoint::new("https://sign.example.org/jarsigner")?);
//!     let orchestrator = SigningOrchestrator::new(primitive_for(&endpoint)?, SigningConfig::default());
//!
//!     let batch = orchestrator.run(&[Artifact::new("target/app.jar")]).await;
//!     println!("{:?}", batch.verdict());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod inner;
pub mod jarsigner;
pub mod orchestrator;
pub mod primitive;
pub mod remote;
pub mod report;
pub mod resign;
pub mod retrying;

pub use error::{Result, SigningError, SigningFailure};
pub use inner::{InnerArchiveProcessor, NestedOutcome};
pub use jarsigner::JarsignerCommand;
pub use orchestrator::SigningOrchestrator;
pub use primitive::{primitive_for, SigningPrimitive};
pub use remote::RemoteSigner;
pub use report::{
    ArtifactReport, ArtifactStatus, BatchResult, BatchVerdict, NestedFailure, SigningResult,
};
pub use resign::{Prepared, ResigningStrategy};
pub use retrying::RetryingSigner;
