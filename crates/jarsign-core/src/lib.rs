//! # jarsign-core
//!
//! Core library for jarsign providing:
//! - Signing configuration types with validation at build time
//! - Settings file loading (jarsign.yaml) with environment overrides
//! - Retry execution engine driven by a fixed-wait retry policy

pub mod config;
pub mod error;
pub mod retry;
pub mod types;

pub use config::{ConfigLoader, JarsignSettings, ResolvedSettings};
pub use error::{Error, Result};
pub use types::{
    Artifact, ArtifactKind, DigestAlgorithm, NestingDepth, ProxyConfig, ResigningMode,
    SignerEndpoint, SigningConfig, SigningConfigBuilder,
};
