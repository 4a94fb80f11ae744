//! Type definitions for jarsign

pub mod artifact;
pub mod endpoint;
pub mod signing_config;

pub use artifact::{has_archive_extension, Artifact, ArtifactKind, ARCHIVE_EXTENSION};
pub use endpoint::{
    LocalEndpoint, ProxyConfig, RemoteEndpoint, SignerEndpoint, DEFAULT_PART_NAME,
    DEFAULT_SIGNING_TIMEOUT_SECS,
};
pub use signing_config::{
    DigestAlgorithm, NestingDepth, ResigningMode, SigningConfig, SigningConfigBuilder,
    DEFAULT_RETRY_LIMIT, DEFAULT_RETRY_WAIT_SECS,
};
