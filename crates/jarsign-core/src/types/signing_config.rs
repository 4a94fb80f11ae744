//! Signing configuration
//!
//! [`SigningConfig`] is an immutable bundle of the values the signing
//! pipeline needs. It can only be obtained through [`SigningConfigBuilder`],
//! whose `build` step rejects invalid values with a configuration error.

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default number of retries after a failed signing attempt
pub const DEFAULT_RETRY_LIMIT: u32 = 3;

/// Default number of seconds to wait between signing attempts
pub const DEFAULT_RETRY_WAIT_SECS: u64 = 30;

/// How deep nested archives are handled
///
/// Only two levels exist: nested archives are either left alone or signed
/// at the first level. Archives nested deeper are never touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NestingDepth {
    /// Do not touch nested archives
    Ignore,
    /// Sign archives found directly inside the artifact
    #[default]
    FirstLevel,
}

impl NestingDepth {
    /// Convert a numeric depth (0 or 1)
    pub fn from_depth(depth: u8) -> Result<Self> {
        match depth {
            0 => Ok(NestingDepth::Ignore),
            1 => Ok(NestingDepth::FirstLevel),
            other => Err(Error::invalid_config(format!(
                "max depth must be 0 or 1, got {}",
                other
            ))),
        }
    }

    /// Numeric depth
    pub fn depth(self) -> u8 {
        match self {
            NestingDepth::Ignore => 0,
            NestingDepth::FirstLevel => 1,
        }
    }
}

/// Digest algorithm passed through to the signing primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DigestAlgorithm {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl DigestAlgorithm {
    /// Standard JCA name of the algorithm
    pub fn standard_name(self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "SHA-1",
            DigestAlgorithm::Sha224 => "SHA-224",
            DigestAlgorithm::Sha256 => "SHA-256",
            DigestAlgorithm::Sha384 => "SHA-384",
            DigestAlgorithm::Sha512 => "SHA-512",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.standard_name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "");
        match normalized.as_str() {
            "SHA1" => Ok(DigestAlgorithm::Sha1),
            "SHA224" => Ok(DigestAlgorithm::Sha224),
            "SHA256" => Ok(DigestAlgorithm::Sha256),
            "SHA384" => Ok(DigestAlgorithm::Sha384),
            "SHA512" => Ok(DigestAlgorithm::Sha512),
            _ => Err(Error::unknown_digest_algorithm(s)),
        }
    }
}

impl TryFrom<String> for DigestAlgorithm {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DigestAlgorithm> for String {
    fn from(value: DigestAlgorithm) -> Self {
        value.standard_name().to_string()
    }
}

/// What to do with an archive that is already signed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResigningMode {
    /// Sign again; the new signature supersedes the existing one
    #[default]
    Resign,
    /// Fail without calling the signing primitive
    Reject,
    /// Leave the archive unchanged and report success
    Ignore,
    /// Remove the existing signature, then sign
    Overwrite,
}

impl fmt::Display for ResigningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResigningMode::Resign => "resign",
            ResigningMode::Reject => "reject",
            ResigningMode::Ignore => "ignore",
            ResigningMode::Overwrite => "overwrite",
        };
        f.write_str(name)
    }
}

impl FromStr for ResigningMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resign" => Ok(ResigningMode::Resign),
            "reject" => Ok(ResigningMode::Reject),
            "ignore" => Ok(ResigningMode::Ignore),
            "overwrite" => Ok(ResigningMode::Overwrite),
            other => Err(Error::invalid_config(format!(
                "unknown resigning mode '{}'. Valid modes: resign, reject, ignore, overwrite",
                other
            ))),
        }
    }
}

/// Immutable signing configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningConfig {
    retry_limit: u32,
    retry_wait: Duration,
    max_depth: NestingDepth,
    continue_on_fail: bool,
    digest_algorithm: Option<DigestAlgorithm>,
    resigning: ResigningMode,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            retry_limit: DEFAULT_RETRY_LIMIT,
            retry_wait: Duration::from_secs(DEFAULT_RETRY_WAIT_SECS),
            max_depth: NestingDepth::default(),
            continue_on_fail: false,
            digest_algorithm: None,
            resigning: ResigningMode::default(),
        }
    }
}

impl SigningConfig {
    /// Start building a configuration from the defaults
    pub fn builder() -> SigningConfigBuilder {
        SigningConfigBuilder::default()
    }

    /// Number of retries after the first failed attempt
    pub fn retry_limit(&self) -> u32 {
        self.retry_limit
    }

    /// Fixed wait between attempts
    pub fn retry_wait(&self) -> Duration {
        self.retry_wait
    }

    /// Nested archive handling
    pub fn max_depth(&self) -> NestingDepth {
        self.max_depth
    }

    /// Whether a failure lets the batch carry on
    pub fn continue_on_fail(&self) -> bool {
        self.continue_on_fail
    }

    /// Digest algorithm, if one was chosen
    pub fn digest_algorithm(&self) -> Option<DigestAlgorithm> {
        self.digest_algorithm
    }

    /// Strategy for already-signed archives
    pub fn resigning(&self) -> ResigningMode {
        self.resigning
    }

    /// Retry policy derived from the retry limit and wait
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_limit, self.retry_wait)
    }
}

/// Builder for [`SigningConfig`]
#[derive(Debug, Clone, Default)]
pub struct SigningConfigBuilder {
    retry_limit: Option<u32>,
    retry_wait: Option<Duration>,
    max_depth: Option<u8>,
    continue_on_fail: bool,
    digest_algorithm: Option<DigestAlgorithm>,
    resigning: Option<ResigningMode>,
}

impl SigningConfigBuilder {
    /// Set the number of retries
    pub fn retry_limit(mut self, retry_limit: u32) -> Self {
        self.retry_limit = Some(retry_limit);
        self
    }

    /// Set the wait between attempts
    pub fn retry_wait(mut self, retry_wait: Duration) -> Self {
        self.retry_wait = Some(retry_wait);
        self
    }

    /// Set the nested archive depth (0 or 1)
    pub fn max_depth(mut self, max_depth: u8) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Let failures be absorbed instead of aborting the batch
    pub fn continue_on_fail(mut self, continue_on_fail: bool) -> Self {
        self.continue_on_fail = continue_on_fail;
        self
    }

    /// Set the digest algorithm
    pub fn digest_algorithm(mut self, digest_algorithm: Option<DigestAlgorithm>) -> Self {
        self.digest_algorithm = digest_algorithm;
        self
    }

    /// Set the strategy for already-signed archives
    pub fn resigning(mut self, resigning: ResigningMode) -> Self {
        self.resigning = Some(resigning);
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> Result<SigningConfig> {
        let defaults = SigningConfig::default();

        let max_depth = match self.max_depth {
            Some(depth) => NestingDepth::from_depth(depth)?,
            None => defaults.max_depth,
        };

        Ok(SigningConfig {
            retry_limit: self.retry_limit.unwrap_or(defaults.retry_limit),
            retry_wait: self.retry_wait.unwrap_or(defaults.retry_wait),
            max_depth,
            continue_on_fail: self.continue_on_fail,
            digest_algorithm: self.digest_algorithm,
            resigning: self.resigning.unwrap_or(defaults.resigning),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SigningConfig::builder().build().unwrap();
        assert_eq!(config.retry_limit(), 3);
        assert_eq!(config.retry_wait(), Duration::from_secs(30));
        assert_eq!(config.max_depth(), NestingDepth::FirstLevel);
        assert!(!config.continue_on_fail());
        assert_eq!(config.digest_algorithm(), None);
        assert_eq!(config.resigning(), ResigningMode::Resign);
    }

    #[test]
    fn test_builder_overrides() {
        let config = SigningConfig::builder()
            .retry_limit(0)
            .retry_wait(Duration::from_secs(5))
            .max_depth(0)
            .continue_on_fail(true)
            .digest_algorithm(Some(DigestAlgorithm::Sha256))
            .resigning(ResigningMode::Ignore)
            .build()
            .unwrap();

        assert_eq!(config.retry_limit(), 0);
        assert_eq!(config.retry_wait(), Duration::from_secs(5));
        assert_eq!(config.max_depth(), NestingDepth::Ignore);
        assert!(config.continue_on_fail());
        assert_eq!(config.digest_algorithm(), Some(DigestAlgorithm::Sha256));
        assert_eq!(config.resigning(), ResigningMode::Ignore);
    }

    #[test]
    fn test_depth_beyond_first_level_is_rejected() {
        let err = SigningConfig::builder().max_depth(2).build().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn test_retry_policy_from_config() {
        let config = SigningConfig::builder()
            .retry_limit(2)
            .retry_wait(Duration::from_millis(10))
            .build()
            .unwrap();
        let policy = config.retry_policy();
        assert_eq!(policy.retry_limit(), 2);
        assert_eq!(policy.wait(), Duration::from_millis(10));
    }

    #[test]
    fn test_digest_algorithm_parsing() {
        assert_eq!("SHA-256".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha256);
        assert_eq!("sha512".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha512);
        assert_eq!("Sha-1".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha1);
        assert!(matches!(
            "MD5".parse::<DigestAlgorithm>(),
            Err(Error::UnknownDigestAlgorithm { .. })
        ));
        assert_eq!(DigestAlgorithm::Sha384.to_string(), "SHA-384");
    }

    #[test]
    fn test_resigning_mode_parsing() {
        assert_eq!("reject".parse::<ResigningMode>().unwrap(), ResigningMode::Reject);
        assert_eq!("Overwrite".parse::<ResigningMode>().unwrap(), ResigningMode::Overwrite);
        assert!("skip".parse::<ResigningMode>().is_err());
        assert_eq!(ResigningMode::Ignore.to_string(), "ignore");
    }
}
