//! Settings file model and resolution
//!
//! [`JarsignSettings`] mirrors `jarsign.yaml`. Every field is optional so
//! that layers (file, environment, command line) can be merged before the
//! settings are resolved once into a [`SigningConfig`] and a
//! [`SignerEndpoint`].
//!
//! Legacy keys (`retryLimit`, `retryTimer`, `continueOnFail`) are still
//! accepted. Precedence between a legacy key and its current counterpart:
//!
//! 1. A current key that is set always wins.
//! 2. A legacy key applies only when the current key is absent.
//! 3. `continue-on-fail` and `continueOnFail` are OR-ed.

use crate::error::{Error, Result};
use crate::types::{
    DigestAlgorithm, LocalEndpoint, ProxyConfig, RemoteEndpoint, ResigningMode, SignerEndpoint,
    SigningConfig,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;
use url::Url;

/// Signing endpoint section of the settings file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SignerSettings {
    /// URL of the remote signing service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Multipart part name for the uploaded archive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_name: Option<String>,

    /// Path to a local jarsigner executable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jarsigner: Option<PathBuf>,

    /// Keystore used by the local jarsigner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keystore: Option<PathBuf>,

    /// Keystore password used by the local jarsigner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storepass: Option<String>,

    /// Key alias used by the local jarsigner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Timestamping authority URL passed to the local jarsigner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tsa: Option<String>,

    /// Timeout of a single signing call in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_proxy_host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_proxy_port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub https_proxy_host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub https_proxy_port: Option<u16>,
}

impl SignerSettings {
    /// Overlay values set in `other` on top of `self`
    fn merge(self, other: SignerSettings) -> SignerSettings {
        SignerSettings {
            url: other.url.or(self.url),
            part_name: other.part_name.or(self.part_name),
            jarsigner: other.jarsigner.or(self.jarsigner),
            keystore: other.keystore.or(self.keystore),
            storepass: other.storepass.or(self.storepass),
            alias: other.alias.or(self.alias),
            tsa: other.tsa.or(self.tsa),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            http_proxy_host: other.http_proxy_host.or(self.http_proxy_host),
            http_proxy_port: other.http_proxy_port.or(self.http_proxy_port),
            https_proxy_host: other.https_proxy_host.or(self.https_proxy_host),
            https_proxy_port: other.https_proxy_port.or(self.https_proxy_port),
        }
    }

    fn is_local(&self) -> bool {
        self.jarsigner.is_some() || self.keystore.is_some()
    }

    fn resolve(&self) -> Result<Option<SignerEndpoint>> {
        let http_proxy =
            ProxyConfig::from_parts(self.http_proxy_host.as_deref(), self.http_proxy_port)?;
        let https_proxy =
            ProxyConfig::from_parts(self.https_proxy_host.as_deref(), self.https_proxy_port)?;

        let endpoint = if let Some(url) = &self.url {
            if self.is_local() {
                return Err(Error::invalid_config(
                    "signer url and local jarsigner settings are mutually exclusive",
                ));
            }
            let mut remote = RemoteEndpoint::new(url)?;
            if let Some(part_name) = &self.part_name {
                remote.part_name = part_name.clone();
            }
            if let Some(secs) = self.timeout_secs {
                remote.timeout = Duration::from_secs(secs);
            }
            remote.http_proxy = http_proxy;
            remote.https_proxy = https_proxy;
            SignerEndpoint::Remote(remote)
        } else if self.is_local() {
            let keystore = self
                .keystore
                .clone()
                .ok_or_else(|| Error::missing_field("signer.keystore"))?;
            let alias = self
                .alias
                .clone()
                .ok_or_else(|| Error::missing_field("signer.alias"))?;
            let mut local =
                LocalEndpoint::new(keystore, self.storepass.clone().unwrap_or_default(), alias);
            if let Some(command) = &self.jarsigner {
                local.command = command.clone();
            }
            if let Some(tsa) = &self.tsa {
                local.tsa = Some(Url::parse(tsa).map_err(|e| {
                    Error::invalid_config(format!("invalid timestamping authority '{}': {}", tsa, e))
                })?);
            }
            if let Some(secs) = self.timeout_secs {
                local.timeout = Duration::from_secs(secs);
            }
            local.http_proxy = http_proxy;
            local.https_proxy = https_proxy;
            SignerEndpoint::Local(local)
        } else {
            return Ok(None);
        };

        endpoint.validated().map(Some)
    }
}

/// Contents of `jarsign.yaml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct JarsignSettings {
    /// Signing endpoint
    #[serde(default)]
    pub signer: SignerSettings,

    /// Number of retries after a failed signing attempt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_limit: Option<u32>,

    /// Seconds to wait between signing attempts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_wait_secs: Option<u64>,

    /// Keep signing the remaining artifacts after a failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continue_on_fail: Option<bool>,

    /// Do not sign archives nested inside the artifacts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_inner_jars: Option<bool>,

    /// Nested archive depth (0 or 1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u8>,

    /// Digest algorithm passed to the signer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest_alg: Option<DigestAlgorithm>,

    /// Strategy for archives that are already signed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resign_mode: Option<ResigningMode>,

    /// Skip signing entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<bool>,

    /// Legacy spelling of `retry-limit`
    #[serde(rename = "retryLimit", default, skip_serializing_if = "Option::is_none")]
    pub legacy_retry_limit: Option<u32>,

    /// Legacy spelling of `retry-wait-secs`
    #[serde(rename = "retryTimer", default, skip_serializing_if = "Option::is_none")]
    pub legacy_retry_timer: Option<u64>,

    /// Legacy spelling of `continue-on-fail`
    #[serde(rename = "continueOnFail", default, skip_serializing_if = "Option::is_none")]
    pub legacy_continue_on_fail: Option<bool>,
}

/// Settings after precedence rules have been applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub signing: SigningConfig,
    pub endpoint: Option<SignerEndpoint>,
    pub skip: bool,
}

impl JarsignSettings {
    /// Overlay values set in `other` on top of `self`
    pub fn merge(self, other: JarsignSettings) -> JarsignSettings {
        JarsignSettings {
            signer: self.signer.merge(other.signer),
            retry_limit: other.retry_limit.or(self.retry_limit),
            retry_wait_secs: other.retry_wait_secs.or(self.retry_wait_secs),
            continue_on_fail: other.continue_on_fail.or(self.continue_on_fail),
            exclude_inner_jars: other.exclude_inner_jars.or(self.exclude_inner_jars),
            max_depth: other.max_depth.or(self.max_depth),
            digest_alg: other.digest_alg.or(self.digest_alg),
            resign_mode: other.resign_mode.or(self.resign_mode),
            skip: other.skip.or(self.skip),
            legacy_retry_limit: other.legacy_retry_limit.or(self.legacy_retry_limit),
            legacy_retry_timer: other.legacy_retry_timer.or(self.legacy_retry_timer),
            legacy_continue_on_fail: other
                .legacy_continue_on_fail
                .or(self.legacy_continue_on_fail),
        }
    }

    /// Apply precedence rules and validate
    pub fn resolve(&self) -> Result<ResolvedSettings> {
        let retry_limit = prefer_current(
            "retry-limit",
            self.retry_limit,
            "retryLimit",
            self.legacy_retry_limit,
        );
        let retry_wait_secs = prefer_current(
            "retry-wait-secs",
            self.retry_wait_secs,
            "retryTimer",
            self.legacy_retry_timer,
        );
        if self.legacy_continue_on_fail.is_some() {
            warn!("'continueOnFail' is deprecated, use 'continue-on-fail' instead");
        }
        let continue_on_fail = self.continue_on_fail.unwrap_or(false)
            || self.legacy_continue_on_fail.unwrap_or(false);

        let max_depth = if self.exclude_inner_jars.unwrap_or(false) {
            Some(0)
        } else {
            self.max_depth
        };

        let mut builder = SigningConfig::builder()
            .continue_on_fail(continue_on_fail)
            .digest_algorithm(self.digest_alg);
        if let Some(limit) = retry_limit {
            builder = builder.retry_limit(limit);
        }
        if let Some(secs) = retry_wait_secs {
            builder = builder.retry_wait(Duration::from_secs(secs));
        }
        if let Some(depth) = max_depth {
            builder = builder.max_depth(depth);
        }
        if let Some(mode) = self.resign_mode {
            builder = builder.resigning(mode);
        }

        Ok(ResolvedSettings {
            signing: builder.build()?,
            endpoint: self.signer.resolve()?,
            skip: self.skip.unwrap_or(false),
        })
    }
}

fn prefer_current<T>(
    current_key: &str,
    current: Option<T>,
    legacy_key: &str,
    legacy: Option<T>,
) -> Option<T> {
    if legacy.is_some() {
        if current.is_some() {
            warn!(
                "'{}' is deprecated and ignored because '{}' is set",
                legacy_key, current_key
            );
        } else {
            warn!("'{}' is deprecated, use '{}' instead", legacy_key, current_key);
        }
    }
    current.or(legacy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NestingDepth;

    fn parse(yaml: &str) -> JarsignSettings {
        serde_yaml_ng::from_str(yaml).unwrap()
    }

    #[test]
    fn test_empty_settings_resolve_to_defaults() {
        let resolved = JarsignSettings::default().resolve().unwrap();
        assert_eq!(resolved.signing, SigningConfig::default());
        assert_eq!(resolved.endpoint, None);
        assert!(!resolved.skip);
    }

    #[test]
    fn test_parse_remote_settings() {
        let settings = parse(
            r#"
signer:
  url: "https://sign.example.org/jarsigner"
  timeout-secs: 60
  https-proxy-host: proxy.example.org
  https-proxy-port: 3128
retry-limit: 5
retry-wait-secs: 10
digest-alg: SHA-512
resign-mode: reject
"#,
        );
        let resolved = settings.resolve().unwrap();
        assert_eq!(resolved.signing.retry_limit(), 5);
        assert_eq!(resolved.signing.retry_wait(), Duration::from_secs(10));
        assert_eq!(resolved.signing.digest_algorithm(), Some(DigestAlgorithm::Sha512));
        assert_eq!(resolved.signing.resigning(), ResigningMode::Reject);

        match resolved.endpoint {
            Some(SignerEndpoint::Remote(remote)) => {
                assert_eq!(remote.url.as_str(), "https://sign.example.org/jarsigner");
                assert_eq!(remote.timeout, Duration::from_secs(60));
                assert_eq!(remote.https_proxy.unwrap().port(), 3128);
                assert!(remote.http_proxy.is_none());
            }
            other => panic!("expected remote endpoint, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_local_settings() {
        let settings = parse(
            r#"
signer:
  jarsigner: /opt/jdk/bin/jarsigner
  keystore: /secure/release.jks
  storepass: changeit
  alias: release
  tsa: "http://timestamp.example.org"
"#,
        );
        match settings.resolve().unwrap().endpoint {
            Some(SignerEndpoint::Local(local)) => {
                assert_eq!(local.command, PathBuf::from("/opt/jdk/bin/jarsigner"));
                assert_eq!(local.alias, "release");
                assert!(local.tsa.is_some());
            }
            other => panic!("expected local endpoint, got {:?}", other),
        }
    }

    #[test]
    fn test_proxy_host_without_port_is_rejected() {
        let settings = parse(
            r#"
signer:
  url: "https://sign.example.org/jarsigner"
  http-proxy-host: proxy.example.org
"#,
        );
        assert!(matches!(settings.resolve(), Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let settings = parse(
            r#"
signer:
  url: "https://sign.example.org/jarsigner"
  timeout-secs: 0
"#,
        );
        assert!(settings.resolve().is_err());
    }

    #[test]
    fn test_remote_and_local_are_exclusive() {
        let settings = parse(
            r#"
signer:
  url: "https://sign.example.org/jarsigner"
  keystore: /secure/release.jks
  alias: release
"#,
        );
        assert!(settings.resolve().is_err());
    }

    #[test]
    fn test_legacy_key_applies_when_current_absent() {
        let settings = parse("retryLimit: 7\nretryTimer: 5\n");
        let resolved = settings.resolve().unwrap();
        assert_eq!(resolved.signing.retry_limit(), 7);
        assert_eq!(resolved.signing.retry_wait(), Duration::from_secs(5));
    }

    #[test]
    fn test_current_key_wins_over_legacy_key() {
        let settings = parse("retryLimit: 7\nretry-limit: 2\nretryTimer: 5\nretry-wait-secs: 1\n");
        let resolved = settings.resolve().unwrap();
        assert_eq!(resolved.signing.retry_limit(), 2);
        assert_eq!(resolved.signing.retry_wait(), Duration::from_secs(1));
    }

    #[test]
    fn test_continue_on_fail_keys_are_ored() {
        let legacy_only = parse("continueOnFail: true\ncontinue-on-fail: false\n");
        assert!(legacy_only.resolve().unwrap().signing.continue_on_fail());

        let neither = parse("continueOnFail: false\n");
        assert!(!neither.resolve().unwrap().signing.continue_on_fail());
    }

    #[test]
    fn test_exclude_inner_jars_wins_over_max_depth() {
        let settings = parse("exclude-inner-jars: true\nmax-depth: 1\n");
        assert_eq!(
            settings.resolve().unwrap().signing.max_depth(),
            NestingDepth::Ignore
        );

        let explicit = parse("max-depth: 0\n");
        assert_eq!(
            explicit.resolve().unwrap().signing.max_depth(),
            NestingDepth::Ignore
        );

        let too_deep = parse("max-depth: 3\n");
        assert!(too_deep.resolve().is_err());
    }

    #[test]
    fn test_unknown_digest_is_a_parse_error() {
        let result: std::result::Result<JarsignSettings, _> =
            serde_yaml_ng::from_str("digest-alg: MD5\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_prefers_overlay() {
        let base = parse("retry-limit: 1\nskip: true\nsigner:\n  url: https://a.example.org/sign\n");
        let overlay = parse("retry-limit: 4\nsigner:\n  timeout-secs: 30\n");
        let merged = base.merge(overlay);
        assert_eq!(merged.retry_limit, Some(4));
        assert_eq!(merged.skip, Some(true));
        assert_eq!(merged.signer.url.as_deref(), Some("https://a.example.org/sign"));
        assert_eq!(merged.signer.timeout_secs, Some(30));
    }
}
