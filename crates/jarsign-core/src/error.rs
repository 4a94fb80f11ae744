//! Error types for jarsign-core

use thiserror::Error;

/// Result type alias using jarsign-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration errors.
///
/// These are raised while assembling a [`crate::SigningConfig`], before any
/// artifact is processed.
#[derive(Error, Debug)]
pub enum Error {
    /// Settings file not found
    #[error("Settings file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration value or combination of values
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Unknown digest algorithm name
    #[error("Unknown digest algorithm: {name}. Valid algorithms: SHA-1, SHA-224, SHA-256, SHA-384, SHA-512")]
    UnknownDigestAlgorithm { name: String },
}

impl Error {
    /// Create a settings file not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an unknown digest algorithm error
    pub fn unknown_digest_algorithm(name: impl Into<String>) -> Self {
        Self::UnknownDigestAlgorithm { name: name.into() }
    }
}
