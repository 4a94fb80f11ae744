//! Layered settings loader
//!
//! Loads settings from the following sources (low to high precedence):
//! 1. Built-in defaults
//! 2. Settings file (`jarsign.yaml` or `jarsign.yml` in the working directory,
//!    or an explicit path)
//! 3. Environment variables (`JARSIGN_*` prefix)
//! 4. CLI flags (merged by the caller)

use super::settings::JarsignSettings;
use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

/// File names searched in the working directory, in order
pub const CONFIG_FILE_NAMES: &[&str] = &["jarsign.yaml", "jarsign.yml"];

/// Settings loader rooted at a working directory
pub struct ConfigLoader {
    working_dir: Utf8PathBuf,
}

impl ConfigLoader {
    /// Create a loader that searches `working_dir` for a settings file
    pub fn new(working_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    /// Create a loader rooted at the current directory
    pub fn from_current_dir() -> Result<Self> {
        let cwd = env::current_dir()?;
        let cwd = Utf8PathBuf::from_path_buf(cwd).map_err(|p| {
            Error::invalid_config(format!(
                "working directory is not valid UTF-8: {}",
                p.display()
            ))
        })?;
        Ok(Self::new(cwd))
    }

    /// Locate the settings file in the working directory
    pub fn find_config_file(&self) -> Option<Utf8PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| self.working_dir.join(name))
            .find(|path| path.is_file())
    }

    /// Load settings from file and environment
    ///
    /// An explicit `path` must exist. Without one the working directory is
    /// searched and a missing file leaves the defaults in place.
    pub fn load(&self, path: Option<&Utf8Path>) -> Result<JarsignSettings> {
        let file = match path {
            Some(path) if !path.is_file() => {
                return Err(Error::config_not_found(path.as_str()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => self.find_config_file(),
        };

        let settings = match file {
            Some(file) => {
                debug!("Loading settings from {}", file);
                Self::load_yaml_file(&file)?
            }
            None => {
                debug!("No settings file in {}, using defaults", self.working_dir);
                JarsignSettings::default()
            }
        };

        apply_env_overrides(settings)
    }

    fn load_yaml_file(path: &Utf8Path) -> Result<JarsignSettings> {
        let content = fs::read_to_string(path)?;
        serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))
    }
}

fn env_parse<T: FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(val) => val
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::invalid_config(format!("{} has an invalid value '{}'", name, val))),
        Err(_) => Ok(None),
    }
}

fn env_bool(name: &str) -> Result<Option<bool>> {
    match env::var(name) {
        Ok(val) => match val.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(Some(true)),
            "0" | "false" | "no" => Ok(Some(false)),
            _ => Err(Error::invalid_config(format!(
                "{} must be true or false, got '{}'",
                name, val
            ))),
        },
        Err(_) => Ok(None),
    }
}

/// Apply `JARSIGN_*` environment variable overrides
fn apply_env_overrides(mut settings: JarsignSettings) -> Result<JarsignSettings> {
    if let Ok(val) = env::var("JARSIGN_SIGNER_URL") {
        settings.signer.url = Some(val);
    }
    if let Some(secs) = env_parse("JARSIGN_TIMEOUT_SECS")? {
        settings.signer.timeout_secs = Some(secs);
    }
    if let Ok(val) = env::var("JARSIGN_KEYSTORE") {
        settings.signer.keystore = Some(PathBuf::from(val));
    }
    if let Ok(val) = env::var("JARSIGN_STOREPASS") {
        settings.signer.storepass = Some(val);
    }
    if let Ok(val) = env::var("JARSIGN_ALIAS") {
        settings.signer.alias = Some(val);
    }

    if let Some(limit) = env_parse("JARSIGN_RETRY_LIMIT")? {
        settings.retry_limit = Some(limit);
    }
    if let Some(secs) = env_parse("JARSIGN_RETRY_WAIT_SECS")? {
        settings.retry_wait_secs = Some(secs);
    }
    if let Some(flag) = env_bool("JARSIGN_CONTINUE_ON_FAIL")? {
        settings.continue_on_fail = Some(flag);
    }
    if let Some(flag) = env_bool("JARSIGN_EXCLUDE_INNER_JARS")? {
        settings.exclude_inner_jars = Some(flag);
    }
    if let Some(alg) = env_parse("JARSIGN_DIGEST_ALG")? {
        settings.digest_alg = Some(alg);
    }
    if let Some(mode) = env_parse("JARSIGN_RESIGN_MODE")? {
        settings.resign_mode = Some(mode);
    }
    if let Some(flag) = env_bool("JARSIGN_SKIP")? {
        settings.skip = Some(flag);
    }

    Ok(settings)
}
