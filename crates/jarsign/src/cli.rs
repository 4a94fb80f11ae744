//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use jarsign_core::{DigestAlgorithm, ProxyConfig, ResigningMode};

/// jarsign - Sign JAR build artifacts
#[derive(Parser, Debug)]
#[command(name = "jarsign")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only report errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to jarsign.yaml settings file
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign artifacts in place
    Sign(SignArgs),

    /// Report signature state and nested archives
    Inspect(InspectArgs),

    /// Show version information
    Version(VersionArgs),
}

#[derive(Args, Debug, Default)]
pub struct SignArgs {
    /// Artifacts to sign, main artifact first
    #[arg(required = true)]
    pub paths: Vec<Utf8PathBuf>,

    /// URL of the remote signing service
    #[arg(long, conflicts_with_all = ["jarsigner", "keystore"])]
    pub url: Option<String>,

    /// Local jarsigner executable
    #[arg(long)]
    pub jarsigner: Option<Utf8PathBuf>,

    /// Keystore for the local jarsigner
    #[arg(long)]
    pub keystore: Option<Utf8PathBuf>,

    /// Keystore password for the local jarsigner
    #[arg(long)]
    pub storepass: Option<String>,

    /// Key alias for the local jarsigner
    #[arg(long)]
    pub alias: Option<String>,

    /// Timestamping authority URL for the local jarsigner
    #[arg(long)]
    pub tsa: Option<String>,

    /// Retries after a failed signing attempt
    #[arg(long)]
    pub retry_limit: Option<u32>,

    /// Seconds to wait between signing attempts
    #[arg(long, value_name = "SECS")]
    pub retry_wait: Option<u64>,

    /// Keep signing the remaining artifacts after a failure
    #[arg(long)]
    pub continue_on_fail: bool,

    /// Do not sign archives nested inside the artifacts
    #[arg(long)]
    pub exclude_inner_jars: bool,

    /// Digest algorithm (SHA-1, SHA-224, SHA-256, SHA-384, SHA-512)
    #[arg(long, value_name = "NAME")]
    pub digest_alg: Option<DigestAlgorithm>,

    /// What to do with archives that are already signed
    #[arg(long, value_name = "MODE")]
    pub resign_mode: Option<ResigningMode>,

    /// Timeout of a single signing call in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// HTTP proxy as host:port
    #[arg(long, value_name = "HOST:PORT", value_parser = ProxyConfig::parse)]
    pub http_proxy: Option<ProxyConfig>,

    /// HTTPS proxy as host:port
    #[arg(long, value_name = "HOST:PORT", value_parser = ProxyConfig::parse)]
    pub https_proxy: Option<ProxyConfig>,

    /// Skip signing entirely
    #[arg(long)]
    pub skip: bool,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Archives to inspect
    #[arg(required = true)]
    pub paths: Vec<Utf8PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
