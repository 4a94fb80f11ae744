//! Sign command
//!
//! Settings are layered as defaults, `jarsign.yaml`, `JARSIGN_*` variables,
//! then the flags given here. Artifacts are signed in the order given.

use crate::cli::SignArgs;
use crate::output;
use anyhow::{anyhow, bail, Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use jarsign_core::config::SignerSettings;
use jarsign_core::{Artifact, ConfigLoader, JarsignSettings, ProxyConfig};
use jarsign_signer::{
    primitive_for, ArtifactStatus, BatchResult, BatchVerdict, SigningOrchestrator, SigningResult,
};
use tracing::{info, warn};

pub async fn run(args: SignArgs, config: Option<&Utf8Path>) -> Result<()> {
    let loader = ConfigLoader::from_current_dir()?;
    let settings = loader.load(config).context("Failed to load settings")?;
    let resolved = apply_overrides(settings, &args)
        .resolve()
        .context("Invalid signing configuration")?;

    if resolved.skip {
        info!("Skipping jar signing");
        return Ok(());
    }

    let artifacts = enumerate_artifacts(&args.paths);
    if artifacts.is_empty() {
        output::warning("No artifacts to sign");
        return Ok(());
    }

    let endpoint = resolved.endpoint.ok_or_else(|| {
        anyhow!("No signer configured: pass --url, or --keystore and --alias for a local jarsigner")
    })?;
    let primitive = primitive_for(&endpoint).context("Failed to set up the signer")?;
    info!("Signing {} artifacts with {}", artifacts.len(), primitive.describe());

    let orchestrator = SigningOrchestrator::new(primitive, resolved.signing);
    let batch = orchestrator.run(&artifacts).await;
    render(&batch);

    match batch.verdict() {
        BatchVerdict::AllSucceeded => Ok(()),
        BatchVerdict::PartialFailure => bail!(
            "{} of {} archives failed to sign ({} nested archives left unsigned)",
            batch.failure_count(),
            batch.results().count(),
            batch.nested_failure_count()
        ),
        BatchVerdict::Aborted => match batch.terminal_error() {
            Some(failure) => bail!("Signing aborted: {}", failure),
            None => bail!("Signing aborted"),
        },
    }
}

/// Overlay command-line flags on loaded settings
///
/// Choosing a signer on the command line discards the other kind of
/// signer configured in the file.
fn apply_overrides(mut settings: JarsignSettings, args: &SignArgs) -> JarsignSettings {
    if args.url.is_some() {
        settings.signer.jarsigner = None;
        settings.signer.keystore = None;
        settings.signer.storepass = None;
        settings.signer.alias = None;
        settings.signer.tsa = None;
    } else if args.keystore.is_some() || args.jarsigner.is_some() {
        settings.signer.url = None;
        settings.signer.part_name = None;
    }

    let (http_proxy_host, http_proxy_port) = proxy_parts(args.http_proxy.as_ref());
    let (https_proxy_host, https_proxy_port) = proxy_parts(args.https_proxy.as_ref());

    let overrides = JarsignSettings {
        signer: SignerSettings {
            url: args.url.clone(),
            part_name: None,
            jarsigner: args.jarsigner.clone().map(Utf8PathBuf::into_std_path_buf),
            keystore: args.keystore.clone().map(Utf8PathBuf::into_std_path_buf),
            storepass: args.storepass.clone(),
            alias: args.alias.clone(),
            tsa: args.tsa.clone(),
            timeout_secs: args.timeout,
            http_proxy_host,
            http_proxy_port,
            https_proxy_host,
            https_proxy_port,
        },
        retry_limit: args.retry_limit,
        retry_wait_secs: args.retry_wait,
        continue_on_fail: args.continue_on_fail.then_some(true),
        exclude_inner_jars: args.exclude_inner_jars.then_some(true),
        digest_alg: args.digest_alg,
        resign_mode: args.resign_mode,
        skip: args.skip.then_some(true),
        ..Default::default()
    };

    settings.merge(overrides)
}

fn proxy_parts(proxy: Option<&ProxyConfig>) -> (Option<String>, Option<u16>) {
    match proxy {
        Some(proxy) => (Some(proxy.host().to_string()), Some(proxy.port())),
        None => (None, None),
    }
}

/// Turn paths into artifacts, dropping the ones that do not exist
fn enumerate_artifacts(paths: &[Utf8PathBuf]) -> Vec<Artifact> {
    paths
        .iter()
        .filter_map(|path| {
            if path.exists() {
                Some(Artifact::new(path.as_std_path()))
            } else {
                warn!("Can't find associated file {}, skipping", path);
                None
            }
        })
        .collect()
}

fn render(batch: &BatchResult) {
    output::header("Signing report");

    for report in batch.reports() {
        match &report.status {
            ArtifactStatus::Skipped => {
                output::info(&format!("{} skipped (not a jar)", report.artifact));
            }
            ArtifactStatus::Completed(SigningResult::Success {
                path,
                inner_failures,
            }) => {
                if inner_failures.is_empty() {
                    output::success(&format!("{} signed", path.display()));
                } else {
                    output::warning(&format!(
                        "{} signed, {} nested archives left unsigned",
                        path.display(),
                        inner_failures.len()
                    ));
                }
                for nested in inner_failures {
                    output::error(&format!("{} failed: {}", nested.entry, nested.failure));
                }
            }
            ArtifactStatus::Completed(SigningResult::Failure(failure)) => {
                output::error(&format!("{} failed: {}", report.artifact, failure));
                if let Some(diagnostic) = failure.cause.diagnostic() {
                    output::block(diagnostic);
                }
            }
        }
    }

    println!();
    output::kv("signed", &batch.success_count().to_string());
    output::kv("skipped", &batch.skipped_count().to_string());
    output::kv("failed", &batch.failure_count().to_string());
}
