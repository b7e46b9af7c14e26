//! s3conform-sweep - delete every bucket an s3conform run left behind.
//!
//! Cases clean up after themselves, but a panicking case can orphan its
//! buckets. This binary lists the service's buckets and removes every one
//! whose name starts with the suite prefix, objects and in-progress uploads
//! included.
//!
//! # Usage
//!
//! ```text
//! s3conform-sweep --endpoint-url http://localhost:9000 --dry-run
//! s3conform-sweep --prefix s3conform-1a2b3c4d-
//! ```
//!
//! Connection settings come from the same environment variables the suite
//! reads (`S3_ENDPOINT_URL`, `S3_ACCESS_KEY`, ...); flags override them.

use anyhow::{Context, Result};
use clap::Parser;
use s3conform_core::fixtures::bucket_exists;
use s3conform_core::teardown::{cleanup_bucket, prefixed_buckets};
use s3conform_core::{ConformanceConfig, build_client};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, clap::Parser)]
#[command(name = "s3conform-sweep")]
#[command(about = "Delete buckets left behind by s3conform runs", long_about = None)]
struct Args {
    /// Bucket name prefix to sweep (defaults to `S3_BUCKET_PREFIX`)
    #[arg(long)]
    prefix: Option<String>,

    /// Endpoint of the service (defaults to `S3_ENDPOINT_URL`)
    #[arg(long)]
    endpoint_url: Option<String>,

    /// Only print the buckets that would be removed
    #[arg(long)]
    dry_run: bool,
}

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Resolve the sweep configuration from `env`, with flags taking precedence.
///
/// Any invalid value is an error: the sweep never falls back to a default
/// endpoint or prefix.
fn resolve_config(
    args: &Args,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ConformanceConfig> {
    let lookup = |name: &str| match name {
        "S3_BUCKET_PREFIX" if args.prefix.is_some() => args.prefix.clone(),
        "S3_ENDPOINT_URL" if args.endpoint_url.is_some() => args.endpoint_url.clone(),
        _ => env(name),
    };
    ConformanceConfig::from_lookup(lookup).context("invalid sweep configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = resolve_config(&args, |name| std::env::var(name).ok())?;
    init_tracing(&config.log_level)?;

    info!(
        endpoint = %config.endpoint_url,
        prefix = %config.bucket_prefix,
        dry_run = args.dry_run,
        "starting sweep"
    );

    let client = build_client(&config);
    let targets = prefixed_buckets(&client, &config.bucket_prefix)
        .await
        .with_context(|| format!("failed to list buckets at {}", config.endpoint_url))?;

    for bucket in &targets {
        if args.dry_run {
            println!("would remove {bucket}");
        } else {
            cleanup_bucket(&client, bucket).await;
            if bucket_exists(&client, bucket).await {
                warn!(bucket, "bucket survived cleanup");
            } else {
                println!("removed {bucket}");
            }
        }
    }

    info!(count = targets.len(), "sweep finished");
    Ok(())
}
