//! Connection setup.
//!
//! Builds the `aws-sdk-s3` client every case talks through, and initialises
//! tracing once per process.

use std::sync::Once;

use aws_credential_types::Credentials;
use aws_sdk_s3::config::{
    BehaviorVersion, Region, RequestChecksumCalculation, ResponseChecksumValidation,
};
use tracing_subscriber::EnvFilter;

use crate::config::ConformanceConfig;

static INIT: Once = Once::new();

/// Initialize tracing (once).
///
/// `RUST_LOG` wins when set; otherwise the configured `log_level` is used.
/// Output goes through the test writer so `cargo test` captures it per case.
pub fn init_tracing(config: &ConformanceConfig) {
    let log_level = config.log_level.clone();
    INIT.call_once(move || {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&log_level))
            .unwrap_or_else(|_| EnvFilter::new("warn"));
        // Another subscriber may already be installed by the embedding binary.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Build an S3 client for the configured endpoint.
///
/// Flexible checksums are only sent when an operation requires them, so the
/// wire request carries exactly the headers a case sets.
///
/// # Examples
///
/// ```
/// use s3conform_core::{ConformanceConfig, build_client};
///
/// let client = build_client(&ConformanceConfig::default());
/// assert_eq!(
///     client.config().region().map(|r| r.as_ref()),
///     Some("us-east-1")
/// );
/// ```
#[must_use]
pub fn build_client(config: &ConformanceConfig) -> aws_sdk_s3::Client {
    let creds = Credentials::new(
        config.access_key.clone(),
        config.secret_key.clone(),
        None,
        None,
        "s3conform",
    );

    let sdk_config = aws_sdk_s3::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .credentials_provider(creds)
        .endpoint_url(config.endpoint_url.clone())
        .force_path_style(config.force_path_style)
        // Header cases control Content-MD5 and Content-Length themselves.
        .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
        .response_checksum_validation(ResponseChecksumValidation::WhenRequired)
        .build();

    tracing::debug!(
        endpoint = %config.endpoint_url,
        region = %config.region,
        path_style = config.force_path_style,
        "built s3 client"
    );

    aws_sdk_s3::Client::from_conf(sdk_config)
}

/// Create a client from the environment configuration, initialising tracing.
///
/// Configuration problems are logged once tracing is up.
#[must_use]
pub fn s3_client() -> aws_sdk_s3::Client {
    let (config, problems) = ConformanceConfig::from_env_lenient();
    init_tracing(&config);
    for problem in &problems {
        tracing::warn!(error = %problem, "invalid suite configuration, using default");
    }
    build_client(&config)
}
