//! Suite configuration.
//!
//! Provides [`ConformanceConfig`], which tells the suite where the service
//! under test lives, which credentials to sign with, and which bucket prefix
//! marks the buckets a run owns. Values are loaded from environment
//! variables.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::{Error, Result};
use crate::naming::validate_prefix;

/// Default endpoint of the service under test.
pub const DEFAULT_ENDPOINT_URL: &str = "http://localhost:4566";

/// Default prefix for every bucket created by the suite.
pub const DEFAULT_BUCKET_PREFIX: &str = "s3conform-";

/// Connection and run settings for the conformance suite.
///
/// # Examples
///
/// ```
/// use s3conform_core::config::ConformanceConfig;
///
/// let config = ConformanceConfig::default();
/// assert_eq!(config.endpoint_url, "http://localhost:4566");
/// assert!(config.force_path_style);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct ConformanceConfig {
    /// Base URL of the S3-compatible service.
    #[builder(default = String::from(DEFAULT_ENDPOINT_URL))]
    pub endpoint_url: String,

    /// Region used for signing.
    #[builder(default = String::from("us-east-1"))]
    pub region: String,

    /// Access key id.
    #[builder(default = String::from("test"))]
    pub access_key: String,

    /// Secret access key.
    #[builder(default = String::from("test"))]
    pub secret_key: String,

    /// Prefix of every bucket name the suite creates.
    #[builder(default = String::from(DEFAULT_BUCKET_PREFIX))]
    pub bucket_prefix: String,

    /// Address buckets as `endpoint/bucket` instead of `bucket.endpoint`.
    #[builder(default = true)]
    pub force_path_style: bool,

    /// KMS key id for SSE-KMS cases. The cases skip when unset.
    #[builder(default)]
    pub sse_kms_key_id: Option<String>,

    /// Whether the service supports SSE-C. The cases skip when disabled.
    #[builder(default = false)]
    pub sse_c: bool,

    /// Log level filter used when `RUST_LOG` is not set.
    #[builder(default = String::from("warn"))]
    pub log_level: String,
}

impl Default for ConformanceConfig {
    fn default() -> Self {
        Self {
            endpoint_url: String::from(DEFAULT_ENDPOINT_URL),
            region: String::from("us-east-1"),
            access_key: String::from("test"),
            secret_key: String::from("test"),
            bucket_prefix: String::from(DEFAULT_BUCKET_PREFIX),
            force_path_style: true,
            sse_kms_key_id: None,
            sse_c: false,
            log_level: String::from("warn"),
        }
    }
}

impl ConformanceConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `S3_ENDPOINT_URL` | `http://localhost:4566` |
    /// | `S3_REGION` | `us-east-1` |
    /// | `S3_ACCESS_KEY` / `AWS_ACCESS_KEY_ID` | `test` |
    /// | `S3_SECRET_KEY` / `AWS_SECRET_ACCESS_KEY` | `test` |
    /// | `S3_BUCKET_PREFIX` | `s3conform-` |
    /// | `S3_FORCE_PATH_STYLE` | `true` |
    /// | `S3_SSE_KMS_KEY_ID` | *(unset)* |
    /// | `S3_ENABLE_SSE_C` | `false` |
    /// | `LOG_LEVEL` | `warn` |
    ///
    /// An invalid endpoint or prefix falls back to its default and is
    /// reported with a warning; every other variable keeps its value.
    #[must_use]
    pub fn from_env() -> Self {
        let (config, problems) = Self::from_env_lenient();
        for problem in &problems {
            tracing::warn!(error = %problem, "invalid suite configuration, using default");
        }
        config
    }

    /// Like [`ConformanceConfig::from_env`], but hands the rejected values
    /// back to the caller instead of logging them.
    #[must_use]
    pub fn from_env_lenient() -> (Self, Vec<Error>) {
        Self::from_lookup_lenient(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// Fails on the first invalid value.
    ///
    /// # Examples
    ///
    /// ```
    /// use s3conform_core::config::ConformanceConfig;
    ///
    /// let config = ConformanceConfig::from_lookup(|name| match name {
    ///     "S3_BUCKET_PREFIX" => Some("nightly-".to_owned()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(config.bucket_prefix, "nightly-");
    /// ```
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config = Self::read(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from a lookup, replacing only the invalid
    /// fields with their defaults.
    ///
    /// Returns the configuration together with one error per replaced field.
    pub fn from_lookup_lenient(lookup: impl Fn(&str) -> Option<String>) -> (Self, Vec<Error>) {
        let mut config = Self::read(lookup);
        let mut problems = Vec::new();

        if let Err(e) = validate_endpoint(&config.endpoint_url) {
            problems.push(e);
            config.endpoint_url = String::from(DEFAULT_ENDPOINT_URL);
        }
        if let Err(e) = validate_prefix(&config.bucket_prefix) {
            problems.push(e);
            config.bucket_prefix = String::from(DEFAULT_BUCKET_PREFIX);
        }

        (config, problems)
    }

    fn read(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("S3_ENDPOINT_URL") {
            config.endpoint_url = v;
        }
        if let Some(v) = lookup("S3_REGION") {
            config.region = v;
        }
        if let Some(v) = lookup("S3_ACCESS_KEY").or_else(|| lookup("AWS_ACCESS_KEY_ID")) {
            config.access_key = v;
        }
        if let Some(v) = lookup("S3_SECRET_KEY").or_else(|| lookup("AWS_SECRET_ACCESS_KEY")) {
            config.secret_key = v;
        }
        if let Some(v) = lookup("S3_BUCKET_PREFIX") {
            config.bucket_prefix = v.to_ascii_lowercase();
        }
        if let Some(v) = lookup("S3_FORCE_PATH_STYLE") {
            config.force_path_style = parse_bool(&v);
        }
        if let Some(v) = lookup("S3_SSE_KMS_KEY_ID") {
            if !v.is_empty() {
                config.sse_kms_key_id = Some(v);
            }
        }
        if let Some(v) = lookup("S3_ENABLE_SSE_C") {
            config.sse_c = parse_bool(&v);
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// Check that the configuration can drive a run.
    pub fn validate(&self) -> Result<()> {
        validate_endpoint(&self.endpoint_url)?;
        validate_prefix(&self.bucket_prefix)
    }
}

fn validate_endpoint(endpoint_url: &str) -> Result<()> {
    if endpoint_url.is_empty() {
        return Err(Error::Config("endpoint url must not be empty".to_owned()));
    }
    if !endpoint_url.starts_with("http://") && !endpoint_url.starts_with("https://") {
        return Err(Error::Config(format!(
            "endpoint url must start with http:// or https://: {endpoint_url}"
        )));
    }
    Ok(())
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
