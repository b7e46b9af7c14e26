//! Bucket naming.
//!
//! Every bucket the suite creates is named `<prefix><run-id>-<seq>`: the
//! configured prefix marks it as suite-owned, the run id separates
//! concurrent runs against one service, and the sequence number keeps names
//! unique within a run. Names follow the
//! [Amazon S3 bucket naming rules](https://docs.aws.amazon.com/AmazonS3/latest/userguide/bucketnamingrules.html).

use std::net::Ipv4Addr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::config::ConformanceConfig;
use crate::error::{Error, Result};

/// Minimum bucket name length.
const MIN_BUCKET_NAME_LEN: usize = 3;

/// Maximum bucket name length.
const MAX_BUCKET_NAME_LEN: usize = 63;

/// Maximum prefix length; leaves room for the run id and sequence number.
pub const MAX_PREFIX_LEN: usize = 40;

/// Length of the per-run id embedded in every name.
const RUN_ID_LEN: usize = 8;

/// Generates unique bucket names under a fixed prefix.
///
/// # Examples
///
/// ```
/// use s3conform_core::naming::BucketNamer;
///
/// let namer = BucketNamer::new("s3conform-").unwrap();
/// let a = namer.next();
/// let b = namer.next();
/// assert_ne!(a, b);
/// assert!(a.starts_with("s3conform-"));
/// ```
#[derive(Debug)]
pub struct BucketNamer {
    run_prefix: String,
    seq: AtomicU32,
}

impl BucketNamer {
    /// Create a namer with a fresh run id.
    pub fn new(prefix: &str) -> Result<Self> {
        validate_prefix(prefix)?;
        let run_id = uuid::Uuid::new_v4().simple().to_string()[..RUN_ID_LEN].to_owned();
        Ok(Self {
            run_prefix: format!("{prefix}{run_id}-"),
            seq: AtomicU32::new(0),
        })
    }

    /// The prefix shared by every name of this run (`<prefix><run-id>-`).
    #[must_use]
    pub fn run_prefix(&self) -> &str {
        &self.run_prefix
    }

    /// Produce the next bucket name.
    #[must_use]
    pub fn next(&self) -> String {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        format!("{}{seq}", self.run_prefix)
    }
}

fn global_namer() -> &'static BucketNamer {
    static NAMER: OnceLock<BucketNamer> = OnceLock::new();
    NAMER.get_or_init(|| {
        let config = ConformanceConfig::from_env();
        BucketNamer::new(&config.bucket_prefix).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default bucket prefix");
            BucketNamer::new(crate::config::DEFAULT_BUCKET_PREFIX)
                .unwrap_or_else(|e| unreachable!("default prefix is valid: {e}"))
        })
    })
}

/// Next bucket name from the process-wide namer.
#[must_use]
pub fn bucket_name() -> String {
    global_namer().next()
}

/// Prefix shared by every bucket this process names.
#[must_use]
pub fn run_prefix() -> &'static str {
    global_namer().run_prefix()
}

/// Validate a bucket name prefix.
///
/// A prefix must be non-empty, at most [`MAX_PREFIX_LEN`] characters, use
/// only lowercase letters, digits, hyphens and dots, start with a letter or
/// digit, and contain no `..`. Every name [`BucketNamer`] derives from it must
/// pass [`validate_bucket_name`].
pub fn validate_prefix(prefix: &str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidBucketName {
        name: prefix.to_owned(),
        reason: reason.to_owned(),
    };

    if prefix.is_empty() {
        return Err(invalid("prefix must not be empty"));
    }
    if prefix.len() > MAX_PREFIX_LEN {
        return Err(invalid(&format!(
            "prefix must be at most {MAX_PREFIX_LEN} characters long"
        )));
    }
    if !prefix
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'.')
    {
        return Err(invalid(
            "prefix must only contain lowercase letters, numbers, hyphens, and dots",
        ));
    }
    let first = prefix.as_bytes()[0];
    if !(first.is_ascii_lowercase() || first.is_ascii_digit()) {
        return Err(invalid("prefix must start with a letter or number"));
    }
    if prefix.contains("..") {
        return Err(invalid("prefix must not contain consecutive dots"));
    }
    if prefix.starts_with("xn--") || prefix.starts_with("sthree-") {
        return Err(invalid("prefix uses a reserved bucket name prefix"));
    }
    let sample = format!("{prefix}{}-0", "0".repeat(RUN_ID_LEN));
    validate_bucket_name(&sample).map_err(|_| invalid("prefix does not yield valid bucket names"))
}

/// Validate an S3 bucket name.
///
/// Rules:
/// - 3-63 characters long
/// - Only lowercase letters, numbers, hyphens, and dots
/// - Must start and end with a letter or number
/// - No consecutive dots (`..`)
/// - Not formatted as an IPv4 address
/// - Must not start with `xn--` or `sthree-`, nor end with `-s3alias`
///
/// # Examples
///
/// ```
/// use s3conform_core::naming::validate_bucket_name;
///
/// assert!(validate_bucket_name("my-valid-bucket").is_ok());
/// assert!(validate_bucket_name("AB").is_err());
/// ```
pub fn validate_bucket_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidBucketName {
        name: name.to_owned(),
        reason: reason.to_owned(),
    };
    let len = name.len();

    if !(MIN_BUCKET_NAME_LEN..=MAX_BUCKET_NAME_LEN).contains(&len) {
        return Err(invalid(&format!(
            "bucket name must be between {MIN_BUCKET_NAME_LEN} and {MAX_BUCKET_NAME_LEN} characters long"
        )));
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'.')
    {
        return Err(invalid(
            "bucket name must only contain lowercase letters, numbers, hyphens, and dots",
        ));
    }

    let first = name.as_bytes()[0];
    let last = name.as_bytes()[len - 1];
    if !(first.is_ascii_lowercase() || first.is_ascii_digit())
        || !(last.is_ascii_lowercase() || last.is_ascii_digit())
    {
        return Err(invalid("bucket name must start and end with a letter or number"));
    }
    if name.contains("..") {
        return Err(invalid("bucket name must not contain consecutive dots"));
    }
    if name.parse::<Ipv4Addr>().is_ok() {
        return Err(invalid("bucket name must not be formatted as an IP address"));
    }
    if name.starts_with("xn--") || name.starts_with("sthree-") {
        return Err(invalid("bucket name uses a reserved prefix"));
    }
    if name.ends_with("-s3alias") {
        return Err(invalid("bucket name must not end with '-s3alias'"));
    }
    Ok(())
}
