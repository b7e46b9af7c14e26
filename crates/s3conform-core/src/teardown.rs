//! Teardown: remove what a run left behind.
//!
//! [`cleanup_bucket`] is what a single case calls on the buckets it created.
//! [`delete_prefixed_buckets`] sweeps every bucket carrying the run prefix,
//! which catches buckets orphaned by a panicking case.

use aws_sdk_s3::Client;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::fixtures::{delete_objects, list_bucket_names};
use crate::naming::validate_prefix;

/// Delete all objects and in-progress uploads in a bucket, then the bucket.
///
/// Best effort: failures are logged and otherwise ignored, since the bucket
/// may already be gone.
pub async fn cleanup_bucket(client: &Client, bucket: &str) {
    match delete_objects(client, bucket).await {
        Ok(_) => {}
        Err(e) if e.code() == Some("NoSuchBucket") => {
            debug!(bucket, "bucket already gone");
            return;
        }
        Err(e) => warn!(bucket, error = %e, "failed to delete objects"),
    }

    if let Ok(uploads) = client.list_multipart_uploads().bucket(bucket).send().await {
        for upload in uploads.uploads() {
            if let (Some(key), Some(id)) = (upload.key(), upload.upload_id()) {
                if let Err(e) = client
                    .abort_multipart_upload()
                    .bucket(bucket)
                    .key(key)
                    .upload_id(id)
                    .send()
                    .await
                {
                    warn!(bucket, key, error = %Error::from(e), "failed to abort upload");
                }
            }
        }
    }

    if let Err(e) = client.delete_bucket().bucket(bucket).send().await {
        warn!(bucket, error = %Error::from(e), "failed to delete bucket");
    }
}

/// Names in `names` that start with `prefix`.
fn matching<'a>(names: &'a [String], prefix: &'a str) -> impl Iterator<Item = &'a String> {
    names.iter().filter(move |name| name.starts_with(prefix))
}

/// Buckets that [`delete_prefixed_buckets`] would remove.
pub async fn prefixed_buckets(client: &Client, prefix: &str) -> Result<Vec<String>> {
    validate_prefix(prefix)?;
    let names = list_bucket_names(client).await?;
    Ok(matching(&names, prefix).cloned().collect())
}

/// Clean up every bucket whose name starts with `prefix`.
///
/// Returns the number of buckets that are gone afterwards. Fails only when
/// the prefix is invalid or the bucket listing itself fails.
pub async fn delete_prefixed_buckets(client: &Client, prefix: &str) -> Result<usize> {
    let targets = prefixed_buckets(client, prefix).await?;
    info!(prefix, count = targets.len(), "sweeping prefixed buckets");

    for bucket in &targets {
        cleanup_bucket(client, bucket).await;
    }

    let remaining = list_bucket_names(client).await?;
    let left = matching(&remaining, prefix).count();
    if left > 0 {
        warn!(prefix, left, "buckets survived the sweep");
    }
    Ok(targets.len().saturating_sub(left))
}

/// Owns the teardown of one fixture set.
///
/// Cases that provision several buckets hold a guard and call
/// [`RunGuard::finish`] at the end, instead of cleaning each bucket by hand.
#[derive(Debug, Clone)]
pub struct RunGuard {
    client: Client,
    prefix: String,
}

impl RunGuard {
    /// Guard buckets whose names start with `prefix`.
    #[must_use]
    pub fn new(client: Client, prefix: impl Into<String>) -> Self {
        Self {
            client,
            prefix: prefix.into(),
        }
    }

    /// The guarded prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Sweep every guarded bucket.
    pub async fn finish(self) -> Result<usize> {
        delete_prefixed_buckets(&self.client, &self.prefix).await
    }
}
