//! Bucket-level helpers.

use aws_sdk_s3::Client;
use aws_sdk_s3::types::{BucketCannedAcl, BucketLocationConstraint, CreateBucketConfiguration};
use tracing::debug;

use crate::error::Result;
use crate::headers::HeaderOverrides;

/// Location constraint for the client's region; `us-east-1` takes none.
fn location_constraint(client: &Client) -> Option<CreateBucketConfiguration> {
    let region = client.config().region()?.as_ref();
    if region == "us-east-1" {
        return None;
    }
    Some(
        CreateBucketConfiguration::builder()
            .location_constraint(BucketLocationConstraint::from(region))
            .build(),
    )
}

/// Create a bucket.
pub async fn create_bucket(client: &Client, bucket: &str) -> Result<()> {
    debug!(bucket, "create bucket");
    client
        .create_bucket()
        .bucket(bucket)
        .set_create_bucket_configuration(location_constraint(client))
        .send()
        .await?;
    Ok(())
}

/// Create a bucket with raw header overrides on the request.
pub async fn create_bucket_with_headers(
    client: &Client,
    bucket: &str,
    headers: &HeaderOverrides,
) -> Result<()> {
    debug!(bucket, ?headers, "create bucket with header overrides");
    let overrides = headers.clone();
    client
        .create_bucket()
        .bucket(bucket)
        .set_create_bucket_configuration(location_constraint(client))
        .customize()
        .mutate_request(move |req| overrides.apply(req))
        .send()
        .await?;
    Ok(())
}

/// Delete a bucket. Fails when it does not exist or is not empty.
pub async fn delete_bucket(client: &Client, bucket: &str) -> Result<()> {
    debug!(bucket, "delete bucket");
    client.delete_bucket().bucket(bucket).send().await?;
    Ok(())
}

/// Names of all buckets visible to the caller.
pub async fn list_bucket_names(client: &Client) -> Result<Vec<String>> {
    let resp = client.list_buckets().send().await?;
    let names = resp
        .buckets()
        .iter()
        .filter_map(|b| b.name())
        .map(ToOwned::to_owned)
        .collect();
    Ok(names)
}

/// Whether `bucket` exists, judged by `HeadBucket`.
pub async fn bucket_exists(client: &Client, bucket: &str) -> bool {
    client.head_bucket().bucket(bucket).send().await.is_ok()
}

/// Apply a canned ACL (e.g. `public-read`) to a bucket.
pub async fn put_bucket_acl(client: &Client, bucket: &str, canned: &str) -> Result<()> {
    debug!(bucket, canned, "put bucket acl");
    client
        .put_bucket_acl()
        .bucket(bucket)
        .acl(BucketCannedAcl::from(canned))
        .send()
        .await?;
    Ok(())
}

/// Number of lifecycle rules configured on a bucket.
///
/// A bucket without configuration fails with
/// `NoSuchLifecycleConfiguration`.
pub async fn get_bucket_lifecycle(client: &Client, bucket: &str) -> Result<usize> {
    let resp = client
        .get_bucket_lifecycle_configuration()
        .bucket(bucket)
        .send()
        .await?;
    Ok(resp.rules().len())
}
