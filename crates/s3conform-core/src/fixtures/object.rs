//! Object CRUD helpers.

use std::collections::HashMap;

use aws_sdk_s3::Client;
use aws_sdk_s3::operation::head_object::HeadObjectOutput;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use tracing::debug;

use super::{collect_bytes, collect_string};
use crate::error::{Error, Result};
use crate::headers::HeaderOverrides;

/// Largest batch a single `DeleteObjects` call accepts.
const MAX_DELETE_BATCH: usize = 1000;

/// Upload `content` under `key` and return the object's ETag.
pub async fn put_object(client: &Client, bucket: &str, key: &str, content: &str) -> Result<String> {
    debug!(bucket, key, len = content.len(), "put object");
    let resp = client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(content.as_bytes().to_vec()))
        .send()
        .await?;
    resp.e_tag()
        .map(ToOwned::to_owned)
        .ok_or(Error::MissingField("ETag"))
}

/// Upload `content` with raw header overrides on the request.
pub async fn put_object_with_headers(
    client: &Client,
    bucket: &str,
    key: &str,
    content: &str,
    headers: &HeaderOverrides,
) -> Result<()> {
    debug!(bucket, key, ?headers, "put object with header overrides");
    let overrides = headers.clone();
    client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(content.as_bytes().to_vec()))
        .customize()
        .mutate_request(move |req| overrides.apply(req))
        .send()
        .await?;
    Ok(())
}

/// Upload each `(key, content)` pair in order.
pub async fn create_objects(client: &Client, bucket: &str, objects: &[(&str, &str)]) -> Result<()> {
    for (key, content) in objects {
        put_object(client, bucket, key, content).await?;
    }
    Ok(())
}

/// Read an object's body as a string.
pub async fn get_object(client: &Client, bucket: &str, key: &str) -> Result<String> {
    debug!(bucket, key, "get object");
    let resp = client.get_object().bucket(bucket).key(key).send().await?;
    collect_string(resp.body).await
}

/// Read an object's body as raw bytes.
pub async fn get_object_bytes(client: &Client, bucket: &str, key: &str) -> Result<Vec<u8>> {
    let resp = client.get_object().bucket(bucket).key(key).send().await?;
    Ok(collect_bytes(resp.body).await?.to_vec())
}

/// Fetch an object's headers.
pub async fn head_object(client: &Client, bucket: &str, key: &str) -> Result<HeadObjectOutput> {
    debug!(bucket, key, "head object");
    Ok(client.head_object().bucket(bucket).key(key).send().await?)
}

/// Delete a single object.
pub async fn delete_object(client: &Client, bucket: &str, key: &str) -> Result<()> {
    client.delete_object().bucket(bucket).key(key).send().await?;
    Ok(())
}

/// Every key in a bucket, following continuation tokens.
pub async fn list_all_keys(client: &Client, bucket: &str) -> Result<Vec<String>> {
    let mut keys = Vec::new();
    let mut continuation_token = None;
    loop {
        let resp = client
            .list_objects_v2()
            .bucket(bucket)
            .set_continuation_token(continuation_token.take())
            .send()
            .await?;

        keys.extend(
            resp.contents()
                .iter()
                .filter_map(|o| o.key())
                .map(ToOwned::to_owned),
        );

        if resp.is_truncated() == Some(true) {
            continuation_token = resp.next_continuation_token().map(ToOwned::to_owned);
            if continuation_token.is_none() {
                break;
            }
        } else {
            break;
        }
    }
    Ok(keys)
}

/// Delete every object in a bucket with multi-object delete calls.
///
/// Returns the number of keys the service reported as deleted.
pub async fn delete_objects(client: &Client, bucket: &str) -> Result<usize> {
    let keys = list_all_keys(client, bucket).await?;
    let mut deleted = 0;

    for batch in keys.chunks(MAX_DELETE_BATCH) {
        let objects = batch
            .iter()
            .map(|key| ObjectIdentifier::builder().key(key).build())
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let delete = Delete::builder()
            .set_objects(Some(objects))
            .quiet(false)
            .build()?;

        let resp = client
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await?;

        if let Some(first) = resp.errors().first() {
            tracing::warn!(
                bucket,
                key = first.key().unwrap_or_default(),
                code = first.code().unwrap_or_default(),
                failed = resp.errors().len(),
                "multi-object delete reported errors"
            );
        }
        deleted += resp.deleted().len();
    }

    debug!(bucket, deleted, "deleted objects");
    Ok(deleted)
}

/// Copy `source` (`"bucket/key"`) to `dest_key` in `dest_bucket`.
pub async fn copy_object(
    client: &Client,
    dest_bucket: &str,
    source: &str,
    dest_key: &str,
) -> Result<()> {
    debug!(dest_bucket, source, dest_key, "copy object");
    client
        .copy_object()
        .bucket(dest_bucket)
        .copy_source(source)
        .key(dest_key)
        .send()
        .await?;
    Ok(())
}

/// Result of a ranged `GetObject`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRead {
    /// The returned slice of the object.
    pub data: String,
    /// `Accept-Ranges` response header.
    pub accept_ranges: Option<String>,
    /// `Content-Range` response header.
    pub content_range: Option<String>,
}

/// Read a byte range (`bytes=4-7`, `bytes=4-`, `bytes=-8`) of an object.
pub async fn get_object_range(
    client: &Client,
    bucket: &str,
    key: &str,
    range: &str,
) -> Result<RangeRead> {
    debug!(bucket, key, range, "get object range");
    let resp = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .range(range)
        .send()
        .await?;
    let accept_ranges = resp.accept_ranges().map(ToOwned::to_owned);
    let content_range = resp.content_range().map(ToOwned::to_owned);
    Ok(RangeRead {
        data: collect_string(resp.body).await?,
        accept_ranges,
        content_range,
    })
}

/// Write an object carrying `metadata`, then return the user metadata the
/// service reports for it.
///
/// An empty map writes the object without user metadata.
pub async fn set_get_metadata(
    client: &Client,
    bucket: &str,
    key: &str,
    metadata: &HashMap<String, String>,
) -> Result<HashMap<String, String>> {
    debug!(bucket, key, ?metadata, "put object with metadata");
    client
        .put_object()
        .bucket(bucket)
        .key(key)
        .set_metadata((!metadata.is_empty()).then(|| metadata.clone()))
        .body(ByteStream::from_static(b"metadata"))
        .send()
        .await?;

    let head = head_object(client, bucket, key).await?;
    Ok(head.metadata().cloned().unwrap_or_default())
}
