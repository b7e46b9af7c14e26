//! Conditional request helpers (`If-Match`, `If-None-Match`,
//! `If-Modified-Since`, `If-Unmodified-Since`).
//!
//! The GET variants return the body on success. A failed precondition comes
//! back as [`crate::Error::Request`] whose code is `PreconditionFailed`
//! (412) or `NotModified` (304).

use std::time::SystemTime;

use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::{ByteStream, DateTime};
use tracing::debug;

use super::collect_string;
use crate::error::Result;

/// GET with `If-Match: <etag>`.
pub async fn get_object_if_match(
    client: &Client,
    bucket: &str,
    key: &str,
    etag: &str,
) -> Result<String> {
    debug!(bucket, key, etag, "get object if-match");
    let resp = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .if_match(etag)
        .send()
        .await?;
    collect_string(resp.body).await
}

/// GET with `If-None-Match: <etag>`.
pub async fn get_object_if_none_match(
    client: &Client,
    bucket: &str,
    key: &str,
    etag: &str,
) -> Result<String> {
    debug!(bucket, key, etag, "get object if-none-match");
    let resp = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .if_none_match(etag)
        .send()
        .await?;
    collect_string(resp.body).await
}

/// GET with `If-Modified-Since: <since>`.
pub async fn get_object_if_modified_since(
    client: &Client,
    bucket: &str,
    key: &str,
    since: SystemTime,
) -> Result<String> {
    let since = DateTime::from(since);
    debug!(bucket, key, %since, "get object if-modified-since");
    let resp = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .if_modified_since(since)
        .send()
        .await?;
    collect_string(resp.body).await
}

/// GET with `If-Unmodified-Since: <since>`.
pub async fn get_object_if_unmodified_since(
    client: &Client,
    bucket: &str,
    key: &str,
    since: SystemTime,
) -> Result<String> {
    let since = DateTime::from(since);
    debug!(bucket, key, %since, "get object if-unmodified-since");
    let resp = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .if_unmodified_since(since)
        .send()
        .await?;
    collect_string(resp.body).await
}

/// PUT with `If-Match: <etag>`; `*` requires the key to exist.
pub async fn put_object_if_match(
    client: &Client,
    bucket: &str,
    key: &str,
    content: &str,
    etag: &str,
) -> Result<()> {
    debug!(bucket, key, etag, "put object if-match");
    client
        .put_object()
        .bucket(bucket)
        .key(key)
        .if_match(etag)
        .body(ByteStream::from(content.as_bytes().to_vec()))
        .send()
        .await?;
    Ok(())
}

/// PUT with `If-None-Match: <etag>`; `*` requires the key to be absent.
pub async fn put_object_if_none_match(
    client: &Client,
    bucket: &str,
    key: &str,
    content: &str,
    etag: &str,
) -> Result<()> {
    debug!(bucket, key, etag, "put object if-none-match");
    client
        .put_object()
        .bucket(bucket)
        .key(key)
        .if_none_match(etag)
        .body(ByteStream::from(content.as_bytes().to_vec()))
        .send()
        .await?;
    Ok(())
}
