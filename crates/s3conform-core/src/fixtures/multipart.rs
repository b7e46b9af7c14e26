//! Multipart upload helpers.

use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use bytes::Bytes;
use tracing::debug;

use crate::error::{Error, Result};

/// Smallest size S3 accepts for any part but the last one.
pub const MIN_PART_SIZE: usize = 5 * 1024 * 1024;

/// One entry of a `ListParts` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartSummary {
    /// 1-based part number.
    pub part_number: i32,
    /// Quoted part ETag.
    pub etag: String,
    /// Part size in bytes.
    pub size: i64,
}

/// Start an upload and return its upload id.
pub async fn create_multipart_upload(client: &Client, bucket: &str, key: &str) -> Result<String> {
    let resp = client
        .create_multipart_upload()
        .bucket(bucket)
        .key(key)
        .send()
        .await?;
    let upload_id = resp
        .upload_id()
        .map(ToOwned::to_owned)
        .ok_or(Error::MissingField("UploadId"))?;
    debug!(bucket, key, upload_id, "created multipart upload");
    Ok(upload_id)
}

/// Upload one part and return its ETag.
pub async fn upload_part(
    client: &Client,
    bucket: &str,
    key: &str,
    upload_id: &str,
    part_number: i32,
    body: impl Into<Bytes>,
) -> Result<String> {
    let body = body.into();
    debug!(bucket, key, upload_id, part_number, len = body.len(), "upload part");
    let resp = client
        .upload_part()
        .bucket(bucket)
        .key(key)
        .upload_id(upload_id)
        .part_number(part_number)
        .body(ByteStream::from(body))
        .send()
        .await?;
    resp.e_tag()
        .map(ToOwned::to_owned)
        .ok_or(Error::MissingField("ETag"))
}

/// Complete an upload from `(part_number, etag)` pairs.
pub async fn complete_multipart_upload(
    client: &Client,
    bucket: &str,
    key: &str,
    upload_id: &str,
    parts: &[(i32, &str)],
) -> Result<()> {
    let parts = parts
        .iter()
        .map(|(number, etag)| {
            CompletedPart::builder()
                .part_number(*number)
                .e_tag(*etag)
                .build()
        })
        .collect();
    let upload = CompletedMultipartUpload::builder()
        .set_parts(Some(parts))
        .build();

    debug!(bucket, key, upload_id, "complete multipart upload");
    client
        .complete_multipart_upload()
        .bucket(bucket)
        .key(key)
        .upload_id(upload_id)
        .multipart_upload(upload)
        .send()
        .await?;
    Ok(())
}

/// Abort an upload.
pub async fn abort_multipart_upload(
    client: &Client,
    bucket: &str,
    key: &str,
    upload_id: &str,
) -> Result<()> {
    debug!(bucket, key, upload_id, "abort multipart upload");
    client
        .abort_multipart_upload()
        .bucket(bucket)
        .key(key)
        .upload_id(upload_id)
        .send()
        .await?;
    Ok(())
}

/// Issue `AbortMultipartUpload` without the required upload id.
///
/// The SDK refuses to build the request, so this always fails client-side.
pub async fn abort_without_upload_id(client: &Client, bucket: &str, key: &str) -> Result<()> {
    client
        .abort_multipart_upload()
        .bucket(bucket)
        .key(key)
        .send()
        .await?;
    Ok(())
}

/// Parts uploaded so far for an upload.
pub async fn list_parts(
    client: &Client,
    bucket: &str,
    key: &str,
    upload_id: &str,
) -> Result<Vec<PartSummary>> {
    let resp = client
        .list_parts()
        .bucket(bucket)
        .key(key)
        .upload_id(upload_id)
        .send()
        .await?;
    let parts = resp
        .parts()
        .iter()
        .map(|p| PartSummary {
            part_number: p.part_number().unwrap_or_default(),
            etag: p.e_tag().unwrap_or_default().to_owned(),
            size: p.size().unwrap_or_default(),
        })
        .collect();
    Ok(parts)
}

/// Upload `data` as a single-part multipart upload and complete it.
pub async fn put_object_multipart(
    client: &Client,
    bucket: &str,
    key: &str,
    data: impl Into<Bytes>,
) -> Result<()> {
    let upload_id = create_multipart_upload(client, bucket, key).await?;
    let etag = upload_part(client, bucket, key, &upload_id, 1, data).await?;
    complete_multipart_upload(client, bucket, key, &upload_id, &[(1, &etag)]).await
}

/// A payload of at least [`MIN_PART_SIZE`] bytes built by repeating `unit`.
#[must_use]
pub fn part_payload(unit: &str) -> Bytes {
    if unit.is_empty() {
        return Bytes::new();
    }
    let repeats = MIN_PART_SIZE.div_ceil(unit.len());
    Bytes::from(unit.repeat(repeats))
}
