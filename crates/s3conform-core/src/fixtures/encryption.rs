//! Server-side encryption helpers (SSE-C and SSE-KMS).

use std::fmt;

use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ServerSideEncryption;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use bytes::Bytes;
use tracing::debug;

use super::{collect_bytes, content_md5};
use crate::error::Result;

/// Algorithm name sent in `x-amz-server-side-encryption-customer-algorithm`.
pub const SSE_C_ALGORITHM: &str = "AES256";

/// A 256-bit customer-provided key, pre-encoded for the SSE-C headers.
#[derive(Clone, PartialEq, Eq)]
pub struct SseCustomerKey {
    key_b64: String,
    key_md5_b64: String,
}

impl SseCustomerKey {
    /// A fresh random key.
    #[must_use]
    pub fn generate() -> Self {
        Self::from_bytes(rand::random())
    }

    /// Wrap raw key material.
    #[must_use]
    pub fn from_bytes(raw: [u8; 32]) -> Self {
        Self {
            key_b64: BASE64_STANDARD.encode(raw),
            key_md5_b64: content_md5(&raw),
        }
    }

    /// Base64 of the key.
    #[must_use]
    pub fn key_b64(&self) -> &str {
        &self.key_b64
    }

    /// Base64 MD5 of the raw key.
    #[must_use]
    pub fn key_md5_b64(&self) -> &str {
        &self.key_md5_b64
    }
}

// Keep key material out of logs.
impl fmt::Debug for SseCustomerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SseCustomerKey")
            .field("key_md5_b64", &self.key_md5_b64)
            .finish_non_exhaustive()
    }
}

/// PUT encrypted with a customer-provided key.
pub async fn put_object_sse_c(
    client: &Client,
    bucket: &str,
    key: &str,
    data: impl Into<Bytes>,
    sse_key: &SseCustomerKey,
) -> Result<()> {
    let data = data.into();
    debug!(bucket, key, len = data.len(), ?sse_key, "put object sse-c");
    client
        .put_object()
        .bucket(bucket)
        .key(key)
        .sse_customer_algorithm(SSE_C_ALGORITHM)
        .sse_customer_key(sse_key.key_b64())
        .sse_customer_key_md5(sse_key.key_md5_b64())
        .body(ByteStream::from(data))
        .send()
        .await?;
    Ok(())
}

/// GET an SSE-C object with its customer-provided key.
pub async fn get_object_sse_c(
    client: &Client,
    bucket: &str,
    key: &str,
    sse_key: &SseCustomerKey,
) -> Result<Bytes> {
    debug!(bucket, key, ?sse_key, "get object sse-c");
    let resp = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .sse_customer_algorithm(SSE_C_ALGORITHM)
        .sse_customer_key(sse_key.key_b64())
        .sse_customer_key_md5(sse_key.key_md5_b64())
        .send()
        .await?;
    collect_bytes(resp.body).await
}

/// PUT encrypted under the KMS key `kms_key_id`.
pub async fn put_object_sse_kms(
    client: &Client,
    bucket: &str,
    key: &str,
    content: &str,
    kms_key_id: &str,
) -> Result<()> {
    debug!(bucket, key, kms_key_id, "put object sse-kms");
    client
        .put_object()
        .bucket(bucket)
        .key(key)
        .server_side_encryption(ServerSideEncryption::AwsKms)
        .ssekms_key_id(kms_key_id)
        .body(ByteStream::from(content.as_bytes().to_vec()))
        .send()
        .await?;
    Ok(())
}
