//! Fixture helpers: thin wrappers around single SDK calls.
//!
//! Each helper performs exactly one logical S3 operation (sometimes a short
//! page loop), logs it at `debug`, and converts SDK failures into
//! [`crate::Error`] so cases can assert on the returned error code. None of
//! them retries or swallows errors; cleanup lives in [`crate::teardown`].

pub mod bucket;
pub mod conditional;
pub mod encryption;
pub mod list;
pub mod multipart;
pub mod object;

use aws_sdk_s3::primitives::ByteStream;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use bytes::Bytes;
use md5::{Digest, Md5};

use crate::error::{Error, Result};

pub use bucket::*;
pub use conditional::*;
pub use encryption::*;
pub use list::*;
pub use multipart::*;
pub use object::*;

/// Base64 MD5 of `data`, the value of a `Content-MD5` header.
///
/// # Examples
///
/// ```
/// use s3conform_core::fixtures::content_md5;
///
/// assert_eq!(content_md5(b"bar"), "N7UdGUp1E+RbVvZSTy1R8g==");
/// ```
#[must_use]
pub fn content_md5(data: &[u8]) -> String {
    BASE64_STANDARD.encode(Md5::digest(data).as_slice())
}

/// Quoted hex MD5 of `data`, the ETag S3 reports for a single-part object.
///
/// # Examples
///
/// ```
/// use s3conform_core::fixtures::compute_etag;
///
/// assert_eq!(compute_etag(b""), "\"d41d8cd98f00b204e9800998ecf8427e\"");
/// ```
#[must_use]
pub fn compute_etag(data: &[u8]) -> String {
    format!("\"{}\"", hex::encode(Md5::digest(data).as_slice()))
}

/// Drain a response body into memory.
pub(crate) async fn collect_bytes(body: ByteStream) -> Result<Bytes> {
    body.collect()
        .await
        .map(|data| data.into_bytes())
        .map_err(|e| Error::Body(e.to_string()))
}

/// Drain a response body into a UTF-8 string.
pub(crate) async fn collect_string(body: ByteStream) -> Result<String> {
    let bytes = collect_bytes(body).await?;
    String::from_utf8(bytes.to_vec()).map_err(|e| Error::Body(e.to_string()))
}
