//! Shared helpers for the s3conform S3 API conformance suite.
//!
//! The suite drives an S3-compatible service through `aws-sdk-s3` and asserts
//! the exact status codes, error codes and payloads the S3 API contract
//! requires. This crate holds everything the individual cases share:
//!
//! ```text
//!   ConformanceConfig (env)
//!          |
//!          v
//!   build_client / s3_client ----> aws_sdk_s3::Client
//!          |
//!          v
//!   fixtures (bucket/object CRUD, listing, conditional, multipart, SSE)
//!          |            \
//!          v             v
//!   Error / Failure    HeaderOverrides (raw header injection)
//!          |
//!          v
//!   teardown (per-bucket cleanup, prefix sweep)
//! ```
//!
//! Every bucket a case creates is named by [`naming::bucket_name`], which
//! prefixes it with the configured run prefix so that
//! [`teardown::delete_prefixed_buckets`] can remove everything a run left
//! behind.

pub mod client;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod headers;
pub mod naming;
pub mod teardown;

pub use client::{build_client, init_tracing, s3_client};
pub use config::ConformanceConfig;
pub use error::{Error, Failure, Result};
pub use headers::HeaderOverrides;
pub use naming::{BucketNamer, bucket_name};
