//! Version 1 (marker based) object listing.

use aws_sdk_s3::Client;
use aws_sdk_s3::operation::list_objects::ListObjectsOutput;
use tracing::debug;
use typed_builder::TypedBuilder;

use crate::error::Result;

/// Request parameters for a `ListObjects` call.
///
/// ```
/// use s3conform_core::fixtures::ListQuery;
///
/// let query = ListQuery::builder().prefix("foo/").delimiter("/").build();
/// assert_eq!(query.max_keys, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, TypedBuilder)]
pub struct ListQuery {
    /// Only keys starting with this prefix.
    #[builder(default, setter(strip_option, into))]
    pub prefix: Option<String>,
    /// Roll keys up to the first occurrence of this string after the prefix.
    #[builder(default, setter(strip_option, into))]
    pub delimiter: Option<String>,
    /// Only keys sorting strictly after this one.
    #[builder(default, setter(strip_option, into))]
    pub marker: Option<String>,
    /// Page size; the service default is 1000.
    #[builder(default, setter(strip_option))]
    pub max_keys: Option<i32>,
}

/// What a listing returned, reduced to the fields cases assert on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Object keys, in the order the service returned them.
    pub keys: Vec<String>,
    /// Rolled-up common prefixes.
    pub common_prefixes: Vec<String>,
    /// Echoed prefix; empty when the service left it out.
    pub prefix: String,
    /// Echoed delimiter; empty when the service left it out.
    pub delimiter: String,
    /// Echoed marker; empty when the service left it out.
    pub marker: String,
    /// Echoed max-keys.
    pub max_keys: Option<i32>,
    /// Whether more keys follow this page.
    pub is_truncated: bool,
}

impl From<&ListObjectsOutput> for Listing {
    fn from(out: &ListObjectsOutput) -> Self {
        Self {
            keys: out
                .contents()
                .iter()
                .filter_map(|o| o.key())
                .map(ToOwned::to_owned)
                .collect(),
            common_prefixes: out
                .common_prefixes()
                .iter()
                .filter_map(|p| p.prefix())
                .map(ToOwned::to_owned)
                .collect(),
            prefix: out.prefix().unwrap_or_default().to_owned(),
            delimiter: out.delimiter().unwrap_or_default().to_owned(),
            marker: out.marker().unwrap_or_default().to_owned(),
            max_keys: out.max_keys(),
            is_truncated: out.is_truncated().unwrap_or(false),
        }
    }
}

/// Run a single `ListObjects` call with `query`.
pub async fn list_objects_with(client: &Client, bucket: &str, query: &ListQuery) -> Result<Listing> {
    debug!(bucket, ?query, "list objects");
    let resp = client
        .list_objects()
        .bucket(bucket)
        .set_prefix(query.prefix.clone())
        .set_delimiter(query.delimiter.clone())
        .set_marker(query.marker.clone())
        .set_max_keys(query.max_keys)
        .send()
        .await?;
    Ok(Listing::from(&resp))
}

/// List a bucket without parameters.
pub async fn list_objects(client: &Client, bucket: &str) -> Result<Listing> {
    list_objects_with(client, bucket, &ListQuery::default()).await
}

/// List keys under `prefix`.
pub async fn list_with_prefix(client: &Client, bucket: &str, prefix: &str) -> Result<Listing> {
    list_objects_with(client, bucket, &ListQuery::builder().prefix(prefix).build()).await
}

/// List with a delimiter and no prefix.
pub async fn list_with_delimiter(client: &Client, bucket: &str, delimiter: &str) -> Result<Listing> {
    list_objects_with(
        client,
        bucket,
        &ListQuery::builder().delimiter(delimiter).build(),
    )
    .await
}

/// List with both a prefix and a delimiter.
pub async fn list_with_prefix_and_delimiter(
    client: &Client,
    bucket: &str,
    prefix: &str,
    delimiter: &str,
) -> Result<Listing> {
    let query = ListQuery::builder()
        .prefix(prefix)
        .delimiter(delimiter)
        .build();
    list_objects_with(client, bucket, &query).await
}

/// List at most `max_keys` keys.
pub async fn list_with_max_keys(client: &Client, bucket: &str, max_keys: i32) -> Result<Listing> {
    list_objects_with(
        client,
        bucket,
        &ListQuery::builder().max_keys(max_keys).build(),
    )
    .await
}

/// List keys after `marker`.
pub async fn list_with_marker(client: &Client, bucket: &str, marker: &str) -> Result<Listing> {
    list_objects_with(client, bucket, &ListQuery::builder().marker(marker).build()).await
}
