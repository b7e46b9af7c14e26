//! Raw header overrides for header-validation cases.
//!
//! The SDK computes `Content-MD5`, `Content-Length`, `Content-Type` and
//! friends itself. Header-validation cases need to send values the SDK would
//! never produce, so [`HeaderOverrides`] rewrites the outgoing request right
//! before it is signed (via `customize().mutate_request(..)`).
//!
//! An empty value removes the header. Any other value must be encodable as
//! an HTTP header value; unencodable values (control characters) are
//! rejected with [`Error::InvalidHeader`] before a request is built.

use aws_sdk_s3::config::http::HttpRequest;
use http::{HeaderName, HeaderValue};

use crate::error::{Error, Result};

/// One override: either replace the header's value or drop the header.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Override {
    Set(String),
    Remove,
}

/// An ordered set of header overrides applied to an outgoing request.
///
/// # Examples
///
/// ```
/// use s3conform_core::HeaderOverrides;
///
/// let headers = HeaderOverrides::new()
///     .set("Content-Type", "text/plain")
///     .unwrap()
///     .set("Expect", "")
///     .unwrap();
/// assert_eq!(headers.len(), 2);
///
/// assert!(HeaderOverrides::new().set("Expect", "\u{7}").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderOverrides {
    entries: Vec<(String, Override)>,
}

impl HeaderOverrides {
    /// An empty override set (the request goes out as the SDK builds it).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build overrides from `(name, value)` pairs.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Result<Self> {
        pairs
            .iter()
            .try_fold(Self::new(), |acc, (name, value)| acc.set(name, value))
    }

    /// Set `name` to `value`; an empty value removes the header.
    ///
    /// A later override of the same header (case-insensitive) replaces an
    /// earlier one.
    pub fn set(mut self, name: &str, value: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidHeader {
            name: name.to_owned(),
            value: value.to_owned(),
            reason: reason.to_owned(),
        };

        HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid("not a legal header name"))?;

        let entry = if value.is_empty() {
            Override::Remove
        } else {
            HeaderValue::from_str(value).map_err(|_| invalid("not a legal header value"))?;
            Override::Set(value.to_owned())
        };

        self.entries.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.entries.push((name.to_owned(), entry));
        Ok(self)
    }

    /// Number of overrides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no overrides.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply the overrides to an outgoing request.
    pub fn apply(&self, request: &mut HttpRequest) {
        let headers = request.headers_mut();
        for (name, entry) in &self.entries {
            match entry {
                Override::Set(value) => {
                    headers.insert(name.clone(), value.clone());
                }
                Override::Remove => {
                    headers.remove(name.as_str());
                }
            }
        }
        tracing::debug!(overrides = ?self.entries, "applied header overrides");
    }
}
