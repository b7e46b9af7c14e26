//! Error types and SDK failure classification.
//!
//! Cases assert on the *shape* of a failure: which S3 error code came back,
//! with which HTTP status, or whether the request never reached the server
//! at all. [`Failure`] captures exactly that, and [`classify`] builds it from
//! any [`SdkError`] the generated client returns.
//!
//! # Usage
//!
//! ```
//! use s3conform_core::error::Failure;
//!
//! // A 304 carries no error body; the code is derived from the status.
//! let failure = Failure::service(304, None, None);
//! assert_eq!(failure.code(), Some("NotModified"));
//! assert_eq!(failure.message(), Some("Not Modified"));
//! ```

use std::fmt;

use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{BuildError, DisplayErrorContext, ProvideErrorMetadata, SdkError};

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced by the suite helpers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A header override cannot be encoded; no request was sent.
    #[error("invalid value {value:?} for header {name}: {reason}")]
    InvalidHeader {
        /// Header name as given by the caller.
        name: String,
        /// Rejected header value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A bucket name or bucket prefix breaks the S3 naming rules.
    #[error("invalid bucket name {name:?}: {reason}")]
    InvalidBucketName {
        /// The rejected name.
        name: String,
        /// Which rule it breaks.
        reason: String,
    },

    /// An SDK call failed.
    #[error("request failed: {0}")]
    Request(Failure),

    /// Streaming a response body failed.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// A request input could not be assembled; nothing was sent.
    #[error("failed to build request input: {0}")]
    Build(#[from] BuildError),

    /// The suite configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A successful response lacked a field the helper has to return.
    #[error("response is missing {0}")]
    MissingField(&'static str),
}

impl Error {
    /// The classified failure, when the error came from an SDK call.
    #[must_use]
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Request(failure) => Some(failure),
            _ => None,
        }
    }

    /// The S3 error code returned by the service, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.failure().and_then(Failure::code)
    }

    /// The error message returned by the service, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.failure().and_then(Failure::message)
    }

    /// The HTTP status returned by the service, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.failure().and_then(Failure::status)
    }

    /// Whether the request was refused before the service answered it.
    #[must_use]
    pub fn is_client_side(&self) -> bool {
        match self {
            Self::InvalidHeader { .. } | Self::Build(_) => true,
            Self::Request(failure) => failure.is_client(),
            _ => false,
        }
    }
}

impl<E> From<SdkError<E, HttpResponse>> for Error
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    fn from(err: SdkError<E, HttpResponse>) -> Self {
        Self::Request(classify(&err))
    }
}

/// Where a client-side failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientFailureKind {
    /// The request could not be built (e.g. a required parameter is missing).
    Construction,
    /// The request could not be sent or the connection broke.
    Dispatch,
    /// The request timed out.
    Timeout,
    /// A response arrived but could not be parsed.
    Response,
    /// Any other SDK-side failure.
    Other,
}

impl fmt::Display for ClientFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Construction => "construction",
            Self::Dispatch => "dispatch",
            Self::Timeout => "timeout",
            Self::Response => "response",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

/// A classified SDK failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Failure {
    /// The service answered with an error status.
    #[error(
        "service error {status} {}: {}",
        .code.as_deref().unwrap_or("-"),
        .message.as_deref().unwrap_or("")
    )]
    Service {
        /// HTTP status code.
        status: u16,
        /// S3 error code, or the canonical code for the status when the
        /// response carried no error body.
        code: Option<String>,
        /// Error message, or the status reason phrase when absent.
        message: Option<String>,
    },

    /// The request never produced a service answer.
    #[error("client error ({kind}): {message}")]
    Client {
        /// Where the failure happened.
        kind: ClientFailureKind,
        /// Rendered error chain.
        message: String,
    },
}

impl Failure {
    /// Build a service failure, filling in code and message from the status
    /// when the response did not carry them.
    #[must_use]
    pub fn service(status: u16, code: Option<&str>, message: Option<&str>) -> Self {
        let code = code
            .filter(|c| !c.is_empty())
            .or_else(|| canonical_code(status))
            .map(ToOwned::to_owned);
        let message = message
            .filter(|m| !m.is_empty())
            .or_else(|| {
                http::StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
            })
            .map(ToOwned::to_owned);
        Self::Service {
            status,
            code,
            message,
        }
    }

    /// The S3 error code, for service failures.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Service { code, .. } => code.as_deref(),
            Self::Client { .. } => None,
        }
    }

    /// The error message, for service failures.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Service { message, .. } => message.as_deref(),
            Self::Client { .. } => None,
        }
    }

    /// The HTTP status, for service failures.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => Some(*status),
            Self::Client { .. } => None,
        }
    }

    /// Whether the failure happened on the client side.
    #[must_use]
    pub fn is_client(&self) -> bool {
        matches!(self, Self::Client { .. })
    }

    /// The client-side failure kind, if any.
    #[must_use]
    pub fn client_kind(&self) -> Option<ClientFailureKind> {
        match self {
            Self::Client { kind, .. } => Some(*kind),
            Self::Service { .. } => None,
        }
    }
}

/// Classify an SDK error into a [`Failure`].
pub fn classify<E>(err: &SdkError<E, HttpResponse>) -> Failure
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let client = |kind| Failure::Client {
        kind,
        message: DisplayErrorContext(err).to_string(),
    };

    match err {
        SdkError::ServiceError(ctx) => {
            let source = ctx.err();
            Failure::service(ctx.raw().status().as_u16(), source.code(), source.message())
        }
        SdkError::ConstructionFailure(_) => client(ClientFailureKind::Construction),
        SdkError::DispatchFailure(_) => client(ClientFailureKind::Dispatch),
        SdkError::TimeoutError(_) => client(ClientFailureKind::Timeout),
        SdkError::ResponseError(_) => client(ClientFailureKind::Response),
        _ => client(ClientFailureKind::Other),
    }
}

/// The error code S3 uses for a status when the body is empty (HEAD
/// requests, `304 Not Modified`, some `412` responses).
#[must_use]
pub fn canonical_code(status: u16) -> Option<&'static str> {
    let code = match status {
        301 => "PermanentRedirect",
        304 => "NotModified",
        400 => "BadRequest",
        403 => "Forbidden",
        404 => "NotFound",
        405 => "MethodNotAllowed",
        409 => "Conflict",
        411 => "MissingContentLength",
        412 => "PreconditionFailed",
        416 => "InvalidRange",
        417 => "ExpectationFailed",
        500 => "InternalError",
        501 => "NotImplemented",
        503 => "ServiceUnavailable",
        _ => return None,
    };
    Some(code)
}
