//! Error types for the API client layer.
//!
//! Every failed call is described twice: first as the raw
//! [`TransportFailure`] the transport produced, then, once the failure is
//! terminal, as the uniform [`ApiError`] that callers see.
//!
//! # Error Handling
//!
//! - [`TransportFailure`]: What went wrong on one attempt (response with an
//!   error status, no response at all, or a request that was never sent)
//! - [`ApiError`]: The normalized `{message, status, data, cause}` error
//! - [`ErrorKind`]: Classification of an [`ApiError`] into the failure taxonomy
//! - [`ErrorRemapper`]: Strategy that refines normalized messages for one provider
//! - [`HttpError`]: Unified error type encompassing all client errors
//!
//! # Example
//!
//! ```rust,ignore
//! use spotify_api::clients::{ErrorKind, HttpError};
//!
//! match client.get("/me", None).await {
//!     Ok(body) => println!("Profile: {body}"),
//!     Err(HttpError::Api(e)) if e.kind() == ErrorKind::AuthExpired => {
//!         println!("Log in again: {}", e);
//!     }
//!     Err(HttpError::Api(e)) => println!("API error {}: {}", e.status_code(), e),
//!     Err(HttpError::InvalidArgument(e)) => println!("Invalid argument: {}", e),
//! }
//! ```

use std::fmt;

use thiserror::Error;

use crate::clients::http_response::HttpResponse;
use crate::error::InvalidArgumentError;

/// Message used when a request was sent but nothing came back.
pub const NO_RESPONSE_MESSAGE: &str = "No response received from server";

/// Message used when nothing more specific is known about a failure.
pub const GENERIC_FAILURE_MESSAGE: &str = "Request failed";

/// The raw outcome of one failed attempt.
///
/// The three variants are disjoint: a response was received with an error
/// status, the request was sent but no response arrived (timeout, connection
/// reset, DNS failure), or the request could not be issued at all.
#[derive(Debug, Error)]
pub enum TransportFailure {
    /// A response was received with a non-2xx status.
    #[error("Request failed with status code {}", .0.status)]
    Response(HttpResponse),

    /// The request was sent but no response was received.
    #[error("No response received: {source}")]
    NoResponse {
        /// The underlying network error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The request could not be issued.
    #[error("{message}")]
    NotSent {
        /// Why the request could not be issued.
        message: String,
    },
}

impl TransportFailure {
    /// Returns the response, if one was received.
    #[must_use]
    pub const fn response(&self) -> Option<&HttpResponse> {
        match self {
            Self::Response(response) => Some(response),
            Self::NoResponse { .. } | Self::NotSent { .. } => None,
        }
    }

    /// Classifies a reqwest error by how far the request got.
    pub(crate) fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_builder() {
            return Self::NotSent {
                message: error.to_string(),
            };
        }
        Self::NoResponse {
            source: Box::new(error),
        }
    }
}

/// Classification of a normalized error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No response was received. Retried up to the configured ceiling.
    NetworkFailure,
    /// The provider answered with a 5xx status. Retried up to the ceiling.
    ServerFailure,
    /// The provider answered with a 4xx status. Never retried.
    ClientFailure,
    /// The provider answered 429; a client failure carrying a retry hint.
    RateLimited,
    /// The provider answered 401; a client failure.
    AuthExpired,
    /// The request was never issued.
    RequestNotSent,
}

impl ErrorKind {
    /// Returns `true` for 4xx failures, including rate limiting and expired auth.
    #[must_use]
    pub const fn is_client_failure(&self) -> bool {
        matches!(
            self,
            Self::ClientFailure | Self::RateLimited | Self::AuthExpired
        )
    }
}

/// The uniform error every caller-visible call failure is converted into.
///
/// An `ApiError` is built exactly once, when a failure is declared terminal,
/// and is immutable afterward except for message refinement by an
/// [`ErrorRemapper`]. The original failure is kept as the error
/// [`source`](std::error::Error::source) for diagnostics; it never leaks into
/// the message.
///
/// # Example
///
/// ```rust
/// use spotify_api::clients::{ApiError, TransportFailure};
///
/// let error = ApiError::from_failure(TransportFailure::NoResponse {
///     source: "connection reset".into(),
/// });
///
/// assert_eq!(error.status_code(), 0);
/// assert_eq!(error.message(), "No response received from server");
/// ```
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    message: String,
    status: Option<u16>,
    data: Option<serde_json::Value>,
    #[source]
    cause: TransportFailure,
}

impl ApiError {
    /// Normalizes a terminal failure.
    ///
    /// - A response with an error status takes the provider's
    ///   `error.message`, else a top-level `message`, else the status text,
    ///   else `"Request failed"`. The status and raw body are kept.
    /// - A missing response yields `"No response received from server"` with
    ///   status 0.
    /// - A request that was never sent keeps its own message (or
    ///   `"Request failed"`) and has no status.
    #[must_use]
    pub fn from_failure(cause: TransportFailure) -> Self {
        let (message, status, data) = match &cause {
            TransportFailure::Response(response) => (
                response_message(response),
                Some(response.status),
                Some(response.body.clone()),
            ),
            TransportFailure::NoResponse { .. } => (NO_RESPONSE_MESSAGE.to_string(), Some(0), None),
            TransportFailure::NotSent { message } => {
                let message = if message.is_empty() {
                    GENERIC_FAILURE_MESSAGE.to_string()
                } else {
                    message.clone()
                };
                (message, None, None)
            }
        };

        Self {
            message,
            status,
            data,
            cause,
        }
    }

    /// Returns this error with its message replaced.
    ///
    /// Status, data and cause are left untouched.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status, if one is known.
    ///
    /// A missing response reports `Some(0)`; a request that was never sent
    /// reports `None`.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns the numeric status, 0 when unknown.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status.unwrap_or(0)
    }

    /// Returns the raw response body, if a response was received.
    #[must_use]
    pub const fn data(&self) -> Option<&serde_json::Value> {
        self.data.as_ref()
    }

    /// Returns the original failure.
    #[must_use]
    pub const fn cause(&self) -> &TransportFailure {
        &self.cause
    }

    /// Returns the response that caused this error, if any.
    #[must_use]
    pub const fn response(&self) -> Option<&HttpResponse> {
        self.cause.response()
    }

    /// Classifies this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match &self.cause {
            TransportFailure::NotSent { .. } => ErrorKind::RequestNotSent,
            TransportFailure::NoResponse { .. } => ErrorKind::NetworkFailure,
            TransportFailure::Response(response) => match response.status {
                401 => ErrorKind::AuthExpired,
                429 => ErrorKind::RateLimited,
                500..=599 => ErrorKind::ServerFailure,
                _ => ErrorKind::ClientFailure,
            },
        }
    }
}

fn response_message(response: &HttpResponse) -> String {
    let body = &response.body;
    let non_empty = |text: &&str| !text.is_empty();
    body.get("error")
        .and_then(|error| error.get("message"))
        .and_then(serde_json::Value::as_str)
        .filter(non_empty)
        .or_else(|| {
            body.get("message")
                .and_then(serde_json::Value::as_str)
                .filter(non_empty)
        })
        .or_else(|| Some(response.status_text.as_str()).filter(non_empty))
        .unwrap_or(GENERIC_FAILURE_MESSAGE)
        .to_string()
}

/// Strategy that refines a normalized error for one provider.
///
/// Implementations may replace the message based on the status and payload
/// but must leave status, data and cause untouched; use
/// [`ApiError::with_message`].
pub trait ErrorRemapper: Send + Sync + fmt::Debug {
    /// Refines a normalized error.
    fn remap(&self, error: ApiError) -> ApiError;
}

/// The identity remapper used by a plain [`HttpClient`](crate::clients::HttpClient).
#[derive(Clone, Copy, Debug, Default)]
pub struct PassThrough;

impl ErrorRemapper for PassThrough {
    fn remap(&self, error: ApiError) -> ApiError {
        error
    }
}

/// Unified error type for all client errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// A call failed and was normalized.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The caller passed an unusable argument; no call was made.
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgumentError),
}

impl HttpError {
    /// Returns the normalized call error, if this is one.
    #[must_use]
    pub const fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(error) => Some(error),
            Self::InvalidArgument(_) => None,
        }
    }

    /// Returns the numeric status, 0 when unknown or when no call was made.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.as_api_error().map_or(0, ApiError::status_code)
    }
}
