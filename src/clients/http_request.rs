//! HTTP request types for the API client layer.
//!
//! This module provides the [`HttpRequest`] type and its builder for
//! constructing outbound calls.

use std::collections::HashMap;
use std::fmt;

use crate::clients::errors::TransportFailure;
use crate::config::AccessToken;

/// Name of the header carrying bearer credentials.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// HTTP methods supported by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for replacing resources or triggering actions.
    Put,
    /// HTTP PATCH method for partial updates.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns the upper-case wire name of this method.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Patch => Self::PATCH,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// An outbound call, relative to the client's base origin.
///
/// Use [`HttpRequest::builder`] to construct requests with the builder pattern.
///
/// # Example
///
/// ```rust
/// use spotify_api::clients::{HttpRequest, HttpMethod};
/// use serde_json::json;
///
/// let request = HttpRequest::builder(HttpMethod::Get, "/me/following")
///     .query_param("type", "artist")
///     .query_param("limit", "20")
///     .build()
///     .unwrap();
/// assert_eq!(request.path_with_query(), "/me/following?type=artist&limit=20");
///
/// let request = HttpRequest::builder(HttpMethod::Put, "/me/player/play")
///     .body(json!({"uris": ["spotify:track:1"]}))
///     .build()
///     .unwrap();
/// assert!(request.body.is_some());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The path, relative to the base origin.
    pub path: String,
    /// The JSON request body, if any.
    pub body: Option<serde_json::Value>,
    /// Query parameters, in the order they were added.
    pub query: Vec<(String, String)>,
    /// Headers layered over the client's default headers for this call only.
    pub extra_headers: HashMap<String, String>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }

    /// Validates the request before it is handed to the transport.
    ///
    /// # Errors
    ///
    /// Returns [`TransportFailure::NotSent`] if the path is empty.
    pub fn verify(&self) -> Result<(), TransportFailure> {
        if self.path.trim().is_empty() {
            return Err(TransportFailure::NotSent {
                message: "Request path cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the path with its percent-encoded query string appended.
    #[must_use]
    pub fn path_with_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }

        let query = self
            .query
            .iter()
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&");

        let separator = if self.path.contains('?') { '&' } else { '?' };
        format!("{}{separator}{query}", self.path)
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    path: String,
    body: Option<serde_json::Value>,
    query: Vec<(String, String)>,
    extra_headers: HashMap<String, String>,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            http_method: method,
            path: path.into(),
            body: None,
            query: Vec::new(),
            extra_headers: HashMap::new(),
        }
    }

    /// Sets the JSON request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the request body when one is present.
    #[must_use]
    pub fn maybe_body(mut self, body: Option<serde_json::Value>) -> Self {
        self.body = body;
        self
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Adds a single extra header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }

    /// Merges per-call options into this request.
    #[must_use]
    pub fn options(mut self, options: RequestOptions) -> Self {
        self.query.extend(options.query);
        self.extra_headers.extend(options.headers);
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`TransportFailure::NotSent`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, TransportFailure> {
        let request = HttpRequest {
            http_method: self.http_method,
            path: self.path,
            body: self.body,
            query: self.query,
            extra_headers: self.extra_headers,
        };
        request.verify()?;
        Ok(request)
    }
}

/// Per-call options accepted by the verb methods of
/// [`HttpClient`](crate::clients::HttpClient).
///
/// # Example
///
/// ```rust
/// use spotify_api::AccessToken;
/// use spotify_api::clients::RequestOptions;
///
/// let token = AccessToken::new("tok").unwrap();
/// let options = RequestOptions::new()
///     .query_param("limit", "10")
///     .bearer(&token);
///
/// assert_eq!(options.headers.get("Authorization"), Some(&"Bearer tok".to_string()));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Query parameters, in the order they were added.
    pub query: Vec<(String, String)>,
    /// Headers layered over the client's default headers.
    pub headers: HashMap<String, String>,
}

impl RequestOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Adds a query parameter when the value is present.
    #[must_use]
    pub fn optional_query_param(self, key: impl Into<String>, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.query_param(key, value),
            None => self,
        }
    }

    /// Adds a single header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Authenticates this call only, regardless of the client's default headers.
    #[must_use]
    pub fn bearer(self, token: &AccessToken) -> Self {
        self.header(AUTHORIZATION_HEADER, token.bearer())
    }
}
