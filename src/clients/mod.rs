//! HTTP client types for outbound API communication.
//!
//! This module provides the resilient client layer: a generic base client
//! with timeout, retry and error normalization, and the provider-bound
//! [`spotify::SpotifyClient`] built on top of it.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpClient`]: The async base client with generic verb methods
//! - [`HttpRequest`]: A request to be sent through the base client
//! - [`HttpResponse`]: A response received from the provider
//! - [`HttpMethod`]: Supported HTTP methods
//! - [`RequestOptions`]: Per-call query parameters and headers
//! - [`RetryPolicy`] and [`execute_with_retry`]: The explicit retry loop
//! - [`ApiError`]: The normalized error every failed call becomes
//! - [`ErrorRemapper`]: Strategy hook for provider-specific error messages
//! - [`spotify::SpotifyClient`]: Client bound to the Spotify Web API
//!
//! # Example
//!
//! ```rust,ignore
//! use spotify_api::{ClientConfig, HttpClient, HttpMethod, HttpRequest};
//!
//! let config = ClientConfig::builder()
//!     .base_origin("https://api.example.com")
//!     .build();
//! let client = HttpClient::new(config);
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "/status")
//!     .query_param("verbose", "true")
//!     .build()
//!     .unwrap();
//!
//! let response = client.request(request).await?;
//! ```
//!
//! # Retry Behavior
//!
//! - **No response** (timeout, refused connection): retried
//! - **5xx**: retried
//! - **4xx**: returned immediately without retry
//!
//! Retries wait `base_retry_delay * 2^(n-1)` before retry `n`, up to
//! `max_retries` retries after the first attempt.

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod retry;
pub mod spotify;

pub use errors::{
    ApiError, ErrorKind, ErrorRemapper, HttpError, PassThrough, TransportFailure,
    GENERIC_FAILURE_MESSAGE, NO_RESPONSE_MESSAGE,
};
pub use http_client::{HttpClient, REDACTED_BEARER};
pub use http_request::{
    HttpMethod, HttpRequest, HttpRequestBuilder, RequestOptions, AUTHORIZATION_HEADER,
};
pub use http_response::HttpResponse;
pub use retry::{execute_with_retry, CallContext, RetryPolicy};

// Re-export Spotify client types at the clients module level
pub use spotify::{SpotifyClient, SpotifyError};
