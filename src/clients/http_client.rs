//! Base HTTP client shared by every provider client.
//!
//! This module provides the [`HttpClient`] type: one configured transport,
//! a set of mutable default headers, the retry loop, and uniform error
//! normalization.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::clients::errors::{ApiError, ErrorRemapper, HttpError, PassThrough, TransportFailure};
use crate::clients::http_request::{HttpMethod, HttpRequest, RequestOptions, AUTHORIZATION_HEADER};
use crate::clients::http_response::HttpResponse;
use crate::clients::retry::{execute_with_retry, CallContext, RetryPolicy};
use crate::config::{BaseOrigin, ClientConfig};

/// Replacement logged in place of a bearer credential.
pub const REDACTED_BEARER: &str = "Bearer [REDACTED]";

/// HTTP client for JSON APIs.
///
/// The client handles:
/// - Joining request paths onto the configured base origin
/// - Default headers, mutable between calls through `&mut self`
/// - Retrying network failures and 5xx responses with exponential backoff
/// - Normalizing every terminal failure into an [`ApiError`]
/// - Logging each call with credentials redacted
///
/// Provider clients wrap an `HttpClient` and plug in an [`ErrorRemapper`]
/// to refine error messages.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`. Calls take `&self`, so any number of calls
/// may be in flight at once; each owns its own retry state. Changing default
/// headers requires `&mut self` and therefore cannot overlap a call.
///
/// # Example
///
/// ```rust,ignore
/// use spotify_api::{ClientConfig, HttpClient};
///
/// let config = ClientConfig::builder()
///     .base_origin("https://api.example.com/v1")
///     .build();
/// let client = HttpClient::new(config);
///
/// let body = client.get("/status", None).await?;
/// ```
pub struct HttpClient {
    client: reqwest::Client,
    config: ClientConfig,
    default_headers: HashMap<String, String>,
    policy: RetryPolicy,
    remapper: Arc<dyn ErrorRemapper>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new client that reports normalized errors unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    ///
    /// # Example
    ///
    /// ```rust
    /// use spotify_api::{ClientConfig, HttpClient};
    ///
    /// let client = HttpClient::new(ClientConfig::default());
    /// assert_eq!(
    ///     client.default_headers().get("Content-Type"),
    ///     Some(&"application/json".to_string())
    /// );
    /// ```
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self::with_remapper(config, Arc::new(PassThrough))
    }

    /// Creates a new client whose normalized errors pass through `remapper`.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created.
    #[must_use]
    pub fn with_remapper(config: ClientConfig, remapper: Arc<dyn ErrorRemapper>) -> Self {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            default_headers: config.default_headers().clone(),
            policy: RetryPolicy::from_config(&config),
            config,
            remapper,
        }
    }

    /// Returns the configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the origin request paths are joined onto, if configured.
    #[must_use]
    pub const fn base_origin(&self) -> Option<&BaseOrigin> {
        self.config.base_origin()
    }

    /// Returns the retry policy applied to every call.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Returns the headers currently sent with every request.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sets a header sent with every subsequent request.
    pub fn set_default_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.default_headers.insert(key.into(), value.into());
    }

    /// Removes a default header, matching the name case-insensitively.
    ///
    /// Returns the removed value, if any.
    pub fn remove_default_header(&mut self, key: &str) -> Option<String> {
        let stored = self
            .default_headers
            .keys()
            .find(|name| name.eq_ignore_ascii_case(key))
            .cloned()?;
        self.default_headers.remove(&stored)
    }

    /// Returns a copy of `headers` that is safe to log.
    ///
    /// A bearer `Authorization` value is replaced with `Bearer [REDACTED]`.
    /// The header name is matched case-insensitively; every other header is
    /// copied unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use spotify_api::HttpClient;
    ///
    /// let mut headers = HashMap::new();
    /// headers.insert("Authorization".to_string(), "Bearer abc123".to_string());
    /// headers.insert("X-Other".to_string(), "v".to_string());
    ///
    /// let safe = HttpClient::sanitize_headers(&headers);
    /// assert_eq!(safe["Authorization"], "Bearer [REDACTED]");
    /// assert_eq!(safe["X-Other"], "v");
    /// ```
    #[must_use]
    pub fn sanitize_headers(headers: &HashMap<String, String>) -> HashMap<String, String> {
        headers
            .iter()
            .map(|(name, value)| {
                let value = if name.eq_ignore_ascii_case(AUTHORIZATION_HEADER)
                    && is_bearer(value)
                {
                    REDACTED_BEARER.to_string()
                } else {
                    value.clone()
                };
                (name.clone(), value)
            })
            .collect()
    }

    /// Sends a request, retrying per the client's policy.
    ///
    /// Per-request headers are layered over the default headers. A 2xx
    /// response is returned as is; anything else ends up as a normalized,
    /// remapped [`ApiError`].
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Api`] when the request fails validation, receives
    /// no response, or receives a non-2xx response after retries are exhausted.
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        if let Err(failure) = request.verify() {
            return Err(self.fail(request.http_method, &request.path, failure));
        }

        let mut headers = self.default_headers.clone();
        headers.extend(request.extra_headers.clone());

        let mut ctx = CallContext::new(
            request.http_method,
            request.path_with_query(),
            headers,
            request.body,
        );

        let origin = self.base_origin().map_or("", |base| base.as_ref());
        let url = match self.base_origin() {
            Some(base) => base.join(&ctx.path),
            None => ctx.path.clone(),
        };

        let outcome = execute_with_retry(&self.policy, &mut ctx, |ctx| {
            tracing::debug!(
                method = %ctx.method,
                path = %ctx.path,
                origin = %origin,
                headers = ?Self::sanitize_headers(&ctx.headers),
                attempt = ctx.attempt_count(),
                "Making API request"
            );

            let mut builder = self.client.request(ctx.method.into(), &url);
            for (key, value) in &ctx.headers {
                builder = builder.header(key, value);
            }
            if let Some(body) = &ctx.body {
                builder = builder.body(body.to_string());
            }

            let method = ctx.method;
            let path = ctx.path.clone();
            async move {
                let res = builder.send().await.map_err(TransportFailure::from_reqwest)?;

                let status = res.status().as_u16();
                let headers = HttpResponse::parse_headers(res.headers());
                let text = res.text().await.map_err(TransportFailure::from_reqwest)?;
                let response = HttpResponse::new(status, headers, HttpResponse::parse_body(&text));

                if !response.is_ok() {
                    return Err(TransportFailure::Response(response));
                }

                tracing::debug!(
                    status = response.status,
                    status_text = %response.status_text,
                    method = %method,
                    path = %path,
                    "API request successful"
                );
                Ok(response)
            }
        })
        .await;

        outcome.map_err(|failure| self.fail(ctx.method, &ctx.path, failure))
    }

    /// Sends a GET request and returns the response body.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn get(&self, path: &str, options: Option<RequestOptions>) -> Result<Value, HttpError> {
        self.send(HttpMethod::Get, path, None, options).await
    }

    /// Sends a POST request and returns the response body.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn post(
        &self,
        path: &str,
        body: Option<Value>,
        options: Option<RequestOptions>,
    ) -> Result<Value, HttpError> {
        self.send(HttpMethod::Post, path, body, options).await
    }

    /// Sends a PUT request and returns the response body.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn put(
        &self,
        path: &str,
        body: Option<Value>,
        options: Option<RequestOptions>,
    ) -> Result<Value, HttpError> {
        self.send(HttpMethod::Put, path, body, options).await
    }

    /// Sends a PATCH request and returns the response body.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn patch(
        &self,
        path: &str,
        body: Option<Value>,
        options: Option<RequestOptions>,
    ) -> Result<Value, HttpError> {
        self.send(HttpMethod::Patch, path, body, options).await
    }

    /// Sends a DELETE request and returns the response body.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn delete(
        &self,
        path: &str,
        options: Option<RequestOptions>,
    ) -> Result<Value, HttpError> {
        self.send(HttpMethod::Delete, path, None, options).await
    }

    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
        options: Option<RequestOptions>,
    ) -> Result<Value, HttpError> {
        let request = HttpRequest::builder(method, path)
            .maybe_body(body)
            .options(options.unwrap_or_default());

        let request = match request.build() {
            Ok(request) => request,
            Err(failure) => return Err(self.fail(method, path, failure)),
        };

        Ok(self.request(request).await?.body)
    }

    /// Normalizes and remaps a terminal failure, logging it once.
    fn fail(&self, method: HttpMethod, path: &str, failure: TransportFailure) -> HttpError {
        let error = self.remapper.remap(ApiError::from_failure(failure));

        tracing::error!(
            error_message = %error.message(),
            status = ?error.status(),
            method = %method,
            path = %path,
            "API request failed"
        );

        HttpError::Api(error)
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_origin", &self.base_origin())
            .field("default_headers", &Self::sanitize_headers(&self.default_headers))
            .field("policy", &self.policy)
            .field("remapper", &self.remapper)
            .finish_non_exhaustive()
    }
}

fn is_bearer(value: &str) -> bool {
    value
        .get(..7)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("Bearer "))
}
