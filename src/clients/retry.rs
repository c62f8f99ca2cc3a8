//! Retry policy and the explicit retry loop.
//!
//! The loop takes the call action and the policy as parameters, so retry
//! termination and delay computation can be exercised without a transport.
//!
//! # Retry Behavior
//!
//! - **No response** (connection refused, timeout, DNS failure): retried
//! - **5xx**: retried
//! - **Anything else** (4xx, including 401 and 429): surfaced immediately
//!
//! The delay before retry `n` (1-based) is `base_delay * 2^(n-1)`, so the
//! default policy waits 1s, 2s, 4s. There is no jitter and no upper bound;
//! the multiplication saturates instead of overflowing.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use crate::clients::errors::TransportFailure;
use crate::clients::http_request::HttpMethod;
use crate::config::ClientConfig;

/// Decides whether a failed attempt is retried and how long to wait first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy allowing `max_retries` retries after the first attempt.
    #[must_use]
    pub const fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Builds the policy described by a client configuration.
    #[must_use]
    pub const fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.max_retries(), config.base_retry_delay())
    }

    /// Returns the retry ceiling.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns `true` if a call that has already been retried
    /// `attempt_count` times may be retried after `failure`.
    #[must_use]
    pub fn should_retry(&self, attempt_count: u32, failure: &TransportFailure) -> bool {
        if attempt_count >= self.max_retries {
            return false;
        }

        match failure {
            TransportFailure::NoResponse { .. } => true,
            TransportFailure::Response(response) => response.is_server_error(),
            TransportFailure::NotSent { .. } => false,
        }
    }

    /// Returns the delay before retry number `retry` (1-based).
    #[must_use]
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let multiplier = 2u32.saturating_pow(retry.saturating_sub(1));
        self.base_delay.saturating_mul(multiplier)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

/// The state of one call, owned by the retry loop for that call.
///
/// A context is created per call and dropped when the call resolves or
/// fails terminally; it is never shared across calls.
#[derive(Clone, Debug, PartialEq)]
pub struct CallContext {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The path, including the encoded query string.
    pub path: String,
    /// The full header set sent with every attempt.
    pub headers: HashMap<String, String>,
    /// The JSON body, if any.
    pub body: Option<serde_json::Value>,
    attempt_count: u32,
}

impl CallContext {
    /// Creates a context for a call that has not been attempted yet.
    #[must_use]
    pub fn new(
        method: HttpMethod,
        path: impl Into<String>,
        headers: HashMap<String, String>,
        body: Option<serde_json::Value>,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            headers,
            body,
            attempt_count: 0,
        }
    }

    /// Returns how many retries have been performed so far.
    #[must_use]
    pub const fn attempt_count(&self) -> u32 {
        self.attempt_count
    }
}

/// Runs `action` until it succeeds or `policy` declines another retry.
///
/// Before each retry the context's attempt count is incremented and the loop
/// sleeps for the policy's backoff delay. The sleep only suspends this call;
/// other calls on the same client keep running. On terminal failure the last
/// [`TransportFailure`] is returned unchanged.
///
/// # Errors
///
/// Returns the last failure once the policy declines to retry it.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use std::time::Duration;
/// use spotify_api::clients::{execute_with_retry, CallContext, HttpMethod, RetryPolicy, TransportFailure};
///
/// # tokio_test::block_on(async {
/// let policy = RetryPolicy::new(2, Duration::from_millis(1));
/// let mut ctx = CallContext::new(HttpMethod::Get, "/me", HashMap::new(), None);
///
/// let result: Result<u32, TransportFailure> = execute_with_retry(&policy, &mut ctx, |ctx| {
///     let attempt = ctx.attempt_count();
///     async move {
///         if attempt < 2 {
///             Err(TransportFailure::NoResponse { source: "reset".into() })
///         } else {
///             Ok(attempt)
///         }
///     }
/// })
/// .await;
///
/// assert_eq!(result.unwrap(), 2);
/// # });
/// ```
pub async fn execute_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    ctx: &mut CallContext,
    mut action: F,
) -> Result<T, TransportFailure>
where
    F: FnMut(&CallContext) -> Fut,
    Fut: Future<Output = Result<T, TransportFailure>>,
{
    loop {
        let failure = match action(&*ctx).await {
            Ok(value) => return Ok(value),
            Err(failure) => failure,
        };

        if !policy.should_retry(ctx.attempt_count, &failure) {
            return Err(failure);
        }

        ctx.attempt_count += 1;
        let delay = policy.backoff_delay(ctx.attempt_count);

        tracing::warn!(
            attempt = ctx.attempt_count,
            max_retries = policy.max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            method = %ctx.method,
            path = %ctx.path,
            "Retrying API request"
        );

        tokio::time::sleep(delay).await;
    }
}
