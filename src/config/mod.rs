//! Configuration types for the API client layer.
//!
//! This module provides the configuration used to construct an
//! [`HttpClient`](crate::clients::HttpClient) and its provider-specific
//! wrappers.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ClientConfig`]: The immutable configuration of one client instance
//! - [`ClientConfigBuilder`]: Optional overrides merged over a base configuration
//! - [`AccessToken`]: A validated bearer token with masked debug output
//! - [`BaseOrigin`]: A validated absolute origin that request paths are joined onto
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use spotify_api::ClientConfig;
//!
//! let config = ClientConfig::builder()
//!     .timeout_ms(5_000)
//!     .max_retries(1)
//!     .build();
//!
//! assert_eq!(config.timeout(), Duration::from_millis(5_000));
//! assert_eq!(config.max_retries(), 1);
//! assert_eq!(config.base_retry_delay(), Duration::from_millis(1_000));
//! ```

mod newtypes;

pub use newtypes::{AccessToken, BaseOrigin};

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default per-attempt timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay before the first retry, in milliseconds.
pub const DEFAULT_BASE_RETRY_DELAY_MS: u64 = 1_000;

/// Library version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration for one client instance.
///
/// A `ClientConfig` is set once at construction and never changes
/// afterward. The retry ceiling is unsigned and the retry delay is always
/// non-zero.
///
/// # Defaults
///
/// - `timeout`: 10 seconds per attempt
/// - `max_retries`: 3
/// - `base_retry_delay`: 1 second
/// - `base_origin`: `None`
/// - default headers: `Content-Type: application/json` and an identifying `User-Agent`
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    timeout: Duration,
    max_retries: u32,
    base_retry_delay: Duration,
    base_origin: Option<BaseOrigin>,
    default_headers: HashMap<String, String>,
}

impl ClientConfig {
    /// Creates a new builder of overrides for a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the per-attempt timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns how many times a failed call may be retried.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns the delay before the first retry.
    #[must_use]
    pub const fn base_retry_delay(&self) -> Duration {
        self.base_retry_delay
    }

    /// Returns the origin request paths are joined onto, if configured.
    #[must_use]
    pub const fn base_origin(&self) -> Option<&BaseOrigin> {
        self.base_origin.as_ref()
    }

    /// Returns the headers sent with every request.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        let mut default_headers = HashMap::new();
        default_headers.insert("Content-Type".to_string(), "application/json".to_string());
        default_headers.insert("User-Agent".to_string(), user_agent(None));

        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_retries: DEFAULT_MAX_RETRIES,
            base_retry_delay: Duration::from_millis(DEFAULT_BASE_RETRY_DELAY_MS),
            base_origin: None,
            default_headers,
        }
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

fn user_agent(prefix: Option<&str>) -> String {
    let prefix = prefix.map_or(String::new(), |prefix| format!("{prefix} | "));
    let rust_version = env!("CARGO_PKG_RUST_VERSION");
    format!("{prefix}Spotify API Library v{SDK_VERSION} | Rust {rust_version}")
}

/// Overrides for a [`ClientConfig`].
///
/// Every field is optional; only the fields that were set replace the
/// corresponding field of the base configuration. The builder deserializes
/// from the same field names, so overrides can come from a settings file.
///
/// Malformed values (a zero timeout, a zero retry delay, an origin that is
/// not an absolute URL) are ignored with a warning and the base value is kept.
///
/// # Example
///
/// ```rust
/// use spotify_api::{ClientConfig, ClientConfigBuilder};
///
/// let overrides: ClientConfigBuilder =
///     serde_json::from_str(r#"{"max_retries": 5, "base_retry_delay_ms": 250}"#).unwrap();
/// let config = overrides.build();
///
/// assert_eq!(config.max_retries(), 5);
/// assert_eq!(config.base_retry_delay().as_millis(), 250);
/// assert_eq!(config.timeout().as_millis(), 10_000);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigBuilder {
    timeout_ms: Option<u64>,
    max_retries: Option<u32>,
    base_retry_delay_ms: Option<u64>,
    base_origin: Option<String>,
    user_agent_prefix: Option<String>,
    default_headers: HashMap<String, String>,
}

impl ClientConfigBuilder {
    /// Creates a builder with no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the per-attempt timeout, in milliseconds.
    #[must_use]
    pub const fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Overrides the retry ceiling.
    #[must_use]
    pub const fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Overrides the delay before the first retry, in milliseconds.
    #[must_use]
    pub const fn base_retry_delay_ms(mut self, delay_ms: u64) -> Self {
        self.base_retry_delay_ms = Some(delay_ms);
        self
    }

    /// Overrides the origin request paths are joined onto.
    #[must_use]
    pub fn base_origin(mut self, origin: impl Into<String>) -> Self {
        self.base_origin = Some(origin.into());
        self
    }

    /// Sets a prefix for the `User-Agent` header.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Adds a header sent with every request.
    #[must_use]
    pub fn default_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Applies these overrides over [`ClientConfig::default`].
    #[must_use]
    pub fn build(self) -> ClientConfig {
        self.apply(ClientConfig::default())
    }

    /// Applies these overrides over an arbitrary base configuration.
    ///
    /// Provider clients use this to layer caller overrides over their own
    /// tuned defaults.
    #[must_use]
    pub fn apply(self, base: ClientConfig) -> ClientConfig {
        let mut config = base;

        match self.timeout_ms {
            Some(0) => tracing::warn!("Ignoring zero timeout override, keeping {:?}", config.timeout),
            Some(ms) => config.timeout = Duration::from_millis(ms),
            None => {}
        }

        if let Some(max_retries) = self.max_retries {
            config.max_retries = max_retries;
        }

        match self.base_retry_delay_ms {
            Some(0) => tracing::warn!(
                "Ignoring zero retry delay override, keeping {:?}",
                config.base_retry_delay
            ),
            Some(ms) => config.base_retry_delay = Duration::from_millis(ms),
            None => {}
        }

        if let Some(origin) = self.base_origin {
            match BaseOrigin::new(origin) {
                Ok(origin) => config.base_origin = Some(origin),
                Err(e) => tracing::warn!("Ignoring base origin override: {}", e),
            }
        }

        if let Some(prefix) = self.user_agent_prefix.as_deref() {
            config
                .default_headers
                .insert("User-Agent".to_string(), user_agent(Some(prefix)));
        }

        config.default_headers.extend(self.default_headers);
        config
    }
}
