//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::InvalidArgumentError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated bearer access token.
///
/// The token is never empty, and its `Debug` output is masked so it cannot
/// leak into logs by accident.
///
/// # Example
///
/// ```rust
/// use spotify_api::AccessToken;
///
/// let token = AccessToken::new("BQD-token").unwrap();
/// assert_eq!(token.bearer(), "Bearer BQD-token");
/// assert_eq!(format!("{:?}", token), "AccessToken(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Creates a new validated access token.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgumentError::MissingAccessToken`] if the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self, InvalidArgumentError> {
        let token = token.into();
        if token.is_empty() {
            return Err(InvalidArgumentError::MissingAccessToken);
        }
        Ok(Self(token))
    }

    /// Creates a token from a value that may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgumentError::MissingAccessToken`] if the token is
    /// `None` or empty.
    pub fn from_optional(token: Option<&str>) -> Result<Self, InvalidArgumentError> {
        token.map_or(Err(InvalidArgumentError::MissingAccessToken), Self::new)
    }

    /// Returns the `Authorization` header value for this token.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(*****)")
    }
}

/// A validated API base origin, such as `https://api.spotify.com/v1`.
///
/// The origin must carry an alphabetic scheme and a non-empty host. Any
/// trailing `/` is removed so paths can be appended directly.
///
/// # Example
///
/// ```rust
/// use spotify_api::BaseOrigin;
///
/// let origin = BaseOrigin::new("https://api.spotify.com/v1/").unwrap();
/// assert_eq!(origin.as_ref(), "https://api.spotify.com/v1");
/// assert_eq!(origin.scheme(), "https");
/// assert_eq!(origin.host_name(), "api.spotify.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseOrigin {
    url: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl BaseOrigin {
    /// Creates a new validated base origin.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgumentError::InvalidBaseOrigin`] if the origin is not
    /// an absolute URL.
    pub fn new(origin: impl Into<String>) -> Result<Self, InvalidArgumentError> {
        let origin = origin.into();
        let url = origin.trim().trim_end_matches('/').to_string();
        let invalid = || InvalidArgumentError::InvalidBaseOrigin {
            origin: origin.clone(),
        };

        let scheme_end = url.find("://").ok_or_else(invalid)?;
        let scheme = &url[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }

        let host_start = scheme_end + 3;
        if host_start >= url.len() {
            return Err(invalid());
        }

        // Host ends at port, path, query, or end of string
        let remainder = &url[host_start..];
        let host_end = remainder
            .find([':', '/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);
        if host_end == host_start {
            return Err(invalid());
        }

        Ok(Self {
            url,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns the host name portion of the origin.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.url[self.host_start..self.host_end]
    }

    /// Joins a request path onto this origin.
    ///
    /// Exactly one `/` separates the origin from the path.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.url, path.trim_start_matches('/'))
    }
}

impl AsRef<str> for BaseOrigin {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for BaseOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl Serialize for BaseOrigin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.url)
    }
}

impl<'de> Deserialize<'de> for BaseOrigin {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(de::Error::custom)
    }
}
