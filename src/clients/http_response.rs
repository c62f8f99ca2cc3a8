//! HTTP response types for the API client layer.
//!
//! This module provides the [`HttpResponse`] type returned by the transport
//! for every call that received a response, successful or not.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// A response received from the downstream provider.
///
/// Header names are stored lower-cased; a header may carry several values.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub status: u16,
    /// The canonical reason phrase for the status, if any.
    pub status_text: String,
    /// Response headers (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed response body; `Null` when the body was empty.
    pub body: serde_json::Value,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, deriving the status text from the code.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, Vec<String>>, body: serde_json::Value) -> Self {
        let status_text = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or_default()
            .to_string();

        Self {
            status,
            status_text,
            headers,
            body,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status >= 200 && self.status <= 299
    }

    /// Returns `true` if the response status code is in the 5xx range.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status <= 599
    }

    /// Returns the first value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the raw `Retry-After` header value, if present.
    #[must_use]
    pub fn retry_after(&self) -> Option<&str> {
        self.header("retry-after")
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Returns a human-readable retry hint in seconds.
    ///
    /// `Retry-After` may carry either delta-seconds or an HTTP-date. Dates
    /// are converted to the number of whole seconds from `now`, never
    /// negative. Any other value is passed through untouched.
    #[must_use]
    pub fn retry_after_hint(&self, now: DateTime<Utc>) -> Option<String> {
        let raw = self.retry_after()?;
        if raw.parse::<f64>().is_ok() {
            return Some(raw.to_string());
        }

        match DateTime::parse_from_rfc2822(raw) {
            Ok(at) => {
                let seconds = at.with_timezone(&Utc).signed_duration_since(now).num_seconds();
                Some(seconds.max(0).to_string())
            }
            Err(_) => Some(raw.to_string()),
        }
    }

    /// Parses reqwest response headers into a lower-cased multi-map.
    pub(crate) fn parse_headers(headers: &reqwest::header::HeaderMap) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Parses a response body as JSON.
    ///
    /// Empty bodies become `Null`; bodies that are not JSON are kept as a
    /// JSON string so nothing the provider sent is lost.
    pub(crate) fn parse_body(text: &str) -> serde_json::Value {
        if text.trim().is_empty() {
            return serde_json::Value::Null;
        }
        serde_json::from_str(text).unwrap_or_else(|_| serde_json::Value::String(text.to_string()))
    }
}
