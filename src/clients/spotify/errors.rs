//! Spotify-specific error types.
//!
//! - [`SpotifyErrorRemapper`]: Replaces normalized messages with Spotify-aware ones
//! - [`SpotifyError`]: Error type returned by every [`SpotifyClient`](super::SpotifyClient) operation
//!
//! # Example
//!
//! ```rust,ignore
//! use spotify_api::clients::{ErrorKind, spotify::SpotifyError};
//!
//! match client.top_tracks(10, TimeRange::ShortTerm).await {
//!     Ok(tracks) => println!("{} tracks", tracks.len()),
//!     Err(SpotifyError::Http(e)) if e.status_code() == 401 => {
//!         // "Spotify authentication expired. Please re-authenticate."
//!         println!("{e}");
//!     }
//!     Err(e) => println!("Spotify call failed: {e}"),
//! }
//! ```

use chrono::Utc;
use thiserror::Error;

use crate::clients::{ApiError, ErrorRemapper, HttpError};
use crate::error::InvalidArgumentError;

/// Provider reason code for actions that need a paid subscription.
pub const PREMIUM_REQUIRED_REASON: &str = "PREMIUM_REQUIRED";

/// Refines normalized errors with messages meaningful to Spotify users.
///
/// Only the message changes; status, data and cause are kept.
///
/// | Status | Message |
/// |---|---|
/// | 401 | `Spotify authentication expired. Please re-authenticate.` |
/// | 403, reason `PREMIUM_REQUIRED` | `Spotify Premium subscription required for this action.` |
/// | other 403 | `Access forbidden. Check your Spotify permissions.` |
/// | 404 | `Spotify resource not found. The requested item may not exist.` |
/// | 429 | `Rate limit exceeded. Retry after <n> seconds.` |
///
/// Any other status keeps the base message.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use spotify_api::clients::{ApiError, ErrorRemapper, HttpResponse, TransportFailure};
/// use spotify_api::clients::spotify::SpotifyErrorRemapper;
///
/// let mut headers = HashMap::new();
/// headers.insert("retry-after".to_string(), vec!["5".to_string()]);
/// let failure = TransportFailure::Response(HttpResponse::new(429, headers, serde_json::Value::Null));
///
/// let error = SpotifyErrorRemapper.remap(ApiError::from_failure(failure));
/// assert_eq!(error.message(), "Rate limit exceeded. Retry after 5 seconds.");
/// assert_eq!(error.status_code(), 429);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct SpotifyErrorRemapper;

impl ErrorRemapper for SpotifyErrorRemapper {
    fn remap(&self, error: ApiError) -> ApiError {
        let Some(response) = error.response() else {
            return error;
        };

        let message = match response.status {
            401 => "Spotify authentication expired. Please re-authenticate.".to_string(),
            403 => {
                let reason = response
                    .body
                    .get("error")
                    .and_then(|e| e.get("reason"))
                    .and_then(serde_json::Value::as_str);
                if reason == Some(PREMIUM_REQUIRED_REASON) {
                    "Spotify Premium subscription required for this action.".to_string()
                } else {
                    "Access forbidden. Check your Spotify permissions.".to_string()
                }
            }
            404 => "Spotify resource not found. The requested item may not exist.".to_string(),
            429 => {
                let hint = response
                    .retry_after_hint(Utc::now())
                    .unwrap_or_else(|| "a few".to_string());
                format!("Rate limit exceeded. Retry after {hint} seconds.")
            }
            _ => return error,
        };

        error.with_message(message)
    }
}

/// Error type for Spotify client operations.
#[derive(Debug, Error)]
pub enum SpotifyError {
    /// The call failed; the message has already been remapped.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The caller passed an unusable argument; no call was made.
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgumentError),

    /// The provider answered 2xx with a body that does not have the expected shape.
    #[error("Unexpected Spotify payload for {operation}: {source}")]
    UnexpectedPayload {
        /// The operation whose response could not be read.
        operation: &'static str,
        /// The decoding error.
        #[source]
        source: serde_json::Error,
    },
}

impl SpotifyError {
    /// Returns the normalized call error, if a call was made and failed.
    #[must_use]
    pub const fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Http(error) => error.as_api_error(),
            Self::InvalidArgument(_) | Self::UnexpectedPayload { .. } => None,
        }
    }

    /// Returns the numeric status, 0 when unknown or when no call failed.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.as_api_error().map_or(0, ApiError::status_code)
    }
}

impl From<ApiError> for SpotifyError {
    fn from(error: ApiError) -> Self {
        Self::Http(HttpError::Api(error))
    }
}
