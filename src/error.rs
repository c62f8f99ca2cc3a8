//! Caller-misuse error types for the Spotify API client.
//!
//! Everything in this module is raised synchronously, at the call site that
//! misused the API, and never after a network round trip.
//!
//! # Example
//!
//! ```rust
//! use spotify_api::{AccessToken, InvalidArgumentError};
//!
//! let result = AccessToken::new("");
//! assert!(matches!(result, Err(InvalidArgumentError::MissingAccessToken)));
//! ```

use thiserror::Error;

/// Errors raised when a caller passes an argument the client cannot use.
///
/// Each variant carries a message that is safe to show to an end user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidArgumentError {
    /// An access token was empty or absent.
    #[error("Access token is required")]
    MissingAccessToken,

    /// A track URI was empty.
    #[error("Track URI is required")]
    MissingTrackUri,

    /// A top-track index fell outside `1..=10`.
    #[error("Song index must be between 1 and 10")]
    TopTrackIndexOutOfRange {
        /// The index that was requested.
        index: usize,
    },

    /// The provider returned fewer top tracks than the requested index.
    #[error("Only {available} tracks available")]
    TopTrackUnavailable {
        /// The index that was requested.
        index: usize,
        /// How many tracks the provider actually returned.
        available: usize,
    },

    /// A base origin is not an absolute URL.
    #[error("Invalid base origin '{origin}'. Expected an absolute URL such as 'https://api.example.com'.")]
    InvalidBaseOrigin {
        /// The rejected origin.
        origin: String,
    },
}
