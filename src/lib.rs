//! # Spotify API Rust Client
//!
//! A resilient async client for the Spotify Web API, built on a generic HTTP
//! client with timeouts, exponential-backoff retries and uniform error
//! normalization.
//!
//! ## Overview
//!
//! This crate provides:
//! - Instance-based configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - Validated newtypes for access tokens and base origins
//! - A base [`HttpClient`] that retries network failures and 5xx responses
//! - A single normalized error shape ([`clients::ApiError`]) for every failed call
//! - A [`SpotifyClient`] with typed playback, library and device operations
//!
//! ## Quick Start
//!
//! ```rust
//! use spotify_api::{ClientConfig, SpotifyClient};
//!
//! // Spotify defaults, with one retry instead of two
//! let mut client = SpotifyClient::new(Some(ClientConfig::builder().max_retries(1)));
//! client.set_access_token("user-access-token").unwrap();
//!
//! assert_eq!(client.config().max_retries(), 1);
//! ```
//!
//! ## Making Spotify Calls
//!
//! ```rust,ignore
//! use spotify_api::SpotifyClient;
//! use spotify_api::clients::spotify::TimeRange;
//!
//! let client = SpotifyClient::for_access_token("user-access-token", None)?;
//!
//! let top = client.top_tracks(10, TimeRange::MediumTerm).await?;
//! let played = client.play_top_track(3, None).await?;
//! println!("{}", played.message); // "Now playing: <name> by <artist>"
//! ```
//!
//! ## Error Handling
//!
//! Every failed call is normalized into an [`ApiError`](clients::ApiError)
//! carrying a message, a numeric status (0 when no response was received)
//! and the original cause. The Spotify client refines the message:
//!
//! ```rust,ignore
//! match client.user_profile().await {
//!     Ok(profile) => println!("Hello {}", profile.id),
//!     Err(e) if e.status_code() == 401 => {
//!         // "Spotify authentication expired. Please re-authenticate."
//!         eprintln!("{e}");
//!     }
//!     Err(e) => eprintln!("Request failed: {e}"),
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: Caller misuse is reported before any network call
//! - **Thread-safe**: All clients are `Send + Sync`
//! - **Async-first**: Designed for use with the Tokio async runtime
//! - **Quiet by default**: Events go through `tracing`; no subscriber is installed

pub mod clients;
pub mod config;
pub mod error;

// Re-export public types at crate root for convenience
pub use config::{AccessToken, BaseOrigin, ClientConfig, ClientConfigBuilder};
pub use error::InvalidArgumentError;

// Re-export HTTP client types
pub use clients::{
    ApiError, ErrorKind, HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder,
    HttpResponse, RequestOptions,
};

// Re-export Spotify client types
pub use clients::spotify::{SpotifyClient, SpotifyError};
