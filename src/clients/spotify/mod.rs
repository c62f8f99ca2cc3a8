//! Spotify Web API client.
//!
//! This module binds the base [`HttpClient`](crate::clients::HttpClient) to
//! the Spotify Web API: a fixed origin, Spotify-tuned timeout and retry
//! defaults, bearer-token handling, typed playback and library operations,
//! and Spotify-aware error messages.
//!
//! # Overview
//!
//! - [`SpotifyClient`]: The client and its domain operations
//! - [`SpotifyError`]: Error type for all operations
//! - [`SpotifyErrorRemapper`]: The message refinement plugged into the base client
//! - Response shapes such as [`TopTrack`], [`DeviceList`] and [`PlaybackState`]
//!
//! # Example
//!
//! ```rust,ignore
//! use spotify_api::clients::spotify::SpotifyClient;
//!
//! let mut client = SpotifyClient::new(None);
//! client.set_access_token("user-token")?;
//!
//! let devices = client.available_devices().await?;
//! if let Some(device) = devices.active_device {
//!     client.pause_playback(device.id.as_deref()).await?;
//! }
//! ```

mod client;
mod errors;
mod types;

pub use client::{
    SpotifyClient, DEFAULT_FOLLOWED_ARTISTS_LIMIT, DEFAULT_TOP_TRACKS_LIMIT, SPOTIFY_API_ORIGIN,
    SPOTIFY_MAX_RETRIES, SPOTIFY_TIMEOUT_MS,
};
pub use errors::{SpotifyError, SpotifyErrorRemapper, PREMIUM_REQUIRED_REASON};
pub use types::{
    Artist, Device, DeviceList, FollowedArtists, NowPlaying, PlaybackAck, PlaybackState,
    PlayingItem, TimeRange, TopTrack, TopTrackPlayback, UserProfile, MAX_TOP_TRACK_INDEX,
};
