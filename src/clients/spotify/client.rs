//! Spotify Web API client implementation.
//!
//! This module provides the [`SpotifyClient`] type: an [`HttpClient`] bound
//! to the Spotify Web API origin, carrying one user's bearer token, and
//! exposing the playback and library operations as typed methods.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::clients::spotify::errors::{SpotifyError, SpotifyErrorRemapper};
use crate::clients::spotify::types::{
    DeviceList, FollowedArtists, NowPlaying, PlaybackAck, PlaybackState, TimeRange, TopTrack,
    TopTrackPlayback, UserProfile, WireDevices, WireFollowing, WirePlayback, WireProfile,
    WireTopTracks, MAX_TOP_TRACK_INDEX,
};
use crate::clients::{HttpClient, RequestOptions, AUTHORIZATION_HEADER};
use crate::config::{AccessToken, ClientConfig, ClientConfigBuilder};
use crate::error::InvalidArgumentError;

/// Origin of the Spotify Web API.
pub const SPOTIFY_API_ORIGIN: &str = "https://api.spotify.com/v1";

/// Default per-attempt timeout for Spotify calls, in milliseconds.
pub const SPOTIFY_TIMEOUT_MS: u64 = 15_000;

/// Default retry ceiling for Spotify calls.
pub const SPOTIFY_MAX_RETRIES: u32 = 2;

/// Default page size for followed artists.
pub const DEFAULT_FOLLOWED_ARTISTS_LIMIT: u32 = 20;

/// Default number of top tracks.
pub const DEFAULT_TOP_TRACKS_LIMIT: u32 = 10;

/// Client for the Spotify Web API.
///
/// Every operation inherits the base client's retry and normalization
/// pipeline; failures reach the caller with Spotify-specific messages (see
/// [`SpotifyErrorRemapper`]).
///
/// # Credentials
///
/// A client carries at most one user's token at a time. Installing or
/// clearing the token takes `&mut self`, so it cannot happen while a call
/// borrowed from the same client is still in flight. To serve several users
/// concurrently, build one client per user with
/// [`SpotifyClient::for_access_token`].
///
/// # Thread Safety
///
/// `SpotifyClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use spotify_api::clients::spotify::{SpotifyClient, TimeRange};
///
/// let client = SpotifyClient::for_access_token("user-token", None)?;
///
/// for track in client.top_tracks(5, TimeRange::ShortTerm).await? {
///     println!("{}. {} by {}", track.index, track.name, track.artist);
/// }
///
/// let result = client.play_top_track(1, None).await?;
/// println!("{}", result.message);
/// ```
#[derive(Debug)]
pub struct SpotifyClient {
    http_client: HttpClient,
}

// Verify SpotifyClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SpotifyClient>();
};

impl SpotifyClient {
    /// Creates a new client without a token.
    ///
    /// The client starts from the Spotify defaults (15 second timeout, 2
    /// retries, Spotify origin); `overrides` replace exactly the fields they
    /// set. Overriding the origin is mainly useful for tests.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use spotify_api::ClientConfig;
    /// use spotify_api::clients::spotify::SpotifyClient;
    ///
    /// let client = SpotifyClient::new(None);
    /// assert_eq!(client.config().timeout(), Duration::from_millis(15_000));
    /// assert_eq!(client.config().max_retries(), 2);
    ///
    /// let client = SpotifyClient::new(Some(ClientConfig::builder().max_retries(0)));
    /// assert_eq!(client.config().max_retries(), 0);
    /// assert_eq!(client.config().timeout(), Duration::from_millis(15_000));
    /// ```
    #[must_use]
    pub fn new(overrides: Option<ClientConfigBuilder>) -> Self {
        let config = overrides
            .unwrap_or_default()
            .apply(Self::default_config());

        Self {
            http_client: HttpClient::with_remapper(config, Arc::new(SpotifyErrorRemapper)),
        }
    }

    /// Creates a new client already carrying `token`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgumentError::MissingAccessToken`] if `token` is empty.
    pub fn for_access_token(
        token: &str,
        overrides: Option<ClientConfigBuilder>,
    ) -> Result<Self, InvalidArgumentError> {
        let mut client = Self::new(overrides);
        client.set_access_token(token)?;
        Ok(client)
    }

    fn default_config() -> ClientConfig {
        ClientConfig::builder()
            .timeout_ms(SPOTIFY_TIMEOUT_MS)
            .max_retries(SPOTIFY_MAX_RETRIES)
            .base_origin(SPOTIFY_API_ORIGIN)
            .build()
    }

    /// Returns the effective configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        self.http_client.config()
    }

    /// Returns the underlying base client.
    #[must_use]
    pub const fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Installs a bearer token sent with every subsequent call.
    ///
    /// Fails without touching the network when the token is empty or absent.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgumentError::MissingAccessToken`] if `token` is
    /// `None` or empty. The previous token, if any, is kept.
    ///
    /// # Example
    ///
    /// ```rust
    /// use spotify_api::InvalidArgumentError;
    /// use spotify_api::clients::spotify::SpotifyClient;
    ///
    /// let mut client = SpotifyClient::new(None);
    ///
    /// assert_eq!(client.set_access_token(""), Err(InvalidArgumentError::MissingAccessToken));
    /// assert_eq!(client.set_access_token(None), Err(InvalidArgumentError::MissingAccessToken));
    ///
    /// client.set_access_token("tok").unwrap();
    /// assert!(client.has_access_token());
    /// ```
    pub fn set_access_token<'a>(
        &mut self,
        token: impl Into<Option<&'a str>>,
    ) -> Result<(), InvalidArgumentError> {
        let token = AccessToken::from_optional(token.into())?;

        self.http_client.remove_default_header(AUTHORIZATION_HEADER);
        self.http_client
            .set_default_header(AUTHORIZATION_HEADER, token.bearer());
        Ok(())
    }

    /// Removes the bearer token; later calls are unauthenticated.
    pub fn clear_access_token(&mut self) {
        if self
            .http_client
            .remove_default_header(AUTHORIZATION_HEADER)
            .is_some()
        {
            tracing::debug!("Cleared Spotify access token");
        }
    }

    /// Returns `true` if a bearer token is installed.
    #[must_use]
    pub fn has_access_token(&self) -> bool {
        self.http_client
            .default_headers()
            .keys()
            .any(|name| name.eq_ignore_ascii_case(AUTHORIZATION_HEADER))
    }

    /// Lists the artists the user follows, one page at a time.
    ///
    /// Pass the previous page's `next_cursor` as `after` to continue.
    ///
    /// # Errors
    ///
    /// Returns [`SpotifyError::Http`] if the call fails, or
    /// [`SpotifyError::UnexpectedPayload`] if the response cannot be read.
    pub async fn followed_artists(
        &self,
        limit: u32,
        after: Option<&str>,
    ) -> Result<FollowedArtists, SpotifyError> {
        let options = RequestOptions::new()
            .query_param("type", "artist")
            .query_param("limit", limit.to_string())
            .optional_query_param("after", after);

        let body = self.http_client.get("/me/following", Some(options)).await?;
        decode::<WireFollowing>("followed_artists", body).map(FollowedArtists::from)
    }

    /// Lists the user's top tracks, ranked from 1.
    ///
    /// # Errors
    ///
    /// Returns [`SpotifyError::Http`] if the call fails, or
    /// [`SpotifyError::UnexpectedPayload`] if the response cannot be read.
    pub async fn top_tracks(
        &self,
        limit: u32,
        time_range: TimeRange,
    ) -> Result<Vec<TopTrack>, SpotifyError> {
        let options = RequestOptions::new()
            .query_param("limit", limit.to_string())
            .query_param("time_range", time_range.as_str());

        let body = self.http_client.get("/me/top/tracks", Some(options)).await?;
        decode::<WireTopTracks>("top_tracks", body).map(WireTopTracks::into_ranked)
    }

    /// Starts or resumes playback.
    ///
    /// With no `uris` the current context resumes; otherwise the given
    /// tracks are played. `device_id` targets a specific device.
    ///
    /// # Errors
    ///
    /// Returns [`SpotifyError::Http`] if the call fails.
    pub async fn start_playback(
        &self,
        uris: &[&str],
        device_id: Option<&str>,
    ) -> Result<PlaybackAck, SpotifyError> {
        let body = if uris.is_empty() {
            json!({})
        } else {
            json!({ "uris": uris })
        };

        self.http_client
            .put("/me/player/play", Some(body), Some(device_options(device_id)))
            .await?;
        Ok(PlaybackAck::ok("Playback started"))
    }

    /// Plays a single track.
    ///
    /// # Errors
    ///
    /// Returns [`SpotifyError::InvalidArgument`] without calling Spotify if
    /// `uri` is empty, or [`SpotifyError::Http`] if the call fails.
    pub async fn play_track(
        &self,
        uri: &str,
        device_id: Option<&str>,
    ) -> Result<PlaybackAck, SpotifyError> {
        if uri.trim().is_empty() {
            return Err(InvalidArgumentError::MissingTrackUri.into());
        }
        self.start_playback(&[uri], device_id).await
    }

    /// Plays the track at a 1-based position in the user's top 10.
    ///
    /// # Errors
    ///
    /// Returns [`SpotifyError::InvalidArgument`] if `index` is outside
    /// `1..=10` (before any call) or beyond the tracks Spotify returned, or
    /// [`SpotifyError::Http`] if a call fails.
    pub async fn play_top_track(
        &self,
        index: usize,
        device_id: Option<&str>,
    ) -> Result<TopTrackPlayback, SpotifyError> {
        if !(1..=MAX_TOP_TRACK_INDEX).contains(&index) {
            return Err(InvalidArgumentError::TopTrackIndexOutOfRange { index }.into());
        }

        let mut tracks = self
            .top_tracks(DEFAULT_TOP_TRACKS_LIMIT, TimeRange::default())
            .await?;
        if index > tracks.len() {
            return Err(InvalidArgumentError::TopTrackUnavailable {
                index,
                available: tracks.len(),
            }
            .into());
        }

        let track = tracks.swap_remove(index - 1);
        self.play_track(&track.uri, device_id).await?;

        Ok(TopTrackPlayback {
            success: true,
            message: format!("Now playing: {} by {}", track.name, track.artist),
            track,
        })
    }

    /// Pauses playback.
    ///
    /// # Errors
    ///
    /// Returns [`SpotifyError::Http`] if the call fails.
    pub async fn pause_playback(&self, device_id: Option<&str>) -> Result<PlaybackAck, SpotifyError> {
        self.http_client
            .put("/me/player/pause", None, Some(device_options(device_id)))
            .await?;
        Ok(PlaybackAck::ok("Playback paused"))
    }

    /// Returns the full player state, or `None` when nothing is active.
    ///
    /// # Errors
    ///
    /// Returns [`SpotifyError::Http`] if the call fails, or
    /// [`SpotifyError::UnexpectedPayload`] if the response cannot be read.
    pub async fn current_playback(&self) -> Result<Option<PlaybackState>, SpotifyError> {
        let body = self.http_client.get("/me/player", None).await?;
        decode_optional::<WirePlayback>("current_playback", body)
            .map(|state| state.map(PlaybackState::from))
    }

    /// Returns what is playing right now, or `None` when nothing is.
    ///
    /// # Errors
    ///
    /// Returns [`SpotifyError::Http`] if the call fails, or
    /// [`SpotifyError::UnexpectedPayload`] if the response cannot be read.
    pub async fn currently_playing(&self) -> Result<Option<NowPlaying>, SpotifyError> {
        let body = self
            .http_client
            .get("/me/player/currently-playing", None)
            .await?;
        decode_optional::<WirePlayback>("currently_playing", body)
            .map(|state| state.map(NowPlaying::from))
    }

    /// Lists the user's available output devices.
    ///
    /// # Errors
    ///
    /// Returns [`SpotifyError::Http`] if the call fails, or
    /// [`SpotifyError::UnexpectedPayload`] if the response cannot be read.
    pub async fn available_devices(&self) -> Result<DeviceList, SpotifyError> {
        let body = self.http_client.get("/me/player/devices", None).await?;
        decode::<WireDevices>("available_devices", body).map(|wire| DeviceList::new(wire.devices))
    }

    /// Returns the current user's profile.
    ///
    /// # Errors
    ///
    /// Returns [`SpotifyError::Http`] if the call fails, or
    /// [`SpotifyError::UnexpectedPayload`] if the response cannot be read.
    pub async fn user_profile(&self) -> Result<UserProfile, SpotifyError> {
        let body = self.http_client.get("/me", None).await?;
        decode::<WireProfile>("user_profile", body).map(UserProfile::from)
    }
}

fn device_options(device_id: Option<&str>) -> RequestOptions {
    RequestOptions::new().optional_query_param("device_id", device_id)
}

fn decode<T: DeserializeOwned>(operation: &'static str, body: Value) -> Result<T, SpotifyError> {
    serde_json::from_value(body)
        .map_err(|source| SpotifyError::UnexpectedPayload { operation, source })
}

// An empty body (204 No Content) means there is nothing to report.
fn decode_optional<T: DeserializeOwned>(
    operation: &'static str,
    body: Value,
) -> Result<Option<T>, SpotifyError> {
    if body.is_null() {
        return Ok(None);
    }
    decode(operation, body).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults_are_tuned_for_spotify() {
        let client = SpotifyClient::new(None);

        assert_eq!(client.config().timeout(), Duration::from_millis(15_000));
        assert_eq!(client.config().max_retries(), 2);
        assert_eq!(client.config().base_retry_delay(), Duration::from_millis(1_000));
        assert_eq!(
            client.config().base_origin().map(ToString::to_string),
            Some(SPOTIFY_API_ORIGIN.to_string())
        );
        assert!(!client.has_access_token());
    }

    #[test]
    fn test_overrides_replace_only_their_field() {
        let client = SpotifyClient::new(Some(ClientConfig::builder().timeout_ms(2_000)));

        assert_eq!(client.config().timeout(), Duration::from_millis(2_000));
        assert_eq!(client.config().max_retries(), 2);
    }

    #[test]
    fn test_origin_can_be_overridden() {
        let client = SpotifyClient::new(Some(
            ClientConfig::builder().base_origin("http://127.0.0.1:9999/"),
        ));

        assert_eq!(
            client.config().base_origin().map(ToString::to_string),
            Some("http://127.0.0.1:9999".to_string())
        );
    }

    #[test]
    fn test_set_access_token_rejects_empty_and_absent() {
        let mut client = SpotifyClient::new(None);

        assert_eq!(
            client.set_access_token(""),
            Err(InvalidArgumentError::MissingAccessToken)
        );
        assert_eq!(
            client.set_access_token(None),
            Err(InvalidArgumentError::MissingAccessToken)
        );
        assert!(!client.has_access_token());
    }

    #[test]
    fn test_set_access_token_installs_bearer_header() {
        let mut client = SpotifyClient::new(None);
        client.set_access_token("tok").unwrap();

        assert_eq!(
            client.http_client().default_headers().get("Authorization"),
            Some(&"Bearer tok".to_string())
        );

        client.set_access_token(Some("next")).unwrap();
        assert_eq!(
            client.http_client().default_headers().get("Authorization"),
            Some(&"Bearer next".to_string())
        );
    }

    #[test]
    fn test_failed_set_keeps_previous_token() {
        let mut client = SpotifyClient::for_access_token("tok", None).unwrap();
        assert!(client.set_access_token("").is_err());

        assert_eq!(
            client.http_client().default_headers().get("Authorization"),
            Some(&"Bearer tok".to_string())
        );
    }

    #[test]
    fn test_clear_access_token_removes_header() {
        let mut client = SpotifyClient::for_access_token("tok", None).unwrap();
        assert!(client.has_access_token());

        client.clear_access_token();
        assert!(!client.has_access_token());

        // Clearing twice is harmless
        client.clear_access_token();
        assert!(!client.has_access_token());
    }

    #[test]
    fn test_for_access_token_rejects_empty() {
        let result = SpotifyClient::for_access_token("", None);
        assert!(matches!(result, Err(InvalidArgumentError::MissingAccessToken)));
    }

    #[test]
    fn test_debug_output_masks_token() {
        let client = SpotifyClient::for_access_token("very-secret-token", None).unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("very-secret-token"));
    }

    #[tokio::test]
    async fn test_play_track_rejects_empty_uri_before_any_call() {
        let client = SpotifyClient::new(Some(
            ClientConfig::builder().base_origin("http://127.0.0.1:1"),
        ));

        let error = client.play_track("", None).await.unwrap_err();
        assert!(matches!(
            error,
            SpotifyError::InvalidArgument(InvalidArgumentError::MissingTrackUri)
        ));
        assert_eq!(error.to_string(), "Track URI is required");
    }

    #[tokio::test]
    async fn test_play_top_track_rejects_out_of_range_index() {
        let client = SpotifyClient::new(Some(
            ClientConfig::builder().base_origin("http://127.0.0.1:1"),
        ));

        for index in [0, 11] {
            let error = client.play_top_track(index, None).await.unwrap_err();
            assert_eq!(error.to_string(), "Song index must be between 1 and 10");
            assert_eq!(error.status_code(), 0);
        }
    }

    #[test]
    fn test_decode_optional_treats_null_as_none() {
        let decoded: Option<Value> = decode_optional("test", Value::Null).unwrap();
        assert!(decoded.is_none());
    }

    #[test]
    fn test_decode_reports_operation_on_bad_payload() {
        let error = decode::<WireDevices>("available_devices", json!({"devices": "nope"})).unwrap_err();
        assert!(matches!(
            error,
            SpotifyError::UnexpectedPayload { operation: "available_devices", .. }
        ));
    }
}
