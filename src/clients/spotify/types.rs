//! Caller-facing shapes returned by [`SpotifyClient`](super::SpotifyClient).
//!
//! Provider payloads are treated as opaque JSON except for the fields each
//! operation re-projects. The private `Wire*` structs mirror the provider's
//! field layout; the public types are what callers see.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Highest 1-based position accepted by
/// [`SpotifyClient::play_top_track`](super::SpotifyClient::play_top_track).
pub const MAX_TOP_TRACK_INDEX: usize = 10;

/// Period over which top items are computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    /// Roughly the last four weeks.
    ShortTerm,
    /// Roughly the last six months.
    #[default]
    MediumTerm,
    /// Several years of data.
    LongTerm,
}

impl TimeRange {
    /// Returns the query-string value for this range.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ShortTerm => "short_term",
            Self::MediumTerm => "medium_term",
            Self::LongTerm => "long_term",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A followed artist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Follower count, when the provider reports one.
    pub followers: Option<u64>,
    pub popularity: Option<u32>,
    pub uri: String,
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

/// One page of followed artists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowedArtists {
    pub artists: Vec<Artist>,
    /// Total followed artists across all pages.
    pub total: Option<u64>,
    /// Cursor to pass as `after` to fetch the next page.
    pub next_cursor: Option<String>,
}

/// A top track, with its 1-based position in the listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopTrack {
    pub index: usize,
    pub id: String,
    pub name: String,
    /// Artist names joined with `", "`.
    pub artist: String,
    pub uri: String,
    pub preview_url: Option<String>,
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

/// Acknowledgement of a playback command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackAck {
    pub success: bool,
    pub message: String,
}

impl PlaybackAck {
    pub(crate) fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Acknowledgement of [`SpotifyClient::play_top_track`](super::SpotifyClient::play_top_track).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopTrackPlayback {
    pub success: bool,
    /// `"Now playing: <name> by <artist>"`.
    pub message: String,
    pub track: TopTrack,
}

/// The track or episode currently loaded in the player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayingItem {
    pub id: Option<String>,
    pub name: String,
    /// Artist names joined with `", "`; empty for episodes.
    pub artist: String,
    pub uri: String,
    pub duration_ms: Option<u64>,
}

/// An output device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_private_session: bool,
    #[serde(default)]
    pub is_restricted: bool,
    pub volume_percent: Option<u8>,
}

/// The available output devices.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceList {
    pub devices: Vec<Device>,
    pub total: usize,
    /// The first active device, if any.
    pub active_device: Option<Device>,
}

impl DeviceList {
    pub(crate) fn new(devices: Vec<Device>) -> Self {
        let active_device = devices.iter().find(|device| device.is_active).cloned();
        Self {
            total: devices.len(),
            devices,
            active_device,
        }
    }
}

/// Full player state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub device: Option<Device>,
    pub is_playing: bool,
    pub shuffle_state: bool,
    pub repeat_state: String,
    pub progress_ms: Option<u64>,
    pub currently_playing_type: Option<String>,
    pub item: Option<PlayingItem>,
}

/// What is playing right now.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NowPlaying {
    pub is_playing: bool,
    pub progress_ms: Option<u64>,
    pub currently_playing_type: Option<String>,
    pub item: Option<PlayingItem>,
}

/// The current user's profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    /// Subscription level, e.g. `"premium"` or `"free"`.
    pub product: Option<String>,
    pub followers: Option<u64>,
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

// Provider payload layouts.

#[derive(Deserialize)]
pub(crate) struct WireFollowing {
    pub artists: WireArtistPage,
}

#[derive(Deserialize)]
pub(crate) struct WireArtistPage {
    #[serde(default)]
    pub items: Vec<WireArtist>,
    pub total: Option<u64>,
    pub cursors: Option<WireCursors>,
}

#[derive(Deserialize)]
pub(crate) struct WireCursors {
    pub after: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct WireFollowers {
    pub total: Option<u64>,
}

#[derive(Deserialize)]
pub(crate) struct WireArtist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    pub followers: Option<WireFollowers>,
    pub popularity: Option<u32>,
    pub uri: String,
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

impl From<WireArtist> for Artist {
    fn from(wire: WireArtist) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            genres: wire.genres,
            followers: wire.followers.and_then(|f| f.total),
            popularity: wire.popularity,
            uri: wire.uri,
            external_urls: wire.external_urls,
        }
    }
}

impl From<WireFollowing> for FollowedArtists {
    fn from(wire: WireFollowing) -> Self {
        let page = wire.artists;
        Self {
            artists: page.items.into_iter().map(Artist::from).collect(),
            total: page.total,
            next_cursor: page.cursors.and_then(|c| c.after),
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct WireArtistName {
    pub name: String,
}

fn join_artists(artists: &[WireArtistName]) -> String {
    artists
        .iter()
        .map(|artist| artist.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Deserialize)]
pub(crate) struct WireTopTracks {
    #[serde(default)]
    pub items: Vec<WireTrack>,
}

#[derive(Deserialize)]
pub(crate) struct WireTrack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<WireArtistName>,
    pub uri: String,
    pub preview_url: Option<String>,
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

impl WireTopTracks {
    pub(crate) fn into_ranked(self) -> Vec<TopTrack> {
        self.items
            .into_iter()
            .enumerate()
            .map(|(i, track)| TopTrack {
                index: i + 1,
                artist: join_artists(&track.artists),
                id: track.id,
                name: track.name,
                uri: track.uri,
                preview_url: track.preview_url,
                external_urls: track.external_urls,
            })
            .collect()
    }
}

#[derive(Deserialize)]
pub(crate) struct WireItem {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<WireArtistName>,
    pub uri: String,
    pub duration_ms: Option<u64>,
}

impl From<WireItem> for PlayingItem {
    fn from(wire: WireItem) -> Self {
        Self {
            artist: join_artists(&wire.artists),
            id: wire.id,
            name: wire.name,
            uri: wire.uri,
            duration_ms: wire.duration_ms,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct WirePlayback {
    pub device: Option<Device>,
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub shuffle_state: bool,
    #[serde(default)]
    pub repeat_state: String,
    pub progress_ms: Option<u64>,
    pub currently_playing_type: Option<String>,
    pub item: Option<WireItem>,
}

impl From<WirePlayback> for PlaybackState {
    fn from(wire: WirePlayback) -> Self {
        Self {
            device: wire.device,
            is_playing: wire.is_playing,
            shuffle_state: wire.shuffle_state,
            repeat_state: wire.repeat_state,
            progress_ms: wire.progress_ms,
            currently_playing_type: wire.currently_playing_type,
            item: wire.item.map(PlayingItem::from),
        }
    }
}

impl From<WirePlayback> for NowPlaying {
    fn from(wire: WirePlayback) -> Self {
        Self {
            is_playing: wire.is_playing,
            progress_ms: wire.progress_ms,
            currently_playing_type: wire.currently_playing_type,
            item: wire.item.map(PlayingItem::from),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireDevices {
    #[serde(default)]
    pub devices: Vec<Device>,
}

#[derive(Deserialize)]
pub(crate) struct WireProfile {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub product: Option<String>,
    pub followers: Option<WireFollowers>,
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

impl From<WireProfile> for UserProfile {
    fn from(wire: WireProfile) -> Self {
        Self {
            id: wire.id,
            display_name: wire.display_name,
            email: wire.email,
            country: wire.country,
            product: wire.product,
            followers: wire.followers.and_then(|f| f.total),
            external_urls: wire.external_urls,
        }
    }
}
